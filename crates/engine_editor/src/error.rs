//! Editor error types.

use engine_component::Entity;

pub use crate::config::ConfigError;

/// Rejected inspector operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("no entity is selected")]
    NoSelection,

    #[error("unknown component `{0}`")]
    UnknownComponent(String),

    /// UUID, tag and enabled state are edited through the scene itself.
    #[error("component `{0}` is managed by the scene")]
    Protected(&'static str),

    #[error("entity {entity} already has `{component}`")]
    AlreadyPresent { entity: Entity, component: &'static str },

    #[error("entity {entity} has no `{component}`")]
    Missing { entity: Entity, component: &'static str },

    /// The transform holds the hierarchy links.
    #[error("entity {entity} has a parent or children")]
    Linked { entity: Entity },
}
