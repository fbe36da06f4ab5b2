//! World error types.

use crate::entity::Entity;

/// Errors reported by the checked [`World`](crate::World) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// The handle is stale or was never allocated by this world.
    #[error("entity {0} is not alive")]
    EntityNotAlive(Entity),

    /// `add` was called for a component the entity already has.
    #[error("entity {entity} already has component {component}")]
    ComponentAlreadyPresent {
        entity: Entity,
        component: &'static str,
    },
}
