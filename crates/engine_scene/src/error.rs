//! Scene error types.

use engine_reflect::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("scene document has no `entities` sequence")]
    MissingEntities,
}
