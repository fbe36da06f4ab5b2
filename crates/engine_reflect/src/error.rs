//! Reflection-layer error types.

/// Errors raised while reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Reading or writing the backing file failed.
    #[error("document I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The text is not valid YAML, or a value could not be represented.
    #[error("malformed YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Structural problems found by [`TypeRegistry::finalize`](crate::TypeRegistry::finalize).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A registered field's type was never registered itself.
    #[error("field `{owner}.{field}` has unregistered type `{field_type}`")]
    MissingFieldType {
        owner: String,
        field: String,
        field_type: &'static str,
    },

    /// Following field types leads back to a type already on the path.
    #[error("type graph contains a cycle: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },
}
