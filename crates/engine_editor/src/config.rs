//! Editor configuration.
//!
//! Built in layers, later ones winning: [`EditorConfig::default`], then an
//! optional YAML file, then `ENGINE_*` environment variables, then
//! command-line flags (applied by the binary through the `with_*`
//! builders).
//!
//! The file is read through the reflection registry like any other
//! document, so keys missing from it keep their defaults:
//!
//! ```yaml
//! scene_path: levels/intro.yaml
//! undo_limit: 64
//! autosave: true
//! ```

use std::path::Path;

use engine_reflect::{Document, DocumentError, Serializer, TypeRegistry, type_info};
use tracing::debug;

/// Environment variable overriding [`EditorConfig::scene_path`].
pub const SCENE_ENV: &str = "ENGINE_SCENE";
/// Environment variable overriding [`EditorConfig::undo_limit`].
pub const UNDO_LIMIT_ENV: &str = "ENGINE_UNDO_LIMIT";
/// Environment variable overriding [`EditorConfig::autosave`].
pub const AUTOSAVE_ENV: &str = "ENGINE_AUTOSAVE";
/// Environment variable overriding [`EditorConfig::log_filter`].
pub const LOG_ENV: &str = "ENGINE_LOG";

pub const DEFAULT_SCENE_PATH: &str = "scene.yaml";
pub const DEFAULT_LOG_FILTER: &str = "engine_editor=info,engine_scene=info,engine_reflect=warn";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Scene file opened, and written by `save`.
    pub scene_path: String,
    /// Maximum number of undo entries kept.
    pub undo_limit: u64,
    /// Save the scene after every inspector edit.
    pub autosave: bool,
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            scene_path: DEFAULT_SCENE_PATH.to_owned(),
            undo_limit: engine_scene::DEFAULT_UNDO_LIMIT as u64,
            autosave: false,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl EditorConfig {
    /// Make the config readable and writable as a document.
    pub fn register(registry: &mut TypeRegistry) {
        registry.register_type(type_info!(EditorConfig {
            scene_path,
            undo_limit,
            autosave,
            log_filter,
        }));
    }

    /// Defaults overlaid with the file at `path`.
    ///
    /// Requires [`EditorConfig::register`] to have been called on
    /// `registry`.
    pub fn from_file(registry: &TypeRegistry, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let doc = Document::from_file(path)?;
        let mut config = Self::default();
        let complete = doc.reader(registry).deser("", &mut config);
        debug!(path = %path.display(), complete, "read editor config");
        Ok(config)
    }

    /// Write the config as YAML.
    pub fn save(&self, registry: &TypeRegistry, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let mut ser = Serializer::new(registry);
        ser.ser("", self);
        ser.into_document().save(path)?;
        Ok(())
    }

    /// Apply `ENGINE_*` overrides found through `lookup`.
    pub fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(SCENE_ENV) {
            self.scene_path = path;
        }
        if let Some(raw) = lookup(UNDO_LIMIT_ENV) {
            self.undo_limit = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&limit| limit > 0)
                .ok_or(ConfigError::InvalidEnv {
                    var: UNDO_LIMIT_ENV,
                    value: raw,
                })?;
        }
        if let Some(raw) = lookup(AUTOSAVE_ENV) {
            self.autosave = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: AUTOSAVE_ENV,
                        value: raw,
                    });
                }
            };
        }
        if let Some(filter) = lookup(LOG_ENV) {
            self.log_filter = filter;
        }
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn apply_process_env(self) -> Result<Self, ConfigError> {
        self.apply_env(|var| std::env::var(var).ok())
    }

    #[must_use]
    pub fn with_scene_path(mut self, path: impl Into<String>) -> Self {
        self.scene_path = path.into();
        self
    }

    #[must_use]
    pub fn with_undo_limit(mut self, limit: u64) -> Self {
        self.undo_limit = limit;
        self
    }

    #[must_use]
    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Undo capacity, at least one.
    #[must_use]
    pub fn undo_capacity(&self) -> usize {
        usize::try_from(self.undo_limit).unwrap_or(usize::MAX).max(1)
    }
}
