//! # engine_editor
//!
//! Headless scene editor built on the reflection registry.
//!
//! - [`EditorConfig`] — layered configuration (defaults, YAML file,
//!   `ENGINE_*` environment, command line).
//! - [`Selection`] — ordered multi-selection.
//! - [`Session`] — scene, selection and undo history, with the
//!   reflection-driven inspector.
//!
//! The `engine_editor` binary drives a [`Session`] with a
//! [`HeadlessUi`](engine_reflect::HeadlessUi) from the command line.

pub mod config;
pub mod demo;
pub mod error;
pub mod selection;
pub mod session;

pub use config::EditorConfig;
pub use demo::demo_scene;
pub use error::{ConfigError, SessionError};
pub use selection::Selection;
pub use session::Session;
