//! # engine_editor — command-line front end
//!
//! Runs the inspector headlessly: scenes are loaded from YAML, edited
//! through the same reflection walk a GUI would use, and written back.
//!
//! ```text
//! engine_editor new scene.yaml
//! engine_editor inspect scene.yaml --entity cube \
//!     --set SceneTransformComponent/position=0,2,0
//! engine_editor duplicate scene.yaml --entity lamp
//! engine_editor types --json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

use engine_editor::config::{DEFAULT_LOG_FILTER, LOG_ENV};
use engine_editor::{EditorConfig, Session, demo_scene};
use engine_reflect::{HeadlessUi, TypeRegistry};
use engine_scene::{load_scene, register_all, save_scene};

#[derive(Parser)]
#[command(name = "engine_editor", about = "Headless reflection-driven scene editor")]
struct Args {
    /// Editor config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of undo entries kept
    #[arg(long, global = true)]
    undo_limit: Option<u64>,

    /// Save the scene after every edit
    #[arg(long, global = true)]
    autosave: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every registered type and component
    Types {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a starter scene
    New { path: String },
    /// Print the inspector for one entity, optionally applying edits
    Inspect {
        path: String,
        /// Tag of the entity to inspect (defaults to the first entity)
        #[arg(short, long)]
        entity: Option<String>,
        /// Widget edit, e.g. `LightComponent/radius=8`
        #[arg(long = "set", value_name = "PATH=VALUE")]
        set: Vec<String>,
    },
    /// Duplicate an entity and save the scene
    Duplicate {
        path: String,
        /// Tag of the entity to duplicate
        #[arg(short, long)]
        entity: String,
    },
}

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Install the subscriber before anything can log. `RUST_LOG` wins, then
/// `ENGINE_LOG`, then the built-in filter.
fn init_logging() -> Result<FilterHandle> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives =
                std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_owned());
            EnvFilter::try_new(directives)?
        }
    };
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
    Ok(handle)
}

/// Switch to the filter named by the loaded config unless `RUST_LOG` pins
/// one.
fn apply_log_filter(handle: &FilterHandle, config: &EditorConfig) {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return;
    }
    match EnvFilter::try_new(&config.log_filter) {
        Ok(filter) => {
            if let Err(err) = handle.reload(filter) {
                warn!(%err, "cannot apply configured log filter");
            }
        }
        Err(err) => warn!(filter = %config.log_filter, %err, "invalid log filter in config"),
    }
}

fn build_registry() -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    register_all(&mut registry);
    EditorConfig::register(&mut registry);
    registry.finalize()?;
    Ok(registry)
}

fn build_config(registry: &TypeRegistry, args: &Args) -> Result<EditorConfig> {
    let mut config = match &args.config {
        Some(path) => EditorConfig::from_file(registry, path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => EditorConfig::default(),
    };
    config = config.apply_process_env()?;
    if let Some(limit) = args.undo_limit {
        config = config.with_undo_limit(limit);
    }
    if args.autosave {
        config = config.with_autosave(true);
    }
    Ok(config)
}

fn open_session(registry: TypeRegistry, config: EditorConfig, path: String) -> Result<Session> {
    let scene =
        load_scene(&registry, &path).ok_or_else(|| anyhow!("cannot load scene {path}"))?;
    Ok(Session::new(registry, scene, config.with_scene_path(path)))
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_handle = init_logging()?;
    let registry = build_registry()?;
    let config = build_config(&registry, &args)?;
    apply_log_filter(&log_handle, &config);

    match args.command {
        Command::Types { json } => {
            let descriptions = registry.describe_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&descriptions)?);
                return Ok(());
            }
            for desc in descriptions {
                let kind = match (desc.component, desc.script) {
                    (true, true) => " [component, script]",
                    (true, false) => " [component]",
                    _ => "",
                };
                println!("{} ({}, {} bytes){kind}", desc.name, desc.type_id, desc.size);
                for field in desc.fields {
                    println!("  {}: {}", field.name, field.type_name);
                }
            }
        }
        Command::New { path } => {
            let scene = demo_scene();
            save_scene(&registry, &scene, &path)?;
            info!(path = %path, entities = scene.entity_count(), "wrote starter scene");
        }
        Command::Inspect { path, entity, set } => {
            let mut ui = HeadlessUi::new();
            for edit in &set {
                let Some((widget, value)) = edit.split_once('=') else {
                    bail!("edit `{edit}` is not of the form PATH=VALUE");
                };
                ui.edit(widget.trim(), value);
            }

            let mut session = open_session(registry, config, path)?;
            let selected = match &entity {
                Some(name) => session.select_by_name(name),
                None => {
                    let first = session.scene().entities().next();
                    if let Some(first) = first {
                        session.selection_mut().select(first, true);
                    }
                    first
                }
            };
            if selected.is_none() {
                bail!("no entity to inspect");
            }

            let edited = session.inspect(&mut ui);
            print!("{}", ui.render_text());
            for pending in ui.pending_edits() {
                warn!(widget = pending, "edit did not match any widget");
            }
            if edited && !session.config().autosave {
                session.save()?;
                info!(path = %session.config().scene_path, "saved edits");
            }
        }
        Command::Duplicate { path, entity } => {
            let mut session = open_session(registry, config, path)?;
            session
                .select_by_name(&entity)
                .ok_or_else(|| anyhow!("no entity tagged `{entity}`"))?;
            let copy = session.duplicate_selected()?;
            session.save()?;
            let uuid = session.scene().uuid_of(copy).unwrap_or_default();
            println!("{uuid:#018x}");
        }
    }

    Ok(())
}
