//! # engine_component
//!
//! Entity and component storage for the scene editor.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the contract all entity data must satisfy.
//! - [`TypeId`] — FNV-1a type identity used as every registry key.
//! - [`Entity`] — generation-checked `(index, generation)` handles.
//! - [`EntityAllocator`] — slot allocation with a free list.
//! - [`ComponentTable`] — sparse-set storage, one per component type.
//! - [`World`] — owner of entities and tables, with typed accessors and
//!   lazy multi-component [`View`]s.

pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod storage;
pub mod world;

pub use component::{Component, TypeId};
pub use entity::{Entity, EntityAllocator};
pub use error::WorldError;
pub use query::{View, ViewQuery};
pub use storage::{AnyTable, ComponentTable};
pub use world::{EntityMut, World};
