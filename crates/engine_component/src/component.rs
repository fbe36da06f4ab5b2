//! Core [`Component`] trait and process-wide [`TypeId`] identity.
//!
//! Every piece of data attached to an entity must implement [`Component`].
//! The trait requires `Send + Sync + 'static` so component tables can live
//! behind the same locks as the type registry.
//!
//! ## Type Identity
//!
//! [`TypeId`] is the FNV-1a 64-bit hash of a type's name. For Rust types the
//! name is [`std::any::type_name`], so two calls for the same concrete type
//! always yield the same ID within a build. IDs are not guaranteed to be
//! stable across compiler versions; registries are rebuilt at startup, so this
//! never matters in practice.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A process-stable identifier for a type, derived from its name using the
/// FNV-1a 64-bit hash algorithm.
///
/// Every registry lookup (type descriptions, component descriptors, component
/// tables) is keyed by this ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct TypeId(pub u64);

impl TypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute a [`TypeId`] from an arbitrary name.
    ///
    /// # Algorithm (FNV-1a 64-bit)
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325          (offset basis)
    /// for each byte in name.as_bytes():
    ///     hash = hash XOR byte
    ///     hash = hash * 0x00000100000001b3  (prime)
    /// return hash
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// Compute the [`TypeId`] of a concrete Rust type.
    ///
    /// This hashes the fully qualified [`std::any::type_name`], so `f32`,
    /// `glam::Vec3` and a user struct all get distinct IDs.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::from_name(std::any::type_name::<T>())
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({:#018x})", self.0)
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

/// The core component trait.
///
/// Anything stored in a [`World`](crate::World) table implements this trait.
///
/// # Examples
///
/// ```rust
/// use engine_component::{Component, TypeId};
///
/// #[derive(Debug, Clone, Default)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
///
/// assert_eq!(Health::component_type_id(), TypeId::of::<Health>());
/// ```
pub trait Component: Send + Sync + 'static {
    /// A human-readable name for this component type.
    fn type_name() -> &'static str;

    /// Returns the [`TypeId`] this component's table and descriptors are
    /// keyed by.
    ///
    /// Always [`TypeId::of::<Self>()`](TypeId::of); the display name is not
    /// part of the identity.
    fn component_type_id() -> TypeId {
        TypeId::of::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    impl Component for Velocity {
        fn type_name() -> &'static str {
            "Velocity"
        }
    }

    #[test]
    fn test_type_id_is_stable() {
        assert_eq!(TypeId::of::<Health>(), TypeId::of::<Health>());
        assert_eq!(Health::component_type_id(), Health::component_type_id());
    }

    #[test]
    fn test_type_id_differs_between_types() {
        assert_ne!(TypeId::of::<Health>(), TypeId::of::<Velocity>());
        assert_ne!(TypeId::of::<f32>(), TypeId::of::<f64>());
        assert_ne!(TypeId::of::<i32>(), TypeId::of::<u32>());
    }

    #[test]
    fn test_component_type_id_matches_of() {
        assert_eq!(Health::component_type_id(), TypeId::of::<Health>());
    }

    #[test]
    fn test_type_id_from_name_is_deterministic() {
        let id = TypeId::from_name("Health");
        assert_eq!(id, TypeId::from_name("Health"));
        assert_ne!(id, TypeId::from_name("Velocity"));
    }

    #[test]
    fn test_fnv1a_known_vector() {
        // FNV-1a 64-bit of the empty string is the offset basis itself.
        assert_eq!(TypeId::from_name(""), TypeId(0xcbf2_9ce4_8422_2325));
        // And of "a" is a published test vector.
        assert_eq!(TypeId::from_name("a"), TypeId(0xaf63_dc4c_8601_ec8c));
    }

    #[test]
    fn test_of_uses_type_name() {
        assert_eq!(TypeId::of::<f32>(), TypeId::from_name("f32"));
    }
}
