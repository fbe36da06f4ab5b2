//! Lazy multi-component views.
//!
//! A view walks the dense storage of the first component type in the query
//! tuple and yields every entity that also has the remaining types:
//!
//! ```rust
//! # use engine_component::{Component, World};
//! # #[derive(Debug)] struct Position(f32);
//! # impl Component for Position { fn type_name() -> &'static str { "Position" } }
//! # #[derive(Debug)] struct Velocity(f32);
//! # impl Component for Velocity { fn type_name() -> &'static str { "Velocity" } }
//! let mut world = World::new();
//! let e = world.spawn();
//! world.add(e, Position(1.0));
//! world.add(e, Velocity(2.0));
//!
//! for (entity, pos, vel) in world.view::<(Position, Velocity)>() {
//!     assert_eq!(entity, e);
//!     assert_eq!(pos.0 + vel.0, 3.0);
//! }
//! ```
//!
//! Views borrow the world immutably, so structural mutation during a
//! traversal is rejected at compile time. Calling `view` again starts a fresh
//! traversal. The order follows the leading table's dense order, which
//! changes after removals.

use std::marker::PhantomData;
use std::slice;

use crate::component::{Component, TypeId};
use crate::entity::Entity;
use crate::world::World;

/// A tuple of component types that can be viewed together.
///
/// Implemented for `(A,)` through `(A, B, C, D)`.
pub trait ViewQuery {
    /// What the view yields per matching entity.
    type Item<'w>;

    /// The component type whose table drives iteration.
    fn leading_type() -> TypeId;

    /// Fetch the item for `entity`, or `None` if any component is missing.
    fn fetch<'w>(world: &'w World, entity: Entity) -> Option<Self::Item<'w>>;
}

macro_rules! impl_view_query {
    ($first:ident $(, $rest:ident)*) => {
        impl<$first: Component $(, $rest: Component)*> ViewQuery for ($first, $($rest,)*) {
            type Item<'w> = (Entity, &'w $first $(, &'w $rest)*);

            fn leading_type() -> TypeId {
                $first::component_type_id()
            }

            fn fetch<'w>(world: &'w World, entity: Entity) -> Option<Self::Item<'w>> {
                Some((
                    entity,
                    world.try_get::<$first>(entity)?
                    $(, world.try_get::<$rest>(entity)?)*
                ))
            }
        }
    };
}

impl_view_query!(A);
impl_view_query!(A, B);
impl_view_query!(A, B, C);
impl_view_query!(A, B, C, D);

/// Iterator returned by [`World::view`].
pub struct View<'w, Q: ViewQuery> {
    world: &'w World,
    candidates: slice::Iter<'w, Entity>,
    _query: PhantomData<fn() -> Q>,
}

impl<'w, Q: ViewQuery> View<'w, Q> {
    pub(crate) fn new(world: &'w World) -> Self {
        let candidates = world.table_entities(Q::leading_type()).unwrap_or(&[]);
        Self {
            world,
            candidates: candidates.iter(),
            _query: PhantomData,
        }
    }
}

impl<'w, Q: ViewQuery> Iterator for View<'w, Q> {
    type Item = Q::Item<'w>;

    fn next(&mut self) -> Option<Self::Item> {
        for &entity in self.candidates.by_ref() {
            if let Some(item) = Q::fetch(self.world, entity) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.candidates.len()))
    }
}
