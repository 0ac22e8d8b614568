//! An entity-component registry with hierarchical enablement and deferred
//! system membership.
//!
//! Components are stored in per-type reference-counted [pools](component::Pool)
//! and attached to [entities](entity::EntityId) arranged in a parent/child
//! hierarchy. [Systems](system::System) track every entity whose enabled
//! components cover their required set. Membership changes are queued and
//! applied when the [world](world::World) flushes, so systems can freely
//! request structural changes while iterating their members.
//!
//! ```
//! use arborist::prelude::*;
//!
//! #[derive(Component, Default, Clone)]
//! struct Position(f32);
//!
//! #[derive(Component, Default, Clone)]
//! struct Velocity(f32);
//!
//! #[derive(Default)]
//! struct Movement;
//!
//! impl System for Movement {
//!     type Components = (Position, Velocity);
//!
//!     fn update(&mut self, dt: f32, members: &[EntityId], world: &mut World) {
//!         for &entity in members {
//!             let velocity = world.get_component::<Velocity>(entity).unwrap();
//!             let delta = velocity.0 * dt;
//!
//!             world.get_component_mut::<Position>(entity).unwrap().0 += delta;
//!         }
//!     }
//! }
//!
//! let mut world = World::new();
//!
//! world.create_system::<Movement>();
//!
//! let entity = world
//!     .create_entity()
//!     .with(|v: &mut Velocity| v.0 = 2.0)
//!     .with(|_: &mut Position| {})
//!     .id();
//!
//! // the entity joins `Movement` on the first flush
//! world.update(1.0);
//! world.update(1.0);
//!
//! assert_eq!(world.get_component::<Position>(entity).unwrap().0, 2.0);
//! ```

#![forbid(unsafe_code)]

// allows referencing this crate as `arborist` in derives
extern crate self as arborist;

pub mod commands;
pub mod component;
pub mod entity;
mod storage;
pub mod system;
pub mod world;

/// Re-export of all items in this crate.
pub mod prelude {
    pub use crate::commands::*;
    pub use crate::component::*;
    pub use crate::entity::*;
    pub use crate::system::*;
    pub use crate::world::*;
}
