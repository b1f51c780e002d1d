//! Scene graph: a flat, id-ordered store of entities with sprites and colliders.
//!
//! Responsibilities:
//! - hand out stable, never-reused entity ids
//! - place entity sprites in world space and push them to a sprite batch
//! - keep colliders in a side table referenced by index
//!
//! There is no hierarchy between entities; every transform is already in world space.

mod collider;
mod entity;
mod graph;

pub use collider::{Collider, ColliderId};
pub use entity::{Entity, EntityId, Sprite, Transform};
pub use graph::Scene;
