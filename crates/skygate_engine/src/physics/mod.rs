//! Physics module for collision detection
//!
//! Oriented box colliders follow their transforms and are polled pairwise once
//! per tick by the [`CollisionSystem`]. There is no response stage; overlaps
//! are reported through callbacks and the returned pair list.

pub mod collision;
pub mod collision_system;
pub mod errors;

pub use collision::{BoundingSphere, BoxCollider, CollisionCallback, WorldBox};
pub use collision_system::{CollisionPair, CollisionSystem};
pub use errors::CollisionError;

#[cfg(test)]
mod tests;
