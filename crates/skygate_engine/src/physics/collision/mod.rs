//! Collision geometry
//!
//! Colliders keep their box in model space and only move it into world space
//! while a test runs, reading the owning transform's current matrix through a
//! [`WorldMatrixSource`](crate::scene::WorldMatrixSource).
//!
//! - [`primitives`] - bounding spheres used for early rejection
//! - [`obb`] - oriented box colliders and the separating-axis test

pub mod obb;
pub mod primitives;

pub use obb::{BoxCollider, CollisionCallback, WorldBox};
pub use primitives::BoundingSphere;
