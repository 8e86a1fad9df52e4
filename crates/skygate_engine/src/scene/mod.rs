//! Scene objects' spatial state
//!
//! Owns per-object transforms. Behaviour code mutates them each frame and
//! rebuilds their matrices; colliders read them through handles.

pub mod transform;

pub use transform::{Transform, TransformHandle, TransformTable, WorldMatrixSource};
