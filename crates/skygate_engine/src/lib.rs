//! # Skygate Engine
//!
//! Geometry and collision core for a small flight game.
//!
//! ## Features
//!
//! - **Vector and Matrix Math**: nalgebra types with in-place helpers and
//!   homogeneous 4x4 transform operations
//! - **Transforms**: location, Euler rotation and scale with a cached model
//!   matrix, addressed through stable handles
//! - **Mesh Indexing**: collapses COLLADA-style per-attribute index lists into
//!   a single element array with parallel attribute arrays
//! - **OBB Collision**: oriented box colliders, a bounding-sphere pre-filter,
//!   face-axis SAT and a pairwise sweep with callbacks
//!
//! ## Quick Start
//!
//! ```rust
//! use skygate_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mesh = MeshIndexer::new(&config.indexer).index(&cube("crate", 1.0))?;
//!
//!     let mut transforms = TransformTable::new();
//!     let mut collisions = CollisionSystem::new(config.collision);
//!     for (id, x) in [("ship", 0.0), ("gate", 1.5)] {
//!         let handle = transforms.insert(Transform::from_location(Vec3::new(x, 0.0, 0.0)));
//!         let mut collider = BoxCollider::new(id, handle)
//!             .with_callback(|other, _| println!("hit {other}"));
//!         collider.recalculate_from_mesh(&mesh);
//!         collisions.register(collider)?;
//!     }
//!
//!     transforms.rebuild_all();
//!     let pairs = collisions.check_all(&mut transforms);
//!     assert_eq!(pairs.len(), 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::many_single_char_names)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{primitives::cube, IndexedMesh, MeshError, MeshIndexer, RawMesh},
        config::{CollisionConfig, Config, EngineConfig, IndexerConfig},
        foundation::{
            math::{Mat4, Vec3, Vec4, VectorExt},
            matrix::Mat4Ext,
        },
        physics::{BoxCollider, CollisionError, CollisionPair, CollisionSystem},
        scene::{Transform, TransformHandle, TransformTable, WorldMatrixSource},
    };
}
