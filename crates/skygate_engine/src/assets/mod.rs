//! Asset processing
//!
//! Turns importer output into geometry ready for indexed draw calls. File
//! parsing itself happens upstream; this module starts from flat arrays.

pub mod mesh_data;
pub mod mesh_indexer;
pub mod primitives;

pub use mesh_data::{AttributeOffsets, AttributeStreams, CornerIndices, MeshError, RawMesh};
pub use mesh_indexer::{IndexedMesh, IndexingStrategy, MeshIndexer, Vertex};
