//! Built-in raw meshes
//!
//! Produced in the same layout the importer emits, so they go through
//! [`MeshIndexer`](super::MeshIndexer) like any imported asset.

use super::mesh_data::{AttributeOffsets, RawMesh};
use crate::foundation::math::{direction, point};

/// Corner positions of each face, counter-clockwise seen from outside.
/// Position `i` has `+x` when bit 0 is set, `+y` for bit 1, `+z` for bit 2.
const CUBE_FACES: [[u32; 4]; 6] = [
    [1, 3, 7, 5], // +X
    [0, 4, 6, 2], // -X
    [2, 6, 7, 3], // +Y
    [0, 1, 5, 4], // -Y
    [4, 5, 7, 6], // +Z
    [0, 2, 3, 1], // -Z
];

/// Axis-aligned cube centered on the origin with position/normal corners.
///
/// 8 positions, 6 normals, 36 corners; indexing yields 24 unique vertices.
pub fn cube(name: impl Into<String>, half_extent: f32) -> RawMesh {
    let positions = (0..8u32)
        .map(|i| {
            let axis = |bit: u32| if i & bit == 0 { -half_extent } else { half_extent };
            point(axis(1), axis(2), axis(4))
        })
        .collect();

    let normals = vec![
        direction(1.0, 0.0, 0.0),
        direction(-1.0, 0.0, 0.0),
        direction(0.0, 1.0, 0.0),
        direction(0.0, -1.0, 0.0),
        direction(0.0, 0.0, 1.0),
        direction(0.0, 0.0, -1.0),
    ];

    let mut indices = Vec::with_capacity(CUBE_FACES.len() * 12);
    for (normal, face) in (0u32..).zip(CUBE_FACES.iter()) {
        for corner in [face[0], face[1], face[2], face[0], face[2], face[3]] {
            indices.extend_from_slice(&[corner, normal]);
        }
    }

    RawMesh::new(name)
        .with_positions(positions)
        .with_normals(normals)
        .with_corners(AttributeOffsets::default(), 2, indices)
}
