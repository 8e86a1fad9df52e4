//! Vertex deduplication for indexed draw calls
//!
//! Every face corner of a [`RawMesh`] names one index per attribute stream.
//! Corners with the same tuple on every present stream collapse into one
//! vertex buffer slot, and the element array maps each original corner to its
//! slot. Slots appear in the order their first corner appears, so both
//! strategies below produce identical output.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::mesh_data::{AttributeStreams, CornerIndices, MeshError, RawMesh};
use crate::config::IndexerConfig;
use crate::foundation::math::{Vec3, Vec4};

/// How corner tuples are grouped into slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndexingStrategy {
    /// Pairwise scan, O(N²). Fine for level geometry built once at load time.
    #[default]
    Quadratic,
    /// Hash map keyed on the corner tuple, O(N) amortised. For geometry
    /// generated at runtime.
    Hashed,
}

/// Interleaved vertex layout for buffer upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position (`w = 1`)
    pub position: [f32; 4],
    /// Normal (`w = 0`)
    pub normal: [f32; 4],
    /// Texture coordinate, zero when the mesh has no map stream
    pub tex_coord: [f32; 2],
    /// Color, zero when the mesh has no color stream
    pub color: [f32; 4],
}

/// GPU-ready geometry: one entry per unique corner tuple plus the element array
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh {
    /// Mesh name
    pub name: String,
    /// Streams carried by this mesh
    pub streams: AttributeStreams,
    /// Positions in buffer order
    pub positions: Vec<Vec4>,
    /// Normals in buffer order
    pub normals: Vec<Vec4>,
    /// Texture coordinates in buffer order, empty when the stream is absent
    pub uvs: Vec<Vec3>,
    /// Colors in buffer order, empty when the stream is absent
    pub colors: Vec<Vec4>,
    /// One buffer slot per original face corner, winding preserved
    pub elements: Vec<u32>,
}

impl IndexedMesh {
    /// Mesh with no geometry
    pub fn empty(name: impl Into<String>, streams: AttributeStreams) -> Self {
        Self {
            name: name.into(),
            streams,
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            colors: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Number of slots in the vertex buffer
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of entries in the element array
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Interleave the streams into [`Vertex`] records.
    ///
    /// One record per slot that has both a position and a normal. Missing
    /// map or color entries are written as zero.
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .enumerate()
            .map(|(slot, (position, normal))| Vertex {
                position: (*position).into(),
                normal: (*normal).into(),
                tex_coord: self.uvs.get(slot).map_or([0.0; 2], |uv| [uv.x, uv.y]),
                color: self.colors.get(slot).map_or([0.0; 4], |c| (*c).into()),
            })
            .collect()
    }

    /// Element array as raw bytes
    pub fn element_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elements)
    }
}

/// Result of grouping corners: the first corner of every slot, and the slot
/// of every corner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Corner index that seeded each slot, ascending
    pub representatives: Vec<usize>,
    /// Slot of every corner
    pub elements: Vec<u32>,
}

/// Reference grouping: for each corner not yet merged, scan every later
/// corner and alias the ones with an equal tuple.
///
/// Callers must ensure `corners.len()` fits in `u32`.
#[allow(clippy::cast_possible_truncation)]
pub fn reduce_quadratic(corners: &[CornerIndices]) -> Reduction {
    let count = corners.len();
    let mut alias: Vec<Option<usize>> = vec![None; count];

    for i in 0..count {
        if alias[i].is_some() {
            continue;
        }
        for j in (i + 1)..count {
            if alias[j].is_none() && corners[j] == corners[i] {
                alias[j] = Some(i);
            }
        }
    }

    let mut representatives = Vec::new();
    let mut elements = vec![0u32; count];
    for (i, representative) in alias.iter().enumerate() {
        // Representatives always precede their aliases, so their slot is known
        elements[i] = match representative {
            Some(first) => elements[*first],
            None => {
                representatives.push(i);
                (representatives.len() - 1) as u32
            }
        };
    }

    Reduction {
        representatives,
        elements,
    }
}

/// Hash-map grouping with the same output as [`reduce_quadratic`].
///
/// Callers must ensure `corners.len()` fits in `u32`.
#[allow(clippy::cast_possible_truncation)]
pub fn reduce_hashed(corners: &[CornerIndices]) -> Reduction {
    let mut slots: HashMap<CornerIndices, u32> = HashMap::with_capacity(corners.len());
    let mut representatives = Vec::new();

    let elements = corners
        .iter()
        .enumerate()
        .map(|(i, corner)| {
            *slots.entry(*corner).or_insert_with(|| {
                representatives.push(i);
                (representatives.len() - 1) as u32
            })
        })
        .collect();

    Reduction {
        representatives,
        elements,
    }
}

/// Builds [`IndexedMesh`]es from importer output
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshIndexer {
    strategy: IndexingStrategy,
}

impl MeshIndexer {
    /// Create an indexer from configuration
    pub fn new(config: &IndexerConfig) -> Self {
        Self::with_strategy(config.strategy)
    }

    /// Create an indexer using `strategy`
    pub fn with_strategy(strategy: IndexingStrategy) -> Self {
        Self { strategy }
    }

    /// Strategy in use
    pub fn strategy(&self) -> IndexingStrategy {
        self.strategy
    }

    /// Deduplicate `mesh` into a vertex buffer and element array.
    ///
    /// A mesh without corners, positions or normals yields an empty result.
    /// Malformed index data fails with an error naming the mesh.
    pub fn index(&self, mesh: &RawMesh) -> Result<IndexedMesh, MeshError> {
        let streams = mesh.streams();
        let corners = mesh.corners()?;

        if corners.is_empty() || mesh.positions.is_empty() || mesh.normals.is_empty() {
            log::warn!(
                "Mesh '{}' has no indexable geometry ({} corners, {} positions, {} normals)",
                mesh.name,
                corners.len(),
                mesh.positions.len(),
                mesh.normals.len()
            );
            return Ok(IndexedMesh::empty(mesh.name.clone(), streams));
        }

        if u32::try_from(corners.len()).is_err() {
            return Err(MeshError::TooManyVertices {
                mesh: mesh.name.clone(),
                count: corners.len(),
            });
        }

        mesh.validate_corners(&corners)?;

        let reduction = match self.strategy {
            IndexingStrategy::Quadratic => reduce_quadratic(&corners),
            IndexingStrategy::Hashed => reduce_hashed(&corners),
        };

        let seeds: Vec<CornerIndices> = reduction.representatives.iter().map(|&i| corners[i]).collect();
        let positions = seeds.iter().map(|c| mesh.positions[c.position as usize]).collect();
        let normals = seeds.iter().map(|c| mesh.normals[c.normal as usize]).collect();
        let uvs = seeds
            .iter()
            .filter_map(|c| c.map)
            .map(|index| mesh.uvs[index as usize])
            .collect();
        let colors = seeds
            .iter()
            .filter_map(|c| c.color)
            .map(|index| mesh.colors[index as usize])
            .collect();

        log::debug!(
            "Indexed mesh '{}' ({:?}): {} corners -> {} vertices",
            mesh.name,
            self.strategy,
            corners.len(),
            reduction.representatives.len()
        );

        Ok(IndexedMesh {
            name: mesh.name.clone(),
            streams,
            positions,
            normals,
            uvs,
            colors,
            elements: reduction.elements,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::mesh_data::AttributeOffsets;
    use crate::assets::primitives;
    use crate::foundation::math::{direction, point};

    fn quad_with_shared_corners() -> RawMesh {
        // Two triangles sharing the 0-2 diagonal, one normal, position/normal pairs
        RawMesh::new("quad")
            .with_positions(vec![
                point(0.0, 0.0, 0.0),
                point(1.0, 0.0, 0.0),
                point(1.0, 1.0, 0.0),
                point(0.0, 1.0, 0.0),
            ])
            .with_normals(vec![direction(0.0, 0.0, 1.0)])
            .with_corners(
                AttributeOffsets::default(),
                2,
                vec![0, 0, 1, 0, 2, 0, 0, 0, 2, 0, 3, 0],
            )
    }

    fn assert_element_invariants(raw: &RawMesh, indexed: &IndexedMesh) {
        let corners = raw.corners().expect("well-formed");
        assert_eq!(indexed.elements.len(), corners.len());
        assert!(indexed.elements.iter().all(|&e| (e as usize) < indexed.vertex_count()));
        for i in 0..corners.len() {
            for j in 0..corners.len() {
                if corners[i] == corners[j] {
                    assert_eq!(indexed.elements[i], indexed.elements[j]);
                } else {
                    assert_ne!(indexed.elements[i], indexed.elements[j]);
                }
            }
        }
    }

    #[test]
    fn test_shared_corners_collapse() {
        let raw = quad_with_shared_corners();
        let indexed = MeshIndexer::default().index(&raw).expect("indexable");

        assert_eq!(indexed.vertex_count(), 4);
        assert_eq!(indexed.elements, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(indexed.positions[2], point(1.0, 1.0, 0.0));
        assert!(indexed.uvs.is_empty());
        assert!(indexed.colors.is_empty());
        assert_element_invariants(&raw, &indexed);
    }

    #[test]
    fn test_different_normal_splits_a_shared_position() {
        let raw = RawMesh::new("crease")
            .with_positions(vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0), point(0.0, 1.0, 0.0)])
            .with_normals(vec![direction(0.0, 0.0, 1.0), direction(1.0, 0.0, 0.0)])
            .with_corners(AttributeOffsets::default(), 2, vec![0, 0, 1, 0, 2, 0, 0, 1, 2, 1, 1, 1]);
        let indexed = MeshIndexer::default().index(&raw).expect("indexable");

        assert_eq!(indexed.vertex_count(), 6);
        assert_eq!(indexed.elements, vec![0, 1, 2, 3, 4, 5]);
        assert_element_invariants(&raw, &indexed);
    }

    #[test]
    fn test_optional_streams_participate_in_equality() {
        let offsets = AttributeOffsets {
            position: 0,
            normal: 1,
            map: Some(2),
            color: Some(3),
        };
        let raw = RawMesh::new("textured")
            .with_positions(vec![point(0.0, 0.0, 0.0)])
            .with_normals(vec![direction(0.0, 1.0, 0.0)])
            .with_uvs(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)])
            .with_colors(vec![Vec4::new(1.0, 0.0, 0.0, 1.0)])
            .with_corners(offsets, 4, vec![0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0]);
        let indexed = MeshIndexer::default().index(&raw).expect("indexable");

        assert_eq!(indexed.elements, vec![0, 1, 0]);
        assert_eq!(indexed.uvs, vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        assert_eq!(indexed.colors.len(), 2);
        assert!(indexed.streams.contains(AttributeStreams::MAP | AttributeStreams::COLOR));
    }

    #[test]
    fn test_reindexing_reduced_mesh_is_identity() {
        let raw = quad_with_shared_corners();
        let indexed = MeshIndexer::default().index(&raw).expect("indexable");

        // Feed the reduced buffer back as one corner per slot
        let indices: Vec<u32> = (0..indexed.vertex_count() as u32).flat_map(|i| [i, i]).collect();
        let again = RawMesh::new("quad-reduced")
            .with_positions(indexed.positions.clone())
            .with_normals(indexed.positions.iter().map(|_| direction(0.0, 0.0, 1.0)).collect())
            .with_corners(AttributeOffsets::default(), 2, indices);
        let reindexed = MeshIndexer::default().index(&again).expect("indexable");

        assert_eq!(reindexed.vertex_count(), indexed.vertex_count());
        for (i, element) in reindexed.elements.iter().enumerate() {
            assert_eq!(*element as usize, i);
        }
    }

    #[test]
    fn test_strategies_agree() {
        let raw = primitives::cube("cube", 1.0);
        let quadratic = MeshIndexer::with_strategy(IndexingStrategy::Quadratic)
            .index(&raw)
            .expect("indexable");
        let hashed = MeshIndexer::with_strategy(IndexingStrategy::Hashed)
            .index(&raw)
            .expect("indexable");

        assert_eq!(quadratic, hashed);
        assert_element_invariants(&raw, &hashed);
    }

    #[test]
    fn test_strategies_agree_with_optional_streams() {
        // Corners 0 and 2 differ only in map, 1 and 3 only in color
        let offsets = AttributeOffsets {
            position: 0,
            normal: 1,
            map: Some(2),
            color: Some(3),
        };
        let raw = RawMesh::new("painted")
            .with_positions(vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0), point(0.0, 1.0, 0.0)])
            .with_normals(vec![direction(0.0, 0.0, 1.0)])
            .with_uvs(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)])
            .with_colors(vec![Vec4::new(1.0, 0.0, 0.0, 1.0), Vec4::new(0.0, 0.0, 1.0, 1.0)])
            .with_corners(
                offsets,
                4,
                vec![
                    0, 0, 0, 0, //
                    1, 0, 0, 0, //
                    0, 0, 1, 0, //
                    1, 0, 0, 1, //
                    2, 0, 1, 1, //
                    0, 0, 0, 0, //
                    1, 0, 0, 1, //
                    2, 0, 1, 1,
                ],
            );

        let quadratic = MeshIndexer::with_strategy(IndexingStrategy::Quadratic)
            .index(&raw)
            .expect("indexable");
        let hashed = MeshIndexer::with_strategy(IndexingStrategy::Hashed)
            .index(&raw)
            .expect("indexable");

        assert_eq!(quadratic, hashed);
        assert_eq!(hashed.elements, vec![0, 1, 2, 3, 4, 0, 3, 4]);
        assert_eq!(hashed.uvs.len(), 5);
        assert_eq!(hashed.colors.len(), 5);
        assert_element_invariants(&raw, &hashed);
    }

    #[test]
    fn test_interleaved_stops_at_shortest_mandatory_stream() {
        let mut mesh = IndexedMesh::empty("hand-built", AttributeStreams::POSITION | AttributeStreams::NORMAL);
        mesh.positions = vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0), point(2.0, 0.0, 0.0)];
        mesh.normals = vec![direction(0.0, 1.0, 0.0)];

        let vertices = mesh.interleaved();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].normal, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cube_reduces_to_face_vertices() {
        let raw = primitives::cube("cube", 1.0);
        let indexed = MeshIndexer::default().index(&raw).expect("indexable");

        assert_eq!(indexed.element_count(), 36);
        assert_eq!(indexed.vertex_count(), 24);
        assert_eq!(indexed.element_bytes().len(), 36 * 4);
        assert_eq!(indexed.interleaved().len(), 24);
    }

    #[test]
    fn test_empty_inputs_give_empty_mesh() {
        let no_corners = RawMesh::new("nothing").with_positions(vec![point(0.0, 0.0, 0.0)]);
        let indexed = MeshIndexer::default().index(&no_corners).expect("empty is not an error");
        assert!(indexed.is_empty());
        assert_eq!(indexed.vertex_count(), 0);

        let no_positions = RawMesh::new("hollow")
            .with_normals(vec![direction(0.0, 0.0, 1.0)])
            .with_corners(AttributeOffsets::default(), 2, vec![0, 0, 0, 0, 0, 0]);
        assert!(MeshIndexer::default().index(&no_positions).expect("empty").is_empty());
    }

    #[test]
    fn test_out_of_range_index_fails_fast() {
        let raw = RawMesh::new("broken")
            .with_positions(vec![point(0.0, 0.0, 0.0)])
            .with_normals(vec![direction(0.0, 0.0, 1.0)])
            .with_corners(AttributeOffsets::default(), 2, vec![0, 0, 0, 3]);
        let error = MeshIndexer::default().index(&raw).unwrap_err();
        assert_eq!(
            error,
            MeshError::IndexOutOfRange {
                mesh: "broken".to_string(),
                stream: "normal",
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn test_interleaved_fills_absent_streams_with_zero() {
        let indexed = MeshIndexer::default()
            .index(&quad_with_shared_corners())
            .expect("indexable");
        let vertices = indexed.interleaved();
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(vertices[1].normal, [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(vertices[1].tex_coord, [0.0, 0.0]);
        assert_eq!(vertices[1].color, [0.0; 4]);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&vertices).len(), 4 * std::mem::size_of::<Vertex>());
    }
}
