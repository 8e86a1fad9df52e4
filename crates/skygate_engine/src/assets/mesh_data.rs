//! Raw mesh data as handed over by the importer
//!
//! The importer parses COLLADA source elements into flat attribute arrays and
//! keeps the `<p>` list as-is: one group of `stride` indices per face corner,
//! where each attribute stream reads the index at its own offset inside the
//! group. Position and normal are mandatory, texture map and color are
//! optional.

use bitflags::bitflags;
use thiserror::Error;

use crate::foundation::math::{Vec3, Vec4};

/// Errors raised while turning raw mesh data into indexed geometry.
///
/// These only cover malformed import data. A mesh that is simply empty is
/// not an error; indexing it yields an empty result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The flat index list cannot be split into corners
    #[error("mesh '{mesh}': malformed index list: {reason}")]
    MalformedIndices {
        /// Mesh name
        mesh: String,
        /// What is wrong with the list
        reason: String,
    },

    /// A stream offset does not fit inside one corner group
    #[error("mesh '{mesh}': {stream} offset {offset} is outside stride {stride}")]
    OffsetOutOfRange {
        /// Mesh name
        mesh: String,
        /// Attribute stream name
        stream: &'static str,
        /// Offending offset
        offset: usize,
        /// Indices per corner
        stride: usize,
    },

    /// A corner references past the end of an attribute array
    #[error("mesh '{mesh}': {stream} index {index} out of range ({len} entries)")]
    IndexOutOfRange {
        /// Mesh name
        mesh: String,
        /// Attribute stream name
        stream: &'static str,
        /// Offending index
        index: u32,
        /// Length of the attribute array
        len: usize,
    },

    /// More corners than a 32-bit element array can address
    #[error("mesh '{mesh}': {count} corners exceed the 32-bit element range")]
    TooManyVertices {
        /// Mesh name
        mesh: String,
        /// Corner count
        count: usize,
    },
}

bitflags! {
    /// Attribute streams present on a mesh
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeStreams: u8 {
        /// Vertex positions (always present)
        const POSITION = 1 << 0;
        /// Vertex normals (always present)
        const NORMAL = 1 << 1;
        /// Texture coordinates
        const MAP = 1 << 2;
        /// Vertex colors
        const COLOR = 1 << 3;
    }
}

/// Where each attribute stream reads its index inside one corner group.
/// `None` means the stream is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeOffsets {
    /// Position offset
    pub position: usize,
    /// Normal offset
    pub normal: usize,
    /// Texture map offset
    pub map: Option<usize>,
    /// Color offset
    pub color: Option<usize>,
}

impl Default for AttributeOffsets {
    fn default() -> Self {
        Self {
            position: 0,
            normal: 1,
            map: None,
            color: None,
        }
    }
}

impl AttributeOffsets {
    /// Streams these offsets describe
    pub fn streams(&self) -> AttributeStreams {
        let mut streams = AttributeStreams::POSITION | AttributeStreams::NORMAL;
        streams.set(AttributeStreams::MAP, self.map.is_some());
        streams.set(AttributeStreams::COLOR, self.color.is_some());
        streams
    }
}

/// Attribute-index tuple of one face corner.
///
/// Absent streams are `None` on every corner of a mesh, so derived equality
/// already treats them as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerIndices {
    /// Index into the position array
    pub position: u32,
    /// Index into the normal array
    pub normal: u32,
    /// Index into the texture coordinate array
    pub map: Option<u32>,
    /// Index into the color array
    pub color: Option<u32>,
}

/// Pre-parsed mesh straight from the importer
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    /// Mesh name, used in error messages
    pub name: String,
    /// Positions (`w = 1`)
    pub positions: Vec<Vec4>,
    /// Normals (`w = 0`)
    pub normals: Vec<Vec4>,
    /// Texture coordinates (`z = 0`)
    pub uvs: Vec<Vec3>,
    /// Vertex colors
    pub colors: Vec<Vec4>,
    /// Stream offsets inside a corner group
    pub offsets: AttributeOffsets,
    /// Indices per corner group
    pub stride: usize,
    /// Flat corner index list
    pub indices: Vec<u32>,
}

impl RawMesh {
    /// Create an empty mesh with the default position/normal layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stride: 2,
            ..Default::default()
        }
    }

    /// Builder pattern: set positions
    pub fn with_positions(mut self, positions: Vec<Vec4>) -> Self {
        self.positions = positions;
        self
    }

    /// Builder pattern: set normals
    pub fn with_normals(mut self, normals: Vec<Vec4>) -> Self {
        self.normals = normals;
        self
    }

    /// Builder pattern: set texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<Vec3>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Builder pattern: set colors
    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = colors;
        self
    }

    /// Builder pattern: set the corner layout and the flat index list
    pub fn with_corners(mut self, offsets: AttributeOffsets, stride: usize, indices: Vec<u32>) -> Self {
        self.offsets = offsets;
        self.stride = stride;
        self.indices = indices;
        self
    }

    /// Streams present on this mesh
    pub fn streams(&self) -> AttributeStreams {
        self.offsets.streams()
    }

    /// Number of face corners in the index list (ignores a trailing partial group)
    pub fn corner_count(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.indices.len() / self.stride
        }
    }

    /// Split the flat index list into per-corner tuples
    pub fn corners(&self) -> Result<Vec<CornerIndices>, MeshError> {
        if self.indices.is_empty() {
            return Ok(Vec::new());
        }
        if self.stride == 0 {
            return Err(self.malformed("stride is zero"));
        }
        if self.indices.len() % self.stride != 0 {
            return Err(self.malformed(format!(
                "{} indices is not a multiple of stride {}",
                self.indices.len(),
                self.stride
            )));
        }

        self.check_offset("position", self.offsets.position)?;
        self.check_offset("normal", self.offsets.normal)?;
        if let Some(offset) = self.offsets.map {
            self.check_offset("map", offset)?;
        }
        if let Some(offset) = self.offsets.color {
            self.check_offset("color", offset)?;
        }

        let offsets = self.offsets;
        Ok(self
            .indices
            .chunks_exact(self.stride)
            .map(|group| CornerIndices {
                position: group[offsets.position],
                normal: group[offsets.normal],
                map: offsets.map.map(|offset| group[offset]),
                color: offsets.color.map(|offset| group[offset]),
            })
            .collect())
    }

    /// Check every present stream's indices against its attribute array
    pub fn validate_corners(&self, corners: &[CornerIndices]) -> Result<(), MeshError> {
        for corner in corners {
            self.check_index("position", corner.position, self.positions.len())?;
            self.check_index("normal", corner.normal, self.normals.len())?;
            if let Some(index) = corner.map {
                self.check_index("map", index, self.uvs.len())?;
            }
            if let Some(index) = corner.color {
                self.check_index("color", index, self.colors.len())?;
            }
        }
        Ok(())
    }

    fn check_offset(&self, stream: &'static str, offset: usize) -> Result<(), MeshError> {
        if offset < self.stride {
            Ok(())
        } else {
            Err(MeshError::OffsetOutOfRange {
                mesh: self.name.clone(),
                stream,
                offset,
                stride: self.stride,
            })
        }
    }

    fn check_index(&self, stream: &'static str, index: u32, len: usize) -> Result<(), MeshError> {
        if (index as usize) < len {
            Ok(())
        } else {
            Err(MeshError::IndexOutOfRange {
                mesh: self.name.clone(),
                stream,
                index,
                len,
            })
        }
    }

    fn malformed(&self, reason: impl Into<String>) -> MeshError {
        MeshError::MalformedIndices {
            mesh: self.name.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{direction, point};

    fn triangle(offsets: AttributeOffsets, stride: usize, indices: Vec<u32>) -> RawMesh {
        RawMesh::new("triangle")
            .with_positions(vec![point(0.0, 0.0, 0.0), point(1.0, 0.0, 0.0), point(0.0, 1.0, 0.0)])
            .with_normals(vec![direction(0.0, 0.0, 1.0)])
            .with_uvs(vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)])
            .with_corners(offsets, stride, indices)
    }

    #[test]
    fn test_streams_follow_offsets() {
        let offsets = AttributeOffsets {
            map: Some(2),
            ..Default::default()
        };
        assert_eq!(
            offsets.streams(),
            AttributeStreams::POSITION | AttributeStreams::NORMAL | AttributeStreams::MAP
        );
        assert!(!offsets.streams().contains(AttributeStreams::COLOR));
    }

    #[test]
    fn test_corners_read_each_stream_at_its_offset() {
        // Normal first, then position, then map
        let offsets = AttributeOffsets {
            position: 1,
            normal: 0,
            map: Some(2),
            color: None,
        };
        let mesh = triangle(offsets, 3, vec![0, 0, 0, 0, 1, 1, 0, 2, 0]);
        let corners = mesh.corners().expect("well-formed");

        assert_eq!(corners.len(), 3);
        assert_eq!(mesh.corner_count(), 3);
        assert_eq!(
            corners[1],
            CornerIndices {
                position: 1,
                normal: 0,
                map: Some(1),
                color: None
            }
        );
        assert!(mesh.validate_corners(&corners).is_ok());
    }

    #[test]
    fn test_partial_group_is_malformed() {
        let mesh = triangle(AttributeOffsets::default(), 2, vec![0, 0, 1]);
        assert!(matches!(mesh.corners(), Err(MeshError::MalformedIndices { .. })));
    }

    #[test]
    fn test_zero_stride_is_malformed() {
        let mesh = triangle(AttributeOffsets::default(), 0, vec![0, 0]);
        assert!(matches!(mesh.corners(), Err(MeshError::MalformedIndices { .. })));
    }

    #[test]
    fn test_offset_outside_stride() {
        let offsets = AttributeOffsets {
            color: Some(4),
            ..Default::default()
        };
        let mesh = triangle(offsets, 2, vec![0, 0]);
        assert_eq!(
            mesh.corners(),
            Err(MeshError::OffsetOutOfRange {
                mesh: "triangle".to_string(),
                stream: "color",
                offset: 4,
                stride: 2
            })
        );
    }

    #[test]
    fn test_index_out_of_range_names_the_mesh() {
        let mesh = triangle(AttributeOffsets::default(), 2, vec![0, 0, 7, 0]);
        let corners = mesh.corners().expect("well-formed groups");
        let error = mesh.validate_corners(&corners).unwrap_err();
        assert!(error.to_string().contains("triangle"));
        assert!(matches!(error, MeshError::IndexOutOfRange { stream: "position", index: 7, .. }));
    }

    #[test]
    fn test_empty_index_list_has_no_corners() {
        let mesh = RawMesh::new("empty");
        assert_eq!(mesh.corners(), Ok(Vec::new()));
    }
}
