//! Oriented bounding box colliders
//!
//! The box is stored in model space, computed once from a mesh's positions,
//! and moved into world space on every query through the owning object's live
//! matrix. Overlap uses a bounding-sphere pre-filter followed by the
//! separating-axis test on the face normals of both boxes.
//!
//! # Known approximation
//!
//! Only the six face axes are tested. The nine edge-cross-product axes that
//! exact box-box SAT needs are skipped, so two boxes whose edges pass close to
//! each other without touching can still be reported as colliding.

use std::fmt;

use super::primitives::BoundingSphere;
use crate::assets::IndexedMesh;
use crate::config::CollisionConfig;
use crate::foundation::math::{truncate, Mat4, Vec3, Vec4};
use crate::foundation::matrix::Mat4Ext;
use crate::physics::errors::CollisionError;
use crate::scene::{TransformHandle, TransformTable, WorldMatrixSource};

/// Called with the other collider's id when an overlap is found. The table is
/// passed so behaviour can react (move, rebuild) within the same sweep.
pub type CollisionCallback = Box<dyn FnMut(&str, &mut TransformTable)>;

/// Box collider attached to a transform
pub struct BoxCollider {
    id: String,
    transform: TransformHandle,
    center: Vec3,
    size: Vec3,
    radius: f32,
    on_collision: Option<CollisionCallback>,
}

impl fmt::Debug for BoxCollider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxCollider")
            .field("id", &self.id)
            .field("transform", &self.transform)
            .field("center", &self.center)
            .field("size", &self.size)
            .field("radius", &self.radius)
            .field("has_callback", &self.on_collision.is_some())
            .finish()
    }
}

impl BoxCollider {
    /// Create a collider with an empty box.
    ///
    /// [`recalculate`](Self::recalculate) must run before the first query;
    /// an empty box silently gives wrong answers.
    pub fn new(id: impl Into<String>, transform: TransformHandle) -> Self {
        Self {
            id: id.into(),
            transform,
            center: Vec3::zeros(),
            size: Vec3::zeros(),
            radius: 0.0,
            on_collision: None,
        }
    }

    /// Builder pattern: set the collision callback
    pub fn with_callback(mut self, callback: impl FnMut(&str, &mut TransformTable) + 'static) -> Self {
        self.set_callback(callback);
        self
    }

    /// Replace the collision callback
    pub fn set_callback(&mut self, callback: impl FnMut(&str, &mut TransformTable) + 'static) {
        self.on_collision = Some(Box::new(callback));
    }

    /// Collider id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Handle of the transform this collider follows
    pub fn transform(&self) -> TransformHandle {
        self.transform
    }

    /// Model space box center
    pub fn center(&self) -> Vec3 {
        self.center
    }

    /// Model space box extent on each axis
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Model space distance from the center to the farthest corner
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Fit the box to `positions` in one pass over per-axis extrema.
    /// No positions leaves an empty box at the origin.
    pub fn recalculate(&mut self, positions: &[Vec4]) {
        let Some(first) = positions.first() else {
            log::warn!("Collider '{}' recalculated from an empty mesh", self.id);
            self.center = Vec3::zeros();
            self.size = Vec3::zeros();
            self.radius = 0.0;
            return;
        };

        let mut min = truncate(first);
        let mut max = min;
        for position in &positions[1..] {
            let p = truncate(position);
            min = min.inf(&p);
            max = max.sup(&p);
        }

        self.center = (min + max) * 0.5;
        self.size = max - min;
        self.radius = (max - self.center).magnitude();
        log::debug!(
            "Collider '{}': center {:?}, size {:?}, radius {}",
            self.id,
            self.center,
            self.size,
            self.radius
        );
    }

    /// Fit the box to an indexed mesh's positions
    pub fn recalculate_from_mesh(&mut self, mesh: &IndexedMesh) {
        self.recalculate(&mesh.positions);
    }

    /// The 8 model space corners. Corner `i` sits on the `+x` side when bit 0
    /// is set, `+y` for bit 1 and `+z` for bit 2.
    pub fn local_corners(&self) -> [Vec3; 8] {
        let half = self.size * 0.5;
        std::array::from_fn(|i| {
            let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
            self.center + Vec3::new(sign(1) * half.x, sign(2) * half.y, sign(4) * half.z)
        })
    }

    /// Resolve this collider's box into world space using the live matrix
    pub fn to_world_space(&self, source: &impl WorldMatrixSource) -> Result<WorldBox, CollisionError> {
        let matrix = source
            .world_matrix(self.transform)
            .ok_or_else(|| CollisionError::MissingTransform {
                collider: self.id.clone(),
            })?;
        Ok(WorldBox::from_local(self, matrix))
    }

    /// World space corners, recomputed from the live matrix on every call
    pub fn corners(&self, source: &impl WorldMatrixSource) -> Result<[Vec3; 8], CollisionError> {
        Ok(self.to_world_space(source)?.corners)
    }

    /// The box's local X, Y and Z axes in world space, as unit vectors
    pub fn axes(&self, source: &impl WorldMatrixSource, config: &CollisionConfig) -> Result<[Vec3; 3], CollisionError> {
        Ok(self.to_world_space(source)?.axes(config.degenerate_axis_epsilon))
    }

    /// Box center in world space
    pub fn world_center(&self, source: &impl WorldMatrixSource) -> Result<Vec3, CollisionError> {
        Ok(self.to_world_space(source)?.center)
    }

    /// Radius scaled by the largest world scale factor
    pub fn world_radius(&self, source: &impl WorldMatrixSource) -> Result<f32, CollisionError> {
        Ok(self.to_world_space(source)?.radius)
    }

    /// World space bounding sphere
    pub fn bounding_sphere(&self, source: &impl WorldMatrixSource) -> Result<BoundingSphere, CollisionError> {
        Ok(self.to_world_space(source)?.bounding_sphere())
    }

    /// Test for overlap with `other`.
    ///
    /// Returns the other collider's id when the boxes overlap. Boxes that only
    /// touch (projections sharing an endpoint) count as overlapping.
    pub fn intersects<'o>(
        &self,
        other: &'o BoxCollider,
        source: &impl WorldMatrixSource,
        config: &CollisionConfig,
    ) -> Result<Option<&'o str>, CollisionError> {
        let a = self.to_world_space(source)?;
        let b = other.to_world_space(source)?;
        Ok(a.overlaps(&b, config).then_some(other.id()))
    }

    pub(crate) fn notify(&mut self, other_id: &str, transforms: &mut TransformTable) {
        if let Some(callback) = self.on_collision.as_mut() {
            callback(other_id, transforms);
        }
    }
}

/// A collider's box in world space, valid for the matrix it was built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBox {
    /// Transformed corners, same ordering as [`BoxCollider::local_corners`]
    pub corners: [Vec3; 8],
    /// Transformed box center
    pub center: Vec3,
    /// Model radius scaled by the largest axis scale, so the sphere still
    /// encloses the box under non-uniform scale
    pub radius: f32,
    /// Local X, Y and Z in world space: the columns of the matrix's upper
    /// 3x3, scale included
    pub basis: [Vec3; 3],
}

impl WorldBox {
    fn from_local(collider: &BoxCollider, matrix: &Mat4) -> Self {
        let scale = matrix.extract_scale();
        Self {
            corners: collider.local_corners().map(|corner| matrix.transform_point3(&corner)),
            center: matrix.transform_point3(&collider.center),
            radius: collider.radius * scale.max(),
            basis: std::array::from_fn(|k| matrix.fixed_view::<3, 1>(0, k).into_owned()),
        }
    }

    /// Bounding sphere used by the pre-filter
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center, self.radius)
    }

    /// The box's local X, Y and Z axes in world space, as unit vectors.
    ///
    /// They come from the transform rather than the box extent, so a flat or
    /// line-shaped box still gets three axes. A basis vector shorter than
    /// `epsilon` (squared length, zero scale on that axis) is replaced by the
    /// cross product of the other two. If that is degenerate too the axis is
    /// left as the zero vector.
    pub fn axes(&self, epsilon: f32) -> [Vec3; 3] {
        let basis = &self.basis;
        let usable = |v: &Vec3| v.magnitude_squared() > epsilon;

        std::array::from_fn(|k| {
            let axis = if usable(&basis[k]) {
                basis[k]
            } else {
                basis[(k + 1) % 3].cross(&basis[(k + 2) % 3])
            };
            if usable(&axis) {
                axis.normalize()
            } else {
                Vec3::zeros()
            }
        })
    }

    /// Interval covered by the corners projected onto `axis`
    pub fn project(&self, axis: &Vec3) -> (f32, f32) {
        self.corners.iter().fold((f32::INFINITY, f32::NEG_INFINITY), |(min, max), corner| {
            let projection = corner.dot(axis);
            (min.min(projection), max.max(projection))
        })
    }

    /// Sphere pre-filter, then SAT over the face axes of both boxes
    pub fn overlaps(&self, other: &WorldBox, config: &CollisionConfig) -> bool {
        if config.sphere_prefilter && !self.bounding_sphere().intersects(&other.bounding_sphere()) {
            return false;
        }

        let epsilon = config.degenerate_axis_epsilon;
        let axes_a = self.axes(epsilon);
        let axes_b = other.axes(epsilon);

        for axis in axes_a.iter().chain(axes_b.iter()) {
            if axis.magnitude_squared() <= epsilon {
                continue;
            }
            let (min_a, max_a) = self.project(axis);
            let (min_b, max_b) = other.project(axis);
            if max_a < min_b || max_b < min_a {
                return false;
            }
        }

        true
    }
}
