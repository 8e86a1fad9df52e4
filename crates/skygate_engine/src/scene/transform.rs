//! Per-object transforms and the table that owns them
//!
//! A [`Transform`] keeps location, Euler rotation (degrees) and scale next to a
//! cached model matrix. The cache is only refreshed by [`Transform::rebuild`];
//! there is no dirty tracking, so behaviour code that moves an object must
//! rebuild before anything reads the matrix in the same tick.
//!
//! Transforms live in a [`TransformTable`] and are addressed by
//! [`TransformHandle`]. Colliders hold a handle rather than a copy of the
//! matrix, so they always see the live value, and a removed transform shows up
//! as a failed lookup instead of a dangling reference.

use slotmap::{new_key_type, SlotMap};

use crate::foundation::math::{Mat3, Mat4, Vec3};
use crate::foundation::matrix::Mat4Ext;

new_key_type! {
    /// Stable, non-owning reference to a transform in a [`TransformTable`]
    pub struct TransformHandle;
}

/// Location, rotation and scale of one object plus its cached model matrix
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// World space location
    pub location: Vec3,

    /// Euler angles in degrees, applied Z, then Y, then X (intrinsic)
    pub rotation: Vec3,

    /// Per-axis scale factors
    pub scale: Vec3,

    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            matrix: Mat4::identity(),
        }
    }
}

impl Transform {
    /// Create an identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform at `location`.
    ///
    /// Like every builder here this only sets fields; the cached matrix stays
    /// identity until [`rebuild`](Self::rebuild) runs.
    pub fn from_location(location: Vec3) -> Self {
        Self {
            location,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation (Euler degrees)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Recompute the cached matrix as `T(location) * R(rotation) * S(scale)`.
    ///
    /// Each factor starts from a fresh identity, so the additive
    /// [`Mat4Ext::translate`] composes correctly here.
    pub fn rebuild(&mut self) {
        let mut translation = Mat4::identity();
        translation.translate(&self.location);

        let mut rotation = Mat4::identity();
        rotation.rotate(&self.rotation);

        let mut scale = Mat4::identity();
        scale.scale_diagonal(&self.scale);

        self.matrix.reset_identity();
        self.matrix.multiply(&translation);
        self.matrix.multiply(&rotation);
        self.matrix.multiply(&scale);
    }

    /// Cached model matrix as of the last [`rebuild`](Self::rebuild)
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Normal matrix derived from the cached model matrix.
    /// `None` when a scale component is zero.
    pub fn normal_matrix(&self) -> Option<Mat3> {
        self.matrix.normal_matrix()
    }
}

/// Anything that can resolve a [`TransformHandle`] to its current world matrix.
///
/// This is the seam colliders read through; the table is the usual source,
/// tests and tools can provide their own.
pub trait WorldMatrixSource {
    /// Current world matrix for `handle`, `None` if the handle is stale
    fn world_matrix(&self, handle: TransformHandle) -> Option<&Mat4>;
}

/// Owner of every live [`Transform`]
#[derive(Debug, Default)]
pub struct TransformTable {
    transforms: SlotMap<TransformHandle, Transform>,
}

impl TransformTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transform and return its handle
    pub fn insert(&mut self, transform: Transform) -> TransformHandle {
        self.transforms.insert(transform)
    }

    /// Remove a transform. Every handle to it becomes stale.
    pub fn remove(&mut self, handle: TransformHandle) -> Option<Transform> {
        self.transforms.remove(handle)
    }

    /// Borrow a transform
    pub fn get(&self, handle: TransformHandle) -> Option<&Transform> {
        self.transforms.get(handle)
    }

    /// Mutably borrow a transform
    pub fn get_mut(&mut self, handle: TransformHandle) -> Option<&mut Transform> {
        self.transforms.get_mut(handle)
    }

    /// Whether `handle` still refers to a live transform
    pub fn contains(&self, handle: TransformHandle) -> bool {
        self.transforms.contains_key(handle)
    }

    /// Rebuild every cached matrix. Call once per tick after behaviour
    /// updates and before collision queries.
    pub fn rebuild_all(&mut self) {
        for transform in self.transforms.values_mut() {
            transform.rebuild();
        }
    }

    /// Number of live transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl WorldMatrixSource for TransformTable {
    fn world_matrix(&self, handle: TransformHandle) -> Option<&Mat4> {
        self.transforms.get(handle).map(Transform::matrix)
    }
}
