//! Homogeneous 4x4 transform operations
//!
//! `Mat4` stores column vectors and transforms points as `M * p`. The
//! translation lives in column 3 (`m30, m31, m32` in column/row notation).
//!
//! Mutating methods take `&mut self` and return nothing. Queries and
//! constructors return new values and leave `self` alone.

use super::math::{utils::deg_to_rad, Mat3, Mat4, Vec3, Vec4};

/// Extension trait for `Mat4` with the transform-building operations used by
/// [`crate::scene::Transform`] and the collision code.
pub trait Mat4Ext {
    /// Reset to the identity matrix
    fn reset_identity(&mut self);

    /// Add `offset` into the translation column.
    ///
    /// This is additive, not a composed translation: it only behaves like
    /// `T(offset) * self` when `self` carries no rotation or scale.
    fn translate(&mut self, offset: &Vec3);

    /// Overwrite the upper-left 3x3 with an intrinsic Z, Y, X rotation
    /// (`Rz * Ry * Rx`) built from Euler angles in degrees.
    fn rotate(&mut self, euler_degrees: &Vec3);

    /// Multiply the three diagonal entries by `factors`
    fn scale_diagonal(&mut self, factors: &Vec3);

    /// Compose in place: `self = self * other`
    fn multiply(&mut self, other: &Mat4);

    /// Inverse of this matrix, `None` when singular
    fn inverted(&self) -> Option<Mat4>;

    /// Transpose of this matrix
    fn transposed(&self) -> Mat4;

    /// Upper 3x3 of the inverse-transpose, used to carry normals through
    /// non-uniform scale. `None` when the matrix is singular.
    ///
    /// Scale is not multiplied back in: for `M = R * S` this is `R * S^-1`,
    /// so transformed normals come out with length `1 / scale` along scaled
    /// axes and must be normalized by the caller.
    fn normal_matrix(&self) -> Option<Mat3>;

    /// `view * self`, the model-view matrix for this model matrix
    fn model_view(&self, view: &Mat4) -> Mat4;

    /// Translation column
    fn extract_position(&self) -> Vec3;

    /// Length of each basis column of the upper 3x3
    fn extract_scale(&self) -> Vec3;

    /// Transform a homogeneous vector
    fn transform_point4(&self, p: &Vec4) -> Vec4;

    /// Transform a point (`w = 1`) and drop `w`
    fn transform_point3(&self, p: &Vec3) -> Vec3;

    /// Right-handed perspective projection with clip depth in `[-1, 1]`.
    /// `fov_y_degrees` is the full vertical field of view.
    fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Orthographic projection with clip depth in `[-1, 1]`
    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn reset_identity(&mut self) {
        *self = Mat4::identity();
    }

    fn translate(&mut self, offset: &Vec3) {
        self[(0, 3)] += offset.x;
        self[(1, 3)] += offset.y;
        self[(2, 3)] += offset.z;
    }

    #[allow(clippy::cast_possible_truncation)]
    fn rotate(&mut self, euler_degrees: &Vec3) {
        let (sx, cx) = deg_to_rad(euler_degrees.x).sin_cos();
        let (sy, cy) = deg_to_rad(euler_degrees.y).sin_cos();
        let (sz, cz) = deg_to_rad(euler_degrees.z).sin_cos();

        // Rz * Ry * Rx, indexed [row][column]
        let r = [
            [cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx],
            [sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx],
            [-sy, cy * sx, cy * cx],
        ];

        for (row, values) in r.iter().enumerate() {
            for (column, value) in values.iter().enumerate() {
                self[(row, column)] = *value as f32;
            }
        }
    }

    fn scale_diagonal(&mut self, factors: &Vec3) {
        self[(0, 0)] *= factors.x;
        self[(1, 1)] *= factors.y;
        self[(2, 2)] *= factors.z;
    }

    fn multiply(&mut self, other: &Mat4) {
        let snapshot = *self;
        *self = snapshot * other;
    }

    fn inverted(&self) -> Option<Mat4> {
        self.try_inverse()
    }

    fn transposed(&self) -> Mat4 {
        self.transpose()
    }

    fn normal_matrix(&self) -> Option<Mat3> {
        self.inverted()
            .map(|inverse| inverse.transpose().fixed_view::<3, 3>(0, 0).into_owned())
    }

    fn model_view(&self, view: &Mat4) -> Mat4 {
        view * self
    }

    fn extract_position(&self) -> Vec3 {
        Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)])
    }

    fn extract_scale(&self) -> Vec3 {
        Vec3::new(
            self.fixed_view::<3, 1>(0, 0).norm(),
            self.fixed_view::<3, 1>(0, 1).norm(),
            self.fixed_view::<3, 1>(0, 2).norm(),
        )
    }

    fn transform_point4(&self, p: &Vec4) -> Vec4 {
        self * p
    }

    fn transform_point3(&self, p: &Vec3) -> Vec3 {
        let h = self * p.push(1.0);
        Vec3::new(h.x, h.y, h.z)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let f = (1.0 / (deg_to_rad(fov_y_degrees) * 0.5).tan()) as f32;
        let depth = near - far;

        let mut result = Mat4::zeros();
        result[(0, 0)] = f / aspect;
        result[(1, 1)] = f;
        result[(2, 2)] = (far + near) / depth;
        result[(2, 3)] = 2.0 * far * near / depth;
        result[(3, 2)] = -1.0;
        result
    }

    fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        let mut result = Mat4::identity();
        result[(0, 0)] = 2.0 / width;
        result[(1, 1)] = 2.0 / height;
        result[(2, 2)] = -2.0 / depth;
        result[(0, 3)] = -(right + left) / width;
        result[(1, 3)] = -(top + bottom) / height;
        result[(2, 3)] = -(far + near) / depth;
        result
    }
}
