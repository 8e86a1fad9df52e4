//! Math utilities and types
//!
//! Vector and matrix aliases over `nalgebra`, plus the homogeneous helpers the
//! geometry pipeline uses. Points carry `w = 1`, directions carry `w = 0`.

pub use nalgebra::{Matrix3, Matrix4, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Homogeneous 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Homogeneous point (`w = 1`)
pub fn point(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 1.0)
}

/// Homogeneous direction (`w = 0`)
pub fn direction(x: f32, y: f32, z: f32) -> Vec4 {
    Vec4::new(x, y, z, 0.0)
}

/// Drop the `w` component of a homogeneous vector
pub fn truncate(v: &Vec4) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// In-place vector operations.
///
/// The nalgebra operators (`a - b`, `a * s`, `a.normalize()`) are the
/// non-destructive forms. These mutate a value the caller owns and return
/// nothing; clone first when the original is still needed.
pub trait VectorExt {
    /// Scale to unit length.
    ///
    /// A zero-length vector produces non-finite components. That is part of
    /// the input contract and is not trapped here.
    fn normalize_in_place(&mut self);

    /// Component-wise `self -= other`
    fn subtract_in_place(&mut self, other: &Self);

    /// Component-wise `self *= factor`
    fn scale_in_place(&mut self, factor: f32);
}

impl VectorExt for Vec3 {
    fn normalize_in_place(&mut self) {
        let length = self.magnitude();
        *self /= length;
    }

    fn subtract_in_place(&mut self, other: &Self) {
        *self -= other;
    }

    fn scale_in_place(&mut self, factor: f32) {
        *self *= factor;
    }
}

impl VectorExt for Vec4 {
    /// Normalizes the `xyz` part and leaves `w` untouched, so points stay
    /// points and directions stay directions.
    fn normalize_in_place(&mut self) {
        let length = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        self.x /= length;
        self.y /= length;
        self.z /= length;
    }

    fn subtract_in_place(&mut self, other: &Self) {
        *self -= other;
    }

    fn scale_in_place(&mut self, factor: f32) {
        *self *= factor;
    }
}

/// Math constants
pub mod constants {
    /// Degrees to radians conversion factor (double precision)
    pub const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians, evaluated in double precision
    pub fn deg_to_rad(degrees: f32) -> f64 {
        f64::from(degrees) * constants::DEG_TO_RAD
    }
}
