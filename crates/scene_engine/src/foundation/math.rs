//! Math utilities and types
//!
//! Provides fundamental math types for 3D scene management, re-exported
//! from nalgebra under short aliases.

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Set a uniform scale on all three axes
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Extract a single scalar scale factor from a transformation matrix
///
/// Takes the length of the X basis column. Exact for uniform scale;
/// an approximation under non-uniform scale.
pub fn uniform_scale_of(matrix: &Mat4) -> f32 {
    Vec3::new(matrix.m11, matrix.m21, matrix.m31).magnitude()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_transform() {
        let transform = Transform::identity();
        assert_eq!(transform.to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_trs_matrix_order() {
        // Scale must apply before translation: a unit point scaled by 2
        // then moved by (1, 0, 0) ends at x = 3.
        let transform = Transform::from_position(Vec3::new(1.0, 0.0, 0.0)).with_uniform_scale(2.0);
        let moved = transform.transform_point(Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved.x, 3.0, epsilon = EPSILON);
    }

    #[test]
    fn test_uniform_scale_extraction() {
        let transform = Transform::from_position(Vec3::new(4.0, 5.0, 6.0)).with_uniform_scale(2.5);
        assert_relative_eq!(uniform_scale_of(&transform.to_matrix()), 2.5, epsilon = EPSILON);
    }

    #[test]
    fn test_uniform_scale_ignores_translation_and_rotation() {
        let rotation = Quat::from_euler_angles(0.3, 0.7, -0.2);
        let transform = Transform::from_position_rotation(Vec3::new(-3.0, 2.0, 9.0), rotation);
        assert_relative_eq!(uniform_scale_of(&transform.to_matrix()), 1.0, epsilon = EPSILON);
    }
}
