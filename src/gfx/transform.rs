//! Model matrix composition
//!
//! Objects are placed with independent scale, per-axis rotation and
//! translation parameters. The order is fixed: scale, then rotate about X,
//! then Y, then Z, then translate (`M = T * Rz * Ry * Rx * S`). Rotations
//! do not commute, so anything building matrices for the same scene must
//! use this exact order.

use cgmath::{Deg, Matrix4, Vector3};

use crate::gfx::shader::{names, UniformSink};

/// Scale, rotation (degrees per axis) and translation of one draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl Transform {
    pub fn new(scale: [f32; 3], rotation_degrees: [f32; 3], translation: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation_degrees: rotation_degrees.into(),
            translation: translation.into(),
        }
    }

    /// Builder pattern: Set non-uniform scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set rotation about X, Y and Z in degrees
    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation_degrees = Vector3::new(x, y, z);
        self
    }

    /// Builder pattern: Set position
    pub fn with_translation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.translation = Vector3::new(x, y, z);
        self
    }

    /// Builds the model matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        compose(self.scale, self.rotation_degrees, self.translation)
    }

    /// Writes the model matrix to the shader; the matrix is not kept
    pub fn apply(&self, sink: &mut impl UniformSink) {
        sink.set_mat4(names::MODEL, self.matrix());
    }
}

/// `T * Rz * Ry * Rx * S`
pub fn compose(
    scale: Vector3<f32>,
    rotation_degrees: Vector3<f32>,
    translation: Vector3<f32>,
) -> Matrix4<f32> {
    let s = Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z);
    let rx = Matrix4::from_angle_x(Deg(rotation_degrees.x));
    let ry = Matrix4::from_angle_y(Deg(rotation_degrees.y));
    let rz = Matrix4::from_angle_z(Deg(rotation_degrees.z));
    let t = Matrix4::from_translation(translation);
    t * rz * ry * rx * s // Order matters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::shader::{RecordingSink, UniformValue};
    use cgmath::{SquareMatrix, Vector4};

    fn transform_point(m: Matrix4<f32>, p: [f32; 3]) -> [f32; 3] {
        let v = m * Vector4::new(p[0], p[1], p[2], 1.0);
        [v.x, v.y, v.z]
    }

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-5,
                "{:?} != {:?}",
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_identity() {
        let m = Transform::default().matrix();
        assert_eq!(m, Matrix4::identity());
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let m = Transform::new([2.0, 1.0, 1.0], [0.0, 90.0, 0.0], [5.0, 0.0, 0.0]).matrix();
        assert_close(transform_point(m, [1.0, 0.0, 0.0]), [5.0, 0.0, -2.0]);
    }

    #[test]
    fn test_x_rotation_applies_before_z() {
        // Rx(90) takes +Y to +Z, which Rz(90) leaves alone
        let m = Transform::default().with_rotation(90.0, 0.0, 90.0).matrix();
        assert_close(transform_point(m, [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);

        // Applying Z first would have sent +Y to -X instead
        let z_first = Matrix4::from_angle_x(Deg(90.0)) * Matrix4::from_angle_z(Deg(90.0));
        assert_close(transform_point(z_first, [0.0, 1.0, 0.0]), [-1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_apply_writes_model() {
        let transform = Transform::default().with_translation(1.0, 2.0, 3.0);
        let mut sink = RecordingSink::new();
        transform.apply(&mut sink);

        assert_eq!(sink.names(), vec!["model"]);
        assert_eq!(
            sink.last("model"),
            Some(&UniformValue::Mat4(transform.matrix()))
        );
    }
}
