//! Affine matrix builders.
//!
//! Thin, named wrappers over [`glam`] so the rest of the crate speaks in
//! the same vocabulary as the scene graph: angles are degrees, projections
//! use OpenGL clip conventions, and view matrices are right-handed.

use glam::{EulerRot, Mat4, Vec3};

/// The identity matrix.
pub const IDENTITY: Mat4 = Mat4::IDENTITY;

/// Rotation by Euler angles in degrees, applied in X, Y, Z order.
pub fn rotate(degrees: Vec3) -> Mat4 {
    Mat4::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Non-uniform scale.
pub fn scale(factors: Vec3) -> Mat4 {
    Mat4::from_scale(factors)
}

/// Translation by `offset`.
pub fn translate(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}

/// Right-handed look-at view matrix.
pub fn view(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, center, up)
}

/// Orthographic projection with OpenGL depth range.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
}

/// Perspective projection; `fov` is the vertical field of view in degrees.
pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh_gl(fov.to_radians(), aspect, near, far)
}

/// Component-wise comparison with an absolute tolerance.
///
/// Matrix products accumulate rounding differently depending on how they
/// were grouped, so collapsed and uncollapsed forms are compared this way.
pub fn approx_eq(a: &Mat4, b: &Mat4, epsilon: f32) -> bool {
    a.abs_diff_eq(*b, epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_zero_is_identity() {
        assert!(approx_eq(&rotate(Vec3::ZERO), &IDENTITY, 1e-6));
    }

    #[test]
    fn rotate_quarter_turn_about_z() {
        let m = rotate(Vec3::new(0.0, 0.0, 90.0));
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-6), "got {p:?}");
    }

    #[test]
    fn translate_moves_points_not_vectors() {
        let m = translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point3(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_vector3(Vec3::X), Vec3::X);
    }

    #[test]
    fn view_looks_down_negative_z() {
        let m = view(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let p = m.transform_point3(Vec3::ZERO);
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6), "got {p:?}");
    }
}
