//! Camera projection state

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec4};

/// Perspective projection parameters and the matrix derived from them
///
/// The view matrix is not stored here: it falls out of the owning node's
/// world transform, inverted on demand.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Mat4,
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Camera {
    /// Create a camera with the default frustum (90 degrees, square, 1..500)
    pub fn new() -> Self {
        Self::with_params(FRAC_PI_2, 1.0, 1.0, 500.0)
    }

    /// Create a camera from explicit frustum parameters
    pub fn with_params(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            projection: Mat4::perspective_rh(fov, aspect, near, far),
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Set the frustum and rebuild the projection matrix
    pub fn set_projection_params(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.projection = Mat4::perspective_rh(fov, aspect, near, far);
    }

    /// Frustum parameters as (fov, aspect, near, far)
    pub fn projection_params(&self) -> Vec4 {
        Vec4::new(self.fov, self.aspect, self.near, self.far)
    }

    /// Current projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Override the projection matrix without touching the stored parameters
    pub fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_frustum() {
        let camera = Camera::new();
        let params = camera.projection_params();
        assert!((params.x - FRAC_PI_2).abs() < EPSILON);
        assert_eq!(params.y, 1.0);
        assert_eq!(params.z, 1.0);
        assert_eq!(params.w, 500.0);
    }

    #[test]
    fn test_projection_tracks_params() {
        let mut camera = Camera::new();
        // 90 degree fov with square aspect puts focal scale at exactly 1
        assert!((camera.projection_matrix().x_axis.x - 1.0).abs() < EPSILON);

        camera.set_projection_params(FRAC_PI_2, 2.0, 0.5, 100.0);
        let expected = Mat4::perspective_rh(FRAC_PI_2, 2.0, 0.5, 100.0);
        assert!(camera.projection_matrix().abs_diff_eq(expected, EPSILON));
        assert_eq!(camera.projection_params().y, 2.0);
    }

    #[test]
    fn test_matrix_override_keeps_params() {
        let mut camera = Camera::new();
        camera.set_projection_matrix(Mat4::IDENTITY);
        assert_eq!(camera.projection_matrix(), Mat4::IDENTITY);
        assert_eq!(camera.projection_params().w, 500.0);
    }
}
