//! Orbit camera circling a fixed target under mouse control.

use glam::{Mat4, Vec3};

use crate::params::{OrbitParams, RenderConfig};

/// Smallest polar angle; keeps `look_at` away from a parallel up vector
const MIN_POLAR_ANGLE: f32 = 1e-3;

/// Camera on a sphere around `target`, in spherical coordinates
pub struct CameraSystem {
    params: OrbitParams,
    target: Vec3,
    distance: f32,
    /// Angle from +Y (radians)
    polar: f32,
    /// Angle around +Y from +Z (radians)
    azimuth: f32,
}

impl CameraSystem {
    /// Create a camera at the configured position, clamped into the allowed shell
    pub fn new(params: OrbitParams) -> Self {
        let target = Vec3::from_array(params.target);
        let offset = Vec3::from_array(params.position) - target;
        let distance = offset.length().max(f32::EPSILON);

        let mut camera = Self {
            target,
            distance,
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            azimuth: offset.x.atan2(offset.z),
            params,
        };
        camera.clamp();
        camera
    }

    fn clamp(&mut self) {
        self.distance = self
            .distance
            .clamp(self.params.min_distance_m, self.params.max_distance_m);
        self.polar = self.polar.clamp(MIN_POLAR_ANGLE, self.params.max_polar_angle);
    }

    /// Orbit by a mouse drag of `(dx, dy)` pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.params.rotate_speed;
        self.polar -= dy * self.params.rotate_speed;
        self.clamp();
    }

    /// Dolly by scroll `lines` (positive moves closer)
    pub fn zoom(&mut self, lines: f32) {
        self.distance *= (1.0 - self.params.zoom_speed).powf(lines);
        self.clamp();
    }

    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + self.distance * Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar_angle(&self) -> f32 {
        self.polar
    }

    /// Create view-projection matrix for rendering
    ///
    /// # Returns
    /// Tuple of (view_proj_matrix, camera_position)
    pub fn create_view_proj_matrix(&self, render_config: &RenderConfig) -> (Mat4, Vec3) {
        let eye = self.eye();

        // Always keep Y as up vector (camera never rolls)
        let view = Mat4::look_at_rh(eye, self.target, Vec3::Y);
        let proj = Mat4::perspective_rh(
            render_config.fov_degrees.to_radians(),
            render_config.aspect_ratio(),
            render_config.near_plane_m,
            render_config.far_plane_m,
        );

        (proj * view, eye)
    }
}
