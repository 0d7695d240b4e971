//! Orbit camera configuration.

use std::f32::consts::PI;

/// Orbit camera around a fixed target
#[derive(Debug, Clone)]
pub struct OrbitParams {
    /// Initial eye position (meters)
    pub position: [f32; 3],

    /// Orbit target (meters)
    pub target: [f32; 3],

    /// Closest allowed eye-to-target distance (meters)
    pub min_distance_m: f32,

    /// Farthest allowed eye-to-target distance (meters)
    pub max_distance_m: f32,

    /// Largest polar angle from +Y (radians); keeps the eye above the water
    pub max_polar_angle: f32,

    /// Radians of rotation per pixel of mouse drag
    pub rotate_speed: f32,

    /// Fractional distance change per scroll line
    pub zoom_speed: f32,
}

impl Default for OrbitParams {
    fn default() -> Self {
        Self {
            position: [1.0, 20.0, 100.0],
            target: [0.0, 10.0, 0.0],
            min_distance_m: 40.0,
            max_distance_m: 200.0,
            max_polar_angle: PI * 0.495,
            rotate_speed: 0.005,
            zoom_speed: 0.05,
        }
    }
}
