//! High-level ocean system stepping water time once per frame.

use super::mesh::WaterSurface;
use crate::params::WaterParams;

/// Water surface plus its animation clock
pub struct OceanSystem {
    pub surface: WaterSurface,
    pub params: WaterParams,
    /// Water animation time (seconds), advanced by a fixed step per frame
    time_s: f32,
}

impl OceanSystem {
    /// Create new ocean system with specified parameters
    pub fn new(params: WaterParams) -> Self {
        let surface = WaterSurface::new(&params);
        Self {
            surface,
            params,
            time_s: 0.0,
        }
    }

    /// Advance one frame and displace the surface
    ///
    /// Water time moves by `time_step_s` regardless of how long the frame took,
    /// so slow frames slow the waves instead of making them jump.
    ///
    /// # Returns
    /// * Water time after the step, for the water shader
    pub fn advance(&mut self) -> f32 {
        self.time_s += self.params.time_step_s;
        self.surface.update(self.time_s, &self.params);
        self.time_s
    }

    pub fn time_s(&self) -> f32 {
        self.time_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> WaterParams {
        WaterParams {
            grid_size: 16,
            extent_m: 1600.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_time_advances_by_fixed_step() {
        let mut ocean = OceanSystem::new(small_params());
        for _ in 0..60 {
            ocean.advance();
        }
        assert!((ocean.time_s() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_surface_moves_between_frames() {
        let mut ocean = OceanSystem::new(small_params());
        ocean.advance();
        let first: Vec<f32> = ocean
            .surface
            .mesh
            .vertices
            .iter()
            .map(|v| v.position[1])
            .collect();
        for _ in 0..30 {
            ocean.advance();
        }
        let moved = ocean
            .surface
            .mesh
            .vertices
            .iter()
            .zip(&first)
            .any(|(v, &h)| (v.position[1] - h).abs() > 1e-4);
        assert!(moved);

        let amplitude = ocean.params.swell_amplitude_m;
        assert!(ocean
            .surface
            .mesh
            .vertices
            .iter()
            .all(|v| v.position[1].abs() <= amplitude * 1.5));
    }

    #[test]
    fn test_normals_are_unit_and_upward() {
        let mut ocean = OceanSystem::new(small_params());
        ocean.advance();
        for v in &ocean.surface.mesh.vertices {
            let [x, y, z] = v.normal;
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-4);
            assert!(y > 0.0);
        }
    }
}
