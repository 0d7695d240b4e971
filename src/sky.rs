//! Sky dome parameters and sun placement.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::params::SkyParams;

/// Unit vector toward the sun for an elevation/azimuth pair (degrees)
///
/// Spherical coordinates with `phi` measured from +Y and `theta` around it,
/// so azimuth 0 looks down +Z and 180 down -Z.
pub fn sun_direction(elevation_deg: f32, azimuth_deg: f32) -> Vec3 {
    let phi = (90.0 - elevation_deg).to_radians();
    let theta = azimuth_deg.to_radians();
    Vec3::new(
        phi.sin() * theta.sin(),
        phi.cos(),
        phi.sin() * theta.cos(),
    )
}

/// Uniform buffer for the sky shader (inverse view-projection + scattering)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SkyUniforms {
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub turbidity: f32,
    pub sun_direction: [f32; 3],
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub exposure: f32,
    pub _padding: f32,
}

impl SkyUniforms {
    pub fn new(
        params: &SkyParams,
        inv_view_proj: [[f32; 4]; 4],
        camera_pos: Vec3,
        exposure: f32,
    ) -> Self {
        Self {
            inv_view_proj,
            camera_pos: camera_pos.to_array(),
            turbidity: params.turbidity,
            sun_direction: sun_direction(params.elevation_deg, params.azimuth_deg).to_array(),
            rayleigh: params.rayleigh,
            mie_coefficient: params.mie_coefficient,
            mie_directional_g: params.mie_directional_g,
            exposure,
            _padding: 0.0,
        }
    }
}
