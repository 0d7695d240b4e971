//! Atmospheric sky parameters.

/// Scattering sky with a single sun
#[derive(Debug, Clone)]
pub struct SkyParams {
    /// Haze amount (dimensionless, 2 = clear, 10 = hazy)
    pub turbidity: f32,

    /// Rayleigh scattering multiplier
    pub rayleigh: f32,

    /// Mie scattering coefficient
    pub mie_coefficient: f32,

    /// Mie directional anisotropy (g, 0..1)
    pub mie_directional_g: f32,

    /// Sun elevation above the horizon (degrees)
    pub elevation_deg: f32,

    /// Sun azimuth (degrees)
    pub azimuth_deg: f32,
}

impl Default for SkyParams {
    fn default() -> Self {
        Self {
            turbidity: 10.0,
            rayleigh: 2.0,
            mie_coefficient: 0.005,
            mie_directional_g: 0.8,
            elevation_deg: 2.0,
            azimuth_deg: 180.0,
        }
    }
}
