//! Water surface parameters.

/// Animated water plane
#[derive(Debug, Clone)]
pub struct WaterParams {
    /// Grid resolution (quads per side, 256 = 66,049 vertices)
    pub grid_size: usize,

    /// Side length of the square plane (meters)
    pub extent_m: f32,

    /// Animation time added per frame (seconds), independent of wall clock
    pub time_step_s: f32,

    /// Swell height (meters)
    pub swell_amplitude_m: f32,

    /// Swell spatial frequency (cycles per meter)
    pub swell_frequency: f32,

    /// Swell animation speed multiplier
    pub swell_speed: f32,

    /// Normal distortion strength passed to the shader
    pub distortion_scale: f32,

    /// Deep water color (linear RGB)
    pub water_color: [f32; 3],

    /// Perlin noise seed
    pub noise_seed: u32,
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            grid_size: 256,
            extent_m: 10_000.0,
            time_step_s: 1.0 / 60.0,
            swell_amplitude_m: 4.0,
            swell_frequency: 0.004,
            swell_speed: 0.5,
            distortion_scale: 3.7,
            // 0x001e0f
            water_color: [0.0, 30.0 / 255.0, 15.0 / 255.0],
            noise_seed: 42,
        }
    }
}
