//! Audio-reactive sphere parameters.

/// Rough sphere driven by band fractions
#[derive(Debug, Clone)]
pub struct SphereParams {
    /// Undeformed radius (meters)
    pub radius_m: f32,

    /// Segments around the equator
    pub width_segments: usize,

    /// Segments from pole to pole
    pub height_segments: usize,

    /// Noise displacement amplitude (meters per unit treble)
    pub noise_amplitude: f32,

    /// Noise drift rate per millisecond; scaled by (7, 8, 9) per axis
    pub noise_rate: f32,

    /// Exponent applied to the lower-band max fraction before mapping
    pub bass_exponent: f32,

    /// Radius offset range driven by the lower-band max fraction (meters)
    pub bass_range_m: (f32, f32),

    /// Displacement gain range driven by the upper-band average fraction
    pub treble_range: (f32, f32),

    /// Group rotation around Y per frame (radians)
    pub spin_per_frame: f32,

    /// Group center (meters)
    pub center: [f32; 3],

    /// Surface color (linear RGB)
    pub color: [f32; 3],

    /// OpenSimplex noise seed
    pub noise_seed: u32,
}

impl Default for SphereParams {
    fn default() -> Self {
        Self {
            radius_m: 15.0,
            width_segments: 15,
            height_segments: 15,
            noise_amplitude: 7.0,
            noise_rate: 0.000_01,
            bass_exponent: 0.8,
            bass_range_m: (0.0, 8.0),
            treble_range: (0.0, 4.0),
            spin_per_frame: 0.005,
            center: [0.0, 25.0, 0.0],
            color: [0.35, 0.55, 0.8],
            noise_seed: 7,
        }
    }
}
