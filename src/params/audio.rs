//! Frequency analysis configuration.

use crate::error::{Result, VisualizerError};

/// Analysis node configuration (browser `AnalyserNode` semantics)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Transform size in samples (power of 2, 32..=32768)
    /// Bin count is half of this.
    pub fft_size: usize,

    /// Temporal smoothing between frames, 0 = none, towards 1 = slow decay
    pub smoothing_time_constant: f32,

    /// Magnitude mapped to byte 0 (dBFS)
    pub min_decibels: f32,

    /// Magnitude mapped to byte 255 (dBFS)
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing_time_constant: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of frequency bins produced per frame
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            return Err(VisualizerError::InvalidConfig(format!(
                "FFT size must be a power of 2 in 32..=32768, got {}",
                self.fft_size
            )));
        }
        if !(0.0..=1.0).contains(&self.smoothing_time_constant) {
            return Err(VisualizerError::InvalidConfig(format!(
                "smoothing time constant must be in [0, 1], got {}",
                self.smoothing_time_constant
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(VisualizerError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frequency_bin_count(), 256);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AnalyserConfig {
            fft_size: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.fft_size = 16;
        assert!(config.validate().is_err());

        config.fft_size = 512;
        config.smoothing_time_constant = 1.5;
        assert!(config.validate().is_err());

        config.smoothing_time_constant = 0.8;
        config.min_decibels = -20.0;
        assert!(config.validate().is_err());
    }
}
