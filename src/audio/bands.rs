//! Band reduction: lower/upper half statistics of a frequency sample buffer.
//!
//! The split and the "fractional" normalization reproduce the historical
//! numbers exactly. The split boundary is `floor(N/2) - 1`, the last bin is
//! never part of the upper half, and fractions divide an average or maximum in
//! `[0, 255]` by the half length rather than by 255.

/// Split a sample buffer into its lower and upper halves
///
/// Lower is `[0, split)`, upper is `[split, N - 1)` with `split = floor(N/2) - 1`.
/// Both bounds saturate at zero, so tiny buffers yield empty halves.
pub fn split_halves(samples: &[u8]) -> (&[u8], &[u8]) {
    let n = samples.len();
    let split = (n / 2).saturating_sub(1);
    let end = n.saturating_sub(1).max(split);
    (&samples[..split], &samples[split..end])
}

/// Arithmetic mean, 0 for an empty slice
pub fn average(values: &[u8]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let total: u32 = values.iter().map(|&v| v as u32).sum();
    total as f32 / values.len() as f32
}

/// Largest value, 0 for an empty slice
pub fn maximum(values: &[u8]) -> f32 {
    values.iter().copied().max().unwrap_or(0) as f32
}

/// Divide a statistic by the length of the band it came from
fn per_bin(statistic: f32, len: usize) -> f32 {
    if len == 0 {
        0.0
    } else {
        statistic / len as f32
    }
}

/// Per-frame statistics of one sample buffer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandStatistics {
    pub lower_avg: f32,
    pub lower_max: f32,
    pub upper_avg: f32,
    pub upper_max: f32,
    /// Mean over the whole buffer, including the bin both halves skip
    pub overall_avg: f32,
    pub lower_len: usize,
    pub upper_len: usize,
}

impl BandStatistics {
    pub fn reduce(samples: &[u8]) -> Self {
        let (lower, upper) = split_halves(samples);
        Self {
            lower_avg: average(lower),
            lower_max: maximum(lower),
            upper_avg: average(upper),
            upper_max: maximum(upper),
            overall_avg: average(samples),
            lower_len: lower.len(),
            upper_len: upper.len(),
        }
    }

    /// Normalize every statistic by its band width
    pub fn fractions(&self) -> BandFractions {
        BandFractions {
            lower_max_fr: per_bin(self.lower_max, self.lower_len),
            lower_avg_fr: per_bin(self.lower_avg, self.lower_len),
            upper_max_fr: per_bin(self.upper_max, self.upper_len),
            upper_avg_fr: per_bin(self.upper_avg, self.upper_len),
        }
    }
}

/// The four scalars consumers read each frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BandFractions {
    pub lower_max_fr: f32,
    pub lower_avg_fr: f32,
    pub upper_max_fr: f32,
    pub upper_avg_fr: f32,
}

impl BandFractions {
    /// Reduce a sample buffer straight to its fractions
    pub fn from_samples(samples: &[u8]) -> Self {
        BandStatistics::reduce(samples).fractions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_six_bins() {
        let samples = [10, 20, 30, 40, 50, 60];
        let (lower, upper) = split_halves(&samples);
        assert_eq!(lower, &[10, 20]);
        assert_eq!(upper, &[30, 40, 50]);
    }

    #[test]
    fn test_split_default_bin_count() {
        let samples = [0u8; 256];
        let (lower, upper) = split_halves(&samples);
        assert_eq!(lower.len(), 127);
        assert_eq!(upper.len(), 128);
    }

    #[test]
    fn test_split_tiny_buffers() {
        assert_eq!(split_halves(&[]), (&[][..], &[][..]));
        assert_eq!(split_halves(&[9]), (&[][..], &[][..]));

        let (lower, upper) = split_halves(&[9, 8]);
        assert!(lower.is_empty());
        assert_eq!(upper, &[9]);

        let (lower, upper) = split_halves(&[9, 8, 7]);
        assert!(lower.is_empty());
        assert_eq!(upper, &[9, 8]);
    }

    #[test]
    fn test_reduce_six_bins() {
        let stats = BandStatistics::reduce(&[10, 20, 30, 40, 50, 60]);
        assert_eq!(stats.lower_avg, 15.0);
        assert_eq!(stats.lower_max, 20.0);
        assert_eq!(stats.upper_avg, 40.0);
        assert_eq!(stats.upper_max, 50.0);
        assert_eq!(stats.overall_avg, 35.0);

        let fr = stats.fractions();
        assert_eq!(fr.lower_avg_fr, 15.0 / 2.0);
        assert_eq!(fr.lower_max_fr, 20.0 / 2.0);
        assert_eq!(fr.upper_avg_fr, 40.0 / 3.0);
        assert_eq!(fr.upper_max_fr, 50.0 / 3.0);
    }

    #[test]
    fn test_empty_halves_yield_zero() {
        for samples in [&[][..], &[200][..]] {
            let stats = BandStatistics::reduce(samples);
            assert_eq!(stats.lower_avg, 0.0);
            assert_eq!(stats.lower_max, 0.0);
            assert_eq!(stats.upper_avg, 0.0);
            assert_eq!(stats.upper_max, 0.0);
            assert_eq!(BandFractions::from_samples(samples), BandFractions::default());
        }
    }

    #[test]
    fn test_average_and_maximum() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(maximum(&[]), 0.0);
        assert_eq!(average(&[255, 255, 255]), 255.0);
        assert_eq!(maximum(&[3, 250, 7]), 250.0);
    }

    #[test]
    fn test_full_scale_fractions_are_small() {
        let fr = BandFractions::from_samples(&[255u8; 256]);
        assert_eq!(fr.lower_max_fr, 255.0 / 127.0);
        assert_eq!(fr.upper_avg_fr, 255.0 / 128.0);
    }
}
