//! End-to-end: analysis tap -> sampler -> band reducer -> mapping -> sphere.

use std::f32::consts::PI;

use oceanvisuo::audio::{AnalyserNode, AnalysisTap, BandFractions, BandStatistics, FrequencySampler};
use oceanvisuo::mapping::{modulate, Modulation};
use oceanvisuo::params::{AnalyserConfig, SphereParams};
use oceanvisuo::sphere::RoughSphere;

const SAMPLE_RATE: f32 = 44_100.0;

fn sampler() -> FrequencySampler {
    let config = AnalyserConfig::default();
    let tap = AnalysisTap::shared(config.fft_size);
    let node = AnalyserNode::new(config).unwrap();
    FrequencySampler::new(node, tap)
}

/// Sine centred on analyser bin `bin`
fn tone(bin: usize, amplitude: f32, len: usize) -> Vec<f32> {
    let freq = bin as f32 * SAMPLE_RATE / 512.0;
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

#[test]
fn test_silence_leaves_sphere_at_rest() {
    let mut sampler = sampler();
    let samples = sampler.sample().to_vec();
    assert_eq!(samples.len(), 256);
    assert!(samples.iter().all(|&b| b == 0));

    let fractions = BandFractions::from_samples(&samples);
    assert_eq!(fractions, BandFractions::default());

    let mut sphere = RoughSphere::new(SphereParams::default()).unwrap();
    let drive = sphere.update(&fractions, 1234.0);
    assert_eq!(drive.bass, 0.0);
    assert_eq!(drive.treble, 0.0);
}

#[test]
fn test_low_tone_drives_bass_more_than_treble() {
    let mut sampler = sampler();
    sampler
        .tap()
        .lock()
        .unwrap()
        .push(&tone(12, 0.05, 2048));

    let statistics = BandStatistics::reduce(sampler.sample());
    assert!(statistics.lower_max > 0.0);
    assert!(statistics.lower_max > statistics.upper_max);

    let fractions = statistics.fractions();
    assert!(fractions.lower_max_fr > fractions.upper_max_fr);

    let sphere = RoughSphere::new(SphereParams::default()).unwrap();
    let drive = sphere.drive(&fractions);
    assert!(drive.bass > 0.0);
    assert!(drive.bass.is_finite());
}

#[test]
fn test_saturated_bins_map_deterministically() {
    let samples = [255u8; 256];
    let run = || {
        let fractions = BandFractions::from_samples(&samples);
        modulate(fractions.lower_max_fr.powf(0.8), 0.0, 1.0, 0.0, 8.0)
    };

    let first = run();
    assert!(first.is_finite());
    assert_eq!(first.to_bits(), run().to_bits());

    // lower half holds 127 bins, so the fraction is 255/127
    let expected = (255.0f32 / 127.0).powf(0.8) * 8.0;
    assert!((first - expected).abs() < 1e-4);

    let bass = Modulation::new(0.0, 1.0, 0.0, 8.0).unwrap().with_exponent(0.8);
    assert_eq!(bass.apply(255.0 / 127.0).to_bits(), first.to_bits());
}

#[test]
fn test_six_bin_reduction() {
    let statistics = BandStatistics::reduce(&[10, 20, 30, 40, 50, 60]);
    assert_eq!(statistics.lower_avg, 15.0);
    assert_eq!(statistics.lower_max, 20.0);
    assert_eq!(statistics.upper_avg, 40.0);
    assert_eq!(statistics.upper_max, 50.0);

    let fractions = statistics.fractions();
    assert_eq!(fractions.lower_avg_fr, 7.5);
    assert_eq!(fractions.lower_max_fr, 10.0);
    assert_eq!(fractions.upper_avg_fr, 40.0 / 3.0);
    assert_eq!(fractions.upper_max_fr, 50.0 / 3.0);
}
