//! Frequency sampler: byte magnitudes per bin, computed once per frame.
//!
//! The playback callback feeds mono samples into an [`AnalysisTap`]; the frame
//! thread owns the [`FrequencySampler`], which snapshots the tap and runs the
//! analysis node on it. Scaling follows browser `AnalyserNode` semantics
//! (Blackman window, 1/N magnitude, exponential smoothing, dB to byte).

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::VecDeque;
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::params::AnalyserConfig;

/// Ring of the most recent mono samples, shared with the audio thread
#[derive(Debug)]
pub struct AnalysisTap {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl AnalysisTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a tap behind the lock the audio callback writes through
    pub fn shared(capacity: usize) -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::new(capacity)))
    }

    /// Append samples, keeping only the newest `capacity`
    pub fn push(&mut self, samples: &[f32]) {
        let skip = samples.len().saturating_sub(self.capacity);
        for &s in &samples[skip..] {
            if self.samples.len() == self.capacity {
                self.samples.pop_front();
            }
            self.samples.push_back(s);
        }
    }

    /// Copy the window into `out` oldest-first, zero-filling the front when short
    pub fn snapshot(&self, out: &mut [f32]) {
        let available = self.samples.len().min(out.len());
        let pad = out.len() - available;
        out[..pad].fill(0.0);
        let start = self.samples.len() - available;
        for (dst, src) in out[pad..].iter_mut().zip(self.samples.range(start..)) {
            *dst = *src;
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Blackman window coefficient as used by `AnalyserNode`
pub fn blackman_window(index: usize, size: usize) -> f32 {
    const ALPHA: f32 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    let x = index as f32 / size as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}

/// Analysis node: windowed FFT with smoothing and byte conversion
pub struct AnalyserNode {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes from the previous call
    smoothed: Vec<f32>,
}

impl AnalyserNode {
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let window = (0..config.fft_size)
            .map(|i| blackman_window(i, config.fft_size))
            .collect();

        Ok(Self {
            fft,
            window,
            scratch: vec![Complex::new(0.0, 0.0); config.fft_size],
            smoothed: vec![0.0; config.frequency_bin_count()],
            config,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.config.frequency_bin_count()
    }

    /// Analyse one time-domain window and write a byte per bin into `out`
    ///
    /// `time_domain` must hold `fft_size` samples; `out` may be shorter than
    /// the bin count, in which case only the lowest bins are written.
    pub fn get_byte_frequency_data(&mut self, time_domain: &[f32], out: &mut [u8]) {
        let n = self.config.fft_size;
        debug_assert_eq!(time_domain.len(), n, "time-domain window size mismatch");

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let sample = time_domain.get(i).copied().unwrap_or(0.0);
            *slot = Complex::new(sample * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let tau = self.config.smoothing_time_constant;
        let scale = 1.0 / n as f32;
        for (k, prev) in self.smoothed.iter_mut().enumerate() {
            let magnitude = self.scratch[k].norm() * scale;
            let next = tau * *prev + (1.0 - tau) * magnitude;
            *prev = if next.is_finite() { next } else { 0.0 };
        }

        let min_db = self.config.min_decibels;
        let range_scale = 255.0 / (self.config.max_decibels - min_db);
        for (byte, &magnitude) in out.iter_mut().zip(&self.smoothed) {
            let db = 20.0 * magnitude.log10();
            let scaled = (range_scale * (db - min_db)).floor();
            // log10(0) is -inf, which clamps to 0 like any quiet bin
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }
    }

}

/// Owns the per-session sample buffer and refreshes it on demand
pub struct FrequencySampler {
    node: AnalyserNode,
    tap: Arc<Mutex<AnalysisTap>>,
    time_domain: Vec<f32>,
    buffer: Vec<u8>,
}

impl FrequencySampler {
    pub fn new(node: AnalyserNode, tap: Arc<Mutex<AnalysisTap>>) -> Self {
        let time_domain = vec![0.0; node.fft_size()];
        let buffer = vec![0; node.frequency_bin_count()];
        Self {
            node,
            tap,
            time_domain,
            buffer,
        }
    }

    /// Refresh the sample buffer from the latest audio and hand out a view
    pub fn sample(&mut self) -> &[u8] {
        // The tap only holds plain samples, so a panic mid-push leaves nothing to repair
        self.tap
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .snapshot(&mut self.time_domain);
        self.node
            .get_byte_frequency_data(&self.time_domain, &mut self.buffer);
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn tap(&self) -> &Arc<Mutex<AnalysisTap>> {
        &self.tap
    }
}
