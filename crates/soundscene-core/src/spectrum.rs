//! FFT analysis producing per-frame frequency snapshots.
//!
//! Reproduces the behavior of a platform analyser node: Hann window,
//! forward FFT, per-bin temporal smoothing, then a dB-to-byte mapping so
//! every bin lands in 0-255.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT size - large enough for good low-frequency resolution
pub const FFT_SIZE: usize = 4096;

/// Number of spectrum bins exposed per frame (half the FFT size)
pub const SPECTRUM_BINS: usize = FFT_SIZE / 2;

/// Default per-bin smoothing constant (fraction of the previous frame kept)
pub const DEFAULT_SMOOTHING: f32 = 0.7;

/// dB value mapped to byte 0
const MIN_DB: f32 = -100.0;
/// dB value mapped to byte 255
const MAX_DB: f32 = -30.0;

/// One frame's spectral magnitudes, one byte (0-255) per frequency bin.
///
/// Ephemeral: recomputed and overwritten every frame, no identity beyond
/// the current frame.
#[derive(Clone)]
pub struct FrequencySnapshot {
    bins: Vec<u8>,
}

impl FrequencySnapshot {
    /// An all-zero snapshot, used before the first analysis frame.
    pub fn silent() -> Self {
        Self {
            bins: vec![0; SPECTRUM_BINS],
        }
    }

    /// Build a snapshot directly from byte magnitudes.
    pub fn from_bytes(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bins
    }

    /// Magnitude of bin `idx` normalized to 0-1. Out-of-range reads are 0.
    pub fn level(&self, idx: usize) -> f32 {
        self.bins.get(idx).map_or(0.0, |&b| b as f32 / 255.0)
    }

    /// Magnitude at a fractional position through the spectrum (0-1),
    /// normalized to 0-1. This is how scene objects pick "their" bin.
    pub fn level_at(&self, fraction: f32) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let idx = ((fraction.clamp(0.0, 1.0)) * self.bins.len() as f32) as usize;
        self.level(idx.min(self.bins.len() - 1))
    }

    /// Average magnitude across all bins, normalized to 0-1.
    pub fn average(&self) -> f32 {
        if self.bins.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.bins.iter().map(|&b| b as u32).sum();
        sum as f32 / self.bins.len() as f32 / 255.0
    }
}

/// Spectrum analyzer - performs the FFT once per frame and owns all
/// pre-allocated buffers.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    window: Vec<f32>,
    /// Per-bin smoothed magnitudes (pre-dB)
    smoothed: Vec<f32>,
    smoothing: f32,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self::with_sample_rate(44100.0)
    }

    pub fn with_sample_rate(sample_rate: f32) -> Self {
        Self::with_smoothing(sample_rate, DEFAULT_SMOOTHING)
    }

    pub fn with_smoothing(sample_rate: f32, smoothing: f32) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Pre-compute Hann window
        let window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos()))
            .collect();

        Self {
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            window,
            smoothed: vec![0.0; SPECTRUM_BINS],
            smoothing: smoothing.clamp(0.0, 0.99),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Analyze one window of time-domain samples. Call once per frame.
    ///
    /// Shorter inputs are zero-padded; longer inputs use the first
    /// `FFT_SIZE` samples.
    pub fn analyze(&mut self, samples: &[f32]) -> FrequencySnapshot {
        let sample_count = samples.len().min(FFT_SIZE);

        // Apply window and fill the pre-allocated buffer
        for i in 0..FFT_SIZE {
            if i < sample_count {
                self.fft_buffer[i] = Complex::new(samples[i] * self.window[i], 0.0);
            } else {
                self.fft_buffer[i] = Complex::new(0.0, 0.0);
            }
        }

        self.fft.process(&mut self.fft_buffer);

        let mut bins = vec![0u8; SPECTRUM_BINS];
        for (i, byte) in bins.iter_mut().enumerate() {
            let magnitude = self.fft_buffer[i].norm() / FFT_SIZE as f32;

            // Temporal smoothing keeps bins from flickering frame to frame
            self.smoothed[i] =
                self.smoothing * self.smoothed[i] + (1.0 - self.smoothing) * magnitude;

            let db = 20.0 * (self.smoothed[i] + 1e-10).log10();
            let scaled = ((db - MIN_DB) / (MAX_DB - MIN_DB) * 255.0).clamp(0.0, 255.0);
            *byte = scaled as u8;
        }

        FrequencySnapshot { bins }
    }

    /// Clear smoothing state (when switching audio sources).
    pub fn reset(&mut self) {
        for v in &mut self.smoothed {
            *v = 0.0;
        }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
