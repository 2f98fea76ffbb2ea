//! Adaptive-threshold beat detection.
//!
//! A beat fires when the band-averaged energy exceeds a decaying cutoff
//! and the refractory window since the last beat has passed. On a beat
//! the cutoff jumps above the current energy; otherwise it decays every
//! frame, so the detector adapts to both loud and quiet material.

use serde::{Deserialize, Serialize};

use crate::bands::BandLevels;
use crate::spectrum::FrequencySnapshot;

/// Tuning knobs for beat detection. Every field is optional so a TOML
/// config can override any subset; accessors supply the defaults.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum milliseconds between beats
    pub beat_refractory_ms: Option<f64>,
    /// Cutoff multiplier applied to the energy that fired a beat
    pub beat_rise: Option<f32>,
    /// Per-frame cutoff decay factor
    pub beat_decay: Option<f32>,
    /// Spectrum smoothing constant passed to the analyzer
    pub smoothing: Option<f32>,
}

impl DetectionConfig {
    pub fn beat_refractory_ms(&self) -> f64 {
        self.beat_refractory_ms.unwrap_or(200.0)
    }

    pub fn beat_rise(&self) -> f32 {
        self.beat_rise.unwrap_or(1.3)
    }

    pub fn beat_decay(&self) -> f32 {
        self.beat_decay.unwrap_or(0.95)
    }

    pub fn smoothing(&self) -> f32 {
        self.smoothing.unwrap_or(crate::spectrum::DEFAULT_SMOOTHING)
    }
}

/// Beat state recomputed every frame from the current snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct BeatInfo {
    /// Whether a beat fired this frame
    pub is_beat: bool,
    /// Band-averaged energy (0-1)
    pub strength: f32,
    /// Per-band energies backing `strength`
    pub bands: BandLevels,
}

/// Beat detector owning the adaptive cutoff and last-beat timestamp.
///
/// Timestamps are explicit arguments so the refractory window is exact
/// under any clock, including a simulated one in tests.
pub struct BeatDetector {
    config: DetectionConfig,
    cutoff: f32,
    last_beat_ms: Option<f64>,
}

impl BeatDetector {
    pub fn new() -> Self {
        Self::with_config(DetectionConfig::default())
    }

    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            config,
            cutoff: 0.0,
            last_beat_ms: None,
        }
    }

    /// Process one frame. `now_ms` must be monotonically non-decreasing
    /// across calls.
    pub fn detect(&mut self, snapshot: &FrequencySnapshot, now_ms: f64) -> BeatInfo {
        self.detect_levels(BandLevels::from_snapshot(snapshot), now_ms)
    }

    /// Process one frame from pre-computed band levels.
    pub fn detect_levels(&mut self, bands: BandLevels, now_ms: f64) -> BeatInfo {
        let strength = bands.average();

        let refractory_passed = self
            .last_beat_ms
            .map_or(true, |t| now_ms - t > self.config.beat_refractory_ms());

        let is_beat = strength > self.cutoff && refractory_passed;
        if is_beat {
            self.last_beat_ms = Some(now_ms);
            self.cutoff = strength * self.config.beat_rise();
        } else {
            self.cutoff *= self.config.beat_decay();
        }

        BeatInfo {
            is_beat,
            strength,
            bands,
        }
    }

    /// Current adaptive cutoff value.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Clear state (when switching audio sources).
    pub fn reset(&mut self) {
        self.cutoff = 0.0;
        self.last_beat_ms = None;
    }
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}
