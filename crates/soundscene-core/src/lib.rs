//! Analysis core and scene model for soundscene.
//!
//! Everything in this crate is windowless and device-free: FFT spectrum
//! analysis, frequency band energy extraction, adaptive-threshold beat
//! detection, the scene element model, and the mapping from audio levels
//! to per-frame visual gains. The application crate wires these into the
//! render loop.

pub mod bands;
pub mod beat;
pub mod element;
pub mod mapper;
pub mod params;
pub mod spectrum;

pub use bands::{BandLevels, FrequencyBand, NUM_BANDS};
pub use beat::{BeatDetector, BeatInfo, DetectionConfig};
pub use element::{Customization, ElementSet, VisualElement};
pub use mapper::{response_gain, ResponseTarget, ResponseUpdate};
pub use params::{ColorScheme, SceneKind, SceneParams};
pub use spectrum::{FrequencySnapshot, SpectrumAnalyzer, FFT_SIZE, SPECTRUM_BINS};
