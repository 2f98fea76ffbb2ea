//! Audio sources and the shared analysis buffer.
//!
//! Three interchangeable sources - live capture, WAV playback, and the
//! synthesized fallback tone - all feed the same mono sample window
//! that the spectrum analyzer reads once per frame.

mod capture;
mod player;
pub mod synth;

pub use capture::{collect_devices, list_devices, preferred_device, DeviceInfo, LiveInput};
pub use player::Player;

use soundscene_core::FFT_SIZE;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// The rolling mono window read by the analyzer each frame.
pub type SampleBuffer = Arc<Mutex<Vec<f32>>>;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to read WAV file: {0}")]
    Wav(#[from] hound::Error),
    #[error("unsupported WAV data: {0}")]
    UnsupportedWav(String),
    #[error("no audio output device available")]
    NoOutputDevice,
    #[error("audio device configuration failed: {0}")]
    DeviceConfig(String),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

/// Append samples to the analysis window, keeping only the newest
/// `FFT_SIZE` samples.
pub(crate) fn push_window(buffer: &SampleBuffer, samples: &[f32]) {
    let mut buf = buffer.lock().unwrap();
    buf.extend_from_slice(samples);
    let excess = buf.len().saturating_sub(FFT_SIZE);
    if excess > 0 {
        buf.drain(0..excess);
    }
}

/// The currently running source.
enum Source {
    Live(LiveInput),
    Player(Player),
    /// Stream setup failed; the scenes idle on silence
    Silent,
}

/// Owns the active audio source and the shared analysis window.
pub struct AudioEngine {
    buffer: SampleBuffer,
    source: Source,
    devices: Vec<DeviceInfo>,
}

impl AudioEngine {
    /// Create an engine with no running stream yet.
    pub fn new() -> Self {
        Self {
            buffer: Arc::new(Mutex::new(vec![0.0; FFT_SIZE])),
            source: Source::Silent,
            devices: collect_devices(),
        }
    }

    /// Start playback of a WAV file. On failure the previous source is
    /// replaced by the synthesized fallback and the error is returned
    /// for the caller's notification.
    pub fn play_file(&mut self, path: &Path) -> Result<String, AudioError> {
        match Player::from_wav(path, Arc::clone(&self.buffer)) {
            Ok(player) => {
                let label = player.label().to_string();
                self.source = Source::Player(player);
                println!("Playing {}", label);
                Ok(label)
            }
            Err(e) => {
                eprintln!("Audio file load failed: {}", e);
                self.play_synth();
                Err(e)
            }
        }
    }

    /// Start the looped fallback tone. Infallible from the caller's
    /// perspective: if even the output device fails we go silent.
    pub fn play_synth(&mut self) {
        match Player::synth(Arc::clone(&self.buffer)) {
            Ok(player) => {
                println!("Playing {}", player.label());
                self.source = Source::Player(player);
            }
            Err(e) => {
                eprintln!("Audio setup failed: {}", e);
                self.source = Source::Silent;
            }
        }
    }

    /// Switch to live capture from the device at `idx`. Returns the
    /// device name and whether the stream actually started.
    pub fn select_device(&mut self, idx: usize) -> Option<(String, bool)> {
        let info = self.devices.get(idx)?;
        let name = info.name.clone();

        match LiveInput::start(info, Arc::clone(&self.buffer)) {
            Ok(input) => {
                println!("Capturing from {}", input.name());
                self.source = Source::Live(input);
                Some((name, true))
            }
            Err(e) => {
                eprintln!("Capture from {} failed: {}", name, e);
                Some((name, false))
            }
        }
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    pub fn device_names(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }

    /// Snapshot of the current analysis window.
    pub fn samples(&self) -> Vec<f32> {
        self.buffer.lock().unwrap().clone()
    }

    /// Player progress (current, duration) in seconds, when playing a
    /// file or the fallback tone.
    pub fn progress(&self) -> Option<(f32, f32)> {
        match &self.source {
            Source::Player(p) => Some(p.progress()),
            _ => None,
        }
    }

    /// Toggle play/pause on the active player. No-op for live capture.
    pub fn toggle_playback(&mut self) -> Option<bool> {
        match &self.source {
            Source::Player(p) => Some(p.toggle()),
            _ => None,
        }
    }

    /// Skip by a signed number of seconds within the active player.
    pub fn skip(&mut self, seconds: f32) {
        if let Source::Player(p) = &self.source {
            p.skip(seconds);
        }
    }

    /// Short description of what is currently audible.
    pub fn source_label(&self) -> String {
        match &self.source {
            Source::Live(input) => format!("live: {}", input.name()),
            Source::Player(p) => p.label().to_string(),
            Source::Silent => "silence".to_string(),
        }
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_window_keeps_newest_samples() {
        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));

        push_window(&buffer, &vec![1.0; FFT_SIZE]);
        push_window(&buffer, &[2.0; 100]);

        let buf = buffer.lock().unwrap();
        assert_eq!(buf.len(), FFT_SIZE);
        assert_eq!(buf[FFT_SIZE - 1], 2.0);
        assert_eq!(buf[0], 1.0);
    }

    #[test]
    fn push_window_handles_oversized_chunks() {
        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));

        push_window(&buffer, &vec![3.0; FFT_SIZE * 2]);
        assert_eq!(buffer.lock().unwrap().len(), FFT_SIZE);
    }
}
