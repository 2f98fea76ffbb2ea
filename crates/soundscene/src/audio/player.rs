//! WAV playback and the synthesized fallback player.
//!
//! Plays a mono sample buffer through the default output device while
//! teeing every rendered frame into the shared analysis buffer, so the
//! scenes react to exactly what is heard. Supports play/pause, seeking,
//! looping, and progress reporting.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::{push_window, AudioError, SampleBuffer};
use super::synth::{fallback_tone, TONE_SAMPLE_RATE};

/// State shared between the app thread and the output callback.
struct PlayerState {
    /// Mono source samples
    samples: Vec<f32>,
    /// Fractional read position into `samples`
    pos: f64,
    playing: bool,
    looped: bool,
}

pub struct Player {
    shared: Arc<Mutex<PlayerState>>,
    _stream: Stream,
    /// Source sample rate (position advances in source samples)
    src_rate: f32,
    /// Human-readable description for notifications
    label: String,
}

impl Player {
    /// Load a WAV file and start playing it.
    pub fn from_wav(path: &Path, buffer: SampleBuffer) -> Result<Self, AudioError> {
        let (samples, src_rate) = decode_wav(path)?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        Self::start(samples, src_rate, false, label, buffer)
    }

    /// Start the looped synthesized fallback tone.
    pub fn synth(buffer: SampleBuffer) -> Result<Self, AudioError> {
        Self::start(
            fallback_tone(),
            TONE_SAMPLE_RATE as f32,
            true,
            "synthesized tone".to_string(),
            buffer,
        )
    }

    fn start(
        samples: Vec<f32>,
        src_rate: f32,
        looped: bool,
        label: String,
        buffer: SampleBuffer,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        if supported.sample_format() != SampleFormat::F32 {
            return Err(AudioError::DeviceConfig(format!(
                "unsupported output sample format {:?}",
                supported.sample_format()
            )));
        }

        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels as usize;
        let out_rate = config.sample_rate.0 as f32;
        let step = (src_rate / out_rate) as f64;

        let shared = Arc::new(Mutex::new(PlayerState {
            samples,
            pos: 0.0,
            playing: true,
            looped,
        }));
        let cb_shared = Arc::clone(&shared);

        let stream = device.build_output_stream(
            &config,
            move |out: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut rendered = Vec::with_capacity(out.len() / channels.max(1));
                {
                    let mut state = cb_shared.lock().unwrap();
                    for frame in out.chunks_mut(channels) {
                        let sample = next_sample(&mut state, step);
                        for slot in frame.iter_mut() {
                            *slot = sample;
                        }
                        rendered.push(sample);
                    }
                }
                push_window(&buffer, &rendered);
            },
            |err| eprintln!("Playback stream error: {}", err),
            None,
        )?;

        stream.play()?;

        Ok(Self {
            shared,
            _stream: stream,
            src_rate,
            label,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    #[allow(dead_code)]
    pub fn is_playing(&self) -> bool {
        self.shared.lock().unwrap().playing
    }

    /// Toggle play/pause, returning the new playing state.
    pub fn toggle(&self) -> bool {
        let mut state = self.shared.lock().unwrap();
        // A finished non-looping track restarts from the top
        if !state.playing && state.pos >= state.samples.len() as f64 {
            state.pos = 0.0;
        }
        state.playing = !state.playing;
        state.playing
    }

    /// Current position and total duration in seconds.
    pub fn progress(&self) -> (f32, f32) {
        let state = self.shared.lock().unwrap();
        let current = state.pos as f32 / self.src_rate;
        let duration = state.samples.len() as f32 / self.src_rate;
        (current.min(duration), duration)
    }

    /// Jump to an absolute position in seconds, clamped to the track.
    pub fn seek(&self, seconds: f32) {
        let mut state = self.shared.lock().unwrap();
        let max = state.samples.len() as f64;
        state.pos = ((seconds.max(0.0) as f64) * self.src_rate as f64).min(max);
    }

    /// Skip forward/backward by a signed number of seconds.
    pub fn skip(&self, seconds: f32) {
        let (current, _) = self.progress();
        self.seek(current + seconds);
    }
}

/// Render one source sample at the current position with linear
/// interpolation, then advance. Returns silence when stopped or done.
fn next_sample(state: &mut PlayerState, step: f64) -> f32 {
    if !state.playing || state.samples.is_empty() {
        return 0.0;
    }

    let len = state.samples.len();
    if state.pos >= len as f64 {
        if state.looped {
            state.pos %= len as f64;
        } else {
            state.playing = false;
            return 0.0;
        }
    }

    let idx = state.pos as usize;
    let frac = (state.pos - idx as f64) as f32;
    let a = state.samples[idx];
    let b = state.samples[(idx + 1) % len];
    state.pos += step;

    a * (1.0 - frac) + b * frac
}

/// Decode a WAV file to mono f32 samples plus its sample rate.
fn decode_wav(path: &Path) -> Result<(Vec<f32>, f32), AudioError> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::UnsupportedWav("zero channels".to_string()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mono: Vec<f32> = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    if mono.is_empty() {
        return Err(AudioError::UnsupportedWav("empty audio stream".to_string()));
    }

    Ok((mono, spec.sample_rate as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(samples: Vec<f32>, looped: bool) -> PlayerState {
        PlayerState {
            samples,
            pos: 0.0,
            playing: true,
            looped,
        }
    }

    #[test]
    fn next_sample_advances_and_interpolates() {
        let mut s = state(vec![0.0, 1.0, 0.0], false);

        assert_eq!(next_sample(&mut s, 0.5), 0.0);
        // Halfway between samples 0 and 1
        assert!((next_sample(&mut s, 0.5) - 0.5).abs() < 1e-6);
        assert!((next_sample(&mut s, 0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn non_looping_playback_stops_at_end() {
        let mut s = state(vec![0.5; 4], false);

        for _ in 0..4 {
            next_sample(&mut s, 1.0);
        }
        assert_eq!(next_sample(&mut s, 1.0), 0.0);
        assert!(!s.playing);
    }

    #[test]
    fn looping_playback_wraps() {
        let mut s = state(vec![0.5; 4], true);

        for _ in 0..16 {
            next_sample(&mut s, 1.0);
        }
        assert!(s.playing);
        assert!(s.pos <= 4.0);
    }

    #[test]
    fn paused_state_renders_silence_without_advancing() {
        let mut s = state(vec![0.5; 4], false);
        s.playing = false;

        assert_eq!(next_sample(&mut s, 1.0), 0.0);
        assert_eq!(s.pos, 0.0);
    }

    #[test]
    fn wav_decode_rejects_missing_file() {
        let err = decode_wav(Path::new("/nonexistent/file.wav"));
        assert!(err.is_err());
    }
}
