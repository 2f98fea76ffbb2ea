//! Audio device capture and stream management.
//!
//! Handles live audio input from system devices using cpal: device
//! enumeration, stream creation, and feeding the shared analysis buffer.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, Stream};
use std::sync::{Arc, Mutex};

use super::{push_window, AudioError, SampleBuffer};

pub struct DeviceInfo {
    pub device: cpal::Device,
    pub name: String,
    pub is_input: bool,
}

/// Enumerate all input and output devices, inputs first.
pub fn collect_devices() -> Vec<DeviceInfo> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    if let Ok(input_devices) = host.input_devices() {
        for device in input_devices {
            if let Ok(name) = device.name() {
                devices.push(DeviceInfo {
                    device,
                    name,
                    is_input: true,
                });
            }
        }
    }

    if let Ok(output_devices) = host.output_devices() {
        for device in output_devices {
            if let Ok(name) = device.name() {
                devices.push(DeviceInfo {
                    device,
                    name,
                    is_input: false,
                });
            }
        }
    }

    devices
}

/// Print all devices to stdout at startup.
pub fn list_devices() {
    println!("\n=== Audio Devices ===");
    for (idx, info) in collect_devices().iter().enumerate() {
        let kind = if info.is_input { "input" } else { "output" };
        println!("  [{}] {} ({})", idx, info.name, kind);
    }
    println!("Use / to search and switch devices\n");
}

/// Pick the device index to start with: the configured device if it
/// still exists, then the usual Linux loopback-friendly inputs, then
/// the first device.
pub fn preferred_device(
    devices: &[DeviceInfo],
    last_device: Option<&str>,
    last_is_input: bool,
) -> usize {
    last_device
        .and_then(|name| {
            devices
                .iter()
                .position(|d| d.name == name && d.is_input == last_is_input)
        })
        .or_else(|| {
            devices
                .iter()
                .position(|d| d.is_input && d.name == "pipewire")
        })
        .or_else(|| devices.iter().position(|d| d.is_input && d.name == "pulse"))
        .or_else(|| devices.iter().position(|d| d.is_input))
        .unwrap_or(0)
}

/// A running capture stream feeding the shared analysis buffer.
pub struct LiveInput {
    _stream: Stream,
    name: String,
    sample_rate: f32,
    // Auto-gain state shared with the callback
    peak: Arc<Mutex<f32>>,
}

impl LiveInput {
    /// Start capturing from the given device. The callback mixes frames
    /// down to mono, normalizes toward a target peak, and appends them
    /// to the analysis window.
    pub fn start(info: &DeviceInfo, buffer: SampleBuffer) -> Result<Self, AudioError> {
        let supported = if info.is_input {
            info.device.default_input_config()
        } else {
            info.device.default_output_config()
        }
        .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels as usize;
        let sample_rate = config.sample_rate.0 as f32;

        let peak = Arc::new(Mutex::new(0.1f32));
        let cb_peak = Arc::clone(&peak);
        let err_fn = |err| eprintln!("Capture stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::F32 => info.device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    feed(&buffer, &cb_peak, data, channels);
                },
                err_fn,
                None,
            )?,
            SampleFormat::I16 => info.device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let converted: Vec<f32> =
                        data.iter().map(|&s| s as f32 / i16::MAX as f32).collect();
                    feed(&buffer, &cb_peak, &converted, channels);
                },
                err_fn,
                None,
            )?,
            SampleFormat::U16 => info.device.build_input_stream(
                &config,
                move |data: &[u16], _: &cpal::InputCallbackInfo| {
                    let converted: Vec<f32> = data
                        .iter()
                        .map(|&s| (s as f32 - 32768.0) / 32768.0)
                        .collect();
                    feed(&buffer, &cb_peak, &converted, channels);
                },
                err_fn,
                None,
            )?,
            other => {
                return Err(AudioError::DeviceConfig(format!(
                    "unsupported sample format {:?}",
                    other
                )))
            }
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            name: info.name.clone(),
            sample_rate,
            peak,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(dead_code)]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Current smoothed input peak (for diagnostics).
    #[allow(dead_code)]
    pub fn peak(&self) -> f32 {
        *self.peak.lock().unwrap()
    }
}

/// Target peak level for auto-gain normalization
const TARGET_LEVEL: f32 = 0.5;
/// Smoothing factor for the tracked peak
const PEAK_SMOOTHING: f32 = 0.99;

fn feed(buffer: &SampleBuffer, peak: &Arc<Mutex<f32>>, data: &[f32], channels: usize) {
    if data.is_empty() || channels == 0 {
        return;
    }

    // Mix interleaved frames down to mono
    let mono: Vec<f32> = data
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();

    // Track the peak and normalize toward the target level so quiet
    // sources still drive the scenes
    let frame_peak = mono.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let gain = {
        let mut p = peak.lock().unwrap();
        *p = (*p * PEAK_SMOOTHING).max(frame_peak).max(1e-4);
        (TARGET_LEVEL / *p).min(20.0)
    };

    let normalized: Vec<f32> = mono.iter().map(|s| s * gain).collect();
    push_window(buffer, &normalized);
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::FFT_SIZE;

    #[test]
    fn feed_mixes_to_mono_and_normalizes() {
        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));
        let peak = Arc::new(Mutex::new(0.1f32));

        // Two channels, constant 0.2 on both -> mono 0.2
        let data = vec![0.2f32; 512 * 2];
        feed(&buffer, &peak, &data, 2);

        let buf = buffer.lock().unwrap();
        assert_eq!(buf.len(), 512);
        // Auto-gain should push the level toward the target
        assert!(buf[0] > 0.2);
    }

    #[test]
    fn feed_caps_window_length() {
        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));
        let peak = Arc::new(Mutex::new(0.1f32));

        let data = vec![0.1f32; FFT_SIZE * 3];
        feed(&buffer, &peak, &data, 1);

        assert_eq!(buffer.lock().unwrap().len(), FFT_SIZE);
    }

    #[test]
    fn feed_ignores_empty_input() {
        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));
        let peak = Arc::new(Mutex::new(0.1f32));

        feed(&buffer, &peak, &[], 2);
        assert!(buffer.lock().unwrap().is_empty());
    }
}
