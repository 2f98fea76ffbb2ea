//! Synthesized fallback tone.
//!
//! When no file is loaded and no capture device is active, playback
//! falls back to a looped ten-second buffer of two slowly detuning
//! sines, so the scenes always have something to react to.

use std::f32::consts::TAU;

pub const TONE_SECONDS: f32 = 10.0;
pub const TONE_SAMPLE_RATE: u32 = 44_100;

/// Render the fallback tone as mono f32 samples.
pub fn fallback_tone() -> Vec<f32> {
    let count = (TONE_SECONDS * TONE_SAMPLE_RATE as f32) as usize;

    (0..count)
        .map(|i| {
            let t = i as f32 / TONE_SAMPLE_RATE as f32;
            // Two voices whose pitches drift against each other
            let freq1 = 220.0 + (t * 0.5).sin() * 110.0;
            let freq2 = 440.0 + (t * 0.3).sin() * 220.0;
            (TAU * freq1 * t).sin() * 0.3 + (TAU * freq2 * t).sin() * 0.2
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_has_expected_length() {
        let tone = fallback_tone();
        assert_eq!(tone.len(), (TONE_SECONDS * TONE_SAMPLE_RATE as f32) as usize);
    }

    #[test]
    fn tone_stays_within_headroom() {
        let tone = fallback_tone();
        assert!(tone.iter().all(|s| s.abs() <= 0.5));
    }

    #[test]
    fn tone_is_not_silence() {
        let tone = fallback_tone();
        let peak = tone.iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(peak > 0.2);
    }
}
