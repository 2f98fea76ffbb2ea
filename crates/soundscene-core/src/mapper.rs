//! Mapping from beat state to per-frame visual gains.
//!
//! Scene elements declare what they respond to; the mapper turns the
//! current `BeatInfo` into the multiplier applied to their intensity,
//! scale, and motion each frame.

use serde::{Deserialize, Serialize};

use crate::beat::BeatInfo;

/// Which part of the analysis an element follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTarget {
    Bass,
    Mid,
    Treble,
    Beat,
    #[default]
    Overall,
}

impl ResponseTarget {
    pub const ALL: [ResponseTarget; 5] = [
        ResponseTarget::Bass,
        ResponseTarget::Mid,
        ResponseTarget::Treble,
        ResponseTarget::Beat,
        ResponseTarget::Overall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ResponseTarget::Bass => "bass",
            ResponseTarget::Mid => "mid",
            ResponseTarget::Treble => "treble",
            ResponseTarget::Beat => "beat",
            ResponseTarget::Overall => "overall",
        }
    }
}

/// Gain for a responsive element this frame.
///
/// Band and overall targets scale 1-3 with the level; the beat target is
/// a hard 2x while a beat is active.
pub fn response_gain(target: ResponseTarget, beat: &BeatInfo) -> f32 {
    match target {
        ResponseTarget::Bass => 1.0 + beat.bands.bass * 2.0,
        ResponseTarget::Mid => 1.0 + beat.bands.mid * 2.0,
        ResponseTarget::Treble => 1.0 + beat.bands.treble * 2.0,
        ResponseTarget::Beat => {
            if beat.is_beat {
                2.0
            } else {
                1.0
            }
        }
        ResponseTarget::Overall => 1.0 + beat.strength * 2.0,
    }
}

/// Per-frame transform deltas derived from one element's gain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResponseUpdate {
    /// Uniform scale multiplier
    pub scale: f32,
    /// Positional wobble amplitude in world units
    pub wobble: f32,
    /// Additional rotation this frame, radians
    pub spin: f32,
    /// Hue shift in degrees
    pub hue_shift: f32,
}

impl ResponseUpdate {
    /// Identity update - element at rest.
    pub fn rest() -> Self {
        Self {
            scale: 1.0,
            wobble: 0.0,
            spin: 0.0,
            hue_shift: 0.0,
        }
    }
}

/// Compute the transform deltas for an element. `reaction` stretches how
/// hard the element leans into its gain (0-1, from the scene params).
pub fn respond(target: ResponseTarget, beat: &BeatInfo, reaction: f32) -> ResponseUpdate {
    let gain = response_gain(target, beat);
    let drive = (gain - 1.0) * reaction.clamp(0.0, 1.0);

    ResponseUpdate {
        scale: 1.0 + drive,
        wobble: drive * 0.25,
        spin: 0.01 + drive * 0.04,
        hue_shift: drive * 30.0,
    }
}

/// Asymmetric smoothing: fast attack, slow decay. The idiom every scene
/// uses to follow levels without flicker.
pub fn attack_decay(current: f32, target: f32, attack: f32, decay: f32) -> f32 {
    if target > current {
        current * (1.0 - attack) + target * attack
    } else {
        current * (1.0 - decay) + target * decay
    }
}

/// Scale factor for an object driven by one bin value.
pub fn bin_scale(level: f32, intensity: f32) -> f32 {
    1.0 + level * intensity * 0.1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bands::BandLevels;

    fn beat_info(bass: f32, mid: f32, treble: f32, is_beat: bool) -> BeatInfo {
        let bands = BandLevels {
            bass,
            low_mid: 0.0,
            mid,
            high_mid: 0.0,
            treble,
        };
        BeatInfo {
            is_beat,
            strength: bands.average(),
            bands,
        }
    }

    #[test]
    fn band_gains_scale_with_level() {
        let info = beat_info(0.5, 0.25, 1.0, false);

        assert_eq!(response_gain(ResponseTarget::Bass, &info), 2.0);
        assert_eq!(response_gain(ResponseTarget::Mid, &info), 1.5);
        assert_eq!(response_gain(ResponseTarget::Treble, &info), 3.0);
    }

    #[test]
    fn beat_gain_is_binary() {
        let quiet = beat_info(1.0, 1.0, 1.0, false);
        let hit = beat_info(0.0, 0.0, 0.0, true);

        assert_eq!(response_gain(ResponseTarget::Beat, &quiet), 1.0);
        assert_eq!(response_gain(ResponseTarget::Beat, &hit), 2.0);
    }

    #[test]
    fn silence_maps_to_identity() {
        let info = beat_info(0.0, 0.0, 0.0, false);

        for target in ResponseTarget::ALL {
            assert_eq!(response_gain(target, &info), 1.0);
        }
        let update = respond(ResponseTarget::Overall, &info, 1.0);
        assert_eq!(update.scale, 1.0);
        assert_eq!(update.wobble, 0.0);
        assert_eq!(update.hue_shift, 0.0);
    }

    #[test]
    fn reaction_scales_the_drive() {
        let info = beat_info(1.0, 0.0, 0.0, false);

        let full = respond(ResponseTarget::Bass, &info, 1.0);
        let half = respond(ResponseTarget::Bass, &info, 0.5);

        assert!((full.scale - 3.0).abs() < 1e-6);
        assert!((half.scale - 2.0).abs() < 1e-6);
        assert!(full.wobble > half.wobble);
    }

    #[test]
    fn attack_decay_is_asymmetric() {
        // Rising input follows fast
        let up = attack_decay(0.0, 1.0, 0.7, 0.15);
        assert!((up - 0.7).abs() < 1e-6);

        // Falling input releases slowly
        let down = attack_decay(1.0, 0.0, 0.7, 0.15);
        assert!((down - 0.85).abs() < 1e-6);
    }
}
