//! Concentric reactive rings.
//!
//! Eight flat tori around the origin: radius swells with the mid band,
//! a bass pulse travels outward ring by ring, treble shifts the hue,
//! and each ring's rim ripples with its stretch of the spectrum.

use nannou::prelude::*;
use std::f32::consts::TAU;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Number of concentric rings
const NUM_RINGS: usize = 8;
/// Rim segments drawn per ring
const SEGMENTS: usize = if cfg!(debug_assertions) { 48 } else { 64 };

struct Ring {
    base_radius: f32,
    /// Mid-driven swell, smoothed
    swell: f32,
    /// Bass pulse factor
    pulse: f32,
    /// Per-segment radial ripple offsets
    ripple: Vec<f32>,
}

pub struct Rings {
    rings: Vec<Ring>,
    hue_shift: f32,
    treble: f32,
    scheme: ColorScheme,
}

impl Default for Rings {
    fn default() -> Self {
        Self {
            rings: (0..NUM_RINGS)
                .map(|i| Ring {
                    base_radius: 2.0 + i as f32 * 1.5,
                    swell: 1.0,
                    pulse: 1.0,
                    ripple: vec![0.0; SEGMENTS],
                })
                .collect(),
            hue_shift: 0.0,
            treble: 0.0,
            scheme: ColorScheme::Cyberpunk,
        }
    }
}

impl SceneVisual for Rings {
    fn rebuild(&mut self, params: &SceneParams) {
        self.scheme = params.color_scheme;
        for ring in &mut self.rings {
            ring.swell = 1.0;
            ring.pulse = 1.0;
            ring.ripple.iter_mut().for_each(|r| *r = 0.0);
        }
    }

    fn update(&mut self, frame: &FrameInput) {
        let intensity = frame.params.intensity_factor();
        self.treble = self.treble * 0.8 + frame.beat.bands.treble * 0.2;
        self.hue_shift += 0.1 + self.treble * 0.5;

        for (i, ring) in self.rings.iter_mut().enumerate() {
            // Mid energy swells every ring
            let target = 1.0 + frame.beat.bands.mid * intensity * 0.1;
            ring.swell = ring.swell * 0.8 + target * 0.2;

            // Bass pulse phased outward per ring
            ring.pulse =
                1.0 + (frame.time * 4.0 + i as f32).sin() * frame.beat.bands.bass * 0.2;

            // Rim ripple from this ring's stretch of the spectrum
            for (s, offset) in ring.ripple.iter_mut().enumerate() {
                let t = (i * SEGMENTS + s) as f32 / (NUM_RINGS * SEGMENTS) as f32;
                let level = frame.snapshot.level_at(t);
                *offset = (frame.time * 2.0 + s as f32 * 0.5).sin() * level * 0.3;
            }
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        for (i, ring) in self.rings.iter().enumerate() {
            let radius = ring.base_radius * ring.swell * ring.pulse;
            let hue =
                self.scheme.hue_at(i as f32 / NUM_RINGS as f32) + self.hue_shift + self.treble * 180.0;
            let color = hsv_to_rgba(hue, 0.9, 0.6, 0.8);

            // Rim as a closed loop of segments lying in the floor plane
            let mut previous: Option<(Vec2, f32)> = None;
            for s in 0..=SEGMENTS {
                let seg = s % SEGMENTS;
                let angle = seg as f32 / SEGMENTS as f32 * TAU;
                let r = radius + ring.ripple[seg];
                let world = [angle.cos() * r, ring.ripple[seg] * 0.5, angle.sin() * r];

                let projected = camera.project(world, bounds);
                if let (Some((p0, depth)), Some((p1, _))) = (previous, projected) {
                    let weight = (camera.scale_at(depth, bounds) * 0.05).clamp(1.0, 4.0);
                    draw.line().start(p0).end(p1).weight(weight).color(color);
                }
                previous = projected;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BandLevels, BeatInfo, FrequencySnapshot};

    fn frame_with_mid(mid: f32) -> (FrequencySnapshot, BeatInfo, SceneParams) {
        let bands = BandLevels {
            mid,
            ..BandLevels::default()
        };
        let beat = BeatInfo {
            is_beat: false,
            strength: bands.average(),
            bands,
        };
        (FrequencySnapshot::silent(), beat, SceneParams::default())
    }

    #[test]
    fn mid_energy_swells_rings() {
        let mut scene = Rings::default();
        scene.rebuild(&SceneParams::default());

        let (snapshot, beat, params) = frame_with_mid(1.0);
        for i in 0..30 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
        }

        assert!(scene.rings.iter().all(|r| r.swell > 1.5));
    }

    #[test]
    fn silence_decays_back_to_rest() {
        let mut scene = Rings::default();
        scene.rebuild(&SceneParams::default());

        let (_, loud_beat, params) = frame_with_mid(1.0);
        let snapshot = FrequencySnapshot::silent();
        for i in 0..10 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &loud_beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
        }

        let quiet = BeatInfo::default();
        for i in 10..200 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &quiet,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
        }

        for ring in &scene.rings {
            assert!((ring.swell - 1.0).abs() < 0.01);
        }
    }
}
