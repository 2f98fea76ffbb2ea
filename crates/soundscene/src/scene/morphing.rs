//! Morphing solids.
//!
//! A loose ring of blobs whose outlines deform under two interacting
//! waves - one driven by each blob's spectrum slice, one by bass - with
//! a hard scale kick on every beat.

use nannou::prelude::*;
use std::f32::consts::TAU;
use rand::Rng;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Outline vertices per blob
const VERTICES: usize = 16;
/// Scale kick applied while a beat is active
const BEAT_KICK: f32 = 1.3;

struct Blob {
    center: [f32; 3],
    base_scale: f32,
    morph_speed: f32,
    /// Current radial offsets of the outline vertices
    offsets: Vec<f32>,
    scale: f32,
    hue_t: f32,
}

pub struct Morphing {
    blobs: Vec<Blob>,
    hue_shift: f32,
    wireframe: bool,
    scheme: ColorScheme,
}

impl Default for Morphing {
    fn default() -> Self {
        Self {
            blobs: Vec::new(),
            hue_shift: 0.0,
            wireframe: false,
            scheme: ColorScheme::Plasma,
        }
    }
}

impl SceneVisual for Morphing {
    fn rebuild(&mut self, params: &SceneParams) {
        let mut rng = rand::rng();
        let count = ((params.complexity * 2.0).max(1.0)) as usize;
        self.wireframe = params.wireframe;
        self.scheme = params.color_scheme;

        self.blobs = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                let radius = 3.0 + (i as f32).sin() * 2.0;

                Blob {
                    center: [
                        angle.cos() * radius,
                        angle.sin() * 0.5,
                        angle.sin() * radius,
                    ],
                    base_scale: rng.random_range(0.5..1.0),
                    morph_speed: 0.5 + rng.random_range(0.0..1.0) * params.morph_factor() * 2.0,
                    offsets: vec![0.0; VERTICES],
                    scale: 1.0,
                    hue_t: i as f32 / count as f32 * 0.8,
                }
            })
            .collect();
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.05;
        let bass = frame.beat.bands.bass;
        let count = self.blobs.len().max(1);
        let beat_active = frame.params.beat_detection && frame.beat.is_beat;

        for (i, blob) in self.blobs.iter_mut().enumerate() {
            let level = frame.snapshot.level_at(i as f32 / count as f32);

            for (v, offset) in blob.offsets.iter_mut().enumerate() {
                let wave1 =
                    (frame.time * blob.morph_speed + v as f32 * 0.8).sin() * level * 0.5;
                let wave2 =
                    (frame.time * blob.morph_speed * 0.8 + v as f32 * 0.4).cos() * bass * 0.3;
                *offset = wave1 + wave2;
            }

            let kick = if beat_active { BEAT_KICK } else { 1.0 };
            blob.scale = blob.base_scale * kick;
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        for blob in &self.blobs {
            let (screen, depth) = match camera.project(blob.center, bounds) {
                Some(p) => p,
                None => continue,
            };

            let size = camera.scale_at(depth, bounds) * 0.8 * blob.scale;
            let hue = self.scheme.hue_at(blob.hue_t) + self.hue_shift;
            let color = hsv_to_rgba(hue, 0.9, 0.6, 0.7);

            let outline: Vec<Vec2> = (0..VERTICES)
                .map(|v| {
                    let angle = v as f32 / VERTICES as f32 * TAU;
                    let r = size * (1.0 + blob.offsets[v]);
                    screen + vec2(angle.cos() * r, angle.sin() * r)
                })
                .collect();

            if self.wireframe {
                draw.polyline()
                    .weight(1.5)
                    .points_closed(outline)
                    .color(color);
            } else {
                draw.polygon().points(outline).color(color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BandLevels, BeatInfo, FrequencySnapshot};

    #[test]
    fn complexity_doubles_into_blob_count() {
        let mut scene = Morphing::default();
        let params = SceneParams {
            complexity: 6.0,
            ..SceneParams::default()
        };
        scene.rebuild(&params);
        assert_eq!(scene.blobs.len(), 12);
    }

    #[test]
    fn beat_kicks_the_scale() {
        let mut scene = Morphing::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let snapshot = FrequencySnapshot::silent();
        let quiet = BeatInfo::default();
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &quiet,
            time: 0.0,
            params: &params,
        };
        scene.update(&frame);
        let resting: Vec<f32> = scene.blobs.iter().map(|b| b.scale).collect();

        let hit = BeatInfo {
            is_beat: true,
            strength: 0.8,
            bands: BandLevels::default(),
        };
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &hit,
            time: 0.1,
            params: &params,
        };
        scene.update(&frame);

        for (blob, rest) in scene.blobs.iter().zip(resting) {
            assert!((blob.scale - rest * BEAT_KICK).abs() < 1e-6);
        }
    }

    #[test]
    fn beat_detection_toggle_disables_the_kick() {
        let mut scene = Morphing::default();
        let params = SceneParams {
            beat_detection: false,
            ..SceneParams::default()
        };
        scene.rebuild(&params);

        let snapshot = FrequencySnapshot::silent();
        let hit = BeatInfo {
            is_beat: true,
            strength: 0.8,
            bands: BandLevels::default(),
        };
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &hit,
            time: 0.0,
            params: &params,
        };
        scene.update(&frame);

        for blob in &scene.blobs {
            assert!((blob.scale - blob.base_scale).abs() < 1e-6);
        }
    }
}
