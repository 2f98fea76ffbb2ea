//! Circular spectrum bars.
//!
//! 64 bars arranged in a ring, each following its slice of the
//! spectrum, with a breathing glow core at the center.

use nannou::prelude::*;
use std::f32::consts::TAU;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Number of bars around the ring
const NUM_BARS: usize = 64;
/// Ring radius in world units
const RING_RADIUS: f32 = 6.0;
/// Resting bar height
const BASE_HEIGHT: f32 = 1.5;

struct Bar {
    angle: f32,
    /// Smoothed height multiplier
    height: f32,
    hue_t: f32,
}

pub struct SpectrumRing {
    bars: Vec<Bar>,
    /// Slow ring rotation independent of the camera orbit
    rotation: f32,
    /// Smoothed overall level driving the core glow
    core_level: f32,
    hue_shift: f32,
    scheme: ColorScheme,
}

impl Default for SpectrumRing {
    fn default() -> Self {
        let bars = (0..NUM_BARS)
            .map(|i| Bar {
                angle: i as f32 / NUM_BARS as f32 * TAU,
                height: 1.0,
                hue_t: i as f32 / NUM_BARS as f32,
            })
            .collect();

        Self {
            bars,
            rotation: 0.0,
            core_level: 0.0,
            hue_shift: 0.0,
            scheme: ColorScheme::Rainbow,
        }
    }
}

impl SceneVisual for SpectrumRing {
    fn rebuild(&mut self, params: &SceneParams) {
        self.scheme = params.color_scheme;
        for bar in &mut self.bars {
            bar.height = 1.0;
        }
        self.core_level = 0.0;
    }

    fn update(&mut self, frame: &FrameInput) {
        self.rotation += 0.002 + frame.beat.strength * 0.004;
        self.hue_shift += 0.1 * frame.params.speed_factor();

        let intensity = frame.params.intensity_factor();
        for (i, bar) in self.bars.iter_mut().enumerate() {
            let level = frame.snapshot.level_at(i as f32 / NUM_BARS as f32);
            let target = 1.0 + level * intensity * 0.5;
            bar.height = soundscene_core::mapper::attack_decay(bar.height, target, 0.6, 0.15);
        }

        self.core_level = self.core_level * 0.85 + frame.beat.strength * 0.15;
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        let scheme = self.scheme;

        for bar in &self.bars {
            let angle = bar.angle + self.rotation;
            let x = angle.cos() * RING_RADIUS;
            let z = angle.sin() * RING_RADIUS;
            let top = BASE_HEIGHT * bar.height;

            let base = camera.project([x, 0.0, z], bounds);
            let tip = camera.project([x, top, z], bounds);

            if let (Some((p0, depth)), Some((p1, _))) = (base, tip) {
                let weight = (camera.scale_at(depth, bounds) * 0.08).clamp(1.0, 8.0);
                let hue = scheme.hue_at(bar.hue_t) + self.hue_shift;
                let value = 0.5 + (bar.height - 1.0).min(1.0) * 0.5;

                draw.line()
                    .start(p0)
                    .end(p1)
                    .weight(weight)
                    .color(hsv_to_rgba(hue, 0.9, value, 0.85));
            }
        }

        // Breathing core glow
        if let Some((center, depth)) = camera.project([0.0, 0.5, 0.0], bounds) {
            let radius = camera.scale_at(depth, bounds) * (1.2 + self.core_level * 0.8);
            for i in 0..6 {
                let t = i as f32 / 6.0;
                draw.ellipse()
                    .xy(center)
                    .w_h(radius * (1.0 - t * 0.7), radius * (1.0 - t * 0.7))
                    .color(hsv_to_rgba(
                        180.0 + self.hue_shift,
                        0.4,
                        0.8,
                        0.05 + self.core_level * 0.1,
                    ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot, SPECTRUM_BINS};

    #[test]
    fn bars_rise_with_their_bins() {
        let mut scene = SpectrumRing::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        // All bins hot
        let snapshot = FrequencySnapshot::from_bytes(vec![255; SPECTRUM_BINS]);
        let beat = BeatInfo::default();
        for i in 0..30 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
        }

        assert!(scene.bars.iter().all(|b| b.height > 1.5));
    }

    #[test]
    fn rebuild_resets_heights() {
        let mut scene = SpectrumRing::default();
        scene.bars[0].height = 4.0;
        scene.rebuild(&SceneParams::default());
        assert_eq!(scene.bars[0].height, 1.0);
    }
}
