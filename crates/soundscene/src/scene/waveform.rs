//! Oscillating 3D ribbon.
//!
//! A 128-point line whose vertical and depth displacement follow each
//! point's slice of the spectrum, twisting as time advances.

use nannou::prelude::*;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Points along the ribbon
const NUM_POINTS: usize = 128;
/// Spacing between points along x
const SPACING: f32 = 0.1;

pub struct Waveform3d {
    points: Vec<[f32; 3]>,
    hue_shift: f32,
    scheme: ColorScheme,
}

impl Default for Waveform3d {
    fn default() -> Self {
        Self {
            points: (0..NUM_POINTS)
                .map(|i| [(i as f32 - NUM_POINTS as f32 / 2.0) * SPACING, 0.0, 0.0])
                .collect(),
            hue_shift: 0.0,
            scheme: ColorScheme::Ocean,
        }
    }
}

impl SceneVisual for Waveform3d {
    fn rebuild(&mut self, params: &SceneParams) {
        self.scheme = params.color_scheme;
        for (i, p) in self.points.iter_mut().enumerate() {
            *p = [(i as f32 - NUM_POINTS as f32 / 2.0) * SPACING, 0.0, 0.0];
        }
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.2 + frame.beat.strength;

        for (i, p) in self.points.iter_mut().enumerate() {
            let level = frame.snapshot.level_at(i as f32 / NUM_POINTS as f32);
            let phase = frame.time * 2.0 + i as f32 * 0.1;

            p[1] = phase.sin() * level * 3.0;
            p[2] = phase.cos() * level * 2.0;
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        // Scale the ribbon up so it spans the view
        let projected: Vec<(Vec2, f32, f32)> = self
            .points
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                let world = [p[0] * 8.0, p[1], p[2]];
                camera
                    .project(world, bounds)
                    .map(|(screen, depth)| (screen, depth, i as f32 / NUM_POINTS as f32))
            })
            .collect();

        for pair in projected.windows(2) {
            let (p0, depth, t) = pair[0];
            let (p1, _, _) = pair[1];

            let weight = (camera.scale_at(depth, bounds) * 0.04).clamp(1.0, 4.0);
            let hue = self.scheme.hue_at(t) + self.hue_shift;

            draw.line()
                .start(p0)
                .end(p1)
                .weight(weight)
                .color(hsv_to_rgba(hue, 0.8, 0.8, 0.8));
        }
    }
}
