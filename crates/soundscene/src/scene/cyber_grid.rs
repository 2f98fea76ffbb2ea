//! Glowing grid plane with floating nodes.
//!
//! A neon floor grid whose lines carry a traveling pulse, under a
//! swarm of nodes that bob at individual speeds and swell with their
//! spectrum slice.

use nannou::prelude::*;
use rand::Rng;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// World extent of the grid
const GRID_SIZE: f32 = 20.0;
/// Lines per axis
const DIVISIONS: usize = if cfg!(debug_assertions) { 20 } else { 30 };
/// Node cap
const MAX_NODES: usize = if cfg!(debug_assertions) { 80 } else { 200 };
/// Projected points per grid line
const LINE_STEPS: usize = 16;

struct Node {
    base_position: [f32; 3],
    position: [f32; 3],
    speed: f32,
    scale: f32,
    hue_t: f32,
}

pub struct CyberGrid {
    nodes: Vec<Node>,
    /// Phase of the pulse traveling across the grid lines
    pulse_phase: f32,
    hue_shift: f32,
    scheme: ColorScheme,
}

impl Default for CyberGrid {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            pulse_phase: 0.0,
            hue_shift: 0.0,
            scheme: ColorScheme::Neon,
        }
    }
}

impl CyberGrid {
    /// Height of the grid surface at `x` for the current pulse phase.
    fn line_height(&self, x: f32) -> f32 {
        (self.pulse_phase + x * 0.1).sin() * 0.1
    }
}

impl SceneVisual for CyberGrid {
    fn rebuild(&mut self, params: &SceneParams) {
        let mut rng = rand::rng();
        self.scheme = params.color_scheme;

        let count = params.particle_count.min(MAX_NODES);
        self.nodes = (0..count)
            .map(|i| {
                let base_position = [
                    rng.random_range(-GRID_SIZE / 2.0..GRID_SIZE / 2.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-GRID_SIZE / 2.0..GRID_SIZE / 2.0),
                ];
                Node {
                    base_position,
                    position: base_position,
                    speed: rng.random_range(0.1..0.3),
                    scale: 1.0,
                    hue_t: i as f32 / count.max(1) as f32,
                }
            })
            .collect();
    }

    fn update(&mut self, frame: &FrameInput) {
        self.pulse_phase += 0.03 + frame.beat.bands.bass * 0.1;
        self.hue_shift += 0.1 + frame.beat.bands.treble * 0.5;

        let count = self.nodes.len().max(1);
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.position[1] =
                node.base_position[1] + (frame.time * node.speed * 10.0).sin() * 0.5;
            node.position[0] =
                node.base_position[0] + (frame.time * node.speed * 7.0).cos() * 0.3;
            node.position[2] = node.base_position[2];

            let level = frame.snapshot.level_at(i as f32 / count as f32);
            node.scale = 1.0 + level * 0.5;
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        let grid_hue = self.scheme.hue_at(0.0) + self.hue_shift * 0.1;
        let grid_color = hsv_to_rgba(grid_hue, 1.0, 0.5, 0.6);
        let half = GRID_SIZE / 2.0;

        // Grid lines along both axes, sampled so the pulse curves them
        for i in 0..=DIVISIONS {
            let offset = (i as f32 / DIVISIONS as f32 - 0.5) * GRID_SIZE;

            let mut prev_x: Option<(Vec2, f32)> = None;
            let mut prev_z: Option<(Vec2, f32)> = None;
            for s in 0..=LINE_STEPS {
                let along = (s as f32 / LINE_STEPS as f32 - 0.5) * GRID_SIZE;
                let y = self.line_height(offset + along);

                // Line at x = offset running along z
                let p_x = camera.project([offset, y, along.clamp(-half, half)], bounds);
                if let (Some((a, _)), Some((b, _))) = (prev_x, p_x) {
                    draw.line().start(a).end(b).weight(1.0).color(grid_color);
                }
                prev_x = p_x;

                // Line at z = offset running along x
                let p_z = camera.project([along.clamp(-half, half), y, offset], bounds);
                if let (Some((a, _)), Some((b, _))) = (prev_z, p_z) {
                    draw.line().start(a).end(b).weight(1.0).color(grid_color);
                }
                prev_z = p_z;
            }
        }

        // Floating nodes
        for node in &self.nodes {
            if let Some((screen, depth)) = camera.project(node.position, bounds) {
                let size = (camera.scale_at(depth, bounds) * 0.08 * node.scale).clamp(1.0, 10.0);
                let hue = self.scheme.hue_at(node.hue_t) + self.hue_shift;

                draw.ellipse()
                    .xy(screen)
                    .w_h(size, size)
                    .color(hsv_to_rgba(hue, 0.9, 0.7, 0.8));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot, SPECTRUM_BINS};

    #[test]
    fn node_count_is_capped() {
        let mut scene = CyberGrid::default();
        scene.rebuild(&SceneParams::default());
        assert_eq!(scene.nodes.len(), MAX_NODES);

        let small = SceneParams {
            particle_count: 10,
            ..SceneParams::default()
        };
        scene.rebuild(&small);
        assert_eq!(scene.nodes.len(), 10);
    }

    #[test]
    fn nodes_swell_with_spectrum() {
        let mut scene = CyberGrid::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let hot = FrequencySnapshot::from_bytes(vec![255; SPECTRUM_BINS]);
        let beat = BeatInfo::default();
        let frame = FrameInput {
            snapshot: &hot,
            beat: &beat,
            time: 0.0,
            params: &params,
        };
        scene.update(&frame);

        assert!(scene.nodes.iter().all(|n| (n.scale - 1.5).abs() < 1e-3));
    }

    #[test]
    fn pulse_advances_each_frame() {
        let mut scene = CyberGrid::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let snapshot = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        let before = scene.pulse_phase;
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &beat,
            time: 0.0,
            params: &params,
        };
        scene.update(&frame);
        assert!(scene.pulse_phase > before);
    }
}
