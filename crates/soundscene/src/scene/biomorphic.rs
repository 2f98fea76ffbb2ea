//! Biomorphic branching structure.
//!
//! Recursive trunks splitting into limbs, flattened at build time into
//! a segment list. Segments pulse on individual phases, sway gently,
//! and take their hue from branch depth plus their spectrum slice.

use nannou::prelude::*;
use std::f32::consts::TAU;
use rand::Rng;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Hard limits keeping the recursion affordable
const MAX_TRUNKS: usize = 8;
const MAX_DEPTH: usize = 5;
const MAX_CHILDREN: usize = 3;

struct Segment {
    start: [f32; 3],
    end: [f32; 3],
    depth: usize,
    pulse_phase: f32,
    /// Current pulse scale applied to the segment length
    pulse: f32,
    /// Lateral sway offset
    sway: f32,
    /// This depth's spectrum level, shifting the segment's hue
    level: f32,
}

pub struct Biomorphic {
    segments: Vec<Segment>,
    max_depth: usize,
    hue_shift: f32,
    scheme: ColorScheme,
}

impl Default for Biomorphic {
    fn default() -> Self {
        Self {
            segments: Vec::new(),
            max_depth: 3,
            hue_shift: 0.0,
            scheme: ColorScheme::Forest,
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt().max(1e-6);
    [v[0] / len, v[1] / len, v[2] / len]
}

impl Biomorphic {
    #[allow(clippy::too_many_arguments)]
    fn grow(
        segments: &mut Vec<Segment>,
        rng: &mut impl Rng,
        depth: usize,
        max_depth: usize,
        children: usize,
        start: [f32; 3],
        direction: [f32; 3],
    ) {
        if depth > max_depth {
            return;
        }

        let length = 1.5 / (depth + 1) as f32;
        let end = [
            start[0] + direction[0] * length,
            start[1] + direction[1] * length,
            start[2] + direction[2] * length,
        ];

        segments.push(Segment {
            start,
            end,
            depth,
            pulse_phase: rng.random_range(0.0..TAU),
            pulse: 1.0,
            sway: 0.0,
            level: 0.0,
        });

        if depth < max_depth {
            for c in 0..children {
                let angle = c as f32 / children as f32 * TAU;
                let child_direction = normalize([
                    angle.cos() * 0.5,
                    angle.sin() * 0.3 + 0.4,
                    rng.random_range(-0.25..0.25),
                ]);
                Self::grow(
                    segments,
                    rng,
                    depth + 1,
                    max_depth,
                    children,
                    end,
                    child_direction,
                );
            }
        }
    }
}

impl SceneVisual for Biomorphic {
    fn rebuild(&mut self, params: &SceneParams) {
        let mut rng = rand::rng();
        self.scheme = params.color_scheme;

        let trunks = ((params.complexity * 3.0) as usize).clamp(1, MAX_TRUNKS);
        self.max_depth = (3 + (params.complexity / 2.0) as usize).min(MAX_DEPTH);
        let children = (2 + params.pattern_density as usize / 3).min(MAX_CHILDREN);

        self.segments.clear();
        for i in 0..trunks {
            let angle = i as f32 / trunks as f32 * TAU;
            let root = [
                angle.cos() * 1.5,
                (i as f32).sin() * 0.5,
                angle.sin() * 1.5,
            ];
            let direction = normalize([
                angle.cos() * 0.5,
                rng.random_range(-0.15..0.15) + 0.5,
                angle.sin() * 0.5,
            ]);

            Self::grow(
                &mut self.segments,
                &mut rng,
                0,
                self.max_depth,
                children,
                root,
                direction,
            );
        }
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.02;
        let time = frame.time;

        let depth_span = (self.max_depth + 1) as f32;
        for segment in &mut self.segments {
            segment.pulse = (time * 1.5 + segment.pulse_phase).sin() * 0.05 + 1.0;
            segment.sway = (time * 0.3 + segment.depth as f32).sin() * 0.05;
            segment.level = frame
                .snapshot
                .level_at(segment.depth as f32 / depth_span);
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        let depth_span = (self.max_depth + 1) as f32;

        for segment in &self.segments {
            // Pulse stretches the segment from its base
            let end = [
                segment.start[0]
                    + (segment.end[0] - segment.start[0]) * segment.pulse
                    + segment.sway,
                segment.start[1] + (segment.end[1] - segment.start[1]) * segment.pulse,
                segment.start[2]
                    + (segment.end[2] - segment.start[2]) * segment.pulse
                    + segment.sway,
            ];

            let p0 = camera.project(segment.start, bounds);
            let p1 = camera.project(end, bounds);

            if let (Some((a, depth)), Some((b, _))) = (p0, p1) {
                let weight = (camera.scale_at(depth, bounds)
                    * (0.05 - segment.depth as f32 * 0.007).max(0.01))
                .clamp(0.5, 6.0);

                let hue = self.scheme.base_hue()
                    + segment.depth as f32 / depth_span * self.scheme.hue_span()
                    + segment.level * 36.0
                    + self.hue_shift;

                draw.line()
                    .start(a)
                    .end(b)
                    .weight(weight)
                    .color(hsv_to_rgba(hue, 0.8, 0.5, 0.8));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot};

    #[test]
    fn rebuild_respects_hard_limits() {
        let mut scene = Biomorphic::default();
        let params = SceneParams {
            complexity: 100.0,
            pattern_density: 100.0,
            ..SceneParams::default()
        };
        scene.rebuild(&params);

        assert!(!scene.segments.is_empty());
        assert!(scene.segments.iter().all(|s| s.depth <= MAX_DEPTH));

        // Segment count is bounded by trunks * sum of children^depth
        let worst = MAX_TRUNKS
            * (0..=MAX_DEPTH)
                .map(|d| MAX_CHILDREN.pow(d as u32))
                .sum::<usize>();
        assert!(scene.segments.len() <= worst);
    }

    #[test]
    fn low_complexity_builds_a_small_structure() {
        let mut scene = Biomorphic::default();
        let params = SceneParams {
            complexity: 1.0,
            pattern_density: 0.0,
            ..SceneParams::default()
        };
        scene.rebuild(&params);

        let trunks = scene.segments.iter().filter(|s| s.depth == 0).count();
        assert_eq!(trunks, 3);
    }

    #[test]
    fn pulse_stays_near_unity() {
        let mut scene = Biomorphic::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let snapshot = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        for i in 0..120 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
            for segment in &scene.segments {
                assert!((segment.pulse - 1.0).abs() <= 0.05 + 1e-6);
            }
        }
    }
}
