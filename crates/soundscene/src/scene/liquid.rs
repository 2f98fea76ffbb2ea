//! Liquid surface.
//!
//! A height-field sheet disturbed by several drifting harmonic wave
//! centers plus per-vertex audio influence, with spray particles rising
//! off the surface and a handful of glossy orbs orbiting above it.

use nannou::prelude::*;
use std::f32::consts::TAU;
use rand::Rng;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Vertices per side of the surface grid
const RESOLUTION: usize = if cfg!(debug_assertions) { 28 } else { 48 };
/// World extent of the surface
const EXTENT: f32 = 10.0;
/// Harmonic wave sources
const WAVE_CENTERS: usize = 8;
/// Orbiting orbs above the surface
const ORB_COUNT: usize = 5;
/// Spray particle cap
const MAX_SPRAY: usize = if cfg!(debug_assertions) { 300 } else { 1000 };

struct WaveCenter {
    x: f32,
    z: f32,
    phase: f32,
    frequency: f32,
    amplitude: f32,
}

struct Spray {
    position: [f32; 3],
    velocity: [f32; 3],
    hue_t: f32,
}

struct Orb {
    orbit_radius: f32,
    orbit_angle: f32,
    speed: f32,
    bob_offset: f32,
    position: [f32; 3],
    scale: f32,
}

pub struct Liquid {
    /// Current surface heights, row-major
    heights: Vec<f32>,
    wave_centers: Vec<WaveCenter>,
    spray: Vec<Spray>,
    orbs: Vec<Orb>,
    hue_shift: f32,
    scheme: ColorScheme,
    fluidity: f32,
}

impl Default for Liquid {
    fn default() -> Self {
        Self {
            heights: vec![0.0; RESOLUTION * RESOLUTION],
            wave_centers: Vec::new(),
            spray: Vec::new(),
            orbs: Vec::new(),
            hue_shift: 0.0,
            scheme: ColorScheme::Ocean,
            fluidity: 0.5,
        }
    }
}

impl Liquid {
    fn vertex_world(&self, row: usize, col: usize) -> [f32; 3] {
        let x = (col as f32 / (RESOLUTION - 1) as f32 - 0.5) * EXTENT;
        let z = (row as f32 / (RESOLUTION - 1) as f32 - 0.5) * EXTENT;
        [x, self.heights[row * RESOLUTION + col], z]
    }
}

impl SceneVisual for Liquid {
    fn rebuild(&mut self, params: &SceneParams) {
        let mut rng = rand::rng();
        self.scheme = params.color_scheme;
        self.fluidity = params.fluidity_factor();
        self.heights.iter_mut().for_each(|h| *h = 0.0);

        self.wave_centers = (0..WAVE_CENTERS)
            .map(|_| WaveCenter {
                x: rng.random_range(-5.0..5.0),
                z: rng.random_range(-5.0..5.0),
                phase: rng.random_range(0.0..TAU),
                frequency: rng.random_range(0.5..2.5),
                amplitude: rng.random_range(0.3..0.7),
            })
            .collect();

        let spray_count = params.particle_count.min(MAX_SPRAY);
        self.spray = (0..spray_count)
            .map(|_| Spray {
                position: [
                    rng.random_range(-5.0..5.0),
                    rng.random_range(0.0..3.0),
                    rng.random_range(-5.0..5.0),
                ],
                velocity: [
                    rng.random_range(-0.01..0.01),
                    rng.random_range(0.005..0.015),
                    rng.random_range(-0.01..0.01),
                ],
                hue_t: rng.random_range(0.0..1.0),
            })
            .collect();

        self.orbs = (0..ORB_COUNT)
            .map(|_| Orb {
                orbit_radius: rng.random_range(2.0..5.0),
                orbit_angle: rng.random_range(0.0..TAU),
                speed: rng.random_range(0.3..0.8),
                bob_offset: rng.random_range(0.0..TAU),
                position: [0.0, 1.5, 0.0],
                scale: 1.0,
            })
            .collect();
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.05 + frame.beat.strength * 0.2;
        let time = frame.time;
        let breath = 1.0 + (time * 0.5).sin() * 0.3;

        // Surface heights: harmonic waves plus audio influence
        for row in 0..RESOLUTION {
            for col in 0..RESOLUTION {
                let idx = row * RESOLUTION + col;
                let x = (col as f32 / (RESOLUTION - 1) as f32 - 0.5) * EXTENT;
                let z = (row as f32 / (RESOLUTION - 1) as f32 - 0.5) * EXTENT;

                let mut wave = 0.0;
                for center in &self.wave_centers {
                    let dx = x - center.x;
                    let dz = z - center.z;
                    let distance = (dx * dx + dz * dz).sqrt();
                    wave += (distance * 2.0 - (time + center.phase) * center.frequency).sin()
                        * center.amplitude
                        * breath;
                }

                let level = frame
                    .snapshot
                    .level_at(idx as f32 / (RESOLUTION * RESOLUTION) as f32);
                let audio = level * self.fluidity * 1.5;

                self.heights[idx] =
                    wave * 0.6 + audio + (time * 0.3 + idx as f32 * 0.01).sin() * 0.1;
            }
        }

        // Spray drifts up with audio-driven sideways push, wrapping at
        // the surface bounds
        let average = frame.snapshot.average();
        let spray_len = self.spray.len();
        for (i, spray) in self.spray.iter_mut().enumerate() {
            let force = frame
                .snapshot
                .level_at(i as f32 / spray_len.max(1) as f32)
                * 0.02;

            spray.position[0] += spray.velocity[0] + (time + i as f32 * 0.01).sin() * force;
            spray.position[1] += spray.velocity[1] + (time * 0.5 + i as f32 * 0.01).sin() * 0.008;
            spray.position[2] += spray.velocity[2] + (time + i as f32 * 0.01).cos() * force;

            if spray.position[0].abs() > 5.5 {
                spray.position[0] = -spray.position[0].signum() * 5.5;
            }
            if spray.position[2].abs() > 5.5 {
                spray.position[2] = -spray.position[2].signum() * 5.5;
            }
            if spray.position[1] > 3.5 {
                spray.position[1] = -0.5;
            }
        }

        // Orbs orbit and bob; scale follows the average level
        for orb in &mut self.orbs {
            orb.orbit_angle += orb.speed * 0.002;
            orb.position = [
                orb.orbit_angle.cos() * orb.orbit_radius,
                1.5 + (time * 0.8 + orb.bob_offset).sin() * 0.5,
                orb.orbit_angle.sin() * orb.orbit_radius,
            ];
            orb.scale = 1.0 + average * 0.3;
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        let base_hue = self.scheme.base_hue() + self.hue_shift * 0.2;

        // Surface as projected row polylines
        for row in 0..RESOLUTION {
            let mut previous: Option<(Vec2, f32)> = None;
            for col in 0..RESOLUTION {
                let world = self.vertex_world(row, col);
                let height = world[1];
                let projected = camera.project(world, bounds);

                if let (Some((p0, depth)), Some((p1, _))) = (previous, projected) {
                    let value = 0.35 + (height * 0.25 + 0.25).clamp(0.0, 0.45);
                    draw.line()
                        .start(p0)
                        .end(p1)
                        .weight((camera.scale_at(depth, bounds) * 0.02).clamp(0.5, 2.0))
                        .color(hsv_to_rgba(base_hue, 0.75, value, 0.7));
                }
                previous = projected;
            }
        }

        // Spray
        for spray in &self.spray {
            if let Some((screen, depth)) = camera.project(spray.position, bounds) {
                let size = (camera.scale_at(depth, bounds) * 0.03).clamp(0.5, 3.0);
                let hue = base_hue + spray.hue_t * 30.0;
                draw.ellipse()
                    .xy(screen)
                    .w_h(size, size)
                    .color(hsv_to_rgba(hue, 0.8, 0.7, 0.6));
            }
        }

        // Orbs with a glow pass underneath
        for orb in &self.orbs {
            if let Some((screen, depth)) = camera.project(orb.position, bounds) {
                let size = camera.scale_at(depth, bounds) * 0.25 * orb.scale;
                let hue = base_hue + 20.0;

                draw.ellipse()
                    .xy(screen)
                    .w_h(size * 2.0, size * 2.0)
                    .color(hsv_to_rgba(hue, 0.6, 0.5, 0.2));
                draw.ellipse()
                    .xy(screen)
                    .w_h(size, size)
                    .color(hsv_to_rgba(hue, 0.8, 0.8, 0.9));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot, SPECTRUM_BINS};

    #[test]
    fn rebuild_seeds_wave_centers_and_orbs() {
        let mut scene = Liquid::default();
        scene.rebuild(&SceneParams::default());

        assert_eq!(scene.wave_centers.len(), WAVE_CENTERS);
        assert_eq!(scene.orbs.len(), ORB_COUNT);
        assert_eq!(scene.spray.len(), MAX_SPRAY.min(3000));
    }

    #[test]
    fn audio_raises_the_surface() {
        let mut scene = Liquid::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let silent = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        let frame = FrameInput {
            snapshot: &silent,
            beat: &beat,
            time: 1.0,
            params: &params,
        };
        scene.update(&frame);
        let quiet_mean: f32 =
            scene.heights.iter().sum::<f32>() / scene.heights.len() as f32;

        let hot = FrequencySnapshot::from_bytes(vec![255; SPECTRUM_BINS]);
        let frame = FrameInput {
            snapshot: &hot,
            beat: &beat,
            time: 1.0,
            params: &params,
        };
        scene.update(&frame);
        let loud_mean: f32 =
            scene.heights.iter().sum::<f32>() / scene.heights.len() as f32;

        assert!(loud_mean > quiet_mean + 0.3);
    }

    #[test]
    fn spray_wraps_inside_bounds() {
        let mut scene = Liquid::default();
        let params = SceneParams::default();
        scene.rebuild(&params);

        let snapshot = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        for i in 0..600 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            scene.update(&frame);
        }

        for spray in &scene.spray {
            assert!(spray.position[0].abs() <= 5.6);
            assert!(spray.position[1] <= 3.6);
            assert!(spray.position[2].abs() <= 5.6);
        }
    }
}
