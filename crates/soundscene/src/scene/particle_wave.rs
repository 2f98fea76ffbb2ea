//! Particle field rippling on a plane.
//!
//! A sheet of particles whose vertical displacement follows each
//! particle's slice of the spectrum, producing a traveling wave across
//! the field.

use nannou::prelude::*;
use rand::Rng;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::{ColorScheme, SceneParams};

/// Hard particle cap
const MAX_PARTICLES: usize = if cfg!(debug_assertions) { 1200 } else { 5000 };

struct Particle {
    /// Resting position on the sheet
    origin: [f32; 3],
    /// Current displaced position
    position: [f32; 3],
    /// Fraction through the spectrum this particle follows
    bin_t: f32,
    hue_t: f32,
}

pub struct ParticleWave {
    particles: Vec<Particle>,
    hue_shift: f32,
    scheme: ColorScheme,
}

impl Default for ParticleWave {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            hue_shift: 0.0,
            scheme: ColorScheme::Rainbow,
        }
    }
}

impl SceneVisual for ParticleWave {
    fn rebuild(&mut self, params: &SceneParams) {
        let mut rng = rand::rng();
        let count = params.particle_count.min(MAX_PARTICLES);
        self.scheme = params.color_scheme;

        self.particles = (0..count)
            .map(|i| {
                let origin = [
                    rng.random_range(-10.0..10.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-10.0..10.0),
                ];
                Particle {
                    origin,
                    position: origin,
                    bin_t: i as f32 / count.max(1) as f32,
                    hue_t: rng.random_range(0.0..1.0),
                }
            })
            .collect();
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.1 + frame.beat.strength * 0.5;

        for particle in &mut self.particles {
            let level = frame.snapshot.level_at(particle.bin_t);
            // Wave travels along x; amplitude follows the particle's bin
            let wave = (frame.time * 2.0 + particle.origin[0] * 0.5).sin() * level * 2.0;

            particle.position[0] = particle.origin[0];
            particle.position[1] = particle.origin[1] + wave;
            particle.position[2] = particle.origin[2];
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        for particle in &self.particles {
            if let Some((screen, depth)) = camera.project(particle.position, bounds) {
                let size = (camera.scale_at(depth, bounds) * 0.05).clamp(1.0, 5.0);
                let hue = self.scheme.hue_at(particle.hue_t) + self.hue_shift;

                draw.ellipse()
                    .xy(screen)
                    .w_h(size, size)
                    .color(hsv_to_rgba(hue, 0.9, 0.6, 0.8));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot, SPECTRUM_BINS};

    #[test]
    fn rebuild_honors_particle_count() {
        let mut scene = ParticleWave::default();
        let params = SceneParams {
            particle_count: 100,
            ..SceneParams::default()
        };
        scene.rebuild(&params);
        assert_eq!(scene.particles.len(), 100);

        // Requests above the cap are clamped
        let huge = SceneParams {
            particle_count: 1_000_000,
            ..SceneParams::default()
        };
        scene.rebuild(&huge);
        assert_eq!(scene.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn silent_audio_leaves_particles_at_rest() {
        let mut scene = ParticleWave::default();
        scene.rebuild(&SceneParams::default());

        let snapshot = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        let params = SceneParams::default();
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &beat,
            time: 1.23,
            params: &params,
        };
        scene.update(&frame);

        for p in &scene.particles {
            assert_eq!(p.position, p.origin);
        }
    }

    #[test]
    fn hot_spectrum_displaces_particles() {
        let mut scene = ParticleWave::default();
        scene.rebuild(&SceneParams::default());

        let snapshot = FrequencySnapshot::from_bytes(vec![255; SPECTRUM_BINS]);
        let beat = BeatInfo::default();
        let params = SceneParams::default();
        let frame = FrameInput {
            snapshot: &snapshot,
            beat: &beat,
            time: 0.4,
            params: &params,
        };
        scene.update(&frame);

        let moved = scene
            .particles
            .iter()
            .filter(|p| (p.position[1] - p.origin[1]).abs() > 0.01)
            .count();
        assert!(moved > scene.particles.len() / 2);
    }
}
