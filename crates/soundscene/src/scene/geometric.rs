//! Ring of primitive solids.
//!
//! Alternating cubes, spheres, cones, and tori orbiting the origin;
//! each scales with its slice of the spectrum and tumbles at a rate set
//! by the speed parameter.

use nannou::prelude::*;
use std::f32::consts::TAU;

use super::{hsv_to_rgba, Camera, FrameInput, SceneVisual};
use soundscene_core::mapper::bin_scale;
use soundscene_core::{ColorScheme, SceneParams};

#[derive(Clone, Copy, PartialEq)]
enum Shape {
    Cube,
    Sphere,
    Cone,
    Torus,
}

const SHAPES: [Shape; 4] = [Shape::Cube, Shape::Sphere, Shape::Cone, Shape::Torus];

struct Solid {
    shape: Shape,
    base_position: [f32; 3],
    position: [f32; 3],
    scale: f32,
    rotation: f32,
    hue_t: f32,
}

pub struct Geometric {
    solids: Vec<Solid>,
    hue_shift: f32,
    wireframe: bool,
    scheme: ColorScheme,
}

impl Default for Geometric {
    fn default() -> Self {
        Self {
            solids: Vec::new(),
            hue_shift: 0.0,
            wireframe: false,
            scheme: ColorScheme::Cyberpunk,
        }
    }
}

impl SceneVisual for Geometric {
    fn rebuild(&mut self, params: &SceneParams) {
        let count = (params.complexity.max(1.0) as usize).max(1);
        self.wireframe = params.wireframe;
        self.scheme = params.color_scheme;

        self.solids = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                let radius = 3.0 + (i as f32).sin() * 2.0;
                let base_position = [
                    angle.cos() * radius,
                    angle.sin() * 0.5,
                    angle.sin() * radius,
                ];

                Solid {
                    shape: SHAPES[i % SHAPES.len()],
                    base_position,
                    position: base_position,
                    scale: 1.0,
                    rotation: 0.0,
                    hue_t: i as f32 / count as f32,
                }
            })
            .collect();
    }

    fn update(&mut self, frame: &FrameInput) {
        self.hue_shift += 0.05 + 0.2 * frame.params.speed_factor();

        let intensity = frame.params.intensity_factor();
        let speed = frame.params.speed_factor();
        let count = self.solids.len().max(1);

        for (i, solid) in self.solids.iter_mut().enumerate() {
            let level = frame.snapshot.level_at(i as f32 / count as f32);

            solid.scale = bin_scale(level, intensity);
            solid.rotation = frame.time * speed * 0.6;

            // Orbit the base position with a gentle wobble
            solid.position[0] =
                solid.base_position[0] + (frame.time * 0.5 + i as f32).sin() * 0.5;
            solid.position[1] =
                solid.base_position[1] + (frame.time * 0.3 + i as f32).cos() * 0.5;
            solid.position[2] = solid.base_position[2];
        }
    }

    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        for solid in &self.solids {
            let (screen, depth) = match camera.project(solid.position, bounds) {
                Some(p) => p,
                None => continue,
            };

            let size = camera.scale_at(depth, bounds) * 0.7 * solid.scale;
            let hue = self.scheme.hue_at(solid.hue_t) + self.hue_shift;
            let color = hsv_to_rgba(hue, 0.8, 0.6, 0.7);

            match solid.shape {
                Shape::Cube => {
                    let rect = draw
                        .rect()
                        .xy(screen)
                        .w_h(size, size)
                        .rotate(solid.rotation);
                    if self.wireframe {
                        rect.no_fill().stroke(color).stroke_weight(1.5);
                    } else {
                        rect.color(color);
                    }
                }
                Shape::Sphere => {
                    let ellipse = draw.ellipse().xy(screen).w_h(size, size);
                    if self.wireframe {
                        ellipse.no_fill().stroke(color).stroke_weight(1.5);
                    } else {
                        ellipse.color(color);
                    }
                }
                Shape::Cone => {
                    let tri = draw
                        .tri()
                        .points(
                            pt2(0.0, size * 0.6),
                            pt2(-size * 0.5, -size * 0.4),
                            pt2(size * 0.5, -size * 0.4),
                        )
                        .xy(screen)
                        .rotate(solid.rotation);
                    if self.wireframe {
                        tri.no_fill().stroke(color).stroke_weight(1.5);
                    } else {
                        tri.color(color);
                    }
                }
                Shape::Torus => {
                    // A torus reads as a thick ring face-on
                    draw.ellipse()
                        .xy(screen)
                        .w_h(size, size)
                        .no_fill()
                        .stroke(color)
                        .stroke_weight((size * 0.15).max(1.5));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::{BeatInfo, FrequencySnapshot, SPECTRUM_BINS};

    #[test]
    fn complexity_sets_solid_count() {
        let mut scene = Geometric::default();
        let params = SceneParams {
            complexity: 9.0,
            ..SceneParams::default()
        };
        scene.rebuild(&params);
        assert_eq!(scene.solids.len(), 9);

        // Shapes alternate through the four kinds
        assert!(scene.solids[0].shape == Shape::Cube);
        assert!(scene.solids[1].shape == Shape::Sphere);
        assert!(scene.solids[4].shape == Shape::Cube);
    }

    #[test]
    fn scale_follows_spectrum() {
        let mut scene = Geometric::default();
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

        // 1 + 1.0 * 7.5 * 0.1
        assert!((scene.solids[0].scale - 1.75).abs() < 1e-3);
    }
}
