//! Ambient element layer.
//!
//! Renders the scene's `ElementSet` - background, grid floor, lights,
//! and free-moving props - applying each element's mapper gain to its
//! intensity and motion. This is where the response-target
//! configuration becomes visible on screen.

use nannou::prelude::*;
use std::f32::consts::TAU;
use rand::Rng;
use std::collections::HashMap;

use super::Camera;
use soundscene_core::element::{Customization, MovementKind};
use soundscene_core::mapper::{attack_decay, response_gain};
use soundscene_core::{BeatInfo, ElementSet, SceneParams};

/// Background gradient strips
const GRADIENT_STRIPS: usize = 24;
/// Dust particles backing a particles element
const DUST_COUNT: usize = if cfg!(debug_assertions) { 60 } else { 150 };

struct Dust {
    position: [f32; 3],
    drift_phase: f32,
}

/// Smoothed per-element gain plus the drawing state for prop elements.
pub struct ElementLayer {
    elements: ElementSet,
    /// Smoothed mapper gain per element id
    gains: HashMap<String, f32>,
    dust: Vec<Dust>,
    time: f32,
}

impl ElementLayer {
    pub fn new(elements: ElementSet) -> Self {
        let mut layer = Self {
            elements,
            gains: HashMap::new(),
            dust: Vec::new(),
            time: 0.0,
        };
        layer.reseed();
        layer
    }

    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    pub fn elements_mut(&mut self) -> &mut ElementSet {
        &mut self.elements
    }

    /// Replace the element set (preset load) and reseed prop state.
    pub fn set_elements(&mut self, elements: ElementSet) {
        self.elements = elements;
        self.gains.clear();
        self.reseed();
    }

    fn reseed(&mut self) {
        let mut rng = rand::rng();
        self.dust = (0..DUST_COUNT)
            .map(|_| Dust {
                position: [
                    rng.random_range(-8.0..8.0),
                    rng.random_range(-2.0..5.0),
                    rng.random_range(-8.0..8.0),
                ],
                drift_phase: rng.random_range(0.0..TAU),
            })
            .collect();
    }

    /// Advance the smoothed gains from this frame's beat state.
    pub fn update(&mut self, beat: &BeatInfo, time: f32, params: &SceneParams) {
        self.time = time;
        let reaction = 0.3 + params.reaction_factor() * 0.7;

        for element in self.elements.iter() {
            let target = match element.response() {
                Some(response) => {
                    let raw = response_gain(response, beat);
                    1.0 + (raw - 1.0) * reaction
                }
                None => 1.0,
            };

            let entry = self.gains.entry(element.id.clone()).or_insert(1.0);
            *entry = attack_decay(*entry, target, 0.5, 0.1);
        }
    }

    fn gain(&self, id: &str) -> f32 {
        self.gains.get(id).copied().unwrap_or(1.0)
    }

    /// Draw the background element. Called before the scene visual.
    pub fn draw_background(&self, draw: &Draw, bounds: Rect) {
        for element in self.elements.iter_visible() {
            if let Customization::Background {
                color,
                opacity,
                gradient,
            } = &element.customization
            {
                match gradient {
                    Some([top, bottom]) => {
                        let strip_h = bounds.h() / GRADIENT_STRIPS as f32;
                        for i in 0..GRADIENT_STRIPS {
                            let t = i as f32 / (GRADIENT_STRIPS - 1) as f32;
                            let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
                            let y = bounds.top() - (i as f32 + 0.5) * strip_h;

                            draw.rect()
                                .x_y(bounds.x(), y)
                                .w_h(bounds.w(), strip_h + 1.0)
                                .color(srgba(
                                    (mix(top[0], bottom[0]) * 255.0) as u8,
                                    (mix(top[1], bottom[1]) * 255.0) as u8,
                                    (mix(top[2], bottom[2]) * 255.0) as u8,
                                    (opacity * 255.0) as u8,
                                ));
                        }
                    }
                    None => {
                        draw.rect().xy(bounds.xy()).wh(bounds.wh()).color(srgba(
                            (color[0] * 255.0) as u8,
                            (color[1] * 255.0) as u8,
                            (color[2] * 255.0) as u8,
                            (opacity * 255.0) as u8,
                        ));
                    }
                }
            }
        }
    }

    /// Draw every non-background element through the camera. Called on
    /// top of the scene visual.
    pub fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        for element in self.elements.iter_visible() {
            let gain = self.gain(&element.id);

            match &element.customization {
                Customization::Background { .. } => {}
                Customization::Grid {
                    style,
                    size,
                    divisions,
                    line_width,
                } => {
                    self.draw_grid(
                        draw, bounds, camera, style.color, style.opacity, *size,
                        *divisions, *line_width, gain,
                    );
                }
                Customization::Light { style, .. } => {
                    self.draw_light(
                        draw,
                        bounds,
                        camera,
                        element.position,
                        style.color,
                        style.intensity * gain,
                    );
                }
                Customization::Particles { style, size, .. } => {
                    self.draw_dust(draw, bounds, camera, style.color, *size, gain);
                }
                Customization::Shape {
                    style,
                    size,
                    rotation_speed,
                    wireframe,
                    ..
                } => {
                    self.draw_shape(
                        draw,
                        bounds,
                        camera,
                        element.position,
                        style.color,
                        *size * gain,
                        self.time * rotation_speed,
                        *wireframe,
                    );
                }
                Customization::Wave {
                    style,
                    amplitude,
                    frequency,
                    speed,
                    points,
                } => {
                    self.draw_wave(
                        draw,
                        bounds,
                        camera,
                        style.color,
                        amplitude * gain,
                        *frequency,
                        *speed,
                        (*points).max(2),
                    );
                }
                Customization::Ambient {
                    style,
                    movement,
                    size,
                    speed,
                    amplitude,
                    frequency,
                    bounce_height,
                    ..
                } => {
                    self.draw_mover(
                        draw,
                        bounds,
                        camera,
                        element.position,
                        style.color,
                        *movement,
                        *size * gain,
                        *speed,
                        *amplitude,
                        *frequency,
                        *bounce_height,
                    );
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_grid(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        color: [f32; 3],
        opacity: f32,
        size: f32,
        divisions: usize,
        line_width: f32,
        gain: f32,
    ) {
        let divisions = divisions.clamp(2, 60);
        let half = size / 2.0;
        let alpha = (opacity * (0.4 + 0.3 * (gain - 1.0))).clamp(0.05, 1.0);
        let rgba = srgba(
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
            (alpha * 255.0) as u8,
        );

        for i in 0..=divisions {
            let offset = (i as f32 / divisions as f32 - 0.5) * size;

            let ends_x = (
                camera.project([offset, -2.0, -half], bounds),
                camera.project([offset, -2.0, half], bounds),
            );
            if let (Some((a, _)), Some((b, _))) = ends_x {
                draw.line().start(a).end(b).weight(line_width).color(rgba);
            }

            let ends_z = (
                camera.project([-half, -2.0, offset], bounds),
                camera.project([half, -2.0, offset], bounds),
            );
            if let (Some((a, _)), Some((b, _))) = ends_z {
                draw.line().start(a).end(b).weight(line_width).color(rgba);
            }
        }
    }

    fn draw_light(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        position: [f32; 3],
        color: [f32; 3],
        intensity: f32,
    ) {
        if let Some((screen, depth)) = camera.project(position, bounds) {
            let radius = camera.scale_at(depth, bounds) * 1.5 * intensity;
            // Layered soft glow
            for i in 0..5 {
                let t = i as f32 / 5.0;
                draw.ellipse()
                    .xy(screen)
                    .w_h(radius * (1.0 - t * 0.8), radius * (1.0 - t * 0.8))
                    .color(srgba(
                        (color[0] * 255.0) as u8,
                        (color[1] * 255.0) as u8,
                        (color[2] * 255.0) as u8,
                        (intensity * 25.0).min(255.0) as u8,
                    ));
            }
        }
    }

    fn draw_dust(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        color: [f32; 3],
        size: f32,
        gain: f32,
    ) {
        for dust in &self.dust {
            let drifted = [
                dust.position[0] + (self.time * 0.2 + dust.drift_phase).sin() * 0.5,
                dust.position[1] + (self.time * 0.15 + dust.drift_phase).cos() * 0.3,
                dust.position[2],
            ];

            if let Some((screen, depth)) = camera.project(drifted, bounds) {
                let px = (camera.scale_at(depth, bounds) * size * 0.3 * gain).clamp(0.5, 4.0);
                draw.ellipse().xy(screen).w_h(px, px).color(srgba(
                    (color[0] * 255.0) as u8,
                    (color[1] * 255.0) as u8,
                    (color[2] * 255.0) as u8,
                    120,
                ));
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_shape(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        position: [f32; 3],
        color: [f32; 3],
        size: f32,
        rotation: f32,
        wireframe: bool,
    ) {
        if let Some((screen, depth)) = camera.project(position, bounds) {
            let px = camera.scale_at(depth, bounds) * size * 0.8;
            let rgba = srgba(
                (color[0] * 255.0) as u8,
                (color[1] * 255.0) as u8,
                (color[2] * 255.0) as u8,
                200,
            );

            let rect = draw.rect().xy(screen).w_h(px, px).rotate(rotation);
            if wireframe {
                rect.no_fill().stroke(rgba).stroke_weight(1.5);
            } else {
                rect.color(rgba);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_wave(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        color: [f32; 3],
        amplitude: f32,
        frequency: f32,
        speed: f32,
        points: usize,
    ) {
        let rgba = srgba(
            (color[0] * 255.0) as u8,
            (color[1] * 255.0) as u8,
            (color[2] * 255.0) as u8,
            180,
        );

        let mut previous: Option<Vec2> = None;
        for i in 0..points {
            let t = i as f32 / (points - 1) as f32;
            let x = (t - 0.5) * 16.0;
            let y = (self.time * speed + t * frequency * TAU).sin() * amplitude;

            if let Some((screen, _)) = camera.project([x, y, 6.0], bounds) {
                if let Some(prev) = previous {
                    draw.line().start(prev).end(screen).weight(2.0).color(rgba);
                }
                previous = Some(screen);
            } else {
                previous = None;
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_mover(
        &self,
        draw: &Draw,
        bounds: Rect,
        camera: &Camera,
        position: [f32; 3],
        color: [f32; 3],
        movement: MovementKind,
        size: f32,
        speed: f32,
        amplitude: f32,
        frequency: f32,
        bounce_height: f32,
    ) {
        let t = self.time * speed;
        let mut world = position;
        let mut scale = 1.0;
        let mut rotation = 0.0;

        match movement {
            MovementKind::Bounce => {
                world[1] = position[1] + (t * 2.0).sin().abs() * bounce_height;
            }
            MovementKind::Float => {
                world[1] = position[1] + (t * frequency).sin() * amplitude * 0.5;
            }
            MovementKind::Fly => {
                world[0] = position[0] + (t * 0.7).cos() * amplitude * 2.0;
                world[1] = position[1] + (t * frequency).sin() * amplitude;
            }
            MovementKind::Rotate => {
                rotation = t;
            }
            MovementKind::Pulse => {
                scale = 1.0 + (t * frequency * 2.0).sin() * 0.3;
            }
        }

        if let Some((screen, depth)) = camera.project(world, bounds) {
            let px = camera.scale_at(depth, bounds) * size * 0.5 * scale;
            let rgba = srgba(
                (color[0] * 255.0) as u8,
                (color[1] * 255.0) as u8,
                (color[2] * 255.0) as u8,
                (0.8 * 255.0) as u8,
            );

            if rotation != 0.0 {
                draw.rect().xy(screen).w_h(px, px).rotate(rotation).color(rgba);
            } else {
                draw.ellipse().xy(screen).w_h(px, px).color(rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::BandLevels;

    fn bass_beat(bass: f32, is_beat: bool) -> BeatInfo {
        let bands = BandLevels {
            bass,
            ..BandLevels::default()
        };
        BeatInfo {
            is_beat,
            strength: bands.average(),
            bands,
        }
    }

    #[test]
    fn gains_follow_response_targets() {
        let mut layer = ElementLayer::new(ElementSet::default_scene());
        let params = SceneParams::default();

        for i in 0..60 {
            layer.update(&bass_beat(1.0, false), i as f32 / 60.0, &params);
        }

        // The particles element responds to bass; the lights respond to
        // beat and nothing is beating
        assert!(layer.gain("main-particles") > 1.5);
        assert!((layer.gain("ambient-light") - 1.0).abs() < 0.05);
    }

    #[test]
    fn beat_elements_spike_on_beats() {
        let mut layer = ElementLayer::new(ElementSet::default_scene());
        let params = SceneParams::default();

        for i in 0..30 {
            layer.update(&bass_beat(0.0, true), i as f32 / 60.0, &params);
        }
        assert!(layer.gain("ambient-light") > 1.3);

        // And decay back once beats stop
        for i in 30..300 {
            layer.update(&bass_beat(0.0, false), i as f32 / 60.0, &params);
        }
        assert!((layer.gain("ambient-light") - 1.0).abs() < 0.05);
    }

    #[test]
    fn hidden_elements_keep_their_slot_but_do_not_respond() {
        let mut layer = ElementLayer::new(ElementSet::default_scene());
        layer.elements_mut().toggle_visible("grid-lines");

        assert_eq!(layer.elements().iter_visible().count(), 4);
        assert!(layer.elements().get("grid-lines").is_some());
    }

    #[test]
    fn set_elements_resets_gains() {
        let mut layer = ElementLayer::new(ElementSet::default_scene());
        let params = SceneParams::default();
        for i in 0..60 {
            layer.update(&bass_beat(1.0, false), i as f32 / 60.0, &params);
        }
        assert!(layer.gain("main-particles") > 1.0);

        layer.set_elements(ElementSet::default_scene());
        assert_eq!(layer.gain("main-particles"), 1.0);
    }
}
