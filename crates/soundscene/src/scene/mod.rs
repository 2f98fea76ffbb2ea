//! Scene visuals and the manager that drives them.
//!
//! Each scene kind is a struct built from the global `SceneParams`,
//! updated once per frame from the current analysis, and drawn through
//! the shared orbiting camera.

pub mod biomorphic;
pub mod camera;
pub mod cyber_grid;
pub mod elements;
pub mod geometric;
pub mod liquid;
pub mod morphing;
pub mod particle_wave;
pub mod rings;
pub mod spectrum_ring;
pub mod waveform;

use nannou::prelude::*;
use soundscene_core::{BeatInfo, FrequencySnapshot, SceneKind, SceneParams};

pub use camera::Camera;
pub use elements::ElementLayer;

/// Everything a scene needs for one animation step.
pub struct FrameInput<'a> {
    pub snapshot: &'a FrequencySnapshot,
    pub beat: &'a BeatInfo,
    /// Seconds since app start
    pub time: f32,
    pub params: &'a SceneParams,
}

/// Trait all scene visuals implement.
pub trait SceneVisual {
    /// Rebuild internal objects from the parameter block.
    fn rebuild(&mut self, params: &SceneParams);

    /// Advance the animation state with this frame's analysis.
    fn update(&mut self, frame: &FrameInput);

    /// Draw the scene through the shared camera.
    fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera);
}

/// Window resolution settings
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Resolution {
    pub fn debug() -> Self {
        Self {
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }

    pub fn release() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: true,
        }
    }

    pub fn current(windowed: bool) -> Self {
        if windowed || cfg!(debug_assertions) {
            Self::debug()
        } else {
            Self::release()
        }
    }
}

/// HSV to sRGBA helper shared by the scenes.
pub fn hsv_to_rgba(hue: f32, saturation: f32, value: f32, alpha: f32) -> Srgba<u8> {
    let hue = hue.rem_euclid(360.0);
    let c = value * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = value - c;

    let (r1, g1, b1) = if hue < 60.0 {
        (c, x, 0.0)
    } else if hue < 120.0 {
        (x, c, 0.0)
    } else if hue < 180.0 {
        (0.0, c, x)
    } else if hue < 240.0 {
        (0.0, x, c)
    } else if hue < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    srgba(
        ((r1 + m) * 255.0) as u8,
        ((g1 + m) * 255.0) as u8,
        ((b1 + m) * 255.0) as u8,
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Frames a notification stays on screen (~3 seconds at 60fps)
const NOTIFICATION_FRAMES: u32 = 180;

fn make_visual(kind: SceneKind) -> Box<dyn SceneVisual> {
    match kind {
        SceneKind::Spectrum => Box::new(spectrum_ring::SpectrumRing::default()),
        SceneKind::ParticleWave => Box::new(particle_wave::ParticleWave::default()),
        SceneKind::Geometric => Box::new(geometric::Geometric::default()),
        SceneKind::Waveform3d => Box::new(waveform::Waveform3d::default()),
        SceneKind::Rings => Box::new(rings::Rings::default()),
        SceneKind::Morphing => Box::new(morphing::Morphing::default()),
        SceneKind::Liquid => Box::new(liquid::Liquid::default()),
        SceneKind::CyberGrid => Box::new(cyber_grid::CyberGrid::default()),
        SceneKind::Biomorphic => Box::new(biomorphic::Biomorphic::default()),
    }
}

/// Owns the active scene visual and the switching/notification state.
pub struct SceneManager {
    visual: Box<dyn SceneVisual>,
    params: SceneParams,
    cooldown: u32,
    cooldown_frames: u32,
    notification_text: Option<String>,
    notification_frames: u32,
}

impl SceneManager {
    pub fn new(params: SceneParams, cooldown_frames: u32) -> Self {
        let mut visual = make_visual(params.kind);
        visual.rebuild(&params);

        Self {
            visual,
            params,
            cooldown: 0,
            cooldown_frames,
            notification_text: None,
            notification_frames: 0,
        }
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn kind(&self) -> SceneKind {
        self.params.kind
    }

    /// Replace the parameter block and rebuild the active visual.
    pub fn set_params(&mut self, params: SceneParams) {
        let kind_changed = params.kind != self.params.kind;
        self.params = params;
        if kind_changed {
            self.visual = make_visual(self.params.kind);
        }
        self.visual.rebuild(&self.params);
    }

    /// Switch to a specific scene kind. Returns its display name, or
    /// `None` while the switch cooldown is still running.
    pub fn set_kind(&mut self, kind: SceneKind) -> Option<&'static str> {
        if self.cooldown > 0 && kind != self.params.kind {
            return None;
        }

        self.params.kind = kind;
        self.visual = make_visual(kind);
        self.visual.rebuild(&self.params);
        self.cooldown = self.cooldown_frames;
        Some(kind.name())
    }

    /// Advance to the next scene kind in order.
    pub fn cycle_next(&mut self) -> Option<&'static str> {
        self.set_kind(self.params.kind.next())
    }

    /// Shows a notification message for 3 seconds
    pub fn show_notification(&mut self, text: String) {
        self.notification_text = Some(text);
        self.notification_frames = NOTIFICATION_FRAMES;
    }

    pub fn update(&mut self, frame: &FrameInput) {
        if self.cooldown > 0 {
            self.cooldown -= 1;
        }
        if self.notification_frames > 0 {
            self.notification_frames -= 1;
            if self.notification_frames == 0 {
                self.notification_text = None;
            }
        }

        self.visual.update(frame);
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect, camera: &Camera) {
        self.visual.draw(draw, bounds, camera);
    }

    pub fn draw_notification(&self, draw: &Draw, bounds: Rect) {
        let text = match &self.notification_text {
            Some(t) => t,
            None => return,
        };

        // Fade out over the last second
        let alpha = (self.notification_frames as f32 / 60.0).min(1.0);
        let y = bounds.bottom() + 40.0;

        draw.text(text)
            .x_y(0.0, y)
            .w_h(bounds.w() - 40.0, 30.0)
            .center_justify()
            .font_size(20)
            .color(srgba(255, 255, 255, (alpha * 220.0) as u8));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_kind_respects_cooldown() {
        let mut manager = SceneManager::new(SceneParams::default(), 120);

        assert_eq!(
            manager.set_kind(SceneKind::Liquid),
            Some(SceneKind::Liquid.name())
        );
        // Switching again inside the cooldown is refused
        assert_eq!(manager.set_kind(SceneKind::Geometric), None);
        assert_eq!(manager.kind(), SceneKind::Liquid);

        // Re-selecting the current kind is always allowed
        assert!(manager.set_kind(SceneKind::Liquid).is_some());
    }

    #[test]
    fn cooldown_expires_with_updates() {
        let mut manager = SceneManager::new(SceneParams::default(), 3);
        manager.set_kind(SceneKind::Liquid);

        let snapshot = FrequencySnapshot::silent();
        let beat = BeatInfo::default();
        let params = SceneParams::default();
        for i in 0..3 {
            let frame = FrameInput {
                snapshot: &snapshot,
                beat: &beat,
                time: i as f32 / 60.0,
                params: &params,
            };
            manager.update(&frame);
        }

        assert!(manager.set_kind(SceneKind::Geometric).is_some());
    }

    #[test]
    fn cycle_walks_all_kinds() {
        let mut manager = SceneManager::new(SceneParams::default(), 0);
        let start = manager.kind();

        for _ in 0..SceneKind::ALL.len() {
            manager.cycle_next();
        }
        assert_eq!(manager.kind(), start);
    }

    #[test]
    fn hsv_primaries_are_exact() {
        let red = hsv_to_rgba(0.0, 1.0, 1.0, 1.0);
        assert_eq!((red.red, red.green, red.blue), (255, 0, 0));

        let green = hsv_to_rgba(120.0, 1.0, 1.0, 1.0);
        assert_eq!((green.red, green.green, green.blue), (0, 255, 0));

        let blue = hsv_to_rgba(240.0, 1.0, 1.0, 1.0);
        assert_eq!((blue.red, blue.green, blue.blue), (0, 0, 255));

        // Negative hues wrap
        let wrapped = hsv_to_rgba(-120.0, 1.0, 1.0, 1.0);
        assert_eq!((wrapped.red, wrapped.green, wrapped.blue), (0, 0, 255));
    }
}
