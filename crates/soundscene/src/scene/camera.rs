//! Bass-reactive orbiting camera and pseudo-3D projection.
//!
//! Scenes are built in a small world space around the origin; the
//! camera orbits it, pulling back on bass hits, and projects world
//! points onto the nannou draw plane with a simple perspective divide.

use nannou::prelude::*;
use soundscene_core::{BeatInfo, SceneParams};

/// Minimum distance a point may sit in front of the camera
const NEAR_PLANE: f32 = 0.5;

pub struct Camera {
    /// Orbit angle in radians
    angle: f32,
    /// Smoothed orbit distance
    distance: f32,
    /// Vertical look offset
    height: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            angle: 0.0,
            distance: 15.0,
            height: 3.0,
        }
    }

    /// Advance the orbit. Distance eases toward a bass-pushed target;
    /// angular speed picks up with bass as well.
    pub fn update(&mut self, beat: &BeatInfo, params: &SceneParams) {
        let target_distance = (15.0 + beat.bands.bass * 5.0) / params.scale.max(0.1);
        self.distance = self.distance * 0.9 + target_distance * 0.1;

        if params.rotation_speed > 0.0 {
            self.angle += params.rotation_speed * 0.0001 + beat.bands.bass * 0.01;
        }

        // Gentle vertical drift
        self.height = 3.0 + (self.angle * 0.5).sin() * 1.5;
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Project a world point to screen coordinates plus its depth.
    /// Points behind the near plane are culled.
    pub fn project(&self, point: [f32; 3], bounds: Rect) -> Option<(Vec2, f32)> {
        let (sin_a, cos_a) = self.angle.sin_cos();

        // Orbit = rotate the world around Y, then pull back
        let xr = point[0] * cos_a - point[2] * sin_a;
        let zr = point[0] * sin_a + point[2] * cos_a;
        let depth = self.distance + zr;

        if depth < NEAR_PLANE {
            return None;
        }

        let focal = bounds.w().min(bounds.h()) * 0.9;
        let sx = xr * focal / depth;
        let sy = (point[1] - self.height * 0.3) * focal / depth;

        Some((pt2(sx, sy), depth))
    }

    /// Apparent size of a unit length at the given depth.
    pub fn scale_at(&self, depth: f32, bounds: Rect) -> f32 {
        bounds.w().min(bounds.h()) * 0.9 / depth.max(NEAR_PLANE)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soundscene_core::BandLevels;

    fn test_bounds() -> Rect {
        Rect::from_w_h(800.0, 600.0)
    }

    #[test]
    fn origin_projects_to_center_line() {
        let camera = Camera::new();
        let (screen, depth) = camera.project([0.0, 0.0, 0.0], test_bounds()).unwrap();

        assert!(screen.x.abs() < 1e-3);
        assert!((depth - 15.0).abs() < 1e-3);
    }

    #[test]
    fn nearer_points_appear_larger() {
        let camera = Camera::new();
        let bounds = test_bounds();

        let near = camera.scale_at(5.0, bounds);
        let far = camera.scale_at(20.0, bounds);
        assert!(near > far);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = Camera::new();
        // Far behind the orbit distance
        assert!(camera.project([0.0, 0.0, -40.0], test_bounds()).is_none());
    }

    #[test]
    fn bass_pushes_the_orbit_out() {
        let mut camera = Camera::new();
        let params = SceneParams::default();
        let loud = BeatInfo {
            is_beat: false,
            strength: 1.0,
            bands: BandLevels {
                bass: 1.0,
                ..BandLevels::default()
            },
        };

        let before = camera.distance;
        for _ in 0..60 {
            camera.update(&loud, &params);
        }
        assert!(camera.distance > before);
    }
}
