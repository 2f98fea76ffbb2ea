//! Global scene parameters.
//!
//! One parameter block drives both scene construction (object counts,
//! geometry) and per-frame animation (speeds, intensities). Presets
//! serialize this block alongside the element set.

use serde::{Deserialize, Serialize};

/// The available scene kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Spectrum,
    ParticleWave,
    Geometric,
    Waveform3d,
    Rings,
    Morphing,
    Liquid,
    CyberGrid,
    Biomorphic,
}

impl SceneKind {
    pub const ALL: [SceneKind; 9] = [
        SceneKind::Spectrum,
        SceneKind::ParticleWave,
        SceneKind::Geometric,
        SceneKind::Waveform3d,
        SceneKind::Rings,
        SceneKind::Morphing,
        SceneKind::Liquid,
        SceneKind::CyberGrid,
        SceneKind::Biomorphic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Spectrum => "Spectrum Ring",
            SceneKind::ParticleWave => "Particle Wave",
            SceneKind::Geometric => "Geometric Array",
            SceneKind::Waveform3d => "Waveform 3D",
            SceneKind::Rings => "Reactive Rings",
            SceneKind::Morphing => "Morphing Solids",
            SceneKind::Liquid => "Liquid Surface",
            SceneKind::CyberGrid => "Cyber Grid",
            SceneKind::Biomorphic => "Biomorphic",
        }
    }

    pub fn next(self) -> SceneKind {
        let idx = Self::ALL.iter().position(|&k| k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Named color palettes. Each maps to a base hue, hue span, and
/// saturation used by the scenes' HSV math.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    Cyberpunk,
    Ocean,
    Sunset,
    Forest,
    Neon,
    Monochrome,
    Rainbow,
    Plasma,
    Aurora,
    Fire,
    Ice,
}

impl ColorScheme {
    /// Starting hue in degrees.
    pub fn base_hue(self) -> f32 {
        match self {
            ColorScheme::Cyberpunk => 300.0,
            ColorScheme::Ocean => 200.0,
            ColorScheme::Sunset => 20.0,
            ColorScheme::Forest => 120.0,
            ColorScheme::Neon => 160.0,
            ColorScheme::Monochrome => 0.0,
            ColorScheme::Rainbow => 0.0,
            ColorScheme::Plasma => 270.0,
            ColorScheme::Aurora => 150.0,
            ColorScheme::Fire => 10.0,
            ColorScheme::Ice => 190.0,
        }
    }

    /// How many degrees of hue the palette spreads across its objects.
    pub fn hue_span(self) -> f32 {
        match self {
            ColorScheme::Rainbow => 360.0,
            ColorScheme::Plasma | ColorScheme::Cyberpunk => 120.0,
            ColorScheme::Monochrome => 0.0,
            _ => 60.0,
        }
    }

    pub fn saturation(self) -> f32 {
        match self {
            ColorScheme::Monochrome => 0.0,
            ColorScheme::Ice | ColorScheme::Aurora => 0.6,
            _ => 0.85,
        }
    }

    /// Hue for an object at position `t` (0-1) through the palette.
    pub fn hue_at(self, t: f32) -> f32 {
        (self.base_hue() + t * self.hue_span()).rem_euclid(360.0)
    }
}

/// The global parameter block. Serialized in presets; every field has a
/// default so partial TOML files load.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub kind: SceneKind,
    pub color_scheme: ColorScheme,
    /// Response strength, 0-100
    pub intensity: f32,
    /// Animation speed, 0-100
    pub speed: f32,
    /// Camera/global rotation speed, 0-100
    pub rotation_speed: f32,
    pub particle_count: usize,
    pub wireframe: bool,
    /// Object count driver for geometric/morphing/biomorphic scenes
    pub complexity: f32,
    /// Global scale multiplier
    pub scale: f32,
    /// Spectrum smoothing constant (0-1)
    pub smoothing: f32,
    /// Whether beat-driven effects are active
    pub beat_detection: bool,
    /// Branching density for the biomorphic scene
    pub pattern_density: f32,
    pub object_size: f32,
    /// Vertex morph speed, 0-100
    pub morph_speed: f32,
    /// Audio influence on the liquid surface, 0-100
    pub fluidity: f32,
    /// Glow/emissive strength, 0-100
    pub glow_intensity: f32,
    /// How hard elements lean into their response gain, 0-100
    pub reaction_speed: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            kind: SceneKind::Rings,
            color_scheme: ColorScheme::Cyberpunk,
            intensity: 75.0,
            speed: 50.0,
            rotation_speed: 25.0,
            particle_count: 3000,
            wireframe: false,
            complexity: 6.0,
            scale: 1.0,
            smoothing: 0.8,
            beat_detection: true,
            pattern_density: 5.0,
            object_size: 1.0,
            morph_speed: 50.0,
            fluidity: 50.0,
            glow_intensity: 50.0,
            reaction_speed: 50.0,
        }
    }
}

impl SceneParams {
    /// Intensity normalized to the 0-10 range the animators use.
    pub fn intensity_factor(&self) -> f32 {
        self.intensity / 10.0
    }

    /// Speed normalized to 0-1.
    pub fn speed_factor(&self) -> f32 {
        self.speed / 100.0
    }

    /// Reaction speed normalized to 0-1 for the mapper.
    pub fn reaction_factor(&self) -> f32 {
        self.reaction_speed / 100.0
    }

    /// Morph speed normalized to 0-1.
    pub fn morph_factor(&self) -> f32 {
        self.morph_speed / 100.0
    }

    /// Fluidity normalized to 0-1.
    pub fn fluidity_factor(&self) -> f32 {
        self.fluidity / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_cycling_wraps() {
        let mut kind = SceneKind::Spectrum;
        for _ in 0..SceneKind::ALL.len() {
            kind = kind.next();
        }
        assert_eq!(kind, SceneKind::Spectrum);
    }

    #[test]
    fn hue_at_wraps_into_degrees() {
        let hue = ColorScheme::Cyberpunk.hue_at(1.0);
        assert!((0.0..360.0).contains(&hue));
        assert_eq!(ColorScheme::Monochrome.hue_at(0.7), 0.0);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        // Only override two fields; the rest must come from Default
        let params: SceneParams =
            toml::from_str("kind = \"liquid\"\nfluidity = 80.0\n").unwrap();

        assert_eq!(params.kind, SceneKind::Liquid);
        assert_eq!(params.fluidity, 80.0);
        assert_eq!(params.particle_count, 3000);
        assert!(params.beat_detection);
    }
}
