//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.soundscene.toml`.

use serde::{Deserialize, Serialize};
use soundscene_core::DetectionConfig;
use std::fs;
use std::path::PathBuf;

const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_CYCLE_COOLDOWN_FRAMES: u32 = 120;

const CONFIG_TEMPLATE: &str = r#"# soundscene configuration file

# Timeout in seconds when switching audio devices (default: 3)
# device_timeout_secs = 3

# Last selected audio device (auto-saved)
# last_device = "Device Name"
# last_device_is_input = true

# =============================================================================
# Beat Detection
# =============================================================================

# Minimum milliseconds between detected beats
# beat_refractory_ms = 200.0

# Cutoff multiplier applied when a beat fires
# beat_rise = 1.3

# Per-frame cutoff decay factor
# beat_decay = 0.95

# Spectrum smoothing constant (0-1, higher = smoother)
# smoothing = 0.7

# =============================================================================
# Scenes
# =============================================================================

# Frames between scene switches (~2s at 60fps)
# cycle_cooldown_frames = 120

# Directory scanned for scene presets (default: ~/.soundscene/presets)
# presets_dir = "/path/to/presets"
"#;

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub last_device: Option<String>,
    pub last_device_is_input: Option<bool>,
    pub device_timeout_secs: Option<u64>,

    // Beat detection (flattened for simpler TOML)
    pub beat_refractory_ms: Option<f64>,
    pub beat_rise: Option<f32>,
    pub beat_decay: Option<f32>,
    pub smoothing: Option<f32>,

    // Scene behavior
    pub cycle_cooldown_frames: Option<u32>,
    pub presets_dir: Option<PathBuf>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".soundscene.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            let _ = fs::write(&path, CONFIG_TEMPLATE);
            println!("Created config template at {:?}", path);
        }

        fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(content) = toml::to_string(self) {
                let _ = fs::write(&path, &content);
                println!("Config saved to {:?}", path);
            }
        }
    }

    pub fn device_timeout_secs(&self) -> u64 {
        self.device_timeout_secs
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS)
    }

    pub fn cycle_cooldown_frames(&self) -> u32 {
        self.cycle_cooldown_frames
            .unwrap_or(DEFAULT_CYCLE_COOLDOWN_FRAMES)
    }

    pub fn set_device(&mut self, name: &str, is_input: bool) {
        self.last_device = Some(name.to_string());
        self.last_device_is_input = Some(is_input);
        self.save();
    }

    /// Beat detection configuration with defaults applied by the core.
    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            beat_refractory_ms: self.beat_refractory_ms,
            beat_rise: self.beat_rise,
            beat_decay: self.beat_decay,
            smoothing: self.smoothing,
        }
    }

    /// Directory scanned for scene presets.
    pub fn presets_dir(&self) -> Option<PathBuf> {
        self.presets_dir
            .clone()
            .or_else(|| dirs::home_dir().map(|h| h.join(".soundscene").join("presets")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_passes_overrides_through() {
        let config = Config {
            beat_rise: Some(1.5),
            ..Config::default()
        };
        let detection = config.detection();

        assert_eq!(detection.beat_rise(), 1.5);
        // Untouched fields keep the core defaults
        assert_eq!(detection.beat_refractory_ms(), 200.0);
        assert_eq!(detection.beat_decay(), 0.95);
    }

    #[test]
    fn template_parses_as_valid_config() {
        // The commented template must itself be loadable TOML
        let parsed: Result<Config, _> = toml::from_str(CONFIG_TEMPLATE);
        assert!(parsed.is_ok());
    }
}
