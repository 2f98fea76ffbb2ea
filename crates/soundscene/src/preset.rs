//! Scene presets: TOML save/load plus hot reload.
//!
//! A preset bundles the parameter block and the element set under a
//! name. Presets live as individual `.toml` files in the presets
//! directory; a filesystem watcher reloads the applied preset when its
//! file changes on disk, so presets can be tuned in an editor while the
//! app runs.

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use thiserror::Error;

use soundscene_core::{ElementSet, SceneParams};

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed preset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize preset: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A saved scene: parameters plus the element layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    pub name: String,
    #[serde(default)]
    pub params: SceneParams,
    #[serde(default)]
    pub elements: ElementSet,
}

impl ScenePreset {
    pub fn new(name: &str, params: SceneParams, elements: ElementSet) -> Self {
        Self {
            name: name.to_string(),
            params,
            elements,
        }
    }

    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Write the preset into `dir` as `<slug>.toml`, creating the
    /// directory if needed. Returns the written path.
    pub fn save(&self, dir: &Path) -> Result<PathBuf, PresetError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.toml", slug(&self.name)));
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// Filename-safe version of a preset name.
fn slug(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "preset".to_string()
    } else {
        cleaned
    }
}

/// All preset files in `dir`, sorted by filename.
pub fn list_presets(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map_or(false, |ext| ext == "toml"))
                .collect()
        })
        .unwrap_or_default();

    paths.sort();
    paths
}

/// Watches the presets directory and reports changed preset files.
pub struct PresetWatcher {
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
}

impl PresetWatcher {
    /// Start watching `dir`. Fails quietly at the call site; the app
    /// simply runs without hot reload if the watcher can't start.
    pub fn start(dir: &Path) -> Option<Self> {
        let (tx, rx) = channel();
        let mut watcher = notify::recommended_watcher(tx).ok()?;
        watcher.watch(dir, RecursiveMode::NonRecursive).ok()?;

        Some(Self {
            _watcher: watcher,
            events: rx,
        })
    }

    /// Drain pending events; returns the changed `.toml` paths.
    pub fn changed_presets(&self) -> Vec<PathBuf> {
        let mut changed = Vec::new();

        while let Ok(event) = self.events.try_recv() {
            if let Ok(event) = event {
                for path in event.paths {
                    if path.extension().map_or(false, |ext| ext == "toml")
                        && !changed.contains(&path)
                    {
                        changed.push(path);
                    }
                }
            }
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("soundscene-preset-test-{}", tag));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn preset_round_trips_through_disk() {
        let dir = temp_dir("roundtrip");
        let preset = ScenePreset::new(
            "Night Drive",
            SceneParams::default(),
            ElementSet::default_scene(),
        );

        let path = preset.save(&dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "night-drive.toml");

        let loaded = ScenePreset::load(&path).unwrap();
        assert_eq!(loaded, preset);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_preset_is_an_error_not_a_panic() {
        let dir = temp_dir("malformed");
        let path = dir.join("broken.toml");
        fs::write(&path, "name = [this is not toml").unwrap();

        assert!(matches!(
            ScenePreset::load(&path),
            Err(PresetError::Parse(_))
        ));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn list_presets_only_sees_toml() {
        let dir = temp_dir("list");
        fs::write(dir.join("a.toml"), "").unwrap();
        fs::write(dir.join("b.toml"), "").unwrap();
        fs::write(dir.join("notes.txt"), "").unwrap();

        let found = list_presets(&dir);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "toml"));

        // Missing directory is just empty
        assert!(list_presets(&dir.join("missing")).is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn slug_sanitizes_names() {
        assert_eq!(slug("Night Drive"), "night-drive");
        assert_eq!(slug("  weird/name!  "), "weird-name-");
        assert_eq!(slug(""), "preset");
    }

    #[test]
    fn partial_preset_file_fills_defaults() {
        let text = "name = \"minimal\"\n";
        let preset: ScenePreset = toml::from_str(text).unwrap();

        assert_eq!(preset.name, "minimal");
        assert_eq!(preset.params, SceneParams::default());
        assert!(preset.elements.is_empty());
    }
}
