//! Per-directory settings for Iterview
//!
//! Settings are stored as `iterview.toml` in the models directory. They can
//! override the model catalog, the camera orbit and playback preferences.
//! Every key is optional; anything missing falls back to the built-in
//! defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::catalog::{CatalogError, ModelCatalog};
use super::selection::PlaybackState;

/// Filename used for per-directory settings
pub const SETTINGS_FILENAME: &str = "iterview.toml";

/// Catalog overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Model names, in display order
    pub names: Option<Vec<String>>,
    /// Checkpoint numbers shared by every model
    pub iterations: Option<Vec<u32>>,
}

/// Orbiting camera settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Horizontal distance from the orbit axis
    pub radius: Option<f32>,
    /// Angular speed in radians per second
    pub speed: Option<f32>,
    /// Camera height
    pub height: Option<f32>,
    /// Point the camera looks at [x, y, z]
    pub target: Option<[f32; 3]>,
}

/// Playback settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackSettings {
    /// Seconds per checkpoint during playback
    pub interval: Option<f32>,
    /// Whether to loop playback
    #[serde(rename = "loop")]
    pub loop_enabled: Option<bool>,
}

/// Top-level settings struct, serialized as iterview.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub catalog: Option<CatalogSettings>,
    pub camera: Option<CameraSettings>,
    pub playback: Option<PlaybackSettings>,
}

impl Settings {
    /// Load settings from an iterview.toml file in the given directory.
    /// Returns Ok(None) if the file doesn't exist. Nothing is logged here;
    /// callers report the path once their logger is up.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>, SettingsError> {
        let path = settings_path(dir);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|e| SettingsError::Io {
            path: path.clone(),
            source: e,
        })?;
        let settings: Settings =
            toml::from_str(&contents).map_err(|e| SettingsError::ParseToml {
                path: path.clone(),
                source: e,
            })?;
        Ok(Some(settings))
    }

    /// Build the model catalog. Explicit overrides (from the command line)
    /// win over the settings file, which wins over the defaults.
    pub fn catalog(
        &self,
        names: Option<Vec<String>>,
        iterations: Option<Vec<u32>>,
    ) -> Result<ModelCatalog, CatalogError> {
        let defaults = ModelCatalog::default();
        let from_file = self.catalog.clone().unwrap_or_default();

        let names = names
            .or(from_file.names)
            .unwrap_or_else(|| defaults.names().to_vec());
        let iterations = iterations
            .or(from_file.iterations)
            .unwrap_or_else(|| defaults.iterations().to_vec());

        ModelCatalog::new(names, iterations)
    }

    /// Playback state seeded from the settings file
    pub fn playback_state(&self) -> PlaybackState {
        let defaults = PlaybackState::default();
        let playback = self.playback.clone().unwrap_or_default();
        PlaybackState::new(
            playback.interval.unwrap_or(defaults.interval),
            playback.loop_enabled.unwrap_or(defaults.loop_enabled),
        )
    }
}

/// Errors that can occur during settings operations
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse TOML at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Location of the settings file for a models directory
pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(SETTINGS_FILENAME)
}

/// Resolve the models directory to an absolute path so the asset server
/// does not interpret it relative to the executable.
pub fn resolve_models_dir(path: &Path) -> Option<PathBuf> {
    let canonical = path.canonicalize().ok()?;
    canonical.is_dir().then_some(canonical)
}
