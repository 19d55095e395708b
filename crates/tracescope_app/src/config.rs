// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer configuration.
//!
//! Loaded once at startup from a RON file next to the working directory.
//! Every failure degrades to defaults; configuration can never prevent the
//! viewer from starting.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracescope_replay::DEFAULT_SPEED_FACTOR;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Default config file name, resolved against the working directory
const DEFAULT_CONFIG_FILE: &str = "tracescope.ron";

/// Initial window dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Window width in logical pixels
    pub width: u32,
    /// Window height in logical pixels
    pub height: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Config format version
    pub version: u32,
    /// Dataset file to load at startup; `None` shows the demo dataset
    pub data_path: Option<PathBuf>,
    /// Series names to display, in order; empty derives them from the data
    pub series: Vec<String>,
    /// Initial playback speed multiplier, snapped into the selectable set
    pub speed_factor: u32,
    /// Reload the dataset when its file changes on disk
    pub watch_data_file: bool,
    /// Initial window dimensions
    pub window: WindowSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            data_path: None,
            series: Vec::new(),
            speed_factor: DEFAULT_SPEED_FACTOR,
            watch_data_file: true,
            window: WindowSettings::default(),
        }
    }
}

impl ViewerConfig {
    /// Default config file location
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load the config from a file, falling back to defaults.
    ///
    /// A missing file is normal; a malformed one is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Self::default();
        };

        match ron::from_str(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(error) => {
                tracing::warn!("Ignoring malformed config {}: {error}", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ViewerConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert!(config.data_path.is_none());
        assert!(config.series.is_empty());
        assert_eq!(config.speed_factor, DEFAULT_SPEED_FACTOR);
        assert!(config.watch_data_file);
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut config = ViewerConfig::default();
        config.data_path = Some(PathBuf::from("flight.json"));
        config.series = vec!["alpha".to_string(), "bravo".to_string()];
        config.speed_factor = 32;

        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: ViewerConfig = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let loaded: ViewerConfig = ron::from_str("(speed_factor: 16)").unwrap();
        assert_eq!(loaded.speed_factor, 16);
        assert_eq!(loaded.window, WindowSettings::default());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ViewerConfig::load_or_default(Path::new("does/not/exist.ron"));
        assert_eq!(config, ViewerConfig::default());
    }
}
