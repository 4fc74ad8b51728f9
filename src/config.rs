//! Configuration file support.
//!
//! Editor settings are stored as versioned JSON. A missing field takes its default,
//! a file written by a newer version is rejected.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DISPLAY_MAX_HEIGHT, DEFAULT_DISPLAY_MAX_WIDTH, HISTORY_LIMIT, MIN_BOX_SIZE,
    TAP_MAX_DURATION_MS, TAP_MOVE_THRESHOLD,
};
use crate::drawing::DrawingThresholds;
use crate::input::TapThresholds;
use crate::keybindings::{KeyBindings, KeyBindingsConfig};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration that can be exported and imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: EditorPreferences,

    /// Drawing and history thresholds
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Keybinding configuration
    #[serde(default)]
    pub keybindings: KeyBindingsConfig,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Largest on-screen width for the canvas
    #[serde(default = "default_display_max_width")]
    pub display_max_width: f32,

    /// Largest on-screen height for the canvas
    #[serde(default = "default_display_max_height")]
    pub display_max_height: f32,
}

fn default_display_max_width() -> f32 {
    DEFAULT_DISPLAY_MAX_WIDTH
}

fn default_display_max_height() -> f32 {
    DEFAULT_DISPLAY_MAX_HEIGHT
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            display_max_width: default_display_max_width(),
            display_max_height: default_display_max_height(),
        }
    }
}

/// Drawing section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Boxes must exceed this size on both axes
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f32,

    /// Touches moving less than this count as taps
    #[serde(default = "default_tap_move_threshold")]
    pub tap_move_threshold: f32,

    /// Touches shorter than this (ms) count as taps
    #[serde(default = "default_tap_max_duration_ms")]
    pub tap_max_duration_ms: u64,

    /// Undo history depth
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_min_box_size() -> f32 {
    MIN_BOX_SIZE
}

fn default_tap_move_threshold() -> f32 {
    TAP_MOVE_THRESHOLD
}

fn default_tap_max_duration_ms() -> u64 {
    TAP_MAX_DURATION_MS
}

fn default_history_limit() -> usize {
    HISTORY_LIMIT
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            min_box_size: default_min_box_size(),
            tap_move_threshold: default_tap_move_threshold(),
            tap_max_duration_ms: default_tap_max_duration_ms(),
            history_limit: default_history_limit(),
        }
    }
}

impl DrawingConfig {
    pub fn thresholds(&self) -> DrawingThresholds {
        DrawingThresholds {
            min_box_size: self.min_box_size,
            tap: TapThresholds {
                max_movement: self.tap_move_threshold,
                max_duration: Duration::from_millis(self.tap_max_duration_ms),
            },
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: EditorPreferences::default(),
            drawing: DrawingConfig::default(),
            keybindings: KeyBindingsConfig::default(),
        }
    }

    pub fn key_bindings(&self) -> KeyBindings {
        self.keybindings.to_keybindings()
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "labelkit-config.json"
    }

    /// Get the default config file path. Not available on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("labelkit").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("labelkit")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load configuration from a specific file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match Self::load(&path) {
            Ok(config) => Some(config),
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to a specific file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let mut config = EditorConfig::new();
        config.preferences.log_level = LogLevel::Debug;
        config.drawing.min_box_size = 4.0;
        config.keybindings.tool_box = "R".to_string();

        let json = config.to_json().expect("serialize");
        let loaded = EditorConfig::from_json(&json).expect("deserialize");
        assert_eq!(loaded, config);
        assert_eq!(loaded.drawing.thresholds().min_box_size, 4.0);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = EditorConfig::from_json(r#"{"version": 1}"#).expect("minimal config");
        assert_eq!(config.drawing.history_limit, HISTORY_LIMIT);
        assert_eq!(config.preferences.display_max_width, DEFAULT_DISPLAY_MAX_WIDTH);
        assert_eq!(config.key_bindings(), KeyBindings::default());
        assert_eq!(
            config.drawing.thresholds().tap.max_duration,
            Duration::from_millis(TAP_MAX_DURATION_MS)
        );
    }

    #[test]
    fn test_log_level_maps_to_filter() {
        let config = EditorConfig::from_json(r#"{"version": 1, "preferences": {"log_level": "warn"}}"#)
            .expect("config with log level");
        assert_eq!(config.preferences.log_level.to_level_filter(), log::LevelFilter::Warn);
        assert_eq!(
            EditorConfig::default().preferences.log_level.to_level_filter(),
            log::LevelFilter::Info
        );
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let json = format!(r#"{{"version": {}}}"#, CONFIG_VERSION + 1);
        assert!(matches!(
            EditorConfig::from_json(&json),
            Err(ConfigError::VersionTooNew { .. })
        ));
        assert!(matches!(
            EditorConfig::from_json("not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("labelkit-config-test-{}", std::process::id()));
        let path = dir.join("nested").join(EditorConfig::default_filename());

        let mut config = EditorConfig::new();
        config.preferences.display_max_height = 480.0;
        config.save(&path).expect("save");
        let loaded = EditorConfig::load(&path).expect("load");
        assert_eq!(loaded.preferences.display_max_height, 480.0);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
