//! Configuration and settings management for Cleanbot
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML file formats stored in the platform configuration directory.
//!
//! Configuration is organized into logical sections:
//! - Motion timing constants
//! - Robot speed and speed presets
//! - Canvas scale
//! - Realtime store paths shared with the firmware

use cleanbot_core::constants::{
    BOX_SIZE_CM, DEFAULT_ROUTES_NAMESPACE, DEFAULT_ROUTE_NAME, DEFAULT_STORE_ROOT, GRID_SIZE,
    PIXELS_PER_CM,
};
use cleanbot_core::{RobotSpeed, TimingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Named speeds offered next to the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedPresets {
    pub slow: RobotSpeed,
    pub medium: RobotSpeed,
    pub fast: RobotSpeed,
}

impl Default for SpeedPresets {
    fn default() -> Self {
        Self {
            slow: RobotSpeed::SLOW,
            medium: RobotSpeed::MEDIUM,
            fast: RobotSpeed::FAST,
        }
    }
}

/// Robot drive settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RobotSettings {
    /// Speed pushed to the robot before each run
    #[serde(default)]
    pub speed: RobotSpeed,
    #[serde(default)]
    pub presets: SpeedPresets,
}

/// Canvas scale settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasSettings {
    /// Canvas pixels per floor centimetre
    pub pixels_per_cm: f64,
    /// Edge of one grid square in centimetres
    pub box_size_cm: f64,
    /// Grid squares along the canvas height
    pub grid_size: u32,
}

impl CanvasSettings {
    /// Edge of one grid square in canvas pixels.
    pub fn cell_size_px(&self) -> f64 {
        self.box_size_cm * self.pixels_per_cm
    }
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            pixels_per_cm: PIXELS_PER_CM,
            box_size_cm: BOX_SIZE_CM,
            grid_size: GRID_SIZE,
        }
    }
}

/// Realtime store layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Root key shared with the firmware
    pub root: String,
    /// Key under `root` holding named routes
    pub routes_namespace: String,
    /// Name pre-filled in the save/load form
    pub default_route_name: String,
}

impl StoreSettings {
    pub fn command_path(&self) -> String {
        format!("{}/triggers/command", self.root)
    }

    pub fn speed_path(&self) -> String {
        format!("{}/triggers/speed", self.root)
    }

    pub fn route_path(&self, name: &str) -> String {
        format!("{}/{}/{}", self.root, self.routes_namespace, name)
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            root: DEFAULT_STORE_ROOT.to_string(),
            routes_namespace: DEFAULT_ROUTES_NAMESPACE.to_string(),
            default_route_name: DEFAULT_ROUTE_NAME.to_string(),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub robot: RobotSettings,
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> SettingsResult<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("").to_string()).into()),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/cleanbot/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform(std::env::consts::OS.to_string())
        })?;
        Ok(dir.join("cleanbot").join("config.toml"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SettingsError::ConfigDirectory(e.to_string()))?;
            }
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let timing = [
            ("timing.command_delay_ms", self.timing.command_delay_ms),
            ("timing.cm_to_ms_factor", self.timing.cm_to_ms_factor),
            ("timing.turn_duration_ms", self.timing.turn_duration_ms),
        ];
        for (key, value) in timing {
            if value == 0 {
                return Err(SettingsError::invalid(key, "must be a positive integer"));
            }
        }

        if !(self.canvas.pixels_per_cm > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "canvas.pixels_per_cm".to_string(),
                value: self.canvas.pixels_per_cm.to_string(),
            }
            .into());
        }
        if !(self.canvas.box_size_cm > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "canvas.box_size_cm".to_string(),
                value: self.canvas.box_size_cm.to_string(),
            }
            .into());
        }
        if self.canvas.grid_size == 0 {
            return Err(ConfigError::ValueOutOfRange {
                key: "canvas.grid_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        let keys = [
            ("store.root", &self.store.root),
            ("store.routes_namespace", &self.store.routes_namespace),
        ];
        for (key, value) in keys {
            if value.trim().is_empty() {
                return Err(SettingsError::invalid(key, "must not be empty"));
            }
            if value.contains(['.', '#', '$', '[', ']']) {
                return Err(SettingsError::invalid(
                    key,
                    "must not contain '.', '#', '$', '[' or ']'",
                ));
            }
        }

        Ok(())
    }
}
