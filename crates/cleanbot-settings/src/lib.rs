//! Cleanbot Settings Crate
//!
//! Handles user configuration (motion timing, robot speed, canvas scale and
//! store paths), its persistence, and the timing settings form.

pub mod config;
pub mod controller;
pub mod error;

pub use config::{CanvasSettings, Config, RobotSettings, SpeedPresets, StoreSettings};
pub use controller::TimingForm;
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
