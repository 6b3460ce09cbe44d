//! Robot speed and motion timing constants.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// PWM duty value applied to the drive motors.
///
/// The dashboard slider covers `MIN..=MAX` in steps of `STEP`; the firmware
/// itself accepts any byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RobotSpeed(u8);

impl RobotSpeed {
    pub const MIN: u8 = 50;
    pub const MAX: u8 = 255;
    pub const STEP: u8 = 5;

    pub const DEFAULT: RobotSpeed = RobotSpeed(128);
    pub const SLOW: RobotSpeed = RobotSpeed(85);
    pub const MEDIUM: RobotSpeed = RobotSpeed(170);
    pub const FAST: RobotSpeed = RobotSpeed(255);

    /// Creates a speed, rejecting values below the slider minimum.
    pub fn new(value: u8) -> Result<Self> {
        if value < Self::MIN {
            return Err(Error::InvalidSpeed {
                value,
                min: Self::MIN,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Clamps into range and rounds to the nearest slider step.
    pub fn snap_to_step(value: u32) -> Self {
        let clamped = value.clamp(Self::MIN as u32, Self::MAX as u32);
        let steps = ((clamped - Self::MIN as u32) as f64 / Self::STEP as f64).round() as u32;
        let snapped = (Self::MIN as u32 + steps * Self::STEP as u32).min(Self::MAX as u32);
        Self(snapped as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }
}

impl Default for RobotSpeed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for RobotSpeed {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RobotSpeed> for u8 {
    fn from(speed: RobotSpeed) -> Self {
        speed.0
    }
}

impl std::fmt::Display for RobotSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// Constants of the speed-to-time model.
///
/// Copied into each execution when it starts, so edits never reach a run
/// that is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Minimum motor-on time and the gap inserted after each stop.
    pub command_delay_ms: u64,
    /// Milliseconds per centimetre of travel at full speed.
    pub cm_to_ms_factor: u64,
    /// Time allowed for one 90 degree pivot.
    pub turn_duration_ms: u64,
}

impl TimingConfig {
    pub const DEFAULT_COMMAND_DELAY_MS: u64 = 100;
    pub const DEFAULT_CM_TO_MS_FACTOR: u64 = 150;
    pub const DEFAULT_TURN_DURATION_MS: u64 = 1000;

    /// Every constant must be a positive integer.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("command_delay_ms", self.command_delay_ms),
            ("cm_to_ms_factor", self.cm_to_ms_factor),
            ("turn_duration_ms", self.turn_duration_ms),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(Error::InvalidTiming {
                    field: name.to_string(),
                    reason: "must be a positive integer".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            command_delay_ms: Self::DEFAULT_COMMAND_DELAY_MS,
            cm_to_ms_factor: Self::DEFAULT_CM_TO_MS_FACTOR,
            turn_duration_ms: Self::DEFAULT_TURN_DURATION_MS,
        }
    }
}
