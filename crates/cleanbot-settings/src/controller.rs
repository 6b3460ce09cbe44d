//! Timing settings form
//!
//! Holds the raw text of the three timing inputs and turns it back into a
//! validated [`TimingConfig`].

use cleanbot_core::TimingConfig;

use crate::error::{SettingsError, SettingsResult};

/// String-backed editor for the motion timing constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingForm {
    pub command_delay_ms: String,
    pub cm_to_ms_factor: String,
    pub turn_duration_ms: String,
}

impl TimingForm {
    /// Form pre-filled with the values of `timing`.
    pub fn from_config(timing: &TimingConfig) -> Self {
        Self {
            command_delay_ms: timing.command_delay_ms.to_string(),
            cm_to_ms_factor: timing.cm_to_ms_factor.to_string(),
            turn_duration_ms: timing.turn_duration_ms.to_string(),
        }
    }

    /// Update a field from user input. Returns false for an unknown id.
    pub fn update_field(&mut self, id: &str, value: &str) -> bool {
        let field = match id {
            "command_delay_ms" => &mut self.command_delay_ms,
            "cm_to_ms_factor" => &mut self.cm_to_ms_factor,
            "turn_duration_ms" => &mut self.turn_duration_ms,
            _ => return false,
        };
        *field = value.to_string();
        true
    }

    /// Parses every field; `timing` is only written when all three are
    /// positive integers.
    pub fn apply(&self, timing: &mut TimingConfig) -> SettingsResult<()> {
        let parsed = TimingConfig {
            command_delay_ms: parse_positive("command_delay_ms", &self.command_delay_ms)?,
            cm_to_ms_factor: parse_positive("cm_to_ms_factor", &self.cm_to_ms_factor)?,
            turn_duration_ms: parse_positive("turn_duration_ms", &self.turn_duration_ms)?,
        };
        if *timing != parsed {
            tracing::info!(
                "Timing updated: delay {} ms, factor {} ms/cm, turn {} ms",
                parsed.command_delay_ms,
                parsed.cm_to_ms_factor,
                parsed.turn_duration_ms
            );
        }
        *timing = parsed;
        Ok(())
    }

    /// Restore the default constants in both the form and `timing`.
    pub fn reset_to_defaults(&mut self, timing: &mut TimingConfig) {
        *timing = TimingConfig::default();
        *self = Self::from_config(timing);
    }
}

impl Default for TimingForm {
    fn default() -> Self {
        Self::from_config(&TimingConfig::default())
    }
}

fn parse_positive(key: &str, raw: &str) -> SettingsResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(SettingsError::invalid(key, "must be greater than zero")),
        Ok(value) => Ok(value),
        Err(_) => Err(SettingsError::invalid(
            key,
            format!("'{}' is not a whole number", raw.trim()),
        )),
    }
}
