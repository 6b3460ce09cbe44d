//! Speed-to-time model.
//!
//! The robot is open loop: a move is a forward command held for a computed
//! time. The duration scales with distance and inversely with the PWM speed,
//! and never drops below the base command delay.

use cleanbot_core::constants::{DURATION_SPEED_BASE, ESTIMATE_SPEED_BASE};
use cleanbot_core::{RobotSpeed, Segment, TimingConfig};
use serde::{Deserialize, Serialize};

/// Motor-on time for a forward move of `distance_cm`.
///
/// `max(command_delay, round(distance * factor / (speed / 255)))`
pub fn move_duration_ms(distance_cm: f64, timing: &TimingConfig, speed: RobotSpeed) -> u64 {
    let speed_ratio = speed.as_f64() / DURATION_SPEED_BASE;
    let raw = (distance_cm * timing.cm_to_ms_factor as f64 / speed_ratio).round();
    timing.command_delay_ms.max(raw as u64)
}

/// Distance and time estimate for a drawn route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteStats {
    pub total_distance_m: f64,
    pub total_distance_cm: f64,
    pub estimated_seconds: f64,
}

impl RouteStats {
    /// Computes the estimate for `segments`.
    ///
    /// Every segment is charged one turn, whether or not the compiler
    /// actually emits one. The move time is normalised to speed 128.
    pub fn compute(
        segments: &[Segment],
        timing: &TimingConfig,
        speed: RobotSpeed,
        pixels_per_cm: f64,
    ) -> Self {
        if segments.is_empty() {
            return Self::default();
        }

        let total_px: f64 = segments.iter().map(Segment::length_px).sum();
        let total_distance_cm = total_px / pixels_per_cm;

        let speed_factor = speed.as_f64() / ESTIMATE_SPEED_BASE;
        let move_seconds = (total_distance_cm * timing.cm_to_ms_factor as f64 / 1000.0) / speed_factor;
        let turn_seconds = segments.len() as f64 * (timing.turn_duration_ms as f64 / 1000.0);

        Self {
            total_distance_m: total_distance_cm / 100.0,
            total_distance_cm,
            estimated_seconds: move_seconds + turn_seconds,
        }
    }
}

impl std::fmt::Display for RouteStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.2} m ({} cm), ~{:.1} s",
            self.total_distance_m,
            self.total_distance_cm.round(),
            self.estimated_seconds
        )
    }
}
