//! Execution state and outcome types.

use cleanbot_core::Point;
use serde::{Deserialize, Serialize};

/// Live view of the running execution.
///
/// Only the scheduler writes these fields, except `cancel_requested`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExecutionState {
    pub is_running: bool,
    pub cancel_requested: bool,
    pub progress_percent: u8,
    pub current_position: Point,
    /// Heading in degrees, clockwise from the resting direction.
    pub heading_degrees: u16,
}

/// Phase of the scheduler state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionPhase {
    Idle,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl ExecutionPhase {
    /// Returns the name of the phase.
    pub fn name(&self) -> &'static str {
        match self {
            ExecutionPhase::Idle => "Idle",
            ExecutionPhase::Running => "Running",
            ExecutionPhase::Completed => "Completed",
            ExecutionPhase::Failed => "Failed",
            ExecutionPhase::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionPhase::Completed | ExecutionPhase::Failed | ExecutionPhase::Cancelled
        )
    }
}

impl std::fmt::Display for ExecutionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a run that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionOutcome {
    Completed,
    Cancelled,
}

impl ExecutionOutcome {
    pub fn phase(&self) -> ExecutionPhase {
        match self {
            ExecutionOutcome::Completed => ExecutionPhase::Completed,
            ExecutionOutcome::Cancelled => ExecutionPhase::Cancelled,
        }
    }
}
