//! Execution listener interface

use async_trait::async_trait;
use cleanbot_core::{ExecutionError, Point};

use super::state::ExecutionOutcome;

/// Handle for a registered execution listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionListenerHandle(pub String);

/// Listener trait for execution progress
///
/// Called inline by the scheduler, in registration order. Implementations
/// should return quickly since the run waits for them.
#[async_trait]
pub trait ExecutionListener: Send + Sync {
    /// Called once the run has claimed the scheduler
    async fn on_started(&self, _instructions: usize) {}

    /// Called after each instruction is sent
    async fn on_progress(&self, _percent: u8) {}

    /// Called when the simulated robot moves or turns
    async fn on_position(&self, _position: Point, _heading_degrees: u16) {}

    /// Called after teardown of a run that did not fail
    async fn on_finished(&self, _outcome: ExecutionOutcome) {}

    /// Called after teardown of a failed run
    async fn on_error(&self, _error: &ExecutionError) {}
}
