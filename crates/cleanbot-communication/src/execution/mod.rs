//! Command execution: the scheduler that streams a compiled route to the
//! robot, its cancellation token, state and listener hooks.

mod cancel;
mod listener;
mod scheduler;
mod state;

pub use cancel::CancellationToken;
pub use listener::{ExecutionListener, ExecutionListenerHandle};
pub use scheduler::{CommandScheduler, ExecutionPlan};
pub use state::{ExecutionOutcome, ExecutionPhase, ExecutionState};
