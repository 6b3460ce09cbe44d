//! Command execution scheduler.
//!
//! Streams compiled instructions to the actuator gateway one at a time:
//! each command is held for its planned duration, then followed by an
//! explicit stop and a short gap so the robot decelerates before the next
//! command arrives. The run is open loop; the scheduler animates an
//! estimated robot position from the instruction geometry.

use cleanbot_core::constants::{MOVE_ANIMATION_STEPS, SETTLING_DELAY_MS};
use cleanbot_core::{
    thread_safe, thread_safe_rw, ActuatorError, CommandCode, ExecutionError, Point, RobotSpeed,
    RouteError, ThreadSafe, ThreadSafeRw, TimingConfig,
};
use cleanbot_designer::Instruction;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use uuid::Uuid;

use crate::gateway::ActuatorGateway;

use super::cancel::CancellationToken;
use super::listener::{ExecutionListener, ExecutionListenerHandle};
use super::state::{ExecutionOutcome, ExecutionPhase, ExecutionState};

/// Everything a run needs, fixed when the run starts.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    pub instructions: Vec<Instruction>,
    /// Where the robot marker starts, normally the first waypoint.
    pub origin: Point,
    pub timing: TimingConfig,
    pub speed: RobotSpeed,
}

impl ExecutionPlan {
    /// Plan starting at the first instruction's segment start.
    pub fn new(instructions: Vec<Instruction>, timing: TimingConfig, speed: RobotSpeed) -> Self {
        let origin = instructions
            .first()
            .map(|i| i.segment().p1)
            .unwrap_or_default();
        Self {
            instructions,
            origin,
            timing,
            speed,
        }
    }

    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }
}

type ListenerList = Vec<(ExecutionListenerHandle, Arc<dyn ExecutionListener>)>;

/// Runs one execution at a time against an actuator gateway.
pub struct CommandScheduler {
    gateway: Arc<dyn ActuatorGateway>,
    /// Serialises every gateway write, including out-of-band stops.
    gateway_lock: AsyncMutex<()>,
    running: AtomicBool,
    state: ThreadSafeRw<ExecutionState>,
    token: ThreadSafe<CancellationToken>,
    last_phase: ThreadSafeRw<Option<ExecutionPhase>>,
    listeners: ThreadSafeRw<ListenerList>,
}

impl CommandScheduler {
    pub fn new(gateway: Arc<dyn ActuatorGateway>) -> Self {
        Self {
            gateway,
            gateway_lock: AsyncMutex::new(()),
            running: AtomicBool::new(false),
            state: thread_safe_rw(ExecutionState::default()),
            token: thread_safe(CancellationToken::new()),
            last_phase: thread_safe_rw(None),
            listeners: thread_safe_rw(Vec::new()),
        }
    }

    /// Snapshot of the execution state.
    pub fn state(&self) -> ExecutionState {
        *self.state.read()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> ExecutionPhase {
        if self.is_running() {
            ExecutionPhase::Running
        } else {
            ExecutionPhase::Idle
        }
    }

    /// Terminal phase of the most recent run.
    pub fn last_phase(&self) -> Option<ExecutionPhase> {
        *self.last_phase.read()
    }

    /// Moves the idle marker, e.g. to the canvas centre. Ignored while running.
    pub fn set_idle_position(&self, position: Point) {
        if !self.is_running() {
            self.state.write().current_position = position;
        }
    }

    pub fn register_listener(
        &self,
        listener: Arc<dyn ExecutionListener>,
    ) -> ExecutionListenerHandle {
        let handle = ExecutionListenerHandle(Uuid::new_v4().to_string());
        self.listeners.write().push((handle.clone(), listener));
        handle
    }

    pub fn unregister_listener(&self, handle: &ExecutionListenerHandle) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(h, _)| h != handle);
        listeners.len() != before
    }

    fn listeners(&self) -> Vec<Arc<dyn ExecutionListener>> {
        self.listeners.read().iter().map(|(_, l)| l.clone()).collect()
    }

    /// Sends one command through the serialised gateway.
    pub async fn send_command(&self, command: CommandCode) -> Result<(), ActuatorError> {
        let _guard = self.gateway_lock.lock().await;
        self.gateway.set_command(command).await
    }

    /// Sets the robot speed through the serialised gateway.
    pub async fn send_speed(&self, speed: u8) -> Result<(), ActuatorError> {
        let _guard = self.gateway_lock.lock().await;
        self.gateway.set_speed(speed).await
    }

    /// Requests cancellation of the current run and stops the robot now.
    ///
    /// The running loop notices the flag at its next poll and performs its
    /// own teardown, which sends the final stop.
    pub async fn cancel(&self) -> Result<(), ActuatorError> {
        let running = {
            let token = self.token.lock();
            token.cancel();
            let running = self.is_running();
            if running {
                self.state.write().cancel_requested = true;
            }
            running
        };
        if running {
            tracing::warn!("Cancellation requested");
        }
        self.send_command(CommandCode::Stop).await
    }

    /// Executes `plan` to completion, cancellation or failure.
    ///
    /// An empty plan is rejected before any state changes, as is a second
    /// run while one is in flight. Whatever happens after that, the robot
    /// receives a final stop and the scheduler returns to idle.
    pub async fn run(
        &self,
        plan: ExecutionPlan,
        cancel: CancellationToken,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        if plan.instructions.is_empty() {
            return Err(RouteError::Empty.into());
        }
        {
            // Claiming the run and installing its token happen under the
            // token lock so a concurrent cancel always sees both or neither
            let mut token = self.token.lock();
            if self
                .running
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                tracing::warn!("Rejected start: a route is already running");
                return Err(ExecutionError::AlreadyRunning);
            }
            *token = cancel.clone();
            *self.state.write() = ExecutionState {
                is_running: true,
                cancel_requested: cancel.is_cancelled(),
                progress_percent: 0,
                current_position: plan.origin,
                heading_degrees: 0,
            };
        }

        let total = plan.instructions.len();
        tracing::info!("Starting route: {} instructions at speed {}", total, plan.speed);
        for listener in self.listeners() {
            listener.on_started(total).await;
        }

        let result = self.drive(&plan, &cancel).await;

        // Teardown: always leave the robot stopped
        let stop = self.send_command(CommandCode::Stop).await;
        let result = match (result, stop) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => Err(ExecutionError::Gateway(e)),
            (Err(e), stop) => {
                if let Err(stop_err) = stop {
                    tracing::error!("Final stop failed: {}", stop_err);
                }
                Err(ExecutionError::Gateway(e))
            }
        };

        {
            let mut state = self.state.write();
            if result == Ok(ExecutionOutcome::Completed) {
                state.progress_percent = 100;
            }
            state.is_running = false;
            state.cancel_requested = false;
        }
        self.running.store(false, Ordering::SeqCst);

        let phase = match &result {
            Ok(outcome) => outcome.phase(),
            Err(_) => ExecutionPhase::Failed,
        };
        *self.last_phase.write() = Some(phase);

        match &result {
            Ok(ExecutionOutcome::Completed) => {
                tracing::info!("Route completed");
                self.notify_progress(100).await;
            }
            Ok(ExecutionOutcome::Cancelled) => tracing::warn!("Route cancelled"),
            Err(e) => tracing::error!("Route failed: {}", e),
        }
        for listener in self.listeners() {
            match &result {
                Ok(outcome) => listener.on_finished(*outcome).await,
                Err(e) => listener.on_error(e).await,
            }
        }

        result
    }

    async fn drive(
        &self,
        plan: &ExecutionPlan,
        cancel: &CancellationToken,
    ) -> Result<ExecutionOutcome, ActuatorError> {
        let timing = plan.timing;
        let total = plan.instructions.len();

        self.send_speed(plan.speed.value()).await?;
        tokio::time::sleep(Duration::from_millis(SETTLING_DELAY_MS)).await;

        for (index, instruction) in plan.instructions.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::warn!("Movement stopped before instruction {}", index + 1);
                return Ok(ExecutionOutcome::Cancelled);
            }

            let command = instruction.command();
            tracing::debug!(
                "[{}/{}] {} for {} ms",
                index + 1,
                total,
                command,
                instruction.duration_ms()
            );
            self.send_command(command).await?;

            // 100% is reserved for a completed run
            let progress = ((100 * (index + 1)) as f64 / total as f64).round().min(99.0) as u8;
            self.state.write().progress_percent = progress;
            self.notify_progress(progress).await;

            match instruction {
                Instruction::Turn {
                    turn,
                    duration_ms,
                    segment,
                } => {
                    let (position, heading) = {
                        let mut state = self.state.write();
                        state.current_position = segment.p1;
                        state.heading_degrees = (state.heading_degrees + turn.heading_delta()) % 360;
                        (state.current_position, state.heading_degrees)
                    };
                    self.notify_position(position, heading).await;
                    tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
                }
                Instruction::Move {
                    duration_ms,
                    segment,
                    ..
                } => {
                    let step = Duration::from_millis(*duration_ms) / MOVE_ANIMATION_STEPS;
                    for n in 1..=MOVE_ANIMATION_STEPS {
                        if cancel.is_cancelled() {
                            break;
                        }
                        tokio::time::sleep(step).await;
                        let (position, heading) = {
                            let mut state = self.state.write();
                            state.current_position =
                                segment.point_at(n as f64 / MOVE_ANIMATION_STEPS as f64);
                            (state.current_position, state.heading_degrees)
                        };
                        self.notify_position(position, heading).await;
                    }
                }
            }

            if cancel.is_cancelled() {
                tracing::warn!("Movement stopped during instruction {}", index + 1);
                return Ok(ExecutionOutcome::Cancelled);
            }

            if index + 1 < total {
                self.send_command(CommandCode::Stop).await?;
                tokio::time::sleep(Duration::from_millis(timing.command_delay_ms)).await;
            }
        }

        Ok(ExecutionOutcome::Completed)
    }

    async fn notify_progress(&self, percent: u8) {
        for listener in self.listeners() {
            listener.on_progress(percent).await;
        }
    }

    async fn notify_position(&self, position: Point, heading: u16) {
        for listener in self.listeners() {
            listener.on_position(position, heading).await;
        }
    }
}
