//! # Cleanbot
//!
//! Route planning and remote execution for a Wi-Fi floor cleaning robot.
//! Routes are drawn as orthogonal polylines on a canvas, compiled into
//! timed turn and move commands, and streamed to the robot's firmware
//! through a shared realtime key/value store.
//!
//! ## Architecture
//!
//! Cleanbot is organized as a workspace with multiple crates:
//!
//! 1. **cleanbot-core** - Geometry, command codes, timing constants, errors, events
//! 2. **cleanbot-designer** - Drawing surface, route compiler, statistics, export
//! 3. **cleanbot-communication** - Realtime store, actuator gateway, scheduler
//! 4. **cleanbot-settings** - User configuration and the timing form
//! 5. **cleanbot** - The autonomous mode controller tying them together

pub mod controller;

pub use cleanbot_communication as communication;
pub use cleanbot_core::data;
pub use cleanbot_designer as designer;
pub use cleanbot_settings as settings;

pub use controller::AutonomousController;

pub use cleanbot_core::event_bus::{
    AppEvent, ConnectionEvent, DrawingEvent, EventBus, EventCategory, EventFilter,
    ExecutionEvent, NoticeEvent, NoticeLevel, RouteEvent, SettingsEvent,
};
pub use cleanbot_core::{
    event_bus, CommandCode, Error, Point, Result, RobotSpeed, Segment, TimingConfig,
};

pub use cleanbot_designer::{Canvas, Instruction, RouteCompiler, RouteRecord, RouteStats};

pub use cleanbot_communication::{
    ActuatorGateway, CommandScheduler, ConnectionWatcher, ExecutionOutcome, ExecutionState,
    JsonFileStore, MemoryStore, RealtimeStore, RouteRepository,
};

pub use cleanbot_settings::{Config, TimingForm};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Cleanbot {} (built {})", VERSION, BUILD_DATE);
    Ok(())
}
