//! # Cleanbot Core
//!
//! Core types, errors and events shared by every Cleanbot crate.
//! Provides the canvas geometry the route designer works in, the command
//! vocabulary understood by the robot firmware, the timing constants that
//! turn distances into motor-on durations, and the application event bus.

pub mod constants;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod types;

pub use data::{CommandCode, Point, RobotSpeed, Segment, TimingConfig};

pub use error::{ActuatorError, Error, ExecutionError, Result, RouteError, StoreError};

// Re-export event bus for convenience
pub use event_bus::{
    event_bus, AppEvent, EventBus, EventBusConfig, EventCategory, EventFilter, SubscriptionId,
};

pub use types::{thread_safe, thread_safe_rw, ThreadSafe, ThreadSafeRw};
