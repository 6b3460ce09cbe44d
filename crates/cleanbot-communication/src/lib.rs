//! # Cleanbot Communication
//!
//! Everything between the route designer and the physical robot:
//! - a realtime key/value store abstraction with in-memory and JSON-file
//!   backends
//! - the actuator gateway that writes the firmware's trigger keys
//! - named route persistence in the same store
//! - the command execution scheduler
//! - a connection watcher feeding the event bus

pub mod connection;
pub mod execution;
pub mod gateway;
pub mod routes;
pub mod store;

pub use connection::ConnectionWatcher;
pub use execution::{
    CancellationToken, CommandScheduler, ExecutionListener, ExecutionListenerHandle,
    ExecutionOutcome, ExecutionPhase, ExecutionPlan, ExecutionState,
};
pub use gateway::{ActuatorGateway, StoreActuatorGateway, TriggerPaths};
pub use routes::{validate_route_name, RouteRepository};
pub use store::{JsonFileStore, MemoryStore, RealtimeStore, StoreEvent};
