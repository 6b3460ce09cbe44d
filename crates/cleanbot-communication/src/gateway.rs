//! Actuator gateway: the two writes that reach the robot.

use async_trait::async_trait;
use cleanbot_core::constants::DEFAULT_STORE_ROOT;
use cleanbot_core::{ActuatorError, CommandCode};
use serde_json::Value;
use std::sync::Arc;

use crate::store::RealtimeStore;

/// Destination for robot commands.
///
/// Both calls are fire-and-await: success means the write was accepted by
/// the transport, not that the robot acted on it.
#[async_trait]
pub trait ActuatorGateway: Send + Sync {
    /// Replaces the robot's current command.
    async fn set_command(&self, command: CommandCode) -> Result<(), ActuatorError>;

    /// Sets the PWM duty used by subsequent motion commands.
    async fn set_speed(&self, speed: u8) -> Result<(), ActuatorError>;
}

/// Store keys watched by the firmware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPaths {
    pub command: String,
    pub speed: String,
}

impl TriggerPaths {
    /// `<root>/triggers/command` and `<root>/triggers/speed`.
    pub fn under(root: &str) -> Self {
        Self {
            command: format!("{}/triggers/command", root),
            speed: format!("{}/triggers/speed", root),
        }
    }
}

impl Default for TriggerPaths {
    fn default() -> Self {
        Self::under(DEFAULT_STORE_ROOT)
    }
}

/// Gateway that writes trigger keys in a realtime store.
pub struct StoreActuatorGateway {
    store: Arc<dyn RealtimeStore>,
    paths: TriggerPaths,
}

impl StoreActuatorGateway {
    pub fn new(store: Arc<dyn RealtimeStore>, paths: TriggerPaths) -> Self {
        Self { store, paths }
    }

    pub fn paths(&self) -> &TriggerPaths {
        &self.paths
    }
}

#[async_trait]
impl ActuatorGateway for StoreActuatorGateway {
    async fn set_command(&self, command: CommandCode) -> Result<(), ActuatorError> {
        tracing::debug!("-> command {}", command);
        self.store
            .set(&self.paths.command, Value::String(command.as_str().to_string()))
            .await
            .map_err(|e| ActuatorError::CommandFailed {
                command: command.as_str().to_string(),
                reason: e.to_string(),
            })
    }

    async fn set_speed(&self, speed: u8) -> Result<(), ActuatorError> {
        tracing::debug!("-> speed {}", speed);
        self.store
            .set(&self.paths.speed, Value::from(speed))
            .await
            .map_err(|e| ActuatorError::SpeedFailed {
                speed,
                reason: e.to_string(),
            })
    }
}
