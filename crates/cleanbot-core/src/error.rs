//! Error handling for Cleanbot
//!
//! Provides error types for all layers of the application:
//! - Store errors (realtime key/value backend)
//! - Actuator errors (commands that failed to reach the robot)
//! - Route errors (empty, missing or malformed routes)
//! - Execution errors (scheduler state machine violations)
//!
//! None of these are fatal: every path that produces one leaves the
//! scheduler idle and the dashboard usable.

use thiserror::Error;

/// Realtime store error type
///
/// Raised by a key/value backend when a read or write cannot be completed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The backend has no live connection
    #[error("Store not connected")]
    NotConnected,

    /// A key path was rejected by the backend
    #[error("Invalid store path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A value could not be encoded or decoded
    #[error("Serialization failed: {reason}")]
    Serialization {
        /// The underlying serializer message.
        reason: String,
    },

    /// Local storage I/O failed
    #[error("Storage I/O error: {reason}")]
    Io {
        /// The underlying I/O message.
        reason: String,
    },

    /// Generic backend error
    #[error("Store error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization {
            reason: e.to_string(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io {
            reason: e.to_string(),
        }
    }
}

/// Actuator gateway error type
///
/// A command or speed write that did not reach the robot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActuatorError {
    /// Writing the command key failed
    #[error("Failed to send command '{command}': {reason}")]
    CommandFailed {
        /// Wire token of the command.
        command: String,
        /// The reason the write failed.
        reason: String,
    },

    /// Writing the speed key failed
    #[error("Failed to set speed {speed}: {reason}")]
    SpeedFailed {
        /// The requested speed.
        speed: u8,
        /// The reason the write failed.
        reason: String,
    },

    /// Store backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Route error type
///
/// Problems with the route being compiled, saved or loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Nothing has been drawn yet
    #[error("Please draw a route first")]
    Empty,

    /// No route is stored under the name
    #[error("No route found with name \"{name}\"")]
    NotFound {
        /// The requested route name.
        name: String,
    },

    /// The name cannot be used as a store key
    #[error("Invalid route name \"{name}\": {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The stored record could not be decoded
    #[error("Malformed route \"{name}\": {reason}")]
    Malformed {
        /// The route name.
        name: String,
        /// The decoding failure.
        reason: String,
    },
}

/// Execution error type
///
/// Failures of the command execution scheduler.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    /// A run is already in flight
    #[error("A route is already running")]
    AlreadyRunning,

    /// The instruction list was empty
    #[error(transparent)]
    Route(#[from] RouteError),

    /// The gateway failed mid-run
    #[error("Error executing route: {0}")]
    Gateway(#[from] ActuatorError),
}

/// Main error type for Cleanbot
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Actuator error
    #[error(transparent)]
    Actuator(#[from] ActuatorError),

    /// Route error
    #[error(transparent)]
    Route(#[from] RouteError),

    /// Execution error
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    /// Speed outside the accepted range
    #[error("Invalid speed {value}: must be within {min}..={max}")]
    InvalidSpeed {
        /// The rejected value.
        value: u8,
        /// Lowest accepted value.
        min: u8,
        /// Highest accepted value.
        max: u8,
    },

    /// A timing constant is not usable
    #[error("Invalid timing setting '{field}': {reason}")]
    InvalidTiming {
        /// The field name.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unrecognised firmware command token
    #[error("Unknown command token: {0}")]
    UnknownCommand(String),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an empty-route error
    pub fn is_empty_route(&self) -> bool {
        matches!(
            self,
            Error::Route(RouteError::Empty)
                | Error::Execution(ExecutionError::Route(RouteError::Empty))
        )
    }

    /// Check if this is a route-not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Route(RouteError::NotFound { .. }))
    }

    /// Check if this error came from the actuator gateway
    pub fn is_gateway_error(&self) -> bool {
        matches!(
            self,
            Error::Actuator(_) | Error::Execution(ExecutionError::Gateway(_))
        )
    }

    /// Check if this is a store error
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_error_messages() {
        assert_eq!(RouteError::Empty.to_string(), "Please draw a route first");
        let err = RouteError::NotFound {
            name: "kitchen".to_string(),
        };
        assert_eq!(err.to_string(), "No route found with name \"kitchen\"");
    }

    #[test]
    fn test_execution_error_wraps_gateway() {
        let err: ExecutionError = ActuatorError::CommandFailed {
            command: "F".to_string(),
            reason: "offline".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Error executing route: Failed to send command 'F': offline"
        );
    }

    #[test]
    fn test_classification() {
        let err: Error = RouteError::Empty.into();
        assert!(err.is_empty_route());

        let err: Error = ExecutionError::Route(RouteError::Empty).into();
        assert!(err.is_empty_route());

        let err: Error = ActuatorError::Store(StoreError::NotConnected).into();
        assert!(err.is_gateway_error());
        assert!(!err.is_store_error());

        let err: Error = RouteError::NotFound {
            name: "x".to_string(),
        }
        .into();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: StoreError = io_err.into();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
