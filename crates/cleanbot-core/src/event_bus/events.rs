//! Event type definitions for the event bus.
//!
//! Events are grouped by category and are cloneable and serializable so
//! they can be logged or replayed.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::Point;

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Canvas edits
    Drawing(DrawingEvent),
    /// Route compilation and persistence
    Route(RouteEvent),
    /// Command execution progress
    Execution(ExecutionEvent),
    /// Robot link state
    Connection(ConnectionEvent),
    /// Settings and configuration
    Settings(SettingsEvent),
    /// User-facing notices
    Notice(NoticeEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Drawing(_) => EventCategory::Drawing,
            AppEvent::Route(_) => EventCategory::Route,
            AppEvent::Execution(_) => EventCategory::Execution,
            AppEvent::Connection(_) => EventCategory::Connection,
            AppEvent::Settings(_) => EventCategory::Settings,
            AppEvent::Notice(_) => EventCategory::Notice,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Drawing(e) => e.description(),
            AppEvent::Route(e) => e.description(),
            AppEvent::Execution(e) => e.description(),
            AppEvent::Connection(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
            AppEvent::Notice(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Drawing,
    Route,
    Execution,
    Connection,
    Settings,
    Notice,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventCategory::Drawing => "Drawing",
            EventCategory::Route => "Route",
            EventCategory::Execution => "Execution",
            EventCategory::Connection => "Connection",
            EventCategory::Settings => "Settings",
            EventCategory::Notice => "Notice",
        };
        write!(f, "{}", name)
    }
}

/// Drawing surface events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawingEvent {
    /// The segment list changed (append, delete or clear).
    SegmentsChanged {
        /// Number of segments now on the canvas.
        count: usize,
    },
    /// Drawing mode was switched on or off.
    ModeChanged {
        /// True when strokes are being captured.
        drawing: bool,
    },
    /// The selected segment changed.
    SelectionChanged {
        /// Index of the selected segment, if any.
        index: Option<usize>,
    },
}

impl DrawingEvent {
    fn description(&self) -> String {
        match self {
            DrawingEvent::SegmentsChanged { count } => format!("{} segment(s) on canvas", count),
            DrawingEvent::ModeChanged { drawing } => {
                if *drawing {
                    "Drawing mode on".to_string()
                } else {
                    "Drawing mode off".to_string()
                }
            }
            DrawingEvent::SelectionChanged { index } => match index {
                Some(i) => format!("Segment {} selected", i),
                None => "Selection cleared".to_string(),
            },
        }
    }
}

/// Route events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RouteEvent {
    /// Distance and time estimates were recomputed.
    StatsUpdated {
        /// Total distance in centimetres.
        total_distance_cm: f64,
        /// Estimated run time in seconds.
        estimated_seconds: f64,
    },
    /// A route was written to the store.
    Saved {
        /// Route name.
        name: String,
        /// Number of segments saved.
        segments: usize,
    },
    /// A route was read from the store.
    Loaded {
        /// Route name.
        name: String,
        /// Number of segments loaded.
        segments: usize,
    },
    /// The instruction list was written to an export file.
    Exported {
        /// Destination file.
        path: PathBuf,
        /// Number of instructions written.
        instructions: usize,
    },
}

impl RouteEvent {
    fn description(&self) -> String {
        match self {
            RouteEvent::StatsUpdated {
                total_distance_cm,
                estimated_seconds,
            } => format!(
                "Route: {:.1} cm, ~{:.1} s",
                total_distance_cm, estimated_seconds
            ),
            RouteEvent::Saved { name, segments } => {
                format!("Route '{}' saved ({} segments)", name, segments)
            }
            RouteEvent::Loaded { name, segments } => {
                format!("Route '{}' loaded ({} segments)", name, segments)
            }
            RouteEvent::Exported { path, instructions } => format!(
                "Exported {} instructions to {}",
                instructions,
                path.display()
            ),
        }
    }
}

/// Command execution events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionEvent {
    /// A run started.
    Started {
        /// Number of instructions in the run.
        instructions: usize,
    },
    /// Progress advanced.
    Progress {
        /// Percent complete, 0..=100.
        percent: u8,
    },
    /// The simulated robot moved or turned.
    Position {
        /// Marker position on the canvas.
        position: Point,
        /// Heading in degrees, 0..360.
        heading: u16,
    },
    /// A run ended and the scheduler is idle again.
    Finished {
        /// True when the run was cancelled before completion.
        cancelled: bool,
    },
    /// A run ended because the robot could not be reached.
    Failed {
        /// Error message.
        reason: String,
    },
}

impl ExecutionEvent {
    fn description(&self) -> String {
        match self {
            ExecutionEvent::Started { instructions } => {
                format!("Execution started ({} instructions)", instructions)
            }
            ExecutionEvent::Progress { percent } => format!("Progress: {}%", percent),
            ExecutionEvent::Position { position, heading } => format!(
                "Robot at ({:.1}, {:.1}) heading {}°",
                position.x, position.y, heading
            ),
            ExecutionEvent::Finished { cancelled } => {
                if *cancelled {
                    "Execution cancelled".to_string()
                } else {
                    "Execution completed".to_string()
                }
            }
            ExecutionEvent::Failed { reason } => format!("Execution failed: {}", reason),
        }
    }
}

/// Robot link events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectionEvent {
    /// The store reported a change in connectivity.
    StateChanged {
        /// True when the robot link is up.
        connected: bool,
    },
}

impl ConnectionEvent {
    fn description(&self) -> String {
        match self {
            ConnectionEvent::StateChanged { connected: true } => "Connected".to_string(),
            ConnectionEvent::StateChanged { connected: false } => "Disconnected".to_string(),
        }
    }
}

/// Settings events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// Timing constants were changed.
    TimingChanged,
    /// Robot speed was changed.
    SpeedChanged {
        /// New PWM value.
        speed: u8,
    },
    /// Configuration was loaded from disk.
    Loaded {
        /// Source file.
        path: PathBuf,
    },
    /// Configuration was saved to disk.
    Saved {
        /// Destination file.
        path: PathBuf,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::TimingChanged => "Timing settings updated".to_string(),
            SettingsEvent::SpeedChanged { speed } => format!("Speed: {}", speed),
            SettingsEvent::Loaded { path } => format!("Settings loaded from {}", path.display()),
            SettingsEvent::Saved { path } => format!("Settings saved to {}", path.display()),
        }
    }
}

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A message meant for the person at the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeEvent {
    pub level: NoticeLevel,
    pub message: String,
}

impl NoticeEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    fn description(&self) -> String {
        format!("[{:?}] {}", self.level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_category() {
        let event = AppEvent::Connection(ConnectionEvent::StateChanged { connected: true });
        assert_eq!(event.category(), EventCategory::Connection);

        let event = AppEvent::Notice(NoticeEvent::info("hello"));
        assert_eq!(event.category(), EventCategory::Notice);
    }

    #[test]
    fn test_event_description() {
        let event = AppEvent::Route(RouteEvent::Saved {
            name: "kitchen".to_string(),
            segments: 3,
        });
        assert!(event.description().contains("kitchen"));

        let event = AppEvent::Execution(ExecutionEvent::Finished { cancelled: true });
        assert_eq!(event.description(), "Execution cancelled");
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Execution(ExecutionEvent::Position {
            position: Point::new(10.0, 20.0),
            heading: 270,
        });
        let json = serde_json::to_string(&event).expect("Should serialize");
        let parsed: AppEvent = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(parsed, event);
    }

    #[test]
    fn test_notice_constructors() {
        assert_eq!(NoticeEvent::error("x").level, NoticeLevel::Error);
        assert_eq!(NoticeEvent::success("x").level, NoticeLevel::Success);
    }
}
