//! Data models shared across the workspace.
//!
//! - [`geometry`]: canvas points and axis-aligned segments
//! - [`command`]: the single-token command vocabulary of the firmware
//! - [`timing`]: robot speed and the timing constants of the motion model

pub mod command;
pub mod geometry;
pub mod timing;

pub use command::CommandCode;
pub use geometry::{Point, Segment};
pub use timing::{RobotSpeed, TimingConfig};
