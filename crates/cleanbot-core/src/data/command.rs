//! Firmware command vocabulary.
//!
//! The robot listens on a single "current command" key and reacts to each
//! new value. Motion and pump commands are single characters; the speed
//! marker asks the firmware to re-read the speed key.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// A command understood by the robot firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CommandCode {
    /// Drive both motors forward (`F`)
    Forward,
    /// Pivot left in place (`L`)
    Left,
    /// Pivot right in place (`R`)
    Right,
    /// Cut both motors (`S`)
    Stop,
    /// Cleaning pump on (`W`)
    MotorOn,
    /// Cleaning pump off (`w`)
    MotorOff,
    /// Re-read the speed key (`speed`)
    SpeedMarker,
}

impl CommandCode {
    /// The wire token written to the command key.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandCode::Forward => "F",
            CommandCode::Left => "L",
            CommandCode::Right => "R",
            CommandCode::Stop => "S",
            CommandCode::MotorOn => "W",
            CommandCode::MotorOff => "w",
            CommandCode::SpeedMarker => "speed",
        }
    }

    /// True for commands that set the drive motors in motion.
    pub fn is_motion(&self) -> bool {
        matches!(
            self,
            CommandCode::Forward | CommandCode::Left | CommandCode::Right
        )
    }
}

impl std::fmt::Display for CommandCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommandCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "F" => Ok(CommandCode::Forward),
            "L" => Ok(CommandCode::Left),
            "R" => Ok(CommandCode::Right),
            "S" => Ok(CommandCode::Stop),
            "W" => Ok(CommandCode::MotorOn),
            "w" => Ok(CommandCode::MotorOff),
            "speed" => Ok(CommandCode::SpeedMarker),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

impl TryFrom<String> for CommandCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CommandCode> for String {
    fn from(code: CommandCode) -> Self {
        code.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_case_sensitive() {
        assert_eq!("W".parse::<CommandCode>().unwrap(), CommandCode::MotorOn);
        assert_eq!("w".parse::<CommandCode>().unwrap(), CommandCode::MotorOff);
        assert!("f".parse::<CommandCode>().is_err());
    }

    #[test]
    fn test_serializes_as_token() {
        let json = serde_json::to_string(&CommandCode::SpeedMarker).unwrap();
        assert_eq!(json, "\"speed\"");

        let code: CommandCode = serde_json::from_str("\"R\"").unwrap();
        assert_eq!(code, CommandCode::Right);
    }

    #[test]
    fn test_motion_commands() {
        assert!(CommandCode::Forward.is_motion());
        assert!(CommandCode::Left.is_motion());
        assert!(!CommandCode::Stop.is_motion());
        assert!(!CommandCode::MotorOn.is_motion());
    }
}
