//! Route export file for offline playback on the robot.
//!
//! The firmware reads a pretty-printed JSON array; each entry carries the
//! instruction type, command token, duration, rounded distance (moves only)
//! and the source segment's endpoints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compiler::Instruction;

/// Endpoint coordinates of the source segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportCoords {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// One instruction in the export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub command: String,
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    pub coords: ExportCoords,
}

impl From<&Instruction> for ExportEntry {
    fn from(instruction: &Instruction) -> Self {
        let (x1, y1, x2, y2) = instruction.segment().coords();
        let distance = match instruction {
            Instruction::Move { distance_cm, .. } => Some(*distance_cm),
            Instruction::Turn { .. } => None,
        };
        Self {
            kind: instruction.type_name().to_string(),
            command: instruction.command().as_str().to_string(),
            duration: instruction.duration_ms(),
            distance,
            coords: ExportCoords { x1, y1, x2, y2 },
        }
    }
}

/// Serializes instructions to the export JSON text.
pub fn to_export_json(instructions: &[Instruction]) -> Result<String> {
    let entries: Vec<ExportEntry> = instructions.iter().map(ExportEntry::from).collect();
    serde_json::to_string_pretty(&entries).context("Failed to serialize route export")
}

/// Writes the export file to `path`.
pub fn write_export<P: AsRef<Path>>(path: P, instructions: &[Instruction]) -> Result<()> {
    let path = path.as_ref();
    let json = to_export_json(instructions)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write route export to {}", path.display()))?;
    tracing::info!(
        "Exported {} instructions to {}",
        instructions.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::RouteCompiler;
    use cleanbot_core::{Point, Segment};

    #[test]
    fn test_export_fields() {
        let segment = Segment::new(Point::new(100.0, 100.0), Point::new(150.0, 100.0));
        let instructions = RouteCompiler::default().compile(&[segment]);
        let json = to_export_json(&instructions).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let turn = &value[0];
        assert_eq!(turn["type"], "turn");
        assert_eq!(turn["command"], "R");
        assert_eq!(turn["duration"], 1000);
        assert!(turn.get("distance").is_none());

        let mv = &value[1];
        assert_eq!(mv["type"], "move");
        assert_eq!(mv["command"], "F");
        assert_eq!(mv["distance"], 10);
        assert_eq!(mv["duration"], 2988);
        assert_eq!(mv["coords"]["x2"], 150.0);
    }

    #[test]
    fn test_export_is_pretty_printed() {
        let segment = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, -10.0));
        let json = to_export_json(&RouteCompiler::default().compile(&[segment])).unwrap();
        assert!(json.starts_with("[\n"));
    }
}
