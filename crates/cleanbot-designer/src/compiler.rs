//! Route compiler.
//!
//! Converts the drawn segments into the discrete turn and move instructions
//! the robot understands. The robot starts facing north (up the canvas) and
//! the compiler threads its heading through the segments, emitting a turn
//! only when the direction changes.

use cleanbot_core::constants::PIXELS_PER_CM;
use cleanbot_core::{CommandCode, RobotSpeed, Segment, TimingConfig};
use serde::{Deserialize, Serialize};

use crate::timing::move_duration_ms;

/// Compass direction of a segment on the canvas (north is up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Direction of travel along `segment`; exact ties count as vertical.
    pub fn of(segment: &Segment) -> Self {
        let (dx, dy) = (segment.dx(), segment.dy());
        if segment.is_horizontal() {
            if dx > 0.0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0.0 {
            Direction::South
        } else {
            Direction::North
        }
    }

    /// Turns needed to face this direction from the resting heading.
    pub fn initial_turns(self) -> &'static [Turn] {
        match self {
            Direction::North => &[],
            Direction::East => &[Turn::Right],
            Direction::West => &[Turn::Left],
            Direction::South => &[Turn::Right, Turn::Right],
        }
    }

    /// The single turn that takes the robot from `self` to `to`.
    ///
    /// Reversals are encoded as one turn, unlike the initial south case.
    pub fn turn_to(self, to: Direction) -> Option<Turn> {
        use Direction::*;
        match (self, to) {
            (East, North) => Some(Turn::Left),
            (East, South) => Some(Turn::Right),
            (East, West) => Some(Turn::Right),
            (West, North) => Some(Turn::Right),
            (West, South) => Some(Turn::Left),
            (West, East) => Some(Turn::Right),
            (North, South) => Some(Turn::Right),
            (North, East) => Some(Turn::Right),
            (North, West) => Some(Turn::Left),
            (South, North) => Some(Turn::Right),
            (South, East) => Some(Turn::Left),
            (South, West) => Some(Turn::Right),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

/// A 90 degree pivot in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

impl Turn {
    pub fn command(self) -> CommandCode {
        match self {
            Turn::Left => CommandCode::Left,
            Turn::Right => CommandCode::Right,
        }
    }

    /// Clockwise change of heading in degrees, in `0..360`.
    pub fn heading_delta(self) -> u16 {
        match self {
            Turn::Right => 90,
            Turn::Left => 270,
        }
    }
}

/// One compiled robot instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    Turn {
        turn: Turn,
        duration_ms: u64,
        segment: Segment,
    },
    Move {
        distance_cm: u32,
        duration_ms: u64,
        segment: Segment,
    },
}

impl Instruction {
    /// Firmware command sent for this instruction.
    pub fn command(&self) -> CommandCode {
        match self {
            Instruction::Turn { turn, .. } => turn.command(),
            Instruction::Move { .. } => CommandCode::Forward,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Instruction::Turn { duration_ms, .. } | Instruction::Move { duration_ms, .. } => {
                *duration_ms
            }
        }
    }

    /// The drawn segment this instruction was compiled from.
    pub fn segment(&self) -> &Segment {
        match self {
            Instruction::Turn { segment, .. } | Instruction::Move { segment, .. } => segment,
        }
    }

    pub fn is_turn(&self) -> bool {
        matches!(self, Instruction::Turn { .. })
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Instruction::Turn { .. } => "turn",
            Instruction::Move { .. } => "move",
        }
    }
}

/// Compiles segments with fixed timing, speed and canvas scale.
#[derive(Debug, Clone, Copy)]
pub struct RouteCompiler {
    pub timing: TimingConfig,
    pub speed: RobotSpeed,
    pub pixels_per_cm: f64,
}

impl Default for RouteCompiler {
    fn default() -> Self {
        Self {
            timing: TimingConfig::default(),
            speed: RobotSpeed::default(),
            pixels_per_cm: PIXELS_PER_CM,
        }
    }
}

impl RouteCompiler {
    pub fn new(timing: TimingConfig, speed: RobotSpeed, pixels_per_cm: f64) -> Self {
        Self {
            timing,
            speed,
            pixels_per_cm,
        }
    }

    /// Compiles `segments` in order. An empty slice yields no instructions.
    pub fn compile(&self, segments: &[Segment]) -> Vec<Instruction> {
        let mut instructions = Vec::with_capacity(segments.len() * 2);
        let mut heading: Option<Direction> = None;

        for segment in segments {
            let direction = Direction::of(segment);
            let turns: &[Turn] = match heading {
                None => direction.initial_turns(),
                Some(current) => match current.turn_to(direction) {
                    Some(Turn::Left) => &[Turn::Left],
                    Some(Turn::Right) => &[Turn::Right],
                    None => &[],
                },
            };
            heading = Some(direction);

            for &turn in turns {
                instructions.push(Instruction::Turn {
                    turn,
                    duration_ms: self.timing.turn_duration_ms,
                    segment: *segment,
                });
            }

            let distance_cm = segment.length_cm(self.pixels_per_cm);
            instructions.push(Instruction::Move {
                distance_cm: distance_cm.round() as u32,
                duration_ms: move_duration_ms(distance_cm, &self.timing, self.speed),
                segment: *segment,
            });
        }

        tracing::debug!(
            "Compiled {} segments into {} instructions",
            segments.len(),
            instructions.len()
        );
        instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanbot_core::Point;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    fn commands(instructions: &[Instruction]) -> Vec<CommandCode> {
        instructions.iter().map(Instruction::command).collect()
    }

    #[test]
    fn test_direction_classification() {
        assert_eq!(Direction::of(&seg(0.0, 0.0, 10.0, 0.0)), Direction::East);
        assert_eq!(Direction::of(&seg(0.0, 0.0, -10.0, 0.0)), Direction::West);
        assert_eq!(Direction::of(&seg(0.0, 0.0, 0.0, 10.0)), Direction::South);
        assert_eq!(Direction::of(&seg(0.0, 0.0, 0.0, -10.0)), Direction::North);
        assert_eq!(Direction::of(&seg(0.0, 0.0, 0.0, 0.0)), Direction::North);
    }

    #[test]
    fn test_single_east_segment() {
        let instructions = RouteCompiler::default().compile(&[seg(100.0, 100.0, 150.0, 100.0)]);
        assert_eq!(instructions.len(), 2);
        assert_eq!(
            instructions[0],
            Instruction::Turn {
                turn: Turn::Right,
                duration_ms: 1000,
                segment: seg(100.0, 100.0, 150.0, 100.0),
            }
        );
        assert_eq!(
            instructions[1],
            Instruction::Move {
                distance_cm: 10,
                duration_ms: 2988,
                segment: seg(100.0, 100.0, 150.0, 100.0),
            }
        );
    }

    #[test]
    fn test_first_segment_turns() {
        let compiler = RouteCompiler::default();
        assert_eq!(
            commands(&compiler.compile(&[seg(0.0, 0.0, 0.0, -50.0)])),
            vec![CommandCode::Forward]
        );
        assert_eq!(
            commands(&compiler.compile(&[seg(0.0, 0.0, 0.0, 50.0)])),
            vec![CommandCode::Right, CommandCode::Right, CommandCode::Forward]
        );
        assert_eq!(
            commands(&compiler.compile(&[seg(0.0, 0.0, -50.0, 0.0)])),
            vec![CommandCode::Left, CommandCode::Forward]
        );
    }

    #[test]
    fn test_east_then_north_turns_left_once() {
        let instructions = RouteCompiler::default().compile(&[
            seg(0.0, 100.0, 50.0, 100.0),
            seg(50.0, 100.0, 50.0, 50.0),
        ]);
        assert_eq!(
            commands(&instructions),
            vec![
                CommandCode::Right,
                CommandCode::Forward,
                CommandCode::Left,
                CommandCode::Forward
            ]
        );
    }

    #[test]
    fn test_same_direction_emits_no_turn() {
        let instructions = RouteCompiler::default().compile(&[
            seg(0.0, 0.0, 50.0, 0.0),
            seg(50.0, 0.0, 100.0, 0.0),
            seg(100.0, 0.0, 150.0, 0.0),
        ]);
        assert_eq!(instructions.iter().filter(|i| i.is_turn()).count(), 1);
        assert_eq!(instructions.len(), 4);
    }

    #[test]
    fn test_reversal_is_single_right_turn() {
        let instructions = RouteCompiler::default().compile(&[
            seg(0.0, 0.0, 50.0, 0.0),
            seg(50.0, 0.0, 0.0, 0.0),
        ]);
        assert_eq!(
            commands(&instructions),
            vec![
                CommandCode::Right,
                CommandCode::Forward,
                CommandCode::Right,
                CommandCode::Forward
            ]
        );
    }

    #[test]
    fn test_adjacency_table() {
        use Direction::*;
        let expected = [
            (East, North, Some(Turn::Left)),
            (East, South, Some(Turn::Right)),
            (East, West, Some(Turn::Right)),
            (West, North, Some(Turn::Right)),
            (West, South, Some(Turn::Left)),
            (West, East, Some(Turn::Right)),
            (North, South, Some(Turn::Right)),
            (North, East, Some(Turn::Right)),
            (North, West, Some(Turn::Left)),
            (South, North, Some(Turn::Right)),
            (South, East, Some(Turn::Left)),
            (South, West, Some(Turn::Right)),
        ];
        for (from, to, turn) in expected {
            assert_eq!(from.turn_to(to), turn, "{} -> {}", from.name(), to.name());
        }
        for dir in [North, South, East, West] {
            assert_eq!(dir.turn_to(dir), None);
        }
    }

    #[test]
    fn test_zero_length_move_uses_command_delay() {
        let instructions = RouteCompiler::default().compile(&[seg(10.0, 10.0, 10.0, 10.0)]);
        assert_eq!(
            instructions,
            vec![Instruction::Move {
                distance_cm: 0,
                duration_ms: 100,
                segment: seg(10.0, 10.0, 10.0, 10.0),
            }]
        );
    }

    #[test]
    fn test_empty_route_compiles_to_nothing() {
        assert!(RouteCompiler::default().compile(&[]).is_empty());
    }

    #[test]
    fn test_turn_duration_follows_timing() {
        let timing = TimingConfig {
            turn_duration_ms: 750,
            ..Default::default()
        };
        let compiler = RouteCompiler::new(timing, RobotSpeed::DEFAULT, PIXELS_PER_CM);
        let instructions = compiler.compile(&[seg(0.0, 0.0, 30.0, 0.0)]);
        assert_eq!(instructions[0].duration_ms(), 750);
    }
}
