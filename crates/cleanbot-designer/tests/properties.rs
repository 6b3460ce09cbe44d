//! Property tests for the drawing surface and the route compiler.
//!
//! Run with: cargo test -p cleanbot-designer --test properties

use cleanbot_core::{CommandCode, Point};
use cleanbot_designer::{snap, Canvas, Instruction, RouteCompiler};
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point> {
    (-2000.0..2000.0f64, -2000.0..2000.0f64).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn snapped_endpoint_is_axis_aligned(anchor in arb_point(), cursor in arb_point()) {
        let end = snap(anchor, cursor);
        prop_assert!(end.x == anchor.x || end.y == anchor.y);
    }

    #[test]
    fn canvas_never_produces_diagonals(clicks in prop::collection::vec(arb_point(), 1..20)) {
        let mut canvas = Canvas::new();
        canvas.toggle_drawing_mode();
        for click in &clicks {
            canvas.press(*click);
        }
        prop_assert_eq!(canvas.segment_count(), clicks.len() - 1);
        prop_assert_eq!(canvas.waypoints().len(), clicks.len());
        for segment in canvas.segments() {
            prop_assert!(segment.dx() == 0.0 || segment.dy() == 0.0);
        }
    }

    #[test]
    fn one_move_per_segment(clicks in prop::collection::vec(arb_point(), 2..20)) {
        let mut canvas = Canvas::new();
        canvas.toggle_drawing_mode();
        for click in &clicks {
            canvas.press(*click);
        }
        let instructions = RouteCompiler::default().compile(canvas.segments());

        let moves = instructions.iter().filter(|i| !i.is_turn()).count();
        prop_assert_eq!(moves, canvas.segment_count());

        // Every instruction list ends with a move
        prop_assert_eq!(
            instructions.last().map(Instruction::command),
            Some(CommandCode::Forward)
        );

        // At most one turn between moves, except the initial reversal
        let turns = instructions.len() - moves;
        prop_assert!(turns <= canvas.segment_count() + 1);
    }

    #[test]
    fn move_duration_never_below_command_delay(clicks in prop::collection::vec(arb_point(), 2..10)) {
        let mut canvas = Canvas::new();
        canvas.toggle_drawing_mode();
        for click in &clicks {
            canvas.press(*click);
        }
        for instruction in RouteCompiler::default().compile(canvas.segments()) {
            prop_assert!(instruction.duration_ms() >= 100);
        }
    }
}
