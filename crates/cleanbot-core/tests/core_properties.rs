use cleanbot_core::event_bus::{AppEvent, NoticeEvent};
use cleanbot_core::{CommandCode, EventBus, Point, RobotSpeed, Segment, TimingConfig};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

proptest! {
    #[test]
    fn snapped_speed_stays_on_the_slider(raw in 0u32..2000) {
        let speed = RobotSpeed::snap_to_step(raw).value();
        prop_assert!(speed >= RobotSpeed::MIN);
        prop_assert!(speed == RobotSpeed::MAX || (speed - RobotSpeed::MIN) % RobotSpeed::STEP == 0);
    }

    #[test]
    fn segment_length_scales_with_resolution(
        x in -500.0f64..500.0,
        y in -500.0f64..500.0,
        len in 0.0f64..400.0,
    ) {
        let segment = Segment::new(Point::new(x, y), Point::new(x + len, y));
        prop_assert!((segment.length_cm(5.0) - len / 5.0).abs() < 1e-9);
        prop_assert!(segment.length_px() >= 0.0);
    }

    #[test]
    fn midpoint_lies_on_the_segment(x in 0.0f64..400.0, y in 0.0f64..400.0, d in 1.0f64..200.0) {
        let segment = Segment::new(Point::new(x, y), Point::new(x, y + d));
        let mid = segment.point_at(0.5);
        prop_assert!((mid.x - x).abs() < 1e-9);
        prop_assert!((mid.y - (y + d / 2.0)).abs() < 1e-9);
    }
}

#[test]
fn command_tokens_parse_back() {
    for token in ["F", "L", "R", "S", "W", "w", "speed"] {
        let code: CommandCode = token.parse().unwrap();
        assert_eq!(code.as_str(), token);
    }
    assert!("X".parse::<CommandCode>().is_err());
}

#[test]
fn speed_serializes_as_plain_byte() {
    let json = serde_json::to_string(&RobotSpeed::MEDIUM).unwrap();
    assert_eq!(json, "170");
    assert!(serde_json::from_str::<RobotSpeed>("10").is_err());
}

#[test]
fn timing_defaults_fill_missing_fields() {
    let timing: TimingConfig = serde_json::from_str(r#"{"turn_duration_ms": 800}"#).unwrap();
    assert_eq!(timing.turn_duration_ms, 800);
    assert_eq!(timing.command_delay_ms, 100);
    assert_eq!(timing.cm_to_ms_factor, 150);
}

#[test]
fn notices_reach_synchronous_handlers() {
    let bus = EventBus::new();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    bus.subscribe(cleanbot_core::EventFilter::All, move |event| {
        if matches!(event, AppEvent::Notice(_)) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    bus.publish(AppEvent::Notice(NoticeEvent::success("Route completed successfully!")));
    bus.publish(AppEvent::Notice(NoticeEvent::error("Please draw a route first.")));
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}
