//! Saved route records.
//!
//! A record holds the drawn geometry plus the stats shown when it was saved.
//! Records written by older dashboards may lack fields, so every collection
//! defaults to empty.

use chrono::{DateTime, TimeZone, Utc};
use cleanbot_core::{Point, Segment};
use serde::{Deserialize, Serialize};

use crate::timing::RouteStats;

/// Persisted route.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub waypoints: Vec<Point>,
    #[serde(default)]
    pub saved_at_epoch_ms: i64,
    #[serde(default)]
    pub stats: RouteStats,
}

impl RouteRecord {
    /// Creates a record stamped with the current time.
    pub fn new(segments: Vec<Segment>, waypoints: Vec<Point>, stats: RouteStats) -> Self {
        Self {
            segments,
            waypoints,
            saved_at_epoch_ms: Utc::now().timestamp_millis(),
            stats,
        }
    }

    /// Save time, if the stored stamp is a valid instant.
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.saved_at_epoch_ms).single()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_collections_default_to_empty() {
        let record: RouteRecord = serde_json::from_str(r#"{"saved_at_epoch_ms": 5}"#).unwrap();
        assert!(record.segments.is_empty());
        assert!(record.waypoints.is_empty());
        assert_eq!(record.stats, RouteStats::default());
    }

    #[test]
    fn test_new_stamps_time() {
        let before = Utc::now().timestamp_millis();
        let record = RouteRecord::new(Vec::new(), Vec::new(), RouteStats::default());
        assert!(record.saved_at_epoch_ms >= before);
        assert!(record.saved_at().is_some());
    }

    #[test]
    fn test_json_keeps_selection_flags() {
        let mut segment = Segment::new(Point::new(0.0, 0.0), Point::new(25.0, 0.0));
        segment.selected = true;
        let record = RouteRecord::new(vec![segment], vec![segment.p1, segment.p2], RouteStats::default());
        let json = serde_json::to_string(&record).unwrap();
        let parsed: RouteRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
