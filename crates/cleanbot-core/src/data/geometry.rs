//! Canvas geometry.
//!
//! All coordinates are canvas pixels with the origin in the top-left corner,
//! so `y` grows downwards (towards the robot's "south").

use serde::{Deserialize, Serialize};

/// A point on the drawing canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// One drawn stroke between two snapped points.
///
/// The drawing surface only ever produces horizontal or vertical segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
    #[serde(default)]
    pub selected: bool,
}

impl Segment {
    /// Creates an unselected segment.
    pub fn new(p1: Point, p2: Point) -> Self {
        Self {
            p1,
            p2,
            selected: false,
        }
    }

    pub fn dx(&self) -> f64 {
        self.p2.x - self.p1.x
    }

    pub fn dy(&self) -> f64 {
        self.p2.y - self.p1.y
    }

    /// Length of the segment in canvas pixels.
    pub fn length_px(&self) -> f64 {
        self.p1.distance_to(&self.p2)
    }

    /// Length of the segment on the floor, given the canvas resolution.
    pub fn length_cm(&self, pixels_per_cm: f64) -> f64 {
        self.length_px() / pixels_per_cm
    }

    /// True when the horizontal component strictly dominates.
    ///
    /// Exact ties count as vertical.
    pub fn is_horizontal(&self) -> bool {
        self.dx().abs() > self.dy().abs()
    }

    /// Point at fraction `t` along the segment.
    pub fn point_at(&self, t: f64) -> Point {
        self.p1.lerp(&self.p2, t)
    }

    /// Endpoint coordinates as `(x1, y1, x2, y2)`.
    pub fn coords(&self) -> (f64, f64, f64, f64) {
        (self.p1.x, self.p1.y, self.p2.x, self.p2.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(10.0, 20.0);
        let b = Point::new(30.0, 20.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_segment_orientation() {
        let horizontal = Segment::new(Point::new(0.0, 0.0), Point::new(-50.0, 0.0));
        assert!(horizontal.is_horizontal());

        let vertical = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 40.0));
        assert!(!vertical.is_horizontal());

        // Ties fall to vertical
        let tie = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(!tie.is_horizontal());
    }

    #[test]
    fn test_segment_length_cm() {
        let seg = Segment::new(Point::new(100.0, 100.0), Point::new(150.0, 100.0));
        assert_eq!(seg.length_px(), 50.0);
        assert_eq!(seg.length_cm(5.0), 10.0);
    }

    #[test]
    fn test_segment_deserializes_without_selection_flag() {
        let json = r#"{"p1":{"x":1.0,"y":2.0},"p2":{"x":1.0,"y":9.0}}"#;
        let seg: Segment = serde_json::from_str(json).unwrap();
        assert!(!seg.selected);
        assert_eq!(seg.coords(), (1.0, 2.0, 1.0, 9.0));
    }
}
