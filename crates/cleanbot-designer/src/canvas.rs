//! Drawing surface for orthogonal routes.
//!
//! A stroke starts at an anchor point. Every further click commits a segment
//! from the anchor to the cursor snapped onto the dominant axis, and the
//! snapped point becomes the new anchor, so one drawing session produces a
//! connected polyline. Segments are therefore always horizontal or vertical.

use cleanbot_core::{Point, Segment};

/// Snap `cursor` onto the horizontal or vertical line through `anchor`.
///
/// When the horizontal displacement dominates the result keeps the anchor's
/// `y`, otherwise it keeps the anchor's `x`.
pub fn snap(anchor: Point, cursor: Point) -> Point {
    let dx = (cursor.x - anchor.x).abs();
    let dy = (cursor.y - anchor.y).abs();
    if dx > dy {
        Point::new(cursor.x, anchor.y)
    } else {
        Point::new(anchor.x, cursor.y)
    }
}

/// Rubber-band line shown while a stroke is in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePreview {
    pub anchor: Point,
    pub cursor: Point,
}

/// Route drawing canvas.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    segments: Vec<Segment>,
    waypoints: Vec<Point>,
    drawing: bool,
    anchor: Option<Point>,
    cursor: Option<Point>,
}

impl Canvas {
    /// Creates an empty canvas with drawing mode off.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// True while a stroke has an anchor.
    pub fn stroke_in_progress(&self) -> bool {
        self.anchor.is_some()
    }

    /// Switches drawing mode; returns the new mode.
    ///
    /// Leaving drawing mode abandons the in-progress chain and its preview.
    pub fn toggle_drawing_mode(&mut self) -> bool {
        self.drawing = !self.drawing;
        if !self.drawing {
            self.anchor = None;
            self.cursor = None;
        }
        self.drawing
    }

    /// Starts a stroke at `point` and records it as a waypoint.
    ///
    /// Ignored outside drawing mode or while a stroke is already in progress.
    /// Returns true if a stroke was started.
    pub fn begin_stroke(&mut self, point: Point) -> bool {
        if !self.drawing || self.anchor.is_some() {
            return false;
        }
        self.anchor = Some(point);
        self.waypoints.push(point);
        true
    }

    /// Updates the live preview with `point` snapped to the anchor's axis.
    ///
    /// Returns the snapped point, or `None` when no stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point) -> Option<Point> {
        let anchor = self.anchor?;
        let snapped = snap(anchor, point);
        self.cursor = Some(snapped);
        Some(snapped)
    }

    /// Commits a segment from the anchor to `point` snapped to its axis.
    ///
    /// The snapped point is recorded as a waypoint and becomes the new anchor.
    /// Zero-length segments are accepted. Returns the committed segment.
    pub fn commit_point(&mut self, point: Point) -> Option<Segment> {
        let anchor = self.anchor?;
        let end = snap(anchor, point);
        let segment = Segment::new(anchor, end);
        self.segments.push(segment);
        self.waypoints.push(end);
        self.anchor = Some(end);
        self.cursor = Some(end);
        Some(segment)
    }

    /// Pointer-down handler: starts a stroke if none is running, otherwise
    /// commits a point. Returns the committed segment, if any.
    pub fn press(&mut self, point: Point) -> Option<Segment> {
        if self.anchor.is_none() {
            self.begin_stroke(point);
            None
        } else {
            self.commit_point(point)
        }
    }

    /// Ends the in-progress chain and leaves drawing mode.
    pub fn finish_stroke(&mut self) {
        self.anchor = None;
        self.cursor = None;
        self.drawing = false;
    }

    /// Anchor and snapped cursor of the stroke in progress.
    pub fn preview(&self) -> Option<StrokePreview> {
        match (self.anchor, self.cursor) {
            (Some(anchor), Some(cursor)) => Some(StrokePreview { anchor, cursor }),
            _ => None,
        }
    }

    /// Flips selection of the segment at `index` and clears every other one.
    ///
    /// Selection is disabled while drawing. Returns the selected index after
    /// the toggle, or `None` if nothing is selected (including when the call
    /// was ignored).
    pub fn toggle_select(&mut self, index: usize) -> Option<usize> {
        if self.drawing || index >= self.segments.len() {
            return self.selected_index();
        }
        for (i, segment) in self.segments.iter_mut().enumerate() {
            segment.selected = if i == index { !segment.selected } else { false };
        }
        self.selected_index()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.segments.iter().position(|s| s.selected)
    }

    /// Removes the selected segment, if any.
    pub fn delete_selected(&mut self) -> Option<Segment> {
        let index = self.selected_index()?;
        let mut removed = self.segments.remove(index);
        removed.selected = false;
        Some(removed)
    }

    /// Empties the canvas and leaves drawing mode.
    pub fn clear(&mut self) {
        self.segments.clear();
        self.waypoints.clear();
        self.finish_stroke();
    }

    /// Replaces the canvas content; selection flags are cleared.
    pub fn load(&mut self, segments: Vec<Segment>, waypoints: Vec<Point>) {
        self.clear();
        self.segments = segments
            .into_iter()
            .map(|mut s| {
                s.selected = false;
                s
            })
            .collect();
        self.waypoints = waypoints;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawing_canvas() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.toggle_drawing_mode();
        canvas
    }

    #[test]
    fn test_snap_prefers_dominant_axis() {
        let anchor = Point::new(100.0, 100.0);
        assert_eq!(snap(anchor, Point::new(160.0, 110.0)), Point::new(160.0, 100.0));
        assert_eq!(snap(anchor, Point::new(95.0, 40.0)), Point::new(100.0, 40.0));
        // Equal displacement snaps vertically
        assert_eq!(snap(anchor, Point::new(110.0, 110.0)), Point::new(100.0, 110.0));
    }

    #[test]
    fn test_begin_stroke_requires_drawing_mode() {
        let mut canvas = Canvas::new();
        assert!(!canvas.begin_stroke(Point::new(1.0, 1.0)));
        assert!(canvas.waypoints().is_empty());

        canvas.toggle_drawing_mode();
        assert!(canvas.begin_stroke(Point::new(1.0, 1.0)));
        assert!(!canvas.begin_stroke(Point::new(5.0, 5.0)));
        assert_eq!(canvas.waypoints().len(), 1);
    }

    #[test]
    fn test_polyline_chains_from_last_point() {
        let mut canvas = drawing_canvas();
        canvas.press(Point::new(100.0, 100.0));
        let first = canvas.press(Point::new(150.0, 103.0)).unwrap();
        let second = canvas.press(Point::new(148.0, 60.0)).unwrap();

        assert_eq!(first.p2, Point::new(150.0, 100.0));
        assert_eq!(second.p1, first.p2);
        assert_eq!(second.p2, Point::new(150.0, 60.0));
        assert_eq!(canvas.segment_count(), 2);
        assert_eq!(canvas.waypoints().len(), 3);
    }

    #[test]
    fn test_extend_stroke_only_previews() {
        let mut canvas = drawing_canvas();
        assert_eq!(canvas.extend_stroke(Point::new(1.0, 1.0)), None);

        canvas.begin_stroke(Point::new(0.0, 0.0));
        let snapped = canvas.extend_stroke(Point::new(30.0, 4.0)).unwrap();
        assert_eq!(snapped, Point::new(30.0, 0.0));
        assert!(canvas.is_empty());
        assert_eq!(
            canvas.preview(),
            Some(StrokePreview {
                anchor: Point::new(0.0, 0.0),
                cursor: Point::new(30.0, 0.0)
            })
        );
    }

    #[test]
    fn test_finish_stroke_stops_appending() {
        let mut canvas = drawing_canvas();
        canvas.begin_stroke(Point::new(0.0, 0.0));
        canvas.commit_point(Point::new(0.0, 50.0));
        canvas.finish_stroke();

        assert!(canvas.commit_point(Point::new(0.0, 80.0)).is_none());
        assert!(!canvas.is_drawing());
        assert!(canvas.preview().is_none());
        assert_eq!(canvas.segment_count(), 1);
    }

    #[test]
    fn test_leaving_drawing_mode_drops_anchor() {
        let mut canvas = drawing_canvas();
        canvas.begin_stroke(Point::new(0.0, 0.0));
        canvas.extend_stroke(Point::new(10.0, 0.0));
        assert!(!canvas.toggle_drawing_mode());
        assert!(!canvas.stroke_in_progress());
        assert!(canvas.preview().is_none());
    }

    #[test]
    fn test_single_selection() {
        let mut canvas = drawing_canvas();
        canvas.press(Point::new(0.0, 0.0));
        canvas.press(Point::new(50.0, 0.0));
        canvas.press(Point::new(50.0, 50.0));
        canvas.finish_stroke();

        assert_eq!(canvas.toggle_select(0), Some(0));
        assert_eq!(canvas.toggle_select(1), Some(1));
        assert!(!canvas.segments()[0].selected);
        assert_eq!(canvas.toggle_select(1), None);
        assert_eq!(canvas.toggle_select(7), None);
    }

    #[test]
    fn test_no_selection_while_drawing() {
        let mut canvas = drawing_canvas();
        canvas.press(Point::new(0.0, 0.0));
        canvas.press(Point::new(50.0, 0.0));
        assert_eq!(canvas.toggle_select(0), None);
        assert!(!canvas.segments()[0].selected);
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = drawing_canvas();
        canvas.press(Point::new(0.0, 0.0));
        canvas.press(Point::new(50.0, 0.0));
        canvas.press(Point::new(50.0, 50.0));
        canvas.finish_stroke();

        assert!(canvas.delete_selected().is_none());
        assert_eq!(canvas.segment_count(), 2);

        canvas.toggle_select(0);
        let removed = canvas.delete_selected().unwrap();
        assert_eq!(removed.p2, Point::new(50.0, 0.0));
        assert_eq!(canvas.segment_count(), 1);
        assert_eq!(canvas.selected_index(), None);
    }

    #[test]
    fn test_clear() {
        let mut canvas = drawing_canvas();
        canvas.press(Point::new(0.0, 0.0));
        canvas.press(Point::new(50.0, 0.0));
        canvas.clear();
        assert!(canvas.is_empty());
        assert!(canvas.waypoints().is_empty());
        assert!(!canvas.stroke_in_progress());
        assert!(!canvas.is_drawing());
    }

    #[test]
    fn test_load_clears_selection() {
        let mut selected = Segment::new(Point::new(0.0, 0.0), Point::new(0.0, 20.0));
        selected.selected = true;
        let mut canvas = Canvas::new();
        canvas.load(vec![selected], vec![selected.p1, selected.p2]);
        assert_eq!(canvas.selected_index(), None);
        assert_eq!(canvas.waypoints().len(), 2);
    }
}
