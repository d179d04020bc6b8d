//! Drag and swipe interpretation.
//!
//! Touch and mouse input share one tracker. A gesture starts on press,
//! records its latest position while the pointer is down, and is evaluated
//! once on release (or when the mouse leaves the overlay mid-drag). The
//! tracker is always cleared after evaluation so no coordinates leak from
//! one gesture into the next.
//!
//! ## Evaluation
//!
//! With `dx = end.x - start.x` and `dy = end.y - start.y`:
//!
//! | Condition | Action |
//! |-----------|--------|
//! | `dx > threshold` | previous slide |
//! | `-dx > threshold` | next slide |
//! | `dy > threshold` and swipe-to-close enabled | close |
//!
//! Horizontal movement wins over vertical. The vertical branch compares the
//! vertical delta itself; mouse drags only track the X axis, so they never
//! close the overlay.

use serde::{Deserialize, Serialize};

/// A page-coordinate position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Input device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Touch,
    Mouse,
}

/// What a completed gesture asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Prev,
    Next,
    Close,
}

/// Start and end coordinates of the gesture in progress.
///
/// `end` stays `None` until the pointer actually moves while down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DragState {
    pub start: Point,
    pub end: Option<Point>,
}

/// Interpret a finished drag.
pub fn interpret(
    start: Point,
    end: Point,
    threshold: f64,
    swipe_close: bool,
) -> Option<GestureAction> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx > threshold {
        Some(GestureAction::Prev)
    } else if -dx > threshold {
        Some(GestureAction::Next)
    } else if dy > threshold && swipe_close {
        Some(GestureAction::Close)
    } else {
        None
    }
}

/// Pointer state machine for a single overlay.
#[derive(Debug, Clone)]
pub struct DragTracker {
    drag: DragState,
    pointer_down: bool,
    threshold: f64,
    swipe_close: bool,
}

impl DragTracker {
    pub fn new(threshold: f64, swipe_close: bool) -> Self {
        Self {
            drag: DragState::default(),
            pointer_down: false,
            threshold,
            swipe_close,
        }
    }

    pub fn state(&self) -> DragState {
        self.drag
    }

    pub fn is_active(&self) -> bool {
        self.pointer_down
    }

    /// Pointer pressed: start a new gesture.
    pub fn press(&mut self, kind: PointerKind, point: Point) {
        self.pointer_down = true;
        self.drag.start = Self::project(kind, point);
    }

    /// Pointer moved. Returns `true` if a gesture is in progress and the
    /// position was recorded.
    pub fn track(&mut self, kind: PointerKind, point: Point) -> bool {
        if !self.pointer_down {
            return false;
        }
        self.drag.end = Some(Self::project(kind, point));
        true
    }

    /// Pointer released. Evaluates the gesture if the pointer moved, then
    /// clears the drag state.
    pub fn release(&mut self) -> Option<GestureAction> {
        let action = self
            .drag
            .end
            .and_then(|end| interpret(self.drag.start, end, self.threshold, self.swipe_close));
        self.reset();
        action
    }

    /// Pointer left the overlay. Only meaningful mid-drag: the leave
    /// position becomes the end of the gesture.
    pub fn leave(&mut self, kind: PointerKind, point: Point) -> Option<GestureAction> {
        if !self.pointer_down {
            return None;
        }
        let end = Self::project(kind, point);
        let action = interpret(self.drag.start, end, self.threshold, self.swipe_close);
        self.reset();
        action
    }

    /// Abandon any gesture in progress: the pointer counts as released and
    /// recorded coordinates are dropped.
    pub fn reset(&mut self) {
        self.pointer_down = false;
        self.drag = DragState::default();
    }

    /// Mouse gestures are horizontal only.
    fn project(kind: PointerKind, point: Point) -> Point {
        match kind {
            PointerKind::Touch => point,
            PointerKind::Mouse => Point::new(point.x, 0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Point {
        Point::new(100.0, 100.0)
    }

    #[test]
    fn right_swipe_goes_back() {
        let end = Point::new(125.0, 100.0);
        assert_eq!(interpret(origin(), end, 20.0, true), Some(GestureAction::Prev));
    }

    #[test]
    fn left_swipe_goes_forward() {
        let end = Point::new(75.0, 100.0);
        assert_eq!(interpret(origin(), end, 20.0, true), Some(GestureAction::Next));
    }

    #[test]
    fn short_swipe_is_ignored() {
        let end = Point::new(110.0, 100.0);
        assert_eq!(interpret(origin(), end, 20.0, true), None);
    }

    #[test]
    fn exact_threshold_is_ignored() {
        let end = Point::new(120.0, 100.0);
        assert_eq!(interpret(origin(), end, 20.0, true), None);
    }

    #[test]
    fn downward_swipe_closes_when_enabled() {
        // Pure vertical movement must close: the vertical branch measures
        // dy, not |dx|.
        let end = Point::new(100.0, 125.0);
        assert_eq!(interpret(origin(), end, 20.0, true), Some(GestureAction::Close));
        assert_eq!(interpret(origin(), end, 20.0, false), None);
    }

    #[test]
    fn upward_swipe_never_closes() {
        let end = Point::new(100.0, 60.0);
        assert_eq!(interpret(origin(), end, 20.0, true), None);
    }

    #[test]
    fn horizontal_wins_over_vertical() {
        let end = Point::new(60.0, 160.0);
        assert_eq!(interpret(origin(), end, 20.0, true), Some(GestureAction::Next));
    }

    #[test]
    fn release_without_move_does_nothing() {
        let mut tracker = DragTracker::new(20.0, true);
        tracker.press(PointerKind::Touch, origin());
        assert_eq!(tracker.release(), None);
        assert!(!tracker.is_active());
    }

    #[test]
    fn tracker_resets_after_gesture() {
        let mut tracker = DragTracker::new(20.0, true);
        tracker.press(PointerKind::Touch, origin());
        assert!(tracker.track(PointerKind::Touch, Point::new(50.0, 100.0)));
        assert_eq!(tracker.release(), Some(GestureAction::Next));
        assert_eq!(tracker.state(), DragState::default());

        // A second tap must not see the previous end position.
        tracker.press(PointerKind::Touch, origin());
        assert_eq!(tracker.release(), None);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut tracker = DragTracker::new(20.0, true);
        assert!(!tracker.track(PointerKind::Mouse, Point::new(10.0, 0.0)));
        assert_eq!(tracker.state().end, None);
    }

    #[test]
    fn mouse_drag_ignores_vertical_axis() {
        let mut tracker = DragTracker::new(20.0, true);
        tracker.press(PointerKind::Mouse, Point::new(100.0, 0.0));
        tracker.track(PointerKind::Mouse, Point::new(100.0, 300.0));
        assert_eq!(tracker.release(), None);
    }

    #[test]
    fn reset_abandons_pressed_pointer() {
        let mut tracker = DragTracker::new(20.0, true);
        tracker.press(PointerKind::Mouse, Point::new(300.0, 0.0));
        tracker.reset();
        assert!(!tracker.is_active());
        assert_eq!(tracker.state(), DragState::default());
        assert!(!tracker.track(PointerKind::Mouse, Point::new(500.0, 0.0)));
        assert_eq!(tracker.leave(PointerKind::Mouse, Point::new(500.0, 0.0)), None);
    }

    #[test]
    fn leave_mid_drag_evaluates_at_leave_position() {
        let mut tracker = DragTracker::new(20.0, true);
        tracker.press(PointerKind::Mouse, Point::new(100.0, 0.0));
        let action = tracker.leave(PointerKind::Mouse, Point::new(160.0, 0.0));
        assert_eq!(action, Some(GestureAction::Prev));
        assert!(!tracker.is_active());
        assert_eq!(tracker.state(), DragState::default());
    }

    #[test]
    fn leave_while_idle_is_a_no_op() {
        let mut tracker = DragTracker::new(20.0, true);
        assert_eq!(tracker.leave(PointerKind::Mouse, Point::new(500.0, 0.0)), None);
    }
}
