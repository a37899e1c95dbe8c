//! Coordinate types and the drag-to-rectangle state machine
//!
//! All box math happens in displayed-image pixel space. Pointer events arrive
//! in viewport coordinates and are translated by subtracting the image's
//! viewport offset, captured once when the image is loaded.

use serde::{Deserialize, Serialize};

/// Minimum drag distance (in displayed pixels) before a release commits a box.
/// Shorter drags are treated as misclicks and silently discarded.
pub const MIN_DRAG_DISTANCE: f64 = 5.0;

/// A point in some pixel space (viewport or displayed-image).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in displayed-image pixel space, normalized so
/// `top_left` is component-wise <= `bottom_right`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Build a normalized box from two arbitrary drag endpoints.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            top_left: Point::new(a.x.min(b.x), a.y.min(b.y)),
            bottom_right: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Lower-left corner, where the label picker is anchored.
    pub fn lower_left(&self) -> Point {
        Point::new(self.top_left.x, self.bottom_right.y)
    }
}

/// Geometry of the displayed image, captured when the image loads.
///
/// Natural dimensions are carried along for future scaling needs; the box
/// math itself operates entirely in displayed-pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    /// Position of the displayed image's top-left corner in the viewport.
    pub viewport_offset: Point,
    /// Displayed (scaled) width and height.
    pub displayed: (f64, f64),
    /// Original image width and height.
    pub natural: (f64, f64),
}

impl ImageGeometry {
    /// Translate a viewport point into image-relative pixel coordinates.
    pub fn to_image(&self, viewport: Point) -> Point {
        Point::new(viewport.x - self.viewport_offset.x, viewport.y - self.viewport_offset.y)
    }

    /// Translate an image-relative point back into viewport coordinates.
    pub fn to_viewport(&self, image: Point) -> Point {
        Point::new(image.x + self.viewport_offset.x, image.y + self.viewport_offset.y)
    }

    /// Whether a viewport point falls within the displayed image.
    pub fn contains(&self, viewport: Point) -> bool {
        let p = self.to_image(viewport);
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.displayed.0 && p.y < self.displayed.1
    }
}

/// Transient drag-gesture state, in image-relative coordinates.
///
/// `active` marks an in-progress drag, `pending_commit` a frozen rectangle
/// awaiting a label. Both false with zeroed points is the idle state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    pub anchor: Point,
    pub current: Point,
    pub active: bool,
    pub pending_commit: bool,
}

impl DragState {
    fn reset(&mut self) {
        *self = DragState::default();
    }
}

/// Phase of the editor's interaction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// No active drag, no pending selector.
    Idle,
    /// Pointer is down; `current` follows the pointer, `anchor` is fixed.
    Dragging,
    /// Rectangle frozen, label picker shown at its lower-left corner.
    PendingLabel,
}

/// The mouse-interaction state machine for one open image.
///
/// Pointer events are fed in viewport coordinates; the machine translates
/// them through the captured [`ImageGeometry`] and produces at most one
/// normalized [`BoundingBox`] per completed gesture.
#[derive(Debug, Default)]
pub struct EditorState {
    geometry: Option<ImageGeometry>,
    drag: DragState,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture image geometry (the "load" event). Resets any gesture in
    /// progress, since the old coordinates are meaningless afterwards.
    pub fn image_loaded(&mut self, geometry: ImageGeometry) {
        self.geometry = Some(geometry);
        self.drag.reset();
    }

    pub fn geometry(&self) -> Option<&ImageGeometry> {
        self.geometry.as_ref()
    }

    pub fn phase(&self) -> EditorPhase {
        if self.drag.active {
            EditorPhase::Dragging
        } else if self.drag.pending_commit {
            EditorPhase::PendingLabel
        } else {
            EditorPhase::Idle
        }
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    /// Pointer pressed over the image: begin a drag with anchor = current.
    pub fn pointer_down(&mut self, viewport: Point) {
        let Some(geom) = self.geometry else { return };
        let p = geom.to_image(viewport);
        self.drag = DragState {
            anchor: p,
            current: p,
            active: true,
            pending_commit: false,
        };
    }

    /// Pointer moved while dragging: only `current` follows the pointer.
    pub fn pointer_move(&mut self, viewport: Point) {
        if !self.drag.active {
            return;
        }
        let Some(geom) = self.geometry else { return };
        self.drag.current = geom.to_image(viewport);
    }

    /// Pointer released: freeze the rectangle if the drag was long enough,
    /// otherwise treat it as a misclick and reset.
    pub fn pointer_up(&mut self, viewport: Point) {
        if !self.drag.active {
            return;
        }
        if let Some(geom) = self.geometry {
            self.drag.current = geom.to_image(viewport);
        }
        self.drag.active = false;
        self.finish_drag();
    }

    /// Pointer left the image while dragging: same commit check as release,
    /// using the last known position.
    pub fn pointer_leave(&mut self) {
        if !self.drag.active {
            return;
        }
        self.drag.active = false;
        self.finish_drag();
    }

    // The threshold deliberately checks the X axis only, mirroring the
    // original tool: thin-but-tall boxes still commit.
    fn finish_drag(&mut self) {
        if (self.drag.current.x - self.drag.anchor.x).abs() > MIN_DRAG_DISTANCE {
            self.drag.pending_commit = true;
        } else {
            self.drag.reset();
        }
    }

    /// Commit the frozen rectangle. Returns the normalized box, or None when
    /// no rectangle is pending. The caller attaches the label.
    pub fn take_pending_box(&mut self) -> Option<BoundingBox> {
        if !self.drag.pending_commit {
            return None;
        }
        let bounds = BoundingBox::from_corners(self.drag.anchor, self.drag.current);
        self.drag.reset();
        Some(bounds)
    }

    /// The frozen rectangle awaiting a label, if any.
    pub fn pending_box(&self) -> Option<BoundingBox> {
        if self.drag.pending_commit {
            Some(BoundingBox::from_corners(self.drag.anchor, self.drag.current))
        } else {
            None
        }
    }

    /// The live rectangle while a drag is in progress.
    pub fn live_box(&self) -> Option<BoundingBox> {
        if self.drag.active {
            Some(BoundingBox::from_corners(self.drag.anchor, self.drag.current))
        } else {
            None
        }
    }

    /// Viewport position for the label picker: the frozen box's lower-left
    /// corner translated back into viewport coordinates.
    pub fn picker_anchor(&self) -> Option<Point> {
        let bounds = self.pending_box()?;
        let geom = self.geometry?;
        Some(geom.to_viewport(bounds.lower_left()))
    }

    /// Abandon whatever gesture is in progress.
    pub fn cancel(&mut self) {
        self.drag.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_800x600_at_100_50() -> ImageGeometry {
        ImageGeometry {
            viewport_offset: Point::new(100.0, 50.0),
            displayed: (800.0, 600.0),
            natural: (1600.0, 1200.0),
        }
    }

    #[test]
    fn test_box_normalization() {
        let b = BoundingBox::from_corners(Point::new(400.0, 350.0), Point::new(200.0, 200.0));
        assert_eq!(b.top_left, Point::new(200.0, 200.0));
        assert_eq!(b.bottom_right, Point::new(400.0, 350.0));
        assert_eq!(b.width(), 200.0);
        assert_eq!(b.height(), 150.0);
        assert_eq!(b.lower_left(), Point::new(200.0, 350.0));
    }

    #[test]
    fn test_viewport_to_image_conversion() {
        let geom = geometry_800x600_at_100_50();
        assert_eq!(geom.to_image(Point::new(300.0, 250.0)), Point::new(200.0, 200.0));
        assert_eq!(geom.to_viewport(Point::new(200.0, 200.0)), Point::new(300.0, 250.0));
        assert!(geom.contains(Point::new(100.0, 50.0)));
        assert!(!geom.contains(Point::new(99.0, 50.0)));
        assert!(!geom.contains(Point::new(900.0, 650.0)));
    }

    #[test]
    fn test_full_drag_scenario() {
        // Image displayed at 800x600 with viewport offset (100,50); drag from
        // (300,250) to (500,400) must produce the image-relative box
        // {(200,200),(400,350)}.
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());
        assert_eq!(editor.phase(), EditorPhase::Idle);

        editor.pointer_down(Point::new(300.0, 250.0));
        assert_eq!(editor.phase(), EditorPhase::Dragging);
        assert_eq!(editor.drag().anchor, Point::new(200.0, 200.0));

        editor.pointer_move(Point::new(500.0, 400.0));
        assert_eq!(editor.drag().anchor, Point::new(200.0, 200.0));
        assert_eq!(editor.drag().current, Point::new(400.0, 350.0));

        editor.pointer_up(Point::new(500.0, 400.0));
        assert_eq!(editor.phase(), EditorPhase::PendingLabel);

        let bounds = editor.take_pending_box().unwrap();
        assert_eq!(bounds.top_left, Point::new(200.0, 200.0));
        assert_eq!(bounds.bottom_right, Point::new(400.0, 350.0));
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert_eq!(*editor.drag(), DragState::default());
    }

    #[test]
    fn test_short_drag_is_a_misclick() {
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());

        editor.pointer_down(Point::new(300.0, 250.0));
        editor.pointer_move(Point::new(304.0, 380.0));
        editor.pointer_up(Point::new(304.0, 380.0));

        // |dx| = 4 <= 5: no commit, drag state back to the zero box.
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert_eq!(*editor.drag(), DragState::default());
        assert!(editor.take_pending_box().is_none());
    }

    #[test]
    fn test_threshold_is_x_axis_only() {
        // A drag that is tall but only 6px wide still commits.
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());

        editor.pointer_down(Point::new(300.0, 100.0));
        editor.pointer_up(Point::new(306.1, 500.0));
        assert_eq!(editor.phase(), EditorPhase::PendingLabel);

        // And a wide-but-flat drag exactly at the threshold does not.
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());
        editor.pointer_down(Point::new(300.0, 100.0));
        editor.pointer_up(Point::new(305.0, 100.0));
        assert_eq!(editor.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_pointer_leave_uses_last_position() {
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());

        editor.pointer_down(Point::new(300.0, 250.0));
        editor.pointer_move(Point::new(500.0, 400.0));
        editor.pointer_leave();
        assert_eq!(editor.phase(), EditorPhase::PendingLabel);

        let bounds = editor.pending_box().unwrap();
        assert_eq!(bounds.bottom_right, Point::new(400.0, 350.0));
    }

    #[test]
    fn test_picker_anchor_is_lower_left_in_viewport() {
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());

        editor.pointer_down(Point::new(500.0, 400.0));
        editor.pointer_up(Point::new(300.0, 250.0));

        // Box normalizes to {(200,200),(400,350)}; lower-left (200,350)
        // translates back to viewport (300,400).
        assert_eq!(editor.picker_anchor(), Some(Point::new(300.0, 400.0)));
    }

    #[test]
    fn test_cancel_resets_pending_rectangle() {
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());

        editor.pointer_down(Point::new(300.0, 250.0));
        editor.pointer_up(Point::new(500.0, 400.0));
        assert_eq!(editor.phase(), EditorPhase::PendingLabel);

        editor.cancel();
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert!(editor.take_pending_box().is_none());
    }

    #[test]
    fn test_events_without_geometry_are_ignored() {
        let mut editor = EditorState::new();
        editor.pointer_down(Point::new(300.0, 250.0));
        assert_eq!(editor.phase(), EditorPhase::Idle);
    }

    #[test]
    fn test_move_without_drag_is_ignored() {
        let mut editor = EditorState::new();
        editor.image_loaded(geometry_800x600_at_100_50());
        editor.pointer_move(Point::new(500.0, 400.0));
        assert_eq!(editor.phase(), EditorPhase::Idle);
        assert_eq!(*editor.drag(), DragState::default());
    }
}
