//! Resize Handle Controller
//!
//! Turns a drag on one of the four corner handles into a new frame for the
//! selected widget. Two modes:
//!
//! - **Free**: the dragged corner's edges move with the pointer and snap to
//!   the grid while the opposite edges stay put.
//! - **Aspect-locked**: the horizontal delta drives the width, which snaps to
//!   the grid; the height follows the start aspect ratio and the opposite
//!   corner stays anchored.
//!
//! A tick that would make either dimension smaller than the minimum is
//! dropped. The widget keeps its last accepted frame.

use serde::{Deserialize, Serialize};
use tracing::trace;

use widgetcanvas_core::constants::{DEFAULT_GRID_SIZE, MIN_WIDGET_DIMENSION};
use widgetcanvas_core::{snap_to_grid, Point, Rect, WidgetId};
use widgetcanvas_settings::LayoutConfig;

/// One of the four corner handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandleCorner {
    pub const ALL: [HandleCorner; 4] = [
        HandleCorner::TopLeft,
        HandleCorner::TopRight,
        HandleCorner::BottomLeft,
        HandleCorner::BottomRight,
    ];

    /// True when dragging this corner moves the left edge.
    pub fn moves_left_edge(&self) -> bool {
        matches!(self, HandleCorner::TopLeft | HandleCorner::BottomLeft)
    }

    /// True when dragging this corner moves the top edge.
    pub fn moves_top_edge(&self) -> bool {
        matches!(self, HandleCorner::TopLeft | HandleCorner::TopRight)
    }

    pub fn opposite(&self) -> HandleCorner {
        match self {
            HandleCorner::TopLeft => HandleCorner::BottomRight,
            HandleCorner::TopRight => HandleCorner::BottomLeft,
            HandleCorner::BottomLeft => HandleCorner::TopRight,
            HandleCorner::BottomRight => HandleCorner::TopLeft,
        }
    }

    /// Where this corner sits on `rect`.
    pub fn position_on(&self, rect: &Rect) -> Point {
        let x = if self.moves_left_edge() {
            rect.min_x()
        } else {
            rect.max_x()
        };
        let y = if self.moves_top_edge() {
            rect.min_y()
        } else {
            rect.max_y()
        };
        Point::new(x, y)
    }
}

/// Positions of the four handles of a selected widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandlePositions {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl HandlePositions {
    pub fn for_rect(rect: &Rect) -> Self {
        Self {
            top_left: HandleCorner::TopLeft.position_on(rect),
            top_right: HandleCorner::TopRight.position_on(rect),
            bottom_left: HandleCorner::BottomLeft.position_on(rect),
            bottom_right: HandleCorner::BottomRight.position_on(rect),
        }
    }

    pub fn get(&self, corner: HandleCorner) -> Point {
        match corner {
            HandleCorner::TopLeft => self.top_left,
            HandleCorner::TopRight => self.top_right,
            HandleCorner::BottomLeft => self.bottom_left,
            HandleCorner::BottomRight => self.bottom_right,
        }
    }

    /// The handle within `radius` of `point`, if any.
    pub fn hit_test(&self, point: &Point, radius: f64) -> Option<HandleCorner> {
        HandleCorner::ALL
            .into_iter()
            .find(|corner| self.get(*corner).distance_to(point) <= radius)
    }
}

/// Gesture recognizer phases delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// Grid and minimum-size limits applied to every resize tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeConstraints {
    pub grid_size: f64,
    pub min_dimension: f64,
}

impl Default for ResizeConstraints {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            min_dimension: MIN_WIDGET_DIMENSION,
        }
    }
}

impl From<&LayoutConfig> for ResizeConstraints {
    fn from(config: &LayoutConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            min_dimension: config.min_dimension,
        }
    }
}

impl ResizeConstraints {
    fn accepts(&self, rect: &Rect) -> bool {
        rect.width >= self.min_dimension && rect.height >= self.min_dimension
    }
}

/// Free resize of `start` by the pointer delta `(dx, dy)` on `corner`.
///
/// Returns `None` when the result would fall below the minimum.
pub fn free_resize(
    start: &Rect,
    corner: HandleCorner,
    dx: f64,
    dy: f64,
    constraints: &ResizeConstraints,
) -> Option<Rect> {
    let grid = constraints.grid_size;
    let (mut left, mut top, mut right, mut bottom) =
        (start.min_x(), start.min_y(), start.max_x(), start.max_y());

    if corner.moves_left_edge() {
        left = snap_to_grid(left + dx, grid);
    } else {
        right = snap_to_grid(right + dx, grid);
    }
    if corner.moves_top_edge() {
        top = snap_to_grid(top + dy, grid);
    } else {
        bottom = snap_to_grid(bottom + dy, grid);
    }

    let rect = Rect::from_edges(left, top, right, bottom);
    constraints.accepts(&rect).then_some(rect)
}

/// Aspect-locked resize of `start` driven by the horizontal delta `dx`.
///
/// `aspect` is width over height. The corner opposite `corner` stays fixed.
pub fn aspect_locked_resize(
    start: &Rect,
    corner: HandleCorner,
    dx: f64,
    aspect: f64,
    constraints: &ResizeConstraints,
) -> Option<Rect> {
    let raw_width = if corner.moves_left_edge() {
        start.width - dx
    } else {
        start.width + dx
    };
    let width = snap_to_grid(raw_width, constraints.grid_size);
    let height = width / aspect;

    let x = if corner.moves_left_edge() {
        start.max_x() - width
    } else {
        start.min_x()
    };
    let y = if corner.moves_top_edge() {
        start.max_y() - height
    } else {
        start.min_y()
    };

    let rect = Rect::new(x, y, width, height);
    constraints.accepts(&rect).then_some(rect)
}

#[derive(Debug, Clone)]
struct ResizeGesture {
    widget: WidgetId,
    corner: HandleCorner,
    start_frame: Rect,
    start_point: Point,
    aspect: Option<f64>,
    last_accepted: Rect,
}

/// Tracks one corner-drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct ResizeHandleController {
    constraints: ResizeConstraints,
    active: Option<ResizeGesture>,
}

impl ResizeHandleController {
    pub fn new(constraints: ResizeConstraints) -> Self {
        Self {
            constraints,
            active: None,
        }
    }

    pub fn constraints(&self) -> &ResizeConstraints {
        &self.constraints
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_widget(&self) -> Option<WidgetId> {
        self.active.as_ref().map(|g| g.widget)
    }

    pub fn active_corner(&self) -> Option<HandleCorner> {
        self.active.as_ref().map(|g| g.corner)
    }

    /// Start a gesture on `corner` of `widget`, whose frame is `frame`.
    ///
    /// A gesture already in progress is replaced.
    pub fn begin(
        &mut self,
        widget: WidgetId,
        corner: HandleCorner,
        frame: Rect,
        aspect_locked: bool,
        point: Point,
    ) {
        let aspect = if aspect_locked {
            Some(frame.size().aspect_ratio().unwrap_or(1.0))
        } else {
            None
        };
        self.active = Some(ResizeGesture {
            widget,
            corner,
            start_frame: frame,
            start_point: point,
            aspect,
            last_accepted: frame,
        });
    }

    /// Feed a pointer position. Returns the frame to apply, or `None` when
    /// no gesture is active or the tick was rejected.
    pub fn update(&mut self, point: Point) -> Option<Rect> {
        let constraints = self.constraints;
        let gesture = self.active.as_mut()?;
        let dx = point.x - gesture.start_point.x;
        let dy = point.y - gesture.start_point.y;

        let candidate = match gesture.aspect {
            Some(aspect) => {
                aspect_locked_resize(&gesture.start_frame, gesture.corner, dx, aspect, &constraints)
            }
            None => free_resize(&gesture.start_frame, gesture.corner, dx, dy, &constraints),
        };

        match candidate {
            Some(rect) => {
                gesture.last_accepted = rect;
                Some(rect)
            }
            None => {
                trace!(
                    "Resize tick for {} rejected below minimum {}",
                    gesture.widget.short(),
                    constraints.min_dimension
                );
                None
            }
        }
    }

    /// Finish the gesture and return the last accepted frame.
    pub fn end(&mut self) -> Option<(WidgetId, Rect)> {
        self.active.take().map(|g| (g.widget, g.last_accepted))
    }

    /// Same as [`end`](Self::end); the last accepted frame stays applied.
    pub fn cancel(&mut self) -> Option<(WidgetId, Rect)> {
        self.end()
    }
}
