//! Geometry primitives.
//!
//! `Point`, `Size` and `Rect` are plain value types. `Frame<S>` wraps a
//! `Rect` with a marker type naming the coordinate space it is expressed
//! in, so canvas-global and group-local frames cannot be mixed up without
//! an explicit conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Returns this point moved by `(dx, dy)`.
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }

    /// True when either dimension is zero or negative.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Width divided by height, or `None` for an empty size.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.height.is_finite()
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Builds a rectangle from its four edges.
    ///
    /// Width and height come out negative when `max < min`; callers that
    /// need a valid frame check the dimensions afterwards.
    pub fn from_edges(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Builds a rectangle of `size` centered on `center`.
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grows the rectangle by `amount` on every side. Negative values shrink it.
    pub fn expanded(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Self {
        Self::from_edges(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }

    /// Union of an iterator of rectangles, `None` when it is empty.
    pub fn union_all<I>(rects: I) -> Option<Self>
    where
        I: IntoIterator<Item = Rect>,
    {
        rects.into_iter().reduce(|acc, r| acc.union(&r))
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }

    /// True when `other` lies entirely inside this rectangle, edges included.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }

    /// Translates the rectangle so it stays inside `bounds` inset by `margin`.
    ///
    /// Only the origin moves. A rectangle larger than the available area is
    /// pinned to the top-left margin.
    pub fn clamped_within(&self, bounds: Size, margin: f64) -> Self {
        let max_x = bounds.width - margin - self.width;
        let max_y = bounds.height - margin - self.height;
        Self::new(
            self.x.min(max_x).max(margin),
            self.y.min(max_y).max(margin),
            self.width,
            self.height,
        )
    }

    /// True when every component differs from `other` by at most `tolerance`.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

/// Rounds `value` to the nearest multiple of `grid`.
///
/// A non-positive grid leaves the value untouched.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Marker trait for coordinate spaces.
pub trait CoordinateSpace: Copy + Default + fmt::Debug + PartialEq + 'static {
    const NAME: &'static str;
}

/// Coordinates relative to the canvas origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasSpace;

impl CoordinateSpace for CanvasSpace {
    const NAME: &'static str = "canvas";
}

/// Coordinates relative to the origin of the enclosing group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupLocalSpace;

impl CoordinateSpace for GroupLocalSpace {
    const NAME: &'static str = "group-local";
}

/// A rectangle tagged with the coordinate space it is expressed in.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Frame<S: CoordinateSpace> {
    rect: Rect,
    space: PhantomData<S>,
}

pub type CanvasFrame = Frame<CanvasSpace>;
pub type LocalFrame = Frame<GroupLocalSpace>;

impl<S: CoordinateSpace> Frame<S> {
    pub const fn new(rect: Rect) -> Self {
        Self {
            rect,
            space: PhantomData,
        }
    }

    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Rect::new(x, y, width, height))
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn origin(&self) -> Point {
        self.rect.origin()
    }

    pub fn size(&self) -> Size {
        self.rect.size()
    }

    pub fn center(&self) -> Point {
        self.rect.center()
    }

    pub fn space_name(&self) -> &'static str {
        S::NAME
    }
}

impl<S: CoordinateSpace> fmt::Debug for Frame<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("space", &S::NAME)
            .field("x", &self.rect.x)
            .field("y", &self.rect.y)
            .field("width", &self.rect.width)
            .field("height", &self.rect.height)
            .finish()
    }
}

impl Frame<CanvasSpace> {
    /// Re-expresses this frame relative to a group whose canvas origin is `group_origin`.
    pub fn to_group_local(self, group_origin: Point) -> LocalFrame {
        Frame::new(self.rect.translated(-group_origin.x, -group_origin.y))
    }
}

impl Frame<GroupLocalSpace> {
    /// Re-expresses this frame on the canvas, given the group's canvas origin.
    pub fn to_canvas(self, group_origin: Point) -> CanvasFrame {
        Frame::new(self.rect.translated(group_origin.x, group_origin.y))
    }
}
