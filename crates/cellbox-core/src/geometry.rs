//! Planar geometry primitives

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A point (or offset) on the sheet, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift by the given deltas
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Component-wise comparison within `tolerance`
    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Axis-aligned rectangle, `min` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_origin_size(origin: Point, width: f64, height: f64) -> Self {
        Self::new(origin, origin.offset(width, height))
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Corner by logical index, `(0, 0)` bottom-left, `(1, 1)` top-right
    pub fn corner(&self, cx: u8, cy: u8) -> Point {
        Point::new(
            if cx == 0 { self.min.x } else { self.max.x },
            if cy == 0 { self.min.y } else { self.max.y },
        )
    }

    /// Grow (or shrink, for negative amounts) on every side
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.min.offset(-amount, -amount),
            self.max.offset(amount, amount),
        )
    }
}

/// One side of a rectangular panel
///
/// Contours visit edges in declaration order, so the start corner of each
/// edge is the end corner of the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Bottom, Edge::Right, Edge::Top, Edge::Left];

    /// Unit vector pointing away from the panel material
    pub fn outward(self) -> Point {
        match self {
            Self::Bottom => Point::new(0.0, -1.0),
            Self::Right => Point::new(1.0, 0.0),
            Self::Top => Point::new(0.0, 1.0),
            Self::Left => Point::new(-1.0, 0.0),
        }
    }

    /// True for edges running along the x axis
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Bottom | Self::Top)
    }

    /// True when a contour walks this edge toward increasing coordinates
    pub fn is_ascending(self) -> bool {
        matches!(self, Self::Bottom | Self::Right)
    }

    /// Logical index of the corner a contour reaches at the end of this edge
    pub fn end_corner(self) -> (u8, u8) {
        match self {
            Self::Bottom => (1, 0),
            Self::Right => (1, 1),
            Self::Top => (0, 1),
            Self::Left => (0, 0),
        }
    }
}
