//! Kerf (trim) compensation
//!
//! The beam or tool removes `trim` of material on each side of the nominal
//! path. Hole paths move inward so the finished hole keeps its nominal size;
//! outline and finger paths move outward so the finished panel does.

use cellbox_core::{Edge, Point};

/// A full circle cut clockwise from its leftmost point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleCut {
    /// Where the arc starts and ends
    pub start: Point,
    /// Centre relative to `start` (the I/J words)
    pub center_offset: Point,
}

impl CircleCut {
    pub fn radius(&self) -> f64 {
        self.center_offset.length()
    }
}

/// Compensate a hole of nominal `center` and `radius`.
///
/// The path radius becomes `radius - trim`, and the start point sits `trim`
/// to the right of the nominal leftmost point.
pub fn compensate_circle(center: Point, radius: f64, trim: f64) -> CircleCut {
    let path_radius = radius - trim;
    CircleCut {
        start: Point::new(center.x - radius + trim, center.y),
        center_offset: Point::new(path_radius, 0.0),
    }
}

/// Recover nominal centre and radius from a compensated circle
pub fn recover_circle(cut: &CircleCut, trim: f64) -> (Point, f64) {
    (cut.start + cut.center_offset, cut.radius() + trim)
}

/// Compensate a boundary coordinate.
///
/// `material_above` is true when the retained material lies on the
/// increasing side of the boundary (the path then moves down by `trim`).
pub fn edge_offset(value: f64, material_above: bool, trim: f64) -> f64 {
    if material_above {
        value - trim
    } else {
        value + trim
    }
}

/// Inverse of [`edge_offset`]
pub fn recover_edge(emitted: f64, material_above: bool, trim: f64) -> f64 {
    if material_above {
        emitted + trim
    } else {
        emitted - trim
    }
}

/// Signed shift from a nominal main panel corner to the physical corner of
/// the assembled box, along the axis perpendicular to `edge`.
///
/// An attached panel on that edge pushes the corner out by its thickness.
pub fn corner_offset(edge: Edge, has_panel: bool, thickness: f64) -> f64 {
    if !has_panel {
        return 0.0;
    }
    let normal = edge.outward();
    (normal.x + normal.y) * thickness
}
