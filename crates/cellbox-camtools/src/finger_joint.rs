//! Finger joint edges
//!
//! A panel edge is either plain or carries fingers. On a [`FingerKind::Tab`]
//! edge the fingers protrude past the edge and are kept; on a
//! [`FingerKind::Slot`] edge they are notched into the panel and removed.
//! Two mating edges are built from the same intervals, so a tab always lands
//! in a slot of identical nominal width.
//!
//! Contours start at the bottom-left corner and walk bottom, right, top and
//! left. Bottom and right edges visit fingers in ascending order, top and
//! left in descending order, so the four edges chain into one closed path.

use cellbox_core::{Edge, Point, Rect};

/// Nominal extent of one finger along its edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerKind {
    /// Material protrudes past the edge
    Tab,
    /// Material is notched out of the panel
    Slot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EdgeProfile {
    Plain,
    Fingers {
        kind: FingerKind,
        intervals: Vec<Interval>,
        /// How far a tab protrudes or a slot reaches in
        depth: f64,
    },
}

impl EdgeProfile {
    pub fn tabs(intervals: Vec<Interval>, depth: f64) -> Self {
        Self::Fingers {
            kind: FingerKind::Tab,
            intervals,
            depth,
        }
    }

    pub fn slots(intervals: Vec<Interval>, depth: f64) -> Self {
        Self::Fingers {
            kind: FingerKind::Slot,
            intervals,
            depth,
        }
    }

    pub fn finger_count(&self) -> usize {
        match self {
            Self::Plain => 0,
            Self::Fingers { intervals, .. } => intervals.len(),
        }
    }
}

/// One finger per cell pitch, centred on `first_center + pitch * i`
pub fn pitch_aligned(first_center: f64, pitch: f64, count: u32, width: f64) -> Vec<Interval> {
    (0..count)
        .map(|i| {
            let center = first_center + pitch * i as f64;
            Interval::new(center - width / 2.0, center + width / 2.0)
        })
        .collect()
}

/// `count` fingers spread over a span that is joined to a perpendicular
/// panel at both ends.
///
/// The span loses `thickness` at each end; the rest is divided into steps of
/// `(span - 2 * thickness) / (count - 0.5)`, each holding a finger in its
/// first half. The last finger therefore ends half a step before the far
/// end, leaving solid material at both corners.
pub fn evenly_spaced(span_start: f64, span: f64, thickness: f64, count: u32) -> Vec<Interval> {
    if count == 0 {
        return Vec::new();
    }
    let step = (span - 2.0 * thickness) / (count as f64 - 0.5);
    (0..count)
        .map(|i| {
            let start = span_start + thickness + step * i as f64;
            Interval::new(start, start + step / 2.0)
        })
        .collect()
}

/// A closed, compensated panel contour
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Compensated bottom-left corner, where cutting starts
    pub start: Point,
    /// Points visited along each edge in [`Edge::ALL`] order. The last point
    /// of every edge is the compensated corner it ends on.
    pub edges: [Vec<Point>; 4],
}

impl Contour {
    /// All points after the start, in cutting order
    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.edges.iter().flatten()
    }

    /// The contour returns to where it started
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.edges
            .last()
            .and_then(|edge| edge.last())
            .is_some_and(|end| end.approx_eq(self.start, tolerance))
    }
}

/// Trace the compensated contour of `rect` with one profile per edge, given
/// in [`Edge::ALL`] order.
pub fn trace_contour(rect: Rect, profiles: &[EdgeProfile; 4], trim: f64) -> Contour {
    let outer = rect.inflate(trim);
    let edges = [0, 1, 2, 3].map(|i| trace_edge(rect, Edge::ALL[i], &profiles[i], trim));
    Contour {
        start: outer.corner(0, 0),
        edges,
    }
}

fn trace_edge(rect: Rect, edge: Edge, profile: &EdgeProfile, trim: f64) -> Vec<Point> {
    let normal = edge.outward();
    let sign = normal.x + normal.y;
    let base = match edge {
        Edge::Bottom => rect.min.y,
        Edge::Right => rect.max.x,
        Edge::Top => rect.max.y,
        Edge::Left => rect.min.x,
    };
    let at = |along: f64, perpendicular: f64| {
        if edge.is_horizontal() {
            Point::new(along, perpendicular)
        } else {
            Point::new(perpendicular, along)
        }
    };

    let mut points = Vec::new();

    if let EdgeProfile::Fingers {
        kind,
        intervals,
        depth,
    } = profile
    {
        let base_cut = base + sign * trim;
        let tip = match kind {
            FingerKind::Tab => base + sign * depth,
            FingerKind::Slot => base - sign * depth,
        };
        let tip_cut = tip + sign * trim;

        let mut ordered = intervals.clone();
        ordered.sort_by(|a, b| a.start.total_cmp(&b.start));
        if !edge.is_ascending() {
            ordered.reverse();
        }

        for interval in ordered {
            let (low, high) = match kind {
                FingerKind::Tab => (interval.start - trim, interval.end + trim),
                FingerKind::Slot => (interval.start + trim, interval.end - trim),
            };
            debug_assert!(high > low, "finger collapses under trim");
            let (first, second) = if edge.is_ascending() {
                (low, high)
            } else {
                (high, low)
            };
            points.push(at(first, base_cut));
            points.push(at(first, tip_cut));
            points.push(at(second, tip_cut));
            points.push(at(second, base_cut));
        }
    }

    let (cx, cy) = edge.end_corner();
    points.push(rect.inflate(trim).corner(cx, cy));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_origin_size(Point::new(10.0, 10.0), 100.0, 50.0)
    }

    #[test]
    fn test_pitch_aligned() {
        let fingers = pitch_aligned(16.1, 17.0, 3, 8.0);
        assert_eq!(fingers.len(), 3);
        assert!((fingers[0].start - 12.1).abs() < 1e-9);
        assert!((fingers[2].center() - 50.1).abs() < 1e-9);
        assert!(fingers.iter().all(|f| (f.width() - 8.0).abs() < 1e-9));
    }

    #[test]
    fn test_evenly_spaced_leaves_half_step_at_far_end() {
        let fingers = evenly_spaced(10.0, 65.0, 4.0, 4);
        let step = 57.0 / 3.5;
        assert!((fingers[0].start - 14.0).abs() < 1e-9);
        assert!((fingers[3].end - (14.0 + 3.0 * step + step / 2.0)).abs() < 1e-9);
        assert!((fingers[3].end - (75.0 - 4.0)).abs() < 1e-9);
        assert!(evenly_spaced(0.0, 65.0, 4.0, 0).is_empty());
    }

    #[test]
    fn test_plain_contour_is_inflated_rect() {
        let profiles = [
            EdgeProfile::Plain,
            EdgeProfile::Plain,
            EdgeProfile::Plain,
            EdgeProfile::Plain,
        ];
        let contour = trace_contour(rect(), &profiles, 0.5);
        assert_eq!(contour.start, Point::new(9.5, 9.5));
        let points: Vec<_> = contour.points().copied().collect();
        assert_eq!(
            points,
            vec![
                Point::new(110.5, 9.5),
                Point::new(110.5, 60.5),
                Point::new(9.5, 60.5),
                Point::new(9.5, 9.5),
            ]
        );
        assert!(contour.is_closed(1e-9));
    }

    #[test]
    fn test_bottom_tab_widens_by_trim() {
        let profiles = [
            EdgeProfile::tabs(vec![Interval::new(20.0, 28.0)], 4.0),
            EdgeProfile::Plain,
            EdgeProfile::Plain,
            EdgeProfile::Plain,
        ];
        let contour = trace_contour(rect(), &profiles, 0.05);
        let bottom = &contour.edges[0];
        assert_eq!(bottom.len(), 5);
        assert!(bottom[0].approx_eq(Point::new(19.95, 9.95), 1e-9));
        assert!(bottom[1].approx_eq(Point::new(19.95, 5.95), 1e-9));
        assert!(bottom[2].approx_eq(Point::new(28.05, 5.95), 1e-9));
        assert!(bottom[3].approx_eq(Point::new(28.05, 9.95), 1e-9));
    }

    #[test]
    fn test_left_slot_descends_and_narrows() {
        let profiles = [
            EdgeProfile::Plain,
            EdgeProfile::Plain,
            EdgeProfile::Plain,
            EdgeProfile::slots(
                vec![Interval::new(20.0, 30.0), Interval::new(40.0, 50.0)],
                4.0,
            ),
        ];
        let contour = trace_contour(rect(), &profiles, 0.05);
        let left = &contour.edges[3];
        // Upper slot first, entered from its top.
        assert!(left[0].approx_eq(Point::new(9.95, 49.95), 1e-9));
        assert!(left[1].approx_eq(Point::new(13.95, 49.95), 1e-9));
        assert!(left[2].approx_eq(Point::new(13.95, 40.05), 1e-9));
        assert!(left[3].approx_eq(Point::new(9.95, 40.05), 1e-9));
        assert!(left[4].approx_eq(Point::new(9.95, 29.95), 1e-9));
        assert!(contour.is_closed(1e-9));
    }

    #[test]
    fn test_contour_stays_axis_aligned() {
        let profiles = [
            EdgeProfile::tabs(pitch_aligned(25.0, 17.0, 5, 8.0), 4.0),
            EdgeProfile::slots(evenly_spaced(10.0, 50.0, 4.0, 3), 4.0),
            EdgeProfile::tabs(pitch_aligned(25.0, 17.0, 5, 8.0), 4.0),
            EdgeProfile::slots(evenly_spaced(10.0, 50.0, 4.0, 3), 4.0),
        ];
        let contour = trace_contour(rect(), &profiles, 0.1);
        let mut previous = contour.start;
        for point in contour.points() {
            let dx = (point.x - previous.x).abs();
            let dy = (point.y - previous.y).abs();
            assert!(dx < 1e-9 || dy < 1e-9, "diagonal move to {:?}", point);
            previous = *point;
        }
        assert!(contour.is_closed(1e-9));
    }
}
