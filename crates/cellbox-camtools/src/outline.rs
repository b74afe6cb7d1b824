//! Main panel outline and alignment corners

use crate::grid::GridSpec;
use crate::kerf::{corner_offset, edge_offset};
use cellbox_core::{AlignPoint, Edge, Point, Rect};
use cellbox_settings::WallGaps;

/// Which neighbouring panels are joined to the main panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attachments {
    /// Side panels on the bottom and top edges
    pub sides: bool,
    /// Front/back panels on the left and right edges
    pub fronts: bool,
}

/// One corner of the main panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub cx: u8,
    pub cy: u8,
    /// Corner of the nominal rectangle
    pub nominal: Point,
    /// Where the compensated path turns
    pub cut: Point,
    /// Corner of the assembled box, including attached panel thickness
    pub physical: Point,
}

impl Corner {
    pub fn align_point(&self) -> AlignPoint {
        AlignPoint {
            cx: self.cx,
            cy: self.cy,
            position: self.physical,
        }
    }
}

/// Order in which contours visit the corners
pub const CORNER_ORDER: [(u8, u8); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// Nominal main panel size (without fingers) for a grid
pub fn panel_size(grid: &GridSpec, gaps: &WallGaps) -> (f64, f64) {
    (
        gaps.left + grid.span_x() + gaps.right,
        gaps.bottom + grid.span_y() + gaps.top,
    )
}

/// The main panel rectangle with its four tagged corners
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    rect: Rect,
    corners: [Corner; 4],
}

impl Outline {
    pub fn new(
        grid: &GridSpec,
        gaps: &WallGaps,
        origin: Point,
        trim: f64,
        thickness: f64,
        attached: Attachments,
    ) -> Self {
        let (width, height) = panel_size(grid, gaps);
        let rect = Rect::from_origin_size(origin, width, height);

        let corners = CORNER_ORDER.map(|(cx, cy)| {
            let nominal = rect.corner(cx, cy);
            let (x_edge, y_edge) = (
                if cx == 0 { Edge::Left } else { Edge::Right },
                if cy == 0 { Edge::Bottom } else { Edge::Top },
            );
            Corner {
                cx,
                cy,
                nominal,
                cut: Point::new(
                    edge_offset(nominal.x, cx == 0, trim),
                    edge_offset(nominal.y, cy == 0, trim),
                ),
                physical: Point::new(
                    nominal.x + corner_offset(x_edge, attached.fronts, thickness),
                    nominal.y + corner_offset(y_edge, attached.sides, thickness),
                ),
            }
        });

        Self { rect, corners }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn corners(&self) -> &[Corner; 4] {
        &self.corners
    }

    /// Corner by its (cx, cy) tag; `None` outside {0, 1}
    pub fn corner(&self, cx: u8, cy: u8) -> Option<&Corner> {
        self.corners.iter().find(|c| (c.cx, c.cy) == (cx, cy))
    }
}
