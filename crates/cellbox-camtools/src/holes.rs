//! Secondary holes: bonus holes, ventilation slots and side mounting holes
//!
//! Everything here is nominal geometry. Compensation happens when the
//! program is emitted, always as an interior cut.

use crate::grid::{CellPoint, GridSpec};
use crate::kerf::edge_offset;
use cellbox_core::{Point, Rect};
use cellbox_settings::{
    BonusHoleSettings, BonusPlacement, SideHoleMode, SideHoleSettings, VentSettings,
};

/// Diameters at or below this disable a hole family
const MIN_DIAMETER: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoleShape {
    Circle { center: Point, diameter: f64 },
    Slot(Rect),
}

/// How the actuator is driven for a hole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoleMode {
    Cut,
    /// Scribe only
    Mark,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hole {
    pub shape: HoleShape,
    pub mode: HoleMode,
    /// Pause after the hole is finished (s)
    pub dwell: f64,
}

impl Hole {
    pub fn circle(center: Point, diameter: f64, dwell: f64) -> Self {
        Self {
            shape: HoleShape::Circle { center, diameter },
            mode: HoleMode::Cut,
            dwell,
        }
    }

    pub fn slot(rect: Rect, dwell: f64) -> Self {
        Self {
            shape: HoleShape::Slot(rect),
            mode: HoleMode::Cut,
            dwell,
        }
    }
}

/// Compensated rectangle path for a slot: start point followed by the four
/// corners, ending back at the start.
pub fn slot_path(rect: &Rect, trim: f64) -> (Point, [Point; 4]) {
    let x0 = edge_offset(rect.min.x, false, trim);
    let y0 = edge_offset(rect.min.y, false, trim);
    let x1 = edge_offset(rect.max.x, true, trim);
    let y1 = edge_offset(rect.max.y, true, trim);
    let start = Point::new(x0, y0);
    (
        start,
        [
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
            start,
        ],
    )
}

/// Bonus holes that belong to one cell, cut right after it
pub fn cell_bonus_holes(
    grid: &GridSpec,
    anchor: Point,
    settings: &BonusHoleSettings,
    cell: &CellPoint,
    dwell: f64,
) -> Vec<Hole> {
    let d = settings.cell_diameter;
    if d <= MIN_DIAMETER {
        return Vec::new();
    }

    match settings.placement {
        BonusPlacement::BetweenColumns => {
            if cell.column % 2 == 0 {
                return Vec::new();
            }
            let previous_x = anchor.x + grid.column_x(cell.column - 1);
            let x = (2.0 * previous_x + cell.center.x) / 3.0;
            vec![Hole::circle(Point::new(x, cell.center.y), d, dwell)]
        }
        BonusPlacement::RowEnds => {
            if cell.column % 2 == 1 {
                return Vec::new();
            }
            let shift = grid.hole_diameter() / 2.0 + d / 2.0 + settings.cell_standoff;
            let mut holes = Vec::new();
            if cell.row == 0 {
                holes.push(Hole::circle(cell.center.offset(0.0, -shift), d, dwell));
            }
            if cell.row + 1 == grid.rows(cell.column) {
                holes.push(Hole::circle(cell.center.offset(0.0, shift), d, dwell));
            }
            holes
        }
    }
}

/// Holes beside the outermost columns, above the top row of column 0
pub fn end_bonus_holes(
    grid: &GridSpec,
    anchor: Point,
    settings: &BonusHoleSettings,
    dwell: f64,
) -> Vec<Hole> {
    let d = settings.end_diameter;
    if d <= MIN_DIAMETER {
        return Vec::new();
    }

    let half_hole = grid.hole_diameter() / 2.0;
    let y = anchor.y
        + grid.row_y(grid.rows_even() - 1)
        + half_hole
        + d / 2.0
        + settings.end_standoff;
    let first_x = anchor.x + grid.column_x(0) - half_hole;
    let last_x = anchor.x + grid.column_x(grid.columns() - 1) + half_hole;

    vec![
        Hole::circle(Point::new(first_x, y), d, dwell),
        Hole::circle(Point::new(last_x, y), d, dwell),
    ]
}

/// Geometry shared by the ventilation layout
#[derive(Debug, Clone, Copy)]
pub struct VentFrame {
    /// Left edge of the front panel
    pub panel_x: f64,
    /// Grid anchor y of the main panel, which the front panel shares
    pub anchor_y: f64,
    pub thickness: f64,
    pub cell_length: f64,
}

/// Ventilation slots: a row of slots level with every cell of column 0
pub fn vent_slots(
    grid: &GridSpec,
    frame: &VentFrame,
    vents: &VentSettings,
    dwell: f64,
) -> Vec<Hole> {
    let slots = vents.slots_per_cell.max(1);
    let y_size = grid.y_step() - vents.mid_width;
    let x_pitch =
        (frame.cell_length - 2.0 * frame.thickness - 2.0 * vents.frame_width) / slots as f64;
    let x_size = x_pitch - vents.mid_width;
    let y_shift = if grid.odd_columns_reach_top() {
        grid.y_step() / 4.0
    } else {
        0.0
    };

    let mut holes = Vec::with_capacity((grid.rows_even() * slots) as usize);
    for row in 0..grid.rows_even() {
        let y = frame.anchor_y + grid.row_y(row) - y_size / 2.0 + y_shift;
        for i in 0..slots {
            let x = frame.panel_x
                + frame.thickness
                + vents.frame_width
                + x_pitch * i as f64
                + vents.mid_width / 2.0;
            let rect = Rect::from_origin_size(Point::new(x, y), x_size, y_size);
            holes.push(Hole::slot(rect, dwell));
        }
    }
    holes
}

/// Mounting holes in the side panel: odd columns, one near each long edge
pub fn side_mount_holes(
    grid: &GridSpec,
    anchor_x: f64,
    span_start: f64,
    cell_length: f64,
    thickness: f64,
    settings: &SideHoleSettings,
    dwell: f64,
) -> Vec<Hole> {
    let mode = match settings.mode {
        SideHoleMode::Off => return Vec::new(),
        SideHoleMode::Cut => HoleMode::Cut,
        SideHoleMode::Mark => HoleMode::Mark,
    };
    let dwell = if mode == HoleMode::Mark { 0.0 } else { dwell };
    let low = span_start + thickness + settings.standoff;
    let high = span_start + cell_length - thickness - settings.standoff;

    (0..grid.columns())
        .filter(|column| column % 2 == 1)
        .flat_map(|column| {
            let x = anchor_x + grid.column_x(column);
            [low, high].map(|y| Hole {
                shape: HoleShape::Circle {
                    center: Point::new(x, y),
                    diameter: settings.diameter,
                },
                mode,
                dwell,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellbox_settings::CellSettings;

    fn grid(columns: u32, even: u32, odd: u32) -> GridSpec {
        GridSpec::new(columns, even, odd, &CellSettings::default()).unwrap()
    }

    #[test]
    fn test_between_columns_on_odd_columns_only() {
        let g = grid(3, 2, 1);
        let settings = BonusHoleSettings::default();
        let anchor = Point::new(7.0, 1.8);
        let counts: Vec<_> = g
            .cells(anchor)
            .map(|c| cell_bonus_holes(&g, anchor, &settings, &c, 0.0).len())
            .collect();
        assert_eq!(counts, vec![0, 0, 1, 0, 0]);

        let odd = g.cells(anchor).find(|c| c.column == 1).unwrap();
        let hole = cell_bonus_holes(&g, anchor, &settings, &odd, 0.0)[0];
        match hole.shape {
            HoleShape::Circle { center, diameter } => {
                let expected_x = anchor.x + 9.1 + g.x_step() / 3.0;
                assert!((center.x - expected_x).abs() < 1e-9);
                assert_eq!(center.y, odd.center.y);
                assert_eq!(diameter, 3.2);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_row_ends_above_and_below() {
        let g = grid(3, 3, 2);
        let settings = BonusHoleSettings {
            placement: BonusPlacement::RowEnds,
            cell_diameter: 2.5,
            ..BonusHoleSettings::default()
        };
        let anchor = Point::default();
        let total: usize = g
            .cells(anchor)
            .map(|c| cell_bonus_holes(&g, anchor, &settings, &c, 1.5).len())
            .sum();
        // Two even columns, one hole above and one below each.
        assert_eq!(total, 4);

        let top = g.cells(anchor).find(|c| c.column == 0 && c.row == 2).unwrap();
        let holes = cell_bonus_holes(&g, anchor, &settings, &top, 1.5);
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].dwell, 1.5);
        if let HoleShape::Circle { center, .. } = holes[0].shape {
            assert!((center.y - top.center.y - (9.1 + 1.25 + 1.3)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_disabled_by_small_diameter() {
        let g = grid(3, 2, 2);
        let settings = BonusHoleSettings {
            cell_diameter: 0.0,
            ..BonusHoleSettings::default()
        };
        assert!(g
            .cells(Point::default())
            .all(|c| cell_bonus_holes(&g, Point::default(), &settings, &c, 0.0).is_empty()));
        assert!(end_bonus_holes(&g, Point::default(), &settings, 0.0).is_empty());
    }

    #[test]
    fn test_end_bonus_holes_flank_grid() {
        let g = grid(4, 2, 2);
        let settings = BonusHoleSettings {
            end_diameter: 3.5,
            ..BonusHoleSettings::default()
        };
        let holes = end_bonus_holes(&g, Point::new(10.0, 10.0), &settings, 0.0);
        assert_eq!(holes.len(), 2);
        let xs: Vec<_> = holes
            .iter()
            .map(|h| match h.shape {
                HoleShape::Circle { center, .. } => center.x,
                HoleShape::Slot(_) => f64::NAN,
            })
            .collect();
        assert!((xs[0] - 10.0).abs() < 1e-9);
        assert!((xs[1] - (10.0 + g.x_step() * 3.0 + 18.2)).abs() < 1e-9);
    }

    #[test]
    fn test_vent_slot_layout() {
        let g = grid(3, 2, 1);
        let frame = VentFrame {
            panel_x: 10.0,
            anchor_y: 20.0,
            thickness: 4.0,
            cell_length: 65.0,
        };
        let holes = vent_slots(&g, &frame, &VentSettings::default(), 0.0);
        assert_eq!(holes.len(), 6);
        match holes[0].shape {
            HoleShape::Slot(rect) => {
                let pitch = (65.0 - 8.0 - 10.0) / 3.0;
                assert!((rect.min.x - (10.0 + 4.0 + 5.0 + 2.0)).abs() < 1e-9);
                assert!((rect.width() - (pitch - 4.0)).abs() < 1e-9);
                assert!((rect.height() - 16.0).abs() < 1e-9);
                assert!((rect.min.y - (20.0 + 9.1 - 8.0)).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_vent_rows_shift_with_equal_rows() {
        let frame = VentFrame {
            panel_x: 0.0,
            anchor_y: 0.0,
            thickness: 4.0,
            cell_length: 65.0,
        };
        let a = vent_slots(&grid(3, 2, 1), &frame, &VentSettings::default(), 0.0);
        let b = vent_slots(&grid(3, 2, 2), &frame, &VentSettings::default(), 0.0);
        match (a[0].shape, b[0].shape) {
            (HoleShape::Slot(ra), HoleShape::Slot(rb)) => {
                assert!((rb.min.y - ra.min.y - 5.0).abs() < 1e-9)
            }
            _ => panic!("expected slots"),
        }
    }

    #[test]
    fn test_slot_path_shrinks() {
        let rect = Rect::from_origin_size(Point::new(0.0, 0.0), 10.0, 4.0);
        let (start, corners) = slot_path(&rect, 0.5);
        assert_eq!(start, Point::new(0.5, 0.5));
        assert_eq!(corners[1], Point::new(9.5, 3.5));
        assert_eq!(corners[3], start);
    }

    #[test]
    fn test_side_mount_holes() {
        let g = grid(5, 2, 2);
        let mut settings = SideHoleSettings::default();
        let holes = side_mount_holes(&g, 0.0, 10.0, 65.0, 4.0, &settings, 2.0);
        assert_eq!(holes.len(), 4);
        assert!(holes.iter().all(|h| h.mode == HoleMode::Cut && h.dwell == 2.0));

        settings.mode = SideHoleMode::Mark;
        let holes = side_mount_holes(&g, 0.0, 10.0, 65.0, 4.0, &settings, 2.0);
        assert!(holes.iter().all(|h| h.mode == HoleMode::Mark && h.dwell == 0.0));

        settings.mode = SideHoleMode::Off;
        assert!(side_mount_holes(&g, 0.0, 10.0, 65.0, 4.0, &settings, 2.0).is_empty());
    }
}
