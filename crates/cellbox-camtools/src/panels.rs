//! Panel placement on the sheet and per-panel edge profiles
//!
//! ```text
//!   +------+ +----------------+
//!   |front | |      main      |
//!   |      | |                |
//!   +------+ +----------------+
//!            +----------------+
//!            |      side      |
//!            +----------------+
//! ```
//!
//! The front panel sits left of the main panel and shares its y extent.
//! The side panel sits below the main panel, or right of it when
//! `side_at_back` is set. Covers are cut from their own sheet.

use crate::finger_joint::{
    evenly_spaced, pitch_aligned, trace_contour, Contour, EdgeProfile, Interval,
};
use crate::grid::GridSpec;
use crate::outline::{panel_size, Attachments, Outline};
use cellbox_core::{Point, Rect};
use cellbox_settings::Configuration;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Main,
    Side,
    Front,
    Cover,
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => write!(f, "main"),
            Self::Side => write!(f, "side"),
            Self::Front => write!(f, "front"),
            Self::Cover => write!(f, "cover"),
        }
    }
}

/// A panel ready to be traced: its nominal rectangle, one profile per edge
/// and the trim it is cut with
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: PanelKind,
    pub rect: Rect,
    pub profiles: [EdgeProfile; 4],
    pub trim: f64,
}

impl Panel {
    pub fn contour(&self) -> Contour {
        trace_contour(self.rect, &self.profiles, self.trim)
    }

    pub fn finger_count(&self) -> usize {
        self.profiles.iter().map(EdgeProfile::finger_count).sum()
    }
}

/// Where every panel lands on the sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Main panel, without fingers
    pub main: Rect,
    /// Side panel including the cover allowance
    pub side: Option<Rect>,
    /// Start of the cell-length span inside the side panel
    pub side_span_start: f64,
    pub front: Option<Rect>,
    /// Cover panel, on its own sheet
    pub cover: Option<Rect>,
}

impl SheetLayout {
    pub fn new(config: &Configuration, grid: &GridSpec) -> Self {
        let walls = &config.walls;
        let panels = &config.panels;
        let margin = walls.sheet_margin;
        let th = walls.thickness;
        let sep = walls.part_separation;
        let length = config.cell.cell_length;
        let cover_allowance = if panels.do_covers {
            walls.cover_thickness
        } else {
            0.0
        };
        let (width, height) = panel_size(grid, &walls.wall_gaps);

        let mut origin = Point::new(margin + th, margin + th);
        if panels.do_fronts {
            origin.x += length + sep;
        }
        if panels.do_sides && !panels.side_at_back {
            origin.y += length + sep + 2.0 * cover_allowance;
        }
        let main = Rect::from_origin_size(origin, width, height);

        let side = panels.do_sides.then(|| {
            let x = if panels.side_at_back {
                main.max.x + sep + 2.0 * th
            } else {
                main.min.x
            };
            Rect::from_origin_size(
                Point::new(x, margin),
                width,
                length + 2.0 * cover_allowance,
            )
        });

        let front = panels.do_fronts.then(|| {
            Rect::new(
                Point::new(margin, main.min.y - th),
                Point::new(margin + length, main.max.y + th),
            )
        });

        let cover = panels.do_covers.then(|| {
            Rect::from_origin_size(Point::new(margin, margin + th), width + 2.0 * th, height)
        });

        Self {
            main,
            side,
            side_span_start: margin + cover_allowance,
            front,
            cover,
        }
    }

    /// Where the bottom-left of column 0's first hole sits on the main panel
    pub fn main_anchor(&self, config: &Configuration) -> Point {
        let gaps = &config.walls.wall_gaps;
        self.main.min.offset(gaps.left, gaps.bottom)
    }

    /// Bounding box of everything on the main sheet, fingers included
    pub fn sheet_extent(&self, thickness: f64) -> Rect {
        let mut extent = self.main.inflate(thickness);
        for rect in [self.side, self.front].into_iter().flatten() {
            let grown = rect.inflate(thickness);
            extent.min.x = extent.min.x.min(grown.min.x);
            extent.min.y = extent.min.y.min(grown.min.y);
            extent.max.x = extent.max.x.max(grown.max.x);
            extent.max.y = extent.max.y.max(grown.max.y);
        }
        extent
    }
}

/// Builds the panels of one box from a shared configuration and grid
pub struct PanelPlanner<'a> {
    config: &'a Configuration,
    grid: &'a GridSpec,
    layout: SheetLayout,
}

impl<'a> PanelPlanner<'a> {
    pub fn new(config: &'a Configuration, grid: &'a GridSpec) -> Self {
        Self {
            config,
            grid,
            layout: SheetLayout::new(config, grid),
        }
    }

    pub fn layout(&self) -> &SheetLayout {
        &self.layout
    }

    fn attachments(&self) -> Attachments {
        Attachments {
            sides: self.config.panels.do_sides,
            fronts: self.config.panels.do_fronts,
        }
    }

    /// The main panel outline with its alignment corners
    pub fn outline(&self) -> Outline {
        Outline::new(
            self.grid,
            &self.config.walls.wall_gaps,
            self.layout.main.min,
            self.config.kerf.outline,
            self.config.walls.thickness,
            self.attachments(),
        )
    }

    /// One finger per column, for a panel whose left edge is at `panel_x`
    fn column_fingers(&self, panel_x: f64) -> Vec<Interval> {
        let first = panel_x + self.config.walls.wall_gaps.left + self.grid.column_x(0);
        pitch_aligned(
            first,
            self.grid.x_step(),
            self.grid.columns(),
            self.config.fingers.size_x,
        )
    }

    /// One finger per row of column 0, in main panel coordinates
    fn row_fingers(&self) -> Vec<Interval> {
        let first = self.layout.main_anchor(self.config).y + self.grid.row_y(0);
        pitch_aligned(
            first,
            self.grid.y_step(),
            self.grid.rows_even(),
            self.config.fingers.size_y,
        )
    }

    fn side_front_fingers(&self, span_start: f64) -> Vec<Interval> {
        evenly_spaced(
            span_start,
            self.config.cell.cell_length,
            self.config.walls.thickness,
            self.config.fingers.side_front_count,
        )
    }

    pub fn main_panel(&self) -> Panel {
        let th = self.config.walls.thickness;
        let rect = self.layout.main;
        let horizontal = if self.config.panels.do_sides {
            EdgeProfile::tabs(self.column_fingers(rect.min.x), th)
        } else {
            EdgeProfile::Plain
        };
        let vertical = if self.config.panels.do_fronts {
            EdgeProfile::tabs(self.row_fingers(), th)
        } else {
            EdgeProfile::Plain
        };

        Panel {
            kind: PanelKind::Main,
            rect,
            profiles: [horizontal.clone(), vertical.clone(), horizontal, vertical],
            trim: self.config.kerf.outline,
        }
    }

    pub fn side_panel(&self) -> Option<Panel> {
        let rect = self.layout.side?;
        let th = self.config.walls.thickness;
        let allowance = self.layout.side_span_start - rect.min.y;
        let horizontal = EdgeProfile::slots(self.column_fingers(rect.min.x), th + allowance);
        let vertical = if self.config.panels.do_fronts {
            EdgeProfile::tabs(self.side_front_fingers(self.layout.side_span_start), th)
        } else {
            EdgeProfile::Plain
        };

        Some(Panel {
            kind: PanelKind::Side,
            rect,
            profiles: [horizontal.clone(), vertical.clone(), horizontal, vertical],
            trim: self.config.kerf.outline,
        })
    }

    pub fn front_panel(&self) -> Option<Panel> {
        let rect = self.layout.front?;
        let th = self.config.walls.thickness;
        let horizontal = if self.config.panels.do_sides {
            EdgeProfile::slots(self.side_front_fingers(rect.min.x), th)
        } else {
            EdgeProfile::Plain
        };
        let vertical = EdgeProfile::slots(self.row_fingers(), th);

        Some(Panel {
            kind: PanelKind::Front,
            rect,
            profiles: [horizontal.clone(), vertical.clone(), horizontal, vertical],
            trim: self.config.kerf.outline,
        })
    }

    pub fn cover_panel(&self) -> Option<Panel> {
        let rect = self.layout.cover?;
        let th = self.config.walls.thickness;
        let horizontal = if self.config.panels.do_sides {
            EdgeProfile::tabs(self.column_fingers(rect.min.x + th), th)
        } else {
            EdgeProfile::Plain
        };

        Some(Panel {
            kind: PanelKind::Cover,
            rect,
            profiles: [
                horizontal.clone(),
                EdgeProfile::Plain,
                horizontal,
                EdgeProfile::Plain,
            ],
            trim: self.config.kerf.cover,
        })
    }
}
