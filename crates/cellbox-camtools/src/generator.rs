//! Box program generator
//!
//! Turns a validated [`Configuration`] and grid counts into the main cut
//! program (main, side and front panels) and, with covers enabled, a
//! separate cover program.

use crate::error::CamToolResult;
use crate::finger_joint::Contour;
use crate::grid::GridSpec;
use crate::holes::{
    cell_bonus_holes, end_bonus_holes, side_mount_holes, slot_path, vent_slots, Hole, HoleMode,
    HoleShape, VentFrame,
};
use crate::kerf::compensate_circle;
use crate::outline::panel_size;
use crate::panels::{Panel, PanelPlanner};
use crate::program::{PowerProfile, Program, ProgramBuilder};
use cellbox_core::{Annotation, Edge, Point, WeldPoint};
use cellbox_settings::Configuration;

/// Bonus and mounting holes dwell a quarter of a cell hole
const SMALL_HOLE_DWELL_FACTOR: f64 = 0.25;

/// Programs produced by one run
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub main: Program,
    pub cover: Option<Program>,
}

/// Overall dimensions, reported to the operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxReport {
    pub x_step: f64,
    pub y_step: f64,
    /// Main panel without fingers
    pub main_size: (f64, f64),
    /// Assembled box: width, height, depth
    pub box_size: (f64, f64, f64),
    /// Sheet needed for the main program
    pub sheet_size: (f64, f64),
    /// Sheet needed for the cover program
    pub cover_sheet_size: Option<(f64, f64)>,
}

pub struct BoxGenerator<'a> {
    config: &'a Configuration,
    grid: GridSpec,
}

impl<'a> BoxGenerator<'a> {
    /// Validate everything up front; no geometry is computed on failure.
    pub fn new(
        config: &'a Configuration,
        columns: u32,
        rows_even: u32,
        rows_odd: u32,
    ) -> CamToolResult<Self> {
        config.validate()?;
        let grid = GridSpec::new(columns, rows_even, rows_odd, &config.cell)?;
        Ok(Self { config, grid })
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn report(&self) -> BoxReport {
        let walls = &self.config.walls;
        let th = walls.thickness;
        let (width, height) = panel_size(&self.grid, &walls.wall_gaps);
        let depth = self.config.cell.cell_length
            + if self.config.panels.do_covers {
                2.0 * walls.cover_thickness
            } else {
                0.0
            };
        let planner = PanelPlanner::new(self.config, &self.grid);
        let extent = planner.layout().sheet_extent(th);
        let cover_sheet_size = planner
            .layout()
            .cover
            .map(|rect| (rect.width(), rect.height() + 2.0 * th));

        BoxReport {
            x_step: self.grid.x_step(),
            y_step: self.grid.y_step(),
            main_size: (width, height),
            box_size: (width + 2.0 * th, height + 2.0 * th, depth),
            sheet_size: (extent.max.x, extent.max.y),
            cover_sheet_size,
        }
    }

    /// Generate all programs. `invocation` is echoed into each header.
    pub fn generate(&self, invocation: &[String]) -> CamToolResult<Artifacts> {
        let report = self.report();
        tracing::info!(
            "y_step = {:.6}, x_step = {:.6}",
            report.y_step,
            report.x_step
        );
        tracing::info!(
            "Main panel size without fingers: {:.2} x {:.2}",
            report.main_size.0,
            report.main_size.1
        );
        tracing::info!(
            "Total box size: {:.2} x {:.2} x {:.2}",
            report.box_size.0,
            report.box_size.1,
            report.box_size.2
        );
        tracing::info!(
            "Sheet needed: {:.2} x {:.2}",
            report.sheet_size.0,
            report.sheet_size.1
        );
        if let Some((w, h)) = report.cover_sheet_size {
            tracing::info!("Cover size with fingers (sheet needed): {:.2} x {:.2}", w, h);
        }

        let planner = PanelPlanner::new(self.config, &self.grid);
        let main = self.main_program(&planner, invocation)?;
        let cover = match planner.cover_panel() {
            Some(panel) => Some(self.cover_program(&panel, invocation)?),
            None => None,
        };

        Ok(Artifacts { main, cover })
    }

    fn header(&self, builder: &mut ProgramBuilder, invocation: &[String]) {
        let echo: String = invocation.iter().map(|arg| format!(" {} ", arg)).collect();
        builder.comment(echo);
        for line in config_tuples(self.config) {
            builder.comment(line);
        }
        builder.setup();
    }

    fn main_program(
        &self,
        planner: &PanelPlanner<'_>,
        invocation: &[String],
    ) -> CamToolResult<Program> {
        let config = self.config;
        let process = &config.process;
        let layout = planner.layout();
        let power = PowerProfile {
            cut_power: process.cut_power,
            mark_power: process.mark_power,
            ramp: process.power_ramp,
            max_power: process.max_power,
        };
        let mut builder = ProgramBuilder::new(process.feed_rate, power);
        self.header(&mut builder, invocation);

        let origin = layout.main.min;
        let anchor = layout.main_anchor(config);
        let hole_trim = config.kerf.hole;
        let small_dwell = SMALL_HOLE_DWELL_FACTOR * process.delay_per_cell;

        for cell in self.grid.cells(anchor) {
            let radius = self.grid.hole_diameter() / 2.0;
            let circle = compensate_circle(cell.center, radius, hole_trim);
            let weld = WeldPoint {
                column: cell.column,
                row: cell.row,
                center: cell.center - origin,
            };
            builder
                .rapid_annotated(circle.start, Some(Annotation::Weld(weld)))
                .start_cut()
                .arc_to(circle.start, circle.center_offset)
                .stop()
                .dwell(process.delay_per_cell);

            let bonus = cell_bonus_holes(&self.grid, anchor, &config.bonus_holes, &cell, small_dwell);
            for hole in bonus {
                emit_hole(&mut builder, &hole, hole_trim);
            }
        }

        for hole in end_bonus_holes(&self.grid, anchor, &config.bonus_holes, small_dwell) {
            emit_hole(&mut builder, &hole, hole_trim);
        }

        let outline = planner.outline();
        let corners = outline.corners();
        let main = planner.main_panel();
        tracing::debug!("main panel: {} fingers", main.finger_count());
        emit_contour(
            &mut builder,
            &main.contour(),
            [
                Some(Annotation::Align(corners[0].align_point())),
                Some(Annotation::Align(corners[1].align_point())),
                Some(Annotation::Align(corners[2].align_point())),
                Some(Annotation::Align(corners[3].align_point())),
            ],
            None,
        );

        if let Some(side) = planner.side_panel() {
            tracing::debug!("side panel: {} fingers", side.finger_count());
            let cooldown = self.cooldown(&side, process.delay_per_cell);
            emit_contour(&mut builder, &side.contour(), [None; 4], cooldown);

            for hole in side_mount_holes(
                &self.grid,
                side.rect.min.x + config.walls.wall_gaps.left,
                layout.side_span_start,
                config.cell.cell_length,
                config.walls.thickness,
                &config.side_holes,
                small_dwell,
            ) {
                emit_hole(&mut builder, &hole, hole_trim);
            }
        }

        if let Some(front) = planner.front_panel() {
            tracing::debug!("front panel: {} fingers", front.finger_count());
            let frame = VentFrame {
                panel_x: front.rect.min.x,
                anchor_y: anchor.y,
                thickness: config.walls.thickness,
                cell_length: config.cell.cell_length,
            };
            for hole in vent_slots(&self.grid, &frame, &config.vents, process.delay_per_cell) {
                emit_hole(&mut builder, &hole, hole_trim);
            }

            let cooldown = self.cooldown(&front, process.delay_per_cell);
            emit_contour(&mut builder, &front.contour(), [None; 4], cooldown);
        }

        builder.trailer(origin, process.end_dwell);
        let program = builder.finish()?;
        tracing::debug!("main program: {} instructions", program.len());
        Ok(program)
    }

    fn cover_program(&self, cover: &Panel, invocation: &[String]) -> CamToolResult<Program> {
        let process = &self.config.process;
        let power = PowerProfile {
            cut_power: process.cover_power,
            mark_power: process.mark_power,
            ramp: 0,
            max_power: process.max_power,
        };
        let mut builder = ProgramBuilder::new(process.cover_feed_rate, power);
        self.header(&mut builder, invocation);

        let cooldown = self.cooldown(cover, process.cover_delay_per_cell);
        emit_contour(&mut builder, &cover.contour(), [None; 4], cooldown);

        builder.trailer(cover.rect.min, process.end_dwell);
        let program = builder.finish()?;
        tracing::debug!("cover program: {} instructions", program.len());
        Ok(program)
    }

    /// Per-edge pauses when edge cooldown is enabled: one `delay` per cell
    /// pitch of edge length.
    fn cooldown(&self, panel: &Panel, delay: f64) -> Option<[f64; 4]> {
        if !self.config.process.edge_cooldown || delay <= 0.0 {
            return None;
        }
        let pitch = self.grid.y_step();
        Some(Edge::ALL.map(|edge| {
            let length = if edge.is_horizontal() {
                panel.rect.width()
            } else {
                panel.rect.height()
            };
            delay * length / pitch
        }))
    }
}

fn activate(builder: &mut ProgramBuilder, mode: HoleMode) {
    match mode {
        HoleMode::Cut => builder.start_cut(),
        HoleMode::Mark => builder.start_mark(),
    };
}

/// Cut one secondary hole from its compensated start point
fn emit_hole(builder: &mut ProgramBuilder, hole: &Hole, trim: f64) {
    match hole.shape {
        HoleShape::Circle { center, diameter } => {
            let circle = compensate_circle(center, diameter / 2.0, trim);
            builder.rapid(circle.start);
            activate(builder, hole.mode);
            builder.arc_to(circle.start, circle.center_offset);
        }
        HoleShape::Slot(rect) => {
            let (start, corners) = slot_path(&rect, trim);
            builder.rapid(start);
            activate(builder, hole.mode);
            for corner in corners {
                builder.line_to(corner);
            }
        }
    }
    builder.stop().dwell(hole.dwell);
}

/// Cut a closed contour.
///
/// `annotations[0]` rides on the rapid move to the start corner, the others
/// on the motion line that reaches the end of bottom, right and top edges.
/// With `cooldown` the actuator is switched off at every corner for the
/// given pause.
fn emit_contour(
    builder: &mut ProgramBuilder,
    contour: &Contour,
    annotations: [Option<Annotation>; 4],
    cooldown: Option<[f64; 4]>,
) {
    builder.rapid_annotated(contour.start, annotations[0]).start_cut();

    for (index, edge) in contour.edges.iter().enumerate() {
        if let Some((last, body)) = edge.split_last() {
            for point in body {
                builder.line_to(*point);
            }
            let annotation = annotations.get(index + 1).copied().flatten();
            builder.line_to_annotated(*last, annotation);
        }

        if let Some(pauses) = cooldown {
            builder.stop().dwell(pauses[index]);
            if index + 1 < contour.edges.len() {
                builder.start_cut();
            }
        }
    }

    if cooldown.is_none() {
        builder.stop();
    }
}

fn tuple(values: &[String]) -> String {
    format!("{};", values.join("; "))
}

fn float(value: f64) -> String {
    format!("{:.6}", value)
}

/// Configuration dump, one parenthesised tuple per group
fn config_tuples(config: &Configuration) -> Vec<String> {
    let walls = &config.walls;
    let gaps = &walls.wall_gaps;
    vec![
        tuple(&[
            float(config.cell.hole_diameter),
            float(config.cell.cell_gap),
            float(config.cell.spacing_trim),
            float(config.cell.cell_length),
        ]),
        tuple(&[
            float(gaps.left),
            float(gaps.bottom),
            float(gaps.right),
            float(gaps.top),
            float(walls.thickness),
            float(walls.cover_thickness),
            float(walls.part_separation),
            float(walls.sheet_margin),
        ]),
        tuple(&[
            float(config.kerf.outline),
            float(config.kerf.hole),
            float(config.kerf.cover),
        ]),
        tuple(&[
            float(config.fingers.size_x),
            float(config.fingers.size_y),
            config.fingers.side_front_count.to_string(),
        ]),
        tuple(&[
            float(config.bonus_holes.cell_diameter),
            float(config.bonus_holes.cell_standoff),
            float(config.bonus_holes.end_diameter),
            float(config.bonus_holes.end_standoff),
        ]),
        tuple(&[
            float(config.side_holes.diameter),
            float(config.side_holes.standoff),
        ]),
        tuple(&[
            float(config.vents.frame_width),
            float(config.vents.mid_width),
            config.vents.slots_per_cell.to_string(),
        ]),
    ]
}
