//! End-to-end checks on generated box programs

use cellbox_camtools::program::verify_actuator_sequence;
use cellbox_camtools::{BoxGenerator, Instruction};
use cellbox_core::{parse_line, AlignPoint, Annotation, WeldPoint};
use cellbox_settings::{Configuration, Preset};
use proptest::prelude::*;

fn invocation() -> Vec<String> {
    vec!["cellbox".to_string(), "box.ngc".to_string()]
}

fn weldpoints(annotations: &[Annotation]) -> Vec<WeldPoint> {
    annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::Weld(p) => Some(*p),
            _ => None,
        })
        .collect()
}

fn alignpoints(annotations: &[Annotation]) -> Vec<AlignPoint> {
    annotations
        .iter()
        .filter_map(|a| match a {
            Annotation::Align(p) => Some(*p),
            _ => None,
        })
        .collect()
}

/// Width and height of the main panel from the grid counts and defaults
fn expected_size(
    config: &Configuration,
    columns: u32,
    rows_even: u32,
    rows_odd: u32,
) -> (f64, f64) {
    let gaps = &config.walls.wall_gaps;
    let hole = config.cell.hole_diameter;
    let (x_step, y_step) = (config.cell.x_step(), config.cell.y_step());

    let width = gaps.left + x_step * (columns - 1) as f64 + hole + gaps.right;
    let height = if rows_odd > rows_even {
        // Odd columns stand a full row plus half a pitch above column 0.
        gaps.bottom + y_step * (rows_odd - 1) as f64 + y_step / 2.0 + hole + gaps.top
    } else if rows_odd == rows_even {
        gaps.bottom + y_step * (rows_even - 1) as f64 + hole + gaps.top + y_step / 2.0
    } else {
        gaps.bottom + y_step * (rows_even - 1) as f64 + hole + gaps.top
    };
    (width, height)
}

fn expected_cells(columns: u32, rows_even: u32, rows_odd: u32) -> usize {
    (columns.div_ceil(2) * rows_even + (columns / 2) * rows_odd) as usize
}

#[test]
fn test_weldpoint_count_for_reference_pack() {
    let config = Configuration::default();
    let generator = BoxGenerator::new(&config, 11, 4, 3).unwrap();
    let program = generator.generate(&invocation()).unwrap().main;
    let annotations: Vec<_> = program.annotations().copied().collect();

    let welds = weldpoints(&annotations);
    assert_eq!(welds.len(), 39);
    assert_eq!((welds[0].column, welds[0].row), (0, 0));
    assert_eq!((welds[38].column, welds[38].row), (10, 3));
}

#[test]
fn test_annotations_survive_the_text_format() {
    let config = Configuration::default();
    let generator = BoxGenerator::new(&config, 5, 3, 3).unwrap();
    let program = generator.generate(&invocation()).unwrap().main;
    let gcode = program.to_gcode();

    let parsed: Vec<Annotation> = gcode
        .lines()
        .filter_map(|line| parse_line(line).unwrap())
        .collect();
    assert_eq!(parsed.len(), program.annotations().count());
    assert_eq!(weldpoints(&parsed).len(), 15);
    assert_eq!(alignpoints(&parsed).len(), 4);
}

#[test]
fn test_alignpoints_describe_the_assembled_box() {
    let config = Configuration::default();
    let generator = BoxGenerator::new(&config, 11, 4, 3).unwrap();
    let report = generator.report();
    let program = generator.generate(&invocation()).unwrap().main;
    let annotations: Vec<_> = program.annotations().copied().collect();
    let corners = alignpoints(&annotations);

    let order: Vec<_> = corners.iter().map(|c| (c.cx, c.cy)).collect();
    assert_eq!(order, vec![(0, 0), (1, 0), (1, 1), (0, 1)]);

    let width = corners[1].position.x - corners[0].position.x;
    let height = corners[2].position.y - corners[1].position.y;
    assert!((width - report.box_size.0).abs() < 1e-6);
    assert!((height - report.box_size.1).abs() < 1e-6);
    assert!((corners[3].position.x - corners[0].position.x).abs() < 1e-9);
}

#[test]
fn test_alignpoints_without_attached_panels_are_nominal() {
    let mut config = Configuration::default();
    config.panels.do_sides = false;
    config.panels.do_fronts = false;
    let generator = BoxGenerator::new(&config, 4, 2, 2).unwrap();
    let report = generator.report();
    let program = generator.generate(&invocation()).unwrap().main;
    let annotations: Vec<_> = program.annotations().copied().collect();
    let corners = alignpoints(&annotations);

    assert!((corners[0].position.x - 14.0).abs() < 1e-9);
    assert!((corners[0].position.y - 14.0).abs() < 1e-9);
    let width = corners[1].position.x - corners[0].position.x;
    assert!((width - report.main_size.0).abs() < 1e-6);
}

#[test]
fn test_inner_features_are_cut_before_the_main_outline() {
    let config = Configuration::default();
    let generator = BoxGenerator::new(&config, 3, 2, 2).unwrap();
    let program = generator.generate(&invocation()).unwrap().main;
    let instructions = program.instructions();

    let last_weld = instructions
        .iter()
        .rposition(|i| {
            matches!(
                i,
                Instruction::Rapid {
                    annotation: Some(Annotation::Weld(_)),
                    ..
                }
            )
        })
        .unwrap();
    let first_align = instructions
        .iter()
        .position(|i| {
            matches!(
                i,
                Instruction::Rapid {
                    annotation: Some(Annotation::Align(_)),
                    ..
                }
            )
        })
        .unwrap();
    assert!(last_weld < first_align);
}

#[test]
fn test_router_preset_generates_with_covers() {
    let mut config = Configuration::from_preset(Preset::Router);
    config.panels.do_covers = true;
    let generator = BoxGenerator::new(&config, 6, 5, 4).unwrap();
    let artifacts = generator.generate(&invocation()).unwrap();

    assert!(verify_actuator_sequence(artifacts.main.instructions()).is_ok());
    let cover = artifacts.cover.unwrap();
    assert!(verify_actuator_sequence(cover.instructions()).is_ok());
    assert!(cover.to_gcode().ends_with("M2\n%\n"));
}

#[test]
fn test_taller_odd_columns_fit_inside_the_panel() {
    let config = Configuration::default();
    let generator = BoxGenerator::new(&config, 3, 3, 4).unwrap();
    let report = generator.report();
    let program = generator.generate(&invocation()).unwrap().main;
    let annotations: Vec<_> = program.annotations().copied().collect();
    let corners = alignpoints(&annotations);

    let top = corners[2].position.y - config.walls.thickness;
    let hole_top = weldpoints(&annotations)
        .iter()
        .map(|w| w.center.y + config.cell.hole_diameter / 2.0)
        .fold(f64::MIN, f64::max);
    assert!(hole_top < top);
    assert!((report.main_size.1 - expected_size(&config, 3, 3, 4).1).abs() < 1e-9);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn alignpoints_follow_the_panel_formula(
        columns in 1u32..=20,
        rows_even in 2u32..=20,
        parity in 0u32..3,
        sides in any::<bool>(),
        fronts in any::<bool>(),
    ) {
        // parity 0: one fewer odd row, 1: equal, 2: one more
        let rows_odd = rows_even + parity - 1;
        let mut config = Configuration::default();
        config.panels.do_sides = sides;
        config.panels.do_fronts = fronts;
        let generator = BoxGenerator::new(&config, columns, rows_even, rows_odd).unwrap();
        let program = generator.generate(&invocation()).unwrap().main;
        let annotations: Vec<_> = program.annotations().copied().collect();
        let corners = alignpoints(&annotations);

        let order: Vec<_> = corners.iter().map(|c| (c.cx, c.cy)).collect();
        prop_assert_eq!(order, vec![(0, 0), (1, 0), (1, 1), (0, 1)]);

        let th = config.walls.thickness;
        let x_inset = if fronts { th } else { 0.0 };
        let y_inset = if sides { th } else { 0.0 };
        let left = corners[0].position.x + x_inset;
        let bottom = corners[0].position.y + y_inset;
        let right = corners[2].position.x - x_inset;
        let top = corners[2].position.y - y_inset;

        let (width, height) = expected_size(&config, columns, rows_even, rows_odd);
        prop_assert!((right - left - width).abs() < 1e-6);
        prop_assert!((top - bottom - height).abs() < 1e-6);
        prop_assert!((corners[1].position.y - corners[0].position.y).abs() < 1e-9);
        prop_assert!((corners[3].position.x - corners[0].position.x).abs() < 1e-9);

        let radius = config.cell.hole_diameter / 2.0;
        for weld in weldpoints(&annotations) {
            prop_assert!(weld.center.x - radius >= left - 1e-9);
            prop_assert!(weld.center.x + radius <= right + 1e-9);
            prop_assert!(weld.center.y - radius >= bottom - 1e-9);
            prop_assert!(weld.center.y + radius <= top + 1e-9);
        }
    }

    #[test]
    fn one_weldpoint_per_cell(
        columns in 1u32..=30,
        rows_even in 1u32..=30,
        delta in 0u32..3,
    ) {
        let rows_odd = (rows_even + delta).saturating_sub(1).max(1);
        let config = Configuration::default();
        let generator = BoxGenerator::new(&config, columns, rows_even, rows_odd).unwrap();
        let program = generator.generate(&invocation()).unwrap().main;
        let annotations: Vec<_> = program.annotations().copied().collect();

        prop_assert_eq!(
            weldpoints(&annotations).len(),
            expected_cells(columns, rows_even, rows_odd)
        );
        prop_assert_eq!(alignpoints(&annotations).len(), 4);
    }

    #[test]
    fn weldpoints_keep_the_cell_pitch(
        columns in 1u32..=12,
        rows_even in 1u32..=12,
        odd_fewer in any::<bool>(),
    ) {
        let rows_odd = if odd_fewer && rows_even > 1 { rows_even - 1 } else { rows_even };
        let config = Configuration::default();
        let generator = BoxGenerator::new(&config, columns, rows_even, rows_odd).unwrap();
        let (x_step, y_step) = (generator.grid().x_step(), generator.grid().y_step());
        let program = generator.generate(&invocation()).unwrap().main;
        let annotations: Vec<_> = program.annotations().copied().collect();
        let welds = weldpoints(&annotations);

        for pair in welds.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.column == b.column {
                prop_assert_eq!(b.row, a.row + 1);
                prop_assert!((b.center.y - a.center.y - y_step).abs() < 1e-9);
                prop_assert!((b.center.x - a.center.x).abs() < 1e-9);
            } else {
                prop_assert_eq!(b.column, a.column + 1);
                prop_assert_eq!(b.row, 0);
                prop_assert!((b.center.x - a.center.x - x_step).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn every_program_brackets_its_cuts(
        columns in 1u32..=8,
        rows_even in 2u32..=8,
        parity in 0u32..3,
        sides in any::<bool>(),
        fronts in any::<bool>(),
        covers in any::<bool>(),
        router in any::<bool>(),
    ) {
        let preset = if router { Preset::Router } else { Preset::Laser };
        let mut config = Configuration::from_preset(preset);
        config.panels.do_sides = sides;
        config.panels.do_fronts = fronts;
        config.panels.do_covers = covers;
        let rows_odd = rows_even + parity - 1;
        let generator = BoxGenerator::new(&config, columns, rows_even, rows_odd).unwrap();
        let artifacts = generator.generate(&invocation()).unwrap();

        prop_assert!(verify_actuator_sequence(artifacts.main.instructions()).is_ok());
        prop_assert_eq!(artifacts.cover.is_some(), covers);
        if let Some(cover) = artifacts.cover {
            prop_assert!(verify_actuator_sequence(cover.instructions()).is_ok());
        }
    }
}
