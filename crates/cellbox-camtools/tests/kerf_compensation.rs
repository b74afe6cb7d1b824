//! Compensated geometry must map back to the nominal geometry exactly

use cellbox_camtools::finger_joint::{evenly_spaced, pitch_aligned, trace_contour, EdgeProfile};
use cellbox_camtools::kerf::{compensate_circle, edge_offset, recover_circle, recover_edge};
use cellbox_core::{Point, Rect};
use proptest::prelude::*;

proptest! {
    #[test]
    fn circles_recover_their_nominal_size(
        x in -1000.0f64..1000.0,
        y in -1000.0f64..1000.0,
        radius in 1.0f64..50.0,
        trim in 0.0f64..0.9,
    ) {
        let center = Point::new(x, y);
        let cut = compensate_circle(center, radius, trim);
        let (recovered_center, recovered_radius) = recover_circle(&cut, trim);

        prop_assert!(recovered_center.approx_eq(center, 1e-6));
        prop_assert!((recovered_radius - radius).abs() < 1e-6);
        prop_assert!((cut.radius() - (radius - trim)).abs() < 1e-6);
    }

    #[test]
    fn edges_recover_their_nominal_coordinate(
        value in -2000.0f64..2000.0,
        trim in 0.0f64..2.0,
        material_above in any::<bool>(),
    ) {
        let emitted = edge_offset(value, material_above, trim);
        prop_assert!((recover_edge(emitted, material_above, trim) - value).abs() < 1e-6);
        prop_assert!(((emitted - value).abs() - trim).abs() < 1e-9);
    }

    #[test]
    fn finger_contours_close_and_stay_outside_the_panel(
        width in 60.0f64..400.0,
        height in 60.0f64..400.0,
        trim in 0.0f64..0.5,
        count in 1u32..6,
    ) {
        let rect = Rect::from_origin_size(Point::new(10.0, 10.0), width, height);
        let columns = ((width - 20.0) / 20.0) as u32;
        let tabs = EdgeProfile::tabs(pitch_aligned(20.0, 20.0, columns, 8.0), 4.0);
        let slots = EdgeProfile::slots(evenly_spaced(10.0, height, 4.0, count), 4.0);
        let contour = trace_contour(rect, &[tabs.clone(), slots.clone(), tabs, slots], trim);

        prop_assert!(contour.is_closed(1e-9));
        prop_assert!(contour.start.approx_eq(Point::new(10.0 - trim, 10.0 - trim), 1e-9));
    }
}
