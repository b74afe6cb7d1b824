//! Weld dot patterns around a cell centre
//!
//! A pattern of `n` dots at spacing `d` is centred on the cell, so the dots
//! always balance around the nominal point.

use crate::error::{WeldError, WeldResult};
use cellbox_core::Point;
use std::f64::consts::SQRT_2;

pub const MAX_POINTS: u32 = 5;

/// One of the two weld recipes applied to alternating column bands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldSetting {
    /// Dots per cell, 1..=5
    pub points: u32,
    /// Spacing between dots (mm)
    pub distance: f64,
    /// Close the extra power relay while welding
    pub extra_power: bool,
}

impl WeldSetting {
    pub fn new(points: u32, distance: f64, extra_power: bool) -> WeldResult<Self> {
        let setting = Self {
            points,
            distance,
            extra_power,
        };
        setting.validate()?;
        Ok(setting)
    }

    pub fn validate(&self) -> WeldResult<()> {
        if !(1..=MAX_POINTS).contains(&self.points) {
            return Err(WeldError::InvalidPattern(format!(
                "{} points per cell (valid: 1..={})",
                self.points, MAX_POINTS
            )));
        }
        if !self.distance.is_finite() || self.distance < 0.0 {
            return Err(WeldError::InvalidPattern(format!(
                "dot distance {}",
                self.distance
            )));
        }
        Ok(())
    }

    pub fn offsets(&self) -> WeldResult<Vec<Point>> {
        pattern_offsets(self.points, self.distance)
    }
}

/// Dot offsets from the cell centre, in welding order.
pub fn pattern_offsets(points: u32, distance: f64) -> WeldResult<Vec<Point>> {
    let d = distance;
    let half = d / 2.0;
    let offsets = match points {
        1 => vec![Point::new(0.0, 0.0)],
        2 => vec![Point::new(-half, 0.0), Point::new(half, 0.0)],
        3 => {
            let low = -d / (2.0 * 3f64.sqrt());
            vec![
                Point::new(-half, low),
                Point::new(half, low),
                Point::new(0.0, d / 3f64.sqrt()),
            ]
        }
        4 => vec![
            Point::new(-half, -half),
            Point::new(half, -half),
            Point::new(half, half),
            Point::new(-half, half),
        ],
        5 => {
            let r = d / SQRT_2;
            vec![
                Point::new(0.0, 0.0),
                Point::new(-r, -r),
                Point::new(r, -r),
                Point::new(r, r),
                Point::new(-r, r),
            ]
        }
        other => {
            return Err(WeldError::InvalidPattern(format!(
                "{} points per cell (valid: 1..={})",
                other, MAX_POINTS
            )))
        }
    };
    Ok(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_is_equilateral() {
        let dots = pattern_offsets(3, 3.0).unwrap();
        let sides = [
            dots[0].distance_to(dots[1]),
            dots[1].distance_to(dots[2]),
            dots[2].distance_to(dots[0]),
        ];
        for side in sides {
            assert!((side - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_counts() {
        for n in 1..=MAX_POINTS {
            assert_eq!(pattern_offsets(n, 4.0).unwrap().len(), n as usize);
        }
        assert!(pattern_offsets(0, 4.0).is_err());
        assert!(pattern_offsets(6, 4.0).is_err());
    }

    #[test]
    fn test_setting_validation() {
        assert!(WeldSetting::new(3, 3.0, true).is_ok());
        assert!(WeldSetting::new(7, 3.0, false).is_err());
        assert!(WeldSetting::new(2, -1.0, false).is_err());
        assert!(WeldSetting::new(2, f64::NAN, false).is_err());
    }
}
