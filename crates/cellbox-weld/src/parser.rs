//! Reading weld points out of a cut program
//!
//! Only `WELDPOINT` and `ALIGNPOINT` records matter; every other line is
//! skipped. A damaged record or a point outside the machine's reach aborts
//! the read.

use crate::error::{WeldError, WeldResult};
use cellbox_core::{scan_program, AlignPoint, Annotation, Point};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Column and row indices must stay below this
pub const MAX_INDEX: u32 = 100;
/// Largest coordinate the welder table reaches (mm)
pub const MAX_COORDINATE: f64 = 2000.0;

/// Sparse map of cell centres keyed by (column, row)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeldMap {
    points: BTreeMap<(u32, u32), Point>,
    align_points: Vec<AlignPoint>,
}

impl WeldMap {
    pub fn parse<R: BufRead>(reader: R) -> WeldResult<Self> {
        let mut map = Self::default();

        for (line, annotation) in scan_program(reader)? {
            match annotation {
                Annotation::Weld(point) => {
                    if point.column >= MAX_INDEX || point.row >= MAX_INDEX {
                        return Err(WeldError::IndexOutOfRange {
                            line,
                            column: point.column,
                            row: point.row,
                        });
                    }
                    let (x, y) = (point.center.x, point.center.y);
                    if !(0.0..=MAX_COORDINATE).contains(&x) || !(0.0..=MAX_COORDINATE).contains(&y)
                    {
                        return Err(WeldError::CoordinateOutOfRange { line, x, y });
                    }
                    if map
                        .points
                        .insert((point.column, point.row), point.center)
                        .is_some()
                    {
                        tracing::warn!(
                            "Line {}: weld point ({};{}) redefined",
                            line,
                            point.column,
                            point.row
                        );
                    }
                }
                Annotation::Align(point) => map.align_points.push(point),
            }
        }

        tracing::debug!(
            "Read {} weld points in {} columns",
            map.points.len(),
            map.columns()
        );
        Ok(map)
    }

    pub fn from_file(path: &Path) -> WeldResult<Self> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// One past the highest column index
    pub fn columns(&self) -> u32 {
        self.points.keys().map(|&(c, _)| c + 1).max().unwrap_or(0)
    }

    /// One past the highest row index
    pub fn rows(&self) -> u32 {
        self.points.keys().map(|&(_, r)| r + 1).max().unwrap_or(0)
    }

    pub fn get(&self, column: u32, row: u32) -> Option<Point> {
        self.points.get(&(column, row)).copied()
    }

    /// Points in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, Point)> + '_ {
        self.points.iter().map(|(&(c, r), &p)| (c, r, p))
    }

    pub fn align_points(&self) -> &[AlignPoint] {
        &self.align_points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "\
( cellbox box.ngc 2 2 2 )
G21
G00 X21.150 Y25.100 (WELDPOINT 0;0;16.10;16.10)
M03
G02 X21.150 Y25.100 I9.050 J0.000
M05
G00 X21.150 Y45.100 (WELDPOINT 0;1;16.10;36.10)
G00 X38.000 Y35.100 (WELDPOINT 1;0;32.90;26.10)
G00 X38.000 Y55.100 (WELDPOINT 1;1;32.90;46.10)
G00 X9.950 Y9.950 (ALIGNPOINT 0;0;6.00;6.00)
M2
%
";

    #[test]
    fn test_parse_program() {
        let map = WeldMap::parse(PROGRAM.as_bytes()).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!((map.columns(), map.rows()), (2, 2));
        assert_eq!(map.get(1, 0), Some(Point::new(32.9, 26.1)));
        assert_eq!(map.get(2, 0), None);
        assert_eq!(map.align_points().len(), 1);

        let order: Vec<_> = map.iter().map(|(c, r, _)| (c, r)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_damaged_record_aborts() {
        let text = "G21\n(WELDPOINT 0;0;16.10)\n";
        assert!(matches!(
            WeldMap::parse(text.as_bytes()),
            Err(WeldError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_index_range() {
        let text = "(WELDPOINT 100;0;1.00;1.00)\n";
        assert!(matches!(
            WeldMap::parse(text.as_bytes()),
            Err(WeldError::IndexOutOfRange { column: 100, .. })
        ));
    }

    #[test]
    fn test_coordinate_range() {
        let text = "G21\nG21\n(WELDPOINT 1;0;-1.00;1.00)\n";
        assert!(matches!(
            WeldMap::parse(text.as_bytes()),
            Err(WeldError::CoordinateOutOfRange { line: 3, .. })
        ));
        let text = "(WELDPOINT 1;0;10.00;2000.50)\n";
        assert!(WeldMap::parse(text.as_bytes()).is_err());
    }

    #[test]
    fn test_empty_program() {
        let map = WeldMap::parse("G21\nM2\n%\n".as_bytes()).unwrap();
        assert!(map.is_empty());
        assert_eq!(map.columns(), 0);
    }
}
