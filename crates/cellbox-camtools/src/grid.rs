//! Hex-packed cell grid
//!
//! Columns run along x at `x_step`; cells within a column run along y at
//! `y_step`. Odd columns are shifted up by half a row pitch and may hold one
//! row fewer (or one more) than even columns.

use crate::error::InvalidGridSpec;
use cellbox_core::Point;
use cellbox_settings::CellSettings;

pub const MAX_COUNT: u32 = 100;

/// Validated grid dimensions plus the pitches derived from the cell settings
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    columns: u32,
    rows_even: u32,
    rows_odd: u32,
    hole_diameter: f64,
    x_step: f64,
    y_step: f64,
}

/// One cell hole centre, identified by its 0-based column and row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPoint {
    pub column: u32,
    pub row: u32,
    pub center: Point,
}

impl GridSpec {
    pub fn new(
        columns: u32,
        rows_even: u32,
        rows_odd: u32,
        cell: &CellSettings,
    ) -> Result<Self, InvalidGridSpec> {
        if !(1..=MAX_COUNT).contains(&columns) {
            return Err(InvalidGridSpec::Columns(columns));
        }
        for rows in [rows_even, rows_odd] {
            if !(1..=MAX_COUNT).contains(&rows) {
                return Err(InvalidGridSpec::Rows(rows));
            }
        }
        if rows_even.abs_diff(rows_odd) > 1 {
            return Err(InvalidGridSpec::RowMismatch {
                even: rows_even,
                odd: rows_odd,
            });
        }

        Ok(Self {
            columns,
            rows_even,
            rows_odd,
            hole_diameter: cell.hole_diameter,
            x_step: cell.x_step(),
            y_step: cell.y_step(),
        })
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows_even(&self) -> u32 {
        self.rows_even
    }

    pub fn rows_odd(&self) -> u32 {
        self.rows_odd
    }

    pub fn hole_diameter(&self) -> f64 {
        self.hole_diameter
    }

    pub fn x_step(&self) -> f64 {
        self.x_step
    }

    pub fn y_step(&self) -> f64 {
        self.y_step
    }

    /// Rows held by the given column
    pub fn rows(&self, column: u32) -> u32 {
        if column % 2 == 0 {
            self.rows_even
        } else {
            self.rows_odd
        }
    }

    /// Total number of cells
    pub fn cell_count(&self) -> u32 {
        let even_columns = self.columns.div_ceil(2);
        let odd_columns = self.columns / 2;
        even_columns * self.rows_even + odd_columns * self.rows_odd
    }

    /// The odd columns reach at least as high as the even ones, so the
    /// panel needs the extra half row pitch on top.
    pub fn odd_columns_reach_top(&self) -> bool {
        self.rows_odd >= self.rows_even
    }

    /// Rows that set the panel height: the odd count when odd columns reach
    /// the top, else the even count
    pub fn top_rows(&self) -> u32 {
        if self.odd_columns_reach_top() {
            self.rows_odd
        } else {
            self.rows_even
        }
    }

    /// Vertical shift of a column (hex packing)
    pub fn column_offset(&self, column: u32) -> f64 {
        if column % 2 == 1 {
            self.y_step / 2.0
        } else {
            0.0
        }
    }

    /// Centre x of a column, relative to the grid anchor
    pub fn column_x(&self, column: u32) -> f64 {
        self.x_step * column as f64 + self.hole_diameter / 2.0
    }

    /// Centre y of a row in an even column, relative to the grid anchor
    pub fn row_y(&self, row: u32) -> f64 {
        self.y_step * row as f64 + self.hole_diameter / 2.0
    }

    /// Centre of one cell, relative to the grid anchor
    pub fn center(&self, column: u32, row: u32) -> Point {
        Point::new(
            self.column_x(column),
            self.row_y(row) + self.column_offset(column),
        )
    }

    /// Span from the left of the first hole to the right of the last
    pub fn span_x(&self) -> f64 {
        self.x_step * (self.columns - 1) as f64 + self.hole_diameter
    }

    /// Span from the bottom of column 0's first hole to the top of the
    /// highest hole in any column
    pub fn span_y(&self) -> f64 {
        let mut span = self.y_step * (self.top_rows() - 1) as f64 + self.hole_diameter;
        if self.odd_columns_reach_top() {
            span += self.y_step / 2.0;
        }
        span
    }

    /// All cells in column-major order. `anchor` is where the bottom-left of
    /// column 0's first hole sits, i.e. the panel origin plus the left and
    /// bottom wall gaps.
    pub fn cells(&self, anchor: Point) -> Cells<'_> {
        Cells {
            grid: self,
            anchor,
            column: 0,
            row: 0,
        }
    }
}

/// Lazy iterator over the cells of a [`GridSpec`]
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    grid: &'a GridSpec,
    anchor: Point,
    column: u32,
    row: u32,
}

impl Iterator for Cells<'_> {
    type Item = CellPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.column >= self.grid.columns {
            return None;
        }

        let cell = CellPoint {
            column: self.column,
            row: self.row,
            center: self.anchor + self.grid.center(self.column, self.row),
        };

        self.row += 1;
        if self.row >= self.grid.rows(self.column) {
            self.row = 0;
            self.column += 1;
        }

        Some(cell)
    }
}
