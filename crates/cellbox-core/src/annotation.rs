//! Annotation wire format
//!
//! Cut programs carry two kinds of structured comments that downstream
//! tooling reads back:
//!
//! - `(WELDPOINT <col>;<row>;<x>;<y>)` on the rapid move to each cell hole,
//!   holding the uncompensated, panel-relative hole centre.
//! - `(ALIGNPOINT <cx>;<cy>;<x>;<y>)` on the motion line of each main panel
//!   corner, holding the physical (assembled) corner coordinate.
//!
//! Lines that carry neither marker are not annotations. A line that carries
//! a marker but does not match the grammar is an error: readers must never
//! silently skip a damaged record.

use crate::error::Error;
use crate::geometry::Point;
use regex::Regex;
use std::fmt;
use std::io::BufRead;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

pub const WELDPOINT_MARKER: &str = "WELDPOINT";
pub const ALIGNPOINT_MARKER: &str = "ALIGNPOINT";

/// Grammar failures for a single annotation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnnotationError {
    /// The text carries a marker but not a well-formed record
    #[error("Malformed annotation: {0}")]
    Malformed(String),

    /// An index or coordinate field could not be represented
    #[error("Invalid number '{value}' in field {field}")]
    InvalidNumber { field: &'static str, value: String },

    /// Alignment corners are indexed by 0 or 1 on each axis
    #[error("Invalid corner index ({cx};{cy}), expected 0 or 1")]
    InvalidCorner { cx: u32, cy: u32 },
}

/// Centre of one cell hole, as seen by the weld sequencer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeldPoint {
    pub column: u32,
    pub row: u32,
    pub center: Point,
}

/// Physical corner of the assembled box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignPoint {
    pub cx: u8,
    pub cy: u8,
    pub position: Point,
}

/// A typed annotation record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    Weld(WeldPoint),
    Align(AlignPoint),
}

impl fmt::Display for WeldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {};{};{:.2};{:.2})",
            WELDPOINT_MARKER, self.column, self.row, self.center.x, self.center.y
        )
    }
}

impl fmt::Display for AlignPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} {};{};{:.2};{:.2})",
            ALIGNPOINT_MARKER, self.cx, self.cy, self.position.x, self.position.y
        )
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weld(p) => p.fmt(f),
            Self::Align(p) => p.fmt(f),
        }
    }
}

fn marker_regex() -> &'static Regex {
    static MARKER_REGEX: OnceLock<Regex> = OnceLock::new();
    MARKER_REGEX
        .get_or_init(|| Regex::new(r"\b(WELDPOINT|ALIGNPOINT)\b").expect("invalid regex pattern"))
}

fn record_regex() -> &'static Regex {
    static RECORD_REGEX: OnceLock<Regex> = OnceLock::new();
    RECORD_REGEX.get_or_init(|| {
        Regex::new(
            r"\((WELDPOINT|ALIGNPOINT)\s+(\d+)\s*;\s*(\d+)\s*;\s*([-+]?\d+(?:\.\d*)?)\s*;\s*([-+]?\d+(?:\.\d*)?)\s*\)",
        )
        .expect("invalid regex pattern")
    })
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, AnnotationError> {
    value.parse().map_err(|_| AnnotationError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Scan one program line for an annotation.
///
/// Returns `Ok(None)` when the line carries no marker at all.
pub fn parse_line(line: &str) -> Result<Option<Annotation>, AnnotationError> {
    let markers = marker_regex().find_iter(line).count();
    if markers == 0 {
        return Ok(None);
    }
    if markers > 1 {
        return Err(AnnotationError::Malformed(line.trim().to_string()));
    }

    let caps = record_regex()
        .captures(line)
        .ok_or_else(|| AnnotationError::Malformed(line.trim().to_string()))?;

    let a: u32 = parse_field("index_x", &caps[2])?;
    let b: u32 = parse_field("index_y", &caps[3])?;
    let x: f64 = parse_field("x", &caps[4])?;
    let y: f64 = parse_field("y", &caps[5])?;

    let annotation = match &caps[1] {
        WELDPOINT_MARKER => Annotation::Weld(WeldPoint {
            column: a,
            row: b,
            center: Point::new(x, y),
        }),
        _ => {
            if a > 1 || b > 1 {
                return Err(AnnotationError::InvalidCorner { cx: a, cy: b });
            }
            Annotation::Align(AlignPoint {
                cx: a as u8,
                cy: b as u8,
                position: Point::new(x, y),
            })
        }
    };

    Ok(Some(annotation))
}

/// Every annotation in a program, with its 1-based line number.
///
/// Stops at the first damaged record.
pub fn scan_program<R: BufRead>(reader: R) -> crate::Result<Vec<(usize, Annotation)>> {
    let mut found = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let parsed = parse_line(&line).map_err(|e| Error::annotation(index + 1, e))?;
        if let Some(annotation) = parsed {
            found.push((index + 1, annotation));
        }
    }
    Ok(found)
}

impl FromStr for Annotation {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_line(s)?.ok_or_else(|| AnnotationError::Malformed(s.trim().to_string()))
    }
}
