//! Error types for the weld sequencer.
//!
//! Every error is raised while reading the program or building the plan,
//! before a single command is rendered. A damaged annotation never results
//! in a partial weld run.

use cellbox_core::AnnotationError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeldError {
    /// A line carries a marker but is not a valid record.
    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: AnnotationError,
    },

    #[error("Weld point index ({column};{row}) on line {line} out of range (valid: 0..100)")]
    IndexOutOfRange { line: usize, column: u32, row: u32 },

    #[error("Weld point coordinate ({x:.3};{y:.3}) on line {line} outside 0..=2000")]
    CoordinateOutOfRange { line: usize, x: f64, y: f64 },

    /// Unsupported weld pattern.
    #[error("Invalid weld pattern: {0}")]
    InvalidPattern(String),

    #[error("Band period {0} out of range (valid: 1..=20)")]
    InvalidBandPeriod(u32),

    /// The program holds no weld points.
    #[error("No weld points found")]
    Empty,

    #[error("Invalid start mode '{0}', expected + or - optionally followed by s or S")]
    InvalidStartMode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<cellbox_core::Error> for WeldError {
    fn from(err: cellbox_core::Error) -> Self {
        match err {
            cellbox_core::Error::Annotation { line, source } => Self::Parse { line, source },
            cellbox_core::Error::Io(e) => Self::Io(e),
            cellbox_core::Error::Other(message) => Self::Io(io::Error::other(message)),
        }
    }
}

pub type WeldResult<T> = Result<T, WeldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeldError::IndexOutOfRange {
            line: 4,
            column: 120,
            row: 0,
        };
        assert_eq!(
            err.to_string(),
            "Weld point index (120;0) on line 4 out of range (valid: 0..100)"
        );
        assert_eq!(
            WeldError::InvalidBandPeriod(0).to_string(),
            "Band period 0 out of range (valid: 1..=20)"
        );
    }

    #[test]
    fn test_core_error_conversion() {
        let core = cellbox_core::Error::annotation(7, AnnotationError::Malformed("x".into()));
        assert!(matches!(
            WeldError::from(core),
            WeldError::Parse { line: 7, .. }
        ));

        let core = cellbox_core::Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(WeldError::from(core), WeldError::Io(_)));
    }
}
