//! Error types for the CAM tools crate.
//!
//! Configuration and grid problems are reported before any geometry is
//! computed. Actuator sequencing errors are internal consistency checks on a
//! finished program and indicate a generator defect, not bad input.

use cellbox_settings::ConfigError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating or writing cut programs.
#[derive(Error, Debug)]
pub enum CamToolError {
    /// Invalid parameters were provided to a generator.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The requested grid cannot be laid out.
    #[error("Invalid grid: {0}")]
    Grid(#[from] InvalidGridSpec),

    /// A parameter validation error occurred.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// The configuration failed validation.
    #[error("Configuration error: {0}")]
    Settings(#[from] ConfigError),

    /// A finished program switches the actuator inconsistently.
    #[error("Actuator sequence error at instruction {index}: {reason}")]
    ActuatorSequence { index: usize, reason: String },

    /// An output artifact could not be opened or written.
    #[error("Failed to write {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Grid counts outside the supported range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidGridSpec {
    #[error("column count {0} out of range (valid: 1..=100)")]
    Columns(u32),

    #[error("row count {0} out of range (valid: 1..=100)")]
    Rows(u32),

    #[error("row counts {even} and {odd} differ by more than one")]
    RowMismatch { even: u32, odd: u32 },
}

/// Errors related to generator parameter validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// A parameter value is out of the valid range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A flag argument is neither 0 nor 1.
    #[error("Invalid flag for '{name}': {value} (expected 0 or 1)")]
    InvalidFlag { name: String, value: String },
}

/// Result type alias for CAM tool operations.
pub type CamToolResult<T> = Result<T, CamToolError>;

/// Result type alias for parameter validation.
pub type ParameterResult<T> = Result<T, ParameterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cam_tool_error_display() {
        let err = CamToolError::InvalidParameters("no panels".to_string());
        assert_eq!(err.to_string(), "Invalid parameters: no panels");

        let err = CamToolError::ActuatorSequence {
            index: 7,
            reason: "activation while cutting".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Actuator sequence error at instruction 7: activation while cutting"
        );
    }

    #[test]
    fn test_grid_error_display() {
        assert_eq!(
            InvalidGridSpec::Columns(0).to_string(),
            "column count 0 out of range (valid: 1..=100)"
        );
        assert_eq!(
            InvalidGridSpec::RowMismatch { even: 4, odd: 2 }.to_string(),
            "row counts 4 and 2 differ by more than one"
        );
    }

    #[test]
    fn test_parameter_error_display() {
        let err = ParameterError::InvalidFlag {
            name: "sides".to_string(),
            value: "2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid flag for 'sides': 2 (expected 0 or 1)"
        );
    }

    #[test]
    fn test_error_conversion() {
        let grid_err = InvalidGridSpec::Rows(101);
        let cam_err: CamToolError = grid_err.into();
        assert!(matches!(cam_err, CamToolError::Grid(_)));

        let cfg_err = ConfigError::Incompatible("fingers overlap".to_string());
        let cam_err: CamToolError = cfg_err.into();
        assert!(matches!(cam_err, CamToolError::Settings(_)));

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let cam_err: CamToolError = io_err.into();
        assert!(matches!(cam_err, CamToolError::IoError(_)));
    }
}
