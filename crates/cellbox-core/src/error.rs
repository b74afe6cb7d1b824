//! Error handling for CellBox
//!
//! The core error wraps the annotation grammar errors and I/O failures.
//! Crates further up the stack define their own error enums and convert
//! into or from this one where they meet.
//!
//! All error types use `thiserror` for ergonomic error handling.

use crate::annotation::AnnotationError;
use std::io;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// An annotation line did not match the wire grammar
    #[error("Annotation error on line {line}: {source}")]
    Annotation {
        /// 1-based line number in the scanned program
        line: usize,
        /// The underlying grammar failure
        #[source]
        source: AnnotationError,
    },

    /// I/O error while reading or writing a program
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from any displayable message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Attach a line number to an annotation grammar failure
    pub fn annotation(line: usize, source: AnnotationError) -> Self {
        Self::Annotation { line, source }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
