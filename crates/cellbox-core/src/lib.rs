//! # CellBox Core
//!
//! Core types shared by the generator and the weld sequencer:
//! the planar [`Point`], the crate-wide [`Error`], and the annotation
//! wire format (`WELDPOINT` / `ALIGNPOINT`) that links the emitted cut
//! program to downstream assembly tooling.

pub mod annotation;
pub mod error;
pub mod geometry;

pub use annotation::{
    parse_line, scan_program, AlignPoint, Annotation, AnnotationError, WeldPoint, ALIGNPOINT_MARKER,
    WELDPOINT_MARKER,
};
pub use error::{Error, Result};
pub use geometry::{Edge, Point, Rect};
