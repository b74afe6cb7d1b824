//! # CellBox Weld
//!
//! Plans spot-weld runs over the cells of a generated box. The cut program's
//! `WELDPOINT` annotations give the cell centres; columns are welded in
//! alternating bands of two dot patterns, and the run is rendered as a
//! command script for the motion/IO controller of the welding table.

pub mod error;
pub mod parser;
pub mod patterns;
pub mod protocol;
pub mod sequencer;

pub use error::{WeldError, WeldResult};
pub use parser::WeldMap;
pub use patterns::{pattern_offsets, WeldSetting};
pub use protocol::{Command, Outputs};
pub use sequencer::{
    Calibration, PhaseTimings, Plan, PlanStep, RunMode, SequencerSettings, StartSpec,
    WeldSequencer,
};
