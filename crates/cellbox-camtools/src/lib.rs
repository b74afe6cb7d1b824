//! # CellBox CAM Tools
//!
//! Generates laser/router cut programs for an enclosure that holds
//! cylindrical cells in a hex-packed grid.
//!
//! ## Pipeline
//!
//! - **Grid**: cell centres from column/row counts and pitch
//! - **Kerf**: trim compensation for circles and straight edges
//! - **Outline**: main panel rectangle and its alignment corners
//! - **Finger joints**: tab and slot edges shared by mating panels
//! - **Holes**: bonus holes, ventilation slots, side mounting holes
//! - **Panels**: sheet layout and per-panel edge profiles
//! - **Program**: instruction stream, actuator bracketing, G-code text
//! - **Generator**: orders everything into the main and cover programs
//! - **Writer**: all-or-nothing output of the finished programs

pub mod error;
pub mod finger_joint;
pub mod generator;
pub mod grid;
pub mod holes;
pub mod kerf;
pub mod outline;
pub mod panels;
pub mod params;
pub mod program;
pub mod writer;

// Re-export commonly used items
pub use error::{
    CamToolError, CamToolResult, InvalidGridSpec, ParameterError, ParameterResult,
};
pub use finger_joint::{Contour, EdgeProfile, FingerKind, Interval};
pub use generator::{Artifacts, BoxGenerator, BoxReport};
pub use grid::{CellPoint, GridSpec, MAX_COUNT};
pub use holes::{Hole, HoleMode, HoleShape};
pub use kerf::CircleCut;
pub use outline::{Attachments, Corner, Outline};
pub use panels::{Panel, PanelKind, PanelPlanner, SheetLayout};
pub use params::{parse_count, parse_flag};
pub use program::{Actuator, Instruction, PowerProfile, Program, ProgramBuilder};
pub use writer::{artifact_paths, write_artifacts};
