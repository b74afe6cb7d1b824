//! # CellBox
//!
//! Generates laser/router cut programs for enclosures that hold cylindrical
//! cells in a hex-packed grid, and plans the spot-weld runs that join the
//! cells once the box is assembled.
//!
//! ## Architecture
//!
//! CellBox is organized as a workspace with multiple crates:
//!
//! 1. **cellbox-core** - Geometry primitives, errors, annotation wire format
//! 2. **cellbox-settings** - Configuration record, presets, persistence
//! 3. **cellbox-camtools** - Grid, kerf, finger joints, holes, program output
//! 4. **cellbox-weld** - Weld map parsing, dot patterns, command plans
//! 5. **cellbox** - Command line front end that ties the crates together

pub mod cli;

pub use cellbox_camtools::{BoxGenerator, Program};
pub use cellbox_core::{Annotation, Point};
pub use cellbox_settings::{Configuration, Preset};
pub use cellbox_weld::{WeldMap, WeldSequencer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// `--version` text: package version plus build date
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

/// Initialize logging with the default configuration
///
/// Log records go to stderr so that scripts written to stdout stay clean.
/// `RUST_LOG` is honoured; INFO is always enabled.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
