//! Command line front end

use anyhow::Context;
use cellbox_camtools::{artifact_paths, parse_count, parse_flag, write_artifacts, BoxGenerator};
use cellbox_settings::{Configuration, Preset, SideHoleMode};
use cellbox_weld::{SequencerSettings, StartSpec, WeldMap, WeldSequencer, WeldSetting};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cellbox")]
#[command(about = "Cut programs and weld plans for hex-packed cell enclosures")]
#[command(version = crate::LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the cut program(s) for a box
    Generate(GenerateArgs),

    /// Plan a spot-weld run from a generated program
    Weld(WeldArgs),

    /// Write a preset configuration file to edit
    InitConfig {
        /// Destination (.toml or .json)
        path: PathBuf,

        #[arg(short, long, default_value = "laser")]
        preset: Preset,
    },
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output file; with covers, the prefix for `_main` and `_cover` files
    pub output: PathBuf,

    /// Rows in even columns (1-100)
    pub y_even: String,

    /// Rows in odd columns (1-100, within one of the even count)
    pub y_odd: String,

    /// Columns (1-100)
    pub x: String,

    /// Side panels, 0 or 1
    #[arg(long)]
    pub sides: Option<String>,

    /// Front/back panels, 0 or 1
    #[arg(long)]
    pub fronts: Option<String>,

    /// Cover panels, 0 or 1
    #[arg(long)]
    pub covers: Option<String>,

    /// Side panel mounting holes: off, cut or mark
    #[arg(long)]
    pub side_holes: Option<SideHoleMode>,

    /// Place the side panel right of the main panel
    #[arg(long)]
    pub side_at_back: bool,

    /// Configuration file (.toml or .json)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Preset used when no configuration file is found
    #[arg(short, long, default_value = "laser")]
    pub preset: Preset,
}

#[derive(Args)]
pub struct WeldArgs {
    /// Cut program carrying WELDPOINT annotations
    pub program: PathBuf,

    /// Columns per band (1-20)
    pub band_period: u32,

    /// `+` or `-` to pick the starting setting, optionally followed by
    /// `s` (simulate) or `S` (simulate at cell centres)
    #[arg(allow_hyphen_values = true)]
    pub start: String,

    /// Write the command script here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = 3)]
    pub first_points: u32,

    #[arg(long, default_value_t = 3.0)]
    pub first_distance: f64,

    #[arg(long, default_value_t = 5)]
    pub second_points: u32,

    #[arg(long, default_value_t = 4.0)]
    pub second_distance: f64,
}

pub fn run(cli: Cli, invocation: &[String]) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => generate(args, invocation),
        Commands::Weld(args) => weld(args),
        Commands::InitConfig { path, preset } => {
            Configuration::from_preset(preset)
                .save_to_file(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {} preset to {}", preset, path.display());
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs, invocation: &[String]) -> anyhow::Result<()> {
    let y_even = parse_count("y_even", &args.y_even)?;
    let y_odd = parse_count("y_odd", &args.y_odd)?;
    let x = parse_count("x", &args.x)?;

    let mut config = Configuration::load_or_preset(args.config.as_deref(), args.preset)
        .context("loading configuration")?;
    if let Some(value) = &args.sides {
        config.panels.do_sides = parse_flag("sides", value)?;
    }
    if let Some(value) = &args.fronts {
        config.panels.do_fronts = parse_flag("fronts", value)?;
    }
    if let Some(value) = &args.covers {
        config.panels.do_covers = parse_flag("covers", value)?;
    }
    if let Some(mode) = args.side_holes {
        config.side_holes.mode = mode;
    }
    if args.side_at_back {
        config.panels.side_at_back = true;
    }

    let generator = BoxGenerator::new(&config, x, y_even, y_odd)?;
    let artifacts = generator.generate(invocation)?;

    let paths = artifact_paths(&args.output, config.panels.do_covers)?;
    let programs = std::iter::once(artifacts.main).chain(artifacts.cover);
    let outputs: Vec<_> = paths
        .into_iter()
        .zip(programs)
        .map(|(path, program)| (path, program.to_gcode()))
        .collect();
    write_artifacts(&outputs)?;

    Ok(())
}

fn weld(args: WeldArgs) -> anyhow::Result<()> {
    let start: StartSpec = args.start.parse()?;
    let settings = SequencerSettings {
        first: WeldSetting::new(args.first_points, args.first_distance, true)?,
        second: WeldSetting::new(args.second_points, args.second_distance, false)?,
        band_period: args.band_period,
        ..SequencerSettings::default()
    }
    .with_start(start);
    let sequencer = WeldSequencer::new(settings)?;

    let map = WeldMap::from_file(&args.program)
        .with_context(|| format!("reading {}", args.program.display()))?;
    tracing::info!(
        "{} weld points, {} alignment corners",
        map.len(),
        map.align_points().len()
    );
    let script = sequencer.plan(&map)?.to_script();

    match args.output {
        Some(path) => write_artifacts(&[(path, script)])?,
        None => std::io::stdout()
            .lock()
            .write_all(script.as_bytes())
            .context("writing script")?,
    }

    Ok(())
}
