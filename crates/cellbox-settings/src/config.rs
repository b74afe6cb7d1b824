//! Configuration for a generation run
//!
//! A [`Configuration`] bundles every geometric and process constant the
//! generator needs. It is created once (from defaults, a preset, or a
//! file), validated, and never mutated while a program is generated.
//!
//! Configuration is organized into logical sections:
//! - Cell grid geometry (hole diameter, gaps, pitch trim)
//! - Walls (wall gaps, material thickness, sheet layout)
//! - Kerf (per-role trim amounts)
//! - Finger joints, bonus holes, side holes, ventilation
//! - Process (feeds, actuator powers, dwell constants)
//! - Panel selection flags
//!
//! Files may be TOML or JSON; the extension decides.

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Cell grid geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellSettings {
    /// Diameter of a cell hole (mm)
    pub hole_diameter: f64,
    /// Material left between two neighbouring holes (mm)
    pub cell_gap: f64,
    /// Multiplier applied to the column pitch
    pub spacing_trim: f64,
    /// Cell length; the span of side and front panels (mm)
    pub cell_length: f64,
}

impl Default for CellSettings {
    fn default() -> Self {
        Self {
            hole_diameter: 18.2,
            cell_gap: 1.8,
            spacing_trim: 1.0,
            cell_length: 65.0,
        }
    }
}

impl CellSettings {
    /// Row pitch within a column
    pub fn y_step(&self) -> f64 {
        self.hole_diameter + self.cell_gap
    }

    /// Column pitch for hex packing
    pub fn x_step(&self) -> f64 {
        let r = self.hole_diameter / 2.0;
        (3.0 * r * r + 2.0 * r * self.cell_gap).sqrt() * self.spacing_trim
    }
}

/// Gaps between the cell grid and the panel edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallGaps {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl Default for WallGaps {
    fn default() -> Self {
        Self {
            left: 7.0,
            bottom: 1.8,
            right: 7.0,
            top: 1.8,
        }
    }
}

/// Wall and sheet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallSettings {
    pub wall_gaps: WallGaps,
    /// Sheet material thickness (mm)
    pub thickness: f64,
    /// Cover thickness including busbar space (mm)
    pub cover_thickness: f64,
    /// Clearance between panels on the sheet (mm)
    pub part_separation: f64,
    /// Distance from the sheet origin to the first panel (mm)
    pub sheet_margin: f64,
}

impl Default for WallSettings {
    fn default() -> Self {
        Self {
            wall_gaps: WallGaps::default(),
            thickness: 4.0,
            cover_thickness: 3.1,
            part_separation: 5.0,
            sheet_margin: 10.0,
        }
    }
}

/// Trim (kerf) per cut role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KerfSettings {
    /// Outline and finger contours of the sheet panels
    pub outline: f64,
    /// Cell holes, bonus holes and ventilation slots
    pub hole: f64,
    /// Cover contours
    pub cover: f64,
}

impl Default for KerfSettings {
    fn default() -> Self {
        Self {
            outline: 0.05,
            hole: 0.05,
            cover: 0.09,
        }
    }
}

/// Finger joint sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerSettings {
    /// Finger width along main panel columns (mm)
    pub size_x: f64,
    /// Finger width along main panel rows (mm)
    pub size_y: f64,
    /// Fingers joining a side panel to a front panel
    pub side_front_count: u32,
}

impl Default for FingerSettings {
    fn default() -> Self {
        Self {
            size_x: 8.0,
            size_y: 10.0,
            side_front_count: 4,
        }
    }
}

/// Where cell bonus holes go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusPlacement {
    /// Odd columns, every row, a third of the way back to the previous column
    BetweenColumns,
    /// Even columns, above the top cell and below the bottom cell
    RowEnds,
}

/// Small wiring/mounting holes in the main panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusHoleSettings {
    /// Cell bonus hole diameter; 0 disables (mm)
    pub cell_diameter: f64,
    /// Gap between a cell bonus hole and the nearest cell hole (mm)
    pub cell_standoff: f64,
    pub placement: BonusPlacement,
    /// End bonus hole diameter; 0 disables (mm)
    pub end_diameter: f64,
    pub end_standoff: f64,
}

impl Default for BonusHoleSettings {
    fn default() -> Self {
        Self {
            cell_diameter: 3.2,
            cell_standoff: 1.3,
            placement: BonusPlacement::BetweenColumns,
            end_diameter: 0.0,
            end_standoff: 0.0,
        }
    }
}

/// How side panel mounting holes are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SideHoleMode {
    Off,
    Cut,
    /// Scribe at marking power without cutting through
    Mark,
}

impl FromStr for SideHoleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Ok(Self::Off),
            "cut" | "on" | "1" => Ok(Self::Cut),
            "mark" | "2" => Ok(Self::Mark),
            _ => Err(format!("Unknown side hole mode: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideHoleSettings {
    pub mode: SideHoleMode,
    pub diameter: f64,
    /// Hole centre distance from the inside face of the main panel (mm)
    pub standoff: f64,
}

impl Default for SideHoleSettings {
    fn default() -> Self {
        Self {
            mode: SideHoleMode::Cut,
            diameter: 3.2,
            standoff: 3.2 / 2.0 + 5.0,
        }
    }
}

/// Front/back ventilation grille
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VentSettings {
    /// Solid band between the finger edge and the slots (mm)
    pub frame_width: f64,
    /// Rib between neighbouring slots (mm)
    pub mid_width: f64,
    /// Slots per cell row along the cell length
    pub slots_per_cell: u32,
}

impl Default for VentSettings {
    fn default() -> Self {
        Self {
            frame_width: 5.0,
            mid_width: 4.0,
            slots_per_cell: 3,
        }
    }
}

/// Feeds, actuator powers and dwell constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessSettings {
    /// Cutting feed for the main program (mm/min)
    pub feed_rate: f64,
    /// Cutting feed for the cover program (mm/min)
    pub cover_feed_rate: f64,
    /// Power for cut activations; `None` leaves power to the machine
    pub cut_power: Option<u32>,
    /// Non-destructive marking power
    pub mark_power: u32,
    pub cover_power: Option<u32>,
    /// Added to the cut power on every successive cut activation
    pub power_ramp: u32,
    pub max_power: u32,
    /// Seconds of dwell per cell hole or cell-length of contour
    pub delay_per_cell: f64,
    pub cover_delay_per_cell: f64,
    /// Dwell before the end-of-program marker (s)
    pub end_dwell: f64,
    /// Pause at every panel corner to let the material cool
    pub edge_cooldown: bool,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            feed_rate: 600.0,
            cover_feed_rate: 700.0,
            cut_power: None,
            mark_power: 10,
            cover_power: Some(70),
            power_ramp: 0,
            max_power: 1000,
            delay_per_cell: 0.0,
            cover_delay_per_cell: 0.0,
            end_dwell: 0.0,
            edge_cooldown: false,
        }
    }
}

/// Which panels are produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelSettings {
    pub do_sides: bool,
    pub do_fronts: bool,
    pub do_covers: bool,
    /// Place the side panel to the right of the main panel instead of below
    pub side_at_back: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            do_sides: true,
            do_fronts: true,
            do_covers: false,
            side_at_back: false,
        }
    }
}

/// Named starting points for a configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Laser cutter, thin kerf
    Laser,
    /// Router with a 2 mm tool, cooled edges, no marking
    Router,
}

impl Default for Preset {
    fn default() -> Self {
        Self::Laser
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Laser => write!(f, "laser"),
            Self::Router => write!(f, "router"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "laser" => Ok(Self::Laser),
            "router" => Ok(Self::Router),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}

/// Complete, immutable parameter set for one generation run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub cell: CellSettings,
    pub walls: WallSettings,
    pub kerf: KerfSettings,
    pub fingers: FingerSettings,
    pub bonus_holes: BonusHoleSettings,
    pub side_holes: SideHoleSettings,
    pub vents: VentSettings,
    pub process: ProcessSettings,
    pub panels: PanelSettings,
}

fn out_of_range(key: &str, value: impl fmt::Display) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn require_positive(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn require_non_negative(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

impl Configuration {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Laser => Self::default(),
            Preset::Router => Self {
                cell: CellSettings {
                    hole_diameter: 18.35,
                    cell_gap: 20.5 - 18.35,
                    spacing_trim: 1.05 * 1.01,
                    cell_length: 65.0,
                },
                walls: WallSettings {
                    wall_gaps: WallGaps {
                        left: 4.0,
                        bottom: 20.5 - 18.43,
                        right: 4.0,
                        top: 3.15,
                    },
                    thickness: 4.0,
                    cover_thickness: 3.1,
                    part_separation: 2.0,
                    sheet_margin: 10.0,
                },
                kerf: KerfSettings {
                    outline: 1.0,
                    hole: 1.0,
                    cover: 0.09,
                },
                fingers: FingerSettings::default(),
                bonus_holes: BonusHoleSettings {
                    cell_diameter: 0.0,
                    cell_standoff: 1.3,
                    placement: BonusPlacement::RowEnds,
                    end_diameter: 0.0,
                    end_standoff: 0.0,
                },
                side_holes: SideHoleSettings {
                    mode: SideHoleMode::Off,
                    diameter: 2.0,
                    standoff: 16.0,
                },
                vents: VentSettings::default(),
                process: ProcessSettings {
                    feed_rate: 250.0,
                    cover_feed_rate: 700.0,
                    cut_power: None,
                    mark_power: 10,
                    cover_power: Some(70),
                    power_ramp: 0,
                    max_power: 1000,
                    delay_per_cell: 6.0,
                    cover_delay_per_cell: 3.0,
                    end_dwell: 15.0,
                    edge_cooldown: true,
                },
                panels: PanelSettings::default(),
            },
        }
    }

    /// Default location: `<config_dir>/cellbox/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cellbox").join("config.toml"))
    }

    /// Load an explicit file, else the default location if it exists,
    /// else the preset.
    pub fn load_or_preset(path: Option<&Path>, preset: Preset) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(default) if default.exists() => {
                tracing::info!("Loading configuration from {}", default.display());
                Self::load_from_file(&default)
            }
            _ => {
                tracing::debug!("No configuration file, using the {} preset", preset);
                let config = Self::from_preset(preset);
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.display().to_string()).into());
        };

        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("Failed to write {}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// Besides per-value ranges this rejects combinations whose finger,
    /// slot or hole geometry would collapse or overlap once trimmed.
    pub fn validate(&self) -> ConfigResult<()> {
        let c = &self.cell;
        require_positive("cell.hole_diameter", c.hole_diameter)?;
        require_non_negative("cell.cell_gap", c.cell_gap)?;
        require_positive("cell.spacing_trim", c.spacing_trim)?;
        require_positive("cell.cell_length", c.cell_length)?;

        let w = &self.walls;
        require_non_negative("walls.wall_gaps.left", w.wall_gaps.left)?;
        require_non_negative("walls.wall_gaps.bottom", w.wall_gaps.bottom)?;
        require_non_negative("walls.wall_gaps.right", w.wall_gaps.right)?;
        require_non_negative("walls.wall_gaps.top", w.wall_gaps.top)?;
        require_positive("walls.thickness", w.thickness)?;
        require_non_negative("walls.cover_thickness", w.cover_thickness)?;
        require_non_negative("walls.part_separation", w.part_separation)?;
        require_non_negative("walls.sheet_margin", w.sheet_margin)?;

        let k = &self.kerf;
        require_non_negative("kerf.outline", k.outline)?;
        require_non_negative("kerf.hole", k.hole)?;
        require_non_negative("kerf.cover", k.cover)?;
        if k.hole >= c.hole_diameter / 2.0 {
            return Err(out_of_range("kerf.hole", k.hole));
        }

        let f = &self.fingers;
        require_positive("fingers.size_x", f.size_x)?;
        require_positive("fingers.size_y", f.size_y)?;
        if f.side_front_count < 1 {
            return Err(out_of_range("fingers.side_front_count", f.side_front_count));
        }
        if f.size_x >= c.x_step() {
            return Err(ConfigError::Incompatible(format!(
                "finger size x {:.3} must be smaller than the column pitch {:.3}",
                f.size_x,
                c.x_step()
            )));
        }
        if f.size_y >= c.y_step() {
            return Err(ConfigError::Incompatible(format!(
                "finger size y {:.3} must be smaller than the row pitch {:.3}",
                f.size_y,
                c.y_step()
            )));
        }
        for (key, size, pitch) in [
            ("fingers.size_x", f.size_x, c.x_step()),
            ("fingers.size_y", f.size_y, c.y_step()),
        ] {
            // Slots narrow by a trim on each wall; tabs widen by the same.
            if size <= 2.0 * k.outline {
                return Err(ConfigError::Incompatible(format!(
                    "{} {:.3} collapses under an outline trim of {:.3}",
                    key, size, k.outline
                )));
            }
            if size + 2.0 * k.outline >= pitch {
                return Err(ConfigError::Incompatible(format!(
                    "{} {:.3} leaves no gap between tabs at a pitch of {:.3}",
                    key, size, pitch
                )));
            }
        }
        if self.panels.do_covers && self.panels.do_sides {
            if f.size_x <= 2.0 * k.cover || f.size_x + 2.0 * k.cover >= c.x_step() {
                return Err(ConfigError::Incompatible(format!(
                    "fingers.size_x {:.3} does not fit a cover trim of {:.3}",
                    f.size_x, k.cover
                )));
            }
        }
        if self.panels.do_sides && self.panels.do_fronts {
            let span = c.cell_length - 2.0 * w.thickness;
            let half_step = span / (f.side_front_count as f64 - 0.5) / 2.0;
            if span <= 0.0 || half_step <= 2.0 * k.outline {
                return Err(ConfigError::Incompatible(format!(
                    "{} side/front fingers do not fit in a cell length of {:.3}",
                    f.side_front_count, c.cell_length
                )));
            }
        }

        let b = &self.bonus_holes;
        require_non_negative("bonus_holes.cell_diameter", b.cell_diameter)?;
        require_non_negative("bonus_holes.cell_standoff", b.cell_standoff)?;
        require_non_negative("bonus_holes.end_diameter", b.end_diameter)?;
        require_non_negative("bonus_holes.end_standoff", b.end_standoff)?;
        for (key, diameter) in [
            ("bonus_holes.cell_diameter", b.cell_diameter),
            ("bonus_holes.end_diameter", b.end_diameter),
        ] {
            if diameter > 0.01 && k.hole >= diameter / 2.0 {
                return Err(ConfigError::Incompatible(format!(
                    "{} {:.3} is too small for a hole trim of {:.3}",
                    key, diameter, k.hole
                )));
            }
        }

        let s = &self.side_holes;
        if s.mode != SideHoleMode::Off && self.panels.do_sides {
            require_positive("side_holes.diameter", s.diameter)?;
            require_non_negative("side_holes.standoff", s.standoff)?;
            if k.hole >= s.diameter / 2.0 {
                return Err(out_of_range("side_holes.diameter", s.diameter));
            }
        }

        let v = &self.vents;
        if self.panels.do_fronts {
            require_non_negative("vents.frame_width", v.frame_width)?;
            require_non_negative("vents.mid_width", v.mid_width)?;
            if v.slots_per_cell < 1 {
                return Err(out_of_range("vents.slots_per_cell", v.slots_per_cell));
            }
            let pitch = (c.cell_length - 2.0 * w.thickness - 2.0 * v.frame_width)
                / v.slots_per_cell as f64;
            if pitch - v.mid_width <= 2.0 * k.hole || c.y_step() - v.mid_width <= 2.0 * k.hole {
                return Err(ConfigError::Incompatible(
                    "ventilation slots collapse with the configured ribs and trim".to_string(),
                ));
            }
        }

        let p = &self.process;
        require_positive("process.feed_rate", p.feed_rate)?;
        require_positive("process.cover_feed_rate", p.cover_feed_rate)?;
        require_non_negative("process.delay_per_cell", p.delay_per_cell)?;
        require_non_negative("process.cover_delay_per_cell", p.cover_delay_per_cell)?;
        require_non_negative("process.end_dwell", p.end_dwell)?;
        for (key, power) in [
            ("process.cut_power", p.cut_power),
            ("process.cover_power", p.cover_power),
            ("process.mark_power", Some(p.mark_power)),
        ] {
            if let Some(power) = power {
                if power > p.max_power {
                    return Err(out_of_range(key, power));
                }
            }
        }

        Ok(())
    }
}
