//! Weld run planning
//!
//! Columns are grouped into bands; bands alternate between two weld
//! settings so neighbouring strips get different dot patterns. The run
//! visits every cell once per dot index, so the first dot of every cell is
//! placed before any second dot.

use crate::error::{WeldError, WeldResult};
use crate::parser::WeldMap;
use crate::patterns::WeldSetting;
use crate::protocol::{Command, Outputs};
use cellbox_core::Point;
use std::str::FromStr;

pub const MAX_BAND_PERIOD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Weld,
    /// Move and clamp without gas or welding current
    Simulate,
    /// Like `Simulate`, but every dot goes to the cell centre
    SimulateMidpoints,
}

impl RunMode {
    pub fn is_simulation(self) -> bool {
        !matches!(self, Self::Weld)
    }
}

/// Which setting starts and how the run is executed, written as `+`/`-`
/// optionally followed by `s` (simulate) or `S` (simulate at midpoints)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartSpec {
    pub start_with_second: bool,
    pub mode: RunMode,
}

impl FromStr for StartSpec {
    type Err = WeldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WeldError::InvalidStartMode(s.to_string());
        let mut chars = s.chars();
        let start_with_second = match chars.next() {
            Some('+') => false,
            Some('-') => true,
            _ => return Err(invalid()),
        };
        let mode = match chars.next() {
            None => RunMode::Weld,
            Some('s') => RunMode::Simulate,
            Some('S') => RunMode::SimulateMidpoints,
            Some(_) => return Err(invalid()),
        };
        if chars.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            start_with_second,
            mode,
        })
    }
}

/// Table geometry: where the program origin sits and how millimetres map to
/// device units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Program origin in table millimetres
    pub align_offset: Point,
    /// Device units per millimetre, x (along the gantry)
    pub scale_x: f64,
    /// Device units per millimetre, y (away from the operator)
    pub scale_y: f64,
    /// Settle time after every move (s)
    pub settle_base: f64,
    /// Additional settle time per device unit travelled (s)
    pub settle_per_unit: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            align_offset: Point::new(15.5, 6.0),
            scale_x: 48.66,
            scale_y: 49.26,
            settle_base: 0.4,
            settle_per_unit: 130e-6,
        }
    }
}

/// Controller waits for each phase of a weld, plus host-side pauses (s)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimings {
    /// Head drops under gravity, gas on
    pub approach: f64,
    pub clamp: f64,
    /// Safety timeout; the welder stops itself once the energy is delivered
    pub weld: f64,
    pub hold: f64,
    /// Gas only, to clear smoke and cool the electrode
    pub purge: f64,
    /// Pause after every dot with all outputs off
    pub cooldown: f64,
    pub home_settle: f64,
    /// Initial gas line purge
    pub line_purge: f64,
    pub line_purge_settle: f64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            approach: 0.4,
            clamp: 0.3,
            weld: 0.5,
            hold: 0.3,
            purge: 0.3,
            cooldown: 3.0,
            home_settle: 5.0,
            line_purge: 1.0,
            line_purge_settle: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerSettings {
    pub first: WeldSetting,
    pub second: WeldSetting,
    /// Columns per band, 1..=20
    pub band_period: u32,
    pub start_with_second: bool,
    pub mode: RunMode,
    pub calibration: Calibration,
    pub timings: PhaseTimings,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            first: WeldSetting {
                points: 3,
                distance: 3.0,
                extra_power: true,
            },
            second: WeldSetting {
                points: 5,
                distance: 4.0,
                extra_power: false,
            },
            band_period: 1,
            start_with_second: false,
            mode: RunMode::Weld,
            calibration: Calibration::default(),
            timings: PhaseTimings::default(),
        }
    }
}

impl SequencerSettings {
    pub fn with_start(mut self, start: StartSpec) -> Self {
        self.start_with_second = start.start_with_second;
        self.mode = start.mode;
        self
    }
}

/// One command and how long the host waits after sending it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanStep {
    pub command: Command,
    /// Host-side settle time (s)
    pub settle: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Plan {
    steps: Vec<PlanStep>,
    welds: usize,
}

impl Plan {
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    /// Dots placed by the run
    pub fn weld_count(&self) -> usize {
        self.welds
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.steps.iter().map(|step| &step.command)
    }

    /// Controller waits plus host-side settle times
    pub fn estimated_seconds(&self) -> f64 {
        self.steps
            .iter()
            .map(|step| match step.command {
                Command::Wait(seconds) => seconds + step.settle,
                _ => step.settle,
            })
            .sum()
    }

    /// Command script, one command per line
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for command in self.commands() {
            script.push_str(&command.to_string());
            script.push('\n');
        }
        script
    }

    fn push(&mut self, command: Command) {
        self.push_settled(command, 0.0);
    }

    fn push_settled(&mut self, command: Command, settle: f64) {
        self.steps.push(PlanStep { command, settle });
    }
}

pub struct WeldSequencer {
    settings: SequencerSettings,
}

impl WeldSequencer {
    pub fn new(settings: SequencerSettings) -> WeldResult<Self> {
        if !(1..=MAX_BAND_PERIOD).contains(&settings.band_period) {
            return Err(WeldError::InvalidBandPeriod(settings.band_period));
        }
        settings.first.validate()?;
        settings.second.validate()?;
        Ok(Self { settings })
    }

    fn uses_second(&self, column: u32) -> bool {
        let band = column / self.settings.band_period;
        (band % 2 == 1) != self.settings.start_with_second
    }

    /// Setting used for every cell of `column`
    pub fn setting_for_column(&self, column: u32) -> &WeldSetting {
        if self.uses_second(column) {
            &self.settings.second
        } else {
            &self.settings.first
        }
    }

    fn machine_position(&self, target: Point) -> (f64, f64) {
        let calibration = &self.settings.calibration;
        let table = calibration.align_offset + target;
        (table.x * calibration.scale_x, table.y * calibration.scale_y)
    }

    pub fn plan(&self, map: &WeldMap) -> WeldResult<Plan> {
        if map.is_empty() {
            return Err(WeldError::Empty);
        }

        let settings = &self.settings;
        let timings = &settings.timings;
        let calibration = &settings.calibration;
        let simulate = settings.mode.is_simulation();
        let gas = Outputs::GAS;

        let first_offsets = settings.first.offsets()?;
        let second_offsets = settings.second.offsets()?;
        let max_dots = settings.first.points.max(settings.second.points) as usize;

        let mut plan = Plan::default();
        plan.push(Command::Init);
        plan.push(Command::SetOutputs(Outputs::NONE));
        plan.push(Command::Wait(0.5));
        plan.push_settled(Command::FindHome, timings.home_settle);

        if !simulate {
            plan.push(Command::SetOutputs(gas));
            plan.push(Command::Wait(timings.line_purge));
            plan.push_settled(Command::SetOutputs(Outputs::NONE), timings.line_purge_settle);
        }

        let mut previous = (0.0, 0.0);
        for dot in 0..max_dots {
            for (column, row, center) in map.iter() {
                let (setting, offsets) = if self.uses_second(column) {
                    (&settings.second, &second_offsets)
                } else {
                    (&settings.first, &first_offsets)
                };
                let Some(offset) = offsets.get(dot) else {
                    continue;
                };

                let target = if settings.mode == RunMode::SimulateMidpoints {
                    center
                } else {
                    center + *offset
                };
                let (x, y) = self.machine_position(target);
                let travel = ((x - previous.0).powi(2) + (y - previous.1).powi(2)).sqrt();
                previous = (x, y);

                tracing::debug!(
                    "column {} row {} dot {}/{}{}",
                    column + 1,
                    row + 1,
                    dot + 1,
                    setting.points,
                    if setting.extra_power { " P" } else { "" }
                );

                plan.push_settled(
                    Command::MoveTo {
                        x: x as i64,
                        y: y as i64,
                    },
                    calibration.settle_base + calibration.settle_per_unit * travel,
                );

                let extra = setting.extra_power;
                let pressed = Outputs::RELEASE | Outputs::CLAMP;
                let phases = [
                    (Outputs::RELEASE.with(gas, !simulate), timings.approach),
                    (
                        pressed.with(gas, !simulate).with(Outputs::EXTRA_POWER, extra),
                        timings.clamp,
                    ),
                    (
                        pressed
                            .with(gas | Outputs::WELDER, !simulate)
                            .with(Outputs::EXTRA_POWER, extra),
                        timings.weld,
                    ),
                    (pressed.with(gas, !simulate), timings.hold),
                    (Outputs::NONE.with(gas, !simulate), timings.purge),
                ];
                for (outputs, wait) in phases {
                    plan.push(Command::SetOutputs(outputs));
                    plan.push(Command::Wait(wait));
                }
                plan.push_settled(Command::SetOutputs(Outputs::NONE), timings.cooldown);
                plan.welds += 1;
            }
        }

        tracing::info!(
            "Planned {} welds on {} cells, about {:.0} s",
            plan.welds,
            map.len(),
            plan.estimated_seconds()
        );
        Ok(plan)
    }
}
