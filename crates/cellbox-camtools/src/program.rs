//! Instruction stream and G-code rendering
//!
//! [`ProgramBuilder`] tracks the feed in effect and the power ramp while
//! geometry is appended, so callers only describe motion. The finished
//! [`Program`] is checked for actuator bracketing before it is handed out.

use crate::error::{CamToolError, CamToolResult};
use cellbox_core::{Annotation, Point};
use std::fmt::Write as _;

/// Actuator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Idle,
    /// Full cut, optionally at an explicit power
    Cut(Option<u32>),
    /// Non-destructive marking power
    Mark(u32),
}

impl Actuator {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Comment(String),
    /// Millimetre units
    Metric,
    /// Exact stop at corners
    ExactPath,
    /// Feed statement for the whole file
    Feed(f64),
    Rapid {
        to: Point,
        annotation: Option<Annotation>,
    },
    Linear {
        to: Point,
        feed: Option<f64>,
        annotation: Option<Annotation>,
    },
    /// Clockwise arc; `center_offset` is relative to the arc start
    Arc {
        to: Point,
        center_offset: Point,
        feed: Option<f64>,
    },
    Actuator(Actuator),
    /// Pause in seconds
    Dwell(f64),
    EndProgram,
    EndOfFile,
}

impl Instruction {
    /// Render as one line of G-code, without the newline
    pub fn to_gcode(&self) -> String {
        match self {
            Self::Comment(text) => format!("({})", text),
            Self::Metric => "G21".to_string(),
            Self::ExactPath => "G61".to_string(),
            Self::Feed(feed) => format!("G00 F{:.2}", feed),
            Self::Rapid { to, annotation } => {
                let mut line = format!("G00 X{:.3} Y{:.3}", to.x, to.y);
                push_annotation(&mut line, annotation);
                line
            }
            Self::Linear {
                to,
                feed,
                annotation,
            } => {
                let mut line = format!("G01 X{:.3} Y{:.3}", to.x, to.y);
                push_feed(&mut line, *feed);
                push_annotation(&mut line, annotation);
                line
            }
            Self::Arc {
                to,
                center_offset,
                feed,
            } => {
                let mut line = format!(
                    "G02 X{:.3} Y{:.3} I{:.3} J{:.3}",
                    to.x, to.y, center_offset.x, center_offset.y
                );
                push_feed(&mut line, *feed);
                line
            }
            Self::Actuator(Actuator::Idle) => "M05".to_string(),
            Self::Actuator(Actuator::Cut(None)) => "M03".to_string(),
            Self::Actuator(Actuator::Cut(Some(power))) | Self::Actuator(Actuator::Mark(power)) => {
                format!("M03 S{}", power)
            }
            Self::Dwell(seconds) => format!("G04 P{:.3}", seconds),
            Self::EndProgram => "M2".to_string(),
            Self::EndOfFile => "%".to_string(),
        }
    }

    /// Motion that removes material
    fn is_cutting_motion(&self) -> bool {
        matches!(self, Self::Linear { .. } | Self::Arc { .. })
    }
}

fn push_feed(line: &mut String, feed: Option<f64>) {
    if let Some(feed) = feed {
        let _ = write!(line, " F{:.2}", feed);
    }
}

fn push_annotation(line: &mut String, annotation: &Option<Annotation>) {
    if let Some(annotation) = annotation {
        let _ = write!(line, " {}", annotation);
    }
}

/// Power settings used when the builder switches the actuator on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerProfile {
    pub cut_power: Option<u32>,
    pub mark_power: u32,
    /// Added on every successive cut activation
    pub ramp: u32,
    pub max_power: u32,
}

impl Default for PowerProfile {
    fn default() -> Self {
        Self {
            cut_power: None,
            mark_power: 10,
            ramp: 0,
            max_power: 1000,
        }
    }
}

/// A finished, checked instruction stream
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Annotations in emission order
    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.instructions.iter().filter_map(|i| match i {
            Instruction::Rapid { annotation, .. } | Instruction::Linear { annotation, .. } => {
                annotation.as_ref()
            }
            _ => None,
        })
    }

    pub fn to_gcode(&self) -> String {
        let mut gcode = String::new();
        for instruction in &self.instructions {
            gcode.push_str(&instruction.to_gcode());
            gcode.push('\n');
        }
        gcode
    }
}

/// Check that every activation happens while idle, that nothing is cut while
/// idle, and that the program ends idle.
///
/// A redundant idle before the first activation is allowed (programs start
/// by forcing the actuator off).
pub fn verify_actuator_sequence(instructions: &[Instruction]) -> CamToolResult<()> {
    let mut active = false;
    let mut activated_once = false;
    let fail = |index: usize, reason: &str| CamToolError::ActuatorSequence {
        index,
        reason: reason.to_string(),
    };

    for (index, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::Actuator(mode) if mode.is_active() => {
                if active {
                    return Err(fail(index, "activation while the actuator is on"));
                }
                active = true;
                activated_once = true;
            }
            Instruction::Actuator(Actuator::Idle) => {
                if !active && activated_once {
                    return Err(fail(index, "deactivation while the actuator is off"));
                }
                active = false;
            }
            Instruction::Rapid { .. } if active => {
                return Err(fail(index, "rapid move while the actuator is on"));
            }
            i if i.is_cutting_motion() && !active => {
                return Err(fail(index, "cutting motion while the actuator is off"));
            }
            Instruction::EndProgram | Instruction::EndOfFile if active => {
                return Err(fail(index, "program ends with the actuator on"));
            }
            _ => {}
        }
    }

    if active {
        return Err(fail(instructions.len(), "program ends with the actuator on"));
    }
    Ok(())
}

/// Appends instructions while tracking feed and power
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    /// Feed last stated in the file
    stated_feed: Option<f64>,
    /// Feed the next cutting motion should run at
    feed: f64,
    power: PowerProfile,
    cut_activations: u32,
}

impl ProgramBuilder {
    pub fn new(feed: f64, power: PowerProfile) -> Self {
        Self {
            instructions: Vec::new(),
            stated_feed: None,
            feed,
            power,
            cut_activations: 0,
        }
    }

    pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
        self.instructions.push(Instruction::Comment(text.into()));
        self
    }

    /// Units, path mode, actuator off and the feed statement
    pub fn setup(&mut self) -> &mut Self {
        self.instructions.push(Instruction::Metric);
        self.instructions.push(Instruction::ExactPath);
        self.instructions.push(Instruction::Actuator(Actuator::Idle));
        self.instructions.push(Instruction::Feed(self.feed));
        self.stated_feed = Some(self.feed);
        self
    }

    /// Change the feed for subsequent cutting moves
    pub fn set_feed(&mut self, feed: f64) -> &mut Self {
        self.feed = feed;
        self
    }

    fn feed_word(&mut self) -> Option<f64> {
        if self.stated_feed == Some(self.feed) {
            None
        } else {
            self.stated_feed = Some(self.feed);
            Some(self.feed)
        }
    }

    pub fn rapid(&mut self, to: Point) -> &mut Self {
        self.rapid_annotated(to, None)
    }

    pub fn rapid_annotated(&mut self, to: Point, annotation: Option<Annotation>) -> &mut Self {
        self.instructions.push(Instruction::Rapid { to, annotation });
        self
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.line_to_annotated(to, None)
    }

    pub fn line_to_annotated(&mut self, to: Point, annotation: Option<Annotation>) -> &mut Self {
        let feed = self.feed_word();
        self.instructions.push(Instruction::Linear {
            to,
            feed,
            annotation,
        });
        self
    }

    pub fn arc_to(&mut self, to: Point, center_offset: Point) -> &mut Self {
        let feed = self.feed_word();
        self.instructions.push(Instruction::Arc {
            to,
            center_offset,
            feed,
        });
        self
    }

    /// Switch to cutting; each activation ramps the power
    pub fn start_cut(&mut self) -> &mut Self {
        let power = self.power.cut_power.map(|base| {
            base.saturating_add(self.power.ramp.saturating_mul(self.cut_activations))
                .min(self.power.max_power)
        });
        self.cut_activations += 1;
        self.switch(Actuator::Cut(power))
    }

    pub fn start_mark(&mut self) -> &mut Self {
        self.switch(Actuator::Mark(self.power.mark_power))
    }

    pub fn stop(&mut self) -> &mut Self {
        self.switch(Actuator::Idle)
    }

    fn switch(&mut self, mode: Actuator) -> &mut Self {
        self.instructions.push(Instruction::Actuator(mode));
        self
    }

    /// Pause; non-positive durations are skipped
    pub fn dwell(&mut self, seconds: f64) -> &mut Self {
        if seconds > 0.0 {
            self.instructions.push(Instruction::Dwell(seconds));
        }
        self
    }

    /// Return to `origin`, optionally pause, then end the program
    pub fn trailer(&mut self, origin: Point, end_dwell: f64) -> &mut Self {
        self.rapid(origin);
        self.dwell(end_dwell);
        self.instructions.push(Instruction::EndProgram);
        self.instructions.push(Instruction::EndOfFile);
        self
    }

    pub fn finish(self) -> CamToolResult<Program> {
        verify_actuator_sequence(&self.instructions)?;
        Ok(Program {
            instructions: self.instructions,
        })
    }
}
