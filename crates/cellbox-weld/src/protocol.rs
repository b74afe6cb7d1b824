//! Motion/IO controller command language
//!
//! Commands are short ASCII words terminated by `;`. Positions are in device
//! units, waits in seconds with millisecond resolution.

use std::fmt;
use std::ops::BitOr;

/// Digital output bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outputs(pub u8);

impl Outputs {
    pub const NONE: Self = Self(0);
    /// Head up / release valve
    pub const RELEASE: Self = Self(1);
    /// Head down / clamp valve
    pub const CLAMP: Self = Self(2);
    pub const WELDER: Self = Self(4);
    pub const EXTRA_POWER: Self = Self(8);
    /// Shielding gas valve
    pub const GAS: Self = Self(16);

    /// Add `other` when `on` is set
    pub fn with(self, other: Self, on: bool) -> Self {
        if on {
            self | other
        } else {
            self
        }
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Outputs {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Init,
    FindHome,
    /// Absolute move in device units
    MoveTo { x: i64, y: i64 },
    SetOutputs(Outputs),
    /// Controller-side wait (s)
    Wait(f64),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, ";IN;"),
            Self::FindHome => write!(f, "FH;"),
            Self::MoveTo { x, y } => write!(f, "MA {},{};", x, y),
            Self::SetOutputs(outputs) => write!(f, "CD {};", outputs.0),
            Self::Wait(seconds) => write!(f, "WA {:.3};", seconds),
        }
    }
}
