//! Parsing of the positional and flag arguments that select a box
//!
//! Counts and flags arrive as text from the command line; they are checked
//! here so that a bad value is reported before any geometry is computed.

use crate::error::{ParameterError, ParameterResult};
use crate::grid::MAX_COUNT;

/// Parse a panel enable flag; only `0` and `1` are accepted.
pub fn parse_flag(name: &str, value: &str) -> ParameterResult<bool> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(ParameterError::InvalidFlag {
            name: name.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parse a row or column count in `1..=100`.
pub fn parse_count(name: &str, value: &str) -> ParameterResult<u32> {
    let out_of_range = |value: f64| ParameterError::OutOfRange {
        name: name.to_string(),
        value,
        min: 1.0,
        max: MAX_COUNT as f64,
    };

    match value.trim().parse::<i64>() {
        Ok(count) if (1..=MAX_COUNT as i64).contains(&count) => Ok(count as u32),
        Ok(count) => Err(out_of_range(count as f64)),
        Err(_) => Err(out_of_range(f64::NAN)),
    }
}
