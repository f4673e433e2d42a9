use std::fmt;
use std::str::FromStr;

use crate::errors::*;

/// Unit of trigonometric function arguments
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AngleMode {
    Degrees,
    Radians,
}

impl Default for AngleMode {
    fn default() -> AngleMode {
        AngleMode::Radians
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AngleMode::Degrees => write!(f, "deg"),
            AngleMode::Radians => write!(f, "rad"),
        }
    }
}

impl FromStr for AngleMode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(AngleMode::Degrees),
            "rad" | "radian" | "radians" => Ok(AngleMode::Radians),
            _ => Err(CalcError::InvalidAngleMode(s.to_string())),
        }
    }
}

/// Engine settings. Fixed for the lifetime of an engine
#[derive(Clone, Debug, PartialEq)]
pub struct CalcConfig {
    /// angle mode used when an expression does not start with `deg` or `rad`
    pub angle_mode: AngleMode,
    /// how deep function calls and factorial operands may nest
    pub max_depth: usize,
    /// the number of evaluations kept in history
    pub history_limit: usize,
    /// fractional digits kept when a constant, variable, or function result
    /// is substituted into an expression
    pub literal_digits: usize,
}

impl Default for CalcConfig {
    fn default() -> CalcConfig {
        CalcConfig {
            angle_mode: AngleMode::Radians,
            max_depth: 64,
            history_limit: 100,
            literal_digits: 10,
        }
    }
}

impl CalcConfig {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_angle_mode(mut self, mode: AngleMode) -> Self {
        self.angle_mode = mode;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
