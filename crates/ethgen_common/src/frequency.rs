//! Integer frequency values with unit parsing and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A frequency value stored as a whole number of Hertz.
///
/// Supports parsing from strings like "50MHz", "125e6", "1GHz", "48000Hz",
/// and bare numeric values (interpreted as Hz). Fractional inputs are
/// truncated to whole Hertz. Displays using the most appropriate unit.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Frequency(u64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub const fn from_hz(hz: u64) -> Self {
        Self(hz)
    }

    /// Creates a frequency from a floating point value in Hertz.
    ///
    /// Returns `None` for negative, non-finite or sub-Hertz values.
    pub fn from_hz_f64(hz: f64) -> Option<Self> {
        if !hz.is_finite() || hz < 1.0 || hz > u64::MAX as f64 {
            return None;
        }
        Some(Self(hz as u64))
    }

    /// Returns the frequency in Hertz.
    pub const fn hz(&self) -> u64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Returns the period of one cycle in nanoseconds.
    pub fn period_ns(&self) -> f64 {
        1e9 / self.0 as f64
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0 as f64;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{}Hz", self.0)
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            // Bare number (including exponent notation such as "125e6") is Hz.
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        Frequency::from_hz_f64(val * scale).ok_or_else(err)
    }
}
