//! Human-friendly step size specs (`30s`, `15m`, `1h`, `2d`).
//!
//! Query layers usually carry the requested resolution as a short string.
//! [`StepSize`] parses those specs and converts them into the
//! `chrono::Duration` that [`Bounds`](super::Bounds) expects. It serializes
//! back to the same compact form.

use std::{fmt, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Why a string could not be read as a [`StepSize`].
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ParseStepSizeError {
    /// Nothing but whitespace.
    #[snafu(display("empty step size"))]
    Empty,

    /// A unit with no count in front of it, such as `h`.
    #[snafu(display("step size '{input}' has no count before its unit"))]
    MissingNumber {
        /// Trimmed input.
        input: String,
    },

    /// A count with no unit after it, such as `10`.
    #[snafu(display("step size '{input}' has no unit (use ms, s, m, h or d)"))]
    MissingUnit {
        /// Trimmed input.
        input: String,
    },

    /// The count is not an unsigned integer.
    #[snafu(display("step size '{input}' has a malformed count: {source}"))]
    InvalidNumber {
        /// Trimmed input.
        input: String,
        /// Integer parse failure.
        source: std::num::ParseIntError,
    },

    /// A zero count.
    #[snafu(display("step size '{input}' must be positive"))]
    NonPositive {
        /// Trimmed input.
        input: String,
    },

    /// The count exceeds `u32::MAX`.
    #[snafu(display("step size '{input}' is out of range ({value} > u32::MAX)"))]
    TooLarge {
        /// Trimmed input.
        input: String,
        /// Count as parsed.
        value: u64,
    },

    /// The suffix names no supported unit.
    #[snafu(display(
        "step size '{input}' uses unknown unit '{unit}' (use ms, s, m, h or d)"
    ))]
    UnknownUnit {
        /// Trimmed input.
        input: String,
        /// Suffix as written.
        unit: String,
    },
}

/// A fixed sampling interval expressed in one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StepSize {
    /// A step of a fixed number of milliseconds.
    Millis(u32),
    /// A step of a fixed number of seconds.
    Seconds(u32),
    /// A step of a fixed number of minutes.
    Minutes(u32),
    /// A step of a fixed number of hours.
    Hours(u32),
    /// A step of a fixed number of days.
    Days(u32),
}

impl StepSize {
    /// Parse a step size spec such as `1h`, `15m`, `30s`, `500ms` or `2d`.
    ///
    /// Accepts common unit aliases (`sec`, `min`, `hr`, `day`).
    pub fn parse(spec: &str) -> Result<Self, ParseStepSizeError> {
        spec.parse()
    }

    /// The step as a duration.
    pub fn to_duration(self) -> Duration {
        match self {
            StepSize::Millis(n) => Duration::milliseconds(n as i64),
            StepSize::Seconds(n) => Duration::seconds(n as i64),
            StepSize::Minutes(n) => Duration::minutes(n as i64),
            StepSize::Hours(n) => Duration::hours(n as i64),
            StepSize::Days(n) => Duration::days(n as i64),
        }
    }
}

impl From<StepSize> for Duration {
    fn from(step: StepSize) -> Self {
        step.to_duration()
    }
}

impl FromStr for StepSize {
    type Err = ParseStepSizeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        ensure!(!input.is_empty(), EmptySnafu);

        let Some(unit_start) = input.find(|c: char| c.is_ascii_alphabetic()) else {
            return MissingUnitSnafu { input }.fail();
        };
        ensure!(unit_start > 0, MissingNumberSnafu { input });

        let (num_str, unit_str) = input.split_at(unit_start);
        let value: u64 = num_str
            .trim()
            .parse()
            .context(InvalidNumberSnafu { input })?;

        ensure!(value > 0, NonPositiveSnafu { input });
        let v = u32::try_from(value).ok().context(TooLargeSnafu { input, value })?;

        match unit_str.trim().to_ascii_lowercase().as_str() {
            "ms" | "milli" | "millis" => Ok(StepSize::Millis(v)),
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(StepSize::Seconds(v)),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(StepSize::Minutes(v)),
            "h" | "hr" | "hrs" | "hour" | "hours" => Ok(StepSize::Hours(v)),
            "d" | "day" | "days" => Ok(StepSize::Days(v)),
            _ => UnknownUnitSnafu {
                input,
                unit: unit_str.trim(),
            }
            .fail(),
        }
    }
}

impl TryFrom<String> for StepSize {
    type Error = ParseStepSizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StepSize> for String {
    fn from(step: StepSize) -> Self {
        step.to_string()
    }
}

impl fmt::Display for StepSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepSize::Millis(n) => write!(f, "{n}ms"),
            StepSize::Seconds(n) => write!(f, "{n}s"),
            StepSize::Minutes(n) => write!(f, "{n}m"),
            StepSize::Hours(n) => write!(f, "{n}h"),
            StepSize::Days(n) => write!(f, "{n}d"),
        }
    }
}
