//! Options controlling how blocks treat missing values.
//!
//! JSON layout example:
//!
//! ```json
//! { "missing_values": "fail" }
//! ```
//!
//! Every field has a default, so `{}` is a valid configuration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use snafu::prelude::*;

/// Sentinel stored in place of a value a series or column does not have.
pub const MISSING_VALUE: f64 = f64::NAN;

/// What a block does when its series (or builder columns) have unequal lengths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingValuePolicy {
    /// The block spans the longest series; shorter series read as
    /// [`MISSING_VALUE`] past their end.
    #[default]
    Pad,
    /// Unequal lengths are rejected when the block is constructed.
    Fail,
}

/// Error produced when parsing a [`MissingValuePolicy`] from a string.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(display("unknown missing value policy '{input}' (expected pad|fail)"))]
pub struct ParsePolicyError {
    input: String,
}

impl FromStr for MissingValuePolicy {
    type Err = ParsePolicyError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pad" => Ok(MissingValuePolicy::Pad),
            "fail" => Ok(MissingValuePolicy::Fail),
            _ => ParsePolicySnafu { input }.fail(),
        }
    }
}

impl fmt::Display for MissingValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingValuePolicy::Pad => f.write_str("pad"),
            MissingValuePolicy::Fail => f.write_str("fail"),
        }
    }
}

/// Construction options shared by both block variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockOptions {
    /// Policy for unequal series or column lengths.
    pub missing_values: MissingValuePolicy,
}

impl BlockOptions {
    /// Options with the given missing value policy.
    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_padding() {
        let opts: BlockOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.missing_values, MissingValuePolicy::Pad);
        assert_eq!(opts, BlockOptions::default());
    }

    #[test]
    fn reads_policy_from_json() {
        let opts: BlockOptions = serde_json::from_str(r#"{"missing_values":"fail"}"#).unwrap();
        assert_eq!(opts.missing_values, MissingValuePolicy::Fail);

        assert!(serde_json::from_str::<BlockOptions>(r#"{"missing_values":"zero"}"#).is_err());
    }

    #[test]
    fn parses_policy_strings() {
        assert_eq!("Pad".parse(), Ok(MissingValuePolicy::Pad));
        assert_eq!(" fail ".parse(), Ok(MissingValuePolicy::Fail));

        let err = "drop".parse::<MissingValuePolicy>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown missing value policy 'drop' (expected pad|fail)"
        );
    }
}
