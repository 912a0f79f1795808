//! Error types and SNAFU context selectors for the block layer.
//!
//! Every fallible operation in this crate returns [`BlockError`]. Context
//! selectors are `pub(crate)` so sibling modules can attach context without
//! re-exporting them at the crate root.
//!
//! The variants group into the error kinds callers care about:
//!
//! - out of bounds: [`BlockError::TimeOutOfBounds`], [`BlockError::StepOutOfBounds`]
//! - index out of range: [`BlockError::IndexOutOfRange`]
//! - resolution mismatch: [`BlockError::ResolutionMismatch`], [`BlockError::StartMismatch`]
//! - invalid iterator state: [`BlockError::InvalidIteratorState`]
//!
//! The remaining variants guard construction-time invariants.

use chrono::{DateTime, Duration, Utc};
use snafu::prelude::*;

use crate::bounds::Bounds;

/// Errors from block construction, lookup, and iteration.
#[derive(Debug, Snafu, Clone, PartialEq)]
#[snafu(visibility(pub(crate)))]
pub enum BlockError {
    /// A timestamp fell outside `[start, end]` of the bounds, or resolved to a
    /// step past the end of the available values.
    #[snafu(display("out of bounds, time: {time}, bounds: {bounds}"))]
    TimeOutOfBounds {
        /// The requested timestamp.
        time: DateTime<Utc>,
        /// Bounds the lookup was made against.
        bounds: Bounds,
    },

    /// A step index maps to a timestamp after the end of the bounds.
    #[snafu(display("out of bounds, step: {index}, bounds: {bounds}"))]
    StepOutOfBounds {
        /// The requested step index.
        index: usize,
        /// Bounds the lookup was made against.
        bounds: Bounds,
    },

    /// A positional index (series value or builder column) is past the end.
    #[snafu(display("index out of range: {index} (len {len})"))]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of addressable entries.
        len: usize,
    },

    /// Series in one list disagree on their sampling interval.
    #[snafu(display(
        "resolution mismatch at series {index}: expected {expected}, found {found}"
    ))]
    ResolutionMismatch {
        /// Position of the first series that disagrees.
        index: usize,
        /// Resolution of the first series in the list.
        expected: Duration,
        /// Resolution of the disagreeing series.
        found: Duration,
    },

    /// A series' own bounds start at a different time than the block's, so its
    /// values would land on the wrong steps.
    #[snafu(display(
        "start mismatch at series {index}: block starts {expected}, series starts {found}"
    ))]
    StartMismatch {
        /// Position of the misaligned series.
        index: usize,
        /// Start of the block's bounds.
        expected: DateTime<Utc>,
        /// Start of the series' bounds.
        found: DateTime<Utc>,
    },

    /// `current` was called without a preceding successful `next`.
    #[snafu(display(
        "current called without a successful next (position {position:?}, len {len})"
    ))]
    InvalidIteratorState {
        /// Cursor position, `None` before the first `next`.
        position: Option<usize>,
        /// Total number of entries in the iterator.
        len: usize,
    },

    /// Bounds require `start < end` and a positive step, all representable in
    /// `i64` nanoseconds.
    #[snafu(display("invalid bounds: start={start}, end={end}, step={step}"))]
    InvalidBounds {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
        /// Requested step size.
        step: Duration,
    },

    /// More values than the bounds have steps.
    #[snafu(display("{len} values exceed the {capacity} steps of the bounds"))]
    ExceedsBounds {
        /// Number of values supplied.
        len: usize,
        /// Step count of the bounds.
        capacity: usize,
    },

    /// Series or columns have unequal lengths and the policy forbids padding.
    #[snafu(display("series {index} has {len} values, expected {expected}"))]
    RaggedSeries {
        /// Position of the first series (or column) with a different length.
        index: usize,
        /// Its length.
        len: usize,
        /// Length of the first series (or column).
        expected: usize,
    },

    /// Per-series metadata does not line up with the series count.
    #[snafu(display("series metadata has {found} entries, expected {expected}"))]
    SeriesMetaMismatch {
        /// Number of series (columns) in the block.
        expected: usize,
        /// Number of series metadata entries supplied.
        found: usize,
    },

    /// The block variant does not offer this capability.
    #[snafu(display("{operation} is not supported on a {block} block"))]
    Unsupported {
        /// Name of the requested operation.
        operation: &'static str,
        /// Name of the block variant.
        block: &'static str,
    },
}

/// Convenience alias for results returned by this crate.
pub type Result<T, E = BlockError> = std::result::Result<T, E>;
