//! The block contract and its two iteration orders.
//!
//! A [`Block`] is one time-aligned dataset over a set of series. Operators
//! read it either step-wise ([`StepIter`]: one cross-series snapshot per
//! timestamp) or series-wise ([`SeriesIter`]: one series' full range at a
//! time). Both orders, and [`Block::series_meta`], share the same series
//! positions.
//!
//! Two realizations are provided:
//!
//! - [`MultiSeriesBlock`]: a view over fetched row-oriented series that
//!   transposes one step at a time during iteration.
//! - [`ColumnBlock`]: built through [`ColumnBlockBuilder`] and transposed once
//!   at build time, so step iteration hands out borrowed slices.
//!
//! Iterators are cursors: `next()` advances and reports whether an entry is
//! available, `current()` reads it without advancing. Cursors live in the
//! iterator, so any number of iterators may run over one block concurrently;
//! a single iterator must stay on one thread of traversal.

pub mod column;
pub mod multi_series;

use std::{borrow::Cow, fmt};

use chrono::{DateTime, Utc};
use log::warn;

use crate::{
    error::{InvalidIteratorStateSnafu, RaggedSeriesSnafu, Result},
    metadata::{Metadata, SeriesMeta},
    options::MissingValuePolicy,
    series::Series,
};

pub use column::{ColumnBlock, ColumnBlockBuilder, ColumnStepIter};
pub use multi_series::{MultiSeriesBlock, MultiSeriesSeriesIter, MultiSeriesStepIter};

/// One cross-series snapshot: the value of every series at a single timestamp.
///
/// `values()[i]` belongs to the series at position `i` of the block.
#[derive(Debug, Clone, PartialEq)]
pub struct Step<'a> {
    time: DateTime<Utc>,
    values: Cow<'a, [f64]>,
}

impl<'a> Step<'a> {
    /// Create a step from borrowed or owned values.
    pub fn new(time: DateTime<Utc>, values: impl Into<Cow<'a, [f64]>>) -> Self {
        Self {
            time,
            values: values.into(),
        }
    }

    /// Timestamp of the step.
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Values, one per series.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Detach the step from the block it was read from.
    pub fn into_owned(self) -> Step<'static> {
        Step {
            time: self.time,
            values: Cow::Owned(self.values.into_owned()),
        }
    }
}

/// Step-wise traversal of a block.
pub trait StepIter {
    /// Advance to the next step; `false` once the steps are exhausted.
    fn next(&mut self) -> bool;

    /// The step under the cursor.
    ///
    /// # Errors
    /// Returns [`BlockError::InvalidIteratorState`](crate::BlockError::InvalidIteratorState)
    /// if `next` has not returned `true` for this position.
    fn try_current(&self) -> Result<Step<'_>>;

    /// The step under the cursor.
    ///
    /// # Panics
    /// Panics when called without a preceding successful `next`.
    fn current(&self) -> Step<'_> {
        match self.try_current() {
            Ok(step) => step,
            Err(err) => panic!("{err}"),
        }
    }

    /// Total number of steps, independent of the cursor.
    fn len(&self) -> usize;

    /// Whether the iterator has no steps at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Series-wise traversal of a block.
pub trait SeriesIter {
    /// Advance to the next series; `false` once the series are exhausted.
    fn next(&mut self) -> bool;

    /// A copy of the series under the cursor, bounded by the block's bounds.
    ///
    /// # Errors
    /// Returns [`BlockError::InvalidIteratorState`](crate::BlockError::InvalidIteratorState)
    /// if `next` has not returned `true` for this position.
    fn try_current(&self) -> Result<Series>;

    /// A copy of the series under the cursor.
    ///
    /// # Panics
    /// Panics when called without a preceding successful `next`.
    fn current(&self) -> Series {
        match self.try_current() {
            Ok(series) => series,
            Err(err) => panic!("{err}"),
        }
    }

    /// Total number of series, independent of the cursor.
    fn len(&self) -> usize;

    /// Whether the iterator has no series at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A group of series across a time bound.
///
/// Callers must treat a block as immutable and call [`Block::close`] once
/// done with it.
pub trait Block: fmt::Debug + Send + Sync {
    /// Bounds and common tags of the block.
    fn meta(&self) -> &Metadata;

    /// Iterate the block one step at a time.
    fn step_iter(&self) -> Box<dyn StepIter + '_>;

    /// Iterate the block one series at a time.
    ///
    /// # Errors
    /// Returns [`BlockError::Unsupported`](crate::BlockError::Unsupported) for
    /// variants that do not offer series-wise traversal.
    fn series_iter(&self) -> Result<Box<dyn SeriesIter + '_>>;

    /// Per-series metadata, positionally aligned with both iteration orders.
    fn series_meta(&self) -> &[SeriesMeta];

    /// Release retained buffers. Metadata stays readable; iterators created
    /// afterwards are empty. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// The blocks produced for one query.
#[derive(Debug, Default)]
pub struct BlockResult {
    /// Blocks in time order.
    pub blocks: Vec<Box<dyn Block>>,
}

/// Cursor shared by the iterator implementations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cursor {
    position: Option<usize>,
    len: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            position: None,
            len,
        }
    }

    pub(crate) fn advance(&mut self) -> bool {
        let next = self.position.map_or(0, |p| (p + 1).min(self.len));
        self.position = Some(next);
        next < self.len
    }

    pub(crate) fn position(&self) -> Result<usize> {
        match self.position {
            Some(p) if p < self.len => Ok(p),
            position => InvalidIteratorStateSnafu {
                position,
                len: self.len,
            }
            .fail(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Step count for entries of the given lengths under `policy`.
///
/// Returns the longest length. Under [`MissingValuePolicy::Fail`] every length
/// must match the first one.
pub(crate) fn aligned_len<I>(lens: I, policy: MissingValuePolicy, what: &str) -> Result<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut lens = lens.into_iter();
    let Some(first) = lens.next() else {
        return Ok(0);
    };

    let (mut min, mut max) = (first, first);
    for (offset, len) in lens.enumerate() {
        if policy == MissingValuePolicy::Fail && len != first {
            return RaggedSeriesSnafu {
                index: offset + 1,
                len,
                expected: first,
            }
            .fail();
        }
        min = min.min(len);
        max = max.max(len);
    }

    if min != max {
        warn!("{what} lengths range from {min} to {max}; padding short {what} with NaN");
    }
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BlockError;
    use crate::test_util::ts;

    #[test]
    fn cursor_requires_next_before_position() {
        let mut c = Cursor::new(2);
        assert_eq!(
            c.position().unwrap_err(),
            BlockError::InvalidIteratorState {
                position: None,
                len: 2
            }
        );

        assert!(c.advance());
        assert_eq!(c.position().unwrap(), 0);
        assert!(c.advance());
        assert_eq!(c.position().unwrap(), 1);
        assert!(!c.advance());
        assert!(c.position().is_err());
        assert!(!c.advance());
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn empty_cursor_never_yields() {
        let mut c = Cursor::new(0);
        assert!(!c.advance());
        assert!(c.position().is_err());
    }

    #[test]
    fn aligned_len_pads_or_fails() {
        assert_eq!(aligned_len([], MissingValuePolicy::Fail, "series").unwrap(), 0);
        assert_eq!(aligned_len([3, 1, 4], MissingValuePolicy::Pad, "series").unwrap(), 4);
        assert_eq!(aligned_len([2, 2], MissingValuePolicy::Fail, "series").unwrap(), 2);

        assert_eq!(
            aligned_len([2, 2, 1], MissingValuePolicy::Fail, "columns").unwrap_err(),
            BlockError::RaggedSeries {
                index: 2,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn step_into_owned_keeps_values() {
        let data = [1.0, 2.0];
        let step = Step::new(ts(60), &data[..]).into_owned();
        assert_eq!(step.time(), ts(60));
        assert_eq!(step.values(), &[1.0, 2.0]);
    }
}
