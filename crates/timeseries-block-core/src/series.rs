//! Per-identity series and the row-oriented series list a fetch produces.

use chrono::{DateTime, Duration, Utc};
use snafu::prelude::*;

use crate::{
    bounds::Bounds,
    coverage::StepCoverage,
    error::{
        ExceedsBoundsSnafu, IndexOutOfRangeSnafu, ResolutionMismatchSnafu, Result,
        TimeOutOfBoundsSnafu,
    },
    metadata::Tags,
};

/// One identity's values over a [`Bounds`], one value per step from the start.
///
/// A series may hold fewer values than its bounds have steps (tail gaps);
/// lookups past the last value fail rather than invent data.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    values: Vec<f64>,
    bounds: Bounds,
    tags: Tags,
}

impl Series {
    /// Create an untagged series.
    ///
    /// # Errors
    /// Returns [`BlockError::ExceedsBounds`](crate::BlockError::ExceedsBounds)
    /// if there are more values than `bounds` has steps.
    pub fn new(values: Vec<f64>, bounds: Bounds) -> Result<Self> {
        let capacity = bounds.steps();
        ensure!(
            values.len() <= capacity,
            ExceedsBoundsSnafu {
                len: values.len(),
                capacity,
            }
        );
        Ok(Self {
            values,
            bounds,
            tags: Tags::new(),
        })
    }

    /// Attach tags to the series.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// The values, in step order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bounds of the series.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Tags of the series.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Sampling interval implied by the series' bounds.
    pub fn resolution(&self) -> Duration {
        self.bounds.step_size()
    }

    /// Value at step `index`, or `None` past the last value.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied()
    }

    /// Value at step `index`.
    ///
    /// # Errors
    /// Returns [`BlockError::IndexOutOfRange`](crate::BlockError::IndexOutOfRange)
    /// if `index >= len()`.
    pub fn value_at_step(&self, index: usize) -> Result<f64> {
        self.get(index).context(IndexOutOfRangeSnafu {
            index,
            len: self.values.len(),
        })
    }

    /// Value at the step containing `t`.
    ///
    /// # Errors
    /// Returns [`BlockError::TimeOutOfBounds`](crate::BlockError::TimeOutOfBounds)
    /// if `t` lies outside the bounds or resolves to a step past the last value.
    pub fn value_at_time(&self, t: DateTime<Utc>) -> Result<f64> {
        let step = self.bounds.step_at_time(t)?;
        self.get(step).context(TimeOutOfBoundsSnafu {
            time: t,
            bounds: self.bounds,
        })
    }

    /// Which steps of the bounds hold a real value.
    pub fn coverage(&self) -> StepCoverage {
        let steps = u32::try_from(self.bounds.steps()).unwrap_or(u32::MAX);
        StepCoverage::from_values(&self.values, steps)
    }

    pub(crate) fn from_parts(values: Vec<f64>, bounds: Bounds, tags: Tags) -> Self {
        Self {
            values,
            bounds,
            tags,
        }
    }
}

/// Ordered series produced by one fetch.
///
/// Series need not share a resolution when fetched; [`SeriesList::resolution`]
/// checks that they do before a block is built over them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesList {
    series: Vec<Series>,
}

impl SeriesList {
    /// Wrap `series`, keeping their order.
    pub fn new(series: Vec<Series>) -> Self {
        Self { series }
    }

    /// Number of series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the list holds no series.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series at position `index`.
    pub fn get(&self, index: usize) -> Option<&Series> {
        self.series.get(index)
    }

    /// Iterate series in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Series> {
        self.series.iter()
    }

    /// Borrow the series as a slice.
    pub fn as_slice(&self) -> &[Series] {
        &self.series
    }

    /// Length of the longest series, 0 for an empty list.
    pub fn max_len(&self) -> usize {
        self.series.iter().map(Series::len).max().unwrap_or(0)
    }

    /// Common sampling interval of every series.
    ///
    /// An empty list has a zero resolution.
    ///
    /// # Errors
    /// Returns [`BlockError::ResolutionMismatch`](crate::BlockError::ResolutionMismatch)
    /// naming the first series whose resolution differs from the first one.
    pub fn resolution(&self) -> Result<Duration> {
        let Some(first) = self.series.first() else {
            return Ok(Duration::zero());
        };
        let expected = first.resolution();

        for (index, series) in self.series.iter().enumerate().skip(1) {
            let found = series.resolution();
            ensure!(
                found == expected,
                ResolutionMismatchSnafu {
                    index,
                    expected,
                    found,
                }
            );
        }

        Ok(expected)
    }

    /// Tags shared with the same value by every series; empty for an empty list.
    pub fn common_tags(&self) -> Tags {
        let mut iter = self.series.iter();
        let Some(first) = iter.next() else {
            return Tags::new();
        };
        iter.fold(first.tags().clone(), |acc, s| acc.intersect(s.tags()))
    }
}

impl FromIterator<Series> for SeriesList {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SeriesList {
    type Item = &'a Series;
    type IntoIter = std::slice::Iter<'a, Series>;

    fn into_iter(self) -> Self::IntoIter {
        self.series.iter()
    }
}
