//! Fetch boundary: the query a fetch answers, the row-oriented result the
//! storage layer hands back, and the conversion into a block result.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::debug;

use crate::{
    block::{BlockResult, MultiSeriesBlock},
    bounds::Bounds,
    error::Result,
    options::BlockOptions,
    series::SeriesList,
};

/// Requested time range and step of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchQuery {
    requested: Bounds,
}

impl FetchQuery {
    /// Validate a query over `[start, end]` at `step`.
    ///
    /// `step` accepts a [`Duration`] or a parsed [`StepSize`](crate::StepSize).
    ///
    /// # Errors
    /// Returns [`BlockError::InvalidBounds`](crate::BlockError::InvalidBounds)
    /// when the range is inverted or the step is not positive.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: impl Into<Duration>,
    ) -> Result<Self> {
        let requested = Bounds::new(start, end, step.into())?;
        Ok(Self { requested })
    }

    /// Requested start.
    pub fn start(&self) -> DateTime<Utc> {
        self.requested.start()
    }

    /// Requested end.
    pub fn end(&self) -> DateTime<Utc> {
        self.requested.end()
    }

    /// Requested step.
    pub fn step(&self) -> Duration {
        self.requested.step_size()
    }

    /// The requested range as bounds.
    pub fn bounds(&self) -> Bounds {
        self.requested
    }

    /// Bounds of the block built for `series`: the query's start and end at
    /// the series' common resolution. An empty list keeps the query's step.
    ///
    /// # Errors
    /// Propagates [`SeriesList::resolution`] errors unchanged.
    pub fn block_bounds(&self, series: &SeriesList) -> Result<Bounds> {
        let resolution = series.resolution()?;
        if series.is_empty() {
            return Ok(self.requested);
        }

        if resolution != self.step() {
            debug!(
                "Series resolution {} differs from requested step {}; using the series resolution",
                resolution,
                self.step()
            );
        }
        Bounds::new(self.start(), self.end(), resolution)
    }
}

/// Row-oriented series returned by the storage layer for one query.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    /// The fetched series, shared with any block built over them.
    pub series_list: Arc<SeriesList>,
}

impl FetchResult {
    /// Wrap a fetched list.
    pub fn new(series_list: SeriesList) -> Self {
        Self {
            series_list: Arc::new(series_list),
        }
    }
}

impl From<SeriesList> for FetchResult {
    fn from(series_list: SeriesList) -> Self {
        Self::new(series_list)
    }
}

/// Convert a fetch result into a block result holding exactly one
/// [`MultiSeriesBlock`].
///
/// The series list is shared, never copied or mutated, so independent queries
/// may convert concurrently.
///
/// # Errors
/// - `ResolutionMismatch` if the series disagree on their resolution.
/// - `StartMismatch` if a series' bounds do not start at the query's start.
/// - `RaggedSeries` if lengths differ under the `Fail` policy.
/// - `ExceedsBounds` if a series runs past the query's range at the
///   reconciled resolution.
pub fn fetch_result_to_block_result(
    result: &FetchResult,
    query: &FetchQuery,
    options: &BlockOptions,
) -> Result<BlockResult> {
    let block = MultiSeriesBlock::new(Arc::clone(&result.series_list), query, options)?;
    Ok(BlockResult {
        blocks: vec![Box::new(block)],
    })
}
