//! A block view over fetched, row-oriented series.
//!
//! [`MultiSeriesBlock`] shares the fetched [`SeriesList`] instead of copying
//! it. Step iteration transposes on the fly: each `current()` reads one value
//! from every series, O(series) per step and no memory beyond the returned
//! step. Series iteration copies one series per `current()`.

use std::sync::Arc;

use log::debug;
use snafu::prelude::*;

use crate::{
    block::{Block, Cursor, SeriesIter, Step, StepIter, aligned_len},
    bounds::Bounds,
    coverage::StepCoverage,
    error::{ExceedsBoundsSnafu, ResolutionMismatchSnafu, Result, StartMismatchSnafu},
    fetch::FetchQuery,
    metadata::{Metadata, SeriesMeta},
    options::{BlockOptions, MISSING_VALUE},
    series::{Series, SeriesList},
};

/// Lazily transposed block over a shared [`SeriesList`].
///
/// The step count is the length of the longest series. Under
/// [`MissingValuePolicy::Pad`](crate::MissingValuePolicy::Pad) shorter series
/// read as `NaN` past their end; under `Fail` construction rejects unequal
/// lengths.
#[derive(Debug)]
pub struct MultiSeriesBlock {
    series: Option<Arc<SeriesList>>,
    meta: Metadata,
    series_meta: Vec<SeriesMeta>,
    steps: usize,
}

impl MultiSeriesBlock {
    /// Build a block for `query` over `series`.
    ///
    /// The block's bounds take the query's start and end and the series' common
    /// resolution (the query's step when there are no series).
    ///
    /// # Errors
    /// Fails with `ResolutionMismatch` when the series disagree on their
    /// resolution, and as [`MultiSeriesBlock::with_bounds`] does.
    pub fn new(
        series: Arc<SeriesList>,
        query: &FetchQuery,
        options: &BlockOptions,
    ) -> Result<Self> {
        let bounds = query.block_bounds(&series)?;
        Self::with_bounds(series, bounds, options)
    }

    /// Build a block over `series` with explicit bounds.
    ///
    /// # Errors
    /// - `ResolutionMismatch` if any series' resolution differs from the step
    ///   of `bounds`.
    /// - `StartMismatch` if any series' bounds start elsewhere than `bounds`;
    ///   values are positional, so they must share step 0.
    /// - `RaggedSeries` if lengths differ under the `Fail` policy.
    /// - `ExceedsBounds` if a series has more values than `bounds` has steps.
    pub fn with_bounds(
        series: Arc<SeriesList>,
        bounds: Bounds,
        options: &BlockOptions,
    ) -> Result<Self> {
        let step = bounds.step_size();
        for (index, s) in series.iter().enumerate() {
            ensure!(
                s.resolution() == step,
                ResolutionMismatchSnafu {
                    index,
                    expected: step,
                    found: s.resolution(),
                }
            );
            ensure!(
                s.bounds().start() == bounds.start(),
                StartMismatchSnafu {
                    index,
                    expected: bounds.start(),
                    found: s.bounds().start(),
                }
            );
        }

        let lens = series.iter().map(Series::len);
        let steps = aligned_len(lens, options.missing_values, "series")?;
        let capacity = bounds.steps();
        ensure!(
            steps <= capacity,
            ExceedsBoundsSnafu {
                len: steps,
                capacity,
            }
        );

        let meta = Metadata::new(bounds).with_tags(series.common_tags());
        let series_meta = series
            .iter()
            .map(|s| SeriesMeta::new(s.tags().clone()))
            .collect();

        debug!(
            "Built multi-series block: {} series x {} steps over {}",
            series.len(),
            steps,
            bounds
        );

        Ok(Self {
            series: Some(series),
            meta,
            series_meta,
            steps,
        })
    }

    /// Number of steps the iterators yield.
    pub fn steps(&self) -> usize {
        if self.series.is_some() { self.steps } else { 0 }
    }

    /// Number of series in the block.
    pub fn num_series(&self) -> usize {
        self.series_meta.len()
    }

    /// Which steps of the block's bounds series `index` has values for.
    /// `None` if there is no such series or the block is closed.
    pub fn series_coverage(&self, index: usize) -> Option<StepCoverage> {
        let series = self.series.as_deref()?.get(index)?;
        let steps = u32::try_from(self.meta.bounds.steps()).unwrap_or(u32::MAX);
        Some(StepCoverage::from_values(series.values(), steps))
    }

    fn live_series(&self) -> &[Series] {
        match self.series.as_deref() {
            Some(list) => list.as_slice(),
            None => &[],
        }
    }
}

impl Block for MultiSeriesBlock {
    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn step_iter(&self) -> Box<dyn StepIter + '_> {
        Box::new(MultiSeriesStepIter {
            series: self.live_series(),
            bounds: self.meta.bounds,
            cursor: Cursor::new(self.steps()),
        })
    }

    fn series_iter(&self) -> Result<Box<dyn SeriesIter + '_>> {
        let series = self.live_series();
        Ok(Box::new(MultiSeriesSeriesIter {
            series,
            bounds: self.meta.bounds,
            steps: self.steps(),
            cursor: Cursor::new(series.len()),
        }))
    }

    fn series_meta(&self) -> &[SeriesMeta] {
        &self.series_meta
    }

    fn close(&mut self) -> Result<()> {
        if self.series.take().is_some() {
            debug!("Closed multi-series block over {}", self.meta.bounds);
        }
        Ok(())
    }
}

/// Step iterator of a [`MultiSeriesBlock`].
#[derive(Debug)]
pub struct MultiSeriesStepIter<'a> {
    series: &'a [Series],
    bounds: Bounds,
    cursor: Cursor,
}

impl StepIter for MultiSeriesStepIter<'_> {
    fn next(&mut self) -> bool {
        self.cursor.advance()
    }

    fn try_current(&self) -> Result<Step<'_>> {
        let index = self.cursor.position()?;
        let time = self.bounds.time_at_step(index)?;
        let values: Vec<f64> = self
            .series
            .iter()
            .map(|s| s.get(index).unwrap_or(MISSING_VALUE))
            .collect();
        Ok(Step::new(time, values))
    }

    fn len(&self) -> usize {
        self.cursor.len()
    }
}

/// Series iterator of a [`MultiSeriesBlock`].
#[derive(Debug)]
pub struct MultiSeriesSeriesIter<'a> {
    series: &'a [Series],
    bounds: Bounds,
    steps: usize,
    cursor: Cursor,
}

impl SeriesIter for MultiSeriesSeriesIter<'_> {
    fn next(&mut self) -> bool {
        self.cursor.advance()
    }

    fn try_current(&self) -> Result<Series> {
        let index = self.cursor.position()?;
        let source = &self.series[index];

        let mut values = source.values().to_vec();
        values.resize(self.steps, MISSING_VALUE);
        Ok(Series::from_parts(values, self.bounds, source.tags().clone()))
    }

    fn len(&self) -> usize {
        self.cursor.len()
    }
}
