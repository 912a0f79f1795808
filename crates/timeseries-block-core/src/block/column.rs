//! Eagerly transposed, columnar block.
//!
//! [`ColumnBlockBuilder`] collects values one column per series, appended in
//! step order. [`ColumnBlockBuilder::build`] consumes the builder and lays the
//! values out step-major in one contiguous buffer, so stepping through a
//! [`ColumnBlock`] hands out borrowed slices in O(1).
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use timeseries_block_core::{Block, Bounds, ColumnBlockBuilder, Metadata, StepIter};
//!
//! let start = Utc.timestamp_opt(0, 0).unwrap();
//! let bounds = Bounds::new(start, start + Duration::hours(2), Duration::hours(1)).unwrap();
//!
//! let mut builder = ColumnBlockBuilder::new(Metadata::new(bounds));
//! builder.add_cols(2);
//! builder.append_value(0, 10.0).unwrap();
//! builder.append_value(1, 20.0).unwrap();
//! builder.append_value(0, 11.0).unwrap();
//! let block = builder.build().unwrap();
//!
//! let mut steps = block.step_iter();
//! assert_eq!(steps.len(), 2);
//! assert!(steps.next());
//! assert_eq!(steps.current().values(), &[10.0, 20.0]);
//! ```

use log::debug;
use snafu::prelude::*;

use crate::{
    block::{Block, Cursor, SeriesIter, Step, StepIter, aligned_len},
    error::{
        ExceedsBoundsSnafu, IndexOutOfRangeSnafu, Result, SeriesMetaMismatchSnafu,
        UnsupportedSnafu,
    },
    metadata::{Metadata, SeriesMeta},
    options::{BlockOptions, MISSING_VALUE},
};

#[derive(Debug, Clone, Default)]
struct Column {
    values: Vec<f64>,
}

/// Append-only builder for a [`ColumnBlock`].
///
/// Single writer: share it across threads only behind external
/// synchronization.
#[derive(Debug)]
pub struct ColumnBlockBuilder {
    meta: Metadata,
    columns: Vec<Column>,
    series_meta: Option<Vec<SeriesMeta>>,
    options: BlockOptions,
}

impl ColumnBlockBuilder {
    /// A builder with no columns.
    pub fn new(meta: Metadata) -> Self {
        Self {
            meta,
            columns: Vec::new(),
            series_meta: None,
            options: BlockOptions::default(),
        }
    }

    /// Use `options` when building.
    pub fn with_options(mut self, options: BlockOptions) -> Self {
        self.options = options;
        self
    }

    /// Per-series metadata for the built block, one entry per column.
    /// Without it every series gets empty tags.
    pub fn with_series_meta(mut self, series_meta: Vec<SeriesMeta>) -> Self {
        self.series_meta = Some(series_meta);
        self
    }

    /// Append `num` empty columns. Existing columns keep their indices.
    ///
    /// # Panics
    /// Panics if the column count would overflow `usize`, like
    /// [`Vec::resize_with`] past its capacity limit.
    pub fn add_cols(&mut self, num: usize) {
        let Some(width) = self.columns.len().checked_add(num) else {
            panic!(
                "adding {num} columns to {} overflows the column count",
                self.columns.len()
            );
        };
        self.columns.resize_with(width, Column::default);
    }

    /// Number of columns added so far.
    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    /// Number of values appended to column `index`.
    pub fn column_len(&self, index: usize) -> Option<usize> {
        self.columns.get(index).map(|c| c.values.len())
    }

    /// Append `value` to column `index`.
    ///
    /// # Errors
    /// Returns [`BlockError::IndexOutOfRange`](crate::BlockError::IndexOutOfRange)
    /// if the column has not been added; the builder is left unchanged.
    pub fn append_value(&mut self, index: usize, value: f64) -> Result<()> {
        let len = self.columns.len();
        let column = self
            .columns
            .get_mut(index)
            .context(IndexOutOfRangeSnafu { index, len })?;
        column.values.push(value);
        Ok(())
    }

    /// Freeze the columns into an immutable block.
    ///
    /// The step count is the longest column; shorter columns read as `NaN`
    /// past their end under the `Pad` policy.
    ///
    /// # Errors
    /// - `RaggedSeries` if column lengths differ under the `Fail` policy.
    /// - `ExceedsBounds` if a column has more values than the bounds have steps.
    /// - `SeriesMetaMismatch` if series metadata was supplied for a different
    ///   number of columns.
    pub fn build(self) -> Result<ColumnBlock> {
        let width = self.columns.len();
        let lens = self.columns.iter().map(|c| c.values.len());
        let steps = aligned_len(lens, self.options.missing_values, "columns")?;

        let capacity = self.meta.bounds.steps();
        ensure!(
            steps <= capacity,
            ExceedsBoundsSnafu {
                len: steps,
                capacity,
            }
        );

        let series_meta = match self.series_meta {
            Some(series_meta) => {
                ensure!(
                    series_meta.len() == width,
                    SeriesMetaMismatchSnafu {
                        expected: width,
                        found: series_meta.len(),
                    }
                );
                series_meta
            }
            None => vec![SeriesMeta::default(); width],
        };

        let mut data = vec![MISSING_VALUE; steps * width];
        for (col, column) in self.columns.iter().enumerate() {
            for (step, value) in column.values.iter().enumerate() {
                data[step * width + col] = *value;
            }
        }

        debug!(
            "Built column block: {} series x {} steps over {}",
            width, steps, self.meta.bounds
        );

        Ok(ColumnBlock {
            meta: self.meta,
            series_meta,
            width,
            steps,
            data,
        })
    }
}

/// Immutable block stored step-major.
///
/// Series-wise iteration is not offered; [`Block::series_iter`] returns
/// [`BlockError::Unsupported`](crate::BlockError::Unsupported).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnBlock {
    meta: Metadata,
    series_meta: Vec<SeriesMeta>,
    width: usize,
    steps: usize,
    data: Vec<f64>,
}

impl ColumnBlock {
    /// Copy any block into columnar form, keeping its metadata and series order.
    ///
    /// # Errors
    /// Propagates iteration errors from `block` and build errors under
    /// `options`; a step whose width differs from the series count fails with
    /// `IndexOutOfRange`.
    pub fn from_block(block: &dyn Block, options: &BlockOptions) -> Result<Self> {
        let series_meta = block.series_meta().to_vec();
        let width = series_meta.len();

        let mut builder = ColumnBlockBuilder::new(block.meta().clone())
            .with_options(*options)
            .with_series_meta(series_meta);
        builder.add_cols(width);

        let mut steps = block.step_iter();
        while steps.next() {
            let step = steps.try_current()?;
            for (index, value) in step.values().iter().enumerate() {
                builder.append_value(index, *value)?;
            }
        }

        builder.build()
    }

    /// Number of steps.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of series.
    pub fn num_series(&self) -> usize {
        self.width
    }

    /// Values of step `index`, one per series.
    pub fn step_values(&self, index: usize) -> Option<&[f64]> {
        if index >= self.steps {
            return None;
        }
        let start = index * self.width;
        self.data.get(start..start + self.width)
    }
}

impl Block for ColumnBlock {
    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn step_iter(&self) -> Box<dyn StepIter + '_> {
        Box::new(ColumnStepIter {
            block: self,
            cursor: Cursor::new(self.steps),
        })
    }

    fn series_iter(&self) -> Result<Box<dyn SeriesIter + '_>> {
        UnsupportedSnafu {
            operation: "series_iter",
            block: "column",
        }
        .fail()
    }

    fn series_meta(&self) -> &[SeriesMeta] {
        &self.series_meta
    }

    fn close(&mut self) -> Result<()> {
        if !self.data.is_empty() || self.steps > 0 {
            debug!("Closed column block over {}", self.meta.bounds);
        }
        self.data = Vec::new();
        self.steps = 0;
        Ok(())
    }
}

/// Step iterator of a [`ColumnBlock`].
#[derive(Debug)]
pub struct ColumnStepIter<'a> {
    block: &'a ColumnBlock,
    cursor: Cursor,
}

impl StepIter for ColumnStepIter<'_> {
    fn next(&mut self) -> bool {
        self.cursor.advance()
    }

    fn try_current(&self) -> Result<Step<'_>> {
        let index = self.cursor.position()?;
        let time = self.block.meta.bounds.time_at_step(index)?;
        let values = self
            .block
            .step_values(index)
            .context(IndexOutOfRangeSnafu {
                index,
                len: self.block.steps,
            })?;
        Ok(Step::new(time, values))
    }

    fn len(&self) -> usize {
        self.cursor.len()
    }
}
