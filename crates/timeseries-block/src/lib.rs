//! # timeseries-block
//!
//! Time-aligned blocks over fetched time series, readable step by step or
//! series by series.
//!
//! This crate is the supported public entry point and provides a small, stable surface.
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use timeseries_block::prelude::*;
//!
//! let start = Utc.timestamp_opt(0, 0).unwrap();
//! let end = start + Duration::minutes(3);
//! let bounds = Bounds::new(start, end, Duration::minutes(1)).unwrap();
//!
//! let fetched = FetchResult::from(SeriesList::new(vec![
//!     Series::new(vec![1.0, 2.0, 3.0], bounds).unwrap(),
//!     Series::new(vec![10.0, 20.0, 30.0], bounds).unwrap(),
//! ]));
//! let query = FetchQuery::new(start, end, "1m".parse::<StepSize>().unwrap()).unwrap();
//!
//! let result = fetch_result_to_block_result(&fetched, &query, &BlockOptions::default()).unwrap();
//! let mut steps = result.blocks[0].step_iter();
//! assert!(steps.next());
//! assert_eq!(steps.current().values(), &[1.0, 10.0]);
//! ```

/// Convenience prelude with the stable, supported surface.
pub mod prelude;

/// Coverage namespace (wrapper-only).
pub mod coverage {
    pub use timeseries_block_core::coverage::StepCoverage;
}

/// Operator boundary of the execution engine.
pub mod transform {
    pub use timeseries_block_core::transform::{NodeId, OpNode, TransformOptions, process_all};
}

pub use timeseries_block_core::block::{
    Block, BlockResult, ColumnBlock, ColumnBlockBuilder, MultiSeriesBlock, SeriesIter, Step,
    StepIter,
};
pub use timeseries_block_core::bounds::{Bounds, ParseStepSizeError, StepSize};
pub use timeseries_block_core::error::{BlockError, Result};
pub use timeseries_block_core::fetch::{FetchQuery, FetchResult, fetch_result_to_block_result};
pub use timeseries_block_core::metadata::{Metadata, SeriesMeta, Tags};
pub use timeseries_block_core::options::{
    BlockOptions, MISSING_VALUE, MissingValuePolicy, ParsePolicyError,
};
pub use timeseries_block_core::series::{Series, SeriesList};
