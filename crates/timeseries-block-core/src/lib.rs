//! Block layer of a time-series query path.
//!
//! This crate turns row-oriented series fetched from storage into time-aligned
//! blocks that query operators can traverse in either order:
//!
//! - Time grids and step arithmetic (`bounds` module), including
//!   human-friendly step specs such as `"15m"`.
//! - Per-identity series and the fetched series list (`series` module).
//! - The `Block` contract with step-wise and series-wise iterators, a lazily
//!   transposed view over fetched series, and an eagerly transposed columnar
//!   block with its append-only builder (`block` module).
//! - Conversion from a fetch result into a block result (`fetch` module).
//! - RoaringBitmap-based step coverage for reasoning about gaps
//!   (`coverage` module).
//! - The operator boundary of the execution engine (`transform` module).
//!
//! Everything here is in-memory and synchronous. Blocks are immutable once
//! built and may be read from many threads at once.
#![deny(missing_docs)]
pub mod block;
pub mod bounds;
pub mod coverage;
pub mod error;
pub mod fetch;
pub mod metadata;
pub mod options;
pub mod series;
pub mod transform;

#[cfg(test)]
mod test_util;

pub use block::{
    Block, BlockResult, ColumnBlock, ColumnBlockBuilder, MultiSeriesBlock, SeriesIter, Step,
    StepIter,
};
pub use bounds::{Bounds, ParseStepSizeError, StepSize};
pub use coverage::StepCoverage;
pub use error::{BlockError, Result};
pub use fetch::{FetchQuery, FetchResult, fetch_result_to_block_result};
pub use metadata::{Metadata, SeriesMeta, Tags};
pub use options::{BlockOptions, MISSING_VALUE, MissingValuePolicy, ParsePolicyError};
pub use series::{Series, SeriesList};
pub use transform::{NodeId, OpNode, TransformOptions, process_all};
