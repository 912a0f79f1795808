//! Wrapper prelude.
//!
//! The `timeseries-block` crate is the supported public entry point.
//! Downstream code should prefer importing from this prelude instead of
//! depending on internal core module paths.

pub use crate::coverage;
pub use crate::transform::{NodeId, OpNode, TransformOptions};
pub use crate::{
    Block, BlockError, BlockOptions, BlockResult, Bounds, ColumnBlock, ColumnBlockBuilder,
    FetchQuery, FetchResult, Metadata, MissingValuePolicy, MultiSeriesBlock, Series, SeriesIter,
    SeriesList, SeriesMeta, Step, StepIter, StepSize, Tags, fetch_result_to_block_result,
};
