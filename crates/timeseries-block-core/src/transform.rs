//! Boundary to the execution engine's operators.
//!
//! Operators receive blocks through [`OpNode::process`] and pick whichever
//! iteration order suits them. Nothing in this crate schedules operators.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    block::{Block, BlockResult},
    error::Result,
};

/// Identifier of the node that produced a block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub String);

impl NodeId {
    /// Wrap a node name.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Options shared by every operator of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Evaluation time of the query.
    pub now: DateTime<Utc>,
}

impl TransformOptions {
    /// Options evaluated at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

/// An operator in the execution pipeline.
pub trait OpNode {
    /// Consume `block`, produced by the node `id`.
    ///
    /// The block is borrowed; an operator that needs to keep data beyond the
    /// call copies it, e.g. through
    /// [`ColumnBlock::from_block`](crate::ColumnBlock::from_block).
    fn process(&mut self, id: &NodeId, block: &dyn Block) -> Result<()>;
}

/// Feed every block of `result` to `node` in order, stopping at the first error.
pub fn process_all(node: &mut dyn OpNode, id: &NodeId, result: &BlockResult) -> Result<()> {
    for block in &result.blocks {
        node.process(id, block.as_ref())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::block::{MultiSeriesBlock, StepIter};
    use crate::error::{BlockError, UnsupportedSnafu};
    use crate::options::BlockOptions;
    use crate::test_util::{hourly_bounds, hourly_list};

    #[derive(Default)]
    struct StepSum {
        sums: Vec<f64>,
        calls: Vec<NodeId>,
    }

    impl OpNode for StepSum {
        fn process(&mut self, id: &NodeId, block: &dyn Block) -> Result<()> {
            self.calls.push(id.clone());
            let mut steps = block.step_iter();
            while steps.next() {
                self.sums.push(steps.try_current()?.values().iter().sum());
            }
            Ok(())
        }
    }

    struct Rejecting;

    impl OpNode for Rejecting {
        fn process(&mut self, _id: &NodeId, _block: &dyn Block) -> Result<()> {
            UnsupportedSnafu {
                operation: "process",
                block: "any",
            }
            .fail()
        }
    }

    fn result(blocks: usize) -> BlockResult {
        let list = Arc::new(hourly_list(&[&[1.0, 2.0], &[10.0, 20.0]]));
        let blocks = (0..blocks)
            .map(|_| {
                let b = MultiSeriesBlock::with_bounds(
                    Arc::clone(&list),
                    hourly_bounds(2),
                    &BlockOptions::default(),
                )
                .unwrap();
                Box::new(b) as Box<dyn Block>
            })
            .collect();
        BlockResult { blocks }
    }

    #[test]
    fn process_all_visits_blocks_in_order() {
        let mut node = StepSum::default();
        process_all(&mut node, &NodeId::from("fetch"), &result(2)).unwrap();

        assert_eq!(node.sums, vec![11.0, 22.0, 11.0, 22.0]);
        assert_eq!(node.calls.len(), 2);
        assert_eq!(node.calls[0].to_string(), "fetch");
    }

    #[test]
    fn process_all_stops_at_first_error() {
        let err = process_all(&mut Rejecting, &NodeId::new("x"), &result(3)).unwrap_err();
        assert!(matches!(err, BlockError::Unsupported { .. }));
    }
}
