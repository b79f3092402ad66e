//! Stable block identifier.
//!
//! [`BlockId`] is what callers hold on to. The backing petgraph storage uses
//! its own `NodeIndex`; [`BlockGraph`](crate::graph::BlockGraph) keeps the
//! mapping between the two so ids stay stable even when callers pick them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable block identifier, unique for the block's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for BlockId {
    fn from(raw: u32) -> Self {
        BlockId(raw)
    }
}
