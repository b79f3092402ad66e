//! Edge types of the block graph.
//!
//! A link slot pair is one directed edge, owner to dependent. Because both
//! ends of a pair are read from the same edge, a half-set link cannot be
//! represented.

use serde::{Deserialize, Serialize};

use crate::id::BlockId;
use crate::kind::Port;

/// Edge weight in the block graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Link {
    /// `source.next = target`, `target.last = source`.
    Next,
    /// `source.child = target`, `target.parent = source`.
    Child,
}

impl Link {
    /// The edge that stores `port`, and whether the port's owner is the edge
    /// source (`true`) or target (`false`).
    pub fn for_port(port: Port) -> (Link, bool) {
        match port {
            Port::Next => (Link::Next, true),
            Port::Last => (Link::Next, false),
            Port::Child => (Link::Child, true),
            Port::Parent => (Link::Child, false),
        }
    }

    /// Port as seen from the edge source.
    pub fn owner_port(self) -> Port {
        match self {
            Link::Next => Port::Next,
            Link::Child => Port::Child,
        }
    }
}

/// What a successful `link` did beyond writing the requested edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkOutcome {
    /// Block pushed out of the slot and re-attached at the tail of the new
    /// dependent's chain.
    pub relocated: Option<BlockId>,
    /// Block pushed out of the slot that no chain tail could accept; it is
    /// left as a root where it was drawn.
    pub orphaned: Option<BlockId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_map_to_edges() {
        assert_eq!(Link::for_port(Port::Next), (Link::Next, true));
        assert_eq!(Link::for_port(Port::Last), (Link::Next, false));
        assert_eq!(Link::for_port(Port::Child), (Link::Child, true));
        assert_eq!(Link::for_port(Port::Parent), (Link::Child, false));
    }

    #[test]
    fn owner_port_round_trips_through_for_port() {
        for link in [Link::Next, Link::Child] {
            assert_eq!(Link::for_port(link.owner_port()), (link, true));
            assert_eq!(Link::for_port(link.owner_port().reverse()), (link, false));
        }
    }
}
