//! Notifications for the presentation layer.
//!
//! The graph never calls into rendering code. It queues [`GraphEvent`]s and the
//! presentation layer drains them with
//! [`BlockGraph::take_events`](crate::graph::BlockGraph::take_events) after each
//! operation.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Size};
use crate::id::BlockId;
use crate::kind::{BlockKind, Port};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GraphEvent {
    Created {
        id: BlockId,
        kind: BlockKind,
    },
    Destroyed {
        id: BlockId,
    },
    /// `owner[port] = target` now holds (reported from the owner side).
    Linked {
        owner: BlockId,
        port: Port,
        target: BlockId,
    },
    Unlinked {
        owner: BlockId,
        port: Port,
        target: BlockId,
    },
    OffsetChanged {
        id: BlockId,
        offset: Point,
    },
    ContentChanged {
        id: BlockId,
    },
    /// The size-fit cascade changed a block's fitted box.
    Resized {
        id: BlockId,
        size: Size,
        container: Size,
    },
    /// A drag's pending snap target changed; `None` clears the highlight.
    Highlight {
        dragged: BlockId,
        target: Option<BlockId>,
        port: Option<Port>,
    },
}
