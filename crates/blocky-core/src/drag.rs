//! Drag controller: pointer lifecycle to link operations.
//!
//! One pointer drives at most one drag at a time:
//!
//! - `pointer_down` detaches the block from its `last`/`parent`, snapshots
//!   the compatible candidates and their rectangles, and captures the
//!   attraction distance
//! - `pointer_move` places the block under the pointer and re-queries the
//!   matcher, emitting `Highlight` when the pending target changes
//! - `pointer_up` or `cancel` ends the drag exactly once, committing the
//!   pending link if there is one
//!
//! Rectangles are not re-measured during a drag. A structural change in the
//! graph (tracked through [`BlockGraph::revision`]) or an explicit
//! [`refresh`](DragController::refresh) recomputes the candidate set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::BlockyError;
use crate::event::GraphEvent;
use crate::geometry::{Point, Rect, Size, Vector};
use crate::graph::BlockGraph;
use crate::id::BlockId;
use crate::kind::{BlockKind, Port};
use crate::layout::RectCache;
use crate::link::LinkOutcome;
use crate::matcher::{self, Match};

/// Lifecycle phase of one controller dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    PointerDown,
    PointerMove,
    PointerUp,
    Cancel,
    Refresh,
}

/// Why an incoming pointer signal did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragIgnoredReason {
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    Disabled,
    NotDraggable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DragOutcome {
    Started {
        block: BlockId,
        candidates: usize,
    },
    Moved {
        position: Point,
        pending: Option<Match>,
    },
    /// The drag ended on a pending match and the link was made.
    Committed {
        link: Match,
        result: LinkOutcome,
    },
    /// The drag ended with no match; the block stays where it was dropped.
    Dropped {
        block: BlockId,
        position: Point,
    },
    Refreshed {
        candidates: usize,
    },
    Ignored {
        reason: DragIgnoredReason,
    },
}

/// Result of one controller dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragDispatch {
    pub phase: DragPhase,
    pub pointer_id: Option<u32>,
    pub outcome: DragOutcome,
}

impl DragDispatch {
    fn ignored(phase: DragPhase, pointer_id: Option<u32>, reason: DragIgnoredReason) -> Self {
        Self {
            phase,
            pointer_id,
            outcome: DragOutcome::Ignored { reason },
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.outcome, DragOutcome::Ignored { .. })
    }
}

/// State of the drag in progress.
#[derive(Debug, Clone)]
pub struct DragSession {
    pointer_id: u32,
    block: BlockId,
    /// Pointer position relative to the block origin at pointer-down.
    grab: Vector,
    size: Size,
    threshold: f64,
    candidates: Vec<BlockId>,
    rects: RectCache,
    revision: u64,
    pending: Option<Match>,
}

impl DragSession {
    pub fn pointer_id(&self) -> u32 {
        self.pointer_id
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn candidates(&self) -> &[BlockId] {
        &self.candidates
    }

    pub fn pending(&self) -> Option<&Match> {
        self.pending.as_ref()
    }

    fn recompute(&mut self, graph: &BlockGraph) {
        self.candidates = candidates_for(graph, self.block);
        self.rects = RectCache::capture(graph, self.candidates.iter().copied());
        self.revision = graph.revision();
        tracing::debug!(
            block = %self.block,
            candidates = self.candidates.len(),
            "drag candidates recomputed"
        );
    }
}

/// Blocks `block` could connect to: kinds accepted on any of its drag ports,
/// in creation order, excluding everything it carries.
fn candidates_for(graph: &BlockGraph, block: BlockId) -> Vec<BlockId> {
    let Some(kind) = graph.get(block).map(|b| b.kind) else {
        return Vec::new();
    };
    let mut accepted: HashSet<BlockKind> = kind
        .drag_ports()
        .into_iter()
        .flat_map(|port| kind.accepts(port).iter().copied())
        .collect();
    // The tail of the carried chain offers the `next` port.
    if let Some(&tail) = graph.chain(block).last() {
        if let Some(tail_block) = graph.get(tail) {
            accepted.extend(tail_block.kind.accepts(Port::Next).iter().copied());
        }
    }
    let carried: HashSet<BlockId> = graph.subtree(block).into_iter().collect();
    graph
        .block_ids()
        .filter(|id| !carried.contains(id))
        .filter(|id| graph.get(*id).is_some_and(|b| accepted.contains(&b.kind)))
        .collect()
}

/// Turns pointer lifecycle signals into moves and links on a [`BlockGraph`].
#[derive(Debug, Clone, Default)]
pub struct DragController {
    /// Overrides the process-wide attraction distance for this controller.
    threshold: Option<f64>,
    active: Option<DragSession>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// A controller that snaps within `threshold` regardless of the
    /// process-wide setting.
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: Some(threshold),
            active: None,
        }
    }

    pub fn active(&self) -> Option<&DragSession> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Starts dragging `block`, grabbed at `at`.
    pub fn pointer_down(
        &mut self,
        graph: &mut BlockGraph,
        pointer_id: u32,
        block: BlockId,
        at: Point,
    ) -> Result<DragDispatch, BlockyError> {
        let phase = DragPhase::PointerDown;
        if self.active.is_some() {
            return Ok(DragDispatch::ignored(
                phase,
                Some(pointer_id),
                DragIgnoredReason::ActivePointerAlreadyInProgress,
            ));
        }
        let target = graph.block(block)?;
        if !target.kind.is_draggable() {
            return Ok(DragDispatch::ignored(
                phase,
                Some(pointer_id),
                DragIgnoredReason::NotDraggable,
            ));
        }
        if !target.enabled {
            return Ok(DragDispatch::ignored(
                phase,
                Some(pointer_id),
                DragIgnoredReason::Disabled,
            ));
        }

        graph.unlink(block, Port::Last)?;
        graph.unlink(block, Port::Parent)?;

        let rect = graph.rect(block)?;
        let mut session = DragSession {
            pointer_id,
            block,
            grab: at - rect.origin(),
            size: rect.size(),
            threshold: self.threshold.unwrap_or_else(config::attraction_distance),
            candidates: Vec::new(),
            rects: RectCache::default(),
            revision: 0,
            pending: None,
        };
        session.recompute(graph);
        let candidates = session.candidates.len();
        tracing::debug!(%block, pointer_id, threshold = session.threshold, "drag started");
        self.active = Some(session);

        Ok(DragDispatch {
            phase,
            pointer_id: Some(pointer_id),
            outcome: DragOutcome::Started { block, candidates },
        })
    }

    /// Moves the dragged block under the pointer and updates the pending
    /// match.
    pub fn pointer_move(
        &mut self,
        graph: &mut BlockGraph,
        pointer_id: u32,
        at: Point,
    ) -> Result<DragDispatch, BlockyError> {
        let phase = DragPhase::PointerMove;
        let Some(session) = self.active.as_mut() else {
            return Ok(DragDispatch::ignored(
                phase,
                Some(pointer_id),
                DragIgnoredReason::NoActivePointer,
            ));
        };
        if session.pointer_id != pointer_id {
            return Ok(DragDispatch::ignored(
                phase,
                Some(pointer_id),
                DragIgnoredReason::PointerMismatch,
            ));
        }
        if session.revision != graph.revision() {
            session.recompute(graph);
        }

        let position = at - session.grab;
        graph.set_offset(session.block, position)?;
        let rect = Rect::from_origin_size(position, session.size);
        let found = matcher::nearest(
            graph,
            &session.rects,
            session.block,
            &rect,
            session.candidates.iter().copied(),
            session.threshold,
        );

        let changed = match (&session.pending, &found) {
            (Some(old), Some(new)) => !old.same_link(new),
            (None, None) => false,
            _ => true,
        };
        if changed {
            graph.emit(GraphEvent::Highlight {
                dragged: session.block,
                target: found.map(|m| m.target),
                port: found.map(|m| m.port),
            });
        }
        session.pending = found;

        Ok(DragDispatch {
            phase,
            pointer_id: Some(pointer_id),
            outcome: DragOutcome::Moved {
                position,
                pending: found,
            },
        })
    }

    /// Ends the drag, committing the pending link.
    pub fn pointer_up(
        &mut self,
        graph: &mut BlockGraph,
        pointer_id: u32,
    ) -> Result<DragDispatch, BlockyError> {
        match &self.active {
            None => Ok(DragDispatch::ignored(
                DragPhase::PointerUp,
                Some(pointer_id),
                DragIgnoredReason::NoActivePointer,
            )),
            Some(session) if session.pointer_id != pointer_id => Ok(DragDispatch::ignored(
                DragPhase::PointerUp,
                Some(pointer_id),
                DragIgnoredReason::PointerMismatch,
            )),
            Some(_) => self.finish(graph, DragPhase::PointerUp),
        }
    }

    /// Ends the drag on an interruption (focus loss, pointer cancel). A
    /// pending link is still committed.
    pub fn cancel(&mut self, graph: &mut BlockGraph) -> Result<DragDispatch, BlockyError> {
        if self.active.is_none() {
            return Ok(DragDispatch::ignored(
                DragPhase::Cancel,
                None,
                DragIgnoredReason::NoActivePointer,
            ));
        }
        self.finish(graph, DragPhase::Cancel)
    }

    /// Recomputes the candidate set after the host changed the graph
    /// mid-drag.
    pub fn refresh(&mut self, graph: &BlockGraph) -> DragDispatch {
        match self.active.as_mut() {
            None => DragDispatch::ignored(DragPhase::Refresh, None, DragIgnoredReason::NoActivePointer),
            Some(session) => {
                session.recompute(graph);
                if session
                    .pending
                    .is_some_and(|m| !session.candidates.contains(&m.target))
                {
                    session.pending = None;
                }
                DragDispatch {
                    phase: DragPhase::Refresh,
                    pointer_id: Some(session.pointer_id),
                    outcome: DragOutcome::Refreshed {
                        candidates: session.candidates.len(),
                    },
                }
            }
        }
    }

    fn finish(
        &mut self,
        graph: &mut BlockGraph,
        phase: DragPhase,
    ) -> Result<DragDispatch, BlockyError> {
        let Some(session) = self.active.take() else {
            return Ok(DragDispatch::ignored(phase, None, DragIgnoredReason::NoActivePointer));
        };
        let pointer_id = Some(session.pointer_id);

        if session.pending.is_some() {
            graph.emit(GraphEvent::Highlight {
                dragged: session.block,
                target: None,
                port: None,
            });
        }

        let outcome = match session.pending {
            Some(link) => {
                let result = graph.link(link.source, link.port, link.target)?;
                tracing::debug!(
                    block = %session.block,
                    port = %link.port,
                    target = %link.target,
                    "drag committed"
                );
                DragOutcome::Committed { link, result }
            }
            None => {
                let position = graph.offset(session.block)?;
                tracing::debug!(block = %session.block, ?position, "drag dropped");
                DragOutcome::Dropped {
                    block: session.block,
                    position,
                }
            }
        };

        Ok(DragDispatch {
            phase,
            pointer_id,
            outcome,
        })
    }
}
