//! Nearest compatible connection for a dragged block.
//!
//! For each candidate the matcher tries the dragged block's ports in the
//! order `last`, `next`, `parent`, `child`. A port counts when the candidate's
//! kind is accepted on it and the candidate's reverse slot is empty; its
//! score is the distance between the two anchor points. The closest pairing
//! wins, with ties going to whichever was found first. A best distance above
//! the threshold is no match.
//!
//! The dragged block's `next` port is the one at the bottom of the chain it
//! carries, so dropping a stack above a block attaches the whole stack.

use serde::{Deserialize, Serialize};

use crate::geometry::{point_distance, Point, Rect};
use crate::graph::BlockGraph;
use crate::id::BlockId;
use crate::kind::{BlockKind, Port};
use crate::layout::RectSource;

/// A candidate connection. Committing it is
/// `graph.link(source, port, target)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// The dragged block, or the tail of its chain for `next`.
    pub source: BlockId,
    pub port: Port,
    pub target: BlockId,
    pub distance: f64,
}

impl Match {
    /// Whether two matches describe the same connection, ignoring distance.
    pub fn same_link(&self, other: &Match) -> bool {
        self.source == other.source && self.port == other.port && self.target == other.target
    }
}

/// Best connection between `dragged`, drawn at `rect`, and `target`, with no
/// distance limit.
pub fn link_test(
    graph: &BlockGraph,
    rects: &impl RectSource,
    dragged: BlockId,
    rect: &Rect,
    target: BlockId,
) -> Option<Match> {
    Probe::new(graph, dragged, *rect)?.score(graph, rects, target)
}

/// Closest connection over `candidates` within `threshold`.
pub fn nearest<I>(
    graph: &BlockGraph,
    rects: &impl RectSource,
    dragged: BlockId,
    rect: &Rect,
    candidates: I,
    threshold: f64,
) -> Option<Match>
where
    I: IntoIterator<Item = BlockId>,
{
    let probe = Probe::new(graph, dragged, *rect)?;
    let mut best = None;
    for target in candidates {
        if let Some(found) = probe.score(graph, rects, target) {
            keep_closer(&mut best, found);
        }
    }
    best.filter(|m| m.distance <= threshold)
}

fn keep_closer(best: &mut Option<Match>, found: Match) {
    if best.map_or(true, |b| found.distance < b.distance) {
        *best = Some(found);
    }
}

/// The dragged block as the matcher sees it.
struct Probe {
    id: BlockId,
    kind: BlockKind,
    rect: Rect,
    tail: BlockId,
    tail_kind: BlockKind,
    tail_rect: Rect,
}

impl Probe {
    fn new(graph: &BlockGraph, dragged: BlockId, rect: Rect) -> Option<Probe> {
        let kind = graph.get(dragged)?.kind;
        if !kind.is_draggable() {
            return None;
        }
        let tail = graph.chain(dragged).last().copied()?;
        let tail_rect = if tail == dragged {
            rect
        } else {
            // The chain keeps its shape relative to the dragged head.
            let shift = rect.origin() - graph.origin(dragged).ok()?;
            let live = graph.rect(tail).ok()?;
            live.moved_to(live.origin() + shift)
        };
        Some(Probe {
            id: dragged,
            kind,
            rect,
            tail,
            tail_kind: graph.get(tail)?.kind,
            tail_rect,
        })
    }

    fn port_source(&self, port: Port) -> (BlockId, BlockKind, Point) {
        match port {
            Port::Next => (
                self.tail,
                self.tail_kind,
                self.tail_kind.anchor(port, &self.tail_rect),
            ),
            _ => (self.id, self.kind, self.kind.anchor(port, &self.rect)),
        }
    }

    fn score(&self, graph: &BlockGraph, rects: &impl RectSource, target: BlockId) -> Option<Match> {
        let target_kind = graph.get(target)?.kind;
        let mut best = self.score_direct(graph, rects, target, target_kind);

        // A composite's child chain is searched as part of the composite.
        if self.kind == BlockKind::Contained && target_kind == BlockKind::Composite {
            for member in graph.children(target) {
                if let Some(found) = self.score_direct(graph, rects, member, BlockKind::Contained) {
                    keep_closer(&mut best, found);
                }
            }
        }
        best
    }

    fn score_direct(
        &self,
        graph: &BlockGraph,
        rects: &impl RectSource,
        target: BlockId,
        target_kind: BlockKind,
    ) -> Option<Match> {
        if target == self.id || target == self.tail {
            return None;
        }
        let target_rect = rects.rect_of(target)?;
        let mut best = None;
        for port in Port::ALL {
            let (source, source_kind, anchor) = self.port_source(port);
            if !source_kind.is_compatible(port, target_kind) {
                continue;
            }
            if graph.slot(target, port.reverse()).is_some() {
                continue;
            }
            let target_anchor = target_kind.anchor(port.reverse(), &target_rect);
            keep_closer(
                &mut best,
                Match {
                    source,
                    port,
                    target,
                    distance: point_distance(anchor, target_anchor),
                },
            );
        }
        best
    }
}
