//! Absolute placement derived from structure.
//!
//! Only graph roots carry an absolute position. Every other block's origin
//! follows from its owner:
//!
//! - a `next`-linked block sits directly below its `last`
//! - a child sits at its parent's child-container origin
//! - an embedded hole sits at its host's origin plus its own offset

use std::collections::HashMap;

use crate::error::BlockyError;
use crate::geometry::{Point, Rect, Vector};
use crate::graph::BlockGraph;
use crate::id::BlockId;
use crate::link::Link;

/// Supplies block rectangles to the matcher.
///
/// The live graph computes rectangles on demand; a [`RectCache`] serves a
/// snapshot taken when a drag starts.
pub trait RectSource {
    fn rect_of(&self, id: BlockId) -> Option<Rect>;
}

impl RectSource for BlockGraph {
    fn rect_of(&self, id: BlockId) -> Option<Rect> {
        self.rect(id).ok()
    }
}

impl BlockGraph {
    /// Absolute top-left corner of a block.
    pub fn origin(&self, id: BlockId) -> Result<Point, BlockyError> {
        let mut idx = self.node(id)?;
        let mut acc = Vector::ZERO;
        let mut steps = 0;
        loop {
            steps += 1;
            if steps > self.len() + 1 {
                return Err(BlockyError::GraphInconsistency {
                    reason: format!("placement walk from {id} does not terminate"),
                });
            }
            if let Some((_, last)) = self.in_edge(idx, Link::Next) {
                acc = acc + Vector::new(0.0, self.at(last).fitted.size.height);
                idx = last;
                continue;
            }
            if let Some((_, parent)) = self.in_edge(idx, Link::Child) {
                let block = self.at(parent);
                acc = acc + block.kind.child_inset(block.fitted.size);
                idx = parent;
                continue;
            }
            let block = self.at(idx);
            acc = acc + (block.offset - Point::ORIGIN);
            match block.host {
                Some(host) => idx = self.node(host)?,
                None => break,
            }
        }
        Ok(Point::ORIGIN + acc)
    }

    /// Absolute rectangle of a block's fitted body.
    pub fn rect(&self, id: BlockId) -> Result<Rect, BlockyError> {
        let size = self.block(id)?.fitted.size;
        Ok(Rect::from_origin_size(self.origin(id)?, size))
    }
}

/// Rectangles captured at one moment.
#[derive(Debug, Clone, Default)]
pub struct RectCache {
    rects: HashMap<BlockId, Rect>,
}

impl RectCache {
    /// Snapshots the rectangles of `ids` from `source`. Ids the source cannot
    /// place are skipped.
    pub fn capture<I>(source: &impl RectSource, ids: I) -> Self
    where
        I: IntoIterator<Item = BlockId>,
    {
        let rects = ids
            .into_iter()
            .filter_map(|id| source.rect_of(id).map(|rect| (id, rect)))
            .collect();
        RectCache { rects }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl RectSource for RectCache {
    fn rect_of(&self, id: BlockId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Content;
    use crate::geometry::Size;
    use crate::kind::{BlockKind, Port};

    #[test]
    fn chain_members_stack_below_their_last() {
        let mut graph = BlockGraph::new();
        let top = graph.create_block(BlockKind::StackTop, vec![]).unwrap();
        let mid = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
        let bottom = graph.create_block(BlockKind::StackBottom, vec![]).unwrap();
        graph.link(top, Port::Next, mid).unwrap();
        graph.link(mid, Port::Next, bottom).unwrap();
        graph.set_offset(top, Point::new(10.0, 10.0)).unwrap();

        assert_eq!(graph.origin(mid).unwrap(), Point::new(10.0, 50.0));
        assert_eq!(
            graph.rect(bottom).unwrap(),
            Rect::new(10.0, 90.0, 120.0, 40.0)
        );
    }

    #[test]
    fn children_open_on_the_composite_right_edge() {
        let mut graph = BlockGraph::new();
        let comp = graph.create_block(BlockKind::Composite, vec![]).unwrap();
        let a = graph.create_block(BlockKind::Contained, vec![]).unwrap();
        let b = graph.create_block(BlockKind::Contained, vec![]).unwrap();
        graph.link(comp, Port::Child, a).unwrap();
        graph.link(a, Port::Next, b).unwrap();

        assert_eq!(graph.origin(a).unwrap(), Point::new(120.0, 0.0));
        assert_eq!(graph.origin(b).unwrap(), Point::new(120.0, 30.0));
    }

    #[test]
    fn expressions_sit_inside_their_embedded_hole() {
        let mut graph = BlockGraph::new();
        let hole = graph.create_block(BlockKind::ExpressionHole, vec![]).unwrap();
        graph.set_offset(hole, Point::new(50.0, 8.0)).unwrap();
        let host = graph
            .create_block(BlockKind::StackMiddle, vec!["say".into(), Content::Hole(hole)])
            .unwrap();
        let expr = graph.create_block(BlockKind::Expression, vec![]).unwrap();
        graph.link(hole, Port::Child, expr).unwrap();
        graph.set_offset(host, Point::new(200.0, 100.0)).unwrap();

        assert_eq!(graph.origin(expr).unwrap(), Point::new(250.0, 108.0));
    }

    #[test]
    fn cache_is_a_snapshot() {
        let mut graph = BlockGraph::new();
        let a = graph.create_block(BlockKind::StackTop, vec![]).unwrap();
        let cache = RectCache::capture(&graph, [a, BlockId(77)]);
        assert_eq!(cache.len(), 1);

        graph.set_offset(a, Point::new(300.0, 0.0)).unwrap();
        graph.set_size(a, Size::new(10.0, 10.0)).unwrap();
        assert_eq!(cache.rect_of(a), Some(Rect::new(0.0, 0.0, 120.0, 40.0)));
        assert_eq!(graph.rect_of(a), Some(Rect::new(300.0, 0.0, 10.0, 10.0)));
    }
}
