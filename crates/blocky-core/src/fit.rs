//! Size-fit cascade.
//!
//! A container grows to hold its content: a composite's body is at least as
//! tall as its child column, an expression hole at least as large as its
//! expression, and a block embedding holes widens (and deepens) by however
//! much those holes grew. After a block is refit, the change propagates to
//! the container holding its chain, and from there upward until a root is
//! reached or a block's fitted box comes out unchanged.

use petgraph::graph::NodeIndex;

use crate::block::Fitted;
use crate::error::BlockyError;
use crate::event::GraphEvent;
use crate::geometry::Size;
use crate::graph::BlockGraph;
use crate::id::BlockId;
use crate::kind::BlockKind;
use crate::link::Link;

impl BlockGraph {
    /// Refits `id` and every container above it whose box changes as a
    /// result. The containers always get re-measured at least once, since a
    /// link or unlink at `id` changes their content even when `id`'s own box
    /// stays the same.
    pub fn fit(&mut self, id: BlockId) -> Result<(), BlockyError> {
        let mut idx = self.node(id)?;
        let mut first = true;
        let mut steps = 0;
        loop {
            let changed = self.refit(idx);
            if !changed && !first {
                break;
            }
            first = false;
            steps += 1;
            if steps > self.len() {
                return Err(BlockyError::GraphInconsistency {
                    reason: format!("fit cascade from {id} does not terminate"),
                });
            }
            match self.container_of(idx) {
                Some(up) => idx = up,
                None => break,
            }
        }
        Ok(())
    }

    /// The block whose fitted box depends on `idx`'s: the parent of its chain
    /// head, or the host of an embedded hole.
    fn container_of(&self, idx: NodeIndex<u32>) -> Option<NodeIndex<u32>> {
        let head = self.chain_head(idx);
        if let Some((_, parent)) = self.in_edge(head, Link::Child) {
            return Some(parent);
        }
        let host = self.at(head).host?;
        self.node(host).ok()
    }

    fn refit(&mut self, idx: NodeIndex<u32>) -> bool {
        let fitted = self.measure(idx);
        let block = self.at_mut(idx);
        if block.fitted == fitted {
            return false;
        }
        block.fitted = fitted;
        let id = block.id;
        self.emit(GraphEvent::Resized {
            id,
            size: fitted.size,
            container: fitted.container,
        });
        true
    }

    fn measure(&self, idx: NodeIndex<u32>) -> Fitted {
        let block = self.at(idx);
        let mut size = block.size;

        let mut grow_w = 0.0;
        let mut grow_h: f64 = 0.0;
        for hole in block.holes() {
            let Ok(h) = self.node(hole) else { continue };
            let hole = self.at(h);
            grow_w += (hole.fitted.size.width - hole.size.width).max(0.0);
            grow_h = grow_h.max(hole.fitted.size.height - hole.size.height);
        }
        size.width += grow_w;
        size.height += grow_h;

        let container = self.content_box(idx);
        match block.kind {
            BlockKind::Composite => size.height = size.height.max(container.height),
            BlockKind::ExpressionHole => size = size.max(container),
            _ => {}
        }
        Fitted { container, size }
    }

    /// Minimum box of a block's child chain: a column for composites, a row
    /// for expression holes.
    fn content_box(&self, idx: NodeIndex<u32>) -> Size {
        let Some((_, first)) = self.out_edge(idx, Link::Child) else {
            return Size::ZERO;
        };
        let row = self.at(idx).kind == BlockKind::ExpressionHole;
        let mut total = Size::ZERO;
        let mut current = Some(first);
        while let Some(member) = current {
            let size = self.at(member).fitted.size;
            if row {
                total.width += size.width;
                total.height = total.height.max(size.height);
            } else {
                total.width = total.width.max(size.width);
                total.height += size.height;
            }
            current = self.out_edge(member, Link::Next).map(|(_, n)| n);
        }
        total
    }
}
