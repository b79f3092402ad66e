//! BlockGraph: the block arena and the link/unlink state machine.
//!
//! [`BlockGraph`] is the single entry point for mutating blocks. Blocks live
//! as nodes of a petgraph `StableGraph`; each occupied slot pair is one edge
//! from owner to dependent:
//!
//! - `Link::Next` edge `a -> b`: `a.next = b`, `b.last = a`
//! - `Link::Child` edge `a -> b`: `a.child = b`, `b.parent = a`
//!
//! Reading both slots of a pair from one edge makes reverse-slot symmetry
//! structural. The remaining invariants (no branching, one owner per block,
//! acyclicity, kind compatibility) are enforced by [`link`](BlockGraph::link)
//! checking every precondition before its first write, and verified by
//! [`validate`](BlockGraph::validate).

use std::collections::HashSet;

use indexmap::IndexMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::block::{Block, Content};
use crate::error::BlockyError;
use crate::event::GraphEvent;
use crate::geometry::{Point, Size, Vector};
use crate::id::BlockId;
use crate::kind::{BlockKind, Port};
use crate::link::{Link, LinkOutcome};

/// The block graph of one editing scope.
///
/// Mutations queue [`GraphEvent`]s until the host drains them with
/// [`BlockGraph::take_events`], normally once per frame. Back-to-back
/// `OffsetChanged` events for the same block collapse into the latest one, so a
/// drag that moves one block many times between drains queues a single event.
#[derive(Debug, Clone, Default)]
pub struct BlockGraph {
    graph: StableGraph<Block, Link, Directed, u32>,
    /// Live blocks in creation order. Candidate iteration (and therefore the
    /// matcher's tie-break) follows this order.
    index: IndexMap<BlockId, NodeIndex<u32>>,
    next_id: u32,
    /// Bumped on every membership or structure change.
    revision: u64,
    events: Vec<GraphEvent>,
}

impl BlockGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub(crate) fn node(&self, id: BlockId) -> Result<NodeIndex<u32>, BlockyError> {
        self.index
            .get(&id)
            .copied()
            .ok_or(BlockyError::BlockNotFound { id })
    }

    pub(crate) fn at(&self, idx: NodeIndex<u32>) -> &Block {
        &self.graph[idx]
    }

    pub(crate) fn at_mut(&mut self, idx: NodeIndex<u32>) -> &mut Block {
        &mut self.graph[idx]
    }

    /// Looks up a block by id.
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.index.get(&id).map(|&idx| &self.graph[idx])
    }

    /// Like [`get`](Self::get) but reports a missing block as an error.
    pub fn block(&self, id: BlockId) -> Result<&Block, BlockyError> {
        Ok(&self.graph[self.node(id)?])
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live block ids in creation order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.index.keys().copied()
    }

    /// Structural revision; changes whenever blocks are created, destroyed,
    /// linked, unlinked, resized or have their content replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Drains queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GraphEvent) {
        if let GraphEvent::OffsetChanged { id, offset } = event {
            if let Some(GraphEvent::OffsetChanged {
                id: queued,
                offset: latest,
            }) = self.events.last_mut()
            {
                if *queued == id {
                    *latest = offset;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -----------------------------------------------------------------------
    // Slots
    // -----------------------------------------------------------------------

    pub(crate) fn out_edge(
        &self,
        idx: NodeIndex<u32>,
        link: Link,
    ) -> Option<(EdgeIndex<u32>, NodeIndex<u32>)> {
        self.graph
            .edges_directed(idx, Direction::Outgoing)
            .find(|e| *e.weight() == link)
            .map(|e| (e.id(), e.target()))
    }

    pub(crate) fn in_edge(
        &self,
        idx: NodeIndex<u32>,
        link: Link,
    ) -> Option<(EdgeIndex<u32>, NodeIndex<u32>)> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .find(|e| *e.weight() == link)
            .map(|e| (e.id(), e.source()))
    }

    /// The incoming edge that attaches `idx` to an owner, if any.
    fn anchor_edge(&self, idx: NodeIndex<u32>) -> Option<(Link, EdgeIndex<u32>, NodeIndex<u32>)> {
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .next()
            .map(|e| (*e.weight(), e.id(), e.source()))
    }

    fn slot_node(&self, idx: NodeIndex<u32>, port: Port) -> Option<NodeIndex<u32>> {
        let (link, owner_side) = Link::for_port(port);
        if owner_side {
            self.out_edge(idx, link).map(|(_, n)| n)
        } else {
            self.in_edge(idx, link).map(|(_, n)| n)
        }
    }

    /// The block in `id`'s `port` slot.
    pub fn slot(&self, id: BlockId, port: Port) -> Option<BlockId> {
        let idx = *self.index.get(&id)?;
        self.slot_node(idx, port).map(|n| self.graph[n].id)
    }

    pub fn last(&self, id: BlockId) -> Option<BlockId> {
        self.slot(id, Port::Last)
    }

    pub fn next(&self, id: BlockId) -> Option<BlockId> {
        self.slot(id, Port::Next)
    }

    pub fn parent(&self, id: BlockId) -> Option<BlockId> {
        self.slot(id, Port::Parent)
    }

    pub fn child(&self, id: BlockId) -> Option<BlockId> {
        self.slot(id, Port::Child)
    }

    /// `id` followed by every block reachable through `next`.
    pub fn chain(&self, id: BlockId) -> Vec<BlockId> {
        let mut out = Vec::new();
        let mut current = self.index.get(&id).copied();
        while let Some(idx) = current {
            out.push(self.graph[idx].id);
            current = self.out_edge(idx, Link::Next).map(|(_, n)| n);
        }
        out
    }

    /// Members of `id`'s child container: `child`, then its `next` chain.
    pub fn children(&self, id: BlockId) -> Vec<BlockId> {
        match self.child(id) {
            Some(first) => self.chain(first),
            None => Vec::new(),
        }
    }

    /// Last block of the `next` chain starting at `idx`.
    pub(crate) fn chain_head(&self, idx: NodeIndex<u32>) -> NodeIndex<u32> {
        let mut head = idx;
        while let Some((_, last)) = self.in_edge(head, Link::Next) {
            head = last;
        }
        head
    }

    pub(crate) fn chain_tail(&self, idx: NodeIndex<u32>) -> NodeIndex<u32> {
        let mut tail = idx;
        while let Some((_, n)) = self.out_edge(tail, Link::Next) {
            tail = n;
        }
        tail
    }

    /// Whether `id` is a graph root: no `last`, no `parent`, not embedded.
    pub fn is_root(&self, id: BlockId) -> bool {
        match self.index.get(&id) {
            Some(&idx) => self.is_root_node(idx),
            None => false,
        }
    }

    fn is_root_node(&self, idx: NodeIndex<u32>) -> bool {
        self.anchor_edge(idx).is_none() && self.graph[idx].host.is_none()
    }

    /// Graph roots in creation order.
    pub fn roots(&self) -> Vec<BlockId> {
        self.index
            .iter()
            .filter(|(_, &idx)| self.is_root_node(idx))
            .map(|(&id, _)| id)
            .collect()
    }

    /// The structural step up from `idx`: its `last`, else its `parent`, else
    /// the host embedding it.
    pub(crate) fn up(&self, idx: NodeIndex<u32>) -> Option<NodeIndex<u32>> {
        if let Some((_, _, owner)) = self.anchor_edge(idx) {
            return Some(owner);
        }
        self.graph[idx].host.and_then(|host| self.index.get(&host).copied())
    }

    /// Follows `last`/`parent`/host links to the graph root.
    pub fn root_of(&self, id: BlockId) -> Result<BlockId, BlockyError> {
        let mut idx = self.node(id)?;
        let mut steps = 0;
        while let Some(up) = self.up(idx) {
            idx = up;
            steps += 1;
            if steps > self.index.len() {
                return Err(BlockyError::GraphInconsistency {
                    reason: format!("ancestor walk from {id} does not terminate"),
                });
            }
        }
        Ok(self.graph[idx].id)
    }

    /// `id` and everything below it: its `next` chain, child containers and
    /// embedded holes, transitively.
    pub fn subtree(&self, id: BlockId) -> Vec<BlockId> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };
        self.subtree_nodes(start)
            .into_iter()
            .map(|idx| self.graph[idx].id)
            .collect()
    }

    fn subtree_nodes(&self, start: NodeIndex<u32>) -> Vec<NodeIndex<u32>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                continue;
            }
            out.push(idx);
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                stack.push(edge.target());
            }
            for hole in self.graph[idx].holes() {
                if let Some(&h) = self.index.get(&hole) {
                    stack.push(h);
                }
            }
        }
        out
    }

    fn in_subtree(&self, root: NodeIndex<u32>, needle: NodeIndex<u32>) -> bool {
        self.subtree_nodes(root).contains(&needle)
    }

    // -----------------------------------------------------------------------
    // Create / destroy
    // -----------------------------------------------------------------------

    /// Creates a detached root block with an engine-assigned id.
    pub fn create_block(
        &mut self,
        kind: BlockKind,
        content: Vec<Content>,
    ) -> Result<BlockId, BlockyError> {
        while self.index.contains_key(&BlockId(self.next_id)) {
            self.next_id = self
                .next_id
                .checked_add(1)
                .ok_or(BlockyError::IdsExhausted)?;
        }
        self.create_block_with_id(BlockId(self.next_id), kind, content)
    }

    /// Creates a detached root block with a caller-chosen id.
    ///
    /// Returns [`BlockyError::DuplicateBlockId`] if the id is live.
    pub fn create_block_with_id(
        &mut self,
        id: BlockId,
        kind: BlockKind,
        content: Vec<Content>,
    ) -> Result<BlockId, BlockyError> {
        if self.index.contains_key(&id) {
            return Err(BlockyError::DuplicateBlockId { id });
        }
        self.check_content(id, &content)?;

        let idx = self.graph.add_node(Block::new(id, kind, Vec::new()));
        self.index.insert(id, idx);
        if id.0 >= self.next_id {
            self.next_id = id.0.saturating_add(1);
        }
        self.touch();
        self.emit(GraphEvent::Created { id, kind });
        tracing::debug!(%id, %kind, "block created");

        if !content.is_empty() {
            self.set_content(id, content)?;
        }
        Ok(id)
    }

    /// Removes a block. Its dependents are detached, not destroyed: they stay
    /// live as roots at the position they were drawn. Embedded holes are
    /// released the same way.
    pub fn destroy_block(&mut self, id: BlockId) -> Result<Block, BlockyError> {
        let idx = self.node(id)?;

        for port in [Port::Last, Port::Parent, Port::Next, Port::Child] {
            self.unlink(id, port)?;
        }
        self.set_content(id, Vec::new())?;

        if let Some(host) = self.graph[idx].host {
            if let Ok(host_idx) = self.node(host) {
                let parts: Vec<Content> = self.graph[host_idx]
                    .content
                    .iter()
                    .filter(|part| **part != Content::Hole(id))
                    .cloned()
                    .collect();
                self.set_content(host, parts)?;
            }
        }

        let block = self
            .graph
            .remove_node(idx)
            .ok_or(BlockyError::BlockNotFound { id })?;
        self.index.shift_remove(&id);
        self.touch();
        self.emit(GraphEvent::Destroyed { id });
        tracing::debug!(%id, "block destroyed");

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(block)
    }

    // -----------------------------------------------------------------------
    // Placement, content, size
    // -----------------------------------------------------------------------

    pub fn offset(&self, id: BlockId) -> Result<Point, BlockyError> {
        Ok(self.block(id)?.offset)
    }

    /// Sets a block's placement and emits `OffsetChanged`.
    pub fn set_offset(&mut self, id: BlockId, offset: Point) -> Result<(), BlockyError> {
        let idx = self.node(id)?;
        self.graph[idx].offset = offset;
        self.emit(GraphEvent::OffsetChanged { id, offset });
        Ok(())
    }

    pub fn add_offset(&mut self, id: BlockId, delta: Vector) -> Result<Point, BlockyError> {
        let offset = self.offset(id)? + delta;
        self.set_offset(id, offset)?;
        Ok(offset)
    }

    pub fn set_enabled(&mut self, id: BlockId, enabled: bool) -> Result<(), BlockyError> {
        let idx = self.node(id)?;
        self.graph[idx].enabled = enabled;
        Ok(())
    }

    fn check_content(&self, id: BlockId, content: &[Content]) -> Result<(), BlockyError> {
        let mut seen = HashSet::new();
        for part in content {
            let Content::Hole(hole) = part else { continue };
            if !seen.insert(*hole) {
                return Err(BlockyError::InvalidContent {
                    reason: format!("hole {hole} appears twice"),
                });
            }
            let hole_idx = self.node(*hole)?;
            let block = &self.graph[hole_idx];
            if block.kind != BlockKind::ExpressionHole {
                return Err(BlockyError::InvalidContent {
                    reason: format!("{hole} is a {} block, not an expression hole", block.kind),
                });
            }
            if *hole == id {
                return Err(BlockyError::InvalidContent {
                    reason: format!("{id} cannot embed itself"),
                });
            }
            match block.host {
                Some(host) if host != id => {
                    return Err(BlockyError::InvalidContent {
                        reason: format!("hole {hole} is already embedded in {host}"),
                    });
                }
                Some(_) => {}
                None => {
                    if self.anchor_edge(hole_idx).is_some() {
                        return Err(BlockyError::InvalidContent {
                            reason: format!("hole {hole} is linked and cannot be embedded"),
                        });
                    }
                    if let Some(&host_idx) = self.index.get(&id) {
                        if self.in_subtree(hole_idx, host_idx) {
                            return Err(BlockyError::LinkCycle {
                                block: id,
                                target: *hole,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Replaces a block's content.
    ///
    /// Holes listed in the new content become embedded (their offset is then
    /// relative to this block); holes dropped from the content are released
    /// as roots where they were drawn.
    pub fn set_content(&mut self, id: BlockId, content: Vec<Content>) -> Result<(), BlockyError> {
        let idx = self.node(id)?;
        self.check_content(id, &content)?;

        let kept: HashSet<BlockId> = content
            .iter()
            .filter_map(|part| match part {
                Content::Hole(h) => Some(*h),
                Content::Text(_) => None,
            })
            .collect();
        let released: Vec<BlockId> = self.graph[idx]
            .holes()
            .filter(|h| !kept.contains(h))
            .collect();

        for hole in released {
            let Ok(hole_idx) = self.node(hole) else { continue };
            let origin = self.origin(hole)?;
            let block = &mut self.graph[hole_idx];
            block.host = None;
            block.offset = origin;
            self.emit(GraphEvent::OffsetChanged { id: hole, offset: origin });
        }
        for hole in &kept {
            let hole_idx = self.node(*hole)?;
            if self.graph[hole_idx].host.is_none() {
                let host_origin = self.origin(id)?;
                let block = &mut self.graph[hole_idx];
                block.host = Some(id);
                block.offset = Point::ORIGIN + (block.offset - host_origin);
                let offset = block.offset;
                self.emit(GraphEvent::OffsetChanged { id: *hole, offset });
            }
        }

        self.graph[idx].content = content;
        self.touch();
        self.emit(GraphEvent::ContentChanged { id });
        self.fit(id)?;
        Ok(())
    }

    /// Records the presentation layer's measured body size and runs the
    /// size-fit cascade from the block.
    pub fn set_size(&mut self, id: BlockId, size: Size) -> Result<(), BlockyError> {
        let idx = self.node(id)?;
        let valid = |v: f64| v.is_finite() && v >= 0.0;
        if !valid(size.width) || !valid(size.height) {
            return Err(BlockyError::InvalidContent {
                reason: format!("size must be finite and non-negative, got {size:?}"),
            });
        }
        self.graph[idx].size = size;
        self.touch();
        self.fit(id)
    }

    // -----------------------------------------------------------------------
    // Link state machine
    // -----------------------------------------------------------------------

    /// Links `target` into `id`'s `port` slot.
    ///
    /// `last` and `parent` are performed from the owner side
    /// (`target.next = id`, `target.child = id`). Every precondition is
    /// checked before the first write; on `Err` the graph is unchanged.
    pub fn link(
        &mut self,
        id: BlockId,
        port: Port,
        target: BlockId,
    ) -> Result<LinkOutcome, BlockyError> {
        let idx = self.node(id)?;
        let target_idx = self.node(target)?;
        let kind = self.graph[idx].kind;
        let target_kind = self.graph[target_idx].kind;

        if !kind.is_compatible(port, target_kind) {
            return Err(BlockyError::IncompatibleLink {
                block: id,
                kind,
                port,
                target,
                target_kind,
            });
        }
        if idx == target_idx {
            return Err(BlockyError::LinkCycle { block: id, target });
        }
        if self.slot_node(idx, port) == Some(target_idx) {
            return Ok(LinkOutcome::default());
        }

        let (link, _) = Link::for_port(port);
        let (owner, dependent) = if port.points_to_owner() {
            (target_idx, idx)
        } else {
            (idx, target_idx)
        };

        if self.in_subtree(dependent, owner) || self.in_subtree(owner, dependent) {
            return Err(BlockyError::LinkCycle { block: id, target });
        }

        // The dependent's current attachment, if any.
        let former = self.anchor_edge(dependent);
        // A free chain linking `next` to an attached block is inserted before
        // it: the chain's head takes over the dependent's former slot.
        let head = self.chain_head(owner);
        let takeover = match former {
            Some((former_link, _, former_owner))
                if link == Link::Next
                    && self.is_root_node(head)
                    && !self.in_subtree(head, dependent) =>
            {
                self.graph[former_owner]
                    .kind
                    .is_compatible(former_link.owner_port(), self.graph[head].kind)
            }
            _ => false,
        };

        // Whatever occupies the owner's slot gets pushed to the tail of the
        // dependent's chain, if that tail accepts it.
        let displaced = self.out_edge(owner, link);
        let tail = self.chain_tail(dependent);
        let relocate = displaced.map(|(_, node)| {
            self.graph[tail]
                .kind
                .is_compatible(Port::Next, self.graph[node].kind)
        });
        let orphan_origin = match (displaced, relocate) {
            (Some((_, node)), Some(false)) => Some(self.origin(self.graph[node].id)?),
            _ => None,
        };

        // --- writes start here ---
        let mut outcome = LinkOutcome::default();
        let mut refit = vec![owner];

        if let Some((edge, node)) = displaced {
            self.graph.remove_edge(edge);
            self.emit_unlinked(owner, link, node);
        }

        if let Some((former_link, former_edge, former_owner)) = former {
            self.graph.remove_edge(former_edge);
            self.emit_unlinked(former_owner, former_link, dependent);
            if takeover {
                self.write_edge(former_owner, head, former_link);
            } else {
                refit.push(former_owner);
            }
        }

        self.write_edge(owner, dependent, link);

        if let Some((_, node)) = displaced {
            let node_id = self.graph[node].id;
            match orphan_origin {
                None => {
                    self.write_edge(tail, node, Link::Next);
                    outcome.relocated = Some(node_id);
                }
                Some(origin) => {
                    self.graph[node].offset = origin;
                    self.emit(GraphEvent::OffsetChanged {
                        id: node_id,
                        offset: origin,
                    });
                    outcome.orphaned = Some(node_id);
                    tracing::warn!(
                        block = %node_id,
                        tail = %self.graph[tail].id,
                        "displaced block cannot follow the new chain; left as a root"
                    );
                }
            }
        }

        self.touch();
        tracing::debug!(%id, %port, %target, takeover, "linked");

        for node in refit {
            let node_id = self.graph[node].id;
            self.fit(node_id)?;
        }

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(outcome)
    }

    fn write_edge(&mut self, owner: NodeIndex<u32>, dependent: NodeIndex<u32>, link: Link) {
        self.graph.add_edge(owner, dependent, link);
        self.graph[dependent].offset = Point::ORIGIN;
        let owner_id = self.graph[owner].id;
        let dependent_id = self.graph[dependent].id;
        self.emit(GraphEvent::Linked {
            owner: owner_id,
            port: link.owner_port(),
            target: dependent_id,
        });
        self.emit(GraphEvent::OffsetChanged {
            id: dependent_id,
            offset: Point::ORIGIN,
        });
    }

    fn emit_unlinked(&mut self, owner: NodeIndex<u32>, link: Link, dependent: NodeIndex<u32>) {
        let owner_id = self.graph[owner].id;
        let dependent_id = self.graph[dependent].id;
        self.emit(GraphEvent::Unlinked {
            owner: owner_id,
            port: link.owner_port(),
            target: dependent_id,
        });
    }

    /// Empties `id`'s `port` slot and the reverse slot of its occupant.
    ///
    /// Returns the block that occupied the slot, or `None` if it was already
    /// empty. The block that loses its `last`/`parent` becomes a root at the
    /// absolute position it was drawn at; its own chain stays attached to it.
    pub fn unlink(&mut self, id: BlockId, port: Port) -> Result<Option<BlockId>, BlockyError> {
        let idx = self.node(id)?;

        if !port.points_to_owner() {
            let Some(dependent) = self.slot_node(idx, port) else {
                return Ok(None);
            };
            let dependent_id = self.graph[dependent].id;
            self.unlink(dependent_id, port.reverse())?;
            return Ok(Some(dependent_id));
        }

        let (link, _) = Link::for_port(port);
        let Some((edge, owner)) = self.in_edge(idx, link) else {
            return Ok(None);
        };
        let origin = self.origin(id)?;

        self.graph.remove_edge(edge);
        self.graph[idx].offset = origin;
        self.emit_unlinked(owner, link, idx);
        self.emit(GraphEvent::OffsetChanged { id, offset: origin });
        self.touch();

        let owner_id = self.graph[owner].id;
        tracing::debug!(%id, %port, former = %owner_id, "unlinked");
        self.fit(owner_id)?;

        #[cfg(debug_assertions)]
        self.assert_consistency();

        Ok(Some(owner_id))
    }

    // -----------------------------------------------------------------------
    // Invariants
    // -----------------------------------------------------------------------

    /// Checks every graph invariant, reporting the first violation.
    pub fn validate(&self) -> Result<(), BlockyError> {
        let fail = |reason: String| Err(BlockyError::GraphInconsistency { reason });

        for (&id, &idx) in &self.index {
            let block = &self.graph[idx];
            if block.id != id {
                return fail(format!("index maps {id} to block {}", block.id));
            }

            let mut outgoing = [0usize; 2];
            for edge in self.graph.edges_directed(idx, Direction::Outgoing) {
                outgoing[*edge.weight() as usize] += 1;
                let target = &self.graph[edge.target()];
                let port = edge.weight().owner_port();
                if !block.kind.is_compatible(port, target.kind)
                    || !target.kind.is_compatible(port.reverse(), block.kind)
                {
                    return fail(format!(
                        "{id} ({}) holds {} ({}) on '{port}' against the compatibility table",
                        block.kind, target.id, target.kind
                    ));
                }
            }
            let incoming = self.graph.edges_directed(idx, Direction::Incoming).count();
            if outgoing.iter().any(|&n| n > 1) {
                return fail(format!("{id} has more than one next or child"));
            }
            if incoming > 1 {
                return fail(format!("{id} has more than one owner (last/parent)"));
            }
            if incoming == 1 && block.host.is_some() {
                return fail(format!("{id} is both linked and embedded"));
            }
            if let Some(host) = block.host {
                let embeds = self
                    .get(host)
                    .is_some_and(|h| h.holes().any(|hole| hole == id));
                if !embeds {
                    return fail(format!("{id} names {host} as host but is not in its content"));
                }
            }
            for hole in block.holes() {
                if self.get(hole).and_then(|h| h.host) != Some(id) {
                    return fail(format!("{id} embeds {hole} which does not name it as host"));
                }
            }
        }

        for &id in self.index.keys() {
            self.root_of(id)?;
        }
        Ok(())
    }

    /// Panics if [`validate`](Self::validate) fails.
    ///
    /// Only called in debug builds (via `cfg(debug_assertions)`).
    #[cfg(debug_assertions)]
    fn assert_consistency(&self) {
        if let Err(err) = self.validate() {
            panic!("block graph invariant violated: {err}");
        }
    }
}
