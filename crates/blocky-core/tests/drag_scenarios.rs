//! Pointer-driven drag scenarios.

use blocky_core::{
    BlockGraph, BlockId, BlockKind, Content, DragController, DragOutcome, Point, Port,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn place(graph: &mut BlockGraph, kind: BlockKind, at: Point) -> BlockId {
    let id = graph.create_block(kind, vec![]).unwrap();
    graph.set_offset(id, at).unwrap();
    id
}

/// Grabs `block` at its top-left corner, drags it so that corner lands on
/// `to`, and releases.
fn drag_to(graph: &mut BlockGraph, block: BlockId, to: Point) -> DragOutcome {
    let mut drag = DragController::with_threshold(30.0);
    let from = graph.origin(block).unwrap();
    let d = drag.pointer_down(graph, 1, block, from).unwrap();
    assert!(!d.is_ignored(), "drag of {block} did not start: {d:?}");
    drag.pointer_move(graph, 1, to).unwrap();
    drag.pointer_up(graph, 1).unwrap().outcome
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn drag_a_substack_out_and_back() {
    let mut graph = BlockGraph::new();
    let top = place(&mut graph, BlockKind::StackTop, Point::new(10.0, 10.0));
    let a = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    let b = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    graph.link(top, Port::Next, a).unwrap();
    graph.link(a, Port::Next, b).unwrap();

    let outcome = drag_to(&mut graph, a, Point::new(400.0, 400.0));
    assert!(matches!(outcome, DragOutcome::Dropped { .. }));
    assert_eq!(graph.roots(), vec![top, a]);
    assert_eq!(graph.chain(a), vec![a, b]);
    assert_eq!(graph.origin(b).unwrap(), Point::new(400.0, 440.0));

    let outcome = drag_to(&mut graph, a, Point::new(12.0, 52.0));
    assert!(matches!(outcome, DragOutcome::Committed { .. }));
    assert_eq!(graph.chain(top), vec![top, a, b]);
    assert_eq!(graph.origin(b).unwrap(), Point::new(10.0, 90.0));
    graph.validate().unwrap();
}

#[test]
fn drop_a_stack_on_top_of_a_bottom_block() {
    let mut graph = BlockGraph::new();
    let a = place(&mut graph, BlockKind::StackMiddle, Point::ORIGIN);
    let b = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    graph.link(a, Port::Next, b).unwrap();
    let end = place(&mut graph, BlockKind::StackBottom, Point::new(300.0, 300.0));

    // The carried chain is 80 high; its bottom meets `end`'s top.
    let outcome = drag_to(&mut graph, a, Point::new(300.0, 220.0));
    let DragOutcome::Committed { link, .. } = outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!((link.source, link.port, link.target), (b, Port::Next, end));
    assert_eq!(graph.chain(a), vec![a, b, end]);
}

#[test]
fn insert_at_the_head_of_a_composite_child_chain() {
    let mut graph = BlockGraph::new();
    let comp = place(&mut graph, BlockKind::Composite, Point::ORIGIN);
    let first = graph.create_block(BlockKind::Contained, vec![]).unwrap();
    graph.link(comp, Port::Child, first).unwrap();
    let extra = place(&mut graph, BlockKind::Contained, Point::new(500.0, 0.0));

    // Child pool opens at (120, 0); extra's bottom lands just above it.
    let outcome = drag_to(&mut graph, extra, Point::new(121.0, -31.0));
    assert!(matches!(outcome, DragOutcome::Committed { .. }));
    assert_eq!(graph.children(comp), vec![extra, first]);
    assert_eq!(graph.origin(first).unwrap(), Point::new(120.0, 30.0));
    assert_eq!(graph.get(comp).unwrap().fitted.container.height, 60.0);
}

#[test]
fn insert_a_carried_chain_at_the_head_of_a_composite_child_chain() {
    let mut graph = BlockGraph::new();
    let comp = place(&mut graph, BlockKind::Composite, Point::ORIGIN);
    let first = graph.create_block(BlockKind::Contained, vec![]).unwrap();
    graph.link(comp, Port::Child, first).unwrap();
    let d1 = place(&mut graph, BlockKind::Contained, Point::new(500.0, 0.0));
    let d2 = graph.create_block(BlockKind::Contained, vec![]).unwrap();
    graph.link(d1, Port::Next, d2).unwrap();

    // The carried chain is 60 high; its bottom lands on `first`'s top-left.
    let outcome = drag_to(&mut graph, d1, Point::new(120.0, -60.0));
    let DragOutcome::Committed { link, .. } = outcome else {
        panic!("expected a commit, got {outcome:?}");
    };
    assert_eq!((link.source, link.port, link.target), (d2, Port::Next, first));
    assert_eq!(graph.children(comp), vec![d1, d2, first]);
    assert_eq!(graph.roots(), vec![comp]);
    assert_eq!(graph.origin(d1).unwrap(), Point::new(120.0, 0.0));
    assert_eq!(graph.origin(first).unwrap(), Point::new(120.0, 60.0));
    assert_eq!(graph.get(comp).unwrap().fitted.container.height, 90.0);
    graph.validate().unwrap();
}

#[test]
fn append_to_a_composite_child_chain() {
    let mut graph = BlockGraph::new();
    let comp = place(&mut graph, BlockKind::Composite, Point::ORIGIN);
    let first = graph.create_block(BlockKind::Contained, vec![]).unwrap();
    graph.link(comp, Port::Child, first).unwrap();
    let extra = place(&mut graph, BlockKind::Contained, Point::new(500.0, 0.0));

    let outcome = drag_to(&mut graph, extra, Point::new(122.0, 33.0));
    assert!(matches!(outcome, DragOutcome::Committed { .. }));
    assert_eq!(graph.children(comp), vec![first, extra]);
}

#[test]
fn expression_drops_into_an_embedded_hole() {
    let mut graph = BlockGraph::new();
    let hole = place(&mut graph, BlockKind::ExpressionHole, Point::new(40.0, 8.0));
    let stmt = graph
        .create_block(BlockKind::StackMiddle, vec!["say".into(), Content::Hole(hole)])
        .unwrap();
    graph.set_offset(stmt, Point::new(100.0, 100.0)).unwrap();
    let expr = place(&mut graph, BlockKind::Expression, Point::new(0.0, 400.0));

    let outcome = drag_to(&mut graph, expr, Point::new(143.0, 110.0));
    assert!(matches!(outcome, DragOutcome::Committed { .. }));
    assert_eq!(graph.child(hole), Some(expr));
    assert_eq!(graph.origin(expr).unwrap(), Point::new(140.0, 108.0));
    assert_eq!(graph.root_of(expr).unwrap(), stmt);

    // Dragging the statement carries the expression along.
    let outcome = drag_to(&mut graph, stmt, Point::new(0.0, 0.0));
    assert!(matches!(outcome, DragOutcome::Dropped { .. }));
    assert_eq!(graph.origin(expr).unwrap(), Point::new(40.0, 8.0));
}

#[test]
fn dragging_an_expression_out_of_its_hole_shrinks_the_host() {
    let mut graph = BlockGraph::new();
    let hole = graph.create_block(BlockKind::ExpressionHole, vec![]).unwrap();
    let stmt = graph
        .create_block(BlockKind::StackMiddle, vec![Content::Hole(hole)])
        .unwrap();
    let expr = graph.create_block(BlockKind::Expression, vec![]).unwrap();
    graph.link(hole, Port::Child, expr).unwrap();
    assert_eq!(graph.get(stmt).unwrap().fitted.size.width, 150.0);

    drag_to(&mut graph, expr, Point::new(600.0, 600.0));
    assert_eq!(graph.child(hole), None);
    assert_eq!(graph.get(stmt).unwrap().fitted.size.width, 120.0);
}

#[test]
fn a_block_is_never_offered_its_own_chain() {
    let mut graph = BlockGraph::new();
    let a = place(&mut graph, BlockKind::StackMiddle, Point::ORIGIN);
    let b = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    graph.link(a, Port::Next, b).unwrap();

    let mut drag = DragController::with_threshold(1000.0);
    drag.pointer_down(&mut graph, 1, a, Point::ORIGIN).unwrap();
    assert!(drag.active().unwrap().candidates().is_empty());
    let outcome = drag.pointer_up(&mut graph, 1).unwrap().outcome;
    assert!(matches!(outcome, DragOutcome::Dropped { .. }));
    graph.validate().unwrap();
}
