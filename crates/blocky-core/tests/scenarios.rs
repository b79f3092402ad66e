//! End-to-end scenarios through the public API of `blocky_core`.

use blocky_core::{
    link_test, nearest, BlockGraph, BlockKind, Content, GraphEvent, Point, Port, Rect, Size,
};

#[test]
fn build_and_split_a_stack() {
    let mut graph = BlockGraph::new();
    let t = graph.create_block(BlockKind::StackTop, vec!["when clicked".into()]).unwrap();
    let m = graph.create_block(BlockKind::StackMiddle, vec!["move".into()]).unwrap();
    let b = graph.create_block(BlockKind::StackBottom, vec!["stop".into()]).unwrap();

    graph.link(t, Port::Next, m).unwrap();
    graph.link(m, Port::Next, b).unwrap();
    assert_eq!(graph.chain(t), vec![t, m, b]);
    assert_eq!(graph.roots(), vec![t]);

    assert_eq!(graph.unlink(m, Port::Last).unwrap(), Some(t));
    assert_eq!(graph.roots(), vec![t, m]);
    assert_eq!(graph.chain(t), vec![t]);
    assert_eq!(graph.chain(m), vec![m, b]);
    assert_eq!(graph.root_of(b).unwrap(), m);
}

#[test]
fn splice_into_the_middle_of_a_stack() {
    let mut graph = BlockGraph::new();
    let a = graph.create_block(BlockKind::StackTop, vec![]).unwrap();
    let b = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    let c = graph.create_block(BlockKind::StackBottom, vec![]).unwrap();
    graph.link(a, Port::Next, b).unwrap();
    graph.link(b, Port::Next, c).unwrap();
    let d = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();

    graph.link(a, Port::Next, d).unwrap();
    assert_eq!(graph.chain(a), vec![a, d, b, c]);
    assert_eq!(graph.last(d), Some(a));
    assert_eq!(graph.last(b), Some(d));
    assert_eq!(graph.next(b), Some(c));
}

#[test]
fn matcher_radius_boundary() {
    let mut graph = BlockGraph::new();
    let top = graph.create_block(BlockKind::StackTop, vec![]).unwrap();
    let mid = graph.create_block(BlockKind::StackMiddle, vec![]).unwrap();
    let radius = 30.0;
    let size = graph.get(mid).unwrap().fitted.size;

    // top's next anchor is (0, 40).
    let inside = Rect::from_origin_size(Point::new(18.0, 64.0), size);
    let found = nearest(&graph, &graph, mid, &inside, [top], radius).unwrap();
    assert_eq!(found.port, Port::Last);
    assert_eq!(found.target, top);
    assert!((found.distance - radius).abs() < 1e-9);

    let outside = Rect::from_origin_size(Point::new(radius + 5.0, 40.0), size);
    assert!(nearest(&graph, &graph, mid, &outside, [top], radius).is_none());
    assert_eq!(
        link_test(&graph, &graph, mid, &outside, top).map(|m| m.distance),
        Some(radius + 5.0)
    );
}

#[test]
fn child_height_propagates_through_the_composite() {
    let mut graph = BlockGraph::new();
    let top = graph.create_block(BlockKind::StackTop, vec![]).unwrap();
    let comp = graph.create_block(BlockKind::Composite, vec![]).unwrap();
    let after = graph.create_block(BlockKind::StackBottom, vec![]).unwrap();
    graph.set_size(comp, Size::new(120.0, 20.0)).unwrap();
    graph.link(top, Port::Next, comp).unwrap();
    graph.link(comp, Port::Next, after).unwrap();
    assert_eq!(graph.get(comp).unwrap().fitted.container, Size::ZERO);
    assert_eq!(graph.origin(after).unwrap(), Point::new(0.0, 60.0));

    let child = graph.create_block(BlockKind::Contained, vec![]).unwrap();
    graph.set_size(child, Size::new(100.0, 40.0)).unwrap();
    graph.take_events();
    graph.link(comp, Port::Child, child).unwrap();

    let fitted = graph.get(comp).unwrap().fitted;
    assert_eq!(fitted.container.height, 40.0);
    assert_eq!(fitted.size.height, 40.0);
    assert!(graph.take_events().contains(&GraphEvent::Resized {
        id: comp,
        size: Size::new(120.0, 40.0),
        container: Size::new(100.0, 40.0),
    }));
    // Everything after the composite moves down with it.
    assert_eq!(graph.origin(after).unwrap(), Point::new(0.0, 80.0));
}

#[test]
fn nested_holes_grow_every_host() {
    let mut graph = BlockGraph::new();
    let outer_hole = graph.create_block(BlockKind::ExpressionHole, vec![]).unwrap();
    let stmt = graph
        .create_block(BlockKind::StackMiddle, vec!["say".into(), Content::Hole(outer_hole)])
        .unwrap();
    let inner_hole = graph.create_block(BlockKind::ExpressionHole, vec![]).unwrap();
    let expr = graph
        .create_block(BlockKind::Expression, vec!["join".into(), Content::Hole(inner_hole)])
        .unwrap();
    graph.link(outer_hole, Port::Child, expr).unwrap();
    let stmt_width = graph.get(stmt).unwrap().fitted.size.width;

    let leaf = graph.create_block(BlockKind::Expression, vec![]).unwrap();
    graph.set_size(leaf, Size::new(90.0, 24.0)).unwrap();
    graph.link(inner_hole, Port::Child, leaf).unwrap();

    // The inner hole widens by 60, and so does every block around it.
    assert_eq!(graph.get(inner_hole).unwrap().fitted.size.width, 90.0);
    assert_eq!(graph.get(expr).unwrap().fitted.size.width, 60.0 + 60.0);
    assert_eq!(graph.get(stmt).unwrap().fitted.size.width, stmt_width + 60.0);
    assert_eq!(graph.root_of(leaf).unwrap(), stmt);
    graph.validate().unwrap();
}
