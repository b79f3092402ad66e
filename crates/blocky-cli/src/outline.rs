//! Plain-text outline of a block graph.

use blocky_core::{BlockGraph, BlockId};

/// One line per block, indented by nesting: roots with their absolute
/// position, chain members below them, child containers and embedded holes
/// one level deeper.
pub fn render(graph: &BlockGraph) -> String {
    let mut out = String::new();
    for root in graph.roots() {
        write_chain(graph, root, 0, &mut out);
    }
    out
}

fn write_chain(graph: &BlockGraph, head: BlockId, depth: usize, out: &mut String) {
    for id in graph.chain(head) {
        let Some(block) = graph.get(id) else { continue };
        let indent = "  ".repeat(depth);
        let mut line = format!("{indent}{id} {}", block.kind);
        let label = block.label();
        if !label.is_empty() {
            line.push_str(&format!(" \"{label}\""));
        }
        if graph.is_root(id) {
            if let Ok(at) = graph.origin(id) {
                line.push_str(&format!(" at ({}, {})", at.x, at.y));
            }
        }
        if !block.enabled {
            line.push_str(" [disabled]");
        }
        out.push_str(&line);
        out.push('\n');

        for hole in block.holes() {
            out.push_str(&format!("{indent}  hole {hole}\n"));
            if let Some(expr) = graph.child(hole) {
                write_chain(graph, expr, depth + 2, out);
            }
        }
        if let Some(first) = graph.child(id) {
            write_chain(graph, first, depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use blocky_core::{BlockKind, Content, Point, Port};

    use super::*;

    #[test]
    fn outline_nests_children_and_holes() {
        let mut graph = BlockGraph::new();
        let top = graph
            .create_block(BlockKind::StackTop, vec!["when clicked".into()])
            .unwrap();
        let hole = graph.create_block(BlockKind::ExpressionHole, vec![]).unwrap();
        let say = graph
            .create_block(BlockKind::StackMiddle, vec!["say".into(), Content::Hole(hole)])
            .unwrap();
        let expr = graph
            .create_block(BlockKind::Expression, vec!["hello".into()])
            .unwrap();
        let comp = graph
            .create_block(BlockKind::Composite, vec!["repeat".into()])
            .unwrap();
        let inner = graph
            .create_block(BlockKind::Contained, vec!["step".into()])
            .unwrap();
        graph.link(top, Port::Next, say).unwrap();
        graph.link(hole, Port::Child, expr).unwrap();
        graph.link(say, Port::Next, comp).unwrap();
        graph.link(comp, Port::Child, inner).unwrap();
        graph.set_offset(top, Point::new(10.0, 20.0)).unwrap();

        let expected = "\
#0 stackTop \"when clicked\" at (10, 20)
#2 stackMiddle \"say []\"
  hole #1
    #3 expression \"hello\"
#4 composite \"repeat\"
  #5 contained \"step\"
";
        assert_eq!(render(&graph), expected);
    }
}
