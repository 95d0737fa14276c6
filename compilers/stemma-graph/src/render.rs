use std::fmt::Write;

use stemma_protocol::Node;

/// Indented text view of a forest, one line per node. Dependents are listed
/// under their head in sentence order, each prefixed by its label.
///
/// ```text
/// ROOT sat (VP)
///   nsubj the cat (NP)
///   prep on (PP)
///     pobj the mat (NP)
///   punct . (.)
/// ```
pub fn render_tree(forest: &[Node]) -> String {
    let mut out = String::new();
    for tree in forest {
        render_node(&mut out, tree, 0);
    }
    out
}

fn render_node(out: &mut String, node: &Node, depth: usize) {
    let label = node.label.map_or("-", |label| label.as_str());
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:indent$}{} {} ({})", "", label, node.chunk.text(), node.chunk.kind, indent = depth * 2);

    for child in node.children() {
        render_node(out, child, depth + 1);
    }
}
