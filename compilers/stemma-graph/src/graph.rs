use std::fmt;

use petgraph::dot::Dot;
use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction as Edges};
use stemma_protocol::{Category, Label, Node, Span};

/// One word-group of the sentence as a graph vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub kind: Category,
    pub span: Span,
    /// The label the node carried in the forest (ROOT, or its relation to its head).
    pub label: Option<Label>,
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.kind)
    }
}

/// A head -> dependent edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub head: NodeIndex,
    pub dependent: NodeIndex,
    pub label: Label,
}

/// Flat view of a reduced forest: one vertex per node, one labeled edge per
/// attachment, pointing from head to dependent.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    graph: Graph<Word, Label, Directed>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_forest(forest: &[Node]) -> Self {
        let mut graph = Self::new();
        for tree in forest {
            graph.insert_tree(tree);
        }
        graph
    }

    fn insert_tree(&mut self, node: &Node) -> NodeIndex {
        let head = self.add_word(Word {
            text: node.chunk.text(),
            kind: node.chunk.kind,
            span: node.chunk.span,
            label: node.label,
        });

        for child in node.children() {
            let dependent = self.insert_tree(child);
            // Children of a forest node are always labeled; Dep covers
            // hand-built forests that skipped it.
            self.attach(head, dependent, child.label.unwrap_or(Label::Dep));
        }
        head
    }

    pub fn add_word(&mut self, word: Word) -> NodeIndex {
        self.graph.add_node(word)
    }

    pub fn attach(&mut self, head: NodeIndex, dependent: NodeIndex, label: Label) {
        self.graph.add_edge(head, dependent, label);
    }

    pub fn word(&self, index: NodeIndex) -> &Word {
        &self.graph[index]
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// The head `index` hangs from, if any.
    pub fn head_of(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .edges_directed(index, Edges::Incoming)
            .next()
            .map(|edge| edge.source())
    }

    pub fn heads_of(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph
            .edges_directed(index, Edges::Incoming)
            .map(|edge| edge.source())
    }

    /// Dependents of `index`, with their labels.
    pub fn dependents(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, Label)> + '_ {
        self.graph
            .edges_directed(index, Edges::Outgoing)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// Vertices nothing points at, in sentence order.
    pub fn roots(&self) -> Vec<NodeIndex> {
        let mut roots: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|&index| self.head_of(index).is_none())
            .collect();
        roots.sort_by_key(|&index| self.graph[index].span.start);
        roots
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.graph
            .edge_references()
            .map(|edge| Edge {
                head: edge.source(),
                dependent: edge.target(),
                label: *edge.weight(),
            })
            .collect()
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn is_cyclic(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Graphviz rendering, heads pointing at dependents.
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::new(&self.graph))
    }
}
