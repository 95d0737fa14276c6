use stemma_protocol::{Label, Node};
use thiserror::Error;

use crate::graph::DependencyGraph;

/// A structural invariant a reduced forest broke. Reported, never raised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeViolation {
    #[error("{count} nodes are labeled ROOT")]
    MultipleRoots { count: usize },

    #[error("root {text:?} hangs from {head:?}")]
    RootIsDependent { text: String, head: String },

    #[error("{text:?} has {count} heads")]
    MultipleHeads { text: String, count: usize },

    #[error("{head:?} takes {count} {label} dependents from its left")]
    DuplicateSubject { head: String, label: Label, count: usize },

    #[error("dependency edges form a cycle")]
    Cycle,
}

pub fn validate_tree(forest: &[Node]) -> Vec<TreeViolation> {
    DependencyGraph::from_forest(forest).validate()
}

impl DependencyGraph {
    /// Checks the graph against the invariants a reduction guarantees.
    pub fn validate(&self) -> Vec<TreeViolation> {
        let mut violations = Vec::new();

        let roots: Vec<_> = self
            .nodes()
            .filter(|&index| self.word(index).label == Some(Label::Root))
            .collect();
        if roots.len() > 1 {
            violations.push(TreeViolation::MultipleRoots { count: roots.len() });
        }
        for &root in &roots {
            if let Some(head) = self.head_of(root) {
                violations.push(TreeViolation::RootIsDependent {
                    text: self.word(root).text.clone(),
                    head: self.word(head).text.clone(),
                });
            }
        }

        for index in self.nodes() {
            let heads = self.heads_of(index).count();
            if heads > 1 {
                violations.push(TreeViolation::MultipleHeads {
                    text: self.word(index).text.clone(),
                    count: heads,
                });
            }

            let head = self.word(index);
            for label in [Label::Nsubj, Label::Nsubjpass] {
                let count = self
                    .dependents(index)
                    .filter(|&(dependent, l)| l == label && self.word(dependent).span.start < head.span.start)
                    .count();
                if count > 1 {
                    violations.push(TreeViolation::DuplicateSubject {
                        head: head.text.clone(),
                        label,
                        count,
                    });
                }
            }
        }

        if self.is_cyclic() {
            violations.push(TreeViolation::Cycle);
        }

        violations
    }
}
