pub mod checks;
pub mod graph;
pub mod render;

pub use checks::{validate_tree, TreeViolation};
pub use graph::{DependencyGraph, Edge, Word};
pub use render::render_tree;
