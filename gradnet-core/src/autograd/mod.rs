//! Reverse-mode automatic differentiation over an explicit, per-batch graph.

pub mod grad_check;
pub mod graph;

pub use graph::{Graph, Node};
