use thiserror::Error;

/// Custom error type for the gradnet engine.
///
/// Every variant describes a structural problem (a wiring bug in the model or a
/// malformed batch). None of them is transient, so callers are expected to abort
/// the current batch by propagating the error with `?`.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum GradnetError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Index out of bounds: index {index:?} for shape {shape:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    #[error("Operation {operation} expects {expected} parent(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown node {index}: graph only holds {len} node(s)")]
    UnknownNode { index: usize, len: usize },

    #[error("Node belongs to graph {node_graph}, not to graph {graph}")]
    ForeignNode { node_graph: usize, graph: usize },

    #[error("Variable with shape {shape:?} is not registered with this graph")]
    UnregisteredVariable { shape: Vec<usize> },

    #[error("Variable with shape {shape:?} is borrowed and cannot be updated")]
    VariableBorrowed { shape: Vec<usize> },

    #[error("Backprop requires a scalar last node, got shape {shape:?}")]
    BackwardNonScalar { shape: Vec<usize> },

    #[error("Backprop called on a graph without nodes")]
    EmptyGraph,

    #[error("Invalid target for {operation}: {reason}")]
    InvalidTarget { operation: String, reason: String },

    #[error("Internal error: {0}")]
    InternalError(String),
}
