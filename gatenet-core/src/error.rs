use crate::node::NodeId;
use thiserror::Error;

/// Custom error type for the GateNet engine.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum GateNetError {
    #[error("Unknown node {node}: the graph only holds {len} nodes")]
    UnknownNode { node: NodeId, len: usize },

    #[error("Arity mismatch for gate {gate}: expected {expected} input(s), got {actual}")]
    ArityMismatch {
        gate: String,
        expected: String,
        actual: usize,
    },

    #[error("Length mismatch during operation {operation}: expected {expected}, got {actual}")]
    LengthMismatch {
        expected: usize,
        actual: usize,
        operation: String,
    },

    #[error("Gate {gate} needs at least one input")]
    EmptyInputs { gate: String },

    #[error("Node {node} holds a vector value and cannot feed gate {gate}")]
    NonScalarInput { node: NodeId, gate: String },

    #[error("Node {0} holds a vector value, not a scalar")]
    NonScalarValue(NodeId),

    #[error("Node {0} is not a placeholder")]
    NotAPlaceholder(NodeId),

    #[error("Node {0} is not a parameter")]
    NotAParameter(NodeId),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Optimizer error: {0}")]
    OptimizerError(String),

    #[error("No optimizer state attached to parameter {0}")]
    MissingOptimizerState(NodeId),

    #[error("Internal error: {0}")]
    InternalError(String),
}
