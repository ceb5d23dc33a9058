// gatenet-core/src/node.rs

use crate::ops::GateKind;
use crate::types::Scalar;
use std::fmt;

/// Stable handle of a node inside one [`Graph`](crate::graph::Graph).
///
/// Ids are arena indices. A gate can only be built from nodes that already
/// exist, so every input id is strictly smaller than the id of the gate
/// consuming it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the graph's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value held by a node.
///
/// Leaves and most gates hold a scalar. `Softmax` and `CrossEntropy`
/// produce one element per prediction and hold a vector.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<T> {
    Scalar(T),
    Vector(Vec<T>),
}

impl<T: Scalar> Value<T> {
    /// Returns the scalar, or `None` for a vector value.
    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Value::Scalar(v) => Some(*v),
            Value::Vector(_) => None,
        }
    }

    /// Views the value as a slice (a scalar is a one-element slice).
    pub fn as_slice(&self) -> &[T] {
        match self {
            Value::Scalar(v) => std::slice::from_ref(v),
            Value::Vector(values) => values,
        }
    }

    /// Sum of all elements.
    ///
    /// This is the quantity a backward pass differentiates when a vector
    /// gate is the sink, since the sink's own gradient is seeded with 1 for
    /// every element.
    pub fn total(&self) -> T {
        self.as_slice().iter().fold(T::zero(), |acc, &v| acc + v)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// `true` when every element is finite.
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|v| v.is_finite())
    }
}

impl<T: Scalar> fmt::Display for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(v) => write!(f, "{}", v),
            Value::Vector(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Closed set of node variants.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Leaf fed from outside before every forward pass.
    Placeholder,
    /// Trainable leaf, mutated only by optimizers.
    Parameter,
    /// Derived node. The input list is fixed at construction.
    Gate { kind: GateKind, inputs: Vec<NodeId> },
}

/// A single entry of the graph's arena.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub(crate) kind: NodeKind,
    pub(crate) value: Value<T>,
    /// Sum of contributions received from consumers during the current
    /// backward pass.
    pub(crate) grad: T,
    pub(crate) consumers: usize,
}

impl<T: Scalar> Node<T> {
    pub(crate) fn leaf(kind: NodeKind, value: T) -> Self {
        Node {
            kind,
            value: Value::Scalar(value),
            grad: T::zero(),
            consumers: 0,
        }
    }

    pub(crate) fn gate(kind: GateKind, inputs: Vec<NodeId>) -> Self {
        let value = kind.initial_value(inputs.len());
        Node {
            kind: NodeKind::Gate { kind, inputs },
            value,
            grad: T::zero(),
            consumers: 0,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn value(&self) -> &Value<T> {
        &self.value
    }

    pub fn grad(&self) -> T {
        self.grad
    }

    /// Input ids of a gate; empty for leaves.
    pub fn inputs(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Gate { inputs, .. } => inputs,
            NodeKind::Placeholder | NodeKind::Parameter => &[],
        }
    }

    /// `true` once at least one gate has been built on top of this node.
    pub fn has_consumers(&self) -> bool {
        self.consumers > 0
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, NodeKind::Parameter)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, NodeKind::Placeholder)
    }

    pub fn is_gate(&self) -> bool {
        matches!(self.kind, NodeKind::Gate { .. })
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Placeholder => "Placeholder",
            NodeKind::Parameter => "Parameter",
            NodeKind::Gate { kind, .. } => kind.name(),
        }
    }
}

/// Renders as `Kind(value, grad)`, e.g. `Parameter(3, 20)`.
impl<T: Scalar> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.name(), self.value, self.grad)
    }
}
