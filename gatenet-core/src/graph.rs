// gatenet-core/src/graph.rs

use crate::autograd::graph::build_topo;
use crate::error::GateNetError;
use crate::node::{Node, NodeId, NodeKind, Value};
use crate::ops::{GateKind, Reduction};
use crate::types::{widen, Scalar};
use log::{debug, trace, warn};

/// Arena owning every node of one computation graph.
///
/// Nodes are appended and never removed. Gates refer to their inputs by
/// [`NodeId`], so the graph holds no reference cycles even though the data
/// dependencies form a general DAG.
///
/// A training step looks like:
///
/// ```
/// use gatenet_core::{Graph, Reduction};
///
/// let mut graph: Graph = Graph::new();
/// let w = graph.parameter(0.5);
/// let x = graph.placeholder();
/// let y = graph.placeholder();
/// let prediction = graph.mul_ab(w, x).unwrap();
/// let loss = graph.mse(&[prediction], &[y], Reduction::Mean).unwrap();
///
/// graph.set_placeholder(x, 3.0).unwrap();
/// graph.set_placeholder(y, 6.0).unwrap();
/// graph.compute(loss).unwrap();
/// graph.nullify_grads();
/// let parameters = graph.compute_grads_of(loss).unwrap();
/// assert_eq!(parameters, vec![w]);
/// assert_eq!(graph.grad(w).unwrap(), 2.0 * (1.5 - 6.0) * 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Graph<T = f64> {
    nodes: Vec<Node<T>>,
    /// Topological order of the last sink requested.
    topo_cache: Option<(NodeId, Vec<NodeId>)>,
}

impl<T: Scalar> Default for Graph<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> Graph<T> {
    pub fn new() -> Self {
        Graph {
            nodes: Vec::new(),
            topo_cache: None,
        }
    }

    /// Number of registered nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Construction ---

    /// Registers a placeholder holding zero until it is fed.
    pub fn placeholder(&mut self) -> NodeId {
        self.push(Node::leaf(NodeKind::Placeholder, T::zero()))
    }

    /// Registers a trainable parameter.
    pub fn parameter(&mut self, value: T) -> NodeId {
        self.push(Node::leaf(NodeKind::Parameter, value))
    }

    /// Registers a gate of any kind over `inputs`.
    ///
    /// # Errors
    /// - `EmptyInputs` / `ArityMismatch` when the input count does not fit `kind`.
    /// - `UnknownNode` when an input is not part of this graph.
    /// - `NonScalarInput` when an input is a vector-valued gate.
    pub fn gate(&mut self, kind: GateKind, inputs: &[NodeId]) -> Result<NodeId, GateNetError> {
        kind.check_arity(inputs.len())?;
        for &input in inputs {
            if let NodeKind::Gate { kind: input_kind, .. } = self.node(input)?.kind() {
                if input_kind.is_vector_valued() {
                    return Err(GateNetError::NonScalarInput {
                        node: input,
                        gate: kind.name().to_string(),
                    });
                }
            }
        }
        for &input in inputs {
            self.nodes[input.0].consumers += 1;
        }
        let id = self.push(Node::gate(kind, inputs.to_vec()));
        trace!("Registered gate {} {} over {:?}", id, kind, inputs);
        Ok(id)
    }

    pub fn add(&mut self, inputs: &[NodeId]) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::Add, inputs)
    }

    pub fn mul(&mut self, inputs: &[NodeId]) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::Mul, inputs)
    }

    pub fn mul_ab(&mut self, a: NodeId, b: NodeId) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::MulAB, &[a, b])
    }

    pub fn relu(&mut self, x: NodeId) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::Relu, &[x])
    }

    pub fn sigmoid(&mut self, x: NodeId) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::Sigmoid, &[x])
    }

    /// Vector-valued softmax over `inputs`.
    pub fn softmax(&mut self, inputs: &[NodeId]) -> Result<NodeId, GateNetError> {
        self.gate(GateKind::Softmax, inputs)
    }

    /// Same gate as [`Graph::softmax`]; its local gradients are those of
    /// log-softmax.
    pub fn logp(&mut self, inputs: &[NodeId]) -> Result<NodeId, GateNetError> {
        self.softmax(inputs)
    }

    /// Squared error between `y_hat` and `y`, which must have equal length.
    pub fn mse(
        &mut self,
        y_hat: &[NodeId],
        y: &[NodeId],
        reduction: Reduction,
    ) -> Result<NodeId, GateNetError> {
        self.paired_gate(GateKind::Mse(reduction), y_hat, y)
    }

    /// Element-wise binary cross entropy between `y_hat` and labels `y`.
    pub fn cross_entropy(&mut self, y_hat: &[NodeId], y: &[NodeId]) -> Result<NodeId, GateNetError> {
        self.paired_gate(GateKind::CrossEntropy, y_hat, y)
    }

    fn paired_gate(
        &mut self,
        kind: GateKind,
        y_hat: &[NodeId],
        y: &[NodeId],
    ) -> Result<NodeId, GateNetError> {
        if y_hat.len() != y.len() {
            return Err(GateNetError::LengthMismatch {
                expected: y_hat.len(),
                actual: y.len(),
                operation: kind.name().to_string(),
            });
        }
        let inputs: Vec<NodeId> = y_hat.iter().chain(y.iter()).copied().collect();
        self.gate(kind, &inputs)
    }

    fn push(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // --- Access ---

    pub fn node(&self, id: NodeId) -> Result<&Node<T>, GateNetError> {
        self.nodes.get(id.0).ok_or(GateNetError::UnknownNode {
            node: id,
            len: self.nodes.len(),
        })
    }

    pub fn value(&self, id: NodeId) -> Result<&Value<T>, GateNetError> {
        Ok(&self.node(id)?.value)
    }

    /// Scalar value of `id`; `NonScalarValue` for vector gates.
    pub fn scalar(&self, id: NodeId) -> Result<T, GateNetError> {
        self.node(id)?
            .value
            .as_scalar()
            .ok_or(GateNetError::NonScalarValue(id))
    }

    /// Accumulated gradient of the last backward pass.
    pub fn grad(&self, id: NodeId) -> Result<T, GateNetError> {
        Ok(self.node(id)?.grad)
    }

    pub fn inputs(&self, id: NodeId) -> Result<&[NodeId], GateNetError> {
        Ok(self.node(id)?.inputs())
    }

    pub fn has_consumers(&self, id: NodeId) -> Result<bool, GateNetError> {
        Ok(self.node(id)?.has_consumers())
    }

    /// Ids of every parameter, in registration order.
    pub fn parameters(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids_where(Node::is_parameter)
    }

    /// Ids of every placeholder, in registration order.
    pub fn placeholders(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids_where(Node::is_placeholder)
    }

    fn ids_where<'a>(
        &'a self,
        predicate: fn(&Node<T>) -> bool,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| predicate(node))
            .map(|(index, _)| NodeId(index))
    }

    /// Rebinds an input value before a forward pass.
    pub fn set_placeholder(&mut self, id: NodeId, value: T) -> Result<(), GateNetError> {
        let node = self.node_mut(id)?;
        if !node.is_placeholder() {
            return Err(GateNetError::NotAPlaceholder(id));
        }
        node.value = Value::Scalar(value);
        Ok(())
    }

    /// Mutable access to a parameter's value, reserved for optimizers and
    /// the gradient checker.
    pub(crate) fn parameter_value_mut(&mut self, id: NodeId) -> Result<&mut T, GateNetError> {
        let node = self.node_mut(id)?;
        match (&node.kind, &mut node.value) {
            (NodeKind::Parameter, Value::Scalar(value)) => Ok(value),
            _ => Err(GateNetError::NotAParameter(id)),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<T>, GateNetError> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.0)
            .ok_or(GateNetError::UnknownNode { node: id, len })
    }

    // --- Traversal ---

    /// Topological order of every node `sink` depends on, `sink` last.
    ///
    /// The order is cached for the most recent sink only; asking for a
    /// different sink rebuilds it. Because inputs never change after
    /// construction, the cached order stays valid while new nodes are added.
    pub fn topological_order(&mut self, sink: NodeId) -> Result<&[NodeId], GateNetError> {
        self.node(sink)?;
        let cached = matches!(&self.topo_cache, Some((cached_sink, _)) if *cached_sink == sink);
        if !cached {
            let order = build_topo(&self.nodes, sink);
            debug!("Built topological order for sink {}: {} node(s)", sink, order.len());
            self.topo_cache = Some((sink, order));
        }
        match &self.topo_cache {
            Some((_, order)) => Ok(order),
            None => Err(GateNetError::InternalError(
                "topological order cache is empty after being filled".to_string(),
            )),
        }
    }

    /// Parameters `sink` depends on, in reverse-topological order: the same
    /// list [`Graph::compute_grads_of`] returns, without running a backward
    /// pass.
    pub fn parameters_of(&mut self, sink: NodeId) -> Result<Vec<NodeId>, GateNetError> {
        self.with_order(sink, |graph, order| Ok(graph.reversed_parameters(order)))
    }

    fn reversed_parameters(&self, order: &[NodeId]) -> Vec<NodeId> {
        order
            .iter()
            .rev()
            .copied()
            .filter(|id| self.nodes[id.0].is_parameter())
            .collect()
    }

    /// Runs `f` over the cached order of `sink` without cloning it.
    fn with_order<R>(
        &mut self,
        sink: NodeId,
        f: impl FnOnce(&mut Self, &[NodeId]) -> Result<R, GateNetError>,
    ) -> Result<R, GateNetError> {
        self.topological_order(sink)?;
        let (cached_sink, order) = self.topo_cache.take().ok_or_else(|| {
            GateNetError::InternalError("topological order cache is empty".to_string())
        })?;
        let result = f(self, &order);
        self.topo_cache = Some((cached_sink, order));
        result
    }

    /// Forward pass: evaluates every gate `sink` depends on, inputs first.
    /// Leaves keep the values they hold.
    pub fn compute(&mut self, sink: NodeId) -> Result<(), GateNetError> {
        self.with_order(sink, |graph, order| {
            for &id in order {
                graph.evaluate(id)?;
            }
            Ok(())
        })
    }

    /// Forward-evaluates every gate of the graph in registration order,
    /// which is itself a topological order.
    pub fn execute(&mut self) -> Result<(), GateNetError> {
        for index in 0..self.nodes.len() {
            self.evaluate(NodeId(index))?;
        }
        Ok(())
    }

    fn evaluate(&mut self, id: NodeId) -> Result<(), GateNetError> {
        let kind = match &self.nodes[id.0].kind {
            NodeKind::Gate { kind, .. } => *kind,
            NodeKind::Placeholder | NodeKind::Parameter => return Ok(()),
        };
        let input_values = self.input_values(id)?;
        let value = kind.forward(&input_values);
        if !value.is_finite() {
            warn!("Gate {} {} produced a non-finite value: {}", id, kind, value);
        }
        trace!("forward {} {} = {}", id, kind, value);
        self.nodes[id.0].value = value;
        Ok(())
    }

    /// Current scalar values of the inputs of gate `id`.
    fn input_values(&self, id: NodeId) -> Result<Vec<T>, GateNetError> {
        self.nodes[id.0]
            .inputs()
            .iter()
            .map(|&input| {
                self.nodes[input.0]
                    .value
                    .as_scalar()
                    .ok_or(GateNetError::NonScalarValue(input))
            })
            .collect()
    }

    /// Resets every gradient accumulator to zero.
    ///
    /// Must run before each backward pass, otherwise the previous pass leaks
    /// into the new gradients.
    pub fn nullify_grads(&mut self) {
        for node in self.nodes.iter_mut() {
            node.grad = T::zero();
        }
    }

    /// Backward pass from `sink`.
    ///
    /// Walks the topological order in reverse. Each gate computes its local
    /// gradients and adds `dz * local[i]` into input i's accumulator, where
    /// `dz` is 1 for the sink and the gate's own accumulated gradient
    /// otherwise. Once the whole traversal has finished, the parameters met
    /// along the way are returned in reverse-topological order; their
    /// gradients are final at that point.
    ///
    /// Accumulators are added to, never overwritten: call
    /// [`Graph::nullify_grads`] first.
    pub fn compute_grads_of(&mut self, sink: NodeId) -> Result<Vec<NodeId>, GateNetError> {
        self.with_order(sink, |graph, order| {
            graph.backward(sink, order)?;
            let parameters = graph.reversed_parameters(order);
            debug!(
                "Backward pass from {} reached {} parameter(s)",
                sink,
                parameters.len()
            );
            Ok(parameters)
        })
    }

    fn backward(&mut self, sink: NodeId, order: &[NodeId]) -> Result<(), GateNetError> {
        let sink_node = &mut self.nodes[sink.0];
        if !sink_node.is_gate() {
            sink_node.grad = sink_node.grad + T::one();
        }

        for &id in order.iter().rev() {
            let node = &self.nodes[id.0];
            let kind = match &node.kind {
                NodeKind::Gate { kind, .. } => *kind,
                NodeKind::Placeholder | NodeKind::Parameter => continue,
            };
            let dz = if id == sink || !node.has_consumers() {
                T::one()
            } else {
                node.grad
            };
            let input_values = self.input_values(id)?;
            let local_grads = kind.local_grads(&input_values, &node.value);
            let contributions: Vec<(NodeId, T)> = node
                .inputs()
                .iter()
                .copied()
                .zip(local_grads.into_iter().map(|g| dz * g))
                .collect();
            trace!("backward {} {} dz = {}", id, kind, widen(dz));

            for (input, contribution) in contributions {
                let input_node = &mut self.nodes[input.0];
                input_node.grad = input_node.grad + contribution;
            }
        }
        Ok(())
    }
}

// --- Tests ---
#[cfg(test)]
#[path = "graph_test.rs"]
mod tests;
