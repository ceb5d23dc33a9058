use std::collections::HashMap;

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::types::Scalar;

/// Side table of per-parameter optimizer state for one target node.
///
/// Built when the optimizer is constructed: every parameter reachable from
/// the target gets a fresh state record. The table belongs to the optimizer
/// and is dropped with it; parameters themselves never carry optimizer data.
#[derive(Clone, Debug)]
pub struct ParamGroup<S> {
    target: NodeId,
    /// Reachable parameters, reverse-topological order.
    params: Vec<NodeId>,
    state: HashMap<NodeId, S>,
}

impl<S> ParamGroup<S> {
    /// Attaches a state record created by `init` to every parameter
    /// reachable from `target`.
    pub(crate) fn attach<T: Scalar>(
        graph: &mut Graph<T>,
        target: NodeId,
        init: impl Fn() -> S,
    ) -> Result<Self, GateNetError> {
        let params = graph.parameters_of(target)?;
        let state = params.iter().map(|&id| (id, init())).collect();
        Ok(ParamGroup {
            target,
            params,
            state,
        })
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn params(&self) -> &[NodeId] {
        &self.params
    }

    /// State record of `param`, if it belongs to this group.
    pub fn state(&self, param: NodeId) -> Option<&S> {
        self.state.get(&param)
    }

    /// Runs the backward pass from the target and applies `update` to each
    /// parameter it reaches.
    ///
    /// `update` receives the parameter's state record and its gradient and
    /// returns the amount to add to the parameter's value. Returns the number
    /// of parameters updated.
    pub(crate) fn step<T: Scalar>(
        &mut self,
        graph: &mut Graph<T>,
        mut update: impl FnMut(&mut S, T) -> T,
    ) -> Result<usize, GateNetError> {
        let params = graph.compute_grads_of(self.target)?;
        for &id in &params {
            let dx = graph.grad(id)?;
            let state = self
                .state
                .get_mut(&id)
                .ok_or(GateNetError::MissingOptimizerState(id))?;
            let delta = update(state, dx);
            let value = graph.parameter_value_mut(id)?;
            *value = *value + delta;
        }
        Ok(params.len())
    }
}

impl<S: Clone> ParamGroup<S> {
    pub(crate) fn snapshot(&self) -> HashMap<NodeId, S> {
        self.state.clone()
    }

    /// Replaces every record with the one in `incoming`, which must cover
    /// exactly this group's parameters.
    pub(crate) fn restore(&mut self, incoming: &HashMap<NodeId, S>) -> Result<(), GateNetError> {
        if incoming.len() != self.params.len() {
            return Err(GateNetError::OptimizerError(format!(
                "State covers {} parameter(s), optimizer has {}",
                incoming.len(),
                self.params.len()
            )));
        }
        if let Some(foreign) = incoming.keys().find(|id| !self.state.contains_key(id)) {
            return Err(GateNetError::OptimizerError(format!(
                "State holds parameter {} which is not reachable from target {}",
                foreign, self.target
            )));
        }
        self.state = incoming.clone();
        Ok(())
    }
}
