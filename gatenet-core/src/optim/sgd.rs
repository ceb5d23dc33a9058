use log::debug;

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_learning_rate, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::Scalar;

/// Implements plain Stochastic Gradient Descent.
///
/// `value -= lr * dx`
#[derive(Debug, Clone)]
pub struct Sgd<T> {
    lr: T,
    group: ParamGroup<()>,
}

impl<T: Scalar> Sgd<T> {
    /// Creates a new `Sgd` optimizer for the parameters `target` depends on.
    ///
    /// # Arguments
    ///
    /// * `graph`: The graph holding `target`.
    /// * `target`: The cost node to minimize.
    /// * `lr`: The learning rate.
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        check_learning_rate(lr)?;
        let group = ParamGroup::attach(graph, target, || ())?;
        debug!(
            "Sgd: attached to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(Sgd { lr, group })
    }
}

impl<T: Scalar> Optimizer<T> for Sgd<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let lr = self.lr;
        let updated = self.group.step(graph, |_, dx| -(lr * dx))?;
        debug!("Sgd: step updated {} parameter(s)", updated);
        Ok(())
    }

    fn target(&self) -> NodeId {
        self.group.target()
    }

    fn parameters(&self) -> &[NodeId] {
        self.group.params()
    }

    fn learning_rate(&self) -> T {
        self.lr
    }

    fn set_learning_rate(&mut self, lr: T) -> Result<(), GateNetError> {
        check_learning_rate(lr)?;
        self.lr = lr;
        Ok(())
    }

    fn state_dict(&self) -> OptimizerState<T> {
        OptimizerState::Sgd
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::Sgd => Ok(()),
            other => Err(other.mismatch("Sgd")),
        }
    }
}
