use log::{debug, warn};

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::momentum::MomentumHyperParams;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_learning_rate, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::Scalar;

/// Hyperparameters of [`Nag`]; identical to the momentum ones.
pub type NagHyperParams<T> = MomentumHyperParams<T>;

/// Nesterov accelerated gradient.
///
/// ```text
/// v_prev = v
/// v = mu * v - lr * dx
/// value += -mu * v_prev + (1 + mu) * v
/// ```
#[derive(Debug, Clone)]
pub struct Nag<T> {
    hyper: NagHyperParams<T>,
    group: ParamGroup<T>,
}

impl<T: Scalar> Nag<T> {
    /// Creates a `Nag` optimizer with the default `mu`.
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        Self::with_hyperparams(
            graph,
            target,
            NagHyperParams {
                lr,
                ..Default::default()
            },
        )
    }

    pub fn with_hyperparams(
        graph: &mut Graph<T>,
        target: NodeId,
        hyper: NagHyperParams<T>,
    ) -> Result<Self, GateNetError> {
        hyper.validate()?;
        let group = ParamGroup::attach(graph, target, T::zero)?;
        debug!(
            "Nag: attached velocity to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(Nag { hyper, group })
    }

    pub fn hyperparams(&self) -> &NagHyperParams<T> {
        &self.hyper
    }

    pub fn velocity(&self, param: NodeId) -> Option<T> {
        self.group.state(param).copied()
    }
}

impl<T: Scalar> Optimizer<T> for Nag<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let NagHyperParams { lr, mu } = self.hyper;
        let updated = self.group.step(graph, |v, dx| {
            let v_prev = *v;
            *v = mu * *v - lr * dx;
            -mu * v_prev + (T::one() + mu) * *v
        })?;
        debug!("Nag: step updated {} parameter(s)", updated);
        Ok(())
    }

    fn target(&self) -> NodeId {
        self.group.target()
    }

    fn parameters(&self) -> &[NodeId] {
        self.group.params()
    }

    fn learning_rate(&self) -> T {
        self.hyper.lr
    }

    fn set_learning_rate(&mut self, lr: T) -> Result<(), GateNetError> {
        check_learning_rate(lr)?;
        self.hyper.lr = lr;
        Ok(())
    }

    fn state_dict(&self) -> OptimizerState<T> {
        OptimizerState::Nag {
            velocity: self.group.snapshot(),
        }
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::Nag { velocity } => self.group.restore(velocity),
            OptimizerState::Momentum { velocity } => {
                warn!("Nag: loading velocity saved by Momentum");
                self.group.restore(velocity)
            }
            other => Err(other.mismatch("Nag")),
        }
    }
}
