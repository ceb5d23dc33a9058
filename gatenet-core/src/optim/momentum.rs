use log::{debug, warn};

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_learning_rate, check_range, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::{lit, Scalar};

/// Hyperparameters shared by [`Momentum`] and [`Nag`](super::nag::Nag).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MomentumHyperParams<T> {
    pub lr: T,
    /// Velocity retention factor, in `[0, 1)`.
    pub mu: T,
}

impl<T: Scalar> Default for MomentumHyperParams<T> {
    fn default() -> Self {
        MomentumHyperParams {
            lr: lit(0.01),
            mu: lit(0.99),
        }
    }
}

impl<T: Scalar> MomentumHyperParams<T> {
    pub(crate) fn validate(&self) -> Result<(), GateNetError> {
        check_learning_rate(self.lr)?;
        check_range("mu", self.mu, T::zero(), T::one(), false)
    }
}

/// Gradient descent with classical momentum.
///
/// ```text
/// v = mu * v - lr * dx
/// value += v
/// ```
#[derive(Debug, Clone)]
pub struct Momentum<T> {
    hyper: MomentumHyperParams<T>,
    group: ParamGroup<T>,
}

impl<T: Scalar> Momentum<T> {
    /// Creates a `Momentum` optimizer with the default `mu`.
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        Self::with_hyperparams(
            graph,
            target,
            MomentumHyperParams {
                lr,
                ..Default::default()
            },
        )
    }

    pub fn with_hyperparams(
        graph: &mut Graph<T>,
        target: NodeId,
        hyper: MomentumHyperParams<T>,
    ) -> Result<Self, GateNetError> {
        hyper.validate()?;
        let group = ParamGroup::attach(graph, target, T::zero)?;
        debug!(
            "Momentum: attached velocity to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(Momentum { hyper, group })
    }

    pub fn hyperparams(&self) -> &MomentumHyperParams<T> {
        &self.hyper
    }

    /// Current velocity of `param`.
    pub fn velocity(&self, param: NodeId) -> Option<T> {
        self.group.state(param).copied()
    }
}

impl<T: Scalar> Optimizer<T> for Momentum<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let MomentumHyperParams { lr, mu } = self.hyper;
        let updated = self.group.step(graph, |v, dx| {
            *v = mu * *v - lr * dx;
            *v
        })?;
        debug!("Momentum: step updated {} parameter(s)", updated);
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
        OptimizerState::Momentum {
            velocity: self.group.snapshot(),
        }
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::Momentum { velocity } => self.group.restore(velocity),
            OptimizerState::Nag { velocity } => {
                warn!("Momentum: loading velocity saved by Nag");
                self.group.restore(velocity)
            }
            other => Err(other.mismatch("Momentum")),
        }
    }
}
