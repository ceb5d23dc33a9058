use log::debug;

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_epsilon, check_learning_rate, check_range, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::{lit, Scalar};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RmsPropHyperParams<T> {
    pub lr: T,
    /// Smoothing constant of the squared-gradient average, in `[0, 1)`.
    pub decay: T,
    pub eps: T,
}

impl<T: Scalar> Default for RmsPropHyperParams<T> {
    fn default() -> Self {
        RmsPropHyperParams {
            lr: lit(0.01),
            decay: lit(0.9),
            eps: lit(1e-8),
        }
    }
}

/// RMSprop.
///
/// ```text
/// cache = decay * cache + (1 - decay) * dx^2
/// value -= lr * dx / (sqrt(cache) + eps)
/// ```
#[derive(Debug, Clone)]
pub struct RmsProp<T> {
    hyper: RmsPropHyperParams<T>,
    group: ParamGroup<T>,
}

impl<T: Scalar> RmsProp<T> {
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        Self::with_hyperparams(
            graph,
            target,
            RmsPropHyperParams {
                lr,
                ..Default::default()
            },
        )
    }

    pub fn with_hyperparams(
        graph: &mut Graph<T>,
        target: NodeId,
        hyper: RmsPropHyperParams<T>,
    ) -> Result<Self, GateNetError> {
        check_learning_rate(hyper.lr)?;
        check_range("decay", hyper.decay, T::zero(), T::one(), false)?;
        check_epsilon(hyper.eps)?;
        let group = ParamGroup::attach(graph, target, T::zero)?;
        debug!(
            "RmsProp: attached cache to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(RmsProp { hyper, group })
    }

    pub fn hyperparams(&self) -> &RmsPropHyperParams<T> {
        &self.hyper
    }

    pub fn cache(&self, param: NodeId) -> Option<T> {
        self.group.state(param).copied()
    }
}

impl<T: Scalar> Optimizer<T> for RmsProp<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let RmsPropHyperParams { lr, decay, eps } = self.hyper;
        let updated = self.group.step(graph, |cache, dx| {
            *cache = decay * *cache + (T::one() - decay) * dx * dx;
            -(lr * dx) / (cache.sqrt() + eps)
        })?;
        debug!("RmsProp: step updated {} parameter(s)", updated);
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
        OptimizerState::RmsProp {
            cache: self.group.snapshot(),
        }
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::RmsProp { cache } => self.group.restore(cache),
            other => Err(other.mismatch("RmsProp")),
        }
    }
}
