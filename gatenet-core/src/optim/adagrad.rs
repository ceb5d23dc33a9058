use log::debug;

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_epsilon, check_learning_rate, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::{lit, Scalar};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaGradHyperParams<T> {
    pub lr: T,
    /// Term added to the denominator to improve numerical stability.
    pub eps: T,
}

impl<T: Scalar> Default for AdaGradHyperParams<T> {
    fn default() -> Self {
        AdaGradHyperParams {
            lr: lit(0.01),
            eps: lit(1e-8),
        }
    }
}

/// AdaGrad with an accumulated-magnitude cache.
///
/// ```text
/// cache += |dx|
/// value -= lr * dx / (sqrt(cache) + eps)
/// ```
///
/// The cache sums absolute gradients rather than squared ones.
#[derive(Debug, Clone)]
pub struct AdaGrad<T> {
    hyper: AdaGradHyperParams<T>,
    group: ParamGroup<T>,
}

impl<T: Scalar> AdaGrad<T> {
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        Self::with_hyperparams(
            graph,
            target,
            AdaGradHyperParams {
                lr,
                ..Default::default()
            },
        )
    }

    pub fn with_hyperparams(
        graph: &mut Graph<T>,
        target: NodeId,
        hyper: AdaGradHyperParams<T>,
    ) -> Result<Self, GateNetError> {
        check_learning_rate(hyper.lr)?;
        check_epsilon(hyper.eps)?;
        let group = ParamGroup::attach(graph, target, T::zero)?;
        debug!(
            "AdaGrad: attached cache to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(AdaGrad { hyper, group })
    }

    pub fn hyperparams(&self) -> &AdaGradHyperParams<T> {
        &self.hyper
    }

    pub fn cache(&self, param: NodeId) -> Option<T> {
        self.group.state(param).copied()
    }
}

impl<T: Scalar> Optimizer<T> for AdaGrad<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let AdaGradHyperParams { lr, eps } = self.hyper;
        let updated = self.group.step(graph, |cache, dx| {
            *cache = *cache + dx.abs();
            -(lr * dx) / (cache.sqrt() + eps)
        })?;
        debug!("AdaGrad: step updated {} parameter(s)", updated);
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
        OptimizerState::AdaGrad {
            cache: self.group.snapshot(),
        }
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::AdaGrad { cache } => self.group.restore(cache),
            other => Err(other.mismatch("AdaGrad")),
        }
    }
}
