use log::debug;

use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::optim::optimizer_state::OptimizerState;
use crate::optim::optimizer_trait::{check_epsilon, check_learning_rate, check_range, Optimizer};
use crate::optim::param_group::ParamGroup;
use crate::types::{lit, Scalar};

/// First and second moment estimates of one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdamMoments<T> {
    /// Exponential moving average of the gradients.
    pub m: T,
    /// Exponential moving average of the squared gradients.
    pub v: T,
}

impl<T: Scalar> Default for AdamMoments<T> {
    fn default() -> Self {
        AdamMoments {
            m: T::zero(),
            v: T::zero(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdamHyperParams<T> {
    pub lr: T,
    /// Decay of the first moment, in `[0, 1)`.
    pub beta1: T,
    /// Decay of the second moment, in `[0, 1)`.
    pub beta2: T,
    pub eps: T,
}

impl<T: Scalar> Default for AdamHyperParams<T> {
    fn default() -> Self {
        AdamHyperParams {
            lr: lit(0.01),
            beta1: lit(0.9),
            beta2: lit(0.999),
            eps: lit(1e-8),
        }
    }
}

/// Implements the Adam update without bias correction.
///
/// ```text
/// m = beta1 * m + (1 - beta1) * dx
/// v = beta2 * v + (1 - beta2) * dx^2
/// value -= lr * m / (sqrt(v) + eps)
/// ```
///
/// Early steps are therefore smaller than with bias-corrected Adam, since
/// both moments start at zero.
#[derive(Debug, Clone)]
pub struct Adam<T> {
    hyper: AdamHyperParams<T>,
    group: ParamGroup<AdamMoments<T>>,
}

impl<T: Scalar> Adam<T> {
    pub fn new(graph: &mut Graph<T>, target: NodeId, lr: T) -> Result<Self, GateNetError> {
        Self::with_hyperparams(
            graph,
            target,
            AdamHyperParams {
                lr,
                ..Default::default()
            },
        )
    }

    /// # Errors
    /// `ConfigurationError` if `lr` or `eps` is not positive, or a beta lies
    /// outside `[0, 1)`.
    pub fn with_hyperparams(
        graph: &mut Graph<T>,
        target: NodeId,
        hyper: AdamHyperParams<T>,
    ) -> Result<Self, GateNetError> {
        check_learning_rate(hyper.lr)?;
        check_range("beta1", hyper.beta1, T::zero(), T::one(), false)?;
        check_range("beta2", hyper.beta2, T::zero(), T::one(), false)?;
        check_epsilon(hyper.eps)?;
        let group = ParamGroup::attach(graph, target, AdamMoments::default)?;
        debug!(
            "Adam: attached moments to {} parameter(s) reachable from {}",
            group.params().len(),
            target
        );
        Ok(Adam { hyper, group })
    }

    pub fn hyperparams(&self) -> &AdamHyperParams<T> {
        &self.hyper
    }

    pub fn moments(&self, param: NodeId) -> Option<AdamMoments<T>> {
        self.group.state(param).copied()
    }
}

impl<T: Scalar> Optimizer<T> for Adam<T> {
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError> {
        let AdamHyperParams {
            lr,
            beta1,
            beta2,
            eps,
        } = self.hyper;
        let one = T::one();
        let updated = self.group.step(graph, |moments, dx| {
            moments.m = beta1 * moments.m + (one - beta1) * dx;
            moments.v = beta2 * moments.v + (one - beta2) * dx * dx;
            -(lr * moments.m) / (moments.v.sqrt() + eps)
        })?;
        debug!("Adam: step updated {} parameter(s)", updated);
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
        OptimizerState::Adam {
            moments: self.group.snapshot(),
        }
    }

    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError> {
        match state_dict {
            OptimizerState::Adam { moments } => self.group.restore(moments),
            other => Err(other.mismatch("Adam")),
        }
    }
}
