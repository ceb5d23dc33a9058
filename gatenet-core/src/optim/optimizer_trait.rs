use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::types::{widen, Scalar};

use super::optimizer_state::OptimizerState;

/// Trait defining the common interface for all optimizers.
///
/// An optimizer is bound to one target ("cost") node. It only ever updates
/// the parameters that target depends on.
pub trait Optimizer<T: Scalar> {
    /// Performs a single optimization step.
    ///
    /// Runs the backward pass from the target (through
    /// [`Graph::compute_grads_of`]) and applies the update rule to every
    /// parameter it returns. The caller is expected to have run the forward
    /// pass and [`Graph::nullify_grads`] beforehand.
    fn optimize(&mut self, graph: &mut Graph<T>) -> Result<(), GateNetError>;

    /// The node whose value is being minimized.
    fn target(&self) -> NodeId;

    /// Parameters reachable from the target, in reverse-topological order.
    fn parameters(&self) -> &[NodeId];

    fn learning_rate(&self) -> T;

    /// # Errors
    /// `ConfigurationError` when `lr` is not a positive finite number.
    fn set_learning_rate(&mut self, lr: T) -> Result<(), GateNetError>;

    /// Snapshot of the per-parameter auxiliary state.
    fn state_dict(&self) -> OptimizerState<T>;

    /// Replaces the auxiliary state with `state_dict`.
    ///
    /// # Errors
    /// `OptimizerError` if the snapshot comes from another optimizer kind
    /// or does not cover exactly this optimizer's parameters.
    fn load_state_dict(&mut self, state_dict: &OptimizerState<T>) -> Result<(), GateNetError>;
}

pub(crate) fn check_learning_rate<T: Scalar>(lr: T) -> Result<(), GateNetError> {
    if !lr.is_finite() || lr <= T::zero() {
        return Err(GateNetError::ConfigurationError(format!(
            "Learning rate must be positive and finite, got {}",
            widen(lr)
        )));
    }
    Ok(())
}

pub(crate) fn check_epsilon<T: Scalar>(eps: T) -> Result<(), GateNetError> {
    if !eps.is_finite() || eps <= T::zero() {
        return Err(GateNetError::ConfigurationError(format!(
            "Epsilon must be positive and finite, got {}",
            widen(eps)
        )));
    }
    Ok(())
}

/// Checks `low <= value < high`, or `low <= value <= high` when
/// `inclusive_high` is set.
pub(crate) fn check_range<T: Scalar>(
    name: &str,
    value: T,
    low: T,
    high: T,
    inclusive_high: bool,
) -> Result<(), GateNetError> {
    let below_high = if inclusive_high { value <= high } else { value < high };
    if value >= low && below_high {
        return Ok(());
    }
    let bracket = if inclusive_high { ']' } else { ')' };
    Err(GateNetError::ConfigurationError(format!(
        "{} must be in [{}, {}{}, got {}",
        name,
        widen(low),
        widen(high),
        bracket,
        widen(value)
    )))
}
