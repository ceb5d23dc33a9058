use std::collections::HashMap;

use crate::node::NodeId;

use super::adam::AdamMoments;

/// Snapshot of an optimizer's per-parameter auxiliary state, keyed by the
/// parameter's node id.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizerState<T> {
    /// Plain SGD keeps no state.
    Sgd,
    Momentum { velocity: HashMap<NodeId, T> },
    Nag { velocity: HashMap<NodeId, T> },
    AdaGrad { cache: HashMap<NodeId, T> },
    RmsProp { cache: HashMap<NodeId, T> },
    Adam { moments: HashMap<NodeId, AdamMoments<T>> },
}

impl<T> OptimizerState<T> {
    /// Name of the optimizer kind the snapshot belongs to.
    pub fn kind_name(&self) -> &'static str {
        match self {
            OptimizerState::Sgd => "Sgd",
            OptimizerState::Momentum { .. } => "Momentum",
            OptimizerState::Nag { .. } => "Nag",
            OptimizerState::AdaGrad { .. } => "AdaGrad",
            OptimizerState::RmsProp { .. } => "RmsProp",
            OptimizerState::Adam { .. } => "Adam",
        }
    }

    pub(crate) fn mismatch(&self, expected: &str) -> crate::error::GateNetError {
        crate::error::GateNetError::OptimizerError(format!(
            "Attempted to load {} state into {}",
            self.kind_name(),
            expected
        ))
    }
}
