//! Optimizers driving the parameters of a [`Graph`](crate::graph::Graph)
//! towards a minimum of one target node.
//!
//! Every optimizer is bound to its target at construction and keeps its
//! per-parameter state in a [`ParamGroup`] side table. A step runs the
//! backward pass from the target and updates only the parameters that
//! target depends on, so several optimizers may share one graph.

pub mod adagrad;
pub mod adam;
pub mod momentum;
pub mod nag;
pub mod optimizer_state;
pub mod optimizer_trait;
pub mod param_group;
pub mod rmsprop;
pub mod sgd;

pub use adagrad::{AdaGrad, AdaGradHyperParams};
pub use adam::{Adam, AdamHyperParams, AdamMoments};
pub use momentum::{Momentum, MomentumHyperParams};
pub use nag::{Nag, NagHyperParams};
pub use optimizer_state::OptimizerState;
pub use optimizer_trait::Optimizer;
pub use param_group::ParamGroup;
pub use rmsprop::{RmsProp, RmsPropHyperParams};
pub use sgd::Sgd;

#[cfg(test)]
mod momentum_test;
