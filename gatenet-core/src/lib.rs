//! # gatenet-core
//!
//! A scalar computation graph with reverse-mode automatic differentiation
//! and a family of first-order optimizers.
//!
//! Nodes live in an arena owned by [`Graph`] and are addressed by
//! [`NodeId`]. A gate can only consume nodes created before it, so every
//! graph is acyclic by construction.
//!
//! ```
//! use gatenet_core::{Graph, Optimizer, Sgd};
//!
//! # fn main() -> Result<(), gatenet_core::GateNetError> {
//! let mut graph: Graph = Graph::new();
//! let w = graph.parameter(3.0);
//! let cost = graph.mul(&[w, w])?;
//!
//! let mut sgd = Sgd::new(&mut graph, cost, 0.1)?;
//! graph.compute(cost)?;
//! graph.nullify_grads();
//! sgd.optimize(&mut graph)?;
//! assert!((graph.scalar(w)? - 2.4).abs() < 1e-12);
//! # Ok(())
//! # }
//! ```

pub mod autograd;
pub mod error;
pub mod graph;
pub mod node;
pub mod ops;
pub mod optim;
pub mod types;

pub use autograd::{check_grad, GradCheckError};
pub use error::GateNetError;
pub use graph::Graph;
pub use node::{Node, NodeId, NodeKind, Value};
pub use ops::{Arity, GateKind, Reduction};
pub use optim::{
    AdaGrad, AdaGradHyperParams, Adam, AdamHyperParams, AdamMoments, Momentum,
    MomentumHyperParams, Nag, NagHyperParams, Optimizer, OptimizerState, RmsProp,
    RmsPropHyperParams, Sgd,
};
pub use types::Scalar;

// Re-export traits required by public bounds
pub use num_traits;
