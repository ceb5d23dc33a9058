//! # Autograd support
//!
//! Graph traversal helpers used by [`Graph`](crate::graph::Graph) and the
//! finite-difference gradient checker.

pub(crate) mod graph;
pub mod grad_check;

pub use grad_check::{check_grad, GradCheckError};
