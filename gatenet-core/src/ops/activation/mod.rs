// src/ops/activation/mod.rs

//! # Activation Gates
//!
//! Non-linear gates:
//! - [`relu`]: Rectified Linear Unit, strict `x > 0` derivative.
//! - [`sigmoid`]: logistic function.
//! - [`softmax`]: normalized exponential over a list of inputs (vector valued).

pub mod relu;
pub mod sigmoid;
pub mod softmax;
