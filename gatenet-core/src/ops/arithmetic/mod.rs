// src/ops/arithmetic/mod.rs

//! # Arithmetic Gates
//!
//! Forward and local-gradient formulas for `Add`, `Mul` and `MulAB`.

pub mod add;
pub mod mul;

pub(crate) use add::{add_forward, add_local_grads};
pub(crate) use mul::{mul_ab_forward, mul_ab_local_grads, mul_forward, mul_local_grads};
