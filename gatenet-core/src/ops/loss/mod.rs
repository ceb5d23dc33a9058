// src/ops/loss/mod.rs

//! # Loss Gates
//!
//! Loss gates take a paired input list: `n` prediction nodes followed by `n`
//! target nodes (usually placeholders). Targets receive the true partial
//! derivative like any other input, which for labels is zero.
//!
//! - [`mse`]: squared error, reduced by mean or sum (scalar valued).
//! - [`cross_entropy`]: element-wise binary cross entropy (vector valued).

pub mod cross_entropy;
pub mod mse;
