// gatenet-core/src/ops/loss/mse.rs

use crate::error::GateNetError;
use crate::ops::split_pairs;
use crate::types::{lit, Scalar};
use std::str::FromStr;

/// Specifies the reduction applied to the squared errors:
/// 'mean' | 'sum'
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Reduction {
    /// `sum((ŷ - y)^2) / n`, local gradients `2 (ŷ - y) / n`.
    #[default]
    Mean,
    /// `sum((ŷ - y)^2)`, local gradients `2 (ŷ - y)`.
    Sum,
}

impl FromStr for Reduction {
    type Err = GateNetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mean" => Ok(Reduction::Mean),
            "sum" => Ok(Reduction::Sum),
            _ => Err(GateNetError::ConfigurationError(format!(
                "Unsupported reduction type: {}",
                s
            ))),
        }
    }
}

/// Squared error between the first and second half of `inputs`.
pub(crate) fn mse_forward<T: Scalar>(inputs: &[T], reduction: Reduction) -> T {
    let (predictions, targets) = split_pairs(inputs);
    let total = predictions
        .iter()
        .zip(targets)
        .fold(T::zero(), |acc, (&y_hat, &y)| {
            let diff = y_hat - y;
            acc + diff * diff
        });
    match reduction {
        Reduction::Mean => total / lit(predictions.len() as f64),
        Reduction::Sum => total,
    }
}

/// Partials for predictions, then for targets (the negations).
pub(crate) fn mse_local_grads<T: Scalar>(inputs: &[T], reduction: Reduction) -> Vec<T> {
    let (predictions, targets) = split_pairs(inputs);
    let two = T::one() + T::one();
    let scale = match reduction {
        Reduction::Mean => two / lit(predictions.len() as f64),
        Reduction::Sum => two,
    };

    let prediction_grads: Vec<T> = predictions
        .iter()
        .zip(targets)
        .map(|(&y_hat, &y)| scale * (y_hat - y))
        .collect();
    let target_grads = prediction_grads.iter().map(|&g| -g);

    let mut grads = prediction_grads.clone();
    grads.extend(target_grads);
    grads
}

// --- Tests ---
#[cfg(test)]
#[path = "mse_test.rs"]
mod tests;
