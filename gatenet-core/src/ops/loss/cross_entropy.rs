use crate::ops::split_pairs;
use crate::types::Scalar;

/// Element-wise binary cross entropy.
///
/// For each pair: `-ln(ŷ)` when the label is 1, `-ln(1 - ŷ)` when it is 0,
/// and 0 for any other label. Predictions at exactly 0 or 1 produce
/// infinities, which are returned as-is.
pub(crate) fn cross_entropy_forward<T: Scalar>(inputs: &[T]) -> Vec<T> {
    let (predictions, labels) = split_pairs(inputs);
    predictions
        .iter()
        .zip(labels)
        .map(|(&y_hat, &y)| {
            if y == T::one() {
                -y_hat.ln()
            } else if y == T::zero() {
                -(T::one() - y_hat).ln()
            } else {
                T::zero()
            }
        })
        .collect()
}

/// Partials for predictions (`-1/ŷ` or `1/(1-ŷ)`), then zeros for labels.
pub(crate) fn cross_entropy_local_grads<T: Scalar>(inputs: &[T]) -> Vec<T> {
    let (predictions, labels) = split_pairs(inputs);
    let mut grads: Vec<T> = predictions
        .iter()
        .zip(labels)
        .map(|(&y_hat, &y)| {
            if y == T::one() {
                -T::one() / y_hat
            } else if y == T::zero() {
                T::one() / (T::one() - y_hat)
            } else {
                T::zero()
            }
        })
        .collect();
    grads.extend(std::iter::repeat(T::zero()).take(labels.len()));
    grads
}

// --- Tests ---
#[cfg(test)]
#[path = "cross_entropy_test.rs"]
mod tests;
