use crate::types::Scalar;

/// Normalized exponential of `inputs`, one output element per input.
///
/// The maximum input is subtracted from the exponentials (not from the
/// logits before exponentiation), so the outputs do not sum to one in
/// general and large inputs still overflow.
// TODO: move the max shift inside the exponential once callers no longer
// depend on the current values.
pub(crate) fn softmax_forward<T: Scalar>(inputs: &[T]) -> Vec<T> {
    let max = inputs
        .iter()
        .fold(T::neg_infinity(), |m, &x| if x > m { x } else { m });
    let exps: Vec<T> = inputs.iter().map(|&x| x.exp()).collect();
    let sum = exps.iter().fold(T::zero(), |acc, &e| acc + e);
    exps.into_iter().map(|e| (e - max) / sum).collect()
}

/// Diagonal of the log-softmax Jacobian: 1 - value_i for input i.
pub(crate) fn softmax_local_grads<T: Scalar>(values: &[T]) -> Vec<T> {
    values.iter().map(|&v| T::one() - v).collect()
}

// --- Tests ---
#[cfg(test)]
#[path = "softmax_test.rs"]
mod tests;
