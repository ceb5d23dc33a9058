use crate::types::Scalar;

/// Sum of all inputs.
pub(crate) fn add_forward<T: Scalar>(inputs: &[T]) -> T {
    inputs.iter().fold(T::zero(), |acc, &x| acc + x)
}

/// d(sum)/d(x_i) = 1 for every input.
pub(crate) fn add_local_grads<T: Scalar>(inputs: &[T]) -> Vec<T> {
    vec![T::one(); inputs.len()]
}

// --- Tests ---
#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
