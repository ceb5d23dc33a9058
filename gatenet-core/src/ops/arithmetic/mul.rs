use crate::types::Scalar;

/// Product of all inputs.
pub(crate) fn mul_forward<T: Scalar>(inputs: &[T]) -> T {
    inputs.iter().fold(T::one(), |acc, &x| acc * x)
}

/// For input i: the product of every other input.
///
/// Built from prefix and suffix products rather than `product / x_i`, so a
/// zero input yields the correct partials.
pub(crate) fn mul_local_grads<T: Scalar>(inputs: &[T]) -> Vec<T> {
    let mut grads = vec![T::one(); inputs.len()];

    let mut prefix = T::one();
    for (grad, &x) in grads.iter_mut().zip(inputs) {
        *grad = prefix;
        prefix = prefix * x;
    }

    let mut suffix = T::one();
    for (grad, &x) in grads.iter_mut().zip(inputs).rev() {
        *grad = *grad * suffix;
        suffix = suffix * x;
    }
    grads
}

pub(crate) fn mul_ab_forward<T: Scalar>(a: T, b: T) -> T {
    a * b
}

/// (d(ab)/da, d(ab)/db) = (b, a).
pub(crate) fn mul_ab_local_grads<T: Scalar>(a: T, b: T) -> Vec<T> {
    vec![b, a]
}

// --- Tests ---
#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
