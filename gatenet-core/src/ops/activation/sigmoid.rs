use crate::types::Scalar;

/// s(x) = 1 / (1 + e^-x)
pub(crate) fn sigmoid_forward<T: Scalar>(x: T) -> T {
    T::one() / (T::one() + (-x).exp())
}

/// ds/dx expressed through the forward output: s * (1 - s).
pub(crate) fn sigmoid_local_grad<T: Scalar>(s: T) -> T {
    s * (T::one() - s)
}

// --- Tests ---
#[cfg(test)]
#[path = "sigmoid_test.rs"]
mod tests;
