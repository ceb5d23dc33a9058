use crate::types::Scalar;

/// ReLU(x) = max(0, x)
pub(crate) fn relu_forward<T: Scalar>(x: T) -> T {
    if x > T::zero() {
        x
    } else {
        T::zero()
    }
}

/// 1 for x > 0, else 0. The kink at x = 0 gets 0.
pub(crate) fn relu_local_grad<T: Scalar>(x: T) -> T {
    if x > T::zero() {
        T::one()
    } else {
        T::zero()
    }
}

// --- Tests ---
#[cfg(test)]
#[path = "relu_test.rs"]
mod tests;
