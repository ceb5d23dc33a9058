use num_traits::Float;
use std::fmt::{Debug, Display};

/// Numeric element type stored in graph nodes.
///
/// Blanket-implemented for every float type that satisfies the bounds,
/// which in practice means `f32` and `f64`.
pub trait Scalar: Float + Debug + Display + 'static {}

impl<T> Scalar for T where T: Float + Debug + Display + 'static {}

/// Converts an `f64` literal (hyperparameter defaults, tolerances) into `T`.
///
/// Returns NaN when the value is not representable, which the numeric code
/// then propagates like any other non-finite result.
pub(crate) fn lit<T: Scalar>(value: f64) -> T {
    num_traits::cast(value).unwrap_or_else(T::nan)
}

/// Widens a scalar to `f64` for logging and error reports.
pub(crate) fn widen<T: Scalar>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
