//! # Gate Operations Module (`ops`)
//!
//! Every gate of the computation graph is one variant of [`GateKind`]. A
//! variant knows three things:
//!
//! - its **arity** (how many inputs it accepts, checked at construction),
//! - its **forward formula** (value from input values),
//! - its **local-gradient formula** (one partial derivative per input).
//!
//! The formulas themselves live in the submodules and operate on plain
//! slices of scalars, so they can be tested without building a graph.
//!
//! ## Key Submodules:
//!
//! - [`arithmetic`]: `Add`, `Mul`, `MulAB`.
//! - [`activation`]: `Relu`, `Sigmoid`, `Softmax`.
//! - [`loss`]: `Mse`, `CrossEntropy`.

use crate::error::GateNetError;
use crate::node::Value;
use crate::types::Scalar;
use std::fmt;

pub mod activation;
pub mod arithmetic;
pub mod loss;

pub use loss::mse::Reduction;

/// The closed catalog of gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Sum of n inputs.
    Add,
    /// Product of n inputs.
    Mul,
    /// Product of exactly two inputs.
    MulAB,
    Relu,
    Sigmoid,
    /// Normalized exponential of the inputs, one output element per input.
    /// Its gradient is the one of log-softmax, hence the `Logp` alias.
    Softmax,
    /// Squared error between n predictions and n targets.
    Mse(Reduction),
    /// Element-wise binary cross entropy between n predictions and n labels.
    CrossEntropy,
}

/// Number of inputs a gate accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// Any non-empty list.
    Variadic,
    /// A non-empty even-length list: predictions followed by targets.
    Paired,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::Variadic => write!(f, "at least 1"),
            Arity::Paired => write!(f, "a non-zero even number of"),
        }
    }
}

impl GateKind {
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Add => "Add",
            GateKind::Mul => "Mul",
            GateKind::MulAB => "MulAB",
            GateKind::Relu => "Relu",
            GateKind::Sigmoid => "Sigmoid",
            GateKind::Softmax => "Softmax",
            GateKind::Mse(_) => "Mse",
            GateKind::CrossEntropy => "CrossEntropy",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            GateKind::Add | GateKind::Mul | GateKind::Softmax => Arity::Variadic,
            GateKind::MulAB => Arity::Exactly(2),
            GateKind::Relu | GateKind::Sigmoid => Arity::Exactly(1),
            GateKind::Mse(_) | GateKind::CrossEntropy => Arity::Paired,
        }
    }

    /// `true` for gates whose value is a vector. Such gates cannot feed
    /// other gates.
    pub fn is_vector_valued(&self) -> bool {
        matches!(self, GateKind::Softmax | GateKind::CrossEntropy)
    }

    pub(crate) fn check_arity(&self, actual: usize) -> Result<(), GateNetError> {
        let ok = match self.arity() {
            Arity::Exactly(n) => actual == n,
            Arity::Variadic => actual > 0,
            Arity::Paired => actual > 0 && actual % 2 == 0,
        };
        if ok {
            return Ok(());
        }
        if actual == 0 {
            return Err(GateNetError::EmptyInputs {
                gate: self.name().to_string(),
            });
        }
        Err(GateNetError::ArityMismatch {
            gate: self.name().to_string(),
            expected: self.arity().to_string(),
            actual,
        })
    }

    /// Value held by a gate that has not been computed yet.
    pub(crate) fn initial_value<T: Scalar>(&self, num_inputs: usize) -> Value<T> {
        match self {
            GateKind::Softmax => Value::Vector(vec![T::zero(); num_inputs]),
            GateKind::CrossEntropy => Value::Vector(vec![T::zero(); num_inputs / 2]),
            _ => Value::Scalar(T::zero()),
        }
    }

    /// Forward formula. `inputs` holds the current input values in input order.
    pub(crate) fn forward<T: Scalar>(&self, inputs: &[T]) -> Value<T> {
        match self {
            GateKind::Add => Value::Scalar(arithmetic::add_forward(inputs)),
            GateKind::Mul => Value::Scalar(arithmetic::mul_forward(inputs)),
            GateKind::MulAB => Value::Scalar(arithmetic::mul_ab_forward(inputs[0], inputs[1])),
            GateKind::Relu => Value::Scalar(activation::relu::relu_forward(inputs[0])),
            GateKind::Sigmoid => Value::Scalar(activation::sigmoid::sigmoid_forward(inputs[0])),
            GateKind::Softmax => Value::Vector(activation::softmax::softmax_forward(inputs)),
            GateKind::Mse(reduction) => Value::Scalar(loss::mse::mse_forward(inputs, *reduction)),
            GateKind::CrossEntropy => {
                Value::Vector(loss::cross_entropy::cross_entropy_forward(inputs))
            }
        }
    }

    /// Local-gradient formula: one partial derivative of the gate's value
    /// with respect to each input, in input order.
    ///
    /// `value` is the gate's value from the latest forward pass.
    pub(crate) fn local_grads<T: Scalar>(&self, inputs: &[T], value: &Value<T>) -> Vec<T> {
        match self {
            GateKind::Add => arithmetic::add_local_grads(inputs),
            GateKind::Mul => arithmetic::mul_local_grads(inputs),
            GateKind::MulAB => arithmetic::mul_ab_local_grads(inputs[0], inputs[1]),
            GateKind::Relu => vec![activation::relu::relu_local_grad(inputs[0])],
            GateKind::Sigmoid => {
                let s = value.as_slice()[0];
                vec![activation::sigmoid::sigmoid_local_grad(s)]
            }
            GateKind::Softmax => activation::softmax::softmax_local_grads(value.as_slice()),
            GateKind::Mse(reduction) => loss::mse::mse_local_grads(inputs, *reduction),
            GateKind::CrossEntropy => loss::cross_entropy::cross_entropy_local_grads(inputs),
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Mse(reduction) => write!(f, "Mse({:?})", reduction),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Splits a paired input list into (predictions, targets).
pub(crate) fn split_pairs<T>(inputs: &[T]) -> (&[T], &[T]) {
    inputs.split_at(inputs.len() / 2)
}
