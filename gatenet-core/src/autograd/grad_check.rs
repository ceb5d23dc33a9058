use crate::error::GateNetError;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::types::{widen, Scalar};
use thiserror::Error;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for parameter {parameter}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        parameter: NodeId,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },

    #[error("Numerical gradient is NaN or infinite for parameter {parameter}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        parameter: NodeId,
        loss_plus: f64,
        loss_minus: f64,
    },

    #[error("Analytical gradient is NaN or infinite for parameter {parameter}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite { parameter: NodeId, value: f64 },

    #[error("Sink {0} does not depend on any parameter")]
    NoParameters(NodeId),

    #[error("Graph error during gradient check: {0}")]
    GraphError(#[from] GateNetError),
}

/// Checks the analytical gradients of every parameter reachable from `sink`
/// against central finite differences.
///
/// The differentiated quantity is [`Value::total`](crate::node::Value::total)
/// of the sink, which is what a backward pass seeded at the sink computes
/// for vector-valued sinks too. Placeholders must already hold their inputs.
/// Every parameter is restored to its original value and the graph is left
/// with a fresh forward pass and the analytical gradients.
pub fn check_grad<T: Scalar>(
    graph: &mut Graph<T>,
    sink: NodeId,
    epsilon: T,
    tolerance: T,
) -> Result<(), GradCheckError> {
    let two = T::one() + T::one();

    // --- 1. Initial Forward and Backward Pass ---
    graph.compute(sink)?;
    graph.nullify_grads();
    let parameters = graph.compute_grads_of(sink)?;
    if parameters.is_empty() {
        return Err(GradCheckError::NoParameters(sink));
    }

    let analytical_grads = parameters
        .iter()
        .map(|&p| graph.grad(p))
        .collect::<Result<Vec<T>, GateNetError>>()?;

    // --- 2. Perturb each parameter in turn ---
    for (&parameter, &analytical) in parameters.iter().zip(analytical_grads.iter()) {
        let original = graph.scalar(parameter)?;

        let loss_plus = perturbed_total(graph, sink, parameter, original + epsilon)?;
        let loss_minus = perturbed_total(graph, sink, parameter, original - epsilon)?;
        *graph.parameter_value_mut(parameter)? = original;

        let numerical = (loss_plus - loss_minus) / (two * epsilon);

        if !numerical.is_finite() {
            return Err(GradCheckError::NumericalGradNaNOrInfinite {
                parameter,
                loss_plus: widen(loss_plus),
                loss_minus: widen(loss_minus),
            });
        }
        if !analytical.is_finite() {
            return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                parameter,
                value: widen(analytical),
            });
        }

        let (analytical_grad, numerical_grad) = (widen(analytical), widen(numerical));
        let tol = widen(tolerance);
        if !approx::relative_eq!(
            analytical_grad,
            numerical_grad,
            epsilon = tol,
            max_relative = tol
        ) {
            return Err(GradCheckError::GradientMismatch {
                parameter,
                analytical_grad,
                numerical_grad,
                difference: (analytical_grad - numerical_grad).abs(),
            });
        }
    }

    // --- 3. Restore forward values and analytical gradients ---
    graph.compute(sink)?;
    graph.nullify_grads();
    graph.compute_grads_of(sink)?;
    Ok(())
}

/// Sets `parameter` to `value`, recomputes `sink` and returns its total.
fn perturbed_total<T: Scalar>(
    graph: &mut Graph<T>,
    sink: NodeId,
    parameter: NodeId,
    value: T,
) -> Result<T, GateNetError> {
    *graph.parameter_value_mut(parameter)? = value;
    graph.compute(sink)?;
    Ok(graph.value(sink)?.total())
}
