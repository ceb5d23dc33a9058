use super::*;
use approx::assert_relative_eq;

/// a=3, b=4, c=5; product = a*b*c; y = product + c
/// dy/da = 20, dy/db = 15, dy/dc = 13
fn worked_example() -> (Graph, [NodeId; 5]) {
    let mut graph: Graph = Graph::new();
    let a = graph.parameter(3.0);
    let b = graph.parameter(4.0);
    let c = graph.parameter(5.0);
    let product = graph.mul(&[a, b, c]).unwrap();
    let y = graph.add(&[product, c]).unwrap();
    (graph, [a, b, c, product, y])
}

#[test]
fn test_worked_example_forward_and_backward() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, product, y]) = worked_example();

    graph.compute(y)?;
    assert_relative_eq!(graph.scalar(product)?, 60.0);
    assert_relative_eq!(graph.scalar(y)?, 65.0);

    graph.nullify_grads();
    let params = graph.compute_grads_of(y)?;
    assert_relative_eq!(graph.grad(a)?, 20.0);
    assert_relative_eq!(graph.grad(b)?, 15.0);
    // c feeds both gates: a * b through product, plus 1 directly
    assert_relative_eq!(graph.grad(c)?, 13.0);
    assert_relative_eq!(graph.grad(product)?, 1.0);

    // reverse topological order: c (direct input of y) is met first
    assert_eq!(params, vec![c, b, a]);
    Ok(())
}

#[test]
fn test_topological_order_inputs_before_gates() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, product, y]) = worked_example();
    let order = graph.topological_order(y)?.to_vec();
    assert_eq!(order, vec![a, b, c, product, y]);
    for (position, &id) in order.iter().enumerate() {
        for input in graph.inputs(id)? {
            let input_position = order.iter().position(|n| n == input).unwrap();
            assert!(input_position < position);
        }
    }
    Ok(())
}

#[test]
fn test_topological_order_cached_per_sink() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, product, y]) = worked_example();
    assert_eq!(graph.topological_order(product)?, &[a, b, c, product]);
    assert_eq!(graph.topological_order(y)?.len(), 5);
    // switching back rebuilds for the other sink
    assert_eq!(graph.topological_order(product)?.len(), 4);

    // nodes added later do not invalidate the cached order
    let extra = graph.parameter(1.0);
    let _ = graph.add(&[product, extra])?;
    assert_eq!(graph.topological_order(product)?, &[a, b, c, product]);
    Ok(())
}

#[test]
fn test_fan_in_accumulation() -> Result<(), GateNetError> {
    // z = x*x + x  =>  dz/dx = 2x + 1
    for x_value in [-2.0, 0.0, 0.5, 3.0] {
        let mut graph: Graph = Graph::new();
        let x = graph.parameter(x_value);
        let square = graph.mul(&[x, x])?;
        let z = graph.add(&[square, x])?;

        graph.compute(z)?;
        graph.nullify_grads();
        graph.compute_grads_of(z)?;
        assert_relative_eq!(graph.grad(x)?, 2.0 * x_value + 1.0);
    }
    Ok(())
}

#[test]
fn test_zero_leak_idempotence() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, _, y]) = worked_example();
    graph.compute(y)?;

    let mut snapshots = Vec::new();
    for _ in 0..5 {
        graph.nullify_grads();
        graph.compute_grads_of(y)?;
        snapshots.push((graph.grad(a)?, graph.grad(b)?, graph.grad(c)?));
    }
    assert!(snapshots.iter().all(|s| *s == snapshots[0]));
    Ok(())
}

#[test]
fn test_missing_nullify_accumulates() -> Result<(), GateNetError> {
    let (mut graph, [a, _, _, _, y]) = worked_example();
    graph.compute(y)?;
    graph.nullify_grads();
    graph.compute_grads_of(y)?;
    graph.compute_grads_of(y)?;
    // second pass: product's accumulator is 2, so a gets 20 + 2 * 20
    assert_relative_eq!(graph.grad(a)?, 60.0);
    Ok(())
}

#[test]
fn test_sink_with_consumers_is_seeded_with_one() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, product, _]) = worked_example();
    assert!(graph.has_consumers(product)?);

    graph.compute(product)?;
    graph.nullify_grads();
    graph.compute_grads_of(product)?;
    assert_relative_eq!(graph.grad(a)?, 20.0);
    assert_relative_eq!(graph.grad(b)?, 15.0);
    assert_relative_eq!(graph.grad(c)?, 12.0);
    Ok(())
}

#[test]
fn test_leaf_sink_gradient() -> Result<(), GateNetError> {
    let mut graph: Graph = Graph::new();
    let p = graph.parameter(7.0);
    graph.compute(p)?;
    graph.nullify_grads();
    assert_eq!(graph.compute_grads_of(p)?, vec![p]);
    assert_relative_eq!(graph.grad(p)?, 1.0);
    Ok(())
}

#[test]
fn test_backward_ignores_unrelated_subgraph() -> Result<(), GateNetError> {
    let mut graph: Graph = Graph::new();
    let a = graph.parameter(2.0);
    let b = graph.parameter(3.0);
    let left = graph.mul(&[a, a])?;
    let right = graph.mul(&[b, b])?;

    graph.compute(left)?;
    graph.compute(right)?;
    graph.nullify_grads();
    let params = graph.compute_grads_of(left)?;
    assert_eq!(params, vec![a]);
    assert_relative_eq!(graph.grad(a)?, 4.0);
    assert_eq!(graph.grad(b)?, 0.0);
    assert_eq!(graph.grad(right)?, 0.0);
    Ok(())
}

#[test]
fn test_placeholders_receive_bookkeeping_gradient() -> Result<(), GateNetError> {
    let mut graph: Graph = Graph::new();
    let w = graph.parameter(2.0);
    let x = graph.placeholder();
    graph.set_placeholder(x, 5.0)?;
    let y = graph.mul_ab(w, x)?;

    graph.compute(y)?;
    graph.nullify_grads();
    let params = graph.compute_grads_of(y)?;
    assert_eq!(params, vec![w]);
    assert_relative_eq!(graph.grad(x)?, 2.0);
    Ok(())
}

#[test]
fn test_execute_evaluates_every_gate() -> Result<(), GateNetError> {
    let (mut graph, [_, _, _, product, y]) = worked_example();
    let other = graph.relu(product)?;
    graph.execute()?;
    assert_relative_eq!(graph.scalar(y)?, 65.0);
    assert_relative_eq!(graph.scalar(other)?, 60.0);
    Ok(())
}

#[test]
fn test_registries() {
    let mut graph: Graph = Graph::new();
    assert!(graph.is_empty());
    let x = graph.placeholder();
    let w = graph.parameter(1.0);
    let v = graph.parameter(2.0);
    let _ = graph.mul_ab(w, x).unwrap();
    assert_eq!(graph.len(), 4);
    assert_eq!(graph.parameters().collect::<Vec<_>>(), vec![w, v]);
    assert_eq!(graph.placeholders().collect::<Vec<_>>(), vec![x]);
    assert!(graph.has_consumers(w).unwrap());
    assert!(!graph.has_consumers(v).unwrap());
}

#[test]
fn test_set_placeholder_rejects_other_nodes() {
    let mut graph: Graph = Graph::new();
    let w = graph.parameter(1.0);
    assert_eq!(
        graph.set_placeholder(w, 2.0),
        Err(GateNetError::NotAPlaceholder(w))
    );
    assert_eq!(graph.scalar(w).unwrap(), 1.0);
}

#[test]
fn test_unknown_node_errors() {
    let mut graph: Graph = Graph::new();
    let a = graph.parameter(1.0);
    let ghost = NodeId(5);
    assert_eq!(
        graph.add(&[a, ghost]),
        Err(GateNetError::UnknownNode { node: ghost, len: 1 })
    );
    assert!(matches!(graph.compute(ghost), Err(GateNetError::UnknownNode { .. })));
    assert!(matches!(graph.grad(ghost), Err(GateNetError::UnknownNode { .. })));
    // the failed construction registered nothing
    assert_eq!(graph.len(), 1);
    assert!(!graph.has_consumers(a).unwrap());
}

#[test]
fn test_parameter_value_mut_only_for_parameters() {
    let mut graph: Graph = Graph::new();
    let w = graph.parameter(1.0);
    let x = graph.placeholder();
    *graph.parameter_value_mut(w).unwrap() += 0.5;
    assert_eq!(graph.scalar(w).unwrap(), 1.5);
    assert_eq!(
        graph.parameter_value_mut(x).map(|v| *v),
        Err(GateNetError::NotAParameter(x))
    );
}

#[test]
fn test_node_display() -> Result<(), GateNetError> {
    let (mut graph, [a, _, _, product, y]) = worked_example();
    graph.compute(y)?;
    graph.nullify_grads();
    graph.compute_grads_of(y)?;
    assert_eq!(graph.node(a)?.to_string(), "Parameter(3, 20)");
    assert_eq!(graph.node(product)?.to_string(), "Mul(60, 1)");
    assert_eq!(a.to_string(), "#0");
    Ok(())
}

#[test]
fn test_generic_over_f32() -> Result<(), GateNetError> {
    let mut graph: Graph<f32> = Graph::new();
    let x = graph.parameter(1.5_f32);
    let s = graph.mul(&[x, x, x])?;
    graph.compute(s)?;
    graph.nullify_grads();
    graph.compute_grads_of(s)?;
    assert_relative_eq!(graph.grad(x)?, 3.0 * 1.5 * 1.5);
    Ok(())
}

#[test]
fn test_parameters_of_matches_backward_without_touching_grads() -> Result<(), GateNetError> {
    let (mut graph, [a, b, c, product, y]) = worked_example();
    let unrelated = graph.parameter(9.0);
    assert_eq!(graph.parameters_of(y)?, vec![c, b, a]);
    assert_eq!(graph.parameters_of(product)?, vec![c, b, a]);
    assert_eq!(graph.parameters_of(unrelated)?, vec![unrelated]);
    assert_eq!(graph.grad(a)?, 0.0);
    Ok(())
}

#[test]
fn test_vector_gates_cannot_feed_other_gates() -> Result<(), GateNetError> {
    let mut graph: Graph = Graph::new();
    let p = graph.parameter(0.4);
    let label = graph.placeholder();
    let ce = graph.cross_entropy(&[p], &[label])?;
    let scalar_loss = graph.mse(&[p], &[label], Reduction::Sum)?;

    assert_eq!(
        graph.add(&[scalar_loss, ce]),
        Err(GateNetError::NonScalarInput {
            node: ce,
            gate: "Add".to_string()
        })
    );
    // scalar gates and leaves are accepted
    let total = graph.add(&[scalar_loss, p, label])?;
    assert!(!graph.has_consumers(ce)?);
    assert!(graph.has_consumers(scalar_loss)?);
    assert_eq!(graph.inputs(total)?, &[scalar_loss, p, label]);
    Ok(())
}
