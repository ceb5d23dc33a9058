use gatenet_core::{Graph, NodeId, Reduction};

/// Routes `log` output through the test harness. Safe to call from every test.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// `prediction = w * x`, `loss = mse([prediction], [y])`.
///
/// Returns `(graph, w, x, y, loss)`.
#[allow(dead_code)]
pub fn linear_model(w0: f64) -> (Graph, NodeId, NodeId, NodeId, NodeId) {
    let mut graph: Graph = Graph::new();
    let w = graph.parameter(w0);
    let x = graph.placeholder();
    let y = graph.placeholder();
    let prediction = graph.mul_ab(w, x).expect("mul_ab on fresh nodes");
    let loss = graph
        .mse(&[prediction], &[y], Reduction::Mean)
        .expect("mse on fresh nodes");
    (graph, w, x, y, loss)
}
