//! # Fitting a Line with GateNet
//!
//! Builds `prediction = w * x + b`, feeds noisy samples of `y = 3x - 1`
//! through placeholders and trains `w` and `b` with Adam.
//!
//! ## Demonstrated
//! 1.  Graph construction from parameters, placeholders and gates.
//! 2.  The training step: `set_placeholder`, `compute`, `nullify_grads`,
//!     `optimize`.
//! 3.  Learning-rate decay through `set_learning_rate`.
//! 4.  Saving and restoring the optimizer state.
//!
//! ## Running
//! `RUST_LOG=debug cargo run --example fit_linear`

use gatenet_core::{Adam, AdamHyperParams, GateNetError, Graph, Optimizer, Reduction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const TRUE_W: f64 = 3.0;
const TRUE_B: f64 = -1.0;

fn main() -> Result<(), GateNetError> {
    env_logger::init();

    // --- Data ---
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.05).map_err(|e| GateNetError::ConfigurationError(e.to_string()))?;
    let samples: Vec<(f64, f64)> = (0..64)
        .map(|_| {
            let x: f64 = rng.gen_range(-2.0..2.0);
            (x, TRUE_W * x + TRUE_B + noise.sample(&mut rng))
        })
        .collect();

    // --- Model ---
    let mut graph: Graph = Graph::new();
    let w = graph.parameter(rng.gen_range(-0.5..0.5));
    let b = graph.parameter(0.0);
    let one = graph.placeholder();
    graph.set_placeholder(one, 1.0)?;
    let x = graph.placeholder();
    let y = graph.placeholder();
    let wx = graph.mul_ab(w, x)?;
    let bias = graph.mul_ab(b, one)?;
    let prediction = graph.add(&[wx, bias])?;
    let loss = graph.mse(&[prediction], &[y], Reduction::Mean)?;

    let hyper = AdamHyperParams {
        lr: 0.05,
        ..Default::default()
    };
    let mut optimizer = Adam::with_hyperparams(&mut graph, loss, hyper)?;

    // --- Training loop ---
    for epoch in 0..30 {
        let mut epoch_loss = 0.0;
        for &(sample_x, sample_y) in &samples {
            graph.set_placeholder(x, sample_x)?;
            graph.set_placeholder(y, sample_y)?;
            graph.compute(loss)?;
            epoch_loss += graph.scalar(loss)?;
            graph.nullify_grads();
            optimizer.optimize(&mut graph)?;
        }
        if epoch % 10 == 9 {
            let lr = optimizer.learning_rate() * 0.5;
            optimizer.set_learning_rate(lr)?;
        }
        println!(
            "epoch {:>2}: loss = {:.5}, w = {:.4}, b = {:.4}",
            epoch,
            epoch_loss / samples.len() as f64,
            graph.scalar(w)?,
            graph.scalar(b)?
        );
    }

    // --- Checkpoint ---
    let checkpoint = optimizer.state_dict();
    let mut resumed = Adam::with_hyperparams(&mut graph, loss, hyper)?;
    resumed.load_state_dict(&checkpoint)?;
    println!(
        "resumed optimizer holds moments for {} parameter(s)",
        resumed.parameters().len()
    );

    println!("fitted w = {:.3} (true {}), b = {:.3} (true {})", graph.scalar(w)?, TRUE_W, graph.scalar(b)?, TRUE_B);
    Ok(())
}
