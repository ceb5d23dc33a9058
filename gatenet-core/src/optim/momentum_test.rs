#[cfg(test)]
mod tests {
    use crate::error::GateNetError;
    use crate::graph::Graph;
    use crate::node::NodeId;
    use crate::optim::{Momentum, MomentumHyperParams, Optimizer, OptimizerState};
    use approx::assert_relative_eq;

    fn square_cost(w0: f64) -> (Graph, NodeId, NodeId) {
        let mut graph: Graph = Graph::new();
        let w = graph.parameter(w0);
        let cost = graph.mul(&[w, w]).unwrap();
        (graph, w, cost)
    }

    fn train_step(graph: &mut Graph, cost: NodeId, optimizer: &mut impl Optimizer<f64>) -> Result<(), GateNetError> {
        graph.compute(cost)?;
        graph.nullify_grads();
        optimizer.optimize(graph)
    }

    #[test]
    fn test_momentum_defaults() -> Result<(), GateNetError> {
        let (mut graph, _, cost) = square_cost(3.0);
        let optimizer = Momentum::new(&mut graph, cost, 0.1)?;
        assert_relative_eq!(optimizer.hyperparams().mu, 0.99);
        assert_relative_eq!(MomentumHyperParams::<f64>::default().lr, 0.01);
        Ok(())
    }

    #[test]
    fn test_momentum_invalid_mu() {
        let (mut graph, _, cost) = square_cost(3.0);
        for mu in [-0.1, 1.0, 1.5] {
            let hyper = MomentumHyperParams { lr: 0.1, mu };
            assert!(matches!(
                Momentum::with_hyperparams(&mut graph, cost, hyper),
                Err(GateNetError::ConfigurationError(_))
            ));
        }
    }

    #[test]
    fn test_momentum_steps_accumulate_velocity() -> Result<(), GateNetError> {
        let (mut graph, w, cost) = square_cost(3.0);
        let mut optimizer = Momentum::new(&mut graph, cost, 0.1)?;

        train_step(&mut graph, cost, &mut optimizer)?;
        // v = -0.1 * 6
        assert_relative_eq!(optimizer.velocity(w).unwrap(), -0.6, epsilon = 1e-12);
        assert_relative_eq!(graph.scalar(w)?, 2.4, epsilon = 1e-12);

        train_step(&mut graph, cost, &mut optimizer)?;
        // v = 0.99 * -0.6 - 0.1 * 4.8
        assert_relative_eq!(optimizer.velocity(w).unwrap(), -1.074, epsilon = 1e-12);
        assert_relative_eq!(graph.scalar(w)?, 1.326, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_momentum_zero_mu_matches_sgd() -> Result<(), GateNetError> {
        let (mut graph, w, cost) = square_cost(3.0);
        let hyper = MomentumHyperParams { lr: 0.1, mu: 0.0 };
        let mut optimizer = Momentum::with_hyperparams(&mut graph, cost, hyper)?;
        train_step(&mut graph, cost, &mut optimizer)?;
        train_step(&mut graph, cost, &mut optimizer)?;
        assert_relative_eq!(graph.scalar(w)?, 1.92, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn test_momentum_state_dict_round_trip() -> Result<(), GateNetError> {
        let (mut graph, w, cost) = square_cost(3.0);
        let mut trained = Momentum::new(&mut graph, cost, 0.1)?;
        train_step(&mut graph, cost, &mut trained)?;
        let state = trained.state_dict();

        let mut fresh = Momentum::new(&mut graph, cost, 0.1)?;
        assert_eq!(fresh.velocity(w), Some(0.0));
        fresh.load_state_dict(&state)?;
        assert_eq!(fresh.velocity(w), trained.velocity(w));

        let wrong_kind = OptimizerState::Adam {
            moments: Default::default(),
        };
        assert!(matches!(
            fresh.load_state_dict(&wrong_kind),
            Err(GateNetError::OptimizerError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_momentum_rejects_state_for_other_parameters() -> Result<(), GateNetError> {
        let (mut graph, w, cost) = square_cost(3.0);
        let mut optimizer = Momentum::new(&mut graph, cost, 0.1)?;

        let empty = OptimizerState::Momentum {
            velocity: Default::default(),
        };
        assert!(matches!(
            optimizer.load_state_dict(&empty),
            Err(GateNetError::OptimizerError(_))
        ));

        let foreign = OptimizerState::Momentum {
            velocity: [(NodeId(7), 1.0)].into_iter().collect(),
        };
        assert!(matches!(
            optimizer.load_state_dict(&foreign),
            Err(GateNetError::OptimizerError(_))
        ));
        assert_eq!(optimizer.velocity(w), Some(0.0));
        Ok(())
    }
}
