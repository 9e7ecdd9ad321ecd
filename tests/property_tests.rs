#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use qtrain::agent::DqnAgent;
    use qtrain::config::AgentConfig;
    use qtrain::optimizer::{OptimizerWrapper, SGD};
    use qtrain::replay_buffer::{ReplayBuffer, Transition};
    use ndarray::array;

    fn transition(label: usize) -> Transition {
        Transition {
            state: array![label as f32],
            action: 0,
            reward: label as f32,
            next_state: array![(label + 1) as f32],
            done: false,
        }
    }

    proptest! {
        #[test]
        fn buffer_length_never_exceeds_capacity(
            capacity in 1usize..50,
            appends in 0usize..200
        ) {
            let mut buffer = ReplayBuffer::new(capacity);
            for i in 0..appends {
                buffer.push(transition(i));
                prop_assert!(buffer.len() <= capacity);
            }
            prop_assert_eq!(buffer.len(), appends.min(capacity));
        }

        #[test]
        fn buffer_evicts_oldest_first(
            capacity in 1usize..30,
            appends in 1usize..120
        ) {
            let mut buffer = ReplayBuffer::new(capacity);
            for i in 0..appends {
                buffer.push(transition(i));
            }

            // Surviving entries are exactly the most recent ones, in order.
            let expected_start = appends.saturating_sub(capacity);
            let labels: Vec<usize> = buffer.iter().map(|t| t.reward as usize).collect();
            let expected: Vec<usize> = (expected_start..appends).collect();
            prop_assert_eq!(labels, expected);
        }

        #[test]
        fn sample_indices_are_distinct(
            occupancy in 1usize..50,
            batch_fraction in 1usize..=100
        ) {
            let mut buffer = ReplayBuffer::new(occupancy);
            for i in 0..occupancy {
                buffer.push(transition(i));
            }
            let batch_size = (occupancy * batch_fraction / 100).max(1);

            let mut rng = rand::thread_rng();
            let batch = buffer.sample(batch_size, &mut rng).unwrap();

            let mut labels: Vec<i64> = batch.rewards.iter().map(|&r| r as i64).collect();
            labels.sort_unstable();
            labels.dedup();
            prop_assert_eq!(labels.len(), batch_size);
        }

        #[test]
        fn sampling_below_occupancy_fails(
            occupancy in 0usize..20,
            shortfall in 1usize..10
        ) {
            let mut buffer = ReplayBuffer::new(64);
            for i in 0..occupancy {
                buffer.push(transition(i));
            }

            let mut rng = rand::thread_rng();
            prop_assert!(buffer.sample(occupancy + shortfall, &mut rng).is_err());
        }

        #[test]
        fn epsilon_decay_follows_closed_form(
            eps_start in 0.1f32..=1.0,
            eps_decay in 0.5f32..1.0,
            episodes in 1usize..50
        ) {
            let config = AgentConfig {
                state_dim: 1,
                action_dim: 2,
                hidden_layers: vec![4],
                eps_start,
                eps_end: 0.01,
                eps_decay,
                ..AgentConfig::default()
            };
            prop_assume!(config.validate().is_ok());

            let mut agent = DqnAgent::new(config, OptimizerWrapper::SGD(SGD::new())).unwrap();
            for _ in 0..episodes {
                agent.update_epsilon();
            }

            let expected = (eps_start * eps_decay.powi(episodes as i32)).max(0.01);
            prop_assert!((agent.epsilon - expected).abs() < 1e-4);
            prop_assert!(agent.epsilon >= 0.0 && agent.epsilon <= 1.0);
        }
    }
}
