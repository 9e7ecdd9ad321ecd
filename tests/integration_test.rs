use ndarray::{array, Array1};

use qtrain::agent::DqnAgent;
use qtrain::config::{AgentConfig, MonitorConfig};
use qtrain::environment::{Environment, Step};
use qtrain::error::Result;
use qtrain::monitor::Monitor;
use qtrain::optimizer::{Adam, OptimizerWrapper, SGD};
use qtrain::reporter::NullReporter;

/// Small corridor task: walking right pays 1.0, standing still pays nothing,
/// and the episode ends after `len` steps either way.
struct Corridor {
    len: usize,
    position: usize,
    t: usize,
}

impl Corridor {
    fn new(len: usize) -> Self {
        Corridor { len, position: 0, t: 0 }
    }

    fn state(&self) -> Array1<f32> {
        array![
            self.position as f32 / self.len as f32,
            self.t as f32 / self.len as f32,
        ]
    }
}

impl Environment for Corridor {
    fn state_dim(&self) -> usize {
        2
    }

    fn action_dim(&self) -> usize {
        2
    }

    fn reset(&mut self) -> Result<Array1<f32>> {
        self.position = 0;
        self.t = 0;
        Ok(self.state())
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        self.t += 1;
        let reward = if action == 1 {
            self.position = (self.position + 1).min(self.len);
            1.0
        } else {
            0.0
        };
        Ok(Step {
            next_state: self.state(),
            reward,
            done: self.t >= self.len,
        })
    }
}

#[test]
fn test_end_to_end_training_to_solved() {
    let dir = tempfile::tempdir().unwrap();
    let checkpoint = dir.path().join("corridor.bin");
    let log_path = dir.path().join("corridor.json");

    let agent_config = AgentConfig {
        state_dim: 2,
        action_dim: 2,
        hidden_layers: vec![16],
        memory_size: 2_000,
        batch_size: 16,
        gamma: 0.9,
        tau: 0.05,
        learning_rate: 0.01,
        learn_start: 100,
        learn_every: 2,
        eps_start: 1.0,
        eps_end: 0.05,
        eps_decay: 0.98,
        ..AgentConfig::default()
    };
    let agent = DqnAgent::new(agent_config, OptimizerWrapper::SGD(SGD::new())).unwrap();

    // A random policy averages ~5.0 per 10-step episode, so a criterion of
    // 3.0 exercises the full solved path without depending on convergence.
    let monitor_config = MonitorConfig {
        train_episodes: 500,
        max_steps_in_episode: 10,
        window: 20,
        report_freq: 10,
        eval_freq: 50,
        eval_steps: 40,
        reward_solved_criteria: 3.0,
        checkpoint_path: Some(checkpoint.to_str().unwrap().to_string()),
    };

    let mut monitor =
        Monitor::new(agent, Corridor::new(10), monitor_config, NullReporter).unwrap();
    let report = monitor.train().unwrap();

    assert!(report.solved);
    assert!(report.episodes <= 500);
    assert!(report.total_steps > 0);
    assert!(checkpoint.exists());

    // Solving appends a final evaluation record.
    let record = monitor.log().evals.last().copied().unwrap();
    assert_eq!(record.episodes_solved, 4); // 40 eval steps / 10-step episodes
    assert!(record.reward_avg.is_finite());

    monitor.log().save(log_path.to_str().unwrap()).unwrap();
    assert!(log_path.exists());

    // The checkpoint restores to an agent with the same greedy policy.
    let trained = monitor.into_agent();
    let restored = DqnAgent::load(checkpoint.to_str().unwrap()).unwrap();
    let probe = array![0.5, 0.5];
    assert_eq!(
        trained.q_network.greedy_action(probe.view()),
        restored.q_network.greedy_action(probe.view())
    );
}

#[test]
fn test_greedy_rollouts_after_training() {
    let agent_config = AgentConfig {
        state_dim: 2,
        action_dim: 2,
        hidden_layers: vec![16],
        memory_size: 1_000,
        batch_size: 8,
        learn_start: 50,
        learn_every: 1,
        ..AgentConfig::default()
    };
    let layers = vec![
        qtrain::network::Layer::new(2, 16, qtrain::network::Activation::Relu),
        qtrain::network::Layer::new(16, 2, qtrain::network::Activation::Linear),
    ];
    let optimizer = OptimizerWrapper::Adam(Adam::default_for(&layers));
    let agent = DqnAgent::new(agent_config, optimizer).unwrap();

    let monitor_config = MonitorConfig {
        train_episodes: 30,
        max_steps_in_episode: 10,
        window: 10,
        report_freq: 10,
        eval_freq: 1_000,
        eval_steps: 20,
        reward_solved_criteria: 1e9,
        checkpoint_path: None,
    };

    let mut monitor =
        Monitor::new(agent, Corridor::new(10), monitor_config, NullReporter).unwrap();
    let report = monitor.train().unwrap();
    assert!(!report.solved);

    // Deterministic rollouts stay inside the reward range the corridor allows.
    let rewards = monitor.play(3).unwrap();
    assert_eq!(rewards.len(), 3);
    for reward in rewards {
        assert!((0.0..=10.0).contains(&reward));
    }
    assert!(monitor.agent().training);
}
