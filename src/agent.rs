use ndarray::{Array1, ArrayView1};
use rand::{Rng, rngs::ThreadRng};
use serde::{Serialize, Deserialize};

use crate::config::AgentConfig;
use crate::error::{Result, QtrainError};
use crate::network::QNetwork;
use crate::optimizer::OptimizerWrapper;
use crate::replay_buffer::{ReplayBuffer, Transition};

/// Deep Q-Network agent with experience replay and a soft-updated target
/// network.
///
/// The agent owns two function approximators. The online network is trained
/// by every [`learn`](DqnAgent::learn) call; the target network starts as a
/// hard copy of the online network and thereafter only tracks it through an
/// exponential-moving-average blend (`θ_target ← τ·θ_online + (1-τ)·θ_target`),
/// which keeps the bootstrap targets stable while the online estimate moves.
///
/// # Example
///
/// ```rust
/// use qtrain::agent::DqnAgent;
/// use qtrain::config::AgentConfig;
/// use qtrain::optimizer::{OptimizerWrapper, SGD};
/// use qtrain::replay_buffer::Transition;
/// use ndarray::array;
///
/// let config = AgentConfig {
///     state_dim: 4,
///     action_dim: 2,
///     learn_start: 32,
///     ..AgentConfig::default()
/// };
/// let mut agent = DqnAgent::new(config, OptimizerWrapper::SGD(SGD::new())).unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.act(state.view());
///
/// // After the environment step...
/// agent.observe_and_step(Transition {
///     state,
///     action,
///     reward: 1.0,
///     next_state: array![0.15, -0.25, 0.35, -0.05],
///     done: false,
/// }).unwrap();
/// ```
#[derive(Serialize, Deserialize)]
pub struct DqnAgent {
    /// Validated hyperparameters, fixed for the agent's lifetime
    pub config: AgentConfig,

    /// Online network, mutated by every learning step
    pub q_network: QNetwork,

    /// Slowly-tracking copy used for bootstrap targets; never trained directly
    pub target_network: QNetwork,

    /// Experience replay memory
    pub memory: ReplayBuffer,

    /// Current exploration rate
    pub epsilon: f32,

    /// Environment steps observed so far; monotone, never reset
    pub counter_steps: usize,

    /// Stochastic exploration when true, deterministic greedy policy when false
    pub training: bool,

    #[serde(skip)]
    rng: ThreadRng,
}

impl DqnAgent {
    /// Build an agent from a validated configuration. Both networks start
    /// with identical parameters (hard copy); the replay buffer starts empty.
    pub fn new(config: AgentConfig, optimizer: OptimizerWrapper) -> Result<Self> {
        config.validate()?;

        let q_network = QNetwork::new(&config.layer_sizes(), optimizer);
        let target_network = q_network.clone();
        let memory = ReplayBuffer::new(config.memory_size);
        let epsilon = config.eps_start;

        Ok(DqnAgent {
            config,
            q_network,
            target_network,
            memory,
            epsilon,
            counter_steps: 0,
            training: true,
            rng: rand::thread_rng(),
        })
    }

    /// Select an action for `state`.
    ///
    /// While warming up (`training` and fewer than `learn_start` steps seen)
    /// the action is uniformly random and the network is never queried; this
    /// fills the buffer before any gradient signal exists. Past warmup the
    /// policy is epsilon-greedy. With `training` false the action is always
    /// the greedy one, whatever `epsilon` currently is.
    pub fn act(&mut self, state: ArrayView1<f32>) -> usize {
        if self.training && self.counter_steps < self.config.learn_start {
            self.rng.gen_range(0..self.config.action_dim)
        } else if self.training && self.rng.gen::<f32>() < self.epsilon {
            self.rng.gen_range(0..self.config.action_dim)
        } else {
            self.q_network.greedy_action(state)
        }
    }

    /// Record a transition and advance the step counter. Triggers a learning
    /// update once warmup is over, every `learn_every` steps while training.
    /// Returns the loss when an update ran.
    pub fn observe_and_step(&mut self, transition: Transition) -> Result<Option<f32>> {
        if transition.action >= self.config.action_dim {
            return Err(QtrainError::InvalidAction {
                action: transition.action,
                action_dim: self.config.action_dim,
            });
        }

        self.memory.push(transition);
        self.counter_steps += 1;

        if self.training
            && self.counter_steps >= self.config.learn_start
            && self.counter_steps % self.config.learn_every == 0
        {
            self.learn()
        } else {
            Ok(None)
        }
    }

    /// One learning update: sample a batch, take a gradient step on the
    /// online network toward the bootstrapped targets, then soft-update the
    /// target network. A no-op while the buffer holds fewer than
    /// `batch_size` transitions.
    pub fn learn(&mut self) -> Result<Option<f32>> {
        let batch = match self.memory.sample(self.config.batch_size, &mut self.rng) {
            Ok(batch) => batch,
            Err(QtrainError::InsufficientData { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };

        // y = r + gamma * max_a' Q_target(s', a'), with the bootstrap term
        // zeroed on terminal transitions. The target network is queried
        // without any gradient bookkeeping.
        let next_q = self.target_network.predict_batch(batch.next_states.view());

        // Targets equal the online predictions everywhere except the taken
        // action, so only Q(s, a) receives gradient.
        let mut targets = self.q_network.predict_batch(batch.states.view());
        for i in 0..self.config.batch_size {
            let y = if batch.dones[i] {
                batch.rewards[i]
            } else {
                let max_next = next_q
                    .row(i)
                    .iter()
                    .fold(f32::NEG_INFINITY, |max, &v| max.max(v));
                batch.rewards[i] + self.config.gamma * max_next
            };
            targets[[i, batch.actions[i]]] = y;
        }

        let loss = self.q_network.fit_batch(
            batch.states.view(),
            targets.view(),
            self.config.learning_rate,
        );

        self.target_network.blend_from(&self.q_network, self.config.tau);

        Ok(Some(loss))
    }

    /// One geometric decay step: `epsilon <- max(eps_end, epsilon * eps_decay)`.
    /// Called once per completed episode, not per step.
    pub fn update_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.eps_decay).max(self.config.eps_end);
    }

    /// Online network's action-value estimates for `state`.
    pub fn q_values(&self, state: ArrayView1<f32>) -> Array1<f32> {
        self.q_network.forward(state)
    }

    /// Persist the full agent (networks, memory, counters) to `path`.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = bincode::serialize(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Restore an agent previously written by [`save`](DqnAgent::save).
    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read(path)?;
        let agent: Self = bincode::deserialize(&data)?;
        Ok(agent)
    }
}
