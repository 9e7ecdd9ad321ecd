use serde::{Serialize, Deserialize};

use crate::error::{Result, QtrainError};

/// Hyperparameters for a [`DqnAgent`](crate::agent::DqnAgent).
///
/// Every recognized hyperparameter is listed here with an explicit domain,
/// checked once by [`AgentConfig::validate`] at agent construction. An agent
/// is never built from an unvalidated configuration.
///
/// # Example
///
/// ```rust
/// use qtrain::config::AgentConfig;
///
/// let config = AgentConfig {
///     state_dim: 4,
///     action_dim: 2,
///     ..AgentConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Dimensionality of the state feature vector
    pub state_dim: usize,
    /// Number of discrete actions; actions are indices in `[0, action_dim)`
    pub action_dim: usize,
    /// Hidden layer widths of both Q-networks
    pub hidden_layers: Vec<usize>,
    /// Replay buffer capacity
    pub memory_size: usize,
    /// Number of transitions per learning batch
    pub batch_size: usize,
    /// Discount factor, in `[0, 1]`
    pub gamma: f32,
    /// Soft-update blend factor, in `(0, 1]`; `tau = 1` degenerates to a hard copy
    pub tau: f32,
    /// Step size for the online network's gradient updates
    pub learning_rate: f32,
    /// Steps of pure exploration before any learning happens
    pub learn_start: usize,
    /// Learn once every this many environment steps
    pub learn_every: usize,
    /// Initial exploration rate, in `[eps_end, 1]`
    pub eps_start: f32,
    /// Exploration rate floor, in `[0, eps_start]`
    pub eps_end: f32,
    /// Per-episode geometric decay factor, in `(0, 1]`
    pub eps_decay: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            state_dim: 4,
            action_dim: 2,
            hidden_layers: vec![64, 64],
            memory_size: 100_000,
            batch_size: 64,
            gamma: 0.99,
            tau: 1e-3,
            learning_rate: 5e-4,
            learn_start: 1_000,
            learn_every: 4,
            eps_start: 1.0,
            eps_end: 0.01,
            eps_decay: 0.995,
        }
    }
}

impl AgentConfig {
    /// Check every hyperparameter against its domain.
    pub fn validate(&self) -> Result<()> {
        if self.state_dim == 0 {
            return Err(QtrainError::invalid_parameter("state_dim", "must be greater than 0"));
        }
        if self.action_dim == 0 {
            return Err(QtrainError::invalid_parameter("action_dim", "must be greater than 0"));
        }
        if self.memory_size == 0 {
            return Err(QtrainError::invalid_parameter("memory_size", "must be greater than 0"));
        }
        if self.batch_size == 0 || self.batch_size > self.memory_size {
            return Err(QtrainError::invalid_parameter(
                "batch_size",
                "must be in (0, memory_size]",
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(QtrainError::invalid_parameter("gamma", "must be in [0, 1]"));
        }
        if !(self.tau > 0.0 && self.tau <= 1.0) {
            return Err(QtrainError::invalid_parameter("tau", "must be in (0, 1]"));
        }
        if self.learning_rate <= 0.0 || !self.learning_rate.is_finite() {
            return Err(QtrainError::invalid_parameter("learning_rate", "must be positive and finite"));
        }
        if self.learn_every == 0 {
            return Err(QtrainError::invalid_parameter("learn_every", "must be greater than 0"));
        }
        if !(0.0..=1.0).contains(&self.eps_start) {
            return Err(QtrainError::invalid_parameter("eps_start", "must be in [0, 1]"));
        }
        if self.eps_end < 0.0 || self.eps_end > self.eps_start {
            return Err(QtrainError::invalid_parameter("eps_end", "must be in [0, eps_start]"));
        }
        if !(self.eps_decay > 0.0 && self.eps_decay <= 1.0) {
            return Err(QtrainError::invalid_parameter("eps_decay", "must be in (0, 1]"));
        }
        Ok(())
    }

    /// Layer sizes of both Q-networks, input to output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.hidden_layers.len() + 2);
        sizes.push(self.state_dim);
        sizes.extend_from_slice(&self.hidden_layers);
        sizes.push(self.action_dim);
        sizes
    }
}

/// Settings for the [`Monitor`](crate::monitor::Monitor) control loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Upper bound on training episodes
    pub train_episodes: usize,
    /// Step cap per episode; episodes also end early on `done`
    pub max_steps_in_episode: usize,
    /// Rolling window length for the solved criterion and reporting
    pub window: usize,
    /// Emit training statistics every this many episodes
    pub report_freq: usize,
    /// Run an evaluation pass every this many episodes
    pub eval_freq: usize,
    /// Total environment steps per evaluation pass
    pub eval_steps: usize,
    /// Rolling average reward at which the environment counts as solved
    pub reward_solved_criteria: f32,
    /// Where to persist the agent once solved; `None` skips checkpointing
    pub checkpoint_path: Option<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            train_episodes: 2_000,
            max_steps_in_episode: 1_000,
            window: 100,
            report_freq: 100,
            eval_freq: 500,
            eval_steps: 1_000,
            reward_solved_criteria: 195.0,
            checkpoint_path: None,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.train_episodes == 0 {
            return Err(QtrainError::invalid_parameter("train_episodes", "must be greater than 0"));
        }
        if self.max_steps_in_episode == 0 {
            return Err(QtrainError::invalid_parameter(
                "max_steps_in_episode",
                "must be greater than 0",
            ));
        }
        if self.window == 0 {
            return Err(QtrainError::invalid_parameter("window", "must be greater than 0"));
        }
        if self.report_freq == 0 {
            return Err(QtrainError::invalid_parameter("report_freq", "must be greater than 0"));
        }
        if self.eval_freq == 0 {
            return Err(QtrainError::invalid_parameter("eval_freq", "must be greater than 0"));
        }
        if self.eval_steps == 0 {
            return Err(QtrainError::invalid_parameter("eval_steps", "must be greater than 0"));
        }
        Ok(())
    }
}
