//! # qtrain - Deep Q-Network Training Library
//!
//! qtrain trains a value-based reinforcement-learning agent against an
//! episodic environment, using an experience-replay buffer and a
//! soft-updated target network to stabilize bootstrapped learning.
//!
//! The library is a single synchronous learning loop split across three
//! components:
//!
//! - [`replay_buffer::ReplayBuffer`] - bounded FIFO store of transitions
//!   with uniform batch sampling
//! - [`agent::DqnAgent`] - epsilon-greedy policy, temporal-difference
//!   learning update, and target-network synchronization
//! - [`monitor::Monitor`] - the outer training/evaluation control loop,
//!   parameterized over [`environment::Environment`] and
//!   [`reporter::Reporter`] capabilities
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qtrain::agent::DqnAgent;
//! use qtrain::config::{AgentConfig, MonitorConfig};
//! use qtrain::monitor::Monitor;
//! use qtrain::optimizer::{OptimizerWrapper, SGD};
//! use qtrain::reporter::ConsoleReporter;
//! # use qtrain::environment::{Environment, Step};
//! # use qtrain::error::Result;
//! # use ndarray::Array1;
//! # struct MyEnv;
//! # impl Environment for MyEnv {
//! #     fn state_dim(&self) -> usize { 4 }
//! #     fn action_dim(&self) -> usize { 2 }
//! #     fn reset(&mut self) -> Result<Array1<f32>> { Ok(Array1::zeros(4)) }
//! #     fn step(&mut self, _action: usize) -> Result<Step> {
//! #         Ok(Step { next_state: Array1::zeros(4), reward: 1.0, done: true })
//! #     }
//! # }
//!
//! let config = AgentConfig {
//!     state_dim: 4,
//!     action_dim: 2,
//!     ..AgentConfig::default()
//! };
//! let agent = DqnAgent::new(config, OptimizerWrapper::SGD(SGD::new())).unwrap();
//!
//! let mut monitor = Monitor::new(
//!     agent,
//!     MyEnv,
//!     MonitorConfig::default(),
//!     ConsoleReporter::default(),
//! ).unwrap();
//!
//! let report = monitor.train().unwrap();
//! println!("solved: {} after {} episodes", report.solved, report.episodes);
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - the DQN agent (policy and learning state machine)
//! - [`config`] - validated hyperparameter structures
//! - [`environment`] - environment capability trait
//! - [`error`] - error types and result handling
//! - [`metrics`] - rolling statistics and the training log
//! - [`monitor`] - the training/evaluation control loop
//! - [`network`] - multilayer-perceptron function approximator
//! - [`optimizer`] - gradient-application strategies (SGD, Adam)
//! - [`replay_buffer`] - experience replay memory
//! - [`reporter`] - injected reporting interface

pub mod agent;
pub mod config;
pub mod environment;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod reporter;

#[cfg(test)]
mod tests;
