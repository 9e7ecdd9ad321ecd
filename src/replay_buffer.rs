use std::collections::VecDeque;

use ndarray::{Array1, Array2};
use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{Result, QtrainError};

/// One `(state, action, reward, next_state, done)` record of environment
/// interaction. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// A sampled batch of transitions, stacked into index-aligned arrays:
/// row `i` of `states`, `actions[i]`, `rewards[i]`, row `i` of
/// `next_states` and `dones[i]` all come from the same transition.
pub struct TransitionBatch {
    pub states: Array2<f32>,
    pub actions: Vec<usize>,
    pub rewards: Array1<f32>,
    pub next_states: Array2<f32>,
    pub dones: Vec<bool>,
}

/// Bounded FIFO store of past transitions with uniform batch sampling.
///
/// Occupancy never exceeds the capacity given at construction; pushing into
/// a full buffer evicts the oldest entry. Contents persist for the owning
/// agent's lifetime; there is no clear operation.
#[derive(Clone, Serialize, Deserialize)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one if at capacity.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `batch_size` transitions uniformly at random, without repeating
    /// an index within this call. Fails with
    /// [`QtrainError::InsufficientData`] while occupancy is below
    /// `batch_size`, or whenever the buffer is empty.
    pub fn sample<R: Rng>(&self, batch_size: usize, rng: &mut R) -> Result<TransitionBatch> {
        if self.buffer.is_empty() || self.buffer.len() < batch_size {
            return Err(QtrainError::InsufficientData {
                requested: batch_size,
                available: self.buffer.len(),
            });
        }

        let indices = rand::seq::index::sample(rng, self.buffer.len(), batch_size);

        let state_dim = self.buffer[0].state.len();
        let mut states = Array2::zeros((batch_size, state_dim));
        let mut next_states = Array2::zeros((batch_size, state_dim));
        let mut actions = Vec::with_capacity(batch_size);
        let mut rewards = Array1::zeros(batch_size);
        let mut dones = Vec::with_capacity(batch_size);

        for (row, index) in indices.into_iter().enumerate() {
            let transition = &self.buffer[index];
            states.row_mut(row).assign(&transition.state);
            next_states.row_mut(row).assign(&transition.next_state);
            actions.push(transition.action);
            rewards[row] = transition.reward;
            dones.push(transition.done);
        }

        Ok(TransitionBatch {
            states,
            actions,
            rewards,
            next_states,
            dones,
        })
    }

    /// Current occupancy, not capacity.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate transitions oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
