use std::collections::VecDeque;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// Fixed-capacity FIFO window over a scalar series.
///
/// Pushing into a full window evicts the oldest value, so `mean()` is always
/// the average of at most the last `capacity` observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingWindow {
    values: VecDeque<f32>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        RollingWindow {
            values: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f32) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Mean of the current contents; `None` while empty.
    pub fn mean(&self) -> Option<f32> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f32>() / self.values.len() as f32)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }
}

/// One evaluation pass summary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Total environment steps observed when the pass ran
    pub at_step: usize,
    /// Episodes completed within the step budget
    pub episodes_solved: usize,
    /// Mean reward over completed episodes; NaN if none completed
    pub reward_avg: f32,
    /// Mean length of completed episodes; NaN if none completed
    pub steps_avg: f32,
    /// Mean of the online network's Q-values across visited states
    pub state_value_avg: f32,
}

/// Serializable record of a training run: per-episode series plus one entry
/// per evaluation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingLog {
    /// `(episode, rolling reward average)`
    pub reward_avg: Vec<(usize, f32)>,
    /// `(episode, rolling episode-length average)`
    pub steps_avg: Vec<(usize, f32)>,
    /// `(episode, mean loss over the episode's learning updates)`
    pub loss: Vec<(usize, f32)>,
    /// `(episode, epsilon after that episode's decay)`
    pub epsilon: Vec<(usize, f32)>,
    /// One record per evaluation pass
    pub evals: Vec<EvalRecord>,
}

impl TrainingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the log as pretty-printed JSON.
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}
