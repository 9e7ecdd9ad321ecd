use ndarray::{Array1, Array2};

use crate::error::Result;

/// Outcome of one environment step.
#[derive(Clone, Debug)]
pub struct Step {
    pub next_state: Array1<f32>,
    pub reward: f32,
    pub done: bool,
}

/// Episodic environment contract consumed by the [`Monitor`](crate::monitor::Monitor).
///
/// State and action shapes are fixed for the lifetime of the agent trained
/// against this environment. Errors returned by `step` or `reset` propagate
/// unmodified out of the training loop; the library never retries them.
pub trait Environment {
    /// Dimensionality of the state feature vector.
    fn state_dim(&self) -> usize;

    /// Number of discrete actions.
    fn action_dim(&self) -> usize;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> Result<Array1<f32>>;

    /// Apply `action` and advance one step.
    fn step(&mut self, action: usize) -> Result<Step>;

    /// Current frame as a grayscale image, if this environment renders.
    fn render(&mut self) -> Option<Array2<f32>> {
        None
    }
}
