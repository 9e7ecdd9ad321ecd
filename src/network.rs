use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Serialize, Deserialize};

use crate::optimizer::{Optimizer, OptimizerWrapper};

/// A fully connected layer: weights, biases and an activation function.
#[derive(Serialize, Deserialize, Clone)]
pub struct Layer {
    pub weights: Array2<f32>,
    pub biases: Array1<f32>,
    pub activation: Activation,
    #[serde(skip)]
    pre_activation: Option<Array2<f32>>,
    #[serde(skip)]
    inputs: Option<Array2<f32>>,
}

impl Layer {
    /// Create a new layer. Weights are drawn uniformly from [-0.1, 0.1],
    /// biases start at zero.
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        let weights = Array2::random((input_size, output_size), Uniform::new(-0.1, 0.1));
        let biases = Array1::zeros(output_size);
        Layer {
            weights,
            biases,
            activation,
            pre_activation: None,
            inputs: None,
        }
    }

    /// Forward pass for a batch of inputs. Caches inputs and pre-activation
    /// outputs for a subsequent backward pass.
    fn forward_batch(&mut self, inputs: ArrayView2<f32>) -> Array2<f32> {
        self.inputs = Some(inputs.to_owned());
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.pre_activation = Some(outputs.clone());
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Forward pass without caching anything. Used wherever predictions must
    /// not participate in a later gradient step (target-network queries,
    /// greedy action selection).
    fn predict_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        let mut outputs = inputs.dot(&self.weights) + &self.biases.view().insert_axis(Axis(0));
        self.activation.apply_batch(&mut outputs);
        outputs
    }

    /// Backpropagate a batch of output errors through this layer.
    /// Returns (error to pass upstream pre-weighting, weight gradients, bias gradients).
    fn backward_batch(&self, output_errors: ArrayView2<f32>) -> (Array2<f32>, Array2<f32>, Array1<f32>) {
        let pre_activation = self
            .pre_activation
            .as_ref()
            .expect("forward_batch() must be called before backward_batch()");
        let inputs = self
            .inputs
            .as_ref()
            .expect("forward_batch() must be called before backward_batch()");
        let activation_deriv = self.activation.derivative_batch(pre_activation.view());
        let adjusted_error = output_errors.to_owned() * &activation_deriv;
        let weight_gradients = inputs.t().dot(&adjusted_error);
        let bias_gradients = adjusted_error.sum_axis(Axis(0));
        (adjusted_error, weight_gradients, bias_gradients)
    }
}

/// Activation functions available to [`Layer`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Linear,
}

impl Activation {
    fn apply_batch(&self, inputs: &mut Array2<f32>) {
        match self {
            Activation::Relu => {
                inputs.mapv_inplace(|v| v.max(0.0));
            }
            Activation::Linear => {}
        }
    }

    fn derivative_batch(&self, inputs: ArrayView2<f32>) -> Array2<f32> {
        match self {
            Activation::Relu => inputs.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Linear => Array2::ones(inputs.dim()),
        }
    }
}

/// Action-value function approximator.
///
/// A plain multilayer perceptron mapping a batch of states to a batch of
/// per-action value estimates. The agent owns two of these: the online
/// network trained by [`fit_batch`](QNetwork::fit_batch) and a target copy
/// that only ever changes through [`blend_from`](QNetwork::blend_from).
#[derive(Serialize, Deserialize, Clone)]
pub struct QNetwork {
    pub layers: Vec<Layer>,
    pub optimizer: OptimizerWrapper,
}

impl QNetwork {
    /// Build a network from consecutive layer sizes. Hidden layers use ReLU,
    /// the output layer is linear (raw action values).
    pub fn new(layer_sizes: &[usize], optimizer: OptimizerWrapper) -> Self {
        assert!(layer_sizes.len() >= 2, "need at least input and output sizes");

        let n = layer_sizes.len() - 1;
        let layers = layer_sizes
            .windows(2)
            .enumerate()
            .map(|(i, window)| {
                let activation = if i == n - 1 { Activation::Linear } else { Activation::Relu };
                Layer::new(window[0], window[1], activation)
            })
            .collect::<Vec<_>>();

        QNetwork { layers, optimizer }
    }

    /// Action values for a single state.
    pub fn forward(&self, state: ArrayView1<f32>) -> Array1<f32> {
        let state = state.insert_axis(Axis(0));
        let output = self.predict_batch(state.view());
        output.remove_axis(Axis(0))
    }

    /// Action values for a batch of states. No gradient bookkeeping; safe to
    /// call on the target network.
    pub fn predict_batch(&self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut current = states.to_owned();
        for layer in &self.layers {
            current = layer.predict_batch(current.view());
        }
        current
    }

    /// Forward pass that records per-layer caches for backpropagation.
    fn forward_batch(&mut self, states: ArrayView2<f32>) -> Array2<f32> {
        let mut current = states.to_owned();
        for layer in &mut self.layers {
            current = layer.forward_batch(current.view());
        }
        current
    }

    /// One mean-squared-error gradient step against `targets`.
    /// Returns the pre-update loss: squared error summed over outputs,
    /// averaged over the batch. With targets that differ from the
    /// predictions only at the taken action, this is the mean squared
    /// TD error.
    pub fn fit_batch(
        &mut self,
        states: ArrayView2<f32>,
        targets: ArrayView2<f32>,
        learning_rate: f32,
    ) -> f32 {
        let outputs = self.forward_batch(states);
        let output_errors = &outputs - &targets;
        let loss = output_errors.mapv(|e| e * e).sum() / outputs.nrows() as f32;

        // Backpropagate, collecting gradients from output layer to input layer.
        let mut gradients: Vec<(Array2<f32>, Array1<f32>)> = Vec::with_capacity(self.layers.len());
        let mut current_error = output_errors;
        for i in (0..self.layers.len()).rev() {
            let layer = &self.layers[i];
            let (adjusted_error, weight_gradients, bias_gradients) =
                layer.backward_batch(current_error.view());
            gradients.push((weight_gradients, bias_gradients));
            if i != 0 {
                current_error = adjusted_error.dot(&layer.weights.t());
            }
        }
        gradients.reverse();

        for (i, (layer, (weight_gradients, bias_gradients))) in
            self.layers.iter_mut().zip(gradients).enumerate()
        {
            self.optimizer
                .update_weights(i, &mut layer.weights, &weight_gradients, learning_rate);
            self.optimizer
                .update_biases(i, &mut layer.biases, &bias_gradients, learning_rate);
        }

        loss
    }

    /// Elementwise soft update: `θ ← τ·θ_source + (1-τ)·θ` for every
    /// parameter. `τ = 1` is a full copy.
    pub fn blend_from(&mut self, source: &QNetwork, tau: f32) {
        debug_assert_eq!(self.layers.len(), source.layers.len());
        for (layer, src) in self.layers.iter_mut().zip(&source.layers) {
            layer
                .weights
                .zip_mut_with(&src.weights, |t, &s| *t = tau * s + (1.0 - tau) * *t);
            layer
                .biases
                .zip_mut_with(&src.biases, |t, &s| *t = tau * s + (1.0 - tau) * *t);
        }
    }

    /// Index of the highest-valued action for `state`. Ties resolve to the
    /// lowest index, so identical inputs always produce identical actions.
    pub fn greedy_action(&self, state: ArrayView1<f32>) -> usize {
        let q_values = self.forward(state);
        let mut best = 0;
        for (i, &v) in q_values.iter().enumerate() {
            if v > q_values[best] {
                best = i;
            }
        }
        best
    }
}
