use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace, warn};

use crate::loss::target_at;
use crate::{Activation, ConfigPatch, Error, NetworkConfig, Neuron, Result, WeightMatrix};

/// Half-width of the uniform range used for fresh biases.
pub const BIAS_INIT_RANGE: f32 = 0.1;

/// Bias updates use this fraction of the learning rate.
pub const BIAS_LR_SCALE: f32 = 0.1;

/// A three-layer feed-forward network trained online, one sample per step.
///
/// All numeric state lives here. Renderers read it through the accessors after each
/// call; nothing outside the engine mutates it.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetworkConfig,
    sizes: Vec<usize>,
    neurons: Vec<Vec<Neuron>>,
    /// `weights[l]` connects layer `l` to layer `l + 1`.
    weights: Vec<WeightMatrix>,
    loss: f32,
    iteration: u64,
    rng: StdRng,
    nan_reported: bool,
}

/// What a single training step observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStats {
    /// Loss as reported by [`Network::loss`] (NaN clamped to 1).
    pub loss: f32,
    /// Loss before clamping.
    pub raw_loss: f32,
    /// Edges whose downstream delta was NaN and were left untouched.
    pub skipped_edges: usize,
}

/// How [`Network::apply`] handled a configuration patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Learning rate / activations updated, weights kept.
    Live,
    /// Node counts changed; all state was rebuilt.
    Reinitialized,
}

impl Network {
    /// Build and randomly initialize a network, seeding from OS entropy.
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Build with a deterministic seed. Later calls to [`Network::init`] keep drawing
    /// from the same stream.
    pub fn with_seed(config: NetworkConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: NetworkConfig, rng: StdRng) -> Self {
        let mut net = Self {
            config,
            sizes: Vec::new(),
            neurons: Vec::new(),
            weights: Vec::new(),
            loss: 1.0,
            iteration: 0,
            rng,
            nan_reported: false,
        };
        net.init(config);
        net
    }

    /// Build from explicit parameters, bypassing random initialization.
    ///
    /// `biases[l]` holds one bias per neuron of layer `l`; `weights[l]` must have shape
    /// `(sizes[l], sizes[l + 1])`. The instance RNG starts from seed `0`, so a later
    /// [`Network::init`] is reproducible; see [`Network::reseed`].
    pub fn from_parts(
        config: NetworkConfig,
        biases: Vec<Vec<f32>>,
        weights: Vec<WeightMatrix>,
    ) -> Result<Self> {
        let sizes = config.layer_sizes().to_vec();
        if biases.len() != sizes.len() {
            return Err(Error::InvalidShape(format!(
                "expected {} bias layers, got {}",
                sizes.len(),
                biases.len()
            )));
        }
        for (l, (layer, &size)) in biases.iter().zip(&sizes).enumerate() {
            if layer.len() != size {
                return Err(Error::InvalidShape(format!(
                    "bias layer {l} has len {}, expected {size}",
                    layer.len()
                )));
            }
        }
        if weights.len() != sizes.len() - 1 {
            return Err(Error::InvalidShape(format!(
                "expected {} weight matrices, got {}",
                sizes.len() - 1,
                weights.len()
            )));
        }
        for (l, w) in weights.iter().enumerate() {
            if (w.in_dim(), w.out_dim()) != (sizes[l], sizes[l + 1]) {
                return Err(Error::InvalidShape(format!(
                    "weight matrix {l} has shape ({}, {}), expected ({}, {})",
                    w.in_dim(),
                    w.out_dim(),
                    sizes[l],
                    sizes[l + 1]
                )));
            }
        }

        let neurons = biases
            .into_iter()
            .map(|layer| layer.into_iter().map(Neuron::new).collect())
            .collect();

        Ok(Self {
            config,
            sizes,
            neurons,
            weights,
            loss: 1.0,
            iteration: 0,
            rng: StdRng::seed_from_u64(0),
            nan_reported: false,
        })
    }

    /// Restart the instance RNG used by [`Network::init`].
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Discard all state and rebuild the topology described by `config`.
    ///
    /// Node counts are not validated here; see [`NetworkConfig::validate`].
    pub fn init(&mut self, config: NetworkConfig) {
        self.config = config;
        self.sizes = config.layer_sizes().to_vec();
        let (neurons, weights) = random_parameters(&self.sizes, &mut self.rng);
        self.neurons = neurons;
        self.weights = weights;
        self.iteration = 0;
        self.loss = 1.0;
        self.nan_reported = false;
        debug!(sizes = ?self.sizes, "network initialized");
    }

    /// Merge `patch` into the current configuration.
    ///
    /// A change in any node count triggers a full [`Network::init`]; anything else is
    /// applied in place and existing weights are kept.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Applied {
        let next = self.config.merged(patch);
        if patch.changes_topology(&self.config) {
            self.init(next);
            Applied::Reinitialized
        } else {
            self.config = next;
            Applied::Live
        }
    }

    #[inline]
    pub fn set_learning_rate(&mut self, lr: f32) {
        self.config.learning_rate = lr;
    }

    #[inline]
    pub fn set_activations(&mut self, hidden: Activation, output: Activation) {
        self.config.hidden_activation = hidden;
        self.config.output_activation = output;
    }

    /// Forward pass for a single sample.
    ///
    /// Missing input entries read as `0`; extra entries are ignored.
    pub fn forward(&mut self, inputs: &[f32]) {
        if let Some(input_layer) = self.neurons.first_mut() {
            for (i, n) in input_layer.iter_mut().enumerate() {
                n.value = inputs.get(i).copied().unwrap_or(0.0);
            }
        }

        let last = self.weights.len();
        for (l, w) in self.weights.iter().enumerate() {
            let act = if l + 1 == last {
                self.config.output_activation
            } else {
                self.config.hidden_activation
            };

            // Borrow the previous layer immutably and the current layer mutably.
            let (left, right) = self.neurons.split_at_mut(l + 1);
            let prev = &left[l];
            for (j, n) in right[0].iter_mut().enumerate() {
                let mut sum = n.bias;
                for (i, p) in prev.iter().enumerate() {
                    sum += p.value * w.get(i, j);
                }
                n.value = act.forward(sum);
            }
        }
    }

    /// One online SGD step: forward, output error, backprop, in-place update.
    ///
    /// Missing target entries read as `0`. Never fails; a NaN loss is reported as `1`.
    pub fn train_step(&mut self, inputs: &[f32], targets: &[f32]) -> StepStats {
        self.forward(inputs);
        self.iteration += 1;

        let raw_loss = self.output_error(targets);
        self.loss = raw_loss;

        let mut skipped_edges = 0;
        for l in (0..self.weights.len()).rev() {
            skipped_edges += self.backward_layer(l);
        }
        if skipped_edges > 0 {
            trace!(
                iteration = self.iteration,
                skipped_edges, "skipped edges with NaN deltas"
            );
        }

        if self.loss.is_nan() {
            if !self.nan_reported {
                warn!(
                    iteration = self.iteration,
                    "loss is NaN, reporting 1; parameters may have diverged"
                );
                self.nan_reported = true;
            }
            self.loss = 1.0;
        }

        StepStats {
            loss: self.loss,
            raw_loss,
            skipped_edges,
        }
    }

    /// Write output-layer deltas for `targets` and return the raw mean squared error.
    fn output_error(&mut self, targets: &[f32]) -> f32 {
        let act = self.config.output_activation;
        let Some(output) = self.neurons.last_mut() else {
            return 0.0;
        };

        let mut sum_sq = 0.0_f32;
        for (i, n) in output.iter_mut().enumerate() {
            let err = target_at(targets, i) - n.value;
            sum_sq += err * err;
            n.delta = err * act.grad_from_output(n.value);
        }
        // An empty output layer yields NaN here, which `train_step` clamps.
        sum_sq / output.len() as f32
    }

    /// Propagate deltas from layer `l + 1` into layer `l`, updating `weights[l]` and the
    /// biases of layer `l`. Returns the number of edges skipped for NaN deltas.
    fn backward_layer(&mut self, l: usize) -> usize {
        let lr = self.config.learning_rate;
        let act = self.config.hidden_activation;

        let (left, right) = self.neurons.split_at_mut(l + 1);
        let downstream = &right[0];
        let w = &mut self.weights[l];

        let mut skipped = 0;
        for (i, n) in left[l].iter_mut().enumerate() {
            let mut err_sum = 0.0_f32;
            for (j, d) in downstream.iter().enumerate() {
                let d = d.delta;
                if d.is_nan() {
                    skipped += 1;
                    continue;
                }
                let edge = w.get_mut(i, j);
                err_sum += d * *edge;
                *edge += n.value * d * lr;
            }
            n.delta = err_sum * act.grad_from_output(n.value);
            n.bias += n.delta * lr * BIAS_LR_SCALE;
        }
        skipped
    }

    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Neuron counts per layer: input, hidden, output.
    #[inline]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.sizes
    }

    #[inline]
    pub fn num_layers(&self) -> usize {
        self.sizes.len()
    }

    /// Neurons of layer `l`. Panics if `l` is out of range.
    #[inline]
    pub fn layer(&self, l: usize) -> &[Neuron] {
        &self.neurons[l]
    }

    #[inline]
    pub fn neuron(&self, l: usize, i: usize) -> Option<&Neuron> {
        self.neurons.get(l)?.get(i)
    }

    /// Weight matrix between layer `l` and `l + 1`. Panics if `l` is out of range.
    #[inline]
    pub fn weights(&self, l: usize) -> &WeightMatrix {
        &self.weights[l]
    }

    /// Weight from neuron `(l, i)` to neuron `(l + 1, j)`.
    pub fn weight(&self, l: usize, i: usize, j: usize) -> Option<f32> {
        let w = self.weights.get(l)?;
        (i < w.in_dim() && j < w.out_dim()).then(|| w.get(i, j))
    }

    /// Values of the output layer from the most recent forward pass.
    pub fn outputs(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.neurons
            .last()
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(Neuron::value)
    }

    /// Mean squared error of the last training step (NaN reported as 1).
    #[inline]
    pub fn loss(&self) -> f32 {
        self.loss
    }

    /// Training steps since the last [`Network::init`].
    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }
}

fn random_parameters<R: Rng + ?Sized>(
    sizes: &[usize],
    rng: &mut R,
) -> (Vec<Vec<Neuron>>, Vec<WeightMatrix>) {
    let neurons = sizes
        .iter()
        .map(|&count| {
            (0..count)
                .map(|_| Neuron::new(rng.gen_range(-BIAS_INIT_RANGE..=BIAS_INIT_RANGE)))
                .collect()
        })
        .collect();
    let weights = sizes
        .windows(2)
        .map(|w| WeightMatrix::random(w[0], w[1], rng))
        .collect();
    (neurons, weights)
}
