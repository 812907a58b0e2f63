//! A tiny feed-forward network trained online, built to be watched.
//!
//! `mlp-live` keeps a three-layer network (input, one hidden, output) whose entire
//! numeric state is plain data: per-neuron values, deltas and biases, per-edge
//! weights, the last loss and an iteration counter. A front end drives it one sample
//! at a time and redraws from that state after every call.
//!
//! # Design goals
//!
//! - Never fail mid-loop: `init`, `forward` and `train_step` have no error path.
//!   Short input/target vectors are padded with zeros, NaN deltas are skipped during
//!   backprop and a NaN loss is reported as `1`.
//! - Plain SGD on a single sample per step; no batching and no optimizer state.
//! - Multiple independent engines: every `Network` owns its own state and RNG.
//!
//! # Panics vs `Result`
//!
//! - Engine hot path ([`Network::forward`], [`Network::train_step`]): infallible.
//! - Indexed readers ([`Network::layer`], [`Network::weights`]) panic on
//!   out-of-range layers; [`Network::neuron`] and [`Network::weight`] return `Option`.
//! - Configuration parsing, validation and explicit construction
//!   ([`ConfigPatch::from_json_str`], [`NetworkConfig::validate`],
//!   [`Network::from_parts`]) return [`Result`].
//!
//! # Quick start
//!
//! ```rust
//! use mlp_live::{Activation, Network, NetworkConfig};
//!
//! let mut net = Network::with_seed(
//!     NetworkConfig {
//!         learning_rate: 0.5,
//!         hidden_activation: Activation::ReLU,
//!         output_activation: Activation::Sigmoid,
//!         input_nodes: 2,
//!         hidden_nodes: 4,
//!         output_nodes: 1,
//!     },
//!     0,
//! );
//!
//! let table: [([f32; 2], f32); 4] =
//!     [([0.0, 0.0], 0.0), ([0.0, 1.0], 0.0), ([1.0, 0.0], 0.0), ([1.0, 1.0], 1.0)];
//! for step in 0..200 {
//!     let (x, y) = table[step % 4];
//!     net.train_step(&x, &[y]);
//! }
//!
//! assert_eq!(net.iteration(), 200);
//! assert!(net.loss() >= 0.0);
//! let _out: Vec<f32> = net.outputs().collect();
//! ```
//!
//! # Driving a session
//!
//! ```rust
//! use mlp_live::{NetworkConfig, Preset, Session, Source, StopCriteria};
//!
//! # fn main() -> mlp_live::Result<()> {
//! let mut session = Session::with_seed(
//!     NetworkConfig::default(),
//!     Source::Preset(Preset::Or),
//!     StopCriteria { max_epochs: 500, target_loss: 0.001 },
//!     42,
//! )?;
//! session.run_until_stopped(10_000);
//! let _acc = session.accuracy();
//! let _json = session.network().snapshot().to_json_string()?;
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod neuron;
pub mod session;
pub mod snapshot;

pub use activation::Activation;
pub use config::{ConfigPatch, NetworkConfig};
pub use data::{Dataset, Preset, Sample};
pub use error::{Error, Result};
pub use layer::WeightMatrix;
pub use metrics::{AccuracyKind, LossHistory};
pub use network::{Applied, Network, StepStats};
pub use neuron::Neuron;
pub use session::{Session, Source, StepOutcome, StopCriteria, StopReason};
pub use snapshot::NetworkSnapshot;
