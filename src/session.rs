//! Interactive training loop.
//!
//! A `Session` is the control side of the demo: it owns a [`Network`], decides which
//! sample each step trains on, and pauses itself once a stopping criterion is met.
//! A renderer typically calls [`Session::step`] while running and
//! [`Session::refresh`] once per frame.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::data::{Dataset, Sample, jitter};
use crate::metrics::{self, AccuracyKind, LossHistory};
use crate::network::StepStats;
use crate::{ConfigPatch, Network, NetworkConfig, Preset, Result};

/// Where training samples come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A fixed table; each step picks a uniformly random row.
    Preset(Preset),
    /// One random input/target pair, re-jittered on every step.
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCriteria {
    pub max_epochs: u64,
    pub target_loss: f32,
}

impl Default for StopCriteria {
    fn default() -> Self {
        Self {
            max_epochs: 5000,
            target_loss: 0.001,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxEpochs,
    TargetLoss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub stats: StepStats,
    /// Set when this step paused a running session.
    pub stopped: Option<StopReason>,
}

#[derive(Debug, Clone)]
pub struct Session {
    net: Network,
    source: Source,
    criteria: StopCriteria,
    running: bool,
    /// Table for `Source::Preset`, built once per source change.
    data: Option<Dataset>,
    current: Sample,
    history: LossHistory,
    rng: StdRng,
}

impl Session {
    pub fn new(config: NetworkConfig, source: Source, criteria: StopCriteria) -> Result<Self> {
        Self::with_rng(config, source, criteria, StdRng::from_entropy())
    }

    /// Deterministic session: both the network init and sample selection are seeded.
    pub fn with_seed(
        config: NetworkConfig,
        source: Source,
        criteria: StopCriteria,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(config, source, criteria, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: NetworkConfig,
        source: Source,
        criteria: StopCriteria,
        mut rng: StdRng,
    ) -> Result<Self> {
        let config = fit_to_source(config, source);
        config.validate()?;
        let net_seed: u64 = rng.r#gen();
        let mut session = Self {
            net: Network::with_seed(config, net_seed),
            source,
            criteria,
            running: false,
            data: dataset_for(source),
            current: Sample::new(&[], &[]),
            history: LossHistory::default(),
            rng,
        };
        session.pick_initial_sample();
        Ok(session)
    }

    /// Validate `config`, rebuild the network, pick a fresh sample and pause.
    pub fn reset(&mut self, config: NetworkConfig) -> Result<()> {
        let config = fit_to_source(config, self.source);
        config.validate()?;
        self.running = false;
        self.net.init(config);
        self.history.clear();
        self.pick_initial_sample();
        info!(
            sizes = ?self.net.layer_sizes(),
            source = ?self.source,
            "session reset"
        );
        Ok(())
    }

    /// Switch the data source. Presets force their input/output node counts.
    pub fn set_source(&mut self, source: Source) -> Result<()> {
        self.source = source;
        self.data = dataset_for(source);
        self.reset(*self.net.config())
    }

    /// Merge a configuration patch. Topology changes reset the session; other
    /// changes apply live.
    pub fn apply(&mut self, patch: &ConfigPatch) -> Result<()> {
        let next = fit_to_source(self.net.config().merged(patch), self.source);
        next.validate()?;
        if next.layer_sizes() != self.net.config().layer_sizes() {
            self.reset(next)
        } else {
            self.net.set_learning_rate(next.learning_rate);
            self.net.set_activations(next.hidden_activation, next.output_activation);
            debug!(?next, "config applied live");
            Ok(())
        }
    }

    pub fn set_criteria(&mut self, criteria: StopCriteria) {
        self.criteria = criteria;
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            info!(iteration = self.net.iteration(), "training started");
        }
    }

    pub fn pause(&mut self) {
        if self.running {
            self.running = false;
            info!(iteration = self.net.iteration(), "training paused");
        }
    }

    pub fn toggle(&mut self) {
        if self.running {
            self.pause();
        } else {
            self.start();
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Train on one sample. Works whether or not the session is running; stopping
    /// criteria are only checked while running.
    pub fn step(&mut self) -> StepOutcome {
        let stats = match &self.data {
            Some(data) => {
                self.current.clone_from(data.choose(&mut self.rng));
                self.net.train_step(&self.current.input, &self.current.target)
            }
            None => {
                let noisy = jitter(&self.current.input, &mut self.rng);
                self.net.train_step(&noisy, &self.current.target)
            }
        };
        self.history.record(self.net.iteration(), self.net.loss());

        let stopped = if self.running {
            self.stop_reason()
        } else {
            None
        };
        if let Some(reason) = stopped {
            self.running = false;
            info!(
                iteration = self.net.iteration(),
                loss = self.net.loss(),
                ?reason,
                "training stopped"
            );
        }

        StepOutcome { stats, stopped }
    }

    fn stop_reason(&self) -> Option<StopReason> {
        if self.net.iteration() >= self.criteria.max_epochs {
            Some(StopReason::MaxEpochs)
        } else if self.net.loss() < self.criteria.target_loss {
            Some(StopReason::TargetLoss)
        } else {
            None
        }
    }

    /// Start and step until a stopping criterion fires or `limit` steps have run.
    pub fn run_until_stopped(&mut self, limit: u64) -> Option<StopReason> {
        self.start();
        for _ in 0..limit {
            if let Some(reason) = self.step().stopped {
                return Some(reason);
            }
        }
        None
    }

    /// Accuracy in percent for the current source.
    ///
    /// Presets are scored over their whole table; the random source compares the
    /// first output against the first target of the current sample (100 or 0).
    /// Afterwards the network is forwarded on the current sample again.
    pub fn accuracy(&mut self) -> f32 {
        let acc = match (self.source, &self.data) {
            (Source::Preset(preset), Some(data)) => {
                metrics::accuracy(&mut self.net, data, preset.accuracy_kind())
            }
            _ => {
                self.refresh();
                if self.current.target.is_empty() {
                    0.0
                } else {
                    let output: Vec<f32> = self.net.outputs().collect();
                    if AccuracyKind::Binary.is_correct(&output, &self.current.target) {
                        100.0
                    } else {
                        0.0
                    }
                }
            }
        };
        self.refresh();
        acc
    }

    /// Forward the current sample so neuron values match what is displayed.
    pub fn refresh(&mut self) {
        self.net.forward(&self.current.input);
    }

    #[inline]
    pub fn network(&self) -> &Network {
        &self.net
    }

    #[inline]
    pub fn source(&self) -> Source {
        self.source
    }

    #[inline]
    pub fn criteria(&self) -> StopCriteria {
        self.criteria
    }

    /// Sample currently shown (the last preset row trained on, or the random pair).
    #[inline]
    pub fn current_sample(&self) -> &Sample {
        &self.current
    }

    /// Evaluation table of the current preset, `None` for the random source.
    #[inline]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.data.as_ref()
    }

    #[inline]
    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    fn pick_initial_sample(&mut self) {
        self.current = match &self.data {
            Some(data) => data.sample(0).clone(),
            None => {
                let [input_dim, _, output_dim] = self.net.config().layer_sizes();
                Sample::random(input_dim, output_dim, &mut self.rng)
            }
        };
    }
}

fn dataset_for(source: Source) -> Option<Dataset> {
    match source {
        Source::Preset(preset) => Some(preset.dataset()),
        Source::Random => None,
    }
}

fn fit_to_source(config: NetworkConfig, source: Source) -> NetworkConfig {
    match source {
        Source::Preset(preset) => preset.configure(config),
        Source::Random => config,
    }
}
