//! Training samples and the built-in demo tables.
//!
//! Rows are not required to match the network's layer sizes: the engine pads short
//! vectors with zeros and ignores extra entries.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::metrics::AccuracyKind;
use crate::{Error, NetworkConfig, Result};

/// Uniform noise added to random-source inputs on every step spans `[-JITTER/2, JITTER/2)`.
pub const JITTER: f32 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Vec<f32>,
    pub target: Vec<f32>,
}

impl Sample {
    pub fn new(input: &[f32], target: &[f32]) -> Self {
        Self {
            input: input.to_vec(),
            target: target.to_vec(),
        }
    }

    /// Random inputs in `[0, 1)` and targets rounded to 0 or 1.
    pub fn random<R: Rng + ?Sized>(input_dim: usize, target_dim: usize, rng: &mut R) -> Self {
        let input = (0..input_dim).map(|_| rng.r#gen::<f32>()).collect();
        let target = (0..target_dim).map(|_| rng.r#gen::<f32>().round()).collect();
        Self { input, target }
    }
}

/// Perturb `input` by uniform noise and clamp every entry to `[0, 1]`.
pub fn jitter<R: Rng + ?Sized>(input: &[f32], rng: &mut R) -> Vec<f32> {
    input
        .iter()
        .map(|&v| (v + (rng.r#gen::<f32>() - 0.5) * JITTER).clamp(0.0, 1.0))
        .collect()
}

/// A non-empty list of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<Sample>,
}

impl Dataset {
    pub fn from_samples(samples: Vec<Sample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::InvalidData("dataset must not be empty".to_owned()));
        }
        Ok(Self { samples })
    }

    /// Build a dataset from per-sample rows.
    pub fn from_rows(inputs: &[Vec<f32>], targets: &[Vec<f32>]) -> Result<Self> {
        if inputs.len() != targets.len() {
            return Err(Error::InvalidData(format!(
                "inputs/targets length mismatch: {} vs {}",
                inputs.len(),
                targets.len()
            )));
        }
        let samples = inputs
            .iter()
            .zip(targets)
            .map(|(x, y)| Sample::new(x, y))
            .collect();
        Self::from_samples(samples)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Panics if `idx >= len`.
    #[inline]
    pub fn sample(&self, idx: usize) -> &Sample {
        &self.samples[idx]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    /// A uniformly chosen sample.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Sample {
        &self.samples[rng.gen_range(0..self.samples.len())]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Fixed tables shipped with the demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    And,
    Or,
    Xor,
    /// Colour classification: a noisy RGB triple maps to its dominant channel.
    Rgb,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::And, Preset::Or, Preset::Xor, Preset::Rgb];

    pub fn name(self) -> &'static str {
        match self {
            Preset::And => "AND",
            Preset::Or => "OR",
            Preset::Xor => "XOR",
            Preset::Rgb => "RGB",
        }
    }

    /// `(input_nodes, output_nodes)` this table needs.
    pub fn topology(self) -> (usize, usize) {
        match self {
            Preset::And | Preset::Or | Preset::Xor => (2, 1),
            Preset::Rgb => (3, 3),
        }
    }

    /// `config` with input/output node counts forced to fit this table.
    pub fn configure(self, config: NetworkConfig) -> NetworkConfig {
        let (input_nodes, output_nodes) = self.topology();
        NetworkConfig {
            input_nodes,
            output_nodes,
            ..config
        }
    }

    pub fn accuracy_kind(self) -> AccuracyKind {
        match self {
            Preset::And | Preset::Or | Preset::Xor => AccuracyKind::Binary,
            Preset::Rgb => AccuracyKind::ArgMax,
        }
    }

    pub fn rows(self) -> Vec<Sample> {
        let logic = |outs: [f32; 4]| {
            vec![
                Sample::new(&[0.0, 0.0], &[outs[0]]),
                Sample::new(&[0.0, 1.0], &[outs[1]]),
                Sample::new(&[1.0, 0.0], &[outs[2]]),
                Sample::new(&[1.0, 1.0], &[outs[3]]),
            ]
        };
        match self {
            Preset::And => logic([0.0, 0.0, 0.0, 1.0]),
            Preset::Or => logic([0.0, 1.0, 1.0, 1.0]),
            Preset::Xor => logic([0.0, 1.0, 1.0, 0.0]),
            Preset::Rgb => vec![
                Sample::new(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]),
                Sample::new(&[0.0, 1.0, 0.0], &[0.0, 1.0, 0.0]),
                Sample::new(&[0.0, 0.0, 1.0], &[0.0, 0.0, 1.0]),
                Sample::new(&[0.9, 0.1, 0.1], &[1.0, 0.0, 0.0]),
                Sample::new(&[0.1, 0.8, 0.1], &[0.0, 1.0, 0.0]),
                Sample::new(&[0.2, 0.2, 0.9], &[0.0, 0.0, 1.0]),
                Sample::new(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]),
                Sample::new(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]),
            ],
        }
    }

    pub fn dataset(self) -> Dataset {
        Dataset {
            samples: self.rows(),
        }
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown preset {s:?}")))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
