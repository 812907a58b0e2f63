//! Metrics.
//!
//! Metrics are evaluation helpers; they never touch weights. Evaluating does run
//! ordinary forward passes, so neuron values afterwards reflect the last sample
//! evaluated.

use std::collections::VecDeque;

use crate::loss::{self, target_at};
use crate::{Dataset, Network};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a single prediction is judged correct.
pub enum AccuracyKind {
    /// `|output[0] - target[0]| < 0.5`.
    Binary,
    /// Index of the largest output equals index of the largest target.
    ArgMax,
}

impl AccuracyKind {
    pub fn is_correct(self, output: &[f32], target: &[f32]) -> bool {
        match self {
            AccuracyKind::Binary => output
                .first()
                .is_some_and(|&y| (y - target_at(target, 0)).abs() < 0.5),
            AccuracyKind::ArgMax => match (argmax(output), argmax(target)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Index of the first maximum, or `None` for empty input or any NaN.
fn argmax(xs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &x) in xs.iter().enumerate() {
        if x.is_nan() {
            return None;
        }
        match best {
            Some((_, b)) if x <= b => {}
            _ => best = Some((i, x)),
        }
    }
    best.map(|(i, _)| i)
}

/// Percentage of samples in `data` judged correct, in `[0, 100]`.
pub fn accuracy(net: &mut Network, data: &Dataset, kind: AccuracyKind) -> f32 {
    let mut output = Vec::with_capacity(net.layer_sizes().last().copied().unwrap_or(0));
    let mut correct = 0usize;
    for sample in data {
        net.forward(&sample.input);
        output.clear();
        output.extend(net.outputs());
        if kind.is_correct(&output, &sample.target) {
            correct += 1;
        }
    }
    100.0 * correct as f32 / data.len() as f32
}

/// Mean of the per-sample output MSE over `data`.
pub fn mean_loss(net: &mut Network, data: &Dataset) -> f32 {
    let mut output = Vec::new();
    let mut total = 0.0_f32;
    for sample in data {
        net.forward(&sample.input);
        output.clear();
        output.extend(net.outputs());
        total += loss::mse(&output, &sample.target);
    }
    total / data.len() as f32
}

/// Rolling loss series for a chart: one point every `every` iterations, at most
/// `capacity` points.
#[derive(Debug, Clone)]
pub struct LossHistory {
    every: u64,
    capacity: usize,
    points: VecDeque<(u64, f32)>,
}

impl Default for LossHistory {
    fn default() -> Self {
        Self::new(5, 50)
    }
}

impl LossHistory {
    pub fn new(every: u64, capacity: usize) -> Self {
        Self {
            every: every.max(1),
            capacity,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Record `loss` if `iteration` falls on the sampling interval.
    pub fn record(&mut self, iteration: u64, loss: f32) -> bool {
        if iteration % self.every != 0 || self.capacity == 0 {
            return false;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back((iteration, loss));
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = (u64, f32)> + '_ {
        self.points.iter().copied()
    }

    /// Upper bound for the chart's y axis: the largest recorded loss (NaN treated as
    /// 1), but never below twice the target loss.
    pub fn y_max(&self, target_loss: f32) -> f32 {
        let max = self
            .points
            .iter()
            .map(|&(_, l)| if l.is_nan() { 1.0 } else { l })
            .fold(f32::NEG_INFINITY, f32::max);
        max.max(target_loss * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NetworkConfig, WeightMatrix};

    #[test]
    fn binary_threshold() {
        assert!(AccuracyKind::Binary.is_correct(&[0.49], &[0.0]));
        assert!(!AccuracyKind::Binary.is_correct(&[0.5], &[0.0]));
        assert!(AccuracyKind::Binary.is_correct(&[0.7, 0.0], &[1.0, 1.0]));
        assert!(!AccuracyKind::Binary.is_correct(&[], &[1.0]));
        assert!(!AccuracyKind::Binary.is_correct(&[f32::NAN], &[1.0]));
    }

    #[test]
    fn argmax_first_max_wins() {
        assert!(AccuracyKind::ArgMax.is_correct(&[0.1, 0.8, 0.3], &[0.0, 1.0, 0.0]));
        assert!(!AccuracyKind::ArgMax.is_correct(&[0.9, 0.8, 0.3], &[0.0, 1.0, 0.0]));
        // all-zero target: index 0
        assert!(AccuracyKind::ArgMax.is_correct(&[0.5, 0.5, 0.5], &[0.0, 0.0, 0.0]));
        assert!(!AccuracyKind::ArgMax.is_correct(&[f32::NAN, 0.1, 0.0], &[1.0, 0.0, 0.0]));
    }

    #[test]
    fn accuracy_over_a_fixed_network() {
        // 2 -> 1 -> 1 identity network computing x0 (weights pick input 0 only).
        let config = NetworkConfig {
            hidden_activation: crate::Activation::Linear,
            output_activation: crate::Activation::Linear,
            input_nodes: 2,
            hidden_nodes: 1,
            output_nodes: 1,
            ..NetworkConfig::default()
        };
        let mut net = Network::from_parts(
            config,
            vec![vec![0.0, 0.0], vec![0.0], vec![0.0]],
            vec![
                WeightMatrix::from_rows(&[vec![1.0], vec![0.0]]).unwrap(),
                WeightMatrix::from_rows(&[vec![1.0]]).unwrap(),
            ],
        )
        .unwrap();

        // Output equals x0: right on AND rows 0, 1, 3; wrong on (1, 0).
        let data = crate::Preset::And.dataset();
        assert_eq!(accuracy(&mut net, &data, AccuracyKind::Binary), 75.0);

        // errors: 0, 0, 1, 0
        assert!((mean_loss(&mut net, &data) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn empty_output_layer_matches_engine_raw_loss() {
        let config = NetworkConfig {
            input_nodes: 2,
            hidden_nodes: 2,
            output_nodes: 0,
            ..NetworkConfig::default()
        };
        let mut net = Network::with_seed(config, 3);
        let data = crate::Preset::And.dataset();

        assert!(mean_loss(&mut net, &data).is_nan());
        let stats = net.train_step(&[1.0, 1.0], &[1.0]);
        assert!(stats.raw_loss.is_nan());
        assert_eq!(stats.loss, 1.0);
    }

    #[test]
    fn loss_history_samples_and_rolls() {
        let mut h = LossHistory::new(5, 3);
        for it in 1..=20 {
            h.record(it, it as f32);
        }
        let pts: Vec<_> = h.points().collect();
        assert_eq!(pts, vec![(10, 10.0), (15, 15.0), (20, 20.0)]);
        assert_eq!(h.y_max(0.001), 20.0);
        assert_eq!(h.y_max(50.0), 100.0);

        h.clear();
        assert_eq!(h.points().len(), 0);
    }
}
