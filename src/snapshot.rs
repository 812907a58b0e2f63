//! Read-only, serializable view of a [`Network`] for renderers.
//!
//! Internal structs are not serialized directly; this view is flattened into plain
//! numbers so a front end can draw neurons and edges without knowing engine types.
//! There is no way to load a snapshot back into a network.

use serde::Serialize;

use crate::{Network, NetworkConfig, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    pub config: NetworkConfig,
    pub layers: Vec<usize>,
    pub neurons: Vec<Vec<NeuronView>>,
    pub weights: Vec<WeightView>,
    pub loss: f32,
    pub iteration: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NeuronView {
    pub value: f32,
    pub bias: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightView {
    pub in_dim: usize,
    pub out_dim: usize,
    /// Row-major (in_dim, out_dim).
    pub weights: Vec<f32>,
}

impl From<&Network> for NetworkSnapshot {
    fn from(net: &Network) -> Self {
        let layers = net.layer_sizes().to_vec();
        let neurons = (0..net.num_layers())
            .map(|l| {
                net.layer(l)
                    .iter()
                    .map(|n| NeuronView {
                        value: n.value(),
                        bias: n.bias(),
                    })
                    .collect()
            })
            .collect();
        let weights = (0..net.num_layers().saturating_sub(1))
            .map(|l| {
                let w = net.weights(l);
                WeightView {
                    in_dim: w.in_dim(),
                    out_dim: w.out_dim(),
                    weights: w.as_slice().to_vec(),
                }
            })
            .collect();

        Self {
            config: *net.config(),
            layers,
            neurons,
            weights,
            loss: net.loss(),
            iteration: net.iteration(),
        }
    }
}

impl NetworkSnapshot {
    /// Serialize to compact JSON. Non-finite values are written as `null`.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Network {
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot::from(self)
    }
}
