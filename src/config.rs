//! Network configuration.
//!
//! Node counts define the topology and can only change through a full re-init.
//! The learning rate and both activation kinds may be swapped between steps.

use serde::{Deserialize, Serialize};

use crate::{Activation, Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    pub learning_rate: f32,
    pub hidden_activation: Activation,
    pub output_activation: Activation,
    pub input_nodes: usize,
    pub hidden_nodes: usize,
    pub output_nodes: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            hidden_activation: Activation::ReLU,
            output_activation: Activation::Sigmoid,
            input_nodes: 3,
            hidden_nodes: 5,
            output_nodes: 2,
        }
    }
}

impl NetworkConfig {
    /// Layer sizes in order: input, hidden, output.
    #[inline]
    pub fn layer_sizes(&self) -> [usize; 3] {
        [self.input_nodes, self.hidden_nodes, self.output_nodes]
    }

    /// Check that node counts are positive and the learning rate is usable.
    ///
    /// The engine never calls this; it is for callers that take configuration from
    /// untrusted places (files, UI fields).
    pub fn validate(&self) -> Result<()> {
        for (name, count) in [
            ("inputNodes", self.input_nodes),
            ("hiddenNodes", self.hidden_nodes),
            ("outputNodes", self.output_nodes),
        ] {
            if count == 0 {
                return Err(Error::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "learningRate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }

    /// Overlay the fields present in `patch`.
    pub fn merged(&self, patch: &ConfigPatch) -> Self {
        Self {
            learning_rate: patch.learning_rate.unwrap_or(self.learning_rate),
            hidden_activation: patch.hidden_activation.unwrap_or(self.hidden_activation),
            output_activation: patch.output_activation.unwrap_or(self.output_activation),
            input_nodes: patch.input_nodes.unwrap_or(self.input_nodes),
            hidden_nodes: patch.hidden_nodes.unwrap_or(self.hidden_nodes),
            output_nodes: patch.output_nodes.unwrap_or(self.output_nodes),
        }
    }
}

/// A partial configuration update. Absent fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_rate: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_activation: Option<Activation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_activation: Option<Activation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_nodes: Option<usize>,
}

impl ConfigPatch {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// True if applying this patch to `current` would change any node count.
    pub fn changes_topology(&self, current: &NetworkConfig) -> bool {
        let next = current.merged(self);
        next.layer_sizes() != current.layer_sizes()
    }
}
