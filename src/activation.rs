//! Activation functions.
//!
//! A neuron computes a pre-activation sum `z = sum(w * x) + b` and stores only the
//! post-activation value `y = activation(z)`. Backprop needs `dy/dz`, which for every
//! supported kind can be written in terms of `y` alone, so no `z` buffer is kept.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
/// Element-wise activation function.
pub enum Activation {
    Sigmoid,
    Tanh,
    ReLU,
    /// Identity. Also the fallback for unrecognized names.
    #[default]
    Linear,
}

impl Activation {
    pub const ALL: [Activation; 4] = [
        Activation::Sigmoid,
        Activation::Tanh,
        Activation::ReLU,
        Activation::Linear,
    ];

    /// Resolve an activation by name. Unknown names resolve to `Linear`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Sigmoid" => Activation::Sigmoid,
            "Tanh" => Activation::Tanh,
            "ReLU" => Activation::ReLU,
            _ => Activation::Linear,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Sigmoid => "Sigmoid",
            Activation::Tanh => "Tanh",
            Activation::ReLU => "ReLU",
            Activation::Linear => "Linear",
        }
    }

    #[inline]
    pub fn forward(self, x: f32) -> f32 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::ReLU => x.max(0.0),
            Activation::Linear => x,
        }
    }

    /// Derivative of the activation with respect to its input, expressed in terms
    /// of the already computed output `y`.
    #[inline]
    pub fn grad_from_output(self, y: f32) -> f32 {
        match self {
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Tanh => 1.0 - y * y,
            Activation::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Linear => 1.0,
        }
    }
}

impl From<String> for Activation {
    fn from(value: String) -> Self {
        Activation::from_name(&value)
    }
}

impl From<Activation> for &'static str {
    fn from(value: Activation) -> Self {
        value.name()
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
