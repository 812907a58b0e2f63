/// Per-neuron state.
///
/// `delta` is transient: it is only meaningful right after a training step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neuron {
    pub(crate) value: f32,
    pub(crate) delta: f32,
    pub(crate) bias: f32,
}

impl Neuron {
    #[inline]
    pub fn new(bias: f32) -> Self {
        Self {
            value: 0.0,
            delta: 0.0,
            bias,
        }
    }

    /// Activation from the most recent forward pass.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Error term from the most recent training step.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn bias(&self) -> f32 {
        self.bias
    }
}
