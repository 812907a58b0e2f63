use rand::Rng;

use crate::{Error, Result};

/// Weights between two adjacent layers.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    in_dim: usize,
    out_dim: usize,
    /// Row-major matrix with shape (in_dim, out_dim): `weights[i * out_dim + j]`
    /// connects source neuron `i` to destination neuron `j`.
    weights: Vec<f32>,
}

impl WeightMatrix {
    /// Half-width of the uniform range used for fresh weights.
    pub const INIT_RANGE: f32 = 0.5;

    pub fn zeros(in_dim: usize, out_dim: usize) -> Self {
        Self {
            in_dim,
            out_dim,
            weights: vec![0.0; in_dim * out_dim],
        }
    }

    /// Weights drawn uniformly from `[-0.5, 0.5]`.
    pub fn random<R: Rng + ?Sized>(in_dim: usize, out_dim: usize, rng: &mut R) -> Self {
        let weights = (0..in_dim * out_dim)
            .map(|_| rng.gen_range(-Self::INIT_RANGE..=Self::INIT_RANGE))
            .collect();
        Self {
            in_dim,
            out_dim,
            weights,
        }
    }

    /// Build from a flat row-major buffer with shape `(in_dim, out_dim)`.
    pub fn from_flat(in_dim: usize, out_dim: usize, weights: Vec<f32>) -> Result<Self> {
        let expected = in_dim
            .checked_mul(out_dim)
            .ok_or_else(|| Error::InvalidShape("weight shape overflow".to_owned()))?;
        if weights.len() != expected {
            return Err(Error::InvalidShape(format!(
                "weights length {} does not match in_dim * out_dim ({in_dim} * {out_dim})",
                weights.len()
            )));
        }
        Ok(Self {
            in_dim,
            out_dim,
            weights,
        })
    }

    /// Build from one row per source neuron.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let in_dim = rows.len();
        let out_dim = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut weights = Vec::with_capacity(in_dim * out_dim);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != out_dim {
                return Err(Error::InvalidShape(format!(
                    "weight row {i} has len {}, expected {out_dim}",
                    row.len()
                )));
            }
            weights.extend_from_slice(row);
        }
        Ok(Self {
            in_dim,
            out_dim,
            weights,
        })
    }

    #[inline]
    pub fn in_dim(&self) -> usize {
        self.in_dim
    }

    #[inline]
    pub fn out_dim(&self) -> usize {
        self.out_dim
    }

    /// Weight from source `i` to destination `j`.
    ///
    /// Indices are only checked in debug builds; use [`crate::Network::weight`] for
    /// a checked lookup.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        debug_assert!(
            i < self.in_dim && j < self.out_dim,
            "weight index ({i}, {j}) out of range for ({}, {})",
            self.in_dim,
            self.out_dim
        );
        self.weights[i * self.out_dim + j]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, i: usize, j: usize) -> &mut f32 {
        debug_assert!(i < self.in_dim && j < self.out_dim);
        &mut self.weights[i * self.out_dim + j]
    }

    /// All weights leaving source neuron `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.out_dim;
        &self.weights[start..start + self.out_dim]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.weights
    }
}
