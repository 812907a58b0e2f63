//! Loss helpers.
//!
//! Targets are read laxly: a missing entry counts as `0`, extra entries are ignored.
//! This mirrors how the engine reads input vectors.

/// Target value at `i`, or `0` when the target vector is too short.
#[inline]
pub fn target_at(target: &[f32], i: usize) -> f32 {
    target.get(i).copied().unwrap_or(0.0)
}

/// Mean squared error over `pred`: `sum((target - pred)^2) / pred.len()`.
///
/// NaN propagates, and an empty prediction gives NaN just like the engine's raw loss.
#[inline]
pub fn mse(pred: &[f32], target: &[f32]) -> f32 {
    let sum_sq: f32 = pred
        .iter()
        .enumerate()
        .map(|(i, &y)| {
            let err = target_at(target, i) - y;
            err * err
        })
        .sum();
    sum_sq / pred.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_is_zero() {
        assert_eq!(mse(&[0.25, 1.0], &[0.25, 1.0]), 0.0);
    }

    #[test]
    fn plain_mean_without_half_factor() {
        // errors 1 and 3 -> (1 + 9) / 2
        assert!((mse(&[0.0, 0.0], &[1.0, 3.0]) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn short_target_pads_with_zero() {
        assert!((mse(&[1.0, 2.0], &[1.0]) - 2.0).abs() < 1e-6);
        assert!((mse(&[1.0], &[1.0, 99.0]) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn empty_prediction_is_nan() {
        assert!(mse(&[], &[1.0]).is_nan());
    }

    #[test]
    fn nan_propagates() {
        assert!(mse(&[f32::NAN], &[0.0]).is_nan());
    }
}
