//! Tensor primitives shared by the loss variants.

use crate::error::{Error, Result};
use candle_core::Tensor;

/// Number of rows (leading dimension) of a score tensor.
pub(crate) fn batch_len(scores: &Tensor) -> Result<usize> {
    Ok(scores.dim(0)?)
}

/// `log(1 + exp(x))`, element-wise.
///
/// Evaluated as `relu(x) + log(1 + exp(-|x|))` so large scores do not
/// overflow. Note `-log(sigmoid(x)) == softplus(-x)`.
pub(crate) fn softplus(x: &Tensor) -> candle_core::Result<Tensor> {
    let tail = x.abs()?.neg()?.exp()?.affine(1.0, 1.0)?.log()?;
    x.relu()?.add(&tail)
}

/// Reshape `scores_neg` into an `[eta, n]` matrix, one column per positive.
///
/// Negatives are expected in `eta` consecutive blocks of `n` scores, so
/// that row `i` holds the `i`-th corruption of every positive.
pub(crate) fn negatives_matrix(scores_pos: &Tensor, scores_neg: &Tensor, eta: usize) -> Result<Tensor> {
    let n = batch_len(scores_pos)?;
    let count = scores_neg.elem_count();
    let mismatch = |expected: String| -> Result<Tensor> {
        Err(Error::ShapeMismatch {
            pos: n,
            neg: batch_len(scores_neg)?,
            expected,
        })
    };
    match eta.checked_mul(n) {
        Some(total) if total == count => Ok(scores_neg.reshape((eta, n))?),
        Some(total) => mismatch(format!("eta * n = {eta} * {n} = {total} negative scores")),
        None => mismatch(format!("eta * n = {eta} * {n} negative scores, which overflows usize")),
    }
}

/// Sampling weights `softmax(alpha * neg, axis = 0)`: each column sums to 1.
pub(crate) fn adversarial_weights(neg_matrix: &Tensor, alpha: f64) -> candle_core::Result<Tensor> {
    candle_nn::ops::softmax(&neg_matrix.affine(alpha, 0.0)?, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn to_vec(t: &Tensor) -> Vec<f32> {
        t.flatten_all().unwrap().to_vec1::<f32>().unwrap()
    }

    #[test]
    fn test_softplus_matches_naive_form() {
        let xs = [-3.0f32, -0.5, 0.0, 0.5, 3.0];
        let t = Tensor::new(&xs, &Device::Cpu).unwrap();
        let out = to_vec(&softplus(&t).unwrap());
        for (x, y) in xs.iter().zip(out.iter()) {
            let expected = (1.0 + x.exp()).ln();
            assert!((expected - y).abs() < 1e-6, "softplus({x}) = {y}, expected {expected}");
        }
    }

    #[test]
    fn test_softplus_large_input_is_finite() {
        let t = Tensor::new(&[200.0f32, -200.0], &Device::Cpu).unwrap();
        let out = to_vec(&softplus(&t).unwrap());
        assert!((out[0] - 200.0).abs() < 1e-3);
        assert!(out[1].abs() < 1e-6);
    }

    #[test]
    fn test_negatives_matrix_layout() {
        let dev = Device::Cpu;
        let pos = Tensor::new(&[[0.0f32], [0.0]], &dev).unwrap();
        let neg = Tensor::new(&[[1.0f32], [2.0], [3.0], [4.0], [5.0], [6.0]], &dev).unwrap();
        let m = negatives_matrix(&pos, &neg, 3).unwrap();
        assert_eq!(m.dims(), &[3, 2]);
        let rows = m.to_vec2::<f32>().unwrap();
        assert_eq!(rows, vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
    }

    #[test]
    fn test_negatives_matrix_rejects_ragged_counts() {
        let dev = Device::Cpu;
        let pos = Tensor::new(&[0.0f32, 0.0], &dev).unwrap();
        let neg = Tensor::new(&[1.0f32, 2.0, 3.0], &dev).unwrap();
        let err = negatives_matrix(&pos, &neg, 2).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { pos: 2, neg: 3, .. }));
    }

    #[test]
    fn test_negatives_matrix_overflowing_eta() {
        let dev = Device::Cpu;
        let pos = Tensor::new(&[0.0f32, 0.0], &dev).unwrap();
        let neg = Tensor::new(&[0.0f32, 0.0], &dev).unwrap();
        let err = negatives_matrix(&pos, &neg, usize::MAX / 2 + 1).unwrap_err();
        match err {
            Error::ShapeMismatch { pos, neg, expected } => {
                assert_eq!((pos, neg), (2, 2));
                assert!(expected.contains("overflows"), "{expected}");
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_adversarial_weights_columns_sum_to_one() {
        let dev = Device::Cpu;
        let m = Tensor::new(&[[0.1f32, -2.0], [1.5, 0.0], [-0.3, 4.0]], &dev).unwrap();
        let w = adversarial_weights(&m, 0.5).unwrap();
        let sums = w.sum(0).unwrap().to_vec1::<f32>().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-6);
        }
    }
}
