//! Pairwise max-margin loss (Bordes et al. 2013).
//!
//! ```text
//! L = Σ max(0, γ + f(t⁻) - f(t⁺))
//! ```
//!
//! Positive and negative scores are paired by position (broadcast), not
//! as a full cross product.
//!
//! With `eta = 1` no same-size check runs, but the batches must still
//! broadcast: equal lengths, or one side of length 1. Other length pairs
//! (e.g. 3 vs 4) fail with [`Error::Tensor`](crate::Error::Tensor).

use crate::error::Result;
use crate::loss::{LossFunction, LossVariant};
use crate::params::LossParameters;
use crate::registry::ClassParams;
use candle_core::Tensor;

/// Pairwise hinge loss with margin γ.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseLoss {
    margin: f64,
}

impl PairwiseLoss {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}

impl LossFunction for PairwiseLoss {
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        let pos = scores_pos.flatten_all()?;
        let neg = scores_neg.flatten_all()?;
        let hinge = neg.broadcast_sub(&pos)?.affine(1.0, self.margin)?.relu()?;
        Ok(hinge.sum_all()?)
    }
}

impl LossVariant for PairwiseLoss {
    const NAME: &'static str = "pairwise";
    const EXTERNAL_PARAMS: &'static [&'static str] = &["margin"];
    const CLASS_PARAMS: ClassParams = ClassParams::new(true);
    const DEFAULTS: &'static [(&'static str, f64)] = &[("margin", 1.0)];

    fn from_params(params: &LossParameters) -> Result<Self> {
        Ok(Self::new(params.require("margin")?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::test_util::{column, scalar};

    #[test]
    fn test_satisfied_margin_is_zero() {
        let loss = PairwiseLoss::new(1.0);
        let value = loss.compute(&column(&[2.0]), &column(&[0.5])).unwrap();
        assert_eq!(scalar(&value), 0.0);
    }

    #[test]
    fn test_equal_scores_cost_the_margin() {
        let loss = PairwiseLoss::new(1.0);
        let value = loss.compute(&column(&[0.0]), &column(&[0.0])).unwrap();
        assert!((scalar(&value) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sums_aligned_pairs() {
        // pairs: (1.0, 0.5) -> 0.5, (0.0, 1.0) -> 2.0, (3.0, 0.0) -> 0
        let loss = PairwiseLoss::new(1.0);
        let value = loss
            .compute(&column(&[1.0, 0.0, 3.0]), &column(&[0.5, 1.0, 0.0]))
            .unwrap();
        assert!((scalar(&value) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_unbroadcastable_lengths_are_tensor_errors() {
        let loss = PairwiseLoss::new(1.0);
        let err = loss
            .compute(&column(&[0.0, 0.0, 0.0]), &column(&[0.0, 0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Tensor(_)));
    }

    #[test]
    fn test_single_positive_broadcasts() {
        let loss = PairwiseLoss::new(2.0);
        let value = loss.compute(&column(&[1.0]), &column(&[0.0, 1.0, -5.0])).unwrap();
        // 1.0 + 2.0 + 0
        assert!((scalar(&value) - 3.0).abs() < 1e-6);
    }
}
