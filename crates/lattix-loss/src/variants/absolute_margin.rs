//! Absolute margin loss (Hamaguchi et al. 2017).
//!
//! ```text
//! L = Σ max(0, γ + f(t⁻)) - f(t⁺)
//! ```
//!
//! Pairs are aligned by position. With `eta = 1` no same-size check runs,
//! so the batches only need to broadcast: equal lengths, or one side of
//! length 1. Other length pairs fail with
//! [`Error::Tensor`](crate::Error::Tensor).

use crate::error::Result;
use crate::loss::{LossFunction, LossVariant};
use crate::params::LossParameters;
use crate::registry::ClassParams;
use candle_core::Tensor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteMarginLoss {
    margin: f64,
}

impl AbsoluteMarginLoss {
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }
}

impl LossFunction for AbsoluteMarginLoss {
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        let pos = scores_pos.flatten_all()?;
        let neg = scores_neg.flatten_all()?;
        let terms = neg.affine(1.0, self.margin)?.relu()?.broadcast_sub(&pos)?;
        Ok(terms.sum_all()?)
    }
}

impl LossVariant for AbsoluteMarginLoss {
    const NAME: &'static str = "absolute_margin";
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
    fn test_clamped_negative() {
        let loss = AbsoluteMarginLoss::new(1.0);
        let value = loss.compute(&column(&[3.0]), &column(&[-2.0])).unwrap();
        assert!((scalar(&value) + 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_positive_broadcasts() {
        // max(0, 1 + 0.5) - 2.0 + max(0, 1 - 3.0) - 2.0
        let loss = AbsoluteMarginLoss::new(1.0);
        let value = loss.compute(&column(&[2.0]), &column(&[0.5, -3.0])).unwrap();
        assert!((scalar(&value) + 2.5).abs() < 1e-6);

        let err = loss
            .compute(&column(&[0.0, 0.0, 0.0]), &column(&[0.0, 0.0, 0.0, 0.0]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Tensor(_)));
    }

    #[test]
    fn test_active_negative() {
        // max(0, 1 + 0.5) - 0.25 + max(0, 1 - 0.5) - 1.0
        let loss = AbsoluteMarginLoss::new(1.0);
        let value = loss
            .compute(&column(&[0.25, 1.0]), &column(&[0.5, -0.5]))
            .unwrap();
        assert!((scalar(&value) - 0.75).abs() < 1e-6);
    }
}
