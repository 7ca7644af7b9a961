//! Negative log-likelihood with adversarial weighting of negatives.
//!
//! Negatives come as `eta` corruptions per positive. Each corruption is
//! weighted by `p = softmax(α · f(t⁻))` over the corruptions of its
//! positive, so harder negatives dominate:
//!
//! ```text
//! L = Σ -log σ(f(t⁺)) + Σ p ⊙ -log σ(-f(t⁻))
//! ```

use crate::error::Result;
use crate::loss::{LossFunction, LossVariant};
use crate::ops::{adversarial_weights, negatives_matrix, softplus};
use crate::params::LossParameters;
use crate::registry::ClassParams;
use candle_core::Tensor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NllAdversarialLoss {
    alpha: f64,
    eta: usize,
}

impl NllAdversarialLoss {
    pub fn new(alpha: f64, eta: usize) -> Self {
        Self { alpha, eta }
    }

    /// Sampling temperature.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn eta(&self) -> usize {
        self.eta
    }
}

impl LossFunction for NllAdversarialLoss {
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        let neg = negatives_matrix(scores_pos, scores_neg, self.eta)?;
        let p_neg = adversarial_weights(&neg, self.alpha)?;

        let pos_term = softplus(&scores_pos.flatten_all()?.neg()?)?.sum_all()?;
        let neg_term = p_neg.mul(&softplus(&neg)?)?.sum_all()?;
        Ok(pos_term.add(&neg_term)?)
    }
}

impl LossVariant for NllAdversarialLoss {
    const NAME: &'static str = "nll-adversarial";
    const EXTERNAL_PARAMS: &'static [&'static str] = &["alpha"];
    const CLASS_PARAMS: ClassParams = ClassParams::new(false);
    const DEFAULTS: &'static [(&'static str, f64)] = &[("alpha", 0.5)];

    fn from_params(params: &LossParameters) -> Result<Self> {
        Ok(Self::new(params.require("alpha")?, params.eta()))
    }
}
