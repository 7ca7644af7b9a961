//! Self-adversarial negative sampling loss (Sun et al. 2019, RotatE).
//!
//! ```text
//! L = Σ -log σ(γ + f(t⁺)) - Σ p ⊙ log σ(-f(t⁻) - γ)
//! ```
//!
//! where γ is the margin and `p = softmax(α · f(t⁻))` over the `eta`
//! corruptions of each positive.

use crate::error::Result;
use crate::loss::{LossFunction, LossVariant};
use crate::ops::{adversarial_weights, negatives_matrix, softplus};
use crate::params::LossParameters;
use crate::registry::ClassParams;
use candle_core::Tensor;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfAdversarialLoss {
    margin: f64,
    alpha: f64,
    eta: usize,
}

impl SelfAdversarialLoss {
    pub fn new(margin: f64, alpha: f64, eta: usize) -> Self {
        Self { margin, alpha, eta }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn eta(&self) -> usize {
        self.eta
    }
}

impl LossFunction for SelfAdversarialLoss {
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        let neg = negatives_matrix(scores_pos, scores_neg, self.eta)?;
        let p_neg = adversarial_weights(&neg, self.alpha)?;

        // -log σ(γ + s) = softplus(-(γ + s))
        let pos = scores_pos.flatten_all()?.affine(-1.0, -self.margin)?;
        let pos_term = softplus(&pos)?.sum_all()?;
        // -log σ(-s - γ) = softplus(s + γ)
        let neg_term = p_neg.mul(&softplus(&neg.affine(1.0, self.margin)?)?)?.sum_all()?;
        Ok(pos_term.add(&neg_term)?)
    }
}

impl LossVariant for SelfAdversarialLoss {
    const NAME: &'static str = "self_adversarial";
    const EXTERNAL_PARAMS: &'static [&'static str] = &["margin", "alpha"];
    const CLASS_PARAMS: ClassParams = ClassParams::new(false);
    const DEFAULTS: &'static [(&'static str, f64)] = &[("margin", 3.0), ("alpha", 0.5)];

    fn from_params(params: &LossParameters) -> Result<Self> {
        Ok(Self::new(
            params.require("margin")?,
            params.require("alpha")?,
            params.eta(),
        ))
    }
}
