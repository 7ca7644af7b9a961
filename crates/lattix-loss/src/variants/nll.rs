//! Negative log-likelihood loss (Trouillon et al. 2016).
//!
//! ```text
//! L = Σ_{t ∈ G ∪ C} log(1 + exp(-y · f(t)))
//! ```
//!
//! with label `y = 1` for positives and `y = -1` for corruptions.

use crate::error::Result;
use crate::loss::{LossFunction, LossVariant};
use crate::ops::softplus;
use crate::params::LossParameters;
use crate::registry::ClassParams;
use candle_core::Tensor;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NllLoss;

impl LossFunction for NllLoss {
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        let pos = scores_pos.flatten_all()?.neg()?;
        let neg = scores_neg.flatten_all()?;
        let signed = Tensor::cat(&[&pos, &neg], 0)?;
        Ok(softplus(&signed)?.sum_all()?)
    }
}

impl LossVariant for NllLoss {
    const NAME: &'static str = "nll";
    const EXTERNAL_PARAMS: &'static [&'static str] = &[];
    const CLASS_PARAMS: ClassParams = ClassParams::new(true);
    const DEFAULTS: &'static [(&'static str, f64)] = &[];

    fn from_params(_params: &LossParameters) -> Result<Self> {
        Ok(Self)
    }
}
