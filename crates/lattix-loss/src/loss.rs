//! Loss capability traits and the configured loss instance.

use crate::error::{Error, Result};
use crate::ops::batch_len;
use crate::params::{Hyperparams, LossParameters};
use crate::registry::{ClassParams, LossSpec};
use candle_core::Tensor;
use std::fmt;

/// A score-to-scalar loss formula.
///
/// Implementations are pure: the result depends only on the inputs and on
/// hyperparameters fixed at construction.
pub trait LossFunction: fmt::Debug + Send + Sync {
    /// Compute the loss for positive scores `[n]` / `[n, 1]` and negative
    /// scores. Returns a rank-0 tensor.
    fn compute(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor>;
}

/// A loss type with registry metadata.
///
/// [`LossSpec::of`] turns a variant into a registry entry.
pub trait LossVariant: LossFunction + Sized + 'static {
    /// Registry key.
    const NAME: &'static str;
    /// Hyperparameters the variant reads, in order.
    const EXTERNAL_PARAMS: &'static [&'static str];
    /// Class-level behaviour flags.
    const CLASS_PARAMS: ClassParams;
    /// Defaults for entries of `EXTERNAL_PARAMS`. Entries without a default
    /// are required.
    const DEFAULTS: &'static [(&'static str, f64)];

    /// Build the variant from resolved parameters.
    fn from_params(params: &LossParameters) -> Result<Self>;
}

/// A runtime assertion generated for one `apply` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    /// Positive and negative batches must have the same number of rows.
    SameBatchSize { pos: usize, neg: usize },
}

impl Dependency {
    pub fn check(&self) -> Result<()> {
        match *self {
            Dependency::SameBatchSize { pos, neg } if pos != neg => Err(Error::ShapeMismatch {
                pos,
                neg,
                expected: "equal row counts".to_string(),
            }),
            Dependency::SameBatchSize { .. } => Ok(()),
        }
    }
}

/// A configured loss, ready to be applied inside a training step.
#[derive(Debug)]
pub struct Loss {
    spec: LossSpec,
    parameters: LossParameters,
    function: Box<dyn LossFunction>,
}

impl Loss {
    pub(crate) fn new(spec: &LossSpec, eta: usize, hyperparams: &Hyperparams) -> Result<Self> {
        let parameters = spec.resolve(eta, hyperparams)?;
        let function = (spec.constructor())(&parameters)?;

        tracing::info!(loss = spec.name(), "loss initialized");
        for (name, value) in parameters.iter() {
            tracing::info!(loss = spec.name(), param = name, value, "loss parameter");
        }

        Ok(Self {
            spec: spec.clone(),
            parameters,
            function,
        })
    }

    /// Construct a variant directly, bypassing any registry.
    pub fn from_variant<V: LossVariant>(eta: usize, hyperparams: &Hyperparams) -> Result<Self> {
        Self::new(&LossSpec::of::<V>(), eta, hyperparams)
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }

    pub fn eta(&self) -> usize {
        self.parameters.eta()
    }

    pub fn parameters(&self) -> &LossParameters {
        &self.parameters
    }

    pub fn spec(&self) -> &LossSpec {
        &self.spec
    }

    /// Class-level behaviour flag by name, `None` if the flag is unknown.
    pub fn class_param(&self, name: &str) -> Option<bool> {
        self.spec.class_params().get(name)
    }

    /// Assertions that must hold before the formula result is valid.
    pub fn dependencies(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Vec<Dependency>> {
        let mut dependencies = Vec::new();
        if self.spec.class_params().require_same_size_pos_neg && self.eta() != 1 {
            tracing::debug!(
                loss = self.name(),
                eta = self.eta(),
                "dependency: positive and negative batches must have the same size"
            );
            dependencies.push(Dependency::SameBatchSize {
                pos: batch_len(scores_pos)?,
                neg: batch_len(scores_neg)?,
            });
        }
        Ok(dependencies)
    }

    /// Check input dependencies, then compute the loss.
    pub fn apply(&self, scores_pos: &Tensor, scores_neg: &Tensor) -> Result<Tensor> {
        for dependency in self.dependencies(scores_pos, scores_neg)? {
            dependency.check()?;
        }
        self.function.compute(scores_pos, scores_neg)
    }
}
