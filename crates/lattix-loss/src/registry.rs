//! Loss registry: name to constructor plus declared metadata.
//!
//! The registry is an ordinary value built once at startup and shared by
//! reference. [`LossRegistry::standard`] holds the built-in losses; custom
//! losses go through [`LossRegistryBuilder`], which rejects duplicate names.
//!
//! ```rust,ignore
//! use lattix_loss::{Hyperparams, LossRegistry};
//!
//! let registry = LossRegistry::standard();
//! let loss = registry.build("pairwise", 10, &Hyperparams::new().with("margin", 0.5))?;
//! let value = loss.apply(&scores_pos, &scores_neg)?;
//! ```

use crate::error::{Error, Result};
use crate::loss::{Loss, LossFunction, LossVariant};
use crate::params::{Hyperparams, LossConfig, LossParameters};
use crate::variants::{AbsoluteMarginLoss, NllAdversarialLoss, NllLoss, PairwiseLoss, SelfAdversarialLoss};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Class-level behaviour flags declared at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassParams {
    /// Positive and negative batches must have equal row counts when
    /// `eta != 1` (default: true).
    pub require_same_size_pos_neg: bool,
}

impl ClassParams {
    pub const fn new(require_same_size_pos_neg: bool) -> Self {
        Self {
            require_same_size_pos_neg,
        }
    }

    /// Flag value by name.
    pub fn get(&self, name: &str) -> Option<bool> {
        match name {
            "require_same_size_pos_neg" => Some(self.require_same_size_pos_neg),
            _ => None,
        }
    }
}

impl Default for ClassParams {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Builds the loss formula from resolved parameters.
pub type Constructor = fn(&LossParameters) -> Result<Box<dyn LossFunction>>;

fn construct_variant<V: LossVariant>(params: &LossParameters) -> Result<Box<dyn LossFunction>> {
    Ok(Box::new(V::from_params(params)?))
}

/// Registry entry.
#[derive(Clone)]
pub struct LossSpec {
    name: String,
    external_params: Vec<String>,
    class_params: ClassParams,
    defaults: BTreeMap<String, f64>,
    constructor: Constructor,
}

impl fmt::Debug for LossSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LossSpec")
            .field("name", &self.name)
            .field("external_params", &self.external_params)
            .field("class_params", &self.class_params)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl LossSpec {
    /// Entry with no defaults: every external parameter is required until
    /// [`LossSpec::with_default`] says otherwise.
    pub fn new<I, S>(name: impl Into<String>, external_params: I, class_params: ClassParams, constructor: Constructor) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            external_params: external_params.into_iter().map(Into::into).collect(),
            class_params,
            defaults: BTreeMap::new(),
            constructor,
        }
    }

    pub fn with_default(mut self, param: impl Into<String>, value: f64) -> Self {
        self.defaults.insert(param.into(), value);
        self
    }

    /// Entry for a [`LossVariant`] type.
    pub fn of<V: LossVariant>() -> Self {
        V::DEFAULTS.iter().fold(
            Self::new(
                V::NAME,
                V::EXTERNAL_PARAMS.iter().copied(),
                V::CLASS_PARAMS,
                construct_variant::<V>,
            ),
            |spec, &(param, value)| spec.with_default(param, value),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn external_params(&self) -> &[String] {
        &self.external_params
    }

    pub fn class_params(&self) -> ClassParams {
        self.class_params
    }

    pub fn default_for(&self, param: &str) -> Option<f64> {
        self.defaults.get(param).copied()
    }

    pub fn constructor(&self) -> Constructor {
        self.constructor
    }

    /// Resolve `hyperparams` against the declared parameters.
    ///
    /// Each external parameter takes the configured value, else its
    /// default; with neither, resolution fails. Unknown keys are ignored.
    pub fn resolve(&self, eta: usize, hyperparams: &Hyperparams) -> Result<LossParameters> {
        if eta == 0 {
            tracing::error!(loss = %self.name, "eta must be at least 1");
            return Err(Error::Configuration(format!(
                "loss `{}`: eta must be at least 1",
                self.name
            )));
        }

        let mut params = LossParameters::new(self.name.clone(), eta);
        for param in &self.external_params {
            let value = match hyperparams.numeric(&self.name, param)? {
                Some(v) => v,
                None => match self.default_for(param) {
                    Some(v) => v,
                    None => {
                        tracing::error!(
                            loss = %self.name,
                            param = %param,
                            "hyperparameter was not passed to the loss function"
                        );
                        return Err(Error::MissingHyperparameter {
                            loss: self.name.clone(),
                            param: param.clone(),
                        });
                    }
                },
            };
            params.set(param.clone(), value);
        }

        for key in hyperparams.keys() {
            if !self.external_params.iter().any(|p| p == key) {
                tracing::debug!(loss = %self.name, key, "ignoring unrecognised hyperparameter");
            }
        }

        Ok(params)
    }

    pub fn construct(&self, eta: usize, hyperparams: &Hyperparams) -> Result<Loss> {
        Loss::new(self, eta, hyperparams)
    }
}

/// Immutable name-to-loss mapping.
#[derive(Debug, Clone)]
pub struct LossRegistry {
    specs: Vec<LossSpec>,
    index: HashMap<String, usize>,
}

impl LossRegistry {
    pub fn builder() -> LossRegistryBuilder {
        LossRegistryBuilder::default()
    }

    /// The built-in losses, in this order: `pairwise`, `nll`,
    /// `nll-adversarial`, `absolute_margin`, `self_adversarial`.
    pub fn standard() -> Self {
        Self::from_unique(standard_specs())
    }

    fn from_unique(specs: Vec<LossSpec>) -> Self {
        let index = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name.clone(), i))
            .collect();
        Self { specs, index }
    }

    pub fn lookup(&self, name: &str) -> Result<&LossSpec> {
        self.index
            .get(name)
            .map(|&i| &self.specs[i])
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "unknown loss `{name}` (registered: {})",
                    self.names().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().map(LossSpec::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LossSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Look up `name` and construct it.
    pub fn build(&self, name: &str, eta: usize, hyperparams: &Hyperparams) -> Result<Loss> {
        self.lookup(name)?.construct(eta, hyperparams)
    }

    pub fn build_from_config(&self, config: &LossConfig) -> Result<Loss> {
        self.build(&config.loss, config.eta, &config.params)
    }
}

impl Default for LossRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_specs() -> Vec<LossSpec> {
    vec![
        LossSpec::of::<PairwiseLoss>(),
        LossSpec::of::<NllLoss>(),
        LossSpec::of::<NllAdversarialLoss>(),
        LossSpec::of::<AbsoluteMarginLoss>(),
        LossSpec::of::<SelfAdversarialLoss>(),
    ]
}

/// Collects entries and checks names for uniqueness.
#[derive(Debug, Default)]
pub struct LossRegistryBuilder {
    specs: Vec<LossSpec>,
}

impl LossRegistryBuilder {
    /// Add the built-in losses.
    pub fn with_standard(mut self) -> Self {
        self.specs.extend(standard_specs());
        self
    }

    pub fn register<V: LossVariant>(self) -> Self {
        self.register_spec(LossSpec::of::<V>())
    }

    pub fn register_spec(mut self, spec: LossSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn build(self) -> Result<LossRegistry> {
        let mut seen = HashSet::new();
        for spec in &self.specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(Error::Configuration(format!(
                    "loss `{}` registered more than once",
                    spec.name
                )));
            }
        }
        Ok(LossRegistry::from_unique(self.specs))
    }
}
