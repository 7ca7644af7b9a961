//! Hyperparameter configuration.
//!
//! Three layers, from raw to frozen:
//!
//! - [`Hyperparams`]: whatever the configuration loader handed over. Keys the
//!   loss does not recognise are ignored.
//! - [`LossParameters`]: the resolved set for one loss instance, `eta`
//!   included. Fixed after construction.
//! - [`LossConfig`]: a serializable record naming the loss, `eta` and its
//!   raw hyperparameters.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Raw hyperparameter mapping, name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hyperparams(BTreeMap<String, Value>);

impl Hyperparams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse from a JSON object such as `{"margin": 2.0}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Numeric value of `name`, if present.
    ///
    /// Integers and floats are accepted; anything else, or a non-finite
    /// number, is an [`Error::InvalidHyperparameter`].
    pub fn numeric(&self, loss: &str, name: &str) -> Result<Option<f64>> {
        let Some(value) = self.0.get(name) else {
            return Ok(None);
        };
        match value.as_f64() {
            Some(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(Error::InvalidHyperparameter {
                loss: loss.to_string(),
                param: name.to_string(),
                reason: format!("expected a finite number, got {value}"),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Hyperparams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Resolved hyperparameters of one loss instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LossParameters {
    loss: String,
    eta: usize,
    values: BTreeMap<String, f64>,
}

impl LossParameters {
    pub(crate) fn new(loss: impl Into<String>, eta: usize) -> Self {
        Self {
            loss: loss.into(),
            eta,
            values: BTreeMap::new(),
        }
    }

    pub(crate) fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Number of negatives generated per positive.
    pub fn eta(&self) -> usize {
        self.eta
    }

    /// Value of `name`; `"eta"` resolves to [`LossParameters::eta`].
    pub fn get(&self, name: &str) -> Option<f64> {
        if name == "eta" {
            return Some(self.eta as f64);
        }
        self.values.get(name).copied()
    }

    /// Like [`LossParameters::get`], but absence is an error.
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name).ok_or_else(|| Error::MissingHyperparameter {
            loss: self.loss.clone(),
            param: name.to_string(),
        })
    }

    /// All parameters, `eta` first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        std::iter::once(("eta", self.eta as f64))
            .chain(self.values.iter().map(|(k, v)| (k.as_str(), *v)))
    }

    /// Number of parameters, `eta` included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.values.len() + 1
    }
}

/// Loss selection as it appears in a model configuration.
///
/// ```json
/// { "loss": "self_adversarial", "eta": 10, "params": { "margin": 3, "alpha": 0.5 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossConfig {
    /// Registered loss name.
    pub loss: String,
    /// Negatives per positive.
    pub eta: usize,
    /// Loss hyperparameters (default: empty).
    #[serde(default)]
    pub params: Hyperparams,
}

impl LossConfig {
    pub fn new(loss: impl Into<String>, eta: usize) -> Self {
        Self {
            loss: loss.into(),
            eta,
            params: Hyperparams::default(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(name, value);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
