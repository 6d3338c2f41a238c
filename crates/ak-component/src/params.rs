//! Per-component configuration parameters.

use std::collections::BTreeMap;

use ak_core::{Distribution, StochasticsInterface, ValidationError};

use crate::{ModelError, ModelResult};

/// A single parameter value.
///
/// In JSON a parameter is written as a bare literal (`true`, `3`, `0.5`,
/// `"left"`) or as a distribution object with a `"type"` tag.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    Distribution(Distribution),
}

/// Named parameters of one component, in name order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameters {
    values: BTreeMap<String, ParameterValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: ParameterValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ParameterValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ── Typed accessors ───────────────────────────────────────────────────────
    //
    // `Ok(None)` when absent; `Err` when present with the wrong type.

    pub fn bool(&self, component: &str, name: &str) -> ModelResult<Option<bool>> {
        match self.get(name) {
            None                           => Ok(None),
            Some(ParameterValue::Bool(b))  => Ok(Some(*b)),
            Some(_)                        => Err(wrong_type(component, name, "bool")),
        }
    }

    pub fn int(&self, component: &str, name: &str) -> ModelResult<Option<i64>> {
        match self.get(name) {
            None                          => Ok(None),
            Some(ParameterValue::Int(i))  => Ok(Some(*i)),
            Some(_)                       => Err(wrong_type(component, name, "int")),
        }
    }

    /// Integers are accepted and widened.
    pub fn double(&self, component: &str, name: &str) -> ModelResult<Option<f64>> {
        match self.get(name) {
            None                             => Ok(None),
            Some(ParameterValue::Double(d))  => Ok(Some(*d)),
            Some(ParameterValue::Int(i))     => Ok(Some(*i as f64)),
            Some(_)                          => Err(wrong_type(component, name, "number")),
        }
    }

    pub fn text(&self, component: &str, name: &str) -> ModelResult<Option<&str>> {
        match self.get(name) {
            None                           => Ok(None),
            Some(ParameterValue::Text(s))  => Ok(Some(s)),
            Some(_)                        => Err(wrong_type(component, name, "text")),
        }
    }

    /// Like [`double`][Self::double] but missing is an error.
    pub fn require_double(&self, component: &str, name: &str) -> ModelResult<f64> {
        self.double(component, name)?.ok_or_else(|| ModelError::MissingParameter {
            component: component.to_owned(),
            name:      name.to_owned(),
        })
    }

    /// Resolve a numeric parameter that may be a distribution.
    ///
    /// Fixed values are returned as-is; a distribution is sampled once from
    /// `stochastics`.  Returns `Ok(None)` when the parameter is absent or not
    /// numeric.
    pub fn draw(
        &self,
        name:        &str,
        stochastics: &mut dyn StochasticsInterface,
    ) -> Result<Option<f64>, ValidationError> {
        match self.get(name) {
            Some(ParameterValue::Double(d))       => Ok(Some(*d)),
            Some(ParameterValue::Int(i))          => Ok(Some(*i as f64)),
            Some(ParameterValue::Distribution(d)) => stochastics.sample(d).map(Some),
            _                                     => Ok(None),
        }
    }
}

fn wrong_type(component: &str, name: &str, expected: &str) -> ModelError {
    ModelError::InvalidParameter {
        component: component.to_owned(),
        name:      name.to_owned(),
        reason:    format!("must be {expected}"),
    }
}
