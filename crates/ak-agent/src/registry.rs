//! Model name → factory lookup.

use std::collections::BTreeMap;

use ak_component::{ComponentModel, EcuComponent, ModelInit, ModelResult, NoopComponent};
use ak_schedule::{ConfigurationError, ScheduleResult};

/// Builds one component model from its configuration.
pub type ModelFactory =
    Box<dyn Fn(&ModelInit<'_>) -> ModelResult<Box<dyn ComponentModel>> + Send + Sync>;

/// The set of component models a configuration may name.
///
/// [`ComponentRegistry::default`] carries the built-ins:
///
/// | Name   | Model                                   |
/// |--------|-----------------------------------------|
/// | `noop` | [`NoopComponent`]                       |
/// | `ecu`  | [`EcuComponent`] (4 Bool in, 1 Int out) |
pub struct ComponentRegistry {
    factories: BTreeMap<String, ModelFactory>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::empty()
            .with("noop", |_| Ok(Box::new(NoopComponent) as Box<dyn ComponentModel>))
            .with("ecu", |init| Ok(Box::new(EcuComponent::new(init)?) as Box<dyn ComponentModel>))
    }
}

impl ComponentRegistry {
    /// A registry with no models at all.
    pub fn empty() -> Self {
        Self { factories: BTreeMap::new() }
    }

    /// Builder-style [`register`][Self::register].
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ModelInit<'_>) -> ModelResult<Box<dyn ComponentModel>> + Send + Sync + 'static,
    {
        self.register(name, factory);
        self
    }

    /// Add or replace the factory for `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&ModelInit<'_>) -> ModelResult<Box<dyn ComponentModel>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered model names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Build the model `model` for `init.component`.
    pub fn create(&self, model: &str, init: &ModelInit<'_>) -> ScheduleResult<Box<dyn ComponentModel>> {
        let factory = self.factories.get(model).ok_or_else(|| ConfigurationError::UnknownModel {
            component: init.component.to_owned(),
            model:     model.to_owned(),
        })?;
        factory(init).map_err(|e| ConfigurationError::ModelConstruction {
            component: init.component.to_owned(),
            reason:    e.to_string(),
        })
    }
}
