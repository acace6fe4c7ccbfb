//! Function registry: name -> factory
//!
//! Built once (usually via `FunctionRegistry::standard()`), then shared by
//! reference. There are no mutation operations once it has been handed to a
//! runner.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::RegistryError;
use crate::functions::{FunctionFactory, ReplaceMatchFactory, ReplacePatternFactory};

#[derive(Default)]
pub struct FunctionRegistry {
    factories: HashMap<String, Arc<dyn FunctionFactory>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every standard function
    pub fn standard() -> Self {
        let factories: HashMap<String, Arc<dyn FunctionFactory>> = standard_factories()
            .into_iter()
            .map(|factory| (factory.name().to_string(), factory))
            .collect();
        debug!(count = factories.len(), "Built standard registry");
        Self { factories }
    }

    pub fn register(
        &mut self,
        factory: impl FunctionFactory + 'static,
    ) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(factory))
    }

    pub fn register_arc(&mut self, factory: Arc<dyn FunctionFactory>) -> Result<(), RegistryError> {
        let name = factory.name().to_string();
        self.register_as(name, factory)
    }

    /// Register under an explicit key, which may differ from `factory.name()`
    pub fn register_as(
        &mut self,
        name: impl Into<String>,
        factory: Arc<dyn FunctionFactory>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(RegistryError::DuplicateFunction(name));
        }
        debug!(function = %name, "Registered function");
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Exact-match lookup
    pub fn lookup(&self, name: &str) -> Option<&dyn FunctionFactory> {
        self.factories.get(name).map(|f| f.as_ref())
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

fn standard_factories() -> Vec<Arc<dyn FunctionFactory>> {
    vec![Arc::new(ReplacePatternFactory), Arc::new(ReplaceMatchFactory)]
}
