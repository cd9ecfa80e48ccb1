//! Ingestor registration and lookup.
//!
//! The registry holds factories in registration order; the auction depends
//! on that order for deterministic tie-breaking, so it is never sorted or
//! deduplicated behind the caller's back. A process-wide registry is
//! initialized lazily on first access and is read-only in practice after
//! startup; managers hold a handle to it (or to a private registry in
//! tests).

use crate::ingestors;
use crate::plugin::IngestorFactory;
use crate::{Result, SluiceError};
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

/// Validate a factory name before registration.
fn validate_factory_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SluiceError::validation("Ingestor name cannot be empty"));
    }
    if name.contains(char::is_whitespace) {
        return Err(SluiceError::validation(format!(
            "Ingestor name '{}' cannot contain whitespace",
            name
        )));
    }
    Ok(())
}

/// Ordered set of candidate ingestor factories.
pub struct IngestorRegistry {
    factories: Vec<Arc<dyn IngestorFactory>>,
}

impl IngestorRegistry {
    /// Create an empty registry, useful for tests and embedders that want
    /// full control over the candidate set.
    pub fn new_empty() -> Self {
        Self { factories: Vec::new() }
    }

    /// Create a registry populated with the built-in ingestors.
    ///
    /// Registration order matters: more specific handlers come first so
    /// that score ties resolve in their favor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new_empty();
        for factory in ingestors::builtin_factories() {
            // Built-in names are static and valid by construction.
            let name = factory.name().to_string();
            if let Err(err) = registry.register(factory) {
                tracing::warn!("Skipping built-in ingestor '{}': {}", name, err);
            }
        }
        registry
    }

    /// Register a factory at the end of the candidate order.
    pub fn register(&mut self, factory: Arc<dyn IngestorFactory>) -> Result<()> {
        validate_factory_name(factory.name())?;
        if self.factories.iter().any(|f| f.name() == factory.name()) {
            return Err(SluiceError::validation(format!(
                "Ingestor '{}' is already registered",
                factory.name()
            )));
        }
        self.factories.push(factory);
        Ok(())
    }

    /// Snapshot the candidate list in registration order.
    pub fn snapshot(&self) -> Vec<Arc<dyn IngestorFactory>> {
        self.factories.clone()
    }

    /// Registered factory names, in registration order.
    pub fn list(&self) -> Vec<String> {
        self.factories.iter().map(|f| f.name().to_string()).collect()
    }

    /// Remove all registered factories.
    pub fn clear(&mut self) {
        self.factories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Default for IngestorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Process-wide ingestor registry singleton.
static INGESTOR_REGISTRY: Lazy<Arc<RwLock<IngestorRegistry>>> =
    Lazy::new(|| Arc::new(RwLock::new(IngestorRegistry::with_defaults())));

/// Get the global ingestor registry.
pub fn get_ingestor_registry() -> Arc<RwLock<IngestorRegistry>> {
    INGESTOR_REGISTRY.clone()
}

/// Register an ingestor factory with the global registry.
pub fn register_ingestor(factory: Arc<dyn IngestorFactory>) -> Result<()> {
    let registry = get_ingestor_registry();
    let mut registry = registry
        .write()
        .map_err(|e| SluiceError::LockPoisoned(format!("ingestor registry: {}", e)))?;
    registry.register(factory)
}

/// List all ingestors registered in the global registry.
pub fn list_ingestors() -> Result<Vec<String>> {
    let registry = get_ingestor_registry();
    let registry = registry
        .read()
        .map_err(|e| SluiceError::LockPoisoned(format!("ingestor registry: {}", e)))?;
    Ok(registry.list())
}
