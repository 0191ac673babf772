//! [`RecordingRegistry`] for configuration service test scenarios.

use async_trait::async_trait;
use modconf_meta::{Error, ModuleHandle, ModuleLoader, ModuleRegistry, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
struct Loads {
    handle: HashMap<String, usize>,
    fallback: HashMap<String, usize>,
}

/// A module registry and loader that records every load.
///
/// - Modules added with [`RecordingRegistry::module`] are known to the registry
///   and loaded through their handle.
/// - Modules added with [`RecordingRegistry::fallback_module`] are unknown to
///   the registry and only reachable through the generic loader.
/// - Ids added with [`RecordingRegistry::failing`] fail to load either way.
///
/// # Example
///
/// ```rust
/// use modconf_test_utils::RecordingRegistry;
/// use serde_json::json;
///
/// let registry = RecordingRegistry::new()
///     .module("app/theme", json!({"color": "red"}))
///     .alias("theme", "app/theme");
///
/// assert_eq!(registry.load_count("app/theme"), 0);
/// ```
#[derive(Debug, Default)]
pub struct RecordingRegistry {
    aliases: HashMap<String, String>,
    modules: HashMap<String, Value>,
    fallback: HashMap<String, Value>,
    failing: HashMap<String, String>,
    loads: Arc<Mutex<Loads>>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias for a module id.
    pub fn alias(mut self, alias: &str, id: &str) -> Self {
        self.aliases.insert(alias.to_string(), id.to_string());
        self
    }

    /// Add a module known to the registry.
    pub fn module(mut self, id: &str, value: Value) -> Self {
        self.modules.insert(id.to_string(), value);
        self
    }

    /// Add a module only the generic loader can load.
    pub fn fallback_module(mut self, id: &str, value: Value) -> Self {
        self.fallback.insert(id.to_string(), value);
        self
    }

    /// Make loading an id fail with the given message.
    pub fn failing(mut self, id: &str, message: &str) -> Self {
        self.failing.insert(id.to_string(), message.to_string());
        self
    }

    /// Number of loads of an id through registry handles.
    pub fn handle_loads(&self, id: &str) -> usize {
        self.loads.lock().handle.get(id).copied().unwrap_or(0)
    }

    /// Number of loads of an id through the generic loader.
    pub fn fallback_loads(&self, id: &str) -> usize {
        self.loads.lock().fallback.get(id).copied().unwrap_or(0)
    }

    /// Total number of loads of an id.
    pub fn load_count(&self, id: &str) -> usize {
        self.handle_loads(id) + self.fallback_loads(id)
    }

    /// Total number of loads of any id.
    pub fn total_loads(&self) -> usize {
        let loads = self.loads.lock();
        loads.handle.values().sum::<usize>() + loads.fallback.values().sum::<usize>()
    }

    fn outcome(&self, id: &str, value: Option<&Value>) -> Result<Value> {
        if let Some(message) = self.failing.get(id) {
            return Err(Error::LoadFailed {
                id: id.to_string(),
                message: message.clone(),
            });
        }
        value
            .cloned()
            .ok_or_else(|| Error::ModuleNotFound { id: id.to_string() })
    }
}

struct RecordingHandle {
    id: String,
    outcome: Result<Value>,
    loads: Arc<Mutex<Loads>>,
}

#[async_trait]
impl ModuleHandle for RecordingHandle {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self) -> Result<Value> {
        *self.loads.lock().handle.entry(self.id.clone()).or_default() += 1;
        self.outcome.clone()
    }
}

impl ModuleRegistry for RecordingRegistry {
    fn resolve_alias(&self, id_or_alias: &str) -> Option<String> {
        self.aliases.get(id_or_alias).cloned()
    }

    fn get(&self, id: &str) -> Option<Arc<dyn ModuleHandle>> {
        let value = self.modules.get(id)?;
        Some(Arc::new(RecordingHandle {
            id: id.to_string(),
            outcome: self.outcome(id, Some(value)),
            loads: Arc::clone(&self.loads),
        }))
    }
}

#[async_trait]
impl ModuleLoader for RecordingRegistry {
    async fn load_by_id(&self, id: &str) -> Result<Value> {
        *self.loads.lock().fallback.entry(id.to_string()).or_default() += 1;
        self.outcome(id, self.fallback.get(id))
    }
}
