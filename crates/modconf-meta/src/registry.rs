//! Module registry contracts and an in-memory registry
//!
//! The configuration service never loads modules itself. It reaches module
//! values through three narrow contracts:
//!
//! - [`ModuleRegistry`] - alias lookup, relative id resolution and handle lookup
//! - [`ModuleHandle`] - asynchronous load of a single known module
//! - [`ModuleLoader`] - generic asynchronous load-by-id fallback

use crate::{Error, Result, id};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A module known to a registry.
#[async_trait]
pub trait ModuleHandle: Send + Sync {
    /// The canonical identifier of the module.
    fn id(&self) -> &str;

    /// Load the module's value.
    async fn load(&self) -> Result<Value>;
}

/// Identifier lookup and module metadata.
pub trait ModuleRegistry: Send + Sync {
    /// Get the canonical identifier registered for an identifier or alias.
    fn resolve_alias(&self, id_or_alias: &str) -> Option<String>;

    /// Resolve a possibly relative identifier against a context module.
    fn resolve_relative(&self, id: &str, context_id: Option<&str>) -> Result<String> {
        id::resolve_module_id(id, context_id)
    }

    /// Get the handle of a module given its canonical identifier.
    fn get(&self, id: &str) -> Option<Arc<dyn ModuleHandle>>;
}

/// Generic asynchronous module loading, used for modules the registry does not know.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load_by_id(&self, id: &str) -> Result<Value>;
}

/// A module whose value is known up front.
#[derive(Debug, Clone)]
struct StaticModule {
    id: String,
    value: Value,
}

#[async_trait]
impl ModuleHandle for StaticModule {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self) -> Result<Value> {
        Ok(self.value.clone())
    }
}

/// In-memory registry mapping aliases to module ids and module ids to values.
///
/// # Example
///
/// ```
/// use modconf_meta::{ModuleRegistry, Registry};
/// use serde_json::json;
///
/// let mut registry = Registry::new();
/// registry.register_module("app/theme", json!({"color": "blue"}));
/// registry.register_alias("theme", "app/theme");
///
/// assert_eq!(registry.resolve_alias("theme"), Some("app/theme".to_string()));
/// assert!(registry.get("app/theme").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Maps alias (or canonical id) to canonical id
    aliases: HashMap<String, String>,
    /// Maps canonical id to module
    modules: HashMap<String, StaticModule>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            aliases: HashMap::new(),
            modules: HashMap::new(),
        }
    }

    /// Register an alias for a canonical module id.
    ///
    /// If the alias was already registered, the previous target is replaced.
    pub fn register_alias(&mut self, alias: impl Into<String>, id: impl Into<String>) {
        self.aliases.insert(alias.into(), id.into());
    }

    /// Register a module and its value.
    ///
    /// The module id also becomes an alias of itself.
    pub fn register_module(&mut self, id: impl Into<String>, value: Value) {
        let id = id.into();
        self.aliases.insert(id.clone(), id.clone());
        self.modules.insert(id.clone(), StaticModule { id, value });
    }

    /// List all registered module ids, sorted.
    pub fn list_modules(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.modules.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Get the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the registry has no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleRegistry for Registry {
    fn resolve_alias(&self, id_or_alias: &str) -> Option<String> {
        self.aliases.get(id_or_alias).cloned()
    }

    fn get(&self, id: &str) -> Option<Arc<dyn ModuleHandle>> {
        self.modules
            .get(id)
            .map(|module| Arc::new(module.clone()) as Arc<dyn ModuleHandle>)
    }
}

#[async_trait]
impl ModuleLoader for Registry {
    async fn load_by_id(&self, id: &str) -> Result<Value> {
        match self.modules.get(id) {
            Some(module) => module.load().await,
            None => {
                tracing::debug!(id = %id, "Module not registered");
                Err(Error::ModuleNotFound { id: id.to_string() })
            }
        }
    }
}
