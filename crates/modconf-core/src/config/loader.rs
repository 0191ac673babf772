//! Deduplicated loading of rule dependencies
//!
//! A `DependencyBatch` collects the dependency ids of every rule selected
//! for one resolution. Each distinct id gets a single slot and is loaded
//! exactly once, no matter how many rules reference it.

use crate::Result;
use futures::future::try_join_all;
use modconf_meta::{ModuleLoader, ModuleRegistry};
use serde_json::Value;
use std::collections::HashMap;

/// Distinct dependency ids in first-seen order
#[derive(Debug, Default)]
pub struct DependencyBatch {
    ids: Vec<String>,
    slots: HashMap<String, usize>,
}

impl DependencyBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the slot of a dependency id, assigning the next one if it is new.
    pub fn slot(&mut self, id: &str) -> usize {
        if let Some(&slot) = self.slots.get(id) {
            return slot;
        }
        let slot = self.ids.len();
        self.ids.push(id.to_string());
        self.slots.insert(id.to_string(), slot);
        slot
    }

    /// The distinct ids, indexed by slot.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Load every dependency concurrently.
    ///
    /// The returned values are indexed by slot. The first failure fails the
    /// whole batch. An empty batch issues no loads.
    pub async fn load(
        &self,
        registry: &dyn ModuleRegistry,
        loader: &dyn ModuleLoader,
    ) -> Result<Vec<Value>> {
        if self.ids.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(count = self.ids.len(), "Loading rule dependencies");
        try_join_all(
            self.ids
                .iter()
                .map(|id| load_dependency(id, registry, loader)),
        )
        .await
    }
}

/// Load a dependency through its registry handle, or the generic loader when unknown.
async fn load_dependency(
    id: &str,
    registry: &dyn ModuleRegistry,
    loader: &dyn ModuleLoader,
) -> Result<Value> {
    let value = match registry.get(id) {
        Some(handle) => handle.load().await?,
        None => loader.load_by_id(id).await?,
    };
    Ok(value)
}
