//! Per-module ordered rule storage

use super::compare::compare;
use super::rule::{Apply, Select};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered rule with resolved identifiers.
///
/// Created once at registration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct StoredRule {
    pub(crate) select: Select,
    pub(crate) priority: i64,
    pub(crate) deps: Vec<String>,
    pub(crate) apply: Apply,
    pub(crate) ordinal: u64,
}

impl StoredRule {
    pub(crate) fn new(
        select: Select,
        priority: i64,
        deps: Vec<String>,
        apply: Apply,
        ordinal: u64,
    ) -> Self {
        Self {
            select,
            priority,
            deps,
            apply,
            ordinal,
        }
    }

    /// The resolved selection clause
    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn priority(&self) -> i64 {
        self.priority
    }

    /// Resolved dependency ids, in declaration order
    pub fn deps(&self) -> &[String] {
        &self.deps
    }

    pub fn apply(&self) -> &Apply {
        &self.apply
    }

    /// Registration sequence number
    pub fn ordinal(&self) -> u64 {
        self.ordinal
    }
}

/// Rules indexed by canonical module id, each bucket ordered least to most specific.
#[derive(Debug, Default)]
pub struct RuleStore {
    buckets: HashMap<String, Vec<Arc<StoredRule>>>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a rule into a module's bucket, keeping the bucket sorted.
    ///
    /// The rule goes after every rule that does not sort after it, so rules
    /// comparing equal keep their insertion order.
    pub fn insert(&mut self, module_id: &str, rule: Arc<StoredRule>) {
        let bucket = self.buckets.entry(module_id.to_string()).or_default();
        let position = bucket.partition_point(|existing| compare(existing, &rule) != Ordering::Greater);
        bucket.insert(position, rule);
    }

    /// Get the ordered rules of a module.
    pub fn get(&self, module_id: &str) -> Option<&[Arc<StoredRule>]> {
        self.buckets.get(module_id).map(Vec::as_slice)
    }

    /// Total number of stored entries across all modules.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Module ids having at least one rule, sorted.
    pub fn module_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.buckets.keys().cloned().collect();
        ids.sort();
        ids
    }
}
