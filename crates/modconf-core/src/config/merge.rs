//! Merging configuration objects
//!
//! Configurations are folded from an empty object, least specific first,
//! so later configurations override earlier ones.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A configuration with the priority it is merged at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedConfig {
    #[serde(default)]
    pub priority: i64,
    pub config: Value,
}

impl PrioritizedConfig {
    pub fn new(priority: i64, config: Value) -> Self {
        Self { priority, config }
    }
}

/// Deep merge two JSON values
///
/// If both values are objects, merge them recursively with `source` taking precedence.
/// Otherwise, `source` replaces `target`.
pub fn deep_merge(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if let Some(target_val) = target_map.get_mut(key) {
                    deep_merge(target_val, source_val);
                } else {
                    target_map.insert(key.clone(), source_val.clone());
                }
            }
        }
        (target, source) => {
            *target = source.clone();
        }
    }
}

/// Merge configurations in order into a single object.
///
/// Configurations that are not objects are skipped.
pub fn merge_configs<I>(configs: I) -> Value
where
    I: IntoIterator<Item = Value>,
{
    configs
        .into_iter()
        .fold(Value::Object(Map::new()), |mut result, config| {
            if config.is_object() {
                deep_merge(&mut result, &config);
            } else {
                tracing::warn!(%config, "Skipping configuration that is not an object");
            }
            result
        })
}

/// Sort prioritized configurations and merge them.
///
/// Lower priorities merge first; equal priorities keep their position in `entries`.
pub fn sort_and_merge_prioritized(entries: Vec<PrioritizedConfig>) -> Value {
    let mut ordered: Vec<(usize, PrioritizedConfig)> = entries.into_iter().enumerate().collect();
    ordered.sort_by(|(ordinal1, pc1), (ordinal2, pc2)| {
        pc1.priority
            .cmp(&pc2.priority)
            .then_with(|| ordinal1.cmp(ordinal2))
    });

    merge_configs(ordered.into_iter().map(|(_, entry)| entry.config))
}
