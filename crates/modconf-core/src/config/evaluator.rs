//! Turning selected rules into configuration objects

use super::loader::DependencyBatch;
use crate::Result;
use crate::environment::Environment;
use crate::rules::{Apply, Generator, StoredRule, matches};
use modconf_meta::{ModuleLoader, ModuleRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Produces one rule's configuration from the loaded dependency values.
#[derive(Clone)]
pub enum ConfigFactory {
    Literal(Value),
    Generator {
        generator: Generator,
        /// Slots of the rule's deps, in the rule's own order
        slots: Vec<usize>,
    },
}

impl ConfigFactory {
    /// Build the factory of a rule, registering its deps in the batch.
    ///
    /// Deps of literal rules are registered too, so they are loaded all the same.
    pub fn for_rule(rule: &StoredRule, batch: &mut DependencyBatch) -> Self {
        let slots: Vec<usize> = rule.deps().iter().map(|id| batch.slot(id)).collect();

        match rule.apply() {
            Apply::Literal(value) => ConfigFactory::Literal(value.clone()),
            Apply::Generator(generator) => ConfigFactory::Generator {
                generator: Arc::clone(generator),
                slots,
            },
        }
    }

    /// Produce the configuration given all values of the batch.
    pub fn produce(&self, values: &[Value]) -> Value {
        match self {
            ConfigFactory::Literal(value) => value.clone(),
            ConfigFactory::Generator { generator, slots } => {
                let deps: Vec<Value> = slots.iter().map(|&slot| values[slot].clone()).collect();
                generator(&deps)
            }
        }
    }
}

/// Evaluate the rules of a module under an environment.
///
/// Returns the configurations of the selected rules, least to most
/// specific, or `None` when no rule is selected.
pub async fn evaluate(
    rules: &[Arc<StoredRule>],
    environment: &Environment,
    registry: &dyn ModuleRegistry,
    loader: &dyn ModuleLoader,
) -> Result<Option<Vec<Value>>> {
    let mut batch = DependencyBatch::new();
    let factories: Vec<ConfigFactory> = rules
        .iter()
        .filter(|rule| matches(rule, environment))
        .map(|rule| ConfigFactory::for_rule(rule, &mut batch))
        .collect();

    tracing::debug!(
        rules = rules.len(),
        selected = factories.len(),
        deps = batch.len(),
        "Evaluating rules"
    );

    if factories.is_empty() {
        return Ok(None);
    }

    let values = batch.load(registry, loader).await?;
    Ok(Some(
        factories
            .iter()
            .map(|factory| factory.produce(&values))
            .collect(),
    ))
}
