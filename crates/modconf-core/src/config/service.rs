//! The configuration service
//!
//! `ConfigService` owns the rule store. Rules are registered with
//! [`ConfigService::add`] or [`ConfigService::add_rule`]; the effective
//! configuration of a module is obtained with [`ConfigService::resolve`].
//!
//! Resolution runs the selected rules and the external source (if any)
//! concurrently, then merges everything into one object:
//!
//! 1. Rules of the module, filtered by the environment, least to most specific
//! 2. External configurations, by priority, with rule configurations at priority 0

use super::evaluator::evaluate;
use super::external::ExternalConfigSource;
use super::merge::{PrioritizedConfig, merge_configs, sort_and_merge_prioritized};
use crate::environment::{Environment, Facet};
use crate::rules::{Rule, RuleSet, RuleStore, Select, StoredRule};
use crate::{Error, Result};
use modconf_meta::id::{annotation_full_id, is_relative};
use modconf_meta::{ModuleLoader, ModuleRegistry};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Id of the module registry module, target of all annotation rules.
pub const MODULES_ID: &str = "modconf/modules";

const SELECT_MODULE: &str = "rule.select.module";
const DEPS: &str = "rule.deps";

/// In-memory configuration service for an environment
pub struct ConfigService {
    environment: Environment,
    registry: Arc<dyn ModuleRegistry>,
    loader: Arc<dyn ModuleLoader>,
    external: Option<Arc<dyn ExternalConfigSource>>,
    store: RwLock<RuleStore>,
    next_ordinal: AtomicU64,
}

impl ConfigService {
    /// Create a service with no rules and no external source
    ///
    /// # Arguments
    ///
    /// * `environment` - Facet values used to select rules
    /// * `registry` - Resolves aliases and provides module handles
    /// * `loader` - Loads dependencies the registry does not know
    pub fn new(
        environment: Environment,
        registry: Arc<dyn ModuleRegistry>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Self {
        Self {
            environment,
            registry,
            loader,
            external: None,
            store: RwLock::new(RuleStore::new()),
            next_ordinal: AtomicU64::new(0),
        }
    }

    /// Set the external configuration source
    pub fn with_external_source(mut self, source: impl ExternalConfigSource + 'static) -> Self {
        self.external = Some(Arc::new(source));
        self
    }

    /// The environment used to select rules
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Add every rule of a rule set, relative to its context id
    ///
    /// Stops at the first invalid rule. Rules before it stay registered.
    /// An empty context id counts as no context.
    pub fn add(&self, rule_set: RuleSet) -> Result<()> {
        let context_id = rule_set.context_id;
        let context_id = context_id.as_deref().filter(|id| !id.is_empty());
        for rule in rule_set.rules {
            self.add_rule(rule, context_id)?;
        }
        Ok(())
    }

    /// Add a rule
    ///
    /// Module ids, the annotation id, dependency ids and application values
    /// are resolved through the registry aliases first, then relative to
    /// `context_id`. Annotation rules are registered under [`MODULES_ID`].
    ///
    /// # Errors
    ///
    /// - [`Error::RequiredArgument`] if the rule selects no module
    /// - [`Error::Meta`] if a relative id cannot be resolved
    pub fn add_rule(&self, rule: Rule, context_id: Option<&str>) -> Result<()> {
        let ordinal = self.next_ordinal.fetch_add(1, Ordering::Relaxed);

        let Rule {
            select,
            priority,
            deps,
            apply,
        } = rule;

        let select = select.ok_or_else(|| Error::required(SELECT_MODULE))?;
        if select.modules.is_empty() || select.modules.iter().any(String::is_empty) {
            return Err(Error::required(SELECT_MODULE));
        }
        if deps.iter().any(String::is_empty) {
            return Err(Error::required(DEPS));
        }

        let annotation_id = select
            .annotation
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| self.resolve_annotation_id(id, context_id))
            .transpose()?;

        let deps = deps
            .iter()
            .map(|id| self.resolve_id(id, context_id))
            .collect::<Result<Vec<_>>>()?;

        let module_ids = select
            .modules
            .iter()
            .map(|id| self.resolve_id(id, context_id))
            .collect::<Result<Vec<_>>>()?;

        let mut criteria = Vec::with_capacity(select.criteria.len());
        for (key, criterion) in &select.criteria {
            let criterion = if key == Facet::Application.key() {
                criterion.try_map(|id| self.resolve_id(id, context_id))?
            } else {
                criterion.clone()
            };
            criteria.push((key.clone(), criterion));
        }

        let mut store = self.store.write();

        match annotation_id {
            None => {
                let select = Select {
                    modules: module_ids.clone(),
                    annotation: None,
                    criteria,
                };
                let stored = Arc::new(StoredRule::new(select, priority, deps, apply, ordinal));
                for module_id in &module_ids {
                    tracing::debug!(module_id = %module_id, ordinal, priority, "Registered rule");
                    store.insert(module_id, Arc::clone(&stored));
                }
            }
            Some(annotation_id) => {
                // Only the last extra criterion is kept next to the registry module.
                let mut select = Select::module(MODULES_ID);
                if let Some((key, criterion)) = criteria
                    .iter()
                    .rev()
                    .find(|(key, _)| key != "module" && key != "annotation")
                {
                    select = select.criterion(key.clone(), criterion.clone());
                }

                for module_id in &module_ids {
                    let stored = StoredRule::new(
                        select.clone(),
                        priority,
                        deps.clone(),
                        apply.wrap_annotation(module_id, &annotation_id),
                        ordinal,
                    );
                    tracing::debug!(
                        module_id = %module_id,
                        annotation_id = %annotation_id,
                        ordinal,
                        priority,
                        "Registered annotation rule"
                    );
                    store.insert(MODULES_ID, Arc::new(stored));
                }
            }
        }

        Ok(())
    }

    /// Resolve the effective configuration of a module
    ///
    /// Always yields an object; `{}` when nothing applies.
    ///
    /// # Errors
    ///
    /// Fails if loading a rule dependency fails or the external source fails.
    pub async fn resolve(&self, module_id: &str) -> Result<Value> {
        tracing::debug!(module_id = %module_id, "Resolving configuration");

        let internal = self.select_internal(module_id);

        let Some(external) = &self.external else {
            return Ok(merge_configs(internal.await?.unwrap_or_default()));
        };

        let (internal, external) = tokio::try_join!(internal, external.select(module_id))?;

        let config = match (internal, external) {
            (internal, None) => merge_configs(internal.unwrap_or_default()),
            (None, Some(external)) => sort_and_merge_prioritized(external),
            (Some(internal), Some(mut prioritized)) => {
                // Merged together, as two separate merges would not give the same result.
                prioritized.extend(
                    internal
                        .into_iter()
                        .map(|config| PrioritizedConfig::new(0, config)),
                );
                sort_and_merge_prioritized(prioritized)
            }
        };

        Ok(config)
    }

    /// Get the rules registered for a module, least to most specific
    pub fn rules(&self, module_id: &str) -> Vec<Arc<StoredRule>> {
        self.snapshot(module_id).unwrap_or_default()
    }

    /// Number of stored rule entries across all modules
    pub fn rule_count(&self) -> usize {
        self.store.read().len()
    }

    /// Module ids having registered rules, sorted
    pub fn module_ids(&self) -> Vec<String> {
        self.store.read().module_ids()
    }

    fn snapshot(&self, module_id: &str) -> Option<Vec<Arc<StoredRule>>> {
        self.store.read().get(module_id).map(<[_]>::to_vec)
    }

    async fn select_internal(&self, module_id: &str) -> Result<Option<Vec<Value>>> {
        let Some(rules) = self.snapshot(module_id) else {
            return Ok(None);
        };

        evaluate(
            &rules,
            &self.environment,
            self.registry.as_ref(),
            self.loader.as_ref(),
        )
        .await
    }

    /// Look up a non-relative id among the registry aliases.
    fn lookup_alias(&self, id_or_alias: &str) -> Option<String> {
        if is_relative(id_or_alias) {
            return None;
        }
        self.registry.resolve_alias(id_or_alias)
    }

    fn resolve_id(&self, id_or_alias: &str, context_id: Option<&str>) -> Result<String> {
        match self.lookup_alias(id_or_alias) {
            Some(id) => Ok(id),
            None => Ok(self.registry.resolve_relative(id_or_alias, context_id)?),
        }
    }

    fn resolve_annotation_id(&self, id_or_alias: &str, context_id: Option<&str>) -> Result<String> {
        match self.lookup_alias(id_or_alias) {
            Some(id) => Ok(id),
            None => {
                let full_id = annotation_full_id(id_or_alias);
                Ok(self.registry.resolve_relative(&full_id, context_id)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Apply;
    use modconf_meta::Registry;
    use serde_json::json;

    fn service() -> ConfigService {
        let registry = Arc::new(Registry::new());
        ConfigService::new(Environment::new(), registry.clone(), registry)
    }

    #[test]
    fn test_ordinals_are_assigned_in_registration_order() {
        let service = service();
        service
            .add_rule(Rule::new(Select::module("a"), json!({})), None)
            .unwrap();
        service
            .add_rule(Rule::new(Select::module("b"), json!({})), None)
            .unwrap();
        service
            .add_rule(Rule::new(Select::module("a"), json!({})), None)
            .unwrap();

        let ordinals: Vec<u64> = service.rules("a").iter().map(|r| r.ordinal()).collect();
        assert_eq!(ordinals, vec![0, 2]);
        assert_eq!(service.rules("b")[0].ordinal(), 1);
    }

    #[test]
    fn test_failed_rule_still_consumes_ordinal() {
        let service = service();
        let missing = Rule {
            select: None,
            priority: 0,
            deps: vec![],
            apply: Apply::literal(json!({})),
        };
        assert!(service.add_rule(missing, None).is_err());

        service
            .add_rule(Rule::new(Select::module("a"), json!({})), None)
            .unwrap();
        assert_eq!(service.rules("a")[0].ordinal(), 1);
        assert_eq!(service.rule_count(), 1);
    }

    #[test]
    fn test_annotation_rule_keeps_last_extra_criterion() {
        let service = service();
        service
            .add_rule(
                Rule::new(
                    Select::module("m")
                        .annotation("Style")
                        .user("u1")
                        .theme("dark"),
                    json!({"v": 1}),
                ),
                None,
            )
            .unwrap();

        let rules = service.rules(MODULES_ID);
        assert_eq!(rules.len(), 1);

        let select = rules[0].select();
        assert_eq!(select.modules, vec![MODULES_ID]);
        assert_eq!(select.annotation, None);
        assert_eq!(select.get_facet(Facet::User), None);
        assert!(select.get_facet(Facet::Theme).is_some());
        assert!(service.rules("m").is_empty());
    }

    #[tokio::test]
    async fn test_resolve_unknown_module_is_empty_object() {
        let service = service();
        assert_eq!(service.resolve("nothing").await.unwrap(), json!({}));
    }
}
