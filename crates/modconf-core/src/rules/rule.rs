//! Rule types as supplied by callers
//!
//! A Rule selects one or more modules, optionally narrows the selection to
//! environment facets, and applies a configuration object to them.
//!
//! ```
//! use modconf_core::rules::{Apply, Rule, Select};
//! use serde_json::json;
//!
//! let rule = Rule::new(
//!     Select::module("app/views/chart").user(["alice", "bob"]),
//!     Apply::literal(json!({"palette": "warm"})),
//! )
//! .priority(2);
//!
//! assert_eq!(rule.priority, 2);
//! ```

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::environment::Facet;

/// A configuration generator, called with the rule's dependency values in `deps` order.
pub type Generator = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// Acceptable values of a selection criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// The environment value must equal this value
    One(String),
    /// The environment value must be one of these values
    AnyOf(Vec<String>),
}

impl Criterion {
    /// Check whether an environment value satisfies the criterion.
    ///
    /// A missing environment value never matches.
    pub fn matches(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Criterion::One(expected) => expected == value,
            Criterion::AnyOf(expected) => expected.iter().any(|v| v == value),
        }
    }

    /// Map every value of the criterion, keeping its shape.
    pub fn try_map<E>(&self, mut f: impl FnMut(&str) -> Result<String, E>) -> Result<Self, E> {
        Ok(match self {
            Criterion::One(value) => Criterion::One(f(value)?),
            Criterion::AnyOf(values) => Criterion::AnyOf(
                values
                    .iter()
                    .map(|v| f(v))
                    .collect::<Result<Vec<_>, E>>()?,
            ),
        })
    }
}

impl From<&str> for Criterion {
    fn from(value: &str) -> Self {
        Criterion::One(value.to_string())
    }
}

impl From<String> for Criterion {
    fn from(value: String) -> Self {
        Criterion::One(value)
    }
}

impl From<Vec<String>> for Criterion {
    fn from(values: Vec<String>) -> Self {
        Criterion::AnyOf(values)
    }
}

impl From<Vec<&str>> for Criterion {
    fn from(values: Vec<&str>) -> Self {
        Criterion::AnyOf(values.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Criterion {
    fn from(values: [&str; N]) -> Self {
        Criterion::AnyOf(values.iter().map(|v| v.to_string()).collect())
    }
}

/// The selection clause of a rule.
///
/// `criteria` keeps declaration order. Setting a key that already exists
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select {
    /// Target module ids or aliases
    pub modules: Vec<String>,
    /// Annotation id or alias, for annotation rules
    pub annotation: Option<String>,
    /// Facet and domain-specific criteria
    pub criteria: Vec<(String, Criterion)>,
}

impl Select {
    /// Select a single module.
    pub fn module(id: impl Into<String>) -> Self {
        Self {
            modules: vec![id.into()],
            ..Self::default()
        }
    }

    /// Select several modules.
    pub fn modules<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: ids.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn annotation(mut self, id: impl Into<String>) -> Self {
        self.annotation = Some(id.into());
        self
    }

    pub fn user(self, criterion: impl Into<Criterion>) -> Self {
        self.facet(Facet::User, criterion)
    }

    pub fn theme(self, criterion: impl Into<Criterion>) -> Self {
        self.facet(Facet::Theme, criterion)
    }

    pub fn locale(self, criterion: impl Into<Criterion>) -> Self {
        self.facet(Facet::Locale, criterion)
    }

    pub fn application(self, criterion: impl Into<Criterion>) -> Self {
        self.facet(Facet::Application, criterion)
    }

    /// Add a facet criterion.
    pub fn facet(self, facet: Facet, criterion: impl Into<Criterion>) -> Self {
        self.criterion(facet.key(), criterion)
    }

    /// Add a criterion under an arbitrary key.
    ///
    /// Keys other than the facet keys are kept but not evaluated by the
    /// generic filter.
    pub fn criterion(mut self, key: impl Into<String>, criterion: impl Into<Criterion>) -> Self {
        let key = key.into();
        let criterion = criterion.into();
        match self.criteria.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = criterion,
            None => self.criteria.push((key, criterion)),
        }
        self
    }

    /// Get the criterion declared under a key.
    pub fn get(&self, key: &str) -> Option<&Criterion> {
        self.criteria
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, criterion)| criterion)
    }

    /// Get the criterion declared for a facet.
    pub fn get_facet(&self, facet: Facet) -> Option<&Criterion> {
        self.get(facet.key())
    }
}

/// How a rule produces its configuration.
#[derive(Clone)]
pub enum Apply {
    /// A fixed configuration object
    Literal(Value),
    /// A function of the rule's resolved dependencies
    Generator(Generator),
}

impl Apply {
    pub fn literal(value: Value) -> Self {
        Apply::Literal(value)
    }

    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Apply::Generator(Arc::new(f))
    }

    /// Wrap the produced value into `{module_id: {annotations: {annotation_id: value}}}`.
    pub(crate) fn wrap_annotation(&self, module_id: &str, annotation_id: &str) -> Apply {
        match self {
            Apply::Literal(value) => {
                Apply::Literal(annotation_payload(module_id, annotation_id, value.clone()))
            }
            Apply::Generator(generator) => {
                let generator = Arc::clone(generator);
                let module_id = module_id.to_string();
                let annotation_id = annotation_id.to_string();
                Apply::generator(move |deps| {
                    annotation_payload(&module_id, &annotation_id, generator(deps))
                })
            }
        }
    }
}

impl From<Value> for Apply {
    fn from(value: Value) -> Self {
        Apply::Literal(value)
    }
}

impl fmt::Debug for Apply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Apply::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Apply::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

fn annotation_payload(module_id: &str, annotation_id: &str, value: Value) -> Value {
    let mut annotations = serde_json::Map::new();
    annotations.insert(annotation_id.to_string(), value);

    let mut module = serde_json::Map::new();
    module.insert("annotations".to_string(), Value::Object(annotations));

    let mut payload = serde_json::Map::new();
    payload.insert(module_id.to_string(), Value::Object(module));
    Value::Object(payload)
}

/// A configuration rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Selection clause; registration fails without one
    pub select: Option<Select>,
    /// Higher priorities are applied later and win
    pub priority: i64,
    /// Module ids whose values are passed to a generator
    pub deps: Vec<String>,
    pub apply: Apply,
}

impl Rule {
    /// Create a rule with priority 0 and no dependencies
    pub fn new(select: Select, apply: impl Into<Apply>) -> Self {
        Self {
            select: Some(select),
            priority: 0,
            deps: Vec::new(),
            apply: apply.into(),
        }
    }

    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn deps<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// A set of rules sharing a context module
///
/// Relative ids inside the rules are resolved against `context_id`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub context_id: Option<String>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self {
            context_id: None,
            rules,
        }
    }

    pub fn with_context(context_id: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            context_id: Some(context_id.into()),
            rules,
        }
    }
}
