//! Configuration resolution
//!
//! This module turns the registered rules of a module into its effective
//! configuration.
//!
//! # Resolution pipeline
//!
//! ```text
//! RuleStore -> filter -> DependencyBatch -> ConfigFactory -> merge
//!                                                              ^
//!                                       ExternalConfigSource --+
//! ```
//!
//! # Example
//!
//! ```
//! use modconf_core::config::ConfigService;
//! use modconf_core::rules::{Rule, Select};
//! use modconf_core::Environment;
//! use modconf_meta::Registry;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let registry = Arc::new(Registry::new());
//! let service = ConfigService::new(
//!     Environment::new().with_user("alice"),
//!     registry.clone(),
//!     registry,
//! );
//!
//! service.add_rule(Rule::new(Select::module("app/chart"), json!({"x": 1})), None).unwrap();
//! service.add_rule(Rule::new(Select::module("app/chart").user("alice"), json!({"x": 2})), None).unwrap();
//!
//! assert_eq!(service.resolve("app/chart").await.unwrap(), json!({"x": 2}));
//! # });
//! ```

mod evaluator;
mod external;
mod loader;
mod merge;
mod service;

pub use evaluator::{ConfigFactory, evaluate};
pub use external::{ExternalConfigSource, FnSource, external_fn};
pub use loader::DependencyBatch;
pub use merge::{PrioritizedConfig, deep_merge, merge_configs, sort_and_merge_prioritized};
pub use service::{ConfigService, MODULES_ID};
