//! Rule-based module configuration
//!
//! This crate resolves the effective configuration of a module from a pool
//! of configuration rules, implementing:
//!
//! - **Rule registration**: id resolution, annotation rule rewriting and per-module indexing
//! - **Specificity ordering**: priority, then selected facets, then registration order
//! - **Environment filtering**: user, theme, locale and application facets
//! - **Resolution**: deduplicated dependency loading, rule evaluation and deep merge,
//!   combined with an optional external configuration source
//!
//! # Architecture
//!
//! ```text
//!              ConfigService
//!                    |
//!      +-------------+-------------+
//!      |             |             |
//!    rules        config      environment
//!                    |
//!              modconf-meta
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod logging;
pub mod rules;

pub use config::{ConfigService, ExternalConfigSource, MODULES_ID, PrioritizedConfig, external_fn};
pub use environment::{Environment, Facet};
pub use error::{Error, Result};
pub use rules::{Apply, Criterion, Rule, RuleSet, Select, StoredRule};
