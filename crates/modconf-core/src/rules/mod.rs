//! Configuration rules
//!
//! - [`Rule`] and [`RuleSet`] - rules as supplied by callers
//! - [`StoredRule`] and [`RuleStore`] - registered rules, ordered per module
//! - [`compare`] - specificity ordering
//! - [`matches`] - environment filtering

mod compare;
mod filter;
mod rule;
mod store;

pub use compare::compare;
pub use filter::{matches, select_matches};
pub use rule::{Apply, Criterion, Generator, Rule, RuleSet, Select};
pub use store::{RuleStore, StoredRule};
