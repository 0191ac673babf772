//! Environment-based rule selection

use super::rule::Select;
use super::store::StoredRule;
use crate::environment::{Environment, Facet};

/// Check whether a rule is selected by the environment.
pub fn matches(rule: &StoredRule, environment: &Environment) -> bool {
    select_matches(&rule.select, environment)
}

/// Check whether a selection clause is satisfied by the environment.
///
/// Every facet criterion present must accept the environment's value.
/// Criteria under other keys are ignored.
pub fn select_matches(select: &Select, environment: &Environment) -> bool {
    // Application is the most common criterion, so check from the end.
    Facet::ALL.iter().rev().all(|facet| {
        select
            .get_facet(*facet)
            .is_none_or(|criterion| criterion.matches(environment.get(*facet)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_facets_always_matches() {
        let select = Select::module("m").annotation("a");
        assert!(select_matches(&select, &Environment::new()));
        assert!(select_matches(&select, &Environment::new().with_user("u")));
    }

    #[test]
    fn test_scalar_requires_equality() {
        let select = Select::module("m").theme("dark");

        assert!(select_matches(&select, &Environment::new().with_theme("dark")));
        assert!(!select_matches(&select, &Environment::new().with_theme("light")));
        assert!(!select_matches(&select, &Environment::new()));
    }

    #[test]
    fn test_list_requires_membership() {
        let select = Select::module("m").locale(["en", "fr"]);

        assert!(select_matches(&select, &Environment::new().with_locale("fr")));
        assert!(!select_matches(&select, &Environment::new().with_locale("de")));
    }

    #[test]
    fn test_every_facet_must_match() {
        let select = Select::module("m").user("u1").application("app");
        let env = Environment::new().with_user("u1").with_application("other");

        assert!(!select_matches(&select, &env));
        assert!(select_matches(&select, &env.with_application("app")));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let select = Select::module("m").criterion("region", "eu");
        assert!(select_matches(&select, &Environment::new()));
    }
}
