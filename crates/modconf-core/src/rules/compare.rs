//! Rule specificity ordering
//!
//! Rules are ordered least to most specific, which is also the order in
//! which their configurations are merged:
//!
//! 1. Lower priority first
//! 2. For the first facet (user, theme, locale, application) selected by
//!    exactly one of the rules, the rule selecting it goes last
//! 3. Earlier registration first

use super::store::StoredRule;
use crate::environment::Facet;
use std::cmp::Ordering;

/// Compare two rules by specificity.
pub fn compare(r1: &StoredRule, r2: &StoredRule) -> Ordering {
    r1.priority
        .cmp(&r2.priority)
        .then_with(|| compare_facets(r1, r2))
        .then_with(|| r1.ordinal.cmp(&r2.ordinal))
}

fn compare_facets(r1: &StoredRule, r2: &StoredRule) -> Ordering {
    for facet in Facet::ALL {
        let defined1 = r1.select.get_facet(facet).is_some();
        let defined2 = r2.select.get_facet(facet).is_some();

        if defined1 != defined2 {
            return defined1.cmp(&defined2);
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Apply, Select};
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn rule(select: Select, priority: i64, ordinal: u64) -> StoredRule {
        StoredRule::new(select, priority, vec![], Apply::literal(json!({})), ordinal)
    }

    #[test]
    fn test_priority_dominates_facets() {
        let all_facets = rule(
            Select::module("m")
                .user("u")
                .theme("t")
                .locale("l")
                .application("a"),
            0,
            1,
        );
        let prioritized = rule(Select::module("m"), 1, 0);

        assert_eq!(compare(&prioritized, &all_facets), Ordering::Greater);
        assert_eq!(compare(&all_facets, &prioritized), Ordering::Less);
    }

    #[rstest]
    #[case(Select::module("m").user("u"), Select::module("m").theme("t"))]
    #[case(Select::module("m").theme("t"), Select::module("m").locale("l"))]
    #[case(Select::module("m").locale("l"), Select::module("m").application("a"))]
    #[case(Select::module("m").user("u"), Select::module("m").application("a"))]
    #[case(Select::module("m").application("a"), Select::module("m"))]
    fn test_more_important_facet_is_more_specific(#[case] specific: Select, #[case] general: Select) {
        // The general rule is registered later but still sorts first
        let specific = rule(specific, 0, 0);
        let general = rule(general, 0, 1);

        assert_eq!(compare(&specific, &general), Ordering::Greater);
        assert_eq!(compare(&general, &specific), Ordering::Less);
    }

    #[test]
    fn test_shared_facets_fall_through_to_next() {
        let both_user = rule(Select::module("m").user("a"), 0, 0);
        let user_and_locale = rule(Select::module("m").user("b").locale("en"), 0, 1);

        assert_eq!(compare(&user_and_locale, &both_user), Ordering::Greater);
    }

    #[test]
    fn test_ordinal_breaks_ties() {
        let first = rule(Select::module("m").theme("a"), 3, 7);
        let second = rule(Select::module("m").theme("b"), 3, 8);

        assert_eq!(compare(&first, &second), Ordering::Less);
        assert_eq!(compare(&second, &first), Ordering::Greater);
        assert_eq!(compare(&first, &first), Ordering::Equal);
    }

    #[test]
    fn test_unknown_criteria_do_not_affect_order() {
        let custom = rule(Select::module("m").criterion("region", "eu"), 0, 1);
        let plain = rule(Select::module("m"), 0, 0);

        assert_eq!(compare(&custom, &plain), Ordering::Greater);
        assert_eq!(compare(&plain, &custom), Ordering::Less);
    }

    fn arb_rule() -> impl Strategy<Value = StoredRule> {
        (-2i64..3, any::<[bool; 4]>(), 0u64..1000).prop_map(|(priority, facets, ordinal)| {
            let mut select = Select::module("m");
            for (facet, defined) in Facet::ALL.iter().zip(facets) {
                if defined {
                    select = select.facet(*facet, "x");
                }
            }
            rule(select, priority, ordinal)
        })
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in arb_rule(), b in arb_rule()) {
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn prop_compare_is_transitive(a in arb_rule(), b in arb_rule(), c in arb_rule()) {
            if compare(&a, &b) != Ordering::Greater && compare(&b, &c) != Ordering::Greater {
                prop_assert_ne!(compare(&a, &c), Ordering::Greater);
            }
        }

        #[test]
        fn prop_distinct_ordinals_never_tie(a in arb_rule(), b in arb_rule()) {
            prop_assume!(a.ordinal != b.ordinal);
            prop_assert_ne!(compare(&a, &b), Ordering::Equal);
        }
    }
}
