//! Property tests for report determinism.

use crate::policy::BanRule;
use crate::test_support::{graph, pkg, policy_with_bans};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn package_set() -> impl Strategy<Value = Vec<(String, String)>> {
    let name = prop::sample::select(vec!["alpha", "beta", "gamma", "delta", "term"]);
    let version = prop::sample::select(vec!["0.1.0", "0.2.0", "1.0.0", "2.3.4"]);
    prop::collection::btree_set((name, version), 1..12).prop_map(|set: BTreeSet<_>| {
        set.into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    })
}

fn permuted(pairs: Vec<(String, String)>) -> impl Strategy<Value = Vec<(String, String)>> {
    Just(pairs).prop_shuffle()
}

proptest! {
    // The aggregator's report must not depend on resolver output order: same
    // packages, any permutation, identical diagnostics.
    #[test]
    fn report_is_invariant_under_input_permutation(
        (original, shuffled) in package_set().prop_flat_map(|pairs| {
            let clone = pairs.clone();
            (Just(clone), permuted(pairs))
        }),
        deny_term in any::<bool>(),
    ) {
        let mut bans = Vec::new();
        if deny_term {
            bans.push(BanRule::DenyCrate {
                name: "term".to_string(),
                reason: "denied by test policy".to_string(),
            });
        }

        let build = |pairs: &[(String, String)]| {
            let packages = pairs
                .iter()
                .map(|(n, v)| pkg(n, v, &[]))
                .collect::<Vec<_>>();
            crate::audit(&graph(packages), &policy_with_bans(bans.clone()))
                .expect("flat graphs have no structural errors")
        };

        let first = build(&original);
        let second = build(&shuffled);
        prop_assert_eq!(first.diagnostics, second.diagnostics);
        prop_assert_eq!(first.verdict, second.verdict);
    }
}
