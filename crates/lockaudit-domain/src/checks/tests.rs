use super::{denied_crates, multiple_versions, stale_exceptions};
use crate::exclusions::Exclusions;
use crate::policy::DuplicateTolerance;
use crate::test_support::{deny, graph, pkg, policy_with_bans, skip, skip_tree};
use lockaudit_types::{ids, Severity};

#[test]
fn two_uncovered_versions_fire_naming_both() {
    let graph = graph(vec![
        pkg("app", "1.0.0", &[("dup", "0.1.0"), ("dup", "0.2.0")]),
        pkg("dup", "0.1.0", &[]),
        pkg("dup", "0.2.0", &[]),
    ]);
    let policy = policy_with_bans(Vec::new());
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    multiple_versions::run(&graph, &policy, &exclusions, &mut out);

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].severity, Severity::Violation);
    assert_eq!(out[0].data["versions"], serde_json::json!(["0.1.0", "0.2.0"]));
}

#[test]
fn skip_neutralizes_exactly_one_version() {
    let graph = graph(vec![
        pkg("app", "1.0.0", &[("dup", "0.1.0"), ("dup", "0.2.0")]),
        pkg("dup", "0.1.0", &[]),
        pkg("dup", "0.2.0", &[]),
    ]);
    let policy = policy_with_bans(vec![skip("dup", "0.1.0", "pulled in by legacy dep")]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    multiple_versions::run(&graph, &policy, &exclusions, &mut out);
    assert!(out.is_empty(), "one uncovered version is tolerated by default");
}

#[test]
fn skip_entries_are_consumed_per_version_not_aggregated() {
    // Three versions, one skip: two uncovered versions remain, so the
    // violation still fires and lists exactly those two.
    let graph = graph(vec![
        pkg(
            "app",
            "1.0.0",
            &[("dup", "0.1.0"), ("dup", "0.2.0"), ("dup", "0.3.0")],
        ),
        pkg("dup", "0.1.0", &[]),
        pkg("dup", "0.2.0", &[]),
        pkg("dup", "0.3.0", &[]),
    ]);
    let policy = policy_with_bans(vec![skip("dup", "0.1.0", "legacy")]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    multiple_versions::run(&graph, &policy, &exclusions, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].data["versions"], serde_json::json!(["0.2.0", "0.3.0"]));
}

#[test]
fn zero_tolerance_fires_on_a_single_uncovered_version() {
    let graph = graph(vec![
        pkg("app", "1.0.0", &[("dup", "0.1.0"), ("dup", "0.2.0")]),
        pkg("dup", "0.1.0", &[]),
        pkg("dup", "0.2.0", &[]),
    ]);
    let mut policy = policy_with_bans(vec![skip("dup", "0.1.0", "legacy")]);
    policy.duplicate_tolerance = DuplicateTolerance::Any;
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    multiple_versions::run(&graph, &policy, &exclusions, &mut out);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].data["versions"], serde_json::json!(["0.2.0"]));
}

#[test]
fn skip_tree_covers_duplicates_inside_the_subtree() {
    let graph = graph(vec![
        pkg("app", "1.0.0", &[("q", "1.0.0"), ("dup", "0.2.0")]),
        pkg("q", "1.0.0", &[("dup", "0.1.0")]),
        pkg("dup", "0.1.0", &[]),
        pkg("dup", "0.2.0", &[]),
    ]);
    let policy = policy_with_bans(vec![skip_tree("q")]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    multiple_versions::run(&graph, &policy, &exclusions, &mut out);
    // Only dup 0.2.0 is uncovered, which the default tolerance accepts.
    assert!(out.is_empty());
}

#[test]
fn denied_crate_fires_once_per_occurrence() {
    let graph = graph(vec![
        pkg("app", "1.0.0", &[("term", "0.6.0"), ("term", "0.7.0")]),
        pkg("term", "0.6.0", &[]),
        pkg("term", "0.7.0", &[]),
    ]);
    let policy = policy_with_bans(vec![deny("term", "unmaintained, use crossterm")]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    denied_crates::run(&graph, &policy, &exclusions, &mut out);

    assert_eq!(out.len(), 2);
    for diagnostic in &out {
        assert_eq!(diagnostic.code, ids::CODE_DENIED_CRATE);
        assert_eq!(diagnostic.data["reason"], "unmaintained, use crossterm");
    }
}

#[test]
fn stale_skip_and_skip_tree_warn_but_never_block() {
    let graph = graph(vec![pkg("app", "1.0.0", &[])]);
    let policy = policy_with_bans(vec![
        skip("absent", "0.1.0", "left over"),
        skip_tree("also-absent"),
    ]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    stale_exceptions::run(&graph, &policy, &exclusions, &mut out);

    assert_eq!(out.len(), 2);
    assert!(out.iter().all(|d| d.severity == Severity::Warning));
    let codes: Vec<&str> = out.iter().map(|d| d.code.as_str()).collect();
    assert!(codes.contains(&ids::CODE_STALE_SKIP));
    assert!(codes.contains(&ids::CODE_STALE_SKIP_TREE));
}

#[test]
fn skip_matching_a_present_version_is_not_stale() {
    let graph = graph(vec![pkg("dup", "0.1.0", &[])]);
    let policy = policy_with_bans(vec![skip("dup", "0.1.0", "expected")]);
    let exclusions = Exclusions::build(&graph, &policy);

    let mut out = Vec::new();
    stale_exceptions::run(&graph, &policy, &exclusions, &mut out);
    assert!(out.is_empty());
}
