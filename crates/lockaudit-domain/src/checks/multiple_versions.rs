use crate::exclusions::Exclusions;
use crate::fingerprint::fingerprint;
use crate::policy::{AuditPolicy, DuplicateTolerance};
use lockaudit_graph::DependencyGraph;
use lockaudit_types::{ids, Diagnostic, PackageRef, Severity};
use semver::Version;
use serde_json::json;
use std::collections::BTreeSet;

pub fn run(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
    exclusions: &Exclusions,
    out: &mut Vec<Diagnostic>,
) {
    // Graph groups are keyed by name already; a group only matters once it
    // holds more than one distinct version.
    let names: BTreeSet<&str> = graph
        .packages()
        .map(|id| graph.package(id).name.as_str())
        .collect();

    for name in names {
        let group = graph.by_name(name);
        let distinct: BTreeSet<&Version> =
            group.iter().map(|&id| &graph.package(id).version).collect();
        if distinct.len() <= 1 {
            continue;
        }

        // Skip entries neutralize exactly one (name, version) each; two
        // different uncovered versions still violate even if each is covered
        // by some *other* skip entry's name.
        let mut uncovered: Vec<String> = Vec::new();
        for &id in group {
            if exclusions.contains(id) {
                continue;
            }
            let version = &graph.package(id).version;
            let skipped = policy
                .skips()
                .any(|(skip_name, skip_version, _)| skip_name == name && skip_version == version);
            if !skipped {
                uncovered.push(version.to_string());
            }
        }
        uncovered.sort();
        uncovered.dedup();

        let fires = match policy.duplicate_tolerance {
            DuplicateTolerance::MoreThanOne => uncovered.len() > 1,
            DuplicateTolerance::Any => !uncovered.is_empty(),
        };
        if !fires {
            continue;
        }

        out.push(Diagnostic {
            severity: Severity::Violation,
            check_id: ids::CHECK_BANS_MULTIPLE_VERSIONS.to_string(),
            code: ids::CODE_DUPLICATE_VERSIONS.to_string(),
            message: format!(
                "crate '{}' is resolved at multiple versions: {}",
                name,
                uncovered.join(", ")
            ),
            subject: Some(PackageRef::new(name, uncovered.join("/"))),
            help: Some(
                "Converge on one version, or add a skip exception per extra version.".to_string(),
            ),
            fingerprint: Some(fingerprint(
                ids::CHECK_BANS_MULTIPLE_VERSIONS,
                ids::CODE_DUPLICATE_VERSIONS,
                name,
                None,
                &uncovered.join(","),
            )),
            data: json!({
                "crate": name,
                "versions": uncovered,
            }),
        });
    }
}
