use crate::exclusions::Exclusions;
use crate::fingerprint::fingerprint;
use crate::policy::AuditPolicy;
use lockaudit_graph::DependencyGraph;
use lockaudit_types::{ids, Diagnostic, Severity};
use serde_json::json;

/// Exceptions referencing packages absent from the graph are advisory only:
/// the audit continues, the verdict is unaffected.
pub fn run(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
    exclusions: &Exclusions,
    out: &mut Vec<Diagnostic>,
) {
    for (name, version, _reason) in policy.skips() {
        let matched = graph
            .by_name(name)
            .iter()
            .any(|&id| &graph.package(id).version == version);
        if matched {
            continue;
        }
        out.push(Diagnostic {
            severity: Severity::Warning,
            check_id: ids::CHECK_BANS_STALE_EXCEPTION.to_string(),
            code: ids::CODE_STALE_SKIP.to_string(),
            message: format!("skip exception for {name} {version} matches no resolved package"),
            subject: None,
            help: Some("Delete the stale skip entry.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_BANS_STALE_EXCEPTION,
                ids::CODE_STALE_SKIP,
                name,
                Some(&version.to_string()),
                "",
            )),
            data: json!({
                "crate": name,
                "version": version.to_string(),
            }),
        });
    }

    for name in policy.skip_trees() {
        if exclusions.root_matched(name) {
            continue;
        }
        out.push(Diagnostic {
            severity: Severity::Warning,
            check_id: ids::CHECK_BANS_STALE_EXCEPTION.to_string(),
            code: ids::CODE_STALE_SKIP_TREE.to_string(),
            message: format!("skip-tree exception for '{name}' matches no resolved package"),
            subject: None,
            help: Some("Delete the stale skip-tree entry.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_BANS_STALE_EXCEPTION,
                ids::CODE_STALE_SKIP_TREE,
                name,
                None,
                "",
            )),
            data: json!({ "crate": name }),
        });
    }
}
