use crate::exclusions::Exclusions;
use crate::fingerprint::fingerprint;
use crate::policy::AuditPolicy;
use lockaudit_graph::DependencyGraph;
use lockaudit_types::{ids, Diagnostic, PackageRef, Severity};
use serde_json::json;

pub fn run(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
    exclusions: &Exclusions,
    out: &mut Vec<Diagnostic>,
) {
    for (name, reason) in policy.denied() {
        // One violation per occurrence, at any version.
        for &id in graph.by_name(name) {
            if exclusions.contains(id) {
                continue;
            }
            let package = graph.package(id);
            let version = package.version.to_string();

            out.push(Diagnostic {
                severity: Severity::Violation,
                check_id: ids::CHECK_BANS_DENIED.to_string(),
                code: ids::CODE_DENIED_CRATE.to_string(),
                message: format!("crate '{name}' {version} is banned: {reason}"),
                subject: Some(PackageRef::new(name, version.clone())),
                help: Some("Remove the dependency or drop the deny rule.".to_string()),
                fingerprint: Some(fingerprint(
                    ids::CHECK_BANS_DENIED,
                    ids::CODE_DENIED_CRATE,
                    name,
                    Some(&version),
                    reason,
                )),
                data: json!({
                    "crate": name,
                    "version": version,
                    "reason": reason,
                }),
            });
        }
    }
}
