use crate::error::AuditError;
use crate::fingerprint::fingerprint;
use crate::license::{LicenseOutcome, LicenseResolver};
use crate::policy::AuditPolicy;
use lockaudit_graph::{DependencyGraph, PackageId};
use lockaudit_spdx::is_allowed;
use lockaudit_types::{ids, Diagnostic, PackageRef, Severity};
use rayon::prelude::*;
use serde_json::json;

pub fn run(graph: &DependencyGraph, policy: &AuditPolicy) -> Result<Vec<Diagnostic>, AuditError> {
    let resolver = LicenseResolver::new(&policy.licenses);
    let package_ids: Vec<PackageId> = graph.packages().collect();

    // Per-package evaluation is independent: fan out, then merge. Order is
    // irrelevant here; the aggregator sorts the final report.
    let per_package: Vec<Vec<Diagnostic>> = package_ids
        .into_par_iter()
        .map(|id| check_package(graph, policy, &resolver, id))
        .collect::<Result<_, _>>()?;

    Ok(per_package.into_iter().flatten().collect())
}

fn check_package(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
    resolver: &LicenseResolver<'_>,
    id: PackageId,
) -> Result<Vec<Diagnostic>, AuditError> {
    let package = graph.package(id);
    let subject = PackageRef::new(&package.name, package.version.to_string());
    let mut out = Vec::new();

    match resolver.resolve(package)? {
        LicenseOutcome::Unresolved(reason) => {
            out.push(Diagnostic {
                severity: Severity::Violation,
                check_id: ids::CHECK_LICENSES_ALLOW.to_string(),
                code: ids::CODE_UNRESOLVED_LICENSE.to_string(),
                message: format!("cannot determine license for {subject}: {reason}"),
                subject: Some(subject.clone()),
                help: Some(
                    "Add a clarification for this package, or raise its license metadata upstream."
                        .to_string(),
                ),
                fingerprint: Some(fingerprint(
                    ids::CHECK_LICENSES_ALLOW,
                    ids::CODE_UNRESOLVED_LICENSE,
                    &subject.name,
                    Some(&subject.version),
                    &reason,
                )),
                data: json!({ "reason": reason }),
            });
        }
        outcome @ (LicenseOutcome::Declared(_) | LicenseOutcome::ClarifiedOverride(_)) => {
            let clarified = matches!(outcome, LicenseOutcome::ClarifiedOverride(_));
            let Some(expr) = outcome.expression() else {
                return Ok(out);
            };
            if !is_allowed(expr, &policy.licenses.allow) {
                out.push(Diagnostic {
                    severity: Severity::Violation,
                    check_id: ids::CHECK_LICENSES_ALLOW.to_string(),
                    code: ids::CODE_DISALLOWED_EXPRESSION.to_string(),
                    message: format!("license `{expr}` of {subject} is not in the allow-list"),
                    subject: Some(subject.clone()),
                    help: Some(
                        "Extend the allow-list or replace the dependency.".to_string(),
                    ),
                    fingerprint: Some(fingerprint(
                        ids::CHECK_LICENSES_ALLOW,
                        ids::CODE_DISALLOWED_EXPRESSION,
                        &subject.name,
                        Some(&subject.version),
                        &expr.to_string(),
                    )),
                    data: json!({
                        "expression": expr.to_string(),
                        "clarified": clarified,
                    }),
                });
            }
        }
    }

    Ok(out)
}
