use crate::error::AuditError;
use crate::exclusions::Exclusions;
use crate::policy::AuditPolicy;
use lockaudit_graph::DependencyGraph;
use lockaudit_types::Diagnostic;

mod denied_crates;
mod licenses;
mod multiple_versions;
mod stale_exceptions;

#[cfg(test)]
mod tests;

/// The ban pass: explicit denies, version uniqueness, and stale-exception
/// advisories. Infallible; every finding is a diagnostic.
pub fn run_bans(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
    exclusions: &Exclusions,
    out: &mut Vec<Diagnostic>,
) {
    denied_crates::run(graph, policy, exclusions, out);
    multiple_versions::run(graph, policy, exclusions, out);
    stale_exceptions::run(graph, policy, exclusions, out);
}

/// The license pass: resolve each package's effective expression and hold it
/// against the allow-list. Structural failures (stale clarification,
/// malformed declared expression) abort the run.
pub fn run_licenses(
    graph: &DependencyGraph,
    policy: &AuditPolicy,
) -> Result<Vec<Diagnostic>, AuditError> {
    licenses::run(graph, policy)
}
