use crate::checks;
use crate::error::AuditError;
use crate::exclusions::Exclusions;
use crate::policy::{AuditPolicy, BanRule};
use crate::report::AuditReport;
use lockaudit_graph::DependencyGraph;
use lockaudit_types::{AuditSummary, Diagnostic, Severity, SeverityCounts, Verdict};

/// Run the full audit: ban pass and license pass over one immutable graph
/// snapshot, merged into a single deterministic report.
///
/// The two passes only read the graph and policy and each writes into its
/// own collection, so they run as parallel tasks with no locking. Structural
/// errors abort before any verdict is produced.
pub fn audit(graph: &DependencyGraph, policy: &AuditPolicy) -> Result<AuditReport, AuditError> {
    let exclusions = Exclusions::build(graph, policy);

    let (mut diagnostics, license_result) = rayon::join(
        || {
            let mut out = Vec::new();
            checks::run_bans(graph, policy, &exclusions, &mut out);
            out
        },
        || checks::run_licenses(graph, policy),
    );
    diagnostics.extend(license_result?);

    // Deterministic ordering: the report must be reproducible across runs.
    diagnostics.sort_by(compare_diagnostics);

    let verdict = if diagnostics
        .iter()
        .any(|d| d.severity == Severity::Violation)
    {
        Verdict::Fail
    } else {
        Verdict::Pass
    };

    let counts = SeverityCounts::from_diagnostics(&diagnostics);
    let summary = AuditSummary {
        packages_audited: graph.len() as u32,
        edges_audited: graph.edge_count() as u32,
        skip_exceptions: policy
            .bans
            .iter()
            .filter(|r| matches!(r, BanRule::SkipVersion { .. }))
            .count() as u32,
        skip_trees: policy
            .bans
            .iter()
            .filter(|r| matches!(r, BanRule::SkipTree { .. }))
            .count() as u32,
    };

    Ok(AuditReport {
        verdict,
        diagnostics,
        counts,
        summary,
    })
}

fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) check_id (category)
    // 2) subject package name (missing last)
    // 3) subject version
    // 4) code
    // 5) message
    let subject_key = |d: &Diagnostic| match &d.subject {
        Some(s) => (s.name.clone(), s.version.clone()),
        None => ("~".to_string(), String::new()),
    };
    a.check_id
        .cmp(&b.check_id)
        .then_with(|| subject_key(a).cmp(&subject_key(b)))
        .then_with(|| a.code.cmp(&b.code))
        .then_with(|| a.message.cmp(&b.message))
}
