use lockaudit_types::{AuditSummary, Diagnostic, SeverityCounts, Verdict};

/// The aggregator's output: the only place a pass/fail decision exists.
#[derive(Clone, Debug)]
pub struct AuditReport {
    pub verdict: Verdict,
    pub diagnostics: Vec<Diagnostic>,
    pub counts: SeverityCounts,
    pub summary: AuditSummary,
}

impl AuditReport {
    pub fn has_violations(&self) -> bool {
        self.verdict == Verdict::Fail
    }
}
