use lockaudit_spdx::ExpressionSyntaxError;
use lockaudit_types::FilePath;
use thiserror::Error;

/// Structural audit failures.
///
/// These abort the run before a verdict is produced: continuing would emit a
/// report whose correctness cannot be trusted. Policy violations are never
/// errors; they are diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuditError {
    #[error("package {package}: malformed declared license expression")]
    MalformedExpression {
        package: String,
        #[source]
        source: ExpressionSyntaxError,
    },

    #[error(
        "package {package}: clarification is stale, {path} hashed to {actual} but {expected} was recorded"
    )]
    StaleClarification {
        package: String,
        path: FilePath,
        expected: String,
        actual: String,
    },

    #[error("package {package}: clarification references missing license file {path}")]
    MissingClarificationFile { package: String, path: FilePath },
}
