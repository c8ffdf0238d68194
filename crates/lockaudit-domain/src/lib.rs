//! Pure policy evaluation (no IO).
//!
//! Input: an immutable dependency graph constructed elsewhere plus an audit
//! policy. Output: diagnostics + verdict + summary data. The ban pass and the
//! license pass are independent readers of the graph and run in parallel;
//! only structural input errors abort before a verdict.

#![forbid(unsafe_code)]

pub mod error;
pub mod license;
pub mod policy;
pub mod report;

mod engine;
mod exclusions;
mod fingerprint;

pub mod checks;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod test_support;

pub use engine::audit;
pub use error::AuditError;
pub use exclusions::Exclusions;
pub use report::AuditReport;
