//! Stable DTOs and IDs used across the lockaudit workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted audit report
//! - stable string IDs and codes
//! - canonical license-file path handling

#![forbid(unsafe_code)]

pub mod ids;
pub mod path;
pub mod report;

pub use path::FilePath;
pub use report::{
    AuditEnvelope, AuditSummary, Diagnostic, PackageRef, Severity, SeverityCounts, ToolMeta,
    Verdict, SCHEMA_AUDIT_V1,
};
