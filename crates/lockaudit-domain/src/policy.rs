use lockaudit_spdx::{Expr, LicenseReq};
use lockaudit_types::FilePath;
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};

/// Ban rules are a closed set of shapes, so a tagged enum rather than any
/// kind of dispatch hierarchy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BanRule {
    /// Ban a crate name outright, at every version.
    DenyCrate { name: String, reason: String },
    /// Exempt exactly one (name, version) occurrence from the
    /// multiple-versions constraint. Consumed independently per version;
    /// never a blanket permission for the name.
    SkipVersion {
        name: String,
        version: Version,
        reason: String,
    },
    /// Exempt a package and its entire transitive dependency subgraph from
    /// ban evaluation. The subgraph stays in the graph; only its own
    /// violations are suppressed.
    SkipTree { name: String },
}

/// How many uncovered versions of one crate name are tolerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicateTolerance {
    /// Fire only when more than one uncovered version remains.
    #[default]
    MoreThanOne,
    /// Zero tolerance: any uncovered version of a duplicated name fires.
    Any,
}

/// Manually authored license override, validated by content hash so a stale
/// override never silently passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clarification {
    pub expression: Expr,
    /// (package-relative path, expected sha256 of the file content).
    pub license_files: Vec<(FilePath, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LicensePolicy {
    pub allow: BTreeSet<LicenseReq>,
    /// Minimum similarity score in [0, 1] for accepting a text-derived match.
    pub confidence_threshold: f64,
    pub clarifications: BTreeMap<String, Clarification>,
}

impl Default for LicensePolicy {
    fn default() -> Self {
        Self {
            allow: BTreeSet::new(),
            confidence_threshold: 0.8,
            clarifications: BTreeMap::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuditPolicy {
    pub bans: Vec<BanRule>,
    pub licenses: LicensePolicy,
    pub duplicate_tolerance: DuplicateTolerance,
}

impl AuditPolicy {
    pub fn denied(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bans.iter().filter_map(|rule| match rule {
            BanRule::DenyCrate { name, reason } => Some((name.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn skips(&self) -> impl Iterator<Item = (&str, &Version, &str)> {
        self.bans.iter().filter_map(|rule| match rule {
            BanRule::SkipVersion {
                name,
                version,
                reason,
            } => Some((name.as_str(), version, reason.as_str())),
            _ => None,
        })
    }

    pub fn skip_trees(&self) -> impl Iterator<Item = &str> {
        self.bans.iter().filter_map(|rule| match rule {
            BanRule::SkipTree { name } => Some(name.as_str()),
            _ => None,
        })
    }
}
