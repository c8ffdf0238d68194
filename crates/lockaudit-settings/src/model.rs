use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Policy document schema v1.
///
/// This is a *user-facing* model: it is intentionally permissive (strings for
/// versions and expressions) so forward-compat is easy; strictness lives in
/// [`crate::resolve`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyDocV1 {
    /// Optional schema string for tooling (`lockaudit.policy.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Include every optional feature edge regardless of default activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_features: Option<bool>,

    #[serde(default)]
    pub bans: BansConfig,

    #[serde(default)]
    pub licenses: LicensesConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BansConfig {
    #[serde(default)]
    pub deny: Vec<DenyEntry>,

    #[serde(default)]
    pub skip: Vec<SkipEntry>,

    #[serde(default)]
    pub skip_tree: Vec<SkipTreeEntry>,

    /// `more-than-one` (default) or `any` uncovered duplicate versions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_tolerance: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DenyEntry {
    pub name: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkipEntry {
    pub name: String,
    /// Exact semver of the one occurrence this entry neutralizes.
    pub version: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkipTreeEntry {
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LicensesConfig {
    /// SPDX identifiers (optionally `WITH` an exception) allowed outright.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Minimum similarity for text-derived license matches, in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,

    #[serde(default)]
    pub clarifications: Vec<ClarificationEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClarificationEntry {
    pub name: String,
    /// Full SPDX expression overriding any inference for this package.
    pub expression: String,
    /// License files whose content hashes pin this override.
    #[serde(default)]
    pub license_files: Vec<LicenseFileEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LicenseFileEntry {
    pub path: String,
    /// Lowercase hex sha256 of the file content the override was written for.
    pub hash: String,
}
