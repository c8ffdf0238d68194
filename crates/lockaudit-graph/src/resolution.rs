use lockaudit_types::FilePath;
use semver::Version;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How optional dependency edges are expanded during graph construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EdgeMode {
    /// Only edges active under the resolver's default feature selection.
    #[default]
    DefaultFeatures,
    /// Every optional feature edge is included regardless of activation.
    AllFeatures,
}

/// A license file shipped inside a package, keyed by package-relative path.
///
/// Content is carried inline: the engine never touches the filesystem, so
/// hash verification and text matching stay pure and bounded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseFile {
    pub path: FilePath,
    pub content: String,
}

/// One edge as reported by the resolver: a reference to another package in
/// the same resolution, plus the features this edge enables on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRef {
    pub name: String,
    pub version: Version,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub enabled_features: Vec<String>,
}

/// A resolved package and its outgoing dependency declarations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub name: String,
    pub version: Version,
    /// Registry or path source, e.g. `registry+https://github.com/rust-lang/crates.io-index`.
    pub source: String,
    #[serde(default)]
    pub declared_license: Option<String>,
    #[serde(default)]
    pub license_files: Vec<LicenseFile>,
    /// Feature name -> features it enables.
    #[serde(default)]
    pub features: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub dependencies: Vec<DependencyRef>,
}

/// External resolver output: the raw material for [`crate::DependencyGraph::build`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub packages: Vec<ResolvedPackage>,
}

/// Package identity and attributes owned by the graph arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub source: String,
    pub declared_license: Option<String>,
    pub license_files: Vec<LicenseFile>,
    pub features: BTreeMap<String, Vec<String>>,
}

impl Package {
    pub fn id_str(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
