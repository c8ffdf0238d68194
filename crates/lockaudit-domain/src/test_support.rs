use crate::policy::{AuditPolicy, BanRule, LicensePolicy};
use lockaudit_graph::{
    DependencyGraph, DependencyRef, EdgeMode, LicenseFile, Resolution, ResolvedPackage,
};
use lockaudit_spdx::LicenseReq;
use lockaudit_types::FilePath;
use semver::Version;
use std::collections::BTreeMap;

pub fn ver(v: &str) -> Version {
    Version::parse(v).expect("test version")
}

pub fn pkg(name: &str, version: &str, deps: &[(&str, &str)]) -> ResolvedPackage {
    ResolvedPackage {
        name: name.to_string(),
        version: ver(version),
        source: "registry+https://github.com/rust-lang/crates.io-index".to_string(),
        declared_license: None,
        license_files: Vec::new(),
        features: BTreeMap::new(),
        dependencies: deps
            .iter()
            .map(|(n, v)| DependencyRef {
                name: n.to_string(),
                version: ver(v),
                optional: false,
                enabled_features: Vec::new(),
            })
            .collect(),
    }
}

pub fn pkg_licensed(
    name: &str,
    version: &str,
    license: &str,
    deps: &[(&str, &str)],
) -> ResolvedPackage {
    let mut package = pkg(name, version, deps);
    package.declared_license = Some(license.to_string());
    package
}

pub fn pkg_with_license_file(
    name: &str,
    version: &str,
    path: &str,
    content: &str,
) -> ResolvedPackage {
    let mut package = pkg(name, version, &[]);
    package.license_files.push(LicenseFile {
        path: FilePath::new(path),
        content: content.to_string(),
    });
    package
}

pub fn graph(packages: Vec<ResolvedPackage>) -> DependencyGraph {
    DependencyGraph::build(Resolution { packages }, EdgeMode::DefaultFeatures)
        .expect("test graph must be well-formed")
}

pub fn policy_with_bans(bans: Vec<BanRule>) -> AuditPolicy {
    AuditPolicy {
        bans,
        ..AuditPolicy::default()
    }
}

pub fn policy_allowing(ids: &[&str]) -> AuditPolicy {
    AuditPolicy {
        licenses: LicensePolicy {
            allow: ids.iter().map(|id| LicenseReq::bare(*id)).collect(),
            ..LicensePolicy::default()
        },
        ..AuditPolicy::default()
    }
}

pub fn deny(name: &str, reason: &str) -> BanRule {
    BanRule::DenyCrate {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

pub fn skip(name: &str, version: &str, reason: &str) -> BanRule {
    BanRule::SkipVersion {
        name: name.to_string(),
        version: ver(version),
        reason: reason.to_string(),
    }
}

pub fn skip_tree(name: &str) -> BanRule {
    BanRule::SkipTree {
        name: name.to_string(),
    }
}
