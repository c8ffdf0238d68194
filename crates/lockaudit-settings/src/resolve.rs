use crate::model::PolicyDocV1;
use anyhow::Context;
use lockaudit_domain::policy::{
    AuditPolicy, BanRule, Clarification, DuplicateTolerance, LicensePolicy,
};
use lockaudit_graph::EdgeMode;
use lockaudit_spdx::{parse, Expr, LicenseReq};
use lockaudit_types::FilePath;
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug)]
pub struct ResolvedPolicy {
    pub policy: AuditPolicy,
    pub edge_mode: EdgeMode,
}

/// Turn a permissive policy document into the strict policy the engine
/// consumes. All string parsing and rule-conflict validation happens here so
/// the audit itself only ever sees well-formed rules.
pub fn resolve(doc: PolicyDocV1) -> anyhow::Result<ResolvedPolicy> {
    let mut bans: Vec<BanRule> = Vec::new();

    let mut denied_names: BTreeSet<String> = BTreeSet::new();
    for entry in &doc.bans.deny {
        if !denied_names.insert(entry.name.clone()) {
            anyhow::bail!("crate '{}' is denied more than once", entry.name);
        }
        bans.push(BanRule::DenyCrate {
            name: entry.name.clone(),
            reason: entry.reason.clone(),
        });
    }

    let mut seen_skips: BTreeSet<(String, Version)> = BTreeSet::new();
    for entry in &doc.bans.skip {
        let version = Version::parse(&entry.version)
            .with_context(|| format!("invalid skip version for '{}': {}", entry.name, entry.version))?;
        if !seen_skips.insert((entry.name.clone(), version.clone())) {
            anyhow::bail!("duplicate skip entry for {} {}", entry.name, version);
        }
        bans.push(BanRule::SkipVersion {
            name: entry.name.clone(),
            version,
            reason: entry.reason.clone(),
        });
    }

    for entry in &doc.bans.skip_tree {
        // A name cannot be both banned and skip-tree exempted; the rules
        // would silently cancel each other.
        if denied_names.contains(&entry.name) {
            anyhow::bail!(
                "crate '{}' is both denied and skip-tree exempted",
                entry.name
            );
        }
        bans.push(BanRule::SkipTree {
            name: entry.name.clone(),
        });
    }

    let duplicate_tolerance = match doc.bans.duplicate_tolerance.as_deref() {
        None | Some("more-than-one") => DuplicateTolerance::MoreThanOne,
        Some("any") => DuplicateTolerance::Any,
        Some(other) => anyhow::bail!(
            "unknown duplicate_tolerance: {other} (expected 'more-than-one' or 'any')"
        ),
    };

    let mut allow: BTreeSet<LicenseReq> = BTreeSet::new();
    for entry in &doc.licenses.allow {
        let expr =
            parse(entry).with_context(|| format!("invalid license allow entry: {entry}"))?;
        let Expr::License(req) = expr else {
            anyhow::bail!(
                "license allow entry must be a single identifier, not an expression: {entry}"
            );
        };
        let _ = allow.insert(req);
    }

    let confidence_threshold = doc.licenses.confidence_threshold.unwrap_or(0.8);
    anyhow::ensure!(
        (0.0..=1.0).contains(&confidence_threshold),
        "confidence_threshold must be within [0, 1], got {confidence_threshold}"
    );

    let mut clarifications: BTreeMap<String, Clarification> = BTreeMap::new();
    for entry in &doc.licenses.clarifications {
        let expression = parse(&entry.expression)
            .with_context(|| format!("invalid clarification expression for '{}'", entry.name))?;
        let license_files = entry
            .license_files
            .iter()
            .map(|f| {
                validate_sha256(&f.hash)
                    .with_context(|| format!("clarification for '{}', file {}", entry.name, f.path))?;
                Ok((FilePath::new(&f.path), f.hash.to_ascii_lowercase()))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        if clarifications
            .insert(
                entry.name.clone(),
                Clarification {
                    expression,
                    license_files,
                },
            )
            .is_some()
        {
            anyhow::bail!("duplicate clarification for crate '{}'", entry.name);
        }
    }

    Ok(ResolvedPolicy {
        policy: AuditPolicy {
            bans,
            licenses: LicensePolicy {
                allow,
                confidence_threshold,
                clarifications,
            },
            duplicate_tolerance,
        },
        edge_mode: if doc.all_features.unwrap_or(false) {
            EdgeMode::AllFeatures
        } else {
            EdgeMode::DefaultFeatures
        },
    })
}

fn validate_sha256(hash: &str) -> anyhow::Result<()> {
    anyhow::ensure!(
        hash.len() == 64 && hash.chars().all(|c| c.is_ascii_hexdigit()),
        "expected a 64-character hex sha256, got: {hash}"
    );
    Ok(())
}
