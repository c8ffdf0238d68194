//! Effective-license resolution.
//!
//! Priority order: a clarification (hash-verified manual override) wins
//! unconditionally; otherwise the declared metadata expression; otherwise a
//! confidence-scored text match of shipped license files against a canonical
//! corpus. Anything below the confidence threshold stays `Unresolved`, which
//! downstream is always a violation.

use crate::error::AuditError;
use crate::policy::LicensePolicy;
use lockaudit_graph::Package;
use lockaudit_spdx::{parse, Expr, LicenseReq};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// The effective license of one package, tagged with how it was established.
#[derive(Clone, Debug, PartialEq)]
pub enum LicenseOutcome {
    /// Parsed from declared metadata, or inferred from license-file text at
    /// or above the confidence threshold.
    Declared(Expr),
    /// A hash-verified clarification override.
    ClarifiedOverride(Expr),
    /// No trustworthy evidence; carries the reason.
    Unresolved(String),
}

impl LicenseOutcome {
    pub fn expression(&self) -> Option<&Expr> {
        match self {
            LicenseOutcome::Declared(expr) | LicenseOutcome::ClarifiedOverride(expr) => Some(expr),
            LicenseOutcome::Unresolved(_) => None,
        }
    }
}

/// Canonical license texts used for confidence-scored matching.
#[derive(Clone, Debug, Default)]
pub struct CanonicalTexts {
    texts: BTreeMap<String, Vec<String>>,
}

impl CanonicalTexts {
    /// A small built-in corpus covering the common permissive licenses.
    /// Texts are stored pre-tokenized; matching is token-set based, so
    /// formatting and copyright lines in the candidate do not matter much.
    pub fn builtin() -> Self {
        let mut corpus = Self::default();
        corpus.insert("MIT", texts::MIT);
        corpus.insert("ISC", texts::ISC);
        corpus.insert("Apache-2.0", texts::APACHE_2_0);
        corpus.insert("BSD-3-Clause", texts::BSD_3_CLAUSE);
        corpus.insert("Zlib", texts::ZLIB);
        corpus
    }

    pub fn insert(&mut self, spdx_id: &str, text: &str) {
        let _ = self.texts.insert(spdx_id.to_string(), tokenize(text));
    }

    fn best_match(&self, candidate: &str) -> Option<(String, f64)> {
        let candidate = tokenize(candidate);
        self.texts
            .iter()
            .map(|(id, tokens)| (id.clone(), dice_similarity(&candidate, tokens)))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

/// Sørensen–Dice coefficient over token sets. Bounded, symmetric, and cheap;
/// good enough to separate "this is the MIT text" from "this is something
/// else" without a full classifier.
fn dice_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let a: BTreeSet<&str> = a.iter().map(String::as_str).collect();
    let b: BTreeSet<&str> = b.iter().map(String::as_str).collect();
    let shared = a.intersection(&b).count();
    (2.0 * shared as f64) / (a.len() + b.len()) as f64
}

pub(crate) fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug)]
pub struct LicenseResolver<'a> {
    policy: &'a LicensePolicy,
    corpus: CanonicalTexts,
}

impl<'a> LicenseResolver<'a> {
    pub fn new(policy: &'a LicensePolicy) -> Self {
        Self {
            policy,
            corpus: CanonicalTexts::builtin(),
        }
    }

    pub fn with_corpus(policy: &'a LicensePolicy, corpus: CanonicalTexts) -> Self {
        Self { policy, corpus }
    }

    /// Determine the effective license expression for `package`.
    ///
    /// Only structural failures are `Err`: a stale or broken clarification
    /// must abort the run rather than silently pass, and a declared
    /// expression that does not parse poisons any verdict built on it.
    pub fn resolve(&self, package: &Package) -> Result<LicenseOutcome, AuditError> {
        if let Some(clarification) = self.policy.clarifications.get(&package.name) {
            // The clarification exists precisely because inference is known
            // to be wrong or ambiguous here, so it bypasses everything else.
            for (path, expected) in &clarification.license_files {
                let Some(file) = package.license_files.iter().find(|f| &f.path == path) else {
                    return Err(AuditError::MissingClarificationFile {
                        package: package.id_str(),
                        path: path.clone(),
                    });
                };
                let actual = sha256_hex(&file.content);
                if &actual != expected {
                    return Err(AuditError::StaleClarification {
                        package: package.id_str(),
                        path: path.clone(),
                        expected: expected.clone(),
                        actual,
                    });
                }
            }
            return Ok(LicenseOutcome::ClarifiedOverride(
                clarification.expression.clone(),
            ));
        }

        if let Some(declared) = &package.declared_license {
            let expr = parse(declared).map_err(|source| AuditError::MalformedExpression {
                package: package.id_str(),
                source,
            })?;
            return Ok(LicenseOutcome::Declared(expr));
        }

        let mut best: Option<(String, f64)> = None;
        for file in &package.license_files {
            if let Some((id, score)) = self.corpus.best_match(&file.content) {
                if best.as_ref().is_none_or(|(_, prev)| score > *prev) {
                    best = Some((id, score));
                }
            }
        }
        match best {
            Some((id, score)) if score >= self.policy.confidence_threshold => Ok(
                LicenseOutcome::Declared(Expr::License(LicenseReq::bare(id))),
            ),
            Some((id, score)) => Ok(LicenseOutcome::Unresolved(format!(
                "best license-text match {id} scored {score:.2}, below confidence threshold {:.2}",
                self.policy.confidence_threshold
            ))),
            None => Ok(LicenseOutcome::Unresolved(
                "no declared license and no license files to match".to_string(),
            )),
        }
    }
}

mod texts {
    pub const MIT: &str = include_str!("license_texts/MIT.txt");
    pub const ISC: &str = include_str!("license_texts/ISC.txt");
    pub const APACHE_2_0: &str = include_str!("license_texts/Apache-2.0.txt");
    pub const BSD_3_CLAUSE: &str = include_str!("license_texts/BSD-3-Clause.txt");
    pub const ZLIB: &str = include_str!("license_texts/Zlib.txt");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Clarification;
    use crate::test_support::{pkg, pkg_with_license_file};
    use lockaudit_graph::{DependencyGraph, EdgeMode, Resolution};
    use lockaudit_types::FilePath;

    fn build_one(package: lockaudit_graph::ResolvedPackage) -> DependencyGraph {
        DependencyGraph::build(
            Resolution {
                packages: vec![package],
            },
            EdgeMode::DefaultFeatures,
        )
        .expect("single package graph")
    }

    fn policy() -> LicensePolicy {
        LicensePolicy::default()
    }

    #[test]
    fn declared_metadata_parses_to_declared_outcome() {
        let mut package = pkg("serde", "1.0.0", &[]);
        package.declared_license = Some("MIT OR Apache-2.0".to_string());
        let graph = build_one(package);
        let policy = policy();
        let resolver = LicenseResolver::new(&policy);

        let outcome = resolver.resolve(graph.package(graph.by_name("serde")[0])).unwrap();
        assert_eq!(outcome, LicenseOutcome::Declared(parse("MIT OR Apache-2.0").unwrap()));
    }

    #[test]
    fn malformed_declared_expression_is_fatal() {
        let mut package = pkg("broken", "1.0.0", &[]);
        package.declared_license = Some("MIT OR".to_string());
        let graph = build_one(package);
        let policy = policy();
        let resolver = LicenseResolver::new(&policy);

        let err = resolver
            .resolve(graph.package(graph.by_name("broken")[0]))
            .unwrap_err();
        assert!(matches!(err, AuditError::MalformedExpression { .. }));
    }

    #[test]
    fn clarification_with_verified_hash_overrides_inference() {
        let content = "The legal text inference always gets wrong.";
        let package = pkg_with_license_file("ring", "0.17.0", "LICENSE", content);
        let graph = build_one(package);

        let mut policy = policy();
        let _ = policy.clarifications.insert(
            "ring".to_string(),
            Clarification {
                expression: parse("ISC AND MIT AND OpenSSL").unwrap(),
                license_files: vec![(FilePath::new("LICENSE"), sha256_hex(content))],
            },
        );
        let resolver = LicenseResolver::new(&policy);

        let outcome = resolver.resolve(graph.package(graph.by_name("ring")[0])).unwrap();
        assert_eq!(
            outcome,
            LicenseOutcome::ClarifiedOverride(parse("ISC AND MIT AND OpenSSL").unwrap()),
        );
    }

    #[test]
    fn clarification_hash_mismatch_is_fatal() {
        let package = pkg_with_license_file("ring", "0.17.0", "LICENSE", "edited text");
        let graph = build_one(package);

        let mut policy = policy();
        let _ = policy.clarifications.insert(
            "ring".to_string(),
            Clarification {
                expression: parse("ISC").unwrap(),
                license_files: vec![(FilePath::new("LICENSE"), sha256_hex("original text"))],
            },
        );
        let resolver = LicenseResolver::new(&policy);

        let err = resolver
            .resolve(graph.package(graph.by_name("ring")[0]))
            .unwrap_err();
        assert!(matches!(err, AuditError::StaleClarification { .. }));
    }

    #[test]
    fn clarification_missing_file_is_fatal() {
        let package = pkg("ring", "0.17.0", &[]);
        let graph = build_one(package);

        let mut policy = policy();
        let _ = policy.clarifications.insert(
            "ring".to_string(),
            Clarification {
                expression: parse("ISC").unwrap(),
                license_files: vec![(FilePath::new("LICENSE"), sha256_hex("whatever"))],
            },
        );
        let resolver = LicenseResolver::new(&policy);

        let err = resolver
            .resolve(graph.package(graph.by_name("ring")[0]))
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingClarificationFile { .. }));
    }

    #[test]
    fn license_file_text_matches_above_threshold() {
        let package =
            pkg_with_license_file("tiny", "0.1.0", "LICENSE", super::texts::MIT);
        let graph = build_one(package);
        let policy = policy();
        let resolver = LicenseResolver::new(&policy);

        let outcome = resolver.resolve(graph.package(graph.by_name("tiny")[0])).unwrap();
        assert_eq!(
            outcome,
            LicenseOutcome::Declared(Expr::License(LicenseReq::bare("MIT"))),
        );
    }

    #[test]
    fn low_confidence_match_stays_unresolved() {
        let package = pkg_with_license_file(
            "mystery",
            "0.1.0",
            "COPYING",
            "All rights reserved. Ask legal before use.",
        );
        let graph = build_one(package);
        let policy = policy();
        let resolver = LicenseResolver::new(&policy);

        let outcome = resolver
            .resolve(graph.package(graph.by_name("mystery")[0]))
            .unwrap();
        assert!(matches!(outcome, LicenseOutcome::Unresolved(_)));
    }

    #[test]
    fn no_evidence_at_all_is_unresolved() {
        let package = pkg("bare", "0.1.0", &[]);
        let graph = build_one(package);
        let policy = policy();
        let resolver = LicenseResolver::new(&policy);

        let outcome = resolver.resolve(graph.package(graph.by_name("bare")[0])).unwrap();
        assert_eq!(
            outcome,
            LicenseOutcome::Unresolved(
                "no declared license and no license files to match".to_string(),
            ),
        );
    }

    #[test]
    fn dice_similarity_separates_canonical_texts() {
        let corpus = CanonicalTexts::builtin();
        let (id, score) = corpus.best_match(super::texts::ISC).unwrap();
        assert_eq!(id, "ISC");
        assert!(score > 0.95, "self-match scored {score}");

        let (_, noise) = corpus.best_match("completely unrelated prose").unwrap();
        assert!(noise < 0.2, "noise scored {noise}");
    }
}
