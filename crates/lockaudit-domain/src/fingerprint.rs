use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a diagnostic.
///
/// Identity fields:
/// - check_id
/// - code
/// - package name
/// - package version (if the diagnostic has a subject)
/// - salient detail (offending versions, rule name, ...)
pub fn fingerprint(
    check_id: &str,
    code: &str,
    name: &str,
    version: Option<&str>,
    salient: &str,
) -> String {
    let mut parts = vec![check_id, code, name];
    if let Some(v) = version {
        parts.push(v);
    }
    parts.push(salient);
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
