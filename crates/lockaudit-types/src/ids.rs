//! Stable identifiers for checks and diagnostic codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_BANS_DENIED: &str = "bans.denied";
pub const CHECK_BANS_MULTIPLE_VERSIONS: &str = "bans.multiple_versions";
pub const CHECK_BANS_STALE_EXCEPTION: &str = "bans.stale_exception";
pub const CHECK_LICENSES_ALLOW: &str = "licenses.allow";

// Codes: bans.denied
pub const CODE_DENIED_CRATE: &str = "denied_crate";

// Codes: bans.multiple_versions
pub const CODE_DUPLICATE_VERSIONS: &str = "duplicate_versions";

// Codes: bans.stale_exception
pub const CODE_STALE_SKIP: &str = "stale_skip";
pub const CODE_STALE_SKIP_TREE: &str = "stale_skip_tree";

// Codes: licenses.allow
pub const CODE_DISALLOWED_EXPRESSION: &str = "disallowed_expression";
pub const CODE_UNRESOLVED_LICENSE: &str = "unresolved_license";
