use crate::expr::{Expr, LicenseReq};
use std::collections::BTreeSet;

/// Strict allow-list evaluation.
///
/// An expression is allowed iff:
/// - a leaf requirement appears verbatim in `allow`,
/// - every operand of an `AND` is allowed,
/// - at least one operand subtree of an `OR` is fully allowed.
pub fn is_allowed(expr: &Expr, allow: &BTreeSet<LicenseReq>) -> bool {
    match expr {
        Expr::License(req) => allow.contains(req),
        Expr::And(operands) => operands.iter().all(|e| is_allowed(e, allow)),
        Expr::Or(operands) => operands.iter().any(|e| is_allowed(e, allow)),
    }
}
