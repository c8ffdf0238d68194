//! SPDX license expression parsing and strict allow-list evaluation.
//!
//! Input: expression text such as `ISC AND MIT AND OpenSSL` or
//! `MIT OR (Apache-2.0 WITH LLVM-exception)`.
//! Output: an expression tree evaluated against an allow set with no partial
//! credit: `AND` needs every operand allowed, `OR` needs one operand subtree
//! fully allowed, and a `WITH` clause is a compound identifier distinct from
//! the bare license.

#![forbid(unsafe_code)]

mod eval;
mod expr;
mod parse;

pub use eval::is_allowed;
pub use expr::{Expr, LicenseReq};
pub use parse::{parse, ExpressionSyntaxError};
