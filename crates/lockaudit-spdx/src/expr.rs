use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single license requirement: a bare identifier or a `WITH` exception pair.
///
/// `GPL-2.0-only WITH Classpath-exception-2.0` is a distinct requirement from
/// `GPL-2.0-only`; an allow-list entry for one never satisfies the other.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub struct LicenseReq {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl LicenseReq {
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exception: None,
        }
    }

    pub fn with_exception(id: impl Into<String>, exception: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            exception: Some(exception.into()),
        }
    }
}

impl std::fmt::Display for LicenseReq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.exception {
            Some(exc) => write!(f, "{} WITH {}", self.id, exc),
            None => f.write_str(&self.id),
        }
    }
}

/// Boolean license expression tree.
///
/// `And`/`Or` nodes are n-ary: the parser flattens `A AND B AND C` into one
/// node so evaluation and display stay close to the source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    License(LicenseReq),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::License(req) => write!(f, "{req}"),
            Expr::And(operands) => write_joined(f, operands, " AND ", NeedsParens::OrOnly),
            Expr::Or(operands) => write_joined(f, operands, " OR ", NeedsParens::Never),
        }
    }
}

#[derive(Clone, Copy)]
enum NeedsParens {
    Never,
    OrOnly,
}

fn write_joined(
    f: &mut std::fmt::Formatter<'_>,
    operands: &[Expr],
    sep: &str,
    parens: NeedsParens,
) -> std::fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        let wrap = matches!((parens, operand), (NeedsParens::OrOnly, Expr::Or(_)));
        if wrap {
            write!(f, "({operand})")?;
        } else {
            write!(f, "{operand}")?;
        }
    }
    Ok(())
}
