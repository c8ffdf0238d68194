use crate::expr::{Expr, LicenseReq};
use thiserror::Error;

/// Malformed boolean grammar in a license expression. Always fatal: a report
/// built on a misparsed expression cannot be trusted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ExpressionSyntaxError {
    #[error("empty license expression")]
    Empty,

    #[error("unexpected `{found}` at offset {offset}, expected {expected}")]
    Unexpected {
        offset: usize,
        found: String,
        expected: &'static str,
    },

    #[error("unexpected end of expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("unbalanced `(` at offset {offset}")]
    UnbalancedParen { offset: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Ident(String),
    And,
    Or,
    With,
    Open,
    Close,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(id) => id.clone(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::With => "WITH".to_string(),
            Token::Open => "(".to_string(),
            Token::Close => ")".to_string(),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '+'
}

fn lex(text: &str) -> Result<Vec<(usize, Token)>, ExpressionSyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            let _ = chars.next();
            continue;
        }
        if c == '(' {
            let _ = chars.next();
            tokens.push((offset, Token::Open));
            continue;
        }
        if c == ')' {
            let _ = chars.next();
            tokens.push((offset, Token::Close));
            continue;
        }
        if !is_ident_char(c) {
            return Err(ExpressionSyntaxError::Unexpected {
                offset,
                found: c.to_string(),
                expected: "a license identifier, `(`, or `)`",
            });
        }

        let mut end = offset;
        while let Some(&(i, c)) = chars.peek() {
            if !is_ident_char(c) {
                break;
            }
            end = i + c.len_utf8();
            let _ = chars.next();
        }
        let word = &text[offset..end];
        // SPDX operators are case-sensitive keywords.
        let token = match word {
            "AND" => Token::And,
            "OR" => Token::Or,
            "WITH" => Token::With,
            _ => Token::Ident(word.to_string()),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<(usize, Token)> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    // or_expr := and_expr (OR and_expr)*
    fn or_expr(&mut self) -> Result<Expr, ExpressionSyntaxError> {
        let mut operands = vec![self.and_expr()?];
        while matches!(self.peek(), Some((_, Token::Or))) {
            let _ = self.next();
            operands.push(self.and_expr()?);
        }
        Ok(fold(operands, Expr::Or))
    }

    // and_expr := primary (AND primary)*
    fn and_expr(&mut self) -> Result<Expr, ExpressionSyntaxError> {
        let mut operands = vec![self.primary()?];
        while matches!(self.peek(), Some((_, Token::And))) {
            let _ = self.next();
            operands.push(self.primary()?);
        }
        Ok(fold(operands, Expr::And))
    }

    // primary := '(' or_expr ')' | IDENT (WITH IDENT)?
    fn primary(&mut self) -> Result<Expr, ExpressionSyntaxError> {
        match self.next() {
            Some((open_offset, Token::Open)) => {
                let inner = self.or_expr()?;
                match self.next() {
                    Some((_, Token::Close)) => Ok(inner),
                    Some((offset, token)) => Err(ExpressionSyntaxError::Unexpected {
                        offset,
                        found: token.describe(),
                        expected: "`)`",
                    }),
                    None => Err(ExpressionSyntaxError::UnbalancedParen {
                        offset: open_offset,
                    }),
                }
            }
            Some((_, Token::Ident(id))) => {
                if matches!(self.peek(), Some((_, Token::With))) {
                    let _ = self.next();
                    match self.next() {
                        Some((_, Token::Ident(exception))) => {
                            Ok(Expr::License(LicenseReq::with_exception(id, exception)))
                        }
                        Some((offset, token)) => Err(ExpressionSyntaxError::Unexpected {
                            offset,
                            found: token.describe(),
                            expected: "an exception identifier after WITH",
                        }),
                        None => Err(ExpressionSyntaxError::UnexpectedEnd {
                            expected: "an exception identifier after WITH",
                        }),
                    }
                } else {
                    Ok(Expr::License(LicenseReq::bare(id)))
                }
            }
            Some((offset, token)) => Err(ExpressionSyntaxError::Unexpected {
                offset,
                found: token.describe(),
                expected: "a license identifier or `(`",
            }),
            None => Err(ExpressionSyntaxError::UnexpectedEnd {
                expected: "a license identifier or `(`",
            }),
        }
    }
}

fn fold(mut operands: Vec<Expr>, variant: fn(Vec<Expr>) -> Expr) -> Expr {
    if operands.len() == 1 {
        operands.remove(0)
    } else {
        variant(operands)
    }
}

/// Parse an SPDX-style license expression into a tree.
pub fn parse(text: &str) -> Result<Expr, ExpressionSyntaxError> {
    let tokens = lex(text)?;
    if tokens.is_empty() {
        return Err(ExpressionSyntaxError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.or_expr()?;

    if let Some((offset, token)) = parser.peek() {
        return Err(ExpressionSyntaxError::Unexpected {
            offset: *offset,
            found: token.describe(),
            expected: "AND, OR, or end of expression",
        });
    }
    Ok(expr)
}
