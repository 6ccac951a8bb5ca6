use super::{BinaryOp, Expr, Variable};
use crate::config::CombatConfig;

/// Errors raised while parsing an expression.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("expression is empty")]
    Empty,

    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),

    #[error("unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("unexpected {found} at offset {pos}")]
    UnexpectedToken { found: String, pos: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unclosed parenthesis opened at offset {pos}")]
    Unclosed { pos: usize },

    #[error("trailing input at offset {pos}")]
    TrailingInput { pos: usize },

    #[error("expression nests deeper than {max} levels")]
    TooDeep { max: usize },
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(value) => format!("number {value}"),
            Self::Ident(name) => format!("identifier '{name}'"),
            Self::Plus => "'+'".into(),
            Self::Minus => "'-'".into(),
            Self::Star => "'*'".into(),
            Self::Slash => "'/'".into(),
            Self::LParen => "'('".into(),
            Self::RParen => "')'".into(),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        let single = match ch {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = single {
            chars.next();
            tokens.push((pos, token));
            continue;
        }

        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut end = pos;
            while let Some(&(idx, c)) = chars.peek() {
                if !(c.is_ascii_digit() || c == '.') {
                    break;
                }
                end = idx + c.len_utf8();
                chars.next();
            }
            let text = &source[pos..end];
            let value = text
                .parse::<f64>()
                .map_err(|_| ExprError::InvalidNumber(text.to_owned()))?;
            tokens.push((pos, Token::Number(value)));
        } else if ch.is_ascii_alphabetic() || ch == '_' {
            let mut end = pos;
            while let Some(&(idx, c)) = chars.peek() {
                if !(c.is_ascii_alphanumeric() || c == '_' || c == '.') {
                    break;
                }
                end = idx + c.len_utf8();
                chars.next();
            }
            tokens.push((pos, Token::Ident(source[pos..end].to_owned())));
        } else {
            return Err(ExprError::UnexpectedChar { ch, pos });
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(_, token)| token)
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let next = self.tokens.get(self.cursor).cloned();
        if next.is_some() {
            self.cursor += 1;
        }
        next
    }

    fn check_depth(depth: usize) -> Result<(), ExprError> {
        if depth > CombatConfig::MAX_EXPR_DEPTH {
            return Err(ExprError::TooDeep {
                max: CombatConfig::MAX_EXPR_DEPTH,
            });
        }
        Ok(())
    }

    fn expression(&mut self, depth: usize) -> Result<Expr, ExprError> {
        Self::check_depth(depth)?;
        let mut lhs = self.term(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.term(depth)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn term(&mut self, depth: usize) -> Result<Expr, ExprError> {
        let mut lhs = self.unary(depth)?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.advance();
            let rhs = self.unary(depth)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn unary(&mut self, depth: usize) -> Result<Expr, ExprError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Self::check_depth(depth + 1)?;
                Ok(Expr::Neg(Box::new(self.unary(depth + 1)?)))
            }
            Some(Token::Plus) => {
                self.advance();
                Self::check_depth(depth + 1)?;
                self.unary(depth + 1)
            }
            _ => self.primary(depth),
        }
    }

    fn primary(&mut self, depth: usize) -> Result<Expr, ExprError> {
        match self.advance() {
            Some((_, Token::Number(value))) => Ok(Expr::Number(value)),
            Some((_, Token::Ident(name))) => Variable::from_name(&name)
                .map(Expr::Var)
                .ok_or(ExprError::UnknownVariable(name)),
            Some((open, Token::LParen)) => {
                let inner = self.expression(depth + 1)?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(inner),
                    _ => Err(ExprError::Unclosed { pos: open }),
                }
            }
            Some((pos, token)) => Err(ExprError::UnexpectedToken {
                found: token.describe(),
                pos,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

pub(super) fn parse(source: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }

    let mut parser = Parser { tokens, cursor: 0 };
    let expr = parser.expression(0)?;
    if let Some((pos, _)) = parser.tokens.get(parser.cursor) {
        return Err(ExprError::TrailingInput { pos: *pos });
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_precedence_and_associativity() {
        let expr = parse("1 + 2 * 3 - 4 / 2").unwrap();
        assert_eq!(expr.to_string(), "((1 + (2 * 3)) - (4 / 2))");

        let expr = parse("(1 + 2) * -effect.potency").unwrap();
        assert_eq!(expr.to_string(), "((1 + 2) * -effect.potency)");
    }

    #[test]
    fn accepts_every_whitelisted_variable() {
        for name in [
            "effect.potency",
            "effect.duration",
            "effect.elapsed",
            "effect.target_count",
        ] {
            assert!(parse(name).is_ok(), "{name} should parse");
        }
    }

    #[test]
    fn rejects_names_outside_the_whitelist() {
        assert_eq!(
            parse("__import__"),
            Err(ExprError::UnknownVariable("__import__".into()))
        );
        assert_eq!(
            parse("effect.source.attack"),
            Err(ExprError::UnknownVariable("effect.source.attack".into()))
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(parse(""), Err(ExprError::Empty));
        assert_eq!(parse("   "), Err(ExprError::Empty));
        assert_eq!(parse("1 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(parse("(1 + 2"), Err(ExprError::Unclosed { pos: 0 }));
        assert_eq!(parse("2 3"), Err(ExprError::TrailingInput { pos: 2 }));
        assert_eq!(parse("1.2.3"), Err(ExprError::InvalidNumber("1.2.3".into())));
        assert!(matches!(
            parse("2 ** 3"),
            Err(ExprError::UnexpectedToken { pos: 3, .. })
        ));
        assert_eq!(
            parse("len('x')"),
            Err(ExprError::UnexpectedChar { ch: '\'', pos: 4 })
        );
    }

    #[test]
    fn bounds_nesting_depth() {
        let deep = format!("{}1{}", "(".repeat(64), ")".repeat(64));
        assert!(matches!(parse(&deep), Err(ExprError::TooDeep { .. })));

        let negations = format!("{}1", "-".repeat(64));
        assert!(matches!(parse(&negations), Err(ExprError::TooDeep { .. })));

        let shallow = format!("{}1{}", "(".repeat(8), ")".repeat(8));
        assert_eq!(parse(&shallow), Ok(Expr::Number(1.0)));
    }
}
