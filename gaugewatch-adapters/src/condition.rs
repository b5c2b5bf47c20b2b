//! Alert-rule condition language.
//!
//! Formula-schema alert rules carry a free-form boolean condition such as
//!
//! ```text
//! ${monitor:queue-depth} > 100 || ${monitor:queue-depth} < 5
//! value > 80 && value < 95
//! ```
//!
//! The language is small: comparisons joined by `&&`/`||` (or `and`/`or`),
//! optionally parenthesised. A comparison's operands are a monitor reference
//! (`${monitor:<id>}`), the `value` placeholder, or a numeric literal.
//!
//! [`Condition::parse`] tokenizes and parses the whole text, then reduces it
//! to the pieces a threshold config needs: the first monitor referenced, the
//! first upper bound (`target > N`) and the first lower bound (`target < N`).
//! Comparisons written the other way round (`N < value`) are normalized.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Reference namespace that names a monitor: `${monitor:<id>}`.
pub const MONITOR_REF_KIND: &str = "monitor";

/// Placeholder that stands for "the value of whichever monitor this applies to".
pub const VALUE_PLACEHOLDER: &str = "value";

/// Errors produced while tokenizing or parsing a condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated reference starting at offset {0}")]
    UnterminatedReference(usize),

    #[error("empty reference at offset {0}")]
    EmptyReference(usize),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("expected {expected}, found {found}")]
    Unexpected { expected: &'static str, found: String },

    #[error("condition is empty")]
    Empty,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Equal,
    NotEqual,
}

impl CompareOp {
    /// The operator that keeps the comparison's meaning when operands swap sides.
    fn flipped(self) -> Self {
        match self {
            Self::GreaterThan => Self::LessThan,
            Self::LessThan => Self::GreaterThan,
            Self::GreaterEqual => Self::LessEqual,
            Self::LessEqual => Self::GreaterEqual,
            other => other,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Reference { kind: String, id: String },
    Ident(String),
    Number(f64),
    Op(CompareOp),
    And,
    Or,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Reference { kind, id } => write!(f, "${{{kind}:{id}}}"),
            Token::Ident(name) => write!(f, "'{name}'"),
            Token::Number(n) => write!(f, "{n}"),
            Token::Op(op) => write!(f, "'{op}'"),
            Token::And => f.write_str("'&&'"),
            Token::Or => f.write_str("'||'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

// ============================================================================
// Tokenizer
// ============================================================================

struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, ConditionError> {
        let mut tokens = Vec::new();
        while let Some(&(offset, ch)) = self.chars.peek() {
            match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '$' => tokens.push(self.reference(offset)?),
                '(' => {
                    self.chars.next();
                    tokens.push(Token::LParen);
                }
                ')' => {
                    self.chars.next();
                    tokens.push(Token::RParen);
                }
                '>' | '<' | '=' | '!' => tokens.push(self.operator(offset, ch)?),
                '&' | '|' => tokens.push(self.logical(offset, ch)?),
                c if c.is_ascii_digit() || c == '.' => tokens.push(self.number(offset)?),
                '-' if self.starts_number_after_sign() => tokens.push(self.number(offset)?),
                c if c.is_alphabetic() || c == '_' => tokens.push(self.ident(offset)),
                c => return Err(ConditionError::UnexpectedChar { ch: c, offset }),
            }
        }
        Ok(tokens)
    }

    fn starts_number_after_sign(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some(&(_, c)) if c.is_ascii_digit() || c == '.')
    }

    fn reference(&mut self, start: usize) -> Result<Token, ConditionError> {
        self.chars.next(); // '$'
        match self.chars.next() {
            Some((_, '{')) => {}
            Some((offset, ch)) => return Err(ConditionError::UnexpectedChar { ch, offset }),
            None => return Err(ConditionError::UnterminatedReference(start)),
        }

        let body_start = start + 2;
        let mut body_end = None;
        for (offset, ch) in self.chars.by_ref() {
            if ch == '}' {
                body_end = Some(offset);
                break;
            }
        }
        let body_end = body_end.ok_or(ConditionError::UnterminatedReference(start))?;
        let body = self.src[body_start..body_end].trim();

        let (kind, id) = match body.split_once(':') {
            Some((kind, id)) => (kind.trim(), id.trim()),
            None => ("", body),
        };
        if id.is_empty() {
            return Err(ConditionError::EmptyReference(start));
        }

        Ok(Token::Reference {
            kind: kind.to_string(),
            id: id.to_string(),
        })
    }

    fn operator(&mut self, offset: usize, first: char) -> Result<Token, ConditionError> {
        self.chars.next();
        let followed_by_eq = matches!(self.chars.peek(), Some(&(_, '=')));
        if followed_by_eq {
            self.chars.next();
        }
        let op = match (first, followed_by_eq) {
            ('>', false) => CompareOp::GreaterThan,
            ('>', true) => CompareOp::GreaterEqual,
            ('<', false) => CompareOp::LessThan,
            ('<', true) => CompareOp::LessEqual,
            ('=', true) => CompareOp::Equal,
            ('!', true) => CompareOp::NotEqual,
            (ch, _) => return Err(ConditionError::UnexpectedChar { ch, offset }),
        };
        Ok(Token::Op(op))
    }

    fn logical(&mut self, offset: usize, first: char) -> Result<Token, ConditionError> {
        self.chars.next();
        match self.chars.peek() {
            Some(&(_, c)) if c == first => {
                self.chars.next();
                Ok(if first == '&' { Token::And } else { Token::Or })
            }
            _ => Err(ConditionError::UnexpectedChar { ch: first, offset }),
        }
    }

    fn number(&mut self, start: usize) -> Result<Token, ConditionError> {
        let mut end = start;
        let mut first = true;
        while let Some(&(offset, ch)) = self.chars.peek() {
            let accept = ch.is_ascii_digit() || ch == '.' || (first && ch == '-');
            if !accept {
                break;
            }
            first = false;
            end = offset + ch.len_utf8();
            self.chars.next();
        }
        let text = &self.src[start..end];
        text.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Token::Number)
            .ok_or_else(|| ConditionError::InvalidNumber(text.to_string()))
    }

    fn ident(&mut self, start: usize) -> Token {
        let mut end = start;
        while let Some(&(offset, ch)) = self.chars.peek() {
            if !(ch.is_alphanumeric() || ch == '_' || ch == '.') {
                break;
            }
            end = offset + ch.len_utf8();
            self.chars.next();
        }
        let word = &self.src[start..end];
        if word.eq_ignore_ascii_case("and") {
            Token::And
        } else if word.eq_ignore_ascii_case("or") {
            Token::Or
        } else {
            Token::Ident(word.to_string())
        }
    }
}

// ============================================================================
// Parser
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Monitor(String),
    Value,
    Number(f64),
    Other(String),
}

impl Operand {
    fn is_target(&self) -> bool {
        matches!(self, Operand::Monitor(_) | Operand::Value)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Comparison {
    lhs: Operand,
    op: CompareOp,
    rhs: Operand,
}

impl Comparison {
    /// Reduce to `target op number`, swapping sides if needed.
    fn as_bound(&self) -> Option<(CompareOp, f64)> {
        match (&self.lhs, &self.rhs) {
            (target, Operand::Number(n)) if target.is_target() => Some((self.op, *n)),
            (Operand::Number(n), target) if target.is_target() => Some((self.op.flipped(), *n)),
            _ => None,
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    comparisons: Vec<Comparison>,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn found(token: Option<&Token>) -> String {
        token.map_or_else(|| "end of condition".to_string(), |t| t.to_string())
    }

    fn expr(&mut self) -> Result<(), ConditionError> {
        self.conjunction()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            self.conjunction()?;
        }
        Ok(())
    }

    fn conjunction(&mut self) -> Result<(), ConditionError> {
        self.primary()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            self.primary()?;
        }
        Ok(())
    }

    fn primary(&mut self) -> Result<(), ConditionError> {
        if matches!(self.peek(), Some(Token::LParen)) {
            self.advance();
            self.expr()?;
            return match self.advance() {
                Some(Token::RParen) => Ok(()),
                other => Err(ConditionError::Unexpected {
                    expected: "')'",
                    found: Self::found(other.as_ref()),
                }),
            };
        }
        self.comparison()
    }

    fn comparison(&mut self) -> Result<(), ConditionError> {
        let lhs = self.operand()?;
        let op = match self.advance() {
            Some(Token::Op(op)) => op,
            other => {
                return Err(ConditionError::Unexpected {
                    expected: "comparison operator",
                    found: Self::found(other.as_ref()),
                })
            }
        };
        let rhs = self.operand()?;
        self.comparisons.push(Comparison { lhs, op, rhs });
        Ok(())
    }

    fn operand(&mut self) -> Result<Operand, ConditionError> {
        match self.advance() {
            Some(Token::Reference { kind, id }) if kind == MONITOR_REF_KIND => {
                Ok(Operand::Monitor(id))
            }
            Some(Token::Reference { kind, id }) => Ok(Operand::Other(format!("{kind}:{id}"))),
            Some(Token::Ident(name)) if name.eq_ignore_ascii_case(VALUE_PLACEHOLDER) => {
                Ok(Operand::Value)
            }
            Some(Token::Ident(name)) => Ok(Operand::Other(name)),
            Some(Token::Number(n)) => Ok(Operand::Number(n)),
            other => Err(ConditionError::Unexpected {
                expected: "monitor reference, 'value' or number",
                found: Self::found(other.as_ref()),
            }),
        }
    }
}

// ============================================================================
// Condition
// ============================================================================

/// The threshold-relevant content of a parsed condition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Condition {
    /// First monitor referenced; `None` makes the rule global.
    pub monitor_id: Option<String>,
    /// Bound from the first `target > N` comparison.
    pub upper: Option<f64>,
    /// Bound from the first `target < N` comparison.
    pub lower: Option<f64>,
}

impl Condition {
    /// Parse a condition string.
    ///
    /// Succeeds for any syntactically valid condition, even one that yields
    /// no thresholds; check [`Condition::has_threshold`] before using it.
    pub fn parse(text: &str) -> Result<Self, ConditionError> {
        let tokens = Lexer::new(text).tokenize()?;
        if tokens.is_empty() {
            return Err(ConditionError::Empty);
        }

        let monitor_id = tokens.iter().find_map(|t| match t {
            Token::Reference { kind, id } if kind == MONITOR_REF_KIND => Some(id.clone()),
            _ => None,
        });

        let mut parser = Parser {
            tokens,
            pos: 0,
            comparisons: Vec::new(),
        };
        parser.expr()?;
        if let Some(extra) = parser.peek() {
            return Err(ConditionError::Unexpected {
                expected: "'&&', '||' or end of condition",
                found: extra.to_string(),
            });
        }

        let mut condition = Condition {
            monitor_id,
            ..Default::default()
        };
        for (op, n) in parser.comparisons.iter().filter_map(Comparison::as_bound) {
            match op {
                CompareOp::GreaterThan if condition.upper.is_none() => condition.upper = Some(n),
                CompareOp::LessThan if condition.lower.is_none() => condition.lower = Some(n),
                _ => {}
            }
        }
        Ok(condition)
    }

    /// True if at least one bound was extracted.
    pub fn has_threshold(&self) -> bool {
        self.upper.is_some() || self.lower.is_some()
    }

    /// Render bounds back into condition text the parser accepts.
    ///
    /// Without a monitor id the comparisons target the `value` placeholder.
    pub fn render(monitor_id: Option<&str>, upper: Option<f64>, lower: Option<f64>) -> String {
        let target = match monitor_id {
            Some(id) => format!("${{{MONITOR_REF_KIND}:{id}}}"),
            None => VALUE_PLACEHOLDER.to_string(),
        };
        let mut parts = Vec::new();
        if let Some(u) = upper {
            parts.push(format!("{target} > {u}"));
        }
        if let Some(l) = lower {
            parts.push(format!("{target} < {l}"));
        }
        parts.join(" || ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_upper_bound() {
        let c = Condition::parse("${monitor:m1} > 100").unwrap();
        assert_eq!(c.monitor_id.as_deref(), Some("m1"));
        assert_eq!(c.upper, Some(100.0));
        assert_eq!(c.lower, None);
    }

    #[test]
    fn test_global_lower_bound() {
        let c = Condition::parse("value < 5").unwrap();
        assert_eq!(c.monitor_id, None);
        assert_eq!(c.upper, None);
        assert_eq!(c.lower, Some(5.0));
    }

    #[test]
    fn test_no_operators_is_rejected() {
        assert!(Condition::parse("foo bar").is_err());
        assert_eq!(Condition::parse("   "), Err(ConditionError::Empty));
    }

    #[test]
    fn test_both_bounds_with_or() {
        let c = Condition::parse("${monitor:disk} > 90 || ${monitor:disk} < 10").unwrap();
        assert_eq!(c.monitor_id.as_deref(), Some("disk"));
        assert_eq!(c.upper, Some(90.0));
        assert_eq!(c.lower, Some(10.0));
    }

    #[test]
    fn test_word_operators_and_parens() {
        let c = Condition::parse("(value > 1.5 and value < 0.25) OR value > 7").unwrap();
        assert_eq!(c.upper, Some(1.5));
        assert_eq!(c.lower, Some(0.25));
    }

    #[test]
    fn test_reversed_comparison_is_normalized() {
        let c = Condition::parse("100 < ${monitor:m1}").unwrap();
        assert_eq!(c.upper, Some(100.0));
        assert_eq!(c.lower, None);
    }

    #[test]
    fn test_negative_and_zero_literals() {
        let c = Condition::parse("value < -3.5 || value > 0").unwrap();
        assert_eq!(c.lower, Some(-3.5));
        assert_eq!(c.upper, Some(0.0));
    }

    #[test]
    fn test_non_strict_operators_give_no_threshold() {
        let c = Condition::parse("value >= 10 && value != 3").unwrap();
        assert!(!c.has_threshold());
    }

    #[test]
    fn test_unknown_operand_gives_no_threshold() {
        let c = Condition::parse("foo > 3").unwrap();
        assert!(!c.has_threshold());
        let c = Condition::parse("${card:x} > 3").unwrap();
        assert_eq!(c.monitor_id, None);
        assert!(!c.has_threshold());
    }

    #[test]
    fn test_first_reference_and_first_bound_win() {
        let c = Condition::parse("${monitor:a} > 1 && ${monitor:b} > 2").unwrap();
        assert_eq!(c.monitor_id.as_deref(), Some("a"));
        assert_eq!(c.upper, Some(1.0));
    }

    #[test]
    fn test_lexical_errors() {
        assert_eq!(
            Condition::parse("${monitor:m1 > 3"),
            Err(ConditionError::UnterminatedReference(0))
        );
        assert!(matches!(
            Condition::parse("value > 1.2.3"),
            Err(ConditionError::InvalidNumber(_))
        ));
        assert!(matches!(
            Condition::parse("value # 3"),
            Err(ConditionError::UnexpectedChar { ch: '#', .. })
        ));
        assert_eq!(
            Condition::parse("${monitor:} > 1"),
            Err(ConditionError::EmptyReference(0))
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(Condition::parse("value > 1 &&").is_err());
        assert!(Condition::parse("(value > 1").is_err());
        assert!(Condition::parse("value > 1 value < 2").is_err());
    }

    #[test]
    fn test_render_roundtrip() {
        let text = Condition::render(Some("m1"), Some(100.0), Some(5.0));
        assert_eq!(text, "${monitor:m1} > 100 || ${monitor:m1} < 5");
        let c = Condition::parse(&text).unwrap();
        assert_eq!(c.monitor_id.as_deref(), Some("m1"));
        assert_eq!((c.upper, c.lower), (Some(100.0), Some(5.0)));

        assert_eq!(Condition::render(None, None, Some(0.5)), "value < 0.5");
    }
}
