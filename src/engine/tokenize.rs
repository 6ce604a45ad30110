//! Display tokenizer for equations.
//!
//! Splits an expression into literal fragments and folds `a/b` into a
//! [`Token::Fraction`] so the front-end can stack it. Output is for layout
//! only and is never fed back into matching.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)|[=+\-*/]|[0-9A-Za-z.]+").expect("token pattern is valid")
});

const OPERATORS: [char; 5] = ['=', '+', '-', '*', '/'];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Operator or operand, rendered as-is left to right.
    Literal(String),
    Fraction {
        numerator: String,
        denominator: String,
    },
}

impl Token {
    pub fn literal(text: &str) -> Self {
        Token::Literal(text.to_string())
    }

    pub fn fraction(numerator: &str, denominator: &str) -> Self {
        Token::Fraction {
            numerator: numerator.to_string(),
            denominator: denominator.to_string(),
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, Token::Literal(text) if is_operator(text))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RawKind {
    Operator,
    Operand,
    Unrecognized,
}

struct Raw<'a> {
    text: &'a str,
    kind: RawKind,
}

fn is_operator(text: &str) -> bool {
    let mut chars = text.chars();
    matches!((chars.next(), chars.next()), (Some(ch), None) if OPERATORS.contains(&ch))
}

fn scan(expression: &str) -> Vec<Raw<'_>> {
    let mut raw = Vec::new();
    let mut last_end = 0;

    // Unrecognized text (CJK, display glyphs, stray parens) is kept so
    // nothing the learner typed disappears from the preview.
    for m in TOKEN_RE.find_iter(expression) {
        for piece in expression[last_end..m.start()].split_whitespace() {
            raw.push(Raw {
                text: piece,
                kind: RawKind::Unrecognized,
            });
        }
        let text = m.as_str();
        let kind = if is_operator(text) {
            RawKind::Operator
        } else {
            RawKind::Operand
        };
        raw.push(Raw { text, kind });
        last_end = m.end();
    }
    for piece in expression[last_end..].split_whitespace() {
        raw.push(Raw {
            text: piece,
            kind: RawKind::Unrecognized,
        });
    }

    raw
}

/// Strip one enclosing pair of parentheses, if present.
fn unwrap_group(text: &str) -> &str {
    text.strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(text)
}

/// Tokenize `expression` for display, folding `operand / operand` into fractions.
///
/// Single left-to-right pass: nested fractions are not built, and a `/`
/// without an operand on both sides stays a literal operator.
pub fn tokenize(expression: &str) -> Vec<Token> {
    let raw = scan(expression);
    let mut tokens: Vec<Token> = Vec::with_capacity(raw.len());
    let mut last_was_operand = false;

    let mut i = 0;
    while i < raw.len() {
        let current = &raw[i];
        let next_is_operand = raw
            .get(i + 1)
            .is_some_and(|next| next.kind == RawKind::Operand);

        if current.text == "/" && last_was_operand && next_is_operand {
            if let Some(Token::Literal(numerator)) = tokens.pop() {
                let denominator = raw[i + 1].text;
                tokens.push(Token::fraction(
                    unwrap_group(&numerator),
                    unwrap_group(denominator),
                ));
                last_was_operand = false;
                i += 2;
                continue;
            }
        }

        tokens.push(Token::literal(current.text));
        last_was_operand = current.kind == RawKind::Operand;
        i += 1;
    }

    tokens
}
