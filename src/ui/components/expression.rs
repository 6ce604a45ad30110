use std::ops::Range;

use ratatui::text::Span;

use simeq::engine::Token;

const FRACTION_BAR: char = '─';

fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// How an operator literal is shown; `*` reads as a times sign.
fn operator_glyph(text: &str) -> &str {
    match text {
        "*" => "×",
        _ => text,
    }
}

fn centered(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(display_width(text));
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

/// An expression laid out on three rows so fractions can stack.
///
/// Rows are only meaningful together; `stacked` is false when no token is a
/// fraction and the expression fits on the middle row alone. `operators`
/// holds the byte ranges of operator glyphs within `middle`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpressionRows {
    pub top: String,
    pub middle: String,
    pub bottom: String,
    pub stacked: bool,
    pub operators: Vec<Range<usize>>,
}

impl ExpressionRows {
    pub fn layout(tokens: &[Token]) -> Self {
        let mut rows = Self {
            stacked: tokens.iter().any(|t| matches!(t, Token::Fraction { .. })),
            ..Self::default()
        };

        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                rows.push_cell(" ", " ", " ");
            }
            match token {
                Token::Literal(text) if token.is_operator() => {
                    let glyph = operator_glyph(text);
                    let start = rows.middle.len();
                    let blank = " ".repeat(display_width(glyph));
                    rows.push_cell(&blank, glyph, &blank);
                    rows.operators.push(start..rows.middle.len());
                }
                Token::Literal(text) => {
                    let blank = " ".repeat(display_width(text));
                    rows.push_cell(&blank, text, &blank);
                }
                Token::Fraction {
                    numerator,
                    denominator,
                } => {
                    let numerator = numerator.replace('*', "×");
                    let denominator = denominator.replace('*', "×");
                    let width = display_width(&numerator).max(display_width(&denominator));
                    let bar: String = std::iter::repeat_n(FRACTION_BAR, width).collect();
                    rows.push_cell(
                        &centered(&numerator, width),
                        &bar,
                        &centered(&denominator, width),
                    );
                }
            }
        }
        rows
    }

    /// The middle row cut into `(text, is_operator)` pieces, in order.
    pub fn middle_pieces(&self) -> Vec<(&str, bool)> {
        let mut pieces = Vec::new();
        let mut cursor = 0;
        for range in &self.operators {
            if range.start > cursor {
                pieces.push((&self.middle[cursor..range.start], false));
            }
            pieces.push((&self.middle[range.clone()], true));
            cursor = range.end;
        }
        if cursor < self.middle.len() {
            pieces.push((&self.middle[cursor..], false));
        }
        pieces
    }

    fn push_cell(&mut self, top: &str, middle: &str, bottom: &str) {
        self.top.push_str(top);
        self.middle.push_str(middle);
        self.bottom.push_str(bottom);
    }
}
