use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use simeq::bank::{Question, Segment};
use simeq::engine::{Feedback, tokenize};
use simeq::session::{InputTarget, Level, Phase, QuizSession};

use crate::ui::components::expression::ExpressionRows;
use crate::ui::theme::{Theme, ThemeColors};

const CURSOR: &str = "▏";
const INDENT: &str = "    ";

/// The problem, the Level-1 sentence cards and the equation slots.
pub struct QuestionPanel<'a> {
    session: &'a QuizSession<'a>,
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> QuestionPanel<'a> {
    pub fn new(session: &'a QuizSession<'a>, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            session,
            scroll,
            theme,
        }
    }

    pub fn lines(&self) -> Vec<Line<'a>> {
        let Some(question) = self.session.current_question() else {
            return Vec::new();
        };
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                question.title.clone(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                question.problem_text.clone(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(vec![
                Span::styled(
                    format!("{} ", t!("quiz.variables")),
                    Style::default().fg(colors.muted()),
                ),
                Span::styled(
                    question.variable_declaration.clone(),
                    Style::default().fg(colors.keyword()),
                ),
            ]),
            Line::from(""),
        ];

        if self.session.level() == Level::Guided {
            self.push_segments(question, colors, &mut lines);
        } else {
            self.push_revealed_hints(question, colors, &mut lines);
        }
        self.push_slots(question, colors, &mut lines);
        self.push_status(colors, &mut lines);
        lines
    }

    fn push_segments(&self, question: &Question, colors: &ThemeColors, lines: &mut Vec<Line<'a>>) {
        let mut segments_heading = heading(&t!("quiz.segments"), colors);
        if self.session.segments_completed() {
            segments_heading.push_span(Span::styled(
                format!("  {}", t!("quiz.solved")),
                Style::default().fg(colors.correct()),
            ));
        }
        lines.push(segments_heading);
        for (s, segment) in question.segments.iter().enumerate() {
            let solved = self.session.is_segment_solved(s);
            let mut title = vec![Span::styled(
                format!("{}. {}", s + 1, segment.display_text),
                Style::default().fg(if solved { colors.muted() } else { colors.fg() }),
            )];
            if solved {
                title.push(Span::styled(
                    format!("  {}", t!("quiz.solved")),
                    Style::default().fg(colors.correct()),
                ));
            }
            lines.push(Line::from(title));
            lines.push(self.keyword_chips(s, segment, solved, colors));

            let expression = self.session.segment_expression(s);
            let feedback = self.session.segment_feedback(s);
            push_expression(&expression, feedback, colors, lines);

            if self.session.hint_revealed(s)
                && let Some(hint) = segment.hint()
            {
                lines.push(hint_line(hint, colors));
            }
            lines.push(Line::from(""));
        }
    }

    fn keyword_chips(
        &self,
        segment_index: usize,
        segment: &Segment,
        solved: bool,
        colors: &ThemeColors,
    ) -> Line<'a> {
        let active = self.session.active_target();
        let mut spans = vec![Span::raw(INDENT)];
        for k in segment.display_order() {
            let Some(keyword) = segment.keywords.get(k) else {
                continue;
            };
            if !segment.takes_input(k) {
                spans.push(Span::styled(
                    format!("{keyword} "),
                    Style::default().fg(colors.muted()),
                ));
                continue;
            }

            let is_active = active
                == Some(InputTarget::Keyword {
                    segment: segment_index,
                    keyword: k,
                });
            let keyword_style = if solved {
                Style::default().fg(colors.muted())
            } else {
                Style::default().fg(colors.keyword()).bg(colors.keyword_bg())
            };
            let mut part_style = Style::default().fg(colors.input());
            if is_active {
                part_style = part_style.bg(colors.cursor_bg());
            }

            let part = self.session.part_text(segment_index, k);
            let cursor = if is_active { CURSOR } else { "" };
            spans.push(Span::styled(keyword.clone(), keyword_style));
            spans.push(Span::styled(format!("[{part}{cursor}]"), part_style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn push_revealed_hints(
        &self,
        question: &Question,
        colors: &ThemeColors,
        lines: &mut Vec<Line<'a>>,
    ) {
        let hints: Vec<&str> = question
            .segments
            .iter()
            .enumerate()
            .filter(|(s, _)| self.session.hint_revealed(*s))
            .filter_map(|(_, segment)| segment.hint())
            .collect();
        if hints.is_empty() {
            return;
        }
        for hint in hints {
            lines.push(hint_line(hint, colors));
        }
        lines.push(Line::from(""));
    }

    fn push_slots(&self, question: &Question, colors: &ThemeColors, lines: &mut Vec<Line<'a>>) {
        lines.push(heading(&t!("quiz.full_equations"), colors));
        if !self.session.full_equation_unlocked() {
            lines.push(Line::from(Span::styled(
                format!("{INDENT}{}", t!("quiz.locked")),
                Style::default().fg(colors.muted()),
            )));
            return;
        }

        let active = self.session.active_target();
        let editable = self.session.phase() == Phase::AssemblingFullEquation;
        for slot in 0..question.slot_count() {
            let is_active = editable && active == Some(InputTarget::Slot(slot));
            let mut input_style = Style::default().fg(colors.input());
            if is_active {
                input_style = input_style.bg(colors.cursor_bg());
            }
            let input = self.session.slot_input(slot);
            let cursor = if is_active { CURSOR } else { "" };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{INDENT}{}: ", t!("quiz.slot", n = slot + 1)),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(format!("{input}{cursor}"), input_style),
            ]));
            push_expression(input, self.session.slot_feedback(slot), colors, lines);
        }
    }

    fn push_status(&self, colors: &ThemeColors, lines: &mut Vec<Line<'a>>) {
        let status = match self.session.phase() {
            Phase::SegmentComplete => t!("quiz.unlocked"),
            Phase::QuestionComplete => t!("quiz.complete"),
            _ => return,
        };
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default()
                .fg(colors.correct())
                .add_modifier(Modifier::BOLD),
        )));
    }
}

fn heading<'a>(text: &str, colors: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn hint_line<'a>(hint: &str, colors: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        format!("{INDENT}{}", t!("quiz.hint", hint = hint)),
        Style::default().fg(colors.hint()),
    ))
}

/// Rendered preview of `expression` followed by its feedback mark.
fn push_expression(
    expression: &str,
    feedback: Option<Feedback>,
    colors: &ThemeColors,
    lines: &mut Vec<Line<'_>>,
) {
    let rows = ExpressionRows::layout(&tokenize(expression));
    let (mark, color) = match feedback {
        Some(Feedback::Correct) => (t!("quiz.correct").to_string(), colors.correct()),
        Some(Feedback::Incorrect) => (t!("quiz.incorrect").to_string(), colors.incorrect()),
        None => (String::new(), colors.fg()),
    };
    let style = Style::default().fg(color);

    if rows.middle.is_empty() {
        lines.push(Line::from(vec![
            Span::raw(INDENT),
            Span::styled(t!("quiz.placeholder").to_string(), Style::default().fg(colors.muted())),
            Span::raw("  "),
            Span::styled(mark, style),
        ]));
        return;
    }

    if rows.stacked {
        lines.push(Line::from(Span::styled(format!("{INDENT}{}", rows.top), style)));
    }
    let mut middle = vec![Span::raw(INDENT)];
    for (text, is_operator) in rows.middle_pieces() {
        let piece_style = if is_operator {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        };
        middle.push(Span::styled(text.to_string(), piece_style));
    }
    middle.push(Span::raw("  "));
    middle.push(Span::styled(mark, style.add_modifier(Modifier::BOLD)));
    lines.push(Line::from(middle));
    if rows.stacked {
        lines.push(Line::from(Span::styled(format!("{INDENT}{}", rows.bottom), style)));
    }
}

impl Widget for QuestionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use simeq::bank::QuestionBank;

    use super::*;

    fn heading_text(panel: &QuestionPanel) -> String {
        let segments = t!("quiz.segments").to_string();
        panel
            .lines()
            .into_iter()
            .map(|line| line.to_string())
            .find(|line| line.starts_with(&segments))
            .unwrap()
    }

    #[test]
    fn test_segments_heading_marks_completion() {
        let bank = QuestionBank::builtin().unwrap();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut quiz = QuizSession::with_rng(&bank, Level::Guided, &mut rng);
        let theme = Theme::default();
        let solved = t!("quiz.solved").to_string();

        assert!(!heading_text(&QuestionPanel::new(&quiz, 0, &theme)).contains(&solved));

        let question = quiz.current_question().unwrap();
        for (s, segment) in question.segments.iter().enumerate() {
            let keyword = segment.input_keywords().next().unwrap();
            quiz.set_input(InputTarget::Keyword { segment: s, keyword }, &segment.valid_forms[0])
                .unwrap();
            assert_eq!(quiz.submit_segment(s), Ok(Feedback::Correct));
        }
        assert!(heading_text(&QuestionPanel::new(&quiz, 0, &theme)).contains(&solved));
    }

    #[test]
    fn test_slot_preview_uses_times_glyph() {
        let bank = QuestionBank::builtin().unwrap();
        let mut quiz = QuizSession::new(&bank, Level::Direct);
        let theme = Theme::default();
        quiz.set_input(InputTarget::Slot(0), "y=3*x").unwrap();

        let text: Vec<String> = QuestionPanel::new(&quiz, 0, &theme)
            .lines()
            .into_iter()
            .map(|line| line.to_string())
            .collect();
        assert!(text.iter().any(|line| line.contains("y = 3 × x")));
    }
}
