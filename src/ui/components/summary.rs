use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use simeq::session::{Level, SessionSummary};

use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct SummaryView<'a> {
    summary: &'a SessionSummary,
    theme: &'a Theme,
}

impl<'a> SummaryView<'a> {
    pub fn new(summary: &'a SessionSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;

        let block = Block::bordered()
            .title(format!(" {} ", t!("summary.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let level = match summary.level {
            Level::Guided => t!("level.guided"),
            Level::Direct => t!("level.direct"),
        };
        let mut headline = vec![
            Line::from(Span::styled(
                t!("summary.score", score = summary.score, total = summary.total).to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                t!(
                    "summary.accuracy",
                    percent = (summary.ratio() * 100.0).round() as u32,
                    attempts = summary.total_attempts()
                )
                .to_string(),
                Style::default().fg(colors.fg()),
            )),
            Line::from(Span::styled(level.to_string(), Style::default().fg(colors.muted()))),
        ];
        if summary.is_perfect() {
            headline.push(Line::from(Span::styled(
                t!("summary.perfect").to_string(),
                Style::default().fg(colors.correct()),
            )));
        }
        Paragraph::new(headline)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        ProgressBar::new(&t!("quiz.progress"), summary.score, summary.total, self.theme)
            .render(layout[1], buf);

        let rows: Vec<Line> = summary
            .outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| {
                let (mark, mark_color) = if outcome.completed {
                    (t!("summary.completed"), colors.correct())
                } else {
                    (t!("summary.not_completed"), colors.incorrect())
                };
                let mut spans = vec![
                    Span::styled(format!(" {mark} "), Style::default().fg(mark_color)),
                    Span::styled(
                        format!("{:>2}. {}", i + 1, outcome.title),
                        Style::default().fg(colors.fg()),
                    ),
                    Span::styled(
                        format!("  {}", t!("summary.attempts", count = outcome.attempts)),
                        Style::default().fg(colors.muted()),
                    ),
                ];
                if outcome.hints_used > 0 {
                    spans.push(Span::styled(
                        format!("  {}", t!("summary.hints", count = outcome.hints_used)),
                        Style::default().fg(colors.hint()),
                    ));
                }
                Line::from(spans)
            })
            .collect();
        Paragraph::new(rows).render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            format!(" {}", t!("summary.footer")),
            Style::default().fg(colors.muted()),
        )))
        .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use simeq::session::QuestionOutcome;

    use super::*;

    fn outcome(title: &str, attempts: u32, completed: bool) -> QuestionOutcome {
        QuestionOutcome {
            question_id: 1,
            title: title.to_string(),
            attempts,
            hints_used: 0,
            completed,
        }
    }

    #[test]
    fn test_render_shows_accuracy() {
        let summary = SessionSummary {
            level: Level::Direct,
            score: 1,
            total: 2,
            outcomes: vec![outcome("船票", 3, true), outcome("年齡", 4, false)],
        };
        let theme = Theme::default();
        let area = Rect::new(0, 0, 70, 14);
        let mut buf = Buffer::empty(area);
        SummaryView::new(&summary, &theme).render(area, &mut buf);

        let text: String = buf.content().iter().map(|cell| cell.symbol()).collect();
        assert!(text.contains("50%"));
        assert!(text.contains(" 7 "));
    }
}
