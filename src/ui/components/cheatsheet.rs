use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget};
use rust_i18n::t;

use simeq::bank::KeywordNote;

use crate::ui::theme::Theme;

/// Modal list of keyword phrases and the symbols they translate to.
pub struct Cheatsheet<'a> {
    notes: &'a [KeywordNote],
    scroll: u16,
    theme: &'a Theme,
}

impl<'a> Cheatsheet<'a> {
    pub fn new(notes: &'a [KeywordNote], scroll: u16, theme: &'a Theme) -> Self {
        Self {
            notes,
            scroll,
            theme,
        }
    }
}

impl Widget for Cheatsheet<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(format!(" {} ", t!("notes.title")))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let phrase_width = self
            .notes
            .iter()
            .map(|note| Span::raw(note.phrase.as_str()).width())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self
            .notes
            .iter()
            .map(|note| {
                let pad = phrase_width - Span::raw(note.phrase.as_str()).width();
                Line::from(vec![
                    Span::styled(
                        format!("  {}{}", note.phrase, " ".repeat(pad)),
                        Style::default()
                            .fg(colors.keyword())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  →  ", Style::default().fg(colors.muted())),
                    Span::styled(note.meaning.as_str(), Style::default().fg(colors.fg())),
                ])
            })
            .collect();

        let max_scroll = (lines.len() as u16).saturating_sub(layout[0].height);
        Paragraph::new(lines)
            .scroll((self.scroll.min(max_scroll), 0))
            .render(layout[0], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("notes.footer")),
            Style::default().fg(colors.muted()),
        )))
        .render(layout[1], buf);
    }
}
