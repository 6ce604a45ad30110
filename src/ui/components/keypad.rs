use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;

pub const COLUMNS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeypadKey {
    Char(char),
    Clear,
    Delete,
    Submit,
}

/// One key and the number of grid columns it covers.
type Cell = (KeypadKey, usize);

const ROWS: [&[Cell]; 4] = [
    &[
        (KeypadKey::Char('7'), 1),
        (KeypadKey::Char('8'), 1),
        (KeypadKey::Char('9'), 1),
        (KeypadKey::Char('/'), 1),
        (KeypadKey::Char('('), 1),
        (KeypadKey::Char(')'), 1),
    ],
    &[
        (KeypadKey::Char('4'), 1),
        (KeypadKey::Char('5'), 1),
        (KeypadKey::Char('6'), 1),
        (KeypadKey::Char('*'), 1),
        (KeypadKey::Char('x'), 1),
        (KeypadKey::Char('y'), 1),
    ],
    &[
        (KeypadKey::Char('1'), 1),
        (KeypadKey::Char('2'), 1),
        (KeypadKey::Char('3'), 1),
        (KeypadKey::Char('+'), 1),
        (KeypadKey::Char('-'), 1),
        (KeypadKey::Char('='), 1),
    ],
    &[
        (KeypadKey::Clear, 1),
        (KeypadKey::Char('0'), 1),
        (KeypadKey::Delete, 1),
        (KeypadKey::Submit, 3),
    ],
];

/// First grid column covered by the key at `index` in `row`.
fn start_column(row: &[Cell], index: usize) -> usize {
    row.iter().take(index).map(|(_, span)| span).sum()
}

/// Index of the key in `row` covering grid column `column`.
fn index_at_column(row: &[Cell], column: usize) -> usize {
    let mut start = 0;
    for (i, (_, span)) in row.iter().enumerate() {
        if column < start + span {
            return i;
        }
        start += span;
    }
    row.len() - 1
}

/// Cursor over the on-screen keypad.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeypadState {
    row: usize,
    index: usize,
}

impl KeypadState {
    pub fn selected(&self) -> KeypadKey {
        ROWS[self.row][self.index].0
    }

    pub fn move_left(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.index = (self.index + 1).min(ROWS[self.row].len() - 1);
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.change_row(self.row - 1);
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < ROWS.len() {
            self.change_row(self.row + 1);
        }
    }

    fn change_row(&mut self, row: usize) {
        let column = start_column(ROWS[self.row], self.index);
        self.row = row;
        self.index = index_at_column(ROWS[row], column);
    }
}

pub struct Keypad<'a> {
    state: &'a KeypadState,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> Keypad<'a> {
    pub fn new(state: &'a KeypadState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Rows of three-line keys plus the border.
    pub const HEIGHT: u16 = ROWS.len() as u16 * 3 + 2;
}

fn label(key: KeypadKey) -> String {
    match key {
        KeypadKey::Char('*') => "×".to_string(),
        KeypadKey::Char('/') => "÷".to_string(),
        KeypadKey::Char(ch) => ch.to_string(),
        KeypadKey::Clear => "AC".to_string(),
        KeypadKey::Delete => "DEL".to_string(),
        KeypadKey::Submit => t!("keypad.submit").to_string(),
    }
}

impl Widget for Keypad<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("keypad.title")))
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < COLUMNS as u16 || inner.height == 0 {
            return;
        }

        let cell_width = inner.width / COLUMNS as u16;
        let cell_height = (inner.height / ROWS.len() as u16).clamp(1, 3);

        for (r, row) in ROWS.iter().enumerate() {
            let y = inner.y + r as u16 * cell_height;
            if y + cell_height > inner.y + inner.height {
                break;
            }
            let mut column = 0;
            for (i, &(key, span)) in row.iter().enumerate() {
                let rect = Rect::new(
                    inner.x + column as u16 * cell_width,
                    y,
                    cell_width * span as u16,
                    cell_height,
                );
                column += span;

                let selected = self.state.row == r && self.state.index == i;
                let mut style = if selected {
                    Style::default()
                        .fg(colors.key_selected_fg())
                        .bg(colors.key_selected_bg())
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.key_fg()).bg(colors.key_bg())
                };
                if key == KeypadKey::Submit && !selected {
                    style = style.fg(colors.accent());
                }

                // Leave a one-column gutter between keys
                let key_rect = Rect {
                    width: rect.width.saturating_sub(1),
                    ..rect
                };
                buf.set_style(key_rect, style);
                let text_rect = Rect {
                    y: key_rect.y + key_rect.height / 2,
                    height: 1,
                    ..key_rect
                };
                Paragraph::new(label(key))
                    .style(style)
                    .alignment(Alignment::Center)
                    .render(text_rect, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_row_spans_all_columns() {
        for row in ROWS {
            assert_eq!(row.iter().map(|(_, span)| span).sum::<usize>(), COLUMNS);
        }
    }

    #[test]
    fn test_starts_on_seven() {
        assert_eq!(KeypadState::default().selected(), KeypadKey::Char('7'));
    }

    #[test]
    fn test_horizontal_moves_clamp() {
        let mut state = KeypadState::default();
        state.move_left();
        assert_eq!(state.selected(), KeypadKey::Char('7'));
        for _ in 0..10 {
            state.move_right();
        }
        assert_eq!(state.selected(), KeypadKey::Char(')'));
    }

    #[test]
    fn test_vertical_moves_keep_column() {
        let mut state = KeypadState::default();
        state.move_right();
        state.move_down();
        assert_eq!(state.selected(), KeypadKey::Char('5'));
        state.move_down();
        state.move_down();
        assert_eq!(state.selected(), KeypadKey::Char('0'));
        state.move_down();
        assert_eq!(state.selected(), KeypadKey::Char('0'));
    }

    #[test]
    fn test_wide_submit_key() {
        let mut state = KeypadState::default();
        for _ in 0..5 {
            state.move_right();
        }
        for _ in 0..3 {
            state.move_down();
        }
        assert_eq!(state.selected(), KeypadKey::Submit);
        // Up from the wide key lands on its first column
        state.move_up();
        assert_eq!(state.selected(), KeypadKey::Char('+'));
        state.move_down();
        state.move_left();
        assert_eq!(state.selected(), KeypadKey::Delete);
    }
}
