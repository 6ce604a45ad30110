use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: question + side panel with score and keypad
    Medium, // 64-99 cols: full-width question, keypad below
    Narrow, // <64 cols: question only
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else if area.width >= 64 {
            LayoutTier::Medium
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_side_panel(&self) -> bool {
        *self == LayoutTier::Wide
    }

    pub fn show_keypad_below(&self, height: u16) -> bool {
        *self == LayoutTier::Medium && height >= 30
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub side_panel: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect, footer_height: u16) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(footer_height),
            ])
            .split(area);

        if tier.show_side_panel() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(60), Constraint::Length(36)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                main: horizontal[0],
                side_panel: Some(horizontal[1]),
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                side_panel: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

/// Height a run of lines takes once wrapped at `width` display columns.
pub fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width as usize) as u16)
        .sum()
}

/// Packs `[key] action` hints into as few lines as fit in `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = " ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if Line::from(candidate.as_str()).width() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 80, 40)), LayoutTier::Medium);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 50, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_wide_layout_has_side_panel() {
        let layout = AppLayout::new(Rect::new(0, 0, 120, 40), 1);
        let side = layout.side_panel.unwrap();
        assert_eq!(side.width, 36);
        assert_eq!(layout.main.width + side.width, 120);
        assert_eq!(layout.header.height, 1);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let hints = ["[Enter] 提交", "[F1] 關鍵字", "[Esc] 選單"];
        let packed = pack_hint_lines(&hints, 80);
        assert_eq!(packed.len(), 1);
        let packed = pack_hint_lines(&hints, 16);
        assert_eq!(packed.len(), 3);
        assert!(pack_hint_lines(&hints, 0).is_empty());
    }

    #[test]
    fn test_wrapped_height_counts_wide_glyphs() {
        let lines = [Line::from("頭等和普通等"), Line::from("")];
        // six CJK glyphs are twelve columns
        assert_eq!(wrapped_height(&lines, 6), 3);
        assert_eq!(wrapped_height(&lines, 12), 2);
    }

    #[test]
    fn test_packed_hints_need_no_extra_rows() {
        let hints = ["[Enter] submit", "[Tab] focus", "[F1] notes", "[F3] hint"];
        let packed = pack_hint_lines(&hints, 30);
        let mut footer = vec![Line::from("答案錯誤，請再試一次，或者按 F3 查看提示")];
        footer.extend(packed.iter().map(|line| Line::from(line.as_str())));
        // the status line wraps once at thirty columns
        assert_eq!(wrapped_height(&footer, 30), packed.len() as u16 + 2);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect, area);
    }
}
