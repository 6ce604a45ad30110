use std::collections::BTreeMap;

/// Which buffer keypad and keyboard input currently edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputTarget {
    /// Level 1: the part typed for one keyword of a segment.
    Keyword { segment: usize, keyword: usize },
    /// Level 2: one full equation.
    Slot(usize),
}

/// Level-1 parts for one segment, keyed by keyword index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentInput {
    parts: BTreeMap<usize, String>,
}

impl SegmentInput {
    pub fn part(&self, keyword: usize) -> &str {
        self.parts.get(&keyword).map(String::as_str).unwrap_or("")
    }

    pub(crate) fn part_mut(&mut self, keyword: usize) -> &mut String {
        self.parts.entry(keyword).or_default()
    }

    /// Parts concatenated in keyword order; display order plays no part here.
    pub fn assembled(&self) -> String {
        self.parts.values().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.values().all(String::is_empty)
    }
}

/// Append a typed character. Control characters are ignored.
pub fn process_char(buffer: &mut String, ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    buffer.push(ch);
    true
}

pub fn process_backspace(buffer: &mut String) -> bool {
    buffer.pop().is_some()
}

pub fn process_clear(buffer: &mut String) -> bool {
    let had_text = !buffer.is_empty();
    buffer.clear();
    had_text
}
