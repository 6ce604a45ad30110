use serde::{Deserialize, Serialize};

/// The static catalog of word problems plus keyword notes.
///
/// Obtained through [`QuestionBank::builtin`](crate::bank::QuestionBank::builtin)
/// or [`QuestionBank::load`](crate::bank::QuestionBank::load), both of which
/// validate; there is no way to mutate a bank once loaded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionBank {
    pub(crate) version: u32,
    pub(crate) questions: Vec<Question>,
    #[serde(default)]
    pub(crate) cheatsheet: Vec<KeywordNote>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub title: String,
    pub problem_text: String,
    pub variable_declaration: String,
    pub segments: Vec<Segment>,
    /// One entry per equation to derive; each entry lists every accepted phrasing.
    pub accepted_answers: Vec<Vec<String>>,
}

impl Question {
    pub fn slot_count(&self) -> usize {
        self.accepted_answers.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

/// One clause of a problem, translated into a single equation at Level 1.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Segment {
    pub display_text: String,
    /// Tap targets in assembly order: parts are concatenated in this order.
    pub keywords: Vec<String>,
    /// Presentation order of the keywords, as indices into `keywords`.
    #[serde(default)]
    pub keyword_display_order: Option<Vec<usize>>,
    pub valid_forms: Vec<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Keywords shown for context only; they take no input part.
    #[serde(default)]
    pub skip_input: Vec<usize>,
}

impl Segment {
    pub fn takes_input(&self, keyword: usize) -> bool {
        keyword < self.keywords.len() && !self.skip_input.contains(&keyword)
    }

    /// Keyword indices that receive an input part, in assembly order.
    pub fn input_keywords(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.keywords.len()).filter(|&k| self.takes_input(k))
    }

    /// Keyword indices in the order they should be drawn.
    pub fn display_order(&self) -> Vec<usize> {
        match &self.keyword_display_order {
            Some(order) => order.clone(),
            None => (0..self.keywords.len()).collect(),
        }
    }

    /// Worked example for this clause; falls back to the first valid form.
    pub fn hint(&self) -> Option<&str> {
        self.hint
            .as_deref()
            .or_else(|| self.valid_forms.first().map(String::as_str))
    }
}

/// Cheatsheet entry mapping a Chinese phrase to its symbolic meaning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordNote {
    pub phrase: String,
    pub meaning: String,
}
