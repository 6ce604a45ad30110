pub mod model;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use thiserror::Error;

pub use model::{KeywordNote, Question, QuestionBank, Segment};

/// Schema version this build understands.
pub const BANK_VERSION: u32 = 1;

const BUILTIN_BANK: &str = "simultaneous.json";

#[derive(Embed)]
#[folder = "assets/questions/"]
struct BankAssets;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bundled question bank {0} is missing")]
    MissingAsset(String),

    #[error("bundled question bank {name} is not valid UTF-8: {source}")]
    Encoding {
        name: String,
        source: std::str::Utf8Error,
    },

    #[error("question bank is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unsupported question bank version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("question bank has no questions")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(u32),

    #[error("question {id} has no answer slots")]
    NoSlots { id: u32 },

    #[error("question {id} slot {slot} has no accepted forms")]
    EmptySlot { id: u32, slot: usize },

    #[error("question {id} segment {segment} has no valid forms")]
    NoValidForms { id: u32, segment: usize },

    #[error("question {id} segment {segment}: keyword display order is not a permutation")]
    BadDisplayOrder { id: u32, segment: usize },

    #[error("question {id} segment {segment}: skipped keyword {keyword} does not exist")]
    SkipOutOfRange {
        id: u32,
        segment: usize,
        keyword: usize,
    },
}

impl QuestionBank {
    /// The bank compiled into the binary.
    pub fn builtin() -> Result<Self, BankError> {
        let file = BankAssets::get(BUILTIN_BANK)
            .ok_or_else(|| BankError::MissingAsset(BUILTIN_BANK.to_string()))?;
        let bank = Self::from_embedded(BUILTIN_BANK, file.data.as_ref())?;
        tracing::info!(questions = bank.len(), "loaded bundled question bank");
        Ok(bank)
    }

    fn from_embedded(name: &str, data: &[u8]) -> Result<Self, BankError> {
        let json = std::str::from_utf8(data).map_err(|source| BankError::Encoding {
            name: name.to_string(),
            source,
        })?;
        Self::from_json(json)
    }

    pub fn load(path: &Path) -> Result<Self, BankError> {
        let content = fs::read_to_string(path).map_err(|source| BankError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let bank = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), questions = bank.len(), "loaded question bank");
        Ok(bank)
    }

    pub fn from_json(json: &str) -> Result<Self, BankError> {
        let bank: QuestionBank = serde_json::from_str(json)?;
        bank.validate()?;
        Ok(bank)
    }

    fn validate(&self) -> Result<(), BankError> {
        if self.version != BANK_VERSION {
            return Err(BankError::UnsupportedVersion {
                found: self.version,
                expected: BANK_VERSION,
            });
        }
        if self.questions.is_empty() {
            return Err(BankError::Empty);
        }

        let mut seen = HashSet::new();
        for question in &self.questions {
            let id = question.id;
            if !seen.insert(id) {
                return Err(BankError::DuplicateId(id));
            }
            if question.accepted_answers.is_empty() {
                return Err(BankError::NoSlots { id });
            }
            if let Some(slot) = question.accepted_answers.iter().position(Vec::is_empty) {
                return Err(BankError::EmptySlot { id, slot });
            }
            for (segment, seg) in question.segments.iter().enumerate() {
                validate_segment(id, segment, seg)?;
            }
        }
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn segment(&self, question: usize, segment: usize) -> Option<&Segment> {
        self.question(question)?.segments.get(segment)
    }

    /// Accepted forms for one answer slot of a question.
    pub fn slot(&self, question: usize, slot: usize) -> Option<&[String]> {
        self.question(question)?
            .accepted_answers
            .get(slot)
            .map(Vec::as_slice)
    }

    pub fn cheatsheet(&self) -> &[KeywordNote] {
        &self.cheatsheet
    }
}

fn validate_segment(id: u32, segment: usize, seg: &Segment) -> Result<(), BankError> {
    if seg.valid_forms.is_empty() {
        return Err(BankError::NoValidForms { id, segment });
    }
    if let Some(order) = &seg.keyword_display_order {
        let mut sorted = order.clone();
        sorted.sort_unstable();
        if !sorted.iter().copied().eq(0..seg.keywords.len()) {
            return Err(BankError::BadDisplayOrder { id, segment });
        }
    }
    if let Some(&keyword) = seg.skip_input.iter().find(|&&k| k >= seg.keywords.len()) {
        return Err(BankError::SkipOutOfRange {
            id,
            segment,
            keyword,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_json(body: &str) -> String {
        format!(r#"{{"version": 1, "questions": [{body}]}}"#)
    }

    const MINIMAL: &str = r#"{
        "id": 1,
        "title": "t",
        "problem_text": "p",
        "variable_declaration": "v",
        "segments": [
            {"display_text": "s", "keywords": ["a", "b"], "valid_forms": ["x=1"]}
        ],
        "accepted_answers": [["x=1"], ["y=2"]]
    }"#;

    #[test]
    fn test_builtin_bank_loads() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.version(), BANK_VERSION);
        assert_eq!(bank.len(), 14);
        assert!(!bank.cheatsheet().is_empty());
        for question in bank.questions() {
            assert_eq!(question.slot_count(), 2, "question {}", question.id);
        }
    }

    #[test]
    fn test_builtin_first_question() {
        let bank = QuestionBank::builtin().unwrap();
        let q = bank.question(0).unwrap();
        assert_eq!(q.title, "遊覽船船票");
        assert_eq!(bank.slot(0, 1).unwrap(), ["y=3x", "y=3*x", "3x=y"]);
        assert_eq!(bank.segment(0, 0).unwrap().hint(), Some("x + y = 600"));
        assert!(bank.slot(0, 2).is_none());
        assert!(bank.segment(99, 0).is_none());
    }

    #[test]
    fn test_minimal_bank() {
        let bank = QuestionBank::from_json(&bank_json(MINIMAL)).unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.cheatsheet().is_empty());
    }

    #[test]
    fn test_rejects_wrong_version() {
        let json = bank_json(MINIMAL).replace(r#""version": 1"#, r#""version": 7"#);
        assert!(matches!(
            QuestionBank::from_json(&json),
            Err(BankError::UnsupportedVersion {
                found: 7,
                expected: 1
            })
        ));
    }

    #[test]
    fn test_rejects_empty_bank() {
        let json = r#"{"version": 1, "questions": []}"#;
        assert!(matches!(QuestionBank::from_json(json), Err(BankError::Empty)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = bank_json(&format!("{MINIMAL},{MINIMAL}"));
        assert!(matches!(
            QuestionBank::from_json(&json),
            Err(BankError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_rejects_empty_slot() {
        let json = bank_json(&MINIMAL.replace(r#"[["x=1"], ["y=2"]]"#, r#"[["x=1"], []]"#));
        assert!(matches!(
            QuestionBank::from_json(&json),
            Err(BankError::EmptySlot { id: 1, slot: 1 })
        ));
    }

    #[test]
    fn test_rejects_no_slots() {
        let json = bank_json(&MINIMAL.replace(r#"[["x=1"], ["y=2"]]"#, "[]"));
        assert!(matches!(
            QuestionBank::from_json(&json),
            Err(BankError::NoSlots { id: 1 })
        ));
    }

    #[test]
    fn test_rejects_bad_display_order() {
        let body = MINIMAL.replace(
            r#""valid_forms": ["x=1"]"#,
            r#""valid_forms": ["x=1"], "keyword_display_order": [0, 0]"#,
        );
        assert!(matches!(
            QuestionBank::from_json(&bank_json(&body)),
            Err(BankError::BadDisplayOrder { id: 1, segment: 0 })
        ));
    }

    #[test]
    fn test_rejects_skip_out_of_range() {
        let body = MINIMAL.replace(
            r#""valid_forms": ["x=1"]"#,
            r#""valid_forms": ["x=1"], "skip_input": [5]"#,
        );
        assert!(matches!(
            QuestionBank::from_json(&bank_json(&body)),
            Err(BankError::SkipOutOfRange {
                id: 1,
                segment: 0,
                keyword: 5
            })
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            QuestionBank::from_json("{"),
            Err(BankError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_utf8() {
        let mut data = bank_json(MINIMAL).into_bytes();
        data.insert(20, 0xff);
        let err = QuestionBank::from_embedded("broken.json", &data).unwrap_err();
        assert!(matches!(err, BankError::Encoding { ref name, .. } if name == "broken.json"));
    }

    #[test]
    fn test_builtin_logs_question_count() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Capture(Arc<Mutex<Vec<u8>>>);

        impl Write for Capture {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let bank = tracing::subscriber::with_default(subscriber, || {
            QuestionBank::builtin().unwrap()
        });

        let log = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("loaded bundled question bank"));
        assert!(log.contains(&format!("questions={}", bank.len())));
    }

    #[test]
    fn test_embedded_bytes_parse() {
        let data = bank_json(MINIMAL).into_bytes();
        let bank = QuestionBank::from_embedded("minimal.json", &data).unwrap();
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = QuestionBank::load(Path::new("/nonexistent/bank.json")).unwrap_err();
        assert!(matches!(err, BankError::Io { .. }));
    }
}
