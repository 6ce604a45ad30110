//! Answer matching against author-curated accepted forms.
//!
//! Equivalence is set membership after [`normalize`]: `x+y=600` and
//! `y+x=600` both match only because both are listed.

use serde::{Deserialize, Serialize};

use crate::engine::normalize::normalize;

/// Transient verdict recorded for the last check of a segment or slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    pub fn is_correct(self) -> bool {
        self == Feedback::Correct
    }
}

impl From<bool> for Feedback {
    fn from(correct: bool) -> Self {
        if correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        }
    }
}

/// Index of the first accepted form equal to `input` once both are normalized.
pub fn find_match<S: AsRef<str>>(input: &str, accepted: &[S]) -> Option<usize> {
    let candidate = normalize(input);
    accepted
        .iter()
        .position(|form| normalize(form.as_ref()) == candidate)
}

/// Whether `input` matches any of the accepted forms.
pub fn is_correct<S: AsRef<str>>(input: &str, accepted: &[S]) -> bool {
    find_match(input, accepted).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOTAL: [&str; 2] = ["x+y=600", "y+x=600"];

    #[test]
    fn test_commutative_forms_listed() {
        assert!(is_correct("y+x=600", &TOTAL));
        assert!(is_correct("X + Y = 600", &TOTAL));
        assert!(!is_correct("x+y=601", &TOTAL));
    }

    #[test]
    fn test_glyphs() {
        assert!(is_correct("x×2=y", &["x*2=y"]));
        assert!(is_correct("x÷2=y", &["x/2=y"]));
        assert!(is_correct("x:y=7/6", &["x/y=7/6"]));
    }

    #[test]
    fn test_accepted_forms_are_normalized_too() {
        assert!(is_correct("7*x=y", &["7x=y", "7×x=y"]));
    }

    #[test]
    fn test_no_algebraic_equivalence() {
        assert!(!is_correct("600=x+y", &TOTAL));
        assert!(!is_correct("y=3*x", &["y=3x"]));
    }

    #[test]
    fn test_empty_input_never_matches() {
        assert!(!is_correct("", &TOTAL));
        assert!(!is_correct("   ", &TOTAL));
        assert!(!is_correct::<&str>("x+y=600", &[]));
    }

    #[test]
    fn test_find_match_reports_index() {
        assert_eq!(find_match("y + x = 600", &TOTAL), Some(1));
        assert_eq!(find_match("x+y=600", &TOTAL), Some(0));
        assert_eq!(find_match("2x=600", &TOTAL), None);
    }

    #[test]
    fn test_feedback_from_bool() {
        assert_eq!(Feedback::from(true), Feedback::Correct);
        assert_eq!(Feedback::from(false), Feedback::Incorrect);
        assert!(Feedback::Correct.is_correct());
    }
}
