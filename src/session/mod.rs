pub mod input;
pub mod quiz;
pub mod result;

pub use input::{InputTarget, SegmentInput};
pub use quiz::{Level, Phase, QuizSession, SessionError};
pub use result::{QuestionOutcome, SessionSummary};
