use crate::session::quiz::Level;

/// How one question of the shuffled order went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: u32,
    pub title: String,
    pub attempts: u32,
    pub hints_used: u32,
    pub completed: bool,
}

/// End-of-session report, in the order the questions were presented.
#[derive(Clone, Debug)]
pub struct SessionSummary {
    pub level: Level,
    pub score: usize,
    pub total: usize,
    pub outcomes: Vec<QuestionOutcome>,
}

impl SessionSummary {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64
    }

    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.score == self.total
    }

    pub fn total_attempts(&self) -> u32 {
        self.outcomes.iter().map(|o| o.attempts).sum()
    }
}
