use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::{Question, QuestionBank, Segment};
use crate::engine::matcher::{self, Feedback};
use crate::session::input::{self, InputTarget, SegmentInput};
use crate::session::result::{QuestionOutcome, SessionSummary};

/// Difficulty: Guided is "Level 1", Direct is "Level 2".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Translate each clause first; the full equations unlock afterwards.
    #[default]
    Guided,
    /// Straight to the full equations.
    Direct,
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::Guided => 1,
            Level::Direct => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Level::Guided),
            2 => Some(Level::Direct),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Level::Guided => Level::Direct,
            Level::Direct => Level::Guided,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    SelectingSegment,
    SegmentComplete,
    AssemblingFullEquation,
    QuestionComplete,
    SessionComplete,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the session is complete")]
    SessionComplete,

    #[error("segment {segment} does not exist (question has {count})")]
    NoSuchSegment { segment: usize, count: usize },

    #[error("keyword {keyword} of segment {segment} takes no input")]
    NoSuchInput { segment: usize, keyword: usize },

    #[error("answer slot {slot} does not exist (question has {count})")]
    NoSuchSlot { slot: usize, count: usize },

    #[error("segment {0} is already solved")]
    SegmentSolved(usize),

    #[error("full equations unlock once every segment is solved")]
    FullEquationLocked,

    #[error("not available while {0:?}")]
    WrongPhase(Phase),

    #[error("already at the first question")]
    AtFirstQuestion,
}

/// Everything that is thrown away when the question or level changes.
#[derive(Debug, Default)]
struct Buffers {
    segments: BTreeMap<usize, SegmentInput>,
    slots: Vec<String>,
    segment_feedback: BTreeMap<usize, Feedback>,
    slot_feedback: Vec<Option<Feedback>>,
    solved_segments: BTreeSet<usize>,
    segments_completed: bool,
    hints: BTreeSet<usize>,
    active: Option<InputTarget>,
}

impl Buffers {
    fn for_question(question: &Question) -> Self {
        Self {
            slots: vec![String::new(); question.slot_count()],
            slot_feedback: vec![None; question.slot_count()],
            ..Self::default()
        }
    }
}

/// Uniform random permutation of `0..len` (Fisher–Yates via `SliceRandom`).
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}

/// One run through the shuffled question bank.
///
/// The presentation layer reads state through accessors and drives it only
/// through the event methods; a wrong answer is an ordinary
/// [`Feedback::Incorrect`], never an error.
pub struct QuizSession<'a> {
    bank: &'a QuestionBank,
    order: Vec<usize>,
    position: usize,
    level: Level,
    phase: Phase,
    completed: BTreeSet<usize>,
    attempts: Vec<u32>,
    hints_used: Vec<u32>,
    buffers: Buffers,
}

impl<'a> QuizSession<'a> {
    pub fn new(bank: &'a QuestionBank, level: Level) -> Self {
        Self::with_rng(bank, level, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(bank: &'a QuestionBank, level: Level, rng: &mut R) -> Self {
        let order = shuffled_order(bank.len(), rng);
        let mut session = Self {
            bank,
            attempts: vec![0; order.len()],
            hints_used: vec![0; order.len()],
            order,
            position: 0,
            level,
            phase: Phase::SessionComplete,
            completed: BTreeSet::new(),
            buffers: Buffers::default(),
        };
        tracing::info!(questions = bank.len(), level = ?level, "quiz session started");
        session.enter_position(0);
        session
    }

    // --- read accessors ---

    pub fn bank(&self) -> &'a QuestionBank {
        self.bank
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Zero-based position in the shuffled order; equals `len()` once complete.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::SessionComplete
    }

    /// Number of distinct questions answered fully correctly.
    pub fn score(&self) -> usize {
        self.completed.len()
    }

    pub fn question_index(&self) -> Option<usize> {
        self.order.get(self.position).copied()
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        self.question_index().and_then(|i| self.bank.question(i))
    }

    pub fn active_target(&self) -> Option<InputTarget> {
        self.buffers.active
    }

    pub fn segments_completed(&self) -> bool {
        self.buffers.segments_completed
    }

    pub fn full_equation_unlocked(&self) -> bool {
        matches!(
            self.phase,
            Phase::SegmentComplete | Phase::AssemblingFullEquation | Phase::QuestionComplete
        )
    }

    pub fn segment_input(&self, segment: usize) -> Option<&SegmentInput> {
        self.buffers.segments.get(&segment)
    }

    /// The Level-1 expression assembled so far for a segment.
    pub fn segment_expression(&self, segment: usize) -> String {
        self.segment_input(segment)
            .map(SegmentInput::assembled)
            .unwrap_or_default()
    }

    pub fn part_text(&self, segment: usize, keyword: usize) -> &str {
        self.segment_input(segment)
            .map(|input| input.part(keyword))
            .unwrap_or("")
    }

    pub fn slot_input(&self, slot: usize) -> &str {
        self.buffers.slots.get(slot).map(String::as_str).unwrap_or("")
    }

    pub fn segment_feedback(&self, segment: usize) -> Option<Feedback> {
        self.buffers.segment_feedback.get(&segment).copied()
    }

    pub fn slot_feedback(&self, slot: usize) -> Option<Feedback> {
        self.buffers.slot_feedback.get(slot).copied().flatten()
    }

    pub fn is_segment_solved(&self, segment: usize) -> bool {
        self.buffers.solved_segments.contains(&segment)
    }

    pub fn solved_segment_count(&self) -> usize {
        self.buffers.solved_segments.len()
    }

    pub fn hint_revealed(&self, segment: usize) -> bool {
        self.buffers.hints.contains(&segment)
    }

    pub fn is_question_completed(&self, question_index: usize) -> bool {
        self.completed.contains(&question_index)
    }

    pub fn summary(&self) -> SessionSummary {
        let outcomes = self
            .order
            .iter()
            .enumerate()
            .filter_map(|(pos, &qi)| {
                let question = self.bank.question(qi)?;
                Some(QuestionOutcome {
                    question_id: question.id,
                    title: question.title.clone(),
                    attempts: self.attempts[pos],
                    hints_used: self.hints_used[pos],
                    completed: self.completed.contains(&qi),
                })
            })
            .collect();

        SessionSummary {
            level: self.level,
            score: self.score(),
            total: self.len(),
            outcomes,
        }
    }

    // --- events ---

    /// Focus the input part of one keyword (Level 1).
    pub fn select_keyword(&mut self, segment: usize, keyword: usize) -> Result<(), SessionError> {
        self.expect_phase(Phase::SelectingSegment)?;
        let seg = self.segment(segment)?;
        if !seg.takes_input(keyword) {
            return Err(SessionError::NoSuchInput { segment, keyword });
        }
        if self.is_segment_solved(segment) {
            return Err(SessionError::SegmentSolved(segment));
        }
        self.buffers
            .segments
            .entry(segment)
            .or_default()
            .part_mut(keyword);
        self.buffers.active = Some(InputTarget::Keyword { segment, keyword });
        Ok(())
    }

    /// Focus one full-equation slot (Level 2).
    pub fn select_slot(&mut self, slot: usize) -> Result<(), SessionError> {
        self.unlock_full_equation()?;
        let count = self.buffers.slots.len();
        if slot >= count {
            return Err(SessionError::NoSuchSlot { slot, count });
        }
        self.buffers.active = Some(InputTarget::Slot(slot));
        Ok(())
    }

    pub fn input_char(&mut self, ch: char) -> bool {
        self.active_buffer_mut()
            .is_some_and(|buffer| input::process_char(buffer, ch))
    }

    pub fn delete_char(&mut self) -> bool {
        self.active_buffer_mut()
            .is_some_and(input::process_backspace)
    }

    pub fn clear_input(&mut self) -> bool {
        self.active_buffer_mut().is_some_and(input::process_clear)
    }

    /// Replace a buffer wholesale, as free-text entry does.
    pub fn set_input(&mut self, target: InputTarget, text: &str) -> Result<(), SessionError> {
        match target {
            InputTarget::Keyword { segment, keyword } => self.select_keyword(segment, keyword)?,
            InputTarget::Slot(slot) => self.select_slot(slot)?,
        }
        if let Some(buffer) = self.active_buffer_mut() {
            buffer.clear();
            buffer.extend(text.chars().filter(|ch| !ch.is_control()));
        }
        Ok(())
    }

    /// Check one segment's assembled expression against its valid forms.
    pub fn submit_segment(&mut self, segment: usize) -> Result<Feedback, SessionError> {
        self.expect_phase(Phase::SelectingSegment)?;
        let seg = self.segment(segment)?;
        if self.is_segment_solved(segment) {
            return Err(SessionError::SegmentSolved(segment));
        }

        let expression = self.segment_expression(segment);
        let feedback = Feedback::from(matcher::is_correct(&expression, &seg.valid_forms));
        self.attempts[self.position] += 1;
        self.buffers.segment_feedback.insert(segment, feedback);
        tracing::debug!(segment, %expression, ?feedback, "segment submitted");

        if feedback.is_correct() {
            self.buffers.solved_segments.insert(segment);
            if matches!(self.buffers.active, Some(InputTarget::Keyword { segment: s, .. }) if s == segment)
            {
                self.buffers.active = None;
            }
            self.update_segment_progress();
        }
        Ok(feedback)
    }

    /// Move from `SegmentComplete` to `AssemblingFullEquation`.
    pub fn begin_full_equation(&mut self) -> Result<(), SessionError> {
        self.unlock_full_equation()
    }

    /// Check every answer slot; the question is scored only if all pass.
    pub fn submit_final(&mut self) -> Result<Vec<Feedback>, SessionError> {
        self.unlock_full_equation()?;
        let Some(question_index) = self.question_index() else {
            return Err(SessionError::SessionComplete);
        };
        let Some(question) = self.bank.question(question_index) else {
            return Err(SessionError::SessionComplete);
        };

        let feedback: Vec<Feedback> = question
            .accepted_answers
            .iter()
            .zip(&self.buffers.slots)
            .map(|(accepted, input)| Feedback::from(matcher::is_correct(input, accepted)))
            .collect();
        self.attempts[self.position] += 1;
        self.buffers.slot_feedback = feedback.iter().copied().map(Some).collect();
        tracing::debug!(question = question.id, ?feedback, "full equations submitted");

        if feedback.iter().all(|f| f.is_correct()) {
            self.phase = Phase::QuestionComplete;
            self.buffers.active = None;
            if self.completed.insert(question_index) {
                tracing::info!(question = question.id, score = self.score(), "question completed");
            }
        }
        Ok(feedback)
    }

    /// Go to the next question after completing the current one.
    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        self.expect_phase(Phase::QuestionComplete)?;
        self.enter_position(self.position + 1);
        Ok(self.phase)
    }

    /// Move on without completing the current question.
    pub fn skip(&mut self) -> Result<Phase, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionComplete);
        }
        self.enter_position(self.position + 1);
        Ok(self.phase)
    }

    /// Return to the previous question with fresh buffers.
    pub fn previous(&mut self) -> Result<Phase, SessionError> {
        if self.position == 0 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.enter_position(self.position - 1);
        Ok(self.phase)
    }

    pub fn set_level(&mut self, level: Level) {
        if self.level == level {
            return;
        }
        self.level = level;
        tracing::debug!(level = ?level, "level changed");
        if !self.is_complete() {
            self.reset_question();
        }
    }

    /// Reveal the worked example for a segment and return it.
    pub fn reveal_hint(&mut self, segment: usize) -> Result<&'a str, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionComplete);
        }
        let seg = self.segment(segment)?;
        let hint = seg.hint().unwrap_or_default();
        if self.buffers.hints.insert(segment) {
            self.hints_used[self.position] += 1;
        }
        Ok(hint)
    }

    // --- internals ---

    fn enter_position(&mut self, position: usize) {
        self.position = position.min(self.order.len());
        if self.position == self.order.len() {
            self.phase = Phase::SessionComplete;
            self.buffers = Buffers::default();
            tracing::info!(score = self.score(), total = self.len(), "quiz session complete");
        } else {
            self.reset_question();
        }
    }

    fn reset_question(&mut self) {
        let Some(question) = self.current_question() else {
            self.phase = Phase::SessionComplete;
            self.buffers = Buffers::default();
            return;
        };
        self.buffers = Buffers::for_question(question);
        self.phase = match self.level {
            Level::Direct => Phase::AssemblingFullEquation,
            Level::Guided => Phase::SelectingSegment,
        };
        self.update_segment_progress();
    }

    fn update_segment_progress(&mut self) {
        if self.phase != Phase::SelectingSegment {
            return;
        }
        let count = self.current_question().map_or(0, Question::segment_count);
        if self.buffers.solved_segments.len() >= count {
            self.buffers.segments_completed = true;
            self.phase = Phase::SegmentComplete;
        }
    }

    fn unlock_full_equation(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::SelectingSegment => Err(SessionError::FullEquationLocked),
            Phase::SegmentComplete => {
                self.phase = Phase::AssemblingFullEquation;
                Ok(())
            }
            Phase::AssemblingFullEquation => Ok(()),
            Phase::QuestionComplete => Err(SessionError::WrongPhase(Phase::QuestionComplete)),
            Phase::SessionComplete => Err(SessionError::SessionComplete),
        }
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else if self.is_complete() {
            Err(SessionError::SessionComplete)
        } else {
            Err(SessionError::WrongPhase(self.phase))
        }
    }

    fn segment(&self, segment: usize) -> Result<&'a Segment, SessionError> {
        let question = self
            .current_question()
            .ok_or(SessionError::SessionComplete)?;
        question
            .segments
            .get(segment)
            .ok_or(SessionError::NoSuchSegment {
                segment,
                count: question.segment_count(),
            })
    }

    fn active_buffer_mut(&mut self) -> Option<&mut String> {
        match self.buffers.active? {
            InputTarget::Keyword { segment, keyword } => Some(
                self.buffers
                    .segments
                    .entry(segment)
                    .or_default()
                    .part_mut(keyword),
            ),
            InputTarget::Slot(slot) => self.buffers.slots.get_mut(slot),
        }
    }
}
