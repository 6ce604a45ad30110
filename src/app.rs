use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rust_i18n::t;

use simeq::bank::QuestionBank;
use simeq::config::Config;
use simeq::engine::Feedback;
use simeq::session::{InputTarget, Level, Phase, QuizSession, SessionError, SessionSummary};

use crate::ui::components::keypad::{KeypadKey, KeypadState};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(4);
pub const SETTINGS_FIELDS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Quiz,
    Summary,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub bank: &'static QuestionBank,
    pub quiz: Option<QuizSession<'static>>,
    pub last_summary: Option<SessionSummary>,
    pub keypad: KeypadState,
    pub show_cheatsheet: bool,
    pub cheatsheet_scroll: u16,
    pub question_scroll: u16,
    pub settings_selected: usize,
    pub status: Option<(String, Instant)>,
    pub should_quit: bool,
    themes: HashMap<String, &'static Theme>,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config, bank: QuestionBank) -> Self {
        let mut themes = HashMap::new();
        let theme = load_theme(&mut themes, &config.theme);
        rust_i18n::set_locale(&config.locale);
        let mut menu = Menu::new(theme);
        menu.selected = match config.level {
            Level::Guided => 0,
            Level::Direct => 1,
        };

        Self {
            screen: AppScreen::Menu,
            menu,
            theme,
            config,
            bank: Box::leak(Box::new(bank)),
            quiz: None,
            last_summary: None,
            keypad: KeypadState::default(),
            show_cheatsheet: false,
            cheatsheet_scroll: 0,
            question_scroll: 0,
            settings_selected: 0,
            status: None,
            should_quit: false,
            themes,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn start_quiz(&mut self, level: Level) {
        self.quiz = Some(QuizSession::with_rng(self.bank, level, &mut self.rng));
        self.last_summary = None;
        self.status = None;
        self.question_scroll = 0;
        self.keypad = KeypadState::default();
        self.screen = AppScreen::Quiz;
        self.ensure_focus();
    }

    pub fn restart(&mut self) {
        let level = self
            .last_summary
            .as_ref()
            .map_or(self.config.level, |summary| summary.level);
        self.start_quiz(level);
    }

    pub fn go_to_menu(&mut self) {
        self.show_cheatsheet = false;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_settings(&mut self) {
        self.settings_selected = 0;
        self.screen = AppScreen::Settings;
    }

    pub fn open_cheatsheet(&mut self) {
        self.cheatsheet_scroll = 0;
        self.show_cheatsheet = true;
    }

    pub fn tick(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > STATUS_TTL)
        {
            self.status = None;
        }
    }

    fn set_status(&mut self, text: String) {
        self.status = Some((text, Instant::now()));
    }

    fn report(&mut self, err: SessionError) {
        tracing::debug!(%err, "rejected quiz action");
        self.set_status(error_text(&err));
    }

    // --- quiz input ---

    pub fn type_char(&mut self, ch: char) {
        self.ensure_focus();
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.input_char(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.delete_char();
        }
    }

    pub fn clear_input(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.clear_input();
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.ensure_focus();
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(target) = quiz.active_target() else {
            return;
        };
        let line = text.lines().next().unwrap_or_default();
        if let Err(err) = quiz.set_input(target, line) {
            self.report(err);
        }
    }

    pub fn press_keypad(&mut self) {
        match self.keypad.selected() {
            KeypadKey::Char(ch) => self.type_char(ch),
            KeypadKey::Clear => self.clear_input(),
            KeypadKey::Delete => self.backspace(),
            KeypadKey::Submit => self.submit(),
        }
    }

    /// Tab order: keyword parts of unsolved sentences, or the equation slots.
    pub fn move_focus(&mut self, forward: bool) {
        let Some(quiz) = self.quiz.as_ref() else {
            return;
        };
        let targets = focus_targets(quiz);
        if targets.is_empty() {
            return;
        }
        let len = targets.len();
        let next = match quiz
            .active_target()
            .and_then(|active| targets.iter().position(|t| *t == active))
        {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.focus(targets[next]);
    }

    fn focus(&mut self, target: InputTarget) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let result = match target {
            InputTarget::Keyword { segment, keyword } => quiz.select_keyword(segment, keyword),
            InputTarget::Slot(slot) => quiz.select_slot(slot),
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    /// Put the cursor somewhere sensible when nothing editable is focused.
    fn ensure_focus(&mut self) {
        let Some(quiz) = self.quiz.as_ref() else {
            return;
        };
        let targets = focus_targets(quiz);
        let focused = quiz
            .active_target()
            .is_some_and(|active| targets.contains(&active));
        if !focused && let Some(&first) = targets.first() {
            self.focus(first);
        }
    }

    pub fn submit(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.phase() {
            Phase::SelectingSegment => {
                let Some(InputTarget::Keyword { segment, .. }) = quiz.active_target() else {
                    self.ensure_focus();
                    return;
                };
                match quiz.submit_segment(segment) {
                    Ok(Feedback::Correct) => self.ensure_focus(),
                    Ok(Feedback::Incorrect) => {}
                    Err(err) => self.report(err),
                }
            }
            Phase::SegmentComplete => {
                if let Err(err) = quiz.begin_full_equation() {
                    self.report(err);
                }
                self.ensure_focus();
            }
            Phase::AssemblingFullEquation => {
                if let Err(err) = quiz.submit_final() {
                    self.report(err);
                }
            }
            Phase::QuestionComplete => {
                let result = quiz.advance();
                self.after_navigation(result);
            }
            Phase::SessionComplete => self.finish(),
        }
    }

    pub fn skip(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            let result = quiz.skip();
            self.after_navigation(result);
        }
    }

    pub fn previous(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            let result = quiz.previous();
            self.after_navigation(result);
        }
    }

    fn after_navigation(&mut self, result: Result<Phase, SessionError>) {
        match result {
            Ok(Phase::SessionComplete) => self.finish(),
            Ok(_) => {
                self.question_scroll = 0;
                self.status = None;
                self.ensure_focus();
            }
            Err(err) => self.report(err),
        }
    }

    fn finish(&mut self) {
        if let Some(quiz) = self.quiz.take() {
            let summary = quiz.summary();
            tracing::info!(score = summary.score, total = summary.total, "showing summary");
            self.last_summary = Some(summary);
        }
        self.screen = AppScreen::Summary;
    }

    pub fn toggle_level(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.set_level(quiz.level().toggled());
            self.status = None;
            self.ensure_focus();
        }
    }

    /// Reveal the hint for the focused sentence, or the next unrevealed one.
    pub fn reveal_hint(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(question) = quiz.current_question() else {
            return;
        };
        let segment = match quiz.active_target() {
            Some(InputTarget::Keyword { segment, .. }) if !quiz.hint_revealed(segment) => {
                Some(segment)
            }
            _ => (0..question.segment_count()).find(|&s| !quiz.hint_revealed(s)),
        };
        if let Some(segment) = segment
            && let Err(err) = quiz.reveal_hint(segment)
        {
            self.report(err);
        }
    }

    pub fn toggle_keypad(&mut self) {
        self.config.keypad_visible = !self.config.keypad_visible;
    }

    // --- settings ---

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let names = Theme::available_themes();
                if names.is_empty() {
                    return;
                }
                let current = names.iter().position(|n| *n == self.config.theme);
                let len = names.len();
                let next = match current {
                    Some(i) if forward => (i + 1) % len,
                    Some(i) => (i + len - 1) % len,
                    None => 0,
                };
                self.config.theme = names[next].clone();
                self.theme = load_theme(&mut self.themes, &self.config.theme);
                self.rebuild_menu();
            }
            1 => {
                self.config.cycle_locale(forward);
                rust_i18n::set_locale(&self.config.locale);
                self.rebuild_menu();
            }
            2 => self.config.level = self.config.level.toggled(),
            3 => self.toggle_keypad(),
            _ => {}
        }
    }

    pub fn save_settings(&mut self) {
        if let Err(err) = self.config.save() {
            tracing::warn!(%err, "failed to save config");
            self.set_status(t!("error.save_config", error = err.to_string()).to_string());
        }
    }

    fn rebuild_menu(&mut self) {
        let selected = self.menu.selected;
        self.menu = Menu::new(self.theme);
        self.menu.selected = selected;
    }
}

/// Leaks each theme at most once so widgets can hold `&'static Theme`.
fn load_theme(cache: &mut HashMap<String, &'static Theme>, name: &str) -> &'static Theme {
    *cache.entry(name.to_string()).or_insert_with(|| {
        let theme = Theme::load(name).unwrap_or_else(|| {
            tracing::warn!(theme = name, "unknown theme, using default");
            Theme::default()
        });
        Box::leak(Box::new(theme))
    })
}

fn focus_targets(quiz: &QuizSession<'_>) -> Vec<InputTarget> {
    let Some(question) = quiz.current_question() else {
        return Vec::new();
    };
    match quiz.phase() {
        Phase::SelectingSegment => question
            .segments
            .iter()
            .enumerate()
            .filter(|(s, _)| !quiz.is_segment_solved(*s))
            .flat_map(|(segment, seg)| {
                seg.display_order()
                    .into_iter()
                    .filter(move |&k| seg.takes_input(k))
                    .map(move |keyword| InputTarget::Keyword { segment, keyword })
            })
            .collect(),
        Phase::AssemblingFullEquation => (0..question.slot_count()).map(InputTarget::Slot).collect(),
        _ => Vec::new(),
    }
}

fn error_text(err: &SessionError) -> String {
    let text = match err {
        SessionError::FullEquationLocked => t!("error.locked"),
        SessionError::SegmentSolved(_) => t!("error.solved"),
        SessionError::NoSuchInput { .. } => t!("error.no_input"),
        SessionError::AtFirstQuestion => t!("error.first_question"),
        SessionError::SessionComplete => t!("error.complete"),
        SessionError::NoSuchSegment { .. }
        | SessionError::NoSuchSlot { .. }
        | SessionError::WrongPhase(_) => t!("error.wrong_phase"),
    };
    text.to_string()
}
