mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use simeq::bank::QuestionBank;
use simeq::config::{Config, SUPPORTED_LOCALES};
use simeq::session::Level;

use app::{App, AppScreen, SETTINGS_FIELDS};
use event::{AppEvent, EventHandler};
use ui::components::cheatsheet::Cheatsheet;
use ui::components::keypad::Keypad;
use ui::components::menu::MenuAction;
use ui::components::progress_bar::ProgressBar;
use ui::components::question::QuestionPanel;
use ui::components::summary::SummaryView;
use ui::layout::{AppLayout, pack_hint_lines, wrapped_height};

rust_i18n::i18n!("locales", fallback = "en");

#[derive(Parser)]
#[command(
    name = "simeq",
    version,
    about = "Terminal quiz for building simultaneous equations from word problems"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u8).range(1..=2),
        help = "Starting level: 1 (sentence by sentence) or 2 (equations only)"
    )]
    level: Option<u8>,

    #[arg(long, help = "UI language (zh-HK, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Question bank JSON file to use instead of the bundled one")]
    bank: Option<PathBuf>,

    #[arg(long, help = "Print the question titles and exit")]
    list: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    let start_level = cli.level.and_then(Level::from_number);
    if let Some(level) = start_level {
        config.level = level;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
        config.normalize_locale(SUPPORTED_LOCALES);
    }

    let bank_path = cli.bank.or_else(|| config.question_bank.as_ref().map(PathBuf::from));
    let bank = load_bank(bank_path.as_deref())?;

    if cli.list {
        for question in bank.questions() {
            println!("{:>3}  {}", question.id, question.title);
        }
        return Ok(());
    }

    let mut app = App::new(config, bank);
    if let Some(level) = start_level {
        app.start_quiz(level);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Log to `<data_dir>/simeq/simeq.log` when `SIMEQ_LOG` holds a filter.
fn init_logging() -> Result<()> {
    let Ok(filter) = std::env::var("SIMEQ_LOG") else {
        return Ok(());
    };
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simeq");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("simeq.log"))?;

    tracing_subscriber::registry()
        .with(EnvFilter::new(filter))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(path) => QuestionBank::load(path)
            .with_context(|| format!("loading question bank {}", path.display())),
        None => Ok(QuestionBank::builtin()?),
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Paste(text) => {
                if app.screen == AppScreen::Quiz && !app.show_cheatsheet {
                    app.paste(&text);
                }
            }
            AppEvent::Tick => app.tick(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // The keyword notes modal swallows keys on every screen
    if app.show_cheatsheet {
        handle_cheatsheet_key(app, key);
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::Summary => handle_summary_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_cheatsheet_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q') => app.show_cheatsheet = false,
        KeyCode::Down | KeyCode::Char('j') => {
            let max = app.bank.cheatsheet().len() as u16;
            app.cheatsheet_scroll = (app.cheatsheet_scroll + 1).min(max);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cheatsheet_scroll = app.cheatsheet_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn run_menu_action(app: &mut App, action: MenuAction) {
    match action {
        MenuAction::StartGuided => app.start_quiz(Level::Guided),
        MenuAction::StartDirect => app.start_quiz(Level::Direct),
        MenuAction::KeywordNotes => app.open_cheatsheet(),
        MenuAction::Settings => app.go_to_settings(),
        MenuAction::Quit => app.should_quit = true,
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Up => app.menu.prev(),
        KeyCode::Down | KeyCode::Tab => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            run_menu_action(app, action);
        }
        KeyCode::F(1) => app.open_cheatsheet(),
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                run_menu_action(app, action);
            }
        }
        _ => {}
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => app.skip(),
            KeyCode::Char('p') => app.previous(),
            _ => {}
        }
        return;
    }

    let keypad = app.config.keypad_visible;
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.submit(),
        KeyCode::Tab => app.move_focus(true),
        KeyCode::BackTab => app.move_focus(false),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.clear_input(),
        KeyCode::F(1) => app.open_cheatsheet(),
        KeyCode::F(2) => app.toggle_keypad(),
        KeyCode::F(3) => app.reveal_hint(),
        KeyCode::F(4) => app.toggle_level(),
        KeyCode::PageDown => app.question_scroll = app.question_scroll.saturating_add(3),
        KeyCode::PageUp => app.question_scroll = app.question_scroll.saturating_sub(3),
        KeyCode::Up if keypad => app.keypad.move_up(),
        KeyCode::Down if keypad => app.keypad.move_down(),
        KeyCode::Left if keypad => app.keypad.move_left(),
        KeyCode::Right if keypad => app.keypad.move_right(),
        KeyCode::Char(' ') => {
            if keypad {
                app.press_keypad();
            }
        }
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.go_to_menu(),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.save_settings();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.settings_selected = app.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected + 1 < SETTINGS_FIELDS {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => app.settings_cycle(true),
        KeyCode::Left | KeyCode::Char('h') => app.settings_cycle(false),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Quiz => render_quiz(frame, app),
        AppScreen::Summary => render_summary(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }

    if app.show_cheatsheet {
        let popup = ui::layout::centered_rect(60, 70, area);
        frame.render_widget(
            Cheatsheet::new(app.bank.cheatsheet(), app.cheatsheet_scroll, app.theme),
            popup,
        );
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(" {} ", level_name(app.config.level));
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " simeq ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            header_info,
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(60, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(Span::styled(
        format!(" {}", t!("menu.footer")),
        Style::default().fg(colors.muted()),
    )));
    frame.render_widget(footer, layout[2]);
}

fn level_name(level: Level) -> String {
    match level {
        Level::Guided => t!("level.guided").to_string(),
        Level::Direct => t!("level.direct").to_string(),
    }
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(quiz) = app.quiz.as_ref() else {
        return;
    };

    let mut hints: Vec<String> = vec![
        t!("keys.submit").to_string(),
        t!("keys.focus").to_string(),
        t!("keys.notes").to_string(),
        t!("keys.keypad").to_string(),
        t!("keys.hint").to_string(),
        t!("keys.level").to_string(),
        t!("keys.skip").to_string(),
        t!("keys.previous").to_string(),
        t!("keys.menu").to_string(),
    ];
    if app.config.keypad_visible {
        hints.push(t!("keys.press").to_string());
    }
    let hint_refs: Vec<&str> = hints.iter().map(String::as_str).collect();
    let hint_lines = pack_hint_lines(&hint_refs, area.width as usize);

    let mut footer_lines: Vec<Line> = Vec::new();
    match &app.status {
        Some((text, _)) => footer_lines.push(Line::from(Span::styled(
            format!(" {text}"),
            Style::default().fg(colors.incorrect()),
        ))),
        None => footer_lines.push(Line::from("")),
    }
    footer_lines.extend(
        hint_lines
            .into_iter()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(colors.muted())))),
    );

    let footer_height = wrapped_height(&footer_lines, area.width).min(area.height / 3);
    let app_layout = AppLayout::new(area, footer_height);
    let tier = app_layout.tier;

    let header_text = format!(
        " {} | {} | {} ",
        level_name(quiz.level()),
        t!("quiz.header", current = quiz.position() + 1, total = quiz.len()),
        t!("quiz.score", score = quiz.score(), total = quiz.len()),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    let keypad_below = app.config.keypad_visible && tier.show_keypad_below(area.height);
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if keypad_below {
            vec![Constraint::Min(8), Constraint::Length(Keypad::HEIGHT)]
        } else {
            vec![Constraint::Min(8)]
        })
        .split(app_layout.main);

    frame.render_widget(
        QuestionPanel::new(quiz, app.question_scroll, app.theme),
        main_layout[0],
    );
    let keypad = Keypad::new(&app.keypad, app.theme).focused(quiz.active_target().is_some());
    if keypad_below {
        frame.render_widget(keypad, main_layout[1]);
    } else if let Some(side) = app_layout.side_panel {
        let mut constraints = vec![Constraint::Length(3), Constraint::Length(3)];
        if app.config.keypad_visible {
            constraints.push(Constraint::Length(Keypad::HEIGHT));
        }
        constraints.push(Constraint::Min(0));
        let side_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(side);

        frame.render_widget(
            ProgressBar::new(&t!("quiz.progress"), quiz.position(), quiz.len(), app.theme),
            side_layout[0],
        );
        frame.render_widget(
            ProgressBar::new(&t!("quiz.side_title"), quiz.score(), quiz.len(), app.theme),
            side_layout[1],
        );
        if app.config.keypad_visible {
            frame.render_widget(keypad, side_layout[2]);
        }
    }

    frame.render_widget(
        Paragraph::new(footer_lines).wrap(Wrap { trim: false }),
        app_layout.footer,
    );
}

fn render_summary(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    if let Some(ref summary) = app.last_summary {
        let centered = ui::layout::centered_rect(70, 80, area);
        frame.render_widget(SummaryView::new(summary, app.theme), centered);
    }
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 70, area);

    let block = Block::bordered()
        .title(format!(" {} ", t!("settings.title")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let language = match app.config.locale.as_str() {
        "en" => t!("lang.en"),
        _ => t!("lang.zh-HK"),
    };
    let keypad = if app.config.keypad_visible {
        t!("settings.enabled")
    } else {
        t!("settings.disabled")
    };
    let fields: Vec<(String, String)> = vec![
        (t!("settings.theme").to_string(), app.config.theme.clone()),
        (t!("settings.language").to_string(), language.to_string()),
        (t!("settings.level").to_string(), level_name(app.config.level)),
        (t!("settings.keypad").to_string(), keypad.to_string()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        format!("  {}", t!("settings.help")),
        Style::default().fg(colors.muted()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("    < {value} >");

        let label_style = Style::default()
            .fg(if is_selected { colors.accent() } else { colors.fg() })
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });

        let value_style = Style::default().fg(if is_selected {
            colors.keyword()
        } else {
            colors.muted()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let mut footer = vec![Line::from(Span::styled(
        format!("  {}", t!("settings.footer")),
        Style::default().fg(colors.accent()),
    ))];
    if let Some((text, _)) = &app.status {
        footer.push(Line::from(Span::styled(
            format!("  {text}"),
            Style::default().fg(colors.incorrect()),
        )));
    }
    Paragraph::new(footer).render(layout[3], frame.buffer_mut());
}
