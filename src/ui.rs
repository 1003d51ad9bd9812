use crate::app::{update, AppMsg, Effect};
use crate::forms::FormEvent;
use crate::model::AppConfig;
use crate::services::loader::{spawn_fetch_profile, spawn_submit};
use crate::services::profile::{source_from_config, ProfileSource, User};
use crate::widgets::form_widget::{FormSubmit, FormWidget, SubmitTrigger};
use crate::widgets::profile_card::ProfileCard;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::tabs::{draw_tabs, next_view, view_for_function_key};
use crate::widgets::Widget;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const CONFIG_ENV: &str = "SIGNUP_TUI_CONFIG_DIR";
const CONFIG_FILE: &str = "signup.yaml";
const MAX_LOG_LINES: usize = 200;
const TICK: Duration = Duration::from_millis(200);

/// Messages posted by worker threads and form callbacks; drained once per tick.
pub enum LoadMsg {
    Profile(Result<User, String>),
    SubmitRequested(FormSubmit),
    SubmitFinished(Result<(), String>),
    FormChanged(FormEvent),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    #[default]
    Profile,
    SignUp,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Profile => "Profile",
            View::SignUp => "Sign Up",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

pub struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) view: View,
    pub(crate) profile: ProfileCard,
    pub(crate) form: FormWidget,
    pub(crate) submit_delay: Duration,
    pub(crate) submitted: u64,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) status_text: Option<String>,
    pub(crate) last_error: Option<String>,
    pub(crate) theme: crate::theme::Theme,
    pub(crate) source: Option<Arc<dyn ProfileSource>>,
    pub(crate) tx: Sender<LoadMsg>,
    pub(crate) rx: Receiver<LoadMsg>,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<LoadMsg>();
        let schema = config.form.schema().context("invalid form fields")?;
        let submit_tx = tx.clone();
        let mut form = FormWidget::new(config.form.title.clone(), schema, move |ev| {
            let _ = submit_tx.send(LoadMsg::SubmitRequested(ev));
        });
        let change_tx = tx.clone();
        form.form.subscribe(move |ev| {
            let _ = change_tx.send(LoadMsg::FormChanged(ev.clone()));
        });
        let source = source_from_config(&config.profile.source)?;
        Ok(Self {
            submit_delay: Duration::from_millis(config.form.submit_delay_ms),
            config,
            view: View::default(),
            profile: ProfileCard::default(),
            form,
            submitted: 0,
            tick: 0,
            toast: None,
            status_text: None,
            last_error: None,
            theme: crate::theme::Theme::dark(),
            source: Some(source),
            tx,
            rx,
            debug_log: VecDeque::new(),
        })
    }

    pub fn dbg(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        tracing::debug!(target: "signup_tui::ui", "{msg}");
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg);
    }

    fn show_toast(&mut self, text: String, level: ToastLevel, seconds: u64) {
        let ticks = seconds.saturating_mul(5); // ~200ms tick
        self.toast = Some(Toast {
            text,
            level,
            expires_at_tick: self.tick.saturating_add(ticks),
        });
    }
}

pub(crate) fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::FetchProfile => match state.source.clone() {
                Some(source) => {
                    state.dbg(format!("fetch profile <- {}", source.describe()));
                    spawn_fetch_profile(source, state.tx.clone());
                }
                None => {
                    let effs = update(
                        state,
                        AppMsg::ProfileLoaded(Err("no profile source configured".into())),
                    );
                    run_effects(state, effs);
                }
            },
            Effect::ReloadConfig => {
                let outcome = load_config()
                    .map(|(cfg, _)| cfg)
                    .map_err(|e| format!("{e:#}"));
                let effs = update(state, AppMsg::ConfigLoaded(outcome));
                run_effects(state, effs);
            }
            Effect::StartSubmit { delay } => {
                state.dbg(format!("submitting (simulated {}ms)", delay.as_millis()));
                spawn_submit(delay, state.tx.clone());
            }
            Effect::CopyToClipboard { text } => {
                match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
                    Ok(()) => {
                        state.show_toast("Copied to clipboard".into(), ToastLevel::Info, 2)
                    }
                    Err(e) => {
                        state.dbg(format!("clipboard: {e}"));
                        state.show_toast(format!("Copy failed: {e}"), ToastLevel::Error, 3);
                    }
                }
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => state.show_toast(text, level, seconds),
        }
    }
}

fn pump(state: &mut AppState) {
    let drained: Vec<LoadMsg> = state.rx.try_iter().collect();
    for msg in drained {
        let effects = update(state, msg.into());
        run_effects(state, effects);
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let (cfg, base_dir) = load_config()?;
    let log_path = crate::logging::setup_logging(&cfg.log, base_dir.as_deref())?;
    tracing::info!(config_dir = ?base_dir, "starting");
    let mut state = AppState::new(cfg)?;
    state.dbg(format!("log file: {}", log_path.display()));
    match &base_dir {
        Some(dir) => state.dbg(format!("config: {}", dir.join(CONFIG_FILE).display())),
        None => state.dbg("config: built-in defaults"),
    }
    let effs = update(&mut state, AppMsg::RefreshProfile);
    run_effects(&mut state, effs);

    if env_flag("SIGNUP_TUI_HEADLESS") {
        return run_headless(&mut state);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut last_tick = Instant::now();
    let res = loop {
        terminal.draw(|f| ui(f, &mut state))?;
        let timeout = TICK
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut state, key) {
                    break Ok(());
                }
            }
        }
        pump(&mut state);
        if last_tick.elapsed() >= TICK {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::info!(submitted = state.submitted, "exiting");
    res
}

fn run_headless(state: &mut AppState) -> Result<()> {
    let ticks: u64 = std::env::var("SIGNUP_TUI_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let backend = ratatui::backend::TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend)?;
    for _ in 0..ticks {
        terminal.draw(|f| ui(f, state))?;
        pump(state);
        state.tick = state.tick.wrapping_add(1);
        std::thread::sleep(TICK);
    }
    if env_flag("SIGNUP_TUI_SMOKE_SUMMARY") {
        println!("{}", headless_summary(state));
    }
    Ok(())
}

fn headless_summary(state: &AppState) -> serde_json::Value {
    serde_json::json!({
        "ok": state.last_error.is_none(),
        "view": state.view.as_str(),
        "profile_loaded": state.profile.user.is_some(),
        "submitted": state.submitted,
    })
}

/// Routes one key press. Returns `true` when the app should quit.
fn handle_key(state: &mut AppState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let editing = state.view == View::SignUp && state.form.view.editing;
    let effects = match key.code {
        KeyCode::Char('c') if ctrl => update(state, AppMsg::CopyRequested),
        KeyCode::Char('s') if ctrl => {
            if state.view == View::SignUp {
                state.form.submit(SubmitTrigger::Shortcut)
            } else {
                Vec::new()
            }
        }
        KeyCode::F(5) => vec![Effect::ReloadConfig],
        KeyCode::F(n) => match view_for_function_key(n) {
            Some(view) => update(state, AppMsg::SwitchView(view)),
            None => Vec::new(),
        },
        KeyCode::Tab => {
            let view = next_view(state.view);
            update(state, AppMsg::SwitchView(view))
        }
        KeyCode::Char('q') if !editing => return true,
        KeyCode::Char('r') | KeyCode::Char('R') if state.view == View::Profile => {
            update(state, AppMsg::RefreshProfile)
        }
        // unbound Ctrl/Alt chords must not type their letter
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => Vec::new(),
        code => match state.view {
            View::Profile => state.profile.on_key(code),
            View::SignUp => state.form.on_key(code),
        },
    };
    run_effects(state, effects);
    false
}

/// Candidate config files in lookup order. An explicit directory wins outright.
fn config_candidates(env_dir: Option<PathBuf>, cwd: &Path, home: Option<PathBuf>) -> Vec<PathBuf> {
    if let Some(dir) = env_dir {
        return vec![dir.join(CONFIG_FILE)];
    }
    let mut out = vec![cwd.join(CONFIG_FILE), cwd.join(".tui").join(CONFIG_FILE)];
    if let Some(home) = home {
        out.push(home.join(".tui").join(CONFIG_FILE));
    }
    out
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))
}

/// Returns the config and the directory it was found in; `None` means defaults.
fn load_config() -> Result<(AppConfig, Option<PathBuf>)> {
    let env_dir = std::env::var(CONFIG_ENV).ok().map(PathBuf::from);
    let explicit = env_dir.is_some();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    for p in config_candidates(env_dir, &cwd, home) {
        // a directory named by the env var must hold the file
        if explicit || p.exists() {
            let cfg = read_config(&p)?;
            let base_dir = p.parent().map(Path::to_path_buf);
            return Ok((cfg, base_dir));
        }
    }
    Ok((AppConfig::default(), None))
}

fn help_text(state: &AppState) -> &'static str {
    match state.view {
        View::Profile => "F1/F2 Tab switch  r refresh  F5 reload config  Ctrl+C copy  q quit",
        View::SignUp if state.form.view.editing => "type to edit  Enter/Esc done  Ctrl+S submit",
        View::SignUp => {
            "↑/↓ move  Enter edit/press  ←/→ choose  Ctrl+S submit  Ctrl+C copy  q quit"
        }
    }
}

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }
    let screen = f.area();
    let bg = Block::default().style(Style::default().bg(state.theme.bg));
    f.render_widget(bg, screen);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(screen);
    draw_tabs(f, chunks[0], state);
    let tick = state.tick;
    match state.view {
        View::Profile => state.profile.render(f, chunks[1], true, tick),
        View::SignUp => state.form.render(f, chunks[1], true, tick),
    }
    draw_debug(f, chunks[2], state);
    draw_footer(f, chunks[3], state, help_text(state));
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    // Take last `area.height` lines
    let h = area.height.saturating_sub(1) as usize;
    let start = state.debug_log.len().saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
