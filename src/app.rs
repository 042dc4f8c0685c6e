//! The navigation-and-rendering loop.
//!
//! A single actor owns all UI state: terminal events and background
//! results arrive as [`Msg`] values over one channel, the router
//! dispatches them to the active screen, and screens answer with
//! [`Cmd`] values describing deferred work. Long-running work never
//! blocks the loop; it runs on a background thread and posts its result
//! back as a message.

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use log::warn;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::text::Text;
use ratatui::widgets::Paragraph;
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc::{self, Sender};
use std::thread;

use crate::config::AppConfig;
use crate::scanner::{self, ScanOutcome};
use crate::screens::list::ProjectList;
use crate::theme::{self, Styles};

/// Messages delivered into the loop.
pub enum Msg {
    Key(KeyEvent),
    Resize(u16, u16),
    /// One-shot observation of the terminal background darkness
    BackgroundDark(bool),
    /// Completion of a scan command
    ScanFinished(Result<ScanOutcome, String>),
}

/// Deferred work a screen asks the router to perform.
///
/// Commands are plain values; executing one either mutates the screen
/// stack or runs on a background worker that posts a message back.
pub enum Cmd {
    /// Run a scan in the background and deliver [`Msg::ScanFinished`]
    Scan,
    Push(Box<dyn Screen>),
    /// Like push, but the new screen takes over the top slot
    #[allow(dead_code)] // Router operation; no current screen replaces itself
    Replace(Box<dyn Screen>),
    Pop,
    Quit,
}

/// A self-contained UI component on the router's stack.
pub trait Screen {
    /// Called once when the screen is pushed.
    fn init(&mut self) -> Option<Cmd> {
        None
    }

    /// Handle one message, optionally answering with a command.
    fn update(&mut self, msg: Msg) -> Option<Cmd>;

    /// Render the screen at its last known size.
    fn view(&self) -> Text<'static>;

    /// Restyle after a theme change. Screens without themed content
    /// keep the default no-op.
    fn set_theme(&mut self, styles: &Styles) {
        let _ = styles;
    }
}

/// Owns the screen stack, terminal dimensions and theme state.
pub struct Router {
    screens: Vec<Box<dyn Screen>>,
    theme_name: String,
    styles: Styles,
    width: u16,
    height: u16,
    is_dark: bool,
    quitting: bool,
}

impl Router {
    pub fn new(theme_name: &str, is_dark: bool, mut root: Box<dyn Screen>) -> Self {
        let styles = Styles::from_palette(&theme::palette(theme_name, is_dark));
        root.set_theme(&styles);
        Self {
            screens: vec![root],
            theme_name: theme_name.to_string(),
            styles,
            width: 0,
            height: 0,
            is_dark,
            quitting: false,
        }
    }

    /// Run the root screen's `init` and deliver the initial window
    /// size. Returns the external effects to execute.
    pub fn bootstrap(&mut self, width: u16, height: u16) -> Vec<Cmd> {
        self.width = width;
        self.height = height;
        let mut queue = VecDeque::new();
        if let Some(active) = self.screens.last_mut() {
            if let Some(cmd) = active.init() {
                queue.push_back(cmd);
            }
            if let Some(cmd) = active.update(Msg::Resize(width, height)) {
                queue.push_back(cmd);
            }
        }
        self.drain(queue)
    }

    /// Route one message and return the external effects it produced.
    pub fn dispatch(&mut self, msg: Msg) -> Vec<Cmd> {
        let mut queue = VecDeque::new();
        match msg {
            Msg::Key(key) if is_interrupt(&key) => queue.push_back(Cmd::Quit),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                if let Some(active) = self.screens.last_mut()
                    && let Some(cmd) = active.update(Msg::Resize(width, height))
                {
                    queue.push_back(cmd);
                }
            }
            Msg::BackgroundDark(is_dark) => {
                if is_dark != self.is_dark {
                    self.is_dark = is_dark;
                    self.styles = Styles::from_palette(&theme::palette(&self.theme_name, is_dark));
                    // Screens below the active one must be restyled too,
                    // so they come back correct when re-exposed by a pop
                    for screen in &mut self.screens {
                        screen.set_theme(&self.styles);
                    }
                }
            }
            other => {
                if let Some(active) = self.screens.last_mut()
                    && let Some(cmd) = active.update(other)
                {
                    queue.push_back(cmd);
                }
            }
        }
        self.drain(queue)
    }

    /// Apply navigation commands to the stack; everything else is an
    /// external effect handed back to the caller.
    fn drain(&mut self, mut queue: VecDeque<Cmd>) -> Vec<Cmd> {
        let mut effects = Vec::new();
        while let Some(cmd) = queue.pop_front() {
            match cmd {
                Cmd::Push(screen) => self.push(screen, &mut queue),
                Cmd::Replace(screen) => {
                    self.screens.pop();
                    self.push(screen, &mut queue);
                }
                Cmd::Pop => self.pop(&mut queue),
                Cmd::Quit => {
                    self.quitting = true;
                    effects.push(Cmd::Quit);
                }
                Cmd::Scan => effects.push(Cmd::Scan),
            }
        }
        effects
    }

    fn push(&mut self, mut screen: Box<dyn Screen>, queue: &mut VecDeque<Cmd>) {
        screen.set_theme(&self.styles);
        if let Some(cmd) = screen.init() {
            queue.push_back(cmd);
        }
        if let Some(cmd) = screen.update(Msg::Resize(self.width, self.height)) {
            queue.push_back(cmd);
        }
        self.screens.push(screen);
    }

    /// The root screen never pops; the exposed screen gets a synthetic
    /// size event so it can relayout.
    fn pop(&mut self, queue: &mut VecDeque<Cmd>) {
        if self.screens.len() > 1 {
            self.screens.pop();
            if let Some(top) = self.screens.last_mut()
                && let Some(cmd) = top.update(Msg::Resize(self.width, self.height))
            {
                queue.push_back(cmd);
            }
        }
    }

    /// The active screen's view; empty once shutdown was requested.
    pub fn view(&self) -> Text<'static> {
        if self.quitting {
            return Text::default();
        }
        match self.screens.last() {
            Some(screen) => screen.view(),
            None => Text::default(),
        }
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    /// Style for the terminal frame the view is drawn into.
    pub fn frame_style(&self) -> ratatui::style::Style {
        self.styles.frame
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        self.screens.len()
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Run the dashboard until the user quits.
pub fn run(config: AppConfig) -> Result<()> {
    enable_raw_mode().context("cannot enable terminal raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, SetTitle(&config.window_title))?;
    if config.alt_screen {
        execute!(stdout, EnterAlternateScreen)?;
    }
    if config.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    spawn_input_thread(tx.clone());
    spawn_darkness_probe(tx.clone());

    let (width, height) = crossterm::terminal::size().unwrap_or((0, 0));
    let root = ProjectList::new(config.app_name.clone());
    let mut router = Router::new(&config.theme.name, config.theme.is_dark, Box::new(root));

    let effects = router.bootstrap(width, height);
    execute_effects(effects, &config, &tx);

    loop {
        terminal.draw(|frame| {
            let view = Paragraph::new(router.view()).style(router.frame_style());
            frame.render_widget(view, frame.area());
        })?;

        let Ok(msg) = rx.recv() else { break };
        let effects = router.dispatch(msg);
        execute_effects(effects, &config, &tx);
        if router.quitting() {
            break;
        }
    }

    // Restore the terminal in reverse setup order
    if config.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    if config.alt_screen {
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    }
    disable_raw_mode()?;
    terminal.show_cursor()?;

    Ok(())
}

fn execute_effects(effects: Vec<Cmd>, config: &AppConfig, tx: &Sender<Msg>) {
    for cmd in effects {
        if let Cmd::Scan = cmd {
            spawn_scan(config.clone(), tx.clone());
        }
    }
}

/// Forward terminal events into the message channel until the channel
/// closes.
fn spawn_input_thread(tx: Sender<Msg>) {
    thread::spawn(move || {
        loop {
            let msg = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Ok(Event::Resize(width, height)) => Msg::Resize(width, height),
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
}

/// Ask the terminal for its background darkness once; stay silent when
/// it cannot tell, leaving the configured assumption in place.
fn spawn_darkness_probe(tx: Sender<Msg>) {
    thread::spawn(move || {
        if let Some(is_dark) = theme::detect_dark_background() {
            let _ = tx.send(Msg::BackgroundDark(is_dark));
        }
    });
}

fn spawn_scan(config: AppConfig, tx: Sender<Msg>) {
    thread::spawn(move || {
        let result = scanner::scan(&config).map_err(|err| {
            warn!("scan failed: {err:#}");
            format!("{err:#}")
        });
        // The receiver is gone during shutdown; the result is ignored
        let _ = tx.send(Msg::ScanFinished(result));
    });
}
