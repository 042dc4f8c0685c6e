//! The project-list screen: a scannable, filterable overview of every
//! repository under the root.

use chrono::Utc;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span, Text};

use crate::app::{Cmd, Msg, Screen};
use crate::banner;
use crate::project::{Project, StatusKind};
use crate::screens::{format_age, truncate_subject};
use crate::theme::Styles;

const SUBJECT_WIDTH: usize = 30;

pub struct ProjectList {
    app_name: String,
    projects: Vec<Project>,
    selected: usize,
    scanning: bool,
    filter_text: String,
    filtering: bool,
    probe_failures: usize,
    scan_failed: bool,
    show_help: bool,
    width: u16,
    height: u16,
    styles: Styles,
}

impl ProjectList {
    pub fn new(app_name: String) -> Self {
        Self {
            app_name,
            projects: Vec::new(),
            selected: 0,
            scanning: false,
            filter_text: String::new(),
            filtering: false,
            probe_failures: 0,
            scan_failed: false,
            show_help: false,
            width: 0,
            height: 0,
            styles: Styles::default(),
        }
    }

    /// Projects whose name contains the filter text, case-insensitive.
    /// An empty filter passes everything; the underlying list is never
    /// touched.
    fn filtered(&self) -> Vec<&Project> {
        if self.filter_text.is_empty() {
            return self.projects.iter().collect();
        }
        let needle = self.filter_text.to_lowercase();
        self.projects
            .iter()
            .filter(|project| project.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.filtered().len().saturating_sub(1));
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Cmd> {
        if self.filtering {
            match key.code {
                KeyCode::Esc => {
                    self.filtering = false;
                    self.filter_text.clear();
                    self.clamp_selection();
                }
                KeyCode::Enter => self.filtering = false,
                KeyCode::Backspace => {
                    self.filter_text.pop();
                    self.clamp_selection();
                }
                KeyCode::Char(c) => {
                    self.filter_text.push(c);
                    self.clamp_selection();
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                let len = self.filtered().len();
                if len > 0 && self.selected < len - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Char('r') => {
                // Re-entry while a scan is in flight is suppressed
                if !self.scanning {
                    self.scanning = true;
                    return Some(Cmd::Scan);
                }
            }
            KeyCode::Char('/') => {
                self.filtering = true;
                self.filter_text.clear();
                self.clamp_selection();
            }
            KeyCode::Enter => {
                if let Some(project) = self.filtered().get(self.selected) {
                    let detail = super::detail::ProjectDetail::new((*project).clone());
                    return Some(Cmd::Push(Box::new(detail)));
                }
            }
            KeyCode::Esc => return Some(Cmd::Pop),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            _ => {}
        }
        None
    }

    fn status_line(&self) -> Line<'static> {
        if self.scanning {
            return Line::styled("Scanning...".to_string(), self.styles.status);
        }
        if self.scan_failed || self.projects.is_empty() {
            return Line::styled("No projects found.".to_string(), self.styles.subtle);
        }
        let mut spans = vec![Span::styled(
            format!("{} projects", self.projects.len()),
            self.styles.status,
        )];
        if self.probe_failures > 0 {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} probe failure(s)", self.probe_failures),
                self.styles.warning,
            ));
        }
        Line::from(spans)
    }

    fn filter_line(&self) -> Line<'static> {
        if self.filtering {
            Line::from(vec![
                Span::styled("/".to_string(), self.styles.info),
                Span::raw(self.filter_text.clone()),
                Span::styled("█".to_string(), self.styles.subtle),
            ])
        } else {
            Line::styled(format!("filter: {}", self.filter_text), self.styles.subtle)
        }
    }

    fn row(&self, project: &Project, selected: bool) -> Line<'static> {
        let git = &project.git;
        let mut spans = vec![
            Span::raw(if selected { "▸ " } else { "  " }),
            Span::raw(project.name.clone()),
        ];

        if !git.branch.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("[{}]", git.branch), self.styles.subtle));
        }

        let (glyph, style) = match git.status {
            StatusKind::Clean => ("✓", self.styles.success),
            StatusKind::Dirty => ("●", self.styles.warning),
            StatusKind::Ahead => ("↑", self.styles.info),
            StatusKind::Behind => ("↓", self.styles.info),
            StatusKind::Diverged => ("⚠", self.styles.error),
            StatusKind::NoRemote => ("○", self.styles.subtle),
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(glyph.to_string(), style));

        if git.uncommitted > 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("±{}", git.uncommitted),
                self.styles.warning,
            ));
        }
        if git.unpushed > 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("↑{}", git.unpushed), self.styles.info));
        }
        if git.unpulled > 0 {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("↓{}", git.unpulled), self.styles.info));
        }

        if !git.last_commit_message.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!(
                    "\"{}\"",
                    truncate_subject(&git.last_commit_message, SUBJECT_WIDTH)
                ),
                self.styles.subtle,
            ));
        }

        if let Some(time) = git.last_commit_time {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format_age(Utc::now().signed_duration_since(time)),
                self.styles.subtle,
            ));
        }

        Line::from(spans)
    }

    fn help_lines(&self) -> Vec<Line<'static>> {
        if !self.show_help {
            return vec![Line::styled(
                "? help".to_string(),
                self.styles.subtle,
            )];
        }
        [
            "↑/k        move up",
            "↓/j        move down",
            "enter      open project details",
            "/          filter by name",
            "r          rescan projects",
            "esc        leave filter / back",
            "?          close help",
            "ctrl+c     quit",
        ]
        .iter()
        .map(|line| Line::styled(line.to_string(), self.styles.subtle))
        .collect()
    }
}

impl Screen for ProjectList {
    fn init(&mut self) -> Option<Cmd> {
        self.scanning = true;
        Some(Cmd::Scan)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                None
            }
            Msg::ScanFinished(result) => {
                self.scanning = false;
                match result {
                    Ok(outcome) => {
                        self.scan_failed = false;
                        self.probe_failures = outcome.probe_failures;
                        self.projects = outcome.projects;
                        self.projects.sort_by(|a, b| a.name.cmp(&b.name));
                    }
                    Err(_) => {
                        self.scan_failed = true;
                        self.probe_failures = 0;
                        self.projects = Vec::new();
                    }
                }
                self.clamp_selection();
                None
            }
            Msg::BackgroundDark(_) => None,
        }
    }

    fn view(&self) -> Text<'static> {
        if self.width == 0 || self.height == 0 {
            return Text::raw("Loading...");
        }

        let mut lines: Vec<Line> = banner::render(&self.app_name, self.width as usize)
            .lines()
            .map(|line| Line::styled(line.to_string(), self.styles.title))
            .collect();
        lines.push(self.status_line());
        if self.filtering || !self.filter_text.is_empty() {
            lines.push(self.filter_line());
        }
        lines.push(Line::default());

        let selected = self.selected;
        for (index, project) in self.filtered().iter().enumerate() {
            lines.push(self.row(project, index == selected));
        }

        lines.push(Line::default());
        lines.extend(self.help_lines());
        Text::from(lines)
    }

    fn set_theme(&mut self, styles: &Styles) {
        self.styles = *styles;
    }
}
