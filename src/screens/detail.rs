//! The project-detail screen: every collected field of one repository.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Text};

use crate::app::{Cmd, Msg, Screen};
use crate::project::Project;
use crate::theme::Styles;

/// Shows the project captured at push time; the value never changes
/// for the lifetime of the screen.
pub struct ProjectDetail {
    project: Project,
    show_help: bool,
    width: u16,
    height: u16,
    styles: Styles,
}

impl ProjectDetail {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            show_help: false,
            width: 0,
            height: 0,
            styles: Styles::default(),
        }
    }
}

impl Screen for ProjectDetail {
    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        match msg {
            Msg::Key(key) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Cmd::Pop),
                KeyCode::Char('?') => {
                    self.show_help = !self.show_help;
                    None
                }
                _ => None,
            },
            Msg::Resize(width, height) => {
                self.width = width;
                self.height = height;
                None
            }
            _ => None,
        }
    }

    fn view(&self) -> Text<'static> {
        if self.width == 0 || self.height == 0 {
            return Text::raw("Loading...");
        }

        let git = &self.project.git;
        let mut lines = vec![
            Line::styled(self.project.name.clone(), self.styles.title),
            Line::raw(format!("Path: {}", self.project.path.display())),
        ];
        if let Some(language) = &self.project.language {
            lines.push(Line::raw(format!("Language: {language}")));
        }
        lines.push(Line::default());
        lines.push(Line::styled("Git Status:".to_string(), self.styles.status));
        lines.push(Line::raw(format!("  Branch: {}", git.branch)));
        if git.remote.is_empty() {
            lines.push(Line::raw("  Remote: (none)"));
        } else {
            lines.push(Line::raw(format!("  Remote: {}", git.remote)));
        }
        if git.uncommitted > 0 {
            lines.push(Line::raw(format!("  Uncommitted: {} file(s)", git.uncommitted)));
        }
        if git.unpushed > 0 {
            lines.push(Line::raw(format!("  Unpushed: {} commit(s)", git.unpushed)));
        }
        if git.unpulled > 0 {
            lines.push(Line::raw(format!("  Unpulled: {} commit(s)", git.unpulled)));
        }
        if !git.last_commit_message.is_empty() {
            lines.push(Line::raw(format!(
                "  Last commit: \"{}\"",
                git.last_commit_message
            )));
        }
        if !git.last_commit_author.is_empty() {
            lines.push(Line::raw(format!("  Author: {}", git.last_commit_author)));
        }

        lines.push(Line::default());
        if self.show_help {
            lines.push(Line::styled(
                "esc/q  back to project list".to_string(),
                self.styles.subtle,
            ));
            lines.push(Line::styled("?      close help".to_string(), self.styles.subtle));
        } else {
            lines.push(Line::styled("esc back · ? help".to_string(), self.styles.subtle));
        }
        Text::from(lines)
    }

    fn set_theme(&mut self, styles: &Styles) {
        self.styles = *styles;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{GitStatus, StatusKind};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::path::PathBuf;

    fn detail(git: GitStatus) -> ProjectDetail {
        let mut screen = ProjectDetail::new(Project::new(
            "alpha".to_string(),
            PathBuf::from("/projects/alpha"),
            git,
        ));
        screen.update(Msg::Resize(100, 30));
        screen
    }

    fn press(screen: &mut ProjectDetail, code: KeyCode) -> Option<Cmd> {
        screen.update(Msg::Key(KeyEvent::new(code, KeyModifiers::empty())))
    }

    #[test]
    fn test_zero_size_renders_loading() {
        let mut screen = ProjectDetail::new(Project::new(
            "alpha".to_string(),
            PathBuf::from("/projects/alpha"),
            GitStatus::default(),
        ));
        screen.update(Msg::Resize(0, 0));
        assert_eq!(screen.view().to_string(), "Loading...");
    }

    #[test]
    fn test_escape_and_q_pop() {
        let mut screen = detail(GitStatus::default());
        assert!(matches!(press(&mut screen, KeyCode::Esc), Some(Cmd::Pop)));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('q')),
            Some(Cmd::Pop)
        ));
        assert!(press(&mut screen, KeyCode::Char('x')).is_none());
    }

    #[test]
    fn test_view_shows_all_populated_fields() {
        let screen = detail(GitStatus {
            branch: "main".to_string(),
            remote: "origin/main".to_string(),
            uncommitted: 2,
            unpushed: 3,
            unpulled: 1,
            last_commit_message: "Fix the frobnicator".to_string(),
            last_commit_author: "Test User".to_string(),
            last_commit_time: None,
            status: StatusKind::Diverged,
        });

        let view = screen.view().to_string();
        assert!(view.contains("alpha"));
        assert!(view.contains("Path: /projects/alpha"));
        assert!(view.contains("Git Status:"));
        assert!(view.contains("  Branch: main"));
        assert!(view.contains("  Remote: origin/main"));
        assert!(view.contains("  Uncommitted: 2 file(s)"));
        assert!(view.contains("  Unpushed: 3 commit(s)"));
        assert!(view.contains("  Unpulled: 1 commit(s)"));
        assert!(view.contains("  Last commit: \"Fix the frobnicator\""));
        assert!(view.contains("  Author: Test User"));
    }

    #[test]
    fn test_view_omits_zero_fields_and_marks_missing_remote() {
        let screen = detail(GitStatus {
            branch: "main".to_string(),
            ..GitStatus::default()
        });

        let view = screen.view().to_string();
        assert!(view.contains("  Branch: main"));
        assert!(view.contains("  Remote: (none)"));
        assert!(!view.contains("Uncommitted"));
        assert!(!view.contains("Unpushed"));
        assert!(!view.contains("Unpulled"));
        assert!(!view.contains("Last commit"));
        assert!(!view.contains("Author"));
        assert!(!view.contains("Language"));
    }

    #[test]
    fn test_help_toggle() {
        let mut screen = detail(GitStatus::default());
        assert!(!screen.view().to_string().contains("back to project list"));
        press(&mut screen, KeyCode::Char('?'));
        assert!(screen.view().to_string().contains("back to project list"));
        press(&mut screen, KeyCode::Char('?'));
        assert!(!screen.view().to_string().contains("back to project list"));
    }
}
