//! Configuration for gitdeck.
//!
//! Configuration files use TOML format and are searched in order:
//! 1. `./.gitdeck.toml` (current directory)
//! 2. `~/.config/gitdeck/config.toml` (XDG config directory)
//! 3. `~/.gitdeck.toml` (home directory)
//!
//! # Example Configuration
//!
//! ```toml
//! projects_root = "~/code"
//! scan_concurrency = 10
//! probe_timeout_secs = 5
//! app_name = "gitdeck"
//! alt_screen = true
//! mouse_enabled = false
//! window_title = "gitdeck"
//!
//! [theme]
//! name = "default"
//! is_dark = true
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_SCAN_CONCURRENCY: usize = 10;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// The configuration record the engine consumes.
///
/// Call [`AppConfig::resolved`] before handing the record to the
/// scanner: it expands `~` and replaces zero concurrency/timeout values
/// with their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory whose direct children are surveyed
    #[serde(default = "default_projects_root")]
    pub projects_root: PathBuf,

    /// Worker pool size for the scanner; 0 means the default of 10
    #[serde(default = "default_scan_concurrency")]
    pub scan_concurrency: usize,

    /// Upper bound for each git query in seconds; 0 means the default of 5
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Name shown in screen headers
    #[serde(default = "default_app_name")]
    pub app_name: String,

    #[serde(default)]
    pub theme: ThemeConfig,

    /// Draw on the terminal's alternate screen buffer
    #[serde(default = "default_true")]
    pub alt_screen: bool,

    /// Capture mouse events while the dashboard runs
    #[serde(default)]
    pub mouse_enabled: bool,

    #[serde(default = "default_app_name")]
    pub window_title: String,
}

/// Theme selection: a named palette plus the assumed terminal darkness.
///
/// The darkness flag is the starting value; the terminal is asked once
/// at startup and may override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_name")]
    pub name: String,
    #[serde(default)]
    pub is_dark: bool,
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("~/code")
}

fn default_scan_concurrency() -> usize {
    DEFAULT_SCAN_CONCURRENCY
}

fn default_probe_timeout() -> u64 {
    DEFAULT_PROBE_TIMEOUT_SECS
}

fn default_app_name() -> String {
    "gitdeck".to_string()
}

fn default_theme_name() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            projects_root: default_projects_root(),
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            app_name: default_app_name(),
            theme: ThemeConfig::default(),
            alt_screen: true,
            mouse_enabled: false,
            window_title: default_app_name(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: default_theme_name(),
            is_dark: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from the first file found in
    /// the default search order. Falls back to defaults when no file
    /// exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read_file(path);
        }

        let candidates = [
            Some(PathBuf::from(".gitdeck.toml")),
            dirs::home_dir().map(|h| h.join(".config/gitdeck/config.toml")),
            dirs::home_dir().map(|h| h.join(".gitdeck.toml")),
        ];

        for candidate in candidates.into_iter().flatten() {
            if candidate.exists() {
                return Self::read_file(&candidate);
            }
        }

        Ok(Self::default())
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Expand `~` in the projects root and normalize zero values.
    pub fn resolved(mut self) -> Self {
        self.projects_root = expand_tilde(&self.projects_root);
        if self.scan_concurrency == 0 {
            self.scan_concurrency = DEFAULT_SCAN_CONCURRENCY;
        }
        if self.probe_timeout_secs == 0 {
            self.probe_timeout_secs = DEFAULT_PROBE_TIMEOUT_SECS;
        }
        self
    }

    /// Reject a projects root that does not exist or is not a directory.
    pub fn validate(&self) -> Result<()> {
        if !self.projects_root.is_dir() {
            bail!(
                "projects root {} does not exist or is not a directory",
                self.projects_root.display()
            );
        }
        Ok(())
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
