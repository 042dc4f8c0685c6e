//! Core data model: discovered projects and their version-control state.
//!
//! `Project` values are created exclusively by the scanner on each scan,
//! never mutated afterwards, and replaced wholesale by the next scan.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// One repository discovered directly under the projects root.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    /// Basename of the repository directory
    pub name: String,
    /// Absolute path; unique within a scan result
    pub path: PathBuf,
    /// Version-control snapshot collected by the probe
    pub git: GitStatus,
    /// Reserved; not populated by the scanner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Reserved; not populated by the scanner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Reserved; not populated by the scanner
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: String, path: PathBuf, git: GitStatus) -> Self {
        Self {
            name,
            path,
            git,
            language: None,
            size: None,
            last_modified: None,
        }
    }
}

/// Snapshot of one repository's git state.
///
/// Fields a probe query could not determine keep their zero value; a
/// missing `last_commit_time` means "unknown" and is never rendered as
/// a date.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GitStatus {
    /// Current branch short name
    pub branch: String,
    /// Upstream tracking ref; empty if none
    pub remote: String,
    /// Count of modified/untracked entries in the working tree
    pub uncommitted: usize,
    /// Commits on HEAD not reachable from upstream; 0 when `remote` is empty
    pub unpushed: usize,
    /// Commits on upstream not reachable from HEAD; 0 when `remote` is empty
    pub unpulled: usize,
    pub last_commit_message: String,
    pub last_commit_author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_commit_time: Option<DateTime<Utc>>,
    pub status: StatusKind,
}

/// Summary classification of a repository's git state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Clean,
    Dirty,
    Ahead,
    Behind,
    Diverged,
    #[default]
    NoRemote,
}

impl StatusKind {
    /// Classify a repository from its counts and upstream presence.
    ///
    /// Evaluated in a fixed order; the first matching rule wins:
    /// no upstream, dirty, diverged, ahead, behind, clean.
    pub fn derive(remote: &str, uncommitted: usize, unpushed: usize, unpulled: usize) -> Self {
        if remote.is_empty() {
            return if uncommitted > 0 {
                StatusKind::Dirty
            } else {
                StatusKind::NoRemote
            };
        }
        if uncommitted > 0 {
            return StatusKind::Dirty;
        }
        match (unpushed > 0, unpulled > 0) {
            (true, true) => StatusKind::Diverged,
            (true, false) => StatusKind::Ahead,
            (false, true) => StatusKind::Behind,
            (false, false) => StatusKind::Clean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_no_remote() {
        assert_eq!(StatusKind::derive("", 0, 0, 0), StatusKind::NoRemote);
    }

    #[test]
    fn test_derive_no_remote_upgrades_to_dirty() {
        assert_eq!(StatusKind::derive("", 3, 0, 0), StatusKind::Dirty);
    }

    #[test]
    fn test_derive_dirty_wins_over_divergence() {
        // Uncommitted work takes precedence over ahead/behind counts
        assert_eq!(StatusKind::derive("origin/main", 1, 2, 1), StatusKind::Dirty);
    }

    #[test]
    fn test_derive_diverged() {
        assert_eq!(
            StatusKind::derive("origin/main", 0, 2, 1),
            StatusKind::Diverged
        );
    }

    #[test]
    fn test_derive_ahead() {
        assert_eq!(StatusKind::derive("origin/main", 0, 3, 0), StatusKind::Ahead);
    }

    #[test]
    fn test_derive_behind() {
        assert_eq!(
            StatusKind::derive("origin/main", 0, 0, 2),
            StatusKind::Behind
        );
    }

    #[test]
    fn test_derive_clean() {
        assert_eq!(StatusKind::derive("origin/main", 0, 0, 0), StatusKind::Clean);
    }

    #[test]
    fn test_default_status_is_no_remote() {
        let status = GitStatus::default();
        assert_eq!(status.status, StatusKind::NoRemote);
        assert_eq!(status.unpushed, 0);
        assert_eq!(status.unpulled, 0);
        assert!(status.last_commit_time.is_none());
    }

    #[test]
    fn test_project_serialization_skips_reserved_fields() {
        let project = Project::new(
            "alpha".to_string(),
            PathBuf::from("/projects/alpha"),
            GitStatus::default(),
        );
        let json = serde_json::to_string(&project).unwrap();
        assert!(json.contains("\"name\":\"alpha\""));
        assert!(json.contains("\"status\":\"noRemote\""));
        assert!(!json.contains("language"));
        assert!(!json.contains("last_modified"));
    }
}
