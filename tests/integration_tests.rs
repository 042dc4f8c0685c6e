//! Integration tests for the gitdeck CLI.
//!
//! These tests run the binary in one-shot scan mode against temporary
//! project roots and check the printed output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to get the path to the compiled binary
fn gitdeck_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove 'deps' directory
    path.push("gitdeck");
    path
}

fn run_gitdeck(args: &[&str]) -> Output {
    Command::new(gitdeck_bin())
        .args(args)
        .output()
        .expect("Failed to run gitdeck")
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Helper to create a test git repository with one commit
fn create_test_repo(dir: &Path, name: &str) -> PathBuf {
    let repo_path = dir.join(name);
    fs::create_dir(&repo_path).unwrap();
    git(&repo_path, &["init", "-q", "-b", "main"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    fs::write(repo_path.join("README.md"), "# Test\n").unwrap();
    git(&repo_path, &["add", "."]);
    git(&repo_path, &["commit", "-q", "-m", "Initial commit"]);
    repo_path
}

#[test]
fn test_once_lists_repositories() {
    let temp = TempDir::new().unwrap();
    create_test_repo(temp.path(), "alpha");
    create_test_repo(temp.path(), "beta");
    fs::create_dir(temp.path().join("not-a-repo")).unwrap();

    let output = run_gitdeck(&[temp.path().to_str().unwrap(), "--once"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alpha"));
    assert!(stdout.contains("beta"));
    assert!(stdout.contains("[main]"));
    assert!(stdout.contains("no remote"));
    assert!(stdout.contains("\"Initial commit\""));
    assert!(!stdout.contains("not-a-repo"));
}

#[test]
fn test_once_reports_dirty_state() {
    let temp = TempDir::new().unwrap();
    let repo = create_test_repo(temp.path(), "alpha");
    fs::write(repo.join("README.md"), "changed\n").unwrap();
    fs::write(repo.join("extra.txt"), "untracked\n").unwrap();

    let output = run_gitdeck(&[temp.path().to_str().unwrap(), "--once"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("dirty"));
    assert!(stdout.contains("±2"));
}

#[test]
fn test_once_json_output() {
    let temp = TempDir::new().unwrap();
    create_test_repo(temp.path(), "alpha");
    // A regular file named .git must not mark a project
    let marker = temp.path().join("linked");
    fs::create_dir(&marker).unwrap();
    fs::write(marker.join(".git"), "gitdir: /elsewhere\n").unwrap();

    let output = run_gitdeck(&[temp.path().to_str().unwrap(), "--once", "--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let projects = parsed.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "alpha");
    assert_eq!(projects[0]["git"]["branch"], "main");
    assert_eq!(projects[0]["git"]["status"], "noRemote");
    assert_eq!(projects[0]["git"]["uncommitted"], 0);
}

#[test]
fn test_once_empty_root() {
    let temp = TempDir::new().unwrap();
    let output = run_gitdeck(&[temp.path().to_str().unwrap(), "--once"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No projects found."));
}

#[test]
fn test_missing_root_aborts() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");
    let output = run_gitdeck(&[missing.to_str().unwrap(), "--once"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("projects root"));
}

#[test]
fn test_json_requires_once() {
    let temp = TempDir::new().unwrap();
    let output = run_gitdeck(&[temp.path().to_str().unwrap(), "--json"]);
    assert!(!output.status.success());
}

#[test]
fn test_config_file_sets_root() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("projects");
    fs::create_dir(&root).unwrap();
    create_test_repo(&root, "gamma");

    let config_path = temp.path().join("config.toml");
    fs::write(
        &config_path,
        format!("projects_root = \"{}\"\n", root.display()),
    )
    .unwrap();

    let output = run_gitdeck(&["--config", config_path.to_str().unwrap(), "--once"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gamma"));
}

#[test]
fn test_help_mentions_modes() {
    let output = run_gitdeck(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--once"));
    assert!(stdout.contains("--json"));
    assert!(stdout.contains("--theme"));
}
