//! Git status probe for a single repository.
//!
//! Derives a [`GitStatus`] by shelling out to the host `git` executable
//! with the repository as working directory. Every query is bounded by
//! the configured probe timeout; a query that fails or times out leaves
//! its field at the zero value instead of failing the whole probe. Only
//! an undeterminable branch makes the probe itself return an error.

use anyhow::{Context, Result, bail};
use chrono::DateTime;
use log::warn;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::project::{GitStatus, StatusKind};

/// Collect the git state of the repository at `repo`.
pub fn probe(repo: &Path, timeout: Duration) -> Result<GitStatus> {
    let branch = git(repo, &["rev-parse", "--abbrev-ref", "HEAD"], timeout)
        .with_context(|| format!("cannot determine branch of {}", repo.display()))?;

    // No upstream is a normal condition, not a failure
    let remote = git(repo, &["rev-parse", "--abbrev-ref", "@{u}"], timeout).unwrap_or_default();

    let uncommitted = match git(repo, &["status", "--porcelain"], timeout) {
        Ok(out) => out.lines().filter(|line| !line.trim().is_empty()).count(),
        Err(err) => {
            warn!("status query failed for {}: {err:#}", repo.display());
            0
        }
    };

    let (unpushed, unpulled) = if remote.is_empty() {
        (0, 0)
    } else {
        (
            count_query(repo, &["rev-list", "@{u}..HEAD", "--count"], timeout),
            count_query(repo, &["rev-list", "HEAD..@{u}", "--count"], timeout),
        )
    };

    let (last_commit_message, last_commit_author, last_commit_time) = last_commit(repo, timeout);

    Ok(GitStatus {
        status: StatusKind::derive(&remote, uncommitted, unpushed, unpulled),
        branch,
        remote,
        uncommitted,
        unpushed,
        unpulled,
        last_commit_message,
        last_commit_author,
        last_commit_time,
    })
}

/// Run a counting query; any failure degrades to 0.
fn count_query(repo: &Path, args: &[&str], timeout: Duration) -> usize {
    match git(repo, args, timeout) {
        Ok(out) => match out.parse() {
            Ok(count) => count,
            Err(_) => {
                warn!("git {} printed non-numeric output for {}", args.join(" "), repo.display());
                0
            }
        },
        Err(err) => {
            warn!("git {} failed for {}: {err:#}", args.join(" "), repo.display());
            0
        }
    }
}

/// Subject, author and commit time of the most recent commit.
///
/// The subject may itself contain the `|` delimiter, so the line is
/// split from the right: timestamp and author first, subject keeps the
/// remainder.
fn last_commit(
    repo: &Path,
    timeout: Duration,
) -> (String, String, Option<chrono::DateTime<chrono::Utc>>) {
    let line = match git(repo, &["log", "-1", "--format=%s|%an|%ct"], timeout) {
        Ok(line) => line,
        Err(err) => {
            warn!("log query failed for {}: {err:#}", repo.display());
            return (String::new(), String::new(), None);
        }
    };

    let mut fields = line.rsplitn(3, '|');
    let epoch = fields.next().unwrap_or_default();
    let author = fields.next().unwrap_or_default().to_string();
    let subject = fields.next().unwrap_or_default().to_string();
    let time = epoch
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    (subject, author, time)
}

/// Run one git query and return its trimmed stdout.
fn git(repo: &Path, args: &[&str], timeout: Duration) -> Result<String> {
    let mut command = Command::new("git");
    command.args(args).current_dir(repo);
    let output = run_with_timeout(command, timeout)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git {} exited with {}: {}", args.join(" "), output.status, stderr.trim());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Run a command, killing it if it exceeds `timeout`.
///
/// Output pipes are drained on a separate thread so a child that writes
/// more than the pipe buffer cannot stall the wait loop.
fn run_with_timeout(mut command: Command, timeout: Duration) -> Result<Output> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("failed to spawn subprocess")?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let drain = thread::spawn(move || {
        let mut out = Vec::new();
        let mut err = Vec::new();
        if let Some(mut pipe) = stdout {
            let _ = pipe.read_to_end(&mut out);
        }
        if let Some(mut pipe) = stderr {
            let _ = pipe.read_to_end(&mut err);
        }
        (out, err)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().context("failed to poll subprocess")? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = drain.join();
                bail!("timed out after {timeout:?}");
            }
            None => thread::sleep(Duration::from_millis(10)),
        }
    };

    let (stdout, stderr) = drain.join().unwrap_or_default();
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}
