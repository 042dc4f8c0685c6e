//! Concurrent repository discovery under the projects root.
//!
//! Enumerates the direct children of the configured root, keeps the
//! ones holding a `.git` directory, and probes each on a bounded worker
//! pool. A failing probe is logged and counted but never drops the
//! repository from the result.

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkdir::WalkDir;

use crate::config::AppConfig;
use crate::probe;
use crate::project::{GitStatus, Project};

/// Everything one scan produced.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    /// Discovered repositories, in completion order
    pub projects: Vec<Project>,
    /// Repositories whose probe failed and returned zero-valued fields
    pub probe_failures: usize,
}

/// Survey every repository directly under the configured root.
///
/// At most `scan_concurrency` probes run at once, each bounded by the
/// probe timeout. Only a failure to enumerate the root itself is an
/// error; everything below that degrades per repository.
pub fn scan(config: &AppConfig) -> Result<ScanOutcome> {
    let root = &config.projects_root;
    let meta = fs::metadata(root)
        .with_context(|| format!("cannot read projects root {}", root.display()))?;
    if !meta.is_dir() {
        bail!("projects root {} is not a directory", root.display());
    }

    let candidates: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry under {}: {err}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();

    let timeout = config.probe_timeout();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scan_concurrency)
        .build()
        .context("failed to build scan worker pool")?;

    let surveyed: Vec<(Project, bool)> = pool.install(|| {
        candidates
            .par_iter()
            .filter_map(|path| survey(path, timeout))
            .collect()
    });

    let probe_failures = surveyed.iter().filter(|(_, failed)| *failed).count();
    let projects: Vec<Project> = surveyed.into_iter().map(|(project, _)| project).collect();
    debug!(
        "scanned {}: {} projects, {} probe failures",
        root.display(),
        projects.len(),
        probe_failures
    );

    Ok(ScanOutcome {
        projects,
        probe_failures,
    })
}

/// Probe one candidate directory.
///
/// Returns `None` for directories that are not repositories. A probe
/// error still yields a project, flagged as failed, so the dashboard
/// shows the repository with unknown fields rather than hiding it.
fn survey(path: &Path, timeout: Duration) -> Option<(Project, bool)> {
    if !path.join(".git").is_dir() {
        return None;
    }
    let name = path.file_name()?.to_string_lossy().into_owned();

    match probe::probe(path, timeout) {
        Ok(git) => Some((Project::new(name, path.to_path_buf(), git), false)),
        Err(err) => {
            warn!("probe failed for {}: {err:#}", path.display());
            Some((
                Project::new(name, path.to_path_buf(), GitStatus::default()),
                true,
            ))
        }
    }
}
