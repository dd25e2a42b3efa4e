//! Export of tracked files into another working tree
//!
//! The destination is emptied (except excluded paths such as `.git`) and
//! refilled with the files version control tracks, so it ends up holding
//! exactly the released content.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::git::VersionControlClient;
use crate::inspector;
use crate::warning::ReleaseWarning;

/// Arguments for the export workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ExportWorkflowArgs {
    /// Directory to refill
    pub destination: PathBuf,

    /// Skip the check that HEAD carries a release tag
    pub ignore_on_release: bool,

    /// Overrides `export.recurse_submodules` when set
    pub recurse_submodules: Option<bool>,
}

/// Result of an export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
    /// Entries removed from the destination
    pub removed: usize,

    /// Files copied into the destination
    pub copied: usize,

    /// Non-fatal issues found along the way
    pub warnings: Vec<ReleaseWarning>,
}

/// Check the export preconditions and return the repository toplevel.
///
/// Hard stops when `cwd` is not the toplevel or HEAD is not a release
/// (unless ignored). Rejects a destination that is the repository itself,
/// one of its ancestors, or a directory inside the working tree that holds
/// tracked files. An untracked directory inside the tree (e.g. an ignored
/// `build/`) is accepted.
pub fn check_export<C: VersionControlClient + ?Sized>(
    client: &C,
    cwd: &Path,
    config: &Config,
    args: &ExportWorkflowArgs,
) -> Result<PathBuf> {
    let toplevel = inspector::assert_at_root(client, cwd)?;
    inspector::assert_on_release(client, args.ignore_on_release, &config.tag_pattern()?)?;

    let destination = absolute(cwd, &args.destination);
    let repo = fs::canonicalize(&toplevel).unwrap_or_else(|_| toplevel.clone());
    if repo.starts_with(&destination) {
        return Err(ReleaseError::config(format!(
            "export destination '{}' contains the repository",
            args.destination.display()
        )));
    }

    if let Ok(inside) = destination.strip_prefix(&repo) {
        let files = inspector::tracked_files(client, recurse_submodules(config, args))?;
        if let Some(tracked) = files.iter().find(|f| Path::new(f.as_str()).starts_with(inside)) {
            return Err(ReleaseError::config(format!(
                "export destination '{}' holds tracked file '{}'",
                args.destination.display(),
                tracked
            )));
        }
    }

    Ok(toplevel)
}

fn recurse_submodules(config: &Config, args: &ExportWorkflowArgs) -> bool {
    args.recurse_submodules.unwrap_or(config.export.recurse_submodules)
}

/// Empty the destination and copy every tracked file into it.
///
/// Call [check_export] first. Neither phase is rolled back on failure.
pub fn export_tracked_files<C: VersionControlClient + ?Sized>(
    client: &C,
    toplevel: &Path,
    config: &Config,
    args: &ExportWorkflowArgs,
) -> Result<ExportResult> {
    let files = inspector::tracked_files(client, recurse_submodules(config, args))?;

    let mut warnings = Vec::new();
    if files.is_empty() {
        warnings.push(ReleaseWarning::NoTrackedFiles);
    }

    let destination = absolute(toplevel, &args.destination);
    fs::create_dir_all(&destination).map_err(|e| ReleaseError::file(&destination, e))?;

    let removed = inspector::delete_all_except(&destination, &config.export.exclude)?;
    let copied = inspector::copy_tracked_files(toplevel, &destination, &files)?;

    Ok(ExportResult {
        removed,
        copied,
        warnings,
    })
}

/// `path` made absolute against `base`, canonicalized when it exists.
fn absolute(base: &Path, path: &Path) -> PathBuf {
    let joined = inspector::files::normalize(&base.join(path));
    fs::canonicalize(&joined).unwrap_or(joined)
}
