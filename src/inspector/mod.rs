//! Repository inspector
//!
//! Answers factual questions about the repository through a
//! [VersionControlClient] and turns the answers into typed values or
//! precondition failures. Nothing here mutates the repository; the only
//! filesystem writes live in [files] and target an export destination.

pub mod files;

pub use files::{copy_tracked_files, delete_all_except};

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{parse_gitmodules, ReleaseTagPattern};
use crate::error::{HardStop, ReleaseError, Result};
use crate::git::VersionControlClient;

/// Name of the submodule configuration file at the repository root
pub const GITMODULES: &str = ".gitmodules";

/// Repository name derived from the `origin` remote URL.
///
/// Fails when no `origin` remote is configured.
pub fn repo_name<C: VersionControlClient + ?Sized>(client: &C) -> Result<String> {
    let url = client.remote_url("origin")?;
    Ok(repo_name_from_url(&url))
}

/// Final path segment of a remote URL with its extension-like suffix removed.
///
/// Handles `https://host/owner/name.git`, `git@host:owner/name.git` and
/// local paths; trailing slashes are ignored.
pub fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let segment = trimmed
        .rsplit(['/', ':'])
        .next()
        .unwrap_or(trimmed);

    match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => segment.to_string(),
    }
}

/// Absolute path of the repository toplevel
pub fn toplevel<C: VersionControlClient + ?Sized>(client: &C) -> Result<PathBuf> {
    client.toplevel()
}

/// Current branch, optionally inside `dir`; empty on a detached HEAD
pub fn current_branch<C: VersionControlClient + ?Sized>(
    client: &C,
    dir: Option<&Path>,
) -> Result<String> {
    client.current_branch(dir)
}

/// All tracked files, relative to the toplevel
pub fn tracked_files<C: VersionControlClient + ?Sized>(
    client: &C,
    include_submodules: bool,
) -> Result<Vec<String>> {
    client.ls_files(include_submodules)
}

/// Submodule paths listed in `<repo_path>/.gitmodules`, in file order.
///
/// A missing file means no submodules.
pub fn submodule_directories(repo_path: &Path) -> Result<Vec<String>> {
    let path = repo_path.join(GITMODULES);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    Ok(parse_gitmodules(&content)?
        .into_iter()
        .map(|entry| entry.path)
        .collect())
}

/// Hard stop unless `cwd` is the repository toplevel.
///
/// Both paths are canonicalized when possible so symlinked temp
/// directories compare equal. Returns the toplevel on success.
pub fn assert_at_root<C: VersionControlClient + ?Sized>(client: &C, cwd: &Path) -> Result<PathBuf> {
    let toplevel = client.toplevel()?;
    let current = canonical(cwd);

    if current != canonical(&toplevel) {
        return Err(HardStop::NotAtRoot {
            current,
            toplevel,
        }
        .into());
    }

    Ok(toplevel)
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Hard stop unless HEAD carries a tag matching `pattern`.
///
/// Skipped entirely when `ignore` is set. Tags are resolved one by one and
/// the first match ends the search.
pub fn assert_on_release<C: VersionControlClient + ?Sized>(
    client: &C,
    ignore: bool,
    pattern: &ReleaseTagPattern,
) -> Result<()> {
    if ignore {
        return Ok(());
    }

    let head = client.head_commit()?;

    for tag in client.list_tags()? {
        if !pattern.matches(&tag) {
            continue;
        }
        if client.tag_commit(&tag)? == head {
            return Ok(());
        }
    }

    Err(HardStop::NotOnRelease.into())
}

/// Fail with [ReleaseError::NotClean] if tracked files are modified or,
/// when `check_untracked` is set, untracked non-ignored files exist.
pub fn assert_clean<C: VersionControlClient + ?Sized>(
    client: &C,
    dir: Option<&Path>,
    check_untracked: bool,
) -> Result<()> {
    if client.has_tracked_changes(dir)? {
        return Err(ReleaseError::NotClean);
    }

    if check_untracked && !client.untracked_files(dir)?.is_empty() {
        return Err(ReleaseError::NotClean);
    }

    Ok(())
}
