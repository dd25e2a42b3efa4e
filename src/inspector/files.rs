//! Filesystem side of the export: copying tracked files and clearing a
//! destination tree.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReleaseError, Result};

/// Copy each listed file from `src` into `dst`, keeping relative paths.
///
/// Intermediate directories are created as needed; entries that are
/// directories in `src` (e.g. submodule roots) are skipped. A failure part
/// way through leaves the files copied so far in place.
///
/// Returns the number of files copied.
pub fn copy_tracked_files<S: AsRef<str>>(src: &Path, dst: &Path, files: &[S]) -> Result<usize> {
    let mut copied = 0;

    for file in files {
        let relative = file.as_ref();
        let src_path = src.join(relative);
        let dst_path = dst.join(relative);

        if let Some(parent) = dst_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ReleaseError::file(parent, e))?;
        }

        if src_path.is_dir() {
            continue;
        }

        copy_file(&src_path, &dst_path)?;
        copied += 1;
    }

    Ok(copied)
}

/// Remove every file and directory below `dst` except excluded paths.
///
/// `exclude` entries are relative to `dst`; a path is kept when it equals an
/// exclusion or lies beneath one, compared component-wise after lexical
/// normalization. Excluded subtrees are not walked. Directories are removed
/// only once they are empty, so an ancestor of an excluded path survives.
/// `dst` itself is never removed.
///
/// Returns the number of removed entries.
pub fn delete_all_except<P: AsRef<Path>>(dst: &Path, exclude: &[P]) -> Result<usize> {
    let root = normalize(dst);
    let excluded: Vec<PathBuf> = exclude
        .iter()
        .map(|ex| normalize(&root.join(ex.as_ref())))
        .collect();
    let is_excluded = |path: &Path| {
        let path = normalize(path);
        excluded.iter().any(|ex| path.starts_with(ex))
    };

    let mut entries = Vec::new();
    for entry in WalkDir::new(&root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_excluded(e.path()))
    {
        entries.push(entry.map_err(|e| walk_error(&root, e))?);
    }

    let mut removed = 0;

    // Pre-order reversed: children come before their parent
    for entry in entries.iter().rev() {
        let path = entry.path();

        if entry.file_type().is_dir() {
            let mut listing = fs::read_dir(path).map_err(|e| ReleaseError::file(path, e))?;
            if listing.next().is_none() {
                fs::remove_dir(path).map_err(|e| ReleaseError::file(path, e))?;
                removed += 1;
            }
        } else {
            fs::remove_file(path).map_err(|e| ReleaseError::file(path, e))?;
            removed += 1;
        }
    }

    Ok(removed)
}

fn walk_error(root: &Path, err: walkdir::Error) -> ReleaseError {
    let path = err.path().unwrap_or(root).to_path_buf();
    ReleaseError::file(path, err.into())
}

/// Copy one file, naming both ends on failure
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    fs::copy(from, to).map_err(|source| ReleaseError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Files directly inside `dir` with the given extension, sorted by name
pub fn files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| ReleaseError::file(dir, e))? {
        let path = entry.map_err(|e| ReleaseError::file(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Lexically normalize a path: drop `.` components and fold `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
