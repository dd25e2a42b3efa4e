//! Read-only repository status report

use std::fmt;
use std::path::PathBuf;

use crate::error::{ReleaseError, Result};
use crate::git::VersionControlClient;
use crate::inspector;
use crate::warning::ReleaseWarning;

/// Snapshot of the facts the release workflow gates on
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub name: Option<String>,
    pub toplevel: PathBuf,
    pub branch: String,
    pub clean: bool,
    pub submodules: Vec<String>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "repository: {}", self.name.as_deref().unwrap_or("(unknown)"))?;
        writeln!(f, "toplevel:   {}", self.toplevel.display())?;
        let branch = if self.branch.is_empty() {
            "(detached)"
        } else {
            self.branch.as_str()
        };
        writeln!(f, "branch:     {}", branch)?;
        writeln!(f, "tree:       {}", if self.clean { "clean" } else { "dirty" })?;
        if self.submodules.is_empty() {
            write!(f, "submodules: (none)")
        } else {
            write!(f, "submodules: {}", self.submodules.join(", "))
        }
    }
}

/// Gather the status report. Never mutates the repository.
pub fn collect_status<C: VersionControlClient + ?Sized>(
    client: &C,
) -> Result<(StatusReport, Vec<ReleaseWarning>)> {
    let mut warnings = Vec::new();

    let name = match inspector::repo_name(client) {
        Ok(name) => Some(name),
        Err(ReleaseError::Command { .. }) => {
            warnings.push(ReleaseWarning::NoOriginRemote);
            None
        }
        Err(e) => return Err(e),
    };

    let toplevel = inspector::toplevel(client)?;
    let branch = inspector::current_branch(client, None)?;
    let clean = match inspector::assert_clean(client, None, true) {
        Ok(()) => true,
        Err(ReleaseError::NotClean) => false,
        Err(e) => return Err(e),
    };
    let submodules = inspector::submodule_directories(&toplevel)?;

    Ok((
        StatusReport {
            name,
            toplevel,
            branch,
            clean,
            submodules,
        },
        warnings,
    ))
}
