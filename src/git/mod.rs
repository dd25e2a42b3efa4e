//! Version-control abstraction layer
//!
//! Every interaction with version control goes through the
//! [VersionControlClient] trait, so the release workflow can be driven
//! against the real `git` binary or an in-memory fake.
//!
//! # Overview
//!
//! - [cli::GitCli]: shells out to the system `git` and parses its stdout
//! - [mock::MockClient]: a fake for tests that records every invocation
//!
//! Query methods never mutate the repository. The mutating methods
//! (`stage_all`, `commit`, `create_annotated_tag`, `update_submodules`) are
//! the only ones the release workflow calls after its preconditions pass.
//!
//! ```rust
//! # use git_release::git::VersionControlClient;
//! # fn example<C: VersionControlClient>(client: &C) -> git_release::Result<()> {
//! let branch = client.current_branch(None)?;
//! if branch == "main" && !client.has_tracked_changes(None)? {
//!     client.stage_all(None)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod mock;

pub use cli::GitCli;
pub use mock::MockClient;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Narrow interface over the version-control tool.
///
/// Every `dir` argument is optional and, when given, is resolved relative to
/// the client's working directory (the equivalent of `git -C <dir>`).
///
/// ## Error Handling
///
/// A non-zero exit of the underlying tool surfaces as
/// [crate::error::ReleaseError::Command]; failure to start it surfaces as
/// [crate::error::ReleaseError::Io]. There is no retry.
pub trait VersionControlClient: Send + Sync {
    /// URL configured for `remote` (e.g. `remote.origin.url`)
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// Absolute path of the working tree root
    fn toplevel(&self) -> Result<PathBuf>;

    /// Current branch name, empty on a detached HEAD
    fn current_branch(&self, dir: Option<&Path>) -> Result<String>;

    /// Paths of all tracked files, relative to the toplevel, in tool order
    fn ls_files(&self, recurse_submodules: bool) -> Result<Vec<String>>;

    /// Names of all tags
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Commit identifier a tag points at
    fn tag_commit(&self, tag: &str) -> Result<String>;

    /// Commit identifier of HEAD
    fn head_commit(&self) -> Result<String>;

    /// Whether tracked files carry uncommitted modifications.
    ///
    /// Any non-zero exit of the quiet diff check counts as modified.
    fn has_tracked_changes(&self, dir: Option<&Path>) -> Result<bool>;

    /// Untracked files that are not ignored
    fn untracked_files(&self, dir: Option<&Path>) -> Result<Vec<String>>;

    /// Stage every change (`add .`)
    fn stage_all(&self, dir: Option<&Path>) -> Result<()>;

    /// Create a commit with `message`
    fn commit(&self, dir: Option<&Path>, message: &str) -> Result<()>;

    /// Create an annotated tag at HEAD
    fn create_annotated_tag(&self, dir: Option<&Path>, tag: &str, message: &str) -> Result<()>;

    /// Initialize and update all submodules recursively
    fn update_submodules(&self) -> Result<()>;
}

/// Renders a git invocation the way a user would type it.
pub(crate) fn render_command(dir: Option<&Path>, args: &[&str]) -> String {
    let mut parts = vec!["git".to_string()];
    if let Some(dir) = dir {
        parts.push("-C".to_string());
        parts.push(dir.display().to_string());
    }
    parts.extend(args.iter().map(|arg| {
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            format!("\"{}\"", arg)
        } else {
            arg.to_string()
        }
    }));
    parts.join(" ")
}
