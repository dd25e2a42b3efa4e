use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{ReleaseError, Result};
use crate::git::{render_command, VersionControlClient};

/// In-memory version-control client for tests.
///
/// Answers queries from canned state and records every invocation, rendered
/// as the equivalent `git` command line, so tests can assert which commands
/// were (or were not) issued.
pub struct MockClient {
    toplevel: PathBuf,
    branch: String,
    dir_branches: HashMap<PathBuf, String>,
    remotes: HashMap<String, String>,
    tracked: Vec<String>,
    submodule_tracked: Vec<String>,
    tags: Vec<(String, String)>,
    head: String,
    tracked_changes: bool,
    untracked: Vec<String>,
    failing: Vec<String>,
    log: Mutex<Vec<String>>,
}

impl MockClient {
    /// Create a clean repository rooted at `toplevel`, on `main`
    pub fn new(toplevel: impl Into<PathBuf>) -> Self {
        MockClient {
            toplevel: toplevel.into(),
            branch: "main".to_string(),
            dir_branches: HashMap::new(),
            remotes: HashMap::new(),
            tracked: Vec::new(),
            submodule_tracked: Vec::new(),
            tags: Vec::new(),
            head: "0000000000000000000000000000000000000000".to_string(),
            tracked_changes: false,
            untracked: Vec::new(),
            failing: Vec::new(),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Set the branch reported for the working directory
    pub fn set_branch(&mut self, branch: impl Into<String>) {
        self.branch = branch.into();
    }

    /// Set the branch reported for `git -C <dir>`
    pub fn set_dir_branch(&mut self, dir: impl Into<PathBuf>, branch: impl Into<String>) {
        self.dir_branches.insert(dir.into(), branch.into());
    }

    /// Configure a remote URL
    pub fn add_remote(&mut self, name: impl Into<String>, url: impl Into<String>) {
        self.remotes.insert(name.into(), url.into());
    }

    /// Add a file tracked by the top repository
    pub fn add_tracked(&mut self, path: impl Into<String>) {
        self.tracked.push(path.into());
    }

    /// Add a file tracked inside a submodule (listed only when recursing)
    pub fn add_submodule_tracked(&mut self, path: impl Into<String>) {
        self.submodule_tracked.push(path.into());
    }

    /// Add a tag pointing at `commit`
    pub fn add_tag(&mut self, name: impl Into<String>, commit: impl Into<String>) {
        self.tags.push((name.into(), commit.into()));
    }

    /// Set the HEAD commit identifier
    pub fn set_head(&mut self, commit: impl Into<String>) {
        self.head = commit.into();
    }

    /// Mark tracked files as modified
    pub fn set_tracked_changes(&mut self, modified: bool) {
        self.tracked_changes = modified;
    }

    /// Add an untracked, non-ignored file
    pub fn add_untracked(&mut self, path: impl Into<String>) {
        self.untracked.push(path.into());
    }

    /// Make every invocation whose rendered command starts with `prefix` fail
    pub fn fail_on(&mut self, prefix: impl Into<String>) {
        self.failing.push(prefix.into());
    }

    /// All invocations so far, in order
    pub fn invocations(&self) -> Vec<String> {
        self.lock_log().clone()
    }

    /// Invocations that change repository state
    pub fn mutating_invocations(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .filter(|cmd| is_mutating(cmd))
            .collect()
    }

    fn lock_log(&self) -> MutexGuard<'_, Vec<String>> {
        // A poisoned log only means another test thread panicked mid-push
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, dir: Option<&Path>, args: &[&str]) -> Result<()> {
        let command = render_command(dir, args);
        self.lock_log().push(command.clone());
        if self.failing.iter().any(|prefix| command.starts_with(prefix)) {
            return Err(ReleaseError::Command {
                command,
                code: Some(128),
                stderr: "fatal: mock failure".to_string(),
            });
        }
        Ok(())
    }
}

fn is_mutating(command: &str) -> bool {
    let mut words = command.split_whitespace().skip(1);
    let mut verb = words.next();
    if verb == Some("-C") {
        words.next();
        verb = words.next();
    }
    matches!(verb, Some("add" | "commit" | "tag" | "submodule"))
        && !(verb == Some("tag") && words.next().is_none())
}

impl VersionControlClient for MockClient {
    fn remote_url(&self, remote: &str) -> Result<String> {
        let key = format!("remote.{}.url", remote);
        self.record(None, &["config", "--get", key.as_str()])?;
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| ReleaseError::Command {
                command: render_command(None, &["config", "--get", key.as_str()]),
                code: Some(1),
                stderr: String::new(),
            })
    }

    fn toplevel(&self) -> Result<PathBuf> {
        self.record(None, &["rev-parse", "--show-toplevel"])?;
        Ok(self.toplevel.clone())
    }

    fn current_branch(&self, dir: Option<&Path>) -> Result<String> {
        self.record(dir, &["branch", "--show-current"])?;
        Ok(dir
            .and_then(|d| self.dir_branches.get(d))
            .unwrap_or(&self.branch)
            .clone())
    }

    fn ls_files(&self, recurse_submodules: bool) -> Result<Vec<String>> {
        if recurse_submodules {
            self.record(None, &["ls-files", "-z", "--recurse-submodules"])?;
            Ok(self
                .tracked
                .iter()
                .chain(self.submodule_tracked.iter())
                .cloned()
                .collect())
        } else {
            self.record(None, &["ls-files", "-z"])?;
            Ok(self.tracked.clone())
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.record(None, &["tag"])?;
        Ok(self.tags.iter().map(|(name, _)| name.clone()).collect())
    }

    fn tag_commit(&self, tag: &str) -> Result<String> {
        self.record(None, &["rev-list", "-n", "1", tag])?;
        self.tags
            .iter()
            .find(|(name, _)| name == tag)
            .map(|(_, commit)| commit.clone())
            .ok_or_else(|| ReleaseError::Command {
                command: render_command(None, &["rev-list", "-n", "1", tag]),
                code: Some(128),
                stderr: format!("fatal: ambiguous argument '{}'", tag),
            })
    }

    fn head_commit(&self) -> Result<String> {
        self.record(None, &["rev-parse", "HEAD"])?;
        Ok(self.head.clone())
    }

    fn has_tracked_changes(&self, dir: Option<&Path>) -> Result<bool> {
        self.record(dir, &["diff", "--quiet", "--exit-code"])?;
        Ok(self.tracked_changes)
    }

    fn untracked_files(&self, dir: Option<&Path>) -> Result<Vec<String>> {
        self.record(dir, &["ls-files", "-z", "--exclude-standard", "--others"])?;
        Ok(self.untracked.clone())
    }

    fn stage_all(&self, dir: Option<&Path>) -> Result<()> {
        self.record(dir, &["add", "."])
    }

    fn commit(&self, dir: Option<&Path>, message: &str) -> Result<()> {
        self.record(dir, &["commit", "-m", message])
    }

    fn create_annotated_tag(&self, dir: Option<&Path>, tag: &str, message: &str) -> Result<()> {
        self.record(dir, &["tag", "-a", tag, "-m", message])
    }

    fn update_submodules(&self) -> Result<()> {
        self.record(None, &["submodule", "update", "--init", "--recursive"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_client_defaults() {
        let client = MockClient::new("/repo");
        assert_eq!(client.toplevel().unwrap(), PathBuf::from("/repo"));
        assert_eq!(client.current_branch(None).unwrap(), "main");
        assert!(!client.has_tracked_changes(None).unwrap());
        assert!(client.untracked_files(None).unwrap().is_empty());
    }

    #[test]
    fn test_mock_client_dir_branch() {
        let mut client = MockClient::new("/repo");
        client.set_dir_branch("docs", "gh-pages");
        assert_eq!(
            client.current_branch(Some(Path::new("docs"))).unwrap(),
            "gh-pages"
        );
        assert_eq!(client.current_branch(None).unwrap(), "main");
    }

    #[test]
    fn test_mock_client_tags() {
        let mut client = MockClient::new("/repo");
        client.add_tag("V01.00", "abc");
        client.add_tag("V01.01", "def");

        assert_eq!(client.list_tags().unwrap(), vec!["V01.00", "V01.01"]);
        assert_eq!(client.tag_commit("V01.01").unwrap(), "def");
        assert!(client.tag_commit("missing").is_err());
    }

    #[test]
    fn test_mock_client_submodule_listing() {
        let mut client = MockClient::new("/repo");
        client.add_tracked("README.md");
        client.add_submodule_tracked("docs/index.md");

        assert_eq!(client.ls_files(false).unwrap(), vec!["README.md"]);
        assert_eq!(
            client.ls_files(true).unwrap(),
            vec!["README.md", "docs/index.md"]
        );
    }

    #[test]
    fn test_mock_client_records_invocations() {
        let client = MockClient::new("/repo");
        client.list_tags().unwrap();
        client.stage_all(None).unwrap();
        client.commit(Some(Path::new("docs")), "release V01.00").unwrap();

        assert_eq!(
            client.invocations(),
            vec![
                "git tag",
                "git add .",
                "git -C docs commit -m \"release V01.00\"",
            ]
        );
        assert_eq!(
            client.mutating_invocations(),
            vec!["git add .", "git -C docs commit -m \"release V01.00\""]
        );
    }

    #[test]
    fn test_mock_client_failure_injection() {
        let mut client = MockClient::new("/repo");
        client.fail_on("git commit");

        let err = client.commit(None, "msg").unwrap_err();
        assert_eq!(err.exit_code(), 128);
        // The failed attempt is still recorded
        assert_eq!(client.invocations(), vec!["git commit -m msg"]);
    }

    #[test]
    fn test_mock_client_missing_remote() {
        let mut client = MockClient::new("/repo");
        assert!(client.remote_url("origin").is_err());

        client.add_remote("origin", "git@github.com:me/tools.git");
        assert_eq!(
            client.remote_url("origin").unwrap(),
            "git@github.com:me/tools.git"
        );
    }
}
