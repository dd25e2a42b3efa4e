use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::error::{ReleaseError, Result};
use crate::git::{render_command, VersionControlClient};

/// Version-control client backed by the system `git` binary
#[derive(Debug, Clone)]
pub struct GitCli {
    work_dir: PathBuf,
}

impl GitCli {
    /// Client operating on the current working directory
    pub fn new() -> Self {
        GitCli {
            work_dir: PathBuf::from("."),
        }
    }

    /// Client operating on an explicit directory
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        GitCli {
            work_dir: path.as_ref().to_path_buf(),
        }
    }

    /// Directory every invocation starts from
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn git_cmd(&self, dir: Option<&Path>) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("-C").arg(&self.work_dir);
        if let Some(dir) = dir {
            cmd.arg("-C").arg(dir);
        }
        // Don't escape non-ASCII paths in listings
        cmd.arg("-c").arg("core.quotePath=false");
        cmd
    }

    /// Runs a query and returns its stdout.
    fn query(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let output = self.git_cmd(dir).args(args).output()?;
        check_output(dir, args, &output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Runs a command with inherited stdio so its progress reaches the terminal.
    fn run(&self, dir: Option<&Path>, args: &[&str]) -> Result<()> {
        let status = self.git_cmd(dir).args(args).status()?;
        if !status.success() {
            return Err(ReleaseError::Command {
                command: render_command(dir, args),
                code: status.code(),
                stderr: String::new(),
            });
        }
        Ok(())
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

fn check_output(dir: Option<&Path>, args: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(ReleaseError::Command {
        command: render_command(dir, args),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Splits NUL-separated `-z` output, dropping the trailing empty entry.
fn split_nul(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl VersionControlClient for GitCli {
    fn remote_url(&self, remote: &str) -> Result<String> {
        let key = format!("remote.{}.url", remote);
        Ok(self.query(None, &["config", "--get", key.as_str()])?.trim().to_string())
    }

    fn toplevel(&self) -> Result<PathBuf> {
        let stdout = self.query(None, &["rev-parse", "--show-toplevel"])?;
        Ok(PathBuf::from(stdout.trim()))
    }

    fn current_branch(&self, dir: Option<&Path>) -> Result<String> {
        Ok(self
            .query(dir, &["branch", "--show-current"])?
            .trim()
            .to_string())
    }

    fn ls_files(&self, recurse_submodules: bool) -> Result<Vec<String>> {
        let mut args = vec!["ls-files", "-z"];
        if recurse_submodules {
            args.push("--recurse-submodules");
        }
        Ok(split_nul(&self.query(None, &args)?))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self
            .query(None, &["tag"])?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn tag_commit(&self, tag: &str) -> Result<String> {
        Ok(self
            .query(None, &["rev-list", "-n", "1", tag])?
            .trim()
            .to_string())
    }

    fn head_commit(&self) -> Result<String> {
        Ok(self.query(None, &["rev-parse", "HEAD"])?.trim().to_string())
    }

    fn has_tracked_changes(&self, dir: Option<&Path>) -> Result<bool> {
        let status = self
            .git_cmd(dir)
            .args(["diff", "--quiet", "--exit-code"])
            .status()?;
        Ok(!status.success())
    }

    fn untracked_files(&self, dir: Option<&Path>) -> Result<Vec<String>> {
        let stdout = self.query(dir, &["ls-files", "-z", "--exclude-standard", "--others"])?;
        Ok(split_nul(&stdout))
    }

    fn stage_all(&self, dir: Option<&Path>) -> Result<()> {
        self.run(dir, &["add", "."])
    }

    fn commit(&self, dir: Option<&Path>, message: &str) -> Result<()> {
        self.run(dir, &["commit", "-m", message])
    }

    fn create_annotated_tag(&self, dir: Option<&Path>, tag: &str, message: &str) -> Result<()> {
        self.run(dir, &["tag", "-a", tag, "-m", message])
    }

    fn update_submodules(&self) -> Result<()> {
        self.run(None, &["submodule", "update", "--init", "--recursive"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_nul() {
        assert_eq!(split_nul("a.txt\0dir/b c.txt\0"), vec!["a.txt", "dir/b c.txt"]);
        assert!(split_nul("").is_empty());
    }

    #[test]
    fn test_git_cli_default_work_dir() {
        assert_eq!(GitCli::default().work_dir(), Path::new("."));
    }

    fn init_repo(dir: &Path) -> bool {
        let run = |args: &[&str]| {
            Command::new("git")
                .arg("-C")
                .arg(dir)
                .args(args)
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        };
        run(&["init", "-q"]) && run(&["symbolic-ref", "HEAD", "refs/heads/main"])
    }

    #[test]
    fn test_git_cli_queries_scoped_to_dir() {
        let repo = tempfile::tempdir().unwrap();
        if !init_repo(repo.path()) {
            return;
        }
        std::fs::create_dir_all(repo.path().join("sub")).unwrap();
        std::fs::write(repo.path().join("sub/new file.txt"), "x").unwrap();
        std::fs::write(repo.path().join("top.txt"), "y").unwrap();

        let client = GitCli::at(repo.path());
        assert_eq!(client.work_dir(), repo.path());

        assert_eq!(client.current_branch(None).unwrap(), "main");
        assert_eq!(client.current_branch(Some(Path::new("sub"))).unwrap(), "main");
        assert!(!client.has_tracked_changes(Some(Path::new("sub"))).unwrap());

        // Listings inside a directory are relative to it
        assert_eq!(
            client.untracked_files(Some(Path::new("sub"))).unwrap(),
            vec!["new file.txt"]
        );
        let mut all = client.untracked_files(None).unwrap();
        all.sort();
        assert_eq!(all, vec!["sub/new file.txt", "top.txt"]);
    }

    #[test]
    fn test_git_cli_failure_keeps_exit_code() {
        let repo = tempfile::tempdir().unwrap();
        if !init_repo(repo.path()) {
            return;
        }

        let err = GitCli::at(repo.path()).tag_commit("V09.99").unwrap_err();

        assert!(matches!(err, ReleaseError::Command { code: Some(_), .. }));
        assert!(err.to_string().contains("V09.99"));
    }
}
