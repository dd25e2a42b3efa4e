use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Conditions that must stop automation unconditionally.
///
/// These are not meant to be handled: the binary prints
/// [`HardStop::diagnostics`] and exits with status 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardStop {
    /// The process was not started from the repository toplevel
    NotAtRoot { current: PathBuf, toplevel: PathBuf },
    /// HEAD does not carry a release tag
    NotOnRelease,
}

impl HardStop {
    /// Lines printed before the process terminates
    pub fn diagnostics(&self) -> Vec<String> {
        match self {
            HardStop::NotAtRoot { .. } => vec!["must be on top level dir !!!".to_string()],
            HardStop::NotOnRelease => vec![
                "Error: Current HEAD is not for export.".to_string(),
                "Use '--ignore-on-release' or '-R' option to ignore this check.".to_string(),
            ],
        }
    }
}

impl fmt::Display for HardStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardStop::NotAtRoot { current, toplevel } => write!(
                f,
                "must be on top level dir (current: {}, toplevel: {})",
                current.display(),
                toplevel.display()
            ),
            HardStop::NotOnRelease => write!(f, "Current HEAD is not for export"),
        }
    }
}

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("{0}")]
    HardStop(HardStop),

    #[error("must be on {expected} (current branch: {actual})")]
    WrongBranch { expected: String, actual: String },

    #[error("repository is not clean")]
    NotClean,

    #[error("Version descriptor error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing release artifacts: {0}")]
    MissingArtifacts(String),

    #[error("`{command}` failed with exit code {}: {stderr}", .code.map_or_else(|| "?".to_string(), |c| c.to_string()))]
    Command {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Invalid tag pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Cannot parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error on '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot copy '{}' to '{}': {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl From<HardStop> for ReleaseError {
    fn from(stop: HardStop) -> Self {
        ReleaseError::HardStop(stop)
    }
}

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a version descriptor error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a missing-artifacts error with context
    pub fn missing_artifacts(msg: impl Into<String>) -> Self {
        ReleaseError::MissingArtifacts(msg.into())
    }

    /// Attach the path an I/O operation failed on
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::File {
            path: path.into(),
            source,
        }
    }

    /// Returns the hard stop carried by this error, if any
    pub fn as_hard_stop(&self) -> Option<&HardStop> {
        match self {
            ReleaseError::HardStop(stop) => Some(stop),
            _ => None,
        }
    }

    /// Process exit status for this error.
    ///
    /// Failed git invocations propagate the child's exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReleaseError::Command {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
