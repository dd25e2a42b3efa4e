use std::fmt;
use std::path::PathBuf;

/// Non-fatal issues found while preparing a release or export.
/// These are reported to the user but never stop the sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Tagging is enabled but the tag already exists; the tag step will fail
    TagAlreadyExists { tag: String },
    /// Docs sync is enabled but the docs directory is not a registered submodule
    DocsDirNotSubmodule { dir: PathBuf },
    /// The tracked-file listing was empty, so the export copies nothing
    NoTrackedFiles,
    /// No `origin` remote, so the repository name is unknown
    NoOriginRemote,
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::TagAlreadyExists { tag } => {
                write!(f, "Tag '{}' already exists; tagging will fail", tag)
            }
            ReleaseWarning::DocsDirNotSubmodule { dir } => write!(
                f,
                "Docs directory '{}' is not listed in .gitmodules",
                dir.display()
            ),
            ReleaseWarning::NoTrackedFiles => write!(f, "No tracked files to export"),
            ReleaseWarning::NoOriginRemote => {
                write!(f, "No 'origin' remote configured; repository name unknown")
            }
        }
    }
}
