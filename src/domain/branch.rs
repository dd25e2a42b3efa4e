use crate::error::{ReleaseError, Result};

/// The branch releases must be cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseBranch {
    pub name: String,
}

impl ReleaseBranch {
    /// Create a release branch requirement
    pub fn new(name: impl Into<String>) -> Self {
        ReleaseBranch { name: name.into() }
    }

    /// Fail with [`ReleaseError::WrongBranch`] unless `current` is this branch.
    ///
    /// An empty `current` (detached HEAD) never matches.
    pub fn check(&self, current: &str) -> Result<()> {
        if current == self.name {
            return Ok(());
        }

        let actual = if current.is_empty() {
            "(detached)".to_string()
        } else {
            current.to_string()
        };

        Err(ReleaseError::WrongBranch {
            expected: self.name.clone(),
            actual,
        })
    }
}

impl Default for ReleaseBranch {
    fn default() -> Self {
        ReleaseBranch::new("main")
    }
}
