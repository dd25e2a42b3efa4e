use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ReleaseError, Result};

/// The release tag candidate read from the version descriptor file.
///
/// Holds the file content with surrounding whitespace removed; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDescriptor {
    tag: String,
}

impl VersionDescriptor {
    /// Build a descriptor from raw file content
    pub fn parse(content: &str) -> Result<Self> {
        let tag = content.trim();
        if tag.is_empty() {
            return Err(ReleaseError::version("version descriptor is empty"));
        }

        Ok(VersionDescriptor {
            tag: tag.to_string(),
        })
    }

    /// Read and parse the descriptor file at `path`
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ReleaseError::version(format!("cannot read '{}': {}", path.display(), e))
        })?;

        Self::parse(&content).map_err(|_| {
            ReleaseError::version(format!("'{}' is empty", path.display()))
        })
    }

    /// The tag string, used verbatim
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_trims_whitespace() {
        let v = VersionDescriptor::parse("  V01.02\n").unwrap();
        assert_eq!(v.tag(), "V01.02");
    }

    #[test]
    fn test_descriptor_keeps_inner_content_verbatim() {
        let v = VersionDescriptor::parse("\tV01.02 rc 1\r\n").unwrap();
        assert_eq!(v.tag(), "V01.02 rc 1");
        assert_eq!(v.to_string(), "V01.02 rc 1");
    }

    #[test]
    fn test_descriptor_rejects_empty() {
        assert!(VersionDescriptor::parse("").is_err());
        assert!(VersionDescriptor::parse(" \n\t ").is_err());
    }

    #[test]
    fn test_descriptor_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        fs::write(&path, "V03.14\n").unwrap();

        assert_eq!(VersionDescriptor::read(&path).unwrap().tag(), "V03.14");
    }

    #[test]
    fn test_descriptor_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = VersionDescriptor::read(&dir.path().join("version.txt")).unwrap_err();
        assert!(err.to_string().contains("version.txt"));
    }

    #[test]
    fn test_descriptor_read_blank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("version.txt");
        fs::write(&path, "\n\n").unwrap();

        let err = VersionDescriptor::read(&path).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }
}
