use regex::Regex;

use crate::error::Result;

/// Naming pattern of release tags: `<prefix>` + two-digit major + `.` +
/// two-digit minor + `<suffix>`.
///
/// The prefix is literal text; the suffix is a regex fragment.
#[derive(Debug, Clone)]
pub struct ReleaseTagPattern {
    regex: Regex,
}

impl ReleaseTagPattern {
    /// Build a pattern from a literal prefix and a regex suffix
    pub fn new(prefix: &str, suffix: &str) -> Result<Self> {
        let pattern = format!(r"^{}\d\d\.\d\d{}$", regex::escape(prefix), suffix);
        Ok(ReleaseTagPattern {
            regex: Regex::new(&pattern)?,
        })
    }

    /// Check whether `tag` names a release
    pub fn matches(&self, tag: &str) -> bool {
        self.regex.is_match(tag)
    }

    /// The compiled regular expression
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}
