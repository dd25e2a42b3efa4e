use crate::error::{ReleaseError, Result};

const TAG_PLACEHOLDER: &str = "{tag}";

/// Commit message template (e.g. "release {tag}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    pub template: String,
}

impl MessageTemplate {
    /// Create a template, which must contain the `{tag}` placeholder
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        if !template.contains(TAG_PLACEHOLDER) {
            return Err(ReleaseError::config(format!(
                "message template '{}' must contain {}",
                template, TAG_PLACEHOLDER
            )));
        }

        Ok(MessageTemplate { template })
    }

    /// Substitute the release tag
    pub fn render(&self, tag: &str) -> String {
        self.template.replace(TAG_PLACEHOLDER, tag)
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        MessageTemplate {
            template: "release {tag}".to_string(),
        }
    }
}
