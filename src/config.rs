use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{MessageTemplate, ReleaseBranch, ReleaseTagPattern};
use crate::error::{ReleaseError, Result};

/// File name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "gitrelease.toml";

/// Represents the complete configuration for git-release.
///
/// Every field defaults to the behaviour of a plain release on `main`, so an
/// absent file changes nothing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub release_gate: ReleaseGateConfig,

    #[serde(default)]
    pub docs: DocsConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_version_file() -> PathBuf {
    PathBuf::from("version.txt")
}

fn default_message_template() -> String {
    "release {tag}".to_string()
}

fn default_true() -> bool {
    true
}

/// Preconditions and actions of the release sequence.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_branch")]
    pub branch: String,

    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,

    #[serde(default = "default_message_template")]
    pub message_template: String,

    #[serde(default)]
    pub create_tag: bool,

    #[serde(default = "default_true")]
    pub check_untracked: bool,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            branch: default_branch(),
            version_file: default_version_file(),
            message_template: default_message_template(),
            create_tag: false,
            check_untracked: true,
        }
    }
}

fn default_gate_prefix() -> String {
    "V".to_string()
}

fn default_gate_suffix() -> String {
    ".*".to_string()
}

/// Pattern a tag at HEAD must match for the export gate to pass.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseGateConfig {
    #[serde(default = "default_gate_prefix")]
    pub prefix: String,

    #[serde(default = "default_gate_suffix")]
    pub suffix: String,
}

impl Default for ReleaseGateConfig {
    fn default() -> Self {
        ReleaseGateConfig {
            prefix: default_gate_prefix(),
            suffix: default_gate_suffix(),
        }
    }
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_docs_source_dir() -> PathBuf {
    PathBuf::from("o")
}

fn default_docs_extensions() -> Vec<String> {
    vec!["html".to_string(), "md".to_string()]
}

/// Documentation-submodule sync, off by default.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DocsConfig {
    #[serde(default)]
    pub sync: bool,

    #[serde(default = "default_docs_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_docs_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_docs_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub create_tag: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        DocsConfig {
            sync: false,
            dir: default_docs_dir(),
            source_dir: default_docs_source_dir(),
            extensions: default_docs_extensions(),
            create_tag: false,
        }
    }
}

fn default_export_exclude() -> Vec<PathBuf> {
    vec![PathBuf::from(".git")]
}

/// Tracked-file export into another working tree.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ExportConfig {
    #[serde(default = "default_export_exclude")]
    pub exclude: Vec<PathBuf>,

    #[serde(default = "default_true")]
    pub recurse_submodules: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            exclude: default_export_exclude(),
            recurse_submodules: true,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text and validate it
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the release workflow cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.release.branch.trim().is_empty() {
            return Err(ReleaseError::config("release.branch must not be empty"));
        }
        if self.release.version_file.as_os_str().is_empty() {
            return Err(ReleaseError::config("release.version_file must not be empty"));
        }
        MessageTemplate::new(self.release.message_template.as_str())?;
        self.tag_pattern()?;
        if self.docs.sync && self.docs.extensions.is_empty() {
            return Err(ReleaseError::config(
                "docs.extensions must list at least one extension when docs.sync is enabled",
            ));
        }
        Ok(())
    }

    /// The branch releases are cut from
    pub fn release_branch(&self) -> ReleaseBranch {
        ReleaseBranch::new(self.release.branch.as_str())
    }

    /// The commit message template
    pub fn message_template(&self) -> Result<MessageTemplate> {
        MessageTemplate::new(self.release.message_template.as_str())
    }

    /// The release gate tag pattern
    pub fn tag_pattern(&self) -> Result<ReleaseTagPattern> {
        ReleaseTagPattern::new(&self.release_gate.prefix, &self.release_gate.suffix)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => match discover_config() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("cannot read '{}': {}", path.display(), e))
    })?;
    Config::from_toml(&text)
}

fn discover_config() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    let user = dirs::config_dir()?.join(format!(".{}", CONFIG_FILE_NAME));
    user.exists().then_some(user)
}
