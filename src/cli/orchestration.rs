//! Release workflow orchestration
//!
//! Checks the preconditions in a fixed order, then builds and runs the
//! release plan. Any failure aborts the rest of the sequence; steps that
//! already ran are not undone.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::domain::VersionDescriptor;
use crate::error::{ReleaseError, Result};
use crate::git::{render_command, VersionControlClient};
use crate::inspector::{self, files};
use crate::ui;
use crate::warning::ReleaseWarning;

/// Arguments for the release workflow
///
/// Mirrors the CLI flags in a form the workflow can take without depending
/// on clap. Flags only ever switch optional steps on; they never disable
/// something the configuration enables.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReleaseWorkflowArgs {
    /// Build and return the plan without running it
    pub dry_run: bool,

    /// Create an annotated tag after committing
    pub create_tag: bool,

    /// Sync the documentation submodule before committing
    pub sync_docs: bool,
}

/// One side-effecting action of the release sequence.
///
/// `dir` is `None` for the repository itself and the submodule path
/// otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseStep {
    UpdateSubmodules,
    CopyDocs {
        source_dir: PathBuf,
        docs_dir: PathBuf,
        extensions: Vec<String>,
    },
    StageAll {
        dir: Option<PathBuf>,
    },
    Commit {
        dir: Option<PathBuf>,
        message: String,
    },
    Tag {
        dir: Option<PathBuf>,
        tag: String,
        message: String,
    },
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseStep::UpdateSubmodules => f.write_str(&render_command(
                None,
                &["submodule", "update", "--init", "--recursive"],
            )),
            ReleaseStep::CopyDocs {
                source_dir,
                docs_dir,
                extensions,
            } => write!(
                f,
                "copy {}/*.{{{}}} into {}/<ext>/",
                source_dir.display(),
                extensions.join(","),
                docs_dir.display()
            ),
            ReleaseStep::StageAll { dir } => {
                f.write_str(&render_command(dir.as_deref(), &["add", "."]))
            }
            ReleaseStep::Commit { dir, message } => {
                f.write_str(&render_command(dir.as_deref(), &["commit", "-m", message.as_str()]))
            }
            ReleaseStep::Tag { dir, tag, message } => f.write_str(&render_command(
                dir.as_deref(),
                &["tag", "-a", tag.as_str(), "-m", message.as_str()],
            )),
        }
    }
}

/// Result of a release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// The tag computed from the version descriptor
    pub tag: String,

    /// The commit message
    pub message: String,

    /// The plan, in execution order
    pub steps: Vec<ReleaseStep>,

    /// Whether the plan was executed (false for a dry run)
    pub executed: bool,

    /// Non-fatal issues found along the way
    pub warnings: Vec<ReleaseWarning>,
}

/// Build the ordered release plan.
pub fn plan_release(
    config: &Config,
    args: &ReleaseWorkflowArgs,
    tag: &str,
    message: &str,
) -> Vec<ReleaseStep> {
    let sync_docs = config.docs.sync || args.sync_docs;
    let create_tag = config.release.create_tag || args.create_tag;
    let docs_dir = Some(config.docs.dir.clone());
    let mut steps = Vec::new();

    if sync_docs {
        steps.push(ReleaseStep::UpdateSubmodules);
        steps.push(ReleaseStep::CopyDocs {
            source_dir: config.docs.source_dir.clone(),
            docs_dir: config.docs.dir.clone(),
            extensions: config.docs.extensions.clone(),
        });
        steps.push(ReleaseStep::StageAll {
            dir: docs_dir.clone(),
        });
        steps.push(ReleaseStep::Commit {
            dir: docs_dir.clone(),
            message: message.to_string(),
        });
    }

    steps.push(ReleaseStep::StageAll { dir: None });
    steps.push(ReleaseStep::Commit {
        dir: None,
        message: message.to_string(),
    });

    if sync_docs && config.docs.create_tag {
        steps.push(ReleaseStep::Tag {
            dir: docs_dir,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }

    if create_tag {
        steps.push(ReleaseStep::Tag {
            dir: None,
            tag: tag.to_string(),
            message: message.to_string(),
        });
    }

    steps
}

/// Main release workflow
///
/// 1. `cwd` must be the repository toplevel (hard stop otherwise)
/// 2. The current branch must be the configured release branch
/// 3. The working tree must be clean
/// 4. The tag is read from the version descriptor
/// 5. The commit message is rendered from the template
/// 6. The plan is executed step by step (skipped on a dry run)
///
/// No mutating command is issued before all preconditions pass.
pub fn run_release_workflow<C: VersionControlClient + ?Sized>(
    client: &C,
    cwd: &Path,
    config: &Config,
    args: &ReleaseWorkflowArgs,
) -> Result<WorkflowResult> {
    let toplevel = inspector::assert_at_root(client, cwd)?;

    let branch = inspector::current_branch(client, None)?;
    config.release_branch().check(&branch)?;

    inspector::assert_clean(client, None, config.release.check_untracked)?;

    let version = VersionDescriptor::read(&toplevel.join(&config.release.version_file))?;
    let tag = version.tag().to_string();
    let message = config.message_template()?.render(&tag);

    let steps = plan_release(config, args, &tag, &message);
    let warnings = collect_warnings(client, &toplevel, config, &steps)?;
    for warning in &warnings {
        ui::display_warning(warning);
    }

    if !args.dry_run {
        for step in &steps {
            execute_step(client, &toplevel, step)?;
        }
    }

    Ok(WorkflowResult {
        tag,
        message,
        steps,
        executed: !args.dry_run,
        warnings,
    })
}

fn collect_warnings<C: VersionControlClient + ?Sized>(
    client: &C,
    toplevel: &Path,
    config: &Config,
    steps: &[ReleaseStep],
) -> Result<Vec<ReleaseWarning>> {
    let mut warnings = Vec::new();

    if steps
        .iter()
        .any(|step| matches!(step, ReleaseStep::CopyDocs { .. }))
    {
        let docs = files::normalize(&config.docs.dir);
        let registered = inspector::submodule_directories(toplevel)?
            .iter()
            .any(|path| files::normalize(Path::new(path)) == docs);
        if !registered {
            warnings.push(ReleaseWarning::DocsDirNotSubmodule {
                dir: config.docs.dir.clone(),
            });
        }
    }

    let root_tag = steps.iter().find_map(|step| match step {
        ReleaseStep::Tag { dir: None, tag, .. } => Some(tag),
        _ => None,
    });
    if let Some(tag) = root_tag {
        if client.list_tags()?.iter().any(|existing| existing == tag) {
            warnings.push(ReleaseWarning::TagAlreadyExists { tag: tag.clone() });
        }
    }

    Ok(warnings)
}

fn execute_step<C: VersionControlClient + ?Sized>(
    client: &C,
    toplevel: &Path,
    step: &ReleaseStep,
) -> Result<()> {
    ui::display_command(&step.to_string());

    match step {
        ReleaseStep::UpdateSubmodules => client.update_submodules(),
        ReleaseStep::CopyDocs {
            source_dir,
            docs_dir,
            extensions,
        } => copy_docs(
            &toplevel.join(source_dir),
            &toplevel.join(docs_dir),
            extensions,
        )
        .map(|_| ()),
        ReleaseStep::StageAll { dir } => client.stage_all(dir.as_deref()),
        ReleaseStep::Commit { dir, message } => client.commit(dir.as_deref(), message),
        ReleaseStep::Tag { dir, tag, message } => {
            client.create_annotated_tag(dir.as_deref(), tag, message)
        }
    }
}

/// Copy `<source_dir>/*.<ext>` into `<docs_dir>/<ext>/` for every extension.
///
/// Fails with [ReleaseError::MissingArtifacts] as soon as an extension has
/// no files; extensions handled before that stay copied.
pub fn copy_docs(source_dir: &Path, docs_dir: &Path, extensions: &[String]) -> Result<usize> {
    let mut copied = 0;

    for ext in extensions {
        let artifacts = files::files_with_extension(source_dir, ext)?;
        if artifacts.is_empty() {
            return Err(ReleaseError::missing_artifacts(format!(
                "there is no *.{} in {}",
                ext,
                source_dir.display()
            )));
        }

        let target = docs_dir.join(ext);
        fs::create_dir_all(&target).map_err(|e| ReleaseError::file(&target, e))?;
        for artifact in artifacts {
            if let Some(name) = artifact.file_name() {
                files::copy_file(&artifact, &target.join(name))?;
                copied += 1;
            }
        }
    }

    Ok(copied)
}
