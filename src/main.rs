use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use git_release::cli::export::{check_export, export_tracked_files, ExportWorkflowArgs};
use git_release::cli::orchestration::{run_release_workflow, ReleaseWorkflowArgs};
use git_release::cli::status::collect_status;
use git_release::config::{self, Config};
use git_release::git::GitCli;
use git_release::{ui, ReleaseError};

#[derive(clap::Parser)]
#[command(
    name = "git-release",
    version,
    about = "Script for managing release process."
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    release: ReleaseFlags,
}

#[derive(clap::Args, Clone, Default)]
struct ReleaseFlags {
    #[arg(long, help = "Print the release plan without running it")]
    dry_run: bool,

    #[arg(long, help = "Create an annotated tag after committing")]
    tag: bool,

    #[arg(long, help = "Sync the documentation submodule before committing")]
    sync_docs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Commit a release on the release branch (the default command)
    Release(ReleaseFlags),
    /// Replace a directory's content with the tracked files of HEAD
    Export {
        /// Directory to refill
        destination: PathBuf,

        #[arg(short = 'R', long, help = "Do not require a release tag at HEAD")]
        ignore_on_release: bool,

        #[arg(long, help = "Do not include files of submodules")]
        no_submodules: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        force: bool,
    },
    /// Show repository facts the release gates on
    Status,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<ReleaseError>() {
            Some(ReleaseError::HardStop(stop)) => {
                ui::display_hard_stop(stop);
                ExitCode::from(1)
            }
            Some(err) => {
                ui::display_error(&err.to_string());
                ExitCode::from(exit_status(err.exit_code()))
            }
            None => {
                ui::display_error(&format!("{:#}", e));
                ExitCode::from(1)
            }
        },
    }
}

fn exit_status(code: i32) -> u8 {
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}

fn run(args: Args) -> Result<ExitCode> {
    let config = config::load_config(args.config.as_deref())?;
    let cwd = std::env::current_dir()?;
    let client = GitCli::new();

    match args.command {
        None => release(&client, &cwd, &config, &args.release),
        Some(Command::Release(flags)) => release(&client, &cwd, &config, &flags),
        Some(Command::Export {
            destination,
            ignore_on_release,
            no_submodules,
            force,
        }) => {
            let export = ExportWorkflowArgs {
                destination,
                ignore_on_release,
                recurse_submodules: no_submodules.then_some(false),
            };
            let toplevel = check_export(&client, &cwd, &config, &export)?;

            let prompt = format!(
                "Delete everything in '{}' except {:?} and copy tracked files?",
                export.destination.display(),
                config.export.exclude
            );
            if !force && !ui::confirm_action(&prompt)? {
                println!("Export cancelled by user.");
                return Ok(ExitCode::SUCCESS);
            }

            let result = export_tracked_files(&client, &toplevel, &config, &export)?;
            for warning in &result.warnings {
                ui::display_warning(warning);
            }
            ui::display_success(&format!(
                "Exported {} files to {} ({} stale entries removed)",
                result.copied,
                export.destination.display(),
                result.removed
            ));
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Status) => {
            let (report, warnings) = collect_status(&client)?;
            for warning in &warnings {
                ui::display_warning(warning);
            }
            println!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn release(
    client: &GitCli,
    cwd: &std::path::Path,
    config: &Config,
    flags: &ReleaseFlags,
) -> Result<ExitCode> {
    let workflow = ReleaseWorkflowArgs {
        dry_run: flags.dry_run,
        create_tag: flags.tag,
        sync_docs: flags.sync_docs,
    };

    let result = run_release_workflow(client, cwd, config, &workflow)?;

    if result.executed {
        ui::display_success(&format!("Committed release {}", result.tag));
    } else {
        ui::display_plan(&result.tag, &result.steps);
        ui::display_status("Dry run: nothing was executed");
    }
    Ok(ExitCode::SUCCESS)
}
