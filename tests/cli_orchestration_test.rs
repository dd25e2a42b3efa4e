// tests/cli_orchestration_test.rs
use std::fs;
use std::path::Path;

use git_release::cli::orchestration::{
    run_release_workflow, ReleaseStep, ReleaseWorkflowArgs, WorkflowResult,
};
use git_release::config::Config;
use git_release::git::MockClient;
use git_release::warning::ReleaseWarning;
use git_release::{HardStop, ReleaseError};
use tempfile::TempDir;

fn repo_with_version(content: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("version.txt"), content).unwrap();
    dir
}

fn run(client: &MockClient, cwd: &Path) -> Result<WorkflowResult, ReleaseError> {
    run_release_workflow(client, cwd, &Config::default(), &ReleaseWorkflowArgs::default())
}

#[test]
fn test_release_stages_and_commits() {
    let repo = repo_with_version(" V01.02 \n");
    let client = MockClient::new(repo.path());

    let result = run(&client, repo.path()).unwrap();

    assert_eq!(result.tag, "V01.02");
    assert_eq!(result.message, "release V01.02");
    assert!(result.executed);
    assert_eq!(
        client.mutating_invocations(),
        vec!["git add .", "git commit -m \"release V01.02\""]
    );
}

#[test]
fn test_preconditions_run_in_order() {
    let repo = repo_with_version("V01.02");
    let client = MockClient::new(repo.path());

    run(&client, repo.path()).unwrap();

    assert_eq!(
        client.invocations(),
        vec![
            "git rev-parse --show-toplevel",
            "git branch --show-current",
            "git diff --quiet --exit-code",
            "git ls-files -z --exclude-standard --others",
            "git add .",
            "git commit -m \"release V01.02\"",
        ]
    );
}

#[test]
fn test_tag_is_trimmed_descriptor_content() {
    for (content, expected) in [
        ("V01.00", "V01.00"),
        ("V01.00\n", "V01.00"),
        ("\t V02.10-rc1 \r\n", "V02.10-rc1"),
        ("1.2.3 final\n\n", "1.2.3 final"),
    ] {
        let repo = repo_with_version(content);
        let client = MockClient::new(repo.path());
        let result = run(&client, repo.path()).unwrap();
        assert_eq!(result.tag, expected, "content {:?}", content);
    }
}

#[test]
fn test_not_at_root_is_hard_stop_without_mutation() {
    let repo = repo_with_version("V01.00");
    let sub = repo.path().join("src");
    fs::create_dir(&sub).unwrap();
    let client = MockClient::new(repo.path());

    let err = run(&client, &sub).unwrap_err();

    assert!(matches!(
        err.as_hard_stop(),
        Some(HardStop::NotAtRoot { .. })
    ));
    assert_eq!(err.exit_code(), 1);
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_wrong_branch_fails_before_staging() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.set_branch("feature/x");

    let err = run(&client, repo.path()).unwrap_err();

    assert!(matches!(err, ReleaseError::WrongBranch { .. }));
    assert!(err.to_string().contains("must be on main"));
    assert!(err.as_hard_stop().is_none());
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_detached_head_fails() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.set_branch("");

    assert!(matches!(
        run(&client, repo.path()),
        Err(ReleaseError::WrongBranch { .. })
    ));
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_modified_tracked_file_fails() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.set_tracked_changes(true);

    assert!(matches!(
        run(&client, repo.path()),
        Err(ReleaseError::NotClean)
    ));
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_untracked_file_fails() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.add_untracked("notes.txt");

    assert!(matches!(
        run(&client, repo.path()),
        Err(ReleaseError::NotClean)
    ));
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_untracked_check_can_be_disabled() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.add_untracked("notes.txt");

    let mut config = Config::default();
    config.release.check_untracked = false;

    run_release_workflow(&client, repo.path(), &config, &ReleaseWorkflowArgs::default()).unwrap();
    assert_eq!(client.mutating_invocations().len(), 2);
}

#[test]
fn test_missing_or_empty_descriptor_fails_without_mutation() {
    let repo = tempfile::tempdir().unwrap();
    let client = MockClient::new(repo.path());
    assert!(matches!(
        run(&client, repo.path()),
        Err(ReleaseError::Version(_))
    ));

    fs::write(repo.path().join("version.txt"), "  \n").unwrap();
    assert!(matches!(
        run(&client, repo.path()),
        Err(ReleaseError::Version(_))
    ));
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_dry_run_executes_nothing() {
    let repo = repo_with_version("V01.00");
    let client = MockClient::new(repo.path());
    let args = ReleaseWorkflowArgs {
        dry_run: true,
        create_tag: true,
        sync_docs: false,
    };

    let result = run_release_workflow(&client, repo.path(), &Config::default(), &args).unwrap();

    assert!(!result.executed);
    assert_eq!(result.steps.len(), 3);
    assert!(client.mutating_invocations().is_empty());
}

#[test]
fn test_commit_failure_aborts_without_rollback() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.fail_on("git commit");

    let mut config = Config::default();
    config.release.create_tag = true;

    let err = run_release_workflow(&client, repo.path(), &config, &ReleaseWorkflowArgs::default())
        .unwrap_err();

    assert_eq!(err.exit_code(), 128);
    // Staging already happened and stays; the tag step never ran
    assert_eq!(
        client.mutating_invocations(),
        vec!["git add .", "git commit -m \"release V01.00\""]
    );
}

#[test]
fn test_tag_step_and_existing_tag_warning() {
    let repo = repo_with_version("V01.00");
    let mut client = MockClient::new(repo.path());
    client.add_tag("V01.00", "c0");

    let args = ReleaseWorkflowArgs {
        dry_run: false,
        create_tag: true,
        sync_docs: false,
    };
    let result = run_release_workflow(&client, repo.path(), &Config::default(), &args).unwrap();

    assert_eq!(
        result.warnings,
        vec![ReleaseWarning::TagAlreadyExists {
            tag: "V01.00".to_string()
        }]
    );
    assert_eq!(
        client.mutating_invocations().last().map(String::as_str),
        Some("git tag -a V01.00 -m \"release V01.00\"")
    );
}

#[test]
fn test_docs_sync_runs_before_main_commit() {
    let repo = repo_with_version("V03.00");
    let out = repo.path().join("o");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("index.html"), "<html/>").unwrap();
    fs::write(out.join("guide.md"), "# guide").unwrap();
    fs::create_dir_all(repo.path().join("docs")).unwrap();
    fs::write(
        repo.path().join(".gitmodules"),
        "[submodule \"docs\"]\n\tpath = docs\n\turl = ../docs.git\n",
    )
    .unwrap();

    let client = MockClient::new(repo.path());
    let mut config = Config::default();
    config.docs.sync = true;
    config.docs.create_tag = true;

    let result =
        run_release_workflow(&client, repo.path(), &config, &ReleaseWorkflowArgs::default())
            .unwrap();

    assert!(result.warnings.is_empty());
    assert!(matches!(result.steps[1], ReleaseStep::CopyDocs { .. }));
    assert_eq!(
        client.mutating_invocations(),
        vec![
            "git submodule update --init --recursive",
            "git -C docs add .",
            "git -C docs commit -m \"release V03.00\"",
            "git add .",
            "git commit -m \"release V03.00\"",
            "git -C docs tag -a V03.00 -m \"release V03.00\"",
        ]
    );
    assert!(repo.path().join("docs/html/index.html").is_file());
    assert!(repo.path().join("docs/md/guide.md").is_file());
}

#[test]
fn test_docs_sync_missing_artifacts_stops_before_commits() {
    let repo = repo_with_version("V03.00");
    fs::create_dir_all(repo.path().join("o")).unwrap();
    fs::write(repo.path().join("o/index.html"), "<html/>").unwrap();

    let client = MockClient::new(repo.path());
    let args = ReleaseWorkflowArgs {
        dry_run: false,
        create_tag: false,
        sync_docs: true,
    };

    let result = run_release_workflow(&client, repo.path(), &Config::default(), &args);

    assert!(matches!(result, Err(ReleaseError::MissingArtifacts(_))));
    assert_eq!(
        client.mutating_invocations(),
        vec!["git submodule update --init --recursive"]
    );
}

#[test]
fn test_docs_dir_not_submodule_warning() {
    let repo = repo_with_version("V03.00");
    let client = MockClient::new(repo.path());
    let args = ReleaseWorkflowArgs {
        dry_run: true,
        create_tag: false,
        sync_docs: true,
    };

    let result = run_release_workflow(&client, repo.path(), &Config::default(), &args).unwrap();

    assert_eq!(
        result.warnings,
        vec![ReleaseWarning::DocsDirNotSubmodule {
            dir: "docs".into()
        }]
    );
}
