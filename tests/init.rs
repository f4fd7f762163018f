use crate::common::command::{repository_dir, run_gitlet_command, stdout_of};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

#[rstest]
fn new_repository_has_initial_commit_on_master(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let metadata = repository_dir.path().join(".gitlet");
    assert!(metadata.join("objects").is_dir());
    assert_eq!(
        std::fs::read_to_string(metadata.join("HEAD"))?,
        "ref: refs/heads/master"
    );

    let log = stdout_of(repository_dir.path(), &["log"]);
    assert!(log.starts_with("===\ncommit "));
    assert!(log.ends_with("Date: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"));

    Ok(())
}

#[rstest]
fn init_at_explicit_path(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let nested = repository_dir.path().join("nested").join("project");

    run_gitlet_command(repository_dir.path(), &["init", nested.to_str().unwrap()])
        .assert()
        .success();

    assert!(nested.join(".gitlet").join("graph").is_file());

    Ok(())
}

#[rstest]
fn init_twice_fails(repository_dir: TempDir) {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A Gitlet version-control system already exists in the current directory.",
        ));
}

#[rstest]
#[case(&["status"])]
#[case(&["log"])]
#[case(&["branch", "feature"])]
#[case(&["merge", "feature"])]
fn commands_outside_a_repository_fail(repository_dir: TempDir, #[case] args: &[&str]) {
    run_gitlet_command(repository_dir.path(), args)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not in an initialized Gitlet directory."));

    assert!(!repository_dir.path().join(".gitlet").exists());
}
