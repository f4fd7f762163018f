use crate::common::command::{
    commit_file, find_commit_ids, gitlet_add, head_commit_id, init_repository_dir,
    run_gitlet_command, stdout_of,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

mod common;

/// `master` at "first", `feature` one commit ahead with `3.txt` added and
/// `1.txt` removed, and `master` checked out
fn diverge_feature(dir: &std::path::Path) {
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("3.txt"), "three".to_string()));
    gitlet_add(dir, "3.txt");
    run_gitlet_command(dir, &["rm", "1.txt"]).assert().success();
    run_gitlet_command(dir, &["commit", "feature work"])
        .assert()
        .success();
    run_gitlet_command(dir, &["checkout", "master"])
        .assert()
        .success();
}

#[rstest]
fn checkout_file_restores_head_version(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "scribbled".to_string()));
    gitlet_add(dir, "1.txt");

    run_gitlet_command(dir, &["checkout", "--", "1.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("1.txt")), "one");
    // staging area is untouched
    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n1.txt\n"), "{status}");
}

#[rstest]
fn checkout_file_from_abbreviated_commit_id(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "1.txt", "uno", "second");

    run_gitlet_command(dir, &["checkout", &first[..8], "--", "1.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert_eq!(head_commit_id(dir), find_commit_ids(dir, "second")[0]);
}

#[rstest]
fn checkout_file_failures(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["checkout", "--", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist in that commit."));

    run_gitlet_command(dir, &["checkout", "0123456789", "--", "1.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No commit with that id exists."));
}

#[rstest]
fn checkout_branch_switches_working_copy(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge_feature(dir);

    assert!(!dir.join("3.txt").exists());
    assert_eq!(read_file(&dir.join("1.txt")), "one");

    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("3.txt")), "three");
    assert!(!dir.join("1.txt").exists());
    assert_eq!(read_file(&dir.join("a").join("2.txt")), "two");
    assert_eq!(
        std::fs::read_to_string(dir.join(".gitlet").join("HEAD")).unwrap(),
        "ref: refs/heads/feature"
    );
}

#[rstest]
fn checkout_branch_failures(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["checkout", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such branch exists."));

    run_gitlet_command(dir, &["checkout", "master"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No need to checkout the current branch.",
        ));

    run_gitlet_command(dir, &["checkout"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect operands."));
}

#[rstest]
fn untracked_file_blocks_checkout(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    diverge_feature(dir);
    write_file(FileSpec::new(dir.join("3.txt"), "mine".to_string()));

    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "There is an untracked file in the way; delete it or add it first.",
        ));

    assert_eq!(read_file(&dir.join("3.txt")), "mine");
    assert_eq!(read_file(&dir.join("1.txt")), "one");
}

#[rstest]
fn reset_moves_branch_and_working_copy(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "1.txt", "uno", "second");
    commit_file(dir, "4.txt", "four", "third");

    run_gitlet_command(dir, &["reset", &first])
        .assert()
        .success();

    assert_eq!(head_commit_id(dir), first);
    assert_eq!(read_file(&dir.join("1.txt")), "one");
    assert!(!dir.join("4.txt").exists());

    let log = stdout_of(dir, &["log"]);
    assert!(!log.contains("second"));
    // discarded commits stay reachable by find
    assert_eq!(find_commit_ids(dir, "third").len(), 1);
}

#[rstest]
fn reset_to_unknown_commit_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["reset", "abcdef0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No commit with that id exists."));
}
