use crate::common::command::{
    commit_file, find_commit_ids, gitlet_add, gitlet_commit, head_commit_id, init_repository_dir,
    repository_dir, run_gitlet_command, stdout_of,
};
use crate::common::file::{FileSpec, write_file, write_generated_files};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;
use std::collections::HashSet;

mod common;

#[rstest]
fn commit_without_staged_changes_fails(init_repository_dir: TempDir) {
    let head = head_commit_id(init_repository_dir.path());

    run_gitlet_command(init_repository_dir.path(), &["commit", "nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No changes added to the commit."));

    assert_eq!(head_commit_id(init_repository_dir.path()), head);
}

#[rstest]
fn commit_with_blank_message_fails(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "changed".to_string(),
    ));
    gitlet_add(init_repository_dir.path(), "1.txt");

    run_gitlet_command(init_repository_dir.path(), &["commit", "  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a commit message."));
}

#[rstest]
fn add_missing_file_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["add", "ghost.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist."));
}

#[rstest]
fn commit_many_generated_files(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();
    let files = write_generated_files(repository_dir.path(), 5);

    for file in &files {
        let name = file.path.file_name().unwrap().to_str().unwrap();
        gitlet_add(repository_dir.path(), name);
    }
    gitlet_commit(repository_dir.path(), "generated");

    for file in &files {
        std::fs::remove_file(&file.path)?;
    }
    for file in &files {
        let name = file.path.file_name().unwrap().to_str().unwrap();
        run_gitlet_command(repository_dir.path(), &["checkout", "--", name])
            .assert()
            .success();
        assert_eq!(std::fs::read_to_string(&file.path)?, file.content);
    }

    Ok(())
}

#[rstest]
fn adding_committed_content_unstages_the_file(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    gitlet_add(dir, "1.txt");

    write_file(FileSpec::new(dir.join("1.txt"), "one".to_string()));
    gitlet_add(dir, "1.txt");

    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"), "{status}");

    run_gitlet_command(dir, &["commit", "no-op"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No changes added to the commit."));
}

#[rstest]
fn rm_tracked_file_deletes_and_stages_removal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "a/2.txt"])
        .assert()
        .success();

    assert!(!dir.join("a").join("2.txt").exists());
    assert!(!dir.join("a").exists());
    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\na/2.txt\n\n"), "{status}");

    gitlet_commit(dir, "drop two");
    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\n\n"), "{status}");

    run_gitlet_command(dir, &["checkout", "--", "a/2.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File does not exist in that commit."));
}

#[rstest]
fn rm_untracked_file_fails(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("loose.txt"),
        "loose".to_string(),
    ));

    run_gitlet_command(init_repository_dir.path(), &["rm", "loose.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No reason to remove the file."));

    assert!(init_repository_dir.path().join("loose.txt").exists());
}

#[rstest]
fn log_follows_first_parents_from_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "1.txt", "uno", "second");

    let log = stdout_of(dir, &["log"]);
    let messages = log
        .split("===\n")
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.lines().nth(2).unwrap().to_string())
        .collect::<Vec<_>>();

    assert_eq!(messages, vec!["second", "first", "initial commit"]);
    assert!(log.contains("Date: Sun Jan 1 12:00:00 2023 +0000\nsecond\n"));
    assert!(log.starts_with(&format!("===\ncommit {}\n", head_commit_id(dir))));
}

#[rstest]
fn find_reports_missing_message(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["find", "never written"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Found no commit with that message."));
}

#[rstest]
fn recreating_an_identical_commit_gets_a_fresh_id(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "1.txt"]).assert().success();
    gitlet_commit(dir, "drop one");
    commit_file(dir, "1.txt", "one", "first");

    let ids = find_commit_ids(dir, "first");
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);

    let global_log = stdout_of(dir, &["global-log"]);
    let all_ids = global_log
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .collect::<HashSet<_>>();
    assert_eq!(all_ids.len(), 4);
}

#[rstest]
fn adding_identical_content_twice_keeps_one_staged_entry(repository_dir: TempDir) {
    let dir = repository_dir.path();
    run_gitlet_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("f"), "same".to_string()));

    gitlet_add(dir, "f");
    let before = std::fs::read(dir.join(".gitlet").join("index")).unwrap();
    gitlet_add(dir, "f");
    let after = std::fs::read(dir.join(".gitlet").join("index")).unwrap();

    assert_eq!(before, after);
    let status = stdout_of(dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\nf\n\n"), "{status}");
}

#[rstest]
fn restored_file_hashes_like_the_original(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "1.txt", "uno", "second");

    run_gitlet_command(dir, &["checkout", &first, "--", "1.txt"])
        .assert()
        .success();
    gitlet_add(dir, "1.txt");
    gitlet_commit(dir, "back to one");

    let objects = walk_objects(dir);
    run_gitlet_command(dir, &["rm", "1.txt"]).assert().success();
    gitlet_commit(dir, "gone");
    commit_file(dir, "1.txt", "one", "again");

    // only the two new commits were written, the blob for "one" was reused
    assert_eq!(walk_objects(dir), objects + 2);
}

fn walk_objects(dir: &std::path::Path) -> usize {
    walkdir::WalkDir::new(dir.join(".gitlet").join("objects"))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .count()
}

#[rstest]
fn file_name_with_a_newline_is_refused(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("bad\nname"), "x".to_string()));

    run_gitlet_command(dir, &["add", "bad\nname"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be tracked."));

    run_gitlet_command(dir, &["commit", "nothing to record"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No changes added to the commit."));
    run_gitlet_command(dir, &["log"]).assert().success();
    run_gitlet_command(dir, &["status"]).assert().success();
}
