use crate::common::command::{gitlet_add, init_repository_dir, run_gitlet_command, stdout_of};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn clean_repository_status(init_repository_dir: TempDir) {
    assert_eq!(
        stdout_of(init_repository_dir.path(), &["status"]),
        "=== Branches ===\n*master\n\n\
         === Staged Files ===\n\n\
         === Removed Files ===\n\n\
         === Modifications Not Staged For Commit ===\n\n\
         === Untracked Files ===\n\n"
    );
}

#[rstest]
fn status_reports_working_copy_changes(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("1.txt"), "changed".to_string()));
    std::fs::remove_file(dir.join("a").join("2.txt")).unwrap();
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));

    assert_eq!(
        stdout_of(dir, &["status"]),
        "=== Branches ===\n*master\n\n\
         === Staged Files ===\n\n\
         === Removed Files ===\n\n\
         === Modifications Not Staged For Commit ===\n1.txt (modified)\na/2.txt (deleted)\n\n\
         === Untracked Files ===\nnew.txt\n\n"
    );
}

#[rstest]
fn status_reports_staged_changes_and_branches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(dir.join("new.txt"), "new".to_string()));
    gitlet_add(dir, "new.txt");
    run_gitlet_command(dir, &["rm", "1.txt"]).assert().success();

    assert_eq!(
        stdout_of(dir, &["status"]),
        "=== Branches ===\nfeature\n*master\n\n\
         === Staged Files ===\nnew.txt\n\n\
         === Removed Files ===\n1.txt\n\n\
         === Modifications Not Staged For Commit ===\n\n\
         === Untracked Files ===\n\n"
    );
}
