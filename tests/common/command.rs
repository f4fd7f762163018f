use crate::common::COMMIT_DATE;
use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with `1.txt` and `a/2.txt` committed as "first"
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));

    gitlet_add(repository_dir.path(), "1.txt");
    gitlet_add(repository_dir.path(), "a/2.txt");
    gitlet_commit(repository_dir.path(), "first");

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("GITLET_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_add(dir: &Path, file: &str) {
    run_gitlet_command(dir, &["add", file]).assert().success();
}

pub fn gitlet_commit(dir: &Path, message: &str) {
    run_gitlet_command(dir, &["commit", message])
        .assert()
        .success();
}

/// Write `content` to `file`, stage it and commit it
pub fn commit_file(dir: &Path, file: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(file), content.to_string()));
    gitlet_add(dir, file);
    gitlet_commit(dir, message);
}

pub fn stdout_of(dir: &Path, args: &[&str]) -> String {
    let output = run_gitlet_command(dir, args).assert().success();
    String::from_utf8(output.get_output().stdout.clone()).expect("stdout is not UTF-8")
}

/// Ids of the commits whose message is `message`, in creation order
pub fn find_commit_ids(dir: &Path, message: &str) -> Vec<String> {
    stdout_of(dir, &["find", message])
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn branch_commit_id(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".gitlet").join("refs").join("heads").join(branch);
    std::fs::read_to_string(ref_path)
        .expect("Failed to read branch pointer")
        .trim()
        .to_string()
}

/// Commit the current branch points at
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".gitlet").join("HEAD"))
        .expect("Failed to read HEAD");
    let branch = head
        .trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD is not a symbolic ref");

    branch_commit_id(dir, branch)
}
