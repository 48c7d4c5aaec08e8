#![allow(dead_code)]

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use assert_fs::fixture::{FileWriteStr, PathChild};
use assert_fs::TempDir;
use rstest::fixture;

/// An initialized repository in a fresh temp directory.
#[fixture]
pub fn repository_dir() -> TempDir {
    init_repo()
}

pub fn grit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("grit").expect("grit binary should be built");
    cmd.current_dir(dir.path());
    cmd
}

pub fn run(dir: &TempDir, args: &[&str]) -> Assert {
    grit(dir).args(args).assert()
}

/// Run a command and capture stdout; every command is expected to exit
/// successfully, scripted error messages included.
pub fn stdout(dir: &TempDir, args: &[&str]) -> String {
    let output = grit(dir)
        .args(args)
        .output()
        .expect("grit command should run");
    assert!(output.status.success(), "grit {:?} failed", args);
    String::from_utf8(output.stdout).expect("grit output should be UTF-8")
}

pub fn init_repo() -> TempDir {
    let dir = TempDir::new().expect("failed to create temp directory");
    run(&dir, &["init"]).success();
    dir
}

pub fn write_file(dir: &TempDir, path: &str, content: &str) {
    dir.child(path)
        .write_str(content)
        .expect("failed to write working file");
}

pub fn read_file(dir: &TempDir, path: &str) -> String {
    std::fs::read_to_string(dir.path().join(path)).expect("failed to read working file")
}

pub fn file_exists(dir: &TempDir, path: &str) -> bool {
    dir.path().join(path).is_file()
}

/// Write, stage and commit one file.
pub fn commit_file(dir: &TempDir, path: &str, content: &str, message: &str) {
    write_file(dir, path, content);
    run(dir, &["add", path]).success();
    run(dir, &["commit", message]).success();
}

/// Id of the current branch tip, parsed from the first `log` entry.
pub fn head_commit_id(dir: &TempDir) -> String {
    let log = stdout(dir, &["log"]);
    log.lines()
        .find_map(|line| line.strip_prefix("commit "))
        .expect("log should contain a commit line")
        .to_string()
}
