use predicates::prelude::{predicate, Predicate};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn fresh_repository_status_is_empty(
    #[from(common::repository_dir)] dir: assert_fs::TempDir,
) {
    let status = common::stdout(&dir, &["status"]);
    assert_eq!(
        status,
        "=== Branches ===\n\
         *master\n\
         \n\
         === Staged Files ===\n\
         \n\
         === Removed Files ===\n\
         \n\
         === Modifications Not Staged For Commit ===\n\
         \n\
         === Untracked Files ===\n\n"
    );
}

#[test]
fn added_file_shows_as_staged() {
    let dir = common::init_repo();
    common::write_file(&dir, "hello.txt", "hello\n");

    common::run(&dir, &["add", "hello.txt"]).success().stdout("");

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\nhello.txt\n"));
}

#[test]
fn untracked_files_are_listed_sorted() {
    let dir = common::init_repo();
    common::write_file(&dir, "b.txt", "b");
    common::write_file(&dir, "a.txt", "a");
    common::run(&dir, &["add", "b.txt"]).success();

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\nb.txt\n"));
    assert!(status.contains("=== Untracked Files ===\na.txt\n"));
}

#[test]
fn adding_a_missing_file_changes_nothing() {
    let dir = common::init_repo();

    common::run(&dir, &["add", "ghost.txt"]).success().stdout("");

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
}

#[test]
fn re_adding_an_unmodified_tracked_file_stages_nothing() {
    let dir = common::init_repo();
    common::commit_file(&dir, "f.txt", "v1", "add f");

    common::run(&dir, &["add", "f.txt"]).success();

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
}

#[test]
fn modified_tracked_file_is_reported() {
    let dir = common::init_repo();
    common::commit_file(&dir, "f.txt", "v1", "add f");
    common::write_file(&dir, "f.txt", "v2");

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains(
        "=== Modifications Not Staged For Commit ===\nf.txt (modified)\n"
    ));
}

#[test]
fn deleted_tracked_file_is_reported() {
    let dir = common::init_repo();
    common::commit_file(&dir, "f.txt", "v1", "add f");
    std::fs::remove_file(dir.path().join("f.txt")).unwrap();

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains(
        "=== Modifications Not Staged For Commit ===\nf.txt (deleted)\n"
    ));
}

#[test]
fn rewritten_staged_file_becomes_untracked() {
    let dir = common::init_repo();
    common::write_file(&dir, "f.txt", "staged");
    common::run(&dir, &["add", "f.txt"]).success();
    common::write_file(&dir, "f.txt", "rewritten");

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\nf.txt\n"));
}

#[test]
fn rm_on_an_unknown_path_is_refused() {
    let dir = common::init_repo();
    common::write_file(&dir, "loose.txt", "content");

    common::run(&dir, &["rm", "loose.txt"])
        .success()
        .stdout("No reason to remove the file.\n");

    assert!(common::file_exists(&dir, "loose.txt"));
}

#[test]
fn rm_unstages_a_pending_addition_without_deleting() {
    let dir = common::init_repo();
    common::write_file(&dir, "f.txt", "v1");
    common::run(&dir, &["add", "f.txt"]).success();

    common::run(&dir, &["rm", "f.txt"]).success().stdout("");

    assert!(common::file_exists(&dir, "f.txt"));
    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Untracked Files ===\nf.txt\n"));
}

#[test]
fn rm_on_a_tracked_file_stages_removal_and_deletes_it() {
    let dir = common::init_repo();
    common::commit_file(&dir, "f.txt", "v1", "add f");

    common::run(&dir, &["rm", "f.txt"]).success().stdout("");

    assert!(!common::file_exists(&dir, "f.txt"));
    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\nf.txt\n"));
}

#[test]
fn add_after_rm_restores_the_file_from_its_baseline() {
    let dir = common::init_repo();
    common::commit_file(&dir, "f.txt", "v1", "add f");
    common::run(&dir, &["rm", "f.txt"]).success();

    common::run(&dir, &["add", "f.txt"]).success();

    assert_eq!(common::read_file(&dir, "f.txt"), "v1");
    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Removed Files ===\n\n"));
    assert!(status.contains("=== Staged Files ===\nf.txt\n"));
}

#[test]
fn nested_paths_are_tracked_with_forward_slashes() {
    let dir = common::init_repo();
    common::write_file(&dir, "src/deep/file.txt", "nested");

    common::run(&dir, &["add", "src/deep/file.txt"]).success();

    let status = common::stdout(&dir, &["status"]);
    assert!(status.contains("=== Staged Files ===\nsrc/deep/file.txt\n"));
}

#[test]
fn staged_blobs_live_in_the_staging_substore_until_commit() {
    let dir = common::init_repo();
    common::write_file(&dir, "f.txt", "v1");
    common::run(&dir, &["add", "f.txt"]).success();

    let staged = dir.path().join(".grit/objects/staged");
    let staged_files = |path: &std::path::Path| {
        walkdir::WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count()
    };
    assert_eq!(staged_files(&staged), 1);

    common::run(&dir, &["commit", "add f"]).success();
    assert_eq!(staged_files(&staged), 0);
}

#[test]
fn status_output_ends_each_section_with_a_blank_line() {
    let dir = common::init_repo();
    common::write_file(&dir, "f.txt", "v1");

    let status = common::stdout(&dir, &["status"]);
    assert!(predicate::str::ends_with("=== Untracked Files ===\nf.txt\n\n").eval(&status));
}
