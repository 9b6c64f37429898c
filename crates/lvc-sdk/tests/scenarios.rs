use std::fs;
use std::path::Path;

use lvc_sdk::{FileStatus, Lvc, ObjectId, SdkError};
use tempfile::TempDir;

/// A fresh repository in a temporary working directory.
fn setup() -> (TempDir, Lvc) {
    let dir = TempDir::new().unwrap();
    let repo = Lvc::init(dir.path()).unwrap();
    (dir, repo)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> Option<String> {
    fs::read_to_string(root.join(rel)).ok()
}

#[test]
fn first_commit_tracks_file_digest() {
    let (dir, repo) = setup();
    let root_hash = repo.head().unwrap().hash();

    write(dir.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();
    repo.commit("first").unwrap();

    let head = repo.head().unwrap();
    assert_eq!(
        head.tracked_digest("a.txt").map(ObjectId::to_hex).as_deref(),
        Some("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
    );
    assert_eq!(head.previous_commit(), Some(root_hash));
    assert!(repo.state().unwrap().staging.is_empty());
    // blob lands under its hex digest
    assert!(dir
        .path()
        .join(".lvc/blobs/2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824")
        .is_file());
}

#[test]
fn unstaged_edit_is_reported_as_unstaged() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "hello");
    repo.add(&["a.txt"]).unwrap();
    repo.commit("first").unwrap();

    write(dir.path(), "a.txt", "world");
    let status = repo.status().unwrap();
    assert!(status.staged.is_empty());
    assert_eq!(
        status.unstaged_with(FileStatus::Modified).collect::<Vec<_>>(),
        vec!["a.txt"]
    );
}

#[test]
fn reset_abandons_descendants() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "one");
    repo.add(&["a.txt"]).unwrap();
    let first = repo.commit("first").unwrap();
    write(dir.path(), "a.txt", "two");
    write(dir.path(), "b.txt", "b");
    repo.add(&["a.txt", "b.txt"]).unwrap();
    let second = repo.commit("second").unwrap();

    repo.reset("HEAD~1").unwrap();

    let head = repo.head().unwrap();
    assert_eq!(head.hash(), first);
    assert_eq!(head.next_commit(), None);
    assert!(repo.state().unwrap().chain.contains(&second));
    assert_eq!(read(dir.path(), "a.txt").as_deref(), Some("one"));
    assert_eq!(read(dir.path(), "b.txt"), None);
    assert_eq!(repo.resolve("master").unwrap(), first);
}

#[test]
fn removed_file_disappears_on_checkout() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "a");
    write(dir.path(), "keep.txt", "k");
    repo.add(&["a.txt", "keep.txt"]).unwrap();
    repo.commit("both").unwrap();

    repo.remove(&["a.txt"]).unwrap();
    let dropped = repo.commit("drop a").unwrap();
    assert!(!repo.head().unwrap().tracks("a.txt"));
    assert!(repo.head().unwrap().tracks("keep.txt"));

    // `rm` leaves the file alone; moving through history removes it
    assert!(dir.path().join("a.txt").exists());
    repo.checkout("HEAD~1").unwrap();
    assert_eq!(read(dir.path(), "a.txt").as_deref(), Some("a"));
    repo.checkout(&dropped.to_hex()).unwrap();
    assert_eq!(read(dir.path(), "a.txt"), None);
    assert_eq!(read(dir.path(), "keep.txt").as_deref(), Some("k"));
}

#[test]
fn repeated_checkout_is_idempotent() {
    let (dir, repo) = setup();
    write(dir.path(), "dir/a.txt", "1");
    repo.add(&["dir/a.txt"]).unwrap();
    let first = repo.commit("one").unwrap();
    write(dir.path(), "dir/a.txt", "2");
    repo.add(&["dir/a.txt"]).unwrap();
    repo.commit("two").unwrap();

    let target = first.to_hex();
    repo.checkout(&target).unwrap();
    let state = repo.state().unwrap();
    let content = read(dir.path(), "dir/a.txt");

    repo.checkout(&target).unwrap();
    assert_eq!(repo.state().unwrap(), state);
    assert_eq!(read(dir.path(), "dir/a.txt"), content);
}

#[test]
fn detached_head_round_trip() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "1");
    repo.add(&["a.txt"]).unwrap();
    repo.commit("one").unwrap();
    write(dir.path(), "a.txt", "2");
    repo.add(&["a.txt"]).unwrap();
    let tip = repo.commit("two").unwrap();

    repo.checkout("HEAD~2").unwrap();
    assert!(repo.is_detached().unwrap());
    assert_eq!(read(dir.path(), "a.txt"), None);
    assert!(matches!(repo.commit("nope"), Err(SdkError::HeadDetached("commit"))));
    assert!(matches!(repo.status(), Err(SdkError::HeadDetached("status"))));
    assert_eq!(repo.log(None).unwrap().len(), 1);

    assert_eq!(repo.checkout("master").unwrap(), tip);
    assert!(!repo.is_detached().unwrap());
    assert_eq!(read(dir.path(), "a.txt").as_deref(), Some("2"));
}

#[test]
fn relative_revisions() {
    let (_dir, repo) = setup();
    let root = repo.resolve("HEAD").unwrap();
    let one = repo.commit("one").unwrap();
    let two = repo.commit("two").unwrap();

    assert_eq!(repo.resolve("HEAD~0").unwrap(), two);
    assert_eq!(repo.resolve("HEAD~").unwrap(), one);
    assert_eq!(repo.resolve("HEAD~2").unwrap(), root);
    assert!(matches!(
        repo.resolve("HEAD~3"),
        Err(SdkError::InsufficientHistory { requested: 3, available: 2 })
    ));
}

#[test]
fn log_lists_newest_first() {
    let (_dir, repo) = setup();
    repo.commit("one").unwrap();
    repo.commit("two").unwrap();
    let messages: Vec<String> = repo
        .log(None)
        .unwrap()
        .iter()
        .map(|c| c.message().to_string())
        .collect();
    assert_eq!(messages, vec!["two", "one", "Initial commit"]);
    assert!(repo.log(None).unwrap().iter().all(|c| c.author() == "Test user"));
}

#[test]
fn path_checkout_discards_local_edit() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "committed");
    repo.add(&["a.txt"]).unwrap();
    repo.commit("one").unwrap();

    write(dir.path(), "a.txt", "scribble");
    repo.add(&["a.txt"]).unwrap();
    repo.checkout_paths(&["--", "a.txt"]).unwrap();

    assert_eq!(read(dir.path(), "a.txt").as_deref(), Some("committed"));
    assert!(repo.status().unwrap().is_clean());
}

#[test]
fn failed_path_checkout_keeps_tree_and_staging_in_step() {
    let (dir, repo) = setup();
    write(dir.path(), "a.txt", "committed");
    repo.add(&["a.txt"]).unwrap();
    repo.commit("one").unwrap();

    write(dir.path(), "a.txt", "edited");
    repo.add(&["a.txt"]).unwrap();
    let err = repo.checkout_paths(&["a.txt", "untracked.txt"]).unwrap_err();
    assert!(matches!(err, SdkError::NotTracked(_)));

    assert_eq!(read(dir.path(), "a.txt").as_deref(), Some("edited"));
    let status = repo.status().unwrap();
    assert_eq!(
        status.staged_with(FileStatus::Modified).collect::<Vec<_>>(),
        vec!["a.txt"]
    );
    assert!(status.unstaged.is_empty());
}

#[test]
fn status_of_fresh_repository() {
    let (dir, repo) = setup();
    assert!(repo.status().unwrap().is_clean());

    write(dir.path(), "notes/todo.txt", "x");
    let status = repo.status().unwrap();
    assert_eq!(status.untracked, vec!["notes/todo.txt".to_string()]);
}

#[test]
fn commands_before_init_fail() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(Lvc::open(dir.path()), Err(SdkError::NotInitialized(_))));
}
