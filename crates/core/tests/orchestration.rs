//! End-to-end behaviour of the `sync` entry point: validation, the initial
//! pass and watch startup.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use syncdir_core::{
    LinkRegistry, SyncError, SyncOptions, SyncRoots, TransferMode, sync, sync_roots,
};
use test_support::{FileTree, TestDir, snapshot, wait_until};

fn options() -> syncdir_core::SyncOptionsBuilder {
    SyncOptions::builder().link_registry(LinkRegistry::new())
}

#[test]
fn single_pair_is_synced_without_a_handle() {
    let dir = TestDir::new();
    let tree = FileTree::new().file("a/x", "1").file("b/y", "2");
    tree.create_in(&dir.join("src"));

    let handle = sync(dir.join("src"), dir.join("dst"), options().build()).expect("sync");

    assert!(handle.is_none());
    assert_eq!(snapshot(&dir.join("dst")), tree.expected());
}

#[test]
fn lists_of_pairs_are_synced_position_by_position() {
    let dir = TestDir::new();
    FileTree::new().file("one", "1").create_in(&dir.join("s1"));
    FileTree::new().file("two", "2").create_in(&dir.join("s2"));

    sync(
        vec![dir.join("s1"), dir.join("s2")],
        vec![dir.join("t1"), dir.join("t2")],
        options().build(),
    )
    .expect("sync");

    assert_eq!(dir.read("t1/one"), "1");
    assert_eq!(dir.read("t2/two"), "2");
    assert!(!dir.join("t1/two").exists());
}

#[test]
fn relative_paths_resolve_against_the_configured_cwd() {
    let dir = TestDir::new();
    FileTree::new().file("f", "data").create_in(&dir.join("work/src"));

    sync("src", "./out/../dst", options().cwd(dir.join("work")).build()).expect("sync");

    assert_eq!(dir.read("work/dst/f"), "data");
}

#[test]
fn mismatched_lists_are_rejected_before_any_write() {
    let dir = TestDir::new();
    FileTree::new().file("f", "1").create_in(&dir.join("src"));

    let error = sync(
        vec![dir.join("src")],
        vec![dir.join("t1"), dir.join("t2")],
        options().build(),
    )
    .unwrap_err();

    assert!(matches!(error, SyncError::MismatchedRoots { sources: 1, targets: 2 }));
    assert!(error.is_configuration_error());
    assert!(!dir.join("t1").exists());
}

#[test]
fn empty_lists_are_rejected() {
    let error = sync(Vec::<PathBuf>::new(), Vec::<PathBuf>::new(), options().build()).unwrap_err();
    assert!(matches!(error, SyncError::EmptyRoots));
}

#[test]
fn missing_source_is_reported_and_target_left_alone() {
    let dir = TestDir::new();

    let error = sync(dir.join("absent"), dir.join("dst"), options().build()).unwrap_err();

    assert!(matches!(error, SyncError::MissingSource { ref path } if *path == dir.join("absent")));
    assert!(!dir.join("dst").exists());
}

#[test]
fn file_source_is_not_a_directory() {
    let dir = TestDir::new();
    let file = dir.write("plain", "x");

    let error = sync(file, dir.join("dst"), options().build()).unwrap_err();
    assert!(matches!(error, SyncError::SourceNotDirectory { .. }));
}

#[test]
fn nested_sources_overlap() {
    let dir = TestDir::new();
    dir.mkdir("src/inner");

    let error = sync(
        [dir.join("src"), dir.join("src/inner")],
        [dir.join("t1"), dir.join("t2")],
        options().build(),
    )
    .unwrap_err();

    assert!(matches!(error, SyncError::OverlappingSources { .. }));
    assert!(!dir.join("t1").exists());
}

#[test]
fn sink_receives_validation_errors_and_nothing_is_written() {
    let dir = TestDir::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let options = options()
        .on_error(move |error| sink.lock().unwrap().push(error.is_configuration_error()))
        .build();

    let handle = sync(dir.join("absent"), dir.join("dst"), options).expect("sink swallows");

    assert!(handle.is_none());
    assert_eq!(*seen.lock().unwrap(), [true]);
    assert!(!dir.join("dst").exists());
}

#[test]
fn skipping_the_initial_pass_leaves_targets_untouched() {
    let dir = TestDir::new();
    FileTree::new().file("f", "1").create_in(&dir.join("src"));

    sync(
        dir.join("src"),
        dir.join("dst"),
        options().skip_initial_sync(true).build(),
    )
    .expect("sync");

    assert!(!dir.join("dst/f").exists());
}

#[test]
fn roots_from_pairs_are_validated_on_use() {
    let dir = TestDir::new();
    FileTree::new().file("f", "1").create_in(&dir.join("src"));
    let roots = SyncRoots::from_pairs([(dir.join("src"), dir.join("dst"))]);

    sync_roots(roots, options().build()).expect("sync");
    assert_eq!(dir.read("dst/f"), "1");

    let bad = SyncRoots::from_pairs([(dir.join("nope"), dir.join("dst"))]);
    assert!(matches!(
        sync_roots(bad, options().build()),
        Err(SyncError::MissingSource { .. })
    ));
}

#[test]
fn hardlink_mode_on_one_filesystem_is_accepted() {
    let dir = TestDir::new();
    FileTree::new().file("f", "1").create_in(&dir.join("src"));

    let roots = SyncRoots::resolve(
        dir.join("src"),
        dir.join("not/yet/created"),
        &options().mode(TransferMode::Hardlink).build(),
    )
    .expect("same device");
    assert_eq!(roots.len(), 1);
}

#[test]
fn watch_returns_a_live_handle() {
    let dir = TestDir::new();
    FileTree::new().file("f", "1").create_in(&dir.join("src"));

    let mut handle = sync(
        dir.join("src"),
        dir.join("dst"),
        options().watch(true).delete_orphaned(true).build(),
    )
    .expect("sync")
    .expect("watching");

    assert_eq!(dir.read("dst/f"), "1");
    assert!(handle.is_running());

    dir.write("src/later", "2");
    assert!(wait_until(Duration::from_secs(10), || dir.join("dst/later").exists()));

    handle.stop();
    assert!(!handle.is_running());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn async_entry_point_matches_the_blocking_one() {
    let dir = TestDir::new();
    let tree = FileTree::new().file("deep/er/file", "x");
    tree.create_in(&dir.join("src"));

    let handle = syncdir_core::sync_async(dir.join("src"), dir.join("dst"), options().build())
        .await
        .expect("sync");

    assert!(handle.is_none());
    assert_eq!(snapshot(&dir.join("dst")), tree.expected());
}
