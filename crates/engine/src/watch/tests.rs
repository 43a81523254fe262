use super::*;
use crate::event::{ChangeKind, SyncEvent, SyncEventKind, WatchEvent};
use crate::link::LinkRegistry;
use crate::options::SyncOptionsBuilder;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use test_support::{TestDir, wait_until};

const DEADLINE: Duration = Duration::from_secs(10);

type Events = Arc<Mutex<Vec<SyncEvent>>>;

fn start(dir: &TestDir, builder: SyncOptionsBuilder) -> (WatchHandle, Events) {
    dir.mkdir("src");
    dir.mkdir("dst");
    let events: Events = Arc::default();
    let sink = Arc::clone(&events);
    let options = builder
        .link_registry(LinkRegistry::new())
        .after_sync(move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        })
        .build();
    let roots = vec![SyncRoot::new(dir.join("src"), dir.join("dst"))];
    let handle = start_watch(roots, options).expect("start watch");
    (handle, events)
}

fn count(events: &Events, kind: SyncEventKind, path: &str) -> usize {
    events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.kind() == kind && e.relative_path() == path)
        .count()
}

fn has_content(path: &Path, expected: &str) -> bool {
    fs::read_to_string(path).is_ok_and(|content| content == expected)
}

#[test]
fn add_change_and_unlink_are_mirrored() {
    let dir = TestDir::new();
    let (mut handle, events) = start(&dir, SyncOptions::builder().delete_orphaned(true));
    assert!(handle.is_running());

    dir.write("src/x.txt", "one");
    assert!(wait_until(DEADLINE, || has_content(&dir.join("dst/x.txt"), "one")));
    assert!(wait_until(DEADLINE, || count(&events, SyncEventKind::Add, "x.txt") == 1));

    dir.write("src/x.txt", "two");
    assert!(wait_until(DEADLINE, || has_content(&dir.join("dst/x.txt"), "two")));
    assert!(wait_until(DEADLINE, || count(&events, SyncEventKind::Change, "x.txt") >= 1));

    fs::remove_file(dir.join("src/x.txt")).expect("remove");
    assert!(wait_until(DEADLINE, || !dir.join("dst/x.txt").exists()));
    assert!(wait_until(DEADLINE, || count(&events, SyncEventKind::Unlink, "x.txt") == 1));

    handle.stop();
    assert!(!handle.is_running());
    assert_eq!(count(&events, SyncEventKind::Add, "x.txt"), 1);
}

#[test]
fn removals_are_not_mirrored_without_orphan_deletion() {
    let dir = TestDir::new();
    let (_handle, events) = start(&dir, SyncOptions::builder());

    dir.write("src/keep", "k");
    assert!(wait_until(DEADLINE, || dir.join("dst/keep").exists()));
    fs::remove_file(dir.join("src/keep")).expect("remove");
    dir.write("src/marker", "m");
    assert!(wait_until(DEADLINE, || dir.join("dst/marker").exists()));

    assert_eq!(dir.read("dst/keep"), "k");
    assert_eq!(count(&events, SyncEventKind::Unlink, "keep"), 0);
}

#[test]
fn excluded_changes_are_dropped_but_observed() {
    let dir = TestDir::new();
    let observed = Arc::new(Mutex::new(Vec::<WatchEvent>::new()));
    let sink = Arc::clone(&observed);
    let builder = SyncOptions::builder()
        .exclude("tmp")
        .on_watch_event(move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });
    let (_handle, events) = start(&dir, builder);

    dir.write("src/scratch.tmp", "t");
    dir.write("src/real.txt", "r");
    assert!(wait_until(DEADLINE, || dir.join("dst/real.txt").exists()));

    assert!(!dir.join("dst/scratch.tmp").exists());
    assert!(events
        .lock()
        .unwrap()
        .iter()
        .all(|e| e.relative_path() != "scratch.tmp"));
    let observed = observed.lock().unwrap();
    let scratch = observed
        .iter()
        .find(|e| e.path().ends_with("scratch.tmp"))
        .expect("excluded change still observed");
    assert_eq!(scratch.kind(), ChangeKind::Add);
    assert_eq!(scratch.source_root(), dir.join("src"));
}

#[test]
fn new_directory_is_filled_with_its_contents() {
    let dir = TestDir::new();
    let (_handle, events) = start(&dir, SyncOptions::builder());

    dir.write("src/fresh/a/b/deep.txt", "deep");
    assert!(wait_until(DEADLINE, || has_content(
        &dir.join("dst/fresh/a/b/deep.txt"),
        "deep"
    )));
    assert!(wait_until(DEADLINE, || count(&events, SyncEventKind::AddDir, "fresh") >= 1));
}

#[test]
fn bounded_depth_ignores_nested_changes() {
    let dir = TestDir::new();
    dir.mkdir("src/sub");
    let (_handle, _events) = start(&dir, SyncOptions::builder().bounded_depth(true));

    dir.write("src/sub/nested", "n");
    dir.write("src/top", "t");
    assert!(wait_until(DEADLINE, || dir.join("dst/top").exists()));
    assert!(!dir.join("dst/sub/nested").exists());
}

#[test]
fn sink_keeps_the_watcher_alive_after_a_callback_error() {
    let dir = TestDir::new();
    dir.mkdir("src");
    dir.mkdir("dst");
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let options = SyncOptions::builder()
        .link_registry(LinkRegistry::new())
        .after_sync(|event| {
            if event.relative_path() == "bad" {
                return Err("rejected".into());
            }
            Ok(())
        })
        .on_error(move |error| sink.lock().unwrap().push(error.to_string()))
        .build();
    let roots = vec![SyncRoot::new(dir.join("src"), dir.join("dst"))];
    let handle = start_watch(roots, options).expect("start watch");

    dir.write("src/bad", "1");
    assert!(wait_until(DEADLINE, || !errors.lock().unwrap().is_empty()));
    dir.write("src/good", "2");
    assert!(wait_until(DEADLINE, || dir.join("dst/good").exists()));
    assert!(handle.is_running());
}

#[test]
fn stopped_session_mirrors_nothing() {
    let dir = TestDir::new();
    let (mut handle, _events) = start(&dir, SyncOptions::builder());
    assert_eq!(handle.roots().len(), 1);

    handle.stop();
    handle.stop();
    assert!(!handle.is_running());

    dir.write("src/late", "l");
    assert!(!wait_until(Duration::from_millis(500), || dir
        .join("dst/late")
        .exists()));
}

#[test]
fn missing_source_fails_to_start() {
    let dir = TestDir::new();
    let roots = vec![SyncRoot::new(dir.join("absent"), dir.join("dst"))];
    let error = start_watch(roots, SyncOptions::default()).unwrap_err();
    assert!(matches!(error, SyncError::Watch(_)));
}

#[cfg(unix)]
#[test]
fn hardlink_mode_links_new_files() {
    use crate::options::TransferMode;
    use test_support::inode;

    let dir = TestDir::new();
    let (_handle, _events) = start(&dir, SyncOptions::builder().mode(TransferMode::Hardlink));

    let source = dir.write("src/linked", "data");
    let target = dir.join("dst/linked");
    assert!(wait_until(DEADLINE, || target.exists()
        && inode(&target) == inode(&source)));
}

#[cfg(feature = "async")]
#[test]
fn shutdown_joins_the_dispatcher() {
    let dir = TestDir::new();
    let (handle, _events) = start(&dir, SyncOptions::builder());
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    runtime.block_on(handle.shutdown());
}
