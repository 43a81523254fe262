use super::*;
use crate::event::{SyncEvent, SyncEventKind};
use crate::link::LinkRegistry;
use crate::options::{SyncOptions, SyncOptionsBuilder, TransferMode};
use crate::roots::SyncRoot;
use crate::SyncError;
use std::sync::{Arc, Mutex};
use test_support::{FileTree, Node, TestDir, snapshot};

fn recorder(builder: SyncOptionsBuilder) -> (SyncOptions, Arc<Mutex<Vec<SyncEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let options = builder
        .link_registry(LinkRegistry::new())
        .after_sync(move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        })
        .build();
    (options, events)
}

fn single(dir: &TestDir) -> Vec<SyncRoot> {
    vec![SyncRoot::new(dir.join("src"), dir.join("dst"))]
}

#[test]
fn copies_a_nested_tree_into_an_empty_target() {
    let dir = TestDir::new();
    let tree = FileTree::new().file("a/x", "1").file("b/y", "2");
    tree.create_in(&dir.join("src"));
    let (options, events) = recorder(SyncOptions::builder().delete_orphaned(true));

    let report = reconcile(&single(&dir), &options).expect("reconcile");

    assert_eq!(snapshot(&dir.join("dst")), tree.expected());
    assert_eq!(report.applied, 4);
    assert_eq!(report.removed, 0);
    let events = events.lock().unwrap();
    assert!(events.iter().all(|e| e.kind() == SyncEventKind::InitCopy));
    assert_eq!(events[0].relative_path(), "a");
    assert_eq!(events[1].relative_path(), "a/x");
}

#[test]
fn orphans_are_removed_only_when_asked() {
    for delete in [true, false] {
        let dir = TestDir::new();
        FileTree::new().file("x", "1").create_in(&dir.join("src"));
        FileTree::new()
            .file("x", "1")
            .file("stale", "z")
            .create_in(&dir.join("dst"));
        let (options, events) = recorder(SyncOptions::builder().delete_orphaned(delete));

        reconcile(&single(&dir), &options).expect("reconcile");

        let expected = if delete {
            FileTree::new().file("x", "1")
        } else {
            FileTree::new().file("x", "1").file("stale", "z")
        };
        assert_eq!(snapshot(&dir.join("dst")), expected.expected());
        let unlinks = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind() == SyncEventKind::Unlink)
            .count();
        assert_eq!(unlinks, usize::from(delete));
    }
}

#[test]
fn excluded_entries_never_reach_the_target() {
    let dir = TestDir::new();
    FileTree::new()
        .file("keep.bin", [0_u8, 159, 146, 150])
        .file("ignore.tmp", "t")
        .create_in(&dir.join("src"));
    let (options, _) = recorder(SyncOptions::builder().exclude("tmp").delete_orphaned(true));

    reconcile(&single(&dir), &options).expect("reconcile");

    let expected = FileTree::new().file("keep.bin", [0_u8, 159, 146, 150]);
    assert_eq!(snapshot(&dir.join("dst")), expected.expected());
}

#[test]
fn forced_file_inside_excluded_directory_is_synced_with_its_parent() {
    let dir = TestDir::new();
    FileTree::new()
        .file("1.txt", "1")
        .file("dir1/2.txt", "2")
        .file("dir1/3.txt", "3")
        .create_in(&dir.join("src"));
    let (options, _) = recorder(
        SyncOptions::builder()
            .exclude("dir1")
            .force_sync("3")
            .delete_orphaned(true),
    );

    reconcile(&single(&dir), &options).expect("reconcile");
    reconcile(&single(&dir), &options).expect("second pass keeps the parent");

    let expected = FileTree::new().file("1.txt", "1").file("dir1/3.txt", "3");
    assert_eq!(snapshot(&dir.join("dst")), expected.expected());
}

#[test]
fn second_pass_is_a_no_op() {
    let dir = TestDir::new();
    let tree = FileTree::new().file("a/b/c", "deep").file("top", "t").dir("empty");
    tree.create_in(&dir.join("src"));
    FileTree::new().file("junk/old", "x").create_in(&dir.join("dst"));
    let (options, _) = recorder(SyncOptions::builder().delete_orphaned(true));

    reconcile(&single(&dir), &options).expect("first");
    let first = snapshot(&dir.join("dst"));
    let report = reconcile(&single(&dir), &options).expect("second");

    assert_eq!(first, tree.expected());
    assert_eq!(snapshot(&dir.join("dst")), first);
    assert_eq!(report.removed, 0);
}

#[test]
fn converges_from_an_arbitrary_target() {
    let dir = TestDir::new();
    let tree = FileTree::new().file("a", "new").file("d/f", "f");
    tree.create_in(&dir.join("src"));
    FileTree::new()
        .dir("a")
        .file("a/inside", "x")
        .file("d", "file where a dir belongs")
        .file("zzz/orphan", "o")
        .create_in(&dir.join("dst"));
    let (options, _) = recorder(SyncOptions::builder().delete_orphaned(true));

    reconcile(&single(&dir), &options).expect("reconcile");

    assert_eq!(snapshot(&dir.join("dst")), tree.expected());
}

#[test]
fn missing_target_root_is_created() {
    let dir = TestDir::new();
    FileTree::new().create_in(&dir.join("src"));
    let roots = vec![SyncRoot::new(dir.join("src"), dir.join("deep/new/dst"))];
    let (options, _) = recorder(SyncOptions::builder());

    reconcile(&roots, &options).expect("reconcile");
    assert!(dir.join("deep/new/dst").is_dir());
}

#[test]
fn bounded_depth_touches_direct_children_only() {
    let dir = TestDir::new();
    FileTree::new()
        .file("top", "t")
        .file("sub/inner", "i")
        .create_in(&dir.join("src"));
    let (options, _) = recorder(SyncOptions::builder().bounded_depth(true));

    reconcile(&single(&dir), &options).expect("reconcile");

    let expected = FileTree::new().file("top", "t").dir("sub");
    assert_eq!(snapshot(&dir.join("dst")), expected.expected());
}

#[test]
fn merged_sources_share_a_target_without_deleting_each_other() {
    let dir = TestDir::new();
    FileTree::new().file("shared/a", "a").create_in(&dir.join("one"));
    FileTree::new().file("shared/b", "b").create_in(&dir.join("two"));
    let roots = vec![
        SyncRoot::new(dir.join("one"), dir.join("dst")),
        SyncRoot::new(dir.join("two"), dir.join("dst")),
    ];
    let (options, _) = recorder(SyncOptions::builder().delete_orphaned(true));

    reconcile(&roots, &options).expect("reconcile");
    reconcile(&roots, &options).expect("repeat");

    let expected = FileTree::new().file("shared/a", "a").file("shared/b", "b");
    assert_eq!(snapshot(&dir.join("dst")), expected.expected());
}

#[test]
fn nested_target_survives_orphan_deletion_in_either_order() {
    for nested_first in [true, false] {
        let dir = TestDir::new();
        FileTree::new().file("a", "1").create_in(&dir.join("src1"));
        FileTree::new().file("b", "2").create_in(&dir.join("src2"));
        let outer = SyncRoot::new(dir.join("src1"), dir.join("dst"));
        let nested = SyncRoot::new(dir.join("src2"), dir.join("dst/sub"));
        let roots = if nested_first {
            vec![nested, outer]
        } else {
            vec![outer, nested]
        };
        let (options, events) = recorder(SyncOptions::builder().delete_orphaned(true));

        reconcile(&roots, &options).expect("reconcile");
        reconcile(&roots, &options).expect("repeat");

        let expected = FileTree::new().file("a", "1").file("sub/b", "2");
        assert_eq!(snapshot(&dir.join("dst")), expected.expected(), "nested first: {nested_first}");
        assert!(
            events.lock().unwrap().iter().all(|e| !e.kind().is_removal()),
            "nested first: {nested_first}"
        );
    }
}

#[test]
fn nested_target_still_prunes_its_own_orphans() {
    let dir = TestDir::new();
    FileTree::new().file("a", "1").create_in(&dir.join("src1"));
    FileTree::new().file("b", "2").create_in(&dir.join("src2"));
    dir.write("dst/sub/stale", "z");
    dir.write("dst/old", "z");
    let roots = vec![
        SyncRoot::new(dir.join("src1"), dir.join("dst")),
        SyncRoot::new(dir.join("src2"), dir.join("dst/sub")),
    ];
    let (options, events) = recorder(SyncOptions::builder().delete_orphaned(true));

    let report = reconcile(&roots, &options).expect("reconcile");

    let expected = FileTree::new().file("a", "1").file("sub/b", "2");
    assert_eq!(snapshot(&dir.join("dst")), expected.expected());
    assert_eq!(report.removed, 2);
    let removed: Vec<String> = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.kind().is_removal())
        .map(|e| e.relative_path().to_owned())
        .collect();
    assert_eq!(removed, ["old", "sub/stale"]);
}

#[test]
fn file_in_outer_source_conflicts_with_nested_target() {
    let dir = TestDir::new();
    FileTree::new().file("sub", "file").create_in(&dir.join("src1"));
    FileTree::new().file("b", "2").create_in(&dir.join("src2"));
    let roots = vec![
        SyncRoot::new(dir.join("src2"), dir.join("dst/sub")),
        SyncRoot::new(dir.join("src1"), dir.join("dst")),
    ];
    let (options, events) = recorder(SyncOptions::builder());

    let error = reconcile(&roots, &options).unwrap_err();

    assert!(matches!(error, SyncError::ConflictingTarget { ref target, .. } if *target == dir.join("dst/sub")));
    assert!(!dir.join("dst/sub/b").exists());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn conflicting_files_abort_the_group_without_writing() {
    let dir = TestDir::new();
    FileTree::new().file("same", "one").create_in(&dir.join("one"));
    FileTree::new().file("same", "two").create_in(&dir.join("two"));
    let roots = vec![
        SyncRoot::new(dir.join("one"), dir.join("dst")),
        SyncRoot::new(dir.join("two"), dir.join("dst")),
    ];
    let (options, events) = recorder(SyncOptions::builder());

    let error = reconcile(&roots, &options).unwrap_err();

    assert!(matches!(error, SyncError::ConflictingTarget { ref target, .. } if *target == dir.join("dst/same")));
    assert!(!dir.join("dst/same").exists());
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn sink_policy_continues_with_the_next_group() {
    let dir = TestDir::new();
    FileTree::new().file("same", "one").create_in(&dir.join("one"));
    FileTree::new().file("same", "two").create_in(&dir.join("two"));
    FileTree::new().file("ok", "fine").create_in(&dir.join("three"));
    let roots = vec![
        SyncRoot::new(dir.join("one"), dir.join("dst")),
        SyncRoot::new(dir.join("two"), dir.join("dst")),
        SyncRoot::new(dir.join("three"), dir.join("other")),
    ];
    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let options = SyncOptions::builder()
        .link_registry(LinkRegistry::new())
        .on_error(move |error| sink.lock().unwrap().push(error.to_string()))
        .build();

    let report = reconcile(&roots, &options).expect("sink swallows");

    assert_eq!(report.failed_groups, 1);
    assert_eq!(errors.lock().unwrap().len(), 1);
    assert_eq!(dir.read("other/ok"), "fine");
}

#[test]
fn callback_error_is_raised_by_default() {
    let dir = TestDir::new();
    FileTree::new().file("x", "1").create_in(&dir.join("src"));
    let options = SyncOptions::builder()
        .link_registry(LinkRegistry::new())
        .after_sync(|_| Err("stop".into()))
        .build();

    let error = reconcile(&single(&dir), &options).unwrap_err();
    assert!(matches!(error, SyncError::Callback { .. }));
}

#[test]
fn hardlink_pass_reports_hardlink_events() {
    let dir = TestDir::new();
    FileTree::new().file("x", "1").create_in(&dir.join("src"));
    let (options, events) = recorder(SyncOptions::builder().mode(TransferMode::Hardlink));

    reconcile(&single(&dir), &options).expect("reconcile");

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), SyncEventKind::InitHardlink);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use test_support::inode;

    #[test]
    fn hardlink_identity_follows_source_replacement() {
        let dir = TestDir::new();
        FileTree::new().file("x", "v1").create_in(&dir.join("src"));
        let (options, _) = recorder(SyncOptions::builder().mode(TransferMode::Hardlink));

        reconcile(&single(&dir), &options).expect("first");
        assert_eq!(inode(&dir.join("src/x")), inode(&dir.join("dst/x")));

        fs::write(dir.join("src/x.new"), "v2").expect("write");
        fs::rename(dir.join("src/x.new"), dir.join("src/x")).expect("rename");
        reconcile(&single(&dir), &options).expect("second");

        assert_eq!(inode(&dir.join("src/x")), inode(&dir.join("dst/x")));
        assert_eq!(dir.read("dst/x"), "v2");
    }

    #[test]
    fn copy_mode_keeps_inodes_apart() {
        let dir = TestDir::new();
        FileTree::new().file("x", "v1").create_in(&dir.join("src"));
        let (options, _) = recorder(SyncOptions::builder());

        reconcile(&single(&dir), &options).expect("reconcile");
        assert_ne!(inode(&dir.join("src/x")), inode(&dir.join("dst/x")));
    }

    #[test]
    fn preserved_symlinks_are_mirrored_as_links() {
        let dir = TestDir::new();
        FileTree::new().file("real/f", "data").create_in(&dir.join("src"));
        symlink("real", dir.join("src/alias")).expect("symlink");
        let (options, _) = recorder(
            SyncOptions::builder()
                .preserve_symlinks(true)
                .delete_orphaned(true),
        );

        reconcile(&single(&dir), &options).expect("reconcile");
        reconcile(&single(&dir), &options).expect("repeat");

        let snap = snapshot(&dir.join("dst"));
        assert_eq!(snap.get("alias"), Some(&Node::Symlink("real".into())));
        assert_eq!(snap.get("real/f"), Some(&Node::file("data")));
        assert!(options.registry().contains(&dir.join("src/alias")));
    }

    #[test]
    fn orphans_beneath_a_registered_symlink_are_kept() {
        let dir = TestDir::new();
        FileTree::new().file("real/f", "data").create_in(&dir.join("src"));
        symlink("real", dir.join("src/alias")).expect("symlink");
        dir.write("dst/alias/extra", "kept");
        dir.write("dst/stale", "gone");
        let (options, events) = recorder(SyncOptions::builder().delete_orphaned(true));
        options.registry().register(dir.join("src/alias"));

        let report = reconcile(&single(&dir), &options).expect("reconcile");

        assert_eq!(dir.read("dst/alias/extra"), "kept");
        assert_eq!(dir.read("dst/alias/f"), "data");
        assert!(!dir.join("dst/stale").exists());
        assert_eq!(report.removed, 1);
        let removed: Vec<String> = events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind().is_removal())
            .map(|e| e.relative_path().to_owned())
            .collect();
        assert_eq!(removed, ["stale"]);
    }

    #[test]
    fn symlinks_are_resolved_by_default() {
        let dir = TestDir::new();
        FileTree::new().file("real/f", "data").create_in(&dir.join("src"));
        symlink("real", dir.join("src/alias")).expect("symlink");
        let (options, _) = recorder(SyncOptions::builder());

        reconcile(&single(&dir), &options).expect("reconcile");

        let snap = snapshot(&dir.join("dst"));
        assert_eq!(snap.get("alias"), Some(&Node::Dir));
        assert_eq!(snap.get("alias/f"), Some(&Node::file("data")));
    }
}
