//! Tests for flag defaults and how parsed flags map onto sync options.

use cli::test_utils::{ParsedArgs, parse_args};
use syncdir_core::TransferMode;

#[test]
fn test_all_switches_default_off() {
    let parsed = parse_args(["syncdir", "src", "dest"]).expect("parse");
    assert_eq!(
        parsed,
        ParsedArgs {
            source: "src".into(),
            target: "dest".into(),
            ..ParsedArgs::default()
        }
    );
}

#[test]
fn test_long_switches_set_their_fields() {
    let parsed = parse_args([
        "syncdir",
        "--watch",
        "--quiet",
        "--skip-initial-sync",
        "--delete-orphaned",
        "--symlink",
        "--nodeep",
        "src",
        "dest",
    ])
    .expect("parse");

    assert!(parsed.watch);
    assert!(parsed.quiet);
    assert!(parsed.skip_initial_sync);
    assert!(parsed.delete_orphaned);
    assert!(parsed.symlink);
    assert!(parsed.nodeep);
}

#[test]
fn test_options_follow_the_flags() {
    let parsed = parse_args(["syncdir", "-w", "-d", "--symlink", "-n", "--hardlink", "s", "t"])
        .expect("parse");
    let options = parsed.options().expect("options").build();

    assert!(options.watch());
    assert!(options.delete_orphaned());
    assert!(options.preserve_symlinks());
    assert!(options.bounded_depth());
    assert_eq!(options.mode(), TransferMode::Hardlink);
}

#[test]
fn test_force_sync_overrides_exclude() {
    let parsed = parse_args([
        "syncdir",
        "--exclude",
        "build",
        "--force-sync",
        "build/keep",
        "s",
        "t",
    ])
    .expect("parse");
    let options = parsed.options().expect("options").build();
    let rules = options.rules();

    assert!(!rules.verdict("build/out.o").is_synced());
    assert!(rules.verdict("build/keep.txt").is_synced());
    assert!(rules.verdict("src/main.rs").is_synced());
}

#[test]
fn test_verbose_counts_repeats() {
    let parsed = parse_args(["syncdir", "-v", "--verbose", "-v", "s", "t"]).expect("parse");
    assert_eq!(parsed.verbose, 3);
}
