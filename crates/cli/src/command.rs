//! Command definition and argument parsing.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use filters::{FilterError, MatchSpec};
use syncdir_core::{SyncOptions, SyncOptionsBuilder, TransferMode};

/// Name used in usage lines and diagnostics.
pub(crate) const PROGRAM_NAME: &str = "syncdir";

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Keep a target directory in sync with a source directory.")
        .arg(
            Arg::new("source")
                .value_name("SOURCE")
                .help("Directory to mirror.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("target")
                .value_name("TARGET")
                .help("Directory receiving the mirror; created when missing.")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .short('w')
                .help("Keep mirroring changes after the initial sync until stdin closes.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Print nothing but errors.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("skip-initial-sync")
                .long("skip-initial-sync")
                .short('s')
                .help("Do not run the initial sync.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("delete-orphaned")
                .long("delete-orphaned")
                .short('d')
                .help("Delete target entries that have no counterpart in the source.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("symlink")
                .long("symlink")
                .help("Recreate symlinks as symlinks instead of copying what they point at.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("copy")
                .long("copy")
                .short('c')
                .help("Copy files (the default).")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("hardlink")
                .long("hardlink")
                .help("Hardlink files instead of copying them.")
                .action(ArgAction::SetTrue)
                .conflicts_with("copy"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('e')
                .value_name("PATTERN")
                .help("Skip paths containing PATTERN. May be repeated.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("exclude-glob")
                .long("exclude-glob")
                .value_name("GLOB")
                .help("Skip paths matching GLOB. May be repeated.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("force-sync")
                .long("force-sync")
                .value_name("PATTERN")
                .help("Always sync paths containing PATTERN, even when excluded. May be repeated.")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("nodeep")
                .long("nodeep")
                .short('n')
                .help("Only sync the direct children of SOURCE.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more; repeat for more detail.")
                .action(ArgAction::Count),
        )
}

/// Parsed command line.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// Source directory as given.
    pub source: PathBuf,
    /// Target directory as given.
    pub target: PathBuf,
    /// `--watch`.
    pub watch: bool,
    /// `--quiet`.
    pub quiet: bool,
    /// `--skip-initial-sync`.
    pub skip_initial_sync: bool,
    /// `--delete-orphaned`.
    pub delete_orphaned: bool,
    /// `--symlink`.
    pub symlink: bool,
    /// `--hardlink`.
    pub hardlink: bool,
    /// `--exclude` values, in order.
    pub excludes: Vec<String>,
    /// `--exclude-glob` values, in order.
    pub exclude_globs: Vec<String>,
    /// `--force-sync` values, in order.
    pub force_sync: Vec<String>,
    /// `--nodeep`.
    pub nodeep: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl ParsedArgs {
    /// Transfer mode selected by `--copy`/`--hardlink`.
    #[must_use]
    pub const fn mode(&self) -> TransferMode {
        if self.hardlink {
            TransferMode::Hardlink
        } else {
            TransferMode::Copy
        }
    }

    /// Session options described by the flags. Callbacks are left to the caller.
    pub fn options(&self) -> Result<SyncOptionsBuilder, FilterError> {
        let mut builder = SyncOptions::builder()
            .mode(self.mode())
            .watch(self.watch)
            .skip_initial_sync(self.skip_initial_sync)
            .delete_orphaned(self.delete_orphaned)
            .preserve_symlinks(self.symlink)
            .bounded_depth(self.nodeep);

        let mut excludes: Vec<MatchSpec> = self
            .excludes
            .iter()
            .map(|pattern| MatchSpec::literal(pattern.as_str()))
            .collect();
        for glob in &self.exclude_globs {
            excludes.push(MatchSpec::glob(glob)?);
        }
        if !excludes.is_empty() {
            builder = builder.exclude(MatchSpec::list(excludes));
        }
        if !self.force_sync.is_empty() {
            builder = builder.force_sync(MatchSpec::list(
                self.force_sync.iter().map(|pattern| MatchSpec::literal(pattern.as_str())),
            ));
        }
        Ok(builder)
    }
}

/// Parses command-line arguments, program name first.
pub fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;
    let strings = |matches: &mut clap::ArgMatches, id: &str| -> Vec<String> {
        matches
            .remove_many::<String>(id)
            .map(Iterator::collect)
            .unwrap_or_default()
    };

    Ok(ParsedArgs {
        source: matches.remove_one::<PathBuf>("source").unwrap_or_default(),
        target: matches.remove_one::<PathBuf>("target").unwrap_or_default(),
        watch: matches.get_flag("watch"),
        quiet: matches.get_flag("quiet"),
        skip_initial_sync: matches.get_flag("skip-initial-sync"),
        delete_orphaned: matches.get_flag("delete-orphaned"),
        symlink: matches.get_flag("symlink"),
        hardlink: matches.get_flag("hardlink"),
        excludes: strings(&mut matches, "exclude"),
        exclude_globs: strings(&mut matches, "exclude-glob"),
        force_sync: strings(&mut matches, "force-sync"),
        nodeep: matches.get_flag("nodeep"),
        verbose: matches.get_count("verbose"),
    })
}
