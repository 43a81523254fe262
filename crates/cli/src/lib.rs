#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cli` is the command-line front-end of syncdir:
//! `syncdir [OPTIONS] <SOURCE> <TARGET>` mirrors one directory into another
//! through [`syncdir_core::sync`] and reports every applied operation.
//!
//! # Design
//!
//! [`run`] takes the arguments plus handles for standard output and error and
//! returns the exit code, so the binary stays a thin wrapper and tests can
//! drive the whole front-end in memory. A [`clap`](https://docs.rs/clap/)
//! command definition parses the flags.
//!
//! Events are forwarded from the sync callback over a channel and written by
//! the calling thread. In watch mode the calling thread keeps writing them
//! until standard input reaches end of file, then stops the watcher.
//!
//! # Invariants
//!
//! - `run` never panics; output failures surface as exit code `1`.
//! - With `--quiet` nothing is written to standard output.
//!
//! # Errors
//!
//! Usage errors exit with `2`, validation and sync errors with `1`. `--help`
//! and `--version` write to standard output and exit with `0`.
//!
//! # Examples
//!
//! ```
//! let mut stdout = Vec::new();
//! let mut stderr = Vec::new();
//! let exit_code = cli::run(["syncdir", "--version"], &mut stdout, &mut stderr);
//!
//! assert_eq!(exit_code, 0);
//! assert!(String::from_utf8(stdout).unwrap().starts_with("syncdir "));
//! assert!(stderr.is_empty());
//! ```

mod command;
mod summary;

use std::ffi::OsString;
use std::fmt::Display;
use std::io::{self, Write};
use std::thread;

use crossbeam_channel::{Receiver, select};
use logging::VerbosityConfig;
use syncdir_core::{SyncEvent, WatchHandle, sync};

use crate::command::{PROGRAM_NAME, ParsedArgs, parse_args};

/// Exit code for a completed run.
pub const EXIT_OK: i32 = 0;
/// Exit code for validation and sync failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for unusable command lines.
pub const EXIT_USAGE: i32 = 2;

/// Argument parsing entry points for tests.
pub mod test_utils {
    pub use crate::command::{ParsedArgs, parse_args};
}

/// Runs the CLI with `arguments` (program name first) and the given output
/// handles, returning the process exit code.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        Ok(parsed) => execute(&parsed, stdout, stderr),
        Err(error) => {
            use clap::error::ErrorKind;
            match error.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    if write!(stdout, "{}", error.render()).is_err() {
                        return EXIT_FAILURE;
                    }
                    EXIT_OK
                }
                _ => {
                    let _ = write!(stderr, "{}", error.render());
                    EXIT_USAGE
                }
            }
        }
    }
}

fn execute<Out, Err>(parsed: &ParsedArgs, stdout: &mut Out, stderr: &mut Err) -> i32
where
    Out: Write,
    Err: Write,
{
    logging::init_tracing(VerbosityConfig::from_verbose_level(parsed.verbose).quiet(parsed.quiet));

    let builder = match parsed.options() {
        Ok(builder) => builder,
        Err(error) => return report(stderr, &error),
    };
    let (sender, events) = crossbeam_channel::unbounded::<SyncEvent>();
    let options = builder
        .after_sync(move |event| {
            // The receiver only goes away once we are done printing.
            let _ = sender.send(event.clone());
            Ok(())
        })
        .build();

    let mut printer = Printer {
        out: stdout,
        quiet: parsed.quiet,
    };
    if !parsed.quiet && summary::write_header(&mut *printer.out, parsed).is_err() {
        return EXIT_FAILURE;
    }

    let handle = match sync(parsed.source.clone(), parsed.target.clone(), options) {
        Ok(handle) => handle,
        Err(error) => {
            let _ = printer.drain(&events);
            return report(stderr, &error);
        }
    };
    if printer.drain(&events).is_err() {
        return EXIT_FAILURE;
    }

    match handle {
        Some(handle) => watch_until_stdin_closes(handle, &events, &mut printer, stderr),
        None => EXIT_OK,
    }
}

fn watch_until_stdin_closes<Out, Err>(
    mut handle: WatchHandle,
    events: &Receiver<SyncEvent>,
    printer: &mut Printer<'_, Out>,
    stderr: &mut Err,
) -> i32
where
    Out: Write,
    Err: Write,
{
    let closed = match stdin_closed() {
        Ok(closed) => closed,
        Err(error) => return report(stderr, &error),
    };
    tracing::info!(target: logging::targets::WATCH, "watching; close stdin to stop");

    let mut status = EXIT_OK;
    loop {
        select! {
            recv(events) -> event => match event {
                Ok(event) => {
                    if printer.print(&event).is_err() {
                        status = EXIT_FAILURE;
                        break;
                    }
                }
                Err(_) => break,
            },
            recv(closed) -> _ => break,
        }
    }

    handle.stop();
    if printer.drain(events).is_err() {
        status = EXIT_FAILURE;
    }
    status
}

/// Signals once standard input reaches end of file.
fn stdin_closed() -> io::Result<Receiver<()>> {
    let (sender, receiver) = crossbeam_channel::bounded(1);
    thread::Builder::new()
        .name("syncdir-stdin".into())
        .spawn(move || {
            let _ = io::copy(&mut io::stdin().lock(), &mut io::sink());
            let _ = sender.send(());
        })?;
    Ok(receiver)
}

struct Printer<'a, W> {
    out: &'a mut W,
    quiet: bool,
}

impl<W: Write> Printer<'_, W> {
    fn print(&mut self, event: &SyncEvent) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        summary::write_event(&mut *self.out, event)?;
        self.out.flush()
    }

    fn drain(&mut self, events: &Receiver<SyncEvent>) -> io::Result<()> {
        for event in events.try_iter() {
            self.print(&event)?;
        }
        Ok(())
    }
}

fn report<Err: Write>(stderr: &mut Err, error: &dyn Display) -> i32 {
    let _ = writeln!(stderr, "{PROGRAM_NAME}: error: {error}");
    EXIT_FAILURE
}
