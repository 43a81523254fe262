//! Change Watcher: keeps targets in step with their sources after the
//! initial pass.
//!
//! # Design
//!
//! One [`notify::RecommendedWatcher`] subscribes to every source root. Its
//! callback only forwards raw events into an unbounded channel. A single
//! dispatcher thread drains the channel in delivery order and handles each
//! change to completion before taking the next, so a slow after-sync callback
//! holds back the changes queued behind it.
//!
//! Each change is matched against the roots containing it, filtered through
//! the session's rules exactly as during reconciliation, then materialized
//! into or removed from the target.
//!
//! # Errors
//!
//! A failure while handling one change never stops the session. Under a sink
//! policy it is handed to the callback; under the default policy it is
//! logged at `error` under the `syncdir::watch` target.

mod dispatch;
mod handle;
mod translate;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;

use logging::trace_watch;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use self::dispatch::{Dispatcher, Message};
pub use self::handle::WatchHandle;
use crate::error::SyncError;
use crate::options::SyncOptions;
use crate::roots::SyncRoot;

/// Starts watching every source in `roots`.
///
/// The backend subscription is in place when this returns; changes made
/// afterwards are seen. No initial pass runs here.
pub fn start_watch(roots: Vec<SyncRoot>, options: SyncOptions) -> Result<WatchHandle, SyncError> {
    let (sender, receiver) = crossbeam_channel::unbounded();
    let forward = sender.clone();
    let mut watcher = RecommendedWatcher::new(
        move |result: notify::Result<notify::Event>| {
            let _ = forward.send(Message::Notify(result));
        },
        options.backend().to_notify_config(),
    )?;

    let mode = if options.bounded_depth() {
        RecursiveMode::NonRecursive
    } else {
        RecursiveMode::Recursive
    };
    for root in &roots {
        watcher.watch(root.source(), mode)?;
    }

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    let dispatcher = Dispatcher::new(roots.clone(), options);
    let thread = thread::Builder::new()
        .name("syncdir-watch".into())
        .spawn(move || dispatcher.run(&receiver, &flag))
        .map_err(|error| {
            let path = roots
                .first()
                .map_or_else(PathBuf::new, |root| root.source().to_path_buf());
            SyncError::io("start watch thread for", path, error)
        })?;

    trace_watch!(roots = roots.len(), ?mode, "watch started");
    Ok(WatchHandle::new(watcher, sender, stop, thread, roots))
}

#[cfg(test)]
mod tests;
