use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use logging::trace_watch;
use notify::RecommendedWatcher;

use super::dispatch::Message;
use crate::roots::SyncRoot;

/// A running watch session.
///
/// Dropping the handle stops the session. [`stop`](Self::stop) does the same
/// explicitly and may be called more than once.
pub struct WatchHandle {
    watcher: Option<RecommendedWatcher>,
    sender: Sender<Message>,
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    roots: Vec<SyncRoot>,
}

impl WatchHandle {
    pub(super) fn new(
        watcher: RecommendedWatcher,
        sender: Sender<Message>,
        stop: Arc<AtomicBool>,
        thread: JoinHandle<()>,
        roots: Vec<SyncRoot>,
    ) -> Self {
        Self {
            watcher: Some(watcher),
            sender,
            stop,
            thread: Some(thread),
            roots,
        }
    }

    /// Roots this session mirrors.
    #[must_use]
    pub fn roots(&self) -> &[SyncRoot] {
        &self.roots
    }

    /// Reports whether the dispatcher thread is still alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread
            .as_ref()
            .is_some_and(|thread| !thread.is_finished())
    }

    /// Unsubscribes from the backend and waits for the dispatcher thread.
    ///
    /// The change being applied when this is called completes; changes still
    /// queued behind it are dropped. Calling this from inside a callback
    /// stops the session without waiting for the thread.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        drop(self.watcher.take());
        self.stop.store(true, Ordering::Release);
        // The dispatcher may already be gone; the flag covers it either way.
        let _ = self.sender.send(Message::Stop);

        if thread.thread().id() == thread::current().id() {
            return;
        }
        if thread.join().is_err() {
            tracing::error!(target: logging::targets::WATCH, "watch dispatcher panicked");
        }
        trace_watch!(roots = self.roots.len(), "watch stopped");
    }

    /// Awaitable [`stop`](Self::stop) that keeps the joining off the runtime's
    /// worker threads.
    #[cfg(feature = "async")]
    pub async fn shutdown(mut self) {
        if let Err(error) = tokio::task::spawn_blocking(move || self.stop()).await {
            tracing::error!(target: logging::targets::WATCH, %error, "watch shutdown task failed");
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle")
            .field("roots", &self.roots)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}
