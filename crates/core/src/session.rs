use engine::{SyncError, SyncOptions, WatchHandle, reconcile, start_watch};
use tracing::instrument;

use crate::input::PathList;
use crate::roots::SyncRoots;

/// Mirrors each source into the target at the same position.
///
/// Validates the inputs, runs the initial reconciliation unless
/// [`SyncOptions::skip_initial_sync`] is set, then starts watching when
/// [`SyncOptions::watch`] is set and returns the live handle.
///
/// # Errors
///
/// Every error goes through the session's error policy first. Under the
/// default policy it is returned here; under a sink the call returns
/// `Ok(None)` after a validation failure, and carries on with the remaining
/// work otherwise. Validation failures never touch the filesystem.
#[instrument(skip_all)]
pub fn sync(
    sources: impl Into<PathList>,
    targets: impl Into<PathList>,
    options: SyncOptions,
) -> Result<Option<WatchHandle>, SyncError> {
    match SyncRoots::resolve(sources, targets, &options) {
        Ok(roots) => run(roots, options),
        Err(error) => options.route_error(error).map(|()| None),
    }
}

/// Like [`sync`], for roots assembled with [`SyncRoots::from_pairs`].
#[instrument(skip_all, fields(roots = roots.len()))]
pub fn sync_roots(
    roots: SyncRoots,
    options: SyncOptions,
) -> Result<Option<WatchHandle>, SyncError> {
    match roots.validate(&options) {
        Ok(roots) => run(roots, options),
        Err(error) => options.route_error(error).map(|()| None),
    }
}

fn run(roots: SyncRoots, options: SyncOptions) -> Result<Option<WatchHandle>, SyncError> {
    if options.skip_initial_sync() {
        tracing::debug!(roots = roots.len(), "initial sync skipped");
    } else {
        let report = reconcile(roots.as_slice(), &options)?;
        tracing::info!(
            applied = report.applied,
            removed = report.removed,
            failed_groups = report.failed_groups,
            "initial sync finished"
        );
    }

    if !options.watch() {
        return Ok(None);
    }
    match start_watch(roots.into_vec(), options.clone()) {
        Ok(handle) => Ok(Some(handle)),
        Err(error) => options.route_error(error).map(|()| None),
    }
}

/// Awaitable [`sync`]. The blocking work runs on tokio's blocking pool.
///
/// # Panics
///
/// Resumes the panic of the blocking task, if it panicked.
#[cfg(feature = "async")]
pub async fn sync_async(
    sources: impl Into<PathList>,
    targets: impl Into<PathList>,
    options: SyncOptions,
) -> Result<Option<WatchHandle>, SyncError> {
    let sources = sources.into();
    let targets = targets.into();
    match tokio::task::spawn_blocking(move || sync(sources, targets, options)).await {
        Ok(result) => result,
        Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
        Err(error) => Err(SyncError::Io {
            action: "run sync task for",
            path: std::path::PathBuf::new(),
            source: std::io::Error::other(error),
        }),
    }
}
