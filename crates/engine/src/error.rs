//! Error type and routing policy shared by the reconciler and the watcher.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use filters::FilterError;
use walk::WalkError;

/// Boxed error returned by caller-supplied callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by a sync session.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// No source or target directories were supplied.
    #[error("no source or target directories were given")]
    EmptyRoots,

    /// Source and target lists differ in length.
    #[error("{sources} source directories were given for {targets} target directories")]
    MismatchedRoots {
        /// Number of sources.
        sources: usize,
        /// Number of targets.
        targets: usize,
    },

    /// A relative path could not be resolved.
    #[error("cannot resolve relative path '{}' without a working directory", path.display())]
    RelativePath {
        /// The relative path as given.
        path: PathBuf,
    },

    /// A source root does not exist.
    #[error("source directory '{}' does not exist", path.display())]
    MissingSource {
        /// The missing source.
        path: PathBuf,
    },

    /// A source root exists but is not a directory.
    #[error("source '{}' is not a directory", path.display())]
    SourceNotDirectory {
        /// The offending source.
        path: PathBuf,
    },

    /// One source root contains another.
    #[error("source directories '{}' and '{}' overlap", first.display(), second.display())]
    OverlappingSources {
        /// The ancestor (or equal) root.
        first: PathBuf,
        /// The descendant root.
        second: PathBuf,
    },

    /// Hardlink mode was requested between different filesystems.
    #[error(
        "cannot hardlink from '{}' into '{}': they are on different filesystems",
        source_root.display(),
        target_root.display()
    )]
    CrossDevice {
        /// Source root.
        source_root: PathBuf,
        /// Target root.
        target_root: PathBuf,
    },

    /// Two source roots map distinct entries onto one target path.
    #[error(
        "'{}' would be written from both '{}' and '{}'",
        target.display(),
        first.display(),
        second.display()
    )]
    ConflictingTarget {
        /// The contested target path.
        target: PathBuf,
        /// Entry from the first source root.
        first: PathBuf,
        /// Entry from the second source root.
        second: PathBuf,
    },

    /// Listing a tree failed.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A match rule failed to compile.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A filesystem operation the session depends on failed.
    #[error("failed to {action} '{}': {source}", path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// A caller-supplied callback returned an error.
    #[error("callback failed while handling '{}': {source}", path.display())]
    Callback {
        /// Path whose event was being handled.
        path: PathBuf,
        /// Error returned by the callback.
        #[source]
        source: CallbackError,
    },

    /// The change-notification backend failed.
    #[error("filesystem watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

impl SyncError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn callback(path: &Path, source: CallbackError) -> Self {
        Self::Callback {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Reports whether the error was detected before any filesystem mutation.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyRoots
                | Self::MismatchedRoots { .. }
                | Self::RelativePath { .. }
                | Self::MissingSource { .. }
                | Self::SourceNotDirectory { .. }
                | Self::OverlappingSources { .. }
                | Self::CrossDevice { .. }
                | Self::Filter(_)
        )
    }
}

/// Callback receiving routed errors.
pub type ErrorCallback = Arc<dyn Fn(&SyncError) + Send + Sync>;

/// Where routed errors go.
#[derive(Clone, Default)]
pub enum ErrorPolicy {
    /// Abort and return the first error to the caller.
    #[default]
    Raise,
    /// Hand each error to the callback and continue with the next unit of work.
    Sink(ErrorCallback),
}

impl ErrorPolicy {
    /// Wraps a closure in [`ErrorPolicy::Sink`].
    #[must_use]
    pub fn sink<F>(callback: F) -> Self
    where
        F: Fn(&SyncError) + Send + Sync + 'static,
    {
        Self::Sink(Arc::new(callback))
    }

    /// Routes `error`: `Err` under [`ErrorPolicy::Raise`], `Ok` after the sink ran.
    pub fn route(&self, error: SyncError) -> Result<(), SyncError> {
        match self {
            Self::Raise => Err(error),
            Self::Sink(callback) => {
                callback(&error);
                Ok(())
            }
        }
    }
}

impl fmt::Debug for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raise => f.write_str("Raise"),
            Self::Sink(_) => f.write_str("Sink(..)"),
        }
    }
}
