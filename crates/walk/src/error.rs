use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Error that ends a walk.
#[derive(Debug)]
pub struct WalkError {
    kind: WalkErrorKind,
}

/// What the walker was doing when it failed.
#[derive(Debug)]
pub enum WalkErrorKind {
    /// Inspecting the walk root.
    RootMetadata {
        /// Root path.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Opening a directory for reading.
    ReadDir {
        /// Directory being read.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Pulling the next entry out of an open directory.
    ReadDirEntry {
        /// Directory being read.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Inspecting an entry.
    Metadata {
        /// Entry path.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
    /// Resolving a directory for cycle detection.
    Canonicalize {
        /// Directory path.
        path: PathBuf,
        /// Underlying failure.
        source: io::Error,
    },
}

impl WalkError {
    pub(crate) const fn new(kind: WalkErrorKind) -> Self {
        Self { kind }
    }

    pub(crate) const fn root_metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::RootMetadata { path, source })
    }

    pub(crate) const fn read_dir(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDir { path, source })
    }

    pub(crate) const fn read_dir_entry(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::ReadDirEntry { path, source })
    }

    pub(crate) const fn metadata(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Metadata { path, source })
    }

    pub(crate) const fn canonicalize(path: PathBuf, source: io::Error) -> Self {
        Self::new(WalkErrorKind::Canonicalize { path, source })
    }

    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> &WalkErrorKind {
        &self.kind
    }

    /// Returns the path the failure is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.kind.path()
    }

    /// Returns the underlying I/O error.
    #[must_use]
    pub fn io_error(&self) -> &io::Error {
        self.kind.io_error()
    }
}

impl WalkErrorKind {
    /// Returns the path the failure is about.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::RootMetadata { path, .. }
            | Self::ReadDir { path, .. }
            | Self::ReadDirEntry { path, .. }
            | Self::Metadata { path, .. }
            | Self::Canonicalize { path, .. } => path,
        }
    }

    fn io_error(&self) -> &io::Error {
        match self {
            Self::RootMetadata { source, .. }
            | Self::ReadDir { source, .. }
            | Self::ReadDirEntry { source, .. }
            | Self::Metadata { source, .. }
            | Self::Canonicalize { source, .. } => source,
        }
    }

    const fn action(&self) -> &'static str {
        match self {
            Self::RootMetadata { .. } => "inspect walk root",
            Self::ReadDir { .. } => "read directory",
            Self::ReadDirEntry { .. } => "read entry in",
            Self::Metadata { .. } => "inspect",
            Self::Canonicalize { .. } => "resolve",
        }
    }
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to {} '{}': {}",
            self.kind.action(),
            self.path().display(),
            self.io_error()
        )
    }
}

impl Error for WalkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.kind.io_error())
    }
}
