//! Events reported to callers.

use std::fmt;
use std::path::{Path, PathBuf};

/// What happened to an entry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SyncEventKind {
    /// Copied during the initial reconciliation.
    InitCopy,
    /// Hardlinked during the initial reconciliation.
    InitHardlink,
    /// File created in a watched source.
    Add,
    /// Directory created in a watched source.
    AddDir,
    /// File modified in a watched source.
    Change,
    /// File removed from the target.
    Unlink,
    /// Directory removed from the target.
    UnlinkDir,
}

impl SyncEventKind {
    /// The wire name of the kind, e.g. `init:copy` or `unlinkDir`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitCopy => "init:copy",
            Self::InitHardlink => "init:hardlink",
            Self::Add => "add",
            Self::AddDir => "addDir",
            Self::Change => "change",
            Self::Unlink => "unlink",
            Self::UnlinkDir => "unlinkDir",
        }
    }

    /// Returns `true` for [`SyncEventKind::Unlink`] and [`SyncEventKind::UnlinkDir`].
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(self, Self::Unlink | Self::UnlinkDir)
    }
}

impl fmt::Display for SyncEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an entry is a file or a directory. Preserved symlinks are files.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    /// Regular file or symlink.
    File,
    /// Directory.
    Dir,
}

impl NodeKind {
    /// Returns `true` for [`NodeKind::Dir`].
    #[must_use]
    pub const fn is_dir(self) -> bool {
        matches!(self, Self::Dir)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Dir => "dir",
        })
    }
}

/// One applied operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SyncEvent {
    kind: SyncEventKind,
    node: NodeKind,
    relative_path: String,
    source: PathBuf,
    target: PathBuf,
}

impl SyncEvent {
    /// Creates an event. `relative_path` is `/`-separated without a trailing separator.
    #[must_use]
    pub fn new(
        kind: SyncEventKind,
        node: NodeKind,
        relative_path: impl Into<String>,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            kind,
            node,
            relative_path: relative_path.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Event kind.
    #[must_use]
    pub const fn kind(&self) -> SyncEventKind {
        self.kind
    }

    /// Node kind.
    #[must_use]
    pub const fn node(&self) -> NodeKind {
        self.node
    }

    /// Path relative to the roots, `/`-separated.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Absolute source path.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Absolute target path.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.relative_path)
    }
}

/// Kind of raw change reported by the notification backend.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChangeKind {
    /// A file appeared.
    Add,
    /// A directory appeared.
    AddDir,
    /// A file was modified.
    Change,
    /// A file disappeared.
    Unlink,
    /// A directory disappeared.
    UnlinkDir,
}

impl ChangeKind {
    /// Node kind the change applies to.
    #[must_use]
    pub const fn node(self) -> NodeKind {
        match self {
            Self::AddDir | Self::UnlinkDir => NodeKind::Dir,
            Self::Add | Self::Change | Self::Unlink => NodeKind::File,
        }
    }

    /// Returns `true` for removals.
    #[must_use]
    pub const fn is_removal(self) -> bool {
        matches!(self, Self::Unlink | Self::UnlinkDir)
    }
}

impl From<ChangeKind> for SyncEventKind {
    fn from(kind: ChangeKind) -> Self {
        match kind {
            ChangeKind::Add => Self::Add,
            ChangeKind::AddDir => Self::AddDir,
            ChangeKind::Change => Self::Change,
            ChangeKind::Unlink => Self::Unlink,
            ChangeKind::UnlinkDir => Self::UnlinkDir,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        SyncEventKind::from(*self).fmt(f)
    }
}

/// A change observed in a watched source root, before any rule is applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WatchEvent {
    kind: ChangeKind,
    path: PathBuf,
    source_root: PathBuf,
}

impl WatchEvent {
    pub(crate) fn new(kind: ChangeKind, path: PathBuf, source_root: PathBuf) -> Self {
        Self {
            kind,
            path,
            source_root,
        }
    }

    /// Change kind.
    #[must_use]
    pub const fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Absolute path of the changed entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source root the path belongs to.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }
}
