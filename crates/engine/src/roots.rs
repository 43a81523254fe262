use std::path::{Path, PathBuf};

/// A source directory and the target directory it is mirrored into.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct SyncRoot {
    source: PathBuf,
    target: PathBuf,
}

impl SyncRoot {
    /// Pairs `source` with `target`. No validation happens here.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Source directory.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Target directory.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of `absolute` relative to the source root, if it lies beneath it.
    #[must_use]
    pub fn relative_to_source<'a>(&self, absolute: &'a Path) -> Option<&'a Path> {
        absolute.strip_prefix(&self.source).ok()
    }

    /// Target path corresponding to `relative`.
    #[must_use]
    pub fn target_for(&self, relative: &Path) -> PathBuf {
        self.target.join(relative)
    }

    /// Source path corresponding to `relative`.
    #[must_use]
    pub fn source_for(&self, relative: &Path) -> PathBuf {
        self.source.join(relative)
    }
}

impl<P, Q> From<(P, Q)> for SyncRoot
where
    P: Into<PathBuf>,
    Q: Into<PathBuf>,
{
    fn from((source, target): (P, Q)) -> Self {
        Self::new(source, target)
    }
}
