use std::env;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use engine::{SyncError, SyncOptions, SyncRoot, TransferMode};

use crate::input::PathList;

/// Validated source/target pairs ready for a session.
///
/// [`SyncRoots::resolve`] and [`SyncRoots::validate`] are the only ways to
/// obtain roots that passed validation; [`SyncRoots::from_pairs`] accepts
/// anything and leaves checking to [`sync_roots`](crate::sync_roots).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyncRoots {
    roots: Vec<SyncRoot>,
}

impl SyncRoots {
    /// Wraps `pairs` without checking them.
    pub fn from_pairs<I, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<SyncRoot>,
    {
        Self {
            roots: pairs.into_iter().map(Into::into).collect(),
        }
    }

    /// Pairs the i-th source with the i-th target and validates the result.
    ///
    /// # Errors
    ///
    /// - [`SyncError::EmptyRoots`] when either list is empty.
    /// - [`SyncError::MismatchedRoots`] when the lists differ in length.
    /// - Anything [`validate`](Self::validate) reports.
    pub fn resolve(
        sources: impl Into<PathList>,
        targets: impl Into<PathList>,
        options: &SyncOptions,
    ) -> Result<Self, SyncError> {
        let sources = sources.into();
        let targets = targets.into();
        if sources.is_empty() || targets.is_empty() {
            return Err(SyncError::EmptyRoots);
        }
        if sources.len() != targets.len() {
            return Err(SyncError::MismatchedRoots {
                sources: sources.len(),
                targets: targets.len(),
            });
        }
        Self::from_pairs(sources.into_iter().zip(targets)).validate(options)
    }

    /// Makes every path absolute and checks the roots can be synced.
    ///
    /// Relative paths are resolved against [`SyncOptions::cwd`] when set and
    /// the process working directory otherwise. Nothing on disk is modified.
    ///
    /// # Errors
    ///
    /// - [`SyncError::EmptyRoots`] when there is no pair.
    /// - [`SyncError::RelativePath`] when a relative path has nothing to be
    ///   resolved against.
    /// - [`SyncError::MissingSource`] / [`SyncError::SourceNotDirectory`] for a
    ///   source that is absent or not a directory.
    /// - [`SyncError::OverlappingSources`] when one source contains another.
    /// - [`SyncError::CrossDevice`] in hardlink mode when a target lives on
    ///   another filesystem than its source.
    pub fn validate(self, options: &SyncOptions) -> Result<Self, SyncError> {
        if self.roots.is_empty() {
            return Err(SyncError::EmptyRoots);
        }

        let base = options.cwd();
        let mut roots = Vec::with_capacity(self.roots.len());
        for root in self.roots {
            let source = absolutize(root.source(), base)?;
            let target = absolutize(root.target(), base)?;
            check_source(&source)?;
            roots.push(SyncRoot::new(source, target));
        }

        check_overlap(&roots)?;
        if options.mode() == TransferMode::Hardlink {
            for root in &roots {
                check_same_device(root)?;
            }
        }
        Ok(Self { roots })
    }

    /// The roots, in the order they were given.
    #[must_use]
    pub fn as_slice(&self) -> &[SyncRoot] {
        &self.roots
    }

    /// Number of roots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    /// Returns `true` when there is no root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Consumes the set.
    #[must_use]
    pub fn into_vec(self) -> Vec<SyncRoot> {
        self.roots
    }
}

impl<R: Into<SyncRoot>> FromIterator<R> for SyncRoots {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<'a> IntoIterator for &'a SyncRoots {
    type Item = &'a SyncRoot;
    type IntoIter = std::slice::Iter<'a, SyncRoot>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.iter()
    }
}

fn absolutize(path: &Path, base: Option<&Path>) -> Result<PathBuf, SyncError> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let base = match base {
        Some(base) if base.is_absolute() => base.to_path_buf(),
        Some(base) => current_dir(path)?.join(base),
        None => current_dir(path)?,
    };
    Ok(normalize(&base.join(path)))
}

fn current_dir(path: &Path) -> Result<PathBuf, SyncError> {
    env::current_dir().map_err(|_| SyncError::RelativePath {
        path: path.to_path_buf(),
    })
}

/// Drops `.` components and folds `..` into its parent, without touching disk.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

fn check_source(source: &Path) -> Result<(), SyncError> {
    match fs::metadata(source) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(SyncError::SourceNotDirectory {
            path: source.to_path_buf(),
        }),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Err(SyncError::MissingSource {
            path: source.to_path_buf(),
        }),
        Err(error) => Err(SyncError::Io {
            action: "inspect source directory",
            path: source.to_path_buf(),
            source: error,
        }),
    }
}

fn check_overlap(roots: &[SyncRoot]) -> Result<(), SyncError> {
    for (index, first) in roots.iter().enumerate() {
        for second in &roots[index + 1..] {
            let (a, b) = (first.source(), second.source());
            if b.starts_with(a) {
                return Err(SyncError::OverlappingSources {
                    first: a.to_path_buf(),
                    second: b.to_path_buf(),
                });
            }
            if a.starts_with(b) {
                return Err(SyncError::OverlappingSources {
                    first: b.to_path_buf(),
                    second: a.to_path_buf(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn check_same_device(root: &SyncRoot) -> Result<(), SyncError> {
    use engine::link::FileIdentity;

    let device = |path: &Path| {
        fs::metadata(path)
            .ok()
            .and_then(|metadata| FileIdentity::from_metadata(&metadata))
            .map(FileIdentity::dev)
    };
    // The target may not exist yet; it will be created inside its nearest
    // existing ancestor.
    let target_device = root.target().ancestors().find_map(device);
    match (device(root.source()), target_device) {
        (Some(source), Some(target)) if source != target => Err(SyncError::CrossDevice {
            source_root: root.source().to_path_buf(),
            target_root: root.target().to_path_buf(),
        }),
        _ => Ok(()),
    }
}

#[cfg(not(unix))]
fn check_same_device(_root: &SyncRoot) -> Result<(), SyncError> {
    Ok(())
}
