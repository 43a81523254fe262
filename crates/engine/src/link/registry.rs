use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use rustc_hash::FxHashSet;

/// Source paths that were mirrored as preserved symlinks.
///
/// Orphan deletion and watch dispatch consult the registry so that nothing
/// beneath a mirrored symlink is ever removed through it. Clones share the
/// same set. [`LinkRegistry::default`] hands out the process-wide registry;
/// [`LinkRegistry::new`] creates an isolated one.
#[derive(Clone, Debug)]
pub struct LinkRegistry {
    paths: Arc<Mutex<FxHashSet<PathBuf>>>,
}

impl LinkRegistry {
    /// Creates an empty registry not shared with anyone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            paths: Arc::new(Mutex::new(FxHashSet::default())),
        }
    }

    /// The registry shared by every session in this process.
    #[must_use]
    pub fn global() -> Self {
        static GLOBAL: OnceLock<LinkRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new).clone()
    }

    fn lock(&self) -> MutexGuard<'_, FxHashSet<PathBuf>> {
        // The set stays consistent even if a holder panicked mid-insert.
        self.paths.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records `path`. Returns `false` if it was already present.
    pub fn register(&self, path: impl Into<PathBuf>) -> bool {
        self.lock().insert(path.into())
    }

    /// Forgets `path`. Returns `true` if it was present.
    pub fn evict(&self, path: &Path) -> bool {
        self.lock().remove(path)
    }

    /// Returns `true` when `path` itself is registered.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains(path)
    }

    /// Returns `true` when `path` lies strictly beneath a registered symlink.
    #[must_use]
    pub fn covers(&self, path: &Path) -> bool {
        let paths = self.lock();
        if paths.is_empty() {
            return false;
        }
        path.ancestors().skip(1).any(|ancestor| paths.contains(ancestor))
    }

    /// Number of registered paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::global()
    }
}
