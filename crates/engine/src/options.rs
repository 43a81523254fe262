//! Immutable session configuration.
//!
//! [`SyncOptions`] is built once per `sync` call and shared read-only by the
//! reconciler and the watcher. Callbacks live behind [`Arc`] so cloning the
//! options for the dispatcher thread is cheap.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use filters::{MatchRules, MatchSpec};

use crate::error::{CallbackError, ErrorPolicy, SyncError};
use crate::event::{SyncEvent, WatchEvent};
use crate::link::LinkRegistry;

/// Callback invoked after every applied operation.
pub type AfterSyncCallback = Arc<dyn Fn(&SyncEvent) -> Result<(), CallbackError> + Send + Sync>;

/// Callback invoked for every raw watch event before rules are applied.
pub type WatchEventCallback = Arc<dyn Fn(&WatchEvent) -> Result<(), CallbackError> + Send + Sync>;

/// How file contents reach the target.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TransferMode {
    /// Full, independent copies.
    #[default]
    Copy,
    /// Hardlinks sharing the source inode.
    Hardlink,
}

impl TransferMode {
    /// `copy` or `hardlink`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Hardlink => "hardlink",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings handed unchanged to the notification backend.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WatchBackendOptions {
    poll_interval: Option<Duration>,
    compare_contents: bool,
}

impl WatchBackendOptions {
    /// Backend defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            poll_interval: None,
            compare_contents: false,
        }
    }

    /// Rescan interval for polling backends.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Makes polling backends hash contents instead of comparing mtimes.
    #[must_use]
    pub const fn compare_contents(mut self, compare: bool) -> Self {
        self.compare_contents = compare;
        self
    }

    /// Converts into the backend's own configuration type.
    #[must_use]
    pub fn to_notify_config(self) -> notify::Config {
        let config = notify::Config::default().with_compare_contents(self.compare_contents);
        match self.poll_interval {
            Some(interval) => config.with_poll_interval(interval),
            None => config,
        }
    }
}

/// Configuration for one reconciliation or watch session.
#[derive(Clone, Default)]
pub struct SyncOptions {
    mode: TransferMode,
    watch: bool,
    skip_initial_sync: bool,
    delete_orphaned: bool,
    preserve_symlinks: bool,
    bounded_depth: bool,
    skip_excluded_children: bool,
    rules: MatchRules,
    after_sync: Option<AfterSyncCallback>,
    on_watch_event: Option<WatchEventCallback>,
    error_policy: ErrorPolicy,
    cwd: Option<PathBuf>,
    backend: WatchBackendOptions,
    registry: LinkRegistry,
}

impl SyncOptions {
    /// Starts a builder with every option at its default.
    #[must_use]
    pub fn builder() -> SyncOptionsBuilder {
        SyncOptionsBuilder::default()
    }

    /// Transfer mode.
    #[must_use]
    pub const fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Whether a watcher is started after the initial pass.
    #[must_use]
    pub const fn watch(&self) -> bool {
        self.watch
    }

    /// Whether the initial pass is skipped.
    #[must_use]
    pub const fn skip_initial_sync(&self) -> bool {
        self.skip_initial_sync
    }

    /// Whether target entries missing from the source are removed.
    #[must_use]
    pub const fn delete_orphaned(&self) -> bool {
        self.delete_orphaned
    }

    /// Whether symlinks are recreated instead of resolved.
    #[must_use]
    pub const fn preserve_symlinks(&self) -> bool {
        self.preserve_symlinks
    }

    /// Whether listing stops at the direct children of each root.
    #[must_use]
    pub const fn bounded_depth(&self) -> bool {
        self.bounded_depth
    }

    /// Whether excluded directories are not traversed at all.
    #[must_use]
    pub const fn skip_excluded_children(&self) -> bool {
        self.skip_excluded_children
    }

    /// Include, exclude and force-sync rules.
    #[must_use]
    pub const fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// Error routing policy.
    #[must_use]
    pub const fn error_policy(&self) -> &ErrorPolicy {
        &self.error_policy
    }

    /// Directory relative roots are resolved against, if overridden.
    #[must_use]
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Backend configuration for the watcher.
    #[must_use]
    pub const fn backend(&self) -> WatchBackendOptions {
        self.backend
    }

    /// Registry of preserved symlinks shared by this session.
    #[must_use]
    pub const fn registry(&self) -> &LinkRegistry {
        &self.registry
    }

    /// Routes an error through the configured policy.
    pub fn route_error(&self, error: SyncError) -> Result<(), SyncError> {
        self.error_policy.route(error)
    }

    /// Invokes the after-sync callback, if any.
    pub(crate) fn emit(&self, event: &SyncEvent) -> Result<(), SyncError> {
        match &self.after_sync {
            Some(callback) => {
                callback(event).map_err(|source| SyncError::callback(event.source(), source))
            }
            None => Ok(()),
        }
    }

    /// Invokes the raw watch-event observer, if any.
    pub(crate) fn observe(&self, event: &WatchEvent) -> Result<(), SyncError> {
        match &self.on_watch_event {
            Some(callback) => callback(event).map_err(|source| SyncError::callback(event.path(), source)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("mode", &self.mode)
            .field("watch", &self.watch)
            .field("skip_initial_sync", &self.skip_initial_sync)
            .field("delete_orphaned", &self.delete_orphaned)
            .field("preserve_symlinks", &self.preserve_symlinks)
            .field("bounded_depth", &self.bounded_depth)
            .field("skip_excluded_children", &self.skip_excluded_children)
            .field("rules", &self.rules)
            .field("after_sync", &self.after_sync.is_some())
            .field("on_watch_event", &self.on_watch_event.is_some())
            .field("error_policy", &self.error_policy)
            .field("cwd", &self.cwd)
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

/// Builder for [`SyncOptions`].
#[derive(Clone, Default)]
pub struct SyncOptionsBuilder {
    options: SyncOptions,
}

impl SyncOptionsBuilder {
    /// Sets the transfer mode.
    #[must_use]
    #[doc(alias = "--hardlink")]
    #[doc(alias = "--copy")]
    pub const fn mode(mut self, mode: TransferMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Starts a watcher after the initial pass.
    #[must_use]
    #[doc(alias = "--watch")]
    pub const fn watch(mut self, watch: bool) -> Self {
        self.options.watch = watch;
        self
    }

    /// Skips the initial pass.
    #[must_use]
    #[doc(alias = "--skip-initial-sync")]
    pub const fn skip_initial_sync(mut self, skip: bool) -> Self {
        self.options.skip_initial_sync = skip;
        self
    }

    /// Removes target entries that have no source counterpart.
    #[must_use]
    #[doc(alias = "--delete-orphaned")]
    pub const fn delete_orphaned(mut self, delete: bool) -> Self {
        self.options.delete_orphaned = delete;
        self
    }

    /// Recreates symlinks instead of resolving them.
    #[must_use]
    #[doc(alias = "--symlink")]
    pub const fn preserve_symlinks(mut self, preserve: bool) -> Self {
        self.options.preserve_symlinks = preserve;
        self
    }

    /// Restricts listing to the direct children of each root.
    #[must_use]
    #[doc(alias = "--nodeep")]
    pub const fn bounded_depth(mut self, bounded: bool) -> Self {
        self.options.bounded_depth = bounded;
        self
    }

    /// Prunes excluded directories during listing.
    ///
    /// Entries beneath a pruned directory are never visited, so a force-sync
    /// rule cannot rescue them.
    #[must_use]
    pub const fn skip_excluded_children(mut self, skip: bool) -> Self {
        self.options.skip_excluded_children = skip;
        self
    }

    /// Replaces all three rules at once.
    #[must_use]
    pub fn rules(mut self, rules: MatchRules) -> Self {
        self.options.rules = rules;
        self
    }

    /// Sets the include rule.
    #[must_use]
    pub fn include(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.options.rules = self.options.rules.include(spec);
        self
    }

    /// Sets the exclude rule.
    #[must_use]
    #[doc(alias = "--exclude")]
    pub fn exclude(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.options.rules = self.options.rules.exclude(spec);
        self
    }

    /// Sets the force-sync rule.
    #[must_use]
    #[doc(alias = "--force-sync")]
    pub fn force_sync(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.options.rules = self.options.rules.force_sync(spec);
        self
    }

    /// Registers the after-sync callback.
    #[must_use]
    pub fn after_sync<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SyncEvent) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.options.after_sync = Some(Arc::new(callback));
        self
    }

    /// Registers the raw watch-event observer.
    #[must_use]
    pub fn on_watch_event<F>(mut self, callback: F) -> Self
    where
        F: Fn(&WatchEvent) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.options.on_watch_event = Some(Arc::new(callback));
        self
    }

    /// Routes errors to `callback` instead of returning them.
    #[must_use]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SyncError) + Send + Sync + 'static,
    {
        self.options.error_policy = ErrorPolicy::sink(callback);
        self
    }

    /// Sets the error policy.
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.options.error_policy = policy;
        self
    }

    /// Resolves relative roots against `cwd` instead of the process directory.
    #[must_use]
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.options.cwd = Some(cwd.into());
        self
    }

    /// Sets the backend configuration.
    #[must_use]
    pub const fn backend(mut self, backend: WatchBackendOptions) -> Self {
        self.options.backend = backend;
        self
    }

    /// Uses `registry` instead of the process-wide one.
    #[must_use]
    pub fn link_registry(mut self, registry: LinkRegistry) -> Self {
        self.options.registry = registry;
        self
    }

    /// Finishes the builder.
    #[must_use]
    pub fn build(self) -> SyncOptions {
        self.options
    }
}
