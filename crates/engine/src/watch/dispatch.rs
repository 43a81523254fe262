use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Receiver;
use filters::{Verdict, relative_key};
use logging::{trace_filter, trace_watch};
use rustc_hash::FxHashMap;

use super::translate::{RawChange, translate};
use crate::error::SyncError;
use crate::event::{ChangeKind, NodeKind, SyncEvent, SyncEventKind, WatchEvent};
use crate::link::{materialize, remove_entry};
use crate::listing::TreeLister;
use crate::options::{SyncOptions, TransferMode};
use crate::roots::SyncRoot;

const MEMO_CAPACITY: usize = 1024;

/// What the backend callback and the handle send to the dispatcher thread.
pub(super) enum Message {
    Notify(notify::Result<notify::Event>),
    Stop,
}

struct WatchedRoot {
    root: SyncRoot,
    // Some backends report resolved paths (`/private/var` on macOS).
    canonical: Option<PathBuf>,
}

impl WatchedRoot {
    fn new(root: SyncRoot) -> Self {
        let canonical = fs::canonicalize(root.source())
            .ok()
            .filter(|canonical| canonical != root.source());
        Self { root, canonical }
    }

    fn relative<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        self.root
            .relative_to_source(path)
            .or_else(|| {
                self.canonical
                    .as_deref()
                    .and_then(|canonical| path.strip_prefix(canonical).ok())
            })
            .filter(|relative| !relative.as_os_str().is_empty())
    }
}

/// Applies raw changes to the targets, one at a time, in delivery order.
pub(super) struct Dispatcher {
    roots: Vec<WatchedRoot>,
    options: SyncOptions,
    memo: FxHashMap<PathBuf, Vec<usize>>,
}

impl Dispatcher {
    pub(super) fn new(roots: Vec<SyncRoot>, options: SyncOptions) -> Self {
        Self {
            roots: roots.into_iter().map(WatchedRoot::new).collect(),
            options,
            memo: FxHashMap::default(),
        }
    }

    pub(super) fn run(mut self, receiver: &Receiver<Message>, stop: &AtomicBool) {
        trace_watch!(roots = self.roots.len(), "dispatcher started");
        for message in receiver {
            if stop.load(Ordering::Acquire) {
                break;
            }
            match message {
                Message::Stop => break,
                Message::Notify(Ok(event)) => {
                    for change in translate(event) {
                        self.dispatch(&change);
                    }
                }
                Message::Notify(Err(error)) => self.report(SyncError::Watch(error)),
            }
        }
        trace_watch!("dispatcher stopped");
    }

    fn dispatch(&mut self, change: &RawChange) {
        for index in self.owners(change.path()) {
            if let Err(error) = self.apply(&self.roots[index], change) {
                self.report(error);
            }
        }
    }

    /// Indices of the roots whose source contains `path`.
    fn owners(&mut self, path: &Path) -> Vec<usize> {
        if let Some(owners) = self.memo.get(path) {
            return owners.clone();
        }
        let owners: Vec<usize> = self
            .roots
            .iter()
            .enumerate()
            .filter(|(_, watched)| watched.relative(path).is_some())
            .map(|(index, _)| index)
            .collect();
        if self.memo.len() >= MEMO_CAPACITY {
            self.memo.clear();
        }
        self.memo.insert(path.to_path_buf(), owners.clone());
        owners
    }

    fn apply(&self, watched: &WatchedRoot, change: &RawChange) -> Result<(), SyncError> {
        let Some(relative) = watched.relative(change.path()) else {
            return Ok(());
        };
        let root = &watched.root;
        let source = root.source_for(relative);
        let target = root.target_for(relative);

        let kind = match change {
            RawChange::Created(_, Some(NodeKind::Dir)) => ChangeKind::AddDir,
            RawChange::Created(_, Some(NodeKind::File)) => ChangeKind::Add,
            RawChange::Created(_, None) if self.is_source_dir(&source) => ChangeKind::AddDir,
            RawChange::Created(_, None) => ChangeKind::Add,
            // Directory modifications are entries coming and going, reported separately.
            RawChange::Modified(_) if self.is_source_dir(&source) => return Ok(()),
            RawChange::Modified(_) => ChangeKind::Change,
            RawChange::Removed(_, Some(NodeKind::Dir)) => ChangeKind::UnlinkDir,
            RawChange::Removed(_, Some(NodeKind::File)) => ChangeKind::Unlink,
            RawChange::Removed(_, None) if target.is_dir() => ChangeKind::UnlinkDir,
            RawChange::Removed(_, None) => ChangeKind::Unlink,
        };

        let observed = WatchEvent::new(kind, source.clone(), root.source().to_path_buf());
        if let Err(error) = self.options.observe(&observed) {
            self.report(error);
        }

        if self.options.registry().covers(&source) {
            trace_watch!(path = %source.display(), "ignored: beneath a preserved symlink");
            return Ok(());
        }
        if self.options.bounded_depth() && relative.components().count() > 1 {
            return Ok(());
        }
        let key = relative_key(relative, kind.node().is_dir());
        if self.options.rules().verdict(&key) == Verdict::Excluded {
            trace_filter!(key = %key, %kind, "ignored excluded change");
            return Ok(());
        }

        trace_watch!(%kind, path = %key, "dispatching");
        if kind.is_removal() {
            self.remove(relative, &source, &target)
        } else {
            self.create(root, kind, relative, &source, &target)
        }
    }

    fn create(
        &self,
        root: &SyncRoot,
        kind: ChangeKind,
        relative: &Path,
        source: &Path,
        target: &Path,
    ) -> Result<(), SyncError> {
        let mode = self.options.mode();
        let Some(node) = materialize(
            source,
            target,
            mode,
            self.options.preserve_symlinks(),
            self.options.registry(),
        ) else {
            return Ok(());
        };

        let emitted = match (kind, node) {
            (ChangeKind::Change, _) => SyncEventKind::Change,
            (_, NodeKind::Dir) => SyncEventKind::AddDir,
            (_, NodeKind::File) => SyncEventKind::Add,
        };
        let display = relative_key(relative, false);
        self.options
            .emit(&SyncEvent::new(emitted, node, display, source, target))?;

        if emitted == SyncEventKind::AddDir && mode == TransferMode::Copy {
            self.fill_new_dir(root, relative);
        }
        Ok(())
    }

    /// Materializes whatever already sits inside a directory that just
    /// appeared: the backend may have started watching it too late to see
    /// those entries being created.
    fn fill_new_dir(&self, root: &SyncRoot, relative: &Path) {
        let entries = match TreeLister::for_source(&self.options).list_from(root.source(), relative) {
            Ok(entries) => entries,
            Err(error) => {
                self.report(error);
                return;
            }
        };
        for entry in entries {
            let target = root.target_for(entry.relative());
            let Some(node) = materialize(
                entry.path(),
                &target,
                self.options.mode(),
                self.options.preserve_symlinks(),
                self.options.registry(),
            ) else {
                continue;
            };
            let kind = match node {
                NodeKind::Dir => SyncEventKind::AddDir,
                NodeKind::File => SyncEventKind::Add,
            };
            let event = SyncEvent::new(kind, node, entry.display_path(), entry.path(), target);
            if let Err(error) = self.options.emit(&event) {
                self.report(error);
            }
        }
    }

    fn remove(
        &self,
        relative: &Path,
        source: &Path,
        target: &Path,
    ) -> Result<(), SyncError> {
        if !self.options.delete_orphaned() {
            trace_watch!(path = %source.display(), "removal not mirrored: orphan deletion is off");
            return Ok(());
        }
        let registry = self.options.registry();
        if registry.contains(source) {
            registry.evict(source);
        }
        let Some(node) = remove_entry(target) else {
            return Ok(());
        };
        let kind = match node {
            NodeKind::Dir => SyncEventKind::UnlinkDir,
            NodeKind::File => SyncEventKind::Unlink,
        };
        let display = relative_key(relative, false);
        self.options
            .emit(&SyncEvent::new(kind, node, display, source, target))
    }

    fn is_source_dir(&self, source: &Path) -> bool {
        let metadata = if self.options.preserve_symlinks() {
            fs::symlink_metadata(source)
        } else {
            fs::metadata(source)
        };
        metadata.is_ok_and(|metadata| metadata.is_dir())
    }

    fn report(&self, error: SyncError) {
        if let Err(error) = self.options.route_error(error) {
            tracing::error!(target: logging::targets::WATCH, %error, "failed to apply change");
        }
    }
}
