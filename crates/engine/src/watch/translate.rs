use std::fs;
use std::path::{Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use crate::event::NodeKind;

/// A backend event reduced to what dispatch needs. The node hint is present
/// when the backend told us what kind of entry changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) enum RawChange {
    Created(PathBuf, Option<NodeKind>),
    Modified(PathBuf),
    Removed(PathBuf, Option<NodeKind>),
}

impl RawChange {
    pub(super) fn path(&self) -> &Path {
        match self {
            Self::Created(path, _) | Self::Modified(path) | Self::Removed(path, _) => path,
        }
    }
}

/// Splits one backend event into per-path changes, in delivery order.
///
/// Metadata-only modifications are dropped: linking a target rewrites the
/// timestamps of the shared inode and would otherwise echo back as a change.
pub(super) fn translate(event: Event) -> Vec<RawChange> {
    let paths = event.paths;
    match event.kind {
        EventKind::Create(kind) => {
            let hint = match kind {
                CreateKind::File => Some(NodeKind::File),
                CreateKind::Folder => Some(NodeKind::Dir),
                _ => None,
            };
            paths
                .into_iter()
                .map(|path| RawChange::Created(path, hint))
                .collect()
        }
        EventKind::Modify(ModifyKind::Name(mode)) => renamed(mode, paths),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(_) => paths.into_iter().map(RawChange::Modified).collect(),
        EventKind::Remove(kind) => {
            let hint = match kind {
                RemoveKind::File => Some(NodeKind::File),
                RemoveKind::Folder => Some(NodeKind::Dir),
                _ => None,
            };
            paths
                .into_iter()
                .map(|path| RawChange::Removed(path, hint))
                .collect()
        }
        _ => Vec::new(),
    }
}

fn renamed(mode: RenameMode, paths: Vec<PathBuf>) -> Vec<RawChange> {
    match mode {
        RenameMode::From => paths
            .into_iter()
            .map(|path| RawChange::Removed(path, None))
            .collect(),
        RenameMode::To => paths
            .into_iter()
            .map(|path| RawChange::Created(path, None))
            .collect(),
        RenameMode::Both if paths.len() == 2 => {
            let mut paths = paths.into_iter();
            let mut changes = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                changes.push(RawChange::Removed(from, None));
            }
            if let Some(to) = paths.next() {
                changes.push(RawChange::Created(to, None));
            }
            changes
        }
        _ => paths.into_iter().map(by_existence).collect(),
    }
}

// Backends that cannot pair rename halves report one side at a time.
fn by_existence(path: PathBuf) -> RawChange {
    if fs::symlink_metadata(&path).is_ok() {
        RawChange::Created(path, None)
    } else {
        RawChange::Removed(path, None)
    }
}
