use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetime::FileTime;
use logging::{trace_copy, trace_del, trace_link};

use super::identity::FileIdentity;
use super::registry::LinkRegistry;
use crate::event::NodeKind;
use crate::options::TransferMode;

/// How far in the past a freshly linked target's timestamps are set.
pub const LINK_MTIME_OFFSET: Duration = Duration::from_secs(10);

/// Makes `target` mirror `source`.
///
/// Returns the kind of node now present at `target`, or `None` when nothing
/// was done because the source is gone or an operation failed. Failures are
/// logged and otherwise ignored.
///
/// - A symlink with `preserve_symlinks` is recreated as a symlink pointing at
///   the same place, and `source` is recorded in `registry`.
/// - Any other symlink is resolved and its target mirrored instead.
/// - A directory becomes a directory at `target`. Its contents are not touched.
/// - A file is copied over `target` in [`TransferMode::Copy`]. In
///   [`TransferMode::Hardlink`] it is linked unless `target` already shares
///   the source inode.
pub fn materialize(
    source: &Path,
    target: &Path,
    mode: TransferMode,
    preserve_symlinks: bool,
    registry: &LinkRegistry,
) -> Option<NodeKind> {
    let mut metadata = match fs::symlink_metadata(source) {
        Ok(metadata) => metadata,
        Err(error) => {
            swallowed("inspect", source, &error);
            return None;
        }
    };

    let mut link_source = PathBuf::from(source);
    if metadata.file_type().is_symlink() {
        if preserve_symlinks {
            return replicate_symlink(source, target, registry).then_some(NodeKind::File);
        }
        match fs::metadata(source).and_then(|resolved| {
            fs::canonicalize(source).map(|canonical| (resolved, canonical))
        }) {
            Ok((resolved, canonical)) => {
                metadata = resolved;
                link_source = canonical;
            }
            Err(error) => {
                swallowed("resolve", source, &error);
                return None;
            }
        }
    }

    if metadata.is_dir() {
        return ensure_dir(target).then_some(NodeKind::Dir);
    }

    let done = match mode {
        TransferMode::Copy => copy_file(source, target, &metadata),
        TransferMode::Hardlink => link_file(&link_source, target, &metadata),
    };
    done.then_some(NodeKind::File)
}

/// Removes `target` (recursively for directories, never following a final
/// symlink). Returns the kind of node removed, or `None` if nothing was.
pub fn remove_entry(target: &Path) -> Option<NodeKind> {
    let metadata = match fs::symlink_metadata(target) {
        Ok(metadata) => metadata,
        Err(error) => {
            if error.kind() != io::ErrorKind::NotFound {
                swallowed("inspect", target, &error);
            }
            return None;
        }
    };

    let (node, result) = if metadata.is_dir() {
        (NodeKind::Dir, fs::remove_dir_all(target))
    } else {
        (NodeKind::File, fs::remove_file(target))
    };
    match result {
        Ok(()) => {
            trace_del!(path = %target.display(), %node, "removed");
            Some(node)
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => None,
        Err(error) => {
            swallowed("remove", target, &error);
            None
        }
    }
}

fn ensure_dir(target: &Path) -> bool {
    match fs::symlink_metadata(target) {
        Ok(existing) if existing.is_dir() => return true,
        Ok(_) => {
            if remove_entry(target).is_none() {
                return false;
            }
        }
        Err(_) => {}
    }
    match fs::create_dir_all(target) {
        Ok(()) => true,
        Err(error) => {
            swallowed("create directory", target, &error);
            false
        }
    }
}

fn ensure_parent(target: &Path) -> bool {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => true,
    }
}

fn copy_file(source: &Path, target: &Path, metadata: &fs::Metadata) -> bool {
    if !ensure_parent(target) {
        return false;
    }

    // Copying onto a directory, a symlink, or a hardlink of the source would
    // fail or write through to something else; clear the slot first.
    if let Ok(existing) = fs::symlink_metadata(target) {
        let shares_inode = FileIdentity::from_metadata(&existing).is_some_and(|identity| {
            FileIdentity::from_metadata(metadata) == Some(identity)
        });
        if (existing.is_dir() || existing.file_type().is_symlink() || shares_inode)
            && remove_entry(target).is_none()
        {
            return false;
        }
    }

    match fs::copy(source, target) {
        Ok(bytes) => {
            trace_copy!(source = %source.display(), target = %target.display(), bytes, "copied");
            true
        }
        Err(error) => {
            swallowed("copy", target, &error);
            false
        }
    }
}

fn link_file(source: &Path, target: &Path, metadata: &fs::Metadata) -> bool {
    if !ensure_parent(target) {
        return false;
    }

    if let Ok(existing) = fs::symlink_metadata(target) {
        let source_identity = FileIdentity::from_metadata(metadata);
        if source_identity.is_some() && source_identity == FileIdentity::from_metadata(&existing)
        {
            trace_link!(target = %target.display(), "already linked");
            return true;
        }
        if remove_entry(target).is_none() {
            return false;
        }
    }

    if let Err(error) = fs::hard_link(source, target) {
        swallowed("hardlink", target, &error);
        return false;
    }
    trace_link!(source = %source.display(), target = %target.display(), "linked");

    let past = SystemTime::now()
        .checked_sub(LINK_MTIME_OFFSET)
        .unwrap_or(SystemTime::UNIX_EPOCH);
    let stamp = FileTime::from_system_time(past);
    if let Err(error) = filetime::set_file_times(target, stamp, stamp) {
        swallowed("set times on", target, &error);
    }
    true
}

fn replicate_symlink(source: &Path, target: &Path, registry: &LinkRegistry) -> bool {
    let destination = match fs::read_link(source) {
        Ok(destination) => destination,
        Err(error) => {
            swallowed("read link", source, &error);
            return false;
        }
    };
    registry.register(source);

    if let Ok(existing) = fs::symlink_metadata(target) {
        if existing.file_type().is_symlink()
            && fs::read_link(target).is_ok_and(|current| current == destination)
        {
            return true;
        }
        if remove_entry(target).is_none() {
            return false;
        }
    }
    if !ensure_parent(target) {
        return false;
    }

    match create_symlink(source, &destination, target) {
        Ok(()) => {
            trace_link!(target = %target.display(), points_to = %destination.display(), "symlinked");
            true
        }
        Err(error) => {
            swallowed("symlink", target, &error);
            false
        }
    }
}

#[cfg(unix)]
fn create_symlink(_source: &Path, destination: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(destination, target)
}

#[cfg(windows)]
fn create_symlink(source: &Path, destination: &Path, target: &Path) -> io::Result<()> {
    if fs::metadata(source).is_ok_and(|resolved| resolved.is_dir()) {
        std::os::windows::fs::symlink_dir(destination, target)
    } else {
        std::os::windows::fs::symlink_file(destination, target)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_source: &Path, _destination: &Path, _target: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

fn swallowed(action: &str, path: &Path, error: &io::Error) {
    tracing::debug!(
        target: logging::targets::LINK,
        path = %path.display(),
        %error,
        "failed to {action}; leaving it for the next pass"
    );
}
