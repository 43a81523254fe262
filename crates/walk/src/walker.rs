use crate::builder::WalkBuilder;
use crate::entry::WalkEntry;
use crate::error::WalkError;
use logging::trace_flist;
use std::collections::HashSet;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Depth-first iterator over a directory tree.
pub struct Walker {
    root: PathBuf,
    follow_symlinks: bool,
    max_depth: Option<usize>,
    root_entry: Option<WalkEntry>,
    stack: Vec<DirectoryState>,
    // Canonical paths of the directories currently on the stack.
    active: HashSet<PathBuf>,
    // Set while the most recently yielded directory sits on top of the stack.
    descended: bool,
    finished: bool,
}

impl Walker {
    pub(crate) fn new(builder: WalkBuilder) -> Result<Self, WalkError> {
        let root = absolutize(builder.root)?;
        trace_flist!(root = %root.display(), "walking tree");

        let metadata = fs::symlink_metadata(&root)
            .map_err(|error| WalkError::root_metadata(root.clone(), error))?;
        let descend = if metadata.is_dir() {
            true
        } else if metadata.file_type().is_symlink() && builder.follow_symlinks {
            fs::metadata(&root)
                .map_err(|error| WalkError::metadata(root.clone(), error))?
                .is_dir()
        } else {
            false
        };

        let mut walker = Self {
            root_entry: builder.include_root.then(|| WalkEntry {
                full_path: root.clone(),
                relative_path: PathBuf::new(),
                metadata,
                depth: 0,
                is_root: true,
            }),
            root,
            follow_symlinks: builder.follow_symlinks,
            max_depth: builder.max_depth,
            stack: Vec::new(),
            active: HashSet::new(),
            descended: false,
            finished: false,
        };

        if descend && walker.max_depth != Some(0) {
            let root = walker.root.clone();
            walker.push_directory(root, PathBuf::new(), 0)?;
        }
        Ok(walker)
    }

    /// Prevents descent into the directory yielded by the last call to
    /// [`Iterator::next`]. Has no effect when the last entry was not a
    /// directory that would have been entered.
    pub fn skip_current_dir(&mut self) {
        if std::mem::take(&mut self.descended) {
            if let Some(state) = self.pop_directory() {
                trace_flist!(dir = %state.fs_path.display(), "pruned subtree");
            }
        }
    }

    fn pop_directory(&mut self) -> Option<DirectoryState> {
        let state = self.stack.pop()?;
        self.active.remove(&state.canonical);
        Some(state)
    }

    fn push_directory(
        &mut self,
        fs_path: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<bool, WalkError> {
        let canonical = fs::canonicalize(&fs_path)
            .map_err(|error| WalkError::canonicalize(fs_path.clone(), error))?;
        if self.active.contains(&canonical) {
            trace_flist!(dir = %fs_path.display(), "symlink cycle; not descending");
            return Ok(false);
        }

        let state = DirectoryState::read(fs_path, canonical.clone(), relative_prefix, depth)?;
        self.active.insert(canonical);
        self.stack.push(state);
        Ok(true)
    }

    fn prepare_entry(
        &mut self,
        full_path: PathBuf,
        relative_path: PathBuf,
        depth: usize,
    ) -> Result<Option<WalkEntry>, WalkError> {
        let metadata = match fs::symlink_metadata(&full_path) {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                trace_flist!(path = %full_path.display(), "entry vanished during walk");
                return Ok(None);
            }
            Err(error) => return Err(WalkError::metadata(full_path, error)),
        };

        let may_descend = self.max_depth.is_none_or(|max| depth < max);
        let descend_into = if !may_descend {
            None
        } else if metadata.is_dir() {
            Some(full_path.clone())
        } else if metadata.file_type().is_symlink() && self.follow_symlinks {
            // A dangling link is yielded as-is.
            match fs::metadata(&full_path) {
                Ok(target) if target.is_dir() => Some(full_path.clone()),
                _ => None,
            }
        } else {
            None
        };

        if let Some(dir) = descend_into {
            self.descended = self.push_directory(dir, relative_path.clone(), depth)?;
        }

        Ok(Some(WalkEntry {
            full_path,
            relative_path,
            metadata,
            depth,
            is_root: false,
        }))
    }
}

impl Iterator for Walker {
    type Item = Result<WalkEntry, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.descended = false;
        if self.finished {
            return None;
        }

        if let Some(root) = self.root_entry.take() {
            self.descended = !self.stack.is_empty();
            return Some(Ok(root));
        }

        loop {
            let state = self.stack.last_mut()?;
            let Some(name) = state.next_name() else {
                self.pop_directory();
                continue;
            };
            let full_path = state.fs_path.join(&name);
            let relative_path = state.relative_prefix.join(&name);
            let depth = state.depth + 1;

            match self.prepare_entry(full_path, relative_path, depth) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => {}
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
    }
}

struct DirectoryState {
    fs_path: PathBuf,
    canonical: PathBuf,
    relative_prefix: PathBuf,
    entries: std::vec::IntoIter<OsString>,
    depth: usize,
}

impl DirectoryState {
    fn read(
        fs_path: PathBuf,
        canonical: PathBuf,
        relative_prefix: PathBuf,
        depth: usize,
    ) -> Result<Self, WalkError> {
        let read_dir =
            fs::read_dir(&fs_path).map_err(|error| WalkError::read_dir(fs_path.clone(), error))?;
        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|error| WalkError::read_dir_entry(fs_path.clone(), error))?;
            entries.push(entry.file_name());
        }
        entries.sort();
        trace_flist!(dir = %fs_path.display(), count = entries.len(), "read directory");

        Ok(Self {
            fs_path,
            canonical,
            relative_prefix,
            entries: entries.into_iter(),
            depth,
        })
    }

    fn next_name(&mut self) -> Option<OsString> {
        self.entries.next()
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf, WalkError> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = env::current_dir()
            .map_err(|error| WalkError::canonicalize(PathBuf::from("."), error))?;
        Ok(cwd.join(path))
    }
}
