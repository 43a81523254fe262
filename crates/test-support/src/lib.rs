#![deny(unsafe_code)]
#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

//! Fixtures shared by the syncdir test suites.
//!
//! Everything here panics on failure: these helpers only run inside tests,
//! where a panic with the offending path is the most useful report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use walk::WalkBuilder;

/// A scratch directory removed on drop.
pub struct TestDir {
    temp: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp: tempfile::tempdir().expect("create scratch directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.temp.path().join(relative)
    }

    /// Creates `relative` and its parents, returning the absolute path.
    pub fn mkdir(&self, relative: impl AsRef<Path>) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(&path).unwrap_or_else(|e| panic!("mkdir {}: {e}", path.display()));
        path
    }

    /// Writes `contents` to `relative`, creating parents as needed.
    pub fn write(&self, relative: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.join(relative);
        write_file(&path, contents.as_ref());
        path
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> String {
        let path = self.join(relative);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind and content of one entry in a [`snapshot`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    File(Vec<u8>),
    Dir,
    Symlink(PathBuf),
}

impl Node {
    pub fn file(contents: impl AsRef<[u8]>) -> Self {
        Self::File(contents.as_ref().to_vec())
    }
}

/// Declarative description of a tree to lay down on disk.
#[derive(Clone, Debug, Default)]
pub struct FileTree {
    entries: Vec<(String, Node)>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, relative: &str, contents: impl AsRef<[u8]>) -> Self {
        self.entries.push((relative.to_owned(), Node::file(contents)));
        self
    }

    pub fn dir(mut self, relative: &str) -> Self {
        self.entries.push((relative.to_owned(), Node::Dir));
        self
    }

    pub fn symlink(mut self, relative: &str, target: impl Into<PathBuf>) -> Self {
        self.entries
            .push((relative.to_owned(), Node::Symlink(target.into())));
        self
    }

    /// Creates every entry beneath `root`, which is created if missing.
    pub fn create_in(&self, root: &Path) {
        fs::create_dir_all(root).unwrap_or_else(|e| panic!("mkdir {}: {e}", root.display()));
        for (relative, node) in &self.entries {
            let path = root.join(relative);
            match node {
                Node::File(contents) => write_file(&path, contents),
                Node::Dir => fs::create_dir_all(&path)
                    .unwrap_or_else(|e| panic!("mkdir {}: {e}", path.display())),
                Node::Symlink(target) => create_symlink(target, &path),
            }
        }
    }

    /// The snapshot this tree produces once created, parents included.
    pub fn expected(&self) -> BTreeMap<String, Node> {
        let mut expected = BTreeMap::new();
        for (relative, node) in &self.entries {
            let mut parent = Path::new(relative).parent();
            while let Some(dir) = parent.filter(|p| !p.as_os_str().is_empty()) {
                expected.insert(slash_key(dir), Node::Dir);
                parent = dir.parent();
            }
            expected.insert(relative.clone(), node.clone());
        }
        expected
    }
}

/// Captures every entry beneath `root`, keyed by `/`-joined relative path.
///
/// Symlinks are recorded, not followed.
pub fn snapshot(root: &Path) -> BTreeMap<String, Node> {
    let walker = WalkBuilder::new(root)
        .include_root(false)
        .build()
        .unwrap_or_else(|e| panic!("walk {}: {e}", root.display()));
    walker
        .map(|entry| {
            let entry = entry.unwrap_or_else(|e| panic!("walk {}: {e}", root.display()));
            let node = if entry.is_symlink() {
                Node::Symlink(fs::read_link(entry.full_path()).expect("read link"))
            } else if entry.is_dir() {
                Node::Dir
            } else {
                Node::File(fs::read(entry.full_path()).expect("read file"))
            };
            (slash_key(entry.relative_path()), node)
        })
        .collect()
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
}

/// Inode number of `path`, without following a final symlink.
#[cfg(unix)]
pub fn inode(path: &Path) -> u64 {
    use std::os::unix::fs::MetadataExt;
    fs::symlink_metadata(path)
        .unwrap_or_else(|e| panic!("stat {}: {e}", path.display()))
        .ino()
}

fn slash_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn write_file(path: &Path, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir {}: {e}", parent.display()));
    }
    fs::write(path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) {
    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).unwrap_or_else(|e| panic!("mkdir {}: {e}", parent.display()));
    }
    std::os::unix::fs::symlink(target, link)
        .unwrap_or_else(|e| panic!("symlink {}: {e}", link.display()));
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, link: &Path) {
    panic!("symlink fixtures are unix-only: {}", link.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_matches_expected_tree() {
        let dir = TestDir::new();
        let tree = FileTree::new().file("a/x", "1").file("b/y", "2").dir("empty");
        tree.create_in(dir.path());

        assert_eq!(snapshot(dir.path()), tree.expected());
    }

    #[test]
    fn wait_until_reports_timeout() {
        assert!(!wait_until(Duration::from_millis(50), || false));
        assert!(wait_until(Duration::from_millis(50), || true));
    }
}
