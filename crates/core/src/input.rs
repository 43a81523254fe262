use std::path::{Path, PathBuf};

/// One path or several, as accepted by [`sync`](crate::sync).
///
/// Built from a single path (`&str`, `String`, `&Path`, `PathBuf`) or from a
/// `Vec` or array of anything convertible into a `PathBuf`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PathList {
    paths: Vec<PathBuf>,
}

impl PathList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { paths: Vec::new() }
    }

    /// Appends `path`.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when the list holds no path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates over the paths in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    /// Consumes the list.
    #[must_use]
    pub fn into_vec(self) -> Vec<PathBuf> {
        self.paths
    }
}

impl From<&str> for PathList {
    fn from(path: &str) -> Self {
        Self::from(PathBuf::from(path))
    }
}

impl From<String> for PathList {
    fn from(path: String) -> Self {
        Self::from(PathBuf::from(path))
    }
}

impl From<&Path> for PathList {
    fn from(path: &Path) -> Self {
        Self::from(path.to_path_buf())
    }
}

impl From<&PathBuf> for PathList {
    fn from(path: &PathBuf) -> Self {
        Self::from(path.clone())
    }
}

impl From<PathBuf> for PathList {
    fn from(path: PathBuf) -> Self {
        Self { paths: vec![path] }
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for PathList {
    fn from(paths: Vec<P>) -> Self {
        paths.into_iter().collect()
    }
}

impl<P: Into<PathBuf>, const N: usize> From<[P; N]> for PathList {
    fn from(paths: [P; N]) -> Self {
        paths.into_iter().collect()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for PathList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl IntoIterator for PathList {
    type Item = PathBuf;
    type IntoIter = std::vec::IntoIter<PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathList {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}
