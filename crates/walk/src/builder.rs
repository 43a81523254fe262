use crate::error::WalkError;
use crate::walker::Walker;
use std::path::PathBuf;

/// Configures a traversal rooted at a specific path.
#[derive(Clone, Debug)]
pub struct WalkBuilder {
    pub(crate) root: PathBuf,
    pub(crate) follow_symlinks: bool,
    pub(crate) include_root: bool,
    pub(crate) max_depth: Option<usize>,
}

impl WalkBuilder {
    /// Creates a builder for `root`. The root is yielded and depth is unbounded.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            follow_symlinks: false,
            include_root: true,
            max_depth: None,
        }
    }

    /// Descends into directories reached through symlinks.
    ///
    /// The link itself is still yielded with its own metadata; its contents are
    /// yielded beneath the link's relative path.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Controls whether the root entry is yielded first.
    #[must_use]
    pub const fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }

    /// Limits how deep the walk descends. Children of the root have depth `1`;
    /// `Some(1)` therefore lists the root's direct children only.
    #[must_use]
    #[doc(alias = "--nodeep")]
    pub const fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Builds a [`Walker`] using the configured options.
    pub fn build(self) -> Result<Walker, WalkError> {
        Walker::new(self)
    }
}
