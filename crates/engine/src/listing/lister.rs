use std::fs;
use std::path::{Path, PathBuf};

use filters::{MatchRules, Verdict, relative_key};
use logging::trace_filter;
use walk::WalkBuilder;

use crate::error::SyncError;
use crate::event::NodeKind;
use crate::options::SyncOptions;

/// One surviving entry of a listing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListedEntry {
    relative: PathBuf,
    key: String,
    path: PathBuf,
    node: NodeKind,
    symlink: bool,
    verdict: Verdict,
}

impl ListedEntry {
    /// Path relative to the listed root.
    #[must_use]
    pub fn relative(&self) -> &Path {
        &self.relative
    }

    /// Matching key: `/`-joined, with a trailing `/` for directories.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key without the trailing directory separator.
    #[must_use]
    pub fn display_path(&self) -> &str {
        self.key.strip_suffix('/').unwrap_or(&self.key)
    }

    /// Absolute path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Node kind; a followed symlink takes the kind of what it points at.
    #[must_use]
    pub const fn node(&self) -> NodeKind {
        self.node
    }

    /// Whether the entry itself is a symlink.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        self.symlink
    }

    /// How the rules classified the entry. Never [`Verdict::Excluded`].
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }
}

/// Lists a tree, dropping entries the rules exclude.
///
/// Excluded directories are still descended into unless
/// [`skip_excluded_children`](Self::skip_excluded_children) is set, because a
/// force-sync rule may rescue something beneath them.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeLister<'a> {
    rules: Option<&'a MatchRules>,
    bounded_depth: bool,
    follow_symlinks: bool,
    skip_excluded_children: bool,
}

impl<'a> TreeLister<'a> {
    /// Unfiltered, unbounded lister that does not follow symlinks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: None,
            bounded_depth: false,
            follow_symlinks: false,
            skip_excluded_children: false,
        }
    }

    /// Lister for a source root under `options`.
    #[must_use]
    pub const fn for_source(options: &'a SyncOptions) -> Self {
        Self {
            rules: Some(options.rules()),
            bounded_depth: options.bounded_depth(),
            follow_symlinks: !options.preserve_symlinks(),
            skip_excluded_children: options.skip_excluded_children(),
        }
    }

    /// Lister for a target root under `options`: unfiltered, symlinks kept.
    #[must_use]
    pub const fn for_target(options: &SyncOptions) -> Self {
        Self {
            rules: None,
            bounded_depth: options.bounded_depth(),
            follow_symlinks: false,
            skip_excluded_children: false,
        }
    }

    /// Filters entries through `rules`.
    #[must_use]
    pub const fn rules(mut self, rules: &'a MatchRules) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Lists direct children only.
    #[must_use]
    pub const fn bounded_depth(mut self, bounded: bool) -> Self {
        self.bounded_depth = bounded;
        self
    }

    /// Descends through directory symlinks.
    #[must_use]
    pub const fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Does not descend into excluded directories.
    #[must_use]
    pub const fn skip_excluded_children(mut self, skip: bool) -> Self {
        self.skip_excluded_children = skip;
        self
    }

    /// Lists every entry beneath `root`, directories before their contents.
    pub fn list(&self, root: &Path) -> Result<Vec<ListedEntry>, SyncError> {
        self.list_from(root, Path::new(""))
    }

    /// Lists the entries beneath `root/start`, keeping paths and keys
    /// relative to `root` so rules see the same keys as a full listing.
    pub fn list_from(&self, root: &Path, start: &Path) -> Result<Vec<ListedEntry>, SyncError> {
        let max_depth = if self.bounded_depth {
            match 1usize.checked_sub(start.components().count()) {
                Some(0) | None => return Ok(Vec::new()),
                remaining => remaining,
            }
        } else {
            None
        };

        let mut walker = WalkBuilder::new(root.join(start))
            .include_root(false)
            .follow_symlinks(self.follow_symlinks)
            .max_depth(max_depth)
            .build()?;

        let mut entries = Vec::new();
        while let Some(entry) = walker.next() {
            let entry = entry?;
            let symlink = entry.is_symlink();
            let is_dir = entry.is_dir()
                || (symlink
                    && self.follow_symlinks
                    && fs::metadata(entry.full_path()).is_ok_and(|resolved| resolved.is_dir()));
            let relative = start.join(entry.relative_path());
            let key = relative_key(&relative, is_dir);

            let verdict = self.rules.map_or(Verdict::Included, |rules| rules.verdict(&key));
            if verdict == Verdict::Excluded {
                if is_dir && self.skip_excluded_children {
                    trace_filter!(key = %key, "pruned excluded directory");
                    walker.skip_current_dir();
                }
                continue;
            }

            entries.push(ListedEntry {
                path: entry.full_path().to_path_buf(),
                relative,
                key,
                node: if is_dir { NodeKind::Dir } else { NodeKind::File },
                symlink,
                verdict,
            });
        }
        Ok(entries)
    }
}
