use std::fmt;
use std::sync::Arc;

use globset::GlobMatcher;
use regex::Regex;

use crate::error::FilterError;
use crate::path::normalize_separators;

/// Caller-supplied matcher invoked with the normalised relative path.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A single path rule.
///
/// Every variant is evaluated against the `/`-separated relative key produced
/// by [`relative_key`](crate::relative_key). Literals and patterns search
/// anywhere inside the key, globs must cover the whole key, and lists succeed
/// when any element does.
#[derive(Clone)]
pub enum MatchSpec {
    /// Matches when the key contains the text.
    Literal(String),
    /// Matches when the expression finds a match anywhere in the key.
    ///
    /// The search is unanchored, so `tmp` excludes `a/tmp/b` just as the
    /// literal `tmp` would. Write `^...$` to require the whole key.
    Pattern(Regex),
    /// Matches when the glob covers the key.
    Glob(GlobMatcher),
    /// Matches when the predicate returns `true`.
    Predicate(Predicate),
    /// Matches when any element matches.
    List(Vec<MatchSpec>),
}

impl MatchSpec {
    /// Creates a substring rule.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Compiles a regular expression rule.
    ///
    /// The expression is searched for, not matched against the whole key.
    /// Anchor it with `^` and `$` to match one exact key.
    pub fn pattern(expression: &str) -> Result<Self, FilterError> {
        Regex::new(expression)
            .map(Self::Pattern)
            .map_err(|source| FilterError::Pattern {
                pattern: expression.to_owned(),
                source,
            })
    }

    /// Compiles a glob rule. `*` does not cross `/`; use `**` for that.
    pub fn glob(pattern: &str) -> Result<Self, FilterError> {
        let glob = globset::GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| FilterError::Glob {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(Self::Glob(glob.compile_matcher()))
    }

    /// Wraps a predicate.
    #[must_use]
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Builds an OR-list.
    #[must_use]
    pub fn list<I>(specs: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Self>,
    {
        Self::List(specs.into_iter().map(Into::into).collect())
    }

    /// Reports whether the spec carries no rule at all.
    ///
    /// An empty literal, or a list whose elements are all empty, counts as
    /// absent so the role default applies instead.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Literal(text) => text.is_empty(),
            Self::List(items) => items.iter().all(Self::is_empty),
            Self::Pattern(_) | Self::Glob(_) | Self::Predicate(_) => false,
        }
    }

    /// Evaluates the spec against a relative key.
    ///
    /// Backslashes in `key` are rewritten to `/` before evaluation.
    #[must_use]
    pub fn matches(&self, key: &str) -> bool {
        let key = normalize_separators(key);
        self.matches_normalized(&key)
    }

    pub(crate) fn matches_normalized(&self, key: &str) -> bool {
        match self {
            Self::Literal(text) => !text.is_empty() && key.contains(text.as_str()),
            Self::Pattern(regex) => regex.is_match(key),
            Self::Glob(glob) => glob.is_match(key),
            Self::Predicate(predicate) => predicate(key),
            Self::List(items) => items.iter().any(|item| item.matches_normalized(key)),
        }
    }
}

impl fmt::Debug for MatchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
            Self::Glob(glob) => f.debug_tuple("Glob").field(&glob.glob().glob()).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

impl From<&str> for MatchSpec {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for MatchSpec {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<Regex> for MatchSpec {
    fn from(regex: Regex) -> Self {
        Self::Pattern(regex)
    }
}

impl From<Vec<MatchSpec>> for MatchSpec {
    fn from(items: Vec<MatchSpec>) -> Self {
        Self::List(items)
    }
}
