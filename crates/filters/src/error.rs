use thiserror::Error;

/// Error produced when a rule cannot be compiled into a matcher.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A regular expression failed to compile.
    #[error("failed to compile path pattern '{pattern}': {source}")]
    Pattern {
        /// Offending expression.
        pattern: String,
        /// Underlying compiler error.
        #[source]
        source: regex::Error,
    },
    /// A glob failed to compile.
    #[error("failed to compile glob '{pattern}': {source}")]
    Glob {
        /// Offending glob.
        pattern: String,
        /// Underlying compiler error.
        #[source]
        source: globset::Error,
    },
}

impl FilterError {
    /// Returns the offending pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Pattern { pattern, .. } | Self::Glob { pattern, .. } => pattern,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FilterError;
    use crate::MatchSpec;
    use std::error::Error as _;

    #[test]
    fn filter_error_preserves_pattern_and_source() {
        let error = MatchSpec::pattern("(").unwrap_err();

        assert_eq!(error.pattern(), "(");
        assert!(error.to_string().contains("failed to compile"));
        assert!(error.source().is_some());
    }

    #[test]
    fn glob_error_is_reported_as_glob() {
        let error = MatchSpec::glob("[").unwrap_err();
        assert!(matches!(error, FilterError::Glob { .. }));
        assert_eq!(error.pattern(), "[");
    }
}
