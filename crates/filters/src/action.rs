use std::fmt;

/// Role a [`MatchSpec`](crate::MatchSpec) plays inside [`MatchRules`](crate::MatchRules).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum MatchRole {
    /// Paths must match to be considered at all.
    Include,
    /// Matching paths are skipped unless force-synced.
    Exclude,
    /// Matching paths are synced even when excluded.
    ForceSync,
}

impl MatchRole {
    /// Result used when the role has no spec, or an empty one.
    #[must_use]
    pub const fn default_outcome(self) -> bool {
        matches!(self, Self::Include)
    }
}

impl fmt::Display for MatchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Include => f.write_str("include"),
            Self::Exclude => f.write_str("exclude"),
            Self::ForceSync => f.write_str("force-sync"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MatchRole;

    #[test]
    fn display_variants_matches_expected_tokens() {
        let cases = [
            (MatchRole::Include, "include"),
            (MatchRole::Exclude, "exclude"),
            (MatchRole::ForceSync, "force-sync"),
        ];

        for (role, expected) in cases {
            assert_eq!(role.to_string(), expected);
        }
    }

    #[test]
    fn only_include_defaults_to_match() {
        assert!(MatchRole::Include.default_outcome());
        assert!(!MatchRole::Exclude.default_outcome());
        assert!(!MatchRole::ForceSync.default_outcome());
    }
}
