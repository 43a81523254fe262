use logging::trace_filter;

use crate::action::MatchRole;
use crate::path::normalize_separators;
use crate::rule::MatchSpec;

/// Outcome of classifying a relative path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Verdict {
    /// Matched the force-sync rule; synced regardless of the other roles.
    Forced,
    /// Passed the include rule and did not match the exclude rule.
    Included,
    /// Failed the include rule or matched the exclude rule.
    Excluded,
}

impl Verdict {
    /// Returns `true` for [`Verdict::Forced`] and [`Verdict::Included`].
    #[must_use]
    pub const fn is_synced(self) -> bool {
        matches!(self, Self::Forced | Self::Included)
    }
}

/// The include, exclude and force-sync rules of one sync.
#[derive(Clone, Debug, Default)]
pub struct MatchRules {
    include: Option<MatchSpec>,
    exclude: Option<MatchSpec>,
    force_sync: Option<MatchSpec>,
}

impl MatchRules {
    /// Rules that include everything and exclude nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the include rule.
    #[must_use]
    #[doc(alias = "--include")]
    pub fn include(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.include = Some(spec.into());
        self
    }

    /// Sets the exclude rule.
    #[must_use]
    #[doc(alias = "--exclude")]
    #[doc(alias = "-e")]
    pub fn exclude(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.exclude = Some(spec.into());
        self
    }

    /// Sets the force-sync rule.
    #[must_use]
    #[doc(alias = "--force-sync")]
    pub fn force_sync(mut self, spec: impl Into<MatchSpec>) -> Self {
        self.force_sync = Some(spec.into());
        self
    }

    /// Returns the spec configured for `role`, if any.
    #[must_use]
    pub fn spec(&self, role: MatchRole) -> Option<&MatchSpec> {
        match role {
            MatchRole::Include => self.include.as_ref(),
            MatchRole::Exclude => self.exclude.as_ref(),
            MatchRole::ForceSync => self.force_sync.as_ref(),
        }
    }

    /// Evaluates one role, falling back to its default when unset or empty.
    #[must_use]
    pub fn matches(&self, role: MatchRole, key: &str) -> bool {
        let key = normalize_separators(key);
        self.matches_normalized(role, &key)
    }

    fn matches_normalized(&self, role: MatchRole, key: &str) -> bool {
        match self.spec(role) {
            Some(spec) if !spec.is_empty() => spec.matches_normalized(key),
            _ => role.default_outcome(),
        }
    }

    /// Classifies a relative key.
    ///
    /// Force-sync wins over everything, then a failed include or a matching
    /// exclude skips the path.
    #[must_use]
    pub fn verdict(&self, key: &str) -> Verdict {
        let key = normalize_separators(key);
        let verdict = if self.matches_normalized(MatchRole::ForceSync, &key) {
            Verdict::Forced
        } else if !self.matches_normalized(MatchRole::Include, &key)
            || self.matches_normalized(MatchRole::Exclude, &key)
        {
            Verdict::Excluded
        } else {
            Verdict::Included
        };
        trace_filter!(key = %key, ?verdict, "classified path");
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchRules, Verdict};
    use crate::{MatchRole, MatchSpec};

    #[test]
    fn default_rules_include_everything() {
        let rules = MatchRules::new();
        assert_eq!(rules.verdict("a.txt"), Verdict::Included);
        assert_eq!(rules.verdict("dir/"), Verdict::Included);
    }

    #[test]
    fn include_restricts_the_candidates() {
        let rules = MatchRules::new().include(MatchSpec::pattern(r"\.rs$").unwrap());
        assert_eq!(rules.verdict("src/lib.rs"), Verdict::Included);
        assert_eq!(rules.verdict("README.md"), Verdict::Excluded);
    }

    #[test]
    fn force_sync_beats_include_and_exclude() {
        let rules = MatchRules::new()
            .include("nothing-matches-this")
            .exclude("secret")
            .force_sync("secret/keep");
        assert_eq!(rules.verdict("secret/keep.txt"), Verdict::Forced);
        assert_eq!(rules.verdict("secret/drop.txt"), Verdict::Excluded);
    }

    #[test]
    fn empty_specs_fall_back_to_role_defaults() {
        let rules = MatchRules::new().include("").exclude("").force_sync("");
        assert!(rules.matches(MatchRole::Include, "x"));
        assert!(!rules.matches(MatchRole::Exclude, "x"));
        assert_eq!(rules.verdict("x"), Verdict::Included);
    }

    #[test]
    fn verdict_reports_sync_membership() {
        assert!(Verdict::Forced.is_synced());
        assert!(Verdict::Included.is_synced());
        assert!(!Verdict::Excluded.is_synced());
    }
}
