#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` decides which relative paths take part in a sync. A path is
//! classified against three independent rule roles: `include` (the path must
//! match to be considered), `exclude` (matching paths are skipped) and
//! `force_sync` (matching paths are kept even when excluded). Precedence,
//! highest first, is force-sync, exclude, include.
//!
//! # Design
//!
//! - [`MatchSpec`] is the user-facing rule: a literal substring, a regular
//!   expression, a glob, a predicate, or an ordered list of those evaluated as
//!   a logical OR.
//! - [`MatchRules`] bundles the three roles and produces a [`Verdict`] for a
//!   relative path.
//! - [`relative_key`] renders a [`std::path::Path`] into the canonical matching
//!   key: components joined with `/` and a trailing `/` for directories.
//!
//! # Invariants
//!
//! - Matching always happens against `/`-separated text. Backslashes are
//!   rewritten before any rule sees the path, so rules behave identically on
//!   every platform.
//! - An absent or empty spec falls back to the default supplied by its role:
//!   include matches everything, exclude and force-sync match nothing.
//!
//! # Errors
//!
//! [`MatchSpec::pattern`] and [`MatchSpec::glob`] report [`FilterError`] when
//! the expression fails to compile.
//!
//! # Examples
//!
//! ```
//! use filters::{MatchRules, MatchSpec, Verdict};
//!
//! let rules = MatchRules::new()
//!     .exclude(MatchSpec::literal("dir1"))
//!     .force_sync(MatchSpec::literal("3"));
//!
//! assert_eq!(rules.verdict("1.txt"), Verdict::Included);
//! assert_eq!(rules.verdict("dir1/"), Verdict::Excluded);
//! assert_eq!(rules.verdict("dir1/3.txt"), Verdict::Forced);
//! ```

mod action;
mod decision;
mod error;
mod path;
mod rule;

pub use action::MatchRole;
pub use decision::{MatchRules, Verdict};
pub use error::FilterError;
pub use path::{SEPARATOR, normalize_separators, relative_key};
pub use rule::{MatchSpec, Predicate};
