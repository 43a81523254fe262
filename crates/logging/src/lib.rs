#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` centralises the diagnostics conventions shared by every crate in
//! the syncdir workspace. Each subsystem logs through a dedicated macro bound to
//! a fixed `tracing` target so operators can raise or lower verbosity per
//! subsystem with a single filter directive.
//!
//! # Design
//!
//! - The `trace_*` macros wrap the standard [`tracing`] macros with a target in
//!   the `syncdir::` namespace (see [`targets`]).
//! - [`VerbosityConfig`] maps the CLI's `-v` count and `--quiet` switch to a
//!   default level.
//! - [`init_tracing`] installs a stderr `fmt` subscriber whose filter is read
//!   from [`LOG_ENV_VAR`] when present and derived from the
//!   [`VerbosityConfig`] otherwise.
//!
//! # Invariants
//!
//! - Installing the subscriber twice is harmless; the second call is ignored.
//! - Library crates never install a subscriber themselves. Only binaries and
//!   tests call [`init_tracing`].
//!
//! # Examples
//!
//! ```
//! use logging::{VerbosityConfig, trace_copy};
//! use tracing::Level;
//!
//! let config = VerbosityConfig::from_verbose_level(2);
//! assert_eq!(config.level(), Level::DEBUG);
//!
//! trace_copy!("copied {}", "a/x");
//! ```

mod config;
mod tracing_bridge;
mod tracing_macros;

pub use config::VerbosityConfig;
pub use tracing_bridge::{LOG_ENV_VAR, default_directive, init_tracing};

/// Tracing targets used by the `trace_*` macros.
pub mod targets {
    /// Full file copies.
    pub const COPY: &str = "syncdir::copy";
    /// Hardlink and symlink materialisation.
    pub const LINK: &str = "syncdir::link";
    /// Orphan and watch-driven removals.
    pub const DELETE: &str = "syncdir::delete";
    /// Tree listing.
    pub const FLIST: &str = "syncdir::flist";
    /// Include/exclude/force-sync decisions.
    pub const FILTER: &str = "syncdir::filter";
    /// Change watcher lifecycle and dispatch.
    pub const WATCH: &str = "syncdir::watch";

    /// Every target, in the order they are documented.
    pub const ALL: [&str; 6] = [COPY, LINK, DELETE, FLIST, FILTER, WATCH];
}

#[doc(hidden)]
pub use tracing as __tracing;
