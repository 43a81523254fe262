#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `syncdir-core` is the entry point for embedding syncdir. [`sync`] takes
//! one or more source directories, the same number of target directories and
//! a [`SyncOptions`] value; it checks the inputs, brings every target in line
//! with its source and optionally keeps watching the sources afterwards.
//!
//! # Design
//!
//! - Inputs arrive as a [`PathList`], so a single path and a list of paths
//!   are accepted alike.
//! - [`SyncRoots`] pairs and validates them before anything is written.
//! - The reconciliation pass and the watcher come from the `engine` crate.
//!   The types a caller needs from it are re-exported here.
//!
//! # Errors
//!
//! Everything is reported as [`SyncError`], routed through the configured
//! [`ErrorPolicy`] before it reaches the caller.
//!
//! # Examples
//!
//! ```no_run
//! use syncdir_core::{SyncOptions, TransferMode, sync};
//!
//! let options = SyncOptions::builder()
//!     .mode(TransferMode::Hardlink)
//!     .delete_orphaned(true)
//!     .watch(true)
//!     .build();
//! let handle = sync("/srv/incoming", "/srv/published", options)?;
//! if let Some(mut handle) = handle {
//!     handle.stop();
//! }
//! # Ok::<(), syncdir_core::SyncError>(())
//! ```

mod input;
mod roots;
mod session;

pub use engine::{
    ChangeKind, ErrorPolicy, LinkRegistry, NodeKind, ReconcileReport, SyncError, SyncEvent,
    SyncEventKind, SyncOptions, SyncOptionsBuilder, SyncRoot, TransferMode,
    WatchBackendOptions, WatchEvent, WatchHandle,
};
pub use filters::{MatchRules, MatchSpec, Verdict};
pub use input::PathList;
pub use roots::SyncRoots;
#[cfg(feature = "async")]
#[cfg_attr(docsrs, doc(cfg(feature = "async")))]
pub use session::sync_async;
pub use session::{sync, sync_roots};
