#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `engine` mirrors source directory trees into target trees. It provides the
//! one-shot [`reconcile`](fn@reconcile) pass, the live [`start_watch`] session that follows
//! later changes, and the pieces both are built from: the rule-filtered
//! [`TreeLister`], the [`materialize`]/[`remove_entry`] primitives and the
//! [`LinkRegistry`] of preserved symlinks.
//!
//! # Design
//!
//! - [`SyncOptions`] is an immutable, cheaply cloned session configuration
//!   built with [`SyncOptions::builder`]. Callbacks live behind `Arc`.
//! - Every entry is classified by its `/`-separated relative key through
//!   [`filters::MatchRules`]; reconciliation and watching apply the same
//!   rules.
//! - Each applied operation is reported as a [`SyncEvent`] to the after-sync
//!   callback, synchronously and in order.
//! - Errors flow through [`ErrorPolicy`]: raised to the caller by default, or
//!   handed to a sink so the session continues.
//!
//! # Invariants
//!
//! - Running [`reconcile`](fn@reconcile) twice with unchanged sources is a no-op the second
//!   time.
//! - With orphan deletion on and no rules, a pass leaves each target holding
//!   exactly the entries of its sources.
//! - In [`TransferMode::Copy`] a target file never shares an inode with its
//!   source.
//!
//! # Errors
//!
//! Per-entry filesystem failures inside [`materialize`] and [`remove_entry`]
//! are logged and swallowed; the next pass repairs them. Everything else is a
//! [`SyncError`].
//!
//! # Examples
//!
//! ```no_run
//! use engine::{SyncOptions, SyncRoot, reconcile};
//!
//! let options = SyncOptions::builder()
//!     .delete_orphaned(true)
//!     .exclude("tmp")
//!     .build();
//! let roots = [SyncRoot::new("/data/src", "/data/mirror")];
//! let report = reconcile(&roots, &options)?;
//! println!("{} applied, {} removed", report.applied, report.removed);
//! # Ok::<(), engine::SyncError>(())
//! ```

mod error;
mod event;
pub mod link;
pub mod listing;
mod options;
pub mod reconcile;
mod roots;
pub mod watch;

pub use error::{CallbackError, ErrorCallback, ErrorPolicy, SyncError};
pub use event::{ChangeKind, NodeKind, SyncEvent, SyncEventKind, WatchEvent};
pub use link::{LinkRegistry, materialize, remove_entry};
pub use listing::{ListedEntry, TreeLister};
pub use options::{
    AfterSyncCallback, SyncOptions, SyncOptionsBuilder, TransferMode, WatchBackendOptions,
    WatchEventCallback,
};
pub use reconcile::{ReconcileReport, reconcile};
pub use roots::SyncRoot;
pub use watch::{WatchHandle, start_watch};
