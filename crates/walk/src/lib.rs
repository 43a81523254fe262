#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` enumerates a directory tree in a stable depth-first order. Every
//! directory is read completely and its children are sorted by name before any
//! of them is yielded, so two walks over the same tree always produce the same
//! sequence regardless of the order the filesystem hands entries back.
//!
//! # Design
//!
//! - [`WalkBuilder`] configures the traversal: whether the root itself is
//!   yielded, whether directory symlinks are followed, and an optional depth
//!   bound.
//! - [`Walker`] implements [`Iterator`] and yields [`WalkEntry`] values.
//!   Directories are yielded before their contents. Callers that decide a
//!   directory is not interesting call [`Walker::skip_current_dir`] right after
//!   receiving it to prune the subtree.
//! - [`WalkError`] records the failing path and operation.
//!
//! # Invariants
//!
//! - Relative paths never contain `..` and never escape the root.
//! - With symlink following enabled, a directory is never entered while it is
//!   already being walked higher up the stack. Links pointing at an ancestor
//!   are yielded but not descended into; links to siblings are walked.
//! - An entry that disappears between reading its parent and inspecting it is
//!   skipped rather than reported. Concurrent mutation of the tree is expected.
//!
//! # Errors
//!
//! Failing to inspect the root, read a directory, or canonicalise a directory
//! ends the walk with a [`WalkError`]. The iterator yields the error once and
//! then returns `None`.
//!
//! # Examples
//!
//! ```
//! use walk::WalkBuilder;
//! use std::fs;
//! use std::path::PathBuf;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let root = temp.path();
//! fs::create_dir_all(root.join("a/deep"))?;
//! fs::write(root.join("a/deep/x.txt"), b"x")?;
//! fs::write(root.join("b.txt"), b"b")?;
//!
//! let shallow: Vec<PathBuf> = WalkBuilder::new(root)
//!     .include_root(false)
//!     .max_depth(Some(1))
//!     .build()?
//!     .map(|entry| entry.map(|e| e.relative_path().to_path_buf()))
//!     .collect::<Result<_, _>>()?;
//!
//! assert_eq!(shallow, vec![PathBuf::from("a"), PathBuf::from("b.txt")]);
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod builder;
mod entry;
mod error;
mod walker;

pub use builder::WalkBuilder;
pub use entry::WalkEntry;
pub use error::{WalkError, WalkErrorKind};
pub use walker::Walker;
