//! Tree Lister: rule-filtered listings of a directory tree.

mod lister;

pub use lister::{ListedEntry, TreeLister};
