//! crates/logging/src/tracing_macros.rs
//! Convenience macros for syncdir-specific tracing.
//!
//! These macros provide ergonomic wrappers around standard tracing macros
//! with appropriate targets for syncdir subsystems.

/// Emit a copy operation trace.
///
/// # Example
/// ```ignore
/// trace_copy!("copying {}", path);
/// ```
#[macro_export]
macro_rules! trace_copy {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "syncdir::copy", $($arg)*);
    };
}

/// Emit a hardlink or symlink operation trace.
///
/// # Example
/// ```ignore
/// trace_link!("linked {}", path);
/// ```
#[macro_export]
macro_rules! trace_link {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "syncdir::link", $($arg)*);
    };
}

/// Emit a deletion operation trace.
///
/// # Example
/// ```ignore
/// trace_del!("deleting {}", path);
/// ```
#[macro_export]
macro_rules! trace_del {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "syncdir::delete", $($arg)*);
    };
}

/// Emit a tree listing trace.
///
/// # Example
/// ```ignore
/// trace_flist!("listed {} entries", count);
/// ```
#[macro_export]
macro_rules! trace_flist {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "syncdir::flist", $($arg)*);
    };
}

/// Emit a filter decision trace.
///
/// # Example
/// ```ignore
/// trace_filter!("excluded {}", path);
/// ```
#[macro_export]
macro_rules! trace_filter {
    ($($arg:tt)*) => {
        $crate::__tracing::trace!(target: "syncdir::filter", $($arg)*);
    };
}

/// Emit a watcher trace.
///
/// # Example
/// ```ignore
/// trace_watch!("event {:?} for {}", kind, path);
/// ```
#[macro_export]
macro_rules! trace_watch {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "syncdir::watch", $($arg)*);
    };
}
