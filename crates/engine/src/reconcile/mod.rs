//! Reconciler: the initial full pass that makes each target tree mirror the
//! union of the source trees mapped into it.
//!
//! # Design
//!
//! Roots are grouped by their outermost target directory: a target nested
//! inside another root's target belongs to the outer group. Every source of a
//! group is listed before anything is written, so conflicts are found while
//! the target is still untouched and orphan deletion sees the union of all
//! sources.
//!
//! # Errors
//!
//! A listing failure or a conflict aborts the group it belongs to and is
//! routed through the session's [`ErrorPolicy`](crate::ErrorPolicy); under a
//! sink the next group still runs. Callback failures are routed per entry.

mod pass;
mod presence;

pub use pass::{ReconcileReport, reconcile};
pub use presence::PresenceMap;

#[cfg(test)]
mod tests;
