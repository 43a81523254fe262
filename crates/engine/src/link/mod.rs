//! Link Materializer and the preserved-symlink registry.
//!
//! [`materialize`] makes one target entry mirror one source entry, as a full
//! copy or as a hardlink, and [`remove_entry`] deletes a target entry. Both
//! swallow per-entry filesystem failures: they are logged at `debug` and the
//! next pass repairs whatever was left behind.

mod identity;
mod materializer;
mod registry;

pub use identity::FileIdentity;
pub use materializer::{LINK_MTIME_OFFSET, materialize, remove_entry};
pub use registry::LinkRegistry;
