use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::event::NodeKind;

/// Every relative path seen in one pass, and whether a source accounts for it.
///
/// Seeded from the target listing with everything marked absent. Marking a
/// path present also marks its ancestors, so a directory kept only to hold a
/// force-synced file is not treated as an orphan. Iteration is in path order,
/// which puts directories before their contents.
#[derive(Debug, Default)]
pub struct PresenceMap {
    slots: BTreeMap<PathBuf, Slot>,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    node: NodeKind,
    present: bool,
}

impl PresenceMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an existing target entry as not yet accounted for.
    pub fn seed(&mut self, relative: impl Into<PathBuf>, node: NodeKind) {
        self.slots.insert(relative.into(), Slot { node, present: false });
    }

    /// Marks `relative` and all of its ancestors present.
    pub fn mark_present(&mut self, relative: &Path, node: NodeKind) {
        self.slots
            .entry(relative.to_path_buf())
            .and_modify(|slot| slot.present = true)
            .or_insert(Slot {
                node,
                present: true,
            });
        for ancestor in relative.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.slots
                .entry(ancestor.to_path_buf())
                .and_modify(|slot| slot.present = true)
                .or_insert(Slot {
                    node: NodeKind::Dir,
                    present: true,
                });
        }
    }

    /// Returns `true` when `relative` is accounted for.
    #[must_use]
    pub fn is_present(&self, relative: &Path) -> bool {
        self.slots.get(relative).is_some_and(|slot| slot.present)
    }

    /// Entries no source accounts for, in path order.
    pub fn orphans(&self) -> impl Iterator<Item = (&Path, NodeKind)> {
        self.slots
            .iter()
            .filter(|(_, slot)| !slot.present)
            .map(|(path, slot)| (path.as_path(), slot.node))
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
