use std::fs;
use std::path::{Path, PathBuf};

use logging::{trace_del, trace_flist};
use rustc_hash::FxHashMap;

use super::presence::PresenceMap;
use crate::error::SyncError;
use crate::event::{NodeKind, SyncEvent, SyncEventKind};
use crate::link::{materialize, remove_entry};
use crate::listing::{ListedEntry, TreeLister};
use crate::options::{SyncOptions, TransferMode};
use crate::roots::SyncRoot;

/// Counts gathered over one reconciliation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileReport {
    /// Entries copied, linked or created.
    pub applied: usize,
    /// Orphans removed from targets.
    pub removed: usize,
    /// Target groups abandoned because of a routed error.
    pub failed_groups: usize,
}

/// Runs one reconciliation pass over `roots`.
///
/// Under [`ErrorPolicy::Raise`](crate::ErrorPolicy::Raise) the first error
/// ends the pass and is returned.
pub fn reconcile(roots: &[SyncRoot], options: &SyncOptions) -> Result<ReconcileReport, SyncError> {
    let mut report = ReconcileReport::default();
    for group in group_by_target(roots) {
        if let Err(error) = reconcile_group(&group, options, &mut report) {
            report.failed_groups += 1;
            options.route_error(error)?;
        }
    }
    Ok(report)
}

struct TargetGroup<'a> {
    target: &'a Path,
    roots: Vec<&'a SyncRoot>,
}

impl TargetGroup<'_> {
    /// Where `root`'s target sits beneath the group target; empty for the
    /// group target itself.
    fn offset<'p>(&self, root: &'p SyncRoot) -> &'p Path {
        root.target()
            .strip_prefix(self.target)
            .unwrap_or_else(|_| Path::new(""))
    }

    /// Source path for `relative` under the innermost root whose target
    /// contains it. Ties go to the first such root.
    fn source_for(&self, relative: &Path) -> Option<PathBuf> {
        self.roots
            .iter()
            .rev()
            .filter_map(|root| {
                let offset = self.offset(root);
                relative
                    .strip_prefix(offset)
                    .ok()
                    .map(|inner| (offset.components().count(), root.source_for(inner)))
            })
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, source)| source)
    }
}

/// Groups roots by their outermost target: a target nested inside another
/// root's target joins that root's group, so deletions in the outer target
/// see everything written beneath it. Roots keep their input order.
fn group_by_target(roots: &[SyncRoot]) -> Vec<TargetGroup<'_>> {
    let mut groups: Vec<TargetGroup<'_>> = Vec::new();
    for root in roots {
        let target = outermost_target(roots, root.target());
        match groups.iter_mut().find(|group| group.target == target) {
            Some(group) => group.roots.push(root),
            None => groups.push(TargetGroup {
                target,
                roots: vec![root],
            }),
        }
    }
    groups
}

fn outermost_target<'a>(roots: &'a [SyncRoot], target: &'a Path) -> &'a Path {
    roots
        .iter()
        .map(SyncRoot::target)
        .filter(|candidate| target.starts_with(candidate))
        .min_by_key(|candidate| candidate.components().count())
        .unwrap_or(target)
}

struct Planned<'a> {
    root: &'a SyncRoot,
    entry: ListedEntry,
    /// Path relative to the group target.
    slot: PathBuf,
}

fn reconcile_group(
    group: &TargetGroup<'_>,
    options: &SyncOptions,
    report: &mut ReconcileReport,
) -> Result<(), SyncError> {
    for root in &group.roots {
        fs::create_dir_all(root.target())
            .map_err(|error| SyncError::io("create target directory", root.target(), error))?;
    }

    let mut presence = PresenceMap::new();
    for existing in TreeLister::for_target(options).list(group.target)? {
        presence.seed(existing.relative(), existing.node());
    }

    let plan = plan_group(group, options)?;
    trace_flist!(
        target = %group.target.display(),
        sources = group.roots.len(),
        entries = plan.len(),
        existing = presence.len(),
        "planned reconciliation"
    );
    for root in &group.roots {
        let offset = group.offset(root);
        if !offset.as_os_str().is_empty() {
            presence.mark_present(offset, NodeKind::Dir);
        }
    }
    for planned in &plan {
        presence.mark_present(&planned.slot, planned.entry.node());
    }

    let kind = match options.mode() {
        TransferMode::Copy => SyncEventKind::InitCopy,
        TransferMode::Hardlink => SyncEventKind::InitHardlink,
    };
    for Planned { root, entry, .. } in &plan {
        let target = root.target_for(entry.relative());
        let Some(node) = materialize(
            entry.path(),
            &target,
            options.mode(),
            options.preserve_symlinks(),
            options.registry(),
        ) else {
            continue;
        };
        report.applied += 1;
        let event = SyncEvent::new(kind, node, entry.display_path(), entry.path(), target);
        if let Err(error) = options.emit(&event) {
            options.route_error(error)?;
        }
    }

    if options.delete_orphaned() {
        delete_orphans(group, &presence, options, report)?;
    }
    Ok(())
}

/// Lists every source of the group and checks that no two of them claim the
/// same non-directory target path. Nested targets claim their own directory.
fn plan_group<'a>(
    group: &TargetGroup<'a>,
    options: &SyncOptions,
) -> Result<Vec<Planned<'a>>, SyncError> {
    let lister = TreeLister::for_source(options);
    let mut claims: FxHashMap<PathBuf, (PathBuf, NodeKind)> = FxHashMap::default();
    let mut plan = Vec::new();

    let mut claim = |slot: &Path, source: &Path, node: NodeKind| -> Result<(), SyncError> {
        if let Some((owner, existing)) = claims.get(slot) {
            if existing.is_dir() && node.is_dir() {
                return Ok(());
            }
            return Err(SyncError::ConflictingTarget {
                target: group.target.join(slot),
                first: owner.clone(),
                second: source.to_path_buf(),
            });
        }
        claims.insert(slot.to_path_buf(), (source.to_path_buf(), node));
        Ok(())
    };

    for &root in &group.roots {
        let offset = group.offset(root);
        if !offset.as_os_str().is_empty() {
            claim(offset, root.source(), NodeKind::Dir)?;
        }
        for entry in lister.list(root.source())? {
            let slot = offset.join(entry.relative());
            claim(&slot, entry.path(), entry.node())?;
            plan.push(Planned { root, entry, slot });
        }
    }
    Ok(plan)
}

fn delete_orphans(
    group: &TargetGroup<'_>,
    presence: &PresenceMap,
    options: &SyncOptions,
    report: &mut ReconcileReport,
) -> Result<(), SyncError> {
    let registry = options.registry();
    for (relative, _) in presence.orphans() {
        let shielded = group.roots.iter().any(|root| {
            relative
                .strip_prefix(group.offset(root))
                .is_ok_and(|inner| registry.covers(&root.source_for(inner)))
        });
        if shielded {
            trace_del!(path = %relative.display(), "kept: beneath a preserved symlink");
            continue;
        }

        let target = group.target.join(relative);
        let Some(node) = remove_entry(&target) else {
            continue;
        };
        report.removed += 1;
        let kind = match node {
            NodeKind::Dir => SyncEventKind::UnlinkDir,
            NodeKind::File => SyncEventKind::Unlink,
        };
        let source = group
            .source_for(relative)
            .unwrap_or_else(|| group.roots[0].source_for(relative));
        let display = filters::relative_key(relative, false);
        let event = SyncEvent::new(kind, node, display, source, target);
        if let Err(error) = options.emit(&event) {
            options.route_error(error)?;
        }
    }
    Ok(())
}
