//! Three-way reconciliation
//!
//! Every path present in the current, base or given snapshot is resolved
//! from its three ids `c`, `l` and `g` (absent sides are `None`). The clean
//! rules run first, in order:
//!
//! 1. `g != l` and `c == l`: take the given side (stage `g`, or remove the path when `g` is absent)
//! 2. `l`, `c` absent and `g` present: stage `g`
//! 3. `l` present, `g` absent and `c == l`: remove the path
//!
//! The conflict check runs last and overrides any clean outcome. Under
//! [`ConflictPolicy::SourceOrder`] a path conflicts whenever `c != g`; under
//! [`ConflictPolicy::ThreeWay`] only when both sides moved away from the base
//! in different ways.

use crate::areas::database::BlobStore;
use crate::artifacts::merge::ConflictPolicy;
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The current side stands as it is
    Keep,
    Take(ObjectId),
    Remove,
    /// Both sides kept in the stored conflict content
    Conflict(ObjectId),
}

/// Outcome of reconciling three snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    staged: BTreeMap<PathBuf, ObjectId>,
    removed: BTreeSet<PathBuf>,
    conflicts: BTreeSet<PathBuf>,
}

impl MergePlan {
    /// Paths to stage, conflicting paths included
    pub fn staged(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.staged
    }

    pub fn removed(&self) -> &BTreeSet<PathBuf> {
        &self.removed
    }

    pub fn conflicts(&self) -> &BTreeSet<PathBuf> {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// The merged snapshot: `current` without removed paths, overlaid with staged ones
    pub fn apply_to(&self, current: &Snapshot) -> Snapshot {
        current
            .iter()
            .filter(|(path, _)| !self.removed.contains(*path))
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .chain(self.staged.clone())
            .collect()
    }

    fn record(&mut self, path: &Path, resolution: Resolution) {
        match resolution {
            Resolution::Keep => {}
            Resolution::Take(oid) => {
                self.staged.insert(path.to_path_buf(), oid);
            }
            Resolution::Remove => {
                self.removed.insert(path.to_path_buf());
            }
            Resolution::Conflict(oid) => {
                self.staged.insert(path.to_path_buf(), oid);
                self.conflicts.insert(path.to_path_buf());
            }
        }
    }
}

#[derive(new)]
pub struct Resolver<'s, S: BlobStore> {
    blobs: &'s S,
    policy: ConflictPolicy,
}

impl<S: BlobStore> Resolver<'_, S> {
    pub fn resolve(
        &self,
        current: &Snapshot,
        base: &Snapshot,
        given: &Snapshot,
    ) -> anyhow::Result<MergePlan> {
        let paths = current
            .keys()
            .chain(base.keys())
            .chain(given.keys())
            .collect::<BTreeSet<_>>();

        let mut plan = MergePlan::default();
        for path in paths {
            let resolution =
                self.resolve_path(current.get(path), base.get(path), given.get(path))?;
            tracing::trace!(?path, ?resolution, "resolved path");

            plan.record(path, resolution);
        }

        tracing::debug!(
            staged = plan.staged.len(),
            removed = plan.removed.len(),
            conflicts = plan.conflicts.len(),
            "reconciled snapshots"
        );

        Ok(plan)
    }

    fn resolve_path(
        &self,
        c: Option<&ObjectId>,
        l: Option<&ObjectId>,
        g: Option<&ObjectId>,
    ) -> anyhow::Result<Resolution> {
        let mut resolution = Resolution::Keep;

        if g != l && c == l {
            resolution = g.map_or(Resolution::Remove, |g| Resolution::Take(g.clone()));
        }
        if let (None, None, Some(g)) = (l, c, g) {
            resolution = Resolution::Take(g.clone());
        }
        if l.is_some() && g.is_none() && c == l {
            resolution = Resolution::Remove;
        }

        if self.conflicts(c, l, g) {
            resolution = Resolution::Conflict(self.store_conflict(c, g)?);
        }

        Ok(resolution)
    }

    fn conflicts(&self, c: Option<&ObjectId>, l: Option<&ObjectId>, g: Option<&ObjectId>) -> bool {
        match self.policy {
            ConflictPolicy::SourceOrder => c != g,
            ConflictPolicy::ThreeWay => c != l && g != l && c != g,
        }
    }

    fn store_conflict(&self, c: Option<&ObjectId>, g: Option<&ObjectId>) -> anyhow::Result<ObjectId> {
        let current = c.map(|oid| self.blobs.get(oid)).transpose()?;
        let given = g.map(|oid| self.blobs.get(oid)).transpose()?;

        self.blobs
            .put(conflict_content(current.as_deref(), given.as_deref()))
    }
}
