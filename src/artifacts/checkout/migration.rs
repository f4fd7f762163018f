use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Planned working copy changes to move from one snapshot to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    /// Tracked files the target does not have
    deletions: BTreeSet<PathBuf>,
    /// Every file of the target with the blob to write
    writes: BTreeMap<PathBuf, ObjectId>,
}

impl Migration {
    pub fn plan(current: &Snapshot, target: &Snapshot) -> Self {
        let deletions = current
            .keys()
            .filter(|path| !target.contains_key(*path))
            .cloned()
            .collect();

        Migration {
            deletions,
            writes: target.clone(),
        }
    }

    pub fn deletions(&self) -> &BTreeSet<PathBuf> {
        &self.deletions
    }

    pub fn writes(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.writes
    }
}
