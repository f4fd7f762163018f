//! Staging area
//!
//! Pending changes layered on top of the current commit: files staged for
//! addition (path to blob id) and paths staged for removal. A path is never
//! in both sets at once. Every successful commit, checkout, reset and merge
//! clears the staging area.
//!
//! Both sets are persisted as checksummed records (see
//! [`crate::artifacts::index`]); a record is deleted when its set is empty.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{RecordEntry, RemovedPath, StagedFile};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{
    ADDITIONS_SIGNATURE, HEADER_SIZE, REMOVALS_SIGNATURE, VERSION,
};
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// File name of the additions record
pub const ADDITIONS_FILE: &str = "index";

/// File name of the removals record
pub const REMOVALS_FILE: &str = "removals";

#[derive(Debug, Clone)]
pub struct Index {
    /// Repository metadata directory holding both records
    path: Box<Path>,
    additions: BTreeMap<PathBuf, ObjectId>,
    removals: BTreeSet<PathBuf>,
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    /// Load both records from disk, verifying their checksums
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on each record while reading it.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions = read_record::<StagedFile>(&self.additions_path(), ADDITIONS_SIGNATURE)?
            .into_iter()
            .map(|entry| (entry.path, entry.oid))
            .collect();
        self.removals = read_record::<RemovedPath>(&self.removals_path(), REMOVALS_SIGNATURE)?
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        self.changed = false;

        tracing::debug!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "loaded staging area"
        );

        Ok(())
    }

    /// Stage `path` at `oid`, clearing any removal mark
    pub fn stage_add(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
        self.changed = true;
    }

    /// Mark `path` for removal
    ///
    /// Only a path tracked by the current commit or currently staged can be
    /// removed; anything else fails with `NothingToRemove`.
    pub fn stage_remove(&mut self, path: PathBuf, tracked: bool) -> anyhow::Result<()> {
        if !tracked && !self.additions.contains_key(&path) {
            anyhow::bail!(RepositoryError::NothingToRemove(path));
        }

        self.additions.remove(&path);
        self.removals.insert(path);
        self.changed = true;

        Ok(())
    }

    /// Drop `path` from both sets
    pub fn unstage(&mut self, path: &Path) {
        let removed_addition = self.additions.remove(path).is_some();
        let removed_mark = self.removals.remove(path);
        self.changed |= removed_addition || removed_mark;
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }
        self.additions.clear();
        self.removals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    /// The snapshot a commit made now would hold: `head` without removed
    /// paths, overlaid with staged additions
    pub fn staged_snapshot(&self, head: &Snapshot) -> Snapshot {
        head.iter()
            .filter(|(path, _)| !self.removals.contains(*path))
            .map(|(path, oid)| (path.clone(), oid.clone()))
            .chain(self.additions.clone())
            .collect()
    }

    pub fn staged_oid(&self, path: &Path) -> Option<&ObjectId> {
        self.additions.get(path)
    }

    pub fn is_staged(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_marked_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    /// Persist both records if anything changed since loading
    ///
    /// # Locking
    ///
    /// Acquires an exclusive lock on each record while writing it.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let additions = self
            .additions
            .iter()
            .map(|(path, oid)| StagedFile::new(path.clone(), oid.clone()))
            .collect::<Vec<_>>();
        write_record(&self.additions_path(), ADDITIONS_SIGNATURE, &additions)?;

        let removals = self
            .removals
            .iter()
            .map(|path| RemovedPath::new(path.clone()))
            .collect::<Vec<_>>();
        write_record(&self.removals_path(), REMOVALS_SIGNATURE, &removals)?;

        self.changed = false;

        Ok(())
    }

    fn additions_path(&self) -> PathBuf {
        self.path.join(ADDITIONS_FILE)
    }

    fn removals_path(&self) -> PathBuf {
        self.path.join(REMOVALS_FILE)
    }
}

fn read_record<E: RecordEntry>(path: &Path, signature: &str) -> anyhow::Result<Vec<E>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let mut record_file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("failed to open staging record at {:?}", path))?;
    let mut lock = file_guard::lock(&mut record_file, file_guard::Lock::Shared, 0, 1)?;

    if lock.deref_mut().metadata()?.len() == 0 {
        return Ok(Vec::new());
    }

    let mut reader = Checksum::new(lock);

    let header_bytes = reader.read(HEADER_SIZE)?;
    let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;
    if header.marker != signature {
        return Err(RepositoryError::corrupt(format!(
            "invalid signature in staging record {:?}",
            path
        ))
        .into());
    }
    if header.version != VERSION {
        return Err(RepositoryError::corrupt(format!(
            "unsupported staging record version: {}",
            header.version
        ))
        .into());
    }

    let entries = (0..header.entries_count)
        .map(|_| E::read_from(&mut reader))
        .collect::<anyhow::Result<Vec<_>>>()?;

    reader.verify()?;

    Ok(entries)
}

fn write_record<E: RecordEntry>(path: &Path, signature: &str, entries: &[E]) -> anyhow::Result<()> {
    if entries.is_empty() {
        if path.exists() {
            std::fs::remove_file(path)
                .with_context(|| format!("failed to remove staging record at {:?}", path))?;
        }
        return Ok(());
    }

    let mut record_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("failed to open staging record at {:?}", path))?;
    let lock = file_guard::lock(&mut record_file, file_guard::Lock::Exclusive, 0, 1)?;

    let mut writer = Checksum::new(lock);

    let header = IndexHeader::new(signature.to_string(), VERSION, entries.len() as u32);
    writer.write(&header.serialize()?)?;

    for entry in entries {
        entry.write_to(&mut writer)?;
    }

    writer.write_checksum()
}
