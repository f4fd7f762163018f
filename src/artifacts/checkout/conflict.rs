use crate::areas::index::Index;
use crate::artifacts::objects::commit::Snapshot;
use crate::error::RepositoryError;
use std::path::PathBuf;

/// Working files that would be overwritten although nothing tracks them
///
/// A file is in the way when it exists in the working copy, is neither
/// tracked by the current commit nor staged, and the target snapshot has a
/// version of it.
pub fn untracked_in_the_way(
    workspace_files: &[PathBuf],
    current: &Snapshot,
    index: &Index,
    target: &Snapshot,
) -> Vec<PathBuf> {
    workspace_files
        .iter()
        .filter(|path| {
            !current.contains_key(*path) && !index.is_staged(path) && target.contains_key(*path)
        })
        .cloned()
        .collect()
}

/// Fail with `UntrackedFileConflict` when any untracked file is in the way
pub fn ensure_nothing_in_the_way(
    workspace_files: &[PathBuf],
    current: &Snapshot,
    index: &Index,
    target: &Snapshot,
) -> anyhow::Result<()> {
    let in_the_way = untracked_in_the_way(workspace_files, current, index, target);

    if !in_the_way.is_empty() {
        tracing::debug!(files = ?in_the_way, "untracked files block the working copy update");
        anyhow::bail!(RepositoryError::UntrackedFileConflict(in_the_way));
    }

    Ok(())
}
