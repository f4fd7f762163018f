use crate::areas::index::Index;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Colorize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    /// Compare the head snapshot, the staging area and the working files
    ///
    /// `workspace` maps every working file to the id its content would get.
    pub fn collect(
        branches: Vec<BranchName>,
        current_branch: BranchName,
        head: &Snapshot,
        index: &Index,
        workspace: &BTreeMap<PathBuf, ObjectId>,
    ) -> Self {
        let mut workspace_changeset = ChangeSet::new();

        for (path, tracked_oid) in head {
            if index.is_staged(path) || index.is_marked_for_removal(path) {
                continue;
            }
            match workspace.get(path) {
                None => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != tracked_oid => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        for (path, staged_oid) in index.additions() {
            match workspace.get(path) {
                None => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
                Some(oid) if oid != staged_oid => {
                    workspace_changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        // a file marked for removal but present again is untracked
        let untracked_files = workspace
            .keys()
            .filter(|path| {
                !index.is_staged(path)
                    && (!head.contains_key(*path) || index.is_marked_for_removal(path))
            })
            .cloned()
            .collect();

        StatusInfo {
            branches,
            current_branch,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            workspace_changeset,
            untracked_files,
        }
    }

    pub fn write_to(&self, writer: &mut impl Write) -> anyhow::Result<()> {
        writeln!(writer, "=== Branches ===")?;
        for branch in &self.branches {
            if branch == &self.current_branch {
                writeln!(writer, "{}", format!("*{branch}").green())?;
            } else {
                writeln!(writer, "{branch}")?;
            }
        }
        writeln!(writer)?;

        writeln!(writer, "=== Staged Files ===")?;
        for file in &self.staged_files {
            writeln!(writer, "{}", file.display().to_string().green())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Removed Files ===")?;
        for file in &self.removed_files {
            writeln!(writer, "{}", file.display().to_string().red())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Modifications Not Staged For Commit ===")?;
        for (file, change) in &self.workspace_changeset {
            writeln!(writer, "{} {change}", file.display())?;
        }
        writeln!(writer)?;

        writeln!(writer, "=== Untracked Files ===")?;
        for file in &self.untracked_files {
            writeln!(writer, "{}", file.display())?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
