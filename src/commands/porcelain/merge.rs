use crate::areas::database::BlobStore;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::merge::resolution::{MergePlan, Resolver};
use crate::artifacts::merge::{ConflictPolicy, MergeBaseStrategy, find_merge_base};
use crate::artifacts::objects::commit::Commit;
use crate::error::RepositoryError;
use std::io::Write;

pub const ANCESTOR_NOTICE: &str = "Given branch is an ancestor of the current branch.";
pub const FAST_FORWARD_NOTICE: &str = "Current branch fast-forwarded.";
pub const CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    pub base: MergeBaseStrategy,
    pub conflicts: ConflictPolicy,
}

impl Repository {
    pub fn merge(&self, branch_name: &str, opts: &MergeOptions) -> anyhow::Result<()> {
        let mut graph = self.load_graph()?;

        if !self.index().is_empty() {
            anyhow::bail!(RepositoryError::UncommittedChanges);
        }

        let given_branch = BranchName::try_parse(branch_name.to_string())
            .ok()
            .filter(|branch| self.refs().branch_exists(branch))
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        let current_branch = self.refs().current_branch()?;
        if given_branch == current_branch {
            anyhow::bail!(RepositoryError::SelfMerge(branch_name.to_string()));
        }

        let current_id = self.head_node(&graph)?.id().clone();
        let given_id = self
            .refs()
            .read_branch(&given_branch)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        let current = graph.find(&current_id)?.commit().blobs().clone();
        let given = graph.find(&given_id)?.commit().blobs().clone();

        self.ensure_no_untracked_in_the_way(&current, &given)?;

        if graph.is_ancestor(&given_id, &current_id) {
            writeln!(self.writer(), "{ANCESTOR_NOTICE}")?;
            return Ok(());
        }
        if graph.is_ancestor(&current_id, &given_id) {
            self.switch_working_copy(&current, &given)?;
            self.refs().move_head(&current_branch, &given_id)?;
            writeln!(self.writer(), "{FAST_FORWARD_NOTICE}")?;
            return Ok(());
        }

        let base_id = find_merge_base(&graph, &current_id, &given_id, opts.base)?;
        let base = graph.find(&base_id)?.commit().blobs();
        let plan = Resolver::new(self.database(), opts.conflicts).resolve(&current, base, &given)?;
        self.write_merge_results(&plan)?;

        let message = match plan.has_conflicts() {
            true => CONFLICT_MESSAGE.to_string(),
            false => format!("Merged {given_branch} into {current_branch}"),
        };
        let commit = Commit::new(
            message,
            self.settings().now(),
            plan.apply_to(&current),
            current_branch.to_string(),
        );
        let commit_id = self.record_commit(&mut graph, &[current_id, given_id], commit)?;
        self.refs().move_head(&current_branch, &commit_id)?;

        if plan.has_conflicts() {
            tracing::debug!(paths = ?plan.conflicts(), "merge left conflicts");
            writeln!(self.writer(), "{CONFLICT_MESSAGE}")?;
        }

        Ok(())
    }

    fn write_merge_results(&self, plan: &MergePlan) -> anyhow::Result<()> {
        for path in plan.removed() {
            self.workspace().remove_file(path)?;
        }
        for (path, blob_id) in plan.staged() {
            let content = self.database().get(blob_id)?;
            self.workspace().write_file(path, &content)?;
        }

        Ok(())
    }
}
