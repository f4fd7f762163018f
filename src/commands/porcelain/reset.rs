use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Check out every file of a commit and move a branch pointer to it
    ///
    /// The pointer moved is the branch the commit was made on when that
    /// branch still exists, the current branch otherwise; the head follows.
    pub fn reset(&self, commit_id: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let target = graph.find_by_prefix(commit_id)?;
        let current = self.head_node(&graph)?;

        self.switch_working_copy(current.commit().blobs(), target.commit().blobs())?;

        {
            let mut index = self.index();
            index.clear();
            index.write_updates()?;
        }

        let branch = match BranchName::try_parse(target.commit().branch_label().to_string()) {
            Ok(label) if self.refs().branch_exists(&label) => label,
            _ => self.refs().current_branch()?,
        };
        tracing::debug!(branch = %branch, commit = %target.id(), "resetting branch");

        self.refs().move_head(&branch, target.id())
    }
}
