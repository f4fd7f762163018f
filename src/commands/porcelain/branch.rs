use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::error::RepositoryError;

impl Repository {
    /// Create `branch_name` pointing at the head commit, without checking it out
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<()> {
        self.load_graph()?;
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &head)
    }

    /// Delete the pointer only; commits made on the branch stay in the graph
    pub fn rm_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        self.load_graph()?;
        let branch_name = BranchName::try_parse(branch_name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(branch_name.to_string()))?;

        let oid = self.refs().delete_branch(&branch_name)?;
        tracing::debug!(branch = %branch_name, commit = %oid, "deleted branch");

        Ok(())
    }
}
