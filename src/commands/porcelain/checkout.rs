use crate::areas::database::BlobStore;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::commit_node::CommitNode;
use crate::error::RepositoryError;

impl Repository {
    /// Switch the working copy and head to `branch_name`
    pub fn checkout_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;

        let branch = BranchName::try_parse(branch_name.to_string())
            .ok()
            .filter(|branch| self.refs().branch_exists(branch))
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        if self.refs().is_current_branch(&branch)? {
            anyhow::bail!(RepositoryError::AlreadyOnBranch(branch.to_string()));
        }

        let target_id = self
            .refs()
            .read_branch(&branch)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        let current = self.head_node(&graph)?.commit().blobs();
        let target = graph.find(&target_id)?.commit().blobs();

        self.switch_working_copy(current, target)?;

        let mut index = self.index();
        index.clear();
        index.write_updates()?;
        self.refs().set_head(&branch)
    }

    /// Restore `file` from the head commit
    pub fn checkout_file(&self, file: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let head = self.head_node(&graph)?;

        self.restore_file(head, file)
    }

    /// Restore `file` from the commit named by a full or abbreviated id
    pub fn checkout_file_at(&self, commit_id: &str, file: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let node = graph.find_by_prefix(commit_id)?;

        self.restore_file(node, file)
    }

    // The staging area is left alone.
    fn restore_file(&self, node: &CommitNode, file: &str) -> anyhow::Result<()> {
        let path = self
            .relative_path(file)
            .map_err(|_| RepositoryError::FileNotInCommit(file.into()))?;
        let blob_id = node
            .commit()
            .blob(&path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(path.clone()))?;

        let content = self.database().get(blob_id)?;
        self.workspace().write_file(&path, &content)
    }
}
