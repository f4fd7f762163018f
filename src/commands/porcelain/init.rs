use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::commit::{Commit, DEFAULT_BRANCH};
use crate::error::RepositoryError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!(RepositoryError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;
        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .gitlet/refs/heads directory")?;

        let root = Commit::initial();
        let root_id = self.database().store(&root)?;
        let graph = CommitGraph::with_root(root)?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs()
            .move_head(&default_branch, &root_id)
            .context("Failed to create initial HEAD reference")?;
        self.history().save(&graph)?;

        tracing::debug!(root = %root_id, path = ?self.path(), "initialized repository");

        Ok(())
    }
}
