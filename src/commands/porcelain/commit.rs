use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::error::RepositoryError;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        let mut graph = self.load_graph()?;

        if self.index().is_empty() {
            anyhow::bail!(RepositoryError::NothingStaged);
        }
        if message.trim().is_empty() {
            anyhow::bail!(RepositoryError::EmptyCommitMessage);
        }

        let branch = self.refs().current_branch()?;
        let (parent, blobs) = {
            let head = self.head_node(&graph)?;
            let blobs = self.index().staged_snapshot(head.commit().blobs());
            (head.id().clone(), blobs)
        };

        let commit = Commit::new(
            message.to_string(),
            self.settings().now(),
            blobs,
            branch.to_string(),
        );
        let commit_id = self.record_commit(&mut graph, &[parent], commit)?;
        self.refs().move_head(&branch, &commit_id)?;

        let mut index = self.index();
        index.clear();
        index.write_updates()
    }
}
