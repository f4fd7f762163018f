use crate::areas::repository::Repository;
use crate::error::RepositoryError;
use std::io::Write;

impl Repository {
    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let matches = graph.find_by_message(message);

        if matches.is_empty() {
            anyhow::bail!(RepositoryError::NoCommitWithMessage(message.to_string()));
        }

        let mut writer = self.writer();
        for commit_id in matches {
            writeln!(writer, "{commit_id}")?;
        }

        Ok(())
    }
}
