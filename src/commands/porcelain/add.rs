use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::error::RepositoryError;

impl Repository {
    /// Stage the working version of `file`
    ///
    /// A file whose content matches the current commit is un-staged instead,
    /// which also clears a pending removal.
    pub fn add(&self, file: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let path = self.relative_path(file)?;

        if !self.workspace().file_exists(&path) {
            anyhow::bail!(RepositoryError::FileNotFound(path));
        }

        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = blob.object_id()?;
        let head = self.head_node(&graph)?;

        let mut index = self.index();
        if head.commit().blob(&path) == Some(&blob_id) {
            index.unstage(&path);
        } else {
            self.database().store(&blob)?;
            index.stage_add(path, blob_id);
        }

        index.write_updates()
    }
}
