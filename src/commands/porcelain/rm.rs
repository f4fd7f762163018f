use crate::areas::repository::Repository;

impl Repository {
    /// Stage `file` for removal, deleting the working file if the current commit tracks it
    pub fn rm(&self, file: &str) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let path = self.relative_path(file)?;
        let tracked = self.head_node(&graph)?.commit().tracks(&path);

        {
            let mut index = self.index();
            index.stage_remove(path.clone(), tracked)?;
            index.write_updates()?;
        }

        if tracked {
            self.workspace().remove_file(&path)?;
        }

        Ok(())
    }
}
