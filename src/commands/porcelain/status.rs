use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let head = self.head_node(&graph)?;
        let workspace = self.workspace_snapshot()?;

        let status_info = StatusInfo::collect(
            self.refs().list_branches()?,
            self.refs().current_branch()?,
            head.commit().blobs(),
            &self.index(),
            &workspace,
        );

        status_info.write_to(&mut *self.writer())
    }
}
