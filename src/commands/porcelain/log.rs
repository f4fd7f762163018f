use crate::areas::repository::Repository;
use crate::artifacts::graph::commit_node::{CommitKind, CommitNode};
use crate::artifacts::log::rev_list::RevList;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Commits from the head back to the initial commit, following first parents
    pub fn log(&self) -> anyhow::Result<()> {
        let graph = self.load_graph()?;
        let head = self.head_node(&graph)?;

        for node in RevList::new(&graph, head.id().clone()) {
            self.display_commit(node)?;
        }

        Ok(())
    }

    /// Every commit ever made, in creation order
    pub fn global_log(&self) -> anyhow::Result<()> {
        let graph = self.load_graph()?;

        for node in graph.nodes() {
            self.display_commit(node)?;
        }

        Ok(())
    }

    fn display_commit(&self, node: &CommitNode) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(writer, "{}", format!("commit {}", node.id()).yellow())?;
        if node.kind() == CommitKind::Merge {
            let parents = node
                .parents()
                .iter()
                .map(|parent| parent.to_short_oid())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(writer, "Merge: {parents}")?;
        }
        writeln!(writer, "Date: {}", node.commit().readable_timestamp())?;
        writeln!(writer, "{}", node.commit().message())?;
        writeln!(writer)?;

        Ok(())
    }
}
