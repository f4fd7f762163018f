//! Commit graph record
//!
//! `.gitlet/graph` lists every commit in creation order, one per line:
//!
//! ```text
//! <commit-id> [<parent-id> ...]
//! ```
//!
//! The first line is the root commit and has no parents. Commit contents are
//! read back from the object store and child links are rebuilt while
//! loading, so the record alone describes the shape of the DAG.

use crate::areas::database::Database;
use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug, new)]
pub struct History {
    /// Path to the graph record (typically `.gitlet/graph`)
    path: Box<Path>,
}

impl History {
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self, database: &Database) -> anyhow::Result<CommitGraph> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read commit graph at {:?}", self.path))?;
        let mut records = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_record);

        let (root_id, root_parents) = records
            .next()
            .ok_or_else(|| RepositoryError::corrupt("commit graph is empty"))??;
        if !root_parents.is_empty() {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "root commit {root_id} must not have parents"
            )));
        }

        let root = load_commit(database, &root_id)?;
        if root.object_id()? != root_id {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "commit {root_id} does not match its content"
            )));
        }
        let mut graph = CommitGraph::with_root(root)?;

        for record in records {
            let (id, parents) = record?;
            let commit = load_commit(database, &id)?;
            graph.attach(id, commit, parents)?;
        }

        tracing::debug!(commits = graph.len(), "loaded commit graph");

        Ok(graph)
    }

    pub fn save(&self, graph: &CommitGraph) -> anyhow::Result<()> {
        let record = graph
            .nodes()
            .map(|node| {
                std::iter::once(node.id())
                    .chain(node.parents())
                    .map(ObjectId::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let mut graph_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .with_context(|| format!("failed to open commit graph at {:?}", self.path))?;
        let mut lock = file_guard::lock(&mut graph_file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(record.as_bytes())?;
        lock.deref_mut().write_all(b"\n")?;

        Ok(())
    }
}

fn parse_record(line: &str) -> anyhow::Result<(ObjectId, Vec<ObjectId>)> {
    let mut ids = line.split_whitespace().map(|id| {
        ObjectId::try_parse(id.to_string()).map_err(|_| {
            anyhow::Error::from(RepositoryError::corrupt(format!(
                "invalid commit id '{id}' in commit graph"
            )))
        })
    });

    let id = ids
        .next()
        .ok_or_else(|| RepositoryError::corrupt("empty commit graph record"))??;
    let parents = ids.collect::<anyhow::Result<Vec<_>>>()?;

    Ok((id, parents))
}

fn load_commit(
    database: &Database,
    id: &ObjectId,
) -> anyhow::Result<crate::artifacts::objects::commit::Commit> {
    database.parse_object_as_commit(id).map_err(|error| {
        match error.downcast_ref::<RepositoryError>() {
            Some(RepositoryError::ObjectNotFound(_)) => {
                RepositoryError::corrupt(format!("commit {id} is missing from the object store"))
                    .into()
            }
            _ => error,
        }
    })
}
