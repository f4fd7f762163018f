//! Commit graph arena
//!
//! The graph owns every commit node. Nodes are indexed by id for direct
//! lookup and also remembered in creation order, which `global-log` prints
//! and which the graph record preserves on disk.

use crate::artifacts::graph::commit_node::{CommitNode, SlimCommit};
use crate::artifacts::objects::MIN_ABBREVIATED_ID_LENGTH;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct CommitGraph {
    nodes: HashMap<ObjectId, CommitNode>,
    order: Vec<ObjectId>,
}

impl CommitGraph {
    /// Start a graph whose only node is `root`
    pub fn with_root(root: Commit) -> anyhow::Result<Self> {
        let mut graph = CommitGraph {
            nodes: HashMap::new(),
            order: Vec::new(),
        };
        let id = root.object_id()?;
        graph.insert(id, root, Vec::new());

        Ok(graph)
    }

    /// Wrap `commit` in a new node linked as a child of each of `parents`
    ///
    /// The node's id is the digest of the serialized commit, so identical
    /// commits collide; callers must vary the timestamp to get a fresh node.
    pub fn create_commit(
        &mut self,
        parents: &[ObjectId],
        commit: Commit,
    ) -> anyhow::Result<&CommitNode> {
        let id = commit.object_id()?;
        self.attach(id.clone(), commit, parents.to_vec())?;

        self.find(&id)
    }

    /// Link an already persisted commit under its recorded id
    ///
    /// Every parent must already be in the graph, and `id` must be the
    /// commit's digest.
    pub fn attach(
        &mut self,
        id: ObjectId,
        commit: Commit,
        parents: Vec<ObjectId>,
    ) -> anyhow::Result<()> {
        if parents.is_empty() {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "commit {id} has no parents but the graph already has a root"
            )));
        }
        if self.nodes.contains_key(&id) {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "commit {id} is already in the graph"
            )));
        }
        if let Some(missing) = parents.iter().find(|parent| !self.nodes.contains_key(*parent)) {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "parent {missing} of commit {id} is not in the graph"
            )));
        }
        if commit.object_id()? != id {
            anyhow::bail!(RepositoryError::corrupt(format!(
                "commit {id} does not match its content"
            )));
        }

        self.insert(id, commit, parents);

        Ok(())
    }

    fn insert(&mut self, id: ObjectId, commit: Commit, parents: Vec<ObjectId>) {
        for parent in &parents {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.add_child(id.clone());
            }
        }

        let node = CommitNode::new(id.clone(), commit, parents, self.order.len());
        self.order.push(id.clone());
        self.nodes.insert(id, node);
    }

    pub fn root(&self) -> Option<&CommitNode> {
        self.order.first().and_then(|id| self.nodes.get(id))
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &ObjectId) -> Option<&CommitNode> {
        self.nodes.get(id)
    }

    pub fn find(&self, id: &ObjectId) -> anyhow::Result<&CommitNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| RepositoryError::CommitNotFound(id.to_string()).into())
    }

    /// Resolve a full or abbreviated commit id
    pub fn find_by_prefix(&self, prefix: &str) -> anyhow::Result<&CommitNode> {
        if prefix.len() < MIN_ABBREVIATED_ID_LENGTH
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            anyhow::bail!(RepositoryError::CommitNotFound(prefix.to_string()));
        }

        let mut candidates = self.order.iter().filter(|id| id.starts_with(prefix));

        match (candidates.next(), candidates.next()) {
            (Some(id), None) => self.find(id),
            (Some(_), Some(_)) => {
                anyhow::bail!(RepositoryError::AmbiguousCommit(prefix.to_string()))
            }
            (None, _) => anyhow::bail!(RepositoryError::CommitNotFound(prefix.to_string())),
        }
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &CommitNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids of every commit whose message equals `message`, in creation order
    pub fn find_by_message(&self, message: &str) -> Vec<&ObjectId> {
        self.nodes()
            .filter(|node| node.commit().message() == message)
            .map(|node| node.id())
            .collect()
    }

    pub fn slim(&self, id: &ObjectId) -> Option<SlimCommit<'_>> {
        self.nodes.get(id).map(CommitNode::slim)
    }

    /// Walk `start` and everything reachable through parent links
    ///
    /// Shared ancestors are yielded once, at their first visit, rather than
    /// once per path that reaches them.
    pub fn ancestors_depth_first(&self, start: &ObjectId) -> AncestorsDepthFirst<'_> {
        AncestorsDepthFirst {
            graph: self,
            stack: vec![start.clone()],
            visited: HashSet::new(),
        }
    }

    /// Whether `ancestor` is reachable from `descendant` (a commit is its own ancestor)
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> bool {
        self.ancestors_depth_first(descendant)
            .any(|node| node.id() == ancestor)
    }
}

/// Pre-order walk over parent links, first parent before second
///
/// Each commit is yielded once even when merges make it reachable along
/// several paths. Restart by calling `ancestors_depth_first` again.
#[derive(Debug, Clone)]
pub struct AncestorsDepthFirst<'g> {
    graph: &'g CommitGraph,
    stack: Vec<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<'g> Iterator for AncestorsDepthFirst<'g> {
    type Item = &'g CommitNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if !self.visited.insert(id.clone()) {
                continue;
            }

            let Some(node) = self.graph.get(&id) else {
                continue;
            };

            self.stack.extend(node.parents().iter().rev().cloned());
            return Some(node);
        }

        None
    }
}
