use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeSet;

/// Shape of a commit, inferred from how many parents it has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitKind {
    /// The synthetic initial commit
    Root,
    Ordinary,
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitNode {
    id: ObjectId,
    commit: Commit,
    /// First parent is the branch the commit was made on, second the merged-in branch
    parents: Vec<ObjectId>,
    children: BTreeSet<ObjectId>,
    /// Position in creation order; parents always come before their children
    generation: usize,
}

/// Borrowed view of a commit carrying only what ancestor searches need
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlimCommit<'c> {
    pub oid: &'c ObjectId,
    pub parents: &'c [ObjectId],
    pub generation: usize,
}

impl CommitNode {
    pub(crate) fn new(
        id: ObjectId,
        commit: Commit,
        parents: Vec<ObjectId>,
        generation: usize,
    ) -> Self {
        CommitNode {
            id,
            commit,
            parents,
            children: BTreeSet::new(),
            generation,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn commit(&self) -> &Commit {
        &self.commit
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    pub fn first_parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn children(&self) -> &BTreeSet<ObjectId> {
        &self.children
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn kind(&self) -> CommitKind {
        match self.parents.len() {
            0 => CommitKind::Root,
            1 => CommitKind::Ordinary,
            _ => CommitKind::Merge,
        }
    }

    pub fn slim(&self) -> SlimCommit<'_> {
        SlimCommit {
            oid: &self.id,
            parents: &self.parents,
            generation: self.generation,
        }
    }

    pub(crate) fn add_child(&mut self, child: ObjectId) {
        self.children.insert(child);
    }
}
