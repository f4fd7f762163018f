//! Best common ancestor finder
//!
//! A best common ancestor of commits X and Y is any common ancestor of X and
//! Y that is not an ancestor of any other common ancestor.
//!
//! ## Phase 1: find common ancestors
//!
//! Both tips are walked at once, newest generation first. Each commit
//! inherits the sides it was reached from; a commit reached from both sides
//! is a common ancestor, and everything below it is marked `STALE` so the
//! walk does not report its ancestors too.
//!
//! ## Phase 2: drop redundant ancestors
//!
//! Each candidate is walked against the remaining candidates. A candidate
//! reachable from another one is redundant. When several best common
//! ancestors survive (criss-cross merges), the newest is chosen so repeated
//! runs agree.

use crate::artifacts::graph::commit_node::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_SOURCE = 0b01;
        const VISITED_FROM_TARGET = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (VisitState::VISITED_FROM_SOURCE, "SOURCE"),
            (VisitState::VISITED_FROM_TARGET, "TARGET"),
            (VisitState::STALE, "STALE"),
            (VisitState::RESULT, "RESULT"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();

        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Walks commit ancestry through a loader so the search is independent of
/// where commits live. The loader returns `None` for unknown ids, which are
/// treated as having no parents.
struct CommonAncestorsFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit<'c>>,
{
    commit_loader: CommitLoaderFn,
    _marker: std::marker::PhantomData<&'c ()>,
}

impl<'c, CommitLoaderFn> CommonAncestorsFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit<'c>>,
{
    fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            commit_loader,
            _marker: std::marker::PhantomData,
        }
    }

    fn generation(&self, oid: &ObjectId) -> usize {
        (self.commit_loader)(oid).map_or(0, |commit| commit.generation)
    }

    fn parents(&self, oid: &ObjectId) -> &'c [ObjectId] {
        (self.commit_loader)(oid)
            .map(|commit| commit.parents)
            .unwrap_or(&[])
    }

    /// Visit states of the commits reachable from `source` and any of
    /// `targets`, keeping only the non-stale common ancestors
    fn find_common_ancestors(
        &self,
        source_commit_id: &ObjectId,
        target_commit_ids: HashSet<&ObjectId>,
    ) -> HashMap<ObjectId, VisitState> {
        if target_commit_ids.contains(source_commit_id) {
            return HashMap::from([(source_commit_id.clone(), VisitState::RESULT)]);
        }

        let mut ancestors_states = HashMap::<ObjectId, VisitState>::new();
        // max heap: children always have a higher generation than their parents
        let mut priority_queue = BinaryHeap::new();

        ancestors_states.insert(source_commit_id.clone(), VisitState::VISITED_FROM_SOURCE);
        priority_queue.push((self.generation(source_commit_id), source_commit_id.clone()));

        for &target_commit_id in target_commit_ids.iter() {
            ancestors_states.insert(target_commit_id.clone(), VisitState::VISITED_FROM_TARGET);
            priority_queue.push((self.generation(target_commit_id), target_commit_id.clone()));
        }

        while let Some((_, commit_id)) = priority_queue.pop() {
            let current_state = ancestors_states
                .get(&commit_id)
                .copied()
                .unwrap_or(VisitState::NONE);

            tracing::trace!(commit = %commit_id.to_short_oid(), state = ?current_state, "processing commit");

            if current_state.contains(VisitState::STALE) {
                continue;
            }

            let is_common_ancestor = current_state.contains(VisitState::VISITED_FROM_BOTH);
            if is_common_ancestor {
                ancestors_states
                    .entry(commit_id.clone())
                    .and_modify(|state| *state |= VisitState::RESULT);
            }

            for parent_id in self.parents(&commit_id) {
                let parent_state = ancestors_states
                    .get(parent_id)
                    .copied()
                    .unwrap_or(VisitState::NONE);

                let mut new_state = parent_state | current_state;
                if is_common_ancestor {
                    new_state |= VisitState::STALE;
                }

                if !parent_state.contains(current_state) {
                    ancestors_states.insert(parent_id.clone(), new_state);
                    priority_queue.push((self.generation(parent_id), parent_id.clone()));
                }
            }
        }

        ancestors_states
            .into_iter()
            .filter(|(_, state)| {
                !state.contains(VisitState::STALE) && state.contains(VisitState::RESULT)
            })
            .collect()
    }
}

pub struct BCAFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit<'c>>,
{
    inner: CommonAncestorsFinder<'c, CommitLoaderFn>,
}

impl<'c, CommitLoaderFn> BCAFinder<'c, CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Option<SlimCommit<'c>>,
{
    /// ```rust,ignore
    /// let finder = BCAFinder::new(|oid| graph.slim(oid));
    /// ```
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self {
            inner: CommonAncestorsFinder::new(commit_loader),
        }
    }

    /// One best common ancestor of the two commits, `None` for unrelated histories
    pub fn find_best_common_ancestor(
        &self,
        source_commit_id: &ObjectId,
        target_commit_id: &ObjectId,
    ) -> Option<ObjectId> {
        let common_ancestors = self
            .inner
            .find_common_ancestors(source_commit_id, HashSet::from([target_commit_id]))
            .into_keys()
            .collect::<HashSet<_>>();

        if common_ancestors.is_empty() {
            return None;
        }

        tracing::debug!(
            candidates = %join_short_oids(&common_ancestors),
            "found common ancestors"
        );

        let mut redundant_ancestors = HashSet::<ObjectId>::new();
        for commit in &common_ancestors {
            if redundant_ancestors.contains(commit) {
                continue;
            }

            let others = common_ancestors
                .iter()
                .filter(|other| *other != commit && !redundant_ancestors.contains(*other))
                .collect::<HashSet<_>>();
            if others.is_empty() {
                continue;
            }
            let common_states = self.inner.find_common_ancestors(commit, others.clone());

            if common_states
                .get(commit)
                .unwrap_or(&VisitState::NONE)
                .contains(VisitState::VISITED_FROM_TARGET)
            {
                redundant_ancestors.insert(commit.clone());
            }

            for other in others {
                if common_states
                    .get(other)
                    .unwrap_or(&VisitState::NONE)
                    .contains(VisitState::VISITED_FROM_SOURCE)
                {
                    redundant_ancestors.insert(other.clone());
                }
            }
        }

        let best_common_ancestor = common_ancestors
            .into_iter()
            .filter(|commit| !redundant_ancestors.contains(commit))
            .max_by_key(|commit| (self.inner.generation(commit), commit.clone()));

        tracing::debug!(
            redundant = %join_short_oids(&redundant_ancestors),
            best = ?best_common_ancestor.as_ref().map(ObjectId::to_short_oid),
            "filtered redundant ancestors"
        );

        best_common_ancestor
    }
}

fn join_short_oids(oids: &HashSet<ObjectId>) -> String {
    oids.iter()
        .map(ObjectId::to_short_oid)
        .collect::<Vec<_>>()
        .join(", ")
}
