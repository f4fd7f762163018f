//! Nearest-path merge base
//!
//! Every path from a commit back to the root is enumerated, following each
//! parent of every merge commit. For each pairing of a current-side path
//! with a given-side path, the first id on either path that also occurs on
//! the other is a meeting point, measured by its index on the path it was
//! found on. The meeting point with the smallest index wins; among equally
//! near meeting points the first one found is kept, current side first.
//!
//! This favors the common ancestor closest to either tip. When merge
//! history offers a short path to an older ancestor, the result can be an
//! ancestor of another common ancestor, which `BCAFinder` would not pick.

use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use std::collections::HashSet;

#[derive(new)]
pub struct PathFinder<'g> {
    graph: &'g CommitGraph,
}

impl PathFinder<'_> {
    pub fn find_nearest_common_ancestor(
        &self,
        current: &ObjectId,
        given: &ObjectId,
    ) -> Option<ObjectId> {
        let current_paths = self.paths_to_root(current);
        let given_paths = self.paths_to_root(given);
        let current_sets = as_sets(&current_paths);
        let given_sets = as_sets(&given_paths);

        let mut nearest: Option<(usize, &ObjectId)> = None;
        for (current_path, current_set) in current_paths.iter().zip(&current_sets) {
            for (given_path, given_set) in given_paths.iter().zip(&given_sets) {
                for (path, others) in [(current_path, given_set), (given_path, current_set)] {
                    let Some(meeting_point) = path.iter().position(|oid| others.contains(oid))
                    else {
                        continue;
                    };

                    if nearest.is_none_or(|(index, _)| meeting_point < index) {
                        nearest = Some((meeting_point, &path[meeting_point]));
                    }
                }
            }
        }

        tracing::trace!(
            current_paths = current_paths.len(),
            given_paths = given_paths.len(),
            distance = nearest.map(|(index, _)| index),
            "searched root paths"
        );

        nearest.map(|(_, oid)| oid.clone())
    }

    /// All paths from `start` to the root, first parents explored first
    pub fn paths_to_root(&self, start: &ObjectId) -> Vec<Vec<ObjectId>> {
        let mut paths = Vec::new();
        let mut pending = vec![vec![start.clone()]];

        while let Some(path) = pending.pop() {
            let Some(node) = path.last().and_then(|tip| self.graph.get(tip)) else {
                continue;
            };

            if node.parents().is_empty() {
                paths.push(path);
                continue;
            }

            // pushed in reverse so the first parent's paths are completed first
            for parent in node.parents().iter().rev() {
                let mut extended = path.clone();
                extended.push(parent.clone());
                pending.push(extended);
            }
        }

        paths
    }
}

fn as_sets(paths: &[Vec<ObjectId>]) -> Vec<HashSet<&ObjectId>> {
    paths.iter().map(|path| path.iter().collect()).collect()
}
