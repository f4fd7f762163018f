//! Merge engine
//!
//! Merging `given` into `current` happens in two steps: pick a merge base
//! among the commits reachable from both tips, then reconcile the three
//! snapshots path by path.
//!
//! - `path_finder`: nearest meeting point over every pair of root paths
//! - `bca_finder`: best common ancestor (not an ancestor of another common ancestor)
//! - `resolution`: the per-path reconciliation rules
//! - `conflict`: conflict marker content

pub mod bca_finder;
pub mod conflict;
pub mod path_finder;
pub mod resolution;

use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::path_finder::PathFinder;
use crate::artifacts::objects::object_id::ObjectId;
use crate::error::RepositoryError;

/// How the merge base of two commits is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum MergeBaseStrategy {
    /// Common ancestor closest to the current tip along any of its paths to the root
    #[default]
    NearestPath,
    /// A common ancestor that is not an ancestor of any other common ancestor
    BestCommon,
}

/// When a path whose sides disagree is reported as a conflict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ConflictPolicy {
    /// Clean takes first, then any path where current and given still differ conflicts
    #[default]
    SourceOrder,
    /// Only paths changed differently on both sides since the base conflict
    ThreeWay,
}

pub fn find_merge_base(
    graph: &CommitGraph,
    current: &ObjectId,
    given: &ObjectId,
    strategy: MergeBaseStrategy,
) -> anyhow::Result<ObjectId> {
    let base = match strategy {
        MergeBaseStrategy::NearestPath => PathFinder::new(graph).find_nearest_common_ancestor(current, given),
        MergeBaseStrategy::BestCommon => {
            BCAFinder::new(|oid| graph.slim(oid)).find_best_common_ancestor(current, given)
        }
    };

    let base = base.ok_or_else(|| {
        RepositoryError::corrupt(format!("commits {current} and {given} share no ancestor"))
    })?;
    tracing::debug!(?strategy, %base, "chose merge base");

    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::graph::commit_graph::fixtures::GraphBuilder;
    use rstest::{fixture, rstest};

    /// `m` merges `z` into `x`, and `g` branched off `y`:
    ///
    /// ```text
    /// root - x ------- m
    ///         \       /
    ///          y --- z
    ///           \
    ///            g
    /// ```
    #[fixture]
    fn shortcut() -> GraphBuilder {
        let mut builder = GraphBuilder::new();
        builder.commit("x", &["root"]);
        builder.commit("y", &["x"]);
        builder.commit("z", &["y"]);
        builder.commit("m", &["x", "z"]);
        builder.commit("g", &["y"]);
        builder
    }

    #[rstest]
    #[case(MergeBaseStrategy::NearestPath, "x")]
    #[case(MergeBaseStrategy::BestCommon, "y")]
    fn test_strategies_diverge_on_shortcut_history(
        shortcut: GraphBuilder,
        #[case] strategy: MergeBaseStrategy,
        #[case] expected: &str,
    ) {
        let base = find_merge_base(&shortcut.graph, &shortcut.id("m"), &shortcut.id("g"), strategy)
            .unwrap();

        assert_eq!(shortcut.name(&base), expected);
    }

    #[rstest]
    fn test_both_strategies_agree_on_a_simple_fork(
        #[values(MergeBaseStrategy::NearestPath, MergeBaseStrategy::BestCommon)]
        strategy: MergeBaseStrategy,
    ) {
        let mut builder = GraphBuilder::new();
        builder.commit("base", &["root"]);
        builder.commit("left", &["base"]);
        builder.commit("right", &["base"]);

        let base = find_merge_base(&builder.graph, &builder.id("left"), &builder.id("right"), strategy)
            .unwrap();

        assert_eq!(builder.name(&base), "base");
    }
}
