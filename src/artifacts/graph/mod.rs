//! Commit DAG
//!
//! Commits are kept in an arena keyed by id. Parent and child links are id
//! lists, so the back-references from a commit to its children never own
//! anything; a commit stays alive because the graph holds it.

pub mod commit_graph;
pub mod commit_node;
