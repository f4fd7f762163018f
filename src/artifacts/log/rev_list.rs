use crate::artifacts::graph::commit_graph::CommitGraph;
use crate::artifacts::graph::commit_node::CommitNode;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// History of a commit following first parents back to the root
#[derive(Clone, new)]
pub struct RevList<'g> {
    graph: &'g CommitGraph,
    start: ObjectId,
}

impl<'g> IntoIterator for RevList<'g> {
    type Item = &'g CommitNode;
    type IntoIter = RevListIntoIter<'g>;

    fn into_iter(self) -> Self::IntoIter {
        RevListIntoIter {
            graph: self.graph,
            current_commit_oid: Some(self.start),
        }
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'g> {
    graph: &'g CommitGraph,
    current_commit_oid: Option<ObjectId>,
}

impl<'g> Iterator for RevListIntoIter<'g> {
    type Item = &'g CommitNode;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;
        let node = self.graph.get(&commit_oid)?;

        // Move to the first parent for the next iteration
        self.current_commit_oid = node.first_parent().cloned();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::graph::commit_graph::fixtures::GraphBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_follows_first_parent_only() {
        let mut builder = GraphBuilder::new();
        builder.commit("a", &["root"]);
        builder.commit("side", &["root"]);
        builder.commit("merge", &["a", "side"]);
        builder.commit("tip", &["merge"]);

        let history = RevList::new(&builder.graph, builder.id("tip"))
            .into_iter()
            .map(|node| builder.name(node.id()))
            .collect::<Vec<_>>();

        assert_eq!(history, vec!["tip", "merge", "a", "root"]);
    }
}
