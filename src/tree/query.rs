//! Whole-tree metrics and enumerations.

use std::collections::VecDeque;

use super::{GenealogyTree, TreeNodeId};

/// Payloads that expose a stable identifier, e.g. the database key of a
/// character record.
pub trait Identified {
    type Id;
    fn id(&self) -> Self::Id;
}

impl<V> GenealogyTree<V> {
    /// Longest root-to-leaf chain counted in nodes. A lone root has depth 1.
    pub fn depth(&self) -> usize {
        self.root_ref().depth()
    }

    /// Size of the most populated breadth-first level.
    pub fn width(&self) -> usize {
        let mut queue = VecDeque::from([self.root]);
        let mut width = 0;

        while !queue.is_empty() {
            let level = queue.len();
            width = width.max(level);
            for _ in 0..level {
                if let Some(id) = queue.pop_front() {
                    queue.extend(self[id].children.iter().copied());
                }
            }
        }
        width
    }

    /// Every node of the hierarchy: the root, its children, then the
    /// [`collect_subtree`](super::NodeRef::collect_subtree) of each child.
    pub fn all_nodes(&self) -> Vec<TreeNodeId> {
        let root = self.root_ref();
        let mut nodes = vec![self.root];
        nodes.extend_from_slice(root.node().children());
        for child in root.children() {
            nodes.extend(child.collect_subtree(false));
        }
        nodes
    }

    /// Like [`all_nodes`](Self::all_nodes), with mates. The root's mates
    /// follow the root, and each root child's mates precede that child's
    /// subtree, matching where `collect_subtree` puts mates deeper down.
    pub fn all_nodes_with_mates(&self) -> Vec<TreeNodeId> {
        let root = self.root_ref();
        let mut nodes = vec![self.root];
        nodes.extend(root.mates().map(|(mate, _)| mate.id()));
        nodes.extend_from_slice(root.node().children());
        for child in root.children() {
            nodes.extend(child.mates().map(|(mate, _)| mate.id()));
            nodes.extend(child.collect_subtree(true));
        }
        nodes
    }

    pub fn all_payloads(&self) -> Vec<&V> {
        self.all_nodes().into_iter().map(|id| &self[id].data).collect()
    }

    pub fn all_payloads_with_mates(&self) -> Vec<&V> {
        self.all_nodes_with_mates()
            .into_iter()
            .map(|id| &self[id].data)
            .collect()
    }

    /// Identifiers of [`all_payloads`](Self::all_payloads), in order.
    pub fn current_ids(&self) -> Vec<V::Id>
    where
        V: Identified,
    {
        self.all_payloads().into_iter().map(V::id).collect()
    }

    pub fn current_ids_with_mates(&self) -> Vec<V::Id>
    where
        V: Identified,
    {
        self.all_payloads_with_mates()
            .into_iter()
            .map(V::id)
            .collect()
    }
}
