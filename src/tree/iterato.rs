//! Traversals over a [`GenealogyTree`]. All of them follow `children` (or,
//! upwards, lineage parent links) and never mate links.

use std::collections::VecDeque;

use super::{GenealogyTree, TreeNodeId};

// --- Ancestors Iterator ---

/// Walks from a node up to the root through the first lineage parent of
/// each node. The starting node is yielded first.
///
/// Stops early at a node whose first slot is empty or only holds a partner
/// back-reference.
#[derive(Clone)]
pub struct AncestorsIter<'a, V> {
    tree: &'a GenealogyTree<V>,
    current: Option<TreeNodeId>,
}

impl<'a, V> AncestorsIter<'a, V> {
    pub fn new(tree: &'a GenealogyTree<V>, start: TreeNodeId) -> Self {
        AncestorsIter {
            tree,
            current: tree.contains(start).then_some(start),
        }
    }
}

impl<V> Iterator for AncestorsIter<'_, V> {
    type Item = TreeNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node_to_return = self.current?;
        self.current = self
            .tree
            .get(node_to_return)
            .and_then(|n| n.parents[0])
            .and_then(|link| link.lineage());
        Some(node_to_return)
    }
}

// --- BFS Iterator ---

/// Level-order traversal below (and including) a start node.
#[derive(Clone)]
pub struct BfsIter<'a, V> {
    tree: &'a GenealogyTree<V>,
    queue: VecDeque<TreeNodeId>,
}

impl<'a, V> BfsIter<'a, V> {
    pub fn new(tree: &'a GenealogyTree<V>, start: TreeNodeId) -> Self {
        let mut queue = VecDeque::new();
        if tree.contains(start) {
            queue.push_back(start);
        }
        BfsIter { tree, queue }
    }
}

impl<V> Iterator for BfsIter<'_, V> {
    type Item = TreeNodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(self.tree[node].children.iter().copied());
        Some(node)
    }
}

// --- Preorder Iterator ---

/// Depth-first traversal, parents before children, children in order.
#[derive(Clone)]
pub struct PreorderIter<'a, V> {
    tree: &'a GenealogyTree<V>,
    stack: Vec<TreeNodeId>,
}

impl<'a, V> PreorderIter<'a, V> {
    pub fn new(tree: &'a GenealogyTree<V>, start: TreeNodeId) -> Self {
        PreorderIter {
            tree,
            stack: tree.contains(start).then_some(start).into_iter().collect(),
        }
    }
}

impl<V> Iterator for PreorderIter<'_, V> {
    type Item = TreeNodeId;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // reversed so the first child is visited next
        self.stack
            .extend(self.tree[node].children.iter().rev().copied());
        Some(node)
    }
}

impl<V> GenealogyTree<V> {
    pub fn iter_preorder(&self, start: TreeNodeId) -> PreorderIter<'_, V> {
        PreorderIter::new(self, start)
    }

    pub fn iter_bfs(&self, start: TreeNodeId) -> BfsIter<'_, V> {
        BfsIter::new(self, start)
    }

    pub fn iter_ancestors(&self, start: TreeNodeId) -> AncestorsIter<'_, V> {
        AncestorsIter::new(self, start)
    }

    /// Nodes reachable from the root that have no children, in pre-order.
    pub fn iter_leaves(&self) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.iter_preorder(self.root)
            .filter(move |&id| self[id].is_leaf())
    }
}
