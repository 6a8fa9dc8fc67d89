use std::fmt::Debug;

use super::{GenealogyTree, Node, RelationshipId, TreeNodeId};

/// A borrowed view of one node together with the tree it lives in.
///
/// Carries the read-only node operations that have to look past the node's
/// own link lists.
pub struct NodeRef<'a, V> {
    pub(crate) tree: &'a GenealogyTree<V>,
    pub(crate) id: TreeNodeId,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<V: Debug> Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("data", self.data())
            .finish()
    }
}

impl<'a, V> NodeRef<'a, V> {
    pub fn id(&self) -> TreeNodeId {
        self.id
    }

    pub fn tree(&self) -> &'a GenealogyTree<V> {
        self.tree
    }

    pub fn node(&self) -> &'a Node<V> {
        &self.tree[self.id]
    }

    pub fn data(&self) -> &'a V {
        &self.node().data
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, V>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// Live partners of this node with the tag of each partnership.
    pub fn mates(&self) -> impl Iterator<Item = (NodeRef<'a, V>, RelationshipId)> + 'a {
        let tree = self.tree;
        self.node()
            .mates
            .iter()
            .filter(move |m| tree.contains(m.node))
            .map(move |m| (NodeRef { tree, id: m.node }, m.relationship))
    }

    /// The structural parent in the first slot, if that slot holds one.
    pub fn lineage_parent(&self) -> Option<NodeRef<'a, V>> {
        let id = self.node().parents[0]?.lineage()?;
        self.tree.node_ref(id)
    }

    /// Depth-first search for `data`.
    ///
    /// Checks each node, then its mates, before moving on to its children in
    /// order. Mates are shallow: the children of a mate are never searched.
    pub fn find(&self, data: &V) -> Option<NodeRef<'a, V>>
    where
        V: PartialEq,
    {
        let tree = self.tree;
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let current = NodeRef { tree, id };
            if current.data() == data {
                return Some(current);
            }
            if let Some((mate, _)) = current.mates().find(|(mate, _)| mate.data() == data) {
                return Some(mate);
            }
            // reversed so the first child is searched next
            stack.extend(current.node().children.iter().rev().copied());
        }
        None
    }

    /// This node plus all of its descendants. Mates are not counted.
    pub fn count_descendants(&self) -> usize {
        self.tree.iter_preorder(self.id).count()
    }

    /// Longest chain of children starting here, counted in nodes: a leaf has
    /// depth 1.
    pub fn depth(&self) -> usize {
        let mut stack = vec![(self.id, 1)];
        let mut depth = 0;
        while let Some((id, level)) = stack.pop() {
            depth = depth.max(level);
            stack.extend(self.tree[id].children.iter().map(|&c| (c, level + 1)));
        }
        depth
    }

    /// Descendants of this node in layout order.
    ///
    /// For every child in turn: its mates first (when `include_mates`), then,
    /// if the child has children of its own, its whole subtree followed by
    /// the child; a leaf child is appended directly. Layout consumers rely on
    /// this exact sequence.
    pub fn collect_subtree(&self, include_mates: bool) -> Vec<TreeNodeId> {
        let tree = self.tree;
        let mut out = Vec::new();
        // (node, index of the next child to visit)
        let mut frames = vec![(self.id, 0usize)];

        while let Some(frame) = frames.last_mut() {
            let (id, next) = *frame;
            let Some(&child) = tree[id].children.get(next) else {
                frames.pop();
                if !frames.is_empty() {
                    out.push(id);
                }
                continue;
            };
            frame.1 += 1;

            if include_mates {
                out.extend(NodeRef { tree, id: child }.mates().map(|(mate, _)| mate.id));
            }
            if tree[child].is_leaf() {
                out.push(child);
            } else {
                frames.push((child, 0));
            }
        }
        out
    }
}
