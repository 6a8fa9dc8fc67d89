use bitvec::vec::BitVec;

use super::{GenealogyTree, ParentLink, TreeError};

impl<V> GenealogyTree<V> {
    /// Checks the structural invariants of everything reachable from the
    /// root:
    ///
    /// *   the root has empty parent slots;
    /// *   each child names the node listing it in its first slot, so every
    ///     other node has a parent;
    /// *   no node is reached twice through `children`;
    /// *   every mate link points at a live node.
    ///
    /// Mates need not list each other back, since mate removal is one-sided.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = self.node(self.root)?;
        if root.parents.iter().any(Option::is_some) {
            return Err(TreeError::RootHasParent);
        }

        let mut seen: BitVec = BitVec::repeat(false, self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(current) = stack.pop() {
            if seen[current.0] {
                return Err(TreeError::Cycle(current));
            }
            seen.set(current.0, true);

            let node = self.node(current)?;
            if node.mates.iter().any(|m| !self.contains(m.node)) {
                return Err(TreeError::DanglingMate(current));
            }

            for &child in node.children.iter().rev() {
                let child_node = self.node(child)?;
                if child_node.parents[0] != Some(ParentLink::Lineage(current)) {
                    return Err(TreeError::WrongParent(child));
                }
                stack.push(child);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::tree::{GenealogyTree, ParentLink, RelationshipId, TreeError, TreeNodeId};

    fn small() -> (GenealogyTree<&'static str>, TreeNodeId, TreeNodeId) {
        let mut tree = GenealogyTree::new("r");
        let a = tree.add_node("a", tree.root()).unwrap();
        let b = tree.add_node("b", a).unwrap();
        (tree, a, b)
    }

    #[test]
    fn fresh_tree_is_valid() {
        let (mut tree, a, _) = small();
        tree.add_mate("m", RelationshipId(1), a).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn detects_wrong_back_pointer() {
        let (mut tree, a, b) = small();
        tree[b].parents[0] = Some(ParentLink::Lineage(tree.root()));
        assert_eq!(tree.validate(), Err(TreeError::WrongParent(b)));
        tree[b].parents[0] = Some(ParentLink::Lineage(a));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn detects_shared_child() {
        let (mut tree, _, b) = small();
        let root = tree.root();
        tree[root].children.push(b);
        assert!(tree.validate().is_err());
    }

    #[test]
    fn detects_cleared_parent_and_dangling_mate() {
        let (mut tree, _, b) = small();
        tree[b].parents = [None, None];
        assert_eq!(tree.validate(), Err(TreeError::WrongParent(b)));

        let (mut tree, a2, _) = small();
        tree[a2].mates.push(crate::tree::Mate {
            node: TreeNodeId(99),
            relationship: RelationshipId(0),
        });
        assert_eq!(tree.validate(), Err(TreeError::DanglingMate(a2)));
    }

    #[test]
    fn detects_root_with_parent() {
        let (mut tree, a, _) = small();
        let root = tree.root();
        tree[root].parents[1] = Some(ParentLink::Lineage(a));
        assert_eq!(tree.validate(), Err(TreeError::RootHasParent));
    }
}
