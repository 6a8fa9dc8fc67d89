use super::{RelationshipId, TreeNodeId};

/// Lateral placement of a node among its siblings.
///
/// Only layout consumers read this; none of the tree algorithms do.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Position {
    Left,
    #[default]
    Middle,
    Right,
}

impl Position {
    /// Position of the child at `index` among `len` children of the root.
    ///
    /// The first half goes left, the exact middle of an odd count is
    /// centered, the remainder goes right.
    pub fn among_siblings(index: usize, len: usize) -> Self {
        let half = len / 2;
        if len % 2 == 1 && index == half {
            Position::Middle
        } else if index < half {
            Position::Left
        } else {
            Position::Right
        }
    }
}

/// A reference stored in one of the two parent slots of a [`Node`].
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParentLink {
    /// A structural parent: this node is (or was spliced as) one of its children.
    Lineage(TreeNodeId),
    /// Bookkeeping back-reference from a mate to the node it was attached to.
    /// Never a hierarchy edge.
    Partner(TreeNodeId),
}

impl ParentLink {
    pub fn id(&self) -> TreeNodeId {
        match self {
            ParentLink::Lineage(id) | ParentLink::Partner(id) => *id,
        }
    }

    pub fn lineage(&self) -> Option<TreeNodeId> {
        match self {
            ParentLink::Lineage(id) => Some(*id),
            ParentLink::Partner(_) => None,
        }
    }

    pub fn is_lineage(&self) -> bool {
        matches!(self, ParentLink::Lineage(_))
    }
}

/// One side of a partnership.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mate {
    pub node: TreeNodeId,
    pub relationship: RelationshipId,
}

/// A vertex of a [`GenealogyTree`](super::GenealogyTree).
///
/// The methods here only touch the node's own link lists; keeping links
/// mutual and heights consistent is left to the tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node<V> {
    pub(crate) data: V,
    pub(crate) position: Position,
    pub(crate) height: i32,
    pub(crate) parents: [Option<ParentLink>; 2],
    pub(crate) children: Vec<TreeNodeId>,
    pub(crate) mates: Vec<Mate>,
}

impl<V> Node<V> {
    pub fn new(data: V, position: Position, height: i32) -> Self {
        Node {
            data,
            position,
            height,
            parents: [None, None],
            children: Vec::new(),
            mates: Vec::new(),
        }
    }

    pub fn data(&self) -> &V {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut V {
        &mut self.data
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn parents(&self) -> &[Option<ParentLink>; 2] {
        &self.parents
    }

    /// Structural parents, skipping empty slots and partner back-references.
    pub fn lineage_parents(&self) -> impl Iterator<Item = TreeNodeId> + '_ {
        self.parents.iter().flatten().filter_map(ParentLink::lineage)
    }

    /// The node this one was attached to as a mate, if any.
    pub fn partner_of(&self) -> Option<TreeNodeId> {
        match self.parents[0] {
            Some(ParentLink::Partner(id)) => Some(id),
            _ => None,
        }
    }

    pub fn children(&self) -> &[TreeNodeId] {
        &self.children
    }

    pub fn mates(&self) -> &[Mate] {
        &self.mates
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends `child` unless it is already a child. Height and position of
    /// the child are not touched.
    pub fn add_child(&mut self, child: TreeNodeId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Appends a partnership unless the same pair is already present.
    ///
    /// Only this side is recorded; the other node needs the mirrored call.
    pub fn add_mate(&mut self, mate: TreeNodeId, relationship: RelationshipId) {
        let entry = Mate {
            node: mate,
            relationship,
        };
        if !self.mates.contains(&entry) {
            self.mates.push(entry);
        }
    }

    pub fn remove_child(&mut self, child: TreeNodeId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        before != self.children.len()
    }

    /// Drops every partnership with `mate` on this side only.
    pub fn remove_mate(&mut self, mate: TreeNodeId) -> bool {
        let before = self.mates.len();
        self.mates.retain(|m| m.node != mate);
        before != self.mates.len()
    }

    pub fn map<F, U>(self, transform: F) -> Node<U>
    where
        F: FnOnce(V) -> U,
    {
        Node {
            data: transform(self.data),
            position: self.position,
            height: self.height,
            parents: self.parents,
            children: self.children,
            mates: self.mates,
        }
    }

    pub fn map_ref<F, U>(&self, transform: F) -> Node<U>
    where
        F: FnOnce(&V) -> U,
    {
        Node {
            data: transform(&self.data),
            position: self.position,
            height: self.height,
            parents: self.parents,
            children: self.children.clone(),
            mates: self.mates.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn root_positions() {
        let four: Vec<_> = (0..4).map(|i| Position::among_siblings(i, 4)).collect();
        assert_eq!(
            four,
            vec![
                Position::Left,
                Position::Left,
                Position::Right,
                Position::Right
            ]
        );

        let three: Vec<_> = (0..3).map(|i| Position::among_siblings(i, 3)).collect();
        assert_eq!(
            three,
            vec![Position::Left, Position::Middle, Position::Right]
        );

        assert_eq!(Position::among_siblings(0, 1), Position::Middle);
    }

    #[test]
    fn child_links_are_idempotent() {
        let mut node = Node::new("a", Position::Middle, 0);
        node.add_child(TreeNodeId(3));
        node.add_child(TreeNodeId(4));
        node.add_child(TreeNodeId(3));
        assert_eq!(node.children(), &[TreeNodeId(3), TreeNodeId(4)]);

        assert!(node.remove_child(TreeNodeId(3)));
        assert!(!node.remove_child(TreeNodeId(3)));
        assert_eq!(node.children(), &[TreeNodeId(4)]);
        assert!(!node.is_leaf());
    }

    #[test]
    fn mate_links_are_one_sided() {
        let mut node = Node::new("a", Position::Middle, 0);
        node.add_mate(TreeNodeId(1), RelationshipId(7));
        node.add_mate(TreeNodeId(1), RelationshipId(7));
        node.add_mate(TreeNodeId(1), RelationshipId(8));
        assert_eq!(node.mates().len(), 2);

        assert!(node.remove_mate(TreeNodeId(1)));
        assert!(node.mates().is_empty());
    }

    #[test]
    fn partner_links_are_not_lineage() {
        let mut node = Node::new((), Position::Left, 2);
        node.parents[0] = Some(ParentLink::Partner(TreeNodeId(0)));
        assert_eq!(node.partner_of(), Some(TreeNodeId(0)));
        assert_eq!(node.lineage_parents().count(), 0);

        node.parents = [
            Some(ParentLink::Lineage(TreeNodeId(5))),
            Some(ParentLink::Lineage(TreeNodeId(6))),
        ];
        assert_eq!(node.partner_of(), None);
        assert_eq!(
            node.lineage_parents().collect::<Vec<_>>(),
            vec![TreeNodeId(5), TreeNodeId(6)]
        );
    }
}
