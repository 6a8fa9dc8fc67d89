//! Genealogy trees: a general tree whose nodes carry up to two parents, an
//! ordered list of children and any number of partnerships ("mates").
//!
//! All nodes live in an arena owned by [`GenealogyTree`] and are addressed
//! by [`TreeNodeId`]. The structure is made of three kinds of links:
//!
//! *   `children`: the owning, ordered out-tree edges. Every algorithm that
//!     walks the hierarchy follows these and nothing else.
//! *   parent slots: a fixed pair of back-references, see [`ParentLink`].
//!     A [`ParentLink::Lineage`] is a structural parent, a
//!     [`ParentLink::Partner`] is the bookkeeping pointer a mate keeps to the
//!     node it was attached to.
//! *   `mates`: symmetric partnerships tagged with a [`RelationshipId`], an
//!     overlay that is never traversed as parent/child.
//!
//! Read-only operations that need the whole tree are on [`NodeRef`], the
//! whole-tree queries are in [`query`], traversals in [`iterato`] and
//! invariant checks in [`validate`].

use std::ops::{Index, IndexMut};

use derive_more::{Display, From, Into};
use thiserror::Error;
use tracing::{debug, trace};

pub mod iterato;
pub mod node;
pub mod node_ref;
pub mod query;
pub mod validate;


pub use node::{Mate, Node, ParentLink, Position};
pub use node_ref::NodeRef;
pub use query::Identified;

/// A type-safe identifier for a node within a [`GenealogyTree`].
/// Wraps a `usize` index into the node arena. Ids are never reused.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNodeId(pub(crate) usize);

/// Tag of a partnership between two nodes.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelationshipId(pub usize);

/// Errors that can occur during tree operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("No node carries the requested payload")]
    NotFound,
    #[error("Invalid TreeNodeId: {0}")]
    InvalidNodeId(TreeNodeId),
    #[error("Node {0} still has children, remove them first")]
    HasChildren(TreeNodeId),
    #[error("The root cannot be removed")]
    RootRemoval,
    #[error("Malformed height {0}: heights below -1 are not allowed")]
    MalformedHeight(i32),
    #[error("Node {0} has no lineage parent to splice under")]
    NoLineageParent(TreeNodeId),
    #[error("Linking would create a cycle through {0}")]
    Cycle(TreeNodeId),
    #[error("Child {0} does not point back at the node listing it")]
    WrongParent(TreeNodeId),
    #[error("Node {0} has a mate that no longer exists")]
    DanglingMate(TreeNodeId),
    #[error("The root has a parent")]
    RootHasParent,
}

/// An in-memory genealogy tree owning all of its nodes.
///
/// Freed slots (from [`GenealogyTree::remove_node`]) stay as `None` so that
/// every other id remains valid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenealogyTree<V> {
    pub(crate) nodes: Vec<Option<Node<V>>>,
    pub(crate) root: TreeNodeId,
}

impl<V> Index<TreeNodeId> for GenealogyTree<V> {
    type Output = Node<V>;
    fn index(&self, index: TreeNodeId) -> &Self::Output {
        match &self.nodes[index.0] {
            Some(node) => node,
            None => panic!("node {index} has been removed"),
        }
    }
}

impl<V> IndexMut<TreeNodeId> for GenealogyTree<V> {
    fn index_mut(&mut self, index: TreeNodeId) -> &mut Self::Output {
        match &mut self.nodes[index.0] {
            Some(node) => node,
            None => panic!("node {index} has been removed"),
        }
    }
}

/// Construction and node access.
impl<V> GenealogyTree<V> {
    /// Creates a tree holding a single root at [`Position::Middle`], height 0.
    pub fn new(root_data: V) -> Self {
        GenealogyTree {
            nodes: vec![Some(Node::new(root_data, Position::Middle, 0))],
            root: TreeNodeId(0),
        }
    }

    pub fn root(&self) -> TreeNodeId {
        self.root
    }

    pub fn root_ref(&self) -> NodeRef<'_, V> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    pub fn contains(&self, id: TreeNodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: TreeNodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: TreeNodeId) -> Option<&mut Node<V>> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn node(&self, id: TreeNodeId) -> Result<&Node<V>, TreeError> {
        self.get(id).ok_or(TreeError::InvalidNodeId(id))
    }

    fn node_mut(&mut self, id: TreeNodeId) -> Result<&mut Node<V>, TreeError> {
        self.get_mut(id).ok_or(TreeError::InvalidNodeId(id))
    }

    pub fn node_ref(&self, id: TreeNodeId) -> Option<NodeRef<'_, V>> {
        self.contains(id).then_some(NodeRef { tree: self, id })
    }

    /// Number of nodes reachable from the root, mates included.
    pub fn len(&self) -> usize {
        self.all_nodes_with_mates().len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First node carrying `data`, searched depth-first from the root.
    /// See [`NodeRef::find`] for the visiting order.
    pub fn find(&self, data: &V) -> Option<TreeNodeId>
    where
        V: PartialEq,
    {
        self.root_ref().find(data).map(|n| n.id())
    }

    fn push(&mut self, node: Node<V>) -> TreeNodeId {
        let id = TreeNodeId(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }
}

/// Structural edits.
impl<V> GenealogyTree<V> {
    /// Adds a new child below `at`, one level deeper.
    ///
    /// Children of the root are laid out left to right: inserting under the
    /// root repositions all existing root children (first half left, odd
    /// middle centered, rest right) and places the new node on the right.
    /// Anywhere else the new node inherits the position of `at`.
    pub fn add_node(&mut self, data: V, at: TreeNodeId) -> Result<TreeNodeId, TreeError> {
        let at_node = self.node(at)?;
        let (height, inherited) = (at_node.height + 1, at_node.position);

        let position = if at == self.root {
            let siblings = self[at].children.clone();
            let len = siblings.len();
            for (i, sibling) in siblings.into_iter().enumerate() {
                let position = Position::among_siblings(i, len);
                trace!(%sibling, ?position, "repositioned root child");
                self[sibling].position = position;
            }
            Position::Right
        } else {
            inherited
        };

        let mut node = Node::new(data, position, height);
        node.parents[0] = Some(ParentLink::Lineage(at));
        let id = self.push(node);
        self[at].add_child(id);
        debug!(%id, parent = %at, height, ?position, "added child");
        Ok(id)
    }

    /// Adds a partner of `at` at the same position and height, linked in
    /// both directions under `relationship`.
    ///
    /// The new node remembers `at` as a [`ParentLink::Partner`] in its first
    /// parent slot; it is not a child of `at`.
    pub fn add_mate(
        &mut self,
        data: V,
        relationship: RelationshipId,
        at: TreeNodeId,
    ) -> Result<TreeNodeId, TreeError> {
        let at_node = self.node(at)?;
        let mut node = Node::new(data, at_node.position, at_node.height);
        node.parents[0] = Some(ParentLink::Partner(at));
        node.add_mate(at, relationship);

        let id = self.push(node);
        self[at].add_mate(id, relationship);
        debug!(%id, partner = %at, %relationship, "added mate");
        Ok(id)
    }

    /// Inserts a new ancestor.
    ///
    /// With `None` (or the current root) the new node becomes the root and
    /// the whole previous tree moves down one level.
    ///
    /// With a non-root `at`, a node is spliced between `at` and its lineage
    /// parent. It takes over `at`'s position, height and parent, adopts all of
    /// `at`'s siblings (and `at`) as its children and becomes the sole child
    /// of the former parent. `at` loses its second parent slot.
    pub fn add_parent(&mut self, data: V, at: Option<TreeNodeId>) -> Result<TreeNodeId, TreeError> {
        match at {
            None => self.add_root_parent(data),
            Some(at) => {
                self.node(at)?;
                if at == self.root {
                    self.add_root_parent(data)
                } else {
                    self.splice_parent(data, at)
                }
            }
        }
    }

    fn add_root_parent(&mut self, data: V) -> Result<TreeNodeId, TreeError> {
        let old_root = self.root;
        let height = self[old_root].height;

        let mut node = Node::new(data, Position::Middle, height);
        node.children.push(old_root);
        let id = self.push(node);

        self[old_root].parents[0] = Some(ParentLink::Lineage(id));
        self.root = id;
        self.offset_subtree_height(id, 1)?;
        debug!(%id, %old_root, "added parent above root");
        Ok(id)
    }

    fn splice_parent(&mut self, data: V, at: TreeNodeId) -> Result<TreeNodeId, TreeError> {
        let at_node = self.node(at)?;
        let Some(ParentLink::Lineage(grandparent)) = at_node.parents[0] else {
            debug!(%at, "rejected splice above a node without lineage parent");
            return Err(TreeError::NoLineageParent(at));
        };
        let (position, height) = (at_node.position, at_node.height);

        let siblings = std::mem::take(&mut self.node_mut(grandparent)?.children);
        let mut node = Node::new(data, position, height);
        node.parents[0] = Some(ParentLink::Lineage(grandparent));
        node.children.clone_from(&siblings);
        let id = self.push(node);
        self[grandparent].children.push(id);

        for sibling in siblings {
            for slot in self[sibling].parents.iter_mut() {
                if *slot == Some(ParentLink::Lineage(grandparent)) {
                    *slot = Some(ParentLink::Lineage(id));
                }
            }
        }
        if let Some(dropped) = self[at].parents[1].take() {
            debug!(%at, parent = %dropped.id(), "dropped second parent while splicing");
        }

        self.offset_subtree_height(id, 1)?;
        debug!(%id, %at, %grandparent, "spliced parent");
        Ok(id)
    }

    /// Records `parent` in the second parent slot of `child`.
    ///
    /// This is a navigation back-reference only: `parent`'s children are not
    /// touched, so the out-tree stays strict.
    pub fn link_second_parent(
        &mut self,
        child: TreeNodeId,
        parent: TreeNodeId,
    ) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;
        if child == self.root {
            return Err(TreeError::RootHasParent);
        }
        if self.iter_preorder(child).any(|n| n == parent) {
            return Err(TreeError::Cycle(parent));
        }
        self[child].parents[1] = Some(ParentLink::Lineage(parent));
        debug!(%child, %parent, "linked second parent");
        Ok(())
    }

    /// Overwrites the payload of the first node carrying `data`.
    ///
    /// Returns the previous payload, or `None` (and does nothing) when no
    /// node matches.
    pub fn replace_node(&mut self, data: &V, new_data: V) -> Option<V>
    where
        V: PartialEq,
    {
        let id = self.find(data)?;
        Some(std::mem::replace(&mut self[id].data, new_data))
    }

    /// Removes the first node carrying `data`, which must be a leaf.
    pub fn remove_node(&mut self, data: &V) -> Result<V, TreeError>
    where
        V: PartialEq,
    {
        let id = self.find(data).ok_or(TreeError::NotFound)?;
        self.remove_node_by_id(id)
    }

    /// Removes the leaf `id`, detaching it from both parent slots.
    ///
    /// Nodes with children are rejected and the tree is left unchanged.
    /// Mates of the removed node keep existing; only their links to it are
    /// dropped.
    pub fn remove_node_by_id(&mut self, id: TreeNodeId) -> Result<V, TreeError> {
        if id == self.root {
            debug!(%id, "rejected removal of the root");
            return Err(TreeError::RootRemoval);
        }
        if !self.node(id)?.is_leaf() {
            debug!(%id, "rejected removal of a node with children");
            return Err(TreeError::HasChildren(id));
        }

        let node = self.nodes[id.0]
            .take()
            .ok_or(TreeError::InvalidNodeId(id))?;
        for link in node.parents.iter().flatten() {
            if let Some(parent) = self.get_mut(link.id()) {
                parent.remove_child(id);
            }
        }
        for other in self.nodes.iter_mut().flatten() {
            other.remove_mate(id);
            for slot in other.parents.iter_mut() {
                if slot.is_some_and(|l| l.id() == id) {
                    *slot = None;
                }
            }
        }
        debug!(%id, "removed node");
        Ok(node.data)
    }

    /// Drops, on the side of the node carrying `data` only, every mate whose
    /// payload equals `partner`. Returns how many links were removed.
    ///
    /// The mirrored removal on the partner's side is the caller's job.
    pub fn remove_mate(&mut self, data: &V, partner: &V) -> Result<usize, TreeError>
    where
        V: PartialEq,
    {
        let id = self.find(data).ok_or(TreeError::NotFound)?;
        let doomed: Vec<TreeNodeId> = self[id]
            .mates
            .iter()
            .map(|m| m.node)
            .filter(|&m| self.get(m).is_some_and(|n| &n.data == partner))
            .collect();

        let node = &mut self[id];
        let before = node.mates.len();
        node.mates.retain(|m| !doomed.contains(&m.node));
        let removed = before - node.mates.len();
        debug!(%id, removed, "removed mate links");
        Ok(removed)
    }

    /// Adds `delta` to the height of every descendant of `id`, through
    /// children only. `id` itself is unchanged.
    pub fn offset_subtree_height(&mut self, id: TreeNodeId, delta: i32) -> Result<(), TreeError> {
        let mut stack = self.node(id)?.children.clone();
        while let Some(current) = stack.pop() {
            let node = &mut self[current];
            node.height += delta;
            trace!(node = %current, height = node.height, "shifted height");
            stack.extend_from_slice(&node.children);
        }
        Ok(())
    }

    /// Sets the height marker of a single node. Heights below -1 are
    /// rejected without touching the node.
    pub fn set_height(&mut self, id: TreeNodeId, height: i32) -> Result<(), TreeError> {
        if height < -1 {
            return Err(TreeError::MalformedHeight(height));
        }
        self.node_mut(id)?.height = height;
        Ok(())
    }

    pub fn set_position(&mut self, id: TreeNodeId, position: Position) -> Result<(), TreeError> {
        self.node_mut(id)?.position = position;
        Ok(())
    }
}

/// Payload transforms keep every id and link as is.
impl<V> GenealogyTree<V> {
    pub fn map<F, U>(self, mut transform: F) -> GenealogyTree<U>
    where
        F: FnMut(V) -> U,
    {
        GenealogyTree {
            nodes: self
                .nodes
                .into_iter()
                .map(|slot| slot.map(|n| n.map(&mut transform)))
                .collect(),
            root: self.root,
        }
    }

    pub fn map_ref<F, U>(&self, mut transform: F) -> GenealogyTree<U>
    where
        F: FnMut(&V) -> U,
    {
        GenealogyTree {
            nodes: self
                .nodes
                .iter()
                .map(|slot| slot.as_ref().map(|n| n.map_ref(&mut transform)))
                .collect(),
            root: self.root,
        }
    }
}
