//! Family files: a serialisable cast of characters and their relations,
//! replayed in order onto a [`GenealogyTree`].
//!
//! ```json
//! {
//!   "root": { "id": 1, "name": "Elrond" },
//!   "members": [
//!     { "id": 2, "name": "Celebrían", "relation": { "mate_of": { "partner": 1, "relationship": 1 } } },
//!     { "id": 3, "name": "Arwen", "relation": { "child_of": 1 } },
//!     { "id": 4, "name": "Eärendil", "relation": { "parent_of": null } }
//!   ]
//! }
//! ```

use std::fmt::Display;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tree::{GenealogyTree, Identified, RelationshipId, TreeError, TreeNodeId};

/// A person of the fictional world, keyed by its record id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
}

impl Identified for Character {
    type Id = u64;
    fn id(&self) -> u64 {
        self.id
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// How a member attaches to characters already in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Child of the given character.
    ChildOf(u64),
    /// Partner of the given character.
    MateOf {
        partner: u64,
        relationship: RelationshipId,
    },
    /// Parent spliced above the given character, or above the root for `null`.
    ParentOf(Option<u64>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    #[serde(flatten)]
    pub character: Character,
    pub relation: Relation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyFile {
    pub root: Character,
    #[serde(default)]
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FamilyError {
    #[error("Character {0} is referenced before it is defined")]
    UnknownCharacter(u64),
    #[error("Character {0} is defined twice")]
    DuplicateCharacter(u64),
    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl FamilyFile {
    /// Replays the members in file order.
    pub fn build(&self) -> Result<GenealogyTree<Character>, FamilyError> {
        let mut tree = GenealogyTree::new(self.root.clone());
        let mut index: AHashMap<u64, TreeNodeId> = AHashMap::new();
        index.insert(self.root.id, tree.root());

        for member in &self.members {
            let character = member.character.clone();
            if index.contains_key(&character.id) {
                return Err(FamilyError::DuplicateCharacter(character.id));
            }
            let lookup = |id: u64| {
                index
                    .get(&id)
                    .copied()
                    .ok_or(FamilyError::UnknownCharacter(id))
            };

            let key = character.id;
            let node = match &member.relation {
                Relation::ChildOf(parent) => tree.add_node(character, lookup(*parent)?)?,
                Relation::MateOf {
                    partner,
                    relationship,
                } => tree.add_mate(character, *relationship, lookup(*partner)?)?,
                Relation::ParentOf(child) => {
                    let at = child.map(lookup).transpose()?;
                    tree.add_parent(character, at)?
                }
            };
            index.insert(key, node);
        }
        Ok(tree)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const SAMPLE: &str = r#"{
        "root": { "id": 1, "name": "Elrond" },
        "members": [
            { "id": 2, "name": "Celebrian", "relation": { "mate_of": { "partner": 1, "relationship": 1 } } },
            { "id": 3, "name": "Elladan", "relation": { "child_of": 1 } },
            { "id": 4, "name": "Arwen", "relation": { "child_of": 1 } },
            { "id": 5, "name": "Earendil", "relation": { "parent_of": null } }
        ]
    }"#;

    #[test]
    fn build_sample() {
        let file: FamilyFile = serde_json::from_str(SAMPLE).unwrap();
        let tree = file.build().unwrap();

        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(tree[tree.root()].data().name, "Earendil");
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.width(), 2);
        assert_eq!(tree.current_ids(), vec![5, 1, 3, 4]);
        assert_eq!(tree.current_ids_with_mates(), vec![5, 1, 2, 3, 4]);
    }

    #[test]
    fn unknown_and_duplicate_references() {
        let mut file: FamilyFile = serde_json::from_str(SAMPLE).unwrap();
        file.members[1].relation = Relation::ChildOf(42);
        assert_eq!(file.build(), Err(FamilyError::UnknownCharacter(42)));

        let mut file: FamilyFile = serde_json::from_str(SAMPLE).unwrap();
        file.members[2].character.id = 3;
        assert_eq!(file.build(), Err(FamilyError::DuplicateCharacter(3)));
    }

    #[test]
    fn splice_above_a_mate_is_rejected() {
        let mut file: FamilyFile = serde_json::from_str(SAMPLE).unwrap();
        file.members.push(Member {
            character: Character {
                id: 6,
                name: "Celeborn".into(),
            },
            relation: Relation::ParentOf(Some(2)),
        });
        assert!(matches!(
            file.build(),
            Err(FamilyError::Tree(TreeError::NoLineageParent(_)))
        ));
    }

    #[test]
    fn round_trips_through_json() {
        let file: FamilyFile = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&file).unwrap();
        let again: FamilyFile = serde_json::from_str(&json).unwrap();
        assert_eq!(file, again);
    }
}
