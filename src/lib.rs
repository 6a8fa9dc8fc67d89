//! # Kinship
//!
//! Kinship is a Rust library for genealogy trees of fictional worlds: a
//! general tree whose nodes have up to two parents, ordered children and any
//! number of partnerships, with lateral position and height markers for
//! layout consumers.
//!
//! The core lives in [`tree`]; [`drawing`] renders trees as text or Graphviz
//! and, with the `serde` feature, [`family`] builds trees from family files.

pub mod drawing;
#[cfg(feature = "serde")]
pub mod family;
pub mod tree;
