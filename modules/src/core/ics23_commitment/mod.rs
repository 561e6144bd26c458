//! ICS 23: Vector Commitment Scheme
//!
//! Proofs are ICS-23 commitment proofs, one per store layer, checked against
//! the [`specs::ProofSpecs`] a client declares. [`tree::MerkleTree`] is the
//! simple Merkle store the mock host commits with.

pub mod commitment;
pub mod error;
pub mod merkle;
pub mod specs;
pub mod tree;
