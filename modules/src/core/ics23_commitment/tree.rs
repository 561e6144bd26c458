//! Simple Merkle tree over the sorted key/value pairs of a store, in the
//! layout described by [`ics23::tendermint_spec`].
//!
//! Leaves are `sha256(0x00 || varint(len(key)) || key || varint(32) || sha256(value))`,
//! inner nodes are `sha256(0x01 || left || right)` and the tree is split at the
//! largest power of two strictly smaller than the number of leaves. The root
//! of an empty tree is `sha256("")`.

use std::collections::BTreeMap;

use ics23::commitment_proof::Proof;
use ics23::{CommitmentProof, ExistenceProof, HashOp, InnerOp, LeafOp, LengthOp, NonExistenceProof};
use sha2::{Digest, Sha256};

const LEAF_PREFIX: u8 = 0;
const INNER_PREFIX: u8 = 1;

pub type Hash = Vec<u8>;

pub fn empty_hash() -> Hash {
    Sha256::digest(b"").to_vec()
}

fn leaf_op() -> LeafOp {
    LeafOp {
        hash: HashOp::Sha256 as i32,
        prehash_key: HashOp::NoHash as i32,
        prehash_value: HashOp::Sha256 as i32,
        length: LengthOp::VarProto as i32,
        prefix: vec![LEAF_PREFIX],
    }
}

fn length_prefixed(data: &[u8], out: &mut Vec<u8>) {
    prost::encoding::encode_varint(data.len() as u64, out);
    out.extend_from_slice(data);
}

pub fn leaf_hash(key: &[u8], value: &[u8]) -> Hash {
    let mut preimage = vec![LEAF_PREFIX];
    length_prefixed(key, &mut preimage);
    length_prefixed(&Sha256::digest(value), &mut preimage);
    Sha256::digest(preimage).to_vec()
}

pub fn inner_hash(left: &[u8], right: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([INNER_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().to_vec()
}

/// Largest power of two strictly smaller than `n`, for `n > 1`.
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}

fn root_of(leaves: &[Hash]) -> Hash {
    match leaves.len() {
        0 => empty_hash(),
        1 => leaves[0].clone(),
        n => {
            let k = split_point(n);
            inner_hash(&root_of(&leaves[..k]), &root_of(&leaves[k..]))
        }
    }
}

/// Inner steps from the leaf at `index` up to the root.
fn path_of(index: usize, leaves: &[Hash]) -> Vec<InnerOp> {
    if leaves.len() <= 1 {
        return Vec::new();
    }

    let k = split_point(leaves.len());
    if index < k {
        let mut path = path_of(index, &leaves[..k]);
        path.push(InnerOp {
            hash: HashOp::Sha256 as i32,
            prefix: vec![INNER_PREFIX],
            suffix: root_of(&leaves[k..]),
        });
        path
    } else {
        let mut path = path_of(index - k, &leaves[k..]);
        let mut prefix = vec![INNER_PREFIX];
        prefix.extend(root_of(&leaves[..k]));
        path.push(InnerOp {
            hash: HashOp::Sha256 as i32,
            prefix,
            suffix: Vec::new(),
        });
        path
    }
}

/// A key/value store committing to its content with a simple Merkle tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MerkleTree {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MerkleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &[u8]) -> Option<&Vec<u8>> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Option<Vec<u8>> {
        self.entries.insert(key, value)
    }

    pub fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries whose key starts with `prefix`, in key order.
    pub fn scan_prefix<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (&'a Vec<u8>, &'a Vec<u8>)> + 'a {
        self.entries
            .range(prefix.to_vec()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
    }

    fn leaves(&self) -> Vec<Hash> {
        self.entries
            .iter()
            .map(|(k, v)| leaf_hash(k, v))
            .collect()
    }

    pub fn root(&self) -> Hash {
        root_of(&self.leaves())
    }

    fn existence_proof(&self, index: usize, leaves: &[Hash]) -> Option<ExistenceProof> {
        let (key, value) = self.entries.iter().nth(index)?;
        Some(ExistenceProof {
            key: key.clone(),
            value: value.clone(),
            leaf: Some(leaf_op()),
            path: path_of(index, leaves),
        })
    }

    /// Produces an existence proof if `key` is present, a non-existence proof
    /// built from its neighbours otherwise. An empty tree yields a proof with
    /// no content, which never verifies.
    pub fn prove(&self, key: &[u8]) -> CommitmentProof {
        let leaves = self.leaves();
        let position = self.entries.range(..key.to_vec()).count();

        let proof = if self.entries.contains_key(key) {
            self.existence_proof(position, &leaves).map(Proof::Exist)
        } else if self.entries.is_empty() {
            None
        } else {
            Some(Proof::Nonexist(NonExistenceProof {
                key: key.to_vec(),
                left: position
                    .checked_sub(1)
                    .and_then(|i| self.existence_proof(i, &leaves)),
                right: self.existence_proof(position, &leaves),
            }))
        };

        CommitmentProof { proof }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ics23::HostFunctionsManager;
    use test_log::test;

    fn tree_of(n: usize) -> MerkleTree {
        let mut tree = MerkleTree::new();
        for i in 0..n {
            tree.set(format!("key{i}").into_bytes(), vec![i as u8 + 1]);
        }
        tree
    }

    #[test]
    fn every_leaf_proof_verifies_against_the_root() {
        let spec = ics23::tendermint_spec();
        for n in 1..=9usize {
            let tree = tree_of(n);
            let root = tree.root();

            for i in 0..n {
                let key = format!("key{i}").into_bytes();
                let proof = tree.prove(&key);
                assert!(
                    ics23::verify_membership::<HostFunctionsManager>(
                        &proof,
                        &spec,
                        &root,
                        &key,
                        &[i as u8 + 1]
                    ),
                    "leaf {i} of {n}"
                );
            }
        }
    }

    #[test]
    fn absent_keys_verify_between_and_beyond_neighbours() {
        let spec = ics23::tendermint_spec();
        for n in 1..=6usize {
            let tree = tree_of(n);
            let root = tree.root();

            for absent in ["a", "key0a", "key2a", "zzz"] {
                let proof = tree.prove(absent.as_bytes());
                assert!(
                    ics23::verify_non_membership::<HostFunctionsManager>(
                        &proof,
                        &spec,
                        &root,
                        absent.as_bytes()
                    ),
                    "absence of {absent} in {n} leaves"
                );
            }
        }
    }

    #[test]
    fn root_changes_with_content() {
        let mut tree = MerkleTree::new();
        assert_eq!(tree.root(), empty_hash());

        tree.set(b"a".to_vec(), b"1".to_vec());
        let root1 = tree.root();
        tree.set(b"a".to_vec(), b"2".to_vec());
        let root2 = tree.root();
        assert_ne!(root1, root2);

        tree.delete(b"a");
        assert_eq!(tree.root(), empty_hash());
    }

    #[test]
    fn empty_tree_cannot_prove_absence() {
        let proof = MerkleTree::new().prove(b"a");
        assert!(proof.proof.is_none());
    }

    #[test]
    fn scan_prefix_stays_within_prefix() {
        let mut tree = MerkleTree::new();
        tree.set(b"ibc/a".to_vec(), vec![1]);
        tree.set(b"ibc/b".to_vec(), vec![2]);
        tree.set(b"ibd".to_vec(), vec![3]);
        let keys: Vec<_> = tree.scan_prefix(b"ibc/").map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec![b"ibc/a".to_vec(), b"ibc/b".to_vec()]);
    }
}
