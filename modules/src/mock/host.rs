//! Blocks of the mock host chain.
//!
//! The IBC store is a substore of the host: the app hash is the root of an outer simple
//! Merkle tree holding the root of the IBC store under the commitment prefix, and proofs
//! carry one ICS-23 proof per layer.

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::core::ics23_commitment::merkle::MerkleProof;
use crate::core::ics23_commitment::tree::MerkleTree;
use crate::mock::client_state::MockConsensusState;
use crate::mock::context::COMMITMENT_PREFIX;
use crate::mock::header::MockHeader;
use crate::Height;

/// A block that is no longer the head of the chain: its header commits to the app hash of
/// the store as it was when the block opened, and that store is kept to answer proofs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostBlock {
    header: MockHeader,
    store: MerkleTree,
}

impl HostBlock {
    pub fn seal(height: Height, store: &MerkleTree) -> Self {
        Self {
            header: MockHeader::new(height).with_root(app_hash(store).into()),
            store: store.clone(),
        }
    }

    pub fn height(&self) -> Height {
        self.header.height()
    }

    pub fn header(&self) -> &MockHeader {
        &self.header
    }

    pub fn consensus_state(&self) -> AnyConsensusState {
        AnyConsensusState::Mock(MockConsensusState::new(self.header.clone()))
    }

    /// Proof of the presence, or of the absence, of `key` in the sealed store.
    pub fn prove(&self, key: &[u8]) -> CommitmentProofBytes {
        prove(&self.store, key)
    }
}

fn multistore(store: &MerkleTree) -> MerkleTree {
    let mut outer = MerkleTree::new();
    outer.set(COMMITMENT_PREFIX.to_vec(), store.root());
    outer
}

/// Root of the host state containing the IBC store `store`.
pub(crate) fn app_hash(store: &MerkleTree) -> Vec<u8> {
    multistore(store).root()
}

pub(crate) fn prove(store: &MerkleTree, key: &[u8]) -> CommitmentProofBytes {
    MerkleProof {
        proofs: vec![store.prove(key), multistore(store).prove(COMMITMENT_PREFIX)],
    }
    .into()
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentRoot};
    use crate::core::ics23_commitment::merkle::apply_prefix;
    use crate::core::ics23_commitment::specs::ProofSpecs;

    #[test]
    fn sealed_block_keeps_its_root() {
        let mut store = MerkleTree::new();
        store.set(b"key".to_vec(), b"value".to_vec());
        let block = HostBlock::seal(Height::new(0, 3), &store);

        store.set(b"key".to_vec(), b"changed".to_vec());
        assert_ne!(block.header().root().as_bytes(), app_hash(&store).as_slice());
        assert_eq!(block.height(), Height::new(0, 3));
    }

    #[test]
    fn sealed_block_proves_against_its_app_hash() {
        let mut store = MerkleTree::new();
        store.set(b"clients/07-tendermint-0/clientState".to_vec(), b"state".to_vec());
        store.set(b"ports/transfer".to_vec(), b"module".to_vec());
        let block = HostBlock::seal(Height::new(0, 3), &store);

        let prefix = CommitmentPrefix::try_from(COMMITMENT_PREFIX.to_vec()).unwrap();
        let root = CommitmentRoot::from_bytes(block.header().root().as_bytes());
        let path = |p: &str| apply_prefix(&prefix, vec![p.to_string()]);
        let specs = ProofSpecs::simple_merkle();

        let proof = MerkleProof::try_from(block.prove(b"ports/transfer")).unwrap();
        assert!(proof
            .verify_membership(&specs, &root, path("ports/transfer"), b"module".to_vec(), 0)
            .is_ok());

        let proof = MerkleProof::try_from(block.prove(b"ports/other")).unwrap();
        assert!(proof
            .verify_non_membership(&specs, &root, path("ports/other"))
            .is_ok());
    }
}
