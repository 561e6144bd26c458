use ibc_engine_proto::ibc::core::commitment::v1::{MerklePath, MerkleProof as RawMerkleProof};
use ics23::commitment_proof::Proof;
use ics23::{
    calculate_existence_root, verify_membership, verify_non_membership, CommitmentProof,
    HostFunctionsManager, NonExistenceProof,
};

use super::commitment::{CommitmentPrefix, CommitmentRoot};
use super::error::Error;
use super::specs::ProofSpecs;

pub fn apply_prefix(prefix: &CommitmentPrefix, mut path: Vec<String>) -> MerklePath {
    let mut key_path: Vec<String> = vec![format!("{prefix:?}")];
    key_path.append(&mut path);
    MerklePath { key_path }
}

/// One ICS-23 proof per store layer, innermost first.
#[derive(Clone, Debug, PartialEq)]
pub struct MerkleProof {
    pub proofs: Vec<CommitmentProof>,
}

impl Eq for MerkleProof {}

impl From<RawMerkleProof> for MerkleProof {
    fn from(proof: RawMerkleProof) -> Self {
        Self {
            proofs: proof.proofs,
        }
    }
}

impl From<MerkleProof> for RawMerkleProof {
    fn from(proof: MerkleProof) -> Self {
        Self {
            proofs: proof.proofs,
        }
    }
}

impl MerkleProof {
    fn check_shape(&self, specs: &ProofSpecs, root: &CommitmentRoot, keys: &MerklePath) -> Result<(), Error> {
        if self.proofs.is_empty() {
            return Err(Error::empty_merkle_proof());
        }
        if root.is_empty() {
            return Err(Error::empty_merkle_root());
        }
        let num = self.proofs.len();
        if specs.len() != num {
            return Err(Error::number_of_specs_mismatch(specs.len(), num));
        }
        if keys.key_path.len() != num {
            return Err(Error::number_of_keys_mismatch(keys.key_path.len(), num));
        }
        Ok(())
    }

    /// Checks that `value` is stored under `keys` (outermost store key first) in the
    /// store committed to by `root`, starting at layer `start_index`.
    pub fn verify_membership(
        &self,
        specs: &ProofSpecs,
        root: &CommitmentRoot,
        keys: MerklePath,
        value: Vec<u8>,
        start_index: usize,
    ) -> Result<(), Error> {
        self.check_shape(specs, root, &keys)?;
        if value.is_empty() {
            return Err(Error::empty_verified_value());
        }

        let mut subroot = value.clone();
        let mut value = value;
        // keys run from root to leaf, proofs from leaf to root
        for ((proof, spec), key) in self
            .proofs
            .iter()
            .zip(specs.as_ref())
            .zip(keys.key_path.iter().rev())
            .skip(start_index)
        {
            match &proof.proof {
                Some(Proof::Exist(existence_proof)) => {
                    subroot = calculate_existence_root::<HostFunctionsManager>(existence_proof)
                        .map_err(|_| Error::invalid_merkle_proof())?;

                    if !verify_membership::<HostFunctionsManager>(
                        proof,
                        spec,
                        &subroot,
                        key.as_bytes(),
                        &value,
                    ) {
                        return Err(Error::verification_failure());
                    }
                    value = subroot.clone();
                }
                _ => return Err(Error::invalid_merkle_proof()),
            }
        }

        if root.as_bytes() != subroot.as_slice() {
            return Err(Error::verification_failure());
        }

        Ok(())
    }

    /// Checks that nothing is stored under `keys` in the store committed to by `root`:
    /// absence in the innermost store, membership of that store's root above it.
    pub fn verify_non_membership(
        &self,
        specs: &ProofSpecs,
        root: &CommitmentRoot,
        keys: MerklePath,
    ) -> Result<(), Error> {
        self.check_shape(specs, root, &keys)?;

        let proof = self.proofs.first().ok_or_else(Error::invalid_merkle_proof)?;
        let spec = specs.as_ref().first().ok_or_else(Error::invalid_merkle_proof)?;
        let key = keys.key_path.last().ok_or_else(Error::invalid_merkle_proof)?;

        match &proof.proof {
            Some(Proof::Nonexist(non_existence_proof)) => {
                let subroot = calculate_non_existence_root(non_existence_proof)?;

                if !verify_non_membership::<HostFunctionsManager>(
                    proof,
                    spec,
                    &subroot,
                    key.as_bytes(),
                ) {
                    return Err(Error::verification_failure());
                }

                self.verify_membership(specs, root, keys, subroot, 1)
            }
            _ => Err(Error::invalid_merkle_proof()),
        }
    }
}

fn calculate_non_existence_root(proof: &NonExistenceProof) -> Result<Vec<u8>, Error> {
    let neighbour = proof
        .left
        .as_ref()
        .or(proof.right.as_ref())
        .ok_or_else(Error::invalid_merkle_proof)?;
    calculate_existence_root::<HostFunctionsManager>(neighbour)
        .map_err(|_| Error::invalid_merkle_proof())
}
