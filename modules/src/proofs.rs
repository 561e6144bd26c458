use flex_error::define_error;

use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    ProofError {
        ZeroHeight
            | _ | { "proof height cannot be zero" },
    }
}

/// Proofs carried by handshake and packet messages, all against the counterparty state root
/// that the local client stores for `height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proofs {
    object_proof: CommitmentProofBytes,
    client_proof: Option<CommitmentProofBytes>,
    consensus_proof: Option<ConsensusProof>,
    /// Closed counterparty channel end, for `MsgTimeoutOnClose`.
    other_proof: Option<CommitmentProofBytes>,
    height: Height,
}

impl Proofs {
    pub fn new(
        object_proof: CommitmentProofBytes,
        client_proof: Option<CommitmentProofBytes>,
        consensus_proof: Option<ConsensusProof>,
        other_proof: Option<CommitmentProofBytes>,
        height: Height,
    ) -> Result<Self, ProofError> {
        if height.is_zero() {
            return Err(ProofError::zero_height());
        }

        Ok(Self {
            object_proof,
            client_proof,
            consensus_proof,
            other_proof,
            height,
        })
    }

    /// Proof that the counterparty's client of this chain stores a consensus state of it.
    pub fn consensus_proof(&self) -> Option<ConsensusProof> {
        self.consensus_proof.clone()
    }

    pub fn height(&self) -> Height {
        self.height
    }

    /// Proof of the connection end, channel end, commitment, receipt or acknowledgement the
    /// message is about.
    pub fn object_proof(&self) -> &CommitmentProofBytes {
        &self.object_proof
    }

    pub fn client_proof(&self) -> &Option<CommitmentProofBytes> {
        &self.client_proof
    }

    pub fn other_proof(&self) -> &Option<CommitmentProofBytes> {
        &self.other_proof
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusProof {
    proof: CommitmentProofBytes,
    height: Height,
}

impl ConsensusProof {
    pub fn new(
        consensus_proof: CommitmentProofBytes,
        consensus_height: Height,
    ) -> Result<Self, ProofError> {
        if consensus_height.is_zero() {
            return Err(ProofError::zero_height());
        }

        Ok(Self {
            proof: consensus_proof,
            height: consensus_height,
        })
    }

    /// Height of the proven consensus state on the counterparty's client.
    pub fn height(&self) -> Height {
        self.height
    }

    pub fn proof(&self) -> &CommitmentProofBytes {
        &self.proof
    }
}
