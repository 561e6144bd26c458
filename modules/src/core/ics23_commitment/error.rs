use flex_error::{define_error, TraceError};
use prost::DecodeError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        InvalidRawMerkleProof
            [ TraceError<DecodeError> ]
            |_| { "invalid raw merkle proof" },

        EmptyCommitmentPrefix
            |_| { "empty commitment prefix" },

        EmptyMerkleProof
            |_| { "empty merkle proof" },

        EmptyMerkleRoot
            |_| { "empty merkle root" },

        EmptyVerifiedValue
            |_| { "empty verified value" },

        NumberOfSpecsMismatch
            { specs: usize, proofs: usize }
            | e | { format_args!("{0} proof specs given for a proof of {1} layers", e.specs, e.proofs) },

        NumberOfKeysMismatch
            { keys: usize, proofs: usize }
            | e | { format_args!("{0} keys given for a proof of {1} layers", e.keys, e.proofs) },

        InvalidMerkleProof
            |_| { "invalid merkle proof" },

        VerificationFailure
            |_| { "failed to verify membership" },
    }
}
