use core::fmt;

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::merkle::MerkleProof;
use crate::core::ics24_host::error::ValidationError;
use crate::serializers::ser_hex_upper;
use ibc_engine_proto::ibc::core::commitment::v1::{
    MerklePrefix as RawMerklePrefix, MerkleProof as RawMerkleProof, MerkleRoot as RawMerkleRoot,
};

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitmentRoot {
    #[serde(serialize_with = "ser_hex_upper")]
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = subtle_encoding::hex::encode_upper(&self.bytes);
        write!(f, "CommitmentRoot({})", String::from_utf8_lossy(&hex))
    }
}

impl CommitmentRoot {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Vec::from(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<RawMerkleRoot> for CommitmentRoot {
    fn from(raw: RawMerkleRoot) -> Self {
        Self { bytes: raw.hash }
    }
}

impl From<CommitmentRoot> for RawMerkleRoot {
    fn from(root: CommitmentRoot) -> Self {
        RawMerkleRoot { hash: root.bytes }
    }
}

/// Opaque proof bytes as carried in messages; never empty.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommitmentProofBytes {
    #[serde(serialize_with = "ser_hex_upper")]
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = subtle_encoding::hex::encode(&self.bytes);
        write!(f, "CommitmentProofBytes({})", String::from_utf8_lossy(&hex))
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = ValidationError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(ValidationError::empty_proof())
        } else {
            Ok(Self { bytes })
        }
    }
}

impl From<CommitmentProofBytes> for Vec<u8> {
    fn from(p: CommitmentProofBytes) -> Vec<u8> {
        p.bytes
    }
}

impl AsRef<[u8]> for CommitmentProofBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<MerkleProof> for CommitmentProofBytes {
    fn from(proof: MerkleProof) -> Self {
        let raw_proof: RawMerkleProof = proof.into();
        Self {
            bytes: prost::Message::encode_to_vec(&raw_proof),
        }
    }
}

impl TryFrom<CommitmentProofBytes> for MerkleProof {
    type Error = Error;

    fn try_from(value: CommitmentProofBytes) -> Result<Self, Self::Error> {
        let raw: RawMerkleProof = prost::Message::decode(value.bytes.as_slice())
            .map_err(Error::invalid_raw_merkle_proof)?;
        Ok(raw.into())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CommitmentPrefix {
    bytes: Vec<u8>,
}

impl CommitmentPrefix {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl TryFrom<Vec<u8>> for CommitmentPrefix {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::empty_commitment_prefix())
        } else {
            Ok(Self { bytes })
        }
    }
}

impl TryFrom<RawMerklePrefix> for CommitmentPrefix {
    type Error = Error;

    fn try_from(raw: RawMerklePrefix) -> Result<Self, Self::Error> {
        Self::try_from(raw.key_prefix)
    }
}

impl From<CommitmentPrefix> for RawMerklePrefix {
    fn from(prefix: CommitmentPrefix) -> Self {
        RawMerklePrefix {
            key_prefix: prefix.bytes,
        }
    }
}

impl fmt::Debug for CommitmentPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = core::str::from_utf8(self.as_bytes());
        match converted {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => write!(f, "<not valid UTF8: {:?}>", self.as_bytes()),
        }
    }
}
