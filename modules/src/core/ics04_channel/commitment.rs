//! Packet and acknowledgement commitments: the hashes a chain stores (and proves) in place
//! of the packet data and acknowledgements themselves.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::timestamp::Timestamp;

/// Packet commitment
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PacketCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Acknowledgement commitment to be stored
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for AcknowledgementCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// `sha256(timeout_timestamp ‖ timeout_revision_number ‖ timeout_revision_height ‖ sha256(data))`,
/// integers big endian.
pub fn compute_packet_commitment(
    packet_data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &Timestamp,
) -> PacketCommitment {
    let mut hash_input = timeout_timestamp.nanoseconds().to_be_bytes().to_vec();

    let revision_number = timeout_height.commitment_revision_number().to_be_bytes();
    hash_input.append(&mut revision_number.to_vec());

    let revision_height = timeout_height.commitment_revision_height().to_be_bytes();
    hash_input.append(&mut revision_height.to_vec());

    let packet_data_hash = Sha256::digest(packet_data);
    hash_input.append(&mut packet_data_hash.to_vec());

    Sha256::digest(&hash_input).to_vec().into()
}

pub fn compute_ack_commitment(ack: &[u8]) -> AcknowledgementCommitment {
    Sha256::digest(ack).to_vec().into()
}
