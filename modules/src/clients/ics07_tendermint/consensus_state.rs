use ibc_engine_proto::ibc::lightclients::tendermint::v1::ConsensusState as RawConsensusState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};
use tendermint::hash::Algorithm;
use tendermint::Hash;

use crate::clients::ics07_tendermint::error::Error;
use crate::clients::ics07_tendermint::header::Header;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::timestamp::Timestamp;

/// Root installed by an upgrade; proofs cannot be verified against it until
/// the client is updated past the upgrade height.
pub const SENTINEL_ROOT: &[u8] = b"sentinel_root";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
    pub next_validators_hash: Hash,
}

impl ConsensusState {
    pub fn new(root: CommitmentRoot, timestamp: Timestamp, next_validators_hash: Hash) -> Self {
        Self {
            timestamp,
            root,
            next_validators_hash,
        }
    }
}

impl crate::core::ics02_client::client_consensus::ConsensusState for ConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Tendermint
    }
}

impl Protobuf<RawConsensusState> for ConsensusState {}

impl TryFrom<RawConsensusState> for ConsensusState {
    type Error = Error;

    fn try_from(raw: RawConsensusState) -> Result<Self, Self::Error> {
        let time: tendermint::Time = raw
            .timestamp
            .ok_or_else(|| Error::invalid_raw_consensus_state("missing timestamp".to_string()))?
            .try_into()
            .map_err(|e: tendermint::Error| Error::invalid_raw_consensus_state(e.to_string()))?;
        let timestamp = Timestamp::from(time);
        if !timestamp.is_set() {
            return Err(Error::invalid_raw_consensus_state(format!(
                "timestamp {time} precedes the epoch"
            )));
        }

        let next_validators_hash = Hash::from_bytes(Algorithm::Sha256, &raw.next_validators_hash)
            .map_err(|e| Error::invalid_raw_consensus_state(e.to_string()))?;

        Ok(Self {
            timestamp,
            root: raw.root.ok_or_else(Error::missing_root)?.into(),
            next_validators_hash,
        })
    }
}

impl From<ConsensusState> for RawConsensusState {
    fn from(value: ConsensusState) -> Self {
        RawConsensusState {
            timestamp: value.timestamp.into_tm_time().map(Into::into),
            root: Some(value.root.into()),
            next_validators_hash: value.next_validators_hash.as_bytes().to_vec(),
        }
    }
}

impl From<Header> for ConsensusState {
    fn from(header: Header) -> Self {
        let block = header.signed_header.header;
        Self {
            root: CommitmentRoot::from(block.app_hash.as_bytes().to_vec()),
            timestamp: block.time.into(),
            next_validators_hash: block.next_validators_hash,
        }
    }
}
