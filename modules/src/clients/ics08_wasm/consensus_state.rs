use ibc_engine_proto::ibc::lightclients::wasm::v1::ConsensusState as RawConsensusState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics08_wasm::error::Error;
use crate::core::ics02_client::client_type::ClientType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusState {
    #[serde(with = "crate::serializers::base64")]
    pub data: Vec<u8>,
}

impl ConsensusState {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl crate::core::ics02_client::client_consensus::ConsensusState for ConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Wasm
    }
}

impl Protobuf<RawConsensusState> for ConsensusState {}

impl TryFrom<RawConsensusState> for ConsensusState {
    type Error = Error;

    fn try_from(raw: RawConsensusState) -> Result<Self, Self::Error> {
        Ok(Self { data: raw.data })
    }
}

impl From<ConsensusState> for RawConsensusState {
    fn from(value: ConsensusState) -> Self {
        RawConsensusState { data: value.data }
    }
}
