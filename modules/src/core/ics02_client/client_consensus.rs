use core::fmt::Debug;
use core::marker::{Send, Sync};

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::lightclients::tendermint::v1::ConsensusState as RawTmConsensusState;
use ibc_engine_proto::ibc::lightclients::wasm::v1::ConsensusState as RawWasmConsensusState;
#[cfg(any(test, feature = "mocks"))]
use ibc_engine_proto::ibc::mock::ConsensusState as RawMockConsensusState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics07_tendermint::consensus_state::ConsensusState as TmConsensusState;
use crate::clients::ics08_wasm::consensus_state::ConsensusState as WasmConsensusState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;

#[cfg(any(test, feature = "mocks"))]
use crate::mock::client_state::MockConsensusState;

pub const TENDERMINT_CONSENSUS_STATE_TYPE_URL: &str =
    "/ibc.lightclients.tendermint.v1.ConsensusState";
pub const WASM_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.ConsensusState";
pub const MOCK_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.mock.ConsensusState";

pub trait ConsensusState: Clone + Debug + Send + Sync {
    /// Type of client associated with this consensus state (eg. Tendermint)
    fn client_type(&self) -> ClientType;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyConsensusState {
    Tendermint(TmConsensusState),
    Wasm(WasmConsensusState),

    #[cfg(any(test, feature = "mocks"))]
    Mock(MockConsensusState),
}

impl ConsensusState for AnyConsensusState {
    fn client_type(&self) -> ClientType {
        match self {
            AnyConsensusState::Tendermint(cs) => cs.client_type(),
            AnyConsensusState::Wasm(cs) => cs.client_type(),

            #[cfg(any(test, feature = "mocks"))]
            AnyConsensusState::Mock(cs) => cs.client_type(),
        }
    }
}

impl Protobuf<Any> for AnyConsensusState {}

impl TryFrom<Any> for AnyConsensusState {
    type Error = Error;

    fn try_from(value: Any) -> Result<Self, Self::Error> {
        match value.type_url.as_str() {
            "" => Err(Error::empty_consensus_state_response()),

            TENDERMINT_CONSENSUS_STATE_TYPE_URL => Ok(AnyConsensusState::Tendermint(
                Protobuf::<RawTmConsensusState>::decode_vec(&value.value)
                    .map_err(Error::decode_raw_consensus_state)?,
            )),

            WASM_CONSENSUS_STATE_TYPE_URL => Ok(AnyConsensusState::Wasm(
                Protobuf::<RawWasmConsensusState>::decode_vec(&value.value)
                    .map_err(Error::decode_raw_consensus_state)?,
            )),

            #[cfg(any(test, feature = "mocks"))]
            MOCK_CONSENSUS_STATE_TYPE_URL => Ok(AnyConsensusState::Mock(
                Protobuf::<RawMockConsensusState>::decode_vec(&value.value)
                    .map_err(Error::decode_raw_consensus_state)?,
            )),

            _ => Err(Error::unknown_consensus_state_type(value.type_url)),
        }
    }
}

impl From<AnyConsensusState> for Any {
    fn from(value: AnyConsensusState) -> Self {
        match value {
            AnyConsensusState::Tendermint(value) => Any {
                type_url: TENDERMINT_CONSENSUS_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawTmConsensusState>::encode_vec(&value),
            },
            AnyConsensusState::Wasm(value) => Any {
                type_url: WASM_CONSENSUS_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawWasmConsensusState>::encode_vec(&value),
            },

            #[cfg(any(test, feature = "mocks"))]
            AnyConsensusState::Mock(value) => Any {
                type_url: MOCK_CONSENSUS_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawMockConsensusState>::encode_vec(&value),
            },
        }
    }
}

impl From<TmConsensusState> for AnyConsensusState {
    fn from(cs: TmConsensusState) -> Self {
        Self::Tendermint(cs)
    }
}

impl From<WasmConsensusState> for AnyConsensusState {
    fn from(cs: WasmConsensusState) -> Self {
        Self::Wasm(cs)
    }
}

#[cfg(any(test, feature = "mocks"))]
impl From<MockConsensusState> for AnyConsensusState {
    fn from(cs: MockConsensusState) -> Self {
        Self::Mock(cs)
    }
}
