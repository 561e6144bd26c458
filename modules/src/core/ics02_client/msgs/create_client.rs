//! Definition of domain type message `MsgCreateClient`.

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::core::client::v1::MsgCreateClient as RawMsgCreateClient;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::client_consensus::{AnyConsensusState, ConsensusState};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::error::Error;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.client.v1.MsgCreateClient";

/// A type of message that triggers the creation of a new on-chain (IBC) client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgCreateClient {
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub signer: Signer,
}

impl MsgCreateClient {
    pub fn new(
        client_state: AnyClientState,
        consensus_state: AnyConsensusState,
        signer: Signer,
    ) -> Result<Self, Error> {
        if client_state.client_type() != consensus_state.client_type() {
            return Err(Error::client_args_type_mismatch(client_state.client_type()));
        }

        Ok(MsgCreateClient {
            client_state,
            consensus_state,
            signer,
        })
    }
}

impl Msg for MsgCreateClient {
    type Raw = RawMsgCreateClient;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgCreateClient> for MsgCreateClient {}

impl TryFrom<RawMsgCreateClient> for MsgCreateClient {
    type Error = Error;

    fn try_from(raw: RawMsgCreateClient) -> Result<Self, Error> {
        let raw_client_state = raw
            .client_state
            .ok_or_else(Error::missing_raw_client_state)?;

        let raw_consensus_state = raw
            .consensus_state
            .ok_or_else(Error::missing_raw_consensus_state)?;

        MsgCreateClient::new(
            AnyClientState::try_from(raw_client_state)?,
            AnyConsensusState::try_from(raw_consensus_state)?,
            raw.signer.into(),
        )
    }
}

impl From<MsgCreateClient> for RawMsgCreateClient {
    fn from(ics_msg: MsgCreateClient) -> Self {
        RawMsgCreateClient {
            client_state: Some(Any::from(ics_msg.client_state)),
            consensus_state: Some(Any::from(ics_msg.consensus_state)),
            signer: ics_msg.signer.to_string(),
        }
    }
}
