//! Definition of domain type msg `MsgUpgradeClient`.

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::core::client::v1::MsgUpgradeClient as RawMsgUpgradeClient;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_state::AnyClientState;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::core::ics24_host::identifier::ClientId;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.client.v1.MsgUpgradeClient";

/// A type of message that triggers the upgrade of an on-chain (IBC) client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUpgradeClient {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub proof_upgrade_client: CommitmentProofBytes,
    pub proof_upgrade_consensus_state: CommitmentProofBytes,
    pub signer: Signer,
}

impl Msg for MsgUpgradeClient {
    type Raw = RawMsgUpgradeClient;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgUpgradeClient> for MsgUpgradeClient {}

impl TryFrom<RawMsgUpgradeClient> for MsgUpgradeClient {
    type Error = Error;

    fn try_from(proto_msg: RawMsgUpgradeClient) -> Result<Self, Self::Error> {
        let raw_client_state = proto_msg
            .client_state
            .ok_or_else(Error::missing_raw_client_state)?;

        let raw_consensus_state = proto_msg
            .consensus_state
            .ok_or_else(Error::missing_raw_consensus_state)?;

        Ok(MsgUpgradeClient {
            client_id: proto_msg
                .client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            client_state: AnyClientState::try_from(raw_client_state)?,
            consensus_state: AnyConsensusState::try_from(raw_consensus_state)?,
            proof_upgrade_client: proto_msg
                .proof_upgrade_client
                .try_into()
                .map_err(Error::invalid_raw_proof)?,
            proof_upgrade_consensus_state: proto_msg
                .proof_upgrade_consensus_state
                .try_into()
                .map_err(Error::invalid_raw_proof)?,
            signer: proto_msg.signer.into(),
        })
    }
}

impl From<MsgUpgradeClient> for RawMsgUpgradeClient {
    fn from(dm_msg: MsgUpgradeClient) -> RawMsgUpgradeClient {
        RawMsgUpgradeClient {
            client_id: dm_msg.client_id.to_string(),
            client_state: Some(Any::from(dm_msg.client_state)),
            consensus_state: Some(Any::from(dm_msg.consensus_state)),
            proof_upgrade_client: dm_msg.proof_upgrade_client.into(),
            proof_upgrade_consensus_state: dm_msg.proof_upgrade_consensus_state.into(),
            signer: dm_msg.signer.to_string(),
        }
    }
}
