//! Definition of domain type message `MsgRecoverClient`, the governance
//! message replacing a frozen or expired client with a substitute.

use ibc_engine_proto::ibc::core::client::v1::MsgRecoverClient as RawMsgRecoverClient;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.client.v1.MsgRecoverClient";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecoverClient {
    pub subject_client_id: ClientId,
    pub substitute_client_id: ClientId,
    pub signer: Signer,
}

impl Msg for MsgRecoverClient {
    type Raw = RawMsgRecoverClient;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgRecoverClient> for MsgRecoverClient {}

impl TryFrom<RawMsgRecoverClient> for MsgRecoverClient {
    type Error = Error;

    fn try_from(raw: RawMsgRecoverClient) -> Result<Self, Self::Error> {
        Ok(MsgRecoverClient {
            subject_client_id: raw
                .subject_client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            substitute_client_id: raw
                .substitute_client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            signer: raw.signer.into(),
        })
    }
}

impl From<MsgRecoverClient> for RawMsgRecoverClient {
    fn from(msg: MsgRecoverClient) -> Self {
        RawMsgRecoverClient {
            subject_client_id: msg.subject_client_id.to_string(),
            substitute_client_id: msg.substitute_client_id.to_string(),
            signer: msg.signer.to_string(),
        }
    }
}
