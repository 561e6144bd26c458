//! Definition of domain type message `MsgUpdateClient`.

use ibc_engine_proto::ibc::core::client::v1::MsgUpdateClient as RawMsgUpdateClient;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const TYPE_URL: &str = "/ibc.core.client.v1.MsgUpdateClient";

/// A type of message that triggers the update of an on-chain (IBC) client with new headers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUpdateClient {
    pub client_id: ClientId,
    pub client_message: AnyClientMessage,
    pub signer: Signer,
}

impl MsgUpdateClient {
    pub fn new(client_id: ClientId, client_message: AnyClientMessage, signer: Signer) -> Self {
        MsgUpdateClient {
            client_id,
            client_message,
            signer,
        }
    }
}

impl Msg for MsgUpdateClient {
    type Raw = RawMsgUpdateClient;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgUpdateClient> for MsgUpdateClient {}

impl TryFrom<RawMsgUpdateClient> for MsgUpdateClient {
    type Error = Error;

    fn try_from(raw: RawMsgUpdateClient) -> Result<Self, Self::Error> {
        let raw_client_message = raw
            .client_message
            .ok_or_else(Error::missing_raw_client_message)?;

        Ok(MsgUpdateClient {
            client_id: raw
                .client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            client_message: AnyClientMessage::try_from(raw_client_message)?,
            signer: raw.signer.into(),
        })
    }
}

impl From<MsgUpdateClient> for RawMsgUpdateClient {
    fn from(ics_msg: MsgUpdateClient) -> Self {
        RawMsgUpdateClient {
            client_id: ics_msg.client_id.to_string(),
            client_message: Some(ics_msg.client_message.into()),
            signer: ics_msg.signer.to_string(),
        }
    }
}
