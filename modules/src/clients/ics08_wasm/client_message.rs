use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::lightclients::wasm::v1::ClientMessage as RawClientMessage;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics08_wasm::error::Error;
use crate::core::ics02_client::error::Error as Ics02Error;

pub const WASM_CLIENT_MESSAGE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.ClientMessage";

/// A header or misbehaviour of the wrapped client, passed through to the
/// verification module untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    #[serde(with = "crate::serializers::base64")]
    pub data: Vec<u8>,
}

impl ClientMessage {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl Protobuf<RawClientMessage> for ClientMessage {}

impl TryFrom<RawClientMessage> for ClientMessage {
    type Error = Error;

    fn try_from(raw: RawClientMessage) -> Result<Self, Self::Error> {
        Ok(Self { data: raw.data })
    }
}

impl From<ClientMessage> for RawClientMessage {
    fn from(value: ClientMessage) -> Self {
        RawClientMessage { data: value.data }
    }
}

impl TryFrom<Any> for ClientMessage {
    type Error = Ics02Error;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            WASM_CLIENT_MESSAGE_TYPE_URL => Protobuf::<RawClientMessage>::decode_vec(&raw.value)
                .map_err(Ics02Error::decode_raw_client_message),
            _ => Err(Ics02Error::unknown_client_message_type(raw.type_url)),
        }
    }
}

impl From<ClientMessage> for Any {
    fn from(value: ClientMessage) -> Self {
        Any {
            type_url: WASM_CLIENT_MESSAGE_TYPE_URL.to_string(),
            value: Protobuf::<RawClientMessage>::encode_vec(&value),
        }
    }
}
