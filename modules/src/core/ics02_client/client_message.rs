//! Messages a relayer submits to move a light client forward: headers that
//! extend trust, or evidence of misbehaviour.

use ibc_engine_proto::google::protobuf::Any;
use serde::{Deserialize, Serialize};

use crate::clients::ics07_tendermint::header::{
    ClientMessage as TmClientMessage, TENDERMINT_HEADER_TYPE_URL, TENDERMINT_MISBEHAVIOUR_TYPE_URL,
};
use crate::clients::ics08_wasm::client_message::{ClientMessage as WasmClientMessage, WASM_CLIENT_MESSAGE_TYPE_URL};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::Height;

#[cfg(any(test, feature = "mocks"))]
use crate::mock::header::{MockClientMessage, MOCK_HEADER_TYPE_URL, MOCK_MISBEHAVIOUR_TYPE_URL};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyClientMessage {
    Tendermint(TmClientMessage),
    Wasm(WasmClientMessage),

    #[cfg(any(test, feature = "mocks"))]
    Mock(MockClientMessage),
}

impl AnyClientMessage {
    pub fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(_) => ClientType::Tendermint,
            Self::Wasm(_) => ClientType::Wasm,

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(_) => ClientType::Mock,
        }
    }

    /// Height of the header, `None` for misbehaviour and opaque messages.
    pub fn height(&self) -> Option<Height> {
        match self {
            Self::Tendermint(TmClientMessage::Header(header)) => Some(header.height()),
            Self::Tendermint(TmClientMessage::Misbehaviour(_)) => None,
            Self::Wasm(_) => None,

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(MockClientMessage::Header(header)) => Some(header.height()),
            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(MockClientMessage::Misbehaviour(_)) => None,
        }
    }
}

impl TryFrom<Any> for AnyClientMessage {
    type Error = Error;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            TENDERMINT_HEADER_TYPE_URL | TENDERMINT_MISBEHAVIOUR_TYPE_URL => Ok(
                AnyClientMessage::Tendermint(TmClientMessage::try_from(raw)?),
            ),

            WASM_CLIENT_MESSAGE_TYPE_URL => Ok(AnyClientMessage::Wasm(
                WasmClientMessage::try_from(raw)?,
            )),

            #[cfg(any(test, feature = "mocks"))]
            MOCK_HEADER_TYPE_URL | MOCK_MISBEHAVIOUR_TYPE_URL => {
                Ok(AnyClientMessage::Mock(MockClientMessage::try_from(raw)?))
            }

            _ => Err(Error::unknown_client_message_type(raw.type_url)),
        }
    }
}

impl From<AnyClientMessage> for Any {
    fn from(value: AnyClientMessage) -> Self {
        match value {
            AnyClientMessage::Tendermint(msg) => msg.into(),
            AnyClientMessage::Wasm(msg) => msg.into(),

            #[cfg(any(test, feature = "mocks"))]
            AnyClientMessage::Mock(msg) => msg.into(),
        }
    }
}

impl From<TmClientMessage> for AnyClientMessage {
    fn from(msg: TmClientMessage) -> Self {
        Self::Tendermint(msg)
    }
}

impl From<WasmClientMessage> for AnyClientMessage {
    fn from(msg: WasmClientMessage) -> Self {
        Self::Wasm(msg)
    }
}

#[cfg(any(test, feature = "mocks"))]
impl From<MockClientMessage> for AnyClientMessage {
    fn from(msg: MockClientMessage) -> Self {
        Self::Mock(msg)
    }
}
