use ibc_engine_proto::ibc::lightclients::wasm::v1::ClientState as RawClientState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics08_wasm::error::Error;
use crate::core::ics02_client::client_type::ClientType;
use crate::Height;

/// Client state of a wasm client. `data` is the state of the wrapped client,
/// opaque to the host; only its verification module interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(with = "crate::serializers::base64")]
    pub data: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub checksum: Vec<u8>,
    pub latest_height: Height,
}

impl ClientState {
    pub fn new(data: Vec<u8>, checksum: Vec<u8>, latest_height: Height) -> Self {
        Self {
            data,
            checksum,
            latest_height,
        }
    }
}

impl crate::core::ics02_client::client_state::ClientState for ClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Wasm
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    // Freezing is tracked by the verification module and surfaces through
    // the status query.
    fn frozen_height(&self) -> Option<Height> {
        None
    }
}

impl Protobuf<RawClientState> for ClientState {}

impl TryFrom<RawClientState> for ClientState {
    type Error = Error;

    fn try_from(raw: RawClientState) -> Result<Self, Self::Error> {
        Ok(Self {
            data: raw.data,
            checksum: raw.checksum,
            latest_height: raw.latest_height.ok_or_else(Error::missing_latest_height)?.into(),
        })
    }
}

impl From<ClientState> for RawClientState {
    fn from(value: ClientState) -> Self {
        RawClientState {
            data: value.data,
            checksum: value.checksum,
            latest_height: Some(value.latest_height.into()),
        }
    }
}
