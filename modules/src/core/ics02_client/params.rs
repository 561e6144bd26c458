//! Host-level parameters of the client module.

use serde::{Deserialize, Serialize};

use ibc_engine_proto::ibc::core::client::v1::Params as RawParams;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;

/// Wildcard entry of `allowed_clients` admitting every client type.
pub const ALLOW_ALL_CLIENTS: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Client types the host accepts in `MsgCreateClient`, as their string
    /// identifiers (`07-tendermint`, `08-wasm`, ...) or `*`.
    pub allowed_clients: Vec<String>,
}

impl Params {
    pub fn new(allowed_clients: Vec<String>) -> Self {
        Self { allowed_clients }
    }

    pub fn allow_all() -> Self {
        Self::new(vec![ALLOW_ALL_CLIENTS.to_string()])
    }

    pub fn is_allowed(&self, client_type: ClientType) -> bool {
        self.allowed_clients
            .iter()
            .any(|allowed| allowed == ALLOW_ALL_CLIENTS || allowed == client_type.as_str())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl Protobuf<RawParams> for Params {}

impl TryFrom<RawParams> for Params {
    type Error = Error;

    fn try_from(raw: RawParams) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.allowed_clients))
    }
}

impl From<Params> for RawParams {
    fn from(params: Params) -> Self {
        RawParams {
            allowed_clients: params.allowed_clients,
        }
    }
}
