//! Types for the IBC events emitted by the client module.

use serde::{Deserialize, Serialize};
use subtle_encoding::hex;

use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::height::Height;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::{IbcEvent, ModuleEventAttribute};

/// The content of the `key` field for the attribute containing the height.
pub const HEIGHT_ATTRIBUTE_KEY: &str = "height";

/// The content of the `key` field for the attribute containing the client identifier.
pub const CLIENT_ID_ATTRIBUTE_KEY: &str = "client_id";

/// The content of the `key` field for the attribute containing the client type.
pub const CLIENT_TYPE_ATTRIBUTE_KEY: &str = "client_type";

/// The content of the `key` field for the attribute containing the height.
pub const CONSENSUS_HEIGHT_ATTRIBUTE_KEY: &str = "consensus_height";

/// The content of the `key` field for the attribute listing every consensus height an update stored.
pub const CONSENSUS_HEIGHTS_ATTRIBUTE_KEY: &str = "consensus_heights";

pub const SUBJECT_CLIENT_ID_ATTRIBUTE_KEY: &str = "subject_client_id";

pub const CHECKSUM_ATTRIBUTE_KEY: &str = "checksum";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub height: Height,
    pub client_id: ClientId,
    pub client_type: ClientType,
    pub consensus_height: Height,
}

impl Attributes {
    pub fn new(
        height: Height,
        client_id: ClientId,
        client_type: ClientType,
        consensus_height: Height,
    ) -> Self {
        Self {
            height,
            client_id,
            client_type,
            consensus_height,
        }
    }
}

impl From<Attributes> for Vec<ModuleEventAttribute> {
    fn from(a: Attributes) -> Self {
        vec![
            (HEIGHT_ATTRIBUTE_KEY, a.height.to_string()).into(),
            (CLIENT_ID_ATTRIBUTE_KEY, a.client_id.to_string()).into(),
            (CLIENT_TYPE_ATTRIBUTE_KEY, a.client_type.as_str().to_string()).into(),
            (CONSENSUS_HEIGHT_ATTRIBUTE_KEY, a.consensus_height.to_string()).into(),
        ]
    }
}

impl core::fmt::Display for Attributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "h: {}, cs_h: {}({})",
            self.height, self.client_id, self.consensus_height
        )
    }
}

/// CreateClient event signals the creation of a new on-chain client (IBC client).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CreateClient(pub Attributes);

impl CreateClient {
    pub fn client_id(&self) -> &ClientId {
        &self.0.client_id
    }

    pub fn height(&self) -> Height {
        self.0.height
    }
}

impl From<Attributes> for CreateClient {
    fn from(attrs: Attributes) -> Self {
        CreateClient(attrs)
    }
}

impl From<CreateClient> for IbcEvent {
    fn from(v: CreateClient) -> Self {
        IbcEvent::CreateClient(v)
    }
}

/// UpdateClient event signals a recent update of an on-chain client (IBC Client).
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpdateClient {
    pub common: Attributes,
    /// Every height a consensus state was stored at, ascending.
    pub consensus_heights: Vec<Height>,
}

impl UpdateClient {
    pub fn client_id(&self) -> &ClientId {
        &self.common.client_id
    }

    pub fn client_type(&self) -> ClientType {
        self.common.client_type
    }

    pub fn height(&self) -> Height {
        self.common.height
    }

    pub fn consensus_height(&self) -> Height {
        self.common.consensus_height
    }
}

impl From<UpdateClient> for IbcEvent {
    fn from(v: UpdateClient) -> Self {
        IbcEvent::UpdateClient(v)
    }
}

impl From<UpdateClient> for Vec<ModuleEventAttribute> {
    fn from(v: UpdateClient) -> Self {
        let heights = v
            .consensus_heights
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut attributes: Vec<ModuleEventAttribute> = v.common.into();
        attributes.push((CONSENSUS_HEIGHTS_ATTRIBUTE_KEY, heights).into());
        attributes
    }
}

impl core::fmt::Debug for UpdateClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} heights: {:?}", self.common, self.consensus_heights)
    }
}

/// ClientMisbehaviour event signals the freezing of a client after
/// misbehaviour of its counterparty was detected.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientMisbehaviour(pub Attributes);

impl ClientMisbehaviour {
    pub fn client_id(&self) -> &ClientId {
        &self.0.client_id
    }

    pub fn height(&self) -> Height {
        self.0.height
    }
}

impl From<Attributes> for ClientMisbehaviour {
    fn from(attrs: Attributes) -> Self {
        ClientMisbehaviour(attrs)
    }
}

impl From<ClientMisbehaviour> for IbcEvent {
    fn from(v: ClientMisbehaviour) -> Self {
        IbcEvent::ClientMisbehaviour(v)
    }
}

/// Signals a recent upgrade of an on-chain client (IBC Client).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct UpgradeClient(pub Attributes);

impl UpgradeClient {
    pub fn client_id(&self) -> &ClientId {
        &self.0.client_id
    }

    pub fn height(&self) -> Height {
        self.0.height
    }
}

impl From<Attributes> for UpgradeClient {
    fn from(attrs: Attributes) -> Self {
        UpgradeClient(attrs)
    }
}

impl From<UpgradeClient> for IbcEvent {
    fn from(v: UpgradeClient) -> Self {
        IbcEvent::UpgradeClient(v)
    }
}

/// Signals that a frozen or expired client was recovered from a substitute.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RecoverClient {
    pub height: Height,
    pub subject_client_id: ClientId,
    pub client_type: ClientType,
}

impl From<RecoverClient> for IbcEvent {
    fn from(v: RecoverClient) -> Self {
        IbcEvent::RecoverClient(v)
    }
}

impl From<RecoverClient> for Vec<ModuleEventAttribute> {
    fn from(v: RecoverClient) -> Self {
        vec![
            (HEIGHT_ATTRIBUTE_KEY, v.height.to_string()).into(),
            (SUBJECT_CLIENT_ID_ATTRIBUTE_KEY, v.subject_client_id.to_string()).into(),
            (CLIENT_TYPE_ATTRIBUTE_KEY, v.client_type.as_str().to_string()).into(),
        ]
    }
}

/// Signals a change to the checksum allow-list of wasm verification modules.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WasmChecksum {
    pub height: Height,
    #[serde(with = "crate::serializers::base64")]
    pub checksum: Vec<u8>,
}

impl From<WasmChecksum> for Vec<ModuleEventAttribute> {
    fn from(v: WasmChecksum) -> Self {
        let checksum = String::from_utf8(hex::encode(&v.checksum)).unwrap_or_default();
        vec![
            (HEIGHT_ATTRIBUTE_KEY, v.height.to_string()).into(),
            (CHECKSUM_ATTRIBUTE_KEY, checksum).into(),
        ]
    }
}

/// Signals that a wasm client now runs a different verification module.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MigrateContract {
    pub height: Height,
    pub client_id: ClientId,
    #[serde(with = "crate::serializers::base64")]
    pub checksum: Vec<u8>,
}

impl From<MigrateContract> for Vec<ModuleEventAttribute> {
    fn from(v: MigrateContract) -> Self {
        let checksum = String::from_utf8(hex::encode(&v.checksum)).unwrap_or_default();
        vec![
            (HEIGHT_ATTRIBUTE_KEY, v.height.to_string()).into(),
            (CLIENT_ID_ATTRIBUTE_KEY, v.client_id.to_string()).into(),
            (CHECKSUM_ATTRIBUTE_KEY, checksum).into(),
        ]
    }
}

impl WasmChecksum {
    /// Event for a checksum added to the allow-list.
    pub fn stored(self) -> IbcEvent {
        IbcEvent::StoreWasmCode(self)
    }

    /// Event for a checksum removed from the allow-list.
    pub fn removed(self) -> IbcEvent {
        IbcEvent::RemoveWasmChecksum(self)
    }
}

impl From<MigrateContract> for IbcEvent {
    fn from(v: MigrateContract) -> Self {
        IbcEvent::MigrateContract(v)
    }
}
