//! Events emitted by the IBC handlers, and the generic attribute form hosts
//! index them by.

use core::fmt::{Display, Error as FmtError, Formatter};

use serde::{Deserialize, Serialize};

use crate::core::ics02_client::events as ClientEvents;
use crate::core::ics03_connection::events as ConnectionEvents;
use crate::core::ics04_channel::events as ChannelEvents;
use crate::core::ics26_routing::context::ModuleId;
use crate::Height;

/// Events types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IbcEventType {
    CreateClient,
    UpdateClient,
    UpgradeClient,
    ClientMisbehaviour,
    RecoverClient,
    StoreWasmCode,
    RemoveWasmChecksum,
    MigrateContract,
    OpenInitConnection,
    OpenTryConnection,
    OpenAckConnection,
    OpenConfirmConnection,
    OpenInitChannel,
    OpenTryChannel,
    OpenAckChannel,
    OpenConfirmChannel,
    CloseInitChannel,
    CloseConfirmChannel,
    SendPacket,
    ReceivePacket,
    WriteAck,
    AckPacket,
    Timeout,
    TimeoutOnClose,
    AppModule,
}

const CREATE_CLIENT_EVENT: &str = "create_client";
const UPDATE_CLIENT_EVENT: &str = "update_client";
const UPGRADE_CLIENT_EVENT: &str = "upgrade_client";
const CLIENT_MISBEHAVIOUR_EVENT: &str = "client_misbehaviour";
const RECOVER_CLIENT_EVENT: &str = "recover_client";
const STORE_WASM_CODE_EVENT: &str = "store_wasm_code";
const REMOVE_WASM_CHECKSUM_EVENT: &str = "remove_checksum";
const MIGRATE_CONTRACT_EVENT: &str = "migrate_contract";
const CONNECTION_INIT_EVENT: &str = "connection_open_init";
const CONNECTION_TRY_EVENT: &str = "connection_open_try";
const CONNECTION_ACK_EVENT: &str = "connection_open_ack";
const CONNECTION_CONFIRM_EVENT: &str = "connection_open_confirm";
const CHANNEL_OPEN_INIT_EVENT: &str = "channel_open_init";
const CHANNEL_OPEN_TRY_EVENT: &str = "channel_open_try";
const CHANNEL_OPEN_ACK_EVENT: &str = "channel_open_ack";
const CHANNEL_OPEN_CONFIRM_EVENT: &str = "channel_open_confirm";
const CHANNEL_CLOSE_INIT_EVENT: &str = "channel_close_init";
const CHANNEL_CLOSE_CONFIRM_EVENT: &str = "channel_close_confirm";
const SEND_PACKET_EVENT: &str = "send_packet";
const RECEIVE_PACKET_EVENT: &str = "recv_packet";
const WRITE_ACK_EVENT: &str = "write_acknowledgement";
const ACK_PACKET_EVENT: &str = "acknowledge_packet";
const TIMEOUT_EVENT: &str = "timeout_packet";
const TIMEOUT_ON_CLOSE_EVENT: &str = "timeout_on_close_packet";
const APP_MODULE_EVENT: &str = "app_module";

impl IbcEventType {
    pub fn as_str(&self) -> &'static str {
        match *self {
            IbcEventType::CreateClient => CREATE_CLIENT_EVENT,
            IbcEventType::UpdateClient => UPDATE_CLIENT_EVENT,
            IbcEventType::UpgradeClient => UPGRADE_CLIENT_EVENT,
            IbcEventType::ClientMisbehaviour => CLIENT_MISBEHAVIOUR_EVENT,
            IbcEventType::RecoverClient => RECOVER_CLIENT_EVENT,
            IbcEventType::StoreWasmCode => STORE_WASM_CODE_EVENT,
            IbcEventType::RemoveWasmChecksum => REMOVE_WASM_CHECKSUM_EVENT,
            IbcEventType::MigrateContract => MIGRATE_CONTRACT_EVENT,
            IbcEventType::OpenInitConnection => CONNECTION_INIT_EVENT,
            IbcEventType::OpenTryConnection => CONNECTION_TRY_EVENT,
            IbcEventType::OpenAckConnection => CONNECTION_ACK_EVENT,
            IbcEventType::OpenConfirmConnection => CONNECTION_CONFIRM_EVENT,
            IbcEventType::OpenInitChannel => CHANNEL_OPEN_INIT_EVENT,
            IbcEventType::OpenTryChannel => CHANNEL_OPEN_TRY_EVENT,
            IbcEventType::OpenAckChannel => CHANNEL_OPEN_ACK_EVENT,
            IbcEventType::OpenConfirmChannel => CHANNEL_OPEN_CONFIRM_EVENT,
            IbcEventType::CloseInitChannel => CHANNEL_CLOSE_INIT_EVENT,
            IbcEventType::CloseConfirmChannel => CHANNEL_CLOSE_CONFIRM_EVENT,
            IbcEventType::SendPacket => SEND_PACKET_EVENT,
            IbcEventType::ReceivePacket => RECEIVE_PACKET_EVENT,
            IbcEventType::WriteAck => WRITE_ACK_EVENT,
            IbcEventType::AckPacket => ACK_PACKET_EVENT,
            IbcEventType::Timeout => TIMEOUT_EVENT,
            IbcEventType::TimeoutOnClose => TIMEOUT_ON_CLOSE_EVENT,
            IbcEventType::AppModule => APP_MODULE_EVENT,
        }
    }
}

impl Display for IbcEventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IbcEvent {
    CreateClient(ClientEvents::CreateClient),
    UpdateClient(ClientEvents::UpdateClient),
    UpgradeClient(ClientEvents::UpgradeClient),
    ClientMisbehaviour(ClientEvents::ClientMisbehaviour),
    RecoverClient(ClientEvents::RecoverClient),
    StoreWasmCode(ClientEvents::WasmChecksum),
    RemoveWasmChecksum(ClientEvents::WasmChecksum),
    MigrateContract(ClientEvents::MigrateContract),

    OpenInitConnection(ConnectionEvents::OpenInit),
    OpenTryConnection(ConnectionEvents::OpenTry),
    OpenAckConnection(ConnectionEvents::OpenAck),
    OpenConfirmConnection(ConnectionEvents::OpenConfirm),

    OpenInitChannel(ChannelEvents::OpenInit),
    OpenTryChannel(ChannelEvents::OpenTry),
    OpenAckChannel(ChannelEvents::OpenAck),
    OpenConfirmChannel(ChannelEvents::OpenConfirm),
    CloseInitChannel(ChannelEvents::CloseInit),
    CloseConfirmChannel(ChannelEvents::CloseConfirm),

    SendPacket(ChannelEvents::SendPacket),
    ReceivePacket(ChannelEvents::ReceivePacket),
    WriteAcknowledgement(ChannelEvents::WriteAcknowledgement),
    AcknowledgePacket(ChannelEvents::AcknowledgePacket),
    TimeoutPacket(ChannelEvents::TimeoutPacket),
    TimeoutOnClosePacket(ChannelEvents::TimeoutOnClosePacket),

    AppModule(ModuleEvent),
}

impl Display for IbcEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            IbcEvent::AppModule(ev) => write!(f, "AppModuleEv({ev:?})"),
            _ => write!(f, "{}{{{}}}", self.event_type(), self.attributes_summary()),
        }
    }
}

impl IbcEvent {
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(value) => value,
            Err(_) => format!("{self:?}"), // Fallback to debug printing
        }
    }

    /// Height of the host chain at which the event was emitted, `None` for
    /// application events.
    pub fn height(&self) -> Option<Height> {
        let height = match self {
            IbcEvent::CreateClient(ev) => ev.height(),
            IbcEvent::UpdateClient(ev) => ev.height(),
            IbcEvent::UpgradeClient(ev) => ev.height(),
            IbcEvent::ClientMisbehaviour(ev) => ev.height(),
            IbcEvent::RecoverClient(ev) => ev.height,
            IbcEvent::StoreWasmCode(ev) | IbcEvent::RemoveWasmChecksum(ev) => ev.height,
            IbcEvent::MigrateContract(ev) => ev.height,
            IbcEvent::OpenInitConnection(ev) => ev.height(),
            IbcEvent::OpenTryConnection(ev) => ev.height(),
            IbcEvent::OpenAckConnection(ev) => ev.height(),
            IbcEvent::OpenConfirmConnection(ev) => ev.height(),
            IbcEvent::OpenInitChannel(ev) => ev.height(),
            IbcEvent::OpenTryChannel(ev) => ev.height(),
            IbcEvent::OpenAckChannel(ev) => ev.height(),
            IbcEvent::OpenConfirmChannel(ev) => ev.height(),
            IbcEvent::CloseInitChannel(ev) => ev.height(),
            IbcEvent::CloseConfirmChannel(ev) => ev.height(),
            IbcEvent::SendPacket(ev) => ev.height,
            IbcEvent::ReceivePacket(ev) => ev.height,
            IbcEvent::WriteAcknowledgement(ev) => ev.height,
            IbcEvent::AcknowledgePacket(ev) => ev.height,
            IbcEvent::TimeoutPacket(ev) => ev.height,
            IbcEvent::TimeoutOnClosePacket(ev) => ev.height,
            IbcEvent::AppModule(_) => return None,
        };
        Some(height)
    }

    pub fn event_type(&self) -> IbcEventType {
        match self {
            IbcEvent::CreateClient(_) => IbcEventType::CreateClient,
            IbcEvent::UpdateClient(_) => IbcEventType::UpdateClient,
            IbcEvent::UpgradeClient(_) => IbcEventType::UpgradeClient,
            IbcEvent::ClientMisbehaviour(_) => IbcEventType::ClientMisbehaviour,
            IbcEvent::RecoverClient(_) => IbcEventType::RecoverClient,
            IbcEvent::StoreWasmCode(_) => IbcEventType::StoreWasmCode,
            IbcEvent::RemoveWasmChecksum(_) => IbcEventType::RemoveWasmChecksum,
            IbcEvent::MigrateContract(_) => IbcEventType::MigrateContract,
            IbcEvent::OpenInitConnection(_) => IbcEventType::OpenInitConnection,
            IbcEvent::OpenTryConnection(_) => IbcEventType::OpenTryConnection,
            IbcEvent::OpenAckConnection(_) => IbcEventType::OpenAckConnection,
            IbcEvent::OpenConfirmConnection(_) => IbcEventType::OpenConfirmConnection,
            IbcEvent::OpenInitChannel(_) => IbcEventType::OpenInitChannel,
            IbcEvent::OpenTryChannel(_) => IbcEventType::OpenTryChannel,
            IbcEvent::OpenAckChannel(_) => IbcEventType::OpenAckChannel,
            IbcEvent::OpenConfirmChannel(_) => IbcEventType::OpenConfirmChannel,
            IbcEvent::CloseInitChannel(_) => IbcEventType::CloseInitChannel,
            IbcEvent::CloseConfirmChannel(_) => IbcEventType::CloseConfirmChannel,
            IbcEvent::SendPacket(_) => IbcEventType::SendPacket,
            IbcEvent::ReceivePacket(_) => IbcEventType::ReceivePacket,
            IbcEvent::WriteAcknowledgement(_) => IbcEventType::WriteAck,
            IbcEvent::AcknowledgePacket(_) => IbcEventType::AckPacket,
            IbcEvent::TimeoutPacket(_) => IbcEventType::Timeout,
            IbcEvent::TimeoutOnClosePacket(_) => IbcEventType::TimeoutOnClose,
            IbcEvent::AppModule(_) => IbcEventType::AppModule,
        }
    }

    /// The event flattened into indexable key/value attributes.
    pub fn attributes(&self) -> Vec<ModuleEventAttribute> {
        match self.clone() {
            IbcEvent::CreateClient(ev) => ev.0.into(),
            IbcEvent::UpdateClient(ev) => ev.into(),
            IbcEvent::UpgradeClient(ev) => ev.0.into(),
            IbcEvent::ClientMisbehaviour(ev) => ev.0.into(),
            IbcEvent::RecoverClient(ev) => ev.into(),
            IbcEvent::StoreWasmCode(ev) | IbcEvent::RemoveWasmChecksum(ev) => ev.into(),
            IbcEvent::MigrateContract(ev) => ev.into(),
            IbcEvent::OpenInitConnection(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenTryConnection(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenAckConnection(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenConfirmConnection(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenInitChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenTryChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenAckChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::OpenConfirmChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::CloseInitChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::CloseConfirmChannel(ev) => ev.attributes().clone().into(),
            IbcEvent::SendPacket(ev) => ev.packet.into(),
            IbcEvent::ReceivePacket(ev) => ev.packet.into(),
            IbcEvent::WriteAcknowledgement(ev) => ev.into(),
            IbcEvent::AcknowledgePacket(ev) => ev.packet.into(),
            IbcEvent::TimeoutPacket(ev) => ev.packet.into(),
            IbcEvent::TimeoutOnClosePacket(ev) => ev.packet.into(),
            IbcEvent::AppModule(ev) => ev.attributes,
        }
    }

    fn attributes_summary(&self) -> String {
        self.attributes()
            .iter()
            .map(|attr| format!("{}={}", attr.key, attr.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An event emitted by an application module through its callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEvent {
    pub kind: String,
    pub module_name: ModuleId,
    pub attributes: Vec<ModuleEventAttribute>,
}

impl From<ModuleEvent> for IbcEvent {
    fn from(e: ModuleEvent) -> Self {
        IbcEvent::AppModule(e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleEventAttribute {
    pub key: String,
    pub value: String,
}

impl<K: ToString, V: ToString> From<(K, V)> for ModuleEventAttribute {
    fn from((k, v): (K, V)) -> Self {
        Self {
            key: k.to_string(),
            value: v.to_string(),
        }
    }
}
