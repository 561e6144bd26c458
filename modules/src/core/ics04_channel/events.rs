//! Types for the IBC events emitted by the channel handshake and packet handlers.

use serde::{Deserialize, Serialize};

use crate::core::ics04_channel::packet::Packet;
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::events::{IbcEvent, ModuleEventAttribute};
use crate::Height;

/// Channel event attribute keys
pub const HEIGHT_ATTRIBUTE_KEY: &str = "height";
pub const CONNECTION_ID_ATTRIBUTE_KEY: &str = "connection_id";
pub const CHANNEL_ID_ATTRIBUTE_KEY: &str = "channel_id";
pub const PORT_ID_ATTRIBUTE_KEY: &str = "port_id";
pub const COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY: &str = "counterparty_channel_id";
pub const COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY: &str = "counterparty_port_id";

/// Packet event attribute keys
pub const PKT_SEQ_ATTRIBUTE_KEY: &str = "packet_sequence";
pub const PKT_DATA_ATTRIBUTE_KEY: &str = "packet_data";
pub const PKT_SRC_PORT_ATTRIBUTE_KEY: &str = "packet_src_port";
pub const PKT_SRC_CHANNEL_ATTRIBUTE_KEY: &str = "packet_src_channel";
pub const PKT_DST_PORT_ATTRIBUTE_KEY: &str = "packet_dst_port";
pub const PKT_DST_CHANNEL_ATTRIBUTE_KEY: &str = "packet_dst_channel";
pub const PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY: &str = "packet_timeout_height";
pub const PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY: &str = "packet_timeout_timestamp";
pub const PKT_ACK_ATTRIBUTE_KEY: &str = "packet_ack";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Attributes {
    pub height: Height,
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
    pub connection_id: ConnectionId,
    pub counterparty_port_id: PortId,
    pub counterparty_channel_id: Option<ChannelId>,
}

impl Attributes {
    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }
    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

/// Convert attributes to a list of key/value pairs. Absent channel identifiers are left out.
impl From<Attributes> for Vec<ModuleEventAttribute> {
    fn from(a: Attributes) -> Self {
        let mut attributes = vec![(HEIGHT_ATTRIBUTE_KEY, a.height).into()];
        attributes.push((PORT_ID_ATTRIBUTE_KEY, a.port_id).into());
        if let Some(channel_id) = a.channel_id {
            attributes.push((CHANNEL_ID_ATTRIBUTE_KEY, channel_id).into());
        }
        attributes.push((CONNECTION_ID_ATTRIBUTE_KEY, a.connection_id).into());
        attributes.push((COUNTERPARTY_PORT_ID_ATTRIBUTE_KEY, a.counterparty_port_id).into());
        if let Some(channel_id) = a.counterparty_channel_id {
            attributes.push((COUNTERPARTY_CHANNEL_ID_ATTRIBUTE_KEY, channel_id).into());
        }
        attributes
    }
}

/// Packet fields as event attributes. The data is hex encoded.
impl From<Packet> for Vec<ModuleEventAttribute> {
    fn from(p: Packet) -> Self {
        vec![
            (PKT_SRC_PORT_ATTRIBUTE_KEY, p.source_port).into(),
            (PKT_SRC_CHANNEL_ATTRIBUTE_KEY, p.source_channel).into(),
            (PKT_DST_PORT_ATTRIBUTE_KEY, p.destination_port).into(),
            (PKT_DST_CHANNEL_ATTRIBUTE_KEY, p.destination_channel).into(),
            (PKT_SEQ_ATTRIBUTE_KEY, p.sequence).into(),
            (PKT_TIMEOUT_HEIGHT_ATTRIBUTE_KEY, p.timeout_height).into(),
            (
                PKT_TIMEOUT_TIMESTAMP_ATTRIBUTE_KEY,
                p.timeout_timestamp.nanoseconds(),
            )
                .into(),
            (PKT_DATA_ATTRIBUTE_KEY, hex_upper(&p.data)).into(),
        ]
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    String::from_utf8(subtle_encoding::hex::encode_upper(bytes)).unwrap_or_default()
}

macro_rules! channel_event {
    ($name:ident, $variant:ident) => {
        #[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
        pub struct $name(Attributes);

        impl $name {
            pub fn attributes(&self) -> &Attributes {
                &self.0
            }
            pub fn port_id(&self) -> &PortId {
                &self.0.port_id
            }
            pub fn channel_id(&self) -> Option<&ChannelId> {
                self.0.channel_id.as_ref()
            }
            pub fn counterparty_channel_id(&self) -> Option<&ChannelId> {
                self.0.counterparty_channel_id.as_ref()
            }
            pub fn height(&self) -> Height {
                self.0.height
            }
            pub fn set_height(&mut self, height: Height) {
                self.0.height = height;
            }
        }

        impl From<Attributes> for $name {
            fn from(attrs: Attributes) -> Self {
                $name(attrs)
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }
    };
}

channel_event!(OpenInit, OpenInitChannel);
channel_event!(OpenTry, OpenTryChannel);
channel_event!(OpenAck, OpenAckChannel);
channel_event!(OpenConfirm, OpenConfirmChannel);
channel_event!(CloseInit, CloseInitChannel);
channel_event!(CloseConfirm, CloseConfirmChannel);

macro_rules! packet_event {
    ($name:ident, $variant:ident) => {
        #[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
        pub struct $name {
            pub height: Height,
            pub packet: Packet,
        }

        impl $name {
            pub fn src_port_id(&self) -> &PortId {
                &self.packet.source_port
            }
            pub fn src_channel_id(&self) -> &ChannelId {
                &self.packet.source_channel
            }
            pub fn dst_port_id(&self) -> &PortId {
                &self.packet.destination_port
            }
            pub fn dst_channel_id(&self) -> &ChannelId {
                &self.packet.destination_channel
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }
    };
}

packet_event!(SendPacket, SendPacket);
packet_event!(ReceivePacket, ReceivePacket);
packet_event!(AcknowledgePacket, AcknowledgePacket);
packet_event!(TimeoutPacket, TimeoutPacket);
packet_event!(TimeoutOnClosePacket, TimeoutOnClosePacket);

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    pub height: Height,
    pub packet: Packet,
    #[serde(serialize_with = "crate::serializers::ser_hex_upper")]
    pub ack: Vec<u8>,
}

impl WriteAcknowledgement {
    pub fn src_port_id(&self) -> &PortId {
        &self.packet.source_port
    }
    pub fn src_channel_id(&self) -> &ChannelId {
        &self.packet.source_channel
    }
    pub fn dst_port_id(&self) -> &PortId {
        &self.packet.destination_port
    }
    pub fn dst_channel_id(&self) -> &ChannelId {
        &self.packet.destination_channel
    }
}

impl From<WriteAcknowledgement> for Vec<ModuleEventAttribute> {
    fn from(v: WriteAcknowledgement) -> Self {
        let ack = hex_upper(&v.ack);
        let mut attributes: Vec<ModuleEventAttribute> = v.packet.into();
        attributes.push((PKT_ACK_ATTRIBUTE_KEY, ack).into());
        attributes
    }
}

impl From<WriteAcknowledgement> for IbcEvent {
    fn from(v: WriteAcknowledgement) -> Self {
        IbcEvent::WriteAcknowledgement(v)
    }
}
