use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_engine_proto::ibc::core::channel::v1::{
    Channel as RawChannel, Counterparty as RawCounterparty,
};
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::version::Version;
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};

/// One end of a channel, as stored under `channelEnds/ports/{port}/channels/{channel}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
}

impl Default for ChannelEnd {
    fn default() -> Self {
        ChannelEnd {
            state: State::Uninitialized,
            ordering: Order::default(),
            remote: Counterparty::default(),
            connection_hops: Vec::new(),
            version: Version::default(),
        }
    }
}

impl Display for ChannelEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let hops: Vec<&str> = self.connection_hops.iter().map(ConnectionId::as_str).collect();
        write!(
            f,
            "{} {} channel to {} over [{}] (version {})",
            self.state,
            self.ordering,
            self.remote,
            hops.join(", "),
            self.version
        )
    }
}

impl Protobuf<RawChannel> for ChannelEnd {}

impl TryFrom<RawChannel> for ChannelEnd {
    type Error = Error;

    fn try_from(raw: RawChannel) -> Result<Self, Self::Error> {
        let state = State::from_i32(raw.state)?;
        // An absent channel is encoded as a zeroed message.
        if state == State::Uninitialized {
            return Ok(ChannelEnd::default());
        }

        let remote = raw
            .counterparty
            .ok_or_else(Error::missing_counterparty)?
            .try_into()?;
        let connection_hops = raw
            .connection_hops
            .iter()
            .map(|hop| hop.parse())
            .collect::<Result<Vec<ConnectionId>, _>>()
            .map_err(Error::identifier)?;

        let channel = ChannelEnd::new(
            state,
            Order::from_i32(raw.ordering)?,
            remote,
            connection_hops,
            raw.version.into(),
        );
        channel.validate_basic()?;
        Ok(channel)
    }
}

impl From<ChannelEnd> for RawChannel {
    fn from(channel: ChannelEnd) -> Self {
        RawChannel {
            state: channel.state as i32,
            ordering: channel.ordering as i32,
            counterparty: Some(channel.remote.into()),
            connection_hops: channel
                .connection_hops
                .iter()
                .map(ToString::to_string)
                .collect(),
            version: channel.version.to_string(),
        }
    }
}

impl ChannelEnd {
    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
    ) -> Self {
        Self {
            state,
            ordering,
            remote,
            connection_hops,
            version,
        }
    }

    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn set_counterparty_channel_id(&mut self, channel_id: ChannelId) {
        self.remote.channel_id = Some(channel_id);
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn connection_hops(&self) -> &Vec<ConnectionId> {
        &self.connection_hops
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// The single connection this channel travels over. Multi-hop channels are not supported.
    pub fn connection_hop(&self) -> Result<&ConnectionId, Error> {
        match self.connection_hops.as_slice() {
            [hop] => Ok(hop),
            hops => Err(Error::invalid_connection_hops_length(1, hops.len())),
        }
    }

    pub fn validate_basic(&self) -> Result<(), Error> {
        self.connection_hop().map(|_| ())
    }

    pub fn state_matches(&self, state: &State) -> bool {
        &self.state == state
    }

    pub fn order_matches(&self, ordering: &Order) -> bool {
        &self.ordering == ordering
    }

    pub fn counterparty_matches(&self, counterparty: &Counterparty) -> bool {
        &self.remote == counterparty
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{}", self.port_id, channel_id),
            None => write!(f, "{}/<unknown channel>", self.port_id),
        }
    }
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = Error;

    fn try_from(raw: RawCounterparty) -> Result<Self, Self::Error> {
        let channel_id = if raw.channel_id.is_empty() {
            None
        } else {
            Some(raw.channel_id.parse().map_err(Error::identifier)?)
        };
        Ok(Counterparty::new(
            raw.port_id.parse().map_err(Error::identifier)?,
            channel_id,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(counterparty: Counterparty) -> Self {
        RawCounterparty {
            port_id: counterparty.port_id.to_string(),
            channel_id: counterparty
                .channel_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize, Default)]
pub enum Order {
    Uninitialized = 0,
    #[default]
    Unordered = 1,
    Ordered = 2,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "ORDER_NONE_UNSPECIFIED",
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }

    pub fn from_i32(value: i32) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Unordered),
            2 => Ok(Self::Ordered),
            _ => Err(Error::unknown_order_type(value.to_string())),
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.as_str())
    }
}

/// Handshake progress of a channel end. `Closed` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum State {
    Uninitialized = 0,
    Init = 1,
    TryOpen = 2,
    Open = 3,
    Closed = 4,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "STATE_UNINITIALIZED_UNSPECIFIED",
            Self::Init => "STATE_INIT",
            Self::TryOpen => "STATE_TRYOPEN",
            Self::Open => "STATE_OPEN",
            Self::Closed => "STATE_CLOSED",
        }
    }

    pub fn from_i32(value: i32) -> Result<Self, Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Init),
            2 => Ok(Self::TryOpen),
            3 => Ok(Self::Open),
            4 => Ok(Self::Closed),
            _ => Err(Error::unknown_state(value)),
        }
    }

    pub fn is_open(self) -> bool {
        self == State::Open
    }

    /// `true` if a channel in this state has not gone further than `other`.
    pub fn less_or_equal_progress(self, other: Self) -> bool {
        self as u32 <= other as u32
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
pub mod test_util {
    use ibc_engine_proto::ibc::core::channel::v1::{
        Channel as RawChannel, Counterparty as RawCounterparty,
    };

    use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};

    pub fn get_dummy_raw_counterparty() -> RawCounterparty {
        RawCounterparty {
            port_id: PortId::default().to_string(),
            channel_id: ChannelId::default().to_string(),
        }
    }

    /// An ordered channel end in `INIT` over `connection-0`.
    pub fn get_dummy_raw_channel_end() -> RawChannel {
        RawChannel {
            state: 1,
            ordering: 2,
            counterparty: Some(get_dummy_raw_counterparty()),
            connection_hops: vec![ConnectionId::default().to_string()],
            version: "ics20".to_string(),
        }
    }
}
