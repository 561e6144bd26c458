//! Path-space as listed in ICS-024
//! <https://github.com/cosmos/ibc/tree/main/spec/core/ics-024-host-requirements#path-space>
//! Some of these are implemented in other ICSs, but ICS-024 has a nice summary table.

use core::fmt::{Display, Formatter, Result};

use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::Height;

/// ABCI client upgrade keys
/// - The key identifying the upgraded IBC state within the upgrade sub-store
const UPGRADED_IBC_STATE: &str = "upgradedIBCState";
/// - The key identifying the upgraded client state
const UPGRADED_CLIENT_STATE: &str = "upgradedClient";
/// - The key identifying the upgraded consensus state
const UPGRADED_CLIENT_CONSENSUS_STATE: &str = "upgradedConsState";

/// The Path enum abstracts out the different sub-paths.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Path {
    ClientState(ClientId),
    ClientConsensusState {
        client_id: ClientId,
        height: Height,
    },
    ClientConnections(ClientId),
    Connections(ConnectionId),
    Ports(PortId),
    ChannelEnds(PortId, ChannelId),
    SeqSends(PortId, ChannelId),
    SeqRecvs(PortId, ChannelId),
    SeqAcks(PortId, ChannelId),
    Commitments {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    Acks {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    Receipts {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    Upgrade(ClientUpgradePath),
}

/// Paths under which a chain commits the client and consensus states its
/// counterparties must upgrade to at a given upgrade height.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientUpgradePath {
    UpgradedClientState(u64),
    UpgradedClientConsensusState(u64),
}

impl Path {
    /// Indication if the path is provable.
    pub fn is_provable(&self) -> bool {
        !matches!(&self, Path::ClientConnections(_) | Path::Ports(_))
    }

    /// into_bytes implementation
    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

/// The Display trait adds the `.to_string()` method to the Path struct
/// This is where the different path strings are constructed
impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match &self {
            Path::ClientState(id) => write!(f, "clients/{id}/clientState"),
            Path::ClientConsensusState { client_id, height } => write!(
                f,
                "clients/{}/consensusStates/{}-{}",
                client_id, height.revision_number, height.revision_height
            ),
            Path::ClientConnections(id) => write!(f, "clients/{id}/connections"),
            Path::Connections(id) => write!(f, "connections/{id}"),
            Path::Ports(id) => write!(f, "ports/{id}"),
            Path::ChannelEnds(port_id, channel_id) => {
                write!(f, "channelEnds/ports/{port_id}/channels/{channel_id}")
            }
            Path::SeqSends(port_id, channel_id) => {
                write!(f, "nextSequenceSend/ports/{port_id}/channels/{channel_id}")
            }
            Path::SeqRecvs(port_id, channel_id) => {
                write!(f, "nextSequenceRecv/ports/{port_id}/channels/{channel_id}")
            }
            Path::SeqAcks(port_id, channel_id) => {
                write!(f, "nextSequenceAck/ports/{port_id}/channels/{channel_id}")
            }
            Path::Commitments {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "commitments/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
            Path::Acks {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "acks/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
            Path::Receipts {
                port_id,
                channel_id,
                sequence,
            } => write!(
                f,
                "receipts/ports/{port_id}/channels/{channel_id}/sequences/{sequence}"
            ),
            Path::Upgrade(ClientUpgradePath::UpgradedClientState(height)) => {
                write!(f, "{UPGRADED_IBC_STATE}/{height}/{UPGRADED_CLIENT_STATE}")
            }
            Path::Upgrade(ClientUpgradePath::UpgradedClientConsensusState(height)) => write!(
                f,
                "{UPGRADED_IBC_STATE}/{height}/{UPGRADED_CLIENT_CONSENSUS_STATE}"
            ),
        }
    }
}
