//! ICS4 (channel) context. The two traits `ChannelReader ` and `ChannelKeeper` define
//! the interface that any host chain must implement to be able to process any `ChannelMsg`
//! or `PacketMsg`.

use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::handler::acknowledgement::AckPacketResult;
use crate::core::ics04_channel::handler::recv_packet::RecvPacketResult;
use crate::core::ics04_channel::handler::timeout::TimeoutPacketResult;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics05_port::capabilities::{channel_capability_name, ChannelCapability};
use crate::core::ics05_port::context::{CapabilityKeeper, PortReader};
use crate::core::ics24_host::identifier::{ChannelId, ConnectionId, PortId};
use crate::core::ics26_routing::context::ModuleId;

/// A context supplying all the necessary read-only dependencies for processing any `ChannelMsg`.
pub trait ChannelReader: ConnectionReader + PortReader {
    /// Returns the ChannelEnd for the given `port_id` and `chan_id`.
    fn channel_end(&self, port_channel_id: &(PortId, ChannelId)) -> Result<ChannelEnd, Error>;

    fn connection_channels(&self, cid: &ConnectionId) -> Result<Vec<(PortId, ChannelId)>, Error>;

    fn get_next_sequence_send(
        &self,
        port_channel_id: &(PortId, ChannelId),
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_recv(
        &self,
        port_channel_id: &(PortId, ChannelId),
    ) -> Result<Sequence, Error>;

    fn get_next_sequence_ack(
        &self,
        port_channel_id: &(PortId, ChannelId),
    ) -> Result<Sequence, Error>;

    fn get_packet_commitment(
        &self,
        key: &(PortId, ChannelId, Sequence),
    ) -> Result<PacketCommitment, Error>;

    fn get_packet_receipt(&self, key: &(PortId, ChannelId, Sequence)) -> Result<Receipt, Error>;

    fn get_packet_acknowledgement(
        &self,
        key: &(PortId, ChannelId, Sequence),
    ) -> Result<AcknowledgementCommitment, Error>;

    /// Returns a counter on the number of channel ids have been created thus far.
    /// The value of this counter should increase only via method
    /// `ChannelKeeper::increase_channel_counter`.
    fn channel_counter(&self) -> Result<u64, Error>;

    /// The capability guarding `(port_id, channel_id)`, created when the channel end was first
    /// stored.
    fn channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ChannelCapability, Error> {
        self.get_capability(&channel_capability_name(port_id.clone(), *channel_id))
            .map(ChannelCapability::from)
            .map_err(Error::ics05_port)
    }

    /// Checks that `capability` owns the channel `(port_id, channel_id)`.
    fn authenticate_channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        capability: &ChannelCapability,
    ) -> Result<(), Error> {
        self.authenticate_capability(
            &channel_capability_name(port_id.clone(), *channel_id),
            capability.as_ref(),
        )
        .map_err(|_| Error::invalid_channel_capability(port_id.clone(), *channel_id))
    }

    /// Return the module owning the given channel. The channel capability must exist and the
    /// port must be bound.
    fn lookup_module_by_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleId, Error> {
        self.channel_capability(port_id, channel_id)?;
        self.lookup_module_by_port(port_id)
            .map_err(Error::ics05_port)
    }
}

/// A context supplying all the necessary write-only dependencies (i.e., storage writing facility)
/// for processing any `ChannelMsg`.
pub trait ChannelKeeper: CapabilityKeeper {
    fn store_channel_result(&mut self, result: ChannelResult) -> Result<(), Error> {
        // The handler processed this channel & some modifications occurred, store the new end.
        self.store_channel(
            (result.port_id.clone(), result.channel_id),
            &result.channel_end,
        )?;

        // The channel identifier was freshly brewed.
        // Increase counter & initialize seq. nrs.
        if matches!(result.channel_id_state, ChannelIdState::Generated) {
            self.increase_channel_counter();

            // Associate also the channel end to its connection.
            let connection_id = result.channel_end.connection_hop()?.clone();
            self.store_connection_channels(connection_id, &(result.port_id.clone(), result.channel_id))?;

            // Initialize send, recv, and ack sequence numbers.
            self.store_next_sequence_send((result.port_id.clone(), result.channel_id), 1.into())?;
            self.store_next_sequence_recv((result.port_id.clone(), result.channel_id), 1.into())?;
            self.store_next_sequence_ack((result.port_id.clone(), result.channel_id), 1.into())?;

            self.new_capability(channel_capability_name(result.port_id, result.channel_id))
                .map_err(Error::ics05_port)?;
        }

        Ok(())
    }

    fn store_packet_result(&mut self, general_result: PacketResult) -> Result<(), Error> {
        match general_result {
            PacketResult::Send(res) => {
                self.store_next_sequence_send(
                    (res.port_id.clone(), res.channel_id),
                    res.seq_number,
                )?;

                self.store_packet_commitment(
                    (res.port_id.clone(), res.channel_id, res.seq),
                    res.commitment,
                )?;
            }
            PacketResult::Recv(RecvPacketResult::Ordered {
                port_id,
                channel_id,
                next_seq_recv,
                ..
            }) => {
                self.store_next_sequence_recv((port_id, channel_id), next_seq_recv)?;
            }
            PacketResult::Recv(RecvPacketResult::Unordered {
                port_id,
                channel_id,
                sequence,
                receipt,
            }) => {
                self.store_packet_receipt((port_id, channel_id, sequence), receipt)?;
            }
            PacketResult::WriteAck(res) => {
                self.store_packet_acknowledgement(
                    (res.port_id.clone(), res.channel_id, res.seq),
                    res.ack_commitment,
                )?;
            }
            PacketResult::Ack(AckPacketResult::Success {
                port_id,
                channel_id,
                seq,
                seq_number,
            }) => {
                if let Some(next_ack) = seq_number {
                    // Ordered channel
                    self.store_next_sequence_ack((port_id.clone(), channel_id), next_ack)?;
                }
                self.delete_packet_commitment((port_id, channel_id, seq))?;
            }
            PacketResult::Timeout(TimeoutPacketResult::Success {
                port_id,
                channel_id,
                seq,
                channel,
            }) => {
                if let Some(c) = channel {
                    // Ordered channel
                    self.store_channel((port_id.clone(), channel_id), &c)?;
                }
                self.delete_packet_commitment((port_id, channel_id, seq))?;
            }
            PacketResult::Recv(RecvPacketResult::NoOp)
            | PacketResult::Ack(AckPacketResult::NoOp)
            | PacketResult::Timeout(TimeoutPacketResult::NoOp) => {}
        }
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        key: (PortId, ChannelId, Sequence),
        commitment: PacketCommitment,
    ) -> Result<(), Error>;

    fn delete_packet_commitment(&mut self, key: (PortId, ChannelId, Sequence))
        -> Result<(), Error>;

    /// Stores the receipt of a packet received on an unordered channel.
    /// Fails with `PacketAlreadyReceived` if a receipt is already stored.
    fn store_packet_receipt(
        &mut self,
        key: (PortId, ChannelId, Sequence),
        receipt: Receipt,
    ) -> Result<(), Error>;

    /// Fails with `AcknowledgementExists` if an acknowledgement is already stored.
    fn store_packet_acknowledgement(
        &mut self,
        key: (PortId, ChannelId, Sequence),
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Error>;

    fn store_connection_channels(
        &mut self,
        conn_id: ConnectionId,
        port_channel_id: &(PortId, ChannelId),
    ) -> Result<(), Error>;

    /// Stores the given channel_end at a path associated with the port_id and channel_id.
    fn store_channel(
        &mut self,
        port_channel_id: (PortId, ChannelId),
        channel_end: &ChannelEnd,
    ) -> Result<(), Error>;

    fn store_next_sequence_send(
        &mut self,
        port_channel_id: (PortId, ChannelId),
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_recv(
        &mut self,
        port_channel_id: (PortId, ChannelId),
        seq: Sequence,
    ) -> Result<(), Error>;

    fn store_next_sequence_ack(
        &mut self,
        port_channel_id: (PortId, ChannelId),
        seq: Sequence,
    ) -> Result<(), Error>;

    /// Called upon channel identifier creation (Init or Try message processing).
    /// Increases the counter which keeps track of how many channels have been created.
    /// Should never fail.
    fn increase_channel_counter(&mut self);
}
