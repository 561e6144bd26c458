use tracing::debug;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics04_channel::channel::{Counterparty, State};
use crate::core::ics04_channel::commitment::{compute_packet_commitment, PacketCommitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::SendPacket;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics04_channel::timeout::TimeoutHeight;
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub seq_number: Sequence,
    pub commitment: PacketCommitment,
}

/// Sends a packet on behalf of the module holding `capability` for the source channel. The
/// packet is assigned the channel's next send sequence, whatever sequence it carried.
pub fn send_packet<Ctx: ChannelReader>(
    ctx: &Ctx,
    capability: &ChannelCapability,
    mut packet: Packet,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let source_channel_end =
        ctx.channel_end(&(packet.source_port.clone(), packet.source_channel))?;

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::channel_closed(packet.source_channel));
    }

    ctx.authenticate_channel_capability(&packet.source_port, &packet.source_channel, capability)?;

    let counterparty = Counterparty::new(
        packet.destination_port.clone(),
        Some(packet.destination_channel),
    );

    if !source_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.destination_port.clone(),
            packet.destination_channel,
        ));
    }

    let connection_end = ctx
        .connection_end(source_channel_end.connection_hop()?)
        .map_err(Error::ics03_connection)?;

    if !packet.has_timeout() {
        return Err(Error::missing_timeout());
    }

    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;
    let client_def = AnyClient::from_client_type(client_state.client_type());

    client_def
        .status(ctx, client_id, &client_state)
        .and_then(|status| status.verify_is_active(client_id))
        .map_err(Error::ics02_client)?;

    // The timeouts are judged against the destination chain as the client last saw it.
    let latest_height = client_state.latest_height();
    if let TimeoutHeight::At(timeout_height) = packet.timeout_height {
        if timeout_height <= latest_height {
            return Err(Error::low_packet_height(latest_height, timeout_height));
        }
    }

    let latest_timestamp = client_def
        .timestamp_at_height(ctx, client_id, &client_state, latest_height)
        .map_err(Error::ics02_client)?;
    if packet.timestamp_expired(&latest_timestamp) {
        return Err(Error::low_packet_timestamp(
            latest_timestamp,
            packet.timeout_timestamp,
        ));
    }

    let next_seq_send =
        ctx.get_next_sequence_send(&(packet.source_port.clone(), packet.source_channel))?;
    packet.sequence = next_seq_send;

    debug!(
        port_id = %packet.source_port,
        channel_id = %packet.source_channel,
        sequence = %packet.sequence,
        "send packet"
    );
    output.log("success: packet send");

    let result = PacketResult::Send(SendPacketResult {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel,
        seq: packet.sequence,
        seq_number: next_seq_send.increment(),
        commitment: compute_packet_commitment(
            &packet.data,
            &packet.timeout_height,
            &packet.timeout_timestamp,
        ),
    });

    output.emit(IbcEvent::SendPacket(SendPacket {
        height: ctx.host_height(),
        packet,
    }));

    Ok(output.with_result(result))
}
