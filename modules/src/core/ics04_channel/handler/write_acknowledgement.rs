use tracing::debug;

use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::commitment::{compute_ack_commitment, AcknowledgementCommitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::{Error, ErrorDetail};
use crate::core::ics04_channel::events::WriteAcknowledgement;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAckPacketResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub seq: Sequence,
    pub ack_commitment: AcknowledgementCommitment,
}

/// Commits the acknowledgement of a received packet on its destination channel end.
pub fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    packet: Packet,
    ack: Acknowledgement,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let dest_channel_end =
        ctx.channel_end(&(packet.destination_port.clone(), packet.destination_channel))?;

    if !dest_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.destination_channel,
            *dest_channel_end.state(),
        ));
    }

    if ack.as_ref().is_empty() {
        return Err(Error::invalid_acknowledgement());
    }

    let stored = ctx.get_packet_acknowledgement(&(
        packet.destination_port.clone(),
        packet.destination_channel,
        packet.sequence,
    ));
    match stored {
        Ok(_) => return Err(Error::acknowledgement_exists(packet.sequence)),
        Err(e) if matches!(e.detail(), ErrorDetail::PacketAcknowledgementNotFound(_)) => {}
        Err(e) => return Err(e),
    }

    debug!(
        port_id = %packet.destination_port,
        channel_id = %packet.destination_channel,
        sequence = %packet.sequence,
        "write acknowledgement"
    );
    output.log("success: packet write acknowledgement");

    let result = PacketResult::WriteAck(WriteAckPacketResult {
        port_id: packet.destination_port.clone(),
        channel_id: packet.destination_channel,
        seq: packet.sequence,
        ack_commitment: compute_ack_commitment(ack.as_ref()),
    });

    output.emit(IbcEvent::WriteAcknowledgement(WriteAcknowledgement {
        height: ctx.host_height(),
        packet,
        ack: ack.into_bytes(),
    }));

    Ok(output.with_result(result))
}
