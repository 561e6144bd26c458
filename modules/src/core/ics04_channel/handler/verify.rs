//! ICS4 verification functions, shared by the channel handshake and packet handlers.

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::handler::verify::verify_delay_passed;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{compute_ack_commitment, compute_packet_commitment};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::{Packet, Sequence};
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::Height;

/// Entry point for verifying all proofs bundled in any ICS4 message for channel protocols.
///
/// `channel_end` is the local end, whose counterparty identifiers locate the remote end that
/// `proof` claims to equal `expected_chan`.
pub fn verify_channel_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    channel_end: &ChannelEnd,
    connection_end: &ConnectionEnd,
    expected_chan: &ChannelEnd,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;

    let counterparty_channel_id = channel_end
        .counterparty()
        .channel_id()
        .ok_or_else(Error::missing_channel_id)?;

    let client_def = AnyClient::from_client_type(client_state.client_type());

    client_def
        .verify_channel_state(
            ctx,
            client_id,
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            channel_end.counterparty().port_id(),
            counterparty_channel_id,
            expected_chan,
        )
        .map_err(Error::verify_channel_failed)
}

/// Entry point for verifying the commitment proof bundled in a `MsgRecvPacket`.
pub fn verify_packet_recv_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    packet: &Packet,
    connection_end: &ConnectionEnd,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let (client_def, client_state) = packet_client(ctx, height, connection_end)?;

    let commitment = compute_packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );

    client_def
        .verify_packet_data(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            &packet.source_port,
            &packet.source_channel,
            packet.sequence,
            commitment,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Entry point for verifying the acknowledgement proof bundled in a `MsgAcknowledgement`.
pub fn verify_packet_acknowledgement_proofs<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    connection_end: &ConnectionEnd,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let (client_def, client_state) = packet_client(ctx, height, connection_end)?;

    let ack_commitment = compute_ack_commitment(acknowledgement.as_ref());

    client_def
        .verify_packet_acknowledgement(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
            ack_commitment,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Verifies the counterparty's `next_sequence_recv` for the channel of an ordered packet.
pub fn verify_next_sequence_recv<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    next_sequence_recv: Sequence,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let (client_def, client_state) = packet_client(ctx, height, connection_end)?;

    client_def
        .verify_next_sequence_recv(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            &packet.destination_port,
            &packet.destination_channel,
            next_sequence_recv,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Verifies that the counterparty holds no receipt for an unordered packet.
pub fn verify_packet_receipt_absence<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
    packet: &Packet,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let (client_def, client_state) = packet_client(ctx, height, connection_end)?;

    client_def
        .verify_packet_receipt_absence(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            &packet.destination_port,
            &packet.destination_channel,
            packet.sequence,
        )
        .map_err(|e| Error::packet_verification_failed(packet.sequence, e))
}

/// Packet proofs are only accepted once the connection delay has passed.
fn packet_client<Ctx: ChannelReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
) -> Result<(AnyClient, AnyClientState), Error> {
    let client_state = ctx
        .client_state(connection_end.client_id())
        .map_err(Error::ics02_client)?;

    verify_delay_passed(ctx, height, connection_end).map_err(Error::ics03_connection)?;

    Ok((AnyClient::from_client_type(client_state.client_type()), client_state))
}
