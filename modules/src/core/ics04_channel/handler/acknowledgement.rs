use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::commitment::compute_packet_commitment;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::{Error, ErrorDetail};
use crate::core::ics04_channel::events::AcknowledgePacket;
use crate::core::ics04_channel::handler::verify::verify_packet_acknowledgement_proofs;
use crate::core::ics04_channel::msgs::acknowledgement::MsgAcknowledgement;
use crate::core::ics04_channel::packet::{PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AckPacketResult {
    Success {
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
        /// The next acknowledgement sequence, set on ordered channels only.
        seq_number: Option<Sequence>,
    },
    /// The packet commitment is already gone.
    NoOp,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgAcknowledgement,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;
    let port_chan_id = (packet.source_port.clone(), packet.source_channel);

    let source_channel_end = ctx.channel_end(&port_chan_id)?;

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::channel_closed(packet.source_channel));
    }

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

    let connection_id = source_channel_end.connection_hop()?;
    let connection_end = ctx
        .connection_end(connection_id)
        .map_err(Error::ics03_connection)?;

    if !connection_end.state_matches(&ConnectionState::Open) {
        return Err(Error::connection_not_open(connection_id.clone()));
    }

    let stored_commitment = match ctx.get_packet_commitment(&(
        port_chan_id.0.clone(),
        port_chan_id.1,
        packet.sequence,
    )) {
        Ok(commitment) => commitment,
        Err(e) if matches!(e.detail(), ErrorDetail::PacketCommitmentNotFound(_)) => {
            output.log("success: packet already acknowledged or timed out; no-op");
            return Ok(output.with_result(PacketResult::Ack(AckPacketResult::NoOp)));
        }
        Err(e) => return Err(e),
    };

    let expected_commitment = compute_packet_commitment(
        &packet.data,
        &packet.timeout_height,
        &packet.timeout_timestamp,
    );
    if stored_commitment != expected_commitment {
        return Err(Error::incorrect_packet_commitment(packet.sequence));
    }

    let seq_number = if source_channel_end.order_matches(&Order::Ordered) {
        let next_seq_ack = ctx.get_next_sequence_ack(&port_chan_id)?;

        if packet.sequence != next_seq_ack {
            return Err(Error::invalid_packet_sequence(
                packet.sequence,
                next_seq_ack,
            ));
        }

        Some(next_seq_ack.increment())
    } else {
        None
    };

    verify_packet_acknowledgement_proofs(
        ctx,
        msg.proofs.height(),
        packet,
        &msg.acknowledgement,
        &connection_end,
        msg.proofs.object_proof(),
    )?;

    debug!(
        port_id = %packet.source_port,
        channel_id = %packet.source_channel,
        sequence = %packet.sequence,
        "acknowledge packet"
    );
    output.log("success: packet ack");

    output.emit(IbcEvent::AcknowledgePacket(AcknowledgePacket {
        height: ctx.host_height(),
        packet: packet.clone(),
    }));

    let result = PacketResult::Ack(AckPacketResult::Success {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel,
        seq: packet.sequence,
        seq_number,
    });

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics04_channel::channel::Order;
    use crate::core::ics04_channel::commitment::{compute_ack_commitment, compute_packet_commitment};
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::acknowledgement::AckPacketResult;
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::handler::test_util::{chains, Chains};
    use crate::core::ics04_channel::msgs::acknowledgement::{Acknowledgement, MsgAcknowledgement};
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::{Packet, PacketResult};
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;

    /// A sent `packet` which B received and acknowledged; A's client knows the acknowledgement.
    fn setup(order: Order, packet: &Packet) -> (MockContext, MsgAcknowledgement) {
        let ack = Acknowledgement::success(b"ok".to_vec());

        let mut chains = chains().open_channels(order);
        chains.ctx_a = chains.ctx_a.with_packet_commitment(
            packet.source_port.clone(),
            packet.source_channel,
            packet.sequence,
            compute_packet_commitment(
                &packet.data,
                &packet.timeout_height,
                &packet.timeout_timestamp,
            ),
        );
        chains.ctx_b = chains.ctx_b.with_packet_acknowledgement(
            packet.destination_port.clone(),
            packet.destination_channel,
            packet.sequence,
            compute_ack_commitment(ack.as_ref()),
        );
        let Chains { ctx_a, ctx_b, .. } = chains.sync_a();

        let proof_height = ctx_b.host_height();
        let proof = ctx_b
            .commitment_proof(
                &Path::Acks {
                    port_id: packet.destination_port.clone(),
                    channel_id: packet.destination_channel,
                    sequence: packet.sequence,
                },
                proof_height,
            )
            .unwrap();

        let msg = MsgAcknowledgement::new(
            packet.clone(),
            ack,
            Proofs::new(proof, None, None, None, proof_height).unwrap(),
            get_dummy_account_id(),
        );
        (ctx_a, msg)
    }

    #[test]
    fn ack_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgAcknowledgement,
            want_pass: bool,
        }

        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Unordered, &packet);

        let mut wrong_data = msg.clone();
        wrong_data.packet.data = b"other".to_vec();

        let wrong_ack = MsgAcknowledgement {
            acknowledgement: Acknowledgement::error("failed"),
            ..msg.clone()
        };

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no channel exists in the context".to_string(),
                ctx: MockContext::default(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the packet does not match the commitment"
                    .to_string(),
                ctx: ctx.clone(),
                msg: wrong_data,
                want_pass: false,
            },
            Test {
                name: "Processing fails because the acknowledgement was not committed"
                    .to_string(),
                ctx: ctx.clone(),
                msg: wrong_ack,
                want_pass: false,
            },
            Test {
                name: "Good parameters".to_string(),
                ctx,
                msg,
                want_pass: true,
            },
        ];

        for test in tests {
            let res = packet_dispatch(&test.ctx, &PacketMsg::AckPacket(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "ack_packet: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert_eq!(
                        proto_output.result,
                        PacketResult::Ack(AckPacketResult::Success {
                            port_id: PortId::transfer(),
                            channel_id: ChannelId::default(),
                            seq: test.msg.packet.sequence,
                            seq_number: None,
                        })
                    );
                    assert!(!proto_output.events.is_empty());
                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::AcknowledgePacket(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "ack_packet: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone(),
                        e,
                    );
                }
            }
        }
    }

    #[test]
    fn ack_without_commitment_is_a_noop() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (mut ctx, msg) = setup(Order::Unordered, &packet);
        ctx = ctx.without_packet_commitment(
            packet.source_port.clone(),
            packet.source_channel,
            packet.sequence,
        );

        let output = packet_dispatch(&ctx, &PacketMsg::AckPacket(msg)).unwrap();
        assert!(output.result.is_noop());
        assert!(output.events.is_empty());
    }

    #[test]
    fn ack_on_ordered_channel_follows_next_sequence() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Ordered, &packet);

        let output = packet_dispatch(&ctx, &PacketMsg::AckPacket(msg.clone())).unwrap();
        assert_eq!(
            output.result,
            PacketResult::Ack(AckPacketResult::Success {
                port_id: PortId::transfer(),
                channel_id: ChannelId::default(),
                seq: 1.into(),
                seq_number: Some(2.into()),
            })
        );

        let ctx = ctx.with_ack_sequence(PortId::transfer(), ChannelId::default(), 3.into());
        let err = packet_dispatch(&ctx, &PacketMsg::AckPacket(msg)).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::InvalidPacketSequence(_)));
    }
}
