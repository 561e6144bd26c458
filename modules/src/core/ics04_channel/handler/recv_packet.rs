use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::{Error, ErrorDetail};
use crate::core::ics04_channel::events::ReceivePacket;
use crate::core::ics04_channel::handler::verify::verify_packet_recv_proofs;
use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
use crate::core::ics04_channel::packet::{PacketResult, Receipt, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecvPacketResult {
    Ordered {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        next_seq_recv: Sequence,
    },
    Unordered {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        receipt: Receipt,
    },
    /// The packet was already received.
    NoOp,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgRecvPacket,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;
    let port_chan_id = (packet.destination_port.clone(), packet.destination_channel);

    let dest_channel_end = ctx.channel_end(&port_chan_id)?;

    if !dest_channel_end.state_matches(&State::Open) {
        return Err(Error::invalid_channel_state(
            packet.destination_channel,
            *dest_channel_end.state(),
        ));
    }

    let counterparty = Counterparty::new(packet.source_port.clone(), Some(packet.source_channel));

    if !dest_channel_end.counterparty_matches(&counterparty) {
        return Err(Error::invalid_packet_counterparty(
            packet.source_port.clone(),
            packet.source_channel,
        ));
    }

    let connection_id = dest_channel_end.connection_hop()?;
    let connection_end = ctx
        .connection_end(connection_id)
        .map_err(Error::ics03_connection)?;

    if !connection_end.state_matches(&ConnectionState::Open) {
        return Err(Error::connection_not_open(connection_id.clone()));
    }

    let host_height = ctx.host_height();
    let host_timestamp = ctx.host_timestamp();
    if packet.timed_out(&host_timestamp, host_height) {
        return Err(Error::packet_timed_out(
            packet.sequence,
            host_height,
            host_timestamp,
        ));
    }

    // Duplicates and gaps are settled before looking at the proof.
    let result = if dest_channel_end.order_matches(&Order::Ordered) {
        let next_seq_recv = ctx.get_next_sequence_recv(&port_chan_id)?;

        if packet.sequence < next_seq_recv {
            output.log("success: packet already received; no-op");
            return Ok(output.with_result(PacketResult::Recv(RecvPacketResult::NoOp)));
        }

        if packet.sequence > next_seq_recv {
            return Err(Error::packet_sequence_out_of_order(
                packet.sequence,
                next_seq_recv,
            ));
        }

        RecvPacketResult::Ordered {
            port_id: packet.destination_port.clone(),
            channel_id: packet.destination_channel,
            sequence: packet.sequence,
            next_seq_recv: next_seq_recv.increment(),
        }
    } else {
        let receipt = ctx.get_packet_receipt(&(
            port_chan_id.0.clone(),
            port_chan_id.1,
            packet.sequence,
        ));

        match receipt {
            Ok(_) => {
                output.log("success: packet already received; no-op");
                return Ok(output.with_result(PacketResult::Recv(RecvPacketResult::NoOp)));
            }
            Err(e) if matches!(e.detail(), ErrorDetail::PacketReceiptNotFound(_)) => {
                RecvPacketResult::Unordered {
                    port_id: packet.destination_port.clone(),
                    channel_id: packet.destination_channel,
                    sequence: packet.sequence,
                    receipt: Receipt::Ok,
                }
            }
            Err(e) => return Err(e),
        }
    };

    verify_packet_recv_proofs(
        ctx,
        msg.proofs.height(),
        packet,
        &connection_end,
        msg.proofs.object_proof(),
    )?;

    debug!(
        port_id = %packet.destination_port,
        channel_id = %packet.destination_channel,
        sequence = %packet.sequence,
        "receive packet"
    );
    output.log("success: packet receive");

    output.emit(IbcEvent::ReceivePacket(ReceivePacket {
        height: host_height,
        packet: packet.clone(),
    }));

    Ok(output.with_result(PacketResult::Recv(result)))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics04_channel::channel::Order;
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::handler::recv_packet::RecvPacketResult;
    use crate::core::ics04_channel::handler::test_util::{chains, Chains};
    use crate::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::{Packet, PacketResult, Receipt};
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;

    /// Chain A committed to `packet`; chain B's client already knows about it.
    fn setup(order: Order, packet: &Packet) -> (MockContext, MsgRecvPacket) {
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
        let Chains { ctx_a, ctx_b, .. } = chains.sync_b();

        let proof_height = ctx_a.host_height();
        let proof = ctx_a
            .commitment_proof(
                &Path::Commitments {
                    port_id: packet.source_port.clone(),
                    channel_id: packet.source_channel,
                    sequence: packet.sequence,
                },
                proof_height,
            )
            .unwrap();

        let msg = MsgRecvPacket::new(
            packet.clone(),
            Proofs::new(proof, None, None, None, proof_height).unwrap(),
            get_dummy_account_id(),
        );
        (ctx_b, msg)
    }

    #[test]
    fn recv_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgRecvPacket,
            want_pass: bool,
        }

        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Unordered, &packet);

        // Chain B is at height 10, so this packet can no longer be received.
        let mut expired = packet.clone();
        expired.timeout_height = crate::core::ics04_channel::timeout::TimeoutHeight::At(
            crate::Height::new(0, 5),
        );
        let (expired_ctx, expired_msg) = setup(Order::Unordered, &expired);

        let mut wrong_counterparty = msg.clone();
        wrong_counterparty.packet.source_channel = ChannelId::new(5);

        let mut tampered = msg.clone();
        tampered.packet.data = b"tampered".to_vec();

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no channel exists in the context".to_string(),
                ctx: MockContext::default(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the source is not the counterparty".to_string(),
                ctx: ctx.clone(),
                msg: wrong_counterparty,
                want_pass: false,
            },
            Test {
                name: "Processing fails because the packet timed out".to_string(),
                ctx: expired_ctx,
                msg: expired_msg,
                want_pass: false,
            },
            Test {
                name: "Processing fails because the packet data does not match the commitment"
                    .to_string(),
                ctx: ctx.clone(),
                msg: tampered,
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
            let res = packet_dispatch(&test.ctx, &PacketMsg::RecvPacket(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "recv_packet: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert_eq!(
                        proto_output.result,
                        PacketResult::Recv(RecvPacketResult::Unordered {
                            port_id: PortId::transfer(),
                            channel_id: ChannelId::default(),
                            sequence: test.msg.packet.sequence,
                            receipt: Receipt::Ok,
                        })
                    );
                    assert!(!proto_output.events.is_empty());
                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::ReceivePacket(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "recv_packet: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
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
    fn recv_packet_with_existing_receipt_is_a_noop() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Unordered, &packet);
        let ctx = ctx.with_packet_receipt(
            PortId::transfer(),
            ChannelId::default(),
            packet.sequence,
            Receipt::Ok,
        );

        let output = packet_dispatch(&ctx, &PacketMsg::RecvPacket(msg)).unwrap();
        assert!(output.result.is_noop());
        assert!(output.events.is_empty());
    }

    #[test]
    fn recv_ordered_packet_advances_next_sequence() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Ordered, &packet);

        let output = packet_dispatch(&ctx, &PacketMsg::RecvPacket(msg)).unwrap();
        assert_eq!(
            output.result,
            PacketResult::Recv(RecvPacketResult::Ordered {
                port_id: PortId::transfer(),
                channel_id: ChannelId::default(),
                sequence: 1.into(),
                next_seq_recv: 2.into(),
            })
        );
    }

    #[test]
    fn recv_ordered_packet_already_received_is_a_noop() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let (ctx, msg) = setup(Order::Ordered, &packet);
        let ctx = ctx.with_recv_sequence(PortId::transfer(), ChannelId::default(), 2.into());

        let output = packet_dispatch(&ctx, &PacketMsg::RecvPacket(msg)).unwrap();
        assert!(output.result.is_noop());
    }

    #[test]
    fn recv_ordered_packet_out_of_order_fails_before_proof() {
        let mut packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        packet.sequence = 2.into();
        let (ctx, mut msg) = setup(Order::Ordered, &packet);

        // Even a worthless proof is not looked at.
        msg.proofs = Proofs::new(
            crate::test_utils::get_dummy_proof().try_into().unwrap(),
            None,
            None,
            None,
            msg.proofs.height(),
        )
        .unwrap();

        let err = packet_dispatch(&ctx, &PacketMsg::RecvPacket(msg)).unwrap_err();
        assert!(matches!(
            err.detail(),
            ErrorDetail::PacketSequenceOutOfOrder(_)
        ));
    }
}
