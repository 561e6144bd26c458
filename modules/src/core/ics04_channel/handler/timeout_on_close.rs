use tracing::debug;

use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::TimeoutOnClosePacket;
use crate::core::ics04_channel::handler::timeout::{check_outstanding_packet, TimeoutPacketResult};
use crate::core::ics04_channel::handler::verify::{
    verify_channel_proofs, verify_next_sequence_recv, verify_packet_receipt_absence,
};
use crate::core::ics04_channel::msgs::timeout_on_close::MsgTimeoutOnClose;
use crate::core::ics04_channel::packet::PacketResult;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

/// Times a packet out because the counterparty closed the channel, regardless of the packet's
/// own timeout.
pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgTimeoutOnClose,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let mut source_channel_end =
        ctx.channel_end(&(packet.source_port.clone(), packet.source_channel))?;

    let connection_end = match check_outstanding_packet(ctx, &source_channel_end, packet)? {
        Some(connection_end) => connection_end,
        None => {
            output.log("success: packet already acknowledged or timed out; no-op");
            return Ok(output.with_result(PacketResult::Timeout(TimeoutPacketResult::NoOp)));
        }
    };

    let proof_close = msg
        .proofs
        .other_proof()
        .as_ref()
        .ok_or_else(Error::missing_close_proof)?;

    let counterparty_connection_id = match connection_end.counterparty().connection_id() {
        Some(id) => id,
        None => {
            return Err(Error::undefined_connection_counterparty(
                source_channel_end.connection_hop()?.clone(),
            ))
        }
    };

    let expected_channel_end = ChannelEnd::new(
        State::Closed,
        *source_channel_end.ordering(),
        Counterparty::new(packet.source_port.clone(), Some(packet.source_channel)),
        vec![counterparty_connection_id.clone()],
        source_channel_end.version().clone(),
    );

    let proof_height = msg.proofs.height();
    verify_channel_proofs(
        ctx,
        proof_height,
        &source_channel_end,
        &connection_end,
        &expected_channel_end,
        proof_close,
    )?;

    let channel = if source_channel_end.order_matches(&Order::Ordered) {
        if msg.next_sequence_recv > packet.sequence {
            return Err(Error::invalid_packet_sequence(
                packet.sequence,
                msg.next_sequence_recv,
            ));
        }

        verify_next_sequence_recv(
            ctx,
            proof_height,
            &connection_end,
            packet,
            msg.next_sequence_recv,
            msg.proofs.object_proof(),
        )?;

        source_channel_end.set_state(State::Closed);
        Some(source_channel_end)
    } else {
        verify_packet_receipt_absence(
            ctx,
            proof_height,
            &connection_end,
            packet,
            msg.proofs.object_proof(),
        )?;

        None
    };

    debug!(
        port_id = %packet.source_port,
        channel_id = %packet.source_channel,
        sequence = %packet.sequence,
        "timeout packet on close"
    );
    output.log("success: packet timeout on close");

    output.emit(IbcEvent::TimeoutOnClosePacket(TimeoutOnClosePacket {
        height: ctx.host_height(),
        packet: packet.clone(),
    }));

    let result = PacketResult::Timeout(TimeoutPacketResult::Success {
        port_id: packet.source_port.clone(),
        channel_id: packet.source_channel,
        seq: packet.sequence,
        channel,
    });

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics04_channel::channel::{Order, State};
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::handler::test_util::{channel_end, chains, Chains};
    use crate::core::ics04_channel::handler::timeout::TimeoutPacketResult;
    use crate::core::ics04_channel::msgs::timeout_on_close::MsgTimeoutOnClose;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::{Packet, PacketResult};
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;

    /// A packet with a far away timeout is outstanding on A while B is in `state_b`.
    fn setup(order: Order, state_b: State) -> (MockContext, MsgTimeoutOnClose) {
        let packet = Packet::try_from(get_dummy_raw_packet(1000, 0)).unwrap();

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
        chains.ctx_b = chains.ctx_b.with_channel(
            PortId::transfer(),
            ChannelId::default(),
            channel_end(state_b, order, Some(ChannelId::default()), chains.conn_b.clone()),
        );
        let Chains { ctx_a, ctx_b, .. } = chains.sync_a();

        let unreceived_path = match order {
            Order::Ordered => Path::SeqRecvs(PortId::transfer(), ChannelId::default()),
            Order::Unordered => Path::Receipts {
                port_id: PortId::transfer(),
                channel_id: ChannelId::default(),
                sequence: packet.sequence,
            },
            Order::Uninitialized => unreachable!("test channels are ordered or unordered"),
        };

        let proof_height = ctx_b.host_height();
        let proofs = Proofs::new(
            ctx_b.commitment_proof(&unreceived_path, proof_height).unwrap(),
            None,
            None,
            Some(
                ctx_b
                    .commitment_proof(
                        &Path::ChannelEnds(PortId::transfer(), ChannelId::default()),
                        proof_height,
                    )
                    .unwrap(),
            ),
            proof_height,
        )
        .unwrap();

        let msg = MsgTimeoutOnClose::new(packet, 1.into(), proofs, get_dummy_account_id());
        (ctx_a, msg)
    }

    #[test]
    fn timeout_on_close_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgTimeoutOnClose,
            want_pass: bool,
        }

        let (ctx, msg) = setup(Order::Unordered, State::Closed);
        let (ctx_still_open, msg_still_open) = setup(Order::Unordered, State::Open);

        let no_close_proof = MsgTimeoutOnClose {
            proofs: Proofs::new(
                msg.proofs.object_proof().clone(),
                None,
                None,
                None,
                msg.proofs.height(),
            )
            .unwrap(),
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
                name: "Processing fails because the counterparty channel is still open"
                    .to_string(),
                ctx: ctx_still_open,
                msg: msg_still_open,
                want_pass: false,
            },
            Test {
                name: "Processing fails because the close proof is missing".to_string(),
                ctx: ctx.clone(),
                msg: no_close_proof,
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
            let res = packet_dispatch(&test.ctx, &PacketMsg::ToClosePacket(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "timeout_on_close: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert_eq!(
                        proto_output.result,
                        PacketResult::Timeout(TimeoutPacketResult::Success {
                            port_id: PortId::transfer(),
                            channel_id: ChannelId::default(),
                            seq: test.msg.packet.sequence,
                            channel: None,
                        })
                    );
                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::TimeoutOnClosePacket(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "timeout_on_close: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
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
    fn timeout_on_close_without_close_proof_is_rejected() {
        let (ctx, msg) = setup(Order::Unordered, State::Closed);
        let msg = MsgTimeoutOnClose {
            proofs: Proofs::new(
                msg.proofs.object_proof().clone(),
                None,
                None,
                None,
                msg.proofs.height(),
            )
            .unwrap(),
            ..msg
        };

        let err = packet_dispatch(&ctx, &PacketMsg::ToClosePacket(msg)).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::MissingCloseProof(_)));
    }

    #[test]
    fn timeout_on_close_closes_ordered_channel() {
        let (ctx, msg) = setup(Order::Ordered, State::Closed);

        let output = packet_dispatch(&ctx, &PacketMsg::ToClosePacket(msg)).unwrap();
        match output.result {
            PacketResult::Timeout(TimeoutPacketResult::Success {
                channel: Some(channel),
                ..
            }) => assert_eq!(channel.state(), &State::Closed),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
