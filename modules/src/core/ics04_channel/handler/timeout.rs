use tracing::debug;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, Order, State};
use crate::core::ics04_channel::commitment::compute_packet_commitment;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::{Error, ErrorDetail};
use crate::core::ics04_channel::events::TimeoutPacket;
use crate::core::ics04_channel::handler::verify::{
    verify_next_sequence_recv, verify_packet_receipt_absence,
};
use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimeoutPacketResult {
    Success {
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
        /// The closed channel end, on ordered channels only.
        channel: Option<ChannelEnd>,
    },
    /// The packet commitment is already gone.
    NoOp,
}

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgTimeout,
) -> HandlerResult<PacketResult, Error> {
    let mut output = HandlerOutput::builder();

    let packet = &msg.packet;

    let mut source_channel_end =
        ctx.channel_end(&(packet.source_port.clone(), packet.source_channel))?;

    // A relayed duplicate finds the commitment gone, and an ordered channel closed by the
    // first delivery.
    let connection_end = match check_outstanding_packet(ctx, &source_channel_end, packet)? {
        Some(connection_end) => connection_end,
        None => {
            output.log("success: packet already acknowledged or timed out; no-op");
            return Ok(output.with_result(PacketResult::Timeout(TimeoutPacketResult::NoOp)));
        }
    };

    if !source_channel_end.state_matches(&State::Open) {
        return Err(Error::channel_closed(packet.source_channel));
    }

    // The counterparty must have reached the timeout at the proven height.
    let proof_height = msg.proofs.height();
    let client_id = connection_end.client_id();
    let client_state = ctx.client_state(client_id).map_err(Error::ics02_client)?;
    let proof_timestamp = AnyClient::from_client_type(client_state.client_type())
        .timestamp_at_height(ctx, client_id, &client_state, proof_height)
        .map_err(Error::ics02_client)?;

    if !packet.timed_out(&proof_timestamp, proof_height) {
        return Err(Error::packet_timeout_not_reached(
            packet.sequence,
            proof_height,
            proof_timestamp,
        ));
    }

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
        "timeout packet"
    );
    output.log("success: packet timeout");

    output.emit(IbcEvent::TimeoutPacket(TimeoutPacket {
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

/// Checks that `packet` was sent on `source_channel_end` and is still awaiting an outcome.
/// Returns the connection end of the channel, or `None` once the commitment is gone.
pub(super) fn check_outstanding_packet<Ctx: ChannelReader>(
    ctx: &Ctx,
    source_channel_end: &ChannelEnd,
    packet: &Packet,
) -> Result<Option<ConnectionEnd>, Error> {
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

    let stored_commitment = match ctx.get_packet_commitment(&(
        packet.source_port.clone(),
        packet.source_channel,
        packet.sequence,
    )) {
        Ok(commitment) => commitment,
        Err(e) if matches!(e.detail(), ErrorDetail::PacketCommitmentNotFound(_)) => {
            return Ok(None)
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

    Ok(Some(connection_end))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics04_channel::channel::{Order, State};
    use crate::core::ics04_channel::commitment::compute_packet_commitment;
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::packet_dispatch;
    use crate::core::ics04_channel::handler::test_util::{chains, Chains};
    use crate::core::ics04_channel::handler::timeout::TimeoutPacketResult;
    use crate::core::ics04_channel::msgs::timeout::MsgTimeout;
    use crate::core::ics04_channel::msgs::PacketMsg;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::{Packet, PacketResult, Receipt};
    use crate::core::ics04_channel::timeout::TimeoutHeight;
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::core::ics26_routing::msgs::Ics26Envelope;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;
    use crate::timestamp::Timestamp;

    /// A sent `packet` that B never received. B first produces `blocks` more blocks, then A's
    /// client catches up with it.
    fn setup(
        order: Order,
        packet: &Packet,
        blocks: u64,
        tweak_b: impl FnOnce(MockContext) -> MockContext,
    ) -> (MockContext, MsgTimeout) {
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
        chains.ctx_b = tweak_b(chains.ctx_b);
        for _ in 0..blocks {
            chains.ctx_b.advance_host_chain_height();
        }
        let Chains { ctx_a, ctx_b, .. } = chains.sync_a();

        let (path, next_sequence_recv) = match order {
            Order::Ordered => {
                let next = ctx_b
                    .get_next_sequence_recv(&(
                        packet.destination_port.clone(),
                        packet.destination_channel,
                    ))
                    .unwrap();
                (
                    Path::SeqRecvs(packet.destination_port.clone(), packet.destination_channel),
                    next,
                )
            }
            Order::Unordered => (
                Path::Receipts {
                    port_id: packet.destination_port.clone(),
                    channel_id: packet.destination_channel,
                    sequence: packet.sequence,
                },
                1.into(),
            ),
            Order::Uninitialized => unreachable!("test channels are ordered or unordered"),
        };

        let proof_height = ctx_b.host_height();
        let proof = ctx_b.commitment_proof(&path, proof_height).unwrap();

        let msg = MsgTimeout::new(
            packet.clone(),
            next_sequence_recv,
            Proofs::new(proof, None, None, None, proof_height).unwrap(),
            get_dummy_account_id(),
        );
        (ctx_a, msg)
    }

    fn packet_with_timeout_height(revision_height: u64) -> Packet {
        Packet::try_from(get_dummy_raw_packet(revision_height, 0)).unwrap()
    }

    #[test]
    fn timeout_packet_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgTimeout,
            want_pass: bool,
        }

        // Chain B starts at height 10, the proofs are taken at height 101.
        let packet = packet_with_timeout_height(100);
        let (ctx, msg) = setup(Order::Unordered, &packet, 91, |ctx| ctx);

        let (ctx_not_reached, msg_not_reached) = setup(
            Order::Unordered,
            &packet_with_timeout_height(200),
            91,
            |ctx| ctx,
        );

        let (ctx_received, msg_received) = setup(Order::Unordered, &packet, 91, |ctx| {
            ctx.with_packet_receipt(PortId::transfer(), ChannelId::default(), 1.into(), Receipt::Ok)
        });

        let mut by_timestamp = packet_with_timeout_height(0);
        by_timestamp.timeout_height = TimeoutHeight::Never;
        by_timestamp.timeout_timestamp = Timestamp::from_nanoseconds(1).unwrap();
        let (ctx_by_timestamp, msg_by_timestamp) =
            setup(Order::Unordered, &by_timestamp, 0, |ctx| ctx);

        let mut wrong_data = msg.clone();
        wrong_data.packet.data = b"other".to_vec();

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails because no channel exists in the context".to_string(),
                ctx: MockContext::default(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the timeout height was not reached".to_string(),
                ctx: ctx_not_reached,
                msg: msg_not_reached,
                want_pass: false,
            },
            Test {
                name: "Processing fails because the packet was received".to_string(),
                ctx: ctx_received,
                msg: msg_received,
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
                name: "Good parameters, timeout on the timestamp".to_string(),
                ctx: ctx_by_timestamp,
                msg: msg_by_timestamp,
                want_pass: true,
            },
            Test {
                name: "Good parameters".to_string(),
                ctx,
                msg,
                want_pass: true,
            },
        ];

        for test in tests {
            let res = packet_dispatch(&test.ctx, &PacketMsg::ToPacket(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "timeout_packet: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
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
                    assert!(!proto_output.events.is_empty());
                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::TimeoutPacket(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "timeout_packet: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
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
    fn timeout_not_reached_is_reported() {
        let (ctx, msg) = setup(Order::Unordered, &packet_with_timeout_height(200), 0, |ctx| ctx);

        let err = packet_dispatch(&ctx, &PacketMsg::ToPacket(msg)).unwrap_err();
        assert!(matches!(
            err.detail(),
            ErrorDetail::PacketTimeoutNotReached(_)
        ));
    }

    #[test]
    fn timeout_on_ordered_channel_closes_it() {
        let (ctx, msg) = setup(Order::Ordered, &packet_with_timeout_height(100), 91, |ctx| ctx);

        let output = packet_dispatch(&ctx, &PacketMsg::ToPacket(msg)).unwrap();
        match output.result {
            PacketResult::Timeout(TimeoutPacketResult::Success {
                channel: Some(channel),
                ..
            }) => assert_eq!(channel.state(), &State::Closed),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn repeated_timeout_on_closed_ordered_channel_is_accepted() {
        let (mut ctx, msg) =
            setup(Order::Ordered, &packet_with_timeout_height(100), 91, |ctx| ctx);
        let envelope = Ics26Envelope::Ics4PacketMsg(PacketMsg::ToPacket(msg));

        ctx.deliver(envelope.clone()).unwrap();
        let channel = ctx
            .channel_end(&(PortId::transfer(), ChannelId::default()))
            .unwrap();
        assert_eq!(channel.state(), &State::Closed);

        // A second relayer submits the same timeout after the channel closed.
        ctx.deliver(envelope).unwrap();
    }

    #[test]
    fn timeout_on_ordered_channel_after_receipt_fails() {
        // B already received sequence 1, so its next receive sequence is 2.
        let (ctx, msg) = setup(Order::Ordered, &packet_with_timeout_height(100), 91, |ctx| {
            ctx.with_recv_sequence(PortId::transfer(), ChannelId::default(), 2.into())
        });

        let err = packet_dispatch(&ctx, &PacketMsg::ToPacket(msg)).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::InvalidPacketSequence(_)));
    }

    #[test]
    fn timeout_without_commitment_is_a_noop() {
        let packet = packet_with_timeout_height(100);
        let (ctx, msg) = setup(Order::Unordered, &packet, 91, |ctx| ctx);
        let ctx = ctx.without_packet_commitment(
            packet.source_port.clone(),
            packet.source_channel,
            packet.sequence,
        );

        let output = packet_dispatch(&ctx, &PacketMsg::ToPacket(msg)).unwrap();
        assert!(output.result.is_noop());
    }
}
