use ibc_engine_proto::google::protobuf::Any;
use tracing::{debug, trace};

use crate::core::ics02_client::handler::dispatch as ics2_msg_dispatcher;
use crate::core::ics03_connection::handler::dispatch as ics3_msg_dispatcher;
use crate::core::ics04_channel::handler::{
    channel_callback as ics4_callback, channel_dispatch as ics4_msg_dispatcher,
    channel_validate as ics4_validate, packet_callback as ics4_packet_callback,
    packet_dispatch as ics04_packet_msg_dispatcher, packet_validate as ics4_packet_validate,
    send_packet::send_packet as ics4_send_packet,
};
use crate::core::ics04_channel::error::Error as ChannelError;
use crate::core::ics04_channel::packet::{Packet, PacketResult, Sequence};
use crate::core::ics05_port::capabilities::ChannelCapability;
use crate::core::ics26_routing::context::Ics26Context;
use crate::core::ics26_routing::error::Error;
use crate::core::ics26_routing::msgs::Ics26Envelope::{
    self, Ics2Msg, Ics3Msg, Ics4ChannelMsg, Ics4PacketMsg,
};
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerOutputBuilder};

/// Mimics the DeliverTx ABCI interface, but for a single message and at a slightly lower level.
/// No need for authentication info or signature checks here.
/// Returns a vector of all events that got generated as a byproduct of processing `messages`.
///
/// Messages are processed in order. The first failing message aborts delivery; results of the
/// messages processed before it are already stored, so hosts wanting all-or-nothing semantics
/// must snapshot their state around this call.
pub fn deliver<Ctx>(ctx: &mut Ctx, messages: Vec<Any>) -> Result<(Vec<IbcEvent>, Vec<String>), Error>
where
    Ctx: Ics26Context,
{
    let mut events = vec![];
    let mut logs = vec![];

    for any_msg in messages {
        trace!(type_url = %any_msg.type_url, "delivering message");

        // Decode the proto message into a domain message, creating an ICS26 envelope.
        let envelope = Ics26Envelope::try_from(any_msg)?;

        let HandlerOutput {
            mut log,
            events: mut msg_events,
            ..
        } = dispatch(ctx, envelope)?;

        logs.append(&mut log);
        events.append(&mut msg_events);
    }

    Ok((events, logs))
}

/// Top-level ICS dispatch function. Routes incoming IBC messages to their corresponding module.
/// Returns a handler output with empty result of type `HandlerOutput<()>` which contains the log
/// and events produced after processing the input `msg`.
///
/// Channel and packet messages run the module callback before their keeper writes, since the
/// callback decides the stored version or acknowledgement. On error the caller must discard both
/// the IBC store and any application state touched by the callback.
pub fn dispatch<Ctx>(ctx: &mut Ctx, msg: Ics26Envelope) -> Result<HandlerOutput<()>, Error>
where
    Ctx: Ics26Context,
{
    let output = match msg {
        Ics2Msg(msg) => {
            let handler_output = ics2_msg_dispatcher(ctx, msg).map_err(Error::ics02_client)?;

            // Apply the result to the context (host chain store).
            ctx.store_client_result(handler_output.result)
                .map_err(Error::ics02_client)?;

            HandlerOutput::builder()
                .with_log(handler_output.log)
                .with_events(handler_output.events)
                .with_result(())
        }

        Ics3Msg(msg) => {
            let handler_output = ics3_msg_dispatcher(ctx, msg).map_err(Error::ics03_connection)?;

            // Apply any results to the host chain store.
            ctx.store_connection_result(handler_output.result)
                .map_err(Error::ics03_connection)?;

            HandlerOutput::builder()
                .with_log(handler_output.log)
                .with_events(handler_output.events)
                .with_result(())
        }

        Ics4ChannelMsg(msg) => {
            let module_id = ics4_validate(ctx, &msg).map_err(Error::ics04_channel)?;
            let mut handler_output =
                ics4_msg_dispatcher(ctx, &msg).map_err(Error::ics04_channel)?;

            ics4_callback(ctx, &module_id, &msg, &mut handler_output)
                .map_err(Error::ics04_channel)?;

            debug!(
                module = %module_id,
                channel_id = %handler_output.result.channel_id,
                "channel handshake step"
            );

            // Apply any results to the host chain store.
            ctx.store_channel_result(handler_output.result)
                .map_err(Error::ics04_channel)?;

            HandlerOutput::builder()
                .with_log(handler_output.log)
                .with_events(handler_output.events)
                .with_result(())
        }

        Ics4PacketMsg(msg) => {
            let module_id = ics4_packet_validate(ctx, &msg).map_err(Error::ics04_channel)?;
            let mut handler_output =
                ics04_packet_msg_dispatcher(ctx, &msg).map_err(Error::ics04_channel)?;

            // Duplicates are accepted without informing the application nor touching the store.
            if handler_output.result.is_noop() {
                debug!(module = %module_id, "packet message is a no-op");
                return Ok(HandlerOutput::builder()
                    .with_log(handler_output.log)
                    .with_events(handler_output.events)
                    .with_result(()));
            }

            let write_ack_result =
                ics4_packet_callback(ctx, &module_id, &msg, &mut handler_output)
                    .map_err(Error::ics04_channel)?;

            // Apply any results to the host chain store.
            ctx.store_packet_result(handler_output.result)
                .map_err(Error::ics04_channel)?;

            if let Some(result) = write_ack_result {
                ctx.store_packet_result(result)
                    .map_err(Error::ics04_channel)?;
            }

            HandlerOutput::builder()
                .with_log(handler_output.log)
                .with_events(handler_output.events)
                .with_result(())
        }
    };

    Ok(output)
}

/// Sends a packet on behalf of the application owning `capability`, committing it on success.
/// The result is the sequence the packet was assigned.
pub fn send_packet<Ctx>(
    ctx: &mut Ctx,
    capability: &ChannelCapability,
    packet: Packet,
) -> Result<HandlerOutput<Sequence>, Error>
where
    Ctx: Ics26Context,
{
    let handler_output = ics4_send_packet(ctx, capability, packet).map_err(Error::ics04_channel)?;

    let sequence = match &handler_output.result {
        PacketResult::Send(result) => result.seq,
        _ => return Err(Error::ics04_channel(ChannelError::implementation_specific(
                "send handler returned no send result".to_string(),
            ))),
    };

    ctx.store_packet_result(handler_output.result)
        .map_err(Error::ics04_channel)?;

    let mut output = HandlerOutputBuilder::new();
    output.merge_output(HandlerOutput {
        result: (),
        log: handler_output.log,
        events: handler_output.events,
    });
    Ok(output.with_result(sequence))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::client_consensus::AnyConsensusState;
    use crate::core::ics02_client::client_state::AnyClientState;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::msgs::create_client::MsgCreateClient;
    use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::core::ics03_connection::context::ConnectionReader;
    use crate::core::ics03_connection::msgs::conn_open_init::test_util::get_dummy_raw_msg_conn_open_init;
    use crate::core::ics03_connection::msgs::conn_open_init::MsgConnectionOpenInit;
    use crate::core::ics03_connection::msgs::ConnectionMsg;
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::msgs::chan_close_init::test_util::get_dummy_raw_msg_chan_close_init;
    use crate::core::ics04_channel::msgs::chan_close_init::MsgChannelCloseInit;
    use crate::core::ics04_channel::msgs::chan_open_init::test_util::get_dummy_raw_msg_chan_open_init;
    use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics04_channel::packet::test_utils::get_dummy_raw_packet;
    use crate::core::ics04_channel::packet::Packet;
    use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
    use crate::core::ics26_routing::error::{Error, ErrorDetail};
    use crate::core::ics26_routing::handler::{deliver, dispatch, send_packet};
    use crate::core::ics26_routing::msgs::Ics26Envelope;
    use crate::events::IbcEvent;
    use crate::mock::client_state::{MockClientState, MockConsensusState};
    use crate::mock::context::MockContext;
    use crate::mock::header::MockHeader;
    use crate::test_utils::get_dummy_account_id;
    use crate::tx_msg::Msg;
    use crate::Height;

    #[test]
    /// These tests exercise two main paths: (1) the ability of the ICS26 routing module to dispatch
    /// messages to the correct module handler, and (2) the ability of ICS handlers to work with the
    /// context correctly.
    fn routing_module_and_keepers() {
        #[derive(Clone, Debug)]
        enum TestMsg {
            Ics26(Ics26Envelope),
        }

        // Test parameters
        struct Test {
            name: String,
            msg: TestMsg,
            want_pass: bool,
        }
        let default_signer = get_dummy_account_id();
        let client_height = 5;
        let start_client_height = Height::new(0, client_height);
        let update_client_height = Height::new(0, 34);

        // We reuse this same context across all tests. Nothing in particular needs parametrizing.
        let mut ctx = MockContext::default().with_port_capability(PortId::transfer());

        let create_client_msg = MsgCreateClient::new(
            AnyClientState::from(MockClientState::new(MockHeader::new(start_client_height))),
            AnyConsensusState::Mock(MockConsensusState::new(MockHeader::new(start_client_height))),
            default_signer.clone(),
        )
        .unwrap();

        // First, create a client..
        let res = dispatch(
            &mut ctx,
            Ics26Envelope::Ics2Msg(ClientMsg::CreateClient(create_client_msg.clone())),
        );

        assert!(
            res.is_ok(),
            "ICS26 routing dispatch test 'client creation' failed for message {:?} with result: {:?}",
            create_client_msg,
            res
        );

        // Figure out the ID of the client that was just created.
        let mut events = res.unwrap().events;
        let client_id_event = events.pop();
        assert!(
            client_id_event.is_some(),
            "There was no event generated for client creation!"
        );
        let client_id = match client_id_event.unwrap() {
            IbcEvent::CreateClient(create_client) => create_client.client_id().clone(),
            event => panic!("unexpected IBC event: {:?}", event),
        };

        let msg_conn_init =
            MsgConnectionOpenInit::try_from(get_dummy_raw_msg_conn_open_init()).unwrap();

        let msg_chan_init = MsgChannelOpenInit {
            port_id: PortId::transfer(),
            ..MsgChannelOpenInit::try_from(get_dummy_raw_msg_chan_open_init()).unwrap()
        };

        let msg_chan_close_init =
            MsgChannelCloseInit::try_from(get_dummy_raw_msg_chan_close_init()).unwrap();

        let tests: Vec<Test> = vec![
            // Test some ICS2 client functionality.
            Test {
                name: "Client update successful".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics2Msg(ClientMsg::UpdateClient(
                    MsgUpdateClient {
                        client_id: client_id.clone(),
                        client_message: MockHeader::new(update_client_height).into(),
                        signer: default_signer.clone(),
                    },
                ))),
                want_pass: true,
            },
            Test {
                name: "Client update fails for an unknown client".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics2Msg(ClientMsg::UpdateClient(
                    MsgUpdateClient {
                        client_id: ClientId::new(ClientType::Mock, 9).unwrap(),
                        client_message: MockHeader::new(update_client_height).into(),
                        signer: default_signer.clone(),
                    },
                ))),
                want_pass: false,
            },
            Test {
                name: "Connection open init succeeds".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics3Msg(ConnectionMsg::ConnectionOpenInit(
                    MsgConnectionOpenInit {
                        client_id: client_id.clone(),
                        ..msg_conn_init
                    },
                ))),
                want_pass: true,
            },
            Test {
                name: "Channel open init succeeds".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenInit(
                    msg_chan_init.clone(),
                ))),
                want_pass: true,
            },
            Test {
                name: "Channel close init fails while the connection is not open".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics4ChannelMsg(
                    ChannelMsg::ChannelCloseInit(msg_chan_close_init),
                )),
                want_pass: false,
            },
            Test {
                name: "Channel open init fails on an unbound port".to_string(),
                msg: TestMsg::Ics26(Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenInit(
                    MsgChannelOpenInit {
                        port_id: "unbound".parse::<PortId>().unwrap(),
                        ..msg_chan_init
                    },
                ))),
                want_pass: false,
            },
        ];

        for test in tests {
            let res = match test.msg.clone() {
                TestMsg::Ics26(msg) => dispatch(&mut ctx, msg).map(|_| ()),
            };

            assert_eq!(
                test.want_pass,
                res.is_ok(),
                "ICS26 routing dispatch test '{}' failed for message {:?}\nwith result: {:?}",
                test.name,
                test.msg,
                res
            );
        }

        // The connection and the channel got their identifiers and ends.
        assert!(ctx.connection_end(&ConnectionId::new(0)).is_ok());
        assert!(ctx
            .channel_end(&(PortId::transfer(), ChannelId::default()))
            .is_ok());
        assert!(ctx
            .channel_capability(&PortId::transfer(), &ChannelId::default())
            .is_ok());
    }

    #[test]
    fn deliver_decodes_and_stops_at_first_failure() {
        let mut ctx = MockContext::default();
        let height = Height::new(0, 5);

        let create_client = MsgCreateClient::new(
            AnyClientState::from(MockClientState::new(MockHeader::new(height))),
            AnyConsensusState::Mock(MockConsensusState::new(MockHeader::new(height))),
            get_dummy_account_id(),
        )
        .unwrap();

        let (events, logs) = deliver(&mut ctx, vec![create_client.to_any()]).unwrap();
        assert_eq!(events.len(), 1);
        assert!(!logs.is_empty());

        let update_unknown = MsgUpdateClient {
            client_id: ClientId::default(),
            client_message: MockHeader::new(Height::new(0, 6)).into(),
            signer: get_dummy_account_id(),
        };
        let err: Error = deliver(
            &mut ctx,
            vec![create_client.to_any(), update_unknown.to_any()],
        )
        .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::Ics02Client(_)));
    }

    #[test]
    fn send_packet_commits_and_advances_sequence() {
        let packet = Packet::try_from(get_dummy_raw_packet(100, 0)).unwrap();
        let mut chains = crate::core::ics04_channel::handler::test_util::chains()
            .open_channels(crate::core::ics04_channel::channel::Order::Unordered);

        let capability = chains
            .ctx_a
            .channel_capability(&PortId::transfer(), &ChannelId::default())
            .unwrap();

        let output = send_packet(&mut chains.ctx_a, &capability, packet.clone()).unwrap();
        assert!(matches!(output.events.as_slice(), [IbcEvent::SendPacket(_)]));
        assert_eq!(output.result, 1.into());

        // The same packet sent again is a new packet with the following sequence.
        let output = send_packet(&mut chains.ctx_a, &capability, packet).unwrap();
        assert_eq!(output.result, 2.into());
        match output.events.as_slice() {
            [IbcEvent::SendPacket(event)] => assert_eq!(event.packet.sequence, 2.into()),
            other => panic!("unexpected events {:?}", other),
        }

        let key = (PortId::transfer(), ChannelId::default());
        assert_eq!(chains.ctx_a.get_next_sequence_send(&key).unwrap(), 3.into());
        for seq in [1, 2] {
            assert!(chains
                .ctx_a
                .get_packet_commitment(&(key.0.clone(), key.1, seq.into()))
                .is_ok());
        }
    }
}
