//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenAck`.

use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenAck,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id))?;

    // Validate that the channel end is in a state where it can be ack.
    if !channel_end.state_matches(&State::Init) {
        return Err(Error::invalid_channel_state(
            msg.channel_id,
            *channel_end.state(),
        ));
    }

    // An OPEN IBC connection running on the local (host) chain should exist.
    let connection_id = channel_end.connection_hop()?.clone();
    let conn = ctx
        .connection_end(&connection_id)
        .map_err(Error::ics03_connection)?;
    if !conn.state_matches(&ConnectionState::Open) {
        return Err(Error::connection_not_open(connection_id));
    }

    let counterparty_connection_id = conn
        .counterparty()
        .connection_id()
        .ok_or_else(|| Error::undefined_connection_counterparty(connection_id.clone()))?;

    // The counterparty answered with a TRYOPEN end pointing back at this one.
    let expected_channel_end = ChannelEnd::new(
        State::TryOpen,
        *channel_end.ordering(),
        Counterparty::new(msg.port_id.clone(), Some(msg.channel_id)),
        vec![counterparty_connection_id.clone()],
        msg.counterparty_version.clone(),
    );

    // Transition the channel end to the new state & pick a version.
    channel_end.set_state(State::Open);
    channel_end.set_version(msg.counterparty_version.clone());
    channel_end.set_counterparty_channel_id(msg.counterparty_channel_id);

    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &channel_end,
        &conn,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;

    debug!(port_id = %msg.port_id, channel_id = %msg.channel_id, "channel open ack");
    output.log("success: channel open ack verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: Some(msg.counterparty_channel_id),
    };
    output.emit(IbcEvent::OpenAckChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics04_channel::channel::{Order, State};
    use crate::core::ics04_channel::context::ChannelReader;
    use crate::core::ics04_channel::error::ErrorDetail;
    use crate::core::ics04_channel::handler::test_util::{channel_end, chains, Chains};
    use crate::core::ics04_channel::handler::{channel_dispatch, ChannelIdState};
    use crate::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;

    /// Chain A holds `channel-0` in INIT; chain B holds `channel-3` in TRYOPEN.
    fn setup() -> (MockContext, MsgChannelOpenAck) {
        let chan_a = ChannelId::new(0);
        let chan_b = ChannelId::new(3);

        let mut chains = chains();
        let init_end = channel_end(State::Init, Order::Ordered, None, chains.conn_a.clone());
        let try_end = channel_end(
            State::TryOpen,
            Order::Ordered,
            Some(chan_a),
            chains.conn_b.clone(),
        );
        chains.ctx_a = chains
            .ctx_a
            .with_channel(PortId::transfer(), chan_a, init_end);
        chains.ctx_b = chains
            .ctx_b
            .with_channel(PortId::transfer(), chan_b, try_end.clone());
        let Chains { ctx_a, ctx_b, .. } = chains.sync_a();

        let proof_height = ctx_b.host_height();
        let proofs = Proofs::new(
            ctx_b
                .commitment_proof(&Path::ChannelEnds(PortId::transfer(), chan_b), proof_height)
                .unwrap(),
            None,
            None,
            None,
            proof_height,
        )
        .unwrap();

        let msg = MsgChannelOpenAck::new(
            PortId::transfer(),
            chan_a,
            chan_b,
            try_end.version().clone(),
            proofs,
            get_dummy_account_id(),
        );
        (ctx_a, msg)
    }

    #[test]
    fn chan_open_ack_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgChannelOpenAck,
            want_pass: bool,
        }

        let (ctx, msg) = setup();
        let open_end = {
            let mut end = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id)).unwrap();
            end.set_state(State::Open);
            end
        };
        let ctx_already_open = ctx
            .clone()
            .with_channel(msg.port_id.clone(), msg.channel_id, open_end);

        let tests: Vec<Test> = vec![
            Test {
                name: "Good parameters".to_string(),
                ctx: ctx.clone(),
                msg: msg.clone(),
                want_pass: true,
            },
            Test {
                name: "Processing fails because no channel exists in the context".to_string(),
                ctx: MockContext::default(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the channel is already OPEN".to_string(),
                ctx: ctx_already_open,
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the counterparty channel id is wrong".to_string(),
                ctx,
                msg: MsgChannelOpenAck {
                    counterparty_channel_id: ChannelId::new(4),
                    ..msg
                },
                want_pass: false,
            },
        ];

        for test in tests {
            let res = channel_dispatch(&test.ctx, &ChannelMsg::ChannelOpenAck(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "chan_open_ack: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg,
                        test.ctx.clone()
                    );

                    let res = proto_output.result;
                    assert_eq!(res.channel_end.state(), &State::Open);
                    assert_eq!(res.channel_id_state, ChannelIdState::Reused);
                    assert_eq!(
                        res.channel_end.counterparty().channel_id(),
                        Some(&test.msg.counterparty_channel_id)
                    );

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenAckChannel(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "chan_open_ack: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
                        test.name,
                        test.msg,
                        test.ctx.clone(),
                        e,
                    );
                }
            }
        }
    }

    #[test]
    fn chan_open_ack_reports_channel_state() {
        let (ctx, msg) = setup();
        let mut closed = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id)).unwrap();
        closed.set_state(State::Closed);
        let ctx = ctx.with_channel(msg.port_id.clone(), msg.channel_id, closed);

        let err = channel_dispatch(&ctx, &ChannelMsg::ChannelOpenAck(msg)).unwrap_err();
        match err.detail() {
            ErrorDetail::InvalidChannelState(e) => assert_eq!(e.state, State::Closed),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
