//! Protocol logic specific to ICS4 messages of type `MsgChannelCloseConfirm`.

use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_close_confirm::MsgChannelCloseConfirm;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelCloseConfirm,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Retrieve the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id))?;

    // Validate that the channel end is in a state where it can be closed.
    if channel_end.state_matches(&State::Closed) {
        return Err(Error::channel_closed(msg.channel_id));
    }

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

    let expected_channel_end = ChannelEnd::new(
        State::Closed,
        *channel_end.ordering(),
        Counterparty::new(msg.port_id.clone(), Some(msg.channel_id)),
        vec![counterparty_connection_id.clone()],
        channel_end.version().clone(),
    );

    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &channel_end,
        &conn,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;

    debug!(port_id = %msg.port_id, channel_id = %msg.channel_id, "channel close confirm");
    output.log("success: channel close confirm verification passed");

    channel_end.set_state(State::Closed);

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().copied(),
    };
    output.emit(IbcEvent::CloseConfirmChannel(event_attributes.into()));

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
    use crate::core::ics04_channel::handler::channel_dispatch;
    use crate::core::ics04_channel::handler::test_util::{channel_end, chains, Chains};
    use crate::core::ics04_channel::msgs::chan_close_confirm::test_util::get_dummy_raw_msg_chan_close_confirm;
    use crate::core::ics04_channel::msgs::chan_close_confirm::MsgChannelCloseConfirm;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics24_host::identifier::{ChannelId, PortId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;

    #[test]
    fn chan_close_confirm_event_height() {
        let chan_a = ChannelId::new(0);
        let chan_b = ChannelId::new(0);

        // A closed its end, B is still OPEN.
        let mut chains = chains();
        chains.ctx_a = chains.ctx_a.with_channel(
            PortId::transfer(),
            chan_a,
            channel_end(
                State::Closed,
                Order::Unordered,
                Some(chan_b),
                chains.conn_a.clone(),
            ),
        );
        chains.ctx_b = chains.ctx_b.with_channel(
            PortId::transfer(),
            chan_b,
            channel_end(
                State::Open,
                Order::Unordered,
                Some(chan_a),
                chains.conn_b.clone(),
            ),
        );
        let Chains { ctx_a, ctx_b, .. } = chains.sync_b();

        let proof_height = ctx_a.host_height();
        let msg = MsgChannelCloseConfirm::new(
            PortId::transfer(),
            chan_b,
            Proofs::new(
                ctx_a
                    .commitment_proof(&Path::ChannelEnds(PortId::transfer(), chan_a), proof_height)
                    .unwrap(),
                None,
                None,
                None,
                proof_height,
            )
            .unwrap(),
            get_dummy_account_id(),
        );

        let output = channel_dispatch(&ctx_b, &ChannelMsg::ChannelCloseConfirm(msg)).unwrap();

        assert_eq!(output.result.channel_end.state(), &State::Closed);
        assert!(!output.events.is_empty());
        for event in output.events.iter() {
            assert!(matches!(event, &IbcEvent::CloseConfirmChannel(_)));
            assert_eq!(event.height(), Some(ctx_b.host_height()));
        }
    }

    #[test]
    fn chan_close_confirm_requires_a_closed_counterparty() {
        let msg =
            MsgChannelCloseConfirm::try_from(get_dummy_raw_msg_chan_close_confirm(10)).unwrap();

        let chains = chains();
        let ctx = chains.ctx_b.with_channel(
            msg.port_id.clone(),
            msg.channel_id,
            channel_end(
                State::Open,
                Order::Unordered,
                Some(ChannelId::new(0)),
                chains.conn_b.clone(),
            ),
        );

        // The dummy proof cannot show a CLOSED end on the counterparty.
        assert!(channel_dispatch(&ctx, &ChannelMsg::ChannelCloseConfirm(msg)).is_err());
    }
}
