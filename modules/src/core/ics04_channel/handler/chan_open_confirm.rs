//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenConfirm`.

use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenConfirm,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id))?;

    // Validate that the channel end is in a state where it can be confirmed.
    if !channel_end.state_matches(&State::TryOpen) {
        return Err(Error::invalid_channel_state(
            msg.channel_id,
            *channel_end.state(),
        ));
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
        State::Open,
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

    debug!(port_id = %msg.port_id, channel_id = %msg.channel_id, "channel open confirm");
    output.log("success: channel open confirm verification passed");

    // Transition the channel end to the new state.
    channel_end.set_state(State::Open);

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().copied(),
    };
    output.emit(IbcEvent::OpenConfirmChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
