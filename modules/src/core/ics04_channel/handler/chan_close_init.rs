//! Protocol logic specific to ICS4 messages of type `MsgChannelCloseInit`.

use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::State;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_close_init::MsgChannelCloseInit;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelCloseInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // Unwrap the old channel end and validate it against the message.
    let mut channel_end = ctx.channel_end(&(msg.port_id.clone(), msg.channel_id))?;

    // Closing is terminal: a CLOSED end cannot be closed again.
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

    debug!(port_id = %msg.port_id, channel_id = %msg.channel_id, "channel close init");
    output.log("success: channel close init");

    channel_end.set_state(State::Closed);

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(msg.channel_id),
        connection_id,
        counterparty_port_id: channel_end.counterparty().port_id().clone(),
        counterparty_channel_id: channel_end.counterparty().channel_id().copied(),
    };
    output.emit(IbcEvent::CloseInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id: msg.channel_id,
        channel_id_state: ChannelIdState::Reused,
        channel_end,
    };

    Ok(output.with_result(result))
}
