//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenInit`.

use tracing::debug;

use crate::core::ics04_channel::channel::{ChannelEnd, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenInit,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    // The port must be bound to a module.
    ctx.port_capability(&msg.port_id)
        .map_err(Error::ics05_port)?;

    let connection_id = msg.channel.connection_hop()?;

    // An IBC connection running on the local (host) chain should exist.
    let conn = ctx
        .connection_end(connection_id)
        .map_err(Error::ics03_connection)?;
    let version = match conn.versions() {
        [version] => version,
        _ => return Err(Error::invalid_version_length_connection()),
    };

    if !version.supports_order(*msg.channel.ordering()) {
        return Err(Error::channel_feature_not_suported_by_connection());
    }

    // Channel identifier construction.
    let id_counter = ctx.channel_counter()?;
    let channel_id = ChannelId::new(id_counter);

    debug!(port_id = %msg.port_id, %channel_id, "channel open init");
    output.log(format!(
        "success: generated new channel identifier: {}",
        channel_id
    ));

    let new_channel_end = ChannelEnd::new(
        State::Init,
        *msg.channel.ordering(),
        msg.channel.counterparty().clone(),
        msg.channel.connection_hops().clone(),
        msg.channel.version().clone(),
    );

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(channel_id),
        connection_id: connection_id.clone(),
        counterparty_port_id: msg.channel.counterparty().port_id().clone(),
        counterparty_channel_id: None,
    };
    output.emit(IbcEvent::OpenInitChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id,
        channel_id_state: ChannelIdState::Generated,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}
