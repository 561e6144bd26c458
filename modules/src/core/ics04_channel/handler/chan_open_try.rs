//! Protocol logic specific to ICS4 messages of type `MsgChannelOpenTry`.

use tracing::debug;

use crate::core::ics03_connection::connection::State as ConnectionState;
use crate::core::ics04_channel::channel::{ChannelEnd, Counterparty, State};
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::events::Attributes;
use crate::core::ics04_channel::handler::verify::verify_channel_proofs;
use crate::core::ics04_channel::handler::{ChannelIdState, ChannelResult};
use crate::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
use crate::core::ics24_host::identifier::ChannelId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ChannelReader>(
    ctx: &Ctx,
    msg: &MsgChannelOpenTry,
) -> HandlerResult<ChannelResult, Error> {
    let mut output = HandlerOutput::builder();

    ctx.port_capability(&msg.port_id)
        .map_err(Error::ics05_port)?;

    let connection_id = msg.channel.connection_hop()?;
    let conn = ctx
        .connection_end(connection_id)
        .map_err(Error::ics03_connection)?;
    if !conn.state_matches(&ConnectionState::Open) {
        return Err(Error::connection_not_open(connection_id.clone()));
    }

    let version = match conn.versions() {
        [version] => version,
        _ => return Err(Error::invalid_version_length_connection()),
    };
    if !version.supports_order(*msg.channel.ordering()) {
        return Err(Error::channel_feature_not_suported_by_connection());
    }

    // The counterparty already holds an INIT end for this channel.
    let counterparty_channel_id = msg
        .channel
        .counterparty()
        .channel_id()
        .ok_or_else(Error::missing_channel_id)?;

    let counterparty_connection_id = conn
        .counterparty()
        .connection_id()
        .ok_or_else(|| Error::undefined_connection_counterparty(connection_id.clone()))?;

    // The channel end we expect the counterparty to store.
    let expected_channel_end = ChannelEnd::new(
        State::Init,
        *msg.channel.ordering(),
        Counterparty::new(msg.port_id.clone(), None),
        vec![counterparty_connection_id.clone()],
        msg.counterparty_version.clone(),
    );

    let new_channel_end = ChannelEnd::new(
        State::TryOpen,
        *msg.channel.ordering(),
        msg.channel.counterparty().clone(),
        msg.channel.connection_hops().clone(),
        msg.channel.version().clone(),
    );

    verify_channel_proofs(
        ctx,
        msg.proofs.height(),
        &new_channel_end,
        &conn,
        &expected_channel_end,
        msg.proofs.object_proof(),
    )?;
    output.log("success: channel open try verification passed");

    let channel_id = ChannelId::new(ctx.channel_counter()?);
    debug!(port_id = %msg.port_id, %channel_id, "channel open try");
    output.log(format!(
        "success: generated new channel identifier: {}",
        channel_id
    ));

    let event_attributes = Attributes {
        height: ctx.host_height(),
        port_id: msg.port_id.clone(),
        channel_id: Some(channel_id),
        connection_id: connection_id.clone(),
        counterparty_port_id: msg.channel.counterparty().port_id().clone(),
        counterparty_channel_id: Some(*counterparty_channel_id),
    };
    output.emit(IbcEvent::OpenTryChannel(event_attributes.into()));

    let result = ChannelResult {
        port_id: msg.port_id.clone(),
        channel_id,
        channel_id_state: ChannelIdState::Generated,
        channel_end: new_channel_end,
    };

    Ok(output.with_result(result))
}
