//! This module implements the processing logic for ICS4 (channel) messages.

use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::context::ChannelReader;
use crate::core::ics04_channel::error::Error;
use crate::core::ics04_channel::msgs::{ChannelMsg, PacketMsg};
use crate::core::ics04_channel::packet::PacketResult;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics26_routing::context::{Ics26Context, ModuleId, ModuleOutputBuilder, Router};
use crate::handler::{HandlerOutput, HandlerResult};

pub mod acknowledgement;
pub mod chan_close_confirm;
pub mod chan_close_init;
pub mod chan_open_ack;
pub mod chan_open_confirm;
pub mod chan_open_init;
pub mod chan_open_try;
pub mod recv_packet;
pub mod send_packet;
pub mod timeout;
pub mod timeout_on_close;
pub mod verify;
pub mod write_acknowledgement;

/// Defines the possible states of a channel identifier in a `ChannelResult`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelIdState {
    /// Specifies that the channel handshake handler allocated a new channel identifier. This
    /// happens during the processing of either the `MsgChannelOpenInit` or `MsgChannelOpenTry`.
    Generated,

    /// Specifies that the handler reused a previously-allocated channel identifier.
    Reused,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelResult {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub channel_id_state: ChannelIdState,
    pub channel_end: ChannelEnd,
}

/// Finds the module which owns the port (open init & try) or the channel (every later step)
/// targeted by `msg`, and checks that the router can reach it.
pub fn channel_validate<Ctx>(ctx: &Ctx, msg: &ChannelMsg) -> Result<ModuleId, Error>
where
    Ctx: Ics26Context,
{
    let module_id = match msg {
        ChannelMsg::ChannelOpenInit(msg) => ctx
            .lookup_module_by_port(&msg.port_id)
            .map_err(Error::ics05_port)?,
        ChannelMsg::ChannelOpenTry(msg) => ctx
            .lookup_module_by_port(&msg.port_id)
            .map_err(Error::ics05_port)?,
        ChannelMsg::ChannelOpenAck(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
        }
        ChannelMsg::ChannelOpenConfirm(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
        }
        ChannelMsg::ChannelCloseInit(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
        }
        ChannelMsg::ChannelCloseConfirm(msg) => {
            ctx.lookup_module_by_channel(&msg.port_id, &msg.channel_id)?
        }
    };

    if ctx.router().has_route(&module_id) {
        Ok(module_id)
    } else {
        Err(Error::route_not_found())
    }
}

/// General entry point for processing any type of message related to the ICS4 channel open and
/// channel close handshake protocols.
pub fn channel_dispatch<Ctx>(ctx: &Ctx, msg: &ChannelMsg) -> HandlerResult<ChannelResult, Error>
where
    Ctx: ChannelReader,
{
    match msg {
        ChannelMsg::ChannelOpenInit(msg) => chan_open_init::process(ctx, msg),
        ChannelMsg::ChannelOpenTry(msg) => chan_open_try::process(ctx, msg),
        ChannelMsg::ChannelOpenAck(msg) => chan_open_ack::process(ctx, msg),
        ChannelMsg::ChannelOpenConfirm(msg) => chan_open_confirm::process(ctx, msg),
        ChannelMsg::ChannelCloseInit(msg) => chan_close_init::process(ctx, msg),
        ChannelMsg::ChannelCloseConfirm(msg) => chan_close_confirm::process(ctx, msg),
    }
}

/// Runs the callback of the module owning the channel. Open init & try callbacks settle the
/// version stored in the channel end.
pub fn channel_callback<Ctx>(
    ctx: &mut Ctx,
    module_id: &ModuleId,
    msg: &ChannelMsg,
    handler_output: &mut HandlerOutput<ChannelResult>,
) -> Result<(), Error>
where
    Ctx: Ics26Context,
{
    let cb = ctx
        .router_mut()
        .get_route_mut(module_id)
        .ok_or_else(Error::route_not_found)?;
    let mut module_output = ModuleOutputBuilder::new();
    let result = &mut handler_output.result;

    match msg {
        ChannelMsg::ChannelOpenInit(msg) => {
            let version = cb.on_chan_open_init(
                &mut module_output,
                msg.channel.ordering,
                &msg.channel.connection_hops,
                &msg.port_id,
                &result.channel_id,
                msg.channel.counterparty(),
                &msg.channel.version,
            )?;
            result.channel_end.set_version(version);
        }
        ChannelMsg::ChannelOpenTry(msg) => {
            let version = cb.on_chan_open_try(
                &mut module_output,
                msg.channel.ordering,
                &msg.channel.connection_hops,
                &msg.port_id,
                &result.channel_id,
                msg.channel.counterparty(),
                &msg.counterparty_version,
            )?;
            result.channel_end.set_version(version);
        }
        ChannelMsg::ChannelOpenAck(msg) => cb.on_chan_open_ack(
            &mut module_output,
            &msg.port_id,
            &result.channel_id,
            &msg.counterparty_version,
        )?,
        ChannelMsg::ChannelOpenConfirm(msg) => {
            cb.on_chan_open_confirm(&mut module_output, &msg.port_id, &result.channel_id)?
        }
        ChannelMsg::ChannelCloseInit(msg) => {
            cb.on_chan_close_init(&mut module_output, &msg.port_id, &result.channel_id)?
        }
        ChannelMsg::ChannelCloseConfirm(msg) => {
            cb.on_chan_close_confirm(&mut module_output, &msg.port_id, &result.channel_id)?
        }
    }

    append_module_output(handler_output, module_output);
    Ok(())
}

/// Finds the module owning the channel end of this chain that the packet message concerns: the
/// destination end for a receive, the source end otherwise.
pub fn packet_validate<Ctx>(ctx: &Ctx, msg: &PacketMsg) -> Result<ModuleId, Error>
where
    Ctx: Ics26Context,
{
    let module_id = match msg {
        PacketMsg::RecvPacket(msg) => ctx.lookup_module_by_channel(
            &msg.packet.destination_port,
            &msg.packet.destination_channel,
        )?,
        PacketMsg::AckPacket(msg) => {
            ctx.lookup_module_by_channel(&msg.packet.source_port, &msg.packet.source_channel)?
        }
        PacketMsg::ToPacket(msg) => {
            ctx.lookup_module_by_channel(&msg.packet.source_port, &msg.packet.source_channel)?
        }
        PacketMsg::ToClosePacket(msg) => {
            ctx.lookup_module_by_channel(&msg.packet.source_port, &msg.packet.source_channel)?
        }
    };

    if ctx.router().has_route(&module_id) {
        Ok(module_id)
    } else {
        Err(Error::route_not_found())
    }
}

/// Dispatcher for processing any type of message related to the ICS4 packet protocols.
pub fn packet_dispatch<Ctx>(ctx: &Ctx, msg: &PacketMsg) -> HandlerResult<PacketResult, Error>
where
    Ctx: ChannelReader,
{
    match msg {
        PacketMsg::RecvPacket(msg) => recv_packet::process(ctx, msg),
        PacketMsg::AckPacket(msg) => acknowledgement::process(ctx, msg),
        PacketMsg::ToPacket(msg) => timeout::process(ctx, msg),
        PacketMsg::ToClosePacket(msg) => timeout_on_close::process(ctx, msg),
    }
}

/// Runs the callback of the module owning the packet's channel end. For a received packet, the
/// acknowledgement returned by the module is turned into a write-acknowledgement result, which
/// the caller stores alongside the receive result.
pub fn packet_callback<Ctx>(
    ctx: &mut Ctx,
    module_id: &ModuleId,
    msg: &PacketMsg,
    handler_output: &mut HandlerOutput<PacketResult>,
) -> Result<Option<PacketResult>, Error>
where
    Ctx: Ics26Context,
{
    let mut module_output = ModuleOutputBuilder::new();
    let cb = ctx
        .router_mut()
        .get_route_mut(module_id)
        .ok_or_else(Error::route_not_found)?;

    let acknowledgement = match msg {
        PacketMsg::RecvPacket(msg) => {
            cb.on_recv_packet(&mut module_output, &msg.packet, &msg.signer)
        }
        PacketMsg::AckPacket(msg) => {
            cb.on_acknowledgement_packet(
                &mut module_output,
                &msg.packet,
                &msg.acknowledgement,
                &msg.signer,
            )?;
            None
        }
        PacketMsg::ToPacket(msg) => {
            cb.on_timeout_packet(&mut module_output, &msg.packet, &msg.signer)?;
            None
        }
        PacketMsg::ToClosePacket(msg) => {
            cb.on_timeout_packet(&mut module_output, &msg.packet, &msg.signer)?;
            None
        }
    };
    append_module_output(handler_output, module_output);

    let (packet, acknowledgement) = match (msg, acknowledgement) {
        (PacketMsg::RecvPacket(msg), Some(ack)) => (msg.packet.clone(), ack),
        _ => return Ok(None),
    };

    let write_ack_output = write_acknowledgement::process(&*ctx, packet, acknowledgement)?;
    let HandlerOutput {
        result,
        mut log,
        mut events,
    } = write_ack_output;
    handler_output.log.append(&mut log);
    handler_output.events.append(&mut events);

    Ok(Some(result))
}

fn append_module_output<T>(
    handler_output: &mut HandlerOutput<T>,
    module_output: ModuleOutputBuilder,
) {
    let HandlerOutput {
        mut log,
        mut events,
        ..
    } = module_output.with_result(());
    handler_output.log.append(&mut log);
    handler_output.events.append(&mut events);
}
