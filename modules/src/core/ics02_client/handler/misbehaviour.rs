//! Protocol logic specific to processing ICS2 messages of type `MsgSubmitMisbehaviour`.

use tracing::info;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::Attributes;
use crate::core::ics02_client::handler::{update_client, ClientResult};
use crate::core::ics02_client::msgs::misbehaviour::MsgSubmitMisbehaviour;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgSubmitMisbehaviour,
) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgSubmitMisbehaviour {
        client_id,
        misbehaviour,
        signer: _,
    } = msg;

    let client_type = ctx.client_type(&client_id)?;
    let client_def = AnyClient::from_client_type(client_type);
    let client_state = ctx.client_state(&client_id)?;

    client_def
        .status(ctx, &client_id, &client_state)?
        .verify_is_active(&client_id)?;

    client_def.verify_client_message(ctx, &client_id, &client_state, &misbehaviour)?;

    if !client_def.check_for_misbehaviour(ctx, &client_id, &client_state, &misbehaviour)? {
        return Err(Error::misbehaviour_not_detected(client_id));
    }

    let latest_height = client_state.latest_height();
    let client_state =
        client_def.update_state_on_misbehaviour(ctx, &client_id, client_state, misbehaviour)?;

    info!(%client_id, "misbehaviour evidence accepted, client frozen");

    let event_attributes =
        Attributes::new(ctx.host_height(), client_id.clone(), client_type, latest_height);
    output.emit(IbcEvent::ClientMisbehaviour(event_attributes.into()));
    output.log(format!("success: client {client_id} frozen on misbehaviour"));

    let result = ClientResult::Update(update_client::Result {
        client_id,
        client_state,
        consensus_states: Vec::new(),
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    });

    Ok(output.with_result(result))
}
