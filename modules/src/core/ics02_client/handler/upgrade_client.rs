//! Protocol logic specific to processing ICS2 messages of type `MsgUpgradeClient`.

use tracing::info;

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::Attributes;
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::upgrade_client::MsgUpgradeClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

/// The result following the successful processing of a `MsgUpgradeClient` message.
/// This data type should be used with a qualified name `upgrade_client::Result` to avoid ambiguity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

pub fn process(ctx: &dyn ClientReader, msg: MsgUpgradeClient) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();
    let MsgUpgradeClient { client_id, .. } = msg;

    // Read client state from the host chain store.
    let client_state = ctx.client_state(&client_id)?;
    let client_type = ctx.client_type(&client_id)?;
    let client_def = AnyClient::from_client_type(client_type);

    client_def
        .status(ctx, &client_id, &client_state)?
        .verify_is_active(&client_id)?;

    let upgrade_client_state = msg.client_state.clone();

    if client_state.latest_height() >= upgrade_client_state.latest_height() {
        return Err(Error::low_upgrade_height(
            upgrade_client_state.latest_height(),
            client_state.latest_height(),
        ));
    }

    let (new_client_state, new_consensus_state) = client_def.verify_upgrade_and_update_state(
        ctx,
        &client_id,
        &client_state,
        upgrade_client_state,
        msg.consensus_state.clone(),
        &msg.proof_upgrade_client,
        &msg.proof_upgrade_consensus_state,
    )?;

    let consensus_height = new_client_state.latest_height();
    info!(%client_id, %consensus_height, "client upgraded");

    let result = ClientResult::Upgrade(Result {
        client_id: client_id.clone(),
        client_state: new_client_state,
        consensus_state: new_consensus_state,
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    });

    let event_attributes =
        Attributes::new(ctx.host_height(), client_id, client_type, consensus_height);
    output.emit(IbcEvent::UpgradeClient(event_attributes.into()));
    output.log("success: client upgraded");

    Ok(output.with_result(result))
}
