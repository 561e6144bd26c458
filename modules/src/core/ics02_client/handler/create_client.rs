//! Protocol logic specific to processing ICS2 messages of type `MsgCreateClient`.

use tracing::debug;

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::Attributes;
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::create_client::MsgCreateClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

/// The result following the successful processing of a `MsgCreateClient` message. Preferably
/// this data type should be used with a qualified name `create_client::Result` to avoid ambiguity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_type: ClientType,
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub consensus_height: Height,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

pub fn process(ctx: &dyn ClientReader, msg: MsgCreateClient) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgCreateClient {
        client_state,
        consensus_state,
        signer: _,
    } = msg;

    let client_type = client_state.client_type();
    if !ctx.client_params().is_allowed(client_type) {
        return Err(Error::client_type_not_allowed(client_type));
    }

    let consensus_height = client_state.latest_height();
    if consensus_height.is_zero() {
        return Err(Error::invalid_client_state(
            "latest height cannot be zero".to_string(),
        ));
    }
    if client_state.is_frozen() {
        return Err(Error::invalid_client_state(
            "a new client cannot start frozen".to_string(),
        ));
    }

    // Construct this client's identifier
    let id_counter = ctx.client_counter()?;
    let client_id = ClientId::new(client_type, id_counter)
        .map_err(|e| Error::client_identifier_constructor(client_type, id_counter, e))?;

    let client_def = AnyClient::from_client_type(client_type);
    let (client_state, consensus_state) =
        client_def.initialise(ctx, &client_id, client_state, consensus_state)?;

    debug!(%client_id, %consensus_height, "creating client");
    output.log(format!(
        "success: generated new client identifier: {client_id}"
    ));

    let result = ClientResult::Create(Result {
        client_id: client_id.clone(),
        client_type,
        client_state,
        consensus_state,
        consensus_height,
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    });

    let event_attributes = Attributes::new(
        ctx.host_height(),
        client_id,
        client_type,
        consensus_height,
    );
    output.emit(IbcEvent::CreateClient(event_attributes.into()));

    Ok(output.with_result(result))
}
