//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenTry`.

use tracing::debug;

use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::verify::{
    check_client_consensus_height, verify_client_proof, verify_connection_proof,
    verify_consensus_proof,
};
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_try::MsgConnectionOpenTry;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenTry,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // Check that consensus height (for client proof) in message is not too advanced nor too old.
    check_client_consensus_height(ctx, msg.consensus_height())?;

    ctx.validate_self_client(&msg.client_state)
        .map_err(|e| Error::connection_proof_failed("self client".to_string(), e))?;

    let counterparty_connection_id = msg
        .counterparty
        .connection_id()
        .cloned()
        .ok_or_else(Error::missing_counterparty_connection_id)?;

    let mut new_connection_end = ConnectionEnd::new(
        State::TryOpen,
        msg.client_id.clone(),
        msg.counterparty.clone(),
        msg.counterparty_versions.clone(),
        msg.delay_period,
    );

    // The end the counterparty is expected to have stored in its INIT step.
    let expected_conn = ConnectionEnd::new(
        State::Init,
        msg.counterparty.client_id().clone(),
        Counterparty::new(msg.client_id.clone(), None, ctx.commitment_prefix()),
        msg.counterparty_versions.clone(),
        msg.delay_period,
    );

    let proof_height = msg.proofs.height();
    verify_connection_proof(
        ctx,
        proof_height,
        &new_connection_end,
        &expected_conn,
        msg.proofs.object_proof(),
    )?;

    let client_proof = msg
        .proofs
        .client_proof()
        .as_ref()
        .ok_or_else(Error::missing_client_proof)?;
    verify_client_proof(
        ctx,
        proof_height,
        &new_connection_end,
        &msg.client_state,
        client_proof,
    )?;

    let consensus_proof = msg
        .proofs
        .consensus_proof()
        .ok_or_else(Error::missing_consensus_proof)?;
    verify_consensus_proof(ctx, proof_height, &new_connection_end, &consensus_proof)?;

    // Pick the version.
    new_connection_end.set_version(
        ctx.pick_version(ctx.get_compatible_versions(), msg.counterparty_versions.clone())?,
    );

    let conn_id = ConnectionId::new(ctx.connection_counter()?);

    debug!(
        connection_id = %conn_id,
        counterparty_connection_id = %counterparty_connection_id,
        "connection open try"
    );
    output.log(format!(
        "success: generated new connection identifier: {conn_id}"
    ));

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(conn_id.clone()),
        client_id: msg.client_id.clone(),
        counterparty_connection_id: Some(counterparty_connection_id),
        counterparty_client_id: msg.counterparty.client_id().clone(),
    };
    output.emit(IbcEvent::OpenTryConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: conn_id,
        connection_id_state: ConnectionIdState::Generated,
        connection_end: new_connection_end,
    };

    Ok(output.with_result(result))
}
