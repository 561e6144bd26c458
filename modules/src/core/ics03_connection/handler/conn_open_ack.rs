//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenAck`.

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
use crate::core::ics03_connection::msgs::conn_open_ack::MsgConnectionOpenAck;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenAck,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // Check the client's (consensus state) proof height.
    check_client_consensus_height(ctx, msg.consensus_height())?;

    // Validate the connection end.
    let mut conn_end = ctx.connection_end(&msg.connection_id)?;
    if !conn_end.state_matches(&State::Init) {
        return Err(Error::connection_state_mismatch(
            msg.connection_id.clone(),
            State::Init,
            *conn_end.state(),
        ));
    }

    // The counterparty must have picked one of the versions this end proposed.
    msg.version.verify_proposed(conn_end.versions())?;

    ctx.validate_self_client(&msg.client_state)
        .map_err(|e| Error::connection_proof_failed("self client".to_string(), e))?;

    // Proof verification.
    let expected_conn = {
        // The counterparty is the local chain.
        let counterparty = Counterparty::new(
            conn_end.client_id().clone(),
            Some(msg.connection_id.clone()),
            ctx.commitment_prefix(),
        );

        ConnectionEnd::new(
            State::TryOpen,
            conn_end.counterparty().client_id().clone(),
            counterparty,
            vec![msg.version.clone()],
            conn_end.delay_period(),
        )
    };

    // The connection end as the counterparty describes it, with its identifier filled in.
    conn_end.set_state(State::Open);
    conn_end.set_version(msg.version.clone());
    conn_end.set_counterparty(Counterparty::new(
        conn_end.counterparty().client_id().clone(),
        Some(msg.counterparty_connection_id.clone()),
        conn_end.counterparty().prefix().clone(),
    ));

    let proof_height = msg.proofs.height();
    verify_connection_proof(
        ctx,
        proof_height,
        &conn_end,
        &expected_conn,
        msg.proofs.object_proof(),
    )?;

    let client_proof = msg
        .proofs
        .client_proof()
        .as_ref()
        .ok_or_else(Error::missing_client_proof)?;
    verify_client_proof(ctx, proof_height, &conn_end, &msg.client_state, client_proof)?;

    let consensus_proof = msg
        .proofs
        .consensus_proof()
        .ok_or_else(Error::missing_consensus_proof)?;
    verify_consensus_proof(ctx, proof_height, &conn_end, &consensus_proof)?;

    debug!(connection_id = %msg.connection_id, "connection open ack");
    output.log("success: connection verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(msg.connection_id.clone()),
        client_id: conn_end.client_id().clone(),
        counterparty_connection_id: Some(msg.counterparty_connection_id.clone()),
        counterparty_client_id: conn_end.counterparty().client_id().clone(),
    };
    output.emit(IbcEvent::OpenAckConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: msg.connection_id,
        connection_id_state: ConnectionIdState::Reused,
        connection_end: conn_end,
    };

    Ok(output.with_result(result))
}
