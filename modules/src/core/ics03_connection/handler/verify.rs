//! ICS3 verification functions, common across all four handlers of ICS3.

use core::time::Duration;

use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::proofs::ConsensusProof;
use crate::Height;

/// Verifies the authenticity and semantic correctness of a commitment `proof`. The commitment
/// claims to prove that an object of type connection exists on the source chain (i.e., the chain
/// which created this proof). This object must match the state of `expected_conn`.
pub fn verify_connection_proof<Ctx: ConnectionReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
    expected_conn: &ConnectionEnd,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    // Fetch the client state (IBC client on the local/host chain).
    let client_state = ctx
        .client_state(connection_end.client_id())
        .map_err(Error::ics02_client)?;

    // The counterparty connection id is always set once the counterparty created its end.
    let connection_id = connection_end
        .counterparty()
        .connection_id()
        .ok_or_else(Error::missing_counterparty_connection_id)?;

    let client_def = AnyClient::from_client_type(client_state.client_type());

    client_def
        .verify_connection_state(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            connection_id,
            expected_conn,
        )
        .map_err(|e| Error::connection_proof_failed("connection state".to_string(), e))
}

/// Verifies the client `proof` from a connection handshake message, typically from a
/// `MsgConnectionOpenTry` or a `MsgConnectionOpenAck`. The `expected_client_state` argument is a
/// representation for a client of the current chain (the chain handling the current message), which
/// is running on the counterparty chain (the chain which sent this message).
pub fn verify_client_proof<Ctx: ConnectionReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
    expected_client_state: &AnyClientState,
    proof: &CommitmentProofBytes,
) -> Result<(), Error> {
    let client_state = ctx
        .client_state(connection_end.client_id())
        .map_err(Error::ics02_client)?;

    let client_def = AnyClient::from_client_type(client_state.client_type());

    client_def
        .verify_client_full_state(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof,
            connection_end.counterparty().client_id(),
            expected_client_state,
        )
        .map_err(|e| Error::connection_proof_failed("client state".to_string(), e))
}

/// Verifies that the counterparty stores, at `proof.height()`, the consensus state this
/// chain had at that height.
pub fn verify_consensus_proof<Ctx: ConnectionReader>(
    ctx: &Ctx,
    height: Height,
    connection_end: &ConnectionEnd,
    proof: &ConsensusProof,
) -> Result<(), Error> {
    let client_state = ctx
        .client_state(connection_end.client_id())
        .map_err(Error::ics02_client)?;

    // Fetch the expected consensus state from the historical (local) header data.
    let expected_consensus = ctx
        .host_consensus_state(proof.height())
        .map_err(|e| Error::connection_proof_failed("consensus state".to_string(), e))?;

    let client_def = AnyClient::from_client_type(client_state.client_type());

    client_def
        .verify_client_consensus_state(
            ctx,
            connection_end.client_id(),
            &client_state,
            height,
            connection_end.counterparty().prefix(),
            proof.proof(),
            connection_end.counterparty().client_id(),
            proof.height(),
            &expected_consensus,
        )
        .map_err(|e| Error::connection_proof_failed("consensus state".to_string(), e))
}

/// Checks that `claimed_height` is within normal bounds, i.e., fresh enough so that the chain has
/// not pruned it yet, but not newer than the current (actual) height of the local chain.
pub fn check_client_consensus_height<Ctx: ConnectionReader>(
    ctx: &Ctx,
    claimed_height: Height,
) -> Result<(), Error> {
    if claimed_height > ctx.host_height() {
        // Fail if the consensus height is too advanced.
        return Err(Error::invalid_consensus_height(
            claimed_height,
            ctx.host_height(),
        ));
    }

    if claimed_height < ctx.host_oldest_height() {
        // Fail if the consensus height is too old (has been pruned).
        return Err(Error::stale_consensus_height(
            claimed_height,
            ctx.host_oldest_height(),
        ));
    }

    Ok(())
}

/// Checks that the delay period of `connection_end` has passed, both in time and in blocks,
/// since the consensus state at `proof_height` was stored on this chain.
pub fn verify_delay_passed<Ctx: ConnectionReader>(
    ctx: &Ctx,
    proof_height: Height,
    connection_end: &ConnectionEnd,
) -> Result<(), Error> {
    let delay_period_time = connection_end.delay_period();
    if delay_period_time.is_zero() {
        return Ok(());
    }

    let client_id = connection_end.client_id();
    let last_client_update_time = ctx
        .client_update_time(client_id, proof_height)
        .map_err(Error::ics02_client)?;
    let last_client_update_height = ctx
        .client_update_height(client_id, proof_height)
        .map_err(Error::ics02_client)?;

    let current_host_time = ctx.host_timestamp();
    let earliest_time = (last_client_update_time + delay_period_time)
        .map_err(|_| Error::delay_period_overflow(delay_period_time))?;
    if current_host_time < earliest_time {
        return Err(Error::not_enough_time_elapsed(
            current_host_time,
            earliest_time,
        ));
    }

    let current_host_height = ctx.host_height();
    let delay_period_height = block_delay(ctx.max_expected_time_per_block(), delay_period_time);
    let earliest_height = last_client_update_height.add(delay_period_height);
    if current_host_height < earliest_height {
        return Err(Error::not_enough_blocks_elapsed(
            current_host_height,
            earliest_height,
        ));
    }

    Ok(())
}

/// Number of blocks expected to pass during `delay_period`, rounded up.
pub fn block_delay(max_expected_time_per_block: Duration, delay_period: Duration) -> u64 {
    let block_time = max_expected_time_per_block.as_nanos();
    if block_time == 0 {
        return 0;
    }
    let delay = delay_period.as_nanos();
    ((delay + block_time - 1) / block_time) as u64
}
