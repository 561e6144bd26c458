use ibc_engine_proto::ibc::lightclients::wasm::v1::ClientState as RawClientState;
use ibc_engine_proto::Protobuf;
use tracing::info;

use crate::clients::ics08_wasm::client_def::{
    client_store, env, stored_client_state, stored_consensus_state,
};
use crate::clients::ics08_wasm::contract::EmptyResult;
use crate::clients::ics08_wasm::engine::{display_checksum, CLIENT_STATE_KEY};
use crate::clients::ics08_wasm::error::Error;
use crate::clients::ics08_wasm::handler::MigrateContractResult;
use crate::clients::ics08_wasm::msgs::MsgMigrateContract;
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_state::AnyClientState;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics02_client::events::MigrateContract;
use crate::core::ics02_client::handler::ClientResult;
use crate::handler::{HandlerOutput, HandlerResult};

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgMigrateContract,
) -> HandlerResult<ClientResult, Ics02Error> {
    let mut output = HandlerOutput::builder();

    let MsgMigrateContract {
        client_id,
        checksum,
        msg: migrate_msg,
        signer: _,
    } = msg;

    let mut client_state = match ctx.client_state(&client_id)? {
        AnyClientState::Wasm(client_state) => client_state,
        _ => {
            return Err(Ics02Error::wasm(Error::not_a_wasm_client(
                client_id.to_string(),
            )))
        }
    };

    if client_state.checksum == checksum {
        return Err(Ics02Error::wasm(Error::invalid_migration(format!(
            "client {} already runs checksum {}",
            client_id,
            display_checksum(&checksum)
        ))));
    }
    let engine = ctx.wasm_engine();
    engine.module(&checksum).map_err(Ics02Error::wasm)?;

    let heights = ctx.consensus_state_heights(&client_id)?;
    let mut store = client_store(ctx, &client_id, &client_state);

    // The module migrates a store that already points at its own checksum.
    client_state.checksum = checksum.clone();
    store.set(
        CLIENT_STATE_KEY.as_bytes().to_vec(),
        Protobuf::<RawClientState>::encode_vec(&client_state),
    );
    let _: EmptyResult = engine
        .migrate(&checksum, &mut store, &env(ctx), &migrate_msg)
        .map_err(Ics02Error::wasm)?;

    let migrated = stored_client_state(&store)?;
    if migrated.checksum != checksum {
        return Err(Ics02Error::wasm(Error::invalid_migration(
            "the migrated client state must keep the new checksum".to_string(),
        )));
    }

    let mut consensus_states = Vec::new();
    for height in heights {
        let migrated_consensus = AnyConsensusState::Wasm(stored_consensus_state(&store, height)?);
        if migrated_consensus != ctx.consensus_state(&client_id, height)? {
            consensus_states.push((height, migrated_consensus));
        }
    }

    info!(
        client = %client_id,
        checksum = %display_checksum(&checksum),
        rewritten = consensus_states.len(),
        "migrated wasm client"
    );
    output.log(format!(
        "success: migrated client {} to checksum {}",
        client_id,
        display_checksum(&checksum)
    ));
    output.emit(
        MigrateContract {
            height: ctx.host_height(),
            client_id: client_id.clone(),
            checksum,
        }
        .into(),
    );

    Ok(output.with_result(ClientResult::Migrate(MigrateContractResult {
        client_id,
        client_state: AnyClientState::Wasm(migrated),
        consensus_states,
    })))
}
