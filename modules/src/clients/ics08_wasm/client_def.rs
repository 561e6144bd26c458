use ibc_engine_proto::ibc::lightclients::wasm::v1::{
    ClientState as RawClientState, ConsensusState as RawConsensusState,
};
use ibc_engine_proto::Protobuf;
use tracing::{debug, trace};

use crate::clients::ics08_wasm::client_message::ClientMessage;
use crate::clients::ics08_wasm::client_state::ClientState;
use crate::clients::ics08_wasm::consensus_state::ConsensusState;
use crate::clients::ics08_wasm::contract::{
    CheckForMisbehaviourMsg, CheckForMisbehaviourResult, EmptyResult, ExportMetadataMsg,
    ExportMetadataResult, InstantiateMsg, MigrateClientStoreMsg, QueryMsg, StatusMsg,
    StatusResult, SudoMsg, TimestampAtHeightMsg, TimestampAtHeightResult,
    UpdateStateOnMisbehaviourMsg, UpdateStateMsg, UpdateStateResult, VerifyClientMessageMsg,
    VerifyMembershipMsg, VerifyNonMembershipMsg, VerifyUpgradeAndUpdateStateMsg,
};
use crate::clients::ics08_wasm::engine::{
    consensus_state_key, ClientStore, Env, StoreSource, CLIENT_STATE_KEY, CONSENSUS_STATES_KEY,
    SUBJECT_PREFIX, SUBSTITUTE_PREFIX,
};
use crate::clients::ics08_wasm::error::{Error, ErrorDetail};
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::{ClientDef, GenesisMetadata};
use crate::core::ics02_client::client_state::Status;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::merkle::apply_prefix;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::Path;
use crate::timestamp::Timestamp;
use crate::Height;

/// Routes every capability to the verification module named by the client
/// state's checksum.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WasmClient;

pub(crate) fn env(ctx: &dyn ClientReader) -> Env {
    Env {
        block_height: ctx.host_height(),
        block_time: ctx.host_timestamp(),
    }
}

/// Errors raised by the module itself become `on_contract_error`; engine
/// errors, such as an unknown checksum, are surfaced as they are.
fn contract_failure(e: Error, on_contract_error: impl FnOnce(String) -> Ics02Error) -> Ics02Error {
    match e.detail() {
        ErrorDetail::ContractError(_) => on_contract_error(e.to_string()),
        _ => Ics02Error::wasm(e),
    }
}

/// The consensus states of a client as the host keeps them, served by client store key.
struct ConsensusStates<'a> {
    ctx: &'a dyn ClientReader,
    client_id: ClientId,
}

impl StoreSource for ConsensusStates<'_> {
    fn load(&self, key: &[u8]) -> Option<Vec<u8>> {
        let height: Height = core::str::from_utf8(key)
            .ok()?
            .strip_prefix(CONSENSUS_STATES_KEY)?
            .strip_prefix('/')?
            .parse()
            .ok()?;
        match self.ctx.consensus_state(&self.client_id, height) {
            Ok(AnyConsensusState::Wasm(consensus_state)) => {
                Some(Protobuf::<RawConsensusState>::encode_vec(&consensus_state))
            }
            Ok(_) => None,
            Err(e) => {
                trace!(client = %self.client_id, %height, error = %e, "consensus state not served");
                None
            }
        }
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        self.ctx
            .consensus_state_heights(&self.client_id)
            .unwrap_or_default()
            .into_iter()
            .map(consensus_state_key)
            .collect()
    }
}

/// The store of `client_id` as its module sees it. Consensus states are read from `ctx` only
/// when the module asks for them.
pub(crate) fn client_store<'a>(
    ctx: &'a dyn ClientReader,
    client_id: &ClientId,
    client_state: &ClientState,
) -> ClientStore<'a> {
    let mut store = ClientStore::with_source(ConsensusStates {
        ctx,
        client_id: client_id.clone(),
    });
    store.set(
        CLIENT_STATE_KEY.as_bytes().to_vec(),
        Protobuf::<RawClientState>::encode_vec(client_state),
    );
    store
}

pub(crate) fn stored_client_state(store: &ClientStore) -> Result<ClientState, Ics02Error> {
    let bytes = store
        .get(CLIENT_STATE_KEY.as_bytes())
        .ok_or_else(|| Ics02Error::wasm(Error::missing_client_state()))?;
    Protobuf::<RawClientState>::decode_vec(&bytes)
        .map_err(|e| Ics02Error::wasm(Error::decode_stored_state(CLIENT_STATE_KEY.to_string(), e)))
}

pub(crate) fn stored_consensus_state(store: &ClientStore, height: Height) -> Result<ConsensusState, Ics02Error> {
    let key = consensus_state_key(height);
    let bytes = store
        .get(&key)
        .ok_or_else(|| Ics02Error::wasm(Error::missing_consensus_state(height.to_string())))?;
    Protobuf::<RawConsensusState>::decode_vec(&bytes).map_err(|e| {
        Ics02Error::wasm(Error::decode_stored_state(
            String::from_utf8_lossy(&key).into_owned(),
            e,
        ))
    })
}

impl WasmClient {
    fn query<R: serde::de::DeserializeOwned>(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        msg: QueryMsg,
    ) -> Result<R, Error> {
        let store = client_store(ctx, client_id, client_state);
        ctx.wasm_engine()
            .query(&client_state.checksum, &store, &env(ctx), &msg)
    }

    /// Runs `msg` against a snapshot of the client store and returns the
    /// snapshot with the module's writes.
    fn sudo<'a, R: serde::de::DeserializeOwned>(
        &self,
        ctx: &'a dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        msg: SudoMsg,
    ) -> Result<(R, ClientStore<'a>), Ics02Error> {
        let mut store = client_store(ctx, client_id, client_state);
        let result = ctx
            .wasm_engine()
            .sudo(&client_state.checksum, &mut store, &env(ctx), &msg)
            .map_err(Ics02Error::wasm)?;
        Ok((result, store))
    }

    fn merkle_path(prefix: &CommitmentPrefix, path: Path) -> Vec<String> {
        apply_prefix(prefix, vec![path.to_string()]).key_path
    }
}

impl ClientDef for WasmClient {
    type ClientMessage = ClientMessage;
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;

    fn initialise(
        &self,
        ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        consensus_state: Self::ConsensusState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Ics02Error> {
        let height = client_state.latest_height;

        let mut store = ClientStore::default();
        store.set(
            CLIENT_STATE_KEY.as_bytes().to_vec(),
            Protobuf::<RawClientState>::encode_vec(&client_state),
        );
        store.set(
            consensus_state_key(height),
            Protobuf::<RawConsensusState>::encode_vec(&consensus_state),
        );

        let msg = InstantiateMsg {
            client_state: client_state.data.clone(),
            consensus_state: consensus_state.data.clone(),
            checksum: client_state.checksum.clone(),
        };
        let _: EmptyResult = ctx
            .wasm_engine()
            .instantiate(&client_state.checksum, &mut store, &env(ctx), &msg)
            .map_err(|e| contract_failure(e, Ics02Error::invalid_client_state))?;

        let client_state = stored_client_state(&store)?;
        let consensus_state = stored_consensus_state(&store, height)?;
        Ok((client_state, consensus_state))
    }

    fn verify_client_message(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<(), Ics02Error> {
        let msg = QueryMsg::VerifyClientMessage(VerifyClientMessageMsg {
            client_message: client_message.data.clone(),
        });
        let _: EmptyResult = self
            .query(ctx, client_id, client_state, msg)
            .map_err(|e| contract_failure(e, Ics02Error::header_verification_failure))?;
        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<bool, Ics02Error> {
        let msg = QueryMsg::CheckForMisbehaviour(CheckForMisbehaviourMsg {
            client_message: client_message.data.clone(),
        });
        let result: CheckForMisbehaviourResult = self
            .query(ctx, client_id, client_state, msg)
            .map_err(Ics02Error::wasm)?;
        Ok(result.found_misbehaviour)
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<(Self::ClientState, Vec<(Height, Self::ConsensusState)>), Ics02Error> {
        let msg = SudoMsg::UpdateState(UpdateStateMsg {
            client_message: client_message.data,
        });
        let (result, store): (UpdateStateResult, _) =
            self.sudo(ctx, client_id, &client_state, msg)?;

        let new_client_state = stored_client_state(&store)?;
        let consensus_states = result
            .heights
            .into_iter()
            .map(|height| Ok((height, stored_consensus_state(&store, height)?)))
            .collect::<Result<Vec<_>, Ics02Error>>()?;

        debug!(
            "wasm client {} stored {} consensus state(s)",
            client_id,
            consensus_states.len()
        );
        Ok((new_client_state, consensus_states))
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<Self::ClientState, Ics02Error> {
        let msg = SudoMsg::UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg {
            client_message: client_message.data,
        });
        let (_, store): (EmptyResult, _) = self.sudo(ctx, client_id, &client_state, msg)?;
        stored_client_state(&store)
    }

    fn verify_upgrade_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        upgraded_client_state: Self::ClientState,
        upgraded_consensus_state: Self::ConsensusState,
        proof_upgrade_client: &CommitmentProofBytes,
        proof_upgrade_consensus_state: &CommitmentProofBytes,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Ics02Error> {
        if upgraded_client_state.checksum != client_state.checksum {
            return Err(Ics02Error::invalid_client_state(
                "an upgrade cannot change the verification module".to_string(),
            ));
        }

        let msg = SudoMsg::VerifyUpgradeAndUpdateState(VerifyUpgradeAndUpdateStateMsg {
            upgrade_client_state: upgraded_client_state.data,
            upgrade_consensus_state: upgraded_consensus_state.data,
            proof_upgrade_client: proof_upgrade_client.as_ref().to_vec(),
            proof_upgrade_consensus_state: proof_upgrade_consensus_state.as_ref().to_vec(),
        });
        let (_, store): (EmptyResult, _) = self.sudo(ctx, client_id, client_state, msg)?;

        let new_client_state = stored_client_state(&store)?;
        let new_consensus_state = stored_consensus_state(&store, new_client_state.latest_height)?;
        Ok((new_client_state, new_consensus_state))
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_client_id: &ClientId,
        subject_client_state: Self::ClientState,
        substitute_client_id: &ClientId,
        substitute_client_state: Self::ClientState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Ics02Error> {
        if subject_client_state.checksum != substitute_client_state.checksum {
            return Err(Ics02Error::invalid_client_state(
                "subject and substitute run different verification modules".to_string(),
            ));
        }

        let mut store = ClientStore::default();
        store.insert_prefixed(
            SUBJECT_PREFIX,
            &client_store(ctx, subject_client_id, &subject_client_state),
        );
        store.insert_prefixed(
            SUBSTITUTE_PREFIX,
            &client_store(ctx, substitute_client_id, &substitute_client_state),
        );

        let msg = SudoMsg::MigrateClientStore(MigrateClientStoreMsg {});
        let _: EmptyResult = ctx
            .wasm_engine()
            .sudo(&subject_client_state.checksum, &mut store, &env(ctx), &msg)
            .map_err(|e| contract_failure(e, Ics02Error::invalid_client_state))?;

        let subject_store = store.prefixed(SUBJECT_PREFIX);
        let client_state = stored_client_state(&subject_store)?;
        let consensus_state = stored_consensus_state(&subject_store, client_state.latest_height)?;
        Ok((client_state, consensus_state))
    }

    fn status(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
    ) -> Result<Status, Ics02Error> {
        let msg = QueryMsg::Status(StatusMsg {});
        match self.query::<StatusResult>(ctx, client_id, client_state, msg) {
            Ok(result) => Ok(result.status),
            Err(e) => match e.detail() {
                ErrorDetail::UnknownChecksum(_) => Err(Ics02Error::wasm(e)),
                _ => Ok(Status::Unknown),
            },
        }
    }

    fn export_metadata(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
    ) -> Result<Vec<GenesisMetadata>, Ics02Error> {
        let result: ExportMetadataResult = self
            .query(
                ctx,
                client_id,
                client_state,
                QueryMsg::ExportMetadata(ExportMetadataMsg {}),
            )
            .map_err(Ics02Error::wasm)?;
        Ok(result.genesis_metadata)
    }

    fn timestamp_at_height(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
    ) -> Result<Timestamp, Ics02Error> {
        let result: TimestampAtHeightResult = self
            .query(
                ctx,
                client_id,
                client_state,
                QueryMsg::TimestampAtHeight(TimestampAtHeightMsg { height }),
            )
            .map_err(|e| {
                contract_failure(e, |_| {
                    Ics02Error::consensus_state_not_found(client_id.clone(), height)
                })
            })?;
        Timestamp::from_nanoseconds(result.timestamp)
            .map_err(|e| Ics02Error::implementation_specific(e.to_string()))
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), Ics02Error> {
        let msg = SudoMsg::VerifyMembership(VerifyMembershipMsg {
            height,
            proof: proof.as_ref().to_vec(),
            merkle_path: Self::merkle_path(prefix, path),
            value,
        });
        let _: (EmptyResult, _) = self.sudo(ctx, client_id, client_state, msg)?;
        Ok(())
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), Ics02Error> {
        let msg = SudoMsg::VerifyNonMembership(VerifyNonMembershipMsg {
            height,
            proof: proof.as_ref().to_vec(),
            merkle_path: Self::merkle_path(prefix, path),
        });
        let _: (EmptyResult, _) = self.sudo(ctx, client_id, client_state, msg)?;
        Ok(())
    }
}
