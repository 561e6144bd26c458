//! A verification module running the mock client logic over a wasm client store.
//!
//! The wasm client and consensus states wrap the protobuf encodings of the mock ones; client
//! messages are protobuf-encoded `Any`s carrying mock headers or misbehaviour.

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::core::commitment::v1::MerklePath;
use ibc_engine_proto::ibc::lightclients::wasm::v1::{
    ClientState as RawWasmClientState, ConsensusState as RawWasmConsensusState,
};
use ibc_engine_proto::ibc::mock::{
    ClientState as RawMockClientState, ConsensusState as RawMockConsensusState,
};
use ibc_engine_proto::Protobuf;
use prost::Message;
use serde::Serialize;

use crate::clients::ics08_wasm::client_state::ClientState as WasmClientState;
use crate::clients::ics08_wasm::consensus_state::ConsensusState as WasmConsensusState;
use crate::clients::ics08_wasm::contract::{
    CheckForMisbehaviourResult, EmptyResult, ExportMetadataResult, QueryMsg, StatusResult,
    SudoMsg, TimestampAtHeightResult, UpdateStateResult,
};
use crate::clients::ics08_wasm::engine::{
    consensus_state_key, ClientStore, Env, VerificationModule, CLIENT_STATE_KEY, SUBJECT_PREFIX,
    SUBSTITUTE_PREFIX,
};
use crate::core::ics02_client::client_state::{ClientState, Status};
use crate::core::ics23_commitment::commitment::{CommitmentProofBytes, CommitmentRoot};
use crate::core::ics23_commitment::merkle::MerkleProof;
use crate::core::ics23_commitment::specs::ProofSpecs;
use crate::mock::client_state::{MockClientState, MockConsensusState};
use crate::mock::header::MockClientMessage;
use crate::Height;

#[derive(Clone, Copy, Debug, Default)]
pub struct MockWasmModule;

/// Encodes `client_state` as the data of a wasm client state running `checksum`.
pub fn wasm_client_state(client_state: &MockClientState, checksum: Vec<u8>) -> WasmClientState {
    WasmClientState::new(
        Protobuf::<RawMockClientState>::encode_vec(client_state),
        checksum,
        client_state.latest_height(),
    )
}

pub fn wasm_consensus_state(consensus_state: &MockConsensusState) -> WasmConsensusState {
    WasmConsensusState::new(Protobuf::<RawMockConsensusState>::encode_vec(consensus_state))
}

/// Encodes a mock header or misbehaviour as the data of a wasm client message.
pub fn wasm_client_message(message: MockClientMessage) -> Vec<u8> {
    Any::from(message).encode_to_vec()
}

fn respond<T: Serialize>(result: &T) -> Result<Vec<u8>, String> {
    serde_json::to_vec(result).map_err(|e| e.to_string())
}

fn read_client(store: &ClientStore) -> Result<(WasmClientState, MockClientState), String> {
    let bytes = store
        .get(CLIENT_STATE_KEY.as_bytes())
        .ok_or_else(|| "client state not found".to_string())?;
    let wasm: WasmClientState = Protobuf::<RawWasmClientState>::decode_vec(&bytes).map_err(|e| e.to_string())?;
    let mock = Protobuf::<RawMockClientState>::decode_vec(&wasm.data).map_err(|e| e.to_string())?;
    Ok((wasm, mock))
}

fn write_client(store: &mut ClientStore, wasm: &WasmClientState, mock: &MockClientState) {
    let wasm = wasm_client_state(mock, wasm.checksum.clone());
    store.set(
        CLIENT_STATE_KEY.as_bytes().to_vec(),
        Protobuf::<RawWasmClientState>::encode_vec(&wasm),
    );
}

fn read_consensus(store: &ClientStore, height: Height) -> Result<MockConsensusState, String> {
    let bytes = store
        .get(&consensus_state_key(height))
        .ok_or_else(|| format!("consensus state not found at {height}"))?;
    let wasm: WasmConsensusState = Protobuf::<RawWasmConsensusState>::decode_vec(&bytes).map_err(|e| e.to_string())?;
    Protobuf::<RawMockConsensusState>::decode_vec(&wasm.data).map_err(|e| e.to_string())
}

fn write_consensus(store: &mut ClientStore, height: Height, consensus_state: &MockConsensusState) {
    store.set(
        consensus_state_key(height),
        Protobuf::<RawWasmConsensusState>::encode_vec(&wasm_consensus_state(consensus_state)),
    );
}

fn client_message(bytes: &[u8]) -> Result<MockClientMessage, String> {
    let any = Any::decode(bytes).map_err(|e| e.to_string())?;
    MockClientMessage::try_from(any).map_err(|e| e.to_string())
}

fn merkle_proof(proof: Vec<u8>) -> Result<MerkleProof, String> {
    let proof = CommitmentProofBytes::try_from(proof).map_err(|e| e.to_string())?;
    MerkleProof::try_from(proof).map_err(|e| e.to_string())
}

fn consensus_root(store: &ClientStore, height: Height) -> Result<CommitmentRoot, String> {
    Ok(read_consensus(store, height)?.root().clone())
}

impl MockWasmModule {
    fn status(&self, store: &ClientStore, env: &Env) -> Result<Status, String> {
        let (_, client_state) = read_client(store)?;
        if client_state.is_frozen() {
            return Ok(Status::Frozen);
        }
        let consensus_state = match read_consensus(store, client_state.latest_height()) {
            Ok(cs) => cs,
            Err(_) => return Ok(Status::Unknown),
        };
        match env.block_time.duration_since(&consensus_state.timestamp()) {
            Some(elapsed) if client_state.expired(elapsed) => Ok(Status::Expired),
            _ => Ok(Status::Active),
        }
    }

    fn update_state(&self, store: &mut ClientStore, message: &[u8]) -> Result<Vec<u8>, String> {
        let header = match client_message(message)? {
            MockClientMessage::Header(header) => header,
            MockClientMessage::Misbehaviour(_) => {
                return Err("misbehaviour cannot update a client".to_string())
            }
        };
        let height = header.height();
        if read_consensus(store, height).is_ok() {
            return respond(&UpdateStateResult { heights: vec![] });
        }

        let (wasm, client_state) = read_client(store)?;
        if height > client_state.latest_height() {
            let client_state = MockClientState {
                header: header.clone(),
                ..client_state
            };
            write_client(store, &wasm, &client_state);
        }
        write_consensus(store, height, &MockConsensusState::new(header));
        respond(&UpdateStateResult {
            heights: vec![height],
        })
    }

    fn freeze(&self, store: &mut ClientStore, message: &[u8]) -> Result<Vec<u8>, String> {
        let frozen_height = match client_message(message)? {
            MockClientMessage::Header(header) => header.height(),
            MockClientMessage::Misbehaviour(misbehaviour) => misbehaviour.header1.height(),
        };
        let (wasm, client_state) = read_client(store)?;
        if !client_state.is_frozen() {
            write_client(store, &wasm, &client_state.with_frozen_height(frozen_height));
        }
        respond(&EmptyResult {})
    }

    /// Replaces the subject's client state with the substitute's, unfrozen, along with the
    /// substitute's latest consensus state.
    fn recover(&self, store: &mut ClientStore) -> Result<Vec<u8>, String> {
        let mut subject = store.prefixed(SUBJECT_PREFIX);
        let substitute = store.prefixed(SUBSTITUTE_PREFIX);

        let (subject_wasm, _) = read_client(&subject)?;
        let (_, substitute_state) = read_client(&substitute)?;
        let height = substitute_state.latest_height();
        let consensus_state = read_consensus(&substitute, height)?;

        let recovered = MockClientState {
            frozen_height: None,
            ..substitute_state
        };
        write_client(&mut subject, &subject_wasm, &recovered);
        write_consensus(&mut subject, height, &consensus_state);
        store.insert_prefixed(SUBJECT_PREFIX, &subject);
        respond(&EmptyResult {})
    }
}

impl VerificationModule for MockWasmModule {
    fn instantiate(&self, store: &mut ClientStore, _env: &Env, _msg: &[u8]) -> Result<Vec<u8>, String> {
        let (_, client_state) = read_client(store)?;
        if client_state.latest_height().is_zero() {
            return Err("latest height cannot be zero".to_string());
        }
        read_consensus(store, client_state.latest_height())?;
        respond(&EmptyResult {})
    }

    fn sudo(&self, store: &mut ClientStore, _env: &Env, msg: &[u8]) -> Result<Vec<u8>, String> {
        let msg: SudoMsg = serde_json::from_slice(msg).map_err(|e| e.to_string())?;
        match msg {
            SudoMsg::UpdateState(msg) => self.update_state(store, &msg.client_message),
            SudoMsg::UpdateStateOnMisbehaviour(msg) => self.freeze(store, &msg.client_message),
            SudoMsg::VerifyMembership(msg) => {
                let root = consensus_root(store, msg.height)?;
                merkle_proof(msg.proof)?
                    .verify_membership(
                        &ProofSpecs::simple_merkle(),
                        &root,
                        MerklePath {
                            key_path: msg.merkle_path,
                        },
                        msg.value,
                        0,
                    )
                    .map_err(|e| e.to_string())?;
                respond(&EmptyResult {})
            }
            SudoMsg::VerifyNonMembership(msg) => {
                let root = consensus_root(store, msg.height)?;
                merkle_proof(msg.proof)?
                    .verify_non_membership(
                        &ProofSpecs::simple_merkle(),
                        &root,
                        MerklePath {
                            key_path: msg.merkle_path,
                        },
                    )
                    .map_err(|e| e.to_string())?;
                respond(&EmptyResult {})
            }
            SudoMsg::VerifyUpgradeAndUpdateState(_) => {
                Err("mock wasm clients cannot be upgraded".to_string())
            }
            SudoMsg::MigrateClientStore(_) => self.recover(store),
        }
    }

    fn query(&self, store: &ClientStore, env: &Env, msg: &[u8]) -> Result<Vec<u8>, String> {
        let msg: QueryMsg = serde_json::from_slice(msg).map_err(|e| e.to_string())?;
        match msg {
            QueryMsg::Status(_) => respond(&StatusResult {
                status: self.status(store, env)?,
            }),
            QueryMsg::ExportMetadata(_) => respond(&ExportMetadataResult {
                genesis_metadata: vec![],
            }),
            QueryMsg::TimestampAtHeight(msg) => respond(&TimestampAtHeightResult {
                timestamp: read_consensus(store, msg.height)?.timestamp().nanoseconds(),
            }),
            QueryMsg::VerifyClientMessage(msg) => {
                match client_message(&msg.client_message)? {
                    MockClientMessage::Header(header) if header.height().is_zero() => {
                        return Err("header height cannot be zero".to_string())
                    }
                    MockClientMessage::Misbehaviour(m)
                        if m.header1.height() != m.header2.height() =>
                    {
                        return Err("evidence headers are at different heights".to_string())
                    }
                    _ => {}
                }
                respond(&EmptyResult {})
            }
            QueryMsg::CheckForMisbehaviour(msg) => {
                let found_misbehaviour = match client_message(&msg.client_message)? {
                    MockClientMessage::Header(header) => read_consensus(store, header.height())
                        .map(|stored| stored.header != header)
                        .unwrap_or(false),
                    MockClientMessage::Misbehaviour(m) => m.header1 != m.header2,
                };
                respond(&CheckForMisbehaviourResult { found_misbehaviour })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_log::test;

    use super::*;
    use crate::clients::ics08_wasm::client_def::WasmClient;
    use crate::clients::ics08_wasm::client_message::ClientMessage as WasmClientMessage;
    use crate::clients::ics08_wasm::engine::checksum;
    use crate::core::ics02_client::client_def::ClientDef;
    use crate::core::ics24_host::identifier::ClientId;
    use crate::core::ics02_client::client_type::ClientType;
    use crate::mock::context::MockContext;
    use crate::mock::header::{MockHeader, MockMisbehaviour};

    fn setup() -> (MockContext, ClientId, WasmClientState) {
        let code = b"mock verification module".to_vec();
        let client_id = ClientId::new(ClientType::Wasm, 0).unwrap();
        let height = Height::new(0, 4);
        let ctx = MockContext::default()
            .with_wasm_module(code.clone(), Arc::new(MockWasmModule))
            .with_wasm_client(&client_id, height, checksum(&code));
        let client_state = wasm_client_state(
            &MockClientState::new(MockHeader::new(height)),
            checksum(&code),
        );
        (ctx, client_id, client_state)
    }

    #[test]
    fn wasm_client_follows_mock_headers() {
        let (ctx, client_id, client_state) = setup();
        assert_eq!(
            WasmClient.status(&ctx, &client_id, &client_state).unwrap(),
            Status::Active
        );

        let header = MockHeader::new(Height::new(0, 9));
        let message =
            WasmClientMessage::new(wasm_client_message(MockClientMessage::Header(header.clone())));
        WasmClient
            .verify_client_message(&ctx, &client_id, &client_state, &message)
            .unwrap();
        assert!(!WasmClient
            .check_for_misbehaviour(&ctx, &client_id, &client_state, &message)
            .unwrap());

        let (new_state, consensus_states) = WasmClient
            .update_state(&ctx, &client_id, client_state, message)
            .unwrap();
        assert_eq!(new_state.latest_height, Height::new(0, 9));
        assert_eq!(
            consensus_states,
            vec![(
                Height::new(0, 9),
                wasm_consensus_state(&MockConsensusState::new(header))
            )]
        );
    }

    #[test]
    fn client_store_reads_consensus_states_from_the_host() {
        use crate::clients::ics08_wasm::client_def::client_store;
        use crate::core::ics02_client::client_consensus::AnyConsensusState;
        use crate::core::ics02_client::context::ClientReader;

        let (ctx, client_id, client_state) = setup();
        let store = client_store(&ctx, &client_id, &client_state);

        let stored = match ctx.consensus_state(&client_id, Height::new(0, 4)).unwrap() {
            AnyConsensusState::Wasm(consensus_state) => consensus_state,
            other => panic!("unexpected consensus state {:?}", other),
        };
        assert_eq!(
            store.get(&consensus_state_key(Height::new(0, 4))),
            Some(Protobuf::<RawWasmConsensusState>::encode_vec(&stored))
        );
        assert_eq!(store.get(&consensus_state_key(Height::new(0, 5))), None);
        assert_eq!(store.get(b"consensusStates/garbage"), None);
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn wasm_client_freezes_on_misbehaviour() {
        let (ctx, client_id, client_state) = setup();
        let header = MockHeader::new(Height::new(0, 6));
        let evidence = MockClientMessage::Misbehaviour(MockMisbehaviour {
            client_id: client_id.clone(),
            header1: header.clone(),
            header2: header.with_root(b"forged".to_vec().into()),
        });
        let message = WasmClientMessage::new(wasm_client_message(evidence));

        assert!(WasmClient
            .check_for_misbehaviour(&ctx, &client_id, &client_state, &message)
            .unwrap());
        let frozen = WasmClient
            .update_state_on_misbehaviour(&ctx, &client_id, client_state, message)
            .unwrap();
        let ctx = ctx.with_client_state(&client_id, frozen.clone().into());
        assert_eq!(
            WasmClient.status(&ctx, &client_id, &frozen).unwrap(),
            Status::Frozen
        );
    }
}
