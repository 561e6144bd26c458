use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::Protobuf;
use tracing::debug;

use crate::clients::ics07_tendermint::client_def::{
    upgrade_merkle_path, verify_membership, verify_non_membership, verify_upgrade_membership,
};
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::ClientDef;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState, Status};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::specs::ProofSpecs;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::{ClientUpgradePath, Path};
use crate::mock::client_state::{MockClientState, MockConsensusState};
use crate::mock::header::MockClientMessage;
use crate::timestamp::Timestamp;
use crate::Height;

/// Key prefix under which mock chains commit upgraded client and consensus states.
pub const MOCK_UPGRADE_PATH: &str = "ibc";

/// A light client that trusts every header it is given, while still checking
/// membership proofs against the roots those headers carry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MockClient;

impl MockClient {
    fn consensus_state(
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        height: Height,
    ) -> Result<MockConsensusState, Error> {
        match ctx.consensus_state(client_id, height)? {
            AnyConsensusState::Mock(consensus_state) => Ok(consensus_state),
            _ => Err(Error::client_args_type_mismatch(ClientType::Mock)),
        }
    }
}

impl ClientDef for MockClient {
    type ClientMessage = MockClientMessage;
    type ClientState = MockClientState;
    type ConsensusState = MockConsensusState;

    fn initialise(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        consensus_state: Self::ConsensusState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error> {
        if client_state.latest_height().is_zero() {
            return Err(Error::invalid_client_state(
                "latest height cannot be zero".to_string(),
            ));
        }
        Ok((client_state, consensus_state))
    }

    fn verify_client_message(
        &self,
        _ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<(), Error> {
        match client_message {
            MockClientMessage::Header(header) => {
                if header.height().is_zero() {
                    return Err(Error::header_verification_failure(
                        "header height cannot be zero".to_string(),
                    ));
                }
            }
            MockClientMessage::Misbehaviour(misbehaviour) => {
                if &misbehaviour.client_id != client_id {
                    return Err(Error::header_verification_failure(format!(
                        "evidence targets client {}",
                        misbehaviour.client_id
                    )));
                }
                if misbehaviour.header1.height() != misbehaviour.header2.height() {
                    return Err(Error::header_verification_failure(format!(
                        "evidence headers are at different heights {} and {}",
                        misbehaviour.header1.height(),
                        misbehaviour.header2.height()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<bool, Error> {
        match client_message {
            MockClientMessage::Header(header) => {
                match Self::consensus_state(ctx, client_id, header.height()) {
                    Ok(stored) => Ok(&stored.header != header),
                    Err(_) => Ok(false),
                }
            }
            MockClientMessage::Misbehaviour(misbehaviour) => {
                Ok(misbehaviour.header1 != misbehaviour.header2)
            }
        }
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<(Self::ClientState, Vec<(Height, Self::ConsensusState)>), Error> {
        let header = match client_message {
            MockClientMessage::Header(header) => header,
            MockClientMessage::Misbehaviour(_) => {
                return Err(Error::header_verification_failure(
                    "misbehaviour cannot update a client".to_string(),
                ))
            }
        };

        let height = header.height();
        if Self::consensus_state(ctx, client_id, height).is_ok() {
            debug!("mock client {} already has a consensus state at {}", client_id, height);
            return Ok((client_state, Vec::new()));
        }

        let client_state = if height > client_state.latest_height() {
            MockClientState {
                header: header.clone(),
                ..client_state
            }
        } else {
            client_state
        };
        Ok((client_state, vec![(height, MockConsensusState::new(header))]))
    }

    fn update_state_on_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<Self::ClientState, Error> {
        if client_state.is_frozen() {
            return Ok(client_state);
        }
        let frozen_height = match client_message {
            MockClientMessage::Header(header) => header.height(),
            MockClientMessage::Misbehaviour(misbehaviour) => misbehaviour.header1.height(),
        };
        Ok(client_state.with_frozen_height(frozen_height))
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
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error> {
        let latest_height = client_state.latest_height();
        let root = Self::consensus_state(ctx, client_id, latest_height)?
            .root()
            .clone();
        let upgrade_path = [MOCK_UPGRADE_PATH.to_string()];

        let client_path = upgrade_merkle_path(
            &upgrade_path,
            ClientUpgradePath::UpgradedClientState(latest_height.revision_height),
        );
        let client_value = Protobuf::<Any>::encode_vec(&AnyClientState::Mock(
            upgraded_client_state.clone(),
        ));
        let specs = ProofSpecs::simple_merkle();
        verify_upgrade_membership(&specs, proof_upgrade_client, &root, client_path, client_value)
            .map_err(Error::invalid_upgrade_client_proof)?;

        let consensus_path = upgrade_merkle_path(
            &upgrade_path,
            ClientUpgradePath::UpgradedClientConsensusState(latest_height.revision_height),
        );
        let consensus_value = Protobuf::<Any>::encode_vec(&AnyConsensusState::Mock(
            upgraded_consensus_state.clone(),
        ));
        verify_upgrade_membership(
            &specs,
            proof_upgrade_consensus_state,
            &root,
            consensus_path,
            consensus_value,
        )
        .map_err(Error::invalid_upgrade_consensus_state_proof)?;

        Ok((upgraded_client_state, upgraded_consensus_state))
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        _subject_client_id: &ClientId,
        _subject_client_state: Self::ClientState,
        substitute_client_id: &ClientId,
        substitute_client_state: Self::ClientState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error> {
        let height = substitute_client_state.latest_height();
        let consensus_state = Self::consensus_state(ctx, substitute_client_id, height)?;
        let client_state = MockClientState {
            frozen_height: None,
            ..substitute_client_state
        };
        Ok((client_state, consensus_state))
    }

    fn status(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
    ) -> Result<Status, Error> {
        if client_state.is_frozen() {
            return Ok(Status::Frozen);
        }

        let latest_consensus_state =
            match Self::consensus_state(ctx, client_id, client_state.latest_height()) {
                Ok(cs) => cs,
                Err(_) => return Ok(Status::Unknown),
            };

        match ctx
            .host_timestamp()
            .duration_since(&latest_consensus_state.timestamp())
        {
            Some(elapsed) if client_state.expired(elapsed) => Ok(Status::Expired),
            _ => Ok(Status::Active),
        }
    }

    fn timestamp_at_height(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        height: Height,
    ) -> Result<Timestamp, Error> {
        Ok(Self::consensus_state(ctx, client_id, height)?.timestamp())
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        let consensus_state = Self::consensus_state(ctx, client_id, height)?;
        verify_membership(
            &ProofSpecs::simple_merkle(),
            prefix,
            proof,
            consensus_state.root(),
            path,
            value,
        )
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), Error> {
        let consensus_state = Self::consensus_state(ctx, client_id, height)?;
        verify_non_membership(
            &ProofSpecs::simple_merkle(),
            prefix,
            proof,
            consensus_state.root(),
            path,
        )
    }
}
