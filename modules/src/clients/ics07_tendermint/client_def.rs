use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::core::commitment::v1::MerklePath;
use ibc_engine_proto::Protobuf;
use tendermint::block::Height as BlockHeight;
use tendermint_light_client_verifier::types::{TrustedBlockState, UntrustedBlockState};
use tendermint_light_client_verifier::{ProdVerifier, Verdict, Verifier};
use tracing::debug;

use crate::clients::ics07_tendermint::client_state::{ClientState, FROZEN_HEIGHT};
use crate::clients::ics07_tendermint::consensus_state::{ConsensusState, SENTINEL_ROOT};
use crate::clients::ics07_tendermint::error::Error;
use crate::clients::ics07_tendermint::header::{ClientMessage, Header};
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::ClientDef;
use crate::core::ics02_client::client_state::{AnyClientState, Status};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics23_commitment::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics23_commitment::merkle::{apply_prefix, MerkleProof};
use crate::core::ics23_commitment::specs::ProofSpecs;
use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics24_host::path::{ClientUpgradePath, Path};
use crate::downcast;
use crate::timestamp::Timestamp;
use crate::Height;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TendermintClient {
    verifier: ProdVerifier,
}

impl TendermintClient {
    fn consensus_state(
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        height: Height,
    ) -> Result<ConsensusState, Ics02Error> {
        let consensus_state = ctx.consensus_state(client_id, height)?;
        downcast!(consensus_state => AnyConsensusState::Tendermint)
            .ok_or_else(|| Ics02Error::client_args_type_mismatch(ClientType::Tendermint))
    }

    /// Verifies `header` against the consensus state it claims to be trusted
    /// from, with the skipping verification of the Tendermint light client.
    /// Headers submitted as misbehaviour evidence may be older than the host
    /// clock allows for updates.
    fn verify_header(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &ClientState,
        header: &Header,
        as_evidence: bool,
    ) -> Result<(), Ics02Error> {
        if header.chain_id() != client_state.chain_id {
            return Err(verification_failure(Error::mismatched_chain_id(
                client_state.chain_id.to_string(),
                header.chain_id().to_string(),
            )));
        }
        if header.height().revision_number != client_state.latest_height.revision_number {
            return Err(verification_failure(Error::mismatched_revision(
                client_state.latest_height.revision_number,
                header.height().revision_number,
            )));
        }
        header.validate_basic().map_err(verification_failure)?;

        let trusted_consensus_state =
            Self::consensus_state(ctx, client_id, header.trusted_height)?;

        let trusted_validators_hash = header.trusted_validator_set.hash();
        if trusted_validators_hash != trusted_consensus_state.next_validators_hash {
            return Err(verification_failure(Error::mismatched_validators_hash(
                trusted_consensus_state.next_validators_hash.to_string(),
                trusted_validators_hash.to_string(),
            )));
        }

        let trusted_height = BlockHeight::try_from(header.trusted_height.revision_height)
            .map_err(|e| verification_failure(Error::invalid_header(e.to_string())))?;
        let trusted_time = trusted_consensus_state
            .timestamp
            .into_tm_time()
            .ok_or_else(|| {
                verification_failure(Error::invalid_raw_consensus_state(
                    "missing timestamp".to_string(),
                ))
            })?;

        let trusted_state = TrustedBlockState {
            chain_id: &header.signed_header.header.chain_id,
            header_time: trusted_time,
            height: trusted_height,
            next_validators: &header.trusted_validator_set,
            next_validators_hash: trusted_consensus_state.next_validators_hash,
        };
        let untrusted_state = UntrustedBlockState {
            signed_header: &header.signed_header,
            validators: &header.validator_set,
            // Skips the next validators check of the untrusted block.
            next_validators: None,
        };

        let options = client_state
            .as_light_client_options()
            .map_err(verification_failure)?;
        let now = ctx
            .host_timestamp()
            .into_tm_time()
            .ok_or_else(|| verification_failure(Error::invalid_host_timestamp()))?;

        let verdict = if as_evidence {
            self.verifier
                .verify_misbehaviour_header(untrusted_state, trusted_state, &options, now)
        } else {
            self.verifier
                .verify_update_header(untrusted_state, trusted_state, &options, now)
        };

        match verdict {
            Verdict::Success => {}
            Verdict::NotEnoughTrust(tally) => {
                return Err(verification_failure(Error::not_enough_trust(
                    tally.to_string(),
                )))
            }
            Verdict::Invalid(detail) => {
                return Err(verification_failure(Error::verification_error(
                    detail.to_string(),
                )))
            }
        }

        debug!(
            "verified tendermint header {} from trusted height {}",
            header.height(),
            header.trusted_height
        );
        Ok(())
    }

    /// Whether a verified header conflicts with a stored consensus state or
    /// breaks the monotonicity of time with its neighbours.
    fn header_is_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        header: &Header,
    ) -> Result<bool, Ics02Error> {
        let height = header.height();
        let header_consensus_state = ConsensusState::from(header.clone());

        if let Ok(existing) = Self::consensus_state(ctx, client_id, height) {
            return Ok(existing != header_consensus_state);
        }

        if let Some(AnyConsensusState::Tendermint(prev)) =
            ctx.prev_consensus_state(client_id, height)?
        {
            if prev.timestamp >= header.timestamp() {
                return Ok(true);
            }
        }

        if let Some(AnyConsensusState::Tendermint(next)) =
            ctx.next_consensus_state(client_id, height)?
        {
            if next.timestamp <= header.timestamp() {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn verification_failure(e: Error) -> Ics02Error {
    Ics02Error::header_verification_failure(e.to_string())
}

/// Checks a proof that `value` is stored under `path` in the store whose
/// root is `root`.
pub fn verify_membership(
    specs: &ProofSpecs,
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
    value: Vec<u8>,
) -> Result<(), Ics02Error> {
    let merkle_proof: MerkleProof = proof
        .clone()
        .try_into()
        .map_err(Ics02Error::invalid_commitment_proof)?;
    let merkle_path = apply_prefix(prefix, vec![path.to_string()]);

    merkle_proof
        .verify_membership(specs, root, merkle_path, value, 0)
        .map_err(Ics02Error::proof_verification_failed)
}

/// Checks a proof that nothing is stored under `path` in the store whose
/// root is `root`.
pub fn verify_non_membership(
    specs: &ProofSpecs,
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
) -> Result<(), Ics02Error> {
    let merkle_proof: MerkleProof = proof
        .clone()
        .try_into()
        .map_err(Ics02Error::invalid_commitment_proof)?;
    let merkle_path = apply_prefix(prefix, vec![path.to_string()]);

    merkle_proof
        .verify_non_membership(specs, root, merkle_path)
        .map_err(Ics02Error::proof_verification_failed)
}

/// Checks a proof of an upgraded state committed under the upgrade path.
pub fn verify_upgrade_membership(
    specs: &ProofSpecs,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    merkle_path: MerklePath,
    value: Vec<u8>,
) -> Result<(), Ics23Error> {
    let merkle_proof = MerkleProof::try_from(proof.clone())?;
    merkle_proof.verify_membership(specs, root, merkle_path, value, 0)
}

/// The key path of `path` in the upgrade store named by `upgrade_path`.
pub fn upgrade_merkle_path(upgrade_path: &[String], path: ClientUpgradePath) -> MerklePath {
    let mut key_path = upgrade_path.to_vec();
    key_path.push(Path::Upgrade(path).to_string());
    MerklePath { key_path }
}

impl ClientDef for TendermintClient {
    type ClientMessage = ClientMessage;
    type ClientState = ClientState;
    type ConsensusState = ConsensusState;

    fn initialise(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        consensus_state: Self::ConsensusState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Ics02Error> {
        client_state
            .validate()
            .map_err(|e| Ics02Error::invalid_client_state(e.to_string()))?;
        if consensus_state.root.is_empty() {
            return Err(Ics02Error::invalid_client_state(
                "consensus state root cannot be empty".to_string(),
            ));
        }
        Ok((client_state, consensus_state))
    }

    fn verify_client_message(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<(), Ics02Error> {
        match client_message {
            ClientMessage::Header(header) => {
                self.verify_header(ctx, client_id, client_state, header, false)
            }
            ClientMessage::Misbehaviour(misbehaviour) => {
                if misbehaviour.header1.chain_id() != misbehaviour.header2.chain_id() {
                    return Err(verification_failure(Error::mismatched_chain_id(
                        misbehaviour.header1.chain_id().to_string(),
                        misbehaviour.header2.chain_id().to_string(),
                    )));
                }
                if misbehaviour.header1.height() < misbehaviour.header2.height() {
                    return Err(verification_failure(Error::invalid_raw_misbehaviour(
                        format!(
                            "header1 height {} must not be lower than header2 height {}",
                            misbehaviour.header1.height(),
                            misbehaviour.header2.height()
                        ),
                    )));
                }
                self.verify_header(ctx, client_id, client_state, &misbehaviour.header1, true)?;
                self.verify_header(ctx, client_id, client_state, &misbehaviour.header2, true)
            }
        }
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        _client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<bool, Ics02Error> {
        match client_message {
            ClientMessage::Header(header) => self.header_is_misbehaviour(ctx, client_id, header),
            ClientMessage::Misbehaviour(misbehaviour) => {
                Ok(misbehaviour.is_fork() || misbehaviour.is_time_violation())
            }
        }
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<(Self::ClientState, Vec<(Height, Self::ConsensusState)>), Ics02Error> {
        let header = match client_message {
            ClientMessage::Header(header) => header,
            ClientMessage::Misbehaviour(_) => {
                return Err(Ics02Error::header_verification_failure(
                    "misbehaviour cannot update the client state".to_string(),
                ))
            }
        };

        let height = header.height();
        let new_consensus_state = ConsensusState::from(header.clone());

        if let Ok(existing) = Self::consensus_state(ctx, client_id, height) {
            if existing == new_consensus_state {
                return Ok((client_state, vec![]));
            }
        }

        Ok((
            client_state.with_header(&header),
            vec![(height, new_consensus_state)],
        ))
    }

    fn update_state_on_misbehaviour(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        _client_message: Self::ClientMessage,
    ) -> Result<Self::ClientState, Ics02Error> {
        if client_state.frozen_height.is_some() {
            return Ok(client_state);
        }
        Ok(client_state.with_frozen_height(FROZEN_HEIGHT))
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
        if client_state.upgrade_path.is_empty() {
            return Err(Ics02Error::invalid_client_state(
                Error::invalid_upgrade_path().to_string(),
            ));
        }

        let last_height = client_state.latest_height;
        let root = Self::consensus_state(ctx, client_id, last_height)?.root;
        let upgrade_height = last_height.revision_height;

        let committed_client_state = upgraded_client_state.clone().zero_custom_fields();
        let client_state_value = Protobuf::<Any>::encode_vec(&AnyClientState::Tendermint(
            committed_client_state,
        ));
        verify_upgrade_membership(
            &client_state.proof_specs,
            proof_upgrade_client,
            &root,
            upgrade_merkle_path(
                &client_state.upgrade_path,
                ClientUpgradePath::UpgradedClientState(upgrade_height),
            ),
            client_state_value,
        )
        .map_err(Ics02Error::invalid_upgrade_client_proof)?;

        let consensus_state_value = Protobuf::<Any>::encode_vec(&AnyConsensusState::Tendermint(
            upgraded_consensus_state.clone(),
        ));
        verify_upgrade_membership(
            &client_state.proof_specs,
            proof_upgrade_consensus_state,
            &root,
            upgrade_merkle_path(
                &client_state.upgrade_path,
                ClientUpgradePath::UpgradedClientConsensusState(upgrade_height),
            ),
            consensus_state_value,
        )
        .map_err(Ics02Error::invalid_upgrade_consensus_state_proof)?;

        let new_client_state = client_state.upgrade(upgraded_client_state);
        let new_consensus_state = ConsensusState::new(
            CommitmentRoot::from_bytes(SENTINEL_ROOT),
            upgraded_consensus_state.timestamp,
            upgraded_consensus_state.next_validators_hash,
        );

        Ok((new_client_state, new_consensus_state))
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        _subject_client_id: &ClientId,
        subject_client_state: Self::ClientState,
        substitute_client_id: &ClientId,
        substitute_client_state: Self::ClientState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Ics02Error> {
        if !subject_client_state.matches_for_recovery(&substitute_client_state) {
            return Err(Ics02Error::invalid_client_state(
                Error::substitute_mismatch().to_string(),
            ));
        }

        let height = substitute_client_state.latest_height;
        let consensus_state = Self::consensus_state(ctx, substitute_client_id, height)?;

        let new_client_state = ClientState {
            chain_id: substitute_client_state.chain_id,
            trusting_period: substitute_client_state.trusting_period,
            latest_height: height,
            frozen_height: None,
            ..subject_client_state
        };

        Ok((new_client_state, consensus_state))
    }

    fn status(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
    ) -> Result<Status, Ics02Error> {
        if client_state.frozen_height.is_some() {
            return Ok(Status::Frozen);
        }

        let latest_consensus_state =
            match Self::consensus_state(ctx, client_id, client_state.latest_height) {
                Ok(cs) => cs,
                Err(_) => return Ok(Status::Unknown),
            };

        let elapsed = ctx
            .host_timestamp()
            .duration_since(&latest_consensus_state.timestamp);
        match elapsed {
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
    ) -> Result<Timestamp, Ics02Error> {
        Ok(Self::consensus_state(ctx, client_id, height)?.timestamp)
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
        let consensus_state = Self::consensus_state(ctx, client_id, height)?;
        verify_membership(
            &client_state.proof_specs,
            prefix,
            proof,
            &consensus_state.root,
            path,
            value,
        )
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
        let consensus_state = Self::consensus_state(ctx, client_id, height)?;
        verify_non_membership(
            &client_state.proof_specs,
            prefix,
            proof,
            &consensus_state.root,
            path,
        )
    }
}
