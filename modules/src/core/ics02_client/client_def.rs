use ibc_engine_proto::ibc::core::client::v1::GenesisMetadata as RawGenesisMetadata;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics07_tendermint::client_def::TendermintClient;
use crate::clients::ics08_wasm::client_def::WasmClient;
use crate::core::ics02_client::client_consensus::{AnyConsensusState, ConsensusState};
use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState, Status};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::packet::Sequence;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics24_host::identifier::{ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::path::Path;
use crate::downcast;
use crate::timestamp::Timestamp;
use crate::Height;

#[cfg(any(test, feature = "mocks"))]
use crate::mock::client_def::MockClient;

/// A key/value pair a client exports for genesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisMetadata {
    #[serde(with = "crate::serializers::base64")]
    pub key: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub value: Vec<u8>,
}

impl From<GenesisMetadata> for RawGenesisMetadata {
    fn from(value: GenesisMetadata) -> Self {
        RawGenesisMetadata {
            key: value.key,
            value: value.value,
        }
    }
}

impl From<RawGenesisMetadata> for GenesisMetadata {
    fn from(raw: RawGenesisMetadata) -> Self {
        GenesisMetadata {
            key: raw.key,
            value: raw.value,
        }
    }
}

/// The set of capabilities every light client provides to the host.
///
/// Implementations never write: state transitions are returned to the
/// handler, which hands them to the `ClientKeeper` once the whole message
/// has been processed.
pub trait ClientDef: Clone {
    type ClientMessage: Clone;
    type ClientState: ClientState;
    type ConsensusState: ConsensusState;

    /// Validates the states a new client starts from and returns the states
    /// to store. The default accepts them unchanged.
    fn initialise(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        client_state: Self::ClientState,
        consensus_state: Self::ConsensusState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error> {
        Ok((client_state, consensus_state))
    }

    /// Checks that the message is a well-formed header or misbehaviour that
    /// the client can trust given its current state.
    fn verify_client_message(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<(), Error>;

    /// Whether a verified message proves that the counterparty misbehaved.
    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        client_message: &Self::ClientMessage,
    ) -> Result<bool, Error>;

    /// Computes the client state and the consensus states a verified header
    /// results in. Returns no consensus state when the header was already
    /// applied.
    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<(Self::ClientState, Vec<(Height, Self::ConsensusState)>), Error>;

    /// Freezes the client. Freezing a frozen client leaves it unchanged.
    fn update_state_on_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: Self::ClientState,
        client_message: Self::ClientMessage,
    ) -> Result<Self::ClientState, Error>;

    /// Verifies the upgraded client and consensus states committed by the
    /// counterparty under its upgrade path, relative to the latest trusted root.
    #[allow(clippy::too_many_arguments)]
    fn verify_upgrade_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        upgraded_client_state: Self::ClientState,
        upgraded_consensus_state: Self::ConsensusState,
        proof_upgrade_client: &CommitmentProofBytes,
        proof_upgrade_consensus_state: &CommitmentProofBytes,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error>;

    /// Replaces the state of an expired or frozen subject client with the
    /// latest state of the substitute.
    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_client_id: &ClientId,
        subject_client_state: Self::ClientState,
        substitute_client_id: &ClientId,
        substitute_client_state: Self::ClientState,
    ) -> Result<(Self::ClientState, Self::ConsensusState), Error>;

    fn status(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
    ) -> Result<Status, Error>;

    fn export_metadata(
        &self,
        _ctx: &dyn ClientReader,
        _client_id: &ClientId,
        _client_state: &Self::ClientState,
    ) -> Result<Vec<GenesisMetadata>, Error> {
        Ok(Vec::new())
    }

    /// Timestamp of the consensus state stored at `height`.
    fn timestamp_at_height(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
    ) -> Result<Timestamp, Error>;

    /// Verify a `proof` that `value` is stored under `path` in the
    /// counterparty store committed to by the consensus state at `height`.
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), Error>;

    /// Verify a `proof` that nothing is stored under `path`.
    #[allow(clippy::too_many_arguments)]
    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), Error>;

    /// Verification functions as specified in:
    /// <https://github.com/cosmos/ibc/tree/master/spec/core/ics-002-client-semantics>
    ///
    /// Verify a `proof` that the consensus state of a given client (at height `consensus_height`)
    /// matches the input `consensus_state`. The parameter `counterparty_height` represent the
    /// height of the counterparty chain that this proof assumes (i.e., the height at which this
    /// proof was computed).
    #[allow(clippy::too_many_arguments)]
    fn verify_client_consensus_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        counterparty_client_id: &ClientId,
        consensus_height: Height,
        expected_consensus_state: &AnyConsensusState,
    ) -> Result<(), Error> {
        let path = Path::ClientConsensusState {
            client_id: counterparty_client_id.clone(),
            height: consensus_height,
        };
        let value = Protobuf::<ibc_engine_proto::google::protobuf::Any>::encode_vec(
            expected_consensus_state,
        );
        self.verify_membership(ctx, client_id, client_state, height, prefix, proof, path, value)
    }

    /// Verify a `proof` that a connection state matches that of the input `connection_end`.
    #[allow(clippy::too_many_arguments)]
    fn verify_connection_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        connection_id: &ConnectionId,
        expected_connection_end: &ConnectionEnd,
    ) -> Result<(), Error> {
        let path = Path::Connections(connection_id.clone());
        let value = expected_connection_end.encode_vec();
        self.verify_membership(ctx, client_id, client_state, height, prefix, proof, path, value)
    }

    /// Verify a `proof` that a channel state matches that of the input `channel_end`.
    #[allow(clippy::too_many_arguments)]
    fn verify_channel_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        port_id: &PortId,
        channel_id: &ChannelId,
        expected_channel_end: &ChannelEnd,
    ) -> Result<(), Error> {
        let path = Path::ChannelEnds(port_id.clone(), *channel_id);
        let value = expected_channel_end.encode_vec();
        self.verify_membership(ctx, client_id, client_state, height, prefix, proof, path, value)
    }

    /// Verify the client state for this chain that it is stored on the counterparty chain.
    #[allow(clippy::too_many_arguments)]
    fn verify_client_full_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        counterparty_client_id: &ClientId,
        expected_client_state: &AnyClientState,
    ) -> Result<(), Error> {
        let path = Path::ClientState(counterparty_client_id.clone());
        let value =
            Protobuf::<ibc_engine_proto::google::protobuf::Any>::encode_vec(expected_client_state);
        self.verify_membership(ctx, client_id, client_state, height, prefix, proof, path, value)
    }

    /// Verify a `proof` that a packet has been commited.
    #[allow(clippy::too_many_arguments)]
    fn verify_packet_data(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        commitment: PacketCommitment,
    ) -> Result<(), Error> {
        let path = Path::Commitments {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_membership(
            ctx,
            client_id,
            client_state,
            height,
            prefix,
            proof,
            path,
            commitment.into_vec(),
        )
    }

    /// Verify a `proof` that a packet has been acknowledged.
    #[allow(clippy::too_many_arguments)]
    fn verify_packet_acknowledgement(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Error> {
        let path = Path::Acks {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_membership(
            ctx,
            client_id,
            client_state,
            height,
            prefix,
            proof,
            path,
            ack_commitment.into_vec(),
        )
    }

    /// Verify a `proof` that of the next_seq_received.
    #[allow(clippy::too_many_arguments)]
    fn verify_next_sequence_recv(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error> {
        let path = Path::SeqRecvs(port_id.clone(), *channel_id);
        let value = u64::from(sequence).to_be_bytes().to_vec();
        self.verify_membership(ctx, client_id, client_state, height, prefix, proof, path, value)
    }

    /// Verify a `proof` that a packet has not been received.
    #[allow(clippy::too_many_arguments)]
    fn verify_packet_receipt_absence(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &Self::ClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<(), Error> {
        let path = Path::Receipts {
            port_id: port_id.clone(),
            channel_id: *channel_id,
            sequence,
        };
        self.verify_non_membership(ctx, client_id, client_state, height, prefix, proof, path)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyClient {
    Tendermint(TendermintClient),
    Wasm(WasmClient),

    #[cfg(any(test, feature = "mocks"))]
    Mock(MockClient),
}

impl AnyClient {
    pub fn from_client_type(client_type: ClientType) -> AnyClient {
        match client_type {
            ClientType::Tendermint => Self::Tendermint(TendermintClient::default()),
            ClientType::Wasm => Self::Wasm(WasmClient::default()),

            #[cfg(any(test, feature = "mocks"))]
            ClientType::Mock => Self::Mock(MockClient),
        }
    }

    /// Checks shared by every proof verification, whatever the client type:
    /// the proof height was reached and the client is active.
    fn verify_proof_preconditions(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
    ) -> Result<(), Error> {
        client_state.verify_height(height)?;
        self.status(ctx, client_id, client_state)?
            .verify_is_active(client_id)
    }
}

// ⚠️  Beware of the awful boilerplate below ⚠️
impl ClientDef for AnyClient {
    type ClientMessage = AnyClientMessage;
    type ClientState = AnyClientState;
    type ConsensusState = AnyConsensusState;

    fn initialise(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: AnyClientState,
        consensus_state: AnyConsensusState,
    ) -> Result<(AnyClientState, AnyConsensusState), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    consensus_state => AnyConsensusState::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (client_state, consensus_state) =
                    client.initialise(ctx, client_id, client_state, consensus_state)?;
                Ok((
                    AnyClientState::Tendermint(client_state),
                    AnyConsensusState::Tendermint(consensus_state),
                ))
            }

            Self::Wasm(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Wasm,
                    consensus_state => AnyConsensusState::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                let (client_state, consensus_state) =
                    client.initialise(ctx, client_id, client_state, consensus_state)?;
                Ok((
                    AnyClientState::Wasm(client_state),
                    AnyConsensusState::Wasm(consensus_state),
                ))
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, consensus_state) = downcast!(
                    client_state => AnyClientState::Mock,
                    consensus_state => AnyConsensusState::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                let (client_state, consensus_state) =
                    client.initialise(ctx, client_id, client_state, consensus_state)?;
                Ok((
                    AnyClientState::Mock(client_state),
                    AnyConsensusState::Mock(consensus_state),
                ))
            }
        }
    }

    fn verify_client_message(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        client_message: &AnyClientMessage,
    ) -> Result<(), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    client_message => AnyClientMessage::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_client_message(ctx, client_id, client_state, client_message)
            }

            Self::Wasm(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Wasm,
                    client_message => AnyClientMessage::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.verify_client_message(ctx, client_id, client_state, client_message)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Mock,
                    client_message => AnyClientMessage::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.verify_client_message(ctx, client_id, client_state, client_message)
            }
        }
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        client_message: &AnyClientMessage,
    ) -> Result<bool, Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    client_message => AnyClientMessage::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.check_for_misbehaviour(ctx, client_id, client_state, client_message)
            }

            Self::Wasm(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Wasm,
                    client_message => AnyClientMessage::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.check_for_misbehaviour(ctx, client_id, client_state, client_message)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Mock,
                    client_message => AnyClientMessage::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.check_for_misbehaviour(ctx, client_id, client_state, client_message)
            }
        }
    }

    fn update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: AnyClientState,
        client_message: AnyClientMessage,
    ) -> Result<(AnyClientState, Vec<(Height, AnyConsensusState)>), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    client_message => AnyClientMessage::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, client_message)?;

                Ok((
                    AnyClientState::Tendermint(new_state),
                    new_consensus
                        .into_iter()
                        .map(|(h, cs)| (h, AnyConsensusState::Tendermint(cs)))
                        .collect(),
                ))
            }

            Self::Wasm(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Wasm,
                    client_message => AnyClientMessage::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, client_message)?;

                Ok((
                    AnyClientState::Wasm(new_state),
                    new_consensus
                        .into_iter()
                        .map(|(h, cs)| (h, AnyConsensusState::Wasm(cs)))
                        .collect(),
                ))
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Mock,
                    client_message => AnyClientMessage::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                let (new_state, new_consensus) =
                    client.update_state(ctx, client_id, client_state, client_message)?;

                Ok((
                    AnyClientState::Mock(new_state),
                    new_consensus
                        .into_iter()
                        .map(|(h, cs)| (h, AnyConsensusState::Mock(cs)))
                        .collect(),
                ))
            }
        }
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: AnyClientState,
        client_message: AnyClientMessage,
    ) -> Result<AnyClientState, Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    client_message => AnyClientMessage::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client
                    .update_state_on_misbehaviour(ctx, client_id, client_state, client_message)
                    .map(AnyClientState::Tendermint)
            }

            Self::Wasm(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Wasm,
                    client_message => AnyClientMessage::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client
                    .update_state_on_misbehaviour(ctx, client_id, client_state, client_message)
                    .map(AnyClientState::Wasm)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, client_message) = downcast!(
                    client_state => AnyClientState::Mock,
                    client_message => AnyClientMessage::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client
                    .update_state_on_misbehaviour(ctx, client_id, client_state, client_message)
                    .map(AnyClientState::Mock)
            }
        }
    }

    fn verify_upgrade_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        upgraded_client_state: AnyClientState,
        upgraded_consensus_state: AnyConsensusState,
        proof_upgrade_client: &CommitmentProofBytes,
        proof_upgrade_consensus_state: &CommitmentProofBytes,
    ) -> Result<(AnyClientState, AnyConsensusState), Error> {
        match self {
            Self::Tendermint(client) => {
                let (client_state, upgraded_client_state, upgraded_consensus_state) = downcast!(
                    client_state => AnyClientState::Tendermint,
                    upgraded_client_state => AnyClientState::Tendermint,
                    upgraded_consensus_state => AnyConsensusState::Tendermint,
                )
                .map(|(a, (b, c))| (a, b, c))
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (new_state, new_consensus) = client.verify_upgrade_and_update_state(
                    ctx,
                    client_id,
                    client_state,
                    upgraded_client_state,
                    upgraded_consensus_state,
                    proof_upgrade_client,
                    proof_upgrade_consensus_state,
                )?;

                Ok((
                    AnyClientState::Tendermint(new_state),
                    AnyConsensusState::Tendermint(new_consensus),
                ))
            }

            Self::Wasm(client) => {
                let (client_state, upgraded_client_state, upgraded_consensus_state) = downcast!(
                    client_state => AnyClientState::Wasm,
                    upgraded_client_state => AnyClientState::Wasm,
                    upgraded_consensus_state => AnyConsensusState::Wasm,
                )
                .map(|(a, (b, c))| (a, b, c))
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                let (new_state, new_consensus) = client.verify_upgrade_and_update_state(
                    ctx,
                    client_id,
                    client_state,
                    upgraded_client_state,
                    upgraded_consensus_state,
                    proof_upgrade_client,
                    proof_upgrade_consensus_state,
                )?;

                Ok((
                    AnyClientState::Wasm(new_state),
                    AnyConsensusState::Wasm(new_consensus),
                ))
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (client_state, upgraded_client_state, upgraded_consensus_state) = downcast!(
                    client_state => AnyClientState::Mock,
                    upgraded_client_state => AnyClientState::Mock,
                    upgraded_consensus_state => AnyConsensusState::Mock,
                )
                .map(|(a, (b, c))| (a, b, c))
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                let (new_state, new_consensus) = client.verify_upgrade_and_update_state(
                    ctx,
                    client_id,
                    client_state,
                    upgraded_client_state,
                    upgraded_consensus_state,
                    proof_upgrade_client,
                    proof_upgrade_consensus_state,
                )?;

                Ok((
                    AnyClientState::Mock(new_state),
                    AnyConsensusState::Mock(new_consensus),
                ))
            }
        }
    }

    fn check_substitute_and_update_state(
        &self,
        ctx: &dyn ClientReader,
        subject_client_id: &ClientId,
        subject_client_state: AnyClientState,
        substitute_client_id: &ClientId,
        substitute_client_state: AnyClientState,
    ) -> Result<(AnyClientState, AnyConsensusState), Error> {
        match self {
            Self::Tendermint(client) => {
                let (subject, substitute) = downcast!(
                    subject_client_state => AnyClientState::Tendermint,
                    substitute_client_state => AnyClientState::Tendermint,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_client_id,
                    subject,
                    substitute_client_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Tendermint(new_state),
                    AnyConsensusState::Tendermint(new_consensus),
                ))
            }

            Self::Wasm(client) => {
                let (subject, substitute) = downcast!(
                    subject_client_state => AnyClientState::Wasm,
                    substitute_client_state => AnyClientState::Wasm,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_client_id,
                    subject,
                    substitute_client_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Wasm(new_state),
                    AnyConsensusState::Wasm(new_consensus),
                ))
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let (subject, substitute) = downcast!(
                    subject_client_state => AnyClientState::Mock,
                    substitute_client_state => AnyClientState::Mock,
                )
                .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                let (new_state, new_consensus) = client.check_substitute_and_update_state(
                    ctx,
                    subject_client_id,
                    subject,
                    substitute_client_id,
                    substitute,
                )?;

                Ok((
                    AnyClientState::Mock(new_state),
                    AnyConsensusState::Mock(new_consensus),
                ))
            }
        }
    }

    fn status(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
    ) -> Result<Status, Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.status(ctx, client_id, client_state)
            }

            Self::Wasm(client) => {
                let client_state = downcast!(client_state => AnyClientState::Wasm)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.status(ctx, client_id, client_state)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let client_state = downcast!(client_state => AnyClientState::Mock)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.status(ctx, client_id, client_state)
            }
        }
    }

    fn export_metadata(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
    ) -> Result<Vec<GenesisMetadata>, Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.export_metadata(ctx, client_id, client_state)
            }

            Self::Wasm(client) => {
                let client_state = downcast!(client_state => AnyClientState::Wasm)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.export_metadata(ctx, client_id, client_state)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let client_state = downcast!(client_state => AnyClientState::Mock)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.export_metadata(ctx, client_id, client_state)
            }
        }
    }

    fn timestamp_at_height(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
    ) -> Result<Timestamp, Error> {
        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.timestamp_at_height(ctx, client_id, client_state, height)
            }

            Self::Wasm(client) => {
                let client_state = downcast!(client_state => AnyClientState::Wasm)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.timestamp_at_height(ctx, client_id, client_state, height)
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let client_state = downcast!(client_state => AnyClientState::Mock)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.timestamp_at_height(ctx, client_id, client_state, height)
            }
        }
    }

    fn verify_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), Error> {
        self.verify_proof_preconditions(ctx, client_id, client_state, height)?;

        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }

            Self::Wasm(client) => {
                let client_state = downcast!(client_state => AnyClientState::Wasm)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let client_state = downcast!(client_state => AnyClientState::Mock)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.verify_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                    value,
                )
            }
        }
    }

    fn verify_non_membership(
        &self,
        ctx: &dyn ClientReader,
        client_id: &ClientId,
        client_state: &AnyClientState,
        height: Height,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), Error> {
        self.verify_proof_preconditions(ctx, client_id, client_state, height)?;

        match self {
            Self::Tendermint(client) => {
                let client_state = downcast!(client_state => AnyClientState::Tendermint)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }

            Self::Wasm(client) => {
                let client_state = downcast!(client_state => AnyClientState::Wasm)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Wasm))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(client) => {
                let client_state = downcast!(client_state => AnyClientState::Mock)
                    .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Mock))?;

                client.verify_non_membership(
                    ctx,
                    client_id,
                    client_state,
                    height,
                    prefix,
                    proof,
                    path,
                )
            }
        }
    }
}
