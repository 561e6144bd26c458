use flex_error::{define_error, TraceError};
use ibc_engine_proto::Error as ProtoError;

use crate::clients::ics07_tendermint::error::Error as Ics07Error;
use crate::clients::ics08_wasm::error::Error as Ics08Error;
use crate::core::ics02_client::client_state::Status;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::height::Height;
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::ClientId;
use crate::timestamp::Timestamp;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        UnknownClientType
            { client_type: String }
            | e | { format_args!("unknown client type: {0}", e.client_type) },

        ClientTypeNotAllowed
            { client_type: ClientType }
            | e | { format_args!("client type {0} is not in the allowed clients parameter", e.client_type) },

        ClientIdentifierConstructor
            { client_type: ClientType, counter: u64 }
            [ ValidationError ]
            | e | {
                format_args!("Client identifier constructor failed for type {0} with counter {1}",
                    e.client_type, e.counter)
            },

        ClientAlreadyExists
            { client_id: ClientId }
            | e | { format_args!("client already exists: {0}", e.client_id) },

        ClientNotFound
            { client_id: ClientId }
            | e | { format_args!("client not found: {0}", e.client_id) },

        ClientFrozen
            { client_id: ClientId }
            | e | { format_args!("client is frozen: {0}", e.client_id) },

        ClientExpired
            { client_id: ClientId }
            | e | { format_args!("client is expired: {0}", e.client_id) },

        ClientNotActive
            { client_id: ClientId, status: Status }
            | e | { format_args!("client {0} is not active, status: {1}", e.client_id, e.status) },

        ConsensusStateNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("consensus state not found at: {0} at height {1}",
                    e.client_id, e.height)
            },

        ProcessedTimeNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("processed time for the client {0} at height {1} not found",
                    e.client_id, e.height)
            },

        ProcessedHeightNotFound
            { client_id: ClientId, height: Height }
            | e | {
                format_args!("processed height for the client {0} at height {1} not found",
                    e.client_id, e.height)
            },

        MissingLocalConsensusState
            { height: Height }
            | e | { format_args!("the local consensus state could not be retrieved for height {}", e.height) },

        ImplementationSpecific
            { reason: String }
            | e | { format_args!("implementation specific error: {}", e.reason) },

        HeaderVerificationFailure
            { reason: String }
            | e | { format_args!("header verification failed with reason: {}", e.reason) },

        MisbehaviourNotDetected
            { client_id: ClientId }
            | e | { format_args!("the submitted evidence is not misbehaviour of client {}", e.client_id) },

        InvalidClientState
            { reason: String }
            | e | { format_args!("invalid client state: {}", e.reason) },

        InvalidTrustThreshold
            { numerator: u64, denominator: u64 }
            | e | {
                format_args!("failed to build trust threshold from fraction: {}/{}",
                    e.numerator, e.denominator)
            },

        UnknownClientStateType
            { client_state_type: String }
            | e | { format_args!("unknown client state type: {0}", e.client_state_type) },

        EmptyClientStateResponse
            | _ | { "the client state was not found" },

        UnknownConsensusStateType
            { consensus_state_type: String }
            | e | {
                format_args!("unknown client consensus state type: {0}",
                    e.consensus_state_type)
            },

        EmptyConsensusStateResponse
            | _ | { "the client consensus state was not found" },

        UnknownClientMessageType
            { client_message_type: String }
            | e | { format_args!("unknown client message type: {0}", e.client_message_type) },

        DecodeRawClientState
            [ TraceError<ProtoError> ]
            | _ | { "error decoding raw client state" },

        DecodeRawConsensusState
            [ TraceError<ProtoError> ]
            | _ | { "error decoding raw consensus state" },

        DecodeRawClientMessage
            [ TraceError<ProtoError> ]
            | _ | { "error decoding raw client message" },

        MissingRawClientState
            | _ | { "missing raw client state" },

        MissingRawConsensusState
            | _ | { "missing raw client consensus state" },

        MissingRawClientMessage
            | _ | { "missing raw client message" },

        MissingHeight
            | _ | { "missing height" },

        InvalidClientIdentifier
            [ ValidationError ]
            | _ | { "invalid client identifier" },

        InvalidRawProof
            [ ValidationError ]
            | _ | { "invalid raw proof bytes" },

        InvalidHeightResult
            | _ | { "height cannot end up zero or negative" },

        InvalidRawHeight
            { raw_height: u64 }
            | e | { format_args!("invalid raw client height: {0}", e.raw_height) },

        ClientArgsTypeMismatch
            { client_type: ClientType }
            | e | {
                format_args!("mismatch between client and arguments types, expected: {0:?}",
                    e.client_type)
            },

        LowUpgradeHeight
            {
                upgraded_height: Height,
                client_height: Height,
            }
            | e | {
                format_args!("upgraded client height {0} must be at greater than current client height {1}",
                    e.upgraded_height, e.client_height)
            },

        InvalidUpgradeClientProof
            [ Ics23Error ]
            | _ | { "invalid proof for the upgraded client state" },

        InvalidUpgradeConsensusStateProof
            [ Ics23Error ]
            | _ | { "invalid proof for the upgraded consensus state" },

        InvalidCommitmentProof
            [ Ics23Error ]
            | _ | { "invalid commitment proof bytes" },

        ProofVerificationFailed
            [ Ics23Error ]
            | _ | { "proof verification failed" },

        HeightOutOfRange
            {
                height: Height,
                latest_height: Height,
            }
            | e | {
                format_args!("proof height {0} is greater than the latest client height {1}",
                    e.height, e.latest_height)
            },

        InvalidConsensusStateTimestamp
            {
                time1: Timestamp,
                time2: Timestamp,
            }
            | e | {
                format_args!("timestamp is invalid or missing, timestamp={0},  now={1}",
                    e.time1, e.time2)
            },

        SubjectClientActive
            { client_id: ClientId }
            | e | { format_args!("subject client {0} is active and cannot be recovered", e.client_id) },

        SubstituteClientNotActive
            { client_id: ClientId, status: Status }
            | e | { format_args!("substitute client {0} must be active, status: {1}", e.client_id, e.status) },

        RecoverClientTypeMismatch
            { subject: ClientType, substitute: ClientType }
            | e | {
                format_args!("subject client type {0} differs from substitute client type {1}",
                    e.subject, e.substitute)
            },

        SubstituteHeightTooLow
            { subject_height: Height, substitute_height: Height }
            | e | {
                format_args!("substitute height {1} must be greater than subject height {0}",
                    e.subject_height, e.substitute_height)
            },

        Tendermint
            [ Ics07Error ]
            | _ | { "tendermint error" },

        Wasm
            [ Ics08Error ]
            | _ | { "wasm light client error" },
    }
}
