use core::time::Duration;

use flex_error::define_error;

use crate::core::ics02_client::error as client_error;
use crate::core::ics03_connection::connection::State;
use crate::core::ics03_connection::version::Version;
use crate::core::ics23_commitment::error::Error as Ics23Error;
use crate::core::ics24_host::error::ValidationError;
use crate::core::ics24_host::identifier::{ClientId, ConnectionId};
use crate::proofs::ProofError;
use crate::timestamp::Timestamp;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Ics02Client
            [ client_error::Error ]
            | _ | { "ics02 client error" },

        InvalidState
            { state: i32 }
            | e | { format_args!("connection state is unknown: {}", e.state) },

        ConnectionStateMismatch
            {
                connection_id: ConnectionId,
                expected: State,
                actual: State,
            }
            | e | {
                format_args!("connection {0} is in state {2}, expected {1}",
                    e.connection_id, e.expected, e.actual)
            },

        ConnectionNotFound
            { connection_id: ConnectionId }
            | e | { format_args!("no connection was found for identifier {0}", e.connection_id) },

        ConnectionNotOpen
            { connection_id: ConnectionId }
            | e | { format_args!("connection {0} is not open", e.connection_id) },

        InvalidConsensusHeight
            {
                target_height: Height,
                current_height: Height
            }
            | e | {
                format_args!("consensus height claimed by the client on the other party is too advanced: {0} (host chain current height: {1})",
                    e.target_height, e.current_height)
            },

        StaleConsensusHeight
            {
                target_height: Height,
                oldest_height: Height
            }
            | e | {
                format_args!("consensus height claimed by the client on the other party has been pruned: {0} (host chain oldest height: {1})",
                    e.target_height, e.oldest_height)
            },

        InvalidIdentifier
            [ ValidationError ]
            | _ | { "identifier error" },

        EmptyProtoConnectionEnd
            | _ | { "ConnectionEnd domain object could not be constructed out of empty proto object" },

        EmptyVersions
            | _ | { "empty supported versions" },

        EmptyFeatures
            | _ | { "empty supported features" },

        NoCommonVersion
            | _ | { "no common version" },

        VersionNotSupported
            { version: Version }
            | e | { format_args!("the counterparty selected version {} is not supported", e.version) },

        MissingProofHeight
            | _ | { "missing proof height" },

        MissingConsensusHeight
            | _ | { "missing consensus height" },

        MissingClientState
            | _ | { "missing client state" },

        MissingClientProof
            | _ | { "missing client proof" },

        MissingConsensusProof
            | _ | { "missing consensus proof" },

        InvalidProof
            [ ProofError ]
            | _ | { "invalid connection proof" },

        InvalidRawProof
            [ ValidationError ]
            | _ | { "invalid raw proof bytes" },

        InvalidClientState
            [ client_error::Error ]
            | _ | { "invalid client state in connection message" },

        MissingCounterparty
            | _ | { "missing counterparty" },

        MissingCounterpartyConnectionId
            | _ | { "missing counterparty connection identifier" },

        MissingCounterpartyPrefix
            | _ | { "missing counterparty prefix" },

        InvalidCommitmentPrefix
            [ Ics23Error ]
            | _ | { "invalid commitment prefix" },

        ConnectionProofFailed
            { what: String }
            [ client_error::Error ]
            | e | { format_args!("connection handshake proof failed: {}", e.what) },

        NotEnoughTimeElapsed
            {
                current_host_time: Timestamp,
                earliest_time: Timestamp,
            }
            | e | {
                format_args!("not enough time elapsed, current timestamp {0} is still less than earliest acceptable timestamp {1}",
                    e.current_host_time, e.earliest_time)
            },

        NotEnoughBlocksElapsed
            {
                current_host_height: Height,
                earliest_height: Height,
            }
            | e | {
                format_args!("not enough blocks elapsed, current height {0} is still less than earliest acceptable height {1}",
                    e.current_host_height, e.earliest_height)
            },

        DelayPeriodOverflow
            { delay_period: Duration }
            | e | { format_args!("delay period {:?} overflows the processed time", e.delay_period) },

        ImplementationSpecific
            { reason: String }
            | e | { format_args!("implementation specific error: {}", e.reason) },
    }
}
