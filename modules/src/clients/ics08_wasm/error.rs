use flex_error::{define_error, DisplayOnly};

use crate::core::ics24_host::error::ValidationError;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        UnknownChecksum
            { checksum: String }
            | e | {
                format_args!("no verification module is registered for checksum {}",
                    e.checksum)
            },

        ChecksumAlreadyExists
            { checksum: String }
            | e | { format_args!("checksum {} is already allow-listed", e.checksum) },

        InvalidChecksum
            { reason: String }
            | e | { format_args!("invalid checksum: {}", e.reason) },

        EmptyCode
            | _ | { "wasm byte code cannot be empty" },

        MissingLatestHeight
            | _ | { "missing latest height" },

        MissingClientState
            | _ | { "the client store holds no client state" },

        MissingConsensusState
            { height: String }
            | e | {
                format_args!("the client store holds no consensus state at height {}",
                    e.height)
            },

        InvalidClientIdentifier
            [ ValidationError ]
            | _ | { "invalid client identifier" },

        NotAWasmClient
            { client_id: String }
            | e | { format_args!("client {} is not a wasm client", e.client_id) },

        InvalidMigration
            { reason: String }
            | e | { format_args!("invalid contract migration: {}", e.reason) },

        DecodeStoredState
            { key: String }
            [ DisplayOnly<ibc_engine_proto::Error> ]
            | e | { format_args!("cannot decode the state stored under {}", e.key) },

        EncodeContractMessage
            [ DisplayOnly<serde_json::Error> ]
            | _ | { "cannot encode the verification module message" },

        DecodeContractResult
            [ DisplayOnly<serde_json::Error> ]
            | _ | { "cannot decode the verification module result" },

        ContractError
            { reason: String }
            | e | { format_args!("verification module error: {}", e.reason) },
    }
}
