use flex_error::define_error;

use crate::core::ics24_host::error::ValidationError;
use crate::Height;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        InvalidTrustingPeriod
            { reason: String }
            | e | { format_args!("invalid trusting period: {}", e.reason) },

        InvalidUnbondingPeriod
            { reason: String }
            | e | { format_args!("invalid unbonding period: {}", e.reason) },

        InvalidMaxClockDrift
            { reason: String }
            | e | { format_args!("invalid max clock drift: {}", e.reason) },

        InvalidTrustThreshold
            { reason: String }
            | e | {
                format_args!("invalid client state trust threshold: {}",
                    e.reason)
            },

        InvalidLatestHeight
            { reason: String }
            | e | { format_args!("invalid latest height: {}", e.reason) },

        InvalidChainIdentifier
            [ ValidationError ]
            | _ | { "invalid chain identifier" },

        MissingTrustLevel
            | _ | { "missing trust level" },

        MissingTrustingPeriod
            | _ | { "missing trusting period" },

        MissingUnbondingPeriod
            | _ | { "missing unbonding period" },

        MissingMaxClockDrift
            | _ | { "missing max clock drift" },

        MissingLatestHeight
            | _ | { "missing latest height" },

        NegativeTrustingPeriod
            | _ | { "negative trusting period" },

        NegativeUnbondingPeriod
            | _ | { "negative unbonding period" },

        NegativeMaxClockDrift
            | _ | {  "negative max clock drift" },

        MissingSignedHeader
            | _ | { "missing signed header" },

        MissingValidatorSet
            | _ | { "missing validator set" },

        MissingTrustedValidatorSet
            | _ | { "missing trusted validator set" },

        MissingTrustedHeight
            | _ | { "missing trusted height" },

        MissingRoot
            | _ | { "missing commitment root" },

        InvalidRawHeader
            { reason: String }
            | e | { format_args!("invalid raw header: {}", e.reason) },

        InvalidRawConsensusState
            { reason: String }
            | e | { format_args!("invalid raw client consensus state: {}", e.reason) },

        InvalidRawMisbehaviour
            { reason: String }
            | e | { format_args!("invalid raw misbehaviour: {}", e.reason) },

        InvalidHeader
            { reason: String }
            | e | { format_args!("invalid header, failed basic validation: {}", e.reason) },

        MismatchedChainId
            { expected: String, actual: String }
            | e | {
                format_args!("header chain id {0} does not match the client chain id {1}",
                    e.actual, e.expected)
            },

        MismatchedRevision
            { current_revision: u64, update_revision: u64 }
            | e | {
                format_args!("header revision {0} does not match the client revision {1}",
                    e.update_revision, e.current_revision)
            },

        TrustedHeightNotBelowHeader
            { trusted_height: Height, height: Height }
            | e | {
                format_args!("trusted height {0} must be lower than the header height {1}",
                    e.trusted_height, e.height)
            },

        MismatchedValidatorsHash
            { expected: String, actual: String }
            | e | {
                format_args!("validator set hash {0} does not match the expected hash {1}",
                    e.actual, e.expected)
            },

        EmptyProofSpecs
            | _ | { "proof specs cannot be empty" },

        InvalidHostTimestamp
            | _ | { "the host timestamp is unset" },

        NotEnoughTrust
            { tally: String }
            | e | { format_args!("not enough trust because insufficient validators overlap: {}", e.tally) },

        VerificationError
            { detail: String }
            | e | { format_args!("verification failed: {}", e.detail) },

        InvalidUpgradePath
            | _ | { "cannot upgrade the client, no upgrade path is set" },

        SubstituteMismatch
            | _ | { "the substitute client parameters differ from those of the subject client" },
    }
}
