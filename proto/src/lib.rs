//! ibc-engine-proto gives the developer access to the raw protobuf structs
//! exchanged and stored by the ibc-engine IBC core.

// The module tree follows the protobuf package names, since the message
// definitions refer to each other through `super::` paths.

#![deny(warnings, trivial_casts, trivial_numeric_casts, unused_import_braces)]
#![allow(clippy::large_enum_variant)]
#![forbid(unsafe_code)]

pub mod google;
mod protobuf;

pub use protobuf::{Error, Protobuf};

/// Vector commitment proofs and proof specifications, as embedded in
/// `ibc.core.commitment.v1.MerkleProof` and Tendermint client states.
pub mod ics23 {
    pub use ::ics23::*;
}

/// CometBFT wire types embedded in Tendermint client headers.
pub use tendermint_proto;

pub mod ibc {
    pub mod core {
        pub mod client {
            pub mod v1 {
                include!("prost/ibc.core.client.v1.rs");
            }
        }
        pub mod commitment {
            pub mod v1 {
                include!("prost/ibc.core.commitment.v1.rs");
            }
        }
        pub mod connection {
            pub mod v1 {
                include!("prost/ibc.core.connection.v1.rs");
            }
        }
        pub mod channel {
            pub mod v1 {
                include!("prost/ibc.core.channel.v1.rs");
            }
        }
    }
    pub mod lightclients {
        pub mod tendermint {
            pub mod v1 {
                include!("prost/ibc.lightclients.tendermint.v1.rs");
            }
        }
        pub mod wasm {
            pub mod v1 {
                include!("prost/ibc.lightclients.wasm.v1.rs");
            }
        }
    }
    pub mod mock {
        include!("prost/ibc.mock.rs");
    }
}
