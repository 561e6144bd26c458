#![allow(clippy::large_enum_variant)]
#![deny(trivial_casts, trivial_numeric_casts, unused_import_braces)]
#![forbid(unsafe_code)]

//! Implementation of the IBC core protocol engine:
//!
//! - ICS 02: Client
//! - ICS 03: Connection
//! - ICS 04: Channel
//! - ICS 05: Port
//! - ICS 07: Tendermint Client
//! - ICS 08: Wasm Client (checksum-addressed verification modules)
//! - ICS 18: Basic relayer functions
//! - ICS 23: Vector Commitment Scheme
//! - ICS 24: Host Requirements
//! - ICS 26: Routing
//!
//! Every handler is a pure function over a read-only context returning a
//! [`handler::HandlerOutput`]; only the routing layer commits the results
//! through the keeper traits once the whole message has been processed.

pub mod clients;
pub mod core;
pub mod events;
pub mod handler;
pub mod keys;
pub mod macros;
pub mod proofs;
pub mod relayer;
pub mod signer;
pub mod timestamp;
pub mod tx_msg;

mod serializers;

/// Re-export of ICS 002 Height domain type
pub type Height = crate::core::ics02_client::height::Height;

#[cfg(any(test, feature = "mocks"))]
pub mod test_utils;

#[cfg(any(test, feature = "mocks"))]
pub mod mock; // Context mock, the underlying host chain, and client types: for testing all handlers.
