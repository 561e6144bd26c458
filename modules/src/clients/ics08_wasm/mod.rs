//! ICS 08: Wasm Client delegates every light client capability to an
//! externally supplied verification module, addressed by the sha256
//! checksum of its code.

pub mod client_def;
pub mod client_message;
pub mod client_state;
pub mod consensus_state;
pub mod contract;
pub mod engine;
pub mod error;
pub mod handler;
pub mod msgs;
