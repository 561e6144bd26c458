//! ICS 07: Tendermint Client implements a client verification algorithm for
//! blockchains which use the Tendermint consensus algorithm.

pub mod client_def;
pub mod client_state;
pub mod consensus_state;
pub mod error;
pub mod header;
pub mod misbehaviour;
