//! Light client implementations.

pub mod ics07_tendermint;
pub mod ics08_wasm;
