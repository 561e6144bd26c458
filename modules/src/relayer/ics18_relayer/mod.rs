//! ICS 18: Relayer contains the queries and submission interface a relayer needs from a chain,
//! and utilities to build client updates between two chains.

pub mod context;
pub mod error;
pub mod utils;
