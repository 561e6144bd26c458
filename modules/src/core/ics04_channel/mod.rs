//! ICS 04: Channel implementation that facilitates communication between
//! applications and the chains those applications are built upon.

pub mod channel;
pub mod commitment;
/// Context definitions (dependencies for the protocol).
pub mod context;
pub mod error;
pub mod events;
/// Message processing logic (protocol) for ICS 04.
pub mod handler;
pub mod msgs;
pub mod packet;
pub mod timeout;
pub mod version;
