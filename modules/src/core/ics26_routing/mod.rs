//! ICS 26: Routing module specification exposes all the basic functionality of the IBC core:
//! decoding of incoming messages, dispatching them to the ICS2, ICS3 and ICS4 handlers and to
//! the application modules bound to ports, and committing the results.

pub mod context;
pub mod error;
pub mod handler;
pub mod msgs;
