//! Utilities for relaying datagrams between chains.

pub mod ics18_relayer;
