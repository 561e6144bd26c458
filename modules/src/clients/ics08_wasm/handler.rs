//! Protocol logic of the governance messages managing verification modules.

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_state::AnyClientState;
use crate::core::ics24_host::identifier::ClientId;
use crate::Height;

pub mod migrate_contract;
pub mod remove_checksum;
pub mod store_code;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreCodeResult {
    pub checksum: Vec<u8>,
    pub code: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveChecksumResult {
    pub checksum: Vec<u8>,
}

/// The client state now pointing at the new checksum, together with every
/// consensus state the migration rewrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MigrateContractResult {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_states: Vec<(Height, AnyConsensusState)>,
}
