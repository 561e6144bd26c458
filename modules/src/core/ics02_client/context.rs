//! ICS2 (client) context. The two traits `ClientReader` and `ClientKeeper` define the interface
//! that any host chain must implement to be able to process any `ClientMsg`. See
//! "ADR 003: IBC protocol implementation" for more details.

use crate::clients::ics08_wasm::engine::WasmEngine;
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::handler::ClientResult::{
    self, Create, Migrate, Recover, RemoveChecksum, StoreCode, Update, Upgrade,
};
use crate::core::ics02_client::params::Params;
use crate::core::ics24_host::identifier::ClientId;
use crate::timestamp::Timestamp;
use crate::Height;

/// Defines the read-only part of ICS2 (client functions) context.
pub trait ClientReader {
    /// Returns the ClientType for the given identifier `client_id`.
    fn client_type(&self, client_id: &ClientId) -> Result<ClientType, Error>;

    /// Returns the ClientState for the given identifier `client_id`.
    fn client_state(&self, client_id: &ClientId) -> Result<AnyClientState, Error>;

    /// Retrieve the consensus state for the given client ID at the specified
    /// height.
    ///
    /// Returns an error if no such state exists.
    fn consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<AnyConsensusState, Error>;

    /// Heights of all the consensus states stored for `client_id`, ascending.
    fn consensus_state_heights(&self, client_id: &ClientId) -> Result<Vec<Height>, Error>;

    /// Search for the lowest consensus state higher than `height`.
    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Error> {
        let heights = self.consensus_state_heights(client_id)?;
        match heights.into_iter().find(|h| *h > height) {
            Some(next) => self.consensus_state(client_id, next).map(Some),
            None => Ok(None),
        }
    }

    /// Search for the highest consensus state lower than `height`.
    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<AnyConsensusState>, Error> {
        let heights = self.consensus_state_heights(client_id)?;
        match heights.into_iter().rev().find(|h| *h < height) {
            Some(prev) => self.consensus_state(client_id, prev).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the current height of the local chain.
    fn host_height(&self) -> Height;

    /// Returns the current timestamp of the local chain.
    fn host_timestamp(&self) -> Timestamp;

    /// Returns the `ConsensusState` of the host (local) chain at a specific height.
    fn host_consensus_state(&self, height: Height) -> Result<AnyConsensusState, Error>;

    /// Returns a natural number, counting how many clients have been created thus far.
    /// The value of this counter should increase only via method `ClientKeeper::increase_client_counter`.
    fn client_counter(&self) -> Result<u64, Error>;

    /// Returns the time when the client state for the given [`ClientId`] was updated with a header for the given [`Height`]
    fn client_update_time(&self, client_id: &ClientId, height: Height) -> Result<Timestamp, Error>;

    /// Returns the height when the client state for the given [`ClientId`] was updated with a header for the given [`Height`]
    fn client_update_height(&self, client_id: &ClientId, height: Height) -> Result<Height, Error>;

    /// Host parameters of the client module.
    fn client_params(&self) -> Params {
        Params::default()
    }

    /// The checksum allow-list and the verification modules of wasm clients.
    fn wasm_engine(&self) -> &WasmEngine;
}

/// Defines the write-only part of ICS2 (client functions) context.
pub trait ClientKeeper {
    fn store_client_result(&mut self, handler_res: ClientResult) -> Result<(), Error> {
        match handler_res {
            Create(res) => {
                let client_id = res.client_id.clone();

                self.store_client_type(client_id.clone(), res.client_type)?;
                self.store_client_state(client_id.clone(), res.client_state.clone())?;
                self.store_consensus_state(
                    client_id.clone(),
                    res.consensus_height,
                    res.consensus_state,
                )?;
                self.increase_client_counter();
                self.store_update_time(client_id.clone(), res.consensus_height, res.processed_time)?;
                self.store_update_height(client_id, res.consensus_height, res.processed_height)?;
                Ok(())
            }
            Update(res) => {
                self.store_client_state(res.client_id.clone(), res.client_state)?;
                for (height, consensus_state) in res.consensus_states {
                    self.store_consensus_state(res.client_id.clone(), height, consensus_state)?;
                    self.store_update_time(res.client_id.clone(), height, res.processed_time)?;
                    self.store_update_height(res.client_id.clone(), height, res.processed_height)?;
                }
                Ok(())
            }
            Upgrade(res) => {
                let height = res.client_state.latest_height();
                self.store_client_state(res.client_id.clone(), res.client_state)?;
                self.store_consensus_state(res.client_id.clone(), height, res.consensus_state)?;
                self.store_update_time(res.client_id.clone(), height, res.processed_time)?;
                self.store_update_height(res.client_id, height, res.processed_height)?;
                Ok(())
            }
            Recover(res) => {
                let height = res.client_state.latest_height();
                self.store_client_state(res.subject_client_id.clone(), res.client_state)?;
                self.store_consensus_state(
                    res.subject_client_id.clone(),
                    height,
                    res.consensus_state,
                )?;
                self.store_update_time(res.subject_client_id.clone(), height, res.processed_time)?;
                self.store_update_height(res.subject_client_id, height, res.processed_height)?;
                Ok(())
            }
            StoreCode(res) => self.store_wasm_code(res.checksum, res.code),
            RemoveChecksum(res) => self.remove_wasm_checksum(res.checksum),
            Migrate(res) => {
                self.store_client_state(res.client_id.clone(), res.client_state)?;
                for (height, consensus_state) in res.consensus_states {
                    self.store_consensus_state(res.client_id.clone(), height, consensus_state)?;
                }
                Ok(())
            }
        }
    }

    /// Called upon successful client creation
    fn store_client_type(
        &mut self,
        client_id: ClientId,
        client_type: ClientType,
    ) -> Result<(), Error>;

    /// Called upon successful client creation and update
    fn store_client_state(
        &mut self,
        client_id: ClientId,
        client_state: AnyClientState,
    ) -> Result<(), Error>;

    /// Called upon successful client creation and update
    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), Error>;

    /// Called upon client creation.
    /// Increases the counter which keeps track of how many clients have been created.
    /// Should never fail.
    fn increase_client_counter(&mut self);

    /// Called upon successful client update.
    /// Implementations are expected to use this to record the specified time as the time at which
    /// this update (or header) was processed.
    fn store_update_time(
        &mut self,
        client_id: ClientId,
        height: Height,
        timestamp: Timestamp,
    ) -> Result<(), Error>;

    /// Called upon successful client update.
    /// Implementations are expected to use this to record the specified height as the height at
    /// at which this update (or header) was processed.
    fn store_update_height(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_height: Height,
    ) -> Result<(), Error>;

    /// Adds a verification module checksum to the allow-list, keeping its code.
    fn store_wasm_code(&mut self, checksum: Vec<u8>, code: Vec<u8>) -> Result<(), Error>;

    /// Removes a checksum from the allow-list.
    fn remove_wasm_checksum(&mut self, checksum: Vec<u8>) -> Result<(), Error>;
}
