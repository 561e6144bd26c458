//! Implementation of a global context mock. Used in testing handlers of all IBC modules.

use core::time::Duration;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::Protobuf;
use tracing::debug;

use crate::clients::ics08_wasm::engine::{checksum, Checksum, VerificationModule, WasmEngine};
use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::context::{ClientKeeper, ClientReader};
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics02_client::params::Params;
use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::{ConnectionKeeper, ConnectionReader};
use crate::core::ics03_connection::error::Error as Ics03Error;
use crate::core::ics04_channel::channel::ChannelEnd;
use crate::core::ics04_channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::core::ics04_channel::context::{ChannelKeeper, ChannelReader};
use crate::core::ics04_channel::error::Error as Ics04Error;
use crate::core::ics04_channel::packet::{Receipt, Sequence};
use crate::core::ics05_port::capabilities::{
    channel_capability_name, port_capability_name, Capability, CapabilityName,
};
use crate::core::ics05_port::context::{
    CapabilityKeeper, CapabilityReader, PortKeeper, PortReader,
};
use crate::core::ics05_port::error::Error as Ics05Error;
use crate::core::ics23_commitment::commitment::{CommitmentPrefix, CommitmentProofBytes};
use crate::core::ics23_commitment::tree::MerkleTree;
use crate::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use crate::core::ics24_host::path::Path;
use crate::core::ics26_routing::context::{Ics26Context, ModuleId, RouterBuilder};
use crate::core::ics26_routing::handler::{deliver, dispatch};
use crate::core::ics26_routing::msgs::Ics26Envelope;
use crate::events::IbcEvent;
use crate::mock::client_state::{MockClientState, MockConsensusState};
use crate::mock::header::{block_timestamp, MockHeader, BLOCK_TIME};
use crate::mock::host::{self, HostBlock};
use crate::mock::router::{MockRouter, MockRouterBuilder};
use crate::mock::wasm::{wasm_client_state, wasm_consensus_state};
use crate::relayer::ics18_relayer::context::Ics18Context;
use crate::relayer::ics18_relayer::error::Error as Ics18Error;
use crate::signer::Signer;
use crate::test_utils::{get_dummy_account_id, DummyTransferModule};
use crate::timestamp::Timestamp;
use crate::Height;

pub(crate) const COMMITMENT_PREFIX: &[u8] = b"ibc";

/// The module every mock chain binds to the transfer port.
pub fn transfer_module_id() -> ModuleId {
    ModuleId::new("transfer".to_string()).expect("`transfer` is alphanumeric")
}

/// A context implementing the dependencies necessary for testing any IBC module.
#[derive(Clone, Debug)]
pub struct MockContext {
    /// Host chain identifier.
    host_chain_id: ChainId,

    /// Maximum number of blocks the host remembers, the head of the chain included. Any block
    /// older than this is pruned.
    max_history_size: usize,

    /// Height of the head of the chain.
    latest_height: Height,

    /// Sealed blocks below the head, ascending by height.
    history: Vec<HostBlock>,

    /// The IBC store. Transactions write to it while the head is open.
    ibc_store: MockIbcStore,

    /// The store as committed to by the header of the head: its content when the previous
    /// block was sealed, plus whatever the context was set up with since.
    committed: MerkleTree,

    /// Applications bound to the ports of the host.
    router: MockRouter,
}

/// Everything the IBC handlers keep on a mock chain.
#[derive(Clone, Debug, Default)]
pub struct MockIbcStore {
    pub client_types: BTreeMap<ClientId, ClientType>,
    pub client_states: BTreeMap<ClientId, AnyClientState>,
    pub consensus_states: BTreeMap<ClientId, BTreeMap<Height, AnyConsensusState>>,
    pub update_times: BTreeMap<(ClientId, Height), Timestamp>,
    pub update_heights: BTreeMap<(ClientId, Height), Height>,
    pub client_ids_counter: u64,

    pub connections: BTreeMap<ConnectionId, ConnectionEnd>,
    pub client_connections: BTreeMap<ClientId, Vec<ConnectionId>>,
    pub connection_ids_counter: u64,

    pub channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    pub connection_channels: BTreeMap<ConnectionId, Vec<(PortId, ChannelId)>>,
    pub channel_ids_counter: u64,

    pub next_sequence_send: BTreeMap<(PortId, ChannelId), Sequence>,
    pub next_sequence_recv: BTreeMap<(PortId, ChannelId), Sequence>,
    pub next_sequence_ack: BTreeMap<(PortId, ChannelId), Sequence>,
    pub packet_commitments: BTreeMap<(PortId, ChannelId, Sequence), PacketCommitment>,
    pub packet_receipts: BTreeMap<(PortId, ChannelId, Sequence), Receipt>,
    pub packet_acknowledgements: BTreeMap<(PortId, ChannelId, Sequence), AcknowledgementCommitment>,

    pub capabilities: BTreeMap<CapabilityName, Capability>,
    pub next_capability_index: u64,
    pub port_modules: BTreeMap<PortId, ModuleId>,

    pub params: Params,
    pub wasm_engine: WasmEngine,

    /// Provable content of the store, keyed by prefixed path.
    pub tree: MerkleTree,
}

impl MockIbcStore {
    fn commit(&mut self, path: Path, value: Vec<u8>) {
        self.tree.set(store_key(&path), value);
    }

    fn uncommit(&mut self, path: Path) {
        self.tree.delete(&store_key(&path));
    }

    fn mint_capability(&mut self, name: CapabilityName) -> Result<Capability, Ics05Error> {
        if self.capabilities.contains_key(&name) {
            return Err(Ics05Error::capability_already_taken(name));
        }
        let capability = Capability::new(self.next_capability_index);
        self.next_capability_index += 1;
        self.capabilities.insert(name, capability);
        Ok(capability)
    }

    fn put_client_state(&mut self, client_id: ClientId, client_state: AnyClientState) {
        self.commit(
            Path::ClientState(client_id.clone()),
            Protobuf::<Any>::encode_vec(&client_state),
        );
        self.client_types
            .insert(client_id.clone(), client_state.client_type());
        self.client_states.insert(client_id, client_state);
    }

    fn put_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) {
        self.commit(
            Path::ClientConsensusState {
                client_id: client_id.clone(),
                height,
            },
            Protobuf::<Any>::encode_vec(&consensus_state),
        );
        self.consensus_states
            .entry(client_id)
            .or_default()
            .insert(height, consensus_state);
    }

    fn put_connection(&mut self, connection_id: ConnectionId, connection_end: &ConnectionEnd) {
        self.commit(
            Path::Connections(connection_id.clone()),
            connection_end.encode_vec(),
        );
        self.connections.insert(connection_id, connection_end.clone());
    }

    fn link_connection(&mut self, connection_id: ConnectionId, client_id: ClientId) {
        let connections = self.client_connections.entry(client_id).or_default();
        if !connections.contains(&connection_id) {
            connections.push(connection_id);
        }
    }

    fn put_channel(&mut self, port_id: PortId, channel_id: ChannelId, channel_end: &ChannelEnd) {
        self.commit(
            Path::ChannelEnds(port_id.clone(), channel_id),
            channel_end.encode_vec(),
        );
        self.channels
            .insert((port_id, channel_id), channel_end.clone());
    }

    fn link_channel(&mut self, connection_id: ConnectionId, port_id: PortId, channel_id: ChannelId) {
        let channels = self.connection_channels.entry(connection_id).or_default();
        if !channels.contains(&(port_id.clone(), channel_id)) {
            channels.push((port_id, channel_id));
        }
    }

    fn put_sequence(&mut self, path: Path, seq: Sequence) {
        self.commit(path, u64::from(seq).to_be_bytes().to_vec());
    }
}

fn store_key(path: &Path) -> Vec<u8> {
    path.to_string().into_bytes()
}

fn commitment_prefix() -> CommitmentPrefix {
    CommitmentPrefix::try_from(COMMITMENT_PREFIX.to_vec()).unwrap_or_default()
}

/// Returns a MockContext with bare minimum initialization: no clients, no connections and no channels are
/// present, and the chain has Height(5). This should be used sparingly, mostly for testing the
/// creation of new domain objects.
impl Default for MockContext {
    fn default() -> Self {
        Self::new(
            ChainId::new("mockgaia".to_string(), 0),
            5,
            Height::new(0, 5),
        )
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to any ICS handler.
impl MockContext {
    /// Creates a mock context. Parameter `max_history_size` determines how many blocks will
    /// the chain maintain in its history, which also determines the pruning window. Parameter
    /// `latest_height` determines the current height of the chain. The transfer port has a
    /// route to a `DummyTransferModule`, but is not bound.
    pub fn new(host_id: ChainId, max_history_size: usize, latest_height: Height) -> Self {
        assert_ne!(
            max_history_size, 0,
            "The chain must have a non-zero max_history_size"
        );
        assert_eq!(
            host_id.version(),
            latest_height.revision_number,
            "The version in the chain identifier must match the version in the latest height"
        );

        let latest = latest_height.revision_height;
        let oldest = latest
            .saturating_sub(max_history_size as u64 - 1)
            .max(1);
        let empty = MerkleTree::new();
        let history = (oldest..latest)
            .map(|h| HostBlock::seal(Height::new(latest_height.revision_number, h), &empty))
            .collect();

        let router = MockRouterBuilder::default()
            .add_route(transfer_module_id(), DummyTransferModule)
            .map(MockRouterBuilder::build)
            .unwrap_or_default();

        MockContext {
            host_chain_id: host_id,
            max_history_size,
            latest_height,
            history,
            ibc_store: MockIbcStore::default(),
            committed: empty,
            router,
        }
    }

    pub fn host_chain_id(&self) -> &ChainId {
        &self.host_chain_id
    }

    pub fn ibc_store(&self) -> &MockIbcStore {
        &self.ibc_store
    }

    /// The header of the head of the chain.
    pub fn latest_header(&self) -> MockHeader {
        MockHeader::new(self.latest_height).with_root(host::app_hash(&self.committed).into())
    }

    /// Makes the setup applied so far part of the state committed to by the head.
    fn settled(mut self) -> Self {
        self.committed = self.ibc_store.tree.clone();
        self
    }

    /// Associates a mock client in the context, with a consensus state at `client_height` and
    /// an empty root.
    pub fn with_client(mut self, client_id: &ClientId, client_height: Height) -> Self {
        let header = MockHeader::new(client_height);
        self.ibc_store.put_client_state(
            client_id.clone(),
            MockClientState::new(header.clone()).into(),
        );
        self.record_consensus_state(client_id, client_height, header.into());
        self.settled()
    }

    /// Replaces the client state of `client_id`; consensus states are left alone.
    pub fn with_client_state(mut self, client_id: &ClientId, client_state: AnyClientState) -> Self {
        self.ibc_store
            .put_client_state(client_id.clone(), client_state);
        self.settled()
    }

    pub fn with_consensus_state(
        mut self,
        client_id: &ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Self {
        self.record_consensus_state(client_id, height, consensus_state);
        self.settled()
    }

    pub fn with_client_params(mut self, params: Params) -> Self {
        self.ibc_store.params = params;
        self.settled()
    }

    /// Installs, or refreshes, a mock client of `counterparty` under `client_id`: the client
    /// follows the head of the counterparty, and has a consensus state for every block the
    /// counterparty remembers.
    pub fn with_counterparty_client(mut self, client_id: &ClientId, counterparty: &MockContext) -> Self {
        let header = counterparty.latest_header();
        let previous = self.ibc_store.client_states.get(client_id).cloned();
        let client_state = match previous {
            Some(AnyClientState::Mock(previous)) => MockClientState {
                header: header.clone(),
                ..previous
            },
            _ => MockClientState::new(header.clone()),
        };
        self.ibc_store
            .put_client_state(client_id.clone(), client_state.into());

        for block in &counterparty.history {
            self.record_consensus_state(client_id, block.height(), block.consensus_state());
        }
        self.record_consensus_state(client_id, header.height(), header.into());
        self.settled()
    }

    pub fn with_connection(mut self, connection_id: ConnectionId, connection_end: ConnectionEnd) -> Self {
        self.ibc_store.put_connection(connection_id.clone(), &connection_end);
        self.ibc_store
            .link_connection(connection_id, connection_end.client_id().clone());
        self.settled()
    }

    /// Binds `port_id` to the transfer module.
    pub fn with_port_capability(mut self, port_id: PortId) -> Self {
        let name = port_capability_name(port_id.clone());
        if !self.ibc_store.capabilities.contains_key(&name) {
            let _ = self.ibc_store.mint_capability(name);
        }
        self.ibc_store
            .port_modules
            .insert(port_id, transfer_module_id());
        self.settled()
    }

    /// Stores `channel_end` under the given identifiers, minting the channel capability if the
    /// channel is new.
    pub fn with_channel(mut self, port_id: PortId, channel_id: ChannelId, channel_end: ChannelEnd) -> Self {
        if let Some(connection_id) = channel_end.connection_hops().first() {
            self.ibc_store
                .link_channel(connection_id.clone(), port_id.clone(), channel_id);
        }
        let name = channel_capability_name(port_id.clone(), channel_id);
        if !self.ibc_store.capabilities.contains_key(&name) {
            let _ = self.ibc_store.mint_capability(name);
        }
        self.ibc_store.put_channel(port_id, channel_id, &channel_end);
        self.settled()
    }

    pub fn with_send_sequence(mut self, port_id: PortId, channel_id: ChannelId, seq: Sequence) -> Self {
        self.ibc_store
            .put_sequence(Path::SeqSends(port_id.clone(), channel_id), seq);
        self.ibc_store
            .next_sequence_send
            .insert((port_id, channel_id), seq);
        self.settled()
    }

    pub fn with_recv_sequence(mut self, port_id: PortId, channel_id: ChannelId, seq: Sequence) -> Self {
        self.ibc_store
            .put_sequence(Path::SeqRecvs(port_id.clone(), channel_id), seq);
        self.ibc_store
            .next_sequence_recv
            .insert((port_id, channel_id), seq);
        self.settled()
    }

    pub fn with_ack_sequence(mut self, port_id: PortId, channel_id: ChannelId, seq: Sequence) -> Self {
        self.ibc_store
            .put_sequence(Path::SeqAcks(port_id.clone(), channel_id), seq);
        self.ibc_store
            .next_sequence_ack
            .insert((port_id, channel_id), seq);
        self.settled()
    }

    pub fn with_packet_commitment(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
        data: PacketCommitment,
    ) -> Self {
        let _ = self.store_packet_commitment((port_id, channel_id, seq), data);
        self.settled()
    }

    pub fn without_packet_commitment(mut self, port_id: PortId, channel_id: ChannelId, seq: Sequence) -> Self {
        let _ = self.delete_packet_commitment((port_id, channel_id, seq));
        self.settled()
    }

    pub fn with_packet_receipt(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
        receipt: Receipt,
    ) -> Self {
        let _ = self.store_packet_receipt((port_id, channel_id, seq), receipt);
        self.settled()
    }

    pub fn with_packet_acknowledgement(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        seq: Sequence,
        ack_commitment: AcknowledgementCommitment,
    ) -> Self {
        let _ = self.store_packet_acknowledgement((port_id, channel_id, seq), ack_commitment);
        self.settled()
    }

    /// Allows the checksum of `code` and links `module` to it.
    pub fn with_wasm_module(mut self, code: Vec<u8>, module: Arc<dyn VerificationModule>) -> Self {
        let checksum = checksum(&code);
        let engine = &mut self.ibc_store.wasm_engine;
        if !engine.contains(&checksum) {
            engine
                .add_checksum(checksum.clone(), code)
                .expect("checksum of the code is well-formed");
        }
        engine.link_module(checksum, module);
        self.settled()
    }

    /// Associates a wasm client running `checksum`, wrapping a mock client at `client_height`.
    pub fn with_wasm_client(mut self, client_id: &ClientId, client_height: Height, checksum: Checksum) -> Self {
        let header = MockHeader::new(client_height);
        let client_state = wasm_client_state(&MockClientState::new(header.clone()), checksum);
        let consensus_state = wasm_consensus_state(&MockConsensusState::new(header));
        self.ibc_store
            .put_client_state(client_id.clone(), client_state.into());
        self.record_consensus_state(client_id, client_height, consensus_state.into());
        self.settled()
    }

    fn record_consensus_state(
        &mut self,
        client_id: &ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) {
        self.ibc_store
            .put_consensus_state(client_id.clone(), height, consensus_state);
        self.ibc_store
            .update_times
            .insert((client_id.clone(), height), self.host_timestamp());
        self.ibc_store
            .update_heights
            .insert((client_id.clone(), height), self.latest_height);
    }

    pub fn host_block(&self, target_height: Height) -> Option<&HostBlock> {
        self.history
            .iter()
            .find(|block| block.height() == target_height)
    }

    /// Proof of the value under `path`, or of its absence, against the root of the block at
    /// `height`. Blocks that were pruned, or not produced yet, cannot prove anything.
    pub fn commitment_proof(&self, path: &Path, height: Height) -> Option<CommitmentProofBytes> {
        let key = store_key(path);
        if height == self.latest_height {
            Some(host::prove(&self.committed, &key))
        } else {
            self.host_block(height).map(|block| block.prove(&key))
        }
    }

    /// Triggers the advancing of the host chain: the head block is sealed, and the new head
    /// commits to everything written up to now.
    pub fn advance_host_chain_height(&mut self) {
        self.history
            .push(HostBlock::seal(self.latest_height, &self.committed));
        self.committed = self.ibc_store.tree.clone();
        self.latest_height = self.latest_height.increment();

        let keep = self.max_history_size - 1;
        if self.history.len() > keep {
            let pruned = self.history.len() - keep;
            self.history.drain(..pruned);
        }
    }

    /// A datagram passes from the relayer to the IBC module (on host chain).
    /// Alternative method to `Ics18Context::send` that does not exercise any serialization.
    /// Used in testing the Ics18 algorithms, hence this may return a Ics18Error.
    ///
    /// A failed message leaves the IBC store as it was. Only the IBC store is restored: the
    /// applications on the mock router hold no state of their own.
    pub fn deliver(&mut self, msg: Ics26Envelope) -> Result<(), Ics18Error> {
        let snapshot = self.ibc_store.clone();
        match dispatch(self, msg) {
            Ok(_) => {
                // Create a new block.
                self.advance_host_chain_height();
                Ok(())
            }
            Err(e) => {
                self.ibc_store = snapshot;
                Err(Ics18Error::transaction_failed(e))
            }
        }
    }

    /// Validates this context. Should be called after the context is mutated by a test.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        // Check that the number of entries is not higher than window size.
        if self.history.len() >= self.max_history_size {
            return Err("too many entries".to_string().into());
        }

        // Check the content of the history.
        if let Some(lh) = self.history.last() {
            // The head of the chain sits right on top of the latest sealed block.
            if lh.height().increment() != self.latest_height {
                return Err("latest height is not updated".to_string().into());
            }
        }

        // Check that headers in the history are in sequential order.
        for pair in self.history.windows(2) {
            if pair[0].height().increment() != pair[1].height() {
                return Err("headers in history not sequential".to_string().into());
            }
        }
        Ok(())
    }
}

impl Ics26Context for MockContext {
    type Router = MockRouter;

    fn router(&self) -> &Self::Router {
        &self.router
    }

    fn router_mut(&mut self) -> &mut Self::Router {
        &mut self.router
    }
}

impl CapabilityReader for MockContext {
    fn get_capability(&self, name: &CapabilityName) -> Result<Capability, Ics05Error> {
        self.ibc_store
            .capabilities
            .get(name)
            .copied()
            .ok_or_else(|| Ics05Error::capability_not_found(name.clone()))
    }
}

impl CapabilityKeeper for MockContext {
    fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, Ics05Error> {
        self.ibc_store.mint_capability(name)
    }

    fn claim_capability(&mut self, name: CapabilityName, capability: Capability) -> Result<(), Ics05Error> {
        match self.ibc_store.capabilities.get(&name) {
            Some(_) => Err(Ics05Error::capability_already_taken(name)),
            None => {
                self.ibc_store.capabilities.insert(name, capability);
                Ok(())
            }
        }
    }

    fn release_capability(&mut self, name: CapabilityName, capability: Capability) -> Result<(), Ics05Error> {
        match self.ibc_store.capabilities.get(&name) {
            Some(stored) if *stored == capability => {
                self.ibc_store.capabilities.remove(&name);
                Ok(())
            }
            Some(_) => Err(Ics05Error::invalid_capability(name)),
            None => Err(Ics05Error::capability_not_found(name)),
        }
    }
}

impl PortReader for MockContext {
    fn lookup_module_by_port(&self, port_id: &PortId) -> Result<ModuleId, Ics05Error> {
        self.ibc_store
            .port_modules
            .get(port_id)
            .cloned()
            .ok_or_else(|| Ics05Error::module_not_found(port_id.clone()))
    }
}

impl PortKeeper for MockContext {
    fn store_port_module(&mut self, port_id: PortId, module_id: ModuleId) -> Result<(), Ics05Error> {
        self.ibc_store.port_modules.insert(port_id, module_id);
        Ok(())
    }
}

impl ChannelReader for MockContext {
    fn channel_end(&self, pcid: &(PortId, ChannelId)) -> Result<ChannelEnd, Ics04Error> {
        self.ibc_store
            .channels
            .get(pcid)
            .cloned()
            .ok_or_else(|| Ics04Error::channel_not_found(pcid.0.clone(), pcid.1))
    }

    fn connection_channels(&self, cid: &ConnectionId) -> Result<Vec<(PortId, ChannelId)>, Ics04Error> {
        Ok(self
            .ibc_store
            .connection_channels
            .get(cid)
            .cloned()
            .unwrap_or_default())
    }

    fn get_next_sequence_send(&self, port_channel_id: &(PortId, ChannelId)) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_send
            .get(port_channel_id)
            .copied()
            .ok_or_else(|| {
                Ics04Error::missing_next_send_seq(port_channel_id.0.clone(), port_channel_id.1)
            })
    }

    fn get_next_sequence_recv(&self, port_channel_id: &(PortId, ChannelId)) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_recv
            .get(port_channel_id)
            .copied()
            .ok_or_else(|| {
                Ics04Error::missing_next_recv_seq(port_channel_id.0.clone(), port_channel_id.1)
            })
    }

    fn get_next_sequence_ack(&self, port_channel_id: &(PortId, ChannelId)) -> Result<Sequence, Ics04Error> {
        self.ibc_store
            .next_sequence_ack
            .get(port_channel_id)
            .copied()
            .ok_or_else(|| {
                Ics04Error::missing_next_ack_seq(port_channel_id.0.clone(), port_channel_id.1)
            })
    }

    fn get_packet_commitment(&self, key: &(PortId, ChannelId, Sequence)) -> Result<PacketCommitment, Ics04Error> {
        self.ibc_store
            .packet_commitments
            .get(key)
            .cloned()
            .ok_or_else(|| Ics04Error::packet_commitment_not_found(key.2))
    }

    fn get_packet_receipt(&self, key: &(PortId, ChannelId, Sequence)) -> Result<Receipt, Ics04Error> {
        self.ibc_store
            .packet_receipts
            .get(key)
            .cloned()
            .ok_or_else(|| Ics04Error::packet_receipt_not_found(key.2))
    }

    fn get_packet_acknowledgement(
        &self,
        key: &(PortId, ChannelId, Sequence),
    ) -> Result<AcknowledgementCommitment, Ics04Error> {
        self.ibc_store
            .packet_acknowledgements
            .get(key)
            .cloned()
            .ok_or_else(|| Ics04Error::packet_acknowledgement_not_found(key.2))
    }

    fn channel_counter(&self) -> Result<u64, Ics04Error> {
        Ok(self.ibc_store.channel_ids_counter)
    }
}

impl ChannelKeeper for MockContext {
    fn store_packet_commitment(
        &mut self,
        key: (PortId, ChannelId, Sequence),
        commitment: PacketCommitment,
    ) -> Result<(), Ics04Error> {
        self.ibc_store.commit(
            Path::Commitments {
                port_id: key.0.clone(),
                channel_id: key.1,
                sequence: key.2,
            },
            commitment.clone().into_vec(),
        );
        self.ibc_store.packet_commitments.insert(key, commitment);
        Ok(())
    }

    fn delete_packet_commitment(&mut self, key: (PortId, ChannelId, Sequence)) -> Result<(), Ics04Error> {
        self.ibc_store.uncommit(Path::Commitments {
            port_id: key.0.clone(),
            channel_id: key.1,
            sequence: key.2,
        });
        self.ibc_store.packet_commitments.remove(&key);
        Ok(())
    }

    fn store_packet_receipt(&mut self, key: (PortId, ChannelId, Sequence), receipt: Receipt) -> Result<(), Ics04Error> {
        if self.ibc_store.packet_receipts.contains_key(&key) {
            return Err(Ics04Error::packet_already_received(key.2));
        }
        self.ibc_store.commit(
            Path::Receipts {
                port_id: key.0.clone(),
                channel_id: key.1,
                sequence: key.2,
            },
            receipt.as_bytes().to_vec(),
        );
        self.ibc_store.packet_receipts.insert(key, receipt);
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        key: (PortId, ChannelId, Sequence),
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), Ics04Error> {
        if self.ibc_store.packet_acknowledgements.contains_key(&key) {
            return Err(Ics04Error::acknowledgement_exists(key.2));
        }
        self.ibc_store.commit(
            Path::Acks {
                port_id: key.0.clone(),
                channel_id: key.1,
                sequence: key.2,
            },
            ack_commitment.clone().into_vec(),
        );
        self.ibc_store.packet_acknowledgements.insert(key, ack_commitment);
        Ok(())
    }

    fn store_connection_channels(
        &mut self,
        cid: ConnectionId,
        port_channel_id: &(PortId, ChannelId),
    ) -> Result<(), Ics04Error> {
        self.ibc_store
            .link_channel(cid, port_channel_id.0.clone(), port_channel_id.1);
        Ok(())
    }

    fn store_channel(&mut self, port_channel_id: (PortId, ChannelId), channel_end: &ChannelEnd) -> Result<(), Ics04Error> {
        self.ibc_store
            .put_channel(port_channel_id.0, port_channel_id.1, channel_end);
        Ok(())
    }

    fn store_next_sequence_send(&mut self, port_channel_id: (PortId, ChannelId), seq: Sequence) -> Result<(), Ics04Error> {
        self.ibc_store.put_sequence(
            Path::SeqSends(port_channel_id.0.clone(), port_channel_id.1),
            seq,
        );
        self.ibc_store.next_sequence_send.insert(port_channel_id, seq);
        Ok(())
    }

    fn store_next_sequence_recv(&mut self, port_channel_id: (PortId, ChannelId), seq: Sequence) -> Result<(), Ics04Error> {
        self.ibc_store.put_sequence(
            Path::SeqRecvs(port_channel_id.0.clone(), port_channel_id.1),
            seq,
        );
        self.ibc_store.next_sequence_recv.insert(port_channel_id, seq);
        Ok(())
    }

    fn store_next_sequence_ack(&mut self, port_channel_id: (PortId, ChannelId), seq: Sequence) -> Result<(), Ics04Error> {
        self.ibc_store.put_sequence(
            Path::SeqAcks(port_channel_id.0.clone(), port_channel_id.1),
            seq,
        );
        self.ibc_store.next_sequence_ack.insert(port_channel_id, seq);
        Ok(())
    }

    fn increase_channel_counter(&mut self) {
        self.ibc_store.channel_ids_counter += 1;
    }
}

impl ConnectionReader for MockContext {
    fn connection_end(&self, cid: &ConnectionId) -> Result<ConnectionEnd, Ics03Error> {
        self.ibc_store
            .connections
            .get(cid)
            .cloned()
            .ok_or_else(|| Ics03Error::connection_not_found(cid.clone()))
    }

    fn host_oldest_height(&self) -> Height {
        self.history
            .first()
            .map(HostBlock::height)
            .unwrap_or(self.latest_height)
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        commitment_prefix()
    }

    fn connection_counter(&self) -> Result<u64, Ics03Error> {
        Ok(self.ibc_store.connection_ids_counter)
    }

    fn validate_self_client(&self, client_state: &AnyClientState) -> Result<(), Ics02Error> {
        let client_state = match client_state {
            AnyClientState::Mock(client_state) => client_state,
            other => {
                return Err(Ics02Error::invalid_client_state(format!(
                    "a mock chain is tracked by mock clients, not {}",
                    other.client_type()
                )))
            }
        };

        if client_state.is_frozen() {
            return Err(Ics02Error::invalid_client_state(
                "client of the host is frozen".to_string(),
            ));
        }

        let latest_height = client_state.latest_height();
        if latest_height.revision_number != self.host_chain_id.version() {
            return Err(Ics02Error::invalid_client_state(format!(
                "client revision {} does not match the host revision {}",
                latest_height.revision_number,
                self.host_chain_id.version()
            )));
        }

        if latest_height > self.host_height() {
            return Err(Ics02Error::invalid_client_state(format!(
                "client height {} is beyond the host height {}",
                latest_height,
                self.host_height()
            )));
        }

        Ok(())
    }

    fn max_expected_time_per_block(&self) -> Duration {
        BLOCK_TIME
    }
}

impl ConnectionKeeper for MockContext {
    fn store_connection(&mut self, connection_id: ConnectionId, connection_end: &ConnectionEnd) -> Result<(), Ics03Error> {
        self.ibc_store.put_connection(connection_id, connection_end);
        Ok(())
    }

    fn store_connection_to_client(&mut self, connection_id: ConnectionId, client_id: &ClientId) -> Result<(), Ics03Error> {
        self.ibc_store
            .link_connection(connection_id, client_id.clone());
        Ok(())
    }

    fn increase_connection_counter(&mut self) {
        self.ibc_store.connection_ids_counter += 1;
    }
}

impl ClientReader for MockContext {
    fn client_type(&self, client_id: &ClientId) -> Result<ClientType, Ics02Error> {
        self.ibc_store
            .client_types
            .get(client_id)
            .copied()
            .ok_or_else(|| Ics02Error::client_not_found(client_id.clone()))
    }

    fn client_state(&self, client_id: &ClientId) -> Result<AnyClientState, Ics02Error> {
        self.ibc_store
            .client_states
            .get(client_id)
            .cloned()
            .ok_or_else(|| Ics02Error::client_not_found(client_id.clone()))
    }

    fn consensus_state(&self, client_id: &ClientId, height: Height) -> Result<AnyConsensusState, Ics02Error> {
        self.ibc_store
            .consensus_states
            .get(client_id)
            .and_then(|states| states.get(&height))
            .cloned()
            .ok_or_else(|| Ics02Error::consensus_state_not_found(client_id.clone(), height))
    }

    fn consensus_state_heights(&self, client_id: &ClientId) -> Result<Vec<Height>, Ics02Error> {
        if !self.ibc_store.client_states.contains_key(client_id) {
            return Err(Ics02Error::client_not_found(client_id.clone()));
        }
        Ok(self
            .ibc_store
            .consensus_states
            .get(client_id)
            .map(|states| states.keys().copied().collect())
            .unwrap_or_default())
    }

    fn host_height(&self) -> Height {
        self.latest_height
    }

    fn host_timestamp(&self) -> Timestamp {
        block_timestamp(self.latest_height)
    }

    fn host_consensus_state(&self, height: Height) -> Result<AnyConsensusState, Ics02Error> {
        if height == self.latest_height {
            return Ok(self.latest_header().into());
        }
        self.host_block(height)
            .map(HostBlock::consensus_state)
            .ok_or_else(|| Ics02Error::missing_local_consensus_state(height))
    }

    fn client_counter(&self) -> Result<u64, Ics02Error> {
        Ok(self.ibc_store.client_ids_counter)
    }

    fn client_update_time(&self, client_id: &ClientId, height: Height) -> Result<Timestamp, Ics02Error> {
        self.ibc_store
            .update_times
            .get(&(client_id.clone(), height))
            .copied()
            .ok_or_else(|| Ics02Error::processed_time_not_found(client_id.clone(), height))
    }

    fn client_update_height(&self, client_id: &ClientId, height: Height) -> Result<Height, Ics02Error> {
        self.ibc_store
            .update_heights
            .get(&(client_id.clone(), height))
            .copied()
            .ok_or_else(|| Ics02Error::processed_height_not_found(client_id.clone(), height))
    }

    fn client_params(&self) -> Params {
        self.ibc_store.params.clone()
    }

    fn wasm_engine(&self) -> &WasmEngine {
        &self.ibc_store.wasm_engine
    }
}

impl ClientKeeper for MockContext {
    fn store_client_type(&mut self, client_id: ClientId, client_type: ClientType) -> Result<(), Ics02Error> {
        self.ibc_store.client_types.insert(client_id, client_type);
        Ok(())
    }

    fn store_client_state(&mut self, client_id: ClientId, client_state: AnyClientState) -> Result<(), Ics02Error> {
        self.ibc_store.put_client_state(client_id, client_state);
        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        client_id: ClientId,
        height: Height,
        consensus_state: AnyConsensusState,
    ) -> Result<(), Ics02Error> {
        self.ibc_store
            .put_consensus_state(client_id, height, consensus_state);
        Ok(())
    }

    fn increase_client_counter(&mut self) {
        self.ibc_store.client_ids_counter += 1;
    }

    fn store_update_time(&mut self, client_id: ClientId, height: Height, timestamp: Timestamp) -> Result<(), Ics02Error> {
        self.ibc_store
            .update_times
            .insert((client_id, height), timestamp);
        Ok(())
    }

    fn store_update_height(&mut self, client_id: ClientId, height: Height, host_height: Height) -> Result<(), Ics02Error> {
        self.ibc_store
            .update_heights
            .insert((client_id, height), host_height);
        Ok(())
    }

    fn store_wasm_code(&mut self, checksum: Vec<u8>, code: Vec<u8>) -> Result<(), Ics02Error> {
        self.ibc_store
            .wasm_engine
            .add_checksum(checksum, code)
            .map_err(Ics02Error::wasm)
    }

    fn remove_wasm_checksum(&mut self, checksum: Vec<u8>) -> Result<(), Ics02Error> {
        self.ibc_store
            .wasm_engine
            .remove_checksum(&checksum)
            .map_err(Ics02Error::wasm)
    }
}

impl Ics18Context for MockContext {
    fn query_latest_height(&self) -> Height {
        self.host_height()
    }

    fn query_client_full_state(&self, client_id: &ClientId) -> Option<AnyClientState> {
        // Forward call to Ics2.
        ClientReader::client_state(self, client_id).ok()
    }

    fn query_latest_header(&self) -> Option<AnyClientMessage> {
        Some(self.latest_header().into())
    }

    fn query_proof(&self, path: &Path, height: Height) -> Option<CommitmentProofBytes> {
        self.commitment_proof(path, height)
    }

    fn send(&mut self, msgs: Vec<Any>) -> Result<Vec<IbcEvent>, Ics18Error> {
        // Forward call to Ics26 delivery method.
        let snapshot = self.ibc_store.clone();
        match deliver(self, msgs) {
            Ok((events, logs)) => {
                debug!(height = %self.latest_height, logs = ?logs, "delivered transaction");
                self.advance_host_chain_height(); // Advance chain height
                Ok(events)
            }
            Err(e) => {
                self.ibc_store = snapshot;
                Err(Ics18Error::transaction_failed(e))
            }
        }
    }

    fn signer(&self) -> Signer {
        get_dummy_account_id()
    }
}
