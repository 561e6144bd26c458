//! Host side of the wasm client: the checksum allow-list, the verification
//! modules linked to it, and the client-scoped stores they operate on.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use subtle_encoding::hex;
use tracing::trace;

use crate::clients::ics08_wasm::contract::{InstantiateMsg, QueryMsg, SudoMsg};
use crate::clients::ics08_wasm::error::Error;
use crate::timestamp::Timestamp;
use crate::Height;

pub type Checksum = Vec<u8>;

pub const CHECKSUM_LENGTH: usize = 32;

/// Key of the client state in a client store.
pub const CLIENT_STATE_KEY: &str = "clientState";

/// Key prefix of the consensus states in a client store.
pub const CONSENSUS_STATES_KEY: &str = "consensusStates";

/// Prefixes separating the two clients in the store handed over for recovery.
pub const SUBJECT_PREFIX: &str = "subject/";
pub const SUBSTITUTE_PREFIX: &str = "substitute/";

/// The checksum addressing a verification module's code.
pub fn checksum(code: &[u8]) -> Checksum {
    Sha256::digest(code).to_vec()
}

pub fn display_checksum(checksum: &[u8]) -> String {
    String::from_utf8(hex::encode(checksum)).unwrap_or_default()
}

pub fn consensus_state_key(height: Height) -> Vec<u8> {
    format!("{CONSENSUS_STATES_KEY}/{height}").into_bytes()
}

/// Entries of a client that the host keeps outside its client store.
pub trait StoreSource {
    fn load(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Every key `load` answers, in any order.
    fn keys(&self) -> Vec<Vec<u8>>;
}

impl<T: StoreSource + ?Sized> StoreSource for &T {
    fn load(&self, key: &[u8]) -> Option<Vec<u8>> {
        (**self).load(key)
    }

    fn keys(&self) -> Vec<Vec<u8>> {
        (**self).keys()
    }
}

/// The key/value entries of one client, as seen by its verification module.
///
/// Entries the store does not hold are read from its source when asked for. Writes stay in the
/// store and never reach the source.
#[derive(Clone, Default)]
pub struct ClientStore<'a> {
    source: Option<Rc<dyn StoreSource + 'a>>,
    /// `None` hides the source's entry.
    entries: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a> ClientStore<'a> {
    pub fn with_source(source: impl StoreSource + 'a) -> Self {
        Self {
            source: Some(Rc::new(source)),
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.entries.get(key) {
            Some(entry) => entry.clone(),
            None => self.source.as_ref().and_then(|source| source.load(key)),
        }
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.entries.insert(key, Some(value));
    }

    pub fn remove(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        let previous = self.get(key);
        self.entries.insert(key.to_vec(), None);
        previous
    }

    /// Every entry in key order. Reads the whole source.
    pub fn entries(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        let mut all: BTreeMap<Vec<u8>, Vec<u8>> = self
            .source
            .iter()
            .flat_map(|source| {
                source
                    .keys()
                    .into_iter()
                    .filter_map(move |key| source.load(&key).map(|value| (key, value)))
            })
            .collect();
        for (key, entry) in &self.entries {
            match entry {
                Some(value) => {
                    all.insert(key.clone(), value.clone());
                }
                None => {
                    all.remove(key);
                }
            }
        }
        all
    }

    /// Entries under `prefix`, with the prefix stripped.
    pub fn prefixed(&self, prefix: &str) -> ClientStore<'static> {
        let prefix = prefix.as_bytes();
        ClientStore {
            source: None,
            entries: self
                .entries()
                .into_iter()
                .filter_map(|(k, v)| k.strip_prefix(prefix).map(|stripped| (stripped.to_vec(), Some(v))))
                .collect(),
        }
    }

    /// Copies every entry of `other` under `prefix`.
    pub fn insert_prefixed(&mut self, prefix: &str, other: &ClientStore<'_>) {
        for (k, v) in other.entries() {
            let mut key = prefix.as_bytes().to_vec();
            key.extend_from_slice(&k);
            self.entries.insert(key, Some(v));
        }
    }
}

impl PartialEq for ClientStore<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.entries() == other.entries()
    }
}

impl Eq for ClientStore<'_> {}

impl core::fmt::Debug for ClientStore<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClientStore")
            .field("entries", &self.entries)
            .field("sourced", &self.source.is_some())
            .finish()
    }
}

/// Host information passed along with every call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Env {
    pub block_height: Height,
    pub block_time: Timestamp,
}

/// Verification logic loaded from a checksum-addressed code blob. Messages
/// and results are JSON documents; errors are reported as plain strings.
pub trait VerificationModule: Send + Sync {
    fn instantiate(&self, store: &mut ClientStore, env: &Env, msg: &[u8])
        -> Result<Vec<u8>, String>;

    fn sudo(&self, store: &mut ClientStore, env: &Env, msg: &[u8]) -> Result<Vec<u8>, String>;

    fn query(&self, store: &ClientStore, env: &Env, msg: &[u8]) -> Result<Vec<u8>, String>;

    /// Entry point run when a client switches to this module.
    fn migrate(&self, _store: &mut ClientStore, _env: &Env, _msg: &[u8]) -> Result<Vec<u8>, String> {
        Ok(b"{}".to_vec())
    }
}

/// Checksum allow-list of stored codes and the modules linked to them.
///
/// A module can only be invoked while its checksum is allow-listed; removing
/// a checksum unlinks its module.
#[derive(Clone, Default)]
pub struct WasmEngine {
    codes: BTreeMap<Checksum, Vec<u8>>,
    modules: BTreeMap<Checksum, Arc<dyn VerificationModule>>,
}

impl core::fmt::Debug for WasmEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WasmEngine")
            .field(
                "checksums",
                &self.codes.keys().map(|c| display_checksum(c)).collect::<Vec<_>>(),
            )
            .field(
                "modules",
                &self.modules.keys().map(|c| display_checksum(c)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl WasmEngine {
    pub fn checksums(&self) -> impl Iterator<Item = &Checksum> {
        self.codes.keys()
    }

    pub fn contains(&self, checksum: &[u8]) -> bool {
        self.codes.contains_key(checksum)
    }

    pub fn code(&self, checksum: &[u8]) -> Option<&[u8]> {
        self.codes.get(checksum).map(Vec::as_slice)
    }

    /// Allow-lists `checksum`, keeping the code it was computed from.
    pub fn add_checksum(&mut self, checksum: Checksum, code: Vec<u8>) -> Result<(), Error> {
        if checksum.len() != CHECKSUM_LENGTH {
            return Err(Error::invalid_checksum(format!(
                "expected {CHECKSUM_LENGTH} bytes, got {}",
                checksum.len()
            )));
        }
        if self.contains(&checksum) {
            return Err(Error::checksum_already_exists(display_checksum(&checksum)));
        }
        self.codes.insert(checksum, code);
        Ok(())
    }

    pub fn remove_checksum(&mut self, checksum: &[u8]) -> Result<(), Error> {
        if self.codes.remove(checksum).is_none() {
            return Err(Error::unknown_checksum(display_checksum(checksum)));
        }
        self.modules.remove(checksum);
        Ok(())
    }

    /// Registers the module running the code allow-listed as `checksum`.
    pub fn link_module(
        &mut self,
        checksum: Checksum,
        module: Arc<dyn VerificationModule>,
    ) -> Result<(), Error> {
        if !self.contains(&checksum) {
            return Err(Error::unknown_checksum(display_checksum(&checksum)));
        }
        self.modules.insert(checksum, module);
        Ok(())
    }

    pub fn module(&self, checksum: &[u8]) -> Result<&Arc<dyn VerificationModule>, Error> {
        if !self.contains(checksum) {
            return Err(Error::unknown_checksum(display_checksum(checksum)));
        }
        self.modules
            .get(checksum)
            .ok_or_else(|| Error::unknown_checksum(display_checksum(checksum)))
    }

    pub fn instantiate<R: DeserializeOwned>(
        &self,
        checksum: &[u8],
        store: &mut ClientStore,
        env: &Env,
        msg: &InstantiateMsg,
    ) -> Result<R, Error> {
        let module = self.module(checksum)?;
        let payload = encode(msg)?;
        self.transact(store, |scratch| module.instantiate(scratch, env, &payload))
    }

    /// Runs a message that may write to `store`. The writes are kept only
    /// if the module succeeds.
    pub fn sudo<R: DeserializeOwned>(
        &self,
        checksum: &[u8],
        store: &mut ClientStore,
        env: &Env,
        msg: &SudoMsg,
    ) -> Result<R, Error> {
        let module = self.module(checksum)?;
        let payload = encode(msg)?;
        trace!(checksum = %display_checksum(checksum), "wasm sudo");
        self.transact(store, |scratch| module.sudo(scratch, env, &payload))
    }

    pub fn query<R: DeserializeOwned>(
        &self,
        checksum: &[u8],
        store: &ClientStore,
        env: &Env,
        msg: &QueryMsg,
    ) -> Result<R, Error> {
        let module = self.module(checksum)?;
        let payload = encode(msg)?;
        trace!(checksum = %display_checksum(checksum), "wasm query");
        let result = module.query(store, env, &payload).map_err(Error::contract_error)?;
        decode(&result)
    }

    pub fn migrate<R: DeserializeOwned>(
        &self,
        checksum: &[u8],
        store: &mut ClientStore,
        env: &Env,
        msg: &[u8],
    ) -> Result<R, Error> {
        let module = self.module(checksum)?;
        self.transact(store, |scratch| module.migrate(scratch, env, msg))
    }

    fn transact<'s, R: DeserializeOwned>(
        &self,
        store: &mut ClientStore<'s>,
        call: impl FnOnce(&mut ClientStore<'s>) -> Result<Vec<u8>, String>,
    ) -> Result<R, Error> {
        let mut scratch = store.clone();
        let result = call(&mut scratch).map_err(Error::contract_error)?;
        let result = decode(&result)?;
        *store = scratch;
        Ok(result)
    }
}

fn encode<T: Serialize>(msg: &T) -> Result<Vec<u8>, Error> {
    serde_json::to_vec(msg).map_err(Error::encode_contract_message)
}

fn decode<R: DeserializeOwned>(result: &[u8]) -> Result<R, Error> {
    serde_json::from_slice(result).map_err(Error::decode_contract_result)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use core::cell::Cell;

    use super::*;
    use crate::clients::ics08_wasm::contract::{EmptyResult, StatusMsg, StatusResult};
    use crate::clients::ics08_wasm::error::ErrorDetail;

    /// Writes a marker, then fails when asked to.
    struct Scribble;

    impl VerificationModule for Scribble {
        fn instantiate(&self, _: &mut ClientStore, _: &Env, _: &[u8]) -> Result<Vec<u8>, String> {
            Ok(b"{}".to_vec())
        }

        fn sudo(&self, store: &mut ClientStore, _: &Env, msg: &[u8]) -> Result<Vec<u8>, String> {
            store.set(b"marker".to_vec(), msg.to_vec());
            let msg: SudoMsg = serde_json::from_slice(msg).map_err(|e| e.to_string())?;
            match msg {
                SudoMsg::MigrateClientStore(_) => Err("refused".to_string()),
                _ => Ok(b"{}".to_vec()),
            }
        }

        fn query(&self, _: &ClientStore, _: &Env, _: &[u8]) -> Result<Vec<u8>, String> {
            Ok(br#"{"status":"Active"}"#.to_vec())
        }
    }

    fn env() -> Env {
        Env {
            block_height: Height::new(0, 1),
            block_time: Timestamp::now(),
        }
    }

    fn engine_with_scribble() -> (WasmEngine, Checksum) {
        let code = b"scribble".to_vec();
        let checksum = checksum(&code);
        let mut engine = WasmEngine::default();
        engine.add_checksum(checksum.clone(), code).unwrap();
        engine.link_module(checksum.clone(), Arc::new(Scribble)).unwrap();
        (engine, checksum)
    }

    #[test]
    fn unknown_checksum_cannot_be_invoked() {
        let (engine, _) = engine_with_scribble();
        let err = engine
            .query::<StatusResult>(&[7; 32], &ClientStore::default(), &env(), &QueryMsg::Status(StatusMsg {}))
            .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnknownChecksum(_)));
    }

    #[test]
    fn modules_require_an_allow_listed_checksum() {
        let mut engine = WasmEngine::default();
        let err = engine.link_module(vec![1; 32], Arc::new(Scribble)).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnknownChecksum(_)));

        let (mut engine, checksum) = engine_with_scribble();
        let err = engine.add_checksum(checksum.clone(), vec![]).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ChecksumAlreadyExists(_)));

        engine.remove_checksum(&checksum).unwrap();
        assert!(engine.module(&checksum).is_err());
        assert!(engine.remove_checksum(&checksum).is_err());
    }

    #[test]
    fn sudo_writes_are_kept_only_on_success() {
        let (engine, checksum) = engine_with_scribble();
        let mut store = ClientStore::default();

        let msg = SudoMsg::MigrateClientStore(Default::default());
        assert!(engine
            .sudo::<EmptyResult>(&checksum, &mut store, &env(), &msg)
            .is_err());
        assert_eq!(store, ClientStore::default());

        let msg = SudoMsg::UpdateState(crate::clients::ics08_wasm::contract::UpdateStateMsg {
            client_message: vec![1],
        });
        engine
            .sudo::<EmptyResult>(&checksum, &mut store, &env(), &msg)
            .unwrap();
        assert!(store.get(b"marker").is_some());
    }

    /// Serves two consensus states and counts the reads.
    #[derive(Default)]
    struct Counted {
        loads: Cell<usize>,
    }

    impl StoreSource for Counted {
        fn load(&self, key: &[u8]) -> Option<Vec<u8>> {
            self.loads.set(self.loads.get() + 1);
            [5, 6]
                .into_iter()
                .find(|h| consensus_state_key(Height::new(0, *h)) == key)
                .map(|h| vec![h as u8])
        }

        fn keys(&self) -> Vec<Vec<u8>> {
            vec![
                consensus_state_key(Height::new(0, 5)),
                consensus_state_key(Height::new(0, 6)),
            ]
        }
    }

    #[test]
    fn sourced_entries_are_read_when_asked_for() {
        let source = Counted::default();
        let mut store = ClientStore::with_source(&source);
        store.set(CLIENT_STATE_KEY.as_bytes().to_vec(), vec![1]);
        assert_eq!(source.loads.get(), 0);

        assert_eq!(store.get(&consensus_state_key(Height::new(0, 5))), Some(vec![5]));
        assert_eq!(store.get(&consensus_state_key(Height::new(0, 7))), None);
        assert_eq!(source.loads.get(), 2);

        // Writes shadow the source.
        store.set(consensus_state_key(Height::new(0, 5)), vec![9]);
        assert_eq!(store.remove(&consensus_state_key(Height::new(0, 6))), Some(vec![6]));
        assert_eq!(store.get(&consensus_state_key(Height::new(0, 5))), Some(vec![9]));
        assert_eq!(store.get(&consensus_state_key(Height::new(0, 6))), None);

        let entries: Vec<_> = store.entries().into_values().collect();
        assert_eq!(entries, vec![vec![1], vec![9]]);
    }

    #[test]
    fn prefixed_views() {
        let mut inner = ClientStore::default();
        inner.set(CLIENT_STATE_KEY.as_bytes().to_vec(), vec![1]);
        inner.set(consensus_state_key(Height::new(0, 5)), vec![2]);

        let mut store = ClientStore::default();
        store.insert_prefixed(SUBJECT_PREFIX, &inner);
        assert_eq!(store.get(b"subject/consensusStates/0-5"), Some(vec![2]));
        assert_eq!(store.prefixed(SUBJECT_PREFIX), inner);
        assert_eq!(store.prefixed(SUBSTITUTE_PREFIX), ClientStore::default());
    }
}
