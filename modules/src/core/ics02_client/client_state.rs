use core::fmt::{Debug, Display, Formatter};
use core::marker::{Send, Sync};

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::lightclients::tendermint::v1::ClientState as RawTmClientState;
use ibc_engine_proto::ibc::lightclients::wasm::v1::ClientState as RawWasmClientState;
#[cfg(any(test, feature = "mocks"))]
use ibc_engine_proto::ibc::mock::ClientState as RawMockClientState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::clients::ics07_tendermint::client_state::ClientState as TmClientState;
use crate::clients::ics08_wasm::client_state::ClientState as WasmClientState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::Height;

#[cfg(any(test, feature = "mocks"))]
use crate::mock::client_state::MockClientState;

pub const TENDERMINT_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.ClientState";
pub const WASM_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.ClientState";
pub const MOCK_CLIENT_STATE_TYPE_URL: &str = "/ibc.mock.ClientState";

pub trait ClientState: Clone + Debug + Send + Sync {
    /// Type of client associated with this state (eg. Tendermint)
    fn client_type(&self) -> ClientType;

    /// Latest height of consensus state
    fn latest_height(&self) -> Height;

    /// Frozen height of the client
    fn frozen_height(&self) -> Option<Height>;

    /// Freeze status of the client
    fn is_frozen(&self) -> bool {
        self.frozen_height().is_some()
    }

    /// Rejects proofs claimed at heights this client has not reached yet.
    fn verify_height(&self, height: Height) -> Result<(), Error> {
        if self.latest_height() < height {
            return Err(Error::height_out_of_range(height, self.latest_height()));
        }
        Ok(())
    }
}

/// Status of a light client, derived on demand from its state and the host clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The client can be updated and used for proof verification.
    Active,
    /// The trusting period elapsed without a new header.
    Expired,
    /// Misbehaviour was detected.
    Frozen,
    /// The latest consensus state is missing or the status could not be determined.
    Unknown,
}

impl Status {
    pub fn is_active(&self) -> bool {
        *self == Status::Active
    }

    /// Maps every status but `Active` to the error blocking updates and proof verification.
    pub fn verify_is_active(&self, client_id: &ClientId) -> Result<(), Error> {
        match self {
            Status::Active => Ok(()),
            Status::Frozen => Err(Error::client_frozen(client_id.clone())),
            Status::Expired => Err(Error::client_expired(client_id.clone())),
            status => Err(Error::client_not_active(client_id.clone(), *status)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
            Self::Frozen => "Frozen",
            Self::Unknown => "Unknown",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnyClientState {
    Tendermint(TmClientState),
    Wasm(WasmClientState),

    #[cfg(any(test, feature = "mocks"))]
    Mock(MockClientState),
}

impl AnyClientState {
    pub fn trusting_period(&self) -> Option<core::time::Duration> {
        match self {
            AnyClientState::Tendermint(tm_state) => Some(tm_state.trusting_period),
            AnyClientState::Wasm(_) => None,

            #[cfg(any(test, feature = "mocks"))]
            AnyClientState::Mock(mock_state) => Some(mock_state.trusting_period),
        }
    }
}

impl ClientState for AnyClientState {
    fn client_type(&self) -> ClientType {
        match self {
            Self::Tendermint(state) => state.client_type(),
            Self::Wasm(state) => state.client_type(),

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(state) => state.client_type(),
        }
    }

    fn latest_height(&self) -> Height {
        match self {
            Self::Tendermint(tm_state) => tm_state.latest_height(),
            Self::Wasm(wasm_state) => wasm_state.latest_height(),

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(mock_state) => mock_state.latest_height(),
        }
    }

    fn frozen_height(&self) -> Option<Height> {
        match self {
            Self::Tendermint(tm_state) => tm_state.frozen_height(),
            Self::Wasm(wasm_state) => wasm_state.frozen_height(),

            #[cfg(any(test, feature = "mocks"))]
            Self::Mock(mock_state) => mock_state.frozen_height(),
        }
    }
}

impl Protobuf<Any> for AnyClientState {}

impl TryFrom<Any> for AnyClientState {
    type Error = Error;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            "" => Err(Error::empty_client_state_response()),

            TENDERMINT_CLIENT_STATE_TYPE_URL => Ok(AnyClientState::Tendermint(
                Protobuf::<RawTmClientState>::decode_vec(&raw.value)
                    .map_err(Error::decode_raw_client_state)?,
            )),

            WASM_CLIENT_STATE_TYPE_URL => Ok(AnyClientState::Wasm(
                Protobuf::<RawWasmClientState>::decode_vec(&raw.value)
                    .map_err(Error::decode_raw_client_state)?,
            )),

            #[cfg(any(test, feature = "mocks"))]
            MOCK_CLIENT_STATE_TYPE_URL => Ok(AnyClientState::Mock(
                Protobuf::<RawMockClientState>::decode_vec(&raw.value)
                    .map_err(Error::decode_raw_client_state)?,
            )),

            _ => Err(Error::unknown_client_state_type(raw.type_url)),
        }
    }
}

impl From<AnyClientState> for Any {
    fn from(value: AnyClientState) -> Self {
        match value {
            AnyClientState::Tendermint(value) => Any {
                type_url: TENDERMINT_CLIENT_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawTmClientState>::encode_vec(&value),
            },
            AnyClientState::Wasm(value) => Any {
                type_url: WASM_CLIENT_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawWasmClientState>::encode_vec(&value),
            },

            #[cfg(any(test, feature = "mocks"))]
            AnyClientState::Mock(value) => Any {
                type_url: MOCK_CLIENT_STATE_TYPE_URL.to_string(),
                value: Protobuf::<RawMockClientState>::encode_vec(&value),
            },
        }
    }
}

impl From<TmClientState> for AnyClientState {
    fn from(cs: TmClientState) -> Self {
        Self::Tendermint(cs)
    }
}

impl From<WasmClientState> for AnyClientState {
    fn from(cs: WasmClientState) -> Self {
        Self::Wasm(cs)
    }
}

#[cfg(any(test, feature = "mocks"))]
impl From<MockClientState> for AnyClientState {
    fn from(cs: MockClientState) -> Self {
        Self::Mock(cs)
    }
}
