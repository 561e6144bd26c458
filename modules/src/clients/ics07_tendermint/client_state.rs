use core::time::Duration;

use ibc_engine_proto::ibc::lightclients::tendermint::v1::ClientState as RawClientState;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};
use tendermint_light_client_verifier::options::Options;

use crate::clients::ics07_tendermint::error::Error;
use crate::clients::ics07_tendermint::header::Header;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::trust_threshold::TrustThreshold;
use crate::core::ics23_commitment::specs::ProofSpecs;
use crate::core::ics24_host::identifier::ChainId;
use crate::timestamp::ZERO_DURATION;
use crate::Height;

/// Height recorded in `frozen_height` once misbehaviour was detected.
pub const FROZEN_HEIGHT: Height = Height {
    revision_number: 0,
    revision_height: 1,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientState {
    pub chain_id: ChainId,
    pub trust_level: TrustThreshold,
    pub trusting_period: Duration,
    pub unbonding_period: Duration,
    pub max_clock_drift: Duration,
    pub latest_height: Height,
    pub frozen_height: Option<Height>,
    pub proof_specs: ProofSpecs,
    pub upgrade_path: Vec<String>,
}

impl ClientState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: ChainId,
        trust_level: TrustThreshold,
        trusting_period: Duration,
        unbonding_period: Duration,
        max_clock_drift: Duration,
        latest_height: Height,
        proof_specs: ProofSpecs,
        upgrade_path: Vec<String>,
    ) -> Result<ClientState, Error> {
        let client_state = Self {
            chain_id,
            trust_level,
            trusting_period,
            unbonding_period,
            max_clock_drift,
            latest_height,
            frozen_height: None,
            proof_specs,
            upgrade_path,
        };
        client_state.validate()?;
        Ok(client_state)
    }

    /// Checks the trust parameters a client may be created with.
    pub fn validate(&self) -> Result<(), Error> {
        // Basic validation of trusting period and unbonding period: each should be non-zero.
        if self.trusting_period == ZERO_DURATION {
            return Err(Error::invalid_trusting_period(format!(
                "ClientState trusting period ({:?}) must be greater than zero",
                self.trusting_period
            )));
        }

        if self.unbonding_period == ZERO_DURATION {
            return Err(Error::invalid_unbonding_period(format!(
                "ClientState unbonding period ({:?}) must be greater than zero",
                self.unbonding_period
            )));
        }

        if self.trusting_period >= self.unbonding_period {
            return Err(Error::invalid_trusting_period(format!(
                "ClientState trusting period ({:?}) must be smaller than unbonding period ({:?})",
                self.trusting_period, self.unbonding_period,
            )));
        }

        if self.max_clock_drift == ZERO_DURATION {
            return Err(Error::invalid_max_clock_drift(
                "ClientState max clock drift must be greater than zero".to_string(),
            ));
        }

        self.as_light_client_options()?;

        if self.proof_specs.is_empty() {
            return Err(Error::empty_proof_specs());
        }

        if self.latest_height.revision_height == 0 {
            return Err(Error::invalid_latest_height(
                "ClientState latest height cannot be zero".to_string(),
            ));
        }

        if self.latest_height.revision_number != self.chain_id.version() {
            return Err(Error::invalid_latest_height(format!(
                "ClientState latest height revision {} does not match chain id {} revision",
                self.latest_height.revision_number, self.chain_id
            )));
        }

        Ok(())
    }

    pub fn latest_height(&self) -> Height {
        self.latest_height
    }

    /// The verification parameters of the light client. Fails for trust
    /// levels outside `[1/3, 1)`.
    pub fn as_light_client_options(&self) -> Result<Options, Error> {
        Ok(Options {
            trust_threshold: self
                .trust_level
                .try_into()
                .map_err(|e: crate::core::ics02_client::error::Error| {
                    Error::invalid_trust_threshold(e.to_string())
                })?,
            trusting_period: self.trusting_period,
            clock_drift: self.max_clock_drift,
        })
    }

    /// The state after a verified `header`; the latest height only moves forward.
    pub fn with_header(self, header: &Header) -> Self {
        let height = header.height();
        ClientState {
            latest_height: self.latest_height.max(height),
            ..self
        }
    }

    pub fn with_frozen_height(self, h: Height) -> Self {
        Self {
            frozen_height: Some(h),
            ..self
        }
    }

    /// Whether `elapsed` time since the latest trusted header exceeds the trusting period.
    pub fn expired(&self, elapsed: Duration) -> bool {
        elapsed >= self.trusting_period
    }

    /// The state a counterparty commits under its upgrade path: the fields
    /// chosen by each client are reset.
    pub fn zero_custom_fields(self) -> Self {
        Self {
            trust_level: TrustThreshold::ZERO,
            trusting_period: ZERO_DURATION,
            max_clock_drift: ZERO_DURATION,
            frozen_height: None,
            ..self
        }
    }

    /// The chain-level parameters of `upgraded` combined with the fields
    /// chosen by this client.
    pub fn upgrade(&self, upgraded: ClientState) -> Self {
        Self {
            chain_id: upgraded.chain_id,
            unbonding_period: upgraded.unbonding_period,
            latest_height: upgraded.latest_height,
            proof_specs: upgraded.proof_specs,
            upgrade_path: upgraded.upgrade_path,
            frozen_height: None,
            ..self.clone()
        }
    }

    /// Whether `other` tracks a chain with the same parameters, ignoring the
    /// fields a recovery may change.
    pub fn matches_for_recovery(&self, other: &ClientState) -> bool {
        let strip = |cs: &ClientState| ClientState {
            chain_id: ChainId::default(),
            trusting_period: ZERO_DURATION,
            latest_height: Height::zero(),
            frozen_height: None,
            ..cs.clone()
        };
        strip(self) == strip(other)
    }
}

impl crate::core::ics02_client::client_state::ClientState for ClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Tendermint
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn frozen_height(&self) -> Option<Height> {
        self.frozen_height
    }
}

impl Protobuf<RawClientState> for ClientState {}

impl TryFrom<RawClientState> for ClientState {
    type Error = Error;

    fn try_from(raw: RawClientState) -> Result<Self, Self::Error> {
        let trust_level = raw.trust_level.ok_or_else(Error::missing_trust_level)?;

        let frozen_height = raw.frozen_height.and_then(|raw_height| {
            let height: Height = raw_height.into();
            if height == Height::zero() {
                None
            } else {
                Some(height)
            }
        });

        Ok(Self {
            chain_id: ChainId::from_string(raw.chain_id.as_str()),
            trust_level: trust_level
                .try_into()
                .map_err(|e| Error::invalid_trust_threshold(format!("{}", e)))?,
            trusting_period: raw
                .trusting_period
                .ok_or_else(Error::missing_trusting_period)?
                .try_into()
                .map_err(|_| Error::negative_trusting_period())?,
            unbonding_period: raw
                .unbonding_period
                .ok_or_else(Error::missing_unbonding_period)?
                .try_into()
                .map_err(|_| Error::negative_unbonding_period())?,
            max_clock_drift: raw
                .max_clock_drift
                .ok_or_else(Error::missing_max_clock_drift)?
                .try_into()
                .map_err(|_| Error::negative_max_clock_drift())?,
            latest_height: raw
                .latest_height
                .ok_or_else(Error::missing_latest_height)?
                .into(),
            frozen_height,
            proof_specs: raw.proof_specs.into(),
            upgrade_path: raw.upgrade_path,
        })
    }
}

impl From<ClientState> for RawClientState {
    fn from(value: ClientState) -> Self {
        RawClientState {
            chain_id: value.chain_id.to_string(),
            trust_level: Some(value.trust_level.into()),
            trusting_period: Some(value.trusting_period.into()),
            unbonding_period: Some(value.unbonding_period.into()),
            max_clock_drift: Some(value.max_clock_drift.into()),
            frozen_height: Some(value.frozen_height.unwrap_or_else(Height::zero).into()),
            latest_height: Some(value.latest_height.into()),
            proof_specs: value.proof_specs.into(),
            upgrade_path: value.upgrade_path,
        }
    }
}


#[cfg(any(test, feature = "mocks"))]
pub mod test_util {
    use core::time::Duration;

    use crate::clients::ics07_tendermint::client_state::ClientState;
    use crate::clients::ics07_tendermint::header::Header;
    use crate::core::ics02_client::client_state::AnyClientState;
    use crate::core::ics02_client::trust_threshold::TrustThreshold;
    use crate::core::ics23_commitment::specs::ProofSpecs;

    /// A client state trusting `tm_header`, with an upgrade path under `ibc`.
    pub fn get_dummy_tendermint_client_state(tm_header: Header) -> AnyClientState {
        AnyClientState::Tendermint(dummy_tendermint_client_state(&tm_header))
    }

    pub fn dummy_tendermint_client_state(tm_header: &Header) -> ClientState {
        ClientState {
            chain_id: tm_header.chain_id(),
            trust_level: TrustThreshold::ONE_THIRD,
            trusting_period: Duration::from_secs(64000),
            unbonding_period: Duration::from_secs(128000),
            max_clock_drift: Duration::from_millis(3000),
            latest_height: tm_header.height(),
            frozen_height: None,
            proof_specs: ProofSpecs::cosmos(),
            upgrade_path: vec!["ibc".to_string()],
        }
    }
}
