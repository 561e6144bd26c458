use core::time::Duration;

use ibc_engine_proto::ibc::mock::{
    ClientState as RawMockClientState, ConsensusState as RawMockConsensusState,
};
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::core::ics02_client::client_consensus::ConsensusState;
use crate::core::ics02_client::client_state::ClientState;
use crate::core::ics02_client::client_type::ClientType;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::mock::header::MockHeader;
use crate::timestamp::Timestamp;
use crate::Height;

/// A mock client tracks the latest header it was given. A zero `trusting_period` means the
/// client never expires.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockClientState {
    pub header: MockHeader,
    pub frozen_height: Option<Height>,
    pub trusting_period: Duration,
}

impl MockClientState {
    pub fn new(header: MockHeader) -> Self {
        Self {
            header,
            frozen_height: None,
            trusting_period: Duration::ZERO,
        }
    }

    pub fn with_frozen_height(self, frozen_height: Height) -> Self {
        Self {
            frozen_height: Some(frozen_height),
            ..self
        }
    }

    pub fn with_trusting_period(self, trusting_period: Duration) -> Self {
        Self {
            trusting_period,
            ..self
        }
    }

    /// Whether `elapsed` since the latest consensus state exceeds the trusting period.
    pub fn expired(&self, elapsed: Duration) -> bool {
        !self.trusting_period.is_zero() && elapsed > self.trusting_period
    }
}

impl ClientState for MockClientState {
    fn client_type(&self) -> ClientType {
        ClientType::Mock
    }

    fn latest_height(&self) -> Height {
        self.header.height()
    }

    fn frozen_height(&self) -> Option<Height> {
        self.frozen_height
    }
}

impl Protobuf<RawMockClientState> for MockClientState {}

impl TryFrom<RawMockClientState> for MockClientState {
    type Error = Error;

    fn try_from(raw: RawMockClientState) -> Result<Self, Self::Error> {
        let header = raw
            .header
            .ok_or_else(|| Error::invalid_client_state("missing header".to_string()))?;
        Ok(Self {
            header: header.try_into()?,
            frozen_height: raw.frozen_height.map(Height::from),
            trusting_period: Duration::from_nanos(raw.trusting_period),
        })
    }
}

impl From<MockClientState> for RawMockClientState {
    fn from(value: MockClientState) -> Self {
        RawMockClientState {
            header: Some(value.header.into()),
            frozen_height: value.frozen_height.map(Into::into),
            trusting_period: u64::try_from(value.trusting_period.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConsensusState {
    pub header: MockHeader,
}

impl MockConsensusState {
    pub fn new(header: MockHeader) -> Self {
        Self { header }
    }

    pub fn timestamp(&self) -> Timestamp {
        self.header.timestamp()
    }

    pub fn root(&self) -> &CommitmentRoot {
        self.header.root()
    }
}

impl ConsensusState for MockConsensusState {
    fn client_type(&self) -> ClientType {
        ClientType::Mock
    }
}

impl Protobuf<RawMockConsensusState> for MockConsensusState {}

impl TryFrom<RawMockConsensusState> for MockConsensusState {
    type Error = Error;

    fn try_from(raw: RawMockConsensusState) -> Result<Self, Self::Error> {
        let header = raw
            .header
            .ok_or_else(Error::missing_raw_consensus_state)?;
        Ok(Self {
            header: header.try_into()?,
        })
    }
}

impl From<MockConsensusState> for RawMockConsensusState {
    fn from(value: MockConsensusState) -> Self {
        RawMockConsensusState {
            header: Some(value.header.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn client_state_through_raw() {
        let state = MockClientState::new(MockHeader::new(Height::new(0, 7)))
            .with_frozen_height(Height::new(0, 7))
            .with_trusting_period(Duration::from_secs(60));
        let bytes = Protobuf::<RawMockClientState>::encode_vec(&state);
        assert_eq!(
            <MockClientState as Protobuf<RawMockClientState>>::decode_vec(&bytes).unwrap(),
            state
        );
    }

    #[test]
    fn zero_trusting_period_never_expires() {
        let state = MockClientState::new(MockHeader::new(Height::new(0, 7)));
        assert!(!state.expired(Duration::from_secs(u32::MAX as u64)));

        let state = state.with_trusting_period(Duration::from_secs(10));
        assert!(!state.expired(Duration::from_secs(10)));
        assert!(state.expired(Duration::from_secs(11)));
    }
}
