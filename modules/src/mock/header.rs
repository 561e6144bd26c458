use core::time::Duration;

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::mock::{Header as RawMockHeader, Misbehaviour as RawMockMisbehaviour};
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::error::Error;
use crate::core::ics23_commitment::commitment::CommitmentRoot;
use crate::core::ics24_host::identifier::ClientId;
use crate::mock::client_state::MockConsensusState;
use crate::timestamp::Timestamp;
use crate::Height;

pub const MOCK_HEADER_TYPE_URL: &str = "/ibc.mock.Header";
pub const MOCK_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.mock.Misbehaviour";

/// Unix time of the mock genesis block (2023-01-01T00:00:00Z).
const GENESIS_TIME_NANOS: u64 = 1_672_531_200_000_000_000;

/// Mock chains produce one block per `BLOCK_TIME`.
pub const BLOCK_TIME: Duration = Duration::from_secs(1);

/// The timestamp of the block at `height` on any mock chain.
pub fn block_timestamp(height: Height) -> Timestamp {
    let elapsed = height
        .revision_height
        .saturating_mul(BLOCK_TIME.as_nanos() as u64);
    Timestamp::from_nanoseconds(GENESIS_TIME_NANOS.saturating_add(elapsed))
        .unwrap_or_else(|_| Timestamp::none())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockHeader {
    pub height: Height,
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
}

impl MockHeader {
    /// A header at `height`, stamped with the block time of that height and an empty root.
    pub fn new(height: Height) -> Self {
        Self {
            height,
            timestamp: block_timestamp(height),
            root: CommitmentRoot::from(Vec::new()),
        }
    }

    pub fn height(&self) -> Height {
        self.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    pub fn with_timestamp(self, timestamp: Timestamp) -> Self {
        Self { timestamp, ..self }
    }

    pub fn with_root(self, root: CommitmentRoot) -> Self {
        Self { root, ..self }
    }
}

impl Protobuf<RawMockHeader> for MockHeader {}

impl TryFrom<RawMockHeader> for MockHeader {
    type Error = Error;

    fn try_from(raw: RawMockHeader) -> Result<Self, Self::Error> {
        Ok(MockHeader {
            height: raw.height.ok_or_else(Error::missing_height)?.into(),
            timestamp: Timestamp::from_nanoseconds(raw.timestamp)
                .map_err(|e| Error::implementation_specific(e.to_string()))?,
            root: raw.commitment_root.into(),
        })
    }
}

impl From<MockHeader> for RawMockHeader {
    fn from(value: MockHeader) -> Self {
        RawMockHeader {
            height: Some(value.height.into()),
            timestamp: value.timestamp.nanoseconds(),
            commitment_root: value.root.into_vec(),
        }
    }
}

/// Two headers the counterparty produced for the same height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockMisbehaviour {
    pub client_id: ClientId,
    pub header1: MockHeader,
    pub header2: MockHeader,
}

impl Protobuf<RawMockMisbehaviour> for MockMisbehaviour {}

impl TryFrom<RawMockMisbehaviour> for MockMisbehaviour {
    type Error = Error;

    fn try_from(raw: RawMockMisbehaviour) -> Result<Self, Self::Error> {
        Ok(Self {
            client_id: raw
                .client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            header1: raw
                .header1
                .ok_or_else(Error::missing_raw_client_message)?
                .try_into()?,
            header2: raw
                .header2
                .ok_or_else(Error::missing_raw_client_message)?
                .try_into()?,
        })
    }
}

impl From<MockMisbehaviour> for RawMockMisbehaviour {
    fn from(value: MockMisbehaviour) -> Self {
        RawMockMisbehaviour {
            client_id: value.client_id.to_string(),
            header1: Some(value.header1.into()),
            header2: Some(value.header2.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MockClientMessage {
    Header(MockHeader),
    Misbehaviour(MockMisbehaviour),
}

impl TryFrom<Any> for MockClientMessage {
    type Error = Error;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            MOCK_HEADER_TYPE_URL => Ok(MockClientMessage::Header(
                Protobuf::<RawMockHeader>::decode_vec(&raw.value)
                    .map_err(Error::decode_raw_client_message)?,
            )),
            MOCK_MISBEHAVIOUR_TYPE_URL => Ok(MockClientMessage::Misbehaviour(
                Protobuf::<RawMockMisbehaviour>::decode_vec(&raw.value)
                    .map_err(Error::decode_raw_client_message)?,
            )),
            _ => Err(Error::unknown_client_message_type(raw.type_url)),
        }
    }
}

impl From<MockClientMessage> for Any {
    fn from(value: MockClientMessage) -> Self {
        match value {
            MockClientMessage::Header(header) => Any {
                type_url: MOCK_HEADER_TYPE_URL.to_string(),
                value: Protobuf::<RawMockHeader>::encode_vec(&header),
            },
            MockClientMessage::Misbehaviour(misbehaviour) => Any {
                type_url: MOCK_MISBEHAVIOUR_TYPE_URL.to_string(),
                value: Protobuf::<RawMockMisbehaviour>::encode_vec(&misbehaviour),
            },
        }
    }
}

impl From<MockHeader> for AnyClientMessage {
    fn from(header: MockHeader) -> Self {
        AnyClientMessage::Mock(MockClientMessage::Header(header))
    }
}

impl From<MockMisbehaviour> for AnyClientMessage {
    fn from(misbehaviour: MockMisbehaviour) -> Self {
        AnyClientMessage::Mock(MockClientMessage::Misbehaviour(misbehaviour))
    }
}

impl From<MockHeader> for AnyConsensusState {
    fn from(header: MockHeader) -> Self {
        AnyConsensusState::Mock(MockConsensusState::new(header))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn headers_are_deterministic() {
        let height = Height::new(0, 10);
        assert_eq!(MockHeader::new(height), MockHeader::new(height));
        assert!(MockHeader::new(height.increment())
            .timestamp()
            .after(&MockHeader::new(height).timestamp()));
    }

    #[test]
    fn client_message_through_any() {
        let header = MockHeader::new(Height::new(1, 10)).with_root(b"root".to_vec().into());
        let any: Any = MockClientMessage::Header(header.clone()).into();
        assert_eq!(any.type_url, MOCK_HEADER_TYPE_URL);
        assert_eq!(
            MockClientMessage::try_from(any).unwrap(),
            MockClientMessage::Header(header.clone())
        );

        let misbehaviour = MockMisbehaviour {
            client_id: ClientId::default(),
            header1: header.clone(),
            header2: header.with_root(b"other".to_vec().into()),
        };
        let any: Any = MockClientMessage::Misbehaviour(misbehaviour.clone()).into();
        assert_eq!(
            MockClientMessage::try_from(any).unwrap(),
            MockClientMessage::Misbehaviour(misbehaviour)
        );
    }
}
