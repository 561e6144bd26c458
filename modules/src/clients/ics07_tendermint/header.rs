use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::lightclients::tendermint::v1::{
    Header as RawHeader, Misbehaviour as RawMisbehaviour,
};
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};
use tendermint::block::signed_header::SignedHeader;
use tendermint::validator::Set as ValidatorSet;

use crate::clients::ics07_tendermint::error::Error;
use crate::clients::ics07_tendermint::misbehaviour::Misbehaviour;
use crate::core::ics02_client::client_message::AnyClientMessage;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics24_host::identifier::ChainId;
use crate::timestamp::Timestamp;
use crate::Height;

pub const TENDERMINT_HEADER_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.Header";
pub const TENDERMINT_MISBEHAVIOUR_TYPE_URL: &str = "/ibc.lightclients.tendermint.v1.Misbehaviour";

/// Tendermint consensus header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub signed_header: SignedHeader, // contains the commitment root
    pub validator_set: ValidatorSet, // the validator set that signed Header
    pub trusted_height: Height, // the height of a trusted header seen by client less than or equal to Header
    pub trusted_validator_set: ValidatorSet, // the last trusted validator set at trusted height
}

impl Header {
    pub fn height(&self) -> Height {
        Height::new(
            ChainId::chain_version(self.signed_header.header.chain_id.as_str()),
            self.signed_header.header.height.value(),
        )
    }

    pub fn timestamp(&self) -> Timestamp {
        self.signed_header.header.time.into()
    }

    pub fn chain_id(&self) -> ChainId {
        ChainId::from_string(self.signed_header.header.chain_id.as_str())
    }

    /// Checks what can be checked without a trusted state: the validator set
    /// is the one the block names and the trusted height precedes the header.
    pub fn validate_basic(&self) -> Result<(), Error> {
        let validators_hash = self.validator_set.hash();
        if self.signed_header.header.validators_hash != validators_hash {
            return Err(Error::mismatched_validators_hash(
                self.signed_header.header.validators_hash.to_string(),
                validators_hash.to_string(),
            ));
        }

        let height = self.height();
        if self.trusted_height.revision_number != height.revision_number {
            return Err(Error::mismatched_revision(
                self.trusted_height.revision_number,
                height.revision_number,
            ));
        }
        if self.trusted_height >= height {
            return Err(Error::trusted_height_not_below_header(
                self.trusted_height,
                height,
            ));
        }
        Ok(())
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Header {{ height: {}, trusted_height: {}, time: {} }}",
            self.height(),
            self.trusted_height,
            self.timestamp()
        )
    }
}

impl Protobuf<RawHeader> for Header {}

impl TryFrom<RawHeader> for Header {
    type Error = Error;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        let invalid = |e: tendermint::Error| Error::invalid_raw_header(e.to_string());

        Ok(Self {
            signed_header: raw
                .signed_header
                .ok_or_else(Error::missing_signed_header)?
                .try_into()
                .map_err(invalid)?,
            validator_set: raw
                .validator_set
                .ok_or_else(Error::missing_validator_set)?
                .try_into()
                .map_err(invalid)?,
            trusted_height: raw
                .trusted_height
                .ok_or_else(Error::missing_trusted_height)?
                .into(),
            trusted_validator_set: raw
                .trusted_validators
                .ok_or_else(Error::missing_trusted_validator_set)?
                .try_into()
                .map_err(invalid)?,
        })
    }
}

impl From<Header> for RawHeader {
    fn from(value: Header) -> Self {
        RawHeader {
            signed_header: Some(value.signed_header.into()),
            validator_set: Some(value.validator_set.into()),
            trusted_height: Some(value.trusted_height.into()),
            trusted_validators: Some(value.trusted_validator_set.into()),
        }
    }
}

/// A message extending the trust of a Tendermint client, or evidence that
/// the tracked chain misbehaved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    Header(Header),
    Misbehaviour(Misbehaviour),
}

impl TryFrom<Any> for ClientMessage {
    type Error = Ics02Error;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            TENDERMINT_HEADER_TYPE_URL => Ok(ClientMessage::Header(
                Protobuf::<RawHeader>::decode_vec(&raw.value)
                    .map_err(Ics02Error::decode_raw_client_message)?,
            )),
            TENDERMINT_MISBEHAVIOUR_TYPE_URL => Ok(ClientMessage::Misbehaviour(
                Protobuf::<RawMisbehaviour>::decode_vec(&raw.value)
                    .map_err(Ics02Error::decode_raw_client_message)?,
            )),
            _ => Err(Ics02Error::unknown_client_message_type(raw.type_url)),
        }
    }
}

impl From<ClientMessage> for Any {
    fn from(value: ClientMessage) -> Self {
        match value {
            ClientMessage::Header(header) => Any {
                type_url: TENDERMINT_HEADER_TYPE_URL.to_string(),
                value: Protobuf::<RawHeader>::encode_vec(&header),
            },
            ClientMessage::Misbehaviour(misbehaviour) => Any {
                type_url: TENDERMINT_MISBEHAVIOUR_TYPE_URL.to_string(),
                value: Protobuf::<RawMisbehaviour>::encode_vec(&misbehaviour),
            },
        }
    }
}

impl From<Header> for AnyClientMessage {
    fn from(header: Header) -> Self {
        AnyClientMessage::Tendermint(ClientMessage::Header(header))
    }
}

impl From<Misbehaviour> for AnyClientMessage {
    fn from(misbehaviour: Misbehaviour) -> Self {
        AnyClientMessage::Tendermint(ClientMessage::Misbehaviour(misbehaviour))
    }
}


#[cfg(any(test, feature = "mocks"))]
pub mod test_util {
    use core::time::Duration;

    use tendermint::Time;
    use tendermint_testgen::light_block::TmLightBlock;
    use tendermint_testgen::{
        Commit as TestgenCommit, Generator, Header as TestgenHeader,
        LightBlock as TestgenLightBlock, Validator as TestgenValidator,
    };

    use super::Header;
    use crate::core::ics24_host::identifier::ChainId;
    use crate::Height;

    /// Voting power of every test validator.
    pub const TEST_VOTING_POWER: u64 = 10;

    /// Validators with keys derived from their ids, all of equal power.
    pub fn test_validators(ids: &[&str]) -> Vec<TestgenValidator> {
        ids.iter()
            .map(|id| TestgenValidator::new(id).voting_power(TEST_VOTING_POWER))
            .collect()
    }

    /// A block at `height` signed by every one of `validators`.
    pub fn light_block(
        chain_id: &ChainId,
        height: u64,
        time: Time,
        validators: &[TestgenValidator],
        next_validators: &[TestgenValidator],
    ) -> TmLightBlock {
        let header = TestgenHeader::new(validators)
            .next_validators(next_validators)
            .chain_id(chain_id.as_str())
            .height(height)
            .time(time);
        let commit = TestgenCommit::new(header.clone(), 1);

        TestgenLightBlock::new(header, commit)
            .generate()
            .expect("testgen light block")
    }

    /// `block` as an update from `trusted_height`, whose consensus state names
    /// `trusted_validators` as the next validators.
    pub fn header_from_block(
        block: TmLightBlock,
        trusted_height: Height,
        trusted_validators: &[TestgenValidator],
    ) -> Header {
        let trusted_validator_set = tendermint::validator::Set::without_proposer(
            tendermint_testgen::validator::generate_validators(trusted_validators)
                .expect("testgen validators"),
        );

        Header {
            signed_header: block.signed_header,
            validator_set: block.validators,
            trusted_height,
            trusted_validator_set,
        }
    }

    /// A header at height 1-10 of `test-chain-1`, signed by four validators
    /// a few seconds ago.
    pub fn get_dummy_tendermint_header() -> Header {
        let validators = test_validators(&["a", "b", "c", "d"]);
        let time = Time::now()
            .checked_sub(Duration::from_secs(5))
            .unwrap_or_else(Time::now);
        let chain_id = ChainId::new("test-chain".to_string(), 1);

        header_from_block(
            light_block(&chain_id, 10, time, &validators, &validators),
            Height::new(1, 9),
            &validators,
        )
    }
}
