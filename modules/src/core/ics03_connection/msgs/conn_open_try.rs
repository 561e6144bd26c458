use core::time::Duration;

use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::ibc::core::connection::v1::MsgConnectionOpenTry as RawMsgConnectionOpenTry;
use ibc_engine_proto::Protobuf;

use crate::core::ics02_client::client_state::AnyClientState;
use crate::core::ics03_connection::connection::Counterparty;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::version::Version;
use crate::core::ics23_commitment::commitment::CommitmentProofBytes;
use crate::core::ics24_host::identifier::ClientId;
use crate::proofs::{ConsensusProof, Proofs};
use crate::signer::Signer;
use crate::tx_msg::Msg;
use crate::Height;

pub const TYPE_URL: &str = "/ibc.core.connection.v1.MsgConnectionOpenTry";

/// Message definition `MsgConnectionOpenTry`  (i.e., `ConnOpenTry` datagram).
///
/// `proofs` carries the proof of the counterparty INIT end as object proof, the proof of
/// `client_state` as client proof and the proof of the counterparty's consensus state of this
/// chain as consensus proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenTry {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub counterparty: Counterparty,
    pub counterparty_versions: Vec<Version>,
    pub proofs: Proofs,
    pub delay_period: Duration,
    pub signer: Signer,
}

impl MsgConnectionOpenTry {
    /// Getter for accessing the `consensus_height` field from this message. Returns the special
    /// value `Height(0)` if this field is not set.
    pub fn consensus_height(&self) -> Height {
        match self.proofs.consensus_proof() {
            None => Height::zero(),
            Some(p) => p.height(),
        }
    }
}

impl Msg for MsgConnectionOpenTry {
    type Raw = RawMsgConnectionOpenTry;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgConnectionOpenTry> for MsgConnectionOpenTry {}

impl TryFrom<RawMsgConnectionOpenTry> for MsgConnectionOpenTry {
    type Error = Error;

    fn try_from(msg: RawMsgConnectionOpenTry) -> Result<Self, Self::Error> {
        let counterparty_versions = msg
            .counterparty_versions
            .into_iter()
            .map(Version::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if counterparty_versions.is_empty() {
            return Err(Error::empty_versions());
        }

        let consensus_height = msg
            .consensus_height
            .map(Height::from)
            .ok_or_else(Error::missing_consensus_height)?;

        let consensus_proof = ConsensusProof::new(
            msg.proof_consensus
                .try_into()
                .map_err(Error::invalid_raw_proof)?,
            consensus_height,
        )
        .map_err(Error::invalid_proof)?;

        let proof_height = msg
            .proof_height
            .map(Height::from)
            .ok_or_else(Error::missing_proof_height)?;

        let client_proof =
            CommitmentProofBytes::try_from(msg.proof_client).map_err(Error::invalid_raw_proof)?;

        let client_state = msg
            .client_state
            .ok_or_else(Error::missing_client_state)?
            .try_into()
            .map_err(Error::invalid_client_state)?;

        Ok(Self {
            client_id: msg.client_id.parse().map_err(Error::invalid_identifier)?,
            client_state,
            counterparty: msg
                .counterparty
                .ok_or_else(Error::missing_counterparty)?
                .try_into()?,
            counterparty_versions,
            proofs: Proofs::new(
                msg.proof_init.try_into().map_err(Error::invalid_raw_proof)?,
                Some(client_proof),
                Some(consensus_proof),
                None,
                proof_height,
            )
            .map_err(Error::invalid_proof)?,
            delay_period: Duration::from_nanos(msg.delay_period),
            signer: msg.signer.into(),
        })
    }
}

impl From<MsgConnectionOpenTry> for RawMsgConnectionOpenTry {
    fn from(ics_msg: MsgConnectionOpenTry) -> Self {
        let consensus_proof = ics_msg.proofs.consensus_proof();
        RawMsgConnectionOpenTry {
            client_id: ics_msg.client_id.as_str().to_string(),
            client_state: Some(Any::from(ics_msg.client_state)),
            counterparty: Some(ics_msg.counterparty.into()),
            delay_period: ics_msg.delay_period.as_nanos() as u64,
            counterparty_versions: ics_msg
                .counterparty_versions
                .into_iter()
                .map(|v| v.into())
                .collect(),
            proof_height: Some(ics_msg.proofs.height().into()),
            proof_init: ics_msg.proofs.object_proof().clone().into(),
            proof_client: ics_msg
                .proofs
                .client_proof()
                .clone()
                .map_or_else(Vec::new, |v| v.into()),
            proof_consensus: consensus_proof
                .as_ref()
                .map_or_else(Vec::new, |v| v.proof().clone().into()),
            consensus_height: consensus_proof.map(|v| v.height().into()),
            signer: ics_msg.signer.to_string(),
        }
    }
}

#[cfg(test)]
pub mod test_util {
    use ibc_engine_proto::ibc::core::client::v1::Height as RawHeight;
    use ibc_engine_proto::ibc::core::connection::v1::MsgConnectionOpenTry as RawMsgConnectionOpenTry;

    use crate::core::ics02_client::client_state::AnyClientState;
    use crate::core::ics03_connection::connection::test_util::get_dummy_raw_counterparty;
    use crate::core::ics03_connection::version::get_compatible_versions;
    use crate::core::ics24_host::identifier::ClientId;
    use crate::mock::client_state::MockClientState;
    use crate::mock::header::MockHeader;
    use crate::test_utils::{get_dummy_bech32_account, get_dummy_proof};
    use crate::Height;

    /// Returns a dummy `RawMsgConnectionOpenTry` with parametrized heights. The parameter
    /// `proof_height` represents the height, on the source chain, at which this chain produced
    /// the proof. Parameter `consensus_height` represents the height of destination chain which
    /// a client on the source chain stores.
    pub fn get_dummy_raw_msg_conn_open_try(
        proof_height: u64,
        consensus_height: u64,
    ) -> RawMsgConnectionOpenTry {
        let client_state_height = Height::new(0, consensus_height);

        RawMsgConnectionOpenTry {
            client_id: ClientId::default().to_string(),
            client_state: Some(
                AnyClientState::Mock(MockClientState::new(MockHeader::new(client_state_height)))
                    .into(),
            ),
            counterparty: Some(get_dummy_raw_counterparty()),
            delay_period: 0,
            counterparty_versions: get_compatible_versions()
                .iter()
                .map(|v| v.clone().into())
                .collect(),
            proof_init: get_dummy_proof(),
            proof_height: Some(RawHeight {
                revision_number: 0,
                revision_height: proof_height,
            }),
            proof_consensus: get_dummy_proof(),
            consensus_height: Some(RawHeight {
                revision_number: 0,
                revision_height: consensus_height,
            }),
            proof_client: get_dummy_proof(),
            signer: get_dummy_bech32_account(),
        }
    }
}
