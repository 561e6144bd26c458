//! JSON messages exchanged with verification modules. Byte fields travel as
//! base64 strings.

use serde::{Deserialize, Serialize};

use crate::core::ics02_client::client_def::GenesisMetadata;
use crate::core::ics02_client::client_state::Status;
use crate::Height;

/// Sent once, when a client running the module is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstantiateMsg {
    #[serde(with = "crate::serializers::base64")]
    pub client_state: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub consensus_state: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub checksum: Vec<u8>,
}

/// Messages allowed to write to the client store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SudoMsg {
    UpdateState(UpdateStateMsg),
    UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg),
    VerifyMembership(VerifyMembershipMsg),
    VerifyNonMembership(VerifyNonMembershipMsg),
    VerifyUpgradeAndUpdateState(VerifyUpgradeAndUpdateStateMsg),
    MigrateClientStore(MigrateClientStoreMsg),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStateMsg {
    #[serde(with = "crate::serializers::base64")]
    pub client_message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStateOnMisbehaviourMsg {
    #[serde(with = "crate::serializers::base64")]
    pub client_message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyMembershipMsg {
    pub height: Height,
    #[serde(with = "crate::serializers::base64")]
    pub proof: Vec<u8>,
    pub merkle_path: Vec<String>,
    #[serde(with = "crate::serializers::base64")]
    pub value: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyNonMembershipMsg {
    pub height: Height,
    #[serde(with = "crate::serializers::base64")]
    pub proof: Vec<u8>,
    pub merkle_path: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyUpgradeAndUpdateStateMsg {
    #[serde(with = "crate::serializers::base64")]
    pub upgrade_client_state: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub upgrade_consensus_state: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub proof_upgrade_client: Vec<u8>,
    #[serde(with = "crate::serializers::base64")]
    pub proof_upgrade_consensus_state: Vec<u8>,
}

/// Recovery: the store holds the subject's entries under `subject/` and the
/// substitute's under `substitute/`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrateClientStoreMsg {}

/// Read-only messages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    Status(StatusMsg),
    ExportMetadata(ExportMetadataMsg),
    TimestampAtHeight(TimestampAtHeightMsg),
    VerifyClientMessage(VerifyClientMessageMsg),
    CheckForMisbehaviour(CheckForMisbehaviourMsg),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMsg {}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadataMsg {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampAtHeightMsg {
    pub height: Height,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyClientMessageMsg {
    #[serde(with = "crate::serializers::base64")]
    pub client_message: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckForMisbehaviourMsg {
    #[serde(with = "crate::serializers::base64")]
    pub client_message: Vec<u8>,
}

/// Result of messages that only succeed or fail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyResult {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStateResult {
    pub heights: Vec<Height>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    pub status: Status,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadataResult {
    pub genesis_metadata: Vec<GenesisMetadata>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampAtHeightResult {
    pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckForMisbehaviourResult {
    pub found_misbehaviour: bool,
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn sudo_messages_are_tagged_in_snake_case() {
        let msg = SudoMsg::UpdateState(UpdateStateMsg {
            client_message: b"header".to_vec(),
        });
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"update_state":{"client_message":"aGVhZGVy"}}"#);

        let decoded: SudoMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn status_query_and_result() {
        let json = serde_json::to_string(&QueryMsg::Status(StatusMsg {})).unwrap();
        assert_eq!(json, r#"{"status":{}}"#);

        let result: StatusResult = serde_json::from_str(r#"{"status":"Frozen"}"#).unwrap();
        assert_eq!(result.status, Status::Frozen);
    }
}
