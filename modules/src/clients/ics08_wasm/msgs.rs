//! Governance messages managing the verification modules of wasm clients.

use ibc_engine_proto::ibc::lightclients::wasm::v1::{
    MsgMigrateContract as RawMsgMigrateContract, MsgRemoveChecksum as RawMsgRemoveChecksum,
    MsgStoreCode as RawMsgStoreCode,
};
use ibc_engine_proto::Protobuf;

use crate::clients::ics08_wasm::error::Error;
use crate::core::ics24_host::identifier::ClientId;
use crate::signer::Signer;
use crate::tx_msg::Msg;

pub const STORE_CODE_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.MsgStoreCode";
pub const REMOVE_CHECKSUM_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.MsgRemoveChecksum";
pub const MIGRATE_CONTRACT_TYPE_URL: &str = "/ibc.lightclients.wasm.v1.MsgMigrateContract";

/// Stores the code of a verification module and allow-lists its checksum.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgStoreCode {
    pub signer: Signer,
    pub wasm_byte_code: Vec<u8>,
}

impl Msg for MsgStoreCode {
    type Raw = RawMsgStoreCode;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        STORE_CODE_TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgStoreCode> for MsgStoreCode {}

impl TryFrom<RawMsgStoreCode> for MsgStoreCode {
    type Error = Error;

    fn try_from(raw: RawMsgStoreCode) -> Result<Self, Self::Error> {
        if raw.wasm_byte_code.is_empty() {
            return Err(Error::empty_code());
        }
        Ok(Self {
            signer: raw.signer.into(),
            wasm_byte_code: raw.wasm_byte_code,
        })
    }
}

impl From<MsgStoreCode> for RawMsgStoreCode {
    fn from(msg: MsgStoreCode) -> Self {
        RawMsgStoreCode {
            signer: msg.signer.to_string(),
            wasm_byte_code: msg.wasm_byte_code,
        }
    }
}

/// Removes a checksum from the allow-list. Clients already running the
/// module can no longer be invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRemoveChecksum {
    pub signer: Signer,
    pub checksum: Vec<u8>,
}

impl Msg for MsgRemoveChecksum {
    type Raw = RawMsgRemoveChecksum;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        REMOVE_CHECKSUM_TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgRemoveChecksum> for MsgRemoveChecksum {}

impl TryFrom<RawMsgRemoveChecksum> for MsgRemoveChecksum {
    type Error = Error;

    fn try_from(raw: RawMsgRemoveChecksum) -> Result<Self, Self::Error> {
        Ok(Self {
            signer: raw.signer.into(),
            checksum: raw.checksum,
        })
    }
}

impl From<MsgRemoveChecksum> for RawMsgRemoveChecksum {
    fn from(msg: MsgRemoveChecksum) -> Self {
        RawMsgRemoveChecksum {
            signer: msg.signer.to_string(),
            checksum: msg.checksum,
        }
    }
}

/// Switches a wasm client to another allow-listed verification module,
/// passing `msg` to the new module's migration entry point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgMigrateContract {
    pub signer: Signer,
    pub client_id: ClientId,
    pub checksum: Vec<u8>,
    pub msg: Vec<u8>,
}

impl Msg for MsgMigrateContract {
    type Raw = RawMsgMigrateContract;

    fn route(&self) -> String {
        crate::keys::ROUTER_KEY.to_string()
    }

    fn type_url(&self) -> String {
        MIGRATE_CONTRACT_TYPE_URL.to_string()
    }
}

impl Protobuf<RawMsgMigrateContract> for MsgMigrateContract {}

impl TryFrom<RawMsgMigrateContract> for MsgMigrateContract {
    type Error = Error;

    fn try_from(raw: RawMsgMigrateContract) -> Result<Self, Self::Error> {
        Ok(Self {
            signer: raw.signer.into(),
            client_id: raw
                .client_id
                .parse()
                .map_err(Error::invalid_client_identifier)?,
            checksum: raw.checksum,
            msg: raw.msg,
        })
    }
}

impl From<MsgMigrateContract> for RawMsgMigrateContract {
    fn from(msg: MsgMigrateContract) -> Self {
        RawMsgMigrateContract {
            signer: msg.signer.to_string(),
            client_id: msg.client_id.to_string(),
            checksum: msg.checksum,
            msg: msg.msg,
        }
    }
}
