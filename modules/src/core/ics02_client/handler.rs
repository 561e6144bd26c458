//! This module implements the processing logic for ICS2 (client abstractions and functions) msgs.

use crate::clients::ics08_wasm::handler as wasm_handler;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::msgs::ClientMsg;
use crate::handler::HandlerOutput;

pub mod create_client;
pub mod misbehaviour;
pub mod recover_client;
pub mod update_client;
pub mod upgrade_client;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientResult {
    Create(create_client::Result),
    Update(update_client::Result),
    Upgrade(upgrade_client::Result),
    Recover(recover_client::Result),
    StoreCode(wasm_handler::StoreCodeResult),
    RemoveChecksum(wasm_handler::RemoveChecksumResult),
    Migrate(wasm_handler::MigrateContractResult),
}

/// General entry point for processing any message related to ICS2 (client functions) protocols.
pub fn dispatch<Ctx>(ctx: &Ctx, msg: ClientMsg) -> Result<HandlerOutput<ClientResult>, Error>
where
    Ctx: ClientReader,
{
    match msg {
        ClientMsg::CreateClient(msg) => create_client::process(ctx, msg),
        ClientMsg::UpdateClient(msg) => update_client::process(ctx, msg),
        ClientMsg::Misbehaviour(msg) => misbehaviour::process(ctx, msg),
        ClientMsg::UpgradeClient(msg) => upgrade_client::process(ctx, msg),
        ClientMsg::RecoverClient(msg) => recover_client::process(ctx, msg),
        ClientMsg::StoreCode(msg) => wasm_handler::store_code::process(ctx, msg),
        ClientMsg::RemoveChecksum(msg) => wasm_handler::remove_checksum::process(ctx, msg),
        ClientMsg::MigrateContract(msg) => wasm_handler::migrate_contract::process(ctx, msg),
    }
}
