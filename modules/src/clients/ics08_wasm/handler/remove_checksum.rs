use tracing::info;

use crate::clients::ics08_wasm::engine::display_checksum;
use crate::clients::ics08_wasm::error::Error;
use crate::clients::ics08_wasm::handler::RemoveChecksumResult;
use crate::clients::ics08_wasm::msgs::MsgRemoveChecksum;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics02_client::events::WasmChecksum;
use crate::core::ics02_client::handler::ClientResult;
use crate::handler::{HandlerOutput, HandlerResult};

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgRemoveChecksum,
) -> HandlerResult<ClientResult, Ics02Error> {
    let mut output = HandlerOutput::builder();

    if !ctx.wasm_engine().contains(&msg.checksum) {
        return Err(Ics02Error::wasm(Error::unknown_checksum(display_checksum(
            &msg.checksum,
        ))));
    }

    info!(checksum = %display_checksum(&msg.checksum), "removing verification module checksum");
    output.log(format!(
        "success: removed checksum {}",
        display_checksum(&msg.checksum)
    ));
    output.emit(
        WasmChecksum {
            height: ctx.host_height(),
            checksum: msg.checksum.clone(),
        }
        .removed(),
    );

    Ok(output.with_result(ClientResult::RemoveChecksum(RemoveChecksumResult {
        checksum: msg.checksum,
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_log::test;

    use super::*;
    use crate::clients::ics08_wasm::engine::checksum;
    use crate::core::ics02_client::context::ClientKeeper;
    use crate::mock::context::MockContext;
    use crate::mock::wasm::MockWasmModule;
    use crate::test_utils::get_dummy_account_id;

    #[test]
    fn removed_checksum_can_no_longer_be_invoked() {
        let code = b"mock module".to_vec();
        let mut ctx =
            MockContext::default().with_wasm_module(code.clone(), Arc::new(MockWasmModule));
        let checksum = checksum(&code);
        assert!(ctx.wasm_engine().module(&checksum).is_ok());

        let msg = MsgRemoveChecksum {
            signer: get_dummy_account_id(),
            checksum: checksum.clone(),
        };
        let output = process(&ctx, msg.clone()).unwrap();
        ctx.store_client_result(output.result).unwrap();

        assert!(!ctx.wasm_engine().contains(&checksum));
        assert!(ctx.wasm_engine().module(&checksum).is_err());

        // A second removal finds nothing to remove.
        assert!(process(&ctx, msg).is_err());
    }
}
