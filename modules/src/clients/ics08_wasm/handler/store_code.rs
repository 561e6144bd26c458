use tracing::info;

use crate::clients::ics08_wasm::engine::{checksum, display_checksum};
use crate::clients::ics08_wasm::error::Error;
use crate::clients::ics08_wasm::handler::StoreCodeResult;
use crate::clients::ics08_wasm::msgs::MsgStoreCode;
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error as Ics02Error;
use crate::core::ics02_client::events::WasmChecksum;
use crate::core::ics02_client::handler::ClientResult;
use crate::handler::{HandlerOutput, HandlerResult};

pub fn process(
    ctx: &dyn ClientReader,
    msg: MsgStoreCode,
) -> HandlerResult<ClientResult, Ics02Error> {
    let mut output = HandlerOutput::builder();

    let checksum = checksum(&msg.wasm_byte_code);
    if ctx.wasm_engine().contains(&checksum) {
        return Err(Ics02Error::wasm(Error::checksum_already_exists(
            display_checksum(&checksum),
        )));
    }

    info!(checksum = %display_checksum(&checksum), "storing verification module code");
    output.log(format!(
        "success: stored code with checksum {}",
        display_checksum(&checksum)
    ));
    output.emit(
        WasmChecksum {
            height: ctx.host_height(),
            checksum: checksum.clone(),
        }
        .stored(),
    );

    Ok(output.with_result(ClientResult::StoreCode(StoreCodeResult {
        checksum,
        code: msg.wasm_byte_code,
    })))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::clients::ics08_wasm::error::ErrorDetail as WasmErrorDetail;
    use crate::core::ics02_client::context::ClientKeeper;
    use crate::core::ics02_client::error::ErrorDetail;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::test_utils::get_dummy_account_id;

    #[test]
    fn store_code_allow_lists_the_checksum() {
        let mut ctx = MockContext::default();
        let msg = MsgStoreCode {
            signer: get_dummy_account_id(),
            wasm_byte_code: b"light client code".to_vec(),
        };

        let output = process(&ctx, msg.clone()).unwrap();
        assert!(matches!(output.events[0], IbcEvent::StoreWasmCode(_)));
        ctx.store_client_result(output.result).unwrap();

        let expected = checksum(b"light client code");
        assert!(ctx.wasm_engine().contains(&expected));
        assert_eq!(
            ctx.wasm_engine().code(&expected),
            Some(&b"light client code"[..])
        );

        let err = process(&ctx, msg).unwrap_err();
        match err.detail() {
            ErrorDetail::Wasm(e) => assert!(matches!(
                &e.source,
                WasmErrorDetail::ChecksumAlreadyExists(_)
            )),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
