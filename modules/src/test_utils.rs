use crate::core::ics04_channel::msgs::acknowledgement::Acknowledgement;
use crate::core::ics04_channel::packet::Packet;
use crate::core::ics26_routing::context::{Module, ModuleOutputBuilder};
use crate::signer::Signer;

pub fn get_dummy_proof() -> Vec<u8> {
    "Y29uc2Vuc3VzU3RhdGUvaWJjb25lY2xpZW50LzIy"
        .as_bytes()
        .to_vec()
}

pub fn get_dummy_account_id() -> Signer {
    "0CDA3F47EF3C4906693B170EF650EB968C5F4B2C".parse().unwrap()
}

pub fn get_dummy_bech32_account() -> String {
    "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng".to_string()
}

/// Application bound to the transfer port of mock chains. It accepts every handshake and
/// acknowledges every packet with a success.
#[derive(Clone, Copy, Debug, Default)]
pub struct DummyTransferModule;

impl Module for DummyTransferModule {
    fn on_recv_packet(
        &mut self,
        output: &mut ModuleOutputBuilder,
        packet: &Packet,
        _relayer: &Signer,
    ) -> Option<Acknowledgement> {
        output.log(format!("received packet {}", packet.sequence));
        Some(Acknowledgement::success(vec![1]))
    }
}
