use ibc_engine_proto::google::protobuf::Any;
use ibc_engine_proto::Protobuf;

use crate::clients::ics08_wasm::msgs as wasm_msgs;
use crate::core::ics02_client::msgs::{
    create_client, misbehaviour, recover_client, update_client, upgrade_client, ClientMsg,
};
use crate::core::ics03_connection::msgs::{
    conn_open_ack, conn_open_confirm, conn_open_init, conn_open_try, ConnectionMsg,
};
use crate::core::ics04_channel::msgs::{
    acknowledgement, chan_close_confirm, chan_close_init, chan_open_ack, chan_open_confirm,
    chan_open_init, chan_open_try, recv_packet, timeout, timeout_on_close, ChannelMsg, PacketMsg,
};
use crate::core::ics26_routing::error::Error;

/// Enumeration of all messages that the local ICS26 module is capable of routing.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug)]
pub enum Ics26Envelope {
    Ics2Msg(ClientMsg),
    Ics3Msg(ConnectionMsg),
    Ics4ChannelMsg(ChannelMsg),
    Ics4PacketMsg(PacketMsg),
}

impl TryFrom<Any> for Ics26Envelope {
    type Error = Error;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        let value = any_msg.value.as_slice();
        match any_msg.type_url.as_str() {
            // ICS2 messages
            create_client::TYPE_URL => create_client::MsgCreateClient::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::CreateClient(m)))
                .map_err(Error::malformed_message_bytes),
            update_client::TYPE_URL => update_client::MsgUpdateClient::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::UpdateClient(m)))
                .map_err(Error::malformed_message_bytes),
            misbehaviour::TYPE_URL => misbehaviour::MsgSubmitMisbehaviour::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::Misbehaviour(m)))
                .map_err(Error::malformed_message_bytes),
            upgrade_client::TYPE_URL => upgrade_client::MsgUpgradeClient::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::UpgradeClient(m)))
                .map_err(Error::malformed_message_bytes),
            recover_client::TYPE_URL => recover_client::MsgRecoverClient::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::RecoverClient(m)))
                .map_err(Error::malformed_message_bytes),
            wasm_msgs::STORE_CODE_TYPE_URL => wasm_msgs::MsgStoreCode::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::StoreCode(m)))
                .map_err(Error::malformed_message_bytes),
            wasm_msgs::REMOVE_CHECKSUM_TYPE_URL => wasm_msgs::MsgRemoveChecksum::decode_vec(value)
                .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::RemoveChecksum(m)))
                .map_err(Error::malformed_message_bytes),
            wasm_msgs::MIGRATE_CONTRACT_TYPE_URL => {
                wasm_msgs::MsgMigrateContract::decode_vec(value)
                    .map(|m| Ics26Envelope::Ics2Msg(ClientMsg::MigrateContract(m)))
                    .map_err(Error::malformed_message_bytes)
            }

            // ICS03
            conn_open_init::TYPE_URL => conn_open_init::MsgConnectionOpenInit::decode_vec(value)
                .map(|m| Ics26Envelope::Ics3Msg(ConnectionMsg::ConnectionOpenInit(m)))
                .map_err(Error::malformed_message_bytes),
            conn_open_try::TYPE_URL => conn_open_try::MsgConnectionOpenTry::decode_vec(value)
                .map(|m| Ics26Envelope::Ics3Msg(ConnectionMsg::ConnectionOpenTry(m)))
                .map_err(Error::malformed_message_bytes),
            conn_open_ack::TYPE_URL => conn_open_ack::MsgConnectionOpenAck::decode_vec(value)
                .map(|m| Ics26Envelope::Ics3Msg(ConnectionMsg::ConnectionOpenAck(m)))
                .map_err(Error::malformed_message_bytes),
            conn_open_confirm::TYPE_URL => {
                conn_open_confirm::MsgConnectionOpenConfirm::decode_vec(value)
                    .map(|m| Ics26Envelope::Ics3Msg(ConnectionMsg::ConnectionOpenConfirm(m)))
                    .map_err(Error::malformed_message_bytes)
            }

            // ICS04 channel messages
            chan_open_init::TYPE_URL => chan_open_init::MsgChannelOpenInit::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenInit(m)))
                .map_err(Error::malformed_message_bytes),
            chan_open_try::TYPE_URL => chan_open_try::MsgChannelOpenTry::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenTry(m)))
                .map_err(Error::malformed_message_bytes),
            chan_open_ack::TYPE_URL => chan_open_ack::MsgChannelOpenAck::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenAck(m)))
                .map_err(Error::malformed_message_bytes),
            chan_open_confirm::TYPE_URL => {
                chan_open_confirm::MsgChannelOpenConfirm::decode_vec(value)
                    .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenConfirm(m)))
                    .map_err(Error::malformed_message_bytes)
            }
            chan_close_init::TYPE_URL => chan_close_init::MsgChannelCloseInit::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelCloseInit(m)))
                .map_err(Error::malformed_message_bytes),
            chan_close_confirm::TYPE_URL => {
                chan_close_confirm::MsgChannelCloseConfirm::decode_vec(value)
                    .map(|m| Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelCloseConfirm(m)))
                    .map_err(Error::malformed_message_bytes)
            }

            // ICS04 packet messages
            recv_packet::TYPE_URL => recv_packet::MsgRecvPacket::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4PacketMsg(PacketMsg::RecvPacket(m)))
                .map_err(Error::malformed_message_bytes),
            acknowledgement::TYPE_URL => acknowledgement::MsgAcknowledgement::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4PacketMsg(PacketMsg::AckPacket(m)))
                .map_err(Error::malformed_message_bytes),
            timeout::TYPE_URL => timeout::MsgTimeout::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4PacketMsg(PacketMsg::ToPacket(m)))
                .map_err(Error::malformed_message_bytes),
            timeout_on_close::TYPE_URL => timeout_on_close::MsgTimeoutOnClose::decode_vec(value)
                .map(|m| Ics26Envelope::Ics4PacketMsg(PacketMsg::ToClosePacket(m)))
                .map_err(Error::malformed_message_bytes),

            _ => Err(Error::unknown_message_type_url(any_msg.type_url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_engine_proto::google::protobuf::Any;
    use test_log::test;

    use crate::core::ics04_channel::msgs::chan_open_init::test_util::get_dummy_raw_msg_chan_open_init;
    use crate::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
    use crate::core::ics04_channel::msgs::ChannelMsg;
    use crate::core::ics26_routing::error::ErrorDetail;
    use crate::core::ics26_routing::msgs::Ics26Envelope;
    use crate::tx_msg::Msg;

    #[test]
    fn envelope_from_any() {
        let msg = MsgChannelOpenInit::try_from(get_dummy_raw_msg_chan_open_init()).unwrap();
        let envelope = Ics26Envelope::try_from(msg.to_any()).unwrap();
        assert!(matches!(
            envelope,
            Ics26Envelope::Ics4ChannelMsg(ChannelMsg::ChannelOpenInit(m)) if m == msg
        ));

        let unknown = Any {
            type_url: "/ibc.unknown.v1.Msg".to_string(),
            value: vec![],
        };
        let err = Ics26Envelope::try_from(unknown).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::UnknownMessageTypeUrl(_)));

        let garbage = Any {
            type_url: msg.type_url(),
            value: vec![0xff, 0xff, 0xff],
        };
        let err = Ics26Envelope::try_from(garbage).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::MalformedMessageBytes(_)));
    }
}
