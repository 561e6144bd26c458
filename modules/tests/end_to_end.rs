//! Two mock chains talking to each other through their relayer interface only: every message
//! is encoded, delivered as a transaction, and backed by Merkle proofs of the sender's store.

use core::time::Duration;
use std::sync::Arc;

use ibc_engine_proto::google::protobuf::Any;
use test_log::test;

use ibc_engine::clients::ics08_wasm::engine::checksum;
use ibc_engine::core::ics02_client::client_state::ClientState;
use ibc_engine::core::ics02_client::client_type::ClientType;
use ibc_engine::core::ics02_client::context::ClientReader;
use ibc_engine::core::ics02_client::msgs::create_client::MsgCreateClient;
use ibc_engine::core::ics02_client::msgs::ClientMsg;
use ibc_engine::core::ics03_connection::connection::{
    Counterparty as ConnectionCounterparty, State as ConnectionState,
};
use ibc_engine::core::ics03_connection::context::ConnectionReader;
use ibc_engine::core::ics03_connection::msgs::conn_open_ack::MsgConnectionOpenAck;
use ibc_engine::core::ics03_connection::msgs::conn_open_confirm::MsgConnectionOpenConfirm;
use ibc_engine::core::ics03_connection::msgs::conn_open_init::MsgConnectionOpenInit;
use ibc_engine::core::ics03_connection::msgs::conn_open_try::MsgConnectionOpenTry;
use ibc_engine::core::ics03_connection::version::get_compatible_versions;
use ibc_engine::core::ics04_channel::channel::{
    ChannelEnd, Counterparty as ChannelCounterparty, Order, State as ChannelState,
};
use ibc_engine::core::ics04_channel::context::ChannelReader;
use ibc_engine::core::ics04_channel::msgs::acknowledgement::{Acknowledgement, MsgAcknowledgement};
use ibc_engine::core::ics04_channel::msgs::chan_open_ack::MsgChannelOpenAck;
use ibc_engine::core::ics04_channel::msgs::chan_open_confirm::MsgChannelOpenConfirm;
use ibc_engine::core::ics04_channel::msgs::chan_open_init::MsgChannelOpenInit;
use ibc_engine::core::ics04_channel::msgs::chan_open_try::MsgChannelOpenTry;
use ibc_engine::core::ics04_channel::msgs::recv_packet::MsgRecvPacket;
use ibc_engine::core::ics04_channel::msgs::timeout::MsgTimeout;
use ibc_engine::core::ics04_channel::packet::Packet;
use ibc_engine::core::ics04_channel::timeout::TimeoutHeight;
use ibc_engine::core::ics04_channel::version::Version;
use ibc_engine::core::ics23_commitment::commitment::CommitmentProofBytes;
use ibc_engine::core::ics24_host::identifier::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use ibc_engine::core::ics24_host::path::Path;
use ibc_engine::core::ics26_routing::handler::send_packet;
use ibc_engine::events::IbcEvent;
use ibc_engine::mock::client_state::{MockClientState, MockConsensusState};
use ibc_engine::mock::context::MockContext;
use ibc_engine::mock::wasm::{wasm_client_state, wasm_consensus_state, MockWasmModule};
use ibc_engine::proofs::{ConsensusProof, Proofs};
use ibc_engine::relayer::ics18_relayer::context::Ics18Context;
use ibc_engine::relayer::ics18_relayer::error::ErrorDetail as RelayerErrorDetail;
use ibc_engine::relayer::ics18_relayer::utils::build_client_update_datagram;
use ibc_engine::timestamp::Timestamp;
use ibc_engine::tx_msg::Msg;
use ibc_engine::Height;

fn chain(name: &str) -> MockContext {
    MockContext::new(ChainId::new(name.to_string(), 0), 64, Height::new(0, 10))
        .with_port_capability(PortId::transfer())
}

fn submit(ctx: &mut MockContext, msgs: Vec<Any>) -> Vec<IbcEvent> {
    match ctx.send(msgs) {
        Ok(events) => events,
        Err(e) => panic!("transaction rejected by {}: {}", ctx.host_chain_id(), e),
    }
}

/// Brings the client of `src` living on `dst` to the head of `src`. Returns the height proofs
/// from `src` are to be taken at.
fn update_client(src: &MockContext, dst: &mut MockContext, client_id: &ClientId) -> Height {
    let header = src.query_latest_header().unwrap();
    match build_client_update_datagram(dst, client_id, header) {
        Ok(ClientMsg::UpdateClient(msg)) => {
            submit(dst, vec![msg.to_any()]);
        }
        Err(e) if matches!(e.detail(), RelayerErrorDetail::ClientAlreadyUpToDate(_)) => {}
        other => panic!("cannot update client {client_id}: {other:?}"),
    }
    src.query_latest_height()
}

fn proof(ctx: &MockContext, path: Path, height: Height) -> CommitmentProofBytes {
    ctx.query_proof(&path, height).unwrap()
}

fn object_proofs(ctx: &MockContext, path: Path, height: Height) -> Proofs {
    Proofs::new(proof(ctx, path, height), None, None, None, height).unwrap()
}

/// Proofs of a connection end, of the client it is bound to, and of the latest consensus
/// state of that client.
fn handshake_proofs(
    ctx: &MockContext,
    connection_id: &ConnectionId,
    client_id: &ClientId,
    height: Height,
) -> Proofs {
    let consensus_height = ctx.client_state(client_id).unwrap().latest_height();
    let consensus_proof = proof(
        ctx,
        Path::ClientConsensusState {
            client_id: client_id.clone(),
            height: consensus_height,
        },
        height,
    );
    Proofs::new(
        proof(ctx, Path::Connections(connection_id.clone()), height),
        Some(proof(ctx, Path::ClientState(client_id.clone()), height)),
        Some(ConsensusProof::new(consensus_proof, consensus_height).unwrap()),
        None,
        height,
    )
    .unwrap()
}

fn create_client(host: &mut MockContext, counterparty: &MockContext) -> ClientId {
    let header = counterparty.latest_header();
    let msg = MsgCreateClient::new(
        MockClientState::new(header.clone()).into(),
        MockConsensusState::new(header).into(),
        host.signer(),
    )
    .unwrap();
    submit(host, vec![msg.to_any()])
        .iter()
        .find_map(|event| match event {
            IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
            _ => None,
        })
        .unwrap()
}

fn transfer_channel(
    state: ChannelState,
    order: Order,
    remote: Option<ChannelId>,
    connection: &ConnectionId,
) -> ChannelEnd {
    ChannelEnd::new(
        state,
        order,
        ChannelCounterparty::new(PortId::transfer(), remote),
        vec![connection.clone()],
        Version::new("ics20-1".to_string()),
    )
}

/// Two chains with clients of each other, an open connection and an open transfer channel,
/// all set up through handshakes.
struct Chains {
    a: MockContext,
    b: MockContext,
    /// Client of B on A.
    client_a: ClientId,
    /// Client of A on B.
    client_b: ClientId,
    chan_a: ChannelId,
    chan_b: ChannelId,
}

impl Chains {
    fn connect() -> Self {
        Self::connect_with(Order::Unordered)
    }

    fn connect_with(order: Order) -> Self {
        let mut a = chain("chaina");
        let mut b = chain("chainb");

        let client_a = create_client(&mut a, &b);
        let client_b = create_client(&mut b, &a);

        // Connection handshake.
        let init = MsgConnectionOpenInit {
            client_id: client_a.clone(),
            counterparty: ConnectionCounterparty::new(client_b.clone(), None, b.commitment_prefix()),
            version: None,
            delay_period: Duration::ZERO,
            signer: a.signer(),
        };
        let conn_a = submit(&mut a, vec![init.to_any()])
            .iter()
            .find_map(|event| match event {
                IbcEvent::OpenInitConnection(e) => e.connection_id().cloned(),
                _ => None,
            })
            .unwrap();

        let height = update_client(&a, &mut b, &client_b);
        let open_try = MsgConnectionOpenTry {
            client_id: client_b.clone(),
            client_state: a.client_state(&client_a).unwrap(),
            counterparty: ConnectionCounterparty::new(
                client_a.clone(),
                Some(conn_a.clone()),
                a.commitment_prefix(),
            ),
            counterparty_versions: get_compatible_versions(),
            proofs: handshake_proofs(&a, &conn_a, &client_a, height),
            delay_period: Duration::ZERO,
            signer: b.signer(),
        };
        let conn_b = submit(&mut b, vec![open_try.to_any()])
            .iter()
            .find_map(|event| match event {
                IbcEvent::OpenTryConnection(e) => e.connection_id().cloned(),
                _ => None,
            })
            .unwrap();

        let height = update_client(&b, &mut a, &client_a);
        let open_ack = MsgConnectionOpenAck {
            connection_id: conn_a.clone(),
            counterparty_connection_id: conn_b.clone(),
            client_state: b.client_state(&client_b).unwrap(),
            proofs: handshake_proofs(&b, &conn_b, &client_b, height),
            version: b.connection_end(&conn_b).unwrap().versions()[0].clone(),
            signer: a.signer(),
        };
        submit(&mut a, vec![open_ack.to_any()]);

        let height = update_client(&a, &mut b, &client_b);
        let open_confirm = MsgConnectionOpenConfirm {
            connection_id: conn_b.clone(),
            proofs: object_proofs(&a, Path::Connections(conn_a.clone()), height),
            signer: b.signer(),
        };
        submit(&mut b, vec![open_confirm.to_any()]);

        assert_eq!(a.connection_end(&conn_a).unwrap().state(), &ConnectionState::Open);
        assert_eq!(b.connection_end(&conn_b).unwrap().state(), &ConnectionState::Open);

        // Channel handshake.
        let init = MsgChannelOpenInit::new(
            PortId::transfer(),
            transfer_channel(ChannelState::Init, order, None, &conn_a),
            a.signer(),
        );
        let chan_a = submit(&mut a, vec![init.to_any()])
            .iter()
            .find_map(|event| match event {
                IbcEvent::OpenInitChannel(e) => e.channel_id().copied(),
                _ => None,
            })
            .unwrap();

        let height = update_client(&a, &mut b, &client_b);
        let open_try = MsgChannelOpenTry::new(
            PortId::transfer(),
            transfer_channel(ChannelState::TryOpen, order, Some(chan_a), &conn_b),
            Version::new("ics20-1".to_string()),
            object_proofs(&a, Path::ChannelEnds(PortId::transfer(), chan_a), height),
            b.signer(),
        );
        let chan_b = submit(&mut b, vec![open_try.to_any()])
            .iter()
            .find_map(|event| match event {
                IbcEvent::OpenTryChannel(e) => e.channel_id().copied(),
                _ => None,
            })
            .unwrap();

        let height = update_client(&b, &mut a, &client_a);
        let open_ack = MsgChannelOpenAck::new(
            PortId::transfer(),
            chan_a,
            chan_b,
            Version::new("ics20-1".to_string()),
            object_proofs(&b, Path::ChannelEnds(PortId::transfer(), chan_b), height),
            a.signer(),
        );
        submit(&mut a, vec![open_ack.to_any()]);

        let height = update_client(&a, &mut b, &client_b);
        let open_confirm = MsgChannelOpenConfirm::new(
            PortId::transfer(),
            chan_b,
            object_proofs(&a, Path::ChannelEnds(PortId::transfer(), chan_a), height),
            b.signer(),
        );
        submit(&mut b, vec![open_confirm.to_any()]);

        assert_eq!(
            a.channel_end(&(PortId::transfer(), chan_a)).unwrap().state(),
            &ChannelState::Open
        );
        assert_eq!(
            b.channel_end(&(PortId::transfer(), chan_b)).unwrap().state(),
            &ChannelState::Open
        );

        Chains {
            a,
            b,
            client_a,
            client_b,
            chan_a,
            chan_b,
        }
    }

    fn packet(&self, timeout_height: TimeoutHeight, timeout_timestamp: Timestamp) -> Packet {
        Packet {
            sequence: self
                .a
                .get_next_sequence_send(&(PortId::transfer(), self.chan_a))
                .unwrap(),
            source_port: PortId::transfer(),
            source_channel: self.chan_a,
            destination_port: PortId::transfer(),
            destination_channel: self.chan_b,
            data: b"hello".to_vec(),
            timeout_height,
            timeout_timestamp,
        }
    }

    /// Sends `packet` from A, in a block of its own.
    fn send_from_a(&mut self, packet: &Packet) {
        let capability = self
            .a
            .channel_capability(&PortId::transfer(), &self.chan_a)
            .unwrap();
        let sequence = send_packet(&mut self.a, &capability, packet.clone())
            .unwrap()
            .result;
        assert_eq!(sequence, packet.sequence);
        self.a.advance_host_chain_height();
    }

    fn commitment_on_a(&self, packet: &Packet) -> bool {
        self.a
            .get_packet_commitment(&(PortId::transfer(), self.chan_a, packet.sequence))
            .is_ok()
    }
}

#[test]
fn packet_is_received_and_acknowledged() {
    let mut chains = Chains::connect();
    let timeout = (chains.b.host_timestamp() + Duration::from_secs(3600)).unwrap();
    let packet = chains.packet(TimeoutHeight::Never, timeout);
    chains.send_from_a(&packet);
    assert!(chains.commitment_on_a(&packet));

    let height = update_client(&chains.a, &mut chains.b, &chains.client_b);
    let recv = MsgRecvPacket::new(
        packet.clone(),
        object_proofs(
            &chains.a,
            Path::Commitments {
                port_id: PortId::transfer(),
                channel_id: chains.chan_a,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.b.signer(),
    );
    let events = submit(&mut chains.b, vec![recv.to_any()]);
    assert!(events
        .iter()
        .any(|e| matches!(e, IbcEvent::ReceivePacket(_))));
    assert!(events
        .iter()
        .any(|e| matches!(e, IbcEvent::WriteAcknowledgement(_))));
    assert!(chains
        .b
        .get_packet_receipt(&(PortId::transfer(), chains.chan_b, packet.sequence))
        .is_ok());

    // Relaying the same packet again changes nothing.
    let duplicate = submit(&mut chains.b, vec![recv.to_any()]);
    assert!(!duplicate
        .iter()
        .any(|e| matches!(e, IbcEvent::WriteAcknowledgement(_))));

    let height = update_client(&chains.b, &mut chains.a, &chains.client_a);
    let ack = MsgAcknowledgement::new(
        packet.clone(),
        Acknowledgement::success(vec![1]),
        object_proofs(
            &chains.b,
            Path::Acks {
                port_id: PortId::transfer(),
                channel_id: chains.chan_b,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.a.signer(),
    );
    let events = submit(&mut chains.a, vec![ack.to_any()]);
    assert!(events
        .iter()
        .any(|e| matches!(e, IbcEvent::AcknowledgePacket(_))));
    assert!(!chains.commitment_on_a(&packet));
}

#[test]
fn ordered_packet_advances_the_receive_sequence() {
    let mut chains = Chains::connect_with(Order::Ordered);
    let timeout = (chains.b.host_timestamp() + Duration::from_secs(3600)).unwrap();
    let packet = chains.packet(TimeoutHeight::Never, timeout);
    assert_eq!(packet.sequence, 1.into());
    chains.send_from_a(&packet);

    let height = update_client(&chains.a, &mut chains.b, &chains.client_b);
    let recv = MsgRecvPacket::new(
        packet.clone(),
        object_proofs(
            &chains.a,
            Path::Commitments {
                port_id: PortId::transfer(),
                channel_id: chains.chan_a,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.b.signer(),
    );
    let events = submit(&mut chains.b, vec![recv.to_any()]);
    assert!(events
        .iter()
        .any(|e| matches!(e, IbcEvent::ReceivePacket(_))));
    assert_eq!(
        chains
            .b
            .get_next_sequence_recv(&(PortId::transfer(), chains.chan_b))
            .unwrap(),
        2.into()
    );

    // A stale relay of the same packet is accepted and leaves the sequence alone.
    submit(&mut chains.b, vec![recv.to_any()]);
    assert_eq!(
        chains
            .b
            .get_next_sequence_recv(&(PortId::transfer(), chains.chan_b))
            .unwrap(),
        2.into()
    );

    let height = update_client(&chains.b, &mut chains.a, &chains.client_a);
    let ack = MsgAcknowledgement::new(
        packet.clone(),
        Acknowledgement::success(vec![1]),
        object_proofs(
            &chains.b,
            Path::Acks {
                port_id: PortId::transfer(),
                channel_id: chains.chan_b,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.a.signer(),
    );
    submit(&mut chains.a, vec![ack.to_any()]);
    assert!(!chains.commitment_on_a(&packet));
    assert_eq!(
        chains
            .a
            .get_next_sequence_ack(&(PortId::transfer(), chains.chan_a))
            .unwrap(),
        2.into()
    );
}

#[test]
fn packet_times_out() {
    let mut chains = Chains::connect();
    let timeout_height = chains.b.host_height().add(2);
    let packet = chains.packet(TimeoutHeight::At(timeout_height), Timestamp::none());
    chains.send_from_a(&packet);

    chains.b.advance_host_chain_height();
    chains.b.advance_host_chain_height();

    // B is past the timeout: the packet can no longer be received there.
    let height = update_client(&chains.a, &mut chains.b, &chains.client_b);
    let recv = MsgRecvPacket::new(
        packet.clone(),
        object_proofs(
            &chains.a,
            Path::Commitments {
                port_id: PortId::transfer(),
                channel_id: chains.chan_a,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.b.signer(),
    );
    let b_height = chains.b.host_height();
    assert!(chains.b.send(vec![recv.to_any()]).is_err());
    assert_eq!(chains.b.host_height(), b_height);

    let height = update_client(&chains.b, &mut chains.a, &chains.client_a);
    assert!(height >= timeout_height);
    let timeout = MsgTimeout::new(
        packet.clone(),
        packet.sequence,
        object_proofs(
            &chains.b,
            Path::Receipts {
                port_id: PortId::transfer(),
                channel_id: chains.chan_b,
                sequence: packet.sequence,
            },
            height,
        ),
        chains.a.signer(),
    );
    let events = submit(&mut chains.a, vec![timeout.to_any()]);
    assert!(events
        .iter()
        .any(|e| matches!(e, IbcEvent::TimeoutPacket(_))));
    assert!(!chains.commitment_on_a(&packet));
}

#[test]
fn wasm_client_needs_an_allowed_checksum() {
    let code = b"mock light client".to_vec();
    let counterparty = chain("chainb");
    let header = counterparty.latest_header();
    let client_state = MockClientState::new(header.clone());
    let consensus_state = wasm_consensus_state(&MockConsensusState::new(header));

    let mut host = chain("chaina");
    let unknown = MsgCreateClient::new(
        wasm_client_state(&client_state, checksum(b"other code")).into(),
        consensus_state.clone().into(),
        host.signer(),
    )
    .unwrap();
    let height = host.host_height();
    assert!(host.send(vec![unknown.to_any()]).is_err());
    assert_eq!(host.host_height(), height);

    let mut host = host.with_wasm_module(code.clone(), Arc::new(MockWasmModule));
    let allowed = MsgCreateClient::new(
        wasm_client_state(&client_state, checksum(&code)).into(),
        consensus_state.into(),
        host.signer(),
    )
    .unwrap();
    let client_id = submit(&mut host, vec![allowed.to_any()])
        .iter()
        .find_map(|event| match event {
            IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(host.client_type(&client_id).unwrap(), ClientType::Wasm);
}
