//! Protocol logic specific to processing ICS3 messages of type `MsgConnectionOpenConfirm`.

use tracing::debug;

use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::events::Attributes;
use crate::core::ics03_connection::handler::verify::verify_connection_proof;
use crate::core::ics03_connection::handler::{ConnectionIdState, ConnectionResult};
use crate::core::ics03_connection::msgs::conn_open_confirm::MsgConnectionOpenConfirm;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};

pub(crate) fn process<Ctx: ConnectionReader>(
    ctx: &Ctx,
    msg: MsgConnectionOpenConfirm,
) -> HandlerResult<ConnectionResult, Error> {
    let mut output = HandlerOutput::builder();

    // Validate the connection end.
    let mut conn_end = ctx.connection_end(&msg.connection_id)?;
    if !conn_end.state_matches(&State::TryOpen) {
        return Err(Error::connection_state_mismatch(
            msg.connection_id.clone(),
            State::TryOpen,
            *conn_end.state(),
        ));
    }

    // Verify proofs. Assemble the connection end as we expect to find it on the counterparty.
    let expected_conn = ConnectionEnd::new(
        State::Open,
        conn_end.counterparty().client_id().clone(),
        Counterparty::new(
            conn_end.client_id().clone(),
            Some(msg.connection_id.clone()),
            ctx.commitment_prefix(),
        ),
        conn_end.versions().to_vec(),
        conn_end.delay_period(),
    );

    verify_connection_proof(
        ctx,
        msg.proofs.height(),
        &conn_end,
        &expected_conn,
        msg.proofs.object_proof(),
    )?;

    conn_end.set_state(State::Open);

    debug!(connection_id = %msg.connection_id, "connection open confirm");
    output.log("success: connection verification passed");

    let event_attributes = Attributes {
        height: ctx.host_height(),
        connection_id: Some(msg.connection_id.clone()),
        client_id: conn_end.client_id().clone(),
        counterparty_connection_id: conn_end.counterparty().connection_id().cloned(),
        counterparty_client_id: conn_end.counterparty().client_id().clone(),
    };
    output.emit(IbcEvent::OpenConfirmConnection(event_attributes.into()));

    let result = ConnectionResult {
        connection_id: msg.connection_id,
        connection_id_state: ConnectionIdState::Reused,
        connection_end: conn_end,
    };

    Ok(output.with_result(result))
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics03_connection::connection::{ConnectionEnd, Counterparty, State};
    use crate::core::ics03_connection::context::ConnectionReader;
    use crate::core::ics03_connection::error::ErrorDetail;
    use crate::core::ics03_connection::handler::{dispatch, ConnectionIdState};
    use crate::core::ics03_connection::msgs::conn_open_confirm::MsgConnectionOpenConfirm;
    use crate::core::ics03_connection::msgs::ConnectionMsg;
    use crate::core::ics03_connection::version::Version;
    use crate::core::ics24_host::identifier::{ChainId, ClientId, ConnectionId};
    use crate::core::ics24_host::path::Path;
    use crate::events::IbcEvent;
    use crate::mock::context::MockContext;
    use crate::proofs::Proofs;
    use crate::test_utils::get_dummy_account_id;
    use crate::Height;

    #[test]
    fn conn_open_confirm_msg_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgConnectionOpenConfirm,
            want_pass: bool,
        }

        let client_on_a = ClientId::new(ClientType::Mock, 0).unwrap();
        let client_on_b = ClientId::new(ClientType::Mock, 1).unwrap();
        let conn_a = ConnectionId::new(0);
        let conn_b = ConnectionId::new(3);

        let ctx_b0 = MockContext::new(ChainId::new("chainb".to_string(), 0), 5, Height::new(0, 10));
        let ctx_a0 = MockContext::new(ChainId::new("chaina".to_string(), 0), 5, Height::new(0, 10));

        let open_end_on_a = ConnectionEnd::new(
            State::Open,
            client_on_a.clone(),
            Counterparty::new(
                client_on_b.clone(),
                Some(conn_b.clone()),
                ctx_b0.commitment_prefix(),
            ),
            vec![Version::default()],
            Default::default(),
        );
        let try_end_on_b = ConnectionEnd::new(
            State::TryOpen,
            client_on_b.clone(),
            Counterparty::new(client_on_a, Some(conn_a.clone()), ctx_a0.commitment_prefix()),
            vec![Version::default()],
            Default::default(),
        );

        let ctx_a = ctx_a0.with_connection(conn_a.clone(), open_end_on_a.clone());
        let ctx_b = ctx_b0
            .with_counterparty_client(&client_on_b, &ctx_a)
            .with_connection(conn_b.clone(), try_end_on_b.clone());

        let proof_height = ctx_a.host_height();
        let msg = MsgConnectionOpenConfirm {
            connection_id: conn_b.clone(),
            proofs: Proofs::new(
                ctx_a
                    .commitment_proof(&Path::Connections(conn_a.clone()), proof_height)
                    .unwrap(),
                None,
                None,
                None,
                proof_height,
            )
            .unwrap(),
            signer: get_dummy_account_id(),
        };

        // The counterparty still holds an INIT end: its proof does not match an OPEN end.
        let mut init_end_on_a = open_end_on_a;
        init_end_on_a.set_state(State::Init);
        let stale_ctx_a = MockContext::new(ChainId::new("chaina".to_string(), 0), 5, Height::new(0, 10))
            .with_connection(conn_a.clone(), init_end_on_a);
        let stale_msg = MsgConnectionOpenConfirm {
            proofs: Proofs::new(
                stale_ctx_a
                    .commitment_proof(&Path::Connections(conn_a), proof_height)
                    .unwrap(),
                None,
                None,
                None,
                proof_height,
            )
            .unwrap(),
            ..msg.clone()
        };

        let mut open_end_on_b = try_end_on_b;
        open_end_on_b.set_state(State::Open);

        let tests: Vec<Test> = vec![
            Test {
                name: "Processing fails due to missing connection in context".to_string(),
                ctx: MockContext::default(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails due to connections mismatch (incorrect state)".to_string(),
                ctx: ctx_b.clone().with_connection(conn_b, open_end_on_b),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Processing fails because the counterparty end is not open".to_string(),
                ctx: ctx_b.clone(),
                msg: stale_msg,
                want_pass: false,
            },
            Test {
                name: "Processing successful".to_string(),
                ctx: ctx_b,
                msg,
                want_pass: true,
            },
        ];

        for test in tests {
            let res = dispatch(&test.ctx, ConnectionMsg::ConnectionOpenConfirm(test.msg.clone()));
            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "conn_open_confirm: test passed but was supposed to fail for: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    assert!(!proto_output.events.is_empty());
                    assert_eq!(proto_output.result.connection_end.state(), &State::Open);
                    assert_eq!(
                        proto_output.result.connection_id_state,
                        ConnectionIdState::Reused
                    );

                    for e in proto_output.events.iter() {
                        assert!(matches!(e, &IbcEvent::OpenConfirmConnection(_)));
                        assert_eq!(e.height(), Some(test.ctx.host_height()));
                    }
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "conn_open_confirm: failed for test: {}, \nparams {:?} {:?} error: {:?}",
                        test.name,
                        test.msg,
                        test.ctx.clone(),
                        e,
                    );
                }
            }
        }
    }

    #[test]
    fn unknown_connection_is_reported() {
        let msg = MsgConnectionOpenConfirm {
            connection_id: ConnectionId::new(9),
            proofs: Proofs::new(
                crate::test_utils::get_dummy_proof().try_into().unwrap(),
                None,
                None,
                None,
                Height::new(0, 5),
            )
            .unwrap(),
            signer: get_dummy_account_id(),
        };

        let err = dispatch(
            &MockContext::default(),
            ConnectionMsg::ConnectionOpenConfirm(msg),
        )
        .unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ConnectionNotFound(_)));
    }
}
