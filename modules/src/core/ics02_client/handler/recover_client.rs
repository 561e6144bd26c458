//! Protocol logic for `MsgRecoverClient`: the governance path replacing the
//! state of a frozen or expired client with the state of an active substitute.

use tracing::info;

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState, Status};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::RecoverClient;
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::recover_client::MsgRecoverClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub subject_client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_state: AnyConsensusState,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

pub fn process(ctx: &dyn ClientReader, msg: MsgRecoverClient) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgRecoverClient {
        subject_client_id,
        substitute_client_id,
        signer: _,
    } = msg;

    let subject_type = ctx.client_type(&subject_client_id)?;
    let substitute_type = ctx.client_type(&substitute_client_id)?;
    if subject_type != substitute_type {
        return Err(Error::recover_client_type_mismatch(
            subject_type,
            substitute_type,
        ));
    }

    let client_def = AnyClient::from_client_type(subject_type);

    let subject_state = ctx.client_state(&subject_client_id)?;
    if client_def.status(ctx, &subject_client_id, &subject_state)? == Status::Active {
        return Err(Error::subject_client_active(subject_client_id));
    }

    let substitute_state = ctx.client_state(&substitute_client_id)?;
    let substitute_status = client_def.status(ctx, &substitute_client_id, &substitute_state)?;
    if !substitute_status.is_active() {
        return Err(Error::substitute_client_not_active(
            substitute_client_id,
            substitute_status,
        ));
    }

    if substitute_state.latest_height() <= subject_state.latest_height() {
        return Err(Error::substitute_height_too_low(
            subject_state.latest_height(),
            substitute_state.latest_height(),
        ));
    }

    let (client_state, consensus_state) = client_def.check_substitute_and_update_state(
        ctx,
        &subject_client_id,
        subject_state,
        &substitute_client_id,
        substitute_state,
    )?;

    info!(
        subject = %subject_client_id,
        substitute = %substitute_client_id,
        "client recovered"
    );
    output.log(format!(
        "success: client {subject_client_id} recovered from {substitute_client_id}"
    ));
    output.emit(IbcEvent::RecoverClient(RecoverClient {
        height: ctx.host_height(),
        subject_client_id: subject_client_id.clone(),
        client_type: subject_type,
    }));

    Ok(output.with_result(ClientResult::Recover(Result {
        subject_client_id,
        client_state,
        consensus_state,
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    })))
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
    use crate::core::ics02_client::client_state::{ClientState, Status};
    use crate::core::ics02_client::client_type::ClientType;
    use crate::core::ics02_client::context::{ClientKeeper, ClientReader};
    use crate::core::ics02_client::handler::{dispatch, ClientResult};
    use crate::core::ics02_client::msgs::recover_client::MsgRecoverClient;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::core::ics24_host::identifier::ClientId;
    use crate::mock::client_state::{MockClientState, MockConsensusState};
    use crate::mock::context::MockContext;
    use crate::mock::header::MockHeader;
    use crate::test_utils::get_dummy_account_id;
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn recover_client_processing() {
        struct Test {
            name: String,
            ctx: MockContext,
            msg: MsgRecoverClient,
            want_pass: bool,
        }

        let subject = ClientId::new(ClientType::Mock, 0).unwrap();
        let substitute = ClientId::new(ClientType::Mock, 1).unwrap();
        let subject_height = Height::new(0, 10);
        let substitute_height = Height::new(0, 20);

        let frozen_subject =
            MockClientState::new(MockHeader::new(subject_height)).with_frozen_height(subject_height);

        let expired_header = MockHeader::new(subject_height)
            .with_timestamp(Timestamp::from_nanoseconds(1).unwrap());
        let expired_subject = MockClientState::new(expired_header.clone())
            .with_trusting_period(Duration::from_secs(1));

        let base = MockContext::default()
            .with_client(&subject, subject_height)
            .with_client(&substitute, substitute_height);

        let msg = MsgRecoverClient {
            subject_client_id: subject.clone(),
            substitute_client_id: substitute.clone(),
            signer: get_dummy_account_id(),
        };

        let tests: Vec<Test> = vec![
            Test {
                name: "Frozen subject is recovered".to_string(),
                ctx: base
                    .clone()
                    .with_client_state(&subject, frozen_subject.clone().into()),
                msg: msg.clone(),
                want_pass: true,
            },
            Test {
                name: "Expired subject is recovered".to_string(),
                ctx: base
                    .clone()
                    .with_client_state(&subject, expired_subject.into())
                    .with_consensus_state(
                        &subject,
                        subject_height,
                        MockConsensusState::new(expired_header).into(),
                    ),
                msg: msg.clone(),
                want_pass: true,
            },
            Test {
                name: "Active subject cannot be recovered".to_string(),
                ctx: base.clone(),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Substitute must be ahead of the subject".to_string(),
                ctx: MockContext::default()
                    .with_client(&subject, substitute_height)
                    .with_client(&substitute, subject_height)
                    .with_client_state(
                        &subject,
                        MockClientState::new(MockHeader::new(substitute_height))
                            .with_frozen_height(substitute_height)
                            .into(),
                    ),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Frozen substitute is rejected".to_string(),
                ctx: base
                    .clone()
                    .with_client_state(&subject, frozen_subject.into())
                    .with_client_state(
                        &substitute,
                        MockClientState::new(MockHeader::new(substitute_height))
                            .with_frozen_height(substitute_height)
                            .into(),
                    ),
                msg: msg.clone(),
                want_pass: false,
            },
            Test {
                name: "Substitute does not exist".to_string(),
                ctx: MockContext::default().with_client(&subject, subject_height),
                msg,
                want_pass: false,
            },
        ];

        for test in tests {
            let res = dispatch(&test.ctx, ClientMsg::RecoverClient(test.msg.clone()));

            match res {
                Ok(proto_output) => {
                    assert!(
                        test.want_pass,
                        "recover_client: test passed but was supposed to fail for test: {}, \nparams {:?} {:?}",
                        test.name,
                        test.msg.clone(),
                        test.ctx.clone()
                    );

                    let mut ctx = test.ctx.clone();
                    ctx.store_client_result(proto_output.result).unwrap();

                    let recovered = ctx.client_state(&subject).unwrap();
                    assert!(!recovered.is_frozen());
                    assert_eq!(recovered.latest_height(), substitute_height);
                    let status = AnyClient::from_client_type(ClientType::Mock)
                        .status(&ctx, &subject, &recovered)
                        .unwrap();
                    assert_eq!(status, Status::Active, "{}", test.name);
                }
                Err(e) => {
                    assert!(
                        !test.want_pass,
                        "recover_client: did not pass test: {}, \nparams {:?} {:?} error: {:?}",
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
    fn recover_result_targets_the_subject() {
        let subject = ClientId::new(ClientType::Mock, 0).unwrap();
        let substitute = ClientId::new(ClientType::Mock, 1).unwrap();
        let ctx = MockContext::default()
            .with_client(&subject, Height::new(0, 10))
            .with_client(&substitute, Height::new(0, 20))
            .with_client_state(
                &subject,
                MockClientState::new(MockHeader::new(Height::new(0, 10)))
                    .with_frozen_height(Height::new(0, 10))
                    .into(),
            );

        let output = dispatch(
            &ctx,
            ClientMsg::RecoverClient(MsgRecoverClient {
                subject_client_id: subject.clone(),
                substitute_client_id: substitute,
                signer: get_dummy_account_id(),
            }),
        )
        .unwrap();

        match output.result {
            ClientResult::Recover(res) => assert_eq!(res.subject_client_id, subject),
            _ => panic!("recover handler result has incorrect type"),
        }
    }
}
