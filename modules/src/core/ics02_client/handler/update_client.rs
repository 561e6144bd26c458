//! Protocol logic specific to processing ICS2 messages of type `MsgUpdateClient`.

use tracing::{debug, info};

use crate::core::ics02_client::client_consensus::AnyConsensusState;
use crate::core::ics02_client::client_def::{AnyClient, ClientDef};
use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
use crate::core::ics02_client::context::ClientReader;
use crate::core::ics02_client::error::Error;
use crate::core::ics02_client::events::{Attributes, UpdateClient};
use crate::core::ics02_client::handler::ClientResult;
use crate::core::ics02_client::height::Height;
use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
use crate::core::ics24_host::identifier::ClientId;
use crate::events::IbcEvent;
use crate::handler::{HandlerOutput, HandlerResult};
use crate::timestamp::Timestamp;

/// The result following the successful processing of a `MsgUpdateClient` message. Preferably
/// this data type should be used with a qualified name `update_client::Result` to avoid ambiguity.
///
/// A client frozen on misbehaviour carries no consensus state; neither does
/// a header that was already applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Result {
    pub client_id: ClientId,
    pub client_state: AnyClientState,
    pub consensus_states: Vec<(Height, AnyConsensusState)>,
    pub processed_time: Timestamp,
    pub processed_height: Height,
}

impl Result {
    /// Heights of the consensus states this update stores.
    pub fn consensus_heights(&self) -> Vec<Height> {
        self.consensus_states.iter().map(|(h, _)| *h).collect()
    }
}

pub fn process(ctx: &dyn ClientReader, msg: MsgUpdateClient) -> HandlerResult<ClientResult, Error> {
    let mut output = HandlerOutput::builder();

    let MsgUpdateClient {
        client_id,
        client_message,
        signer: _,
    } = msg;

    // Read client type from the host chain store. The client should already exist.
    let client_type = ctx.client_type(&client_id)?;

    let client_def = AnyClient::from_client_type(client_type);

    // Read client state from the host chain store.
    let client_state = ctx.client_state(&client_id)?;

    client_def
        .status(ctx, &client_id, &client_state)?
        .verify_is_active(&client_id)?;

    client_def.verify_client_message(ctx, &client_id, &client_state, &client_message)?;

    let found_misbehaviour =
        client_def.check_for_misbehaviour(ctx, &client_id, &client_state, &client_message)?;

    if found_misbehaviour {
        let latest_height = client_state.latest_height();
        let client_state =
            client_def.update_state_on_misbehaviour(ctx, &client_id, client_state, client_message)?;

        info!(%client_id, "misbehaviour detected, client frozen");
        output.log(format!("success: client {client_id} frozen on misbehaviour"));

        let event_attributes =
            Attributes::new(ctx.host_height(), client_id.clone(), client_type, latest_height);
        output.emit(IbcEvent::ClientMisbehaviour(event_attributes.into()));

        let result = ClientResult::Update(Result {
            client_id,
            client_state,
            consensus_states: Vec::new(),
            processed_time: ctx.host_timestamp(),
            processed_height: ctx.host_height(),
        });
        return Ok(output.with_result(result));
    }

    // Use client_state to validate the new header against the latest consensus_state.
    // This function will return the new client_state (its latest_height changed) and the
    // consensus states obtained from the message. These will be later persisted by the keeper.
    let (new_client_state, consensus_states) =
        client_def.update_state(ctx, &client_id, client_state, client_message)?;

    let result = Result {
        client_id: client_id.clone(),
        client_state: new_client_state,
        consensus_states,
        processed_time: ctx.host_timestamp(),
        processed_height: ctx.host_height(),
    };
    let consensus_heights = result.consensus_heights();

    debug!(%client_id, ?consensus_heights, "client updated");

    let event_attributes = Attributes::new(
        ctx.host_height(),
        client_id.clone(),
        client_type,
        result.client_state.latest_height(),
    );
    output.emit(IbcEvent::UpdateClient(UpdateClient {
        common: event_attributes,
        consensus_heights,
    }));
    output.log(format!("success: client {client_id} updated"));

    Ok(output.with_result(ClientResult::Update(result)))
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use test_log::test;

    use crate::core::ics02_client::client_state::{AnyClientState, ClientState};
    use crate::core::ics02_client::context::ClientReader;
    use crate::core::ics02_client::error::{Error, ErrorDetail};
    use crate::core::ics02_client::handler::{dispatch, ClientResult};
    use crate::core::ics02_client::msgs::update_client::MsgUpdateClient;
    use crate::core::ics02_client::msgs::ClientMsg;
    use crate::core::ics24_host::identifier::ClientId;
    use crate::events::IbcEvent;
    use crate::handler::HandlerOutput;
    use crate::mock::client_state::{MockClientState, MockConsensusState};
    use crate::mock::context::MockContext;
    use crate::mock::header::MockHeader;
    use crate::test_utils::get_dummy_account_id;
    use crate::timestamp::Timestamp;
    use crate::Height;

    #[test]
    fn test_update_client_ok() {
        let client_id = ClientId::default();
        let signer = get_dummy_account_id();

        let ctx = MockContext::default().with_client(&client_id, Height::new(0, 42));

        let msg = MsgUpdateClient::new(
            client_id.clone(),
            MockHeader::new(Height::new(0, 46)).into(),
            signer,
        );

        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg.clone()));

        match output {
            Ok(HandlerOutput {
                result,
                mut events,
                log,
            }) => {
                assert_eq!(events.len(), 1);
                let event = events.pop().unwrap();
                assert!(
                    matches!(event, IbcEvent::UpdateClient(ref e) if e.client_id() == &msg.client_id)
                );
                assert_eq!(event.height(), Some(ctx.host_height()));
                assert!(log.iter().any(|l| l.starts_with("success")));
                match result {
                    ClientResult::Update(upd_res) => {
                        assert_eq!(upd_res.client_id, client_id);
                        assert_eq!(
                            upd_res.client_state,
                            MockClientState::new(MockHeader::new(Height::new(0, 46))).into()
                        );
                        assert_eq!(upd_res.consensus_heights(), vec![Height::new(0, 46)]);
                    }
                    _ => panic!("update handler result has incorrect type"),
                }
            }
            Err(err) => {
                panic!("unexpected error: {}", err);
            }
        }
    }

    #[test]
    fn test_update_nonexisting_client() {
        let client_id = "9999-mock-1".parse::<ClientId>().unwrap();
        let signer = get_dummy_account_id();

        let ctx = MockContext::default().with_client(&client_id, Height::new(0, 42));

        let msg = MsgUpdateClient::new(
            "9999-mock-7".parse::<ClientId>().unwrap(),
            MockHeader::new(Height::new(0, 46)).into(),
            signer,
        );

        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg.clone()));

        match output {
            Err(Error(ErrorDetail::ClientNotFound(e), _)) => {
                assert_eq!(e.client_id, msg.client_id);
            }
            _ => {
                panic!("expected ClientNotFound error, instead got {:?}", output)
            }
        }
    }

    #[test]
    fn test_update_client_ok_multiple() {
        let client_ids: Vec<ClientId> = vec![
            "9999-mock-0".parse::<ClientId>().unwrap(),
            "9999-mock-1".parse::<ClientId>().unwrap(),
            "9999-mock-2".parse::<ClientId>().unwrap(),
        ];
        let signer = get_dummy_account_id();
        let initial_height = Height::new(0, 45);
        let update_height = Height::new(0, 49);

        let mut ctx = MockContext::default();

        for cid in &client_ids {
            ctx = ctx.with_client(cid, initial_height);
        }

        for cid in &client_ids {
            let msg = MsgUpdateClient::new(
                cid.clone(),
                MockHeader::new(update_height).into(),
                signer.clone(),
            );

            let output = dispatch(&ctx, ClientMsg::UpdateClient(msg.clone()));

            match output {
                Ok(HandlerOutput {
                    result: _,
                    mut events,
                    ..
                }) => {
                    assert_eq!(events.len(), 1);
                    let event = events.pop().unwrap();
                    assert!(
                        matches!(event, IbcEvent::UpdateClient(ref e) if e.client_id() == &msg.client_id)
                    );
                }
                Err(err) => {
                    panic!("unexpected error: {}", err);
                }
            }
        }
    }

    #[test]
    fn test_update_frozen_or_expired_client_fails() {
        let client_id = ClientId::default();
        let height = Height::new(0, 42);

        let frozen_state = MockClientState::new(MockHeader::new(height)).with_frozen_height(height);
        let frozen_ctx = MockContext::default()
            .with_client(&client_id, height)
            .with_client_state(&client_id, frozen_state.into());

        let expired_header =
            MockHeader::new(height).with_timestamp(Timestamp::from_nanoseconds(1).unwrap());
        let expired_state =
            MockClientState::new(expired_header.clone()).with_trusting_period(Duration::from_secs(1));
        let expired_ctx = MockContext::default()
            .with_client(&client_id, height)
            .with_client_state(&client_id, expired_state.into())
            .with_consensus_state(
                &client_id,
                height,
                MockConsensusState::new(expired_header).into(),
            );

        let msg = MsgUpdateClient::new(
            client_id,
            MockHeader::new(Height::new(0, 50)).into(),
            get_dummy_account_id(),
        );

        let err = dispatch(&frozen_ctx, ClientMsg::UpdateClient(msg.clone())).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ClientFrozen(_)));

        let err = dispatch(&expired_ctx, ClientMsg::UpdateClient(msg)).unwrap_err();
        assert!(matches!(err.detail(), ErrorDetail::ClientExpired(_)));
    }

    #[test]
    fn test_conflicting_header_freezes_client() {
        let client_id = ClientId::default();
        let height = Height::new(0, 42);
        let ctx = MockContext::default().with_client(&client_id, height);

        // Same height, different root: the counterparty signed two blocks.
        let conflicting = MockHeader::new(height).with_root(b"forged".to_vec().into());
        let msg = MsgUpdateClient::new(client_id.clone(), conflicting.into(), get_dummy_account_id());

        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg)).unwrap();
        assert!(matches!(
            output.events.as_slice(),
            [IbcEvent::ClientMisbehaviour(_)]
        ));
        match output.result {
            ClientResult::Update(res) => {
                assert!(res.client_state.is_frozen());
                assert!(res.consensus_states.is_empty());
            }
            _ => panic!("update handler result has incorrect type"),
        }
    }

    #[test]
    fn test_resubmitting_stored_header_is_a_no_op() {
        let client_id = ClientId::default();
        let height = Height::new(0, 42);
        let ctx = MockContext::default().with_client(&client_id, height);

        let msg = MsgUpdateClient::new(
            client_id,
            MockHeader::new(height).into(),
            get_dummy_account_id(),
        );

        let output = dispatch(&ctx, ClientMsg::UpdateClient(msg)).unwrap();
        match output.result {
            ClientResult::Update(res) => {
                assert!(res.consensus_states.is_empty());
                assert!(!res.client_state.is_frozen());
                let stored: AnyClientState = MockClientState::new(MockHeader::new(height)).into();
                assert_eq!(res.client_state, stored);
            }
            _ => panic!("update handler result has incorrect type"),
        }
    }
}
