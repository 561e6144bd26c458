//! Handlers of the four connection handshake messages.

use crate::core::ics03_connection::connection::ConnectionEnd;
use crate::core::ics03_connection::context::ConnectionReader;
use crate::core::ics03_connection::error::Error;
use crate::core::ics03_connection::msgs::ConnectionMsg;
use crate::core::ics24_host::identifier::ConnectionId;
use crate::handler::HandlerOutput;

pub mod conn_open_ack;
pub mod conn_open_confirm;
pub mod conn_open_init;
pub mod conn_open_try;
pub mod verify;

/// Whether a handler allocated the connection identifier it reports on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionIdState {
    /// `ConnOpenInit` and `ConnOpenTry` allocate `connection-{n}` from the host counter.
    Generated,
    /// `ConnOpenAck` and `ConnOpenConfirm` advance an existing end.
    Reused,
}

/// What a connection handler asks the keeper to store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionResult {
    pub connection_id: ConnectionId,
    pub connection_id_state: ConnectionIdState,
    pub connection_end: ConnectionEnd,
}

/// Runs the handshake step carried by `msg`. Nothing is written: the result is applied by the
/// caller through [`ConnectionKeeper::store_connection_result`](crate::core::ics03_connection::context::ConnectionKeeper::store_connection_result).
pub fn dispatch<Ctx>(ctx: &Ctx, msg: ConnectionMsg) -> Result<HandlerOutput<ConnectionResult>, Error>
where
    Ctx: ConnectionReader,
{
    match msg {
        ConnectionMsg::ConnectionOpenInit(msg) => conn_open_init::process(ctx, msg),
        ConnectionMsg::ConnectionOpenTry(msg) => conn_open_try::process(ctx, msg),
        ConnectionMsg::ConnectionOpenAck(msg) => conn_open_ack::process(ctx, msg),
        ConnectionMsg::ConnectionOpenConfirm(msg) => conn_open_confirm::process(ctx, msg),
    }
}
