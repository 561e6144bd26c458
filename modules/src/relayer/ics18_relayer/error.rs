use flex_error::define_error;

use crate::core::ics24_host::identifier::ClientId;
use crate::core::ics26_routing::error::Error as RoutingError;
use crate::Height;

define_error! {
    Error {
        ClientStateNotFound
            { client_id: ClientId }
            | e | { format_args!("no client {} on the destination chain", e.client_id) },

        ClientAlreadyUpToDate
            {
                client_id: ClientId,
                source_height: Height,
                destination_height: Height,
            }
            | e | {
                format_args!("client {} already tracks the source head {} (client height {})",
                    e.client_id, e.source_height, e.destination_height)
            },

        ClientAtHigherHeight
            {
                client_id: ClientId,
                source_height: Height,
                destination_height: Height,
            }
            | e | {
                format_args!("client {} is at {}, ahead of the source head {}",
                    e.client_id, e.destination_height, e.source_height)
            },

        MissingHeaderHeight
            | _ | { "the source header does not carry a height" },

        TransactionFailed
            [ RoutingError ]
            | _ | { "the destination chain rejected the transaction" },
    }
}
