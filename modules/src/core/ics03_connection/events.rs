//! Types for the IBC events emitted by the connection handshake handlers.

use serde::{Deserialize, Serialize};

use crate::core::ics24_host::identifier::{ClientId, ConnectionId};
use crate::events::{IbcEvent, ModuleEventAttribute};
use crate::Height;

pub const CONNECTION_ID_ATTRIBUTE_KEY: &str = "connection_id";
pub const CLIENT_ID_ATTRIBUTE_KEY: &str = "client_id";
pub const COUNTERPARTY_CONNECTION_ID_ATTRIBUTE_KEY: &str = "counterparty_connection_id";
pub const COUNTERPARTY_CLIENT_ID_ATTRIBUTE_KEY: &str = "counterparty_client_id";

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Attributes {
    pub height: Height,
    pub connection_id: Option<ConnectionId>,
    pub client_id: ClientId,
    pub counterparty_connection_id: Option<ConnectionId>,
    pub counterparty_client_id: ClientId,
}

/// Convert attributes to a list of key/value pairs. Absent connection identifiers are
/// left out.
impl From<Attributes> for Vec<ModuleEventAttribute> {
    fn from(a: Attributes) -> Self {
        let mut attributes = vec![];
        if let Some(conn_id) = a.connection_id {
            attributes.push((CONNECTION_ID_ATTRIBUTE_KEY, conn_id).into());
        }
        attributes.push((CLIENT_ID_ATTRIBUTE_KEY, a.client_id).into());
        if let Some(conn_id) = a.counterparty_connection_id {
            attributes.push((COUNTERPARTY_CONNECTION_ID_ATTRIBUTE_KEY, conn_id).into());
        }
        attributes.push((COUNTERPARTY_CLIENT_ID_ATTRIBUTE_KEY, a.counterparty_client_id).into());
        attributes
    }
}

macro_rules! connection_event {
    ($name:ident, $variant:ident) => {
        #[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
        pub struct $name(Attributes);

        impl $name {
            pub fn attributes(&self) -> &Attributes {
                &self.0
            }
            pub fn connection_id(&self) -> Option<&ConnectionId> {
                self.0.connection_id.as_ref()
            }
            pub fn height(&self) -> Height {
                self.0.height
            }
            pub fn set_height(&mut self, height: Height) {
                self.0.height = height;
            }
        }

        impl From<Attributes> for $name {
            fn from(attrs: Attributes) -> Self {
                $name(attrs)
            }
        }

        impl From<$name> for IbcEvent {
            fn from(v: $name) -> Self {
                IbcEvent::$variant(v)
            }
        }
    };
}

connection_event!(OpenInit, OpenInitConnection);
connection_event!(OpenTry, OpenTryConnection);
connection_event!(OpenAck, OpenAckConnection);
connection_event!(OpenConfirm, OpenConfirmConnection);

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn absent_connection_ids_are_not_attributes() {
        let attributes = Attributes {
            height: Height::new(0, 3),
            connection_id: Some(ConnectionId::new(0)),
            client_id: ClientId::default(),
            counterparty_connection_id: None,
            counterparty_client_id: ClientId::default(),
        };
        let pairs: Vec<ModuleEventAttribute> = attributes.into();
        let keys: Vec<&str> = pairs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                CONNECTION_ID_ATTRIBUTE_KEY,
                CLIENT_ID_ATTRIBUTE_KEY,
                COUNTERPARTY_CLIENT_ID_ATTRIBUTE_KEY
            ]
        );
    }
}
