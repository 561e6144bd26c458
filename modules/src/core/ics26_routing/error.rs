use flex_error::{define_error, TraceError};

use crate::core::ics02_client;
use crate::core::ics03_connection;
use crate::core::ics04_channel;
use crate::core::ics05_port;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        Ics02Client
            [ ics02_client::error::Error ]
            | _ | { "ICS02 client error" },

        Ics03Connection
            [ ics03_connection::error::Error ]
            | _ | { "ICS03 connection error" },

        Ics04Channel
            [ ics04_channel::error::Error ]
            | _ | { "ICS04 channel error" },

        Ics05Port
            [ ics05_port::error::Error ]
            | _ | { "ICS05 port error" },

        UnknownMessageTypeUrl
            { url: String }
            | e | { format_args!("unknown type URL {0}", e.url) },

        MalformedMessageBytes
            [ TraceError<ibc_engine_proto::Error> ]
            | _ | { "the message is malformed and cannot be decoded" },

        InvalidModuleId
            { module_id: String }
            | e | { format_args!("'{0}' is not a valid module identifier", e.module_id) },
    }
}
