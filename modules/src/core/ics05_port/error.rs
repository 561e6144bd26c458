use flex_error::define_error;

use crate::core::ics05_port::capabilities::CapabilityName;
use crate::core::ics24_host::identifier::PortId;

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    Error {
        UnknownPort
            { port_id: PortId }
            | e | { format_args!("port '{0}' is unknown", e.port_id) },

        PortAlreadyBound
            { port_id: PortId }
            | e | { format_args!("port '{0}' is already bound", e.port_id) },

        ModuleNotFound
            { port_id: PortId }
            | e | { format_args!("could not retrieve module from port '{0}'", e.port_id) },

        CapabilityNotFound
            { name: CapabilityName }
            | e | { format_args!("no capability is registered under '{0}'", e.name) },

        CapabilityAlreadyTaken
            { name: CapabilityName }
            | e | { format_args!("capability '{0}' is already taken", e.name) },

        InvalidCapability
            { name: CapabilityName }
            | e | { format_args!("the given capability does not authenticate '{0}'", e.name) },

        InvalidCapabilityName
            { name: String }
            | e | { format_args!("'{0}' is not a valid capability name", e.name) },

        ImplementationSpecific
            { reason: String }
            | e | { format_args!("implementation specific error: {0}", e.reason) },
    }
}
