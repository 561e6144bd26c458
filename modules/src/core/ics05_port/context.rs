//! ICS5 (port) context: how a host binds ports to application modules and keeps track of
//! the capabilities guarding ports and channels.

use crate::core::ics05_port::capabilities::{
    port_capability_name, Capability, CapabilityName, PortCapability,
};
use crate::core::ics05_port::error::Error;
use crate::core::ics24_host::identifier::PortId;
use crate::core::ics26_routing::context::ModuleId;

pub trait CapabilityReader {
    /// Fetch a capability which was previously claimed by specified name
    fn get_capability(&self, name: &CapabilityName) -> Result<Capability, Error>;

    /// Authenticate a given capability and name. Lookup the capability from the internal store and
    /// check against the provided name.
    fn authenticate_capability(
        &self,
        name: &CapabilityName,
        capability: &Capability,
    ) -> Result<(), Error> {
        let stored = self.get_capability(name)?;
        if &stored == capability {
            Ok(())
        } else {
            Err(Error::invalid_capability(name.clone()))
        }
    }
}

pub trait CapabilityKeeper {
    /// Create a new capability with the given name.
    /// Return an error if the capability was already taken.
    fn new_capability(&mut self, name: CapabilityName) -> Result<Capability, Error>;

    /// Claim the specified capability using the specified name.
    /// Return an error if the capability was already taken.
    fn claim_capability(
        &mut self,
        name: CapabilityName,
        capability: Capability,
    ) -> Result<(), Error>;

    /// Release a previously claimed or created capability
    fn release_capability(
        &mut self,
        name: CapabilityName,
        capability: Capability,
    ) -> Result<(), Error>;
}

/// A context supplying all the necessary read-only dependencies for processing any information
/// regarding a port.
pub trait PortReader: CapabilityReader {
    /// Return the module a given port is bound to.
    fn lookup_module_by_port(&self, port_id: &PortId) -> Result<ModuleId, Error>;

    /// Check if the specified port_id is already bound
    fn is_bound(&self, port_id: &PortId) -> bool {
        self.get_capability(&port_capability_name(port_id.clone()))
            .is_ok()
    }

    fn port_capability(&self, port_id: &PortId) -> Result<PortCapability, Error> {
        self.get_capability(&port_capability_name(port_id.clone()))
            .map(PortCapability::from)
            .map_err(|_| Error::unknown_port(port_id.clone()))
    }

    /// Authenticate a capability key against a port_id by checking if the capability was previously
    /// generated and bound to the specified port
    fn authenticate(&self, port_id: &PortId, capability: &PortCapability) -> bool {
        self.authenticate_capability(&port_capability_name(port_id.clone()), capability.as_ref())
            .is_ok()
    }
}

pub trait PortKeeper: CapabilityKeeper + PortReader {
    /// Binds `port_id` to the module `module_id` and returns the port capability.
    fn bind_port(
        &mut self,
        port_id: PortId,
        module_id: ModuleId,
    ) -> Result<PortCapability, Error> {
        if self.is_bound(&port_id) {
            return Err(Error::port_already_bound(port_id));
        }

        let capability = self.new_capability(port_capability_name(port_id.clone()))?;
        self.store_port_module(port_id, module_id)?;
        Ok(capability.into())
    }

    /// Records which module owns `port_id`.
    fn store_port_module(&mut self, port_id: PortId, module_id: ModuleId) -> Result<(), Error>;
}
