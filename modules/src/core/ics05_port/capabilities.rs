//! Capabilities: unforgeable handles that prove ownership of a port or of a channel.
//!
//! A capability is only ever minted by the host's capability keeper; modules
//! hold on to the handle and present it back when acting on the object it guards.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::ics05_port::error::Error;
use crate::core::ics24_host::identifier::{ChannelId, PortId};
use crate::core::ics24_host::path::Path;

const CAPABILITIES_PREFIX: &str = "capabilities";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capability {
    index: u64,
}

impl Capability {
    pub fn new(index: u64) -> Self {
        Self { index }
    }

    pub fn index(&self) -> u64 {
        self.index
    }
}

impl From<u64> for Capability {
    fn from(index: u64) -> Self {
        Self::new(index)
    }
}

macro_rules! capability_wrapper {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Capability);

        impl $name {
            pub fn index(&self) -> u64 {
                self.0.index()
            }
        }

        impl From<Capability> for $name {
            fn from(cap: Capability) -> Self {
                Self(cap)
            }
        }

        impl From<$name> for Capability {
            fn from(cap: $name) -> Self {
                cap.0
            }
        }

        impl AsRef<Capability> for $name {
            fn as_ref(&self) -> &Capability {
                &self.0
            }
        }
    };
}

capability_wrapper!(
    /// Capability held by the module a port is bound to.
    PortCapability
);
capability_wrapper!(
    /// Capability held by the module owning a channel end.
    ChannelCapability
);

/// The key a capability is registered under.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapabilityName(String);

impl CapabilityName {
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.trim().is_empty() {
            Err(Error::invalid_capability_name(name))
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_path(path: Path) -> Self {
        Self(format!("{CAPABILITIES_PREFIX}/{path}"))
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CapabilityName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// `capabilities/ports/{port}`
pub fn port_capability_name(port_id: PortId) -> CapabilityName {
    CapabilityName::from_path(Path::Ports(port_id))
}

/// `capabilities/ports/{port}/channels/{channel}`
pub fn channel_capability_name(port_id: PortId, channel_id: ChannelId) -> CapabilityName {
    CapabilityName(format!(
        "{CAPABILITIES_PREFIX}/{}/channels/{channel_id}",
        Path::Ports(port_id)
    ))
}
