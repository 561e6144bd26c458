use core::convert::Infallible;
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Address of the account that submitted a message. Carried through for events and
/// application callbacks; the engine does not authenticate it.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signer(String);

impl Signer {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Signer {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(&self.0)
    }
}

impl From<String> for Signer {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl FromStr for Signer {
    type Err = Infallible;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        Ok(Self(address.to_string()))
    }
}
