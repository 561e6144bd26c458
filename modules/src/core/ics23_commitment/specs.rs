use core::fmt;

use ics23::ProofSpec;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The proof specifications a client checks each layer of a [`MerkleProof`] against,
/// innermost store first.
///
/// [`MerkleProof`]: super::merkle::MerkleProof
#[derive(Clone, PartialEq)]
pub struct ProofSpecs {
    specs: Vec<ProofSpec>,
}

impl ProofSpecs {
    /// Cosmos SDK chains: an IAVL substore inside the simple Merkle multistore.
    pub fn cosmos() -> Self {
        Self {
            specs: vec![ics23::iavl_spec(), ics23::tendermint_spec()],
        }
    }

    /// Two nested simple Merkle trees, the layout of the mock host store.
    pub fn simple_merkle() -> Self {
        Self {
            specs: vec![ics23::tendermint_spec(), ics23::tendermint_spec()],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }
}

impl Eq for ProofSpecs {}

impl fmt::Debug for ProofSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProofSpecs({} layers)", self.specs.len())
    }
}

impl Default for ProofSpecs {
    fn default() -> Self {
        Self::cosmos()
    }
}

impl From<Vec<ProofSpec>> for ProofSpecs {
    fn from(specs: Vec<ProofSpec>) -> Self {
        Self { specs }
    }
}

impl From<ProofSpecs> for Vec<ProofSpec> {
    fn from(specs: ProofSpecs) -> Self {
        specs.specs
    }
}

impl AsRef<[ProofSpec]> for ProofSpecs {
    fn as_ref(&self) -> &[ProofSpec] {
        &self.specs
    }
}

// Each spec is written as the base64 of its protobuf encoding.
impl Serialize for ProofSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let encoded: Vec<String> = self
            .specs
            .iter()
            .map(|spec| {
                let bytes = prost::Message::encode_to_vec(spec);
                String::from_utf8_lossy(&subtle_encoding::base64::encode(bytes)).into_owned()
            })
            .collect();
        encoded.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProofSpecs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        let specs = encoded
            .iter()
            .map(|s| {
                let bytes = subtle_encoding::base64::decode(s).map_err(D::Error::custom)?;
                <ProofSpec as prost::Message>::decode(bytes.as_slice()).map_err(D::Error::custom)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { specs })
    }
}

#[cfg(test)]
mod tests {
    use super::ProofSpecs;
    use test_log::test;

    #[test]
    fn serde_keeps_every_layer() {
        let specs = ProofSpecs::cosmos();
        let json = serde_json::to_string(&specs).unwrap();
        let back: ProofSpecs = serde_json::from_str(&json).unwrap();
        assert_eq!(back, specs);
        assert_ne!(back, ProofSpecs::simple_merkle());
    }
}
