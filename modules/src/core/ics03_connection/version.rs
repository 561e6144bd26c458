use core::fmt::Display;

use ibc_engine_proto::ibc::core::connection::v1::Version as RawVersion;
use ibc_engine_proto::Protobuf;
use serde::{Deserialize, Serialize};

use crate::core::ics03_connection::error::Error;
use crate::core::ics04_channel::channel::Order;

/// Stores the identifier and the features supported by a version
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    /// unique version identifier
    identifier: String,
    /// list of features compatible with the specified identifier
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: String, features: Vec<String>) -> Self {
        Self {
            identifier,
            features,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Checks whether or not the given feature is supported in this version
    pub fn is_supported_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Whether channels with the given ordering may be opened over a connection using this version.
    pub fn supports_order(&self, order: Order) -> bool {
        self.is_supported_feature(order.as_str())
    }

    /// Checks that `self`, as selected by the counterparty, is one of the `supported` versions
    /// with a subset of its features.
    pub fn verify_proposed(&self, supported: &[Version]) -> Result<(), Error> {
        let candidate = supported
            .iter()
            .find(|v| v.identifier == self.identifier)
            .ok_or_else(|| Error::version_not_supported(self.clone()))?;

        if self.features.is_empty()
            || !self.features.iter().all(|f| candidate.is_supported_feature(f))
        {
            return Err(Error::version_not_supported(self.clone()));
        }
        Ok(())
    }
}

impl Protobuf<RawVersion> for Version {}

impl TryFrom<RawVersion> for Version {
    type Error = Error;
    fn try_from(value: RawVersion) -> Result<Self, Self::Error> {
        if value.identifier.trim().is_empty() {
            return Err(Error::empty_versions());
        }
        if value.features.iter().any(|feature| feature.trim().is_empty()) {
            return Err(Error::empty_features());
        }
        Ok(Version {
            identifier: value.identifier,
            features: value.features,
        })
    }
}

impl From<Version> for RawVersion {
    fn from(value: Version) -> Self {
        Self {
            identifier: value.identifier,
            features: value.features,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version {
            identifier: "1".to_string(),
            features: vec![
                Order::Ordered.as_str().to_owned(),
                Order::Unordered.as_str().to_owned(),
            ],
        }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}[{}]", self.identifier, self.features.join(", "))
    }
}

/// Returns the lists of supported versions
pub fn get_compatible_versions() -> Vec<Version> {
    vec![Version::default()]
}

/// Selects a version from the intersection of locally supported and counterparty versions.
///
/// Two versions intersect when they share an identifier and at least one feature; the
/// picked version carries only the shared features. Among all intersections the one with
/// the lowest identifier wins.
pub fn pick_version(
    supported_versions: Vec<Version>,
    counterparty_versions: Vec<Version>,
) -> Result<Version, Error> {
    let mut intersection: Vec<Version> = Vec::new();
    for s in supported_versions.iter() {
        for c in counterparty_versions.iter() {
            if c.identifier != s.identifier {
                continue;
            }
            let features: Vec<String> = s
                .features
                .iter()
                .filter(|f| c.is_supported_feature(f))
                .cloned()
                .collect();
            if !features.is_empty() {
                intersection.push(Version::new(s.identifier.clone(), features));
            }
        }
    }

    intersection.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    intersection
        .into_iter()
        .next()
        .ok_or_else(Error::no_common_version)
}
