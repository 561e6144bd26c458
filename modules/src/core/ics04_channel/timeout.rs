use core::fmt::Display;

use ibc_engine_proto::ibc::core::client::v1::Height as RawHeight;
use serde::{Deserialize, Serialize};

use crate::Height;

/// Indicates a consensus height on the destination chain after which the packet
/// will no longer be processed, and will instead count as having timed-out.
///
/// `TimeoutHeight` is treated differently from other heights because
///
/// `RawHeight.timeout_height == {revision_number: 0, revision_height = 0}`
///
/// is legal and meaningful: it means "no timeout".
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum TimeoutHeight {
    #[default]
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn no_timeout() -> Self {
        Self::Never
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Revision number to be used in packet commitment computation
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_number,
            Self::Never => 0,
        }
    }

    /// Revision height to be used in packet commitment computation
    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::At(height) => height.revision_height,
            Self::Never => 0,
        }
    }

    /// A packet is timed out at `height` as soon as `height` reaches the timeout height.
    pub fn has_expired(&self, height: Height) -> bool {
        match self {
            Self::At(timeout_height) => height >= *timeout_height,
            Self::Never => false,
        }
    }
}

impl From<RawHeight> for TimeoutHeight {
    // Both fields must be zero for "no timeout": packet commitments hash the
    // revision number as well.
    fn from(raw_height: RawHeight) -> Self {
        if raw_height.revision_number == 0 && raw_height.revision_height == 0 {
            TimeoutHeight::Never
        } else {
            TimeoutHeight::At(raw_height.into())
        }
    }
}

impl From<Option<RawHeight>> for TimeoutHeight {
    fn from(maybe_raw_height: Option<RawHeight>) -> Self {
        maybe_raw_height.map_or(TimeoutHeight::Never, Self::from)
    }
}

/// "No timeout height" is encoded as `Some(RawHeight::zero)`.
impl From<TimeoutHeight> for Option<RawHeight> {
    fn from(timeout_height: TimeoutHeight) -> Self {
        let raw_height = match timeout_height {
            TimeoutHeight::At(height) => height.into(),
            TimeoutHeight::Never => RawHeight {
                revision_number: 0,
                revision_height: 0,
            },
        };

        Some(raw_height)
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        if height.is_zero() && height.revision_number == 0 {
            Self::Never
        } else {
            Self::At(height)
        }
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimeoutHeight::At(timeout_height) => write!(f, "{timeout_height}"),
            TimeoutHeight::Never => write!(f, "0-0"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn zero_height_means_no_timeout() {
        let raw = RawHeight {
            revision_number: 0,
            revision_height: 0,
        };
        assert_eq!(TimeoutHeight::from(raw), TimeoutHeight::Never);
        assert_eq!(TimeoutHeight::from(None), TimeoutHeight::Never);
        assert!(!TimeoutHeight::Never.has_expired(Height::new(100, 100)));
    }

    #[test]
    fn expires_once_reached() {
        let timeout = TimeoutHeight::At(Height::new(0, 100));
        assert!(!timeout.has_expired(Height::new(0, 99)));
        assert!(timeout.has_expired(Height::new(0, 100)));
        assert!(timeout.has_expired(Height::new(1, 0)));
    }
}
