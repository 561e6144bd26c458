//! Block and timeout timestamps.
//!
//! On the wire a timestamp is a `u64` count of nanoseconds since the Unix epoch, where `0`
//! stands for "no timestamp". Unset timestamps compare below every set one, never expire a
//! timeout and are left unchanged by arithmetic.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::{Add, Sub};
use core::time::Duration;

use chrono::{offset::Utc, DateTime, LocalResult, TimeZone};
use flex_error::define_error;
use serde::{Deserialize, Serialize};

pub const ZERO_DURATION: Duration = Duration::from_secs(0);

const NANOS_PER_SEC: u64 = 1_000_000_000;

#[derive(PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug, Default, Deserialize, Serialize, Hash)]
pub struct Timestamp {
    time: Option<DateTime<Utc>>,
}

define_error! {
    #[derive(Debug, PartialEq, Eq)]
    TimestampError {
        OutOfRange
            { nanoseconds: u64 }
            | e | { format_args!("{} nanoseconds since the epoch is not a valid time", e.nanoseconds) },

        Overflow
            { duration: Duration }
            | e | { format_args!("shifting a timestamp by {:?} overflows", e.duration) },
    }
}

impl Timestamp {
    /// Interprets a wire value; `0` yields an unset timestamp.
    pub fn from_nanoseconds(nanoseconds: u64) -> Result<Timestamp, TimestampError> {
        if nanoseconds == 0 {
            return Ok(Self::none());
        }

        // u64::MAX / NANOS_PER_SEC fits into an i64.
        let secs = (nanoseconds / NANOS_PER_SEC) as i64;
        let nanos = (nanoseconds % NANOS_PER_SEC) as u32;
        match Utc.timestamp_opt(secs, nanos) {
            LocalResult::Single(time) => Ok(Timestamp { time: Some(time) }),
            _ => Err(TimestampError::out_of_range(nanoseconds)),
        }
    }

    pub fn now() -> Timestamp {
        Timestamp {
            time: Some(Utc::now()),
        }
    }

    pub fn none() -> Self {
        Timestamp { time: None }
    }

    pub fn is_set(&self) -> bool {
        self.time.is_some()
    }

    /// The wire value: nanoseconds since the epoch, `0` if unset.
    pub fn nanoseconds(&self) -> u64 {
        self.time.map_or(0, |time| {
            let secs = u64::try_from(time.timestamp()).unwrap_or_default();
            secs.saturating_mul(NANOS_PER_SEC)
                .saturating_add(u64::from(time.timestamp_subsec_nanos()))
        })
    }

    /// Time elapsed from `earlier` to `self`. `None` if either is unset or `earlier` is
    /// actually later.
    pub fn duration_since(&self, earlier: &Timestamp) -> Option<Duration> {
        match (self.time, earlier.time) {
            (Some(this), Some(earlier)) => this.signed_duration_since(earlier).to_std().ok(),
            _ => None,
        }
    }

    /// Strictly later than `other`; `false` as soon as either is unset.
    pub fn after(&self, other: &Timestamp) -> bool {
        match (self.time, other.time) {
            (Some(this), Some(other)) => this > other,
            _ => false,
        }
    }

    /// The same instant as a Tendermint time, `None` if unset.
    pub fn into_tm_time(self) -> Option<tendermint::Time> {
        let time = self.time?;
        tendermint::Time::from_unix_timestamp(time.timestamp(), time.timestamp_subsec_nanos()).ok()
    }

    fn shift(
        self,
        duration: Duration,
        op: fn(DateTime<Utc>, chrono::Duration) -> Option<DateTime<Utc>>,
    ) -> Result<Timestamp, TimestampError> {
        let Some(time) = self.time else {
            return Ok(self);
        };
        chrono::Duration::from_std(duration)
            .ok()
            .and_then(|delta| op(time, delta))
            .map(|time| Timestamp { time: Some(time) })
            .ok_or_else(|| TimestampError::overflow(duration))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self.time {
            Some(time) => write!(f, "{}", time.to_rfc3339()),
            None => write!(f, "unset"),
        }
    }
}

/// Times before the epoch have no wire representation and come out unset.
impl From<tendermint::Time> for Timestamp {
    fn from(time: tendermint::Time) -> Self {
        u64::try_from(time.unix_timestamp_nanos())
            .ok()
            .and_then(|nanos| Timestamp::from_nanoseconds(nanos).ok())
            .unwrap_or_default()
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Timestamp, TimestampError>;

    fn add(self, duration: Duration) -> Self::Output {
        self.shift(duration, |time, delta| time.checked_add_signed(delta))
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Result<Timestamp, TimestampError>;

    fn sub(self, duration: Duration) -> Self::Output {
        self.shift(duration, |time, delta| time.checked_sub_signed(delta))
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;
    use test_log::test;

    use super::{Timestamp, ZERO_DURATION};

    #[test]
    fn wire_values() {
        let unset = Timestamp::from_nanoseconds(0).unwrap();
        assert!(!unset.is_set());
        assert_eq!(unset.nanoseconds(), 0);
        assert_eq!(unset.to_string(), "unset");

        let one_ns = Timestamp::from_nanoseconds(1).unwrap();
        assert_eq!(one_ns.nanoseconds(), 1);
        let one_s = Timestamp::from_nanoseconds(1_000_000_000).unwrap();
        assert_eq!(one_s.nanoseconds(), 1_000_000_000);
        assert_eq!(one_s.to_string(), "1970-01-01T00:00:01+00:00");

        assert!(Timestamp::from_nanoseconds(i64::MAX as u64).is_ok());
    }

    #[test]
    fn ordering_treats_unset_as_lowest() {
        let unset = Timestamp::none();
        let early = Timestamp::from_nanoseconds(1).unwrap();
        let late = Timestamp::from_nanoseconds(2).unwrap();

        assert!(unset < early && early < late);
        assert!(late.after(&early));
        assert!(!early.after(&early));
        assert!(!late.after(&unset));
        assert!(!unset.after(&late));
    }

    #[test]
    fn arithmetic() {
        let unset = Timestamp::none();
        let t100 = Timestamp::from_nanoseconds(100).unwrap();
        let t150 = Timestamp::from_nanoseconds(150).unwrap();
        let t50 = Timestamp::from_nanoseconds(50).unwrap();
        let fifty = Duration::from_nanos(50);

        assert_eq!((t100 + ZERO_DURATION).unwrap(), t100);
        assert_eq!((t100 + fifty).unwrap(), t150);
        assert_eq!((t100 - fifty).unwrap(), t50);
        assert_eq!((unset + fifty).unwrap(), unset);
        assert_eq!((unset - fifty).unwrap(), unset);
        assert_eq!(t150.duration_since(&t100), Some(fifty));
        assert_eq!(t100.duration_since(&t150), None);
        assert!((t100 + Duration::from_secs(u64::MAX)).is_err());
    }

    #[test]
    fn tendermint_time_conversion() {
        let ts = Timestamp::from_nanoseconds(1_700_000_000_123_456_789).unwrap();
        let tm = ts.into_tm_time().unwrap();
        assert_eq!(tm.unix_timestamp_nanos(), 1_700_000_000_123_456_789);
        assert_eq!(Timestamp::from(tm), ts);
        assert_eq!(Timestamp::none().into_tm_time(), None);
    }
}
