pub mod protobuf {
    include!("prost/google.protobuf.rs");

    use core::time;

    const NANOS_PER_SECOND: i32 = 1_000_000_000;

    impl Duration {
        /// Normalizes the duration so that `nanos` lies in `[0, 1e9)` for
        /// non-negative durations.
        pub fn normalize(&mut self) {
            if self.nanos <= -NANOS_PER_SECOND || self.nanos >= NANOS_PER_SECOND {
                self.seconds = self
                    .seconds
                    .saturating_add((self.nanos / NANOS_PER_SECOND) as i64);
                self.nanos %= NANOS_PER_SECOND;
            }

            if self.seconds > 0 && self.nanos < 0 {
                self.seconds -= 1;
                self.nanos += NANOS_PER_SECOND;
            }
        }
    }

    /// Converts a `std::time::Duration` to a `Duration`, saturating on overflow.
    impl From<time::Duration> for Duration {
        fn from(duration: time::Duration) -> Duration {
            let seconds = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
            let nanos = duration.subsec_nanos() as i32;

            let mut duration = Duration { seconds, nanos };
            duration.normalize();
            duration
        }
    }

    impl TryFrom<Duration> for time::Duration {
        type Error = time::Duration;

        /// Converts a `Duration` to a `std::time::Duration`, failing if the
        /// duration is negative. The error carries the absolute value.
        fn try_from(mut duration: Duration) -> Result<time::Duration, time::Duration> {
            duration.normalize();
            if duration.seconds >= 0 && duration.nanos >= 0 {
                Ok(time::Duration::new(
                    duration.seconds as u64,
                    duration.nanos as u32,
                ))
            } else {
                Err(time::Duration::new(
                    duration.seconds.unsigned_abs(),
                    duration.nanos.unsigned_abs(),
                ))
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn duration_conversion() {
            let std_duration = time::Duration::new(1_209_600, 500);
            let raw = Duration::from(std_duration);
            assert_eq!(raw.seconds, 1_209_600);
            assert_eq!(raw.nanos, 500);
            assert_eq!(time::Duration::try_from(raw), Ok(std_duration));

            let negative = Duration {
                seconds: -3,
                nanos: 0,
            };
            assert_eq!(
                time::Duration::try_from(negative),
                Err(time::Duration::from_secs(3))
            );
        }
    }
}
