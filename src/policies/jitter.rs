//! # Jitter policy for cooldown delays.
//!
//! [`JitterPolicy`] adds randomness to the delay between two log sessions.
//!
//! - [`JitterPolicy::None`] no randomization, predictable delays
//! - [`JitterPolicy::Full`] random delay in [0, delay]
//! - [`JitterPolicy::Equal`] delay = delay/2 + random[0, delay/2]

use rand::Rng;
use std::str::FromStr;
use std::time::Duration;

/// Policy controlling randomization of cooldown delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// No jitter: use the exact interval.
    #[default]
    None,

    /// Full jitter: random delay in [0, delay].
    ///
    /// Can reduce the delay to zero; use when reconnect storms matter more
    /// than a guaranteed pause.
    Full,

    /// Equal jitter: delay = delay/2 + random[0, delay/2].
    ///
    /// Keeps at least half of the configured interval.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => self.full_jitter(delay),
            JitterPolicy::Equal => self.equal_jitter(delay),
        }
    }

    /// Full jitter: random[0, delay]
    fn full_jitter(&self, delay: Duration) -> Duration {
        let nanos = saturating_nanos(delay);
        if nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rand::rng().random_range(0..=nanos))
    }

    /// Equal jitter: delay/2 + random[0, delay/2]
    fn equal_jitter(&self, delay: Duration) -> Duration {
        let nanos = saturating_nanos(delay);
        let half = nanos / 2;
        let jitter = if half == 0 {
            0
        } else {
            rand::rng().random_range(0..=half)
        };
        Duration::from_nanos(half + jitter)
    }
}

/// Delays beyond `u64::MAX` nanoseconds (~584 years) are clamped.
fn saturating_nanos(delay: Duration) -> u64 {
    u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)
}

impl FromStr for JitterPolicy {
    type Err = ();

    /// Parses `none`, `full` or `equal` (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(JitterPolicy::None),
            "full" => Ok(JitterPolicy::Full),
            "equal" => Ok(JitterPolicy::Equal),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let d = Duration::from_millis(1234);
        assert_eq!(JitterPolicy::None.apply(d), d);
    }

    #[test]
    fn test_full_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(d) <= d);
        }
    }

    #[test]
    fn test_equal_jitter_bounds() {
        let d = Duration::from_millis(1000);
        for _ in 0..100 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_millis(500));
            assert!(j <= d);
        }
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        assert_eq!(JitterPolicy::Full.apply(Duration::ZERO), Duration::ZERO);
        assert_eq!(JitterPolicy::Equal.apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_huge_delay_does_not_wrap() {
        let huge = Duration::from_secs(u64::MAX);
        for _ in 0..100 {
            assert!(JitterPolicy::Full.apply(huge) <= huge);
            let j = JitterPolicy::Equal.apply(huge);
            assert!(j >= Duration::from_nanos(u64::MAX / 2));
            assert!(j <= huge);
        }
    }

    #[test]
    fn test_sub_millisecond_delay_keeps_precision() {
        let d = Duration::from_micros(800);
        for _ in 0..100 {
            let j = JitterPolicy::Equal.apply(d);
            assert!(j >= Duration::from_micros(400));
            assert!(j <= d);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Equal".parse::<JitterPolicy>(), Ok(JitterPolicy::Equal));
        assert_eq!("full".parse::<JitterPolicy>(), Ok(JitterPolicy::Full));
        assert_eq!("none".parse::<JitterPolicy>(), Ok(JitterPolicy::None));
        assert!("sometimes".parse::<JitterPolicy>().is_err());
    }
}
