//! # Cooldown policy between log sessions.
//!
//! [`CooldownPolicy`] controls how long the supervisor loop waits after a
//! session ends (match, stream end, stream failure) before opening a new stream.
//!
//! The delay is constant: there is no growth factor and no retry ceiling, the
//! loop retries forever. Jitter can be layered on top to spread reconnects.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use logvisor::{CooldownPolicy, JitterPolicy};
//!
//! let cooldown = CooldownPolicy {
//!     interval: Duration::from_secs(2),
//!     jitter: JitterPolicy::None,
//! };
//! assert_eq!(cooldown.next(), Duration::from_secs(2));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Constant-interval cooldown with optional jitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownPolicy {
    /// Base delay between two sessions.
    pub interval: Duration,
    /// Jitter applied to `interval` on every call to [`CooldownPolicy::next`].
    pub jitter: JitterPolicy,
}

impl Default for CooldownPolicy {
    /// Returns `interval = 2s`, no jitter.
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            jitter: JitterPolicy::None,
        }
    }
}

impl CooldownPolicy {
    /// Creates a constant policy without jitter.
    pub fn constant(interval: Duration) -> Self {
        Self {
            interval,
            jitter: JitterPolicy::None,
        }
    }

    /// Computes the delay before the next session.
    ///
    /// Never exceeds `interval`.
    pub fn next(&self) -> Duration {
        self.jitter.apply(self.interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_two_seconds() {
        assert_eq!(CooldownPolicy::default().next(), Duration::from_secs(2));
    }

    #[test]
    fn test_constant_never_changes() {
        let policy = CooldownPolicy::constant(Duration::from_millis(750));
        for _ in 0..10 {
            assert_eq!(policy.next(), Duration::from_millis(750));
        }
    }

    #[test]
    fn test_jitter_never_exceeds_interval() {
        let policy = CooldownPolicy {
            interval: Duration::from_millis(400),
            jitter: JitterPolicy::Full,
        };
        for _ in 0..50 {
            assert!(policy.next() <= Duration::from_millis(400));
        }
    }
}
