//! # Log scanner: first-match detection within one session.
//!
//! [`scan`] pulls lines from a [`LogStream`](crate::LogStream) one at a time, in
//! arrival order, and tests each against a [`TriggerPattern`].
//!
//! ```text
//! next line ──► contains(pattern)? ── yes ──► Matched { line }   (stop pulling)
//!     │                 └──────────── no ───► next line
//!     ├─ stream closed ─────────────────────► StreamEnded
//!     ├─ Err(e) ────────────────────────────► StreamFailed(e)
//!     └─ token cancelled ───────────────────► Cancelled
//! ```
//!
//! ## Rules
//! - Matching is a **case-sensitive substring** test.
//! - **At most one** match per session: lines after the first match are never pulled.
//! - No buffering beyond the current line.

use std::fmt;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::error::{ConfigError, GatewayError};

/// Immutable, non-empty substring whose appearance triggers a restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerPattern(Arc<str>);

impl TriggerPattern {
    /// Creates a pattern. An empty pattern would match every line and is rejected.
    ///
    /// # Example
    /// ```
    /// use logvisor::{ConfigError, TriggerPattern};
    ///
    /// assert!(TriggerPattern::new("OOM").is_ok());
    /// assert_eq!(TriggerPattern::new(""), Err(ConfigError::EmptyPattern));
    /// ```
    pub fn new(pattern: impl Into<Arc<str>>) -> Result<Self, ConfigError> {
        let pattern = pattern.into();
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        Ok(Self(pattern))
    }

    /// Returns `true` if `line` contains the pattern (case-sensitive).
    #[inline]
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&*self.0)
    }

    /// Returns the pattern text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a shared handle to the pattern text (for events).
    pub fn as_arc(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl fmt::Display for TriggerPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a scan ended.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A line contained the pattern.
    Matched {
        /// The matching line.
        line: String,
    },
    /// The producer closed the stream.
    StreamEnded,
    /// The producer reported an I/O-level failure.
    StreamFailed(GatewayError),
    /// The token was cancelled while waiting for a line.
    Cancelled,
}

/// Scans `lines` until the first match, the end of the stream, a failure or cancellation.
///
/// The stream is borrowed: on `Matched`, anything not yet pulled stays in it.
pub async fn scan<S>(lines: &mut S, pattern: &TriggerPattern, token: &CancellationToken) -> ScanOutcome
where
    S: Stream<Item = Result<String, GatewayError>> + Unpin + ?Sized,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = token.cancelled() => return ScanOutcome::Cancelled,
            next = lines.next() => next,
        };

        match next {
            Some(Ok(line)) => {
                if pattern.matches(&line) {
                    return ScanOutcome::Matched { line };
                }
            }
            Some(Err(e)) => return ScanOutcome::StreamFailed(e),
            None => return ScanOutcome::StreamEnded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn lines(items: &[&str]) -> impl Stream<Item = Result<String, GatewayError>> + Unpin + use<> {
        stream::iter(items.iter().map(|l| Ok(l.to_string())).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_first_match_wins_and_rest_is_not_consumed() {
        let pattern = TriggerPattern::new("OOM").unwrap();
        let mut s = lines(&["starting", "ok", "OOM killed process 4", "recovering"]);
        let token = CancellationToken::new();

        let out = scan(&mut s, &pattern, &token).await;
        assert_eq!(
            out,
            ScanOutcome::Matched {
                line: "OOM killed process 4".into()
            }
        );

        let rest: Vec<_> = s.collect().await;
        assert_eq!(rest, vec![Ok("recovering".to_string())]);
    }

    #[tokio::test]
    async fn test_no_match_ends() {
        let pattern = TriggerPattern::new("panic").unwrap();
        let mut s = lines(&["a", "b", "PANIC"]);
        let out = scan(&mut s, &pattern, &CancellationToken::new()).await;
        assert_eq!(out, ScanOutcome::StreamEnded);
    }

    #[test]
    fn test_match_is_case_sensitive_substring() {
        let pattern = TriggerPattern::new("Error").unwrap();
        assert!(pattern.matches("fatal Error: disk"));
        assert!(!pattern.matches("fatal error: disk"));
        assert!(pattern.matches("Error"));
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let pattern = TriggerPattern::new("x").unwrap();
        let err = GatewayError::Stream {
            id: "c1".into(),
            error: "unexpected EOF".into(),
        };
        let mut s = stream::iter(vec![Ok("a".to_string()), Err(err.clone())]);
        let out = scan(&mut s, &pattern, &CancellationToken::new()).await;
        assert_eq!(out, ScanOutcome::StreamFailed(err));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_read() {
        let pattern = TriggerPattern::new("x").unwrap();
        let mut s = stream::pending::<Result<String, GatewayError>>();
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            child.cancel();
        });
        let out = scan(&mut s, &pattern, &token).await;
        assert_eq!(out, ScanOutcome::Cancelled);
    }

    #[test]
    fn test_empty_pattern_rejected() {
        assert_eq!(TriggerPattern::new(""), Err(ConfigError::EmptyPattern));
    }
}
