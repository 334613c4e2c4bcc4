//! Request deadline token.
//!
//! Created at the HTTP boundary, plumbed through every upstream call and
//! polled at cheap checkpoints inside traversal loops. On expiry the
//! simulation abandons its work; partial results are never returned.

use std::time::{Duration, Instant};

use crate::errors::ImpactError;

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    expires_at: Instant,
}

impl Deadline {
    /// A deadline expiring `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            expires_at: now + timeout,
        }
    }

    /// Time left before expiry; zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Cap a per-call timeout to whatever the deadline leaves.
    pub fn cap(&self, timeout: Duration) -> Duration {
        timeout.min(self.remaining())
    }

    /// Poll point: error once the deadline has passed.
    pub fn check(&self, operation: &str) -> Result<(), ImpactError> {
        if self.expired() {
            Err(ImpactError::SourceTimeout {
                operation: operation.to_string(),
                elapsed_ms: self.started.elapsed().as_millis() as u64,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_deadline_passes_checks() {
        let d = Deadline::after(Duration::from_secs(60));
        assert!(!d.expired());
        assert!(d.check("anything").is_ok());
        assert!(d.remaining() > Duration::from_secs(59));
    }

    #[test]
    fn expired_deadline_fails_checks() {
        let d = Deadline::after(Duration::ZERO);
        assert!(d.expired());
        let err = d.check("path enumeration").unwrap_err();
        assert!(matches!(err, ImpactError::SourceTimeout { .. }));
    }

    #[test]
    fn cap_never_exceeds_remaining() {
        let d = Deadline::after(Duration::from_millis(100));
        assert!(d.cap(Duration::from_secs(5)) <= Duration::from_millis(100));
    }
}
