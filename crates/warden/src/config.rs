//! Configuration for credential actors.

use std::time::Duration;

use warden_core::key::MAX_ITERATIONS;
use warden_core::DEFAULT_ITERATIONS;

use crate::error::{Result, WardenError};

/// Configuration shared by every actor of a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardenConfig {
    /// PBKDF2 iteration count for newly hashed passwords.
    pub iterations: u32,
    /// Bounded mailbox size per actor. Senders wait when it is full.
    pub mailbox_capacity: usize,
    /// Retire an actor after this long without a request. `None` keeps
    /// actors until they are evicted.
    pub idle_timeout: Option<Duration>,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            mailbox_capacity: 64,
            idle_timeout: None,
        }
    }
}

impl WardenConfig {
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Reject settings the actors cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(WardenError::Config(format!(
                "iterations must be in 1..={}, got {}",
                MAX_ITERATIONS, self.iterations
            )));
        }
        if self.mailbox_capacity == 0 {
            return Err(WardenError::Config(
                "mailbox_capacity must be at least 1".into(),
            ));
        }
        if self.idle_timeout == Some(Duration::ZERO) {
            return Err(WardenError::Config("idle_timeout must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WardenConfig::default();
        assert_eq!(config.iterations, 100_000);
        config.validate().unwrap();
    }

    #[test]
    fn test_rejects_out_of_range_iterations() {
        assert!(WardenConfig::default().iterations(0).validate().is_err());
        assert!(WardenConfig::default()
            .iterations(MAX_ITERATIONS + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_zero_mailbox() {
        let err = WardenConfig::default().mailbox_capacity(0).validate();
        assert!(matches!(err, Err(WardenError::Config(_))));
    }

    #[test]
    fn test_idle_timeout() {
        assert_eq!(WardenConfig::default().idle_timeout, None);

        let config = WardenConfig::default().idle_timeout(Duration::from_secs(30));
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(30)));
        config.validate().unwrap();

        let err = WardenConfig::default().idle_timeout(Duration::ZERO).validate();
        assert!(matches!(err, Err(WardenError::Config(_))));
    }
}
