//! Configuration for the cleaner service.

use reclaim_core::{
    Error, Result, DEFAULT_CLEANER_THREAD_NAME, DEFAULT_SWEEP_INTERVAL,
    RECLAIM_SWEEP_INTERVAL_VAR,
};
use std::time::Duration;

/// Configuration for a [`Cleaner`](super::Cleaner)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanerConfig {
    /// How often the sweeper thread looks for unreachable owners
    pub sweep_interval: Duration,
    /// Name given to the sweeper thread
    pub thread_name: String,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            thread_name: DEFAULT_CLEANER_THREAD_NAME.to_string(),
        }
    }
}

impl CleanerConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Reads `RECLAIM_SWEEP_INTERVAL_MS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(RECLAIM_SWEEP_INTERVAL_VAR) {
            let millis: u64 = raw.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{RECLAIM_SWEEP_INTERVAL_VAR} must be a number of milliseconds, got '{raw}'"
                ))
            })?;
            config.sweep_interval = Duration::from_millis(millis);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the sweeper thread name
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Reject values the sweeper cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(Error::configuration(
                "cleaner sweep interval must be greater than zero",
            ));
        }
        if self.thread_name.trim().is_empty() {
            return Err(Error::configuration(
                "cleaner thread name must not be empty",
            ));
        }
        Ok(())
    }
}
