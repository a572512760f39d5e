//! Options shared by both resource wrappers

use reclaim_core::{
    Error, Result, RECLAIM_EXCLUSIVE_LOCK_VAR, RECLAIM_RELEASE_MODE_VAR,
    RECLAIM_SYNC_ON_WRITE_VAR,
};
use std::fmt;
use std::str::FromStr;

/// What dropping an unreleased [`ManagedResource`](crate::ManagedResource) does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseMode {
    /// Release at scope exit, on the dropping thread
    #[default]
    OnDrop,
    /// Leave the release to the cleaner's next sweep
    Deferred,
}

impl fmt::Display for ReleaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseMode::OnDrop => write!(f, "on-drop"),
            ReleaseMode::Deferred => write!(f, "deferred"),
        }
    }
}

impl FromStr for ReleaseMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on-drop" => Ok(ReleaseMode::OnDrop),
            "deferred" => Ok(ReleaseMode::Deferred),
            other => Err(Error::configuration(format!(
                "unknown release mode '{other}', expected 'on-drop' or 'deferred'"
            ))),
        }
    }
}

/// Options applied when a resource opens its file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceOptions {
    /// Only consulted by managed resources
    pub release_mode: ReleaseMode,
    /// Call `sync_data` after every write and `sync_all` before closing
    pub sync_on_write: bool,
    /// Take an advisory exclusive lock before truncating. A file locked by
    /// another handle then fails to open instead of being clobbered.
    pub exclusive_lock: bool,
}

impl ResourceOptions {
    /// Build options from `RECLAIM_RELEASE_MODE`, `RECLAIM_SYNC_ON_WRITE`
    /// and `RECLAIM_EXCLUSIVE_LOCK`
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(mode) = std::env::var(RECLAIM_RELEASE_MODE_VAR) {
            options.release_mode = mode.parse()?;
        }

        if let Some(sync) = env_flag(RECLAIM_SYNC_ON_WRITE_VAR)? {
            options.sync_on_write = sync;
        }

        if let Some(lock) = env_flag(RECLAIM_EXCLUSIVE_LOCK_VAR)? {
            options.exclusive_lock = lock;
        }

        Ok(options)
    }

    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }

    pub fn with_sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    pub fn with_exclusive_lock(mut self, lock: bool) -> Self {
        self.exclusive_lock = lock;
        self
    }
}

fn env_flag(var: &str) -> Result<Option<bool>> {
    match std::env::var(var) {
        Ok(raw) => parse_flag(&raw).map(Some).ok_or_else(|| {
            Error::configuration(format!("{var} must be true or false, got '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_release_mode_parsing() {
        assert_eq!("on-drop".parse::<ReleaseMode>().unwrap(), ReleaseMode::OnDrop);
        assert_eq!("Deferred".parse::<ReleaseMode>().unwrap(), ReleaseMode::Deferred);
        assert!("sometimes".parse::<ReleaseMode>().is_err());
        for alias in ["ondrop", "scope", "cleaner"] {
            assert!(alias.parse::<ReleaseMode>().is_err(), "{alias} accepted");
        }

        for mode in [ReleaseMode::OnDrop, ReleaseMode::Deferred] {
            assert_eq!(mode.to_string().parse::<ReleaseMode>().unwrap(), mode);
        }
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var(RECLAIM_RELEASE_MODE_VAR, "deferred");
        std::env::set_var(RECLAIM_SYNC_ON_WRITE_VAR, "yes");
        std::env::set_var(RECLAIM_EXCLUSIVE_LOCK_VAR, "on");
        let options = ResourceOptions::from_env();
        std::env::remove_var(RECLAIM_RELEASE_MODE_VAR);
        std::env::remove_var(RECLAIM_SYNC_ON_WRITE_VAR);
        std::env::remove_var(RECLAIM_EXCLUSIVE_LOCK_VAR);

        let options = options.unwrap();
        assert_eq!(options.release_mode, ReleaseMode::Deferred);
        assert!(options.sync_on_write);
        assert!(options.exclusive_lock);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_and_errors() {
        std::env::remove_var(RECLAIM_RELEASE_MODE_VAR);
        std::env::remove_var(RECLAIM_SYNC_ON_WRITE_VAR);
        std::env::remove_var(RECLAIM_EXCLUSIVE_LOCK_VAR);
        let defaults = ResourceOptions::from_env().unwrap();
        assert_eq!(defaults, ResourceOptions::default());
        assert!(!defaults.exclusive_lock);

        std::env::set_var(RECLAIM_SYNC_ON_WRITE_VAR, "maybe");
        let result = ResourceOptions::from_env();
        std::env::remove_var(RECLAIM_SYNC_ON_WRITE_VAR);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }
}
