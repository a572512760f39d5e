/// Constants used throughout the reclaim codebase
use std::time::Duration;

// Environment variable names
pub const RECLAIM_SWEEP_INTERVAL_VAR: &str = "RECLAIM_SWEEP_INTERVAL_MS";
pub const RECLAIM_RELEASE_MODE_VAR: &str = "RECLAIM_RELEASE_MODE";
pub const RECLAIM_SYNC_ON_WRITE_VAR: &str = "RECLAIM_SYNC_ON_WRITE";
pub const RECLAIM_EXCLUSIVE_LOCK_VAR: &str = "RECLAIM_EXCLUSIVE_LOCK";
pub const RECLAIM_LOG_VAR: &str = "RECLAIM_LOG";

// Cleaner defaults
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_CLEANER_THREAD_NAME: &str = "reclaim-cleaner";

// Demonstration file names
pub const DEFAULT_MANAGED_PATH: &str = "example.txt";
pub const DEFAULT_UNMANAGED_PATH: &str = "example-unmanaged.txt";
