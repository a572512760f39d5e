//! Helpers shared by the resource integration tests

#![allow(dead_code)]

use fs2::FileExt;
use std::fs::OpenOptions;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

/// Whether a fresh handle can take the exclusive lock on `path`.
///
/// Only meaningful for resources opened with `exclusive_lock`. The checking
/// handle is dropped immediately, releasing the lock again.
pub fn can_lock_exclusively(path: &Path) -> bool {
    let file = OpenOptions::new()
        .write(true)
        .open(path)
        .expect("open for lock check");
    file.try_lock_exclusive().is_ok()
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    condition()
}
