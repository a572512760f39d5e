//! The cleaner service and its registration token.

use super::config::CleanerConfig;
use super::metrics::{CleanerMetrics, CleanerStats};
use super::registry::{CleanupEntry, CleanupRegistry};
use crossbeam::channel::{self, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use reclaim_core::{Error, Result};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Messages understood by the sweeper thread
enum Signal {
    Sweep,
    Shutdown,
}

struct Sweeper {
    signals: Sender<Signal>,
    thread: JoinHandle<()>,
}

struct CleanerInner {
    config: CleanerConfig,
    registry: Mutex<CleanupRegistry>,
    metrics: CleanerMetrics,
    sweeper: Mutex<Option<Sweeper>>,
}

/// Process-wide deferred-cleanup service
///
/// Construct one at startup and hand clones to whatever needs to register
/// cleanups. Clones share the same registry and sweeper thread. The service
/// stays alive while any clone or any [`Cleanable`] exists; call
/// [`Cleaner::shutdown`] to stop the sweeper deterministically.
#[derive(Clone)]
pub struct Cleaner {
    inner: Arc<CleanerInner>,
}

impl Cleaner {
    /// Create a cleaner without a sweeper thread.
    ///
    /// Unreachable owners are only cleaned when [`Cleaner::run_pending`] or
    /// [`Cleaner::shutdown`] is called.
    pub fn new(config: CleanerConfig) -> Self {
        Self {
            inner: Arc::new(CleanerInner {
                config,
                registry: Mutex::new(CleanupRegistry::new()),
                metrics: CleanerMetrics::default(),
                sweeper: Mutex::new(None),
            }),
        }
    }

    /// Create a cleaner and start its background sweeper thread
    pub fn start(config: CleanerConfig) -> Result<Self> {
        config.validate()?;

        let cleaner = Self::new(config);
        let (signals, receiver) = channel::unbounded();
        let weak = Arc::downgrade(&cleaner.inner);
        let interval = cleaner.inner.config.sweep_interval;

        let thread = thread::Builder::new()
            .name(cleaner.inner.config.thread_name.clone())
            .spawn(move || sweep_loop(weak, receiver, interval))
            .map_err(|e| Error::configuration(format!("failed to spawn cleaner thread: {e}")))?;

        tracing::debug!(
            thread = %cleaner.inner.config.thread_name,
            interval_ms = %interval.as_millis(),
            "cleaner_started"
        );

        *cleaner.inner.sweeper.lock() = Some(Sweeper { signals, thread });
        Ok(cleaner)
    }

    /// Register `action` to run once `owner` has no strong references left
    pub fn register<O, F>(&self, owner: &Arc<O>, description: impl Into<String>, action: F) -> Cleanable
    where
        O: ?Sized + Send + Sync + 'static,
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let description = description.into();
        let id = self
            .inner
            .registry
            .lock()
            .register(owner, description.clone(), Box::new(action));
        self.inner.metrics.record_registered();

        tracing::trace!(id, description = %description, "cleanup_registered");

        Cleanable {
            id,
            description,
            inner: Arc::clone(&self.inner),
        }
    }

    /// Run every action whose owner is unreachable, on the calling thread.
    ///
    /// Returns how many actions ran.
    pub fn run_pending(&self) -> usize {
        self.inner.sweep()
    }

    /// Wake the sweeper thread ahead of its next interval
    pub fn request_sweep(&self) {
        if let Some(sweeper) = self.inner.sweeper.lock().as_ref() {
            let _ = sweeper.signals.send(Signal::Sweep);
        }
    }

    /// Stop the sweeper thread, then clean every unreachable owner.
    ///
    /// Registrations whose owners are still alive stay in place and can
    /// still be triggered through their [`Cleanable`]. Calling this more
    /// than once is harmless.
    pub fn shutdown(&self) {
        let sweeper = self.inner.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            let _ = sweeper.signals.send(Signal::Shutdown);
            if sweeper.thread.thread().id() != thread::current().id()
                && sweeper.thread.join().is_err()
            {
                tracing::error!("cleaner thread panicked before shutdown");
            }
        }

        let cleaned = self.inner.sweep();
        tracing::debug!(cleaned, pending = self.pending(), "cleaner_shutdown");
    }

    /// Whether a sweeper thread is running
    pub fn is_running(&self) -> bool {
        self.inner.sweeper.lock().is_some()
    }

    /// Number of registrations not yet cleaned
    pub fn pending(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// Current counters
    pub fn stats(&self) -> CleanerStats {
        self.inner.metrics.snapshot(self.pending())
    }
}

impl fmt::Debug for Cleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleaner")
            .field("config", &self.inner.config)
            .field("running", &self.is_running())
            .field("pending", &self.pending())
            .finish()
    }
}

impl CleanerInner {
    fn sweep(&self) -> usize {
        // Entries leave the registry under the lock; actions run without it.
        let entries = self.registry.lock().take_unreachable();
        let count = entries.len();

        for entry in entries {
            self.run_automatic(entry);
        }

        count
    }

    fn run_automatic(&self, entry: CleanupEntry) {
        let CleanupEntry {
            description,
            action,
            ..
        } = entry;
        self.metrics.record_automatic();

        let outcome = match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(Error::cleanup(&description, e.to_string())),
            Err(payload) => Err(Error::cleanup(&description, panic_message(payload.as_ref()))),
        };

        match outcome {
            Ok(()) => tracing::debug!(description = %description, "cleanup_completed"),
            Err(e) => {
                self.metrics.record_failure();
                tracing::error!(error = %e, "cleanup_failed");
            }
        }
    }
}

impl Drop for CleanerInner {
    fn drop(&mut self) {
        // The sweeper may be the thread dropping the last reference, so it
        // is told to stop but never joined from here.
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            let _ = sweeper.signals.send(Signal::Shutdown);
        }
        self.sweep();
    }
}

fn sweep_loop(
    inner: Weak<CleanerInner>,
    signals: channel::Receiver<Signal>,
    interval: Duration,
) {
    loop {
        match signals.recv_timeout(interval) {
            Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Ok(Signal::Sweep) | Err(RecvTimeoutError::Timeout) => {}
        }

        let Some(inner) = inner.upgrade() else {
            break;
        };
        let cleaned = inner.sweep();
        if cleaned > 0 {
            tracing::debug!(cleaned, "cleaner_sweep");
        }
    }

    tracing::trace!("cleaner thread exiting");
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Registration token returned by [`Cleaner::register`]
///
/// Dropping it does not unregister anything: the action still runs once
/// the owner is unreachable.
pub struct Cleanable {
    id: u64,
    description: String,
    inner: Arc<CleanerInner>,
}

impl Cleanable {
    /// Run the action now on the calling thread.
    ///
    /// The automatic path can no longer run it afterwards. Only the first
    /// call does anything; later calls, or calls after the cleaner already
    /// ran it, return `Ok(())`. Errors from the action are returned as-is.
    pub fn clean(&self) -> Result<()> {
        let entry = self.inner.registry.lock().take(self.id);
        match entry {
            Some(entry) => {
                self.inner.metrics.record_explicit();
                tracing::debug!(description = %self.description, "cleanup_triggered");
                (entry.action)()
            }
            None => Ok(()),
        }
    }

    /// Whether the action has run or is running
    pub fn is_cleaned(&self) -> bool {
        !self.inner.registry.lock().contains(self.id)
    }
}

impl fmt::Debug for Cleanable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanable")
            .field("id", &self.id)
            .field("description", &self.description)
            .field("cleaned", &self.is_cleaned())
            .finish()
    }
}
