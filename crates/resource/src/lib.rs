//! Two ways to own a writable file
//!
//! - [`ManagedResource`] registers its release with a
//!   [`Cleaner`](reclaim_utils::cleanup::Cleaner). It can be released
//!   explicitly, at scope exit, or by the cleaner once it has been dropped.
//! - [`UnmanagedResource`] must be closed by its owner. If it never is, the
//!   handle stays open until the process exits.
//!
//! Both wrap a [`FileHandle`]: the file is opened for writing, truncated,
//! and closed at most once. Setting
//! [`exclusive_lock`](ResourceOptions::exclusive_lock) takes an advisory lock
//! first, so a file another locking handle still holds is left alone. Every write is flushed
//! before it returns, and any write after close fails with
//! [`Error::Closed`](reclaim_core::Error::Closed) without touching the file.
//!
//! ```rust,no_run
//! use reclaim_resource::{ManagedResource, UnmanagedResource};
//! use reclaim_utils::cleanup::{Cleaner, CleanerConfig};
//!
//! # fn main() -> reclaim_core::Result<()> {
//! let cleaner = Cleaner::start(CleanerConfig::default())?;
//!
//! let managed = ManagedResource::create(&cleaner, "a.txt")?;
//! managed.write("hello\n")?;
//! managed.release()?;
//! managed.release()?; // no-op
//!
//! let unmanaged = UnmanagedResource::create("b.txt")?;
//! unmanaged.write("x")?;
//! unmanaged.close()?;
//!
//! cleaner.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod handle;
pub mod managed;
pub mod options;
pub mod unmanaged;

#[cfg(all(test, unix))]
mod test_support;

pub use handle::{FileHandle, HandleWatch};
pub use managed::ManagedResource;
pub use options::{ReleaseMode, ResourceOptions};
pub use unmanaged::UnmanagedResource;
