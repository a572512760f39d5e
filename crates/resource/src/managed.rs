//! File resource whose release is backed by the cleaner

use crate::handle::{FileHandle, HandleWatch};
use crate::options::{ReleaseMode, ResourceOptions};
use reclaim_core::Result;
use reclaim_utils::cleanup::{Cleanable, Cleaner};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A writable file registered with a [`Cleaner`]
///
/// The handle is released exactly once, by whichever comes first:
///
/// - an explicit [`release`](Self::release),
/// - scope exit, in [`ReleaseMode::OnDrop`],
/// - the cleaner noticing the resource is gone, in [`ReleaseMode::Deferred`].
///
/// The cleaner path has no fixed timing. Code that needs the file closed at a
/// known point should call `release` or stay with `OnDrop`.
pub struct ManagedResource {
    handle: Arc<FileHandle>,
    cleanable: Cleanable,
    // Registered with the cleaner as the owner; dies with this value.
    owner: Arc<PathBuf>,
    release_mode: ReleaseMode,
}

impl ManagedResource {
    /// Open `path` and register its cleanup with default options
    pub fn create(cleaner: &Cleaner, path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with(cleaner, path, ResourceOptions::default())
    }

    /// Open `path` and register its cleanup.
    ///
    /// Nothing is registered when the open fails.
    pub fn create_with(
        cleaner: &Cleaner,
        path: impl AsRef<Path>,
        options: ResourceOptions,
    ) -> Result<Self> {
        let handle = Arc::new(FileHandle::open(path.as_ref(), &options)?);
        let owner = Arc::new(handle.path().to_path_buf());

        let cleanable = cleaner.register(
            &owner,
            format!("file: {}", handle.path().display()),
            cleanup_action(Arc::clone(&handle)),
        );

        tracing::debug!(
            path = %handle.path().display(),
            release_mode = %options.release_mode,
            "managed_resource_created"
        );

        Ok(Self {
            handle,
            cleanable,
            owner,
            release_mode: options.release_mode,
        })
    }

    /// Write `data` and flush it. Fails with a closed error after release.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.handle.write(data.as_ref())
    }

    /// Run the registered cleanup now.
    ///
    /// Only the first call closes the file; later calls return `Ok(())`.
    /// A failed close is reported to the caller of the first call.
    pub fn release(&self) -> Result<()> {
        self.cleanable.clean()
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn path(&self) -> &Path {
        self.owner.as_path()
    }

    pub fn bytes_written(&self) -> u64 {
        self.handle.bytes_written()
    }

    /// Observe whether the handle is closed, including after this value is dropped
    pub fn watch(&self) -> HandleWatch {
        self.handle.watch()
    }
}

/// The action handed to the cleaner. It only ever closes the handle.
fn cleanup_action(handle: Arc<FileHandle>) -> impl FnOnce() -> Result<()> + Send + 'static {
    move || {
        tracing::info!(path = %handle.path().display(), "Cleaning up: closing file");
        handle.close().map(|_| ())
    }
}

impl Drop for ManagedResource {
    fn drop(&mut self) {
        match self.release_mode {
            ReleaseMode::OnDrop => {
                if let Err(e) = self.cleanable.clean() {
                    tracing::error!(error = %e, "release on drop failed");
                }
            }
            ReleaseMode::Deferred => {
                if !self.cleanable.is_cleaned() {
                    tracing::debug!(
                        path = %self.owner.display(),
                        "managed resource dropped, release left to cleaner"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for ManagedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedResource")
            .field("path", &self.owner)
            .field("release_mode", &self.release_mode)
            .field("released", &self.is_released())
            .finish()
    }
}
