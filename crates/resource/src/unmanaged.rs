//! File resource with no automatic release

use crate::handle::{FileHandle, HandleWatch};
use crate::options::ResourceOptions;
use reclaim_core::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// A writable file that is only ever closed by [`close`](Self::close)
///
/// Dropping it while open leaks the OS handle, and any lock it took, until
/// the process exits. A second `close` fails with a closed error rather than
/// silently succeeding.
pub struct UnmanagedResource {
    handle: Arc<FileHandle>,
}

impl UnmanagedResource {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::create_with(path, ResourceOptions::default())
    }

    /// Open `path`. The release mode in `options` does not apply here.
    pub fn create_with(path: impl AsRef<Path>, options: ResourceOptions) -> Result<Self> {
        let handle = FileHandle::open(path.as_ref(), &options)?;
        tracing::debug!(path = %handle.path().display(), "unmanaged_resource_created");

        Ok(Self {
            handle: Arc::new(handle),
        })
    }

    /// Write `data` and flush it. Fails with a closed error after close.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.handle.write(data.as_ref())
    }

    /// Close the file. Calling this again fails with a closed error.
    pub fn close(&self) -> Result<()> {
        if self.handle.is_closed() {
            return Err(Error::closed(self.handle.path(), "close"));
        }

        tracing::info!(path = %self.handle.path().display(), "Closing file");
        if self.handle.close()? {
            Ok(())
        } else {
            Err(Error::closed(self.handle.path(), "close"))
        }
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    pub fn bytes_written(&self) -> u64 {
        self.handle.bytes_written()
    }

    pub fn watch(&self) -> HandleWatch {
        self.handle.watch()
    }
}

impl Drop for UnmanagedResource {
    fn drop(&mut self) {
        if !self.handle.is_closed() {
            tracing::warn!(
                path = %self.handle.path().display(),
                "unmanaged resource dropped without close, leaking its handle"
            );
            // Nothing else will ever close it: keep it open until process exit.
            std::mem::forget(Arc::clone(&self.handle));
        }
    }
}

impl std::fmt::Debug for UnmanagedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnmanagedResource")
            .field("path", &self.handle.path())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_close() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manual.txt");

        let resource = UnmanagedResource::create(&path).unwrap();
        resource.write("Hello, manual close!\n").unwrap();
        resource.close().unwrap();

        assert!(resource.is_closed());
        assert_eq!(resource.bytes_written(), 21);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello, manual close!\n");
    }

    #[test]
    fn test_second_close_reports_already_closed() {
        let temp_dir = TempDir::new().unwrap();
        let resource = UnmanagedResource::create(temp_dir.path().join("twice.txt")).unwrap();

        resource.close().unwrap();
        let err = resource.close().unwrap_err();

        assert!(err.is_closed());
        assert!(err.is_io_failure());
        assert!(err.to_string().contains("close"));
    }

    #[test]
    fn test_drop_without_close_leaks_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leaked.txt");

        let resource = UnmanagedResource::create(&path).unwrap();
        let watch = resource.watch();
        drop(resource);

        assert!(!watch.is_closed());
    }

    #[test]
    fn test_create_twice_on_same_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("twice.txt");

        let first = UnmanagedResource::create(&path).unwrap();
        let second = UnmanagedResource::create(&path).unwrap();
        second.write("second").unwrap();

        first.close().unwrap();
        second.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_leaked_lock_blocks_recreate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("held.txt");
        let options = ResourceOptions::default().with_exclusive_lock(true);

        drop(UnmanagedResource::create_with(&path, options).unwrap());

        let err = UnmanagedResource::create_with(&path, options).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::WouldBlock));
        // Without the lock the path can still be reopened
        assert!(UnmanagedResource::create(&path).is_ok());
    }
}
