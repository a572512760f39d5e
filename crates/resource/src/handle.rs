//! File handle shared by both resource wrappers

use crate::options::ResourceOptions;
use fs2::FileExt;
use parking_lot::Mutex;
use reclaim_core::{Error, Result, ResultExt};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// An open file that can be closed exactly once
#[derive(Debug)]
pub struct FileHandle {
    path: PathBuf,
    file: Mutex<Option<File>>,
    closed: AtomicBool,
    bytes_written: AtomicU64,
    sync_on_write: bool,
}

impl FileHandle {
    /// Open `path` for writing, creating it if absent and truncating it
    /// if present.
    ///
    /// With `exclusive_lock` the file is locked before it is truncated, so
    /// a file still held by another locking handle is never clobbered and
    /// the open fails with a `WouldBlock` file system error instead.
    pub fn open(path: &Path, options: &ResourceOptions) -> Result<Self> {
        let file = if options.exclusive_lock {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)
                .fs_context(path, "open")?;
            file.try_lock_exclusive().fs_context(path, "lock")?;
            file.set_len(0).fs_context(path, "truncate")?;
            file
        } else {
            OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .fs_context(path, "open")?
        };

        tracing::debug!(path = %path.display(), "file_opened");

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(Some(file)),
            closed: AtomicBool::new(false),
            bytes_written: AtomicU64::new(0),
            sync_on_write: options.sync_on_write,
        })
    }

    /// Write all of `data` and flush it before returning
    pub fn write(&self, data: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(Error::closed(&self.path, "write"));
        }

        let mut guard = self.file.lock();
        let file = guard
            .as_mut()
            .ok_or_else(|| Error::closed(&self.path, "write"))?;

        file.write_all(data).fs_context(&self.path, "write")?;
        file.flush().fs_context(&self.path, "flush")?;
        if self.sync_on_write {
            file.sync_data().fs_context(&self.path, "sync")?;
        }

        self.bytes_written
            .fetch_add(data.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    /// Close the file.
    ///
    /// Returns `Ok(true)` when this call performed the close and `Ok(false)`
    /// when the handle had already been closed by someone else. An error
    /// still leaves the handle closed.
    pub fn close(&self) -> Result<bool> {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Ok(false);
        }

        let file = self.file.lock().take();
        match file {
            Some(file) => {
                close_file(&self.path, file, self.sync_on_write)?;
                tracing::debug!(
                    path = %self.path.display(),
                    bytes_written = self.bytes_written(),
                    "file_closed"
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total bytes successfully written through this handle
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }

    /// Observe this handle without keeping it open
    pub fn watch(self: &Arc<Self>) -> HandleWatch {
        HandleWatch {
            path: self.path.clone(),
            handle: Arc::downgrade(self),
        }
    }
}

/// Close, reporting failures that dropping a `File` would swallow
fn close_file(path: &Path, file: File, sync: bool) -> Result<()> {
    if sync {
        file.sync_all().fs_context(path, "sync")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::io::IntoRawFd;

        let fd = file.into_raw_fd();
        // SAFETY: `into_raw_fd` transferred ownership of `fd` to us and it is
        // closed exactly once, here.
        if unsafe { libc::close(fd) } != 0 {
            return Err(Error::file_system(
                path,
                "close",
                std::io::Error::last_os_error(),
            ));
        }
    }

    #[cfg(not(unix))]
    drop(file);

    Ok(())
}

/// Read-only view of whether a [`FileHandle`] has been closed
///
/// Holds only a weak reference, so watching a handle never keeps the file
/// open. A handle that no longer exists counts as closed.
#[derive(Debug, Clone)]
pub struct HandleWatch {
    path: PathBuf,
    handle: Weak<FileHandle>,
}

impl HandleWatch {
    pub fn is_closed(&self) -> bool {
        self.handle
            .upgrade()
            .map_or(true, |handle| handle.is_closed())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn plain() -> ResourceOptions {
        ResourceOptions::default()
    }

    fn locking() -> ResourceOptions {
        ResourceOptions::default().with_exclusive_lock(true)
    }

    #[test]
    fn test_open_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("existing.txt");
        fs::write(&path, "stale contents").unwrap();

        let handle = FileHandle::open(&path, &plain()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"");

        handle.write(b"fresh").unwrap();
        handle.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "fresh");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("file.txt");

        let err = FileHandle::open(&path, &plain()).unwrap_err();
        assert!(err.is_io_failure());
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_second_open_succeeds_without_lock() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("shared.txt");

        let first = FileHandle::open(&path, &plain()).unwrap();
        first.write(b"first").unwrap();

        let second = FileHandle::open(&path, &plain()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"");
        second.write(b"second").unwrap();

        first.close().unwrap();
        second.close().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_second_open_is_refused_while_locked() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.txt");

        let first = FileHandle::open(&path, &locking()).unwrap();
        first.write(b"keep me").unwrap();

        let err = FileHandle::open(&path, &locking()).unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::WouldBlock));
        // The refused open must not have truncated the file
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");

        first.close().unwrap();
        assert!(FileHandle::open(&path, &locking()).is_ok());
    }

    #[test]
    fn test_close_once() {
        let temp_dir = TempDir::new().unwrap();
        let handle = FileHandle::open(&temp_dir.path().join("once.txt"), &plain()).unwrap();

        assert!(handle.close().unwrap());
        assert!(!handle.close().unwrap());
        assert!(handle.is_closed());
    }

    #[test]
    fn test_write_after_close_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("closed.txt");
        let options = plain().with_sync_on_write(true);
        let handle = FileHandle::open(&path, &options).unwrap();

        handle.write(b"abc").unwrap();
        handle.close().unwrap();

        let err = handle.write(b"def").unwrap_err();
        assert!(err.is_closed());
        assert_eq!(handle.bytes_written(), 3);
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc");
    }

    #[test]
    fn test_watch_does_not_keep_handle_alive() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("watched.txt");
        let handle = Arc::new(FileHandle::open(&path, &locking()).unwrap());

        let watch = handle.watch();
        assert!(!watch.is_closed());
        assert_eq!(watch.path(), path.as_path());

        drop(handle);
        assert!(watch.is_closed());
        assert!(FileHandle::open(&path, &locking()).is_ok());
    }

    #[cfg(unix)]
    mod fifo {
        use super::*;
        use crate::test_support::FifoFixture;

        #[test]
        fn test_close_skips_sync_unless_requested() {
            let fifo = FifoFixture::new();

            // fsync is not supported on a pipe, so only a plain close succeeds
            let handle = FileHandle::open(fifo.path(), &plain()).unwrap();
            assert!(handle.close().unwrap());
        }

        #[test]
        fn test_failed_close_is_reported_once() {
            let fifo = FifoFixture::new();
            let options = plain().with_sync_on_write(true);
            let handle = FileHandle::open(fifo.path(), &options).unwrap();

            let err = handle.close().unwrap_err();
            assert!(err.is_io_failure());
            assert!(err.to_string().contains("sync"));

            assert!(handle.is_closed());
            assert!(!handle.close().unwrap());
            assert!(handle.write(b"late").unwrap_err().is_closed());
        }
    }
}
