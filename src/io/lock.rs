use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Advisory lock held around every store write, so the TUI and a
/// concurrently running `tl add` never interleave their writes.
///
/// The lock file is never removed: every process must `flock` the same
/// inode. Dropping the lock closes the descriptor, which releases it.
pub struct StoreLock {
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("store {path} is busy: another tl process is writing")]
    Timeout { path: PathBuf },
}

impl StoreLock {
    /// Lock the store `key` inside `data_dir`, waiting up to `timeout`.
    pub fn acquire(data_dir: &Path, key: &str, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(format!(".{}.lock", key));
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|source| LockError::CreateError {
                path: path.clone(),
                source,
            })?;

        let deadline = Instant::now() + timeout;
        while try_lock(&file).is_err() {
            if Instant::now() >= deadline {
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        Ok(StoreLock { _file: file })
    }

    /// Acquire with the default 2 second timeout
    pub fn acquire_default(data_dir: &Path, key: &str) -> Result<Self, LockError> {
        Self::acquire(data_dir, key, Duration::from_secs(2))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and stays open for the call.
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_is_released_on_drop() {
        let tmp = TempDir::new().unwrap();
        let lock = StoreLock::acquire_default(tmp.path(), "todos").unwrap();
        drop(lock);
        assert!(StoreLock::acquire(tmp.path(), "todos", Duration::from_millis(50)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn lock_file_outlives_the_holder() {
        use std::os::unix::fs::MetadataExt;
        let inode_of = |path: &Path| std::fs::metadata(path).unwrap().ino();

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".todos.lock");
        let lock = StoreLock::acquire_default(tmp.path(), "todos").unwrap();
        let inode = inode_of(&path);
        drop(lock);
        assert!(path.exists());

        // A later holder locks the same file, not a fresh one at the same path
        let _again = StoreLock::acquire_default(tmp.path(), "todos").unwrap();
        assert_eq!(inode_of(&path), inode);
    }


    #[test]
    fn contended_lock_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = StoreLock::acquire_default(tmp.path(), "todos").unwrap();
        let second = StoreLock::acquire(tmp.path(), "todos", Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[test]
    fn different_keys_do_not_contend() {
        let tmp = TempDir::new().unwrap();
        let _a = StoreLock::acquire_default(tmp.path(), "todos").unwrap();
        assert!(StoreLock::acquire(tmp.path(), "work", Duration::from_millis(50)).is_ok());
    }
}
