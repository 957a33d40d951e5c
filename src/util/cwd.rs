//! Scoped working-directory changes.
//!
//! The current directory is process-wide state. [`WorkingDirGuard`] is the
//! only place in the crate that changes it: entering takes a process-wide
//! lock, switches directory, and the original directory is restored when the
//! guard is dropped, on success, on error, and while unwinding.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::BuildError;

static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Holds the process inside a directory until dropped.
#[derive(Debug)]
pub struct WorkingDirGuard {
    original: PathBuf,
    current: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl WorkingDirGuard {
    /// Switch into `dir`, remembering the directory to return to.
    ///
    /// Blocks while another guard in this process is alive.
    pub fn enter(dir: &Path) -> Result<Self, BuildError> {
        // A panic while holding the lock still restored the directory in Drop.
        let lock = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let original = std::env::current_dir()
            .map_err(|e| BuildError::io("failed to read the current directory", e))?;

        std::env::set_current_dir(dir).map_err(|e| {
            BuildError::io(format!("failed to enter directory: {}", dir.display()), e)
        })?;
        tracing::debug!("entered {}", dir.display());

        Ok(WorkingDirGuard {
            original,
            current: dir.to_path_buf(),
            _lock: lock,
        })
    }

    /// Directory that will be restored on drop.
    pub fn original(&self) -> &Path {
        &self.original
    }

    /// Directory the guard switched into.
    pub fn current(&self) -> &Path {
        &self.current
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        match std::env::set_current_dir(&self.original) {
            Ok(()) => tracing::debug!("returned to {}", self.original.display()),
            Err(e) => tracing::error!(
                "failed to restore working directory {}: {}",
                self.original.display(),
                e
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    static SERIAL: Mutex<()> = Mutex::new(());

    /// Held by every test that changes the working directory or compares it
    /// before and after a run.
    pub(crate) fn lock_cwd() -> MutexGuard<'static, ()> {
        SERIAL.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn same_dir(a: &Path, b: &Path) -> bool {
        a.canonicalize().unwrap() == b.canonicalize().unwrap()
    }

    #[test]
    fn test_guard_restores_on_drop() {
        let _cwd = lock_cwd();
        let before = std::env::current_dir().unwrap();
        let tmp = TempDir::new().unwrap();
        {
            let guard = WorkingDirGuard::enter(tmp.path()).unwrap();
            assert!(same_dir(&std::env::current_dir().unwrap(), tmp.path()));
            assert!(same_dir(guard.current(), tmp.path()));
            assert_eq!(guard.original(), before);
        }
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        fn fails_inside(dir: &Path) -> Result<(), BuildError> {
            let _guard = WorkingDirGuard::enter(dir)?;
            Err(BuildError::BuildFailed {
                code: Some(2),
                output: String::new(),
            })
        }

        let _cwd = lock_cwd();
        let before = std::env::current_dir().unwrap();
        let tmp = TempDir::new().unwrap();
        assert!(fails_inside(tmp.path()).is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_enter_missing_directory_fails() {
        let _cwd = lock_cwd();
        let before = std::env::current_dir().unwrap();
        let tmp = TempDir::new().unwrap();
        let err = WorkingDirGuard::enter(&tmp.path().join("missing")).unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn test_guard_restores_while_unwinding() {
        let _cwd = lock_cwd();
        let before = std::env::current_dir().unwrap();
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();

        let result = std::panic::catch_unwind(move || {
            let _guard = WorkingDirGuard::enter(&dir).unwrap();
            panic!("build tool crashed");
        });

        assert!(result.is_err());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
