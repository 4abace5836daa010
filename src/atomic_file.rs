//! Whole-file replacement shared by the config and ledger writers
//!
//! The new content goes to `<file>.tmp`, is synced, then renamed over the
//! target while an exclusive lock on `<file>.lock` is held.

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

/// Which part of the replacement failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    CreateDir,
    Lock,
    Write,
    Rename,
}

impl std::fmt::Display for WriteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            Self::CreateDir => "create directory",
            Self::Lock => "lock",
            Self::Write => "write",
            Self::Rename => "rename into place",
        };
        write!(f, "{}", action)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to {step} {}: {error}", .path.display())]
pub struct AtomicWriteError {
    pub step: WriteStep,
    pub path: PathBuf,
    #[source]
    pub error: std::io::Error,
}

/// Replace `path` with `content`. Parent directories are created if needed.
pub(crate) fn replace_file(path: &Path, content: &[u8]) -> Result<(), AtomicWriteError> {
    let fail = |step: WriteStep, path: &Path| {
        let path = path.to_path_buf();
        move |error| AtomicWriteError { step, path, error }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail(WriteStep::CreateDir, parent))?;
    }

    // Lock file is separate from the target so the rename cannot release it
    let lock_path = sibling(path, ".lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .map_err(fail(WriteStep::Lock, &lock_path))?;
    lock_file
        .lock_exclusive()
        .map_err(fail(WriteStep::Lock, &lock_path))?;

    let temp_path = sibling(path, ".tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(fail(WriteStep::Write, &temp_path))?;
    temp_file
        .write_all(content)
        .map_err(fail(WriteStep::Write, &temp_path))?;
    temp_file
        .sync_all()
        .map_err(fail(WriteStep::Write, &temp_path))?;
    drop(temp_file);

    std::fs::rename(&temp_path, path).map_err(fail(WriteStep::Rename, path))?;

    // Lock is released when lock_file is dropped
    Ok(())
}

/// `ledger.json` -> `ledger.json<suffix>`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
