//! File-based locking for single-owner images.
//!
//! Cross-platform (fs2) advisory locks on a sidecar file next to the image:
//! - Exclusive: one writer owns the image (FileMedium).
//! - Shared: read-only inspection (CLI `dump`).
//!
//! Lock file path: <image>.lock
//! Lock is released on Drop.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::consts::IMAGE_LOCK_SUFFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

#[derive(Debug)]
pub struct LockGuard {
    file: std::fs::File,
    path: PathBuf,
    mode: LockMode,
}

impl LockGuard {
    fn new(file: std::fs::File, path: PathBuf, mode: LockMode) -> Self {
        Self { file, path, mode }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // unlock errors on drop are ignored
        let _ = self.file.unlock();
    }
}

/// `<image>.lock` (suffix appended to the full file name, extension kept).
pub fn lock_file_path(image: &Path) -> PathBuf {
    sibling_with_suffix(image, IMAGE_LOCK_SUFFIX)
}

pub(crate) fn sibling_with_suffix(image: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = image
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("image"));
    name.push(".");
    name.push(suffix);
    image.with_file_name(name)
}

fn open_lock_file(image: &Path) -> Result<std::fs::File> {
    let path = lock_file_path(image);
    let f = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .with_context(|| format!("open lock file {}", path.display()))?;
    Ok(f)
}

/// Try to acquire a lock in the requested mode. Returns Err if already locked.
pub fn try_acquire_lock(image: &Path, mode: LockMode) -> Result<LockGuard> {
    let file = open_lock_file(image)?;
    let path = lock_file_path(image);
    match mode {
        LockMode::Shared => file
            .try_lock_shared()
            .with_context(|| format!("try_lock_shared failed: {}", path.display()))?,
        LockMode::Exclusive => file
            .try_lock_exclusive()
            .with_context(|| format!("image is in use (try_lock_exclusive failed): {}", path.display()))?,
    }
    Ok(LockGuard::new(file, path, mode))
}

pub fn try_acquire_exclusive_lock(image: &Path) -> Result<LockGuard> {
    try_acquire_lock(image, LockMode::Exclusive)
}

pub fn try_acquire_shared_lock(image: &Path) -> Result<LockGuard> {
    try_acquire_lock(image, LockMode::Shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_path_appends_suffix() {
        let p = lock_file_path(Path::new("/tmp/eeprom.bin"));
        assert_eq!(p, PathBuf::from("/tmp/eeprom.bin.lock"));
    }
}
