//! FileMedium: EEPROM image stored as a plain file of exactly `capacity` bytes.
//!
//! Политика:
//! - `begin` берёт эксклюзивный lock (<image>.lock) и загружает образ в RAM.
//!   Missing image → created erased (0xFF). Size mismatch → error.
//! - Записи идут только в RAM-копию; `commit` пишет весь образ через tmp+rename,
//!   then fsyncs the parent directory (best-effort on non-unix).

use anyhow::{anyhow, Context, Result};
#[cfg(unix)]
use std::fs::File;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::consts::{ERASED_BYTE, IMAGE_TMP_SUFFIX};
use crate::lock::{sibling_with_suffix, try_acquire_exclusive_lock, LockGuard};
use crate::metrics::record_commit;

use super::{check_range, Medium};

#[cfg(unix)]
fn fsync_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
    }
    Ok(())
}
#[cfg(not(unix))]
fn fsync_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[derive(Debug)]
pub struct FileMedium {
    path: PathBuf,
    fsync: bool,
    working: Vec<u8>,
    _lock: Option<LockGuard>, // держим, пока medium жив
}

impl FileMedium {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            fsync: true,
            working: Vec::new(),
            _lock: None,
        }
    }

    /// Whether `commit` fsyncs the image and its directory (default true).
    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a fresh erased image. Error if the file already exists.
    pub fn create_image(path: &Path, capacity: usize) -> Result<()> {
        if path.exists() {
            return Err(anyhow!("image already exists at {}", path.display()));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
            }
        }
        write_image_atomic(path, &vec![ERASED_BYTE; capacity], true)
    }

    /// Size of an existing image file (its capacity).
    pub fn image_len(path: &Path) -> Result<usize> {
        let md = fs::metadata(path).with_context(|| format!("stat image {}", path.display()))?;
        Ok(md.len() as usize)
    }

    /// Read an image without taking the writer lock (inspection only).
    pub fn read_image(path: &Path) -> Result<Vec<u8>> {
        let mut f = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("open image {}", path.display()))?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

fn write_image_atomic(path: &Path, bytes: &[u8], fsync: bool) -> Result<()> {
    let tmp = sibling_with_suffix(path, IMAGE_TMP_SUFFIX);
    let _ = fs::remove_file(&tmp); // best‑effort

    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp)
        .with_context(|| format!("open image tmp {}", tmp.display()))?;
    f.write_all(bytes)
        .with_context(|| format!("write image tmp {}", tmp.display()))?;
    if fsync {
        f.sync_all()?;
    }
    drop(f);

    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    if fsync {
        let _ = fsync_dir(path);
    }
    Ok(())
}

impl Medium for FileMedium {
    fn begin(&mut self, capacity: usize) -> Result<()> {
        // пока begin не завершился успешно, medium пуст
        self.working.clear();
        if capacity == 0 {
            return Err(anyhow!("capacity must be > 0"));
        }
        if self._lock.is_none() {
            let guard = try_acquire_exclusive_lock(&self.path)?;
            debug!("file medium: {:?} lock held on {}", guard.mode(), guard.path().display());
            self._lock = Some(guard);
        }

        if self.path.exists() {
            let bytes = Self::read_image(&self.path)?;
            if bytes.len() != capacity {
                return Err(anyhow!(
                    "image {} holds {} B, requested capacity {} B",
                    self.path.display(),
                    bytes.len(),
                    capacity
                ));
            }
            self.working = bytes;
            debug!("file medium: loaded {} B from {}", capacity, self.path.display());
        } else {
            let erased = vec![ERASED_BYTE; capacity];
            write_image_atomic(&self.path, &erased, self.fsync)?;
            self.working = erased;
            debug!("file medium: created erased image {} ({} B)", self.path.display(), capacity);
        }
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.working.len()
    }

    fn read_byte(&self, offset: usize) -> Result<u8> {
        check_range(offset, 1, self.working.len())?;
        Ok(self.working[offset])
    }

    fn write_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        check_range(offset, 1, self.working.len())?;
        self.working[offset] = value;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.working.is_empty() {
            return Err(anyhow!("file medium: commit before begin ({})", self.path.display()));
        }
        write_image_atomic(&self.path, &self.working, self.fsync)?;
        record_commit(self.working.len());
        Ok(())
    }

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_range(offset, buf.len(), self.working.len())?;
        buf.copy_from_slice(&self.working[offset..offset + buf.len()]);
        Ok(())
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_range(offset, data.len(), self.working.len())?;
        self.working[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }
}
