//! MemMedium: in-memory medium with explicit durability.
//!
//! `working` receives every write; `durable` changes only on `commit`.
//! `reopen()` drops uncommitted bytes the way a power cycle would.

use anyhow::{anyhow, Result};

use crate::consts::ERASED_BYTE;
use crate::metrics::record_commit;

use super::{check_range, Medium};

#[derive(Debug, Clone, Default)]
pub struct MemMedium {
    working: Vec<u8>,
    durable: Vec<u8>,
    commits: u64,
    fail_begin: bool,
}

impl MemMedium {
    pub fn new() -> Self {
        Self::default()
    }

    /// Medium with existing durable content (e.g. an image captured earlier).
    pub fn with_contents(bytes: Vec<u8>) -> Self {
        Self {
            working: bytes.clone(),
            durable: bytes,
            commits: 0,
            fail_begin: false,
        }
    }

    /// Medium whose `begin` always fails (media init failure path).
    pub fn failing() -> Self {
        Self {
            fail_begin: true,
            ..Self::default()
        }
    }

    /// Simulate a restart: uncommitted writes are lost.
    pub fn reopen(&mut self) {
        self.working = self.durable.clone();
    }

    pub fn durable(&self) -> &[u8] {
        &self.durable
    }

    pub fn working(&self) -> &[u8] {
        &self.working
    }

    pub fn commit_count(&self) -> u64 {
        self.commits
    }
}

impl Medium for MemMedium {
    fn begin(&mut self, capacity: usize) -> Result<()> {
        if self.fail_begin {
            self.working.clear();
            return Err(anyhow!("mem medium: begin({}) refused", capacity));
        }
        // Existing bytes survive re-begin; growth is filled with the erase pattern.
        self.durable.resize(capacity, ERASED_BYTE);
        self.working = self.durable.clone();
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
        self.durable.clone_from(&self.working);
        self.commits += 1;
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
