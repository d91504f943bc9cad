//! medium: byte-addressable non-volatile backing store.
//!
//! Разделение по подмодулям:
//! - mem.rs : MemMedium: RAM image (tests, host simulation), working/durable copies
//! - file.rs: FileMedium: image file on disk, exclusive lock, atomic commit
//!
//! Model: like EEPROM emulation on small MCUs, `begin` maps `capacity` bytes into a
//! working copy, byte writes touch only that copy, and `commit` makes the whole
//! working copy durable. A crash between two commits can leave a record half
//! written on the medium; nothing above this layer repairs that.

use anyhow::{anyhow, Result};

pub mod file;
pub mod mem;

pub use file::FileMedium;
pub use mem::MemMedium;

pub trait Medium {
    /// Bind the medium to `capacity` bytes. Bytes never written read back as 0xFF.
    fn begin(&mut self, capacity: usize) -> Result<()>;

    /// Bytes currently addressable (0 before a successful `begin`).
    fn capacity(&self) -> usize;

    fn read_byte(&self, offset: usize) -> Result<u8>;

    fn write_byte(&mut self, offset: usize, value: u8) -> Result<()>;

    /// Flush the working copy to durable storage.
    fn commit(&mut self) -> Result<()>;

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_range(offset, buf.len(), self.capacity())?;
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_byte(offset + i)?;
        }
        Ok(())
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_range(offset, data.len(), self.capacity())?;
        for (i, &b) in data.iter().enumerate() {
            self.write_byte(offset + i, b)?;
        }
        Ok(())
    }
}

/// Range check shared by medium implementations.
#[inline]
pub(crate) fn check_range(offset: usize, len: usize, capacity: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(anyhow!(
            "medium access out of range: off={} len={} capacity={}",
            offset,
            len,
            capacity
        )),
    }
}

impl<M: Medium + ?Sized> Medium for Box<M> {
    fn begin(&mut self, capacity: usize) -> Result<()> {
        (**self).begin(capacity)
    }

    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read_byte(&self, offset: usize) -> Result<u8> {
        (**self).read_byte(offset)
    }

    fn write_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        (**self).write_byte(offset, value)
    }

    fn commit(&mut self) -> Result<()> {
        (**self).commit()
    }

    fn read_bytes(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        (**self).read_bytes(offset, buf)
    }

    fn write_bytes(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        (**self).write_bytes(offset, data)
    }
}
