//! Centralized configuration and builder for the store.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - StoreConfig::from_env() reads EEKV_* variables on top of the defaults.
//! - StoreBuilder returns a StoreConfig, which NvStore / FileMedium consume.
//!
//! Defaults match the classic 512-byte EEPROM layout:
//! - capacity = 512
//! - reserved_dynamic_bytes = 64 (tail kept for the dynamic blob)
//! - blob_anchor = tail (record lives at capacity - reserve)
//! - fsync = true (FileMedium fsyncs image + directory on commit)

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

use crate::consts::{DEFAULT_CAPACITY, DEFAULT_RESERVED_DYNAMIC_BYTES, MAX_CAPACITY, MIN_CAPACITY};

/// Where the Dynamic Blob Record is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlobAnchor {
    /// Start of the reserved tail: `capacity - reserved_dynamic_bytes`.
    #[default]
    ReservedTail,
    /// Current allocation cursor (right after the last static entry).
    /// The record may run on into the reserved tail, and a later
    /// registration moves the anchor over it.
    AllocationCursor,
}

impl BlobAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            BlobAnchor::ReservedTail => "tail",
            BlobAnchor::AllocationCursor => "cursor",
        }
    }
}

impl fmt::Display for BlobAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlobAnchor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tail" | "reserved" | "reserved_tail" => Ok(BlobAnchor::ReservedTail),
            "cursor" | "allocation_cursor" => Ok(BlobAnchor::AllocationCursor),
            other => Err(anyhow!("unknown blob anchor '{}' (expected tail|cursor)", other)),
        }
    }
}

/// Проверка capacity: MIN_CAPACITY..=MAX_CAPACITY.
pub fn validate_capacity(capacity: usize) -> Result<()> {
    if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
        return Err(anyhow!(
            "capacity must be in [{} .. {}], got {}",
            MIN_CAPACITY,
            MAX_CAPACITY,
            capacity
        ));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Backing store size in bytes.
    /// Env: EEKV_CAPACITY (default 512)
    pub capacity: usize,

    /// Trailing bytes kept out of the static region for the dynamic blob.
    /// Env: EEKV_RESERVE (default 64)
    pub reserved_dynamic_bytes: usize,

    /// Anchor policy for the dynamic blob.
    /// Env: EEKV_BLOB_ANCHOR = tail|cursor (default tail)
    pub blob_anchor: BlobAnchor,

    /// fsync on commit (FileMedium only).
    /// Env: EEKV_FSYNC (default true; "0|false|off|no" => false)
    pub fsync: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            reserved_dynamic_bytes: DEFAULT_RESERVED_DYNAMIC_BYTES,
            blob_anchor: BlobAnchor::ReservedTail,
            fsync: true,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl StoreConfig {
    /// Load configuration from environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("EEKV_CAPACITY") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.capacity = n;
            }
        }

        if let Ok(v) = std::env::var("EEKV_RESERVE") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.reserved_dynamic_bytes = n;
            }
        }

        if let Ok(v) = std::env::var("EEKV_BLOB_ANCHOR") {
            if let Ok(a) = v.parse::<BlobAnchor>() {
                cfg.blob_anchor = a;
            }
        }

        if let Ok(v) = std::env::var("EEKV_FSYNC") {
            if let Some(on) = parse_flag(&v) {
                cfg.fsync = on;
            }
        }

        cfg
    }

    // Fluent setters (builder-style) to override specific fields.

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_reserved_dynamic_bytes(mut self, bytes: usize) -> Self {
        self.reserved_dynamic_bytes = bytes;
        self
    }

    pub fn with_blob_anchor(mut self, anchor: BlobAnchor) -> Self {
        self.blob_anchor = anchor;
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    /// First byte the static region may never reach (exclusive upper bound for
    /// `cursor + size`). Saturates at 0 when the reserve covers the whole store.
    pub fn static_limit(&self) -> usize {
        self.capacity.saturating_sub(self.reserved_dynamic_bytes)
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StoreConfig {{ \
             capacity: {}, \
             reserved_dynamic_bytes: {}, \
             blob_anchor: {}, \
             fsync: {} \
             }}",
            self.capacity, self.reserved_dynamic_bytes, self.blob_anchor, self.fsync,
        )
    }
}

/// Lightweight builder that produces a StoreConfig.
#[derive(Clone, Debug)]
pub struct StoreBuilder {
    cfg: StoreConfig,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: StoreConfig::from_env(),
        }
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: StoreConfig::default(),
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.cfg.capacity = capacity;
        self
    }

    pub fn reserved_dynamic_bytes(mut self, bytes: usize) -> Self {
        self.cfg.reserved_dynamic_bytes = bytes;
        self
    }

    pub fn blob_anchor(mut self, anchor: BlobAnchor) -> Self {
        self.cfg.blob_anchor = anchor;
        self
    }

    pub fn fsync(mut self, on: bool) -> Self {
        self.cfg.fsync = on;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> StoreConfig {
        self.cfg
    }
}
