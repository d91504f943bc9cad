//! store/core: NvStore struct, initialize(), usage reporting.

use std::fmt;

use log::{error, info, warn};
use serde::Serialize;

use crate::config::{validate_capacity, StoreConfig};
use crate::error::{Result, StoreError};
use crate::medium::Medium;
use crate::metrics::record_failure;
use crate::registry::{Registry, StaticEntry};

pub struct NvStore<M: Medium> {
    pub(crate) medium: M,
    pub(crate) config: StoreConfig,
    pub(crate) registry: Registry,
    // capacity requested by the last initialize(); 0 before the first one
    pub(crate) capacity: usize,
    pub(crate) ready: bool,
}

/// Snapshot of static-region occupancy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Usage {
    pub allocation_cursor: usize,
    pub static_limit: usize,
    pub capacity: usize,
    pub reserved_dynamic_bytes: usize,
    pub entries: usize,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Static usage: {}/{} (limit {}, reserved {}, {} entries)",
            self.allocation_cursor,
            self.capacity,
            self.static_limit,
            self.reserved_dynamic_bytes,
            self.entries
        )
    }
}

impl<M: Medium> NvStore<M> {
    /// Wrap a medium. Nothing is mapped until `initialize` is called.
    pub fn new(medium: M, config: StoreConfig) -> Self {
        Self {
            medium,
            config,
            registry: Registry::new(),
            capacity: 0,
            ready: false,
        }
    }

    /// `new` + `initialize(config.capacity)`, failing if the medium cannot be opened.
    pub fn open(medium: M, config: StoreConfig) -> Result<Self> {
        let capacity = config.capacity;
        let mut store = Self::new(medium, config);
        store.initialize(capacity)?;
        Ok(store)
    }

    /// Bind the store to `capacity` bytes and reset the registry and cursor.
    ///
    /// A medium failure is logged and returned, but the store keeps the new
    /// capacity and an empty registry; later operations run best-effort and
    /// surface medium errors as they occur.
    pub fn initialize(&mut self, capacity: usize) -> Result<()> {
        self.registry.clear();
        self.capacity = capacity;
        self.ready = false;

        let res = validate_capacity(capacity).and_then(|_| self.medium.begin(capacity));
        match res {
            Ok(()) => {
                self.ready = true;
                info!(
                    "store initialized: capacity={} reserved={} anchor={}",
                    capacity, self.config.reserved_dynamic_bytes, self.config.blob_anchor
                );
                Ok(())
            }
            Err(e) => {
                error!("medium init failed (capacity {}): {:#}", capacity, e);
                record_failure();
                Err(StoreError::MediumInitFailure {
                    capacity,
                    reason: format!("{:#}", e),
                })
            }
        }
    }

    /// True after a successful `initialize`.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    #[inline]
    pub fn reserved_dynamic_bytes(&self) -> usize {
        self.config.reserved_dynamic_bytes
    }

    /// Exclusive upper bound for `cursor + size` of any registration.
    #[inline]
    pub fn static_limit(&self) -> usize {
        self.capacity.saturating_sub(self.config.reserved_dynamic_bytes)
    }

    /// Allocation cursor (next free static offset).
    #[inline]
    pub fn cursor(&self) -> usize {
        self.registry.cursor()
    }

    pub fn entry(&self, key: &str) -> Option<&StaticEntry> {
        self.registry.get(key)
    }

    /// Registered entries in address order.
    pub fn entries(&self) -> &[StaticEntry] {
        self.registry.entries()
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn medium_mut(&mut self) -> &mut M {
        &mut self.medium
    }

    pub fn into_medium(self) -> M {
        self.medium
    }

    pub fn usage(&self) -> Usage {
        Usage {
            allocation_cursor: self.registry.cursor(),
            static_limit: self.static_limit(),
            capacity: self.capacity,
            reserved_dynamic_bytes: self.config.reserved_dynamic_bytes,
            entries: self.registry.len(),
        }
    }

    /// Log the usage line and hand it back. Observational only, no medium access.
    pub fn debug_print_usage(&self) -> Usage {
        let u = self.usage();
        info!("{}", u);
        u
    }

    // -------- internal helpers --------

    /// Log a caller-visible condition at the point of detection and pass it on.
    pub(crate) fn report(&self, err: StoreError) -> StoreError {
        warn!("{}", err);
        record_failure();
        err
    }

    pub(crate) fn medium_failure(&self, what: &str, e: anyhow::Error) -> StoreError {
        let e = e.context(format!("{} (ready={})", what, self.ready));
        error!("{:#}", e);
        record_failure();
        StoreError::Medium(e)
    }

    pub(crate) fn commit(&mut self) -> Result<()> {
        match self.medium.commit() {
            Ok(()) => Ok(()),
            Err(e) => Err(self.medium_failure("commit", e)),
        }
    }
}
