//! store/shared: NvStore behind one mutex for multi-threaded hosts.
//!
//! Registry, cursor and medium are all shared mutable state, so every public
//! operation takes the same lock. A poisoned lock is recovered: store state is
//! only changed after each check has passed.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::StaticValue;
use crate::error::Result;
use crate::medium::Medium;
use crate::registry::StaticEntry;

use super::core::{NvStore, Usage};

pub struct SharedStore<M: Medium> {
    inner: Arc<Mutex<NvStore<M>>>,
}

impl<M: Medium> Clone for SharedStore<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Medium> SharedStore<M> {
    pub fn new(store: NvStore<M>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, NvStore<M>> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// Run `f` with exclusive access (compound operations under one lock).
    pub fn with<R>(&self, f: impl FnOnce(&mut NvStore<M>) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn initialize(&self, capacity: usize) -> Result<()> {
        self.lock().initialize(capacity)
    }

    pub fn register_static_entry(&self, key: &str, size: usize) -> Result<StaticEntry> {
        self.lock().register_static_entry(key, size)
    }

    pub fn register<T: StaticValue>(&self, key: &str) -> Result<StaticEntry> {
        self.lock().register::<T>(key)
    }

    pub fn get<T: StaticValue>(&self, key: &str) -> Result<T> {
        self.lock().get(key)
    }

    pub fn set<T: StaticValue>(&self, key: &str, value: T) -> Result<()> {
        self.lock().set(key, value)
    }

    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.lock().set_json(key, value)
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.lock().get_json(key)
    }

    pub fn usage(&self) -> Usage {
        self.lock().usage()
    }
}
