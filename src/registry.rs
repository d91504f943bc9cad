//! registry: static region layout (key -> offset/size), bump allocation.
//!
//! Entries are assigned addresses in registration order starting at 0:
//! offset(n) = offset(n-1) + size(n-1). There is no per-entry header on the
//! medium; this in-memory table is the only record of where an entry begins.

use std::collections::HashMap;

use serde::Serialize;

use crate::codec::ValueKind;
use crate::error::{Result, StoreError};

/// One registered static slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticEntry {
    pub key: String,
    pub offset: usize,
    pub size: usize,
    /// Element kind for tagged registrations; None for untyped `register_static_entry`.
    pub kind: Option<ValueKind>,
}

impl StaticEntry {
    #[inline]
    pub fn end(&self) -> usize {
        self.offset + self.size
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<StaticEntry>,
    index: HashMap<String, usize>,
    cursor: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry and rewind the allocation cursor to 0.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.cursor = 0;
    }

    /// Next free offset in the static region.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&StaticEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entries in registration (= address) order.
    pub fn entries(&self) -> &[StaticEntry] {
        &self.entries
    }

    /// Reserve `size` bytes for `key` below `limit`.
    ///
    /// Succeeds only while `cursor + size < limit`. On any error the registry
    /// and the cursor are left exactly as they were.
    pub fn register(
        &mut self,
        key: &str,
        size: usize,
        kind: Option<ValueKind>,
        limit: usize,
    ) -> Result<&StaticEntry> {
        if self.index.contains_key(key) {
            return Err(StoreError::DuplicateKeyRegistration {
                key: key.to_string(),
            });
        }
        let fits = self
            .cursor
            .checked_add(size)
            .map(|end| end < limit)
            .unwrap_or(false);
        if !fits {
            return Err(StoreError::StaticRegionOverflow {
                key: key.to_string(),
                cursor: self.cursor,
                size,
                limit,
            });
        }

        let entry = StaticEntry {
            key: key.to_string(),
            offset: self.cursor,
            size,
            kind,
        };
        self.cursor += size;
        self.index.insert(entry.key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bump_allocates_in_order() {
        let mut r = Registry::new();
        assert_eq!(r.register("heat", 4, Some(ValueKind::I32), 448).unwrap().offset, 0);
        assert_eq!(r.register("moisture", 4, Some(ValueKind::F32), 448).unwrap().offset, 4);
        assert_eq!(r.register("states", 3, Some(ValueKind::Bool), 448).unwrap().offset, 8);
        assert_eq!(r.cursor(), 11);
        assert_eq!(r.len(), 3);
        assert_eq!(r.get("states").map(|e| e.end()), Some(11));
    }

    #[test]
    fn duplicate_leaves_state_untouched() {
        let mut r = Registry::new();
        r.register("a", 8, None, 100).unwrap();
        let err = r.register("a", 2, None, 100).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKeyRegistration { .. }));
        assert_eq!(r.cursor(), 8);
        assert_eq!(r.get("a").unwrap().size, 8);
    }

    #[test]
    fn limit_is_exclusive() {
        let mut r = Registry::new();
        // cursor + size must stay strictly below the limit
        let err = r.register("full", 10, None, 10).unwrap_err();
        assert!(matches!(err, StoreError::StaticRegionOverflow { .. }));
        assert!(r.is_empty());
        r.register("fits", 9, None, 10).unwrap();
        assert_eq!(r.cursor(), 9);
    }

    #[test]
    fn huge_size_does_not_wrap() {
        let mut r = Registry::new();
        r.register("a", 1, None, 100).unwrap();
        let err = r.register("b", usize::MAX, None, 100).unwrap_err();
        assert!(matches!(err, StoreError::StaticRegionOverflow { .. }));
        assert_eq!(r.cursor(), 1);
    }

    #[test]
    fn clear_rewinds_cursor() {
        let mut r = Registry::new();
        r.register("a", 5, None, 100).unwrap();
        r.clear();
        assert_eq!(r.cursor(), 0);
        assert!(!r.contains("a"));
        assert_eq!(r.register("a", 5, None, 100).unwrap().offset, 0);
    }
}
