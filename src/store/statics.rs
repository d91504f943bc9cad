//! store/statics: static region: registration and fixed-size get/set.
//!
//! Проверки перед любым доступом к medium:
//! - key зарегистрирован (KeyNotRegistered);
//! - kind записи совпадает с запрошенным (ValueKindMismatch), если запись типизирована;
//! - размер значения не больше размера записи (TypeSizeMismatch).
//! A failed check never touches the medium, so a short entry is never over-read
//! into its neighbour.

use log::debug;

use crate::codec::{ScalarValue, StaticValue, ValueKind};
use crate::error::{Result, StoreError};
use crate::medium::Medium;
use crate::metrics::{
    record_registration, record_registration_rejected, record_static_read, record_static_write,
};
use crate::registry::StaticEntry;

use super::core::NvStore;

/// Untyped (None) and `Bytes` entries accept any fixed-size view; a raw
/// `Bytes` view is accepted on every entry.
#[inline]
fn kind_accepts(entry_kind: Option<ValueKind>, want: ValueKind) -> bool {
    if want == ValueKind::Bytes {
        return true;
    }
    match entry_kind {
        None | Some(ValueKind::Bytes) => true,
        Some(k) => k == want,
    }
}

impl<M: Medium> NvStore<M> {
    // ----------------- registration -----------------

    /// Reserve `size` bytes for `key` at the allocation cursor.
    ///
    /// Duplicate keys and registrations reaching into the reserved dynamic
    /// region are rejected without touching the registry or the cursor.
    pub fn register_static_entry(&mut self, key: &str, size: usize) -> Result<StaticEntry> {
        self.register_tagged(key, size, None)
    }

    /// Register a slot sized and tagged for `T`.
    pub fn register<T: StaticValue>(&mut self, key: &str) -> Result<StaticEntry> {
        self.register_tagged(key, T::SIZE, Some(T::KIND))
    }

    /// Register `count` consecutive `T` elements.
    pub fn register_array<T: StaticValue>(&mut self, key: &str, count: usize) -> Result<StaticEntry> {
        let size = match T::SIZE.checked_mul(count) {
            Some(s) => s,
            None => {
                record_registration_rejected();
                return Err(self.report(StoreError::StaticRegionOverflow {
                    key: key.to_string(),
                    cursor: self.registry.cursor(),
                    size: usize::MAX,
                    limit: self.static_limit(),
                }));
            }
        };
        self.register_tagged(key, size, Some(T::KIND))
    }

    /// Register with an explicit size and optional kind tag (layout files).
    pub fn register_tagged(
        &mut self,
        key: &str,
        size: usize,
        kind: Option<ValueKind>,
    ) -> Result<StaticEntry> {
        let limit = self.static_limit();
        match self.registry.register(key, size, kind, limit) {
            Ok(entry) => {
                let entry = entry.clone();
                record_registration();
                debug!(
                    "registered '{}' at off={} size={} kind={}",
                    entry.key,
                    entry.offset,
                    entry.size,
                    entry.kind.map(|k| k.as_str()).unwrap_or("-")
                );
                Ok(entry)
            }
            Err(e) => {
                record_registration_rejected();
                Err(self.report(e))
            }
        }
    }

    // ----------------- lookup -----------------

    fn checked_entry(&self, key: &str, want: ValueKind, needed: usize) -> Result<StaticEntry> {
        let entry = match self.registry.get(key) {
            Some(e) => e,
            None => {
                return Err(self.report(StoreError::KeyNotRegistered {
                    key: key.to_string(),
                }))
            }
        };
        if !kind_accepts(entry.kind, want) {
            return Err(self.report(StoreError::ValueKindMismatch {
                key: key.to_string(),
                expected: entry.kind.unwrap_or(ValueKind::Bytes),
                actual: want,
            }));
        }
        if needed > entry.size {
            return Err(self.report(StoreError::TypeSizeMismatch {
                key: key.to_string(),
                needed,
                available: entry.size,
            }));
        }
        Ok(entry.clone())
    }

    fn read_at(&self, entry: &StaticEntry, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        if let Err(e) = self.medium.read_bytes(entry.offset, &mut buf) {
            return Err(self.medium_failure(&format!("read '{}'", entry.key), e));
        }
        record_static_read();
        Ok(buf)
    }

    fn write_at(&mut self, entry: &StaticEntry, data: &[u8]) -> Result<()> {
        if let Err(e) = self.medium.write_bytes(entry.offset, data) {
            return Err(self.medium_failure(&format!("write '{}'", entry.key), e));
        }
        self.commit()?;
        record_static_write(data.len());
        debug!("wrote '{}': {} B at off={}", entry.key, data.len(), entry.offset);
        Ok(())
    }

    // ----------------- typed access -----------------

    /// Decode a `T` from the first `T::SIZE` bytes of the entry.
    pub fn get<T: StaticValue>(&self, key: &str) -> Result<T> {
        let entry = self.checked_entry(key, T::KIND, T::SIZE)?;
        let buf = self.read_at(&entry, T::SIZE)?;
        Ok(T::decode(&buf))
    }

    /// Encode `value` at the entry offset and commit.
    pub fn set<T: StaticValue>(&mut self, key: &str, value: T) -> Result<()> {
        let entry = self.checked_entry(key, T::KIND, T::SIZE)?;
        let mut buf = vec![0u8; T::SIZE];
        value.encode(&mut buf);
        self.write_at(&entry, &buf)
    }

    /// Read `N` consecutive `T` elements starting at the entry offset.
    pub fn get_array<T: StaticValue, const N: usize>(&self, key: &str) -> Result<[T; N]> {
        let needed = T::SIZE * N;
        let entry = self.checked_entry(key, T::KIND, needed)?;
        let buf = self.read_at(&entry, needed)?;
        Ok(std::array::from_fn(|i| T::decode(&buf[i * T::SIZE..])))
    }

    /// Write `N` consecutive `T` elements starting at the entry offset and commit.
    pub fn set_array<T: StaticValue, const N: usize>(&mut self, key: &str, values: &[T; N]) -> Result<()> {
        let needed = T::SIZE * N;
        let entry = self.checked_entry(key, T::KIND, needed)?;
        let mut buf = vec![0u8; needed];
        for (i, v) in values.iter().enumerate() {
            v.encode(&mut buf[i * T::SIZE..]);
        }
        self.write_at(&entry, &buf)
    }

    // ----------------- raw / runtime-tagged access -----------------

    /// All bytes of the entry.
    pub fn get_bytes(&self, key: &str) -> Result<Vec<u8>> {
        let entry = match self.registry.get(key) {
            Some(e) => e.clone(),
            None => {
                return Err(self.report(StoreError::KeyNotRegistered {
                    key: key.to_string(),
                }))
            }
        };
        self.read_at(&entry, entry.size)
    }

    /// Overwrite the head of the entry with `data` (at most `entry.size` bytes) and commit.
    pub fn set_bytes(&mut self, key: &str, data: &[u8]) -> Result<()> {
        let entry = self.checked_entry(key, ValueKind::Bytes, data.len())?;
        self.write_at(&entry, data)
    }

    /// Read a scalar of `kind` (CLI / layout-driven callers that only know the tag at runtime).
    pub fn get_scalar(&self, key: &str, kind: ValueKind) -> Result<ScalarValue> {
        let needed = kind.size().unwrap_or(0);
        let entry = self.checked_entry(key, kind, needed)?;
        let buf = self.read_at(&entry, needed)?;
        match ScalarValue::decode(kind, &buf) {
            Some(v) => Ok(v),
            None => Err(self.report(StoreError::ValueKindMismatch {
                key: key.to_string(),
                expected: entry.kind.unwrap_or(ValueKind::Bytes),
                actual: kind,
            })),
        }
    }

    pub fn set_scalar(&mut self, key: &str, value: ScalarValue) -> Result<()> {
        let entry = self.checked_entry(key, value.kind(), value.size())?;
        let mut buf = vec![0u8; value.size()];
        value.encode(&mut buf);
        self.write_at(&entry, &buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::medium::MemMedium;

    fn store() -> NvStore<MemMedium> {
        NvStore::open(MemMedium::new(), StoreConfig::default()).unwrap()
    }

    #[test]
    fn untyped_entry_accepts_any_fitting_type() {
        let mut s = store();
        s.register_static_entry("raw", 8).unwrap();
        s.set("raw", 7u64).unwrap();
        assert_eq!(s.get::<u64>("raw").unwrap(), 7);
        // narrower view of the same bytes
        assert_eq!(s.get::<u32>("raw").unwrap(), 7);
    }

    #[test]
    fn tagged_entry_rejects_other_kind() {
        let mut s = store();
        s.register::<f32>("moisture").unwrap();
        let err = s.get::<i32>("moisture").unwrap_err();
        assert!(matches!(
            err,
            StoreError::ValueKindMismatch {
                expected: ValueKind::F32,
                actual: ValueKind::I32,
                ..
            }
        ));
    }

    #[test]
    fn oversized_value_is_rejected_before_io() {
        let mut s = store();
        s.register_static_entry("small", 2).unwrap();
        s.register_static_entry("next", 4).unwrap();
        s.set_bytes("next", &[9, 9, 9, 9]).unwrap();
        let commits = s.medium().commit_count();

        assert!(matches!(
            s.set("small", 0x0102_0304u32),
            Err(StoreError::TypeSizeMismatch { needed: 4, available: 2, .. })
        ));
        assert!(matches!(
            s.get::<u32>("small"),
            Err(StoreError::TypeSizeMismatch { .. })
        ));
        assert_eq!(s.medium().commit_count(), commits);
        assert_eq!(s.get_bytes("next").unwrap(), vec![9, 9, 9, 9]);
    }

    #[test]
    fn array_round_trip() {
        let mut s = store();
        s.register_array::<bool>("states", 3).unwrap();
        s.set_array("states", &[true, false, true]).unwrap();
        assert_eq!(s.get_array::<bool, 3>("states").unwrap(), [true, false, true]);
        assert!(matches!(
            s.get_array::<bool, 4>("states"),
            Err(StoreError::TypeSizeMismatch { needed: 4, available: 3, .. })
        ));
    }

    #[test]
    fn scalar_access_uses_tag() {
        let mut s = store();
        s.register::<i16>("trim").unwrap();
        s.set_scalar("trim", ScalarValue::I16(-300)).unwrap();
        assert_eq!(s.get_scalar("trim", ValueKind::I16).unwrap(), ScalarValue::I16(-300));
        assert_eq!(s.get::<i16>("trim").unwrap(), -300);
        assert!(s.set_scalar("trim", ScalarValue::U8(1)).is_err());
    }

    #[test]
    fn array_size_overflow_is_rejected() {
        let mut s = store();
        let err = s.register_array::<u64>("huge", usize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::StaticRegionOverflow { .. }));
        assert_eq!(s.cursor(), 0);
    }
}
