//! store/dynamic: the single Dynamic Blob Record.
//!
//! One overwritable slot at the blob anchor. `set_json` always replaces whatever
//! record sits there, whatever its key; `get_json` only checks the tag of the
//! record in place and never searches elsewhere.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::blob::{decode_record, encode_record, encoded_len, stored_key};
use crate::config::BlobAnchor;
use crate::error::{Result, StoreError};
use crate::medium::Medium;
use crate::metrics::{record_blob_read, record_blob_write};

use super::core::NvStore;

impl<M: Medium> NvStore<M> {
    /// Offset where the record starts under the configured anchor policy.
    pub fn blob_anchor(&self) -> usize {
        match self.config.blob_anchor {
            BlobAnchor::ReservedTail => self.static_limit(),
            BlobAnchor::AllocationCursor => self.registry.cursor(),
        }
    }

    /// Bytes from the anchor to the end of the store.
    pub fn blob_available(&self) -> usize {
        self.capacity.saturating_sub(self.blob_anchor())
    }

    /// Serialize `value` as JSON and store it as the blob tagged `key`, then commit.
    pub fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let payload = match serde_json::to_vec(value) {
            Ok(p) => p,
            Err(e) => {
                return Err(self.report(StoreError::PayloadEncodeFailure {
                    key: key.to_string(),
                    reason: e.to_string(),
                }))
            }
        };
        self.write_blob(key, &payload)
    }

    /// Load the blob tagged `key` and deserialize it.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let region = self.read_blob_region()?;
        let payload = match decode_record(&region, key.as_bytes()) {
            Some(p) => p,
            None => {
                return Err(self.report(StoreError::DynamicKeyMismatch {
                    key: key.to_string(),
                }))
            }
        };
        record_blob_read();
        serde_json::from_slice(payload).map_err(|e| {
            self.report(StoreError::PayloadDecodeFailure {
                key: key.to_string(),
                source: e,
            })
        })
    }

    /// `get_json` into an untyped JSON value.
    pub fn get_json_value(&self, key: &str) -> Result<serde_json::Value> {
        self.get_json(key)
    }

    /// Key tag of the record currently at the anchor, if any.
    pub fn stored_blob_key(&self) -> Result<Option<String>> {
        let region = self.read_blob_region()?;
        Ok(stored_key(&region).map(|k| String::from_utf8_lossy(k).into_owned()))
    }

    // -------- internal --------

    fn write_blob(&mut self, key: &str, payload: &[u8]) -> Result<()> {
        let anchor = self.blob_anchor();
        let available = self.blob_available();
        let needed = encoded_len(key.as_bytes(), payload);
        if needed > available {
            return Err(self.report(StoreError::DynamicRegionOverflow {
                key: key.to_string(),
                needed,
                available,
            }));
        }
        let record = encode_record(key, payload).map_err(|e| self.report(e))?;

        if let Err(e) = self.medium.write_bytes(anchor, &record) {
            return Err(self.medium_failure(&format!("write blob '{}'", key), e));
        }
        self.commit()?;
        record_blob_write(record.len());
        debug!(
            "blob '{}' written: {} B at off={} ({} B free after)",
            key,
            record.len(),
            anchor,
            available - record.len()
        );
        Ok(())
    }

    fn read_blob_region(&self) -> Result<Vec<u8>> {
        let anchor = self.blob_anchor();
        let mut region = vec![0u8; self.blob_available()];
        if let Err(e) = self.medium.read_bytes(anchor, &mut region) {
            return Err(self.medium_failure("read blob region", e));
        }
        Ok(region)
    }
}
