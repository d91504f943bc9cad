//! layout: declarative static layout (JSON), applied in declaration order.
//!
//! JSON формат (массив объектов):
//! [
//!   {"key":"heat","kind":"i32"},
//!   {"key":"states","kind":"bool","count":3},
//!   {"key":"ssid","kind":"bytes","size":32},
//!   {"key":"raw","size":16}
//! ]
//!
//! Since the registry is never persisted, every process that opens an image must
//! apply the same layout to find its entries again.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::codec::ValueKind;
use crate::medium::Medium;
use crate::store::NvStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValueKind>,
    /// Element count for scalar kinds (default 1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Byte size; required for untyped and `bytes` entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
}

impl LayoutEntry {
    /// Bytes this entry occupies.
    pub fn byte_size(&self) -> Result<usize> {
        match self.kind.and_then(|k| k.size()) {
            Some(elem) => {
                let count = self.count.unwrap_or(1);
                let size = elem
                    .checked_mul(count)
                    .ok_or_else(|| anyhow!("entry '{}': size overflow", self.key))?;
                if let Some(explicit) = self.size {
                    if explicit != size {
                        return Err(anyhow!(
                            "entry '{}': size {} disagrees with {} x {}",
                            self.key,
                            explicit,
                            count,
                            elem
                        ));
                    }
                }
                Ok(size)
            }
            None => self
                .size
                .ok_or_else(|| anyhow!("entry '{}': untyped/bytes entries need \"size\"", self.key)),
        }
    }

    /// Element count of a scalar entry (1 for untyped/bytes).
    pub fn element_count(&self) -> usize {
        self.count.unwrap_or(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    pub entries: Vec<LayoutEntry>,
}

impl Layout {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("parse layout JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read layout {}", path.display()))?;
        Self::from_json_str(&s).with_context(|| format!("layout {}", path.display()))
    }

    pub fn get(&self, key: &str) -> Option<&LayoutEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Total bytes the layout needs in the static region.
    pub fn total_size(&self) -> Result<usize> {
        let mut total = 0usize;
        for e in &self.entries {
            total = total
                .checked_add(e.byte_size()?)
                .ok_or_else(|| anyhow!("layout size overflow"))?;
        }
        Ok(total)
    }

    /// Register every entry on `store`, stopping at the first rejection.
    pub fn apply<M: Medium>(&self, store: &mut NvStore<M>) -> Result<()> {
        for (i, e) in self.entries.iter().enumerate() {
            let size = e.byte_size()?;
            store
                .register_tagged(&e.key, size, e.kind)
                .with_context(|| format!("layout entry #{} '{}'", i, e.key))?;
        }
        Ok(())
    }
}
