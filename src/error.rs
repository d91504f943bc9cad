//! Error taxonomy of the store.
//!
//! Every variant is recoverable by the caller. The store logs each condition
//! where it is detected and then returns it; nothing here aborts the process.

use thiserror::Error;

use crate::codec::ValueKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not registered: {key}")]
    KeyNotRegistered { key: String },

    #[error("duplicate key: {key}")]
    DuplicateKeyRegistration { key: String },

    #[error("static region overflow when registering {key}: cursor={cursor}, size={size}, limit={limit}")]
    StaticRegionOverflow {
        key: String,
        cursor: usize,
        size: usize,
        limit: usize,
    },

    #[error("size mismatch for {key}: value needs {needed} B, entry holds {available} B")]
    TypeSizeMismatch {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("kind mismatch for {key}: entry holds {expected}, requested {actual}")]
    ValueKindMismatch {
        key: String,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("not enough space for dynamic record {key}: need {needed} B, have {available} B")]
    DynamicRegionOverflow {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("dynamic record key too long: {len} B (max {})", crate::consts::BLOB_MAX_KEY_LEN)]
    DynamicKeyTooLong { len: usize },

    #[error("dynamic record key mismatch: {key}")]
    DynamicKeyMismatch { key: String },

    #[error("payload encode failed for {key}: {reason}")]
    PayloadEncodeFailure { key: String, reason: String },

    #[error("payload decode failed for {key}: {source}")]
    PayloadDecodeFailure {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("medium init failed (capacity {capacity}): {reason}")]
    MediumInitFailure { capacity: usize, reason: String },

    #[error(transparent)]
    Medium(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Short stable name of the condition (used by the CLI JSON output and metrics labels).
    pub fn kind_name(&self) -> &'static str {
        match self {
            StoreError::KeyNotRegistered { .. } => "key_not_registered",
            StoreError::DuplicateKeyRegistration { .. } => "duplicate_key_registration",
            StoreError::StaticRegionOverflow { .. } => "static_region_overflow",
            StoreError::TypeSizeMismatch { .. } => "type_size_mismatch",
            StoreError::ValueKindMismatch { .. } => "value_kind_mismatch",
            StoreError::DynamicRegionOverflow { .. } => "dynamic_region_overflow",
            StoreError::DynamicKeyTooLong { .. } => "dynamic_key_too_long",
            StoreError::DynamicKeyMismatch { .. } => "dynamic_key_mismatch",
            StoreError::PayloadEncodeFailure { .. } => "payload_encode_failure",
            StoreError::PayloadDecodeFailure { .. } => "payload_decode_failure",
            StoreError::MediumInitFailure { .. } => "medium_init_failure",
            StoreError::Medium(_) => "medium",
        }
    }
}
