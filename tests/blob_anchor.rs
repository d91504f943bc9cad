// tests/blob_anchor.rs
//
// Политика BlobAnchor::AllocationCursor: запись стоит сразу за последней
// статической записью и может заходить в зарезервированный хвост.

use anyhow::Result;
use serde_json::json;

use eepromkv::{BlobAnchor, MemMedium, NvStore, StoreBuilder, StoreError};

#[test]
fn cursor_anchor_follows_allocation_cursor() -> Result<()> {
    let cfg = StoreBuilder::from_default()
        .capacity(128)
        .reserved_dynamic_bytes(16)
        .blob_anchor(BlobAnchor::AllocationCursor)
        .build();
    let mut s = NvStore::open(MemMedium::new(), cfg)?;

    assert_eq!(s.blob_anchor(), 0);
    s.register::<u32>("a")?;
    s.register::<u32>("b")?;
    assert_eq!(s.blob_anchor(), 8);
    assert_eq!(s.blob_available(), 120);

    // Larger than the reserved tail, still fits from the cursor.
    let big = json!({"text": "z".repeat(40)});
    s.set_json("doc", &big)?;
    assert_eq!(s.medium().durable()[8], 3);
    assert_eq!(s.get_json_value("doc")?, big);

    s.set("a", 1u32)?;
    s.set("b", 2u32)?;
    assert_eq!(s.get_json_value("doc")?, big);

    // A later registration moves the anchor past the old record's header.
    s.register::<u8>("c")?;
    assert_eq!(s.blob_anchor(), 9);
    assert!(matches!(
        s.get_json_value("doc"),
        Err(StoreError::DynamicKeyMismatch { .. })
    ));
    Ok(())
}

#[test]
fn tail_anchor_ignores_registrations() -> Result<()> {
    let cfg = StoreBuilder::from_default()
        .capacity(128)
        .reserved_dynamic_bytes(16)
        .build();
    let mut s = NvStore::open(MemMedium::new(), cfg)?;
    assert_eq!(s.blob_anchor(), 112);

    s.set_json("k", &json!(1))?;
    s.register_static_entry("x", 50)?;
    assert_eq!(s.blob_anchor(), 112);
    assert_eq!(s.get_json::<i32>("k")?, 1);

    let too_big = json!("w".repeat(16));
    assert!(matches!(
        s.set_json("k", &too_big),
        Err(StoreError::DynamicRegionOverflow { available: 16, .. })
    ));
    Ok(())
}
