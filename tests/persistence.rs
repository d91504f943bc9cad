// tests/persistence.rs
//
// Durability через commit, "перезапуск" (MemMedium::reopen), reset через initialize,
// отказ носителя при initialize и повреждённый payload в хвосте.

use anyhow::Result;
use serde_json::json;

use eepromkv::{MemMedium, Medium, NvStore, StoreConfig, StoreError};

fn cfg() -> StoreConfig {
    StoreConfig::default()
        .with_capacity(512)
        .with_reserved_dynamic_bytes(64)
}

fn register_layout(s: &mut NvStore<MemMedium>) -> Result<()> {
    s.register::<i32>("heat")?;
    s.register::<f32>("moisture")?;
    s.register_array::<bool>("states", 3)?;
    Ok(())
}

#[test]
fn committed_values_survive_restart() -> Result<()> {
    let mut s = NvStore::open(MemMedium::new(), cfg())?;
    register_layout(&mut s)?;
    s.set("heat", -17i32)?;
    s.set("moisture", 0.625f32)?;
    s.set_array("states", &[true, true, false])?;
    s.set_json("env", &json!({"sensor": "DHT22", "value": 23.4}))?;

    // Restart: registry is volatile, bytes are not.
    let mut m = s.into_medium();
    m.reopen();
    let mut s = NvStore::open(m, cfg())?;
    assert!(s.entries().is_empty());
    register_layout(&mut s)?;

    assert_eq!(s.get::<i32>("heat")?, -17);
    assert_eq!(s.get::<f32>("moisture")?, 0.625);
    assert_eq!(s.get_array::<bool, 3>("states")?, [true, true, false]);
    assert_eq!(
        s.get_json_value("env")?,
        json!({"sensor": "DHT22", "value": 23.4})
    );
    Ok(())
}

#[test]
fn every_set_commits_before_returning() -> Result<()> {
    let mut s = NvStore::open(MemMedium::new(), cfg())?;
    s.register::<u16>("port")?;

    let c0 = s.medium().commit_count();
    s.set("port", 8080u16)?;
    assert_eq!(s.medium().commit_count(), c0 + 1);
    assert_eq!(&s.medium().durable()[0..2], &8080u16.to_le_bytes());

    s.set_json("k", &json!([1, 2, 3]))?;
    assert_eq!(s.medium().commit_count(), c0 + 2);
    assert_eq!(s.medium().durable()[448], 1);

    // Raw write without commit is lost on restart.
    s.medium_mut().write_bytes(0, &[0, 0])?;
    s.medium_mut().reopen();
    assert_eq!(s.get::<u16>("port")?, 8080);
    Ok(())
}

#[test]
fn initialize_resets_registry_but_keeps_bytes() -> Result<()> {
    let mut s = NvStore::open(MemMedium::new(), cfg())?;
    s.register::<u32>("a")?;
    s.register::<u32>("b")?;
    s.set("b", 7u32)?;
    assert_eq!(s.cursor(), 8);

    s.initialize(512)?;
    assert!(s.is_ready());
    assert_eq!(s.cursor(), 0);
    assert!(s.entry("a").is_none());
    assert!(matches!(
        s.get::<u32>("b"),
        Err(StoreError::KeyNotRegistered { .. })
    ));

    // Different layout now maps "b" to offset 0.
    assert_eq!(s.register::<u32>("b")?.offset, 0);
    assert_eq!(s.register::<u32>("a")?.offset, 4);
    assert_eq!(s.get::<u32>("a")?, 7);
    Ok(())
}

#[test]
fn medium_init_failure_is_reported_and_store_degrades() -> Result<()> {
    let err = NvStore::open(MemMedium::failing(), cfg()).err();
    assert!(matches!(
        err,
        Some(StoreError::MediumInitFailure { capacity: 512, .. })
    ));

    let mut s = NvStore::new(MemMedium::failing(), cfg());
    let err = s.initialize(512).unwrap_err();
    assert_eq!(err.kind_name(), "medium_init_failure");
    assert!(!s.is_ready());
    assert_eq!(s.capacity(), 512);
    assert_eq!(s.cursor(), 0);

    // Registry still works in memory; medium access fails without panicking.
    s.register::<i32>("heat")?;
    assert!(matches!(s.set("heat", 1i32), Err(StoreError::Medium(_))));
    assert!(matches!(s.get::<i32>("heat"), Err(StoreError::Medium(_))));
    assert!(matches!(
        s.set_json("k", &json!(1)),
        Err(StoreError::Medium(_))
    ));
    Ok(())
}

#[test]
fn invalid_capacity_is_init_failure() -> Result<()> {
    let mut s = NvStore::new(MemMedium::new(), cfg());
    assert!(matches!(
        s.initialize(0),
        Err(StoreError::MediumInitFailure { capacity: 0, .. })
    ));
    assert!(matches!(
        s.initialize(1 << 20),
        Err(StoreError::MediumInitFailure { .. })
    ));
    s.initialize(512)?;
    assert!(s.is_ready());
    Ok(())
}

fn image_with_tail(tail: &[u8]) -> Vec<u8> {
    let mut img = vec![0xFFu8; 512];
    img[448..448 + tail.len()].copy_from_slice(tail);
    img
}

#[test]
fn corrupted_payload_is_decode_failure() -> Result<()> {
    let mut tail = vec![3u8];
    tail.extend_from_slice(b"env|{\"sensor\":");
    tail.push(0);
    let mut s = NvStore::open(MemMedium::with_contents(image_with_tail(&tail)), cfg())?;
    s.register::<i32>("heat")?;

    assert_eq!(s.stored_blob_key()?.as_deref(), Some("env"));
    match s.get_json_value("env") {
        Err(StoreError::PayloadDecodeFailure { key, .. }) => assert_eq!(key, "env"),
        other => panic!("expected decode failure, got {:?}", other),
    }
    // Static region unaffected.
    s.set("heat", 5i32)?;
    assert_eq!(s.get::<i32>("heat")?, 5);
    Ok(())
}

#[test]
fn payload_ends_at_erase_byte_without_terminator() -> Result<()> {
    let mut tail = vec![3u8];
    tail.extend_from_slice(b"env|{\"a\":1}");
    let s = NvStore::open(MemMedium::with_contents(image_with_tail(&tail)), cfg())?;
    assert_eq!(s.get_json_value("env")?, json!({"a": 1}));
    Ok(())
}

#[test]
fn erased_store_has_no_blob() -> Result<()> {
    let s = NvStore::open(MemMedium::new(), cfg())?;
    assert_eq!(s.stored_blob_key()?, None);
    assert!(matches!(
        s.get_json_value("env"),
        Err(StoreError::DynamicKeyMismatch { .. })
    ));
    Ok(())
}

#[test]
fn overwrite_with_shorter_record_reads_only_new_payload() -> Result<()> {
    let mut s = NvStore::open(MemMedium::new(), cfg())?;
    s.set_json("env", &json!({"sensor": "DHT22", "value": 23.4}))?;
    s.set_json("e", &json!(7))?;
    assert_eq!(s.get_json::<i64>("e")?, 7);
    assert!(s.get_json_value("env").is_err());
    Ok(())
}

#[test]
fn dynamic_key_too_long_is_rejected() -> Result<()> {
    let cfg = StoreConfig::default()
        .with_capacity(1024)
        .with_reserved_dynamic_bytes(512);
    let mut s = NvStore::open(MemMedium::new(), cfg)?;
    let key = "k".repeat(255);
    assert!(matches!(
        s.set_json(&key, &json!(1)),
        Err(StoreError::DynamicKeyTooLong { len: 255 })
    ));
    let key = "k".repeat(254);
    s.set_json(&key, &json!(1))?;
    assert_eq!(s.get_json::<i32>(&key)?, 1);
    Ok(())
}

#[test]
fn boxed_medium_and_metrics_counters() -> Result<()> {
    let before = eepromkv::metrics::snapshot();

    let medium: Box<dyn Medium> = Box::new(MemMedium::new());
    let mut s = NvStore::open(medium, cfg())?;
    s.register::<u8>("b")?;
    s.set("b", 9u8)?;
    s.set_json("k", &json!("v"))?;
    assert_eq!(s.get::<u8>("b")?, 9);
    assert!(s.register::<u8>("b").is_err());

    // Counters are process-wide and other tests run in parallel.
    let after = eepromkv::metrics::snapshot();
    assert!(after.commits_total >= before.commits_total + 2);
    assert!(after.static_writes > before.static_writes);
    assert!(after.blob_writes > before.blob_writes);
    assert!(after.registrations_rejected > before.registrations_rejected);
    assert!(after.avg_blob_record_len() > 0.0);
    Ok(())
}
