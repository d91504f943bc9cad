// tests/layout_apply.rs

use anyhow::Result;

use eepromkv::{Layout, MemMedium, NvStore, ScalarValue, StoreConfig, StoreError, ValueKind};

const LAYOUT: &str = r#"[
    {"key":"heat","kind":"i32"},
    {"key":"moisture","kind":"f32"},
    {"key":"states","kind":"bool","count":3},
    {"key":"ssid","kind":"bytes","size":16},
    {"key":"raw","size":4}
]"#;

#[test]
fn layout_registers_in_declaration_order() -> Result<()> {
    let layout = Layout::from_json_str(LAYOUT)?;
    let mut s = NvStore::open(MemMedium::new(), StoreConfig::default())?;
    layout.apply(&mut s)?;

    let offsets: Vec<(String, usize, usize)> = s
        .entries()
        .iter()
        .map(|e| (e.key.clone(), e.offset, e.size))
        .collect();
    assert_eq!(
        offsets,
        vec![
            ("heat".to_string(), 0, 4),
            ("moisture".to_string(), 4, 4),
            ("states".to_string(), 8, 3),
            ("ssid".to_string(), 11, 16),
            ("raw".to_string(), 27, 4),
        ]
    );
    assert_eq!(s.cursor(), layout.total_size()?);
    assert_eq!(s.entry("states").and_then(|e| e.kind), Some(ValueKind::Bool));

    s.set_scalar("heat", ScalarValue::I32(21))?;
    assert_eq!(s.get::<i32>("heat")?, 21);
    s.set_bytes("ssid", b"home-net")?;
    assert_eq!(&s.get_bytes("ssid")?[..8], b"home-net");
    // Tagged entry refuses another kind.
    assert!(matches!(
        s.get::<u32>("heat"),
        Err(StoreError::ValueKindMismatch { .. })
    ));
    // Untyped entry takes any kind that fits.
    s.set("raw", 0xAABBu16)?;
    assert_eq!(s.get::<u16>("raw")?, 0xAABB);
    Ok(())
}

#[test]
fn layout_overflow_stops_at_offending_entry() -> Result<()> {
    let layout = Layout::from_json_str(
        r#"[{"key":"a","size":10},{"key":"b","size":10},{"key":"c","size":1}]"#,
    )?;
    let cfg = StoreConfig::default()
        .with_capacity(32)
        .with_reserved_dynamic_bytes(12);
    let mut s = NvStore::open(MemMedium::new(), cfg)?;

    let err = layout.apply(&mut s).unwrap_err();
    assert!(format!("{:#}", err).contains("layout entry #1 'b'"));
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::StaticRegionOverflow { cursor: 10, size: 10, limit: 20, .. })
    ));
    assert_eq!(s.entries().len(), 1);
    assert_eq!(s.cursor(), 10);
    Ok(())
}

#[test]
fn layout_applied_twice_reports_duplicates() -> Result<()> {
    let layout = Layout::from_json_str(LAYOUT)?;
    let mut s = NvStore::open(MemMedium::new(), StoreConfig::default())?;
    layout.apply(&mut s)?;
    let cursor = s.cursor();

    let err = layout.apply(&mut s).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::DuplicateKeyRegistration { .. })
    ));
    assert_eq!(s.cursor(), cursor);
    Ok(())
}
