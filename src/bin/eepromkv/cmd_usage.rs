use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use eepromkv::metrics;

use super::util::open_store;

pub fn exec(image: PathBuf, layout: PathBuf, json: bool) -> Result<()> {
    let store = open_store(&image, Some(&layout))?;
    let usage = store.debug_print_usage();

    if json {
        let m = metrics::snapshot();
        let out = json!({
            "image": image.display().to_string(),
            "usage": usage,
            "blob_anchor": store.blob_anchor(),
            "blob_available": store.blob_available(),
            "blob_key": store.stored_blob_key()?,
            "entries": store.entries(),
            "metrics": {
                "commits_total": m.commits_total,
                "registrations": m.registrations,
                "registrations_rejected": m.registrations_rejected,
                "failures_reported": m.failures_reported,
            },
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", usage);
    println!(
        "Dynamic blob: anchor={} available={} B key={}",
        store.blob_anchor(),
        store.blob_available(),
        store
            .stored_blob_key()?
            .map(|k| format!("'{}'", k))
            .unwrap_or_else(|| "(none)".to_string())
    );
    for e in store.entries() {
        println!(
            "  {:>5}..{:<5} {:>4} B  {:<6} {}",
            e.offset,
            e.end(),
            e.size,
            e.kind.map(|k| k.as_str()).unwrap_or("-"),
            e.key
        );
    }
    Ok(())
}
