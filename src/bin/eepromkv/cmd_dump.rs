use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;

use eepromkv::blob::stored_key;
use eepromkv::lock::try_acquire_shared_lock;
use eepromkv::{FileMedium, StoreConfig};

use super::util::{hex_dump, to_hex};

pub fn exec(image: PathBuf, json: bool) -> Result<()> {
    let _lock = try_acquire_shared_lock(&image)?;
    let bytes = FileMedium::read_image(&image)?;

    // Only the tail anchor is known without the layout.
    let cfg = StoreConfig::from_env().with_capacity(bytes.len());
    let anchor = cfg.static_limit();
    let blob_key = bytes
        .get(anchor..)
        .and_then(stored_key)
        .map(|k| String::from_utf8_lossy(k).into_owned());

    if json {
        let out = json!({
            "image": image.display().to_string(),
            "capacity": bytes.len(),
            "tail_anchor": anchor,
            "blob_key": blob_key,
            "hex": to_hex(&bytes),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("image {} ({} B)", image.display(), bytes.len());
    match blob_key {
        Some(k) => println!("blob at tail off={} key='{}'", anchor, k),
        None => println!("no blob at tail off={}", anchor),
    }
    println!("{}", hex_dump(&bytes, 0));
    Ok(())
}
