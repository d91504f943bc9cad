use anyhow::Result;
use std::path::PathBuf;

use eepromkv::config::validate_capacity;
use eepromkv::{FileMedium, StoreConfig};

pub fn exec(image: PathBuf, capacity: Option<usize>) -> Result<()> {
    let capacity = capacity.unwrap_or_else(|| StoreConfig::from_env().capacity);
    validate_capacity(capacity)?;

    if image.exists() {
        let have = FileMedium::image_len(&image)?;
        if have != capacity {
            eprintln!(
                "warning: image already exists with capacity={}, requested {} (keeping {})",
                have, capacity, have
            );
        }
        println!("Image already initialized at {}", image.display());
        return Ok(());
    }
    FileMedium::create_image(&image, capacity)?;
    println!("Initialized erased image at {} ({} B)", image.display(), capacity);
    Ok(())
}
