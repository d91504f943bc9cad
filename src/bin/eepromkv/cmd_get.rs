use anyhow::Result;
use std::path::PathBuf;

use eepromkv::ScalarValue;

use super::util::{display_text, hex_dump, open_store};

pub fn exec(image: PathBuf, layout: PathBuf, key: String) -> Result<()> {
    let store = open_store(&image, Some(&layout))?;
    // KeyNotRegistered surfaces here for unknown keys.
    let bytes = store.get_bytes(&key)?;
    let kind = store.entry(&key).and_then(|e| e.kind);

    match kind.and_then(|k| k.size().map(|sz| (k, sz))) {
        Some((k, sz)) if bytes.len() == sz => {
            let v = store.get_scalar(&key, k)?;
            println!("{} = {} ({})", key, v, k);
        }
        Some((k, sz)) => {
            let items: Vec<String> = bytes
                .chunks_exact(sz)
                .filter_map(|c| ScalarValue::decode(k, c))
                .map(|v| v.to_string())
                .collect();
            println!("{} = [{}] ({} x {})", key, items.join(", "), items.len(), k);
        }
        None => {
            println!("{}: {} B", key, bytes.len());
            println!("text: {}", display_text(&bytes));
            println!("{}", hex_dump(&bytes, 0));
        }
    }
    Ok(())
}
