use anyhow::{anyhow, Result};
use std::path::PathBuf;

use eepromkv::ScalarValue;

use super::util::{decode_value_arg, open_store};

pub fn exec(image: PathBuf, layout: PathBuf, key: String, value: String) -> Result<()> {
    let mut store = open_store(&image, Some(&layout))?;
    let entry = match store.entry(&key) {
        Some(e) => e.clone(),
        // Let the store report KeyNotRegistered.
        None => return store.set_bytes(&key, &[]).map_err(Into::into),
    };

    match entry.kind.and_then(|k| k.size().map(|sz| (k, sz))) {
        Some((k, sz)) if entry.size == sz => {
            let v = ScalarValue::parse(k, &value)?;
            store.set_scalar(&key, v)?;
            println!("OK set: {} = {} ({})", key, v, k);
        }
        Some((k, sz)) => {
            let count = entry.size / sz;
            let parts: Vec<&str> = value.split(',').collect();
            if parts.len() != count {
                return Err(anyhow!(
                    "entry '{}' holds {} x {}, got {} values",
                    key,
                    count,
                    k,
                    parts.len()
                ));
            }
            let mut buf = vec![0u8; entry.size];
            for (i, p) in parts.iter().enumerate() {
                ScalarValue::parse(k, p)?.encode(&mut buf[i * sz..]);
            }
            store.set_bytes(&key, &buf)?;
            println!("OK set: {} = [{}] ({} x {})", key, value, count, k);
        }
        None => {
            let (bytes, src) = decode_value_arg(&value)?;
            store.set_bytes(&key, &bytes)?;
            println!(
                "OK set: key='{}' {} B from {} (entry {} B)",
                key,
                bytes.len(),
                src,
                entry.size
            );
        }
    }
    Ok(())
}
