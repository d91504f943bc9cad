use anyhow::{Context, Result};
use std::path::PathBuf;

use super::util::{open_store, read_all};

pub fn exec_get(image: PathBuf, key: String, layout: Option<PathBuf>) -> Result<()> {
    let store = open_store(&image, layout.as_deref())?;
    let v = store.get_json_value(&key)?;
    println!("{}", serde_json::to_string_pretty(&v)?);
    Ok(())
}

pub fn exec_set(image: PathBuf, key: String, json: String, layout: Option<PathBuf>) -> Result<()> {
    let text = match json.strip_prefix('@') {
        Some(p) => String::from_utf8(read_all(&PathBuf::from(p))?)
            .with_context(|| format!("{} is not UTF-8", p))?,
        None => json,
    };
    let v: serde_json::Value = serde_json::from_str(&text).context("parse --json")?;

    let mut store = open_store(&image, layout.as_deref())?;
    store.set_json(&key, &v)?;
    println!(
        "OK set-json: key='{}' at off={} ({} B available)",
        key,
        store.blob_anchor(),
        store.blob_available()
    );
    Ok(())
}
